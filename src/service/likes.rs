use chrono::Utc;

use crate::error::{AppError, AppResult, OptionExt};
use crate::repo::{BansRepository, LikesRepository, PhotosRepository, UsersRepository};
use crate::types::Like;

#[derive(Clone)]
pub struct LikesService {
    users: UsersRepository,
    bans: BansRepository,
    likes: LikesRepository,
    photos: PhotosRepository,
}

impl LikesService {
    pub fn new(
        users: UsersRepository,
        bans: BansRepository,
        likes: LikesRepository,
        photos: PhotosRepository,
    ) -> Self {
        Self { users, bans, likes, photos }
    }

    /// Resolves the photo and enforces the mutual-ban guard between the
    /// actor and the photo owner. A banned pair sees "photo not found".
    async fn guard_photo(&self, actor_id: i64, photo_id: i64) -> AppResult<crate::types::Photo> {
        let photo = self.photos.get_photo_by_id(photo_id).await?.ok_or_not_found("Photo")?;
        self.users.get_user_by_id(actor_id).await?.ok_or_not_found("User")?;
        if self.bans.get_ban_exists(actor_id, photo.owner.id).await?
            || self.bans.get_ban_exists(photo.owner.id, actor_id).await?
        {
            return Err(AppError::NotFound("Photo not found".to_string()));
        }
        Ok(photo)
    }

    pub async fn like_photo(&self, photo_id: i64, actor_id: i64) -> AppResult<()> {
        let photo = self.guard_photo(actor_id, photo_id).await?;
        self.likes.set_like(photo.id, actor_id, Utc::now()).await
    }

    pub async fn unlike_photo(&self, photo_id: i64, actor_id: i64) -> AppResult<()> {
        self.guard_photo(actor_id, photo_id).await?;

        let likes = self
            .likes
            .get_likes(&[
                UsersRepository::with_users(),
                UsersRepository::filter_by_user_id(actor_id),
                PhotosRepository::filter_by_photo_id(photo_id),
            ])
            .await?;
        if likes.is_empty() {
            return Err(AppError::NotFound("Like not found".to_string()));
        }

        self.likes.remove_like(photo_id, actor_id).await
    }

    pub async fn get_photo_likes(&self, photo_id: i64, actor_id: i64) -> AppResult<Vec<Like>> {
        self.guard_photo(actor_id, photo_id).await?;
        self.likes
            .get_likes(&[
                UsersRepository::with_users(),
                PhotosRepository::filter_by_photo_id(photo_id),
            ])
            .await
    }
}
