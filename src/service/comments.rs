use chrono::Utc;

use crate::error::{AppError, AppResult, OptionExt};
use crate::repo::{BansRepository, CommentsRepository, PhotosRepository, UsersRepository};
use crate::types::Comment;

#[derive(Clone)]
pub struct CommentsService {
    users: UsersRepository,
    bans: BansRepository,
    comments: CommentsRepository,
    photos: PhotosRepository,
}

impl CommentsService {
    pub fn new(
        users: UsersRepository,
        bans: BansRepository,
        comments: CommentsRepository,
        photos: PhotosRepository,
    ) -> Self {
        Self { users, bans, comments, photos }
    }

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

    pub async fn comment_photo(
        &self,
        photo_id: i64,
        actor_id: i64,
        content: &str,
    ) -> AppResult<Comment> {
        let photo = self.guard_photo(actor_id, photo_id).await?;

        let comment_id =
            self.comments.set_comment(photo.id, actor_id, Utc::now(), content).await?;
        self.comments
            .get_comment_by_id(comment_id, &[UsersRepository::with_users()])
            .await?
            .ok_or_not_found("Comment")
    }

    pub async fn uncomment_photo(
        &self,
        photo_id: i64,
        comment_id: i64,
        actor_id: i64,
    ) -> AppResult<()> {
        self.photos.get_photo_by_id(photo_id).await?.ok_or_not_found("Photo")?;
        let comment = self
            .comments
            .get_comment_by_id(comment_id, &[UsersRepository::with_users()])
            .await?
            .ok_or_not_found("Comment")?;
        if comment.owner.id != actor_id {
            return Err(AppError::Forbidden("You can't delete this comment".to_string()));
        }
        self.users.get_user_by_id(actor_id).await?.ok_or_not_found("User")?;

        self.comments.remove_comment(comment_id).await
    }

    pub async fn get_photo_comments(
        &self,
        photo_id: i64,
        actor_id: i64,
    ) -> AppResult<Vec<Comment>> {
        self.guard_photo(actor_id, photo_id).await?;
        self.comments
            .get_comments(&[
                UsersRepository::with_users(),
                PhotosRepository::filter_by_photo_id(photo_id),
            ])
            .await
    }
}
