use axum::body::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, AppResult, OptionExt};
use crate::media::{self, MediaStore};
use crate::pagination::assemble;
use crate::query::Relation;
use crate::repo::{
    BansRepository, CommentsRepository, FollowsRepository, LikesRepository, PhotosRepository,
    UsersRepository,
};
use crate::types::{PaginatedPhotos, Photo};
use crate::workers::{run_all, Job, JobOutput};

#[derive(Clone)]
pub struct PhotosService {
    media: MediaStore,
    users: UsersRepository,
    bans: BansRepository,
    photos: PhotosRepository,
}

impl PhotosService {
    pub fn new(
        media: MediaStore,
        users: UsersRepository,
        bans: BansRepository,
        photos: PhotosRepository,
    ) -> Self {
        Self { media, users, bans, photos }
    }

    /// A user's gallery, paginated: one fan-out running the page query and
    /// the count query concurrently over the same visibility filters.
    pub async fn get_user_photos(
        &self,
        actor_id: i64,
        target_id: i64,
        offset: i64,
        limit: i64,
    ) -> AppResult<PaginatedPhotos> {
        self.users.get_user_by_id(actor_id).await?.ok_or_not_found("User")?;
        self.users.get_user_by_id(target_id).await?.ok_or_not_found("User")?;
        if actor_id != target_id {
            if self.bans.get_ban_exists(actor_id, target_id).await?
                || self.bans.get_ban_exists(target_id, actor_id).await?
            {
                return Err(AppError::NotFound("User not found".to_string()));
            }
        }

        let entry_relations = vec![
            UsersRepository::with_users(),
            LikesRepository::with_total_likes(),
            CommentsRepository::with_total_comments(),
            LikesRepository::with_liked_by(actor_id),
            UsersRepository::filter_by_user_id(target_id),
            BansRepository::without_banned(actor_id),
            BansRepository::without_banners(actor_id),
        ];
        let count_relations = vec![
            UsersRepository::filter_by_user_id(target_id),
            BansRepository::without_banned(actor_id),
            BansRepository::without_banners(actor_id),
        ];

        self.run_listing(offset, limit, entry_relations, count_relations).await
    }

    /// The actor's home stream: photos of followed users, both ban
    /// directions excluded, paginated like the gallery.
    pub async fn get_stream(
        &self,
        actor_id: i64,
        offset: i64,
        limit: i64,
    ) -> AppResult<PaginatedPhotos> {
        self.users.get_user_by_id(actor_id).await?.ok_or_not_found("User")?;

        let entry_relations = vec![
            UsersRepository::with_users(),
            LikesRepository::with_total_likes(),
            CommentsRepository::with_total_comments(),
            LikesRepository::with_liked_by(actor_id),
            FollowsRepository::filter_by_follower_id(actor_id),
            BansRepository::without_banned(actor_id),
            BansRepository::without_banners(actor_id),
        ];
        let count_relations = vec![
            FollowsRepository::filter_by_follower_id(actor_id),
            BansRepository::without_banned(actor_id),
            BansRepository::without_banners(actor_id),
        ];

        self.run_listing(offset, limit, entry_relations, count_relations).await
    }

    /// Dispatches the page job (tag 0) and the count job (tag 1), drains the
    /// stream and assembles the envelope. Both jobs run to completion even
    /// if one fails; assembly then reports the first collected failure.
    async fn run_listing(
        &self,
        offset: i64,
        limit: i64,
        entry_relations: Vec<Relation>,
        count_relations: Vec<Relation>,
    ) -> AppResult<PaginatedPhotos> {
        let entries_repo = self.photos.clone();
        let count_repo = self.photos.clone();

        let stream = run_all(vec![
            Job::new(async move {
                entries_repo.get_photos(offset, limit, &entry_relations).await.map(JobOutput::Photos)
            }),
            Job::new(async move {
                count_repo.get_photos_count(&count_relations).await.map(JobOutput::Count)
            }),
        ]);

        let works = stream.collect_all().await;
        assemble(offset, limit, works)
    }

    /// Persists an upload: one fan-out writing the database row and the
    /// asset file concurrently. The payload must sniff as JPEG, PNG or WebP.
    pub async fn create_photo(&self, actor_id: i64, payload: Bytes) -> AppResult<Photo> {
        self.users.get_user_by_id(actor_id).await?.ok_or_not_found("User")?;

        let ext = media::detect_extension(&payload)?;
        let file_name = format!("{}.{}", Uuid::new_v4(), ext);
        let url = self.media.url_for(&file_name);

        let photos_repo = self.photos.clone();
        let store = self.media.clone();
        let asset_payload = payload.clone();

        let works = run_all(vec![
            // Save photo resource
            Job::new(async move {
                let photo_id = photos_repo.set_photo(&url, actor_id, Utc::now()).await?;
                let photo =
                    photos_repo.get_photo_by_id(photo_id).await?.ok_or_not_found("Photo")?;
                Ok(JobOutput::Photo(Box::new(photo)))
            }),
            // Save photo asset
            Job::new(async move {
                store.save(&file_name, &asset_payload).await?;
                Ok(JobOutput::Saved)
            }),
        ])
        .collect_all()
        .await;

        let mut new_photo = None;
        for work in works {
            if let JobOutput::Photo(photo) = work.result? {
                new_photo = Some(*photo);
            }
        }
        new_photo.ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("upload fan-out yielded no photo row"))
        })
    }

    pub async fn delete_photo(&self, actor_id: i64, photo_id: i64) -> AppResult<()> {
        self.users.get_user_by_id(actor_id).await?.ok_or_not_found("User")?;
        let photo = self.photos.get_photo_by_id(photo_id).await?.ok_or_not_found("Photo")?;
        if photo.owner.id != actor_id {
            return Err(AppError::Forbidden("You can only delete your own photos".to_string()));
        }

        self.photos.remove_photo(photo_id).await?;
        self.media.remove_by_url(&photo.url).await?;
        Ok(())
    }

    pub async fn get_photo_by_id(&self, photo_id: i64) -> AppResult<Photo> {
        self.photos.get_photo_by_id(photo_id).await?.ok_or_not_found("Photo")
    }
}
