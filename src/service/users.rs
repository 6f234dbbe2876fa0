use crate::error::{AppError, AppResult, OptionExt};
use crate::repo::{BansRepository, FollowsRepository, PhotosRepository, UsersRepository};
use crate::types::{BaseUser, FullUser};

#[derive(Clone)]
pub struct UsersService {
    users: UsersRepository,
    bans: BansRepository,
}

impl UsersService {
    pub fn new(users: UsersRepository, bans: BansRepository) -> Self {
        Self { users, bans }
    }

    /// Fetches a profile with photo/follower/following totals.
    ///
    /// When the actor has banned the target, only the base identity plus
    /// `banned_for_user = true` is returned. When the target has banned the
    /// actor, the answer is "not found" - indistinguishable from a user that
    /// does not exist.
    pub async fn get_profile(&self, actor_id: i64, target_id: i64) -> AppResult<FullUser> {
        self.users.get_user_by_id(actor_id).await?.ok_or_not_found("User")?;
        let target = self.users.get_user_by_id(target_id).await?.ok_or_not_found("User")?;

        let mut banned_for_user = None;
        if actor_id != target_id {
            if self.bans.get_ban_exists(actor_id, target_id).await? {
                return Ok(FullUser {
                    id: target.id,
                    username: target.username,
                    total_photos: 0,
                    total_followers: 0,
                    total_followings: 0,
                    banned_for_user: Some(true),
                });
            }
            banned_for_user = Some(false);
            if self.bans.get_ban_exists(target_id, actor_id).await? {
                return Err(AppError::NotFound("User not found".to_string()));
            }
        }

        let full = self
            .users
            .get_full_user(&[
                FollowsRepository::with_total_followers(),
                FollowsRepository::with_total_followings(),
                PhotosRepository::with_total_photos(),
                UsersRepository::filter_by_user_id(target_id),
            ])
            .await?
            .ok_or_not_found("User")?;

        Ok(FullUser { banned_for_user, ..full })
    }

    /// Fuzzy username search, hiding users on either side of a ban with the
    /// actor.
    pub async fn search(&self, actor_id: i64, username: &str) -> AppResult<Vec<BaseUser>> {
        self.users
            .get_users(&[
                UsersRepository::filter_by_username(username, false),
                BansRepository::without_banners(actor_id),
                BansRepository::without_banned(actor_id),
            ])
            .await
    }

    pub async fn update_username(&self, actor_id: i64, username: &str) -> AppResult<FullUser> {
        self.users.get_user_by_id(actor_id).await?.ok_or_not_found("User")?;

        if let Some(existing) =
            self.users.get_user(&[UsersRepository::filter_by_username(username, true)]).await?
        {
            if existing.id != actor_id {
                return Err(AppError::Conflict("Username already taken".to_string()));
            }
        }

        self.users.update_username(actor_id, username).await?;
        self.users
            .get_full_user(&[
                FollowsRepository::with_total_followers(),
                FollowsRepository::with_total_followings(),
                PhotosRepository::with_total_photos(),
                UsersRepository::filter_by_user_id(actor_id),
            ])
            .await?
            .ok_or_not_found("User")
    }
}
