use crate::error::{AppError, AppResult, OptionExt};
use crate::repo::{BansRepository, FollowsRepository, UsersRepository};
use crate::types::BaseUser;

#[derive(Clone)]
pub struct FollowsService {
    users: UsersRepository,
    bans: BansRepository,
    follows: FollowsRepository,
}

impl FollowsService {
    pub fn new(users: UsersRepository, bans: BansRepository, follows: FollowsRepository) -> Self {
        Self { users, bans, follows }
    }

    async fn guard_pair(&self, actor_id: i64, target_id: i64) -> AppResult<()> {
        self.users.get_user_by_id(actor_id).await?.ok_or_not_found("User")?;
        self.users.get_user_by_id(target_id).await?.ok_or_not_found("User")?;
        if self.bans.get_ban_exists(actor_id, target_id).await?
            || self.bans.get_ban_exists(target_id, actor_id).await?
        {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    pub async fn follow_user(&self, follower_id: i64, following_id: i64) -> AppResult<()> {
        if follower_id == following_id {
            return Err(AppError::InvalidInput("You cannot follow yourself".to_string()));
        }
        self.guard_pair(follower_id, following_id).await?;
        self.follows.set_follow(follower_id, following_id).await
    }

    pub async fn unfollow_user(&self, follower_id: i64, following_id: i64) -> AppResult<()> {
        self.guard_pair(follower_id, following_id).await?;
        self.follows.remove_follow(follower_id, following_id).await
    }

    pub async fn get_followers(&self, actor_id: i64, target_id: i64) -> AppResult<Vec<BaseUser>> {
        if actor_id != target_id {
            self.guard_pair(actor_id, target_id).await?;
        } else {
            self.users.get_user_by_id(actor_id).await?.ok_or_not_found("User")?;
        }
        self.users
            .get_users(&[
                FollowsRepository::filter_by_following_id(target_id),
                BansRepository::without_banned(actor_id),
                BansRepository::without_banners(actor_id),
            ])
            .await
    }

    pub async fn get_followings(&self, actor_id: i64, target_id: i64) -> AppResult<Vec<BaseUser>> {
        if actor_id != target_id {
            self.guard_pair(actor_id, target_id).await?;
        } else {
            self.users.get_user_by_id(actor_id).await?.ok_or_not_found("User")?;
        }
        self.users
            .get_users(&[
                FollowsRepository::filter_by_follower_id(target_id),
                BansRepository::without_banned(actor_id),
                BansRepository::without_banners(actor_id),
            ])
            .await
    }
}
