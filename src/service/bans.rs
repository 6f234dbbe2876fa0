use crate::error::{AppResult, OptionExt};
use crate::repo::{BansRepository, FollowsRepository, UsersRepository};

#[derive(Clone)]
pub struct BansService {
    users: UsersRepository,
    bans: BansRepository,
    follows: FollowsRepository,
}

impl BansService {
    pub fn new(users: UsersRepository, bans: BansRepository, follows: FollowsRepository) -> Self {
        Self { users, bans, follows }
    }

    /// Bans a user and severs the follow relationship in both directions.
    pub async fn ban_user(&self, actor_id: i64, banned_id: i64) -> AppResult<()> {
        self.users.get_user_by_id(actor_id).await?.ok_or_not_found("User")?;
        self.users.get_user_by_id(banned_id).await?.ok_or_not_found("User")?;

        self.bans.set_ban(actor_id, banned_id).await?;
        self.follows.remove_follow(actor_id, banned_id).await?;
        self.follows.remove_follow(banned_id, actor_id).await?;
        Ok(())
    }

    pub async fn unban_user(&self, actor_id: i64, banned_id: i64) -> AppResult<()> {
        self.users.get_user_by_id(actor_id).await?.ok_or_not_found("User")?;
        self.users.get_user_by_id(banned_id).await?.ok_or_not_found("User")?;
        self.bans.remove_ban(actor_id, banned_id).await
    }

    pub async fn is_banned_for_user(&self, actor_id: i64, target_id: i64) -> AppResult<bool> {
        self.users.get_user_by_id(actor_id).await?.ok_or_not_found("User")?;
        self.users.get_user_by_id(target_id).await?.ok_or_not_found("User")?;
        self.bans.get_ban_exists(actor_id, target_id).await
    }
}
