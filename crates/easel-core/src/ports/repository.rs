use async_trait::async_trait;

use crate::domain::{NewPost, Post, Registrant};
use crate::error::RepoError;

/// An account collection whose `user_id` and `user_name` are unique.
///
/// Lookups compare exact strings. Uniqueness holds per collection only:
/// two registries know nothing about each other.
#[async_trait]
pub trait RegistryRepository<T: Registrant>: Send + Sync {
    /// Whether any record already uses `user_id`.
    async fn id_exists(&self, user_id: &str) -> Result<bool, RepoError>;

    /// Whether any record already uses `user_name`.
    async fn name_exists(&self, user_name: &str) -> Result<bool, RepoError>;

    /// Append `record` if neither its id nor its name is taken.
    ///
    /// The check and the append are one atomic step; the id is checked
    /// before the name.
    async fn insert(&self, record: T) -> Result<T, RepoError>;

    /// Find a record by its `user_id`.
    async fn find_by_id(&self, user_id: &str) -> Result<Option<T>, RepoError>;

    /// All records in insertion order.
    async fn list(&self) -> Result<Vec<T>, RepoError>;

    /// Replace the profile image path of an existing record.
    async fn set_profile_image(&self, user_id: &str, image: String) -> Result<T, RepoError>;

    /// Drop the profile image of an existing record.
    async fn clear_profile_image(&self, user_id: &str) -> Result<T, RepoError>;

    /// Move a record to `new_id`.
    ///
    /// Fails with a `UserId` conflict when another record holds `new_id`;
    /// the check and the move are one atomic step.
    async fn rename_id(&self, user_id: &str, new_id: &str) -> Result<T, RepoError>;

    /// Give a record `new_name`, with the same atomic uniqueness check as
    /// [`RegistryRepository::rename_id`].
    async fn rename_name(&self, user_id: &str, new_name: &str) -> Result<T, RepoError>;

    async fn update_phone(&self, user_id: &str, phone_num: String) -> Result<T, RepoError>;

    /// Store an already hashed password.
    async fn set_password(&self, user_id: &str, password_hash: String) -> Result<T, RepoError>;
}

/// The post board.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Append a post under the next free id (highest id plus one).
    async fn create(&self, draft: NewPost) -> Result<Post, RepoError>;

    async fn find_by_id(&self, id: u64) -> Result<Option<Post>, RepoError>;

    /// All posts in id order.
    async fn list(&self) -> Result<Vec<Post>, RepoError>;

    /// Posts whose title or content contains `query`, ignoring case.
    async fn search(&self, query: &str) -> Result<Vec<Post>, RepoError>;
}
