//! In-memory account registry with unique `userId` and `userName`.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use easel_core::domain::{Account, Registrant};
use easel_core::error::{RepoError, UniqueField};
use easel_core::ports::RegistryRepository;

struct Records<T> {
    /// Insertion order.
    entries: Vec<T>,
    /// `user_id` -> position in `entries`.
    by_id: HashMap<String, usize>,
    /// `user_name` -> position in `entries`.
    by_name: HashMap<String, usize>,
}

impl<T: Registrant> Records<T> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            by_id: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    fn position(&self, user_id: &str) -> Result<usize, RepoError> {
        self.by_id.get(user_id).copied().ok_or(RepoError::NotFound)
    }

    fn conflict_for(&self, record: &T) -> Option<UniqueField> {
        if self.by_id.contains_key(record.user_id()) {
            Some(UniqueField::UserId)
        } else if self.by_name.contains_key(record.user_name()) {
            Some(UniqueField::UserName)
        } else {
            None
        }
    }
}

/// Account registry held in process memory.
///
/// Every insert takes the write lock and checks both unique indexes before
/// appending, so two concurrent registrations of the same id or name can
/// never both succeed. Data is lost on restart.
pub struct InMemoryRegistry<T> {
    records: RwLock<Records<T>>,
}

impl<T: Registrant> InMemoryRegistry<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Records::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Apply `change` to one record's account under the write lock.
    async fn update_account<F>(&self, user_id: &str, change: F) -> Result<T, RepoError>
    where
        F: FnOnce(&mut Account) + Send,
    {
        let mut records = self.records.write().await;
        let pos = records.position(user_id)?;
        let entry = records.entries.get_mut(pos).ok_or(RepoError::NotFound)?;

        change(entry.account_mut());
        Ok(entry.clone())
    }
}

impl<T: Registrant> Default for InMemoryRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Registrant> RegistryRepository<T> for InMemoryRegistry<T> {
    async fn id_exists(&self, user_id: &str) -> Result<bool, RepoError> {
        Ok(self.records.read().await.by_id.contains_key(user_id))
    }

    async fn name_exists(&self, user_name: &str) -> Result<bool, RepoError> {
        Ok(self.records.read().await.by_name.contains_key(user_name))
    }

    async fn insert(&self, record: T) -> Result<T, RepoError> {
        let mut records = self.records.write().await;

        if let Some(field) = records.conflict_for(&record) {
            tracing::debug!(
                collection = T::ROLE.collection(),
                field = %field,
                "Rejected duplicate registration"
            );
            return Err(RepoError::Conflict { field });
        }

        let position = records.entries.len();
        records.by_id.insert(record.user_id().to_string(), position);
        records
            .by_name
            .insert(record.user_name().to_string(), position);
        records.entries.push(record.clone());

        tracing::debug!(
            collection = T::ROLE.collection(),
            user_id = %record.user_id(),
            total = records.entries.len(),
            "Registered account"
        );

        Ok(record)
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<T>, RepoError> {
        let records = self.records.read().await;
        Ok(records
            .by_id
            .get(user_id)
            .and_then(|&pos| records.entries.get(pos))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<T>, RepoError> {
        Ok(self.records.read().await.entries.clone())
    }

    async fn set_profile_image(&self, user_id: &str, image: String) -> Result<T, RepoError> {
        self.update_account(user_id, |account| account.profile_image = Some(image))
            .await
    }

    async fn clear_profile_image(&self, user_id: &str) -> Result<T, RepoError> {
        self.update_account(user_id, |account| account.profile_image = None)
            .await
    }

    async fn rename_id(&self, user_id: &str, new_id: &str) -> Result<T, RepoError> {
        let mut records = self.records.write().await;
        let pos = records.position(user_id)?;

        if new_id != user_id {
            if records.by_id.contains_key(new_id) {
                return Err(RepoError::Conflict {
                    field: UniqueField::UserId,
                });
            }
            records.by_id.remove(user_id);
            records.by_id.insert(new_id.to_string(), pos);
        }

        let entry = records.entries.get_mut(pos).ok_or(RepoError::NotFound)?;
        entry.account_mut().user_id = new_id.to_string();

        tracing::debug!(
            collection = T::ROLE.collection(),
            from = %user_id,
            to = %new_id,
            "Renamed account id"
        );
        Ok(entry.clone())
    }

    async fn rename_name(&self, user_id: &str, new_name: &str) -> Result<T, RepoError> {
        let mut records = self.records.write().await;
        let pos = records.position(user_id)?;
        let old_name = records
            .entries
            .get(pos)
            .map(|entry| entry.user_name().to_string())
            .ok_or(RepoError::NotFound)?;

        if new_name != old_name {
            if records.by_name.contains_key(new_name) {
                return Err(RepoError::Conflict {
                    field: UniqueField::UserName,
                });
            }
            records.by_name.remove(&old_name);
            records.by_name.insert(new_name.to_string(), pos);
        }

        let entry = records.entries.get_mut(pos).ok_or(RepoError::NotFound)?;
        entry.account_mut().user_name = new_name.to_string();
        Ok(entry.clone())
    }

    async fn update_phone(&self, user_id: &str, phone_num: String) -> Result<T, RepoError> {
        self.update_account(user_id, |account| account.phone_num = phone_num)
            .await
    }

    async fn set_password(&self, user_id: &str, password_hash: String) -> Result<T, RepoError> {
        self.update_account(user_id, |account| account.password_hash = password_hash)
            .await
    }
}
