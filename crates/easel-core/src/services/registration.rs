//! Registration, duplicate checks and credential verification for one
//! account collection.

use std::sync::Arc;

use crate::domain::{
    Account, NewAccount, PASSWORD_MAX_CHARS, PASSWORD_MIN_CHARS, Registrant,
    password_is_well_formed,
};
use crate::error::{DomainError, RepoError};
use crate::ports::{AuthError, PasswordService, RegistryRepository};

/// Account workflow over a single registry.
///
/// Duplicate checks are advisory: the authoritative uniqueness check is
/// the one [`RegistryRepository::insert`] performs while appending.
pub struct RegistrationService<T: Registrant> {
    registry: Arc<dyn RegistryRepository<T>>,
    passwords: Arc<dyn PasswordService>,
}

impl<T: Registrant> RegistrationService<T> {
    pub fn new(
        registry: Arc<dyn RegistryRepository<T>>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            registry,
            passwords,
        }
    }

    pub async fn is_id_taken(&self, user_id: &str) -> Result<bool, DomainError> {
        Ok(self.registry.id_exists(user_id).await?)
    }

    pub async fn is_name_taken(&self, user_name: &str) -> Result<bool, DomainError> {
        Ok(self.registry.name_exists(user_name).await?)
    }

    /// Validate `form`, hash its password and insert the record built by
    /// `into_record`.
    pub async fn register<F>(&self, form: NewAccount, into_record: F) -> Result<T, DomainError>
    where
        F: FnOnce(Account) -> T,
    {
        form.validate()?;

        let password_hash = self
            .passwords
            .hash(&form.password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let record = into_record(Account::new(form, password_hash));
        Ok(self.registry.insert(record).await?)
    }

    /// Look up `user_id` and verify `password` against its stored hash.
    ///
    /// An unknown id and a wrong password both yield
    /// [`DomainError::Unauthorized`], after the same amount of hashing work.
    pub async fn authenticate(&self, user_id: &str, password: &str) -> Result<T, DomainError> {
        let Some(record) = self.registry.find_by_id(user_id).await? else {
            // Burn one hash so a miss costs what a wrong password costs.
            let _ = self.passwords.hash(password);
            return Err(DomainError::Unauthorized);
        };

        let valid = self
            .passwords
            .verify(password, &record.account().password_hash)
            .map_err(|e| match e {
                AuthError::HashingError(msg) => DomainError::Internal(msg),
                _ => DomainError::Unauthorized,
            })?;

        if valid {
            Ok(record)
        } else {
            Err(DomainError::Unauthorized)
        }
    }

    /// Find an account or fail with [`DomainError::NotFound`].
    pub async fn profile(&self, user_id: &str) -> Result<T, DomainError> {
        self.registry
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| Self::missing(user_id))
    }

    /// Change the display name, keeping names unique within the collection.
    pub async fn change_name(&self, user_id: &str, new_name: &str) -> Result<T, DomainError> {
        require("userName", new_name)?;
        let result = self.registry.rename_name(user_id, new_name).await;
        Self::found(user_id, result)
    }

    /// Move the account to `new_id`, keeping ids unique within the collection.
    pub async fn change_id(&self, user_id: &str, new_id: &str) -> Result<T, DomainError> {
        require("userId", new_id)?;
        let result = self.registry.rename_id(user_id, new_id).await;
        Self::found(user_id, result)
    }

    pub async fn change_phone(&self, user_id: &str, phone_num: String) -> Result<T, DomainError> {
        require("phoneNum", &phone_num)?;
        let result = self.registry.update_phone(user_id, phone_num).await;
        Self::found(user_id, result)
    }

    /// Replace the password, applying the registration password rule.
    pub async fn change_password(&self, user_id: &str, password: &str) -> Result<T, DomainError> {
        if !password_is_well_formed(password) {
            return Err(DomainError::Validation(vec![format!(
                "password must be {PASSWORD_MIN_CHARS}-{PASSWORD_MAX_CHARS} characters and contain a digit"
            )]));
        }

        let password_hash = self
            .passwords
            .hash(password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let result = self.registry.set_password(user_id, password_hash).await;
        Self::found(user_id, result)
    }

    pub async fn clear_profile_image(&self, user_id: &str) -> Result<T, DomainError> {
        let result = self.registry.clear_profile_image(user_id).await;
        Self::found(user_id, result)
    }

    fn missing(user_id: &str) -> DomainError {
        DomainError::NotFound {
            entity_type: T::ROLE.as_str(),
            id: user_id.to_string(),
        }
    }

    /// Name the missing account instead of the repository's anonymous miss.
    fn found(user_id: &str, result: Result<T, RepoError>) -> Result<T, DomainError> {
        match result {
            Err(RepoError::NotFound) => Err(Self::missing(user_id)),
            other => Ok(other?),
        }
    }
}

fn require(label: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        Err(DomainError::Validation(vec![format!("{label} is required")]))
    } else {
        Ok(())
    }
}

impl<T: Registrant> Clone for RegistrationService<T> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            passwords: self.passwords.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Author, RegularUser};
    use crate::error::{RepoError, UniqueField};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Plain-text "hashing" keeps these tests independent of any crypto crate.
    /// Counts every hash or verify call.
    #[derive(Default)]
    struct PlainPasswords {
        work: AtomicUsize,
    }

    impl PasswordService for PlainPasswords {
        fn hash(&self, password: &str) -> Result<String, AuthError> {
            self.work.fetch_add(1, Ordering::SeqCst);
            Ok(format!("plain:{password}"))
        }

        fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
            self.work.fetch_add(1, Ordering::SeqCst);
            Ok(hash == format!("plain:{password}"))
        }
    }

    struct VecRegistry<T>(Mutex<Vec<T>>);

    impl<T: Registrant> VecRegistry<T> {
        fn update(&self, user_id: &str, change: impl FnOnce(&mut T)) -> Result<T, RepoError> {
            let mut records = self.0.lock().unwrap();
            let record = records
                .iter_mut()
                .find(|r| r.user_id() == user_id)
                .ok_or(RepoError::NotFound)?;
            change(record);
            Ok(record.clone())
        }

        fn taken(&self, user_id: &str, clash: impl Fn(&T) -> bool) -> bool {
            self.0
                .lock()
                .unwrap()
                .iter()
                .any(|r| r.user_id() != user_id && clash(r))
        }
    }

    #[async_trait]
    impl<T: Registrant> RegistryRepository<T> for VecRegistry<T> {
        async fn id_exists(&self, user_id: &str) -> Result<bool, RepoError> {
            Ok(self.0.lock().unwrap().iter().any(|r| r.user_id() == user_id))
        }

        async fn name_exists(&self, user_name: &str) -> Result<bool, RepoError> {
            Ok(self.0.lock().unwrap().iter().any(|r| r.user_name() == user_name))
        }

        async fn insert(&self, record: T) -> Result<T, RepoError> {
            let mut records = self.0.lock().unwrap();
            if records.iter().any(|r| r.user_id() == record.user_id()) {
                return Err(RepoError::Conflict {
                    field: UniqueField::UserId,
                });
            }
            if records.iter().any(|r| r.user_name() == record.user_name()) {
                return Err(RepoError::Conflict {
                    field: UniqueField::UserName,
                });
            }
            records.push(record.clone());
            Ok(record)
        }

        async fn find_by_id(&self, user_id: &str) -> Result<Option<T>, RepoError> {
            Ok(self
                .0
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.user_id() == user_id)
                .cloned())
        }

        async fn list(&self) -> Result<Vec<T>, RepoError> {
            Ok(self.0.lock().unwrap().clone())
        }

        async fn set_profile_image(&self, user_id: &str, image: String) -> Result<T, RepoError> {
            self.update(user_id, |r| r.account_mut().profile_image = Some(image))
        }

        async fn clear_profile_image(&self, user_id: &str) -> Result<T, RepoError> {
            self.update(user_id, |r| r.account_mut().profile_image = None)
        }

        async fn rename_id(&self, user_id: &str, new_id: &str) -> Result<T, RepoError> {
            if self.taken(user_id, |r| r.user_id() == new_id) {
                return Err(RepoError::Conflict {
                    field: UniqueField::UserId,
                });
            }
            self.update(user_id, |r| r.account_mut().user_id = new_id.to_string())
        }

        async fn rename_name(&self, user_id: &str, new_name: &str) -> Result<T, RepoError> {
            if self.taken(user_id, |r| r.user_name() == new_name) {
                return Err(RepoError::Conflict {
                    field: UniqueField::UserName,
                });
            }
            self.update(user_id, |r| r.account_mut().user_name = new_name.to_string())
        }

        async fn update_phone(&self, user_id: &str, phone_num: String) -> Result<T, RepoError> {
            self.update(user_id, |r| r.account_mut().phone_num = phone_num)
        }

        async fn set_password(&self, user_id: &str, password_hash: String) -> Result<T, RepoError> {
            self.update(user_id, |r| r.account_mut().password_hash = password_hash)
        }
    }

    fn service_with<T: Registrant>(passwords: Arc<PlainPasswords>) -> RegistrationService<T> {
        RegistrationService::new(Arc::new(VecRegistry(Mutex::new(Vec::new()))), passwords)
    }

    fn service<T: Registrant>() -> RegistrationService<T> {
        service_with(Arc::new(PlainPasswords::default()))
    }

    fn form(id: &str, name: &str) -> NewAccount {
        NewAccount {
            user_name: name.to_string(),
            user_id: id.to_string(),
            password: "secret1".to_string(),
            phone_num: "010-0000-0000".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let users = service::<RegularUser>();

        let saved = users
            .register(form("kim", "Kim"), RegularUser::new)
            .await
            .unwrap();

        assert_eq!(saved.account.password_hash, "plain:secret1");
        assert!(users.is_id_taken("kim").await.unwrap());
        assert!(users.is_name_taken("Kim").await.unwrap());
        assert!(!users.is_name_taken("kim").await.unwrap());
    }

    #[tokio::test]
    async fn test_second_registration_with_same_id_conflicts() {
        let users = service::<RegularUser>();
        users
            .register(form("kim", "Kim"), RegularUser::new)
            .await
            .unwrap();

        let err = users
            .register(form("kim", "Someone Else"), RegularUser::new)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Conflict(msg) if msg == "User ID already exists"));
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_registry() {
        let users = service::<RegularUser>();
        let mut bad = form("kim", "Kim");
        bad.password = "short".to_string();

        let err = users.register(bad, RegularUser::new).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert!(!users.is_id_taken("kim").await.unwrap());
    }

    #[tokio::test]
    async fn test_authenticate() {
        let authors = service::<Author>();
        authors
            .register(form("lee", "Lee"), |a| Author::new(a, "Ink".to_string()))
            .await
            .unwrap();

        let author = authors.authenticate("lee", "secret1").await.unwrap();
        assert_eq!(author.author_bio, "Ink");

        assert!(matches!(
            authors.authenticate("lee", "wrong").await,
            Err(DomainError::Unauthorized)
        ));
        assert!(matches!(
            authors.authenticate("ghost", "secret1").await,
            Err(DomainError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_profile_not_found() {
        let users = service::<RegularUser>();
        let err = users.profile("ghost").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { id, .. } if id == "ghost"));
    }

    #[tokio::test]
    async fn test_unknown_id_costs_a_hash() {
        let passwords = Arc::new(PlainPasswords::default());
        let users = service_with::<RegularUser>(passwords.clone());
        users
            .register(form("kim", "Kim"), RegularUser::new)
            .await
            .unwrap();

        let before = passwords.work.load(Ordering::SeqCst);
        let _ = users.authenticate("kim", "wrong1").await;
        let known = passwords.work.load(Ordering::SeqCst) - before;

        let before = passwords.work.load(Ordering::SeqCst);
        let _ = users.authenticate("ghost", "wrong1").await;
        let unknown = passwords.work.load(Ordering::SeqCst) - before;

        assert_eq!(known, 1);
        assert_eq!(unknown, known);
    }

    #[tokio::test]
    async fn test_profile_edits() {
        let users = service::<RegularUser>();
        users
            .register(form("kim", "Kim"), RegularUser::new)
            .await
            .unwrap();
        users
            .register(form("park", "Park"), RegularUser::new)
            .await
            .unwrap();

        let err = users.change_name("kim", "Park").await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(msg) if msg == "User name already exists"));

        let err = users.change_id("kim", "park").await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(msg) if msg == "User ID already exists"));

        assert!(matches!(
            users.change_name("kim", "  ").await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            users.change_password("kim", "nodigit").await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            users.change_phone("ghost", "010".to_string()).await,
            Err(DomainError::NotFound { id, .. }) if id == "ghost"
        ));

        users.change_password("kim", "fresh9").await.unwrap();
        assert!(users.authenticate("kim", "fresh9").await.is_ok());

        let moved = users.change_id("kim", "kim2").await.unwrap();
        assert_eq!(moved.user_id(), "kim2");
        assert!(!users.is_id_taken("kim").await.unwrap());
    }
}
