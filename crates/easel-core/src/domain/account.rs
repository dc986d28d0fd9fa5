use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Which registry an account belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Author,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Author => "author",
        }
    }

    /// Name of the collection holding accounts of this role.
    pub fn collection(&self) -> &'static str {
        match self {
            Role::User => "users",
            Role::Author => "authors",
        }
    }
}

/// Fields shared by every kind of account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub user_name: String,
    pub user_id: String,
    pub password_hash: String,
    pub phone_num: String,
    pub profile_image: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Build an account from an already validated form and a password hash.
    pub fn new(form: NewAccount, password_hash: String) -> Self {
        Self {
            user_name: form.user_name,
            user_id: form.user_id,
            password_hash,
            phone_num: form.phone_num,
            profile_image: None,
            description: None,
            created_at: Utc::now(),
        }
    }
}

/// A record stored in a uniqueness-checked registry.
///
/// `user_id` and `user_name` are each unique within one registry and
/// compared as exact strings.
pub trait Registrant: Clone + Send + Sync + 'static {
    const ROLE: Role;

    fn account(&self) -> &Account;

    fn account_mut(&mut self) -> &mut Account;

    fn user_id(&self) -> &str {
        &self.account().user_id
    }

    fn user_name(&self) -> &str {
        &self.account().user_name
    }

    fn author_bio(&self) -> Option<&str> {
        None
    }
}

/// A regular (commissioning) member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegularUser {
    pub account: Account,
}

impl RegularUser {
    pub fn new(account: Account) -> Self {
        Self { account }
    }
}

impl Registrant for RegularUser {
    const ROLE: Role = Role::User;

    fn account(&self) -> &Account {
        &self.account
    }

    fn account_mut(&mut self) -> &mut Account {
        &mut self.account
    }
}

/// An artist accepting commissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub account: Account,
    pub author_bio: String,
}

impl Author {
    pub fn new(account: Account, author_bio: String) -> Self {
        Self {
            account,
            author_bio,
        }
    }
}

impl Registrant for Author {
    const ROLE: Role = Role::Author;

    fn account(&self) -> &Account {
        &self.account
    }

    fn account_mut(&mut self) -> &mut Account {
        &mut self.account
    }

    fn author_bio(&self) -> Option<&str> {
        Some(&self.author_bio)
    }
}

/// Password bounds enforced at registration.
pub const PASSWORD_MIN_CHARS: usize = 4;
pub const PASSWORD_MAX_CHARS: usize = 12;

/// Registration form before validation and hashing.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub user_name: String,
    pub user_id: String,
    pub password: String,
    pub phone_num: String,
}

impl NewAccount {
    /// Check required fields and the password format, reporting every problem.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut problems = Vec::new();

        for (label, value) in [
            ("userName", &self.user_name),
            ("userId", &self.user_id),
            ("userPwd", &self.password),
            ("phoneNum", &self.phone_num),
        ] {
            if value.trim().is_empty() {
                problems.push(format!("{label} is required"));
            }
        }

        if !self.password.is_empty() && !password_is_well_formed(&self.password) {
            problems.push(format!(
                "userPwd must be {PASSWORD_MIN_CHARS}-{PASSWORD_MAX_CHARS} characters and contain a digit"
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(problems))
        }
    }
}

/// 4 to 12 characters, no line breaks, at least one ASCII digit.
pub fn password_is_well_formed(password: &str) -> bool {
    let len = password.chars().count();
    (PASSWORD_MIN_CHARS..=PASSWORD_MAX_CHARS).contains(&len)
        && !password.contains(['\n', '\r'])
        && password.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(password: &str) -> NewAccount {
        NewAccount {
            user_name: "painter".to_string(),
            user_id: "painter01".to_string(),
            password: password.to_string(),
            phone_num: "010-1234-5678".to_string(),
        }
    }

    #[test]
    fn test_password_rule() {
        assert!(password_is_well_formed("abc1"));
        assert!(password_is_well_formed("123456789012"));
        assert!(!password_is_well_formed("ab1"));
        assert!(!password_is_well_formed("abcdefghijk12"));
        assert!(!password_is_well_formed("abcdef"));
        assert!(!password_is_well_formed("ab\n12"));
    }

    #[test]
    fn test_validate_accepts_complete_form() {
        assert!(form("pass1234").validate().is_ok());
    }

    #[test]
    fn test_validate_lists_every_problem() {
        let mut f = form("nodigits");
        f.user_name = "  ".to_string();
        f.phone_num = String::new();

        match f.validate() {
            Err(DomainError::Validation(problems)) => {
                assert_eq!(problems.len(), 3);
                assert!(problems[0].starts_with("userName"));
                assert!(problems[1].starts_with("phoneNum"));
                assert!(problems[2].starts_with("userPwd must"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_author_exposes_bio() {
        let account = Account::new(form("pass1234"), "hash".to_string());
        let author = Author::new(account.clone(), "Watercolors".to_string());
        let user = RegularUser::new(account);

        assert_eq!(author.author_bio(), Some("Watercolors"));
        assert_eq!(user.author_bio(), None);
        assert_eq!(author.user_id(), user.user_id());
        assert_eq!(Author::ROLE.collection(), "authors");
    }
}
