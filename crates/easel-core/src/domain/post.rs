use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Post entity - an entry on the commission board.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a post with an id allocated by the board.
    pub fn new(id: u64, draft: NewPost) -> Self {
        Self {
            id,
            title: draft.title,
            content: draft.content,
            created_at: Utc::now(),
        }
    }

    /// Case-insensitive substring match on title or content.
    /// An empty (or blank) query matches every post.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&needle) || self.content.to_lowercase().contains(&needle)
    }
}

/// A post submitted by a client, before an id is assigned.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

impl NewPost {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut problems = Vec::new();
        if self.title.trim().is_empty() {
            problems.push("title is required".to_string());
        }
        if self.content.trim().is_empty() {
            problems.push("content is required".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(problems))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, content: &str) -> Post {
        Post::new(
            1,
            NewPost {
                title: title.to_string(),
                content: content.to_string(),
            },
        )
    }

    #[test]
    fn test_matches_ignores_case() {
        let p = post("Portrait Commission", "Oil on canvas");
        assert!(p.matches("portrait"));
        assert!(p.matches("CANVAS"));
        assert!(!p.matches("sculpture"));
    }

    #[test]
    fn test_blank_query_matches_everything() {
        assert!(post("a", "b").matches(""));
        assert!(post("a", "b").matches("   "));
    }

    #[test]
    fn test_new_post_requires_fields() {
        let draft = NewPost {
            title: String::new(),
            content: "body".to_string(),
        };
        assert!(matches!(draft.validate(), Err(DomainError::Validation(p)) if p.len() == 1));
    }
}
