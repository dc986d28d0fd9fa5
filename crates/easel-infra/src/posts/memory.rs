//! In-memory post board.

use async_trait::async_trait;
use tokio::sync::RwLock;

use easel_core::domain::{NewPost, Post};
use easel_core::error::RepoError;
use easel_core::ports::PostRepository;

/// Post board held in process memory, ordered by id.
pub struct InMemoryPostRepository {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::with_posts(Vec::new())
    }

    pub fn with_posts(mut posts: Vec<Post>) -> Self {
        posts.sort_by_key(|p| p.id);
        Self {
            posts: RwLock::new(posts),
        }
    }

    /// A board holding the two welcome posts shown on a fresh install.
    pub fn seeded() -> Self {
        let welcome = [
            ("First post", "This is the first post."),
            ("Second post", "This is the second post."),
        ];

        Self::with_posts(
            welcome
                .into_iter()
                .zip(1..)
                .map(|((title, content), id)| {
                    Post::new(
                        id,
                        NewPost {
                            title: title.to_string(),
                            content: content.to_string(),
                        },
                    )
                })
                .collect(),
        )
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, draft: NewPost) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;

        // Posts stay sorted, so the last id is the highest.
        let id = posts.last().map_or(1, |p| p.id + 1);
        let post = Post::new(id, draft);
        posts.push(post.clone());

        tracing::debug!(post_id = id, total = posts.len(), "Created post");
        Ok(post)
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .and_then(|idx| posts.get(idx))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.posts.read().await.clone())
    }

    async fn search(&self, query: &str) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().filter(|p| p.matches(query)).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, content: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_ids_start_at_one() {
        let board = InMemoryPostRepository::new();
        let post = board.create(draft("T", "C")).await.unwrap();
        assert_eq!(post.id, 1);
    }

    #[tokio::test]
    async fn test_next_id_follows_highest() {
        let board = InMemoryPostRepository::with_posts(vec![
            Post::new(7, draft("a", "a")),
            Post::new(3, draft("b", "b")),
        ]);

        let post = board.create(draft("T", "C")).await.unwrap();

        assert_eq!(post.id, 8);
        let ids: Vec<u64> = board.list().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, [3, 7, 8]);
    }

    #[tokio::test]
    async fn test_seeded_board() {
        let board = InMemoryPostRepository::seeded();
        assert_eq!(board.list().await.unwrap().len(), 2);
        assert_eq!(board.create(draft("T", "C")).await.unwrap().id, 3);
        assert_eq!(board.find_by_id(2).await.unwrap().unwrap().title, "Second post");
        assert!(board.find_by_id(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search() {
        let board = InMemoryPostRepository::new();
        board.create(draft("Cat portrait", "pastel")).await.unwrap();
        board.create(draft("Landscape", "oil, with a CAT")).await.unwrap();
        board.create(draft("Logo", "vector")).await.unwrap();

        let hits = board.search("cat").await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(board.search("").await.unwrap().len(), 3);
        assert!(board.search("sculpture").await.unwrap().is_empty());
    }
}
