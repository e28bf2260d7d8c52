pub mod hosted;
pub mod mock;

pub use hosted::{HostedClient, HostedStore};
pub use mock::MockStore;

use crate::error::DataResult;
use async_trait::async_trait;
use interfacing::{
    Article, ArticleCategory, ArticleUpdate, Comment, CommentUpdate, CommentWithArticle,
    NewArticle, NewComment, Statistics,
};

/// How many entries the landing surfaces ask for by default.
pub const DEFAULT_LATEST_LIMIT: usize = 6;
pub const DEFAULT_POPULAR_LIMIT: usize = 5;

/// Everything the site reads and writes goes through this contract.
///
/// Two implementations exist: [`MockStore`] keeps seeded state in memory,
/// [`HostedStore`] talks to the hosted table API. The backend is chosen
/// once at startup; afterwards callers only see `Arc<dyn ContentStore>`.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Newest first. `category` narrows the result when set.
    async fn list_articles(&self, category: Option<ArticleCategory>) -> DataResult<Vec<Article>>;

    /// `Ok(None)` for an unknown id; a missing article is an answer, not an error.
    async fn get_article(&self, id: &str) -> DataResult<Option<Article>>;

    async fn create_article(&self, new: NewArticle) -> DataResult<Article>;

    /// Fails with [`crate::error::DataError::EntryNotFound`] for an unknown id.
    async fn update_article(&self, id: &str, update: ArticleUpdate) -> DataResult<Article>;

    /// Removes the article and every comment attached to it.
    async fn delete_article(&self, id: &str) -> DataResult<()>;

    /// Bumps the view counter by one. Unknown ids are ignored so a stale
    /// detail page cannot take the reader down with it.
    async fn increment_article_views(&self, id: &str) -> DataResult<()>;

    async fn latest_articles(&self, limit: usize) -> DataResult<Vec<Article>>;

    /// Most viewed first.
    async fn popular_articles(&self, limit: usize) -> DataResult<Vec<Article>>;

    /// Newest first.
    async fn comments_for_article(&self, article_id: &str) -> DataResult<Vec<Comment>>;

    /// Every comment on the site joined with its article title, for moderation.
    async fn all_comments(&self) -> DataResult<Vec<CommentWithArticle>>;

    /// The target article must exist.
    async fn add_comment(&self, new: NewComment) -> DataResult<Comment>;

    async fn update_comment(&self, id: &str, update: CommentUpdate) -> DataResult<Comment>;

    async fn delete_comment(&self, id: &str) -> DataResult<()>;

    async fn statistics(&self) -> DataResult<Statistics>;
}
