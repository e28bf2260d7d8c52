use super::ContentStore;
use crate::conf::MockConf;
use crate::error::{DataError, DataResult};
use crate::validation;
use async_trait::async_trait;
use interfacing::{
    timestamp, Article, ArticleCategory, ArticleUpdate, Comment, CommentUpdate,
    CommentWithArticle, NewArticle, NewComment, Statistics,
};
use std::time::Duration;
use tokio::sync::RwLock;

/// Seeded in-memory backend.
///
/// State sits behind one `RwLock`, ids are handed out sequentially and keep
/// growing after deletes, and every operation sleeps for the configured
/// latency first so callers see realistic round trips.
pub struct MockStore {
    state: RwLock<State>,
    latency: Duration,
}

struct State {
    articles: Vec<Article>,
    comments: Vec<Comment>,
    next_article_id: u64,
    next_comment_id: u64,
}

impl State {
    fn empty() -> Self {
        Self {
            articles: vec![],
            comments: vec![],
            next_article_id: 1,
            next_comment_id: 1,
        }
    }

    fn take_article_id(&mut self) -> String {
        let id = self.next_article_id.to_string();
        self.next_article_id += 1;
        id
    }

    fn take_comment_id(&mut self) -> String {
        let id = self.next_comment_id.to_string();
        self.next_comment_id += 1;
        id
    }
}

impl MockStore {
    pub fn new(conf: &MockConf) -> Self {
        Self {
            state: RwLock::new(seed()),
            latency: conf.latency(),
        }
    }

    /// Empty variant, mostly useful in tests.
    pub fn unseeded(conf: &MockConf) -> Self {
        Self {
            state: RwLock::new(State::empty()),
            latency: conf.latency(),
        }
    }

    async fn round_trip(&self) {
        tokio::time::sleep(self.latency).await;
    }
}

// timestamps are fixed width RFC 3339, so string order is time order
fn sort_newest_first(articles: &mut [Article]) {
    articles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[async_trait]
impl ContentStore for MockStore {
    #[tracing::instrument(name = "Find articles", skip(self))]
    async fn list_articles(&self, category: Option<ArticleCategory>) -> DataResult<Vec<Article>> {
        self.round_trip().await;
        let state = self.state.read().await;
        let mut articles: Vec<_> = state
            .articles
            .iter()
            .filter(|a| category.map_or(true, |c| a.category == c))
            .cloned()
            .collect();
        sort_newest_first(&mut articles);
        Ok(articles)
    }

    #[tracing::instrument(name = "Find article by id", skip(self))]
    async fn get_article(&self, id: &str) -> DataResult<Option<Article>> {
        self.round_trip().await;
        let state = self.state.read().await;
        Ok(state.articles.iter().find(|a| a.id == id).cloned())
    }

    #[tracing::instrument(name = "Put article", skip_all)]
    async fn create_article(&self, new: NewArticle) -> DataResult<Article> {
        self.round_trip().await;
        validation::new_article(&new)?;

        let mut state = self.state.write().await;
        let mut article = Article::from(new);
        article.id = state.take_article_id();
        state.articles.push(article.clone());
        Ok(article)
    }

    #[tracing::instrument(name = "Update article", skip(self, update))]
    async fn update_article(&self, id: &str, update: ArticleUpdate) -> DataResult<Article> {
        self.round_trip().await;
        validation::article_update(&update)?;

        let mut state = self.state.write().await;
        let article = state
            .articles
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(DataError::EntryNotFound)?;
        update.apply_to(article);
        article.updated_at = timestamp::formatted_now();
        Ok(article.clone())
    }

    #[tracing::instrument(name = "Remove article", skip(self))]
    async fn delete_article(&self, id: &str) -> DataResult<()> {
        self.round_trip().await;
        let mut state = self.state.write().await;
        let before = state.articles.len();
        state.articles.retain(|a| a.id != id);
        if state.articles.len() == before {
            return Err(DataError::EntryNotFound);
        }
        // comments do not outlive their article
        state.comments.retain(|c| c.article_id != id);
        Ok(())
    }

    #[tracing::instrument(name = "Increment article views", skip(self))]
    async fn increment_article_views(&self, id: &str) -> DataResult<()> {
        self.round_trip().await;
        let mut state = self.state.write().await;
        match state.articles.iter_mut().find(|a| a.id == id) {
            Some(article) => article.views += 1,
            None => tracing::debug!("view bump for unknown article {id}, ignoring"),
        }
        Ok(())
    }

    #[tracing::instrument(name = "Find latest articles", skip(self))]
    async fn latest_articles(&self, limit: usize) -> DataResult<Vec<Article>> {
        let mut articles = self.list_articles(None).await?;
        articles.truncate(limit);
        Ok(articles)
    }

    #[tracing::instrument(name = "Find popular articles", skip(self))]
    async fn popular_articles(&self, limit: usize) -> DataResult<Vec<Article>> {
        self.round_trip().await;
        let state = self.state.read().await;
        let mut articles = state.articles.clone();
        articles.sort_by(|a, b| b.views.cmp(&a.views));
        articles.truncate(limit);
        Ok(articles)
    }

    #[tracing::instrument(name = "Find comments by article", skip(self))]
    async fn comments_for_article(&self, article_id: &str) -> DataResult<Vec<Comment>> {
        self.round_trip().await;
        let state = self.state.read().await;
        let mut comments: Vec<_> = state
            .comments
            .iter()
            .filter(|c| c.article_id == article_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }

    #[tracing::instrument(name = "Find all comments", skip_all)]
    async fn all_comments(&self) -> DataResult<Vec<CommentWithArticle>> {
        self.round_trip().await;
        let state = self.state.read().await;
        let mut comments = state.comments.clone();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let with_titles = comments
            .into_iter()
            .map(|comment| {
                let article_title = state
                    .articles
                    .iter()
                    .find(|a| a.id == comment.article_id)
                    .map(|a| a.title.clone())
                    .unwrap_or_else(|| CommentWithArticle::MISSING_ARTICLE_TITLE.into());
                CommentWithArticle {
                    comment,
                    article_title,
                }
            })
            .collect();
        Ok(with_titles)
    }

    #[tracing::instrument(name = "Put comment", skip_all)]
    async fn add_comment(&self, new: NewComment) -> DataResult<Comment> {
        self.round_trip().await;
        let new = validation::new_comment(new)?;

        let mut state = self.state.write().await;
        if !state.articles.iter().any(|a| a.id == new.article_id) {
            return Err(DataError::EntryNotFound);
        }

        let now = timestamp::formatted_now();
        let comment = Comment {
            id: state.take_comment_id(),
            article_id: new.article_id,
            nickname: new.nickname,
            content: new.content,
            created_at: now.clone(),
            updated_at: now,
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    #[tracing::instrument(name = "Update comment", skip(self, update))]
    async fn update_comment(&self, id: &str, update: CommentUpdate) -> DataResult<Comment> {
        self.round_trip().await;
        let update = validation::comment_update(update)?;

        let mut state = self.state.write().await;
        let comment = state
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(DataError::EntryNotFound)?;
        comment.content = update.content;
        comment.updated_at = timestamp::formatted_now();
        Ok(comment.clone())
    }

    #[tracing::instrument(name = "Remove comment", skip(self))]
    async fn delete_comment(&self, id: &str) -> DataResult<()> {
        self.round_trip().await;
        let mut state = self.state.write().await;
        let before = state.comments.len();
        state.comments.retain(|c| c.id != id);
        if state.comments.len() == before {
            return Err(DataError::EntryNotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Compute statistics", skip_all)]
    async fn statistics(&self) -> DataResult<Statistics> {
        self.round_trip().await;
        let state = self.state.read().await;
        Ok(Statistics {
            total_articles: state.articles.len() as u64,
            total_comments: state.comments.len() as u64,
            total_views: state.articles.iter().map(|a| a.views).sum(),
        })
    }
}

fn seed() -> State {
    let articles = vec![
        Article {
            id: "1".into(),
            title: "Advances in Lithium Battery Technology".into(),
            summary: "Cell makers keep squeezing more energy out of the same \
                      footprint. A look at the chemistry behind the latest gains."
                .into(),
            content: "## Higher density, lower cost\n\n\
                      Pack-level energy density has climbed every year for a \
                      decade, and the current crop of cells pushes past \
                      300 Wh/kg without exotic materials.\n\n\
                      ## What changed\n\n\
                      Silicon-rich anodes and dry electrode coating finally \
                      left the pilot line. Both cut cost per kWh while \
                      raising cycle life.\n\n\
                      ## What to watch\n\n\
                      Charging curves, not headline capacity. The gains that \
                      matter show up between 10 and 80 percent."
                .into(),
            category: ArticleCategory::Article,
            cover_image: "https://images.example.com/lithium-cells.jpg".into(),
            author: "Research Desk".into(),
            views: 1234,
            created_at: "2026-01-20T08:00:00Z".into(),
            updated_at: "2026-01-20T08:00:00Z".into(),
        },
        Article {
            id: "2".into(),
            title: "Solid-State Batteries Near Mass Production".into(),
            summary: "Two major manufacturers announced pilot lines moving to \
                      series production next year."
                .into(),
            content: "## From lab to line\n\n\
                      After years of prototypes, sulfide electrolytes are \
                      stable enough for automated stacking. Yield numbers \
                      from the pilot lines are no longer embarrassing.\n\n\
                      ## Who ships first\n\n\
                      Premium vehicles get the first packs. Grid storage \
                      follows once cost per cycle beats LFP."
                .into(),
            category: ArticleCategory::News,
            cover_image: "https://images.example.com/solid-state.jpg".into(),
            author: "News Desk".into(),
            views: 892,
            created_at: "2026-01-19T09:30:00Z".into(),
            updated_at: "2026-01-19T09:30:00Z".into(),
        },
        Article {
            id: "3".into(),
            title: "2026 Battery Industry Outlook".into(),
            summary: "Capacity, demand and pricing forecasts for the year \
                      ahead, drawn from supplier interviews."
                .into(),
            content: "## Supply\n\n\
                      Announced gigafactory capacity outruns demand through \
                      2027. Expect consolidation among smaller cell makers.\n\n\
                      ## Demand\n\n\
                      Stationary storage is the growth story. Vehicle demand \
                      grows too, but slower than the 2024 peak suggested.\n\n\
                      ## Prices\n\n\
                      Cell prices keep drifting down. Raw material contracts \
                      signed at the 2022 peak roll off this year."
                .into(),
            category: ArticleCategory::Report,
            cover_image: "https://images.example.com/outlook-2026.jpg".into(),
            author: "Research Desk".into(),
            views: 1567,
            created_at: "2026-01-18T10:15:00Z".into(),
            updated_at: "2026-01-18T10:15:00Z".into(),
        },
    ];

    let comments = vec![
        Comment {
            id: "1".into(),
            article_id: "1".into(),
            nickname: "BatteryFan".into(),
            content: "Clear overview, exactly the comparison I was looking for.".into(),
            created_at: "2026-01-20T10:00:00Z".into(),
            updated_at: "2026-01-20T10:00:00Z".into(),
        },
        Comment {
            id: "2".into(),
            article_id: "1".into(),
            nickname: "EVDriver".into(),
            content: "Curious how these numbers hold up in winter conditions.".into(),
            created_at: "2026-01-20T11:30:00Z".into(),
            updated_at: "2026-01-20T11:30:00Z".into(),
        },
    ];

    State {
        articles,
        comments,
        next_article_id: 4,
        next_comment_id: 3,
    }
}
