use super::ContentStore;
use crate::conf::HostedConf;
use crate::error::{DataError, DataResult};
use crate::validation;
use anyhow::Context;
use async_trait::async_trait;
use interfacing::{
    timestamp, Article, ArticleCategory, ArticleUpdate, Comment, CommentUpdate,
    CommentWithArticle, NewArticle, NewComment, Statistics,
};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

static ARTICLES: &str = "articles";
static COMMENTS: &str = "comments";

/// Shared plumbing for the hosted table and auth APIs.
///
/// Owns the HTTP client, the project base URL and the API key.
/// [`HostedStore`] and `HostedAuth` hang off one `Arc<HostedClient>`.
pub struct HostedClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl HostedClient {
    pub fn new(conf: &HostedConf) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(conf.timeout())
            .build()
            .context("Failed to build the HTTP client")?;

        Ok(Self {
            http,
            base_url: conf.base_url.trim_end_matches('/').to_owned(),
            api_key: conf.api_key.clone(),
        })
    }

    pub(crate) fn auth_url(&self, op: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, op)
    }

    pub(crate) fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Request with the `apikey` header set; the caller picks the bearer.
    pub(crate) fn request(&self, method: Method, url: String) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", self.api_key.expose_secret())
    }

    /// Table API requests authenticate with the API key itself.
    fn rest(&self, method: Method, table: &str) -> reqwest::RequestBuilder {
        self.request(method, self.rest_url(table))
            .bearer_auth(self.api_key.expose_secret())
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> DataResult<Vec<T>> {
        let response = self
            .rest(Method::GET, table)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn update_row<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        id: &str,
        body: &B,
    ) -> DataResult<T> {
        let rows: Vec<T> = self
            .rest(Method::PATCH, table)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // zero affected rows means the id does not exist
        rows.into_iter().next().ok_or(DataError::EntryNotFound)
    }

    async fn delete_row(&self, table: &str, id: &str) -> DataResult<()> {
        let rows: Vec<serde_json::Value> = self
            .rest(Method::DELETE, table)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if rows.is_empty() {
            return Err(DataError::EntryNotFound);
        }
        Ok(())
    }

    async fn rpc(&self, function: &str, args: serde_json::Value) -> DataResult<()> {
        self.rest(Method::POST, &format!("rpc/{function}"))
            .json(&args)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn count(&self, table: &str) -> DataResult<u64> {
        let response = self
            .rest(Method::GET, table)
            .query(&[("select", "id".to_owned())])
            .header("Prefer", "count=exact")
            .header("Range", "0-0")
            .send()
            .await?
            .error_for_status()?;

        let header = response
            .headers()
            .get("content-range")
            .and_then(|value| value.to_str().ok())
            .with_context(|| format!("count of {table} came back without content-range"))?;

        let total = parse_content_range(header)
            .with_context(|| format!("unparseable content-range `{header}`"))?;
        Ok(total)
    }
}

// `0-0/42` or `*/0`; the number after the slash is the exact count
fn parse_content_range(value: &str) -> Option<u64> {
    let (_, total) = value.split_once('/')?;
    total.parse().ok()
}

pub struct HostedStore {
    client: Arc<HostedClient>,
}

impl HostedStore {
    pub fn new(client: Arc<HostedClient>) -> Self {
        Self { client }
    }

    async fn views_total(&self) -> DataResult<u64> {
        #[derive(Deserialize)]
        struct Views {
            views: u64,
        }

        let rows: Vec<Views> = self
            .client
            .select(ARTICLES, &[("select", "views".to_owned())])
            .await?;
        Ok(rows.iter().map(|row| row.views).sum())
    }
}

#[derive(Serialize)]
struct ArticlePatch<'a> {
    #[serde(flatten)]
    update: &'a ArticleUpdate,
    updated_at: String,
}

#[derive(Serialize)]
struct CommentPatch {
    content: String,
    updated_at: String,
}

#[derive(Deserialize)]
struct CommentRow {
    #[serde(flatten)]
    comment: Comment,
    articles: Option<ArticleTitle>,
}

#[derive(Deserialize)]
struct ArticleTitle {
    title: String,
}

#[async_trait]
impl ContentStore for HostedStore {
    #[tracing::instrument(name = "Find articles", skip(self))]
    async fn list_articles(&self, category: Option<ArticleCategory>) -> DataResult<Vec<Article>> {
        let mut query = vec![
            ("select", "*".to_owned()),
            ("order", "created_at.desc".to_owned()),
        ];
        if let Some(category) = category {
            query.push(("category", format!("eq.{}", category.as_str())));
        }
        self.client.select(ARTICLES, &query).await
    }

    #[tracing::instrument(name = "Find article by id", skip(self))]
    async fn get_article(&self, id: &str) -> DataResult<Option<Article>> {
        let rows: Vec<Article> = self
            .client
            .select(
                ARTICLES,
                &[
                    ("select", "*".to_owned()),
                    ("id", format!("eq.{id}")),
                    ("limit", "1".to_owned()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    #[tracing::instrument(name = "Put article", skip_all)]
    async fn create_article(&self, new: NewArticle) -> DataResult<Article> {
        validation::new_article(&new)?;

        // views and timestamps come from the table defaults
        let rows: Vec<Article> = self
            .client
            .rest(Method::POST, ARTICLES)
            .header("Prefer", "return=representation")
            .json(&new)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        rows.into_iter().next().ok_or_else(|| {
            DataError::Backend(anyhow::anyhow!("insert returned no representation"))
        })
    }

    #[tracing::instrument(name = "Update article", skip(self, update))]
    async fn update_article(&self, id: &str, update: ArticleUpdate) -> DataResult<Article> {
        validation::article_update(&update)?;

        let patch = ArticlePatch {
            update: &update,
            updated_at: timestamp::formatted_now(),
        };
        self.client.update_row(ARTICLES, id, &patch).await
    }

    #[tracing::instrument(name = "Remove article", skip(self))]
    async fn delete_article(&self, id: &str) -> DataResult<()> {
        // comments go with it, the FK on the server cascades
        self.client.delete_row(ARTICLES, id).await
    }

    #[tracing::instrument(name = "Increment article views", skip(self))]
    async fn increment_article_views(&self, id: &str) -> DataResult<()> {
        self.client
            .rpc(
                "increment_article_views",
                serde_json::json!({ "article_id": id }),
            )
            .await
    }

    #[tracing::instrument(name = "Find latest articles", skip(self))]
    async fn latest_articles(&self, limit: usize) -> DataResult<Vec<Article>> {
        self.client
            .select(
                ARTICLES,
                &[
                    ("select", "*".to_owned()),
                    ("order", "created_at.desc".to_owned()),
                    ("limit", limit.to_string()),
                ],
            )
            .await
    }

    #[tracing::instrument(name = "Find popular articles", skip(self))]
    async fn popular_articles(&self, limit: usize) -> DataResult<Vec<Article>> {
        self.client
            .select(
                ARTICLES,
                &[
                    ("select", "*".to_owned()),
                    ("order", "views.desc".to_owned()),
                    ("limit", limit.to_string()),
                ],
            )
            .await
    }

    #[tracing::instrument(name = "Find comments by article", skip(self))]
    async fn comments_for_article(&self, article_id: &str) -> DataResult<Vec<Comment>> {
        self.client
            .select(
                COMMENTS,
                &[
                    ("select", "*".to_owned()),
                    ("article_id", format!("eq.{article_id}")),
                    ("order", "created_at.desc".to_owned()),
                ],
            )
            .await
    }

    #[tracing::instrument(name = "Find all comments", skip_all)]
    async fn all_comments(&self) -> DataResult<Vec<CommentWithArticle>> {
        let rows: Vec<CommentRow> = self
            .client
            .select(
                COMMENTS,
                &[
                    ("select", "*,articles(title)".to_owned()),
                    ("order", "created_at.desc".to_owned()),
                ],
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| CommentWithArticle {
                comment: row.comment,
                article_title: row
                    .articles
                    .map(|a| a.title)
                    .unwrap_or_else(|| CommentWithArticle::MISSING_ARTICLE_TITLE.into()),
            })
            .collect())
    }

    #[tracing::instrument(name = "Put comment", skip_all)]
    async fn add_comment(&self, new: NewComment) -> DataResult<Comment> {
        let new = validation::new_comment(new)?;

        let response = self
            .client
            .rest(Method::POST, COMMENTS)
            .header("Prefer", "return=representation")
            .json(&new)
            .send()
            .await?;

        // FK violation on article_id comes back as 409
        if response.status() == StatusCode::CONFLICT {
            return Err(DataError::EntryNotFound);
        }

        let rows: Vec<Comment> = response.error_for_status()?.json().await?;
        rows.into_iter().next().ok_or_else(|| {
            DataError::Backend(anyhow::anyhow!("insert returned no representation"))
        })
    }

    #[tracing::instrument(name = "Update comment", skip(self, update))]
    async fn update_comment(&self, id: &str, update: CommentUpdate) -> DataResult<Comment> {
        let update = validation::comment_update(update)?;

        let patch = CommentPatch {
            content: update.content,
            updated_at: timestamp::formatted_now(),
        };
        self.client.update_row(COMMENTS, id, &patch).await
    }

    #[tracing::instrument(name = "Remove comment", skip(self))]
    async fn delete_comment(&self, id: &str) -> DataResult<()> {
        self.client.delete_row(COMMENTS, id).await
    }

    #[tracing::instrument(name = "Compute statistics", skip_all)]
    async fn statistics(&self) -> DataResult<Statistics> {
        let (total_articles, total_comments, total_views) = tokio::try_join!(
            self.client.count(ARTICLES),
            self.client.count(COMMENTS),
            self.views_total(),
        )?;

        Ok(Statistics {
            total_articles,
            total_comments,
            total_views,
        })
    }
}
