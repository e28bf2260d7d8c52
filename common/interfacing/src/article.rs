use crate::imports::*;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArticleCategory {
    News,
    #[default]
    Article,
    Report,
}

impl ArticleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::News => "news",
            Self::Article => "article",
            Self::Report => "report",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub category: ArticleCategory,
    pub cover_image: String,
    pub author: String,
    pub views: u64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct NewArticle {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub category: ArticleCategory,
    pub cover_image: String,
    pub author: String,
}

/// Partial edit of the admin-editable fields. `views` and the timestamps are
/// owned by the data layer and cannot be set through an update.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct ArticleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ArticleCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl ArticleUpdate {
    pub fn apply_to(&self, article: &mut Article) {
        if let Some(title) = &self.title {
            article.title = title.clone();
        }
        if let Some(summary) = &self.summary {
            article.summary = summary.clone();
        }
        if let Some(content) = &self.content {
            article.content = content.clone();
        }
        if let Some(category) = self.category {
            article.category = category;
        }
        if let Some(cover_image) = &self.cover_image {
            article.cover_image = cover_image.clone();
        }
        if let Some(author) = &self.author {
            article.author = author.clone();
        }
    }
}

impl From<NewArticle> for Article {
    fn from(value: NewArticle) -> Self {
        let now = crate::timestamp::formatted_now();
        Self {
            id: String::new(),
            title: value.title,
            summary: value.summary,
            content: value.content,
            category: value.category,
            cover_image: value.cover_image,
            author: value.author,
            views: 0,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
