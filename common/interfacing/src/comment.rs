use crate::imports::*;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Comment {
    pub id: String,
    pub article_id: String,
    pub nickname: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct NewComment {
    pub article_id: String,
    pub nickname: String,
    pub content: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct CommentUpdate {
    pub content: String,
}

/// Admin view of a comment together with the parent article title,
/// or a placeholder when the article no longer exists.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct CommentWithArticle {
    #[serde(flatten)]
    pub comment: Comment,
    pub article_title: String,
}

impl CommentWithArticle {
    pub const MISSING_ARTICLE_TITLE: &'static str = "Unknown article";
}
