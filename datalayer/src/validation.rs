//! Field rules shared by both backends.
//!
//! Callers used to be trusted to pre-check their forms. Now every write
//! path funnels through here, so a misbehaving caller gets a
//! [`ValidationError`] instead of silently persisting junk.

use interfacing::{ArticleUpdate, CommentUpdate, NewArticle, NewComment};

pub const TITLE_MAX: usize = 200;
pub const SUMMARY_MAX: usize = 500;
pub const AUTHOR_MAX: usize = 100;
pub const NICKNAME_MAX: usize = 64;
pub const COMMENT_MAX: usize = 2000;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must not be blank")]
    Blank(&'static str),

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("cover_image must be an http or https URL")]
    CoverImageUrl,
}

fn not_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank(field));
    }
    Ok(())
}

fn max_chars(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

fn cover_image(value: &str) -> Result<(), ValidationError> {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::CoverImageUrl),
    }
}

pub fn new_article(new: &NewArticle) -> Result<(), ValidationError> {
    not_blank("title", &new.title)?;
    max_chars("title", &new.title, TITLE_MAX)?;
    not_blank("summary", &new.summary)?;
    max_chars("summary", &new.summary, SUMMARY_MAX)?;
    not_blank("content", &new.content)?;
    not_blank("author", &new.author)?;
    max_chars("author", &new.author, AUTHOR_MAX)?;
    not_blank("cover_image", &new.cover_image)?;
    cover_image(&new.cover_image)?;
    Ok(())
}

pub fn article_update(update: &ArticleUpdate) -> Result<(), ValidationError> {
    if let Some(title) = &update.title {
        not_blank("title", title)?;
        max_chars("title", title, TITLE_MAX)?;
    }
    if let Some(summary) = &update.summary {
        not_blank("summary", summary)?;
        max_chars("summary", summary, SUMMARY_MAX)?;
    }
    if let Some(content) = &update.content {
        not_blank("content", content)?;
    }
    if let Some(author) = &update.author {
        not_blank("author", author)?;
        max_chars("author", author, AUTHOR_MAX)?;
    }
    if let Some(value) = &update.cover_image {
        not_blank("cover_image", value)?;
        cover_image(value)?;
    }
    Ok(())
}

/// Comments are stored trimmed, so this hands back a normalized copy.
pub fn new_comment(new: NewComment) -> Result<NewComment, ValidationError> {
    not_blank("nickname", &new.nickname)?;
    max_chars("nickname", new.nickname.trim(), NICKNAME_MAX)?;
    not_blank("content", &new.content)?;
    max_chars("content", new.content.trim(), COMMENT_MAX)?;

    Ok(NewComment {
        nickname: new.nickname.trim().into(),
        content: new.content.trim().into(),
        ..new
    })
}

pub fn comment_update(update: CommentUpdate) -> Result<CommentUpdate, ValidationError> {
    not_blank("content", &update.content)?;
    max_chars("content", update.content.trim(), COMMENT_MAX)?;

    Ok(CommentUpdate {
        content: update.content.trim().into(),
    })
}
