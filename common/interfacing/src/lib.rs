mod imports;

mod article;
mod comment;
mod login_form;
mod profile;
mod statistics;
pub mod timestamp;

pub use article::{Article, ArticleCategory, ArticleUpdate, NewArticle};
pub use comment::{Comment, CommentUpdate, CommentWithArticle, NewComment};
pub use login_form::LoginForm;
pub use profile::{Profile, Role};
pub use statistics::Statistics;
