use crate::imports::*;

/// Admin dashboard counters, computed by the store at call time.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Statistics {
    pub total_articles: u64,
    pub total_comments: u64,
    pub total_views: u64,
}
