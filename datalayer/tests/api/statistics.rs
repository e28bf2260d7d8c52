use crate::helpers::{draft_article, draft_comment, empty_store, mock_store};
use claim::assert_ok;
use datalayer::store::ContentStore;

#[tokio::test]
async fn seeded_totals_add_up() {
    let store = mock_store();

    let stats = assert_ok!(store.statistics().await);

    assert_eq!(stats.total_articles, 3);
    assert_eq!(stats.total_comments, 2);
    assert_eq!(stats.total_views, 1234 + 892 + 1567);
}

#[tokio::test]
async fn totals_track_writes() {
    let store = mock_store();

    assert_ok!(store.create_article(draft_article("Number four")).await);
    assert_ok!(store.add_comment(draft_comment("2", "noted")).await);
    assert_ok!(store.increment_article_views("2").await);
    assert_ok!(store.increment_article_views("2").await);

    let stats = assert_ok!(store.statistics().await);
    assert_eq!(stats.total_articles, 4);
    assert_eq!(stats.total_comments, 3);
    assert_eq!(stats.total_views, 3693 + 2);
}

#[tokio::test]
async fn view_total_agrees_with_the_catalog() {
    let store = mock_store();
    assert_ok!(store.increment_article_views("3").await);

    let stats = assert_ok!(store.statistics().await);
    let catalog = assert_ok!(store.list_articles(None).await);

    let summed: u64 = catalog.iter().map(|a| a.views).sum();
    assert_eq!(stats.total_views, summed);
}

#[tokio::test]
async fn empty_store_reports_zeroes() {
    let store = empty_store();

    let stats = assert_ok!(store.statistics().await);

    assert_eq!(stats.total_articles, 0);
    assert_eq!(stats.total_comments, 0);
    assert_eq!(stats.total_views, 0);
}
