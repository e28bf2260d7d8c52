use crate::helpers::{draft_article, empty_store, mock_store};
use claim::{assert_err, assert_none, assert_ok, assert_some};
use datalayer::conf::MockConf;
use datalayer::error::DataError;
use datalayer::store::{ContentStore, MockStore, DEFAULT_LATEST_LIMIT, DEFAULT_POPULAR_LIMIT};
use interfacing::{ArticleCategory, ArticleUpdate};

#[tokio::test]
async fn seeded_catalog_comes_back_newest_first() {
    // Arrange
    let store = mock_store();

    // Act
    let articles = assert_ok!(store.list_articles(None).await);

    // Assert
    let ids: Vec<_> = articles.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3"]);
}

#[tokio::test]
async fn category_filter_narrows_the_list() {
    let store = mock_store();

    let news = assert_ok!(store.list_articles(Some(ArticleCategory::News)).await);

    assert_eq!(news.len(), 1);
    assert_eq!(news[0].id, "2");
}

#[tokio::test]
async fn fresh_article_starts_with_zero_views() {
    let store = mock_store();

    let created = assert_ok!(
        store
            .create_article(draft_article("Fresh off the press"))
            .await
    );

    assert_eq!(created.views, 0);
    assert_eq!(created.created_at, created.updated_at);
    assert_eq!(created.id, "4");

    let found = assert_some!(assert_ok!(store.get_article(&created.id).await));
    assert_eq!(found, created);
}

#[tokio::test]
async fn update_rewrites_fields_and_refreshes_updated_at() {
    // Arrange: seeded article 1 was written in January
    let store = mock_store();
    let before = assert_some!(assert_ok!(store.get_article("1").await));

    // Act
    let update = ArticleUpdate {
        title: Some("Rewritten title".into()),
        ..Default::default()
    };
    let after = assert_ok!(store.update_article("1", update).await);

    // Assert
    assert_eq!(after.title, "Rewritten title");
    assert_eq!(after.summary, before.summary);
    assert_eq!(after.views, before.views);
    assert_eq!(after.created_at, before.created_at);
    assert_ne!(after.updated_at, before.updated_at);
}

#[tokio::test]
async fn update_of_unknown_id_is_entry_not_found() {
    let store = mock_store();

    let err = assert_err!(store.update_article("404", ArticleUpdate::default()).await);

    assert!(matches!(err, DataError::EntryNotFound));
}

#[tokio::test]
async fn delete_takes_attached_comments_with_it() {
    // Arrange: seeded article 1 carries two comments
    let store = mock_store();

    // Act
    assert_ok!(store.delete_article("1").await);

    // Assert
    assert_none!(assert_ok!(store.get_article("1").await));
    assert!(assert_ok!(store.comments_for_article("1").await).is_empty());
    let stats = assert_ok!(store.statistics().await);
    assert_eq!(stats.total_comments, 0);
}

#[tokio::test]
async fn delete_of_unknown_id_is_entry_not_found() {
    let store = mock_store();

    let err = assert_err!(store.delete_article("404").await);

    assert!(matches!(err, DataError::EntryNotFound));
}

#[tokio::test]
async fn view_bumps_accumulate() {
    let store = mock_store();

    for _ in 0..3 {
        assert_ok!(store.increment_article_views("1").await);
    }

    let article = assert_some!(assert_ok!(store.get_article("1").await));
    assert_eq!(article.views, 1237);
}

#[tokio::test]
async fn view_bump_leaves_timestamps_alone() {
    let store = mock_store();
    let before = assert_some!(assert_ok!(store.get_article("1").await));

    assert_ok!(store.increment_article_views("1").await);

    // only an explicit edit refreshes updated_at
    let after = assert_some!(assert_ok!(store.get_article("1").await));
    assert_eq!(after.views, before.views + 1);
    assert_eq!(after.created_at, before.created_at);
    assert_eq!(after.updated_at, before.updated_at);
}

#[tokio::test]
async fn view_bump_for_unknown_id_is_ignored() {
    let store = mock_store();

    assert_ok!(store.increment_article_views("404").await);

    let stats = assert_ok!(store.statistics().await);
    assert_eq!(stats.total_views, 3693);
}

#[tokio::test]
async fn latest_is_a_prefix_of_the_full_ordering() {
    let store = mock_store();
    assert_ok!(store.create_article(draft_article("Newer piece")).await);
    assert_ok!(store.create_article(draft_article("Newest piece")).await);

    let all = assert_ok!(store.list_articles(None).await);
    let latest = assert_ok!(store.latest_articles(2).await);

    assert_eq!(latest.len(), 2);
    assert_eq!(latest[..], all[..2]);

    let capped = assert_ok!(store.latest_articles(DEFAULT_LATEST_LIMIT).await);
    assert_eq!(capped.len(), 5);
}

#[tokio::test]
async fn popular_orders_by_views() {
    let store = mock_store();

    let popular = assert_ok!(store.popular_articles(DEFAULT_POPULAR_LIMIT).await);

    let ids: Vec<_> = popular.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["3", "1", "2"]);

    let top_two = assert_ok!(store.popular_articles(2).await);
    let views: Vec<_> = top_two.iter().map(|a| a.views).collect();
    assert_eq!(views, [1567, 1234]);

    let top = assert_ok!(store.popular_articles(1).await);
    assert_eq!(top[0].views, 1567);
}

#[tokio::test]
async fn junk_drafts_are_rejected_not_stored() {
    let store = mock_store();

    let mut blank = draft_article("ok");
    blank.title = "   ".into();
    let err = assert_err!(store.create_article(blank).await);
    assert!(matches!(err, DataError::Validation(_)));

    let mut bad_cover = draft_article("ok");
    bad_cover.cover_image = "not a url".into();
    let err = assert_err!(store.create_article(bad_cover).await);
    assert!(matches!(err, DataError::Validation(_)));

    let articles = assert_ok!(store.list_articles(None).await);
    assert_eq!(articles.len(), 3);
}

#[tokio::test]
async fn unknown_article_reads_as_none() {
    let store = mock_store();

    assert_none!(assert_ok!(store.get_article("404").await));
}

#[tokio::test]
async fn ids_keep_growing_after_a_delete() {
    let store = mock_store();

    let first = assert_ok!(store.create_article(draft_article("One")).await);
    assert_eq!(first.id, "4");
    assert_ok!(store.delete_article(&first.id).await);

    let second = assert_ok!(store.create_article(draft_article("Two")).await);
    assert_eq!(second.id, "5");
}

#[tokio::test]
async fn unseeded_store_is_empty() {
    let store = empty_store();

    assert!(assert_ok!(store.list_articles(None).await).is_empty());
    let stats = assert_ok!(store.statistics().await);
    assert_eq!(stats.total_articles, 0);
}

#[tokio::test]
async fn every_operation_pays_the_configured_latency() {
    let store = MockStore::new(&MockConf { latency_ms: 25 });
    let pause = std::time::Duration::from_millis(25);

    let started = std::time::Instant::now();
    assert_ok!(store.list_articles(None).await);
    assert!(started.elapsed() >= pause);

    let started = std::time::Instant::now();
    assert_ok!(store.increment_article_views("1").await);
    assert!(started.elapsed() >= pause);
}
