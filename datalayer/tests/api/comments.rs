use crate::helpers::{draft_comment, mock_store};
use claim::{assert_err, assert_ok};
use datalayer::error::DataError;
use datalayer::store::ContentStore;
use interfacing::CommentUpdate;

#[tokio::test]
async fn comment_lands_on_its_article_trimmed() {
    let store = mock_store();

    let mut new = draft_comment("2", "  solid reporting  ");
    new.nickname = "  quiet_reader ".into();
    let added = assert_ok!(store.add_comment(new).await);

    assert_eq!(added.nickname, "quiet_reader");
    assert_eq!(added.content, "solid reporting");
    assert_eq!(added.article_id, "2");
    assert_eq!(added.created_at, added.updated_at);

    let comments = assert_ok!(store.comments_for_article("2").await);
    assert_eq!(comments, vec![added]);
}

#[tokio::test]
async fn comments_come_back_newest_first() {
    let store = mock_store();

    let comments = assert_ok!(store.comments_for_article("1").await);

    let ids: Vec<_> = comments.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["2", "1"]);
}

#[tokio::test]
async fn comment_on_unknown_article_is_entry_not_found() {
    let store = mock_store();

    let err = assert_err!(store.add_comment(draft_comment("404", "into the void")).await);

    assert!(matches!(err, DataError::EntryNotFound));
}

#[tokio::test]
async fn blank_comments_are_rejected() {
    let store = mock_store();

    let err = assert_err!(store.add_comment(draft_comment("1", "   ")).await);

    assert!(matches!(err, DataError::Validation(_)));
    assert_eq!(assert_ok!(store.comments_for_article("1").await).len(), 2);
}

#[tokio::test]
async fn moderation_list_joins_article_titles() {
    let store = mock_store();
    assert_ok!(store.add_comment(draft_comment("3", "useful outlook")).await);

    let all = assert_ok!(store.all_comments().await);

    assert_eq!(all.len(), 3);
    // newest first: the fresh comment leads
    assert_eq!(all[0].article_title, "2026 Battery Industry Outlook");
    assert_eq!(all[1].article_title, "Advances in Lithium Battery Technology");
    assert_eq!(all[2].article_title, "Advances in Lithium Battery Technology");
}

#[tokio::test]
async fn edit_rewrites_content_only() {
    let store = mock_store();

    let update = CommentUpdate {
        content: " corrected take ".into(),
    };
    let edited = assert_ok!(store.update_comment("1", update).await);

    assert_eq!(edited.content, "corrected take");
    assert_eq!(edited.nickname, "BatteryFan");
    assert_ne!(edited.updated_at, edited.created_at);
}

#[tokio::test]
async fn edit_of_unknown_comment_is_entry_not_found() {
    let store = mock_store();

    let err = assert_err!(
        store
            .update_comment(
                "404",
                CommentUpdate {
                    content: "x".into()
                }
            )
            .await
    );

    assert!(matches!(err, DataError::EntryNotFound));
}

#[tokio::test]
async fn removed_comment_is_gone_for_good() {
    let store = mock_store();

    assert_ok!(store.delete_comment("2").await);

    assert_eq!(assert_ok!(store.comments_for_article("1").await).len(), 1);
    let err = assert_err!(store.delete_comment("2").await);
    assert!(matches!(err, DataError::EntryNotFound));
}
