//! Comment list behavior against a scripted backend.

mod common;

use common::{ScriptedComments, comment, page};
use futures::poll;
use pawpost_common::model::{
    Id,
    comment::{Comment, CommentDraft, CommentMarker},
    like::{LikeState, Likeable},
    post::PostMarker,
};
use pawpost_store::{comments::CommentStore, error::StoreError, list::LoadStatus};
use std::{pin::pin, sync::Arc};

type Store = CommentStore<Arc<ScriptedComments>>;

fn store() -> (Arc<ScriptedComments>, Store) {
    let backend = Arc::new(ScriptedComments::default());
    let store = CommentStore::new(Arc::clone(&backend));
    (backend, store)
}

fn ids(store: &Store) -> Vec<String> {
    store
        .snapshot()
        .items
        .into_iter()
        .map(|comment| comment.id.into_inner())
        .collect()
}

fn like_of(store: &Store, id: &Id<CommentMarker>) -> LikeState {
    store
        .snapshot()
        .get(id)
        .expect("comment is not loaded")
        .like_state()
}

fn numbered(post: &str, range: std::ops::Range<u32>) -> Vec<Comment> {
    range
        .map(|n| comment(&format!("c{n}"), post, false, 0))
        .collect()
}

#[tokio::test]
async fn loading_more_unions_all_pages() {
    let (backend, store) = store();
    let post = Id::new("p1");

    backend.comments.ok(page(numbered("p1", 0..10), 1, 3));
    backend.comments.ok(page(numbered("p1", 10..20), 2, 3));
    backend.comments.ok(page(numbered("p1", 20..25), 3, 3));

    store.fetch_comments(&post, 1).await;
    assert!(store.load_more().await);
    assert!(store.load_more().await);
    assert!(!store.load_more().await);

    let expected: Vec<String> = (0..25).map(|n| format!("c{n}")).collect();
    assert_eq!(ids(&store), expected);
    assert!(!store.snapshot().cursor.has_more);
    assert_eq!(
        backend.calls(),
        ["comments p1 1/10", "comments p1 2/10", "comments p1 3/10"]
    );
}

#[tokio::test]
async fn switching_posts_drops_late_responses() {
    let (backend, store) = store();
    let first: Id<PostMarker> = Id::new("p1");
    let second: Id<PostMarker> = Id::new("p2");

    let gate = backend.comments.gate();
    let mut slow = pin!(store.fetch_comments(&first, 1));
    assert!(poll!(&mut slow).is_pending());

    backend
        .comments
        .ok(page(vec![comment("c9", "p2", false, 0)], 1, 1));
    store.fetch_comments(&second, 1).await;

    gate.send(Ok(page(vec![comment("c1", "p1", false, 0)], 1, 1)))
        .unwrap();
    slow.await;

    assert_eq!(store.post(), Some(second));
    assert_eq!(ids(&store), ["c9"]);
    assert_eq!(store.snapshot().status, LoadStatus::Loaded);
}

#[tokio::test]
async fn comment_like_is_optimistic_and_resynced() {
    let (backend, store) = store();
    let post = Id::new("p1");
    let c1 = Id::new("c1");
    backend.comments.ok(page(
        vec![comment("c1", "p1", false, 2), comment("c2", "p1", false, 0)],
        1,
        1,
    ));
    store.fetch_comments(&post, 1).await;

    let gate = backend.toggle.gate();
    backend.comments.ok(page(vec![comment("c1", "p1", true, 3)], 1, 1));

    let mut toggle = pin!(store.toggle_like(&c1));
    assert!(poll!(&mut toggle).is_pending());
    assert_eq!(like_of(&store, &c1), LikeState::new(true, 3));

    gate.send(Ok(Some(LikeState::new(true, 3)))).unwrap();
    toggle.await.unwrap();

    assert_eq!(like_of(&store, &c1), LikeState::new(true, 3));
    assert_eq!(ids(&store), ["c1", "c2"]);
    assert_eq!(
        backend.calls(),
        ["comments p1 1/10", "like c1", "comments p1 1/10"]
    );
}

#[tokio::test]
async fn failed_comment_like_reverts() {
    let (backend, store) = store();
    let post = Id::new("p1");
    let c1 = Id::new("c1");
    backend
        .comments
        .ok(page(vec![comment("c1", "p1", true, 4)], 1, 1));
    store.fetch_comments(&post, 1).await;

    backend.toggle.fail("Comment not found");
    let error = store.toggle_like(&c1).await.unwrap_err();

    assert!(matches!(error, StoreError::LikeToggle(_)));
    assert_eq!(like_of(&store, &c1), LikeState::new(true, 4));
    assert!(store.snapshot().error.is_some());
}

#[tokio::test]
async fn unreported_like_pair_keeps_the_optimistic_flip() {
    let (backend, store) = store();
    let post = Id::new("p1");
    let c1 = Id::new("c1");
    backend
        .comments
        .ok(page(vec![comment("c1", "p1", false, 2)], 1, 1));
    store.fetch_comments(&post, 1).await;

    backend.toggle.ok(None);
    backend.comments.fail("Database unavailable");
    store.toggle_like(&c1).await.unwrap();

    assert_eq!(like_of(&store, &c1), LikeState::new(true, 3));
    assert_eq!(
        store.snapshot().error.as_deref(),
        Some("Loading failed: Database unavailable")
    );
}

#[tokio::test]
async fn switching_posts_mid_toggle_skips_the_resync() {
    let (backend, store) = store();
    backend
        .comments
        .ok(page(vec![comment("c1", "p1", false, 0)], 1, 1));
    store.fetch_comments(&Id::new("p1"), 1).await;

    let gate = backend.toggle.gate();
    let c1 = Id::new("c1");
    let mut toggle = pin!(store.toggle_like(&c1));
    assert!(poll!(&mut toggle).is_pending());

    backend
        .comments
        .ok(page(vec![comment("c9", "p2", false, 0)], 1, 1));
    store.fetch_comments(&Id::new("p2"), 1).await;

    gate.send(Ok(Some(LikeState::new(true, 1)))).unwrap();
    toggle.await.unwrap();

    assert_eq!(ids(&store), ["c9"]);
    assert_eq!(like_of(&store, &Id::new("c9")), LikeState::default());
    assert_eq!(
        backend.calls(),
        ["comments p1 1/10", "like c1", "comments p2 1/10"]
    );
}

#[tokio::test]
async fn create_edit_and_delete_comments() {
    let (backend, store) = store();
    let post = Id::new("p1");
    backend
        .comments
        .ok(page(vec![comment("c1", "p1", false, 0)], 1, 1));
    store.fetch_comments(&post, 1).await;

    backend.create.ok(comment("c2", "p1", false, 0));
    let created = store
        .create_comment(&post, &CommentDraft::new("Good boy!"))
        .await
        .unwrap();
    assert_eq!(created.id, Id::new("c2"));
    assert_eq!(ids(&store), ["c2", "c1"]);

    backend.create.ok(comment("c7", "p5", false, 0));
    store
        .create_comment(&Id::new("p5"), &CommentDraft::new("Elsewhere"))
        .await
        .unwrap();
    assert_eq!(ids(&store), ["c2", "c1"], "other posts are not shown");

    let mut edited = comment("c1", "p1", false, 0);
    edited.content = "Edited".to_owned();
    backend.update.ok(edited);
    store
        .update_comment(&Id::new("c1"), &CommentDraft::new("Edited"))
        .await
        .unwrap();
    assert_eq!(
        store.snapshot().get(&Id::new("c1")).unwrap().content,
        "Edited"
    );

    backend.delete.fail("You can only delete your own comments");
    let error = store.delete_comment(&Id::new("c2")).await.unwrap_err();
    assert!(matches!(error, StoreError::Mutation(_)));
    assert_eq!(ids(&store), ["c2", "c1"]);

    backend.delete.ok(());
    store.delete_comment(&Id::new("c2")).await.unwrap();
    assert_eq!(ids(&store), ["c1"]);
}

#[tokio::test]
async fn refresh_and_clear_follow_the_current_post() {
    let (backend, store) = store();

    store.refresh().await;
    assert!(!store.load_more().await);
    assert!(backend.calls().is_empty(), "no post, no requests");

    backend
        .comments
        .ok(page(vec![comment("c1", "p1", false, 0)], 1, 1));
    store.fetch_comments(&Id::new("p1"), 1).await;
    backend.comments.fail("Database unavailable");
    store.refresh().await;

    let snapshot = store.snapshot();
    assert_eq!(snapshot.status, LoadStatus::Errored);
    assert_eq!(ids(&store), ["c1"]);

    backend.report.ok(());
    store
        .report_comment(&Id::new("c1"), "rude")
        .await
        .unwrap();

    store.clear();
    assert_eq!(store.post(), None);
    assert!(store.snapshot().items.is_empty());
}
