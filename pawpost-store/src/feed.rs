use crate::{
    PAGE_SIZE,
    backend::FeedBackend,
    error::StoreError,
    list::{ListSnapshot, PagedList},
};
use pawpost_common::model::{
    Id,
    like::{LikeState, Likeable},
    post::{CreatePost, Post, PostMarker},
};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// The paginated post feed with optimistic likes.
///
/// All methods take `&self`; concurrent calls interleave at their awaits and
/// never block each other on the backend.
#[derive(Debug)]
pub struct FeedStore<B> {
    backend: B,
    state: Mutex<PagedList<Post>>,
}

impl<B: FeedBackend> FeedStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: Mutex::new(PagedList::new()),
        }
    }

    fn state(&self) -> MutexGuard<'_, PagedList<Post>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn snapshot(&self) -> ListSnapshot<Post> {
        self.state().snapshot()
    }

    /// Loads `page`. Failures are recorded in the snapshot, not returned.
    pub async fn fetch_page(&self, page: u32) {
        let page = page.max(1);
        let stamp = self.state().begin_fetch();
        debug!(page, "Fetching feed");

        match self.backend.feed(page, PAGE_SIZE).await {
            Ok(result) => {
                let posts = result.items.len();
                if self.state().apply_page(stamp, page, result) {
                    debug!(page, posts, "Feed page loaded");
                } else {
                    debug!(page, "Dropping feed page requested before the feed was cleared");
                }
            }
            Err(err) => {
                let err = StoreError::Fetch(err);
                if self.state().fail_fetch(stamp, err.to_string()) {
                    warn!(page, error = %err, "Feed could not be loaded");
                }
            }
        }
    }

    pub async fn refresh(&self) {
        self.fetch_page(1).await;
    }

    /// Loads the page after the current one. Returns `false` if the feed is
    /// already exhausted.
    pub async fn load_more(&self) -> bool {
        let next = self.state().cursor().next_page();
        match next {
            Some(page) => {
                self.fetch_page(page).await;
                true
            }
            None => false,
        }
    }

    /// Publishes a post and puts it at the head of the feed. Nothing changes
    /// locally if the backend rejects it.
    pub async fn create_post(&self, draft: &CreatePost) -> Result<Post, StoreError> {
        self.state().clear_error();

        match self.backend.create_post(draft).await {
            Ok(mut post) => {
                post.set_like_state(LikeState::default());
                post.comments_count = 0;
                info!(post = %post.id, "Post created");
                self.state().prepend(post.clone());
                Ok(post)
            }
            Err(err) => Err(self.record(StoreError::Mutation(err))),
        }
    }

    pub async fn delete_post(&self, id: &Id<PostMarker>) -> Result<(), StoreError> {
        self.state().clear_error();

        match self.backend.delete_post(id).await {
            Ok(()) => {
                info!(post = %id, "Post deleted");
                self.state().remove(id);
                Ok(())
            }
            Err(err) => Err(self.record(StoreError::Mutation(err))),
        }
    }

    /// Flips the like on `id` immediately, then settles it with the backend.
    ///
    /// On failure the post returns to its pre-toggle state. On success the
    /// server's answer is applied and the post's page is refetched to pick up
    /// changes from other viewers; a failed refetch is only recorded.
    pub async fn toggle_like(&self, id: &Id<PostMarker>) -> Result<(), StoreError> {
        let ticket = self.state().begin_toggle(id);
        debug!(post = %id, "Toggling like");

        match self.backend.toggle_post_like(id).await {
            Ok(server) => {
                let resync = self.state().resolve_toggle(ticket, Some(server));
                if let Some(page) = resync {
                    self.resync(page).await;
                }
                Ok(())
            }
            Err(err) => {
                self.state().resolve_toggle(ticket, None);
                Err(self.record(StoreError::LikeToggle(err)))
            }
        }
    }

    pub async fn report_post(&self, id: &Id<PostMarker>, reason: &str) -> Result<(), StoreError> {
        match self.backend.report_post(id, reason).await {
            Ok(()) => {
                info!(post = %id, "Post reported");
                Ok(())
            }
            Err(err) => Err(self.record(StoreError::Report(err))),
        }
    }

    /// Empties the feed, for instance on logout. Fetches and toggles still in
    /// flight no longer touch it.
    pub fn clear(&self) {
        self.state().clear();
    }

    async fn resync(&self, page: u32) {
        let stamp = self.state().begin_resync();

        match self.backend.feed(page, PAGE_SIZE).await {
            Ok(result) => {
                self.state().absorb(stamp, result.items);
            }
            Err(err) => {
                let err = StoreError::Fetch(err);
                if self.state().fail_resync(stamp, err.to_string()) {
                    warn!(page, error = %err, "Feed could not be resynchronized");
                }
            }
        }
    }

    fn record(&self, err: StoreError) -> StoreError {
        warn!(error = %err, "Feed operation failed");
        self.state().set_error(err.to_string());
        err
    }
}
