use crate::{
    PAGE_SIZE,
    backend::CommentBackend,
    error::StoreError,
    list::{ListSnapshot, PagedList},
};
use pawpost_common::model::{
    Id,
    comment::{Comment, CommentDraft, CommentMarker},
    like::LikeState,
    post::PostMarker,
};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct CommentState {
    /// The post whose comments are loaded.
    post: Option<Id<PostMarker>>,
    list: PagedList<Comment>,
}

impl CommentState {
    fn is_scoped_to(&self, post: &Id<PostMarker>) -> bool {
        self.post.as_ref() == Some(post)
    }
}

/// Comments of one post at a time, paginated, with optimistic likes.
///
/// Fetching another post's comments resets the list. Responses that arrive
/// for a post that is no longer shown are dropped.
#[derive(Debug)]
pub struct CommentStore<B> {
    backend: B,
    state: Mutex<CommentState>,
}

impl<B: CommentBackend> CommentStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: Mutex::new(CommentState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, CommentState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn snapshot(&self) -> ListSnapshot<Comment> {
        self.state().list.snapshot()
    }

    #[must_use]
    pub fn post(&self) -> Option<Id<PostMarker>> {
        self.state().post.clone()
    }

    /// Loads `page` of the comments on `post`. Failures are recorded in the
    /// snapshot, not returned.
    pub async fn fetch_comments(&self, post: &Id<PostMarker>, page: u32) {
        let page = page.max(1);
        let stamp = {
            let mut state = self.state();
            if !state.is_scoped_to(post) {
                state.list.clear();
                state.post = Some(post.clone());
            }
            state.list.begin_fetch()
        };
        debug!(%post, page, "Fetching comments");

        let result = self.backend.comments(post, page, PAGE_SIZE).await;

        let mut state = self.state();
        if !state.is_scoped_to(post) {
            debug!(%post, page, "Dropping comments of a post no longer shown");
            return;
        }
        match result {
            Ok(result) => {
                if !state.list.apply_page(stamp, page, result) {
                    debug!(%post, page, "Dropping comments requested before a reset");
                }
            }
            Err(err) => {
                let err = StoreError::Fetch(err);
                if state.list.fail_fetch(stamp, err.to_string()) {
                    warn!(%post, page, error = %err, "Comments could not be loaded");
                }
            }
        }
    }

    /// Reloads the first page of the current post's comments.
    pub async fn refresh(&self) {
        let post = self.post();
        if let Some(post) = post {
            self.fetch_comments(&post, 1).await;
        }
    }

    /// Loads the next page of the current post's comments. Returns `false`
    /// when there is no post or no further page.
    pub async fn load_more(&self) -> bool {
        let next = {
            let state = self.state();
            state.post.clone().zip(state.list.cursor().next_page())
        };
        match next {
            Some((post, page)) => {
                self.fetch_comments(&post, page).await;
                true
            }
            None => false,
        }
    }

    /// Posts a comment on `post`. It is shown first if that post is the one
    /// currently loaded.
    pub async fn create_comment(
        &self,
        post: &Id<PostMarker>,
        draft: &CommentDraft,
    ) -> Result<Comment, StoreError> {
        self.state().list.clear_error();

        match self.backend.create_comment(post, draft).await {
            Ok(comment) => {
                info!(comment = %comment.id, %post, "Comment created");
                let mut state = self.state();
                if state.is_scoped_to(post) {
                    state.list.prepend(comment.clone());
                }
                Ok(comment)
            }
            Err(err) => Err(self.record(StoreError::Mutation(err))),
        }
    }

    pub async fn update_comment(
        &self,
        id: &Id<CommentMarker>,
        draft: &CommentDraft,
    ) -> Result<Comment, StoreError> {
        self.state().list.clear_error();

        match self.backend.update_comment(id, draft).await {
            Ok(comment) => {
                info!(comment = %id, "Comment updated");
                self.state().list.replace(comment.clone());
                Ok(comment)
            }
            Err(err) => Err(self.record(StoreError::Mutation(err))),
        }
    }

    pub async fn delete_comment(&self, id: &Id<CommentMarker>) -> Result<(), StoreError> {
        self.state().list.clear_error();

        match self.backend.delete_comment(id).await {
            Ok(()) => {
                info!(comment = %id, "Comment deleted");
                self.state().list.remove(id);
                Ok(())
            }
            Err(err) => Err(self.record(StoreError::Mutation(err))),
        }
    }

    /// Flips the like on comment `id` immediately, then settles it with the
    /// backend the same way [`crate::feed::FeedStore::toggle_like`] does.
    ///
    /// The refetch is skipped if the store moved to another post meanwhile.
    pub async fn toggle_like(&self, id: &Id<CommentMarker>) -> Result<(), StoreError> {
        let (ticket, post) = {
            let mut state = self.state();
            (state.list.begin_toggle(id), state.post.clone())
        };
        debug!(comment = %id, "Toggling like");

        match self.backend.toggle_comment_like(id).await {
            Ok(server) => {
                // Without a reported pair the optimistic flip stands.
                let server = server.or_else(|| ticket.snapshot().map(LikeState::toggled));
                let resync = {
                    let mut state = self.state();
                    let page = state.list.resolve_toggle(ticket, server);
                    post.filter(|post| state.is_scoped_to(post)).zip(page)
                };
                if let Some((post, page)) = resync {
                    self.resync(&post, page).await;
                }
                Ok(())
            }
            Err(err) => {
                self.state().list.resolve_toggle(ticket, None);
                Err(self.record(StoreError::LikeToggle(err)))
            }
        }
    }

    pub async fn report_comment(
        &self,
        id: &Id<CommentMarker>,
        reason: &str,
    ) -> Result<(), StoreError> {
        match self.backend.report_comment(id, reason).await {
            Ok(()) => {
                info!(comment = %id, "Comment reported");
                Ok(())
            }
            Err(err) => Err(self.record(StoreError::Report(err))),
        }
    }

    /// Forgets the current post and its comments.
    pub fn clear(&self) {
        let mut state = self.state();
        state.post = None;
        state.list.clear();
    }

    async fn resync(&self, post: &Id<PostMarker>, page: u32) {
        let stamp = self.state().list.begin_resync();

        let result = self.backend.comments(post, page, PAGE_SIZE).await;

        let mut state = self.state();
        if !state.is_scoped_to(post) {
            return;
        }
        match result {
            Ok(result) => {
                state.list.absorb(stamp, result.items);
            }
            Err(err) => {
                let err = StoreError::Fetch(err);
                if state.list.fail_resync(stamp, err.to_string()) {
                    warn!(%post, page, error = %err, "Comments could not be resynchronized");
                }
            }
        }
    }

    fn record(&self, err: StoreError) -> StoreError {
        warn!(error = %err, "Comment operation failed");
        self.state().list.set_error(err.to_string());
        err
    }
}
