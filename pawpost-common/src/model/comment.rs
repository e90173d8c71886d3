use crate::model::{
    Id,
    like::{LikeState, Likeable},
    post::{PostMarker, PostRef},
    user::UserRef,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct CommentMarker;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: Id<CommentMarker>,
    pub post: PostRef,
    pub author: UserRef,
    pub content: String,
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Comment {
    #[must_use]
    pub fn post_id(&self) -> &Id<PostMarker> {
        self.post.id()
    }
}

impl Likeable for Comment {
    type Marker = CommentMarker;

    fn id(&self) -> &Id<CommentMarker> {
        &self.id
    }

    fn like_state(&self) -> LikeState {
        LikeState::new(self.is_liked, self.likes_count)
    }

    fn set_like_state(&mut self, state: LikeState) {
        self.is_liked = state.is_liked;
        self.likes_count = state.likes_count;
    }
}

/// Body for both creating and editing a comment.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct CommentDraft {
    pub content: String,
}

impl CommentDraft {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}
