use crate::model::{
    Id,
    like::{LikeState, Likeable},
    pet::{PetMarker, PetRef},
    user::UserRef,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct Media {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
}

/// A feed post. `is_liked` is relative to whoever is viewing.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: Id<PostMarker>,
    pub author: UserRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pet: Option<PetRef>,
    pub content: String,
    #[serde(default)]
    pub media: Vec<Media>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub comments_count: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Likeable for Post {
    type Marker = PostMarker;

    fn id(&self) -> &Id<PostMarker> {
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

/// A post reference that is either a bare id or populated by the backend.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PostRef {
    Id(Id<PostMarker>),
    Expanded(Box<Post>),
}

impl PostRef {
    #[must_use]
    pub fn id(&self) -> &Id<PostMarker> {
        match self {
            PostRef::Id(id) => id,
            PostRef::Expanded(post) => &post.id,
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePost {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_id: Option<Id<PetMarker>>,
    pub category: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<Media>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct UpdatePost {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}
