use crate::model::Id;

/// The `(isLiked, likesCount)` pair as seen by the current viewer.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct LikeState {
    pub is_liked: bool,
    pub likes_count: u32,
}

impl LikeState {
    #[must_use]
    pub fn new(is_liked: bool, likes_count: u32) -> Self {
        Self {
            is_liked,
            likes_count,
        }
    }

    /// The state after the viewer flips their like. Unliking never drops the
    /// count below zero, even when the count was already stale at zero.
    #[must_use]
    pub fn toggled(self) -> Self {
        let is_liked = !self.is_liked;
        let likes_count = if is_liked {
            self.likes_count.saturating_add(1)
        } else {
            self.likes_count.saturating_sub(1)
        };

        Self {
            is_liked,
            likes_count,
        }
    }
}

/// An entity carrying a per-viewer like state.
pub trait Likeable {
    type Marker;

    fn id(&self) -> &Id<Self::Marker>;

    fn like_state(&self) -> LikeState;

    fn set_like_state(&mut self, state: LikeState);
}
