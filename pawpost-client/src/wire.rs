//! Response envelopes of the REST contract and their conversion into model types.

use crate::client::ApiError;
use pawpost_common::model::{
    Id,
    admin::Report,
    auth::{AuthToken, AuthUser},
    category::Category,
    comment::Comment,
    like::LikeState,
    page::{Page, Pagination},
    post::Post,
    user::UserMarker,
};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

/// `{ statusCode, message, error? }`, where validation failures send a list.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorBody {
    #[serde(default)]
    message: Option<ErrorMessage>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        let message = match self.message {
            Some(ErrorMessage::One(message)) => message,
            Some(ErrorMessage::Many(messages)) => messages.join("; "),
            None => self.error?,
        };

        (!message.trim().is_empty()).then_some(message)
    }
}

#[derive(Deserialize)]
pub(crate) struct FeedEnvelope {
    posts: Vec<Post>,
    pagination: Pagination,
}

impl From<FeedEnvelope> for Page<Post> {
    fn from(value: FeedEnvelope) -> Self {
        Page {
            items: value.posts,
            pagination: value.pagination,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct CommentsEnvelope {
    #[serde(default)]
    comments: Vec<Comment>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

impl CommentsEnvelope {
    /// A listing without pagination is treated as the last page.
    pub(crate) fn into_page(self, requested_page: u32, limit: u32) -> Page<Comment> {
        let pagination = self.pagination.unwrap_or(Pagination {
            page: requested_page,
            limit,
            total: self.comments.len() as u64,
            total_pages: requested_page,
        });

        Page {
            items: self.comments,
            pagination,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct ReportsEnvelope {
    #[serde(default, alias = "items")]
    reports: Vec<Report>,
    #[serde(default)]
    pagination: Pagination,
}

impl From<ReportsEnvelope> for Page<Report> {
    fn from(value: ReportsEnvelope) -> Self {
        Page {
            items: value.reports,
            pagination: value.pagination,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct CreatedPostEnvelope {
    #[serde(default)]
    post: Option<Post>,
}

impl TryFrom<CreatedPostEnvelope> for Post {
    type Error = ApiError;

    fn try_from(value: CreatedPostEnvelope) -> Result<Self, Self::Error> {
        value.post.ok_or(ApiError::MissingPayload("post"))
    }
}

#[derive(Deserialize)]
pub(crate) struct CreatedCommentEnvelope {
    #[serde(default)]
    comment: Option<Comment>,
}

impl TryFrom<CreatedCommentEnvelope> for Comment {
    type Error = ApiError;

    fn try_from(value: CreatedCommentEnvelope) -> Result<Self, Self::Error> {
        value.comment.ok_or(ApiError::MissingPayload("comment"))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PostLikeEnvelope {
    liked: bool,
    likes_count: u32,
}

impl From<PostLikeEnvelope> for LikeState {
    fn from(value: PostLikeEnvelope) -> Self {
        LikeState::new(value.liked, value.likes_count)
    }
}

/// The comment returned by a like toggle, reduced to its like fields. Unlike
/// [`Comment`] nothing is defaulted here, so a missing pair stays visible.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LikedCommentRecord {
    is_liked: Option<bool>,
    likes_count: Option<u32>,
    /// Users who like the comment.
    likes: Option<Vec<Id<UserMarker>>>,
}

impl LikedCommentRecord {
    /// The pair the backend reported. The count falls back to the length of
    /// `likes`; without `isLiked` there is no pair.
    pub(crate) fn like_state(&self) -> Option<LikeState> {
        let is_liked = self.is_liked?;
        let likes_count = self.likes_count.or_else(|| {
            self.likes
                .as_ref()
                .map(|likes| u32::try_from(likes.len()).unwrap_or(u32::MAX))
        })?;
        Some(LikeState::new(is_liked, likes_count))
    }
}

/// The generic `{ message?, data? }` wrapper.
#[derive(Deserialize)]
pub(crate) struct DataEnvelope<T> {
    data: Option<T>,
}

impl<T> DataEnvelope<T> {
    pub(crate) fn into_data(self, what: &'static str) -> Result<T, ApiError> {
        self.data.ok_or(ApiError::MissingPayload(what))
    }
}

#[derive(Deserialize)]
pub(crate) struct AuthEnvelope {
    pub user: AuthUser,
    pub token: AuthToken,
}

#[derive(Deserialize)]
pub(crate) struct CategoriesEnvelope {
    #[serde(default)]
    categories: Vec<Category>,
}

impl From<CategoriesEnvelope> for Vec<Category> {
    fn from(value: CategoriesEnvelope) -> Self {
        value.categories
    }
}
