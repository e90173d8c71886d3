use crate::{
    client::{ApiClient, Result},
    wire::{
        CommentsEnvelope, CreatedCommentEnvelope, CreatedPostEnvelope, DataEnvelope,
        FeedEnvelope, LikedCommentRecord, PostLikeEnvelope,
    },
};
use pawpost_common::model::{
    Id,
    comment::{Comment, CommentDraft, CommentMarker},
    like::LikeState,
    page::Page,
    post::{CreatePost, Post, PostMarker, UpdatePost},
};
use reqwest::Method;
use serde::Serialize;

#[derive(Serialize)]
struct ReportBody<'a> {
    reason: &'a str,
}

impl ApiClient {
    pub async fn feed(&self, page: u32, limit: u32) -> Result<Page<Post>> {
        let request = self
            .request(Method::GET, "/posts/feed")?
            .query(&[("page", page), ("limit", limit)]);
        let envelope: FeedEnvelope = Self::fetch_json(request).await?;
        Ok(envelope.into())
    }

    pub async fn create_post(&self, draft: &CreatePost) -> Result<Post> {
        let request = self.request(Method::POST, "/posts")?.json(draft);
        let envelope: CreatedPostEnvelope = Self::fetch_json(request).await?;
        envelope.try_into()
    }

    pub async fn post(&self, id: &Id<PostMarker>) -> Result<Post> {
        Self::fetch_json(self.request(Method::GET, &format!("/posts/{id}"))?).await
    }

    pub async fn update_post(&self, id: &Id<PostMarker>, update: &UpdatePost) -> Result<Post> {
        let request = self
            .request(Method::PUT, &format!("/posts/{id}"))?
            .json(update);
        let envelope: DataEnvelope<Post> = Self::fetch_json(request).await?;
        envelope.into_data("post")
    }

    pub async fn delete_post(&self, id: &Id<PostMarker>) -> Result<()> {
        Self::fetch_unit(self.request(Method::DELETE, &format!("/posts/{id}"))?).await
    }

    /// Flips the viewer's like; the backend decides the new state from the
    /// session and answers with it.
    pub async fn toggle_post_like(&self, id: &Id<PostMarker>) -> Result<LikeState> {
        let request = self.request(Method::PUT, &format!("/posts/{id}/like"))?;
        let envelope: PostLikeEnvelope = Self::fetch_json(request).await?;
        Ok(envelope.into())
    }

    pub async fn report_post(&self, id: &Id<PostMarker>, reason: &str) -> Result<()> {
        let request = self
            .request(Method::POST, &format!("/posts/{id}/report"))?
            .json(&ReportBody { reason });
        Self::fetch_unit(request).await
    }

    pub async fn comments(
        &self,
        post: &Id<PostMarker>,
        page: u32,
        limit: u32,
    ) -> Result<Page<Comment>> {
        let request = self
            .request(Method::GET, &format!("/posts/{post}/comments"))?
            .query(&[("page", page), ("limit", limit)]);
        let envelope: CommentsEnvelope = Self::fetch_json(request).await?;
        Ok(envelope.into_page(page, limit))
    }

    pub async fn create_comment(
        &self,
        post: &Id<PostMarker>,
        draft: &CommentDraft,
    ) -> Result<Comment> {
        let request = self
            .request(Method::POST, &format!("/posts/{post}/comments"))?
            .json(draft);
        let envelope: CreatedCommentEnvelope = Self::fetch_json(request).await?;
        envelope.try_into()
    }

    pub async fn update_comment(
        &self,
        id: &Id<CommentMarker>,
        draft: &CommentDraft,
    ) -> Result<Comment> {
        let request = self
            .request(Method::PUT, &format!("/comments/{id}"))?
            .json(draft);
        let envelope: DataEnvelope<Comment> = Self::fetch_json(request).await?;
        envelope.into_data("comment")
    }

    pub async fn delete_comment(&self, id: &Id<CommentMarker>) -> Result<()> {
        Self::fetch_unit(self.request(Method::DELETE, &format!("/comments/{id}"))?).await
    }

    /// Returns the like state the backend reports for the comment after the
    /// toggle, or `None` if its answer leaves `isLiked` out.
    pub async fn toggle_comment_like(&self, id: &Id<CommentMarker>) -> Result<Option<LikeState>> {
        let request = self.request(Method::POST, &format!("/comments/{id}/like"))?;
        let envelope: DataEnvelope<LikedCommentRecord> = Self::fetch_json(request).await?;
        envelope.into_data("comment").map(|comment| comment.like_state())
    }

    pub async fn report_comment(&self, id: &Id<CommentMarker>, reason: &str) -> Result<()> {
        let request = self
            .request(Method::POST, &format!("/comments/{id}/report"))?
            .json(&ReportBody { reason });
        Self::fetch_unit(request).await
    }
}
