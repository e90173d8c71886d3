//! The slices of the REST client each store depends on.
//!
//! Stores are generic over these traits so they can be driven by a scripted
//! backend in tests.

use async_trait::async_trait;
use pawpost_client::client::{ApiClient, ApiError};
use pawpost_common::model::{
    Id,
    comment::{Comment, CommentDraft, CommentMarker},
    like::LikeState,
    page::Page,
    pet::{CreatePet, Pet, PetMarker, UpdatePet},
    post::{CreatePost, Post, PostMarker},
    search::{SearchQuery, SearchResults},
};
use std::sync::Arc;

#[async_trait]
pub trait FeedBackend: Send + Sync {
    async fn feed(&self, page: u32, limit: u32) -> Result<Page<Post>, ApiError>;

    async fn create_post(&self, draft: &CreatePost) -> Result<Post, ApiError>;

    async fn delete_post(&self, id: &Id<PostMarker>) -> Result<(), ApiError>;

    /// Returns the like state the server settled on.
    async fn toggle_post_like(&self, id: &Id<PostMarker>) -> Result<LikeState, ApiError>;

    async fn report_post(&self, id: &Id<PostMarker>, reason: &str) -> Result<(), ApiError>;
}

#[async_trait]
pub trait CommentBackend: Send + Sync {
    async fn comments(
        &self,
        post: &Id<PostMarker>,
        page: u32,
        limit: u32,
    ) -> Result<Page<Comment>, ApiError>;

    async fn create_comment(
        &self,
        post: &Id<PostMarker>,
        draft: &CommentDraft,
    ) -> Result<Comment, ApiError>;

    async fn update_comment(
        &self,
        id: &Id<CommentMarker>,
        draft: &CommentDraft,
    ) -> Result<Comment, ApiError>;

    async fn delete_comment(&self, id: &Id<CommentMarker>) -> Result<(), ApiError>;

    /// Returns the like state the server settled on, if its answer says.
    async fn toggle_comment_like(
        &self,
        id: &Id<CommentMarker>,
    ) -> Result<Option<LikeState>, ApiError>;

    async fn report_comment(&self, id: &Id<CommentMarker>, reason: &str) -> Result<(), ApiError>;
}

#[async_trait]
pub trait PetBackend: Send + Sync {
    async fn my_pets(&self) -> Result<Vec<Pet>, ApiError>;

    async fn create_pet(&self, pet: &CreatePet) -> Result<Pet, ApiError>;

    async fn update_pet(&self, id: &Id<PetMarker>, update: &UpdatePet) -> Result<Pet, ApiError>;

    async fn delete_pet(&self, id: &Id<PetMarker>) -> Result<(), ApiError>;
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResults, ApiError>;
}

#[async_trait]
impl FeedBackend for ApiClient {
    async fn feed(&self, page: u32, limit: u32) -> Result<Page<Post>, ApiError> {
        ApiClient::feed(self, page, limit).await
    }

    async fn create_post(&self, draft: &CreatePost) -> Result<Post, ApiError> {
        ApiClient::create_post(self, draft).await
    }

    async fn delete_post(&self, id: &Id<PostMarker>) -> Result<(), ApiError> {
        ApiClient::delete_post(self, id).await
    }

    async fn toggle_post_like(&self, id: &Id<PostMarker>) -> Result<LikeState, ApiError> {
        ApiClient::toggle_post_like(self, id).await
    }

    async fn report_post(&self, id: &Id<PostMarker>, reason: &str) -> Result<(), ApiError> {
        ApiClient::report_post(self, id, reason).await
    }
}

#[async_trait]
impl CommentBackend for ApiClient {
    async fn comments(
        &self,
        post: &Id<PostMarker>,
        page: u32,
        limit: u32,
    ) -> Result<Page<Comment>, ApiError> {
        ApiClient::comments(self, post, page, limit).await
    }

    async fn create_comment(
        &self,
        post: &Id<PostMarker>,
        draft: &CommentDraft,
    ) -> Result<Comment, ApiError> {
        ApiClient::create_comment(self, post, draft).await
    }

    async fn update_comment(
        &self,
        id: &Id<CommentMarker>,
        draft: &CommentDraft,
    ) -> Result<Comment, ApiError> {
        ApiClient::update_comment(self, id, draft).await
    }

    async fn delete_comment(&self, id: &Id<CommentMarker>) -> Result<(), ApiError> {
        ApiClient::delete_comment(self, id).await
    }

    async fn toggle_comment_like(
        &self,
        id: &Id<CommentMarker>,
    ) -> Result<Option<LikeState>, ApiError> {
        ApiClient::toggle_comment_like(self, id).await
    }

    async fn report_comment(&self, id: &Id<CommentMarker>, reason: &str) -> Result<(), ApiError> {
        ApiClient::report_comment(self, id, reason).await
    }
}

#[async_trait]
impl PetBackend for ApiClient {
    async fn my_pets(&self) -> Result<Vec<Pet>, ApiError> {
        ApiClient::my_pets(self).await
    }

    async fn create_pet(&self, pet: &CreatePet) -> Result<Pet, ApiError> {
        ApiClient::create_pet(self, pet).await
    }

    async fn update_pet(&self, id: &Id<PetMarker>, update: &UpdatePet) -> Result<Pet, ApiError> {
        ApiClient::update_pet(self, id, update).await
    }

    async fn delete_pet(&self, id: &Id<PetMarker>) -> Result<(), ApiError> {
        ApiClient::delete_pet(self, id).await
    }
}

#[async_trait]
impl SearchBackend for ApiClient {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResults, ApiError> {
        ApiClient::search(self, query).await
    }
}

#[async_trait]
impl<B: FeedBackend + ?Sized> FeedBackend for Arc<B> {
    async fn feed(&self, page: u32, limit: u32) -> Result<Page<Post>, ApiError> {
        (**self).feed(page, limit).await
    }

    async fn create_post(&self, draft: &CreatePost) -> Result<Post, ApiError> {
        (**self).create_post(draft).await
    }

    async fn delete_post(&self, id: &Id<PostMarker>) -> Result<(), ApiError> {
        (**self).delete_post(id).await
    }

    async fn toggle_post_like(&self, id: &Id<PostMarker>) -> Result<LikeState, ApiError> {
        (**self).toggle_post_like(id).await
    }

    async fn report_post(&self, id: &Id<PostMarker>, reason: &str) -> Result<(), ApiError> {
        (**self).report_post(id, reason).await
    }
}

#[async_trait]
impl<B: CommentBackend + ?Sized> CommentBackend for Arc<B> {
    async fn comments(
        &self,
        post: &Id<PostMarker>,
        page: u32,
        limit: u32,
    ) -> Result<Page<Comment>, ApiError> {
        (**self).comments(post, page, limit).await
    }

    async fn create_comment(
        &self,
        post: &Id<PostMarker>,
        draft: &CommentDraft,
    ) -> Result<Comment, ApiError> {
        (**self).create_comment(post, draft).await
    }

    async fn update_comment(
        &self,
        id: &Id<CommentMarker>,
        draft: &CommentDraft,
    ) -> Result<Comment, ApiError> {
        (**self).update_comment(id, draft).await
    }

    async fn delete_comment(&self, id: &Id<CommentMarker>) -> Result<(), ApiError> {
        (**self).delete_comment(id).await
    }

    async fn toggle_comment_like(
        &self,
        id: &Id<CommentMarker>,
    ) -> Result<Option<LikeState>, ApiError> {
        (**self).toggle_comment_like(id).await
    }

    async fn report_comment(&self, id: &Id<CommentMarker>, reason: &str) -> Result<(), ApiError> {
        (**self).report_comment(id, reason).await
    }
}

#[async_trait]
impl<B: PetBackend + ?Sized> PetBackend for Arc<B> {
    async fn my_pets(&self) -> Result<Vec<Pet>, ApiError> {
        (**self).my_pets().await
    }

    async fn create_pet(&self, pet: &CreatePet) -> Result<Pet, ApiError> {
        (**self).create_pet(pet).await
    }

    async fn update_pet(&self, id: &Id<PetMarker>, update: &UpdatePet) -> Result<Pet, ApiError> {
        (**self).update_pet(id, update).await
    }

    async fn delete_pet(&self, id: &Id<PetMarker>) -> Result<(), ApiError> {
        (**self).delete_pet(id).await
    }
}

#[async_trait]
impl<B: SearchBackend + ?Sized> SearchBackend for Arc<B> {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResults, ApiError> {
        (**self).search(query).await
    }
}
