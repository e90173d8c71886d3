//! A backend whose answers are queued up front by each test.
//!
//! Replies are either ready or held behind a oneshot gate, which lets a test
//! observe a store while a request is still in flight.
#![allow(dead_code)]

use async_trait::async_trait;
use pawpost_client::{StatusCode, client::ApiError};
use pawpost_common::model::{
    Id,
    comment::{Comment, CommentDraft, CommentMarker},
    like::LikeState,
    page::{Page, Pagination},
    pet::{CreatePet, Pet, PetMarker, UpdatePet},
    post::{CreatePost, Post, PostMarker, PostRef},
    search::{SearchQuery, SearchResults},
    user::UserRef,
};
use pawpost_store::backend::{CommentBackend, FeedBackend, PetBackend, SearchBackend};
use std::{collections::VecDeque, sync::Mutex};
use time::OffsetDateTime;
use tokio::sync::oneshot;

pub type Answer<T> = Result<T, ApiError>;

enum Reply<T> {
    Ready(Answer<T>),
    Gated(oneshot::Receiver<Answer<T>>),
}

pub struct Script<T> {
    name: &'static str,
    replies: Mutex<VecDeque<Reply<T>>>,
}

impl<T> Script<T> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            replies: Mutex::new(VecDeque::new()),
        }
    }

    pub fn ok(&self, value: T) {
        self.replies.lock().unwrap().push_back(Reply::Ready(Ok(value)));
    }

    pub fn fail(&self, message: &str) {
        self.replies.lock().unwrap().push_back(Reply::Ready(Err(error(message))));
    }

    /// Queues a reply that is only delivered once the returned sender fires.
    pub fn gate(&self) -> oneshot::Sender<Answer<T>> {
        let (sender, receiver) = oneshot::channel();
        self.replies.lock().unwrap().push_back(Reply::Gated(receiver));
        sender
    }

    pub fn is_drained(&self) -> bool {
        self.replies.lock().unwrap().is_empty()
    }

    async fn answer(&self) -> Answer<T> {
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected {} call", self.name));

        match reply {
            Reply::Ready(answer) => answer,
            Reply::Gated(receiver) => receiver.await.expect("gate dropped"),
        }
    }
}

pub fn error(message: &str) -> ApiError {
    let body = format!(r#"{{"statusCode":500,"message":"{message}"}}"#);
    ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, body.as_bytes())
}

pub fn post(id: &str, is_liked: bool, likes_count: u32) -> Post {
    Post {
        id: Id::new(id),
        author: UserRef::Id(Id::new("u1")),
        pet: None,
        content: format!("post {id}"),
        media: Vec::new(),
        category: "dogs".to_owned(),
        likes_count,
        is_liked,
        comments_count: 3,
        created_at: OffsetDateTime::UNIX_EPOCH,
    }
}

pub fn comment(id: &str, post: &str, is_liked: bool, likes_count: u32) -> Comment {
    Comment {
        id: Id::new(id),
        post: PostRef::Id(Id::new(post)),
        author: UserRef::Id(Id::new("u2")),
        content: format!("comment {id}"),
        likes_count,
        is_liked,
        created_at: OffsetDateTime::UNIX_EPOCH,
    }
}

pub fn pet(id: &str, name: &str) -> Pet {
    Pet {
        id: Id::new(id),
        name: name.to_owned(),
        kind: "dog".to_owned(),
        breed: None,
        age: None,
        description: None,
        photos: Vec::new(),
        profile_picture: None,
        owner: UserRef::Id(Id::new("u1")),
        created_at: None,
    }
}

pub fn page<T>(items: Vec<T>, number: u32, total_pages: u32) -> Page<T> {
    Page {
        items,
        pagination: Pagination {
            page: number,
            limit: 10,
            total: 0,
            total_pages,
        },
    }
}

pub struct ScriptedFeed {
    pub feed: Script<Page<Post>>,
    pub create: Script<Post>,
    pub delete: Script<()>,
    pub toggle: Script<LikeState>,
    pub report: Script<()>,
    pub calls: Mutex<Vec<String>>,
}

impl Default for ScriptedFeed {
    fn default() -> Self {
        Self {
            feed: Script::new("feed"),
            create: Script::new("create_post"),
            delete: Script::new("delete_post"),
            toggle: Script::new("toggle_post_like"),
            report: Script::new("report_post"),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedFeed {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedBackend for ScriptedFeed {
    async fn feed(&self, page: u32, limit: u32) -> Answer<Page<Post>> {
        self.record(format!("feed {page}/{limit}"));
        self.feed.answer().await
    }

    async fn create_post(&self, draft: &CreatePost) -> Answer<Post> {
        self.record(format!("create {}", draft.content));
        self.create.answer().await
    }

    async fn delete_post(&self, id: &Id<PostMarker>) -> Answer<()> {
        self.record(format!("delete {id}"));
        self.delete.answer().await
    }

    async fn toggle_post_like(&self, id: &Id<PostMarker>) -> Answer<LikeState> {
        self.record(format!("like {id}"));
        self.toggle.answer().await
    }

    async fn report_post(&self, id: &Id<PostMarker>, reason: &str) -> Answer<()> {
        self.record(format!("report {id} {reason}"));
        self.report.answer().await
    }
}

pub struct ScriptedComments {
    pub comments: Script<Page<Comment>>,
    pub create: Script<Comment>,
    pub update: Script<Comment>,
    pub delete: Script<()>,
    pub toggle: Script<Option<LikeState>>,
    pub report: Script<()>,
    pub calls: Mutex<Vec<String>>,
}

impl Default for ScriptedComments {
    fn default() -> Self {
        Self {
            comments: Script::new("comments"),
            create: Script::new("create_comment"),
            update: Script::new("update_comment"),
            delete: Script::new("delete_comment"),
            toggle: Script::new("toggle_comment_like"),
            report: Script::new("report_comment"),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedComments {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommentBackend for ScriptedComments {
    async fn comments(
        &self,
        post: &Id<PostMarker>,
        page: u32,
        limit: u32,
    ) -> Answer<Page<Comment>> {
        self.record(format!("comments {post} {page}/{limit}"));
        self.comments.answer().await
    }

    async fn create_comment(
        &self,
        post: &Id<PostMarker>,
        draft: &CommentDraft,
    ) -> Answer<Comment> {
        self.record(format!("create {post} {}", draft.content));
        self.create.answer().await
    }

    async fn update_comment(
        &self,
        id: &Id<CommentMarker>,
        draft: &CommentDraft,
    ) -> Answer<Comment> {
        self.record(format!("update {id} {}", draft.content));
        self.update.answer().await
    }

    async fn delete_comment(&self, id: &Id<CommentMarker>) -> Answer<()> {
        self.record(format!("delete {id}"));
        self.delete.answer().await
    }

    async fn toggle_comment_like(&self, id: &Id<CommentMarker>) -> Answer<Option<LikeState>> {
        self.record(format!("like {id}"));
        self.toggle.answer().await
    }

    async fn report_comment(&self, id: &Id<CommentMarker>, reason: &str) -> Answer<()> {
        self.record(format!("report {id} {reason}"));
        self.report.answer().await
    }
}

pub struct ScriptedPets {
    pub list: Script<Vec<Pet>>,
    pub create: Script<Pet>,
    pub update: Script<Pet>,
    pub delete: Script<()>,
}

impl Default for ScriptedPets {
    fn default() -> Self {
        Self {
            list: Script::new("my_pets"),
            create: Script::new("create_pet"),
            update: Script::new("update_pet"),
            delete: Script::new("delete_pet"),
        }
    }
}

#[async_trait]
impl PetBackend for ScriptedPets {
    async fn my_pets(&self) -> Answer<Vec<Pet>> {
        self.list.answer().await
    }

    async fn create_pet(&self, _pet: &CreatePet) -> Answer<Pet> {
        self.create.answer().await
    }

    async fn update_pet(&self, _id: &Id<PetMarker>, _update: &UpdatePet) -> Answer<Pet> {
        self.update.answer().await
    }

    async fn delete_pet(&self, _id: &Id<PetMarker>) -> Answer<()> {
        self.delete.answer().await
    }
}

pub struct ScriptedSearch {
    pub results: Script<SearchResults>,
    pub queries: Mutex<Vec<SearchQuery>>,
}

impl Default for ScriptedSearch {
    fn default() -> Self {
        Self {
            results: Script::new("search"),
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SearchBackend for ScriptedSearch {
    async fn search(&self, query: &SearchQuery) -> Answer<SearchResults> {
        self.queries.lock().unwrap().push(query.clone());
        self.results.answer().await
    }
}
