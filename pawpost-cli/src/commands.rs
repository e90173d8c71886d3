use crate::render;
use clap::Subcommand;
use pawpost_client::{client::ApiError, session::Session};
use pawpost_common::model::{
    Id,
    auth::{LoginRequest, RegisterRequest},
    comment::CommentDraft,
    like::Likeable,
    post::CreatePost,
    search::SearchKind,
};
use pawpost_store::{
    comments::CommentStore,
    error::StoreError,
    feed::FeedStore,
    list::{ListSnapshot, LoadStatus},
    pets::PetStore,
    search::SearchStore,
};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Not logged in, run `pawpost login` first")]
    NotLoggedIn,
    /// A fetch failed; stores record those instead of returning them.
    #[error("{0}")]
    Load(String),
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and keep the session token.
    Login {
        email: String,
        #[arg(long, env = "PAWPOST_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and log in.
    Register {
        username: String,
        email: String,
        #[arg(long)]
        full_name: String,
        #[arg(long, env = "PAWPOST_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Show the logged-in user.
    Whoami,
    /// Show a page of the feed.
    Feed {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Publish a post.
    Post {
        #[arg(long)]
        category: String,
        /// Pet the post is about.
        #[arg(long)]
        pet: Option<String>,
        content: String,
    },
    /// Like or unlike a post.
    Like { post_id: String },
    Report { post_id: String, reason: String },
    /// Show a page of a post's comments.
    Comments {
        post_id: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Comment on a post.
    Comment { post_id: String, content: String },
    /// Like or unlike a comment.
    LikeComment { post_id: String, comment_id: String },
    EditComment { comment_id: String, content: String },
    DeleteComment { comment_id: String },
    /// List your pets.
    Pets,
    Search {
        query: String,
        #[arg(long, default_value = "all", value_parser = parse_kind)]
        kind: SearchKind,
    },
}

fn parse_kind(value: &str) -> Result<SearchKind, String> {
    match value {
        "users" => Ok(SearchKind::Users),
        "pets" => Ok(SearchKind::Pets),
        "posts" => Ok(SearchKind::Posts),
        "all" => Ok(SearchKind::All),
        other => Err(format!("unknown search kind `{other}`")),
    }
}

impl Command {
    fn needs_login(&self) -> bool {
        !matches!(
            self,
            Command::Login { .. } | Command::Register { .. } | Command::Logout | Command::Whoami
        )
    }
}

/// Turns a failed fetch recorded in `snapshot` into an error.
fn loaded<T>(snapshot: ListSnapshot<T>) -> Result<ListSnapshot<T>, CommandError> {
    match (snapshot.status, &snapshot.error) {
        (LoadStatus::Errored, Some(error)) => Err(CommandError::Load(error.clone())),
        _ => Ok(snapshot),
    }
}

pub async fn dispatch(mut session: Session, command: Command) -> Result<(), CommandError> {
    if command.needs_login() && !session.is_authenticated() {
        return Err(CommandError::NotLoggedIn);
    }
    let client = session.client().clone();

    match command {
        Command::Login { email, password } => {
            let user = session.login(&LoginRequest { email, password }).await?;
            println!("Logged in as {}", render::user(user));
        }
        Command::Register {
            username,
            email,
            full_name,
            password,
        } => {
            let registration = RegisterRequest {
                username,
                email,
                password,
                full_name,
            };
            let user = session.register(&registration).await?;
            println!("Welcome, {}", render::user(user));
        }
        Command::Logout => {
            session.logout()?;
            println!("Logged out");
        }
        Command::Whoami => {
            let user = session.user().ok_or(CommandError::NotLoggedIn)?;
            println!("{}", render::user(user));
        }
        Command::Feed { page } => {
            let feed = FeedStore::new(client);
            feed.fetch_page(page).await;
            let snapshot = loaded(feed.snapshot())?;
            println!("{}", render::list(&snapshot, render::post, "The feed is empty"));
        }
        Command::Post {
            category,
            pet,
            content,
        } => {
            let draft = CreatePost {
                content,
                pet_id: pet.map(Id::new),
                category,
                media: Vec::new(),
            };
            let post = FeedStore::new(client).create_post(&draft).await?;
            info!(post = %post.id, "Published");
            println!("{}", render::post(&post));
        }
        Command::Like { post_id } => {
            let id = Id::new(post_id);
            let feed = FeedStore::new(client.clone());
            feed.refresh().await;
            feed.toggle_like(&id).await?;

            let shown = feed.snapshot().get(&id).map(Likeable::like_state);
            let state = match shown {
                Some(state) => state,
                None => client.post(&id).await?.like_state(),
            };
            println!("{id} {}", render::likes(state));
        }
        Command::Report { post_id, reason } => {
            FeedStore::new(client)
                .report_post(&Id::new(post_id), &reason)
                .await?;
            println!("Reported, thank you");
        }
        Command::Comments { post_id, page } => {
            let comments = CommentStore::new(client);
            comments.fetch_comments(&Id::new(post_id), page).await;
            let snapshot = loaded(comments.snapshot())?;
            println!("{}", render::list(&snapshot, render::comment, "No comments yet"));
        }
        Command::Comment { post_id, content } => {
            let comment = CommentStore::new(client)
                .create_comment(&Id::new(post_id), &CommentDraft::new(content))
                .await?;
            println!("{}", render::comment(&comment));
        }
        Command::LikeComment {
            post_id,
            comment_id,
        } => {
            let id = Id::new(comment_id);
            let comments = CommentStore::new(client);
            comments.fetch_comments(&Id::new(post_id), 1).await;
            comments.toggle_like(&id).await?;

            match comments.snapshot().get(&id) {
                Some(comment) => println!("{}", render::comment(comment)),
                None => println!("{id} updated"),
            }
        }
        Command::EditComment {
            comment_id,
            content,
        } => {
            let comment = CommentStore::new(client)
                .update_comment(&Id::new(comment_id), &CommentDraft::new(content))
                .await?;
            println!("{}", render::comment(&comment));
        }
        Command::DeleteComment { comment_id } => {
            CommentStore::new(client)
                .delete_comment(&Id::new(comment_id))
                .await?;
            println!("Comment deleted");
        }
        Command::Pets => {
            let pets = PetStore::new(client);
            pets.fetch_pets().await;
            let snapshot = pets.snapshot();
            if let Some(error) = snapshot.error {
                return Err(CommandError::Load(error));
            }
            if snapshot.pets.is_empty() {
                println!("No pets yet");
            }
            for pet in &snapshot.pets {
                println!("{}", render::pet(pet));
            }
        }
        Command::Search { query, kind } => {
            let search = SearchStore::new(client);
            search.search(&query, kind).await;
            let snapshot = search.snapshot();
            if let Some(error) = snapshot.error {
                return Err(CommandError::Load(error));
            }
            println!("{}", render::search(&snapshot.results));
        }
    }

    Ok(())
}
