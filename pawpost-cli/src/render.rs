//! Plain-text views of store snapshots.

use pawpost_common::model::{
    comment::Comment,
    like::LikeState,
    pet::Pet,
    post::Post,
    search::SearchResults,
    user::{User, UserRef},
};
use pawpost_store::list::ListSnapshot;

fn author(user: &UserRef) -> &str {
    user.username().unwrap_or_else(|| user.id().as_str())
}

pub fn likes(state: LikeState) -> String {
    let heart = if state.is_liked { "♥" } else { "♡" };
    format!("{heart} {}", state.likes_count)
}

pub fn post(post: &Post) -> String {
    format!(
        "[{}] {} in #{} on {}\n  {}\n  {}  💬 {}",
        post.id,
        author(&post.author),
        post.category,
        post.created_at.date(),
        post.content,
        likes(LikeState::new(post.is_liked, post.likes_count)),
        post.comments_count,
    )
}

pub fn comment(comment: &Comment) -> String {
    format!(
        "[{}] {}: {}  {}",
        comment.id,
        author(&comment.author),
        comment.content,
        likes(LikeState::new(comment.is_liked, comment.likes_count)),
    )
}

pub fn pet(pet: &Pet) -> String {
    match &pet.breed {
        Some(breed) => format!("[{}] {} ({}, {breed})", pet.id, pet.name, pet.kind),
        None => format!("[{}] {} ({})", pet.id, pet.name, pet.kind),
    }
}

pub fn user(user: &User) -> String {
    format!(
        "{} <{}> ({:?}), {} followers, {} following",
        user.username,
        user.email,
        user.role,
        user.follower_count(),
        user.following_count(),
    )
}

/// Renders a list with one item per paragraph and a footer naming the page.
pub fn list<T>(snapshot: &ListSnapshot<T>, item: impl Fn(&T) -> String, empty: &str) -> String {
    if snapshot.items.is_empty() {
        return empty.to_owned();
    }

    let mut out: Vec<String> = snapshot.items.iter().map(item).collect();
    let more = if snapshot.cursor.has_more {
        ", more available"
    } else {
        ""
    };
    out.push(format!("-- page {}{more} --", snapshot.cursor.page));
    out.join("\n\n")
}

pub fn search(results: &SearchResults) -> String {
    let mut out = Vec::new();
    out.extend(
        results
            .users
            .iter()
            .map(|user| format!("user  {} ({})", user.username, user.full_name)),
    );
    out.extend(results.pets.iter().map(|found| format!("pet   {}", pet(found))));
    out.extend(results.posts.iter().map(|found| format!("post  {}", post(found))));

    if out.is_empty() {
        "No results".to_owned()
    } else {
        out.join("\n")
    }
}
