use crate::model::{Id, pet::PetMarker};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct UserMarker;

#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Deserialize, Serialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Id<UserMarker>,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default)]
    pub pets: Vec<Id<PetMarker>>,
    #[serde(default)]
    pub followers: Vec<Id<UserMarker>>,
    #[serde(default)]
    pub following: Vec<Id<UserMarker>>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub following_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posts_count: Option<u32>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

fn active_by_default() -> bool {
    true
}

impl User {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    #[must_use]
    pub fn is_followed_by(&self, user: &Id<UserMarker>) -> bool {
        self.followers.contains(user)
    }

    /// Prefers the server's aggregate over the embedded id list, which the
    /// backend may truncate.
    #[must_use]
    pub fn follower_count(&self) -> u32 {
        self.followers_count
            .unwrap_or_else(|| u32::try_from(self.followers.len()).unwrap_or(u32::MAX))
    }

    #[must_use]
    pub fn following_count(&self) -> u32 {
        self.following_count
            .unwrap_or_else(|| u32::try_from(self.following.len()).unwrap_or(u32::MAX))
    }
}

/// The trimmed-down user the backend embeds in posts, comments and reports.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: Id<UserMarker>,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

/// A user reference that is either a bare id or populated by the backend.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum UserRef {
    Id(Id<UserMarker>),
    Expanded(Box<UserSummary>),
}

impl UserRef {
    #[must_use]
    pub fn id(&self) -> &Id<UserMarker> {
        match self {
            UserRef::Id(id) => id,
            UserRef::Expanded(user) => &user.id,
        }
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        match self {
            UserRef::Id(_) => None,
            UserRef::Expanded(user) => Some(&user.username),
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}
