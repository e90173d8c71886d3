use crate::model::{Id, pet::Pet, user::UserSummary};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct ReportMarker;

#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminStatistics {
    pub total_users: u64,
    pub active_users: u64,
    pub total_posts: u64,
    pub total_comments: u64,
    pub total_pets: u64,
    pub posts_by_category: BTreeMap<String, u64>,
    pub most_popular_pets: Vec<Pet>,
    pub reports_pending: u64,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Post,
    Comment,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Resolved,
    Dismissed,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(rename = "_id")]
    pub id: Id<ReportMarker>,
    #[serde(rename = "type")]
    pub kind: ReportKind,
    /// Post or comment id, depending on `kind`.
    pub target_id: String,
    pub reporter: UserSummary,
    pub reason: String,
    pub status: ReportStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct BlockUser {
    pub blocked: bool,
    pub reason: String,
}
