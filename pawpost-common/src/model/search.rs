use crate::model::{page::Pagination, pet::Pet, post::Post, user::User};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Deserialize, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Users,
    Pets,
    Posts,
    #[default]
    All,
}

impl SearchKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SearchKind::Users => "users",
            SearchKind::Pets => "pets",
            SearchKind::Posts => "posts",
            SearchKind::All => "all",
        }
    }
}

impl Display for SearchKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct SearchQuery {
    pub query: String,
    pub kind: Option<SearchKind>,
    pub page: u32,
    pub limit: u32,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchResults {
    pub users: Vec<User>,
    pub pets: Vec<Pet>,
    pub posts: Vec<Post>,
    pub pagination: Pagination,
}
