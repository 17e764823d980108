use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId {
    value: i64,
}

pub(crate) type TodoIdParseError = ParseIntError;

impl FromStr for TodoId {
    type Err = TodoIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        i64::from_str(s).map(|value| TodoId { value })
    }
}

impl From<i64> for TodoId {
    fn from(value: i64) -> Self {
        Self { value }
    }
}

impl From<TodoId> for i64 {
    fn from(id: TodoId) -> Self {
        id.value
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

#[derive(PartialEq, Eq, Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub description: String,
    pub done: bool,
}

/// Body of create and update requests. Missing keys fall back to their
/// defaults, an absent description then fails validation.
#[derive(Default, Debug, Deserialize)]
pub(crate) struct TodoParams {
    #[serde(default)]
    pub(crate) description: String,
    #[serde(default)]
    pub(crate) done: bool,
}
