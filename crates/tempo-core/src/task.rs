use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::{CategoryKey, normalize};
use crate::view::ViewId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Waiting,
    Completed,
}

/// The slice of a task record the grouping code reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    #[serde(default = "Uuid::new_v4")]
    pub uuid: Uuid,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub category: Option<String>,

    pub status: Status,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Task {
    pub fn new(title: impl Into<String>, category: Option<&str>, status: Status) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            title: title.into(),
            category: category.map(str::to_string),
            status,
            extra: BTreeMap::new(),
        }
    }

    /// The list this task shows up in.
    pub fn view(&self) -> ViewId {
        match self.status {
            Status::Pending => ViewId::Default,
            Status::Waiting => ViewId::Waiting,
            Status::Completed => ViewId::Completed,
        }
    }

    pub fn category_key(&self) -> CategoryKey {
        normalize(self.category.as_deref())
    }
}
