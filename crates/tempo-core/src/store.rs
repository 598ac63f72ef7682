use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::task::Task;

#[derive(Deserialize)]
#[serde(untagged)]
enum TaskFile {
    Bare(Vec<Task>),
    Wrapped { tasks: Vec<Task> },
}

/// Reads task records written by the desktop app. A missing file is an
/// empty task list.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_tasks(path: &Path) -> anyhow::Result<Vec<Task>> {
    if !path.exists() {
        warn!("task file does not exist; treating as empty");
        return Ok(vec![]);
    }

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if text.trim().is_empty() {
        debug!("task file is empty");
        return Ok(vec![]);
    }

    let parsed: TaskFile = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse tasks in {}", path.display()))?;
    let tasks = match parsed {
        TaskFile::Bare(tasks) => tasks,
        TaskFile::Wrapped { tasks } => tasks,
    };

    info!(count = tasks.len(), "loaded tasks");
    Ok(tasks)
}
