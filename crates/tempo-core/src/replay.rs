use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::{debug, info};

use crate::category::normalize;
use crate::render::Renderer;
use crate::session::Session;
use crate::view::ViewId;

#[derive(Debug, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub name: Option<String>,
    pub steps: Vec<Step>,
}

/// One scripted user interaction against the task lists.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Toggle {
        view: ViewId,
        #[serde(default)]
        category: Option<String>,
    },
    Set {
        view: ViewId,
        #[serde(default)]
        category: Option<String>,
        collapsed: bool,
    },
    CollapseAll {
        view: ViewId,
    },
    ExpandAll {
        view: ViewId,
    },
    Reset {
        #[serde(default)]
        view: Option<ViewId>,
    },
    Query {
        view: ViewId,
        #[serde(default)]
        category: Option<String>,
    },
    Show {
        #[serde(default)]
        view: Option<ViewId>,
    },
}

impl Script {
    #[tracing::instrument(skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let script: Script = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse replay script {}", path.display()))?;
        info!(name = ?script.name, steps = script.steps.len(), "loaded replay script");
        Ok(script)
    }
}

/// Applies every step in order. `query` steps write
/// `<view>\t<category>\t<visible|hidden>`; `show` steps render views.
pub fn run_script<W: Write>(
    session: &Session,
    script: &Script,
    renderer: &Renderer,
    mut out: W,
) -> anyhow::Result<()> {
    for (idx, step) in script.steps.iter().enumerate() {
        debug!(step = idx + 1, ?step, "replaying step");
        apply_step(session, step, renderer, &mut out)
            .with_context(|| format!("replay step {} failed", idx + 1))?;
    }
    Ok(())
}

fn apply_step<W: Write>(
    session: &Session,
    step: &Step,
    renderer: &Renderer,
    out: &mut W,
) -> anyhow::Result<()> {
    let vm = session.view_model();
    match step {
        Step::Toggle { view, category } => {
            vm.toggle_group(*view, category.as_deref());
        }
        Step::Set {
            view,
            category,
            collapsed,
        } => vm.set_group_collapsed(*view, category.as_deref(), *collapsed),
        Step::CollapseAll { view } => session.collapse_all(*view),
        Step::ExpandAll { view } => vm.expand_all(*view),
        Step::Reset { view: Some(view) } => vm.reset_view(*view),
        Step::Reset { view: None } => vm.reset_all(),
        Step::Query { view, category } => {
            let visible = session
                .resolver()
                .is_group_visible(*view, category.as_deref());
            writeln!(
                out,
                "{view}\t{}\t{}",
                normalize(category.as_deref()),
                if visible { "visible" } else { "hidden" }
            )?;
        }
        Step::Show { view } => {
            let views = match view {
                Some(view) => vec![*view],
                None => ViewId::ALL.to_vec(),
            };
            for view in views {
                renderer.write_view(&mut *out, view, &session.project(view))?;
            }
        }
    }
    Ok(())
}
