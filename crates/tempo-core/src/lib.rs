pub mod binding;
pub mod category;
pub mod cli;
pub mod config;
pub mod error;
pub mod group;
pub mod registry;
pub mod render;
pub mod replay;
pub mod resolver;
pub mod session;
pub mod store;
pub mod task;
pub mod view;
pub mod view_model;

use std::ffi::OsString;
use std::io::{
  self,
  Write
};
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing::{
  debug,
  info
};

pub use crate::binding::{
  BindingGeneration,
  Lookup,
  RegistryBindingPoint
};
pub use crate::category::{
  CategoryKey,
  DEFAULT_BUCKET,
  normalize
};
pub use crate::error::CollapseError;
pub use crate::registry::CollapseRegistry;
pub use crate::resolver::VisibilityResolver;
pub use crate::view::ViewId;
pub use crate::view_model::TaskListsViewModel;

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let pre =
    cli::preprocess_args(&raw_args)?;
  let cli = cli::GlobalCli::parse_from(
    pre.cleaned_args
  );

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting tempo CLI"
  );
  debug!(?pre.rc_overrides, "preprocessed rc overrides");

  let mut cfg = config::Config::load(
    cli.config.as_deref()
  )?;
  cfg.apply_overrides(
    pre.rc_overrides.into_iter().chain(
      cli
        .rc_overrides
        .into_iter()
        .map(|kv| (kv.key, kv.value))
    )
  );

  let renderer =
    render::Renderer::new(&cfg)?;

  match cli.command.unwrap_or_else(
    || {
      cli::Command::Show(
        cli::ShowArgs::default()
      )
    }
  ) {
    | cli::Command::Show(args) => {
      run_show(
        &cfg,
        &renderer,
        args,
        io::stdout().lock()
      )?
    }
    | cli::Command::Replay(args) => {
      run_replay(&cfg, &renderer, args)?
    }
  }

  info!("done");
  Ok(())
}

fn open_session(
  cfg: &config::Config,
  tasks_override: Option<&Path>
) -> anyhow::Result<session::Session> {
  let path = match tasks_override {
    | Some(path) => {
      config::expand_tilde(path)
    }
    | None => cfg.tasks_file()?
  };
  let tasks = store::load_tasks(&path)
    .with_context(|| {
      format!(
        "failed to load tasks from {}",
        path.display()
      )
    })?;
  Ok(session::Session::new(tasks))
}

#[tracing::instrument(skip(
  cfg, renderer, out
))]
fn run_show<W: Write>(
  cfg: &config::Config,
  renderer: &render::Renderer,
  args: cli::ShowArgs,
  mut out: W
) -> anyhow::Result<()> {
  let selection = match args.view {
    | Some(selection) => selection,
    | None => cfg
      .get("show.view")
      .unwrap_or_else(|| {
        "all".to_string()
      })
      .parse::<cli::ViewSelection>()
      .context(
        "invalid show.view setting"
      )?
  };

  let session = open_session(
    cfg,
    args.tasks.as_deref()
  )?;

  for view in args.collapse_all {
    session.collapse_all(view);
  }
  for target in args.collapse {
    session
      .view_model()
      .set_group_collapsed(
        target.view,
        target.category.as_deref(),
        true
      );
  }

  for view in selection.views() {
    renderer.write_view(
      &mut out,
      view,
      &session.project(view)
    )?;
  }
  Ok(())
}

#[tracing::instrument(skip(
  cfg, renderer
))]
fn run_replay(
  cfg: &config::Config,
  renderer: &render::Renderer,
  args: cli::ReplayArgs
) -> anyhow::Result<()> {
  let script =
    replay::Script::load(&args.script)?;
  let session = open_session(
    cfg,
    args.tasks.as_deref()
  )?;
  replay::run_script(
    &session,
    &script,
    renderer,
    io::stdout().lock()
  )
}
