pub mod cli;
pub mod commands;
pub mod confetti;
pub mod config;
pub mod datastore;
pub mod notify;
pub mod render;
pub mod watch;

use std::ffi::OsString;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use taskpad_shared::Session;
use tracing::{
  debug,
  info
};

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
    "starting taskpad"
  );
  debug!(?pre.rc_overrides, "preprocessed rc overrides");

  let mut cfg = config::Config::load(
    cli.taskpadrc.as_deref()
  )?;
  cfg.apply_overrides(
    pre.rc_overrides.into_iter().chain(
      cli
        .rc_overrides
        .into_iter()
        .map(|kv| (kv.key, kv.value))
    )
  );

  let data_dir =
    config::resolve_data_dir(
      &cfg,
      cli.data.as_deref()
    )
    .context(
      "failed to resolve data \
       directory"
    )?;

  let store =
    datastore::FileStore::open(
      &data_dir
    )
    .with_context(|| {
      format!(
        "failed to open store at {}",
        data_dir.display()
      )
    })?;

  let mut session = Session::open(store);
  session.set_view(cfg.default_view());

  let mut renderer =
    render::Renderer::new(&cfg)?;
  let command = cli.command.unwrap_or(
    cli::Command::List {
      view:   None,
      search: None
    }
  );

  commands::dispatch(
    &mut session,
    &cfg,
    &mut renderer,
    command,
    Local::now()
  )?;

  info!("done");
  Ok(())
}
