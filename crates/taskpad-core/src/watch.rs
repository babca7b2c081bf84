use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use taskpad_shared::Session;
use taskpad_shared::notify::{
  DeadlineNotifier,
  NotificationSink
};
use tokio::time::MissedTickBehavior;
use tracing::{
  error,
  info,
  warn
};

use crate::datastore::FileStore;
use crate::notify::TerminalNotifier;

/// Runs the deadline notifier: one scan
/// right away, then one per `interval`
/// until Ctrl-C. With `once` the loop
/// stops after the first scan.
#[tracing::instrument(skip(
  session, sink
))]
pub fn run_watch<W: Write>(
  session: &mut Session<FileStore>,
  sink: &mut TerminalNotifier<W>,
  interval: Duration,
  once: bool
) -> anyhow::Result<usize> {
  let runtime =
    tokio::runtime::Builder::new_current_thread()
      .enable_all()
      .build()
      .context(
        "failed to start watch runtime"
      )?;

  runtime.block_on(watch_loop(
    session, sink, interval, once
  ))
}

async fn watch_loop<W: Write>(
  session: &mut Session<FileStore>,
  sink: &mut TerminalNotifier<W>,
  interval: Duration,
  once: bool
) -> anyhow::Result<usize> {
  let notifier =
    DeadlineNotifier::new(interval);
  notifier.prepare(sink);

  let mut tick =
    tokio::time::interval(
      notifier.interval()
    );
  tick.set_missed_tick_behavior(
    MissedTickBehavior::Delay
  );

  info!(
    interval_secs = interval.as_secs(),
    once,
    "watching deadlines"
  );

  let mut emitted = 0;
  loop {
    tokio::select! {
      _ = tick.tick() => {
        emitted += scan_once(session, &notifier, sink);
        if once {
          break;
        }
      }
      signal = tokio::signal::ctrl_c() => {
        if let Err(error) = signal {
          error!(%error, "failed waiting for ctrl_c signal");
        }
        info!("watch interrupted");
        break;
      }
    }
  }

  Ok(emitted)
}

/// Picks up edits made by other
/// invocations before scanning.
fn scan_once(
  session: &mut Session<FileStore>,
  notifier: &DeadlineNotifier,
  sink: &mut impl NotificationSink
) -> usize {
  if let Err(err) =
    session.store_mut().refresh()
  {
    warn!(error = %err, "failed to refresh store; scanning last known tasks");
  } else {
    session.reload();
  }

  notifier.scan(
    session.tasks(),
    Local::now(),
    sink
  )
}
