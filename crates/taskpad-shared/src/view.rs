use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{
  DateTime,
  Local
};
use serde::{
  Deserialize,
  Serialize
};
use tracing::trace;

use crate::task::Task;

/// Display mode selected by the view
/// tabs.
#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
#[serde(rename_all = "lowercase")]
pub enum View {
  #[default]
  All,
  Today,
  Upcoming,
  Completed,
  Dashboard
}

/// The views that render as a task
/// list. The dashboard never reaches
/// list filtering.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum ListView {
  All,
  Today,
  Upcoming,
  Completed
}

impl View {
  pub const ALL: [View; 5] = [
    View::All,
    View::Today,
    View::Upcoming,
    View::Completed,
    View::Dashboard
  ];

  #[must_use]
  pub fn as_str(self) -> &'static str {
    match self {
      | Self::All => "all",
      | Self::Today => "today",
      | Self::Upcoming => "upcoming",
      | Self::Completed => "completed",
      | Self::Dashboard => "dashboard"
    }
  }

  #[must_use]
  pub fn label(self) -> &'static str {
    match self {
      | Self::All => "All Tasks",
      | Self::Today => "Today",
      | Self::Upcoming => "Upcoming",
      | Self::Completed => "Completed",
      | Self::Dashboard => "Dashboard"
    }
  }

  #[must_use]
  pub fn list_view(
    self
  ) -> Option<ListView> {
    match self {
      | Self::All => Some(ListView::All),
      | Self::Today => {
        Some(ListView::Today)
      }
      | Self::Upcoming => {
        Some(ListView::Upcoming)
      }
      | Self::Completed => {
        Some(ListView::Completed)
      }
      | Self::Dashboard => None
    }
  }
}

impl fmt::Display for View {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for View {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    let wanted =
      s.trim().to_ascii_lowercase();
    View::ALL
      .into_iter()
      .find(|view| {
        view.as_str() == wanted
      })
      .ok_or_else(|| {
        anyhow!(
          "unknown view: {s} (expected \
           all, today, upcoming, \
           completed or dashboard)"
        )
      })
  }
}

impl ListView {
  #[must_use]
  pub fn admits(
    self,
    task: &Task,
    now: DateTime<Local>
  ) -> bool {
    match self {
      | Self::All => true,
      | Self::Today => {
        task.deadline_at().is_some_and(
          |due| {
            due.date_naive()
              == now.date_naive()
          }
        )
      }
      | Self::Upcoming => {
        task
          .deadline_at()
          .is_some_and(|due| due > now)
      }
      | Self::Completed => task.completed
    }
  }
}

/// A matched task and its index in the
/// unfiltered store.
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
  pub position: usize,
  pub task:     &'a Task
}

/// Applies the view, then the
/// case-insensitive search, keeping
/// store order.
#[must_use]
pub fn filter_tasks<'a>(
  tasks: &'a [Task],
  view: ListView,
  search: &str,
  now: DateTime<Local>
) -> Vec<Entry<'a>> {
  let needle =
    search.trim().to_lowercase();

  let entries: Vec<Entry<'a>> = tasks
    .iter()
    .enumerate()
    .filter(|(_, task)| {
      view.admits(task, now)
    })
    .filter(|(_, task)| {
      needle.is_empty()
        || task
          .text
          .to_lowercase()
          .contains(&needle)
    })
    .map(|(position, task)| Entry {
      position,
      task
    })
    .collect();

  trace!(
    ?view,
    search = %needle,
    matched = entries.len(),
    total = tasks.len(),
    "filtered tasks"
  );
  entries
}
