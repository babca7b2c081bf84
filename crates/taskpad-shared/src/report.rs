use chrono::{
  DateTime,
  Local
};

use crate::task::Task;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct ProgressReport {
  pub completed: usize,
  pub total:     usize,
  pub percent:   u8
}

impl ProgressReport {
  #[must_use]
  pub fn from_tasks(
    tasks: &[Task]
  ) -> Self {
    let completed = tasks
      .iter()
      .filter(|task| task.completed)
      .count();
    let total = tasks.len();
    Self {
      completed,
      total,
      percent: completion_percent(
        completed, total
      )
    }
  }

  #[must_use]
  pub fn pending(&self) -> usize {
    self
      .total
      .saturating_sub(self.completed)
  }

  #[must_use]
  pub fn text(&self) -> String {
    format!(
      "{}% Completed",
      self.percent
    )
  }
}

/// `completed / total` as a rounded
/// percentage; 0 for an empty store.
#[must_use]
pub fn completion_percent(
  completed: usize,
  total: usize
) -> u8 {
  if total == 0 {
    return 0;
  }
  let completed = completed.min(total);
  let rounded =
    (completed * 200 + total)
      / (2 * total);
  u8::try_from(rounded).unwrap_or(100)
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct DashboardSummary {
  pub total:     usize,
  pub completed: usize,
  pub pending:   usize,
  pub overdue:   usize
}

impl DashboardSummary {
  #[must_use]
  pub fn from_tasks(
    tasks: &[Task],
    now: DateTime<Local>
  ) -> Self {
    let total = tasks.len();
    let completed = tasks
      .iter()
      .filter(|task| task.completed)
      .count();
    let overdue = tasks
      .iter()
      .filter(|task| task.is_overdue(now))
      .count();
    Self {
      total,
      completed,
      pending: total - completed,
      overdue
    }
  }

  /// Overdue is highlighted whenever it
  /// is nonzero.
  #[must_use]
  pub fn overdue_flagged(&self) -> bool {
    self.overdue > 0
  }
}
