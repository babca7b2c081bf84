use chrono::{
  DateTime,
  Local
};

use crate::chart::ChartData;
use crate::gamification::Gamification;
use crate::report::{
  DashboardSummary,
  ProgressReport
};
use crate::task::{
  Priority,
  Task,
  TaskId
};
use crate::view::{
  Entry,
  View,
  filter_tasks
};

pub const NO_TASKS_MESSAGE: &str =
  "No tasks found";

/// One visible list row. Actions are
/// routed by `id`; `position` is the
/// index in the unfiltered store when
/// the row was built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
  pub id:        TaskId,
  pub position:  usize,
  pub text:      String,
  pub label:     String,
  pub priority:  Priority,
  pub completed: bool,
  pub overdue:   bool
}

impl TaskRow {
  #[must_use]
  pub fn from_entry(
    entry: &Entry<'_>,
    now: DateTime<Local>
  ) -> Self {
    let task = entry.task;
    Self {
      id:        task.id,
      position:  entry.position,
      text:      task.text.clone(),
      label:     task.label(),
      priority:  task.priority,
      completed: task.completed,
      overdue:   task.is_overdue(now)
    }
  }

  #[must_use]
  pub fn css_class(&self) -> String {
    let mut class = self
      .priority
      .css_class()
      .to_string();
    if self.completed {
      class.push_str(" completed");
    }
    if self.overdue {
      class.push_str(" overdue");
    }
    class
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameBody {
  Rows(Vec<TaskRow>),
  NoTasks,
  Dashboard(DashboardSummary)
}

/// Output of one refresh pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
  pub view:        View,
  pub body:        FrameBody,
  pub progress:    ProgressReport,
  pub points_text: String,
  pub streak_text: String,
  pub chart:       ChartData
}

impl Frame {
  /// Recomputes everything a front end
  /// shows from the current state.
  #[must_use]
  pub fn build(
    tasks: &[Task],
    game: &Gamification,
    view: View,
    search: &str,
    now: DateTime<Local>
  ) -> Self {
    let body = match view.list_view() {
      | None => {
        FrameBody::Dashboard(
          DashboardSummary::from_tasks(
            tasks, now
          )
        )
      }
      | Some(list_view) => {
        let rows: Vec<TaskRow> =
          filter_tasks(
            tasks, list_view, search,
            now
          )
          .iter()
          .map(|entry| {
            TaskRow::from_entry(
              entry, now
            )
          })
          .collect();
        if rows.is_empty() {
          FrameBody::NoTasks
        } else {
          FrameBody::Rows(rows)
        }
      }
    };

    Self {
      view,
      body,
      progress: ProgressReport::from_tasks(
        tasks
      ),
      points_text: game.points_text(),
      streak_text: game.streak_text(),
      chart: ChartData::from_tasks(tasks)
    }
  }

  #[must_use]
  pub fn rows(&self) -> &[TaskRow] {
    match &self.body {
      | FrameBody::Rows(rows) => {
        rows.as_slice()
      }
      | _ => &[]
    }
  }
}
