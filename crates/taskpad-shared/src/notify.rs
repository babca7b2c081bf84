use std::time::Duration;

use chrono::{
  DateTime,
  Local
};
use tracing::{
  debug,
  info,
  instrument,
  warn
};

use crate::task::{
  Task,
  TaskId
};

pub const SCAN_INTERVAL: Duration =
  Duration::from_secs(60);
pub const REMINDER_TITLE: &str =
  "⏰ Task Reminder";

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Permission {
  Default,
  Granted,
  Denied,
  Unsupported
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct Reminder {
  pub task_id: TaskId,
  pub title:   String,
  pub body:    String
}

impl Reminder {
  #[must_use]
  pub fn for_task(task: &Task) -> Self {
    Self {
      task_id: task.id,
      title:   REMINDER_TITLE.to_string(),
      body:    format!(
        "{} is due now!",
        task.text
      )
    }
  }
}

/// Where reminders go. Only a granted
/// sink receives any.
pub trait NotificationSink {
  fn permission(&self) -> Permission;

  fn request_permission(&mut self) {}

  fn emit(
    &mut self,
    reminder: &Reminder
  ) -> anyhow::Result<()>;
}

/// One reminder per incomplete task
/// whose deadline is at or before `now`.
#[must_use]
pub fn due_reminders(
  tasks: &[Task],
  now: DateTime<Local>
) -> Vec<Reminder> {
  tasks
    .iter()
    .filter(|task| task.is_due(now))
    .map(Reminder::for_task)
    .collect()
}

#[derive(Debug, Clone, Copy)]
pub struct DeadlineNotifier {
  interval: Duration
}

impl Default for DeadlineNotifier {
  fn default() -> Self {
    Self::new(SCAN_INTERVAL)
  }
}

impl DeadlineNotifier {
  #[must_use]
  pub fn new(
    interval: Duration
  ) -> Self {
    Self {
      interval
    }
  }

  #[must_use]
  pub fn interval(&self) -> Duration {
    self.interval
  }

  /// Asks the sink for permission once,
  /// unless it already answered.
  pub fn prepare(
    &self,
    sink: &mut impl NotificationSink
  ) {
    if sink.permission()
      == Permission::Default
    {
      info!(
        "requesting notification \
         permission"
      );
      sink.request_permission();
    }
  }

  /// Runs one scan and returns how many
  /// reminders went out. Reminders are
  /// not deduplicated across scans. The
  /// task list is only read.
  #[instrument(skip(self, tasks, sink), fields(tasks = tasks.len()))]
  pub fn scan(
    &self,
    tasks: &[Task],
    now: DateTime<Local>,
    sink: &mut impl NotificationSink
  ) -> usize {
    let reminders =
      due_reminders(tasks, now);
    let permission = sink.permission();
    if permission != Permission::Granted
    {
      debug!(
        ?permission,
        due = reminders.len(),
        "notifications not permitted; \
         scan emits nothing"
      );
      return 0;
    }

    let mut emitted = 0;
    for reminder in &reminders {
      match sink.emit(reminder) {
        | Ok(()) => emitted += 1,
        | Err(err) => {
          warn!(task = %reminder.task_id, error = %err, "failed to emit reminder");
        }
      }
    }

    debug!(
      due = reminders.len(),
      emitted,
      "deadline scan finished"
    );
    emitted
  }
}

#[cfg(test)]
mod tests {
  use anyhow::anyhow;
  use chrono::{
    Local,
    TimeZone
  };

  use super::*;
  use crate::task::Priority;

  struct RecordingSink {
    permission: Permission,
    requested:  usize,
    sent:       Vec<Reminder>,
    broken:     bool
  }

  impl RecordingSink {
    fn new(permission: Permission) -> Self {
      Self {
        permission,
        requested: 0,
        sent: Vec::new(),
        broken: false
      }
    }
  }

  impl NotificationSink for RecordingSink {
    fn permission(&self) -> Permission {
      self.permission
    }

    fn request_permission(&mut self) {
      self.requested += 1;
      self.permission =
        Permission::Granted;
    }

    fn emit(
      &mut self,
      reminder: &Reminder
    ) -> anyhow::Result<()> {
      if self.broken {
        return Err(anyhow!("closed"));
      }
      self.sent.push(reminder.clone());
      Ok(())
    }
  }

  fn now() -> DateTime<Local> {
    Local
      .with_ymd_and_hms(
        2026, 2, 16, 9, 0, 0
      )
      .unwrap()
  }

  fn tasks() -> Vec<Task> {
    let mut done = Task::new(
      "Filed".to_string(),
      Priority::Low,
      Some("2020-01-01".to_string())
    );
    done.completed = true;
    vec![
      Task::new(
        "Taxes".to_string(),
        Priority::High,
        Some("2020-01-01".to_string())
      ),
      done,
      Task::new(
        "Later".to_string(),
        Priority::Low,
        Some("2026-02-16T09:30".to_string())
      ),
      Task::new(
        "Now".to_string(),
        Priority::Low,
        Some("2026-02-16T09:00".to_string())
      ),
      Task::new(
        "Broken".to_string(),
        Priority::Low,
        Some("whenever".to_string())
      ),
    ]
  }

  #[test]
  fn overdue_task_triggers_reminder() {
    let mut sink =
      RecordingSink::new(Permission::Granted);
    let notifier =
      DeadlineNotifier::default();
    let sent =
      notifier.scan(&tasks(), now(), &mut sink);
    assert_eq!(sent, 2);
    assert_eq!(
      sink.sent[0].title,
      "⏰ Task Reminder"
    );
    assert_eq!(
      sink.sent[0].body,
      "Taxes is due now!"
    );
    assert_eq!(
      sink.sent[1].body,
      "Now is due now!"
    );
  }

  #[test]
  fn every_scan_repeats_reminders() {
    let mut sink =
      RecordingSink::new(Permission::Granted);
    let notifier =
      DeadlineNotifier::default();
    let tasks = tasks();
    notifier.scan(&tasks, now(), &mut sink);
    notifier.scan(&tasks, now(), &mut sink);
    assert_eq!(sink.sent.len(), 4);
  }

  #[test]
  fn denied_permission_emits_nothing() {
    for permission in [
      Permission::Denied,
      Permission::Default,
      Permission::Unsupported
    ] {
      let mut sink =
        RecordingSink::new(permission);
      let sent = DeadlineNotifier::default()
        .scan(&tasks(), now(), &mut sink);
      assert_eq!(sent, 0);
      assert!(sink.sent.is_empty());
    }
  }

  #[test]
  fn emit_failures_do_not_stop_the_scan() {
    let mut sink =
      RecordingSink::new(Permission::Granted);
    sink.broken = true;
    let sent = DeadlineNotifier::default()
      .scan(&tasks(), now(), &mut sink);
    assert_eq!(sent, 0);
  }

  #[test]
  fn prepare_requests_only_when_undecided()
   {
    let notifier =
      DeadlineNotifier::default();

    let mut undecided =
      RecordingSink::new(Permission::Default);
    notifier.prepare(&mut undecided);
    assert_eq!(undecided.requested, 1);

    let mut denied =
      RecordingSink::new(Permission::Denied);
    notifier.prepare(&mut denied);
    assert_eq!(denied.requested, 0);
  }

  #[test]
  fn default_interval_is_one_minute() {
    assert_eq!(
      DeadlineNotifier::default()
        .interval()
        .as_secs(),
      60
    );
  }
}
