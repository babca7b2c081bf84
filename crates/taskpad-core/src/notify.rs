use std::io::Write;

use taskpad_shared::notify::{NotificationSink, Permission, Reminder};
use tracing::info;

use crate::config::Config;

/// Writes reminders as `title: body` lines. Permission follows the `notify`
/// config key and is never prompted for.
#[derive(Debug)]
pub struct TerminalNotifier<W: Write> {
    out: W,
    permission: Permission,
}

impl<W: Write> TerminalNotifier<W> {
    pub fn new(out: W, enabled: bool) -> Self {
        let permission = if enabled {
            Permission::Granted
        } else {
            Permission::Denied
        };
        Self { out, permission }
    }

    pub fn from_config(cfg: &Config, out: W) -> Self {
        Self::new(out, cfg.get_bool("notify").unwrap_or(true))
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> NotificationSink for TerminalNotifier<W> {
    fn permission(&self) -> Permission {
        self.permission
    }

    fn emit(&mut self, reminder: &Reminder) -> anyhow::Result<()> {
        info!(task = %reminder.task_id, "reminder");
        writeln!(self.out, "{}: {}", reminder.title, reminder.body)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};
    use taskpad_shared::notify::DeadlineNotifier;
    use taskpad_shared::{Priority, Task};

    use super::TerminalNotifier;

    #[test]
    fn granted_sink_prints_due_reminders() {
        let now = Local.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        let tasks = vec![
            Task::new(
                "Pay rent".to_string(),
                Priority::High,
                Some("2026-10-19T08:00".to_string()),
            ),
            Task::new(
                "Call mom".to_string(),
                Priority::Low,
                Some("2026-10-20T08:00".to_string()),
            ),
        ];

        let notifier = DeadlineNotifier::default();
        let mut sink = TerminalNotifier::new(Vec::new(), true);
        assert_eq!(notifier.scan(&tasks, now, &mut sink), 1);
        let printed = String::from_utf8(sink.into_inner()).expect("utf8");
        assert_eq!(printed, "⏰ Task Reminder: Pay rent is due now!\n");

        let mut muted = TerminalNotifier::new(Vec::new(), false);
        assert_eq!(notifier.scan(&tasks, now, &mut muted), 0);
        assert!(muted.into_inner().is_empty());
    }
}
