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
use uuid::Uuid;

use crate::datetime::{
  deadline_suffix,
  parse_deadline
};

pub type TaskId = Uuid;

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
pub enum Priority {
  Low,
  #[default]
  Medium,
  High
}

impl Priority {
  pub const ALL: [Priority; 3] = [
    Priority::Low,
    Priority::Medium,
    Priority::High
  ];

  #[must_use]
  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Low => "low",
      | Self::Medium => "medium",
      | Self::High => "high"
    }
  }

  #[must_use]
  pub fn label(self) -> &'static str {
    match self {
      | Self::Low => "Low",
      | Self::Medium => "Medium",
      | Self::High => "High"
    }
  }

  /// Class attached to a list row.
  #[must_use]
  pub fn css_class(
    self
  ) -> &'static str {
    match self {
      | Self::Low => "priority-low",
      | Self::Medium => {
        "priority-medium"
      }
      | Self::High => "priority-high"
    }
  }
}

impl fmt::Display for Priority {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Priority {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    match s
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "low" | "l" => Ok(Self::Low),
      | "medium" | "med" | "m" => {
        Ok(Self::Medium)
      }
      | "high" | "h" => Ok(Self::High),
      | other => {
        Err(anyhow!(
          "invalid priority: {other} \
           (expected low, medium or \
           high)"
        ))
      }
    }
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Task {
  #[serde(default = "Uuid::new_v4")]
  pub id:        TaskId,
  pub text:      String,
  #[serde(
    default,
    with = "record_serde::priority"
  )]
  pub priority:  Priority,
  #[serde(
    default,
    with = "record_serde::deadline"
  )]
  pub deadline:  Option<String>,
  #[serde(default)]
  pub completed: bool
}

impl Task {
  #[must_use]
  pub fn new(
    text: String,
    priority: Priority,
    deadline: Option<String>
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      text,
      priority,
      deadline,
      completed: false
    }
  }

  #[must_use]
  pub fn deadline_at(
    &self
  ) -> Option<DateTime<Local>> {
    self
      .deadline
      .as_deref()
      .and_then(parse_deadline)
  }

  /// Incomplete with a deadline
  /// strictly before `now`.
  #[must_use]
  pub fn is_overdue(
    &self,
    now: DateTime<Local>
  ) -> bool {
    !self.completed
      && self
        .deadline_at()
        .is_some_and(|due| due < now)
  }

  /// Incomplete with a deadline at or
  /// before `now`.
  #[must_use]
  pub fn is_due(
    &self,
    now: DateTime<Local>
  ) -> bool {
    !self.completed
      && self
        .deadline_at()
        .is_some_and(|due| due <= now)
  }

  /// Text plus the formatted deadline
  /// suffix.
  #[must_use]
  pub fn label(&self) -> String {
    format!(
      "{}{}",
      self.text,
      deadline_suffix(
        self.deadline.as_deref()
      )
    )
  }
}

/// Input collected by the add form.
#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct TaskDraft {
  pub text:     String,
  pub priority: Priority,
  pub deadline: Option<String>
}

impl TaskDraft {
  #[must_use]
  pub fn new(
    text: impl Into<String>
  ) -> Self {
    Self {
      text: text.into(),
      ..Self::default()
    }
  }

  #[must_use]
  pub fn priority(
    mut self,
    priority: Priority
  ) -> Self {
    self.priority = priority;
    self
  }

  #[must_use]
  pub fn deadline(
    mut self,
    deadline: impl Into<String>
  ) -> Self {
    self.deadline =
      Some(deadline.into());
    self
  }

  /// Builds the task, or `None` when the
  /// trimmed text is empty.
  #[must_use]
  pub fn into_task(self) -> Option<Task> {
    let text = self.text.trim();
    if text.is_empty() {
      return None;
    }

    let deadline = self
      .deadline
      .map(|raw| raw.trim().to_string())
      .filter(|raw| !raw.is_empty());

    Some(Task::new(
      text.to_string(),
      self.priority,
      deadline
    ))
  }
}

mod record_serde {
  pub mod priority {
    use serde::{
      Deserialize,
      Deserializer,
      Serializer
    };

    use crate::task::Priority;

    pub fn serialize<S>(
      value: &Priority,
      serializer: S
    ) -> Result<S::Ok, S::Error>
    where
      S: Serializer
    {
      serializer
        .serialize_str(value.as_str())
    }

    pub fn deserialize<'de, D>(
      deserializer: D
    ) -> Result<Priority, D::Error>
    where
      D: Deserializer<'de>
    {
      let raw: Option<String> =
        Option::deserialize(
          deserializer
        )?;
      Ok(
        raw
          .and_then(|value| {
            value.parse().ok()
          })
          .unwrap_or_default()
      )
    }
  }

  pub mod deadline {
    use serde::{
      Deserialize,
      Deserializer,
      Serializer
    };

    pub fn serialize<S>(
      value: &Option<String>,
      serializer: S
    ) -> Result<S::Ok, S::Error>
    where
      S: Serializer
    {
      serializer.serialize_str(
        value.as_deref().unwrap_or("")
      )
    }

    pub fn deserialize<'de, D>(
      deserializer: D
    ) -> Result<Option<String>, D::Error>
    where
      D: Deserializer<'de>
    {
      let raw: Option<String> =
        Option::deserialize(
          deserializer
        )?;
      Ok(raw.filter(|value| {
        !value.trim().is_empty()
      }))
    }
  }
}
