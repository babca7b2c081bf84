use std::collections::BTreeMap;

use anyhow::Context;
use tracing::{
  debug,
  instrument,
  warn
};

use crate::gamification::Gamification;
use crate::task::Task;

pub const TASKS_KEY: &str = "tasks";
pub const POINTS_KEY: &str = "points";
pub const STREAK_KEY: &str = "streak";
pub const LAST_COMPLETED_DATE_KEY:
  &str = "lastCompletedDate";

/// String-keyed persistent store with
/// browser local storage semantics.
pub trait KeyValueStore {
  fn get_item(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>>;

  fn set_item(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()>;

  /// Writes several entries. Stores that
  /// can batch a write override this.
  fn set_items(
    &mut self,
    entries: &[(&str, String)]
  ) -> anyhow::Result<()> {
    for (key, value) in entries {
      self.set_item(key, value)?;
    }
    Ok(())
  }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  entries: BTreeMap<String, String>
}

impl MemoryStore {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  #[must_use]
  pub fn with_entries<I, K, V>(
    entries: I
  ) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>
  {
    Self {
      entries: entries
        .into_iter()
        .map(|(k, v)| {
          (k.into(), v.into())
        })
        .collect()
    }
  }
}

impl KeyValueStore for MemoryStore {
  fn get_item(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    Ok(self.entries.get(key).cloned())
  }

  fn set_item(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    self.entries.insert(
      key.to_string(),
      value.to_string()
    );
    Ok(())
  }
}

/// Loads the task sequence. A missing or
/// non-array entry yields an empty list;
/// unreadable records are skipped.
#[instrument(skip(store))]
pub fn load_tasks(
  store: &impl KeyValueStore
) -> Vec<Task> {
  let Some(raw) =
    read_entry(store, TASKS_KEY)
  else {
    return Vec::new();
  };

  let records = match serde_json::from_str::<
    Option<Vec<serde_json::Value>>
  >(&raw)
  {
    | Ok(records) => {
      records.unwrap_or_default()
    }
    | Err(err) => {
      warn!(error = %err, "stored tasks are unreadable; starting empty");
      return Vec::new();
    }
  };

  let tasks: Vec<Task> = records
    .into_iter()
    .enumerate()
    .filter_map(|(index, record)| {
      match serde_json::from_value(record)
      {
        | Ok(task) => Some(task),
        | Err(err) => {
          warn!(index, error = %err, "skipping unreadable stored task");
          None
        }
      }
    })
    .collect();
  debug!(
    count = tasks.len(),
    "loaded tasks"
  );
  tasks
}

#[instrument(skip(store))]
pub fn load_gamification(
  store: &impl KeyValueStore
) -> Gamification {
  Gamification {
    points:              read_counter(
      store, POINTS_KEY
    ),
    streak:              read_counter(
      store, STREAK_KEY
    ),
    last_completed_date: read_entry(
      store,
      LAST_COMPLETED_DATE_KEY
    )
    .filter(|raw| !raw.is_empty())
  }
}

/// Mirrors the whole session state into
/// the store.
#[instrument(skip_all, fields(tasks = tasks.len()))]
pub fn save_state(
  store: &mut impl KeyValueStore,
  tasks: &[Task],
  game: &Gamification
) -> anyhow::Result<()> {
  let serialized =
    serde_json::to_string(tasks)
      .context(
        "failed to serialize tasks"
      )?;

  let mut entries = vec![
    (TASKS_KEY, serialized),
    (
      POINTS_KEY,
      game.points.to_string()
    ),
    (
      STREAK_KEY,
      game.streak.to_string()
    ),
  ];
  if let Some(day) =
    &game.last_completed_date
  {
    entries.push((
      LAST_COMPLETED_DATE_KEY,
      day.clone()
    ));
  }

  store
    .set_items(&entries)
    .context("failed to persist state")
}

fn read_entry(
  store: &impl KeyValueStore,
  key: &str
) -> Option<String> {
  match store.get_item(key) {
    | Ok(value) => value,
    | Err(err) => {
      warn!(key, error = %err, "failed reading store entry; using default");
      None
    }
  }
}

fn read_counter(
  store: &impl KeyValueStore,
  key: &str
) -> u64 {
  let Some(raw) = read_entry(store, key)
  else {
    return 0;
  };
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return 0;
  }

  trimmed.parse().unwrap_or_else(|_| {
    warn!(key, raw = %trimmed, "stored counter is not a number; using 0");
    0
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::task::{
    Priority,
    Task
  };

  #[test]
  fn missing_entries_default() {
    let store = MemoryStore::new();
    assert!(load_tasks(&store).is_empty());
    assert_eq!(
      load_gamification(&store),
      Gamification::default()
    );
  }

  #[test]
  fn corrupt_entries_default() {
    let store =
      MemoryStore::with_entries([
        (TASKS_KEY, "{not json"),
        (POINTS_KEY, "lots"),
        (STREAK_KEY, "-3"),
        (LAST_COMPLETED_DATE_KEY, "")
      ]);
    assert!(load_tasks(&store).is_empty());
    assert_eq!(
      load_gamification(&store),
      Gamification::default()
    );
  }

  #[test]
  fn unreadable_records_are_skipped() {
    let store =
      MemoryStore::with_entries([(
        TASKS_KEY,
        r#"[{"text":"Keep me","priority":"low","deadline":"","completed":false},{"priority":"low","deadline":"","completed":false},{"text":"Odd","priority":3}]"#
      )]);
    let tasks = load_tasks(&store);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].text, "Keep me");
    assert_eq!(tasks[0].priority, Priority::Low);
  }

  #[test]
  fn non_array_tasks_entry_is_empty() {
    let store =
      MemoryStore::with_entries([(
        TASKS_KEY,
        r#"{"text":"Lonely"}"#
      )]);
    assert!(load_tasks(&store).is_empty());
  }

  #[test]
  fn null_tasks_entry_is_empty() {
    let store =
      MemoryStore::with_entries([(
        TASKS_KEY, "null"
      )]);
    assert!(load_tasks(&store).is_empty());
  }

  #[test]
  fn state_round_trips() {
    let mut done = Task::new(
      "Walk dog".to_string(),
      Priority::High,
      Some("2026-02-16T18:00".to_string())
    );
    done.completed = true;
    let tasks = vec![
      Task::new(
        "Buy milk".to_string(),
        Priority::Low,
        None
      ),
      done,
    ];
    let game = Gamification {
      points:              10,
      streak:              1,
      last_completed_date: Some(
        "Mon Feb 16 2026".to_string()
      )
    };

    let mut store = MemoryStore::new();
    save_state(&mut store, &tasks, &game)
      .unwrap();

    assert_eq!(load_tasks(&store), tasks);
    assert_eq!(
      load_gamification(&store),
      game
    );
    assert_eq!(
      store
        .get_item(POINTS_KEY)
        .unwrap()
        .as_deref(),
      Some("10")
    );
  }

  #[test]
  fn absent_last_day_is_not_written() {
    let mut store = MemoryStore::new();
    save_state(
      &mut store,
      &[],
      &Gamification::default()
    )
    .unwrap();
    assert_eq!(
      store
        .get_item(
          LAST_COMPLETED_DATE_KEY
        )
        .unwrap(),
      None
    );
    assert_eq!(
      store
        .get_item(TASKS_KEY)
        .unwrap()
        .as_deref(),
      Some("[]")
    );
  }
}
