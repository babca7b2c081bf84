use chrono::{
  DateTime,
  Local
};
use tracing::{
  debug,
  info,
  instrument
};

use crate::frame::Frame;
use crate::gamification::Gamification;
use crate::storage::{
  KeyValueStore,
  load_gamification,
  load_tasks,
  save_state
};
use crate::task::{
  Task,
  TaskDraft,
  TaskId
};
use crate::view::View;

/// Result of toggling a task.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Toggle {
  Completed,
  Reopened,
  Missing
}

impl Toggle {
  /// Only a transition to completed
  /// plays the celebration.
  #[must_use]
  pub fn celebrates(self) -> bool {
    self == Self::Completed
  }
}

/// The running session: task list,
/// gamification counters and the active
/// view, mirrored into `S` after every
/// mutation.
#[derive(Debug)]
pub struct Session<S: KeyValueStore> {
  store:  S,
  tasks:  Vec<Task>,
  game:   Gamification,
  view:   View,
  search: String
}

impl<S: KeyValueStore> Session<S> {
  #[instrument(skip_all)]
  pub fn open(store: S) -> Self {
    let tasks = load_tasks(&store);
    let game = load_gamification(&store);
    info!(
      tasks = tasks.len(),
      points = game.points,
      streak = game.streak,
      "session opened"
    );
    Self {
      store,
      tasks,
      game,
      view: View::default(),
      search: String::new()
    }
  }

  /// Re-reads tasks and counters from
  /// the store, keeping view and search.
  pub fn reload(&mut self) {
    self.tasks = load_tasks(&self.store);
    self.game =
      load_gamification(&self.store);
  }

  #[must_use]
  pub fn tasks(&self) -> &[Task] {
    &self.tasks
  }

  #[must_use]
  pub fn gamification(
    &self
  ) -> &Gamification {
    &self.game
  }

  #[must_use]
  pub fn view(&self) -> View {
    self.view
  }

  #[must_use]
  pub fn search(&self) -> &str {
    &self.search
  }

  #[must_use]
  pub fn store(&self) -> &S {
    &self.store
  }

  pub fn store_mut(&mut self) -> &mut S {
    &mut self.store
  }

  pub fn into_store(self) -> S {
    self.store
  }

  pub fn set_view(&mut self, view: View) {
    debug!(%view, "view selected");
    self.view = view;
  }

  pub fn set_search(
    &mut self,
    text: impl Into<String>
  ) {
    self.search = text.into();
  }

  #[must_use]
  pub fn position_of(
    &self,
    id: TaskId
  ) -> Option<usize> {
    self
      .tasks
      .iter()
      .position(|task| task.id == id)
  }

  /// Appends a task. Blank text is
  /// ignored and yields `None`.
  #[instrument(skip(self, draft))]
  pub fn add_task(
    &mut self,
    draft: TaskDraft
  ) -> anyhow::Result<Option<TaskId>> {
    let Some(task) = draft.into_task()
    else {
      debug!("blank task text ignored");
      return Ok(None);
    };

    let id = task.id;
    info!(%id, priority = %task.priority, "adding task");
    self.tasks.push(task);
    self.save()?;
    Ok(Some(id))
  }

  /// Flips completion. Completing awards
  /// points and advances the streak for
  /// `now`'s calendar day; reopening
  /// changes neither.
  #[instrument(skip(self, now))]
  pub fn toggle_task(
    &mut self,
    id: TaskId,
    now: DateTime<Local>
  ) -> anyhow::Result<Toggle> {
    let Some(task) = self
      .tasks
      .iter_mut()
      .find(|task| task.id == id)
    else {
      debug!("toggle of unknown task ignored");
      return Ok(Toggle::Missing);
    };

    task.completed = !task.completed;
    let outcome = if task.completed {
      self
        .game
        .record_completion(
          now.date_naive()
        );
      Toggle::Completed
    } else {
      Toggle::Reopened
    };

    info!(
      ?outcome,
      points = self.game.points,
      streak = self.game.streak,
      "task toggled"
    );
    self.save()?;
    Ok(outcome)
  }

  /// Removes a task. Returns whether
  /// anything was removed.
  #[instrument(skip(self))]
  pub fn delete_task(
    &mut self,
    id: TaskId
  ) -> anyhow::Result<bool> {
    let Some(position) =
      self.position_of(id)
    else {
      debug!("delete of unknown task ignored");
      return Ok(false);
    };

    let removed =
      self.tasks.remove(position);
    info!(position, text = %removed.text, "task deleted");
    self.save()?;
    Ok(true)
  }

  pub fn save(
    &mut self
  ) -> anyhow::Result<()> {
    save_state(
      &mut self.store,
      &self.tasks,
      &self.game
    )
  }

  /// Runs the refresh computation for
  /// the active view and search.
  #[must_use]
  pub fn frame(
    &self,
    now: DateTime<Local>
  ) -> Frame {
    Frame::build(
      &self.tasks,
      &self.game,
      self.view,
      &self.search,
      now
    )
  }
}

#[cfg(test)]
mod tests {
  use chrono::{
    Duration,
    Local,
    TimeZone
  };
  use rand::rngs::SmallRng;
  use rand::{
    Rng,
    SeedableRng
  };

  use super::*;
  use crate::frame::FrameBody;
  use crate::storage::{
    MemoryStore,
    POINTS_KEY,
    TASKS_KEY
  };
  use crate::task::Priority;

  fn now() -> DateTime<Local> {
    Local
      .with_ymd_and_hms(
        2026, 2, 16, 9, 0, 0
      )
      .unwrap()
  }

  fn session_with(
    texts: &[&str]
  ) -> Session<MemoryStore> {
    let mut session =
      Session::open(MemoryStore::new());
    for text in texts {
      session
        .add_task(TaskDraft::new(*text))
        .unwrap();
    }
    session
  }

  #[test]
  fn completing_buy_milk() {
    let mut session = Session::open(
      MemoryStore::new()
    );
    let id = session
      .add_task(
        TaskDraft::new("Buy milk")
          .priority(Priority::Low)
      )
      .unwrap()
      .unwrap();

    let outcome =
      session.toggle_task(id, now()).unwrap();
    assert!(outcome.celebrates());
    assert_eq!(
      session.gamification().points,
      10
    );
    assert_eq!(
      session.gamification().streak,
      1
    );
    assert_eq!(
      session.frame(now()).progress.percent,
      100
    );
  }

  #[test]
  fn unreadable_record_does_not_erase_the_rest() {
    let store =
      MemoryStore::with_entries([(
        TASKS_KEY,
        r#"[{"text":"Keep me","priority":"low","deadline":"","completed":false},{"priority":"low","deadline":"","completed":false}]"#
      )]);
    let mut session = Session::open(store);
    assert_eq!(session.tasks().len(), 1);

    session
      .add_task(TaskDraft::new("new"))
      .unwrap();

    let stored = session
      .store()
      .get_item(TASKS_KEY)
      .unwrap()
      .unwrap();
    assert!(stored.contains("Keep me"));
    assert!(stored.contains("\"new\""));
  }

  #[test]
  fn reopening_keeps_points() {
    let mut session =
      session_with(&["a", "b"]);
    let a = session.tasks()[0].id;
    let b = session.tasks()[1].id;

    session.toggle_task(a, now()).unwrap();
    assert_eq!(
      session.toggle_task(a, now()).unwrap(),
      Toggle::Reopened
    );
    assert_eq!(
      session.gamification().points,
      10
    );

    session.toggle_task(b, now()).unwrap();
    assert_eq!(
      session.gamification().points,
      20
    );
    assert_eq!(
      session.gamification().streak,
      1
    );

    session
      .toggle_task(a, now() + Duration::days(1))
      .unwrap();
    assert_eq!(
      session.gamification().streak,
      2
    );
  }

  #[test]
  fn blank_text_is_silently_rejected() {
    let mut session = session_with(&[]);
    assert_eq!(
      session
        .add_task(TaskDraft::new("  \t"))
        .unwrap(),
      None
    );
    assert!(session.tasks().is_empty());
    assert_eq!(
      session
        .store()
        .get_item(TASKS_KEY)
        .unwrap(),
      None
    );
  }

  #[test]
  fn delete_shifts_later_positions() {
    let mut session =
      session_with(&["a", "b", "c", "d"]);
    let c = session.tasks()[2].id;
    let d = session.tasks()[3].id;
    let b = session.tasks()[1].id;

    assert!(session.delete_task(b).unwrap());
    assert_eq!(session.position_of(c), Some(1));
    assert_eq!(session.position_of(d), Some(2));
    assert!(!session.delete_task(b).unwrap());
    assert_eq!(
      session.toggle_task(b, now()).unwrap(),
      Toggle::Missing
    );
  }

  #[test]
  fn filtered_toggle_hits_the_same_record()
   {
    let mut session = session_with(&[
      "Walk dog",
      "Buy milk",
      "Buy bread"
    ]);
    session.set_search("bread");
    let frame = session.frame(now());
    let row = &frame.rows()[0];
    assert_eq!(row.position, 2);

    session.toggle_task(row.id, now()).unwrap();
    assert!(session.tasks()[2].completed);
    assert!(!session.tasks()[0].completed);
    assert!(!session.tasks()[1].completed);
  }

  #[test]
  fn reopen_round_trips_state() {
    let mut session =
      session_with(&["Buy milk", "Walk dog"]);
    let id = session.tasks()[1].id;
    session.toggle_task(id, now()).unwrap();
    let tasks = session.tasks().to_vec();
    let game = session.gamification().clone();

    let reopened =
      Session::open(session.into_store());
    assert_eq!(reopened.tasks(), tasks);
    assert_eq!(reopened.gamification(), &game);
    assert_eq!(
      reopened
        .store()
        .get_item(POINTS_KEY)
        .unwrap()
        .as_deref(),
      Some("10")
    );
  }

  #[test]
  fn counts_stay_consistent_under_random_edits()
   {
    let mut rng = SmallRng::seed_from_u64(11);
    let mut session = session_with(&[]);
    let mut clock = now();

    for step in 0..300 {
      let len = session.tasks().len();
      match rng.random_range(0..3) {
        | 0 => {
          session
            .add_task(TaskDraft::new(format!(
              "task {step}"
            )))
            .unwrap();
        }
        | 1 if len > 0 => {
          let id = session.tasks()
            [rng.random_range(0..len)]
          .id;
          session.toggle_task(id, clock).unwrap();
        }
        | 2 if len > 0 => {
          let id = session.tasks()
            [rng.random_range(0..len)]
          .id;
          session.delete_task(id).unwrap();
        }
        | _ => {}
      }
      clock += Duration::hours(5);

      session.set_view(View::Dashboard);
      let frame = session.frame(clock);
      let FrameBody::Dashboard(summary) =
        frame.body
      else {
        panic!("dashboard view must report");
      };
      assert_eq!(
        summary.completed + summary.pending,
        summary.total
      );
      assert_eq!(
        frame.chart.completed
          + frame.chart.pending,
        summary.total
      );
      assert!(frame.progress.percent <= 100);
      session.set_view(View::All);
    }
  }
}
