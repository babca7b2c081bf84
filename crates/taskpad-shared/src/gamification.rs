use chrono::NaiveDate;
use tracing::debug;

use crate::datetime::display_date;

pub const POINTS_PER_COMPLETION: u64 =
  10;

/// Points and day streak earned by
/// completing tasks.
///
/// Neither counter ever decreases:
/// reopening a task keeps its points and
/// a missed day does not reset the
/// streak.
#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct Gamification {
  pub points:              u64,
  pub streak:              u64,
  pub last_completed_date:
    Option<String>
}

impl Gamification {
  pub fn award_completion(&mut self) {
    self.points = self
      .points
      .saturating_add(
        POINTS_PER_COMPLETION
      );
    debug!(
      points = self.points,
      "awarded completion points"
    );
  }

  /// Bumps the streak the first time it
  /// is called on a given calendar day.
  /// Returns whether it moved.
  pub fn advance_streak(
    &mut self,
    today: NaiveDate
  ) -> bool {
    let today = display_date(today);
    if self
      .last_completed_date
      .as_deref()
      == Some(today.as_str())
    {
      return false;
    }

    self.streak =
      self.streak.saturating_add(1);
    debug!(
      streak = self.streak,
      day = %today,
      "advanced streak"
    );
    self.last_completed_date =
      Some(today);
    true
  }

  /// Bookkeeping for one
  /// incomplete-to-complete transition.
  pub fn record_completion(
    &mut self,
    today: NaiveDate
  ) {
    self.award_completion();
    self.advance_streak(today);
  }

  #[must_use]
  pub fn points_text(&self) -> String {
    format!(
      "🏆 Points: {}",
      self.points
    )
  }

  #[must_use]
  pub fn streak_text(&self) -> String {
    format!(
      "🔥 Streak: {} days",
      self.streak
    )
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::Gamification;

  fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, d)
      .unwrap()
  }

  #[test]
  fn two_completions_award_twenty() {
    let mut game =
      Gamification::default();
    game.award_completion();
    game.award_completion();
    assert_eq!(game.points, 20);
  }

  #[test]
  fn streak_counts_once_per_day() {
    let mut game =
      Gamification::default();
    assert!(game.advance_streak(day(16)));
    assert!(
      !game.advance_streak(day(16))
    );
    assert_eq!(game.streak, 1);
    assert_eq!(
      game.last_completed_date.as_deref(),
      Some("Mon Feb 16 2026")
    );

    assert!(game.advance_streak(day(17)));
    assert_eq!(game.streak, 2);
  }

  #[test]
  fn missed_days_do_not_reset() {
    let mut game = Gamification {
      points:              0,
      streak:              4,
      last_completed_date: Some(
        "Mon Feb 02 2026".to_string()
      )
    };
    game.record_completion(day(16));
    assert_eq!(game.streak, 5);
    assert_eq!(game.points, 10);
  }

  #[test]
  fn standing_texts() {
    let game = Gamification {
      points:              30,
      streak:              2,
      last_completed_date: None
    };
    assert_eq!(
      game.points_text(),
      "🏆 Points: 30"
    );
    assert_eq!(
      game.streak_text(),
      "🔥 Streak: 2 days"
    );
  }
}
