use tracing::debug;

use crate::task::Task;

pub const COMPLETED_LABEL: &str =
  "Completed";
pub const PENDING_LABEL: &str =
  "Pending";
pub const COMPLETED_COLOR: &str =
  "#28a745";
pub const PENDING_COLOR: &str =
  "#ff4d4d";

/// Two-segment completed/pending
/// dataset.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
)]
pub struct ChartData {
  pub completed: usize,
  pub pending:   usize
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
  pub label: &'static str,
  pub count: usize,
  pub color: &'static str
}

impl ChartData {
  /// Pending is floored at zero.
  #[must_use]
  pub fn new(
    completed: usize,
    total: usize
  ) -> Self {
    Self {
      completed,
      pending: total
        .saturating_sub(completed)
    }
  }

  #[must_use]
  pub fn from_tasks(
    tasks: &[Task]
  ) -> Self {
    let completed = tasks
      .iter()
      .filter(|task| task.completed)
      .count();
    Self::new(completed, tasks.len())
  }

  #[must_use]
  pub fn total(&self) -> usize {
    self.completed + self.pending
  }

  #[must_use]
  pub fn segments(&self) -> [Segment; 2] {
    [
      Segment {
        label: COMPLETED_LABEL,
        count: self.completed,
        color: COMPLETED_COLOR
      },
      Segment {
        label: PENDING_LABEL,
        count: self.pending,
        color: PENDING_COLOR
      }
    ]
  }

  /// Share of each segment in `[0, 1]`.
  /// Both are zero for an empty
  /// dataset.
  #[must_use]
  pub fn fractions(&self) -> [f64; 2] {
    let total = self.total();
    if total == 0 {
      return [0.0, 0.0];
    }
    let total = total as f64;
    [
      self.completed as f64 / total,
      self.pending as f64 / total
    ]
  }
}

/// Drawing capability behind a
/// [`ChartSlot`].
pub trait ChartHost {
  type Instance;

  fn create(
    &mut self,
    data: &ChartData
  ) -> anyhow::Result<Self::Instance>;

  fn destroy(
    &mut self,
    instance: Self::Instance
  );
}

/// Owns at most one live chart. Every
/// redraw tears the previous instance
/// down first.
pub struct ChartSlot<H: ChartHost> {
  host:    H,
  current: Option<H::Instance>,
  draws:   u64
}

impl<H: ChartHost> ChartSlot<H> {
  pub fn new(host: H) -> Self {
    Self {
      host,
      current: None,
      draws: 0
    }
  }

  pub fn redraw(
    &mut self,
    data: &ChartData
  ) -> anyhow::Result<()> {
    self.clear();
    let instance =
      self.host.create(data)?;
    self.current = Some(instance);
    self.draws += 1;
    debug!(
      completed = data.completed,
      pending = data.pending,
      draws = self.draws,
      "chart redrawn"
    );
    Ok(())
  }

  pub fn clear(&mut self) {
    if let Some(previous) =
      self.current.take()
    {
      self.host.destroy(previous);
    }
  }

  #[must_use]
  pub fn current(
    &self
  ) -> Option<&H::Instance> {
    self.current.as_ref()
  }

  #[must_use]
  pub fn is_live(&self) -> bool {
    self.current.is_some()
  }

  #[must_use]
  pub fn draws(&self) -> u64 {
    self.draws
  }

  pub fn host(&self) -> &H {
    &self.host
  }

  pub fn host_mut(&mut self) -> &mut H {
    &mut self.host
  }
}
