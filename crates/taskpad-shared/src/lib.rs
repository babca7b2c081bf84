pub mod celebration;
pub mod chart;
pub mod datetime;
pub mod frame;
pub mod gamification;
pub mod notify;
pub mod quotes;
pub mod report;
pub mod session;
pub mod storage;
pub mod task;
pub mod view;

pub use frame::{
  Frame,
  FrameBody,
  TaskRow
};
pub use session::{
  Session,
  Toggle
};
pub use task::{
  Priority,
  Task,
  TaskDraft,
  TaskId
};
pub use view::View;
