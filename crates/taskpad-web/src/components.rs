mod add_task_modal;
mod dashboard_summary;
mod progress_panel;
mod sidebar;
mod task_list;
mod task_list_row;

pub use add_task_modal::AddTaskModal;
pub use dashboard_summary::DashboardSummaryCard;
pub use progress_panel::ProgressPanel;
pub use sidebar::Sidebar;
pub use task_list::TaskList;
pub use task_list_row::TaskListRow;
