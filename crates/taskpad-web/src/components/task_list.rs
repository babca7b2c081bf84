use taskpad_shared::frame::NO_TASKS_MESSAGE;
use taskpad_shared::{
  TaskId,
  TaskRow
};
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

use super::TaskListRow;

#[derive(Properties, PartialEq)]
pub struct TaskListProps {
  pub rows:      Vec<TaskRow>,
  pub on_toggle: Callback<TaskId>,
  pub on_delete: Callback<TaskId>
}

#[function_component(TaskList)]
pub fn task_list(
  props: &TaskListProps
) -> Html {
  if props.rows.is_empty() {
    return html! {
        <ul class="task-list">
            <li class="empty">{ NO_TASKS_MESSAGE }</li>
        </ul>
    };
  }

  html! {
      <ul class="task-list">
          {
              for props.rows.iter().cloned().map(|row| html! {
                  <TaskListRow
                      key={row.id.to_string()}
                      row={row.clone()}
                      on_toggle={props.on_toggle.clone()}
                      on_delete={props.on_delete.clone()}
                  />
              })
          }
      </ul>
  }
}
