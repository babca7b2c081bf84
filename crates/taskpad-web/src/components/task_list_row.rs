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

#[derive(Properties, PartialEq)]
pub struct TaskListRowProps {
  pub row:       TaskRow,
  pub on_toggle: Callback<TaskId>,
  pub on_delete: Callback<TaskId>
}

#[function_component(TaskListRow)]
pub fn task_list_row(
  props: &TaskListRowProps
) -> Html {
  let id = props.row.id;
  let on_toggle =
    props.on_toggle.clone();
  let on_delete =
    props.on_delete.clone();
  let label_class =
    if props.row.completed {
      "label done"
    } else {
      "label"
    };

  html! {
      <li class={props.row.css_class()}>
          <div class="left">
              <input
                  type="checkbox"
                  checked={props.row.completed}
                  onchange={move |_| on_toggle.emit(id)}
              />
              <span class={label_class}>{ &props.row.label }</span>
          </div>
          <div class="actions">
              <button
                  class="delete"
                  title="Delete task"
                  onclick={move |_| on_delete.emit(id)}
              >
                  { "❌" }
              </button>
          </div>
      </li>
  }
}
