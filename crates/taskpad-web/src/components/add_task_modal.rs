use taskpad_shared::{
  Priority,
  TaskDraft
};
use web_sys::{
  HtmlInputElement,
  HtmlSelectElement
};
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html,
  use_state
};

#[derive(Properties, PartialEq)]
pub struct AddTaskModalProps {
  pub open:     bool,
  pub on_close: Callback<()>,
  pub on_save:  Callback<TaskDraft>
}

/// Text, priority and deadline form.
/// Blank text keeps the modal open;
/// saving clears text and deadline.
#[function_component(AddTaskModal)]
pub fn add_task_modal(
  props: &AddTaskModalProps
) -> Html {
  let text = use_state(String::new);
  let priority =
    use_state(Priority::default);
  let deadline = use_state(String::new);

  if !props.open {
    return html! {};
  }

  let on_text = {
    let text = text.clone();
    Callback::from(
      move |e: yew::InputEvent| {
        let input: HtmlInputElement =
          e.target_unchecked_into();
        text.set(input.value());
      }
    )
  };

  let on_priority = {
    let priority = priority.clone();
    Callback::from(
      move |e: yew::Event| {
        let select: HtmlSelectElement =
          e.target_unchecked_into();
        match select.value().parse() {
          | Ok(value) => priority.set(value),
          | Err(err) => {
            tracing::warn!(error = %err, "ignoring unknown priority");
          }
        }
      }
    )
  };

  let on_deadline = {
    let deadline = deadline.clone();
    Callback::from(
      move |e: yew::InputEvent| {
        let input: HtmlInputElement =
          e.target_unchecked_into();
        deadline.set(input.value());
      }
    )
  };

  let on_save = {
    let text = text.clone();
    let priority = priority.clone();
    let deadline = deadline.clone();
    let on_save = props.on_save.clone();
    Callback::from(move |_: yew::MouseEvent| {
      if text.trim().is_empty() {
        return;
      }
      let mut draft =
        TaskDraft::new((*text).clone())
          .priority(*priority);
      if !deadline.is_empty() {
        draft = draft
          .deadline((*deadline).clone());
      }
      on_save.emit(draft);
      text.set(String::new());
      deadline.set(String::new());
    })
  };

  let on_close = props.on_close.clone();

  html! {
      <div class="modal">
          <div class="modal-content">
              <h3>{ "Add Task" }</h3>
              <input
                  type="text"
                  placeholder="Task description"
                  value={(*text).clone()}
                  oninput={on_text}
              />
              <select onchange={on_priority}>
                  {
                      for Priority::ALL.into_iter().map(|option| html! {
                          <option
                              value={option.as_str()}
                              selected={option == *priority}
                          >
                              { option.label() }
                          </option>
                      })
                  }
              </select>
              <input
                  type="datetime-local"
                  value={(*deadline).clone()}
                  oninput={on_deadline}
              />
              <div class="modal-actions">
                  <button class="primary" onclick={on_save}>{ "Save" }</button>
                  <button onclick={move |_| on_close.emit(())}>{ "Cancel" }</button>
              </div>
          </div>
      </div>
  }
}
