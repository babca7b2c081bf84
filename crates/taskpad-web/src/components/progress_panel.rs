use taskpad_shared::report::ProgressReport;
use yew::{
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct ProgressPanelProps {
  pub progress:    ProgressReport,
  pub points_text: String,
  pub streak_text: String
}

#[function_component(ProgressPanel)]
pub fn progress_panel(
  props: &ProgressPanelProps
) -> Html {
  let width = format!(
    "width: {}%;",
    props.progress.percent
  );

  html! {
      <section class="progress-panel">
          <div class="progress-bar">
              <div class="progress" style={width}></div>
          </div>
          <p class="progress-text">{ props.progress.text() }</p>
          <div class="standing">
              <span class="points">{ &props.points_text }</span>
              <span class="streak">{ &props.streak_text }</span>
          </div>
      </section>
  }
}
