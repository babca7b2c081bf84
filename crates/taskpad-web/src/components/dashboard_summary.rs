use taskpad_shared::report::DashboardSummary;
use yew::{
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct DashboardSummaryProps {
  pub summary: DashboardSummary
}

#[function_component(DashboardSummaryCard)]
pub fn dashboard_summary_card(
  props: &DashboardSummaryProps
) -> Html {
  let summary = props.summary;
  let overdue_class =
    if summary.overdue_flagged() {
      "overdue-count flagged"
    } else {
      "overdue-count clear"
    };

  html! {
      <ul class="task-list">
          <li class="dashboard">
              <h3>{ "📊 Dashboard Summary" }</h3>
              <p>{ "Total Tasks: " }<strong>{ summary.total }</strong></p>
              <p>{ "Completed: " }<strong>{ summary.completed }</strong></p>
              <p>{ "Pending: " }<strong>{ summary.pending }</strong></p>
              <p>{ "Overdue: " }<strong class={overdue_class}>{ summary.overdue }</strong></p>
          </li>
      </ul>
  }
}
