use taskpad_shared::View;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct SidebarProps {
  pub active:          View,
  pub dark_mode:       bool,
  pub on_nav:          Callback<View>,
  pub on_toggle_theme: Callback<()>
}

#[function_component(Sidebar)]
pub fn sidebar(
  props: &SidebarProps
) -> Html {
  let make_item = |view: View| {
    let class = if props.active == view {
      "item active"
    } else {
      "item"
    };
    let on_nav = props.on_nav.clone();
    html! {
        <li class={class} onclick={move |_| on_nav.emit(view)}>
            { view.label() }
        </li>
    }
  };

  let on_toggle_theme =
    props.on_toggle_theme.clone();
  let theme_label = if props.dark_mode {
    "☀️ Light Mode"
  } else {
    "🌙 Dark Mode"
  };

  html! {
      <nav class="sidebar">
          <h2 class="brand">{ "Taskpad" }</h2>
          <ul>
              { for View::ALL.into_iter().map(make_item) }
          </ul>
          <button class="theme-toggle" onclick={move |_| on_toggle_theme.emit(())}>
              { theme_label }
          </button>
      </nav>
  }
}
