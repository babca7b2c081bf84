mod chart;
mod confetti;
mod notify;
mod storage;

use std::cell::RefCell;

use chrono::Local;
use gloo::timers::callback::Interval;
use taskpad_shared::chart::{
  ChartData,
  ChartSlot
};
use taskpad_shared::datetime::display_date;
use taskpad_shared::notify::DeadlineNotifier;
use taskpad_shared::{
  FrameBody,
  Session,
  TaskDraft,
  TaskId,
  View,
  quotes
};
use web_sys::{
  HtmlCanvasElement,
  HtmlInputElement
};
use yew::{
  Callback,
  Html,
  NodeRef,
  TargetCast,
  function_component,
  html,
  use_effect,
  use_effect_with,
  use_force_update,
  use_memo,
  use_mut_ref,
  use_node_ref,
  use_state
};

use self::chart::CanvasChart;
use self::confetti::Confetti;
use self::notify::BrowserNotifier;
use self::storage::LocalStore;
use crate::components::{
  AddTaskModal,
  DashboardSummaryCard,
  ProgressPanel,
  Sidebar,
  TaskList
};

#[function_component(App)]
pub fn app() -> Html {
  let session = use_mut_ref(|| {
    Session::open(LocalStore)
  });
  let force_update = use_force_update();
  let modal_open = use_state(|| false);
  let dark_mode = use_state(|| false);
  let chart_canvas = use_node_ref();
  let confetti_canvas = use_node_ref();
  let chart_slot = use_mut_ref(|| {
    None::<ChartSlot<CanvasChart>>
  });
  let confetti =
    use_mut_ref(|| None::<Confetti>);
  let quote = use_memo((), |_| {
    quotes::banner(random_seed())
  });

  {
    let chart_slot = chart_slot.clone();
    let chart_canvas =
      chart_canvas.clone();
    let session = session.clone();
    use_effect(move || {
      redraw_chart(
        &chart_slot,
        &chart_canvas,
        &session
      );
      || ()
    });
  }

  {
    let session = session.clone();
    use_effect_with((), move |_| {
      let notifier =
        DeadlineNotifier::default();
      let mut sink = BrowserNotifier;
      notifier.prepare(&mut sink);
      notifier.scan(
        session.borrow().tasks(),
        Local::now(),
        &mut sink
      );

      let period_ms = u32::try_from(
        notifier.interval().as_millis()
      )
      .unwrap_or(u32::MAX);
      let interval =
        Interval::new(period_ms, move || {
          let mut sink = BrowserNotifier;
          notifier.scan(
            session.borrow().tasks(),
            Local::now(),
            &mut sink
          );
        });
      tracing::debug!(
        period_ms,
        "deadline notifier started"
      );

      move || drop(interval)
    });
  }

  use_effect_with(
    *dark_mode,
    move |dark| {
      apply_theme(*dark);
      || ()
    }
  );

  let on_nav = {
    let session = session.clone();
    let force_update =
      force_update.clone();
    Callback::from(move |view: View| {
      session.borrow_mut().set_view(view);
      force_update.force_update();
    })
  };

  let on_search = {
    let session = session.clone();
    let force_update =
      force_update.clone();
    Callback::from(
      move |e: yew::InputEvent| {
        let input: HtmlInputElement =
          e.target_unchecked_into();
        session
          .borrow_mut()
          .set_search(input.value());
        force_update.force_update();
      }
    )
  };

  let on_toggle = {
    let session = session.clone();
    let force_update =
      force_update.clone();
    let confetti = confetti.clone();
    let confetti_canvas =
      confetti_canvas.clone();
    Callback::from(move |id: TaskId| {
      let outcome = session
        .borrow_mut()
        .toggle_task(id, Local::now());
      match outcome {
        | Ok(outcome)
          if outcome.celebrates() =>
        {
          if let Some(canvas) =
            confetti_canvas
              .cast::<HtmlCanvasElement>()
            && let Err(error) =
              confetti::launch(
                &confetti,
                &canvas,
                random_seed()
              )
          {
            tracing::warn!(%error, "confetti unavailable");
          }
        }
        | Ok(_) => {}
        | Err(error) => {
          tracing::error!(%error, "failed to save toggled task");
        }
      }
      force_update.force_update();
    })
  };

  let on_delete = {
    let session = session.clone();
    let force_update =
      force_update.clone();
    Callback::from(move |id: TaskId| {
      if let Err(error) =
        session.borrow_mut().delete_task(id)
      {
        tracing::error!(%error, "failed to save after delete");
      }
      force_update.force_update();
    })
  };

  let on_save = {
    let session = session.clone();
    let force_update =
      force_update.clone();
    let modal_open = modal_open.clone();
    Callback::from(
      move |draft: TaskDraft| {
        if let Err(error) =
          session.borrow_mut().add_task(draft)
        {
          tracing::error!(%error, "failed to save new task");
        }
        modal_open.set(false);
        force_update.force_update();
      }
    )
  };

  let on_open_modal = {
    let modal_open = modal_open.clone();
    Callback::from(
      move |_: yew::MouseEvent| {
        modal_open.set(true)
      }
    )
  };

  let on_close_modal = {
    let modal_open = modal_open.clone();
    Callback::from(move |()| {
      modal_open.set(false)
    })
  };

  let on_toggle_theme = {
    let dark_mode = dark_mode.clone();
    Callback::from(move |()| {
      dark_mode.set(!*dark_mode)
    })
  };

  let (frame, search) = {
    let session = session.borrow();
    (
      session.frame(Local::now()),
      session.search().to_string()
    )
  };
  let today =
    display_date(Local::now().date_naive());

  let body = match frame.body {
    | FrameBody::Dashboard(summary) => {
      html! { <DashboardSummaryCard summary={summary} /> }
    }
    | FrameBody::Rows(rows) => {
      html! {
          <TaskList rows={rows} on_toggle={on_toggle} on_delete={on_delete} />
      }
    }
    | FrameBody::NoTasks => {
      html! {
          <TaskList rows={Vec::new()} on_toggle={on_toggle} on_delete={on_delete} />
      }
    }
  };

  html! {
      <div class="app">
          <Sidebar
              active={frame.view}
              dark_mode={*dark_mode}
              on_nav={on_nav}
              on_toggle_theme={on_toggle_theme}
          />
          <main class="content">
              <header class="topbar">
                  <div class="greeting">
                      <h1 class="current-date">{ today }</h1>
                      <p class="quote">{ (*quote).clone() }</p>
                  </div>
                  <div class="controls">
                      <input
                          type="search"
                          placeholder="Search tasks..."
                          value={search}
                          oninput={on_search}
                      />
                      <button class="primary" onclick={on_open_modal}>
                          { "+ Add Task" }
                      </button>
                  </div>
              </header>
              <ProgressPanel
                  progress={frame.progress}
                  points_text={frame.points_text}
                  streak_text={frame.streak_text}
              />
              <section class="board">
                  <div class="tasks">{ body }</div>
                  <div class="chart-card">
                      <canvas ref={chart_canvas} class="chart"></canvas>
                  </div>
              </section>
          </main>
          <AddTaskModal
              open={*modal_open}
              on_close={on_close_modal}
              on_save={on_save}
          />
          <canvas ref={confetti_canvas} class="confetti"></canvas>
      </div>
  }
}

/// Replaces the doughnut with one built
/// from the current tasks.
fn redraw_chart(
  slot: &RefCell<
    Option<ChartSlot<CanvasChart>>
  >,
  canvas_ref: &NodeRef,
  session: &RefCell<Session<LocalStore>>
) {
  let mut slot = slot.borrow_mut();
  if slot.is_none() {
    let Some(canvas) = canvas_ref
      .cast::<HtmlCanvasElement>()
    else {
      tracing::debug!(
        "chart canvas not mounted yet"
      );
      return;
    };
    *slot = Some(ChartSlot::new(
      CanvasChart::new(canvas)
    ));
  }

  let data = ChartData::from_tasks(
    session.borrow().tasks()
  );
  if let Some(slot) = slot.as_mut()
    && let Err(error) = slot.redraw(&data)
  {
    tracing::warn!(%error, "failed to draw chart");
  }
}

fn apply_theme(dark: bool) {
  let Some(body) = web_sys::window()
    .and_then(|window| window.document())
    .and_then(|document| document.body())
  else {
    return;
  };

  if let Err(error) = body
    .class_list()
    .toggle_with_force("dark-mode", dark)
  {
    tracing::warn!(error = ?error, "failed to switch theme");
  }
}

fn random_seed() -> u64 {
  (js_sys::Math::random()
    * u64::MAX as f64) as u64
}
