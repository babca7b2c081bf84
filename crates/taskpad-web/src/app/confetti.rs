use std::cell::RefCell;
use std::rc::Rc;

use gloo::render::{
  AnimationFrame,
  request_animation_frame
};
use taskpad_shared::celebration::Celebration;
use web_sys::{
  CanvasRenderingContext2d,
  HtmlCanvasElement
};

use super::chart::{
  context_2d,
  js_error
};

/// A running confetti overlay. Dropping
/// it cancels the pending frame.
pub struct Confetti {
  ctx:         CanvasRenderingContext2d,
  celebration: Celebration,
  frame:       Option<AnimationFrame>
}

pub type ConfettiHandle =
  Rc<RefCell<Option<Confetti>>>;

/// Starts a burst on `canvas`, replacing
/// any playback still running in
/// `handle`.
pub fn launch(
  handle: &ConfettiHandle,
  canvas: &HtmlCanvasElement,
  seed: u64
) -> anyhow::Result<()> {
  let window = web_sys::window()
    .ok_or_else(|| {
      anyhow::anyhow!("no window")
    })?;
  let width = window
    .inner_width()
    .map_err(js_error)?
    .as_f64()
    .unwrap_or_default();
  let height = window
    .inner_height()
    .map_err(js_error)?
    .as_f64()
    .unwrap_or_default();
  canvas.set_width(width as u32);
  canvas.set_height(height as u32);

  let ctx = context_2d(canvas)?;
  let started_at = now_ms(&window);
  *handle.borrow_mut() = Some(Confetti {
    ctx,
    celebration: Celebration::burst(
      width, height, started_at, seed
    ),
    frame: None
  });
  tracing::debug!(
    width,
    height,
    "confetti launched"
  );

  step(handle.clone(), started_at);
  Ok(())
}

fn schedule(handle: ConfettiHandle) {
  let next = handle.clone();
  let frame =
    request_animation_frame(move |_| {
      let now = web_sys::window()
        .map(|window| now_ms(&window))
        .unwrap_or_default();
      step(next, now);
    });
  if let Some(confetti) =
    handle.borrow_mut().as_mut()
  {
    confetti.frame = Some(frame);
  }
}

fn step(handle: ConfettiHandle, now: f64) {
  let running = {
    let mut slot = handle.borrow_mut();
    let Some(confetti) = slot.as_mut()
    else {
      return;
    };
    confetti.draw();
    let running =
      confetti.celebration.advance(now);
    if !running {
      confetti.clear();
      *slot = None;
    }
    running
  };

  if running {
    schedule(handle);
  }
}

impl Confetti {
  fn draw(&self) {
    self.clear();
    for particle in
      self.celebration.particles()
    {
      self.ctx.save();
      let placed = self
        .ctx
        .translate(particle.x, particle.y)
        .and_then(|()| {
          self.ctx.rotate(
            particle.rotation_radians()
          )
        });
      if placed.is_ok() {
        self.ctx.set_fill_style_str(
          &particle.color()
        );
        self.ctx.fill_rect(
          -particle.width / 2.0,
          -particle.height / 2.0,
          particle.width,
          particle.height
        );
      }
      self.ctx.restore();
    }
  }

  fn clear(&self) {
    let (width, height) =
      self.celebration.size();
    self
      .ctx
      .clear_rect(0.0, 0.0, width, height);
  }
}

fn now_ms(window: &web_sys::Window) -> f64 {
  window
    .performance()
    .map(|performance| performance.now())
    .unwrap_or_else(js_sys::Date::now)
}
