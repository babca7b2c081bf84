use std::f64::consts::{
  FRAC_PI_2,
  TAU
};

use anyhow::anyhow;
use taskpad_shared::chart::{
  ChartData,
  ChartHost
};
use wasm_bindgen::{
  JsCast,
  JsValue
};
use web_sys::{
  CanvasRenderingContext2d,
  HtmlCanvasElement
};

const LEGEND_HEIGHT: f64 = 28.0;
const CUTOUT: f64 = 0.5;
const EMPTY_RING_COLOR: &str =
  "#e9ecef";
const LEGEND_TEXT_COLOR: &str = "#666";

/// One painted arc of the doughnut, in
/// radians clockwise from 12 o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
  pub start: f64,
  pub end:   f64,
  pub color: &'static str
}

/// Arcs for the non-empty segments. An
/// empty dataset has none.
pub fn doughnut_arcs(
  data: &ChartData
) -> Vec<Arc> {
  let mut start = -FRAC_PI_2;
  data
    .segments()
    .iter()
    .zip(data.fractions())
    .filter(|(_, share)| *share > 0.0)
    .map(|(segment, share)| {
      let end = start + share * TAU;
      let arc = Arc {
        start,
        end,
        color: segment.color
      };
      start = end;
      arc
    })
    .collect()
}

/// What a [`CanvasChart`] last painted.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnChart {
  pub data: ChartData
}

/// Doughnut chart with a bottom legend
/// painted on a 2D canvas.
pub struct CanvasChart {
  canvas: HtmlCanvasElement
}

impl CanvasChart {
  pub fn new(
    canvas: HtmlCanvasElement
  ) -> Self {
    Self {
      canvas
    }
  }
}

impl ChartHost for CanvasChart {
  type Instance = DrawnChart;

  fn create(
    &mut self,
    data: &ChartData
  ) -> anyhow::Result<DrawnChart> {
    let width =
      self.canvas.client_width().max(1);
    let height =
      self.canvas.client_height().max(1);
    self.canvas.set_width(width as u32);
    self
      .canvas
      .set_height(height as u32);

    let ctx = context_2d(&self.canvas)?;
    let (width, height) =
      (f64::from(width), f64::from(height));
    let plot_height =
      (height - LEGEND_HEIGHT).max(0.0);
    let cx = width / 2.0;
    let cy = plot_height / 2.0;
    let outer = (width.min(plot_height)
      / 2.0
      - 4.0)
      .max(0.0);
    let inner = outer * CUTOUT;

    let arcs = doughnut_arcs(data);
    if arcs.is_empty() {
      paint_ring(
        &ctx,
        (cx, cy),
        (inner, outer),
        &Arc {
          start: 0.0,
          end:   TAU,
          color: EMPTY_RING_COLOR
        }
      )?;
    }
    for arc in &arcs {
      paint_ring(
        &ctx,
        (cx, cy),
        (inner, outer),
        arc
      )?;
    }

    paint_legend(
      &ctx,
      data,
      width,
      height - LEGEND_HEIGHT / 2.0
    )?;

    Ok(DrawnChart {
      data: *data
    })
  }

  fn destroy(
    &mut self,
    instance: DrawnChart
  ) {
    match context_2d(&self.canvas) {
      | Ok(ctx) => {
        ctx.clear_rect(
          0.0,
          0.0,
          f64::from(self.canvas.width()),
          f64::from(self.canvas.height())
        );
      }
      | Err(error) => {
        tracing::warn!(%error, "cannot clear chart canvas");
      }
    }
    tracing::trace!(
      completed = instance.data.completed,
      pending = instance.data.pending,
      "previous chart destroyed"
    );
  }
}

pub fn context_2d(
  canvas: &HtmlCanvasElement
) -> anyhow::Result<CanvasRenderingContext2d>
{
  canvas
    .get_context("2d")
    .map_err(js_error)?
    .ok_or_else(|| {
      anyhow!("canvas has no 2d context")
    })?
    .dyn_into::<CanvasRenderingContext2d>()
    .map_err(|_| {
      anyhow!(
        "2d context has an unexpected \
         type"
      )
    })
}

pub fn js_error(
  error: JsValue
) -> anyhow::Error {
  anyhow!("{error:?}")
}

fn paint_ring(
  ctx: &CanvasRenderingContext2d,
  (cx, cy): (f64, f64),
  (inner, outer): (f64, f64),
  arc: &Arc
) -> anyhow::Result<()> {
  ctx.begin_path();
  ctx
    .arc(cx, cy, outer, arc.start, arc.end)
    .map_err(js_error)?;
  ctx
    .arc_with_anticlockwise(
      cx, cy, inner, arc.end, arc.start,
      true
    )
    .map_err(js_error)?;
  ctx.close_path();
  ctx.set_fill_style_str(arc.color);
  ctx.fill();
  Ok(())
}

fn paint_legend(
  ctx: &CanvasRenderingContext2d,
  data: &ChartData,
  width: f64,
  baseline: f64
) -> anyhow::Result<()> {
  const BOX: f64 = 12.0;
  const GAP: f64 = 6.0;
  const SPACING: f64 = 18.0;

  ctx.set_font("12px sans-serif");
  ctx.set_text_baseline("middle");

  let segments = data.segments();
  let mut widths = Vec::with_capacity(
    segments.len()
  );
  for segment in &segments {
    let text = ctx
      .measure_text(segment.label)
      .map_err(js_error)?;
    widths.push(BOX + GAP + text.width());
  }
  let total: f64 = widths.iter().sum::<f64>()
    + SPACING
      * (segments.len() as f64 - 1.0);

  let mut x = (width - total) / 2.0;
  for (segment, entry_width) in
    segments.iter().zip(widths)
  {
    ctx.set_fill_style_str(segment.color);
    ctx.fill_rect(
      x,
      baseline - BOX / 2.0,
      BOX,
      BOX
    );
    ctx.set_fill_style_str(
      LEGEND_TEXT_COLOR
    );
    ctx
      .fill_text(
        segment.label,
        x + BOX + GAP,
        baseline
      )
      .map_err(js_error)?;
    x += entry_width + SPACING;
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn arcs_split_the_circle_from_the_top()
  {
    let arcs =
      doughnut_arcs(&ChartData::new(1, 4));
    assert_eq!(arcs.len(), 2);
    assert_eq!(arcs[0].start, -FRAC_PI_2);
    assert!(
      (arcs[0].end - (-FRAC_PI_2 + TAU / 4.0))
        .abs()
        < 1e-9
    );
    assert_eq!(arcs[1].start, arcs[0].end);
    assert!(
      (arcs[1].end - (TAU - FRAC_PI_2))
        .abs()
        < 1e-9
    );
    assert_eq!(arcs[0].color, "#28a745");
    assert_eq!(arcs[1].color, "#ff4d4d");
  }

  #[test]
  fn empty_segments_are_skipped() {
    assert!(
      doughnut_arcs(&ChartData::default())
        .is_empty()
    );
    let arcs =
      doughnut_arcs(&ChartData::new(3, 3));
    assert_eq!(arcs.len(), 1);
    assert_eq!(arcs[0].color, "#28a745");
  }
}
