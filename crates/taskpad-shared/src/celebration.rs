//! Confetti burst played when a task is
//! completed.
//!
//! The simulation is surface-agnostic:
//! coordinates are canvas pixels and the
//! caller drives it once per animation
//! frame, clearing the overlay when
//! [`Celebration::advance`] returns
//! `false`.

use rand::rngs::SmallRng;
use rand::{
  Rng,
  SeedableRng
};

pub const PARTICLE_COUNT: usize = 90;
pub const DURATION_MS: f64 = 3000.0;
pub const ROTATION_STEP_DEG: f64 = 8.0;
pub const WRAP_MARGIN: f64 = 20.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
  pub x:        f64,
  pub y:        f64,
  pub width:    f64,
  pub height:   f64,
  pub hue:      f64,
  pub speed:    f64,
  pub rotation: f64
}

impl Particle {
  #[must_use]
  pub fn color(&self) -> String {
    format!(
      "hsl({:.0},100%,50%)",
      self.hue
    )
  }

  #[must_use]
  pub fn rotation_radians(&self) -> f64 {
    self.rotation.to_radians()
  }
}

#[derive(Debug, Clone)]
pub struct Celebration {
  particles:     Vec<Particle>,
  width:         f64,
  height:        f64,
  started_at_ms: f64,
  rng:           SmallRng
}

impl Celebration {
  /// Scatters particles across the
  /// width and up to one canvas height
  /// above the top edge.
  #[must_use]
  pub fn burst(
    width: f64,
    height: f64,
    started_at_ms: f64,
    seed: u64
  ) -> Self {
    let width = width.max(0.0);
    let height = height.max(0.0);
    let mut rng =
      SmallRng::seed_from_u64(seed);
    let particles = (0..PARTICLE_COUNT)
      .map(|_| Particle {
        x:        rng.random::<f64>()
          * width,
        y:        -rng.random::<f64>()
          * height,
        width:    8.0
          + rng.random::<f64>() * 8.0,
        height:   8.0
          + rng.random::<f64>() * 8.0,
        hue:      rng.random::<f64>()
          * 360.0,
        speed:    2.0
          + rng.random::<f64>() * 4.0,
        rotation: rng.random::<f64>()
          * 360.0
      })
      .collect();

    Self {
      particles,
      width,
      height,
      started_at_ms,
      rng
    }
  }

  #[must_use]
  pub fn particles(&self) -> &[Particle] {
    &self.particles
  }

  #[must_use]
  pub fn size(&self) -> (f64, f64) {
    (self.width, self.height)
  }

  #[must_use]
  pub fn is_expired(
    &self,
    now_ms: f64
  ) -> bool {
    now_ms - self.started_at_ms
      >= DURATION_MS
  }

  /// Moves every particle one frame and
  /// reports whether another frame
  /// should be scheduled.
  pub fn advance(
    &mut self,
    now_ms: f64
  ) -> bool {
    let bottom =
      self.height + WRAP_MARGIN;
    for particle in &mut self.particles
    {
      particle.y += particle.speed;
      particle.rotation = (particle
        .rotation
        + ROTATION_STEP_DEG)
        % 360.0;
      if particle.y > bottom {
        particle.y = -WRAP_MARGIN;
        particle.x =
          self.rng.random::<f64>()
            * self.width;
      }
    }
    !self.is_expired(now_ms)
  }
}
