use std::io::{self, IsTerminal, Write};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use taskpad_shared::celebration::{Celebration, Particle};
use tracing::{debug, warn};

use crate::config::Config;

/// Pixels per character cell.
const CELL_WIDTH: f64 = 8.0;
const CELL_HEIGHT: f64 = 16.0;
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const GLYPHS: [char; 4] = ['■', '◆', '▮', '●'];

/// Plays the completion celebration full screen. Does nothing when disabled
/// or when stdout is not a terminal.
#[tracing::instrument(skip(cfg))]
pub fn celebrate(cfg: &Config) -> anyhow::Result<()> {
    if !cfg.get_bool("celebrate").unwrap_or(true) {
        debug!("celebration disabled");
        return Ok(());
    }
    if !io::stdout().is_terminal() {
        debug!("stdout is not a terminal; skipping celebration");
        return Ok(());
    }

    let (cols, rows) = crossterm::terminal::size().context("failed to read terminal size")?;
    let mut out = io::stdout();
    let _screen = AlternateScreen::enter(&mut out)?;
    play(&mut out, cols, rows, rand::random::<u64>())
}

fn play<W: Write>(out: &mut W, cols: u16, rows: u16, seed: u64) -> anyhow::Result<()> {
    let started = Instant::now();
    let mut celebration = Celebration::burst(
        f64::from(cols) * CELL_WIDTH,
        f64::from(rows) * CELL_HEIGHT,
        0.0,
        seed,
    );

    loop {
        draw(out, celebration.particles(), cols, rows)?;
        thread::sleep(FRAME_INTERVAL);

        let now_ms = started.elapsed().as_secs_f64() * 1000.0;
        if !celebration.advance(now_ms) {
            break;
        }
    }

    out.queue(Clear(ClearType::All))?;
    out.flush()?;
    Ok(())
}

fn draw<W: Write>(out: &mut W, particles: &[Particle], cols: u16, rows: u16) -> anyhow::Result<()> {
    out.queue(Clear(ClearType::All))?;
    for particle in particles {
        let Some((col, row)) = cell_for(particle, cols, rows) else {
            continue;
        };
        let (r, g, b) = hsl_to_rgb(particle.hue, 1.0, 0.5);
        out.queue(MoveTo(col, row))?
            .queue(SetForegroundColor(Color::Rgb { r, g, b }))?
            .queue(Print(glyph_for(particle)))?;
    }
    out.queue(ResetColor)?;
    out.flush()?;
    Ok(())
}

/// Cell under the particle's centre, or `None` while it is off screen.
fn cell_for(particle: &Particle, cols: u16, rows: u16) -> Option<(u16, u16)> {
    let cx = particle.x + particle.width / 2.0;
    let cy = particle.y + particle.height / 2.0;
    if cx < 0.0 || cy < 0.0 {
        return None;
    }

    let col = (cx / CELL_WIDTH).floor();
    let row = (cy / CELL_HEIGHT).floor();
    if col >= f64::from(cols) || row >= f64::from(rows) {
        return None;
    }
    Some((col as u16, row as u16))
}

fn glyph_for(particle: &Particle) -> char {
    let quarter = (particle.rotation.rem_euclid(360.0) / 90.0) as usize;
    GLYPHS[quarter.min(GLYPHS.len() - 1)]
}

/// `hue` in degrees, `saturation` and `lightness` in `[0, 1]`.
fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue.rem_euclid(360.0) / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u8 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (channel(r), channel(g), channel(b))
}

/// Restores the main screen and cursor on drop, including on error paths.
struct AlternateScreen;

impl AlternateScreen {
    fn enter<W: Write>(out: &mut W) -> anyhow::Result<Self> {
        out.execute(EnterAlternateScreen)?.execute(Hide)?;
        Ok(Self)
    }
}

impl Drop for AlternateScreen {
    fn drop(&mut self) {
        let mut out = io::stdout();
        if let Err(err) = out
            .execute(ResetColor)
            .and_then(|out| out.execute(Show))
            .and_then(|out| out.execute(LeaveAlternateScreen))
        {
            warn!(error = %err, "failed to restore terminal");
        }
    }
}
