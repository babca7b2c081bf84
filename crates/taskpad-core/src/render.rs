use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use chrono::NaiveDate;
use taskpad_shared::chart::{ChartData, ChartHost, ChartSlot, COMPLETED_LABEL, PENDING_LABEL};
use taskpad_shared::datetime::display_date;
use taskpad_shared::frame::NO_TASKS_MESSAGE;
use taskpad_shared::report::{DashboardSummary, ProgressReport};
use taskpad_shared::{Frame, FrameBody, Priority, TaskId, TaskRow};
use tracing::trace;
use unicode_width::UnicodeWidthStr;

use crate::config::Config;

const PROGRESS_CELLS: usize = 20;
const CHART_CELLS: usize = 30;
const SHORT_ID_LEN: usize = 8;

const RED: &str = "31";
const GREEN: &str = "32";
const YELLOW: &str = "33";
const DIM: &str = "2";
const STRIKE: &str = "9";

pub struct Renderer {
    color: bool,
    chart: ChartSlot<TerminalChart>,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => true,
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self::with_color(color && io::stdout().is_terminal()))
    }

    pub fn with_color(color: bool) -> Self {
        Self {
            color,
            chart: ChartSlot::new(TerminalChart { color }),
        }
    }

    #[tracing::instrument(skip(self, quote))]
    pub fn print_header(&self, today: NaiveDate, quote: &str) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        self.write_header(&mut out, today, quote)
    }

    pub fn write_header<W: Write>(
        &self,
        mut out: W,
        today: NaiveDate,
        quote: &str,
    ) -> anyhow::Result<()> {
        writeln!(out, "{}", self.paint(&display_date(today), "1"))?;
        writeln!(out, "{}", self.paint(quote, DIM))?;
        writeln!(out)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, frame), fields(view = %frame.view))]
    pub fn print_frame(&mut self, frame: &Frame) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        self.render_frame(&mut out, frame)
    }

    /// Writes the body for the frame's view, then the progress bar, the
    /// standing line and a freshly drawn chart.
    pub fn render_frame<W: Write>(&mut self, mut out: W, frame: &Frame) -> anyhow::Result<()> {
        writeln!(out, "{}", self.paint(frame.view.label(), "1"))?;

        match &frame.body {
            FrameBody::Rows(rows) => self.write_rows(&mut out, rows)?,
            FrameBody::NoTasks => writeln!(out, "{NO_TASKS_MESSAGE}")?,
            FrameBody::Dashboard(summary) => self.write_dashboard(&mut out, summary)?,
        }

        writeln!(out)?;
        self.write_stats(&mut out, frame)?;

        self.chart.redraw(&frame.chart)?;
        if let Some(chart) = self.chart.current() {
            writeln!(out)?;
            for line in &chart.lines {
                writeln!(out, "{line}")?;
            }
        }

        Ok(())
    }

    #[tracing::instrument(skip(self, frame))]
    pub fn print_stats(&self, frame: &Frame) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        self.write_stats(&mut out, frame)
    }

    pub fn write_stats<W: Write>(&self, mut out: W, frame: &Frame) -> anyhow::Result<()> {
        writeln!(out, "{}", self.progress_line(&frame.progress))?;
        writeln!(out, "{}   {}", frame.points_text, frame.streak_text)?;
        Ok(())
    }

    pub fn print_message(&self, message: &str) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{message}")?;
        Ok(())
    }

    fn write_rows<W: Write>(&self, out: W, rows: &[TaskRow]) -> anyhow::Result<()> {
        let headers = vec![
            "#".to_string(),
            "Done".to_string(),
            "Pri".to_string(),
            "Task".to_string(),
            "ID".to_string(),
        ];

        let rows = rows
            .iter()
            .map(|row| {
                let done = if row.completed { "[x]" } else { "[ ]" };
                let priority = self.paint(row.priority.as_str(), priority_code(row.priority));

                let label = if row.completed {
                    self.paint(&row.label, STRIKE)
                } else if row.overdue {
                    self.paint(&row.label, RED)
                } else {
                    row.label.clone()
                };

                vec![
                    (row.position + 1).to_string(),
                    done.to_string(),
                    priority,
                    label,
                    self.paint(&short_id(row.id), DIM),
                ]
            })
            .collect();

        write_table(out, headers, rows)
    }

    fn write_dashboard<W: Write>(
        &self,
        mut out: W,
        summary: &DashboardSummary,
    ) -> anyhow::Result<()> {
        let overdue_code = if summary.overdue_flagged() { RED } else { GREEN };

        writeln!(out, "Total Tasks: {}", summary.total)?;
        writeln!(out, "Completed:   {}", summary.completed)?;
        writeln!(out, "Pending:     {}", summary.pending)?;
        writeln!(
            out,
            "Overdue:     {}",
            self.paint(&summary.overdue.to_string(), overdue_code)
        )?;
        Ok(())
    }

    fn progress_line(&self, progress: &ProgressReport) -> String {
        let filled = (usize::from(progress.percent) * PROGRESS_CELLS + 50) / 100;
        let bar = format!(
            "{}{}",
            "█".repeat(filled),
            "░".repeat(PROGRESS_CELLS.saturating_sub(filled))
        );
        format!("[{}] {}", self.paint(&bar, GREEN), progress.text())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        paint(self.color, text, code)
    }
}

/// Chart drawn as a proportional bar with a two-entry legend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalChartLines {
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct TerminalChart {
    color: bool,
}

impl ChartHost for TerminalChart {
    type Instance = TerminalChartLines;

    fn create(&mut self, data: &ChartData) -> anyhow::Result<TerminalChartLines> {
        let [completed_share, _] = data.fractions();
        let bar = if data.total() == 0 {
            paint(self.color, &"·".repeat(CHART_CELLS), DIM)
        } else {
            let completed_cells = (completed_share * CHART_CELLS as f64).round() as usize;
            format!(
                "{}{}",
                paint(self.color, &"█".repeat(completed_cells), GREEN),
                paint(
                    self.color,
                    &"█".repeat(CHART_CELLS.saturating_sub(completed_cells)),
                    RED
                )
            )
        };

        let legend = format!(
            "{} {} ({})  {} {} ({})",
            paint(self.color, "■", GREEN),
            COMPLETED_LABEL,
            data.completed,
            paint(self.color, "■", RED),
            PENDING_LABEL,
            data.pending
        );

        Ok(TerminalChartLines {
            lines: vec![bar, legend],
        })
    }

    fn destroy(&mut self, instance: TerminalChartLines) {
        trace!(lines = instance.lines.len(), "discarding previous chart");
    }
}

/// Leading eight hex digits of the id, enough to use as a task reference.
fn short_id(id: TaskId) -> String {
    id.to_string().chars().take(SHORT_ID_LEN).collect()
}

fn priority_code(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => GREEN,
        Priority::Medium => YELLOW,
        Priority::High => RED,
    }
}

fn paint(color: bool, text: &str, code: &str) -> String {
    if !color || text.is_empty() {
        return text.to_string();
    }
    format!("\x1b[{code}m{text}\x1b[0m")
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for (idx, header) in headers.iter().enumerate() {
        write!(writer, "{:width$} ", header, width = widths[idx])?;
    }
    writeln!(writer)?;

    for width in &widths {
        write!(writer, "{:-<width$} ", "", width = *width)?;
    }
    writeln!(writer)?;

    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
