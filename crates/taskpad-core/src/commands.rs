use std::io;

use anyhow::anyhow;
use chrono::{DateTime, Local};
use taskpad_shared::quotes;
use taskpad_shared::{Priority, Session, Task, TaskDraft, TaskId, Toggle, View};
use tracing::{debug, info, instrument};

use crate::cli::Command;
use crate::confetti;
use crate::config::Config;
use crate::datastore::FileStore;
use crate::notify::TerminalNotifier;
use crate::render::Renderer;
use crate::watch::run_watch;

#[instrument(skip(session, cfg, renderer, command, now))]
pub fn dispatch(
    session: &mut Session<FileStore>,
    cfg: &Config,
    renderer: &mut Renderer,
    command: Command,
    now: DateTime<Local>,
) -> anyhow::Result<()> {
    debug!(?command, "dispatching command");

    match command {
        Command::Add {
            text,
            priority,
            due,
        } => cmd_add(session, renderer, &text, priority, due, now),
        Command::List { view, search } => {
            cmd_list(session, renderer, view, search.as_deref(), now)
        }
        Command::Dashboard => cmd_list(session, renderer, Some(View::Dashboard), None, now),
        Command::Done { reference } => cmd_toggle(session, cfg, renderer, &reference, now),
        Command::Delete { reference } => cmd_delete(session, renderer, &reference, now),
        Command::Stats => cmd_stats(session, renderer, now),
        Command::Watch { once } => cmd_watch(session, cfg, once),
    }
}

#[instrument(skip(session, renderer, text, now))]
fn cmd_add(
    session: &mut Session<FileStore>,
    renderer: &mut Renderer,
    text: &[String],
    priority: Priority,
    due: Option<String>,
    now: DateTime<Local>,
) -> anyhow::Result<()> {
    info!("command add");

    let mut draft = TaskDraft::new(text.join(" ")).priority(priority);
    if let Some(due) = due {
        draft = draft.deadline(due);
    }

    if let Some(id) = session.add_task(draft)? {
        let position = session.position_of(id).unwrap_or_default();
        renderer.print_message(&format!("Added task {}.", position + 1))?;
    }

    refresh(session, renderer, now)
}

#[instrument(skip(session, renderer, search, now))]
fn cmd_list(
    session: &mut Session<FileStore>,
    renderer: &mut Renderer,
    view: Option<View>,
    search: Option<&str>,
    now: DateTime<Local>,
) -> anyhow::Result<()> {
    info!("command list");

    if let Some(view) = view {
        session.set_view(view);
    }
    session.set_search(search.unwrap_or_default());

    renderer.print_header(now.date_naive(), &quotes::banner(rand::random::<u64>()))?;
    refresh(session, renderer, now)
}

#[instrument(skip(session, cfg, renderer, now))]
fn cmd_toggle(
    session: &mut Session<FileStore>,
    cfg: &Config,
    renderer: &mut Renderer,
    reference: &str,
    now: DateTime<Local>,
) -> anyhow::Result<()> {
    info!("command done");

    let id = resolve_reference(session.tasks(), reference)?;
    let position = session.position_of(id).unwrap_or_default() + 1;

    let outcome = session.toggle_task(id, now)?;
    match outcome {
        Toggle::Completed => {
            renderer.print_message(&format!("Completed task {position}. +10 points"))?;
        }
        Toggle::Reopened => renderer.print_message(&format!("Reopened task {position}."))?,
        Toggle::Missing => return Err(anyhow!("task {reference} disappeared")),
    }

    if outcome.celebrates() {
        confetti::celebrate(cfg)?;
    }

    refresh(session, renderer, now)
}

#[instrument(skip(session, renderer, now))]
fn cmd_delete(
    session: &mut Session<FileStore>,
    renderer: &mut Renderer,
    reference: &str,
    now: DateTime<Local>,
) -> anyhow::Result<()> {
    info!("command delete");

    let id = resolve_reference(session.tasks(), reference)?;
    let position = session.position_of(id).unwrap_or_default() + 1;
    if session.delete_task(id)? {
        renderer.print_message(&format!("Deleted task {position}."))?;
    }

    refresh(session, renderer, now)
}

#[instrument(skip(session, renderer, now))]
fn cmd_stats(
    session: &Session<FileStore>,
    renderer: &Renderer,
    now: DateTime<Local>,
) -> anyhow::Result<()> {
    info!("command stats");
    renderer.print_stats(&session.frame(now))
}

#[instrument(skip(session, cfg))]
fn cmd_watch(session: &mut Session<FileStore>, cfg: &Config, once: bool) -> anyhow::Result<()> {
    info!("command watch");

    let mut sink = TerminalNotifier::from_config(cfg, io::stdout());
    let emitted = run_watch(session, &mut sink, cfg.notify_interval(), once)?;
    info!(emitted, "watch finished");
    Ok(())
}

fn refresh(
    session: &Session<FileStore>,
    renderer: &mut Renderer,
    now: DateTime<Local>,
) -> anyhow::Result<()> {
    renderer.print_frame(&session.frame(now))
}

/// Resolves a 1-based position or a unique id prefix to a task id.
pub fn resolve_reference(tasks: &[Task], reference: &str) -> anyhow::Result<TaskId> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(anyhow!("task reference cannot be empty"));
    }

    // Positions win; an out-of-range number may still be an all-digit id.
    if let Some(task) = reference
        .parse::<usize>()
        .ok()
        .and_then(|position| position.checked_sub(1))
        .and_then(|idx| tasks.get(idx))
    {
        return Ok(task.id);
    }

    let prefix = reference.to_ascii_lowercase();
    let mut matches = tasks
        .iter()
        .filter(|task| task.id.to_string().starts_with(&prefix));
    let first = matches
        .next()
        .ok_or_else(|| anyhow!("no task matches {reference}"))?;
    if matches.next().is_some() {
        return Err(anyhow!("task reference {reference} is ambiguous"));
    }
    Ok(first.id)
}

#[cfg(test)]
mod tests {
    use taskpad_shared::{Priority, Task};

    use super::resolve_reference;

    fn tasks() -> Vec<Task> {
        vec![
            Task::new("Buy milk".to_string(), Priority::Low, None),
            Task::new("Walk dog".to_string(), Priority::High, None),
        ]
    }

    #[test]
    fn positions_are_one_based() {
        let mut tasks = tasks();
        tasks[0].id = "aaaaaaaa-0000-4000-8000-000000000001".parse().unwrap();
        tasks[1].id = "bbbbbbbb-0000-4000-8000-000000000002".parse().unwrap();
        assert_eq!(resolve_reference(&tasks, "1").unwrap(), tasks[0].id);
        assert_eq!(resolve_reference(&tasks, " 2 ").unwrap(), tasks[1].id);
        assert!(resolve_reference(&tasks, "0").is_err());
        assert!(resolve_reference(&tasks, "3").is_err());
    }

    #[test]
    fn id_prefixes_must_be_unique() {
        let mut tasks = tasks();
        tasks[0].id = "0c0ffee0-0000-4000-8000-000000000001".parse().unwrap();
        tasks[1].id = "d00dfeed-0000-4000-8000-000000000002".parse().unwrap();
        let full = tasks[1].id.to_string();
        assert_eq!(
            resolve_reference(&tasks, &full[..8].to_ascii_uppercase()).unwrap(),
            tasks[1].id
        );
        assert_eq!(resolve_reference(&tasks, &full).unwrap(), tasks[1].id);
        assert!(resolve_reference(&tasks, "zzzz").is_err());
        assert!(resolve_reference(&tasks, "").is_err());
    }

    #[test]
    fn all_digit_short_ids_resolve_when_out_of_range() {
        let mut tasks = tasks();
        tasks[1].id = "12345678-0000-4000-8000-000000000002".parse().unwrap();
        assert_eq!(resolve_reference(&tasks, "12345678").unwrap(), tasks[1].id);
        assert_eq!(resolve_reference(&tasks, "1").unwrap(), tasks[0].id);
        assert!(resolve_reference(&tasks, "99").is_err());
    }

    #[test]
    fn shared_prefix_is_ambiguous() {
        let mut tasks = tasks();
        tasks[0].id = "a1a1a1a1-0000-4000-8000-000000000001".parse().unwrap();
        tasks[1].id = "a1a1a1a1-0000-4000-8000-000000000002".parse().unwrap();
        assert!(resolve_reference(&tasks, "a1a1").is_err());
        assert_eq!(resolve_reference(&tasks, "a1a1a1a1-0000-4000-8000-000000000002").unwrap(), tasks[1].id);
    }
}
