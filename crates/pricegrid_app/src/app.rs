use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::bail;
use pricegrid_core::{update, AppState, Msg};
use pricegrid_logging::grid_debug;

use crate::config::Settings;
use crate::effects::EffectRunner;
use crate::input::{parse_line, Command, HELP_TEXT};
use crate::render;

/// Everything the main loop reacts to. State changes only through `Msg`.
#[derive(Debug)]
pub enum Incoming {
    Msg(Msg),
    Print(Vec<String>),
    Quit,
}

/// Runs the interactive loop, or a single search when `one_shot` is given.
///
/// A quit request waits for the in-flight search so piped input still
/// prints its results.
pub fn run(settings: Settings, one_shot: Option<String>) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel::<Incoming>();
    let runner = EffectRunner::new(settings.search, tx.clone())?;
    let one_shot_mode = one_shot.is_some();

    let mut state = AppState::new();
    match one_shot {
        Some(query) => {
            for msg in [Msg::InputChanged(query), Msg::SearchSubmitted] {
                let _ = tx.send(Incoming::Msg(msg));
            }
            let _ = tx.send(Incoming::Quit);
        }
        None => {
            print_lines(HELP_TEXT.lines().map(ToOwned::to_owned))?;
            print_lines(render::render(&state.view()))?;
            spawn_stdin_reader(tx.clone());
        }
    }
    drop(tx);

    let mut quit_requested = false;
    while let Ok(incoming) = rx.recv() {
        match incoming {
            Incoming::Msg(msg) => {
                let (next, effects) = update(state, msg);
                state = next;
                runner.enqueue(effects);
                if state.consume_dirty() {
                    print_lines(render::render(&state.view()))?;
                }
            }
            Incoming::Print(lines) => print_lines(lines)?,
            Incoming::Quit => {
                grid_debug!("Quit requested; loading={}", state.is_loading());
                quit_requested = true;
            }
        }
        if quit_requested && !state.is_loading() {
            break;
        }
    }

    if one_shot_mode {
        if let Some(error) = state.view().error {
            bail!(error.message);
        }
    }
    Ok(())
}

fn spawn_stdin_reader(tx: mpsc::Sender<Incoming>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            let batch = match parse_line(&line) {
                Command::Search(text) => vec![
                    Incoming::Msg(Msg::InputChanged(text)),
                    Incoming::Msg(Msg::SearchSubmitted),
                ],
                Command::SubmitCurrent => vec![Incoming::Msg(Msg::SearchSubmitted)],
                Command::Sample(index) => vec![Incoming::Msg(Msg::SampleSelected(index))],
                Command::ListSamples => vec![Incoming::Print(render::render_samples())],
                Command::Help => vec![Incoming::Print(
                    HELP_TEXT.lines().map(ToOwned::to_owned).collect(),
                )],
                Command::Unknown(text) => vec![Incoming::Print(vec![format!(
                    "Unknown command {text:?}; try :help"
                )])],
                Command::Quit => break,
            };
            for incoming in batch {
                if tx.send(incoming).is_err() {
                    return;
                }
            }
        }
        let _ = tx.send(Incoming::Quit);
    });
}

fn print_lines(lines: impl IntoIterator<Item = String>) -> io::Result<()> {
    let mut out = io::stdout().lock();
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}
