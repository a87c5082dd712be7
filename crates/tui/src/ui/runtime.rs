//! Runtime: terminal lifecycle and the single event loop of the TUI.
//!
//! - A dedicated input task polls `crossterm` and forwards events over a
//!   channel so the loop never blocks on the terminal.
//! - Ticks are fast (100 ms) only while an execution is pending, to animate
//!   the spinner; otherwise the loop idles on a 5 s interval.
//! - Effects returned by components are run through [`crate::cmd`];
//!   spawned executions are polled as a `FuturesUnordered` of join handles.
use std::{sync::Arc, time::Duration};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::{StreamExt, stream::FuturesUnordered};
use ratatui::{Terminal, prelude::*};
use scriptdeck_engine::ScriptExecutor;
use scriptdeck_registry::ScriptRegistry;
use scriptdeck_types::{Effect, Msg};
use tokio::{
    signal,
    sync::mpsc,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{info, warn};

use crate::{
    app::App,
    cmd,
    ui::{components::component::Component, main_component::MainView, theme},
};

type Backend = CrosstermBackend<std::io::Stdout>;

/// Spawn the input task; it stops when the receiver is dropped or the
/// terminal can no longer be read.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    tokio::task::spawn_blocking(move || {
        let poll_interval = Duration::from_millis(16);
        loop {
            match event::poll(poll_interval) {
                Ok(false) => {
                    if sender.is_closed() {
                        break;
                    }
                }
                Ok(true) => match event::read() {
                    Ok(event) => {
                        if sender.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        warn!("Failed to read event: {}", err);
                        break;
                    }
                },
                Err(err) => {
                    warn!("Failed to poll events: {}", err);
                    break;
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<Backend>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<Backend>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Terminal<Backend>, app: &mut App, main_view: &mut MainView) -> Result<()> {
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        // Windows reports releases too; only presses drive the UI.
        Event::Key(key_event) if key_event.kind == KeyEventKind::Press => main_view.handle_key_events(app, key_event),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Resize(width, height) => main_view.handle_message(app, &Msg::Resize(width, height)),
        _ => Vec::new(),
    }
}

/// Runs effects; returns `false` once the user asked to quit.
async fn process_effects(
    app: &mut App,
    main_view: &mut MainView,
    executor: &Arc<dyn ScriptExecutor>,
    effects: Vec<Effect>,
    pending_execs: &mut FuturesUnordered<JoinHandle<Msg>>,
) -> bool {
    if effects.contains(&Effect::Quit) {
        return false;
    }
    let batch = cmd::run_from_effects(app, executor, effects).await;
    pending_execs.extend(batch.pending);
    for msg in batch.immediate {
        main_view.handle_message(app, &msg);
    }
    true
}

/// Entry point for the TUI runtime: sets up the terminal, runs the event
/// loop until quit or Ctrl+C, and restores the terminal on the way out.
pub async fn run_app(registry: ScriptRegistry, executor: Arc<dyn ScriptExecutor>) -> Result<()> {
    let mut input_receiver = spawn_input_thread();
    let mut main_view = MainView::new();
    let mut app = App::new(registry, theme::load_from_env());
    let mut terminal = setup_terminal()?;
    info!(scripts = app.registry.scripts().len(), "tui started");

    let mut pending_execs: FuturesUnordered<JoinHandle<Msg>> = FuturesUnordered::new();

    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let result = async {
        render(&mut terminal, &mut app, &mut main_view)?;
        loop {
            let target_interval = if app.executing { fast_interval } else { idle_interval };
            if target_interval != current_interval {
                current_interval = target_interval;
                ticker = time::interval(current_interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            }

            let mut effects = Vec::new();
            tokio::select! {
                maybe_event = input_receiver.recv() => {
                    let Some(event) = maybe_event else {
                        break;
                    };
                    if let Event::Key(key_event) = &event
                        && key_event.code == KeyCode::Char('c')
                        && key_event.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        break;
                    }
                    effects.extend(handle_input_event(&mut app, &mut main_view, event));
                }

                _ = ticker.tick() => {
                    effects.extend(main_view.handle_message(&mut app, &Msg::Tick));
                }

                Some(joined) = pending_execs.next(), if !pending_execs.is_empty() => {
                    let msg = joined.unwrap_or_else(|error| Msg::ExecAborted(format!("Execution task failed: {error}")));
                    effects.extend(main_view.handle_message(&mut app, &msg));
                }

                _ = signal::ctrl_c() => { break; }
            }

            if !effects.is_empty() && !process_effects(&mut app, &mut main_view, &executor, effects, &mut pending_execs).await {
                break;
            }
            render(&mut terminal, &mut app, &mut main_view)?;
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    cleanup_terminal(&mut terminal)?;
    info!("tui stopped");
    result
}
