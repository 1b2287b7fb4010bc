//! Daeshboard entry point.

use chrono::Utc;
use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use daeshboard_core::{
    DashboardState, Poller, PollerError, PollerStats, RefreshHandle, SnapshotStore,
};
use daeshboard_tui::config::{ConfigError, DashboardConfig};
use daeshboard_tui::error::TuiError;
use daeshboard_tui::events::{newest_key, TuiEvent};
use daeshboard_tui::keys::{map_key, KeyAction};
use daeshboard_tui::notifier::DesktopNotifier;
use daeshboard_tui::opener::SystemOpener;
use daeshboard_tui::theme::Theme;
use daeshboard_tui::{logging, sources, views};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

type PollerTask = JoinHandle<Result<PollerStats, PollerError>>;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("daeshboard: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), TuiError> {
    let config = DashboardConfig::load()?;
    logging::init(&config.log_path)?;

    let tabs = config.tab_order().map_err(|err| ConfigError::InvalidValue {
        field: "tabs",
        reason: err.to_string(),
    })?;
    let http = sources::http_client(&config)?;
    let store = Arc::new(SnapshotStore::new());

    let mut poller = Poller::new(Arc::clone(&store), config.poller_config());
    for (tab, adapter) in sources::build_sources(&config, http)? {
        poller.add_source(tab, adapter);
    }
    let refresh = poller.refresh_handle();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut poller_task: PollerTask = tokio::spawn(poller.run(shutdown_rx));

    let mut state = DashboardState::new(tabs, store, config.notify_failure());
    let notifier = DesktopNotifier::new(config.notifications.enabled);

    let mut terminal = setup_terminal()?;
    let guard = TerminalGuard;

    let (event_tx, event_rx) = mpsc::channel::<TuiEvent>(256);
    spawn_input_reader(event_tx);

    let exit = render_loop(
        &mut terminal,
        &mut state,
        &notifier,
        &refresh,
        event_rx,
        &mut poller_task,
    )
    .await;

    let (exit, poller_result) = match exit {
        Ok(LoopExit::PollerStopped(result)) => (Ok(()), result),
        other => {
            let _ = shutdown_tx.send(true);
            (other.map(|_| ()), poller_task.await)
        }
    };

    drop(guard);

    exit?;
    let stats = poller_result??;
    tracing::info!(
        cycles = stats.cycles,
        commits = stats.commits,
        failures = stats.failures,
        "Dashboard closed"
    );
    Ok(())
}

enum LoopExit {
    Quit,
    PollerStopped(Result<Result<PollerStats, PollerError>, tokio::task::JoinError>),
}

async fn render_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state: &mut DashboardState,
    notifier: &DesktopNotifier,
    refresh: &RefreshHandle,
    mut event_rx: mpsc::Receiver<TuiEvent>,
    poller_task: &mut PollerTask,
) -> Result<LoopExit, TuiError> {
    let theme = Theme::default();
    let opener = SystemOpener;
    let mut ticker = tokio::time::interval(FRAME_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut window_title = String::new();

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            joined = &mut *poller_task => return Ok(LoopExit::PollerStopped(joined)),
        }

        let mut pending = Vec::new();
        while let Ok(event) = event_rx.try_recv() {
            pending.push(event);
        }
        let action = newest_key(pending).and_then(map_key);
        if action == Some(KeyAction::Refresh) {
            refresh.request();
        }

        state.step(action.and_then(KeyAction::nav_input), Utc::now(), notifier, &opener)?;
        if state.should_close() {
            return Ok(LoopExit::Quit);
        }

        let title = views::window_title(state.nav().any_unread(state.store()));
        if title != window_title {
            execute!(terminal.backend_mut(), SetTitle(&title))?;
            window_title = title;
        }
        terminal.draw(|f| views::render(f, state, &theme))?;
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            let sent = match event::read() {
                Ok(CrosstermEvent::Key(key)) => sender.blocking_send(TuiEvent::Input(key)),
                Ok(CrosstermEvent::Resize(width, height)) => {
                    sender.blocking_send(TuiEvent::Resize { width, height })
                }
                _ => Ok(()),
            };
            if sent.is_err() {
                break;
            }
        }
        if sender.is_closed() {
            break;
        }
    });
}
