//! A terminal pager with a "back to top" control.
//!
//! Scroll past a few screens and the control appears in the bottom-right
//! corner, its ring filling with scroll progress.  Leave it alone for a
//! while and it starts to pulse.  Click it, focus it with Tab and press
//! Enter/Space, or hit the global shortcut to glide back to the top.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::app::{
    document::Document,
    event::{spawn_event_reader, AppEvent},
    handler,
    state::{AppState, Focus},
};
use crate::config::AppConfig;
use crate::ui::{
    back_to_top::BackToTopButton,
    document_view::DocumentView,
    layout::{bottom_right, AppLayout},
    theme::Theme,
};

/// Longest the loop sleeps when nothing is scheduled.
const IDLE_WAIT: Duration = Duration::from_millis(250);

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Pager with a back-to-top control")]
struct Cli {
    /// Text file to page.  A generated catalogue is shown when omitted.
    path: Option<PathBuf>,

    /// Number of lines in the generated catalogue.
    #[arg(long, default_value_t = 400)]
    demo_lines: usize,

    /// Offset (distance units) past which the control appears.
    #[arg(long)]
    threshold: Option<f64>,

    /// Idle time before the control starts to pulse.
    #[arg(long)]
    pulse_delay_ms: Option<u64>,

    /// Length of the scroll-to-top animation.
    #[arg(long)]
    duration_ms: Option<u64>,

    /// Write the effective configuration to the config file and exit.
    #[arg(long)]
    write_config: bool,

    /// Send logs here instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        let t = &mut config.tunables;
        if let Some(v) = self.threshold {
            t.visibility_threshold = v.max(0.0);
        }
        if let Some(v) = self.pulse_delay_ms {
            t.pulse_delay_ms = v;
        }
        if let Some(v) = self.duration_ms {
            t.scroll_duration_ms = v.max(1);
        }
    }
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr) // never pollute stdout
                .init();
        }
    }
    Ok(())
}

// ───────────────────────────────────────── drawing ──────────

fn draw(frame: &mut Frame, state: &mut AppState, elapsed: Duration) {
    let layout = AppLayout::from_area(frame.area());

    let block = Block::default()
        .title(format!(" {} ", state.document.title))
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(Theme::border_style());
    let inner = block.inner(layout.document_area);
    state.document.set_viewport_rows(inner.height);

    frame.render_widget(
        DocumentView::new(&state.document).block(block),
        layout.document_area,
    );

    let render = state.controller.render_state();
    state.control_area = bottom_right(
        inner,
        BackToTopButton::WIDTH,
        BackToTopButton::HEIGHT,
        1,
    );
    if let Some(area) = state.control_area {
        frame.render_widget(
            BackToTopButton {
                state: render,
                focused: state.focus == Focus::Control,
                elapsed,
            },
            area,
        );
    }

    let hint = state.config.status_bar_hint();
    let status_text = match state.status_message.as_deref() {
        Some(msg) => msg.to_string(),
        None if state.controller.is_scrolling() => {
            format!("{:>3.0}%  scrolling to top…", state.controller.progress())
        }
        None => format!("{:>3.0}%  {}", state.controller.progress(), hint),
    };
    let status = Paragraph::new(status_text).style(Theme::status_bar_style());
    frame.render_widget(status, layout.status_area);
}

// ───────────────────────────────────────── main ─────────────

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    state: &mut AppState,
) -> Result<()> {
    let clock = Instant::now();
    let mut events = spawn_event_reader(IDLE_WAIT);

    state.mount();

    loop {
        // Catch up on timers, frames, and the scroll signals caused by the
        // last input before drawing.
        state.pump(clock.elapsed());
        if state.should_quit {
            break;
        }

        let elapsed = clock.elapsed();
        terminal.draw(|frame| draw(frame, state, elapsed))?;

        let now = clock.elapsed();
        let wait = state
            .next_wake(now)
            .map_or(IDLE_WAIT, |wake| wake.saturating_sub(now).min(IDLE_WAIT));

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                // Anything that came due before this input runs first.
                state.pump(clock.elapsed());
                match event {
                    AppEvent::Key(k) => handler::handle_key(state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(state, m),
                    AppEvent::Resize => {}
                    AppEvent::Tick => {}
                }
            }

            _ = tokio::time::sleep(wait) => {}
        }
    }

    state.unmount();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let mut config = AppConfig::load();
    cli.apply_overrides(&mut config);

    if cli.write_config {
        let path = config.save()?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    let row_units = config.tunables.row_units;
    let document = match &cli.path {
        Some(path) => Document::load(path, row_units)?,
        None => Document::demo(cli.demo_lines, row_units),
    };
    tracing::info!(
        title = %document.title,
        lines = document.lines().len(),
        "document loaded"
    );
    let mut state = AppState::new(document, config);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let outcome = run(&mut terminal, &mut state).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    outcome
}
