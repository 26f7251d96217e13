use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use nexus_console::{
    events, ui, App, Backend, DashboardContext, HttpBackend, PromptConsole, Settings,
    StatusPoller, View,
};

#[derive(Parser, Debug)]
#[command(name = "nexus-console")]
#[command(about = "Terminal dashboard for NEXUS AI metrics, backend health and prompts")]
struct Args {
    /// Path to a TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend origin (overrides config and REACT_APP_API_BASE_URL)
    #[arg(short, long)]
    api_url: Option<String>,

    /// Write logs to this file
    #[arg(short, long)]
    log_file: Option<PathBuf>,

    /// Seed for reproducible simulated metrics
    #[arg(short, long)]
    seed: Option<u64>,

    /// Poll backend health once, print it as JSON and exit
    #[arg(long, conflicts_with = "prompt")]
    check: bool,

    /// Send one prompt, print the transcript as JSON and exit
    #[arg(short, long)]
    prompt: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(url) = args.api_url {
        settings.api.base_url = url;
    }
    if let Some(path) = args.log_file {
        settings.logging.file = Some(path);
    }
    if args.seed.is_some() {
        settings.simulator.seed = args.seed;
    }

    let headless = args.check || args.prompt.is_some();
    init_tracing(settings.logging.file.as_deref(), headless)?;

    let backend: Arc<dyn Backend> = Arc::new(
        HttpBackend::builder()
            .base_url(settings.api.base_url.clone())
            .timeout(settings.api.timeout())
            .build()?,
    );

    // Build a tokio runtime
    let rt = tokio::runtime::Runtime::new()?;

    // Handle one-shot modes (non-interactive)
    if args.check {
        return rt.block_on(check(backend, &settings));
    }
    if let Some(text) = args.prompt {
        return rt.block_on(prompt_once(backend, &text));
    }

    run_dashboard(&rt, settings, backend)
}

/// Configure logging. The TUI owns the terminal, so without a log file
/// interactive runs discard log output.
fn init_tracing(log_file: Option<&Path>, headless: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        None if headless => builder.with_writer(io::stderr).try_init(),
        None => builder.with_writer(io::sink).try_init(),
    };
    installed.map_err(|e| anyhow!("failed to install log subscriber: {}", e))
}

/// Poll health once and print the snapshot
async fn check(backend: Arc<dyn Backend>, settings: &Settings) -> Result<()> {
    let snapshot = StatusPoller::new(backend).stale_after(settings.stale_after()).poll().await;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

/// Send one prompt and print the resulting messages
async fn prompt_once(backend: Arc<dyn Backend>, text: &str) -> Result<()> {
    let mut console = PromptConsole::new();
    if !console.submit(backend.as_ref(), text).await {
        anyhow::bail!("prompt is empty");
    }
    println!("{}", serde_json::to_string_pretty(console.messages())?);
    Ok(())
}

/// Run the TUI in the main thread while the dashboard timers run on the runtime
fn run_dashboard(
    rt: &tokio::runtime::Runtime,
    settings: Settings,
    backend: Arc<dyn Backend>,
) -> Result<()> {
    let refresh_interval = settings.refresh_interval();

    let _guard = rt.enter();
    let mut ctx = DashboardContext::new(settings, backend);
    ctx.start();
    info!("dashboard started");

    let mut app = App::new(ctx);
    let result = run_tui(&mut app, refresh_interval);

    // Single teardown point for every timer and in-flight request
    rt.block_on(app.ctx.shutdown());
    info!("dashboard stopped");

    result
}

/// Run the TUI until the user quits
fn run_tui(app: &mut App, refresh_interval: std::time::Duration) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    // Run the main loop
    let result = run_app(&mut terminal, app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: std::time::Duration,
) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 80;
    const MIN_HEIGHT: u16 = 20;

    while app.running {
        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let top = (area.height / 2).saturating_sub(2);
                let centered = ratatui::layout::Rect::new(0, top, area.width, 5.min(area.height));
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            // Render current view
            match app.current_view {
                View::Overview => ui::overview::render(frame, app, chunks[2]),
                View::Consciousness => ui::consciousness::render(frame, app, chunks[2]),
                View::Status => ui::status::render(frame, app, chunks[2]),
                View::Prompt => ui::prompt::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Timers update state in the background; poll input until the next redraw
        if let Some(event) = events::poll_event(refresh_interval)? {
            match event {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    events::handle_key_event(app, key)
                }
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                _ => {}
            }
        }
    }

    Ok(())
}
