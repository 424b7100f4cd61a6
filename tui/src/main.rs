//! Comedia Lab Entry Point
//!
//! Launches the terminal UI for the stand-up comedy writing lab.
//!
//! Usage:
//!   comedia-lab [OPTIONS]
//!
//! Options:
//!   --config <PATH>       Config file (default: ~/.config/comedia-lab/config.toml)
//!   --data-dir <DIR>      Where bits, diary and logs are kept
//!   --provider <NAME>     AI provider: gemini or ollama
//!   --model <MODEL>       Model name for the provider
//!   --no-speech           Disable read-aloud
//!   --open <LINK>         Open a guide deep link such as #guide-callback

use std::fs::{self, OpenOptions};
use std::io::{self, IsTerminal};
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::event::{
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use comedia_lab_tui::{App, SystemClipboard};
use lab_core::{load_config_from_path, ConfigOverrides, Lab, LabConfig, LabServices, Provider};

/// Log file inside the data directory
const LOG_FILE: &str = "comedia-lab.log";

#[derive(Parser)]
#[command(name = "comedia-lab")]
#[command(about = "A writing lab for stand-up comedy", version)]
struct Cli {
    /// Config file to load instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for saved bits, the diary and the log file
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// AI provider (gemini or ollama)
    #[arg(long)]
    provider: Option<Provider>,

    /// Model name for the provider
    #[arg(long)]
    model: Option<String>,

    /// Disable read-aloud
    #[arg(long)]
    no_speech: bool,

    /// Guide deep link to open on start, e.g. "#guide-callback"
    #[arg(long)]
    open: Option<String>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if let Some(dir) = &self.data_dir {
            overrides = overrides.with_data_dir(dir.clone());
        }
        if let Some(provider) = self.provider {
            overrides = overrides.with_provider(provider);
        }
        if let Some(model) = &self.model {
            overrides = overrides.with_model(model.clone());
        }
        if self.no_speech {
            overrides = overrides.with_speech_enabled(false);
        }
        overrides
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Check if we have a TTY before attempting initialization
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: comedia-lab requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means:");
        eprintln!("  - Running in a non-interactive environment (CI, container)");
        eprintln!("  - SSH without -t flag");
        eprintln!("  - Piped stdin/stdout");
        std::process::exit(1);
    }

    let config = prepare(&cli)?;

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let services = LabServices::from_config(&config)
        .with_clipboard(Box::new(SystemClipboard::new()));
    let mut lab = Lab::open(services).await;
    if let Some(link) = &cli.open {
        lab.open_deep_link(link);
    }

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let enhanced_keys = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced_keys {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let mut app = App::new(lab);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    if enhanced_keys {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Let pending writes land before exiting
    let mut lab = app.into_lab();
    lab.shutdown().await;

    result
}

/// Load configuration, create the data directory and start logging
fn prepare(cli: &Cli) -> anyhow::Result<LabConfig> {
    let mut config = load_config_from_path(cli.config.clone()).context("loading configuration")?;
    cli.overrides().apply(&mut config);
    config.validate().context("validating configuration")?;

    fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating data directory {}", config.data_dir.display()))?;
    init_logging(&config.data_dir)?;

    tracing::info!(
        source = ?config.source(),
        data_dir = %config.data_dir.display(),
        provider = ?config.assistant.provider,
        "Configuration loaded"
    );
    Ok(config)
}

/// Log to a file; the terminal belongs to the UI
fn init_logging(data_dir: &Path) -> anyhow::Result<()> {
    let path = data_dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    Ok(())
}
