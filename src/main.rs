use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use poolwatch::app::{self, Session};
use poolwatch::{
    logging, DashboardView, HttpSource, Overrides, Settings, StatusSource, TerminalScreen, Theme,
};

/// How long to wait for the poller to stop after the user quits.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[derive(Parser, Debug)]
#[command(name = "poolwatch")]
#[command(about = "Live terminal dashboard for PHP-FPM style process pools")]
struct Args {
    /// Status page URL (queried with ?json)
    #[arg(short, long, default_value = poolwatch::config::DEFAULT_STATUS_URL)]
    url: String,

    /// Label language (en, ru)
    #[arg(short, long, default_value = poolwatch::config::DEFAULT_LANG)]
    lang: String,

    /// Append logs to this file (logging is off otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter, e.g. "info" or "poolwatch=debug"
    #[arg(long, default_value = poolwatch::config::DEFAULT_LOG_LEVEL)]
    log_level: String,
}

impl From<Args> for Overrides {
    fn from(args: Args) -> Self {
        Self {
            status_url: Some(args.url),
            lang: Some(args.lang),
            log_file: args.log_file,
            log_level: Some(args.log_level),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::load(&args.into())?;
    logging::init(&settings)?;

    info!("Starting poolwatch for {}", settings.status_url);
    let result = run(&settings);
    if let Err(ref e) = result {
        error!("Exiting with error: {:#}", e);
    }
    result
}

fn run(settings: &Settings) -> Result<()> {
    let source = HttpSource::new(&settings.status_url)?;
    let description = source.description().to_string();
    let locale = settings.locale();

    // The poller runs on the runtime; the TUI stays on the main thread.
    let rt = tokio::runtime::Runtime::new().context("failed to start async runtime")?;

    let view = DashboardView::new(locale, Theme::auto_detect(), description);
    let Session {
        mut screen,
        mut app,
        stop,
        poller,
    } = app::start(rt.handle(), source, || TerminalScreen::init(view))?;

    let result = app::run(&mut screen, &mut app);
    let restored = screen.restore();

    // Signal shutdown and give an in-flight fetch a moment to be dropped.
    let _ = stop.send(true);
    match rt.block_on(async { tokio::time::timeout(SHUTDOWN_GRACE, poller).await }) {
        Ok(Ok(())) => info!("Status poller stopped"),
        Ok(Err(e)) => warn!("Status poller ended abnormally: {}", e),
        Err(_) => warn!("Status poller did not stop within {:?}", SHUTDOWN_GRACE),
    }

    result?;
    restored
}
