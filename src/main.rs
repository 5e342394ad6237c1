//! `product-scraper` command line.
//!
//! Usage:
//!   product-scraper --extension ./extension.xpi https://shop.example/product/chair
//!   product-scraper --input input.json --output products.json --headless
//!   product-scraper --config selectors.json --debug <URL>...

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use product_scraper::{Driver, JsonSink, Result, RunInput, Runner, ScraperConfig};

// ============================================================================
// Args
// ============================================================================

/// Scrape WooCommerce product pages, variants included, with Firefox.
#[derive(Parser, Debug)]
#[command(name = "product-scraper")]
#[command(version)]
struct Args {
    /// Product page URLs, visited after those from --input.
    urls: Vec<String>,

    /// JSON input file: {"urls": [{"url": "..."}]}.
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Write results here instead of stdout.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// JSON file overriding selectors and timing.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Firefox executable (default: `firefox` on PATH).
    #[arg(long, value_name = "PATH")]
    firefox: Option<PathBuf>,

    /// Automation extension: unpacked directory or .xpi file.
    #[arg(long, value_name = "PATH", env = "PRODUCT_SCRAPER_EXTENSION")]
    extension: Option<PathBuf>,

    /// Run Firefox without a visible window.
    #[arg(long)]
    headless: bool,

    /// Browser window size.
    #[arg(long, value_name = "WxH", default_value_t = WindowSize::default())]
    window_size: WindowSize,

    /// Verbose logging.
    #[arg(long)]
    debug: bool,
}

/// `WIDTHxHEIGHT` in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WindowSize {
    width: u32,
    height: u32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl FromStr for WindowSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (width, height) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|e| format!("invalid dimension {part:?}: {e}"))
        };
        Ok(Self {
            width: parse(width)?,
            height: parse(height)?,
        })
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    if let Err(e) = run(args).await {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        "product_scraper=debug"
    } else {
        "product_scraper=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => ScraperConfig::from_file(path)?,
        None => ScraperConfig::default(),
    };

    let input = match &args.input {
        Some(path) => RunInput::from_file(path)?,
        None => RunInput::default(),
    };
    let urls = input.with_urls(args.urls).start_urls();

    if urls.is_empty() {
        info!("No start URLs, nothing to scrape");
        return Ok(());
    }

    let mut builder = Driver::builder();
    if let Some(firefox) = args.firefox {
        builder = builder.binary(firefox);
    }
    if let Some(extension) = args.extension {
        builder = builder.extension(extension);
    }
    let driver = builder.build()?;

    let mut window = driver
        .window()
        .window_size(args.window_size.width, args.window_size.height);
    if args.headless {
        window = window.headless();
    }
    let window = window.spawn().await?;
    debug!(pid = window.pid(), port = window.port(), "Browser ready");

    let mut sink = match args.output {
        Some(path) => JsonSink::file(path),
        None => JsonSink::stdout(),
    };

    let summary = Runner::new(&config)
        .run_session(window, urls, &mut sink)
        .await?;

    info!(
        scraped = summary.scraped,
        failed = summary.failed,
        duplicates = summary.duplicates,
        "Done"
    );
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
