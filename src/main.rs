use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

use sunbucks::Mode;
use sunbucks::core::config::{self, CliOverrides};

#[derive(Parser)]
#[command(name = "sunbucks", about = "Mood-based menu recommendations kiosk")]
struct Args {
    /// How to obtain the customer's mood
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// Camera source: webcam index (default 0), "pattern", an image file, or a directory of images
    #[arg(short, long)]
    camera: Option<String>,

    /// Base URL of the emotion service
    #[arg(short, long)]
    service_url: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to sunbucks.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("sunbucks.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("{}; falling back to defaults", e);
            eprintln!("Warning: {e}; using defaults");
            config::SunbucksConfig::default()
        }
    };

    let cli = CliOverrides {
        mode: args.mode,
        camera: args.camera,
        service_url: args.service_url,
    };
    let resolved = config::resolve(&file_config, &cli);

    log::info!(
        "Sunbucks starting up: mode={:?}, service={}, camera={}",
        resolved.mode,
        resolved.service_url,
        resolved.camera_source
    );

    sunbucks::tui::run(resolved)
}
