use clap::{ArgAction, Parser, error::ErrorKind};
use std::path::PathBuf;

use screengif::{
    Config, PipelineDependencies, RunSettings, config::Overrides, output::Delivered, pipeline,
};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("SCREENGIF_GIT_HASH"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "screengif")]
#[command(version, long_version = LONG_VERSION, about = "Record a short animated GIF of the screen")]
struct Cli {
    /// Seconds between frames (0.1 - 1.0) [default: 0.1]
    #[arg(long, value_name = "SECONDS", allow_hyphen_values = true)]
    interval: Option<String>,

    /// Total recording time in whole seconds (2 - 10) [default: 5]
    #[arg(long, value_name = "SECONDS", allow_hyphen_values = true)]
    duration: Option<String>,

    /// Put the GIF on the clipboard instead of saving it to the desktop
    #[arg(long, short = 'c', action = ArgAction::SetTrue)]
    clipboard: bool,

    /// Save into this directory instead of the desktop
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Print stage-by-stage diagnostics
    #[arg(long, action = ArgAction::SetTrue)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = parse_cli();
    init_logging(cli.debug);

    let config = Config::load()?;
    let overrides = Overrides {
        interval: cli.interval,
        duration: cli.duration,
        clipboard: cli.clipboard,
        output_dir: cli.output_dir,
    };
    let settings = RunSettings::resolve(&config, &overrides)?;
    log::debug!("Resolved settings: {:?}", settings);

    let outcome = pipeline::run(settings, &PipelineDependencies::default())?;

    if let Some(warning) = outcome.warning() {
        eprintln!("warning: {}", warning);
    }
    match &outcome.delivered {
        Delivered::Saved(path) => println!("{}", path.display()),
        Delivered::Clipboard { path, error: None } => {
            log::info!("Clipboard now references {}", path.display());
        }
        Delivered::Clipboard { .. } => {}
    }

    Ok(())
}

/// Argument errors exit with status 1 like every other invalid invocation.
fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                let _ = err.print();
                std::process::exit(1);
            }
        },
    }
}

fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}
