mod app;
mod cli;

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use backdrop_config::Config;
use backdrop_core::{BackgroundKind, Settings};
use clap::Parser;
use color_eyre::eyre::WrapErr;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::cli::{Cli, Command, ExportArgs};

const LOG_ENV: &str = "BACKDROP_LOG";
const LOG_FILE: &str = "backdrop.log";

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(backdrop_config::default_path);
    let mut config = match &config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Some(Command::List) => {
            list_backgrounds();
            Ok(())
        }
        Some(Command::Export(args)) => export(&args, &config),
        None => {
            initialise_tracing();
            if let Some(background) = cli.background {
                config.background = background;
            }
            if let Some(fps) = cli.fps {
                config.fps = fps;
            }
            if let Some(settings) = &cli.settings {
                let background = config.background.clone();
                for (key, value) in settings.iter() {
                    config.set_setting(&background, key, value.clone());
                }
            }
            run(config, config_path)
        }
    }
}

fn run(config: Config, config_path: Option<PathBuf>) -> color_eyre::Result<()> {
    let terminal = ratatui::init();
    execute!(std::io::stdout(), EnableMouseCapture)?;
    let result = App::new(config, config_path).run(terminal);
    execute!(std::io::stdout(), DisableMouseCapture)?;
    ratatui::restore();
    result
}

/// Log to a file in the data directory; the terminal belongs to the UI.
fn initialise_tracing() {
    let Some(dir) = backdrop_config::data_dir() else {
        return;
    };
    let file = fs::create_dir_all(&dir).and_then(|()| File::create(dir.join(LOG_FILE)));
    let Ok(file) = file else {
        return;
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
}

fn list_backgrounds() {
    let defaults = Settings::new();
    for kind in BackgroundKind::ALL {
        println!("{:<22} {}", kind.key(), kind.label());
        for spec in backdrop_engine::build(kind, &defaults).schema() {
            println!(
                "    {:<20} {} ({} to {}, step {}, default {})",
                spec.key, spec.label, spec.min, spec.max, spec.step, spec.default
            );
        }
    }
}

fn export(args: &ExportArgs, config: &Config) -> color_eyre::Result<()> {
    let source_dirs = if args.source_dirs.is_empty() {
        &config.export.source_dirs
    } else {
        &args.source_dirs
    };
    let snippet = backdrop_export::generate_standalone(&args.key, source_dirs);
    if snippet.is_placeholder() {
        eprintln!(
            "warning: no source for `{}` in {:?}, wrote a placeholder",
            args.key, source_dirs
        );
    }
    match &args.output {
        Some(path) => snippet
            .write_to(path)
            .wrap_err_with(|| format!("exporting `{}`", args.key))?,
        None => println!("{}", snippet.html()),
    }
    Ok(())
}
