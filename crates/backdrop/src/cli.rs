use std::path::PathBuf;

use backdrop_core::Settings;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "backdrop",
    author,
    version,
    about = "Pointer-reactive animated backgrounds in the terminal"
)]
pub struct Cli {
    /// Background to start with (see `backdrop list`).
    #[arg(short, long, value_name = "KEY", env = "BACKDROP_BACKGROUND")]
    pub background: Option<String>,

    /// Frames per second.
    #[arg(long, value_name = "N")]
    pub fps: Option<u32>,

    /// Configuration file. Defaults to `config.toml` in the user config directory.
    #[arg(short, long, value_name = "PATH", env = "BACKDROP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Settings object as JSON, applied over the saved settings of the
    /// starting background.
    #[arg(long, value_name = "JSON", value_parser = parse_settings)]
    pub settings: Option<Settings>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List backgrounds and their adjustable settings.
    List,
    /// Write a standalone HTML snippet for a background.
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Background key.
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Directory containing `<KEY>.js`. May be repeated; overrides the config.
    #[arg(long = "source-dir", value_name = "DIR")]
    pub source_dirs: Vec<PathBuf>,

    /// Output file. Prints to stdout when omitted.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn parse_settings(value: &str) -> Result<Settings, String> {
    serde_json::from_str(value).map_err(|err| format!("invalid settings JSON: {err}"))
}
