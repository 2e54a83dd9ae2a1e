mod config;
mod report;
mod script;

use std::fs::File;
use std::io::{self, BufRead, BufReader};

use canvas::engine::EngineCore;
use clap::{Parser, ValueEnum};

use crate::config::{ConfigArgs, ConfigError};
use crate::report::Report;
use crate::script::ScriptError;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to open {path}: {source}")]
    Open { path: String, source: io::Error },
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("failed to render report: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    /// One line per element
    Summary,
    /// The full element list as pretty JSON
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "structboard", about = "Replay whiteboard input scripts headlessly")]
struct Cli {
    #[arg(default_value = "-", help = "Script path, or - for stdin")]
    script: String,

    #[arg(long, value_enum, default_value_t = Format::Summary)]
    format: Format,

    #[command(flatten)]
    config: ConfigArgs,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let config = cli.config.to_board_config()?;
    tracing::info!(
        viewport_width = config.viewport_width,
        viewport_height = config.viewport_height,
        delete_zone = config.delete_zone_size,
        history_limit = config.history_limit,
        "board configured"
    );

    let reader: Box<dyn BufRead> = if cli.script == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(&cli.script).map_err(|source| CliError::Open { path: cli.script.clone(), source })?;
        Box::new(BufReader::new(file))
    };
    let script = script::parse_script(reader)?;

    let mut core = EngineCore::with_config(config);
    let stats = script::replay(&mut core, &script)?;

    match cli.format {
        Format::Summary => print!("{}", report::summary(&core)),
        Format::Json => {
            let rendered = serde_json::to_string_pretty(&Report::new(&core, &stats.removed))?;
            println!("{rendered}");
        }
    }
    Ok(())
}
