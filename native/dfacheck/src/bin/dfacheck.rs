// dfacheck: validate a batch of automata and simulate their test words
//
// Usage:
//   dfacheck --input automata.json --output results.json
//   cat automata.json | dfacheck --no-render --pretty

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use dfacheck::{BatchProcessor, EngineConfig, ErrorResponse};

#[derive(Parser, Debug)]
#[command(name = "dfacheck")]
#[command(about = "Validate deterministic finite automata and evaluate their test words")]
struct Args {
    /// Request file holding a JSON array of automata ("-" reads stdin)
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Where to write the JSON response (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON engine config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory rendered graphs are written to
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Skip graph rendering
    #[arg(long)]
    no_render: bool,

    /// Process automata on all cores
    #[arg(long)]
    parallel: bool,

    /// Pretty-print the response
    #[arg(long)]
    pretty: bool,
}

impl Args {
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_file(path)?,
            None => EngineConfig::default(),
        };
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if self.no_render {
            config.render_graphs = false;
        }
        if self.parallel {
            config.parallel = true;
        }
        Ok(config)
    }

    fn read_request(&self) -> Result<String> {
        if self.input == "-" {
            let mut request = String::new();
            io::stdin()
                .read_to_string(&mut request)
                .context("Failed to read request from stdin")?;
            Ok(request)
        } else {
            fs::read_to_string(&self.input)
                .with_context(|| format!("Failed to read request from {}", self.input))
        }
    }

    fn write_response(&self, body: &impl serde::Serialize) -> Result<()> {
        let mut text = if self.pretty {
            serde_json::to_string_pretty(body)?
        } else {
            serde_json::to_string(body)?
        };
        text.push('\n');

        match &self.output {
            Some(path) => fs::write(path, text)
                .with_context(|| format!("Failed to write response to {}", path.display())),
            None => io::stdout()
                .write_all(text.as_bytes())
                .context("Failed to write response to stdout"),
        }
    }
}

fn run(args: &Args) -> Result<bool> {
    let config = args.engine_config()?;
    info!("Engine config: {config:?}");

    let request = args.read_request()?;
    let processor = BatchProcessor::new(config);

    match processor.process_json(&request) {
        Ok(results) => {
            args.write_response(&results)?;
            Ok(true)
        }
        Err(err) => {
            error!("Rejected request: {err}");
            args.write_response(&ErrorResponse {
                error: err.to_string(),
            })?;
            Ok(false)
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
