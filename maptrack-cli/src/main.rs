use clap::Parser;
use maptrack::io::load_rgba_image;
use maptrack::{DirResources, InferParams, Inference, MapTracker, TrackerConfig};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Locate the mini-map and pointer heading in a screenshot")]
struct Cli {
    /// Screenshot to analyse (PNG or JPEG).
    #[arg(short, long, value_name = "FILE", required_unless_present = "print_example")]
    screen: Option<PathBuf>,
    /// Resource root to search before the default ones. May be repeated.
    #[arg(short, long = "resource", value_name = "DIR")]
    resources: Vec<PathBuf>,
    /// Inference parameters as JSON, e.g. '{"precision":0.4,"threshold":0.5}'.
    #[arg(short, long, value_name = "JSON", default_value = "")]
    params: String,
    /// Tracker configuration file (JSON); defaults apply when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Write the result to a file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Print an example tracker config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Output<'a> {
    screen: String,
    precision: f64,
    threshold: f64,
    #[serde(flatten)]
    inference: &'a Inference,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("maptrack=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config: TrackerConfig = match &cli.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => TrackerConfig::default(),
    };
    let params = InferParams::from_json(&cli.params);
    let Some(screen_path) = cli.screen else {
        return Err("--screen is required".into());
    };

    let tracker = MapTracker::new(config, DirResources::new(cli.resources))?;
    let screen = load_rgba_image(&screen_path)?;
    let inference = tracker.infer(screen.view(), &params)?;
    let output = Output {
        screen: screen_path.display().to_string(),
        precision: params.precision,
        threshold: params.threshold,
        inference: &inference,
    };
    let json = serde_json::to_string_pretty(&output)?;

    match cli.output {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
