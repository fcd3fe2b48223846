use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use u_timetable::request::ScheduleRequest;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve a JSON scheduling request and print one CSV table per track
    Solve(SolveArgs),
}

#[derive(Debug, Args)]
struct SolveArgs {
    /// Path to the request file
    request: PathBuf,
    /// Overrides the request's random seed
    #[arg(long)]
    seed: Option<u64>,
    /// Overrides the request's generation limit
    #[arg(long)]
    generations: Option<usize>,
    /// Prints the tables as JSON instead of CSV
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Solve(args) => solve(args),
    }
}

fn solve(args: SolveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let json = fs::read_to_string(&args.request)?;
    let mut request = ScheduleRequest::from_json(&json)?;
    if let Some(seed) = args.seed {
        request.config.seed = Some(seed);
    }
    if let Some(generations) = args.generations {
        request.config.generation_limit = generations;
    }

    let response = request.run();
    log::info!(
        "Best fitness {:.4} ({} conflicts) after {} generations in {:.2?}",
        response.result.fitness.value,
        response.result.fitness.conflicts,
        response.result.generations,
        response.result.elapsed
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response.export)?);
    } else {
        print!("{}", response.export.to_csv());
    }
    Ok(())
}
