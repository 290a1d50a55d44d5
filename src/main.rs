//! Thin CLI over the library: picks the flow, builds a [`Config`] and
//! prints the run summary.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use huaban_dl::run::{self, Config, Mode};
use huaban_dl::Client;
use log::LevelFilter;
use simple_logger::SimpleLogger;

#[derive(Parser, Debug)]
#[command(
    name = "huaban-dl",
    version,
    about = "Download every image of a huaban board or user"
)]
struct Cli {
    /// Root directory receiving one subdirectory per board.
    #[arg(long, global = true, default_value = "images")]
    out: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download every board owned by a user.
    User { username: String },
    /// Download a single board by its id.
    Board { board_id: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if SimpleLogger::new().with_level(LevelFilter::Info).init().is_err() {
        eprintln!("could not install the logger");
    }

    let (mode, identifier) = match cli.command {
        Commands::User { username } => (Mode::UserBoards, username),
        Commands::Board { board_id } => (Mode::SingleBoard, board_id),
    };
    let config = Config {
        mode,
        identifier,
        root: cli.out,
    };

    match run::run(&Client::new(), &config).await {
        Ok(summary) => {
            for report in &summary.boards {
                println!(
                    "[{} - {}] downloaded {}, failed {}, missing {}",
                    report.board_id, report.title, report.downloaded, report.failed, report.missing
                );
            }
            println!(
                "downloaded {} images in {:.2?}",
                summary.total_downloaded, summary.elapsed
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
