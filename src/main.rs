use clap::{Parser, Subcommand};
use std::path::PathBuf;

use typespeed::analytics::{summary, trend_slope};
use typespeed::error::Error;
use typespeed::store::ResultStore;

/// typing speed test result history, per-user statistics, and leaderboards
#[derive(Parser, Debug)]
#[clap(version, about)]
struct Cli {
    /// path to the results database (defaults to the local state dir)
    #[clap(long)]
    db: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// show a user's test history, newest first
    History { username: String },
    /// show a user's WPM and accuracy progress with trend slopes
    Progress { username: String },
    /// show a user's aggregate statistics
    Summary { username: String },
    /// show the global leaderboard
    Leaderboard {
        /// number of entries to show
        #[clap(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// export a user's history to a CSV file
    Export {
        username: String,
        /// output path
        #[clap(short, long, default_value = "typing_results.csv")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let store = match &cli.db {
        Some(path) => ResultStore::open(path)?,
        None => ResultStore::open_default()?,
    };

    match cli.command {
        Command::History { username } => {
            let history = store.load_history(&username)?;
            if history.is_empty() {
                println!("no completed sessions for {username}");
                return Ok(());
            }
            println!(
                "{:<10} {:<13} {:>7} {:>9} {:>7} {:>9}  {}",
                "mode", "difficulty", "wpm", "accuracy", "errors", "duration", "timestamp"
            );
            for row in history {
                println!(
                    "{:<10} {:<13} {:>7.1} {:>8.1}% {:>7} {:>8.1}s  {}",
                    row.mode,
                    row.difficulty,
                    row.wpm,
                    row.accuracy,
                    row.errors,
                    row.duration_secs,
                    row.timestamp
                );
            }
        }
        Command::Progress { username } => {
            let progress = store.load_progress(&username)?;
            if progress.is_empty() {
                println!("no completed sessions for {username}");
                return Ok(());
            }
            for row in &progress {
                println!("{}  wpm {:>6.1}  accuracy {:>5.1}%", row.timestamp, row.wpm, row.accuracy);
            }
            let wpm_values: Vec<f64> = progress.iter().map(|r| r.wpm).collect();
            let accuracy_values: Vec<f64> = progress.iter().map(|r| r.accuracy).collect();
            match trend_slope(&wpm_values) {
                Some(slope) if slope > 0.0 => println!("wpm trend: improving, +{slope:.2} per test"),
                Some(slope) if slope < 0.0 => println!("wpm trend: declining, {slope:.2} per test"),
                Some(_) => println!("wpm trend: no change over time"),
                None => println!("wpm trend: not enough data"),
            }
            if let Some(slope) = trend_slope(&accuracy_values) {
                println!("accuracy trend: {slope:+.2} per test");
            }
        }
        Command::Summary { username } => {
            let progress = store.load_progress(&username)?;
            match summary(&progress) {
                Ok(s) => {
                    println!("statistics for {username}");
                    println!("  tests completed:  {}", s.tests_completed);
                    println!("  average wpm:      {:.1}", s.avg_wpm);
                    println!("  highest wpm:      {:.1} (on {})", s.max_wpm, s.best_wpm_at);
                    println!("  average accuracy: {:.1}%", s.avg_accuracy);
                    println!("  highest accuracy: {:.1}%", s.max_accuracy);
                }
                Err(Error::EmptyHistory) => println!("no completed sessions for {username}"),
                Err(e) => return Err(e.into()),
            }
        }
        Command::Leaderboard { limit } => {
            let rows = store.load_leaderboard(limit)?;
            if rows.is_empty() {
                println!("no leaderboard data yet");
                return Ok(());
            }
            println!(
                "{:<5} {:<15} {:>7} {:>9}  {:<10} {:<13} {}",
                "rank", "username", "wpm", "accuracy", "mode", "difficulty", "date"
            );
            for (i, row) in rows.iter().enumerate() {
                let date = row.timestamp.split(' ').next().unwrap_or(row.timestamp.as_str());
                println!(
                    "{:<5} {:<15} {:>7.1} {:>8.1}%  {:<10} {:<13} {}",
                    i + 1,
                    row.username,
                    row.wpm,
                    row.accuracy,
                    row.mode,
                    row.difficulty,
                    date
                );
            }
        }
        Command::Export { username, output } => {
            store.export_history(&username, &output)?;
            println!("exported history for {username} to {}", output.display());
        }
    }

    Ok(())
}
