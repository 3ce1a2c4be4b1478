//! EyeTrainer - voice-driven tumbling-E vision training
//!
//! Terminal front end: each stdin line is a final transcript (or, with
//! `--manual`, a direction button such as `u`/`d`/`l`/`r`). Type `q` to
//! stop early.

use anyhow::Result;
use clap::Parser;
use eyetrainer::config::{self, TrainerConfig};
use eyetrainer::direction::Direction;
use eyetrainer::feedback::LogFeedback;
use eyetrainer::history::{JsonHistoryStore, SessionStore};
use eyetrainer::runtime::{spawn_session, SessionInput};
use eyetrainer::session::SessionController;
use eyetrainer::transport::{SpeechTransport, StdinTransport, UnavailableTransport};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Session length in seconds
    #[arg(short, long)]
    duration: Option<u32>,

    /// Grid rows
    #[arg(long)]
    rows: Option<usize>,

    /// Grid columns
    #[arg(long)]
    cols: Option<usize>,

    /// Print training history statistics and exit
    #[arg(long)]
    history: bool,

    /// Write the training history as JSON to a file or directory and exit
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Skip speech input; answer with u/d/l/r
    #[arg(short, long)]
    manual: bool,

    /// Config file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let mut config = TrainerConfig::load_from(&config_path)?;

    // Setup logging
    let level = if args.verbose {
        "debug".to_string()
    } else {
        config.log_level.to_lowercase()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("👁️ EyeTrainer v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Some(duration) = args.duration {
        config.session.duration_secs = duration;
    }
    if let Some(rows) = args.rows {
        config.session.grid_rows = rows;
    }
    if let Some(cols) = args.cols {
        config.session.grid_cols = cols;
    }

    let store = Arc::new(JsonHistoryStore::open(config.history_file()));
    if args.history {
        print_history(store.as_ref())?;
        return Ok(());
    }
    if let Some(target) = &args.export {
        let written = store.export_to(target)?;
        println!("Exported history to {}", written.display());
        return Ok(());
    }

    let transport: Arc<dyn SpeechTransport> = if args.manual {
        Arc::new(UnavailableTransport::new("manual input requested"))
    } else {
        Arc::new(StdinTransport::new())
    };

    let controller = SessionController::new(&config)?
        .with_feedback(Arc::new(LogFeedback))
        .with_store(store.clone())
        .with_transport(transport);

    let (tx, handle) = spawn_session(controller);
    spawn_stdin_reader(tx, args.manual);

    info!(
        "✅ Ready - {}",
        if args.manual {
            "type u/d/l/r for each glyph, q to stop"
        } else {
            "type what you would say (e.g. '上', 'left'), q to stop"
        }
    );

    let result = handle.await??;
    println!();
    println!("Session complete");
    println!("  Correct:   {}/{}", result.correct_answers, result.total_attempts);
    println!("  Accuracy:  {}%", result.accuracy);
    println!("  Cells:     {}", result.completed_cells);
    println!("  Duration:  {}s", result.duration_seconds);
    Ok(())
}

/// Forward stdin lines to the session from a plain thread; a blocked
/// read must not hold up runtime shutdown.
fn spawn_stdin_reader(tx: mpsc::Sender<SessionInput>, manual: bool) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let input = if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
                SessionInput::Stop
            } else if manual {
                match line.parse::<Direction>() {
                    Ok(direction) => SessionInput::Direction(direction),
                    Err(e) => {
                        warn!("⚠️ {}", e);
                        continue;
                    }
                }
            } else {
                SessionInput::Transcript(Some(line.to_string()))
            };

            if tx.blocking_send(input).is_err() {
                break;
            }
        }
    });
}

fn print_history(store: &dyn SessionStore) -> Result<()> {
    let stats = store.stats()?;
    println!("Sessions:         {}", stats.total_sessions);
    println!("Average accuracy: {}%", stats.average_accuracy);
    println!("Average cells:    {}", stats.average_completed_cells);
    println!("Best accuracy:    {}%", stats.best_accuracy);
    println!("Training time:    {}s", stats.total_training_time);

    let recent = store.recent(10)?;
    if !recent.is_empty() {
        println!();
        println!("Recent sessions:");
        for record in recent {
            println!(
                "  {}  {:>3}%  {}/{} correct  {}s",
                record.timestamp,
                record.result.accuracy,
                record.result.correct_answers,
                record.result.total_attempts,
                record.result.duration_seconds
            );
        }
    }
    Ok(())
}
