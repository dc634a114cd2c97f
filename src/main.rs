//! Binary entrypoint for the geoquest CLI.
//!
//! Commands:
//! - `init` - create a starter `config.toml`
//! - `play --quest <id>` - run an interactive play session against the backend
//! - `whereami` - run one position acquisition and print the result
//! - `tiers` - print the milestone reward table
//!
//! See the library crate docs for module-level details: `geoquest::`.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use std::io::{BufRead, Write};

use geoquest::backend::HttpQuestBackend;
use geoquest::config::Config;
use geoquest::geo::{Coordinate, GeoLocator, StaticPositionSource, UserPosition};
use geoquest::map::{render_quest, LogRenderer};
use geoquest::play::{ClearOutcome, PlayError, PlaySession, QuizAnswer, RewardTier, SubmitResult};

#[derive(Parser)]
#[command(name = "geoquest")]
#[command(about = "Location-gated quest play engine")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a starter configuration file
    Init,
    /// Play a quest interactively
    Play {
        /// Quest identifier
        #[arg(short, long)]
        quest: String,
        /// Override the position source latitude (defaults to the
        /// configured fallback coordinate)
        #[arg(long, requires = "lng")]
        lat: Option<f64>,
        /// Override the position source longitude
        #[arg(long, requires = "lat")]
        lng: Option<f64>,
    },
    /// Acquire one position reading and print it
    Whereami,
    /// Print the milestone reward table
    Tiers,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    init_logging(&pre_config, cli.verbose);

    match cli.command {
        Commands::Init => {
            Config::create_default(&cli.config).await?;
            println!("Wrote starter configuration to {}", cli.config);
            println!("Edit backend.base_url before playing.");
            Ok(())
        }
        Commands::Play { quest, lat, lng } => {
            let config = Config::load(&cli.config).await?;
            let start_at = match (lat, lng) {
                (Some(lat), Some(lng)) => Coordinate::new(lat, lng)?,
                _ => config.geo.fallback_coordinate(),
            };
            run_play(&config, &quest, start_at).await
        }
        Commands::Whereami => {
            let config = Config::load(&cli.config).await?;
            let source = StaticPositionSource::new(config.geo.fallback_coordinate());
            let mut locator = GeoLocator::new(source, config.geo.clone());
            let position = locator.acquire().await;
            print_position(position);
            Ok(())
        }
        Commands::Tiers => {
            println!("Cleared quests  Tier");
            for tier in RewardTier::ALL {
                println!("{:>14}  {}", tier.threshold(), tier.title());
            }
            Ok(())
        }
    }
}

fn print_position(position: &UserPosition) {
    println!(
        "({:.7}, {:.7}) acquired {}{}",
        position.coordinate.latitude,
        position.coordinate.longitude,
        position.acquired_at.format("%H:%M:%SZ"),
        if position.is_fallback {
            " [fallback: location unavailable, using default]"
        } else {
            ""
        }
    );
}

/// Interactive play loop: stage list, proximity-gated opens, O/X quiz.
async fn run_play(config: &Config, quest_id: &str, start_at: Coordinate) -> Result<()> {
    let backend = HttpQuestBackend::new(&config.backend);
    let mut session = PlaySession::start(backend, quest_id, &config.play).await?;
    let source = StaticPositionSource::new(start_at);
    let mut locator = GeoLocator::new(source, config.geo.clone());
    locator.acquire().await;

    let mut renderer = LogRenderer::default();
    render_quest(&mut renderer, &session.progress().stages);

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!();
        for stage in &session.progress().stages {
            println!(
                "  [{}] stage {} ({})",
                if stage.cleared { "x" } else { " " },
                stage.sequence_number,
                stage.stage_id
            );
        }
        print!("stage number to open, r to refresh position, q to quit> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let input = line.trim().to_string();
        match input.as_str() {
            "q" | "quit" => break,
            "r" => {
                let position = locator.refresh().await;
                print_position(position);
                continue;
            }
            _ => {}
        }

        let Ok(sequence) = input.parse::<u32>() else {
            println!("Unrecognized input: {input}");
            continue;
        };
        let Some(stage_id) = session
            .progress()
            .stages
            .iter()
            .find(|stage| stage.sequence_number == sequence)
            .map(|stage| stage.stage_id.clone())
        else {
            println!("No stage with number {sequence}");
            continue;
        };

        let position = locator.current().cloned();
        match session.open_stage(&stage_id, position.as_ref()).await {
            Ok(detail) => {
                println!("== {} ({})", detail.stage_name, detail.stage_address);
                println!("{}", detail.stage_story);
                println!("Quiz: {}", detail.quiz_content);
            }
            Err(err) => {
                report_rejection(&err);
                continue;
            }
        }

        if !quiz_loop(&mut session, &mut lines).await? {
            break;
        }
        if session.progress().all_cleared() {
            break;
        }
    }

    session.end().await?;
    info!("play session ended for quest {quest_id}");
    Ok(())
}

/// Drive one open quiz to a clear, a close, or quit. Returns false on quit.
async fn quiz_loop<B: geoquest::backend::QuestBackend>(
    session: &mut PlaySession<B>,
    lines: &mut impl Iterator<Item = std::io::Result<String>>,
) -> Result<bool> {
    loop {
        print!("answer O or X (c closes the quiz, q quits)> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next().transpose()? else {
            return Ok(false);
        };
        let input = line.trim();
        match input {
            "q" => return Ok(false),
            "c" => {
                session.close();
                return Ok(true);
            }
            _ => {}
        }
        let Some(answer) = QuizAnswer::parse(input) else {
            println!("Answer with O or X.");
            continue;
        };

        session.select_answer(answer)?;
        match session.submit().await {
            Ok(SubmitResult::Correct(outcome)) => {
                println!("Correct! Stage cleared.");
                match outcome {
                    ClearOutcome::QuestComplete => println!("** Quest complete! **"),
                    ClearOutcome::Milestone(tier) => {
                        println!("** Milestone reached: {} **", tier.title())
                    }
                    ClearOutcome::Progress => {}
                }
                return Ok(true);
            }
            Ok(SubmitResult::Incorrect) => {
                println!("Not quite. Try again.");
            }
            Err(err) if err.is_transient() => {
                println!("Temporary problem ({err}), try submitting again.");
            }
            Err(err) => return Err(err.into()),
        }
    }
}

fn report_rejection(err: &PlayError) {
    match err {
        PlayError::TooFar { .. } => println!("{err} - walk closer and try again."),
        PlayError::PositionPending => println!("{err}"),
        _ if err.is_transient() => println!("Temporary problem ({err}), try again."),
        _ => println!("Could not open stage: {err}"),
    }
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    // Base level from config, CLI verbosity overrides
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|cfg| cfg.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let file = config
        .as_ref()
        .map(|cfg| cfg.logging.file.clone())
        .unwrap_or_default();
    if !file.is_empty() {
        if let Ok(f) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file)
        {
            let mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
            // If stderr is a TTY, mirror log lines to the console as well.
            let is_tty = atty::is(atty::Stream::Stderr);
            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());
                if let Ok(mut guard) = mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
            let _ = builder.try_init();
            return;
        }
    }

    builder.format(|fmt, record| {
        writeln!(
            fmt,
            "{} [{}] {}",
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
            record.level(),
            record.args()
        )
    });
    let _ = builder.try_init();
}
