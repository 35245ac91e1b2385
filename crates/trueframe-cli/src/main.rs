//! TrueFrame CLI: drive the simulated upload verification from a terminal.
//!
//! Settings come from TRUEFRAME_* variables (or a .env file); flags override them.

use anyhow::Context;
use bytes::Bytes;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use trueframe_cli::{
    print_json, publish_to_demo_feed, render_view, truncate_chars, OutcomeTally,
};
use trueframe_core::models::VerificationState;
use trueframe_core::{AppError, VerificationConfig};
use trueframe_feed::{Feed, Profile};
use trueframe_infra::{init_telemetry, shutdown_telemetry, ErrorResponse, LogFormat};
use trueframe_verification::{present, MediaIntake, PolicyRegistry, UploadSession};

#[derive(Parser)]
#[command(name = "trueframe", about = "TrueFrame upload verification simulator")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,
    /// Include error chains in error output
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one upload through verification
    Upload {
        /// Path to an image or video
        file: PathBuf,
        /// Caption to attach
        #[arg(long)]
        caption: Option<String>,
        /// Verification policy name
        #[arg(long)]
        policy: Option<String>,
        /// Seed for the outcome draw
        #[arg(long)]
        seed: Option<u64>,
        /// Publish to the feed if verified
        #[arg(long)]
        publish: bool,
        /// Request a manual review if flagged
        #[arg(long)]
        request_review: bool,
    },
    /// Print the step table for every state
    Steps,
    /// Draw outcomes and print the tally
    Outcomes {
        /// Number of draws
        #[arg(long, default_value = "1000")]
        runs: u32,
        /// Seed for the outcome draw
        #[arg(long)]
        seed: Option<u64>,
        /// Verification policy name
        #[arg(long)]
        policy: Option<String>,
    },
    /// Print the demo feed and profile
    Feed,
    /// List the registered verification policies
    Policies,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match VerificationConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let format = if cli.json_logs || config.is_production() {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    if let Err(e) = init_telemetry("trueframe", &config.environment, format) {
        eprintln!("Failed to initialize tracing: {}", e);
    }

    let verbose = cli.verbose;
    let result = run(cli.command, config).await;
    shutdown_telemetry().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<AppError>() {
                Some(app_error) => {
                    let response = ErrorResponse::from_app_error(app_error, verbose);
                    match serde_json::to_string_pretty(&response) {
                        Ok(out) => eprintln!("{}", out),
                        Err(_) => eprintln!("{}", app_error),
                    }
                }
                None => eprintln!("Error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, mut config: VerificationConfig) -> anyhow::Result<()> {
    match command {
        Commands::Upload {
            file,
            caption,
            policy,
            seed,
            publish,
            request_review,
        } => {
            if let Some(policy) = policy {
                config.policy = policy;
            }
            if seed.is_some() {
                config.outcome_seed = seed;
            }
            upload(&config, &file, caption, publish, request_review).await?;
        }
        Commands::Steps => {
            for state in VerificationState::ALL {
                println!("{}\n", render_view(&present(state)));
            }
        }
        Commands::Outcomes { runs, seed, policy } => {
            let seed = seed.or(config.outcome_seed);
            let name = policy.unwrap_or(config.policy);
            let registry = PolicyRegistry::with_defaults(seed).await;
            let policy = registry.get(&name).await?;

            let sample = MediaIntake::accept("sample.jpg", "image/jpeg", Bytes::new(), None)?;
            let mut tally = OutcomeTally::new(policy.name());
            for _ in 0..runs {
                tally.record(policy.evaluate(&sample).await?);
            }
            print_json(&tally)?;
        }
        Commands::Feed => {
            let now = chrono::Utc::now();
            let feed = Feed::demo(now);
            let profile = Profile::demo();
            print_json(&serde_json::json!({
                "stories": feed.stories(),
                "posts": feed.cards(now),
                "profile": {
                    "display_name": &profile.display_name,
                    "bio": &profile.bio,
                    "stats": profile.stats(),
                    "trust": {
                        "headline": profile.trust.headline(),
                        "detail": profile.trust.detail(),
                    },
                },
            }))?;
        }
        Commands::Policies => {
            let registry = PolicyRegistry::with_defaults(config.outcome_seed).await;
            print_json(&registry.list().await)?;
        }
    }
    Ok(())
}

async fn upload(
    config: &VerificationConfig,
    file: &std::path::Path,
    caption: Option<String>,
    publish: bool,
    request_review: bool,
) -> anyhow::Result<()> {
    let registry = PolicyRegistry::with_defaults(config.outcome_seed).await;
    let session = UploadSession::from_config(config, &registry).await?;
    let media = MediaIntake::from_path(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let mut rx = session.subscribe();
    let attempt_id = session.select_media(media).await;
    if let Some(caption) = caption {
        tracing::debug!(
            attempt_id = %attempt_id,
            caption = %truncate_chars(&caption, 40),
            "Caption set"
        );
        session.set_caption(caption).await?;
    }

    let outcome = loop {
        let state = *rx.borrow_and_update();
        println!("{}\n", render_view(&present(state)));
        if state.is_terminal() {
            break state;
        }
        rx.changed()
            .await
            .context("Verification session closed before an outcome")?;
    };

    match outcome {
        VerificationState::Verified if publish => {
            let published = session.publish().await?;
            let outcomes = session.outcome_history().await;
            let post = publish_to_demo_feed(published, outcomes, chrono::Utc::now());
            print_json(&post)?;
        }
        VerificationState::Warning if request_review => {
            let review = session.request_review().await?;
            print_json(&review)?;
        }
        _ if publish => {
            session.publish().await?;
        }
        _ => {}
    }
    Ok(())
}
