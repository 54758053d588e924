mod config;

use std::{path::PathBuf, process::ExitCode, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    render_text, Block, ControlState, HttpLotteryService, Operation, PresentationSink, Region,
    RequestOrchestrator,
};
use shared::domain::{DrawId, Strategy};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Terminal client for the Timemania draw service")]
struct Cli {
    /// Overrides the configured service base URL.
    #[arg(long)]
    api_base: Option<String>,
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Latest result and statistics, as on page load.
    Dashboard,
    Refresh,
    Latest,
    Stats,
    Suggest {
        #[arg(long, default_value_t = Strategy::Balanced)]
        strategy: Strategy,
        #[arg(long, default_value_t = 10)]
        numbers: u8,
        #[arg(long, default_value_t = 1)]
        games: u8,
    },
    Verify {
        /// Comma separated, e.g. "1,2,3,4,5,6,7,8,9,10".
        #[arg(long)]
        numbers: String,
        #[arg(long)]
        team: String,
        #[arg(long)]
        draw: String,
    },
    Draw {
        draw_id: u32,
    },
    History {
        #[arg(long)]
        limit: Option<u32>,
    },
    TeamStats,
    SuggestTeam {
        #[arg(long, default_value_t = Strategy::Balanced)]
        strategy: Strategy,
    },
    Health,
}

/// Prints each settled region to stdout under its id.
struct TerminalSink;

impl PresentationSink for TerminalSink {
    fn replace(&mut self, region: Region, block: Block) {
        match &block {
            Block::Loading => {
                debug!(region = region.id(), "loading");
                return;
            }
            Block::Content(panels) if panels.is_empty() => return,
            _ => {}
        }
        println!("[{}]", region.id());
        print!("{}", render_text(&block));
        println!();
    }

    fn control_changed(&mut self, operation: Operation, control: &ControlState) {
        debug!(%operation, enabled = control.enabled, label = control.label, "control changed");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut settings = config::load_settings(&cli.config)?;
    if let Some(raw) = &cli.api_base {
        settings.api_base = config::parse_api_base(raw)?;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&settings.log_filter)
                .with_context(|| format!("invalid log filter '{}'", settings.log_filter))?,
        )
        .with_writer(std::io::stderr)
        .init();

    let service = match settings.request_timeout_secs {
        Some(secs) => {
            HttpLotteryService::with_timeout(&settings.api_base, Duration::from_secs(secs))
                .context("failed to build http client")?
        }
        None => HttpLotteryService::new(&settings.api_base),
    };
    info!(api_base = service.base_url(), "timemania console starting");

    let orchestrator = RequestOrchestrator::new(Arc::new(service), TerminalSink);
    let outcomes = match cli.command {
        Command::Dashboard => {
            let (latest, statistics) = orchestrator.load_dashboard().await;
            vec![latest, statistics]
        }
        Command::Refresh => vec![orchestrator.refresh().await],
        Command::Latest => vec![orchestrator.latest_result().await],
        Command::Stats => vec![orchestrator.statistics().await],
        Command::Suggest {
            strategy,
            numbers,
            games,
        } => vec![orchestrator.suggestions(strategy, numbers, games).await],
        Command::Verify {
            numbers,
            team,
            draw,
        } => vec![orchestrator.verify(&numbers, &team, &draw).await],
        Command::Draw { draw_id } => vec![orchestrator.draw(DrawId(draw_id)).await],
        Command::History { limit } => vec![orchestrator.draw_history(limit).await],
        Command::TeamStats => vec![orchestrator.team_statistics().await],
        Command::SuggestTeam { strategy } => vec![orchestrator.suggest_team(strategy).await],
        Command::Health => vec![orchestrator.health().await],
    };

    // Failures were already rendered into their regions.
    Ok(if outcomes.iter().any(|outcome| outcome.is_err()) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
