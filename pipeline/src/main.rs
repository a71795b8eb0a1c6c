//! Main entry point for the pipeline board CLI
//!
//! Wires the real HTTP services into the board engine and prints the board,
//! the declared stages, or the result of a stage move.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use pipeline::{
    render_board,
    services::{BufferedNotifier, RealDealsApi, RealStageDictionary},
    BoardEvent, MoveOutcome, Pipeline, PipelineConfig, PipelineError, PipelineResult, Text, Translator,
};
use shared::{logging, process_debug, process_info, Notice, NoticeLevel, ProcessId, ScopeVersion, SortOption};

type CliPipeline = Pipeline<RealDealsApi, RealStageDictionary, BufferedNotifier>;

/// Kanban view of the sales pipeline
#[derive(Parser)]
#[command(name = "pipeline")]
#[command(about = "Shows deals as pipeline-stage lanes and moves them between stages")]
pub struct Args {
    /// Base URL of the deals API (overrides PIPELINE_API_URL)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Organizational scope version
    #[arg(long)]
    pub scope: Option<u64>,

    /// Deals per fetch, at most 100
    #[arg(long)]
    pub page_size: Option<u32>,

    /// JSON translation catalog
    #[arg(long)]
    pub locale_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the board
    Board {
        /// Sort order inside each lane (probability, createdAt, expectedCloseAt)
        #[arg(long, default_value = "probability")]
        sort: SortOption,

        /// Only show deals whose title, people or companies contain this text
        #[arg(long)]
        search: Option<String>,
    },
    /// List the lanes with their colors and icons
    Stages,
    /// Move a deal to another stage
    Move {
        deal_id: String,
        stage: String,
    },
}

#[tokio::main]
async fn main() -> PipelineResult<()> {
    let args = Args::parse();

    ProcessId::init_cli();
    logging::init_tracing_with_level(Some(&args.log_level));

    let config = build_config(&args)?;
    let translator = match &config.locale_file {
        Some(path) => Translator::load(path)?,
        None => Translator::new(),
    };
    process_debug!(
        ProcessId::current(),
        "API {} page_size={} scope={} ({} translations)",
        config.api_base_url,
        config.page_size,
        config.scope_version,
        translator.len()
    );

    let notices = BufferedNotifier::new();
    let pipeline = Pipeline::new(
        RealDealsApi::new(&config)?,
        RealStageDictionary::new(&config)?,
        notices.clone(),
        translator,
        &config,
    );

    let result = run(&pipeline, args.command).await;

    for notice in notices.drain() {
        print_notice(&notice);
    }
    result
}

fn build_config(args: &Args) -> PipelineResult<PipelineConfig> {
    let mut config = PipelineConfig::from_env()?;

    if let Some(url) = &args.api_url {
        config = config.with_api_base_url(url)?;
    }
    if let Some(size) = args.page_size {
        config = config.with_page_size(size)?;
    }
    if let Some(scope) = args.scope {
        config.scope_version = ScopeVersion(scope);
    }
    if let Some(path) = &args.locale_file {
        config.locale_file = Some(path.clone());
    }
    Ok(config)
}

async fn run(pipeline: &CliPipeline, command: Command) -> PipelineResult<()> {
    match command {
        Command::Board { sort, search } => {
            pipeline.apply(BoardEvent::SortChange { sort_by: sort }).await;
            if let Some(query) = search {
                pipeline.apply(BoardEvent::SearchChange { query }).await;
            }

            let view = pipeline.view().await;
            print!("{}", render_board(&view));
            match view.load_error {
                Some(message) => Err(PipelineError::LoadFailed { message }),
                None => Ok(()),
            }
        }
        Command::Stages => {
            let view = pipeline.view().await;
            if let Some(message) = view.load_error {
                return Err(PipelineError::LoadFailed { message });
            }
            for lane in &view.lanes {
                let icon = lane.icon.map(|icon| icon.glyph()).unwrap_or(" ");
                let color = lane.color.map(|color| color.hex()).unwrap_or_default();
                println!(
                    "{icon} {:<24} {:<20} {:>4} {color}",
                    lane.stage.label,
                    lane.stage.value.as_deref().unwrap_or("-"),
                    lane.count
                );
            }
            Ok(())
        }
        Command::Move { deal_id, stage } => {
            pipeline.load().await?;

            match pipeline.move_deal(&deal_id, &stage).await? {
                Some(MoveOutcome::Committed) => {
                    process_info!(ProcessId::current(), "✅ Deal {} is now in {}", deal_id, stage);
                    Ok(())
                }
                Some(MoveOutcome::RolledBack { message }) => Err(PipelineError::MoveFailed {
                    message: message.unwrap_or_else(|| pipeline.translator().text(Text::MoveError)),
                }),
                None => Ok(()),
            }
        }
    }
}

fn print_notice(notice: &Notice) {
    let icon = match notice.level {
        NoticeLevel::Success => "✅",
        NoticeLevel::Info => "ℹ️",
        NoticeLevel::Error => "❌",
    };
    println!("{icon} {}", notice.message);
}
