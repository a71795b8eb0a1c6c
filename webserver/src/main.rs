//! Board web server entry point

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use pipeline::services::{BufferedNotifier, RealDealsApi, RealStageDictionary};
use pipeline::{Pipeline, PipelineConfig, Translator};
use shared::{logging, process_debug, ProcessId, ScopeVersion};

use webserver::{WebServer, WebServerError, WebServerResult};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "webserver")]
#[command(about = "Serves the sales pipeline board over HTTP")]
struct Args {
    /// Port for HTTP server (browser connections)
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Bind host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Base URL of the deals API (overrides PIPELINE_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Organizational scope version
    #[arg(long)]
    scope: Option<u64>,

    /// JSON translation catalog
    #[arg(long)]
    locale_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> WebServerResult<()> {
    let args = Args::parse();

    // Initialize process ID singleton for webserver
    ProcessId::init_webserver();
    logging::init_tracing_with_level(Some(&args.log_level));

    let bind_address: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|e| WebServerError::ServerStartup(format!("Invalid bind address: {}", e)))?;

    let mut config = PipelineConfig::from_env()?;
    if let Some(url) = &args.api_url {
        config = config.with_api_base_url(url)?;
    }
    if let Some(scope) = args.scope {
        config.scope_version = ScopeVersion(scope);
    }
    if let Some(path) = args.locale_file {
        config.locale_file = Some(path);
    }

    let translator = match &config.locale_file {
        Some(path) => Translator::load(path)?,
        None => Translator::new(),
    };

    logging::log_startup(ProcessId::current(), &format!("board server on {}", bind_address));
    process_debug!(ProcessId::current(), "Deals API at {}", config.api_base_url);

    // Initialize services with dependency injection
    let notices = BufferedNotifier::new();
    let pipeline = Pipeline::new(
        RealDealsApi::new(&config)?,
        RealStageDictionary::new(&config)?,
        notices.clone(),
        translator,
        &config,
    );

    let webserver = WebServer::new(pipeline, notices);
    webserver.run(bind_address).await?;

    logging::log_success(ProcessId::current(), "WebServer stopped gracefully");
    Ok(())
}
