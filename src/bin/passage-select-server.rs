//! passage-select HTTP server binary

use passage_select::config::{OracleConfig, RelevanceConfig, ServerConfig};
use passage_select::server::{run_server, AppState};
use passage_select::{HttpOracle, LogprobSelector, RelevanceClient, SelectionEngine};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    println!("passage-select: windowed passage selection");
    println!("   Version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    let oracle_config = OracleConfig::from_env();
    let server_config = ServerConfig::from_env();

    println!("✓ Oracle: {} (model {})", oracle_config.base_url, oracle_config.model);
    if oracle_config.api_key.is_none() {
        eprintln!("⚠️  No ORACLE_API_KEY/OPENAI_API_KEY set; requests will be unauthenticated");
    }

    let top_logprobs = oracle_config.top_logprobs;
    let selector =
        LogprobSelector::new(HttpOracle::new(oracle_config)?).with_top_logprobs(top_logprobs);

    let mut engine = SelectionEngine::new(Arc::new(selector));
    if let Some(deadline) = server_config.deadline {
        println!("✓ Per-request deadline: {:?}", deadline);
        engine = engine.with_deadline(deadline);
    }

    let relevance = RelevanceConfig::from_env().map(|config| {
        println!("✓ Relevance service: {}/{}", config.base_url, config.engine);
        RelevanceClient::new(config)
    });

    println!("✓ Starting HTTP server on port {}...", server_config.port);
    println!();

    let state = AppState {
        engine: Arc::new(engine),
        relevance,
    };
    run_server(state, server_config.port).await?;

    Ok(())
}
