//! # Civic CLI
//!
//! Entry point for the `civic` command. Each invocation loads the
//! configuration, connects the database and the cache store, runs one
//! command and prints its result as JSON on stdout.

use civic_cli::app::App;
use civic_cli::cli::Cli;
use civic_cli::di::build_app_module;
use civic_cli::startup::{init_logging, print_startup_info};
use civic_config::ConfigLoader;
use civic_core::{CivicError, CivicResult};
use clap::Parser;
use tracing::{debug, error};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        let body = serde_json::json!({
            "error": e.error_code(),
            "message": e.to_string(),
        });
        eprintln!("{}", body);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CivicResult<()> {
    let config = ConfigLoader::new(cli.config_dir)?.into_config();

    init_logging(&config.observability);
    print_startup_info(&config);

    let module = build_app_module(&config).await?;
    let app = App::new(module);

    debug!("Executing {:?}", cli.command);
    let result = app.execute(cli.command).await;
    app.module().shutdown().await;

    let output = serde_json::to_string_pretty(&result?).map_err(CivicError::from)?;
    println!("{}", output);

    Ok(())
}
