use std::io::IsTerminal;

use configs::AppConfig;
use console::{run, Console};
use dotenvy::dotenv;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cfg = AppConfig::load_and_validate()?;

    // Logging
    common::utils::logging::init_logging(&cfg.logging.format);

    // Storage must be built and reloaded before any object is touched.
    let storage = service::bootstrap::open_storage(&cfg).await?;
    info!(backend = ?cfg.storage.backend, "console starting");

    let console = Console::new(storage);
    let interactive = std::io::stdin().is_terminal();
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    run(&console, stdin, tokio::io::stdout(), interactive).await?;
    Ok(())
}
