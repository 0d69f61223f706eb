// HashPilot application entry point

use anyhow::{Context, Result};
use hashpilot::config::ConfigManager;
use hashpilot::logging::setup_logging;
use hashpilot::metrics::Metrics;
use hashpilot::models::UserConfig;
use hashpilot::state::StateManager;
use hashpilot::ui::GuiController;
use std::sync::Arc;

fn main() -> Result<()> {
    // Logging comes first so every later failure lands in the log file
    let _guard = setup_logging("logs", "hashpilot", false, false)
        .context("Failed to initialize logging")?;

    tracing::info!("{} v{} starting", hashpilot::APP_NAME, hashpilot::VERSION);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .thread_name("hashpilot-worker")
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let config_manager =
        Arc::new(ConfigManager::new("HashPilot Data").context("Failed to set up config storage")?);

    let user_config = config_manager
        .load_user_config()
        .context("Failed to load user settings")?;
    let catalog_config = config_manager
        .load_catalog_config()
        .context("Failed to load combo catalog")?;
    let catalog = Arc::new(catalog_config.catalog);

    let state_manager = Arc::new(StateManager::new());
    state_manager.load_from_user_config(&user_config);

    let metrics = Arc::new(Metrics::new());

    let controller = GuiController::new(
        Arc::clone(&state_manager),
        Arc::clone(&config_manager),
        Arc::clone(&catalog),
        Arc::clone(&metrics),
        runtime.handle().clone(),
    )
    .context("Failed to create GUI controller")?;

    let run_result = controller.run();

    // Window closed - persist the form so the next launch picks it up
    let settings = state_manager.read(|s| hashpilot::models::HashcatSettings {
        hashcat_exe: s.hashcat_exe.clone(),
        hash_type: s.hash_type,
        attack_mode: s.attack_mode_code,
        wordlist: s.wordlist.clone(),
        mask: s.mask.clone(),
        debug_mode: s.debug_mode,
    });
    if let Err(e) = config_manager.save_user_config(&UserConfig { settings }) {
        tracing::warn!("Failed to save settings on exit: {:#}", e);
    }

    metrics.log_summary();

    tracing::info!("Shutting down runtime");
    runtime.shutdown_timeout(std::time::Duration::from_secs(5));

    run_result.context("GUI event loop failed")?;

    tracing::info!("{} exited cleanly", hashpilot::APP_NAME);
    Ok(())
}
