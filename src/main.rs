mod app;
mod engine;
mod infra;
mod picker;
mod ui;

use std::path::Path;

use tracing::info;

use app::controller::FilterController;
use app::events::AppEvent;
use app::state::ImageRef;
use infra::config::{AppConfig, CONFIG_FILE};
use picker::PickOutcome;

fn main() {
    // RUST_LOG controls verbosity, e.g. RUST_LOG=foto_filtro=debug.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let config = match AppConfig::load_or_default(Path::new(CONFIG_FILE)) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("failed to load configuration: {error}");
            std::process::exit(1);
        }
    };

    let mut controller = FilterController::new(&config);

    // Optional image path argument starts the app already in the loaded
    // state, as if that file had just been picked.
    let args: Vec<String> = std::env::args().collect();
    if let Some(initial) = args.get(1) {
        match ImageRef::new(initial.as_str()) {
            Ok(image) => {
                info!(path = %initial, "preloading image from the command line");
                controller.dispatch(AppEvent::PickFinished(PickOutcome::Selected(image)));
            }
            Err(error) => {
                eprintln!("ignoring initial image argument: {error}");
            }
        }
    }

    if let Err(error) = ui::app_shell::launch(config, controller) {
        eprintln!("failed to start foto-filtro: {error}");
        std::process::exit(1);
    }
}
