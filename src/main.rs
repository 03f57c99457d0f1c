//! Obra Gestor Entry Point
//!
//! Loads configuration, opens the site database and reports what is tracked.

use std::path::PathBuf;

use obra_gestor::commands::{list_deliveries, list_pending_items};
use obra_gestor::config::AppConfig;

#[tokio::main]
async fn main() {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = match AppConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let state = match obra_gestor::bootstrap(config).await {
        Ok(state) => state,
        Err(e) => {
            log::error!("Startup failed: {}", e);
            eprintln!("Startup failed: {}", e);
            std::process::exit(1);
        }
    };

    let pending = list_pending_items(&state);
    println!("{} pending items", pending.len());
    for item in pending {
        println!(
            "  [{}] {} ({}, due {})",
            item.status().as_str(),
            item.title,
            item.priority.as_str(),
            item.deadline
        );
    }

    let deliveries = list_deliveries(&state);
    println!("{} deliveries", deliveries.len());
    for d in deliveries {
        println!(
            "  [{}] {} {} {} from {}",
            d.status().as_str(),
            d.quantity,
            d.unit,
            d.material,
            d.supplier
        );
    }
    log::info!("Startup summary printed");
}
