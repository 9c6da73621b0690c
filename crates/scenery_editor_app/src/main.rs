// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scenery Editor - 2D scene layer editor
//!
//! A small scene editing environment featuring:
//! - Layers panel with rename, lock, visibility and drag reordering
//! - Properties panel for Spine animation components
//! - Console fed by the tracing subscriber
//!
//! ## Architecture
//!
//! Panels never touch the scene directly. They post notifications to a
//! shared dispatcher, which the application drains once per frame into the
//! command handler before refreshing the affected panels.

mod app;
mod commands;
mod config;
mod dispatcher;
mod panel_types;
mod panels;
mod state;

use app::EditorApp;
use config::{EditorConfig, CONFIG_FILE_NAME};
use panels::console::TracingBridge;
use std::path::Path;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() {
    let config_result = EditorConfig::load_or_default(Path::new(CONFIG_FILE_NAME));
    let config = config_result.as_ref().cloned().unwrap_or_default();

    // Create the console tracing bridge (channel pair)
    let (bridge_layer, tracing_rx) = TracingBridge::new();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},wgpu=warn,naga=warn", config.log_filter)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(bridge_layer)
        .init();

    tracing::info!("Starting Scenery Editor v{}", env!("CARGO_PKG_VERSION"));
    if let Err(e) = &config_result {
        tracing::error!("Ignoring {}: {}", CONFIG_FILE_NAME, e);
    }

    if let Err(e) = EditorApp::run(config, Some(tracing_rx)) {
        tracing::error!("Editor crashed: {e}");
        std::process::exit(1);
    }
}
