use std::sync::Arc;

use anyhow::{Context, Result};
use cfkube_config::AppConfig;
use cfkube_core::AuthInfo;
use cfkube_manifest::StateCollector;
use cfkube_storage::Repositories;

use super::open_store;
use crate::cli::{OutputFormat, StateArgs};
use crate::output::print_value;

pub async fn show(
    cfg: &AppConfig,
    args: &StateArgs,
    auth: &AuthInfo,
    format: OutputFormat,
) -> Result<()> {
    let store = open_store(Some(&args.state), cfg)?;
    let collector = StateCollector::new(Repositories::from_store(Arc::new(store)));

    let state = collector
        .collect_state(auth, &args.app, &args.space)
        .await
        .with_context(|| format!("Failed to collect state of app {}", args.app))?;
    if !state.exists() {
        tracing::warn!(app_name = %args.app, space_guid = %args.space, "App does not exist");
    }
    print_value(&state, format)
}
