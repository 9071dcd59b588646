use std::sync::Arc;

use anyhow::{Context, Result};
use cfkube_config::AppConfig;
use cfkube_core::{AuthInfo, EventBroadcaster, StoreEvent};
use cfkube_manifest::Orchestrator;
use cfkube_storage::{EventedStore, Repositories};
use colored::Colorize;
use tokio::sync::broadcast;

use super::{open_store, read_manifest};
use crate::cli::{ApplyArgs, OutputFormat};
use crate::output::{print_event, print_success, print_value};

pub async fn apply(
    cfg: &AppConfig,
    args: &ApplyArgs,
    auth: &AuthInfo,
    format: Option<OutputFormat>,
) -> Result<()> {
    let manifest = read_manifest(args.manifest.as_deref())?;
    let store = open_store(args.state.as_deref(), cfg)?;

    let broadcaster = EventBroadcaster::new_shared();
    let mut events = broadcaster.subscribe();
    let store = Arc::new(EventedStore::new(store, broadcaster));

    let orchestrator = Orchestrator::new(
        Repositories::from_store(store.clone()),
        cfg.manifest.default_domain_name.clone(),
    )
    .with_apply_timeout(cfg.manifest.apply_timeout());

    tracing::info!(
        space_guid = %args.space,
        applications = manifest.applications.len(),
        "Applying manifest"
    );
    let result = orchestrator.apply(auth, &args.space, &manifest).await;

    // Mutations made before a failure stay committed, so they are reported
    // and persisted either way.
    let changes = drain(&mut events);
    match format {
        Some(format) => print_value(&changes, format)?,
        None => {
            println!("{} ({})", "Changes".cyan(), changes.len());
            changes.iter().for_each(print_event);
        }
    }

    if let Some(path) = &args.write_state {
        store
            .inner()
            .snapshot()
            .write_file(path)
            .with_context(|| format!("Failed to write state: {}", path.display()))?;
        tracing::info!(path = %path.display(), "State written");
    }

    result.with_context(|| format!("Manifest apply to space {} failed", args.space))?;
    print_success(&format!(
        "Applied {} application(s) to space {}",
        manifest.applications.len(),
        args.space.cyan()
    ));
    Ok(())
}

fn drain(events: &mut broadcast::Receiver<StoreEvent>) -> Vec<StoreEvent> {
    let mut changes = Vec::new();
    while let Ok(event) = events.try_recv() {
        changes.push(event);
    }
    changes
}
