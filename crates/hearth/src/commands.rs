// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command implementations. Each command builds on the SDK crates; all
//! mutations go through the coordinator so conflicts surface as readable
//! outcomes instead of raw errors.

use std::sync::Arc;

use hearth_client::ListsClient;
use hearth_client::lists::{Item, ItemPatch, NewItem};
use hearth_core::HearthError;
use hearth_gateway::{ApiGateway, TenantScope};
use hearth_mutation::{CreateOutcome, MutationCoordinator, MutationOutcome};
use tracing::info;

use crate::config::HearthConfig;

/// `hearth doctor`: report config and probe the backend health endpoint.
pub async fn doctor(config: &HearthConfig, gateway: &ApiGateway) -> Result<(), HearthError> {
    println!("base url:     {}", config.api.base_url);
    println!(
        "token:        {}",
        if config.auth.token.is_some() {
            "set"
        } else {
            "not set"
        }
    );
    match config.auth.group_id {
        Some(group) => println!("active group: {group}"),
        None => println!("active group: none"),
    }

    let health: serde_json::Value = gateway
        .get("/health")
        .tenant(TenantScope::None)
        .send()
        .await?;
    println!("backend:      reachable ({health})");
    Ok(())
}

/// `hearth lists`: print the active group's lists.
pub async fn show_lists(client: &ListsClient) -> Result<(), HearthError> {
    let lists = client.list(Some(false), None).await?;
    if lists.is_empty() {
        println!("no lists in this group");
        return Ok(());
    }
    for list in lists {
        println!(
            "#{:<4} {:<30} {:<9} v{}",
            list.id, list.name, list.list_type, list.version_id
        );
    }
    Ok(())
}

/// `hearth items add <list> <name>`: create an item through the coordinator.
pub async fn add_item(
    client: &ListsClient,
    coord: &MutationCoordinator<Item>,
    list_id: i64,
    name: String,
) -> Result<(), HearthError> {
    let outcome = coord
        .run_create(|provisional| {
            info!(%provisional, "adding item");
            let client = client.clone();
            let name = name.clone();
            async move {
                let item = client.add_item(list_id, &NewItem::named(name)).await?;
                let key = item.key();
                let version = item.version_id;
                Ok((key, item, version))
            }
        })
        .await;

    match outcome {
        CreateOutcome::Created { entity, .. } => {
            println!("added item #{} ({})", entity.id, entity.name);
            Ok(())
        }
        CreateOutcome::Failed(error) => Err(error),
    }
}

/// `hearth items check <list> <item>`: toggle an item done, surfacing
/// version conflicts as a retryable message instead of an error dump.
pub async fn check_item(
    client: &ListsClient,
    coord: &MutationCoordinator<Item>,
    list_id: i64,
    item_id: i64,
) -> Result<(), HearthError> {
    let items = client.items(list_id).await?;
    let Some(item) = items.into_iter().find(|item| item.id == item_id) else {
        return Err(HearthError::Api {
            status: 404,
            code: "NOT_FOUND".into(),
            detail: Some(format!("item {item_id} is not on list {list_id}")),
        });
    };

    let key = item.key();
    coord.track(key.clone(), item.clone(), item.version_id);

    let checked = !item.is_checked;
    let run = coord
        .run_update(key, item.version_id, |version| {
            let client = client.clone();
            async move {
                let item = client
                    .update_item(list_id, item_id, &ItemPatch::at_version(version).checked(checked))
                    .await?;
                let version = item.version_id;
                Ok((item, version))
            }
        })
        .await;
    // A coordinator rejection is a user-visible state, not an internal fault.
    let outcome = match run {
        Ok(outcome) => outcome,
        Err(busy) => {
            println!("item #{item_id} was not updated: {busy}");
            return Ok(());
        }
    };

    match outcome {
        MutationOutcome::Committed { entity, version } => {
            println!(
                "item #{} is now {} (v{version})",
                entity.id,
                if entity.is_checked { "checked" } else { "unchecked" }
            );
            Ok(())
        }
        MutationOutcome::Conflicted { current_version } => {
            match current_version {
                Some(version) => println!(
                    "someone else changed this item (server is at v{version}); rerun to retry"
                ),
                None => println!("someone else changed this item; rerun to retry"),
            }
            Ok(())
        }
        MutationOutcome::Failed(error) => Err(error),
        MutationOutcome::Superseded => Ok(()),
    }
}

/// Builds the shared gateway from config.
pub fn build_gateway(config: &HearthConfig) -> Result<Arc<ApiGateway>, HearthError> {
    use hearth_core::GroupId;
    use hearth_gateway::TracingRedirect;
    use hearth_session::SessionStore;

    let session = Arc::new(SessionStore::new());
    if let Some(token) = &config.auth.token {
        session.set_session(token.as_str().into(), config.auth.group_id.map(GroupId));
    }
    let gateway = ApiGateway::new(
        config.api.base_url.clone(),
        session,
        Arc::new(TracingRedirect),
    )?;
    Ok(Arc::new(gateway))
}
