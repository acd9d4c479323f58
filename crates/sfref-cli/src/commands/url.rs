//! Resolve one index to an absolute URL.

use anyhow::Result;
use sfref_core::{Coordinator, RetrievalRequest, Selection};
use tracing::debug;

pub async fn execute(coordinator: &Coordinator, target: &str, index: i64) -> Result<()> {
    let target = coordinator.registry().resolve_target(target)?;

    let selection = Selection::from_signed(index);
    if selection == Selection::Cancelled {
        debug!(index, "no selection");
        return Ok(());
    }

    coordinator
        .retrieve(&RetrievalRequest::warm(target.clone()))
        .await?;
    if let Some(url) = coordinator.resolve(&target, selection).await? {
        println!("{url}");
    }
    Ok(())
}
