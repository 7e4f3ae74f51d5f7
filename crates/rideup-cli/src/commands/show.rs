use anyhow::{Context, Result, bail};
use rideup_core::auth::Identity;
use rideup_core::profile::ProfileSummary;
use serde_json::json;

use super::print_json;
use crate::context::AppContext;

pub async fn run(ctx: &AppContext, identity: String) -> Result<()> {
    let identity = Identity::new(identity);
    let document = ctx
        .profiles()
        .load(&identity)
        .await
        .with_context(|| format!("Failed to load profile of {}", identity))?;

    let Some(document) = document else {
        bail!("No profile document for {}", identity);
    };

    let summary = ProfileSummary::from_document(&document);
    print_json(&json!({ "document": document, "summary": summary }))
}
