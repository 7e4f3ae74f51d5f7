use anyhow::{Result, bail};
use rideup_core::auth::Identity;

use super::print_json;
use crate::context::AppContext;

pub async fn run(ctx: &AppContext, identity: String) -> Result<()> {
    let outcome = ctx
        .reconciler()
        .on_identity_change(Some(Identity::new(identity)))
        .await;

    print_json(&outcome)?;

    if outcome.is_failure() {
        bail!("Reconciliation did not complete");
    }
    Ok(())
}
