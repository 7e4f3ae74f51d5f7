use anyhow::{Context, Result};
use rideup_core::auth::Identity;
use rideup_core::profile::{SchoolChoice, SignupForm};

use super::print_json;
use crate::context::AppContext;

/// Maps the mutually exclusive school flags to a form choice.
pub fn school_choice(
    school: Option<String>,
    other_school: Option<String>,
    no_school: bool,
) -> SchoolChoice {
    match (school, other_school) {
        _ if no_school => SchoolChoice::None,
        (Some(name), _) => SchoolChoice::Named(name),
        (None, Some(custom)) => SchoolChoice::Other(custom),
        (None, None) => SchoolChoice::None,
    }
}

pub async fn run(
    ctx: &AppContext,
    identity: String,
    name: String,
    email: String,
    school: SchoolChoice,
) -> Result<()> {
    let identity = Identity::new(identity);
    let form = SignupForm {
        display_name: name,
        email,
        school,
    };
    let profiles = ctx.profiles();

    profiles
        .sign_up(&identity, &form)
        .await
        .with_context(|| format!("Failed to create profile for {}", identity))?;

    let summary = profiles
        .summary(&identity)
        .await
        .with_context(|| format!("Failed to read back profile of {}", identity))?;
    print_json(&summary)
}
