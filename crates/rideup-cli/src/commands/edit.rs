use anyhow::{Context, Result, bail};
use rideup_core::RideupError;
use rideup_core::auth::Identity;
use rideup_core::profile::{ProfileEdit, ProfileSummary};

use super::print_json;
use crate::context::AppContext;

/// Fields given on the command line; the rest keep their stored values.
#[derive(Debug, Default)]
pub struct EditArgs {
    pub display_name: Option<String>,
    pub school: Option<String>,
    pub city: Option<String>,
    pub has_car: Option<bool>,
    pub public_description: Option<String>,
}

impl EditArgs {
    fn apply(self, form: &mut ProfileEdit) {
        if let Some(display_name) = self.display_name {
            form.display_name = display_name;
        }
        if let Some(school) = self.school {
            form.school = school;
        }
        if let Some(city) = self.city {
            form.city = city;
        }
        if let Some(has_car) = self.has_car {
            form.has_car = has_car;
        }
        if let Some(description) = self.public_description {
            form.public_description = description;
        }
    }
}

pub async fn run(ctx: &AppContext, identity: String, changes: EditArgs) -> Result<()> {
    let identity = Identity::new(identity);
    let profiles = ctx.profiles();

    let Some(document) = profiles
        .load(&identity)
        .await
        .with_context(|| format!("Failed to load profile of {}", identity))?
    else {
        bail!(missing_profile(&identity));
    };

    let mut form = ProfileEdit::from_document(&document);
    changes.apply(&mut form);

    profiles
        .update_profile(&identity, &form)
        .await
        .map_err(|e| explain(e, &identity))?;
    print_summary(ctx, &identity).await
}

pub async fn set_photo(ctx: &AppContext, identity: String, url: String) -> Result<()> {
    let identity = Identity::new(identity);
    ctx.profiles()
        .update_photo(&identity, &url)
        .await
        .map_err(|e| explain(e, &identity))?;
    print_summary(ctx, &identity).await
}

async fn print_summary(ctx: &AppContext, identity: &Identity) -> Result<()> {
    let document = ctx.profiles().load(identity).await?;
    match document {
        Some(document) => print_json(&ProfileSummary::from_document(&document)),
        None => bail!(missing_profile(identity)),
    }
}

fn missing_profile(identity: &Identity) -> String {
    format!(
        "No profile document for {}; run `rideup signup {}` first",
        identity, identity
    )
}

fn explain(err: RideupError, identity: &Identity) -> anyhow::Error {
    if err.is_not_found() {
        anyhow::anyhow!(missing_profile(identity))
    } else {
        anyhow::Error::new(err).context(format!("Failed to update profile of {}", identity))
    }
}
