use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod context;
mod logging;

use context::AppContext;

#[derive(Parser)]
#[command(name = "rideup")]
#[command(about = "RideUp - keeps user profile documents on the current schema", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory of the JSON document store (overrides the config file)
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile one user's profile document and print the outcome
    Reconcile {
        /// Identity whose profile to reconcile
        identity: String,
    },
    /// Reconcile on every sign-in read from stdin (`signin <id>`, `signout`, `quit`)
    Watch,
    /// Create a profile document as the signup flow does
    Signup {
        identity: String,
        /// Display name
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[command(flatten)]
        school: SchoolArgs,
    },
    /// Print a stored profile document and its summary
    Show { identity: String },
    /// Edit an existing profile as the profile edit screen does
    ///
    /// Fields left out keep their stored values.
    Edit {
        identity: String,
        /// Display name
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        school: Option<String>,
        /// City (blank means Atlanta)
        #[arg(long)]
        city: Option<String>,
        /// Whether the user can drive
        #[arg(long)]
        has_car: Option<bool>,
        /// Public description, cut to 40 characters
        #[arg(long)]
        description: Option<String>,
    },
    /// Record an uploaded avatar for an existing profile
    SetPhoto {
        identity: String,
        /// Download URL of the uploaded avatar
        #[arg(long)]
        url: String,
    },
    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args)]
#[group(required = false, multiple = false)]
struct SchoolArgs {
    /// School picked from the list
    #[arg(long)]
    school: Option<String>,
    /// School typed in because it is not listed
    #[arg(long)]
    other_school: Option<String>,
    /// Not a student
    #[arg(long)]
    no_school: bool,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file location
    Path,
    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let ctx = AppContext::load(cli.config, cli.store_dir)?;
    let _log_guard = logging::init(&ctx.config.logging)?;
    ctx.log_startup();

    match cli.command {
        Commands::Reconcile { identity } => commands::reconcile::run(&ctx, identity).await?,
        Commands::Watch => commands::watch::run(&ctx).await?,
        Commands::Signup {
            identity,
            name,
            email,
            school,
        } => {
            let school = commands::signup::school_choice(
                school.school,
                school.other_school,
                school.no_school,
            );
            commands::signup::run(&ctx, identity, name, email, school).await?
        }
        Commands::Show { identity } => commands::show::run(&ctx, identity).await?,
        Commands::Edit {
            identity,
            name,
            school,
            city,
            has_car,
            description,
        } => {
            let changes = commands::edit::EditArgs {
                display_name: name,
                school,
                city,
                has_car,
                public_description: description,
            };
            commands::edit::run(&ctx, identity, changes).await?
        }
        Commands::SetPhoto { identity, url } => {
            commands::edit::set_photo(&ctx, identity, url).await?
        }
        Commands::Config { action } => match action {
            ConfigAction::Path => commands::config::path(&ctx),
            ConfigAction::Show => commands::config::show(&ctx)?,
        },
    }

    Ok(())
}
