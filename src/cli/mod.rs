// CLI module for administrative operations against the identity database

pub mod migrate;
pub mod roles;
pub mod users;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;
use crate::coordinators::IdentityCoordinator;

/// Identity store administration
#[derive(Parser)]
#[command(name = "blue-beetle")]
#[command(about = "User and role identity store CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run pending database migrations
    Migrate,

    /// Create the default roles and the admin account
    Init,

    /// Create a user holding the NO_PERMISSIONS role
    CreateUser {
        #[arg(long)]
        username: String,

        #[arg(long, default_value = "")]
        email: String,

        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Replace a user's password with a generated one and print it
    ResetPassword {
        #[arg(long)]
        username: String,
    },

    /// List live roles and their permissions
    ListRoles,

    /// Create or overwrite a role by name
    SaveRole {
        #[arg(long)]
        name: String,

        /// Flag name such as USER_READ; repeat for more
        #[arg(long = "permission", value_name = "FLAG")]
        permissions: Vec<String>,
    },
}

/// Execute CLI command
///
/// Routes the parsed CLI command to the appropriate handler function.
/// `Migrate` must run before AppData exists, so `main` sends it to
/// `migrate::run_migrations` and it is rejected here.
///
/// # Returns
/// * `Ok(())` - Command executed successfully
/// * `Err(...)` - Command execution failed
pub async fn execute_command(
    cli: Cli,
    app_data: Arc<AppData>,
) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = IdentityCoordinator::new(app_data);

    match cli.command {
        Commands::Migrate => {
            return Err("migrate runs through migrate::run_migrations, not with AppData".into());
        }
        Commands::Init => {
            coordinator.initialize_defaults().await?;
            println!("✓ Default roles and admin account ready");
        }
        Commands::CreateUser {
            username,
            email,
            password,
        } => {
            users::create_user(&coordinator, &username, &email, password).await?;
        }
        Commands::ResetPassword { username } => {
            users::reset_password(&coordinator, &username).await?;
        }
        Commands::ListRoles => {
            roles::list_roles(&coordinator).await?;
        }
        Commands::SaveRole { name, permissions } => {
            roles::save_role(&coordinator, &name, &permissions).await?;
        }
    }

    Ok(())
}
