//! User management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use tabaudit_core::config::AppConfig;
use tabaudit_core::error::AppError;
use tabaudit_database::repositories::UserRepository;
use tabaudit_entity::user::{CreateUser, User, UserRole, UserStatus};
use tabaudit_service::UserService;

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Register a user
    Create {
        /// Employee number
        employee_id: String,
        /// Display name
        username: String,
        /// Email address
        #[arg(long)]
        email: Option<String>,
        /// Role: admin or user
        #[arg(long, default_value = "user")]
        role: String,
    },
    /// List all users
    List,
    /// Enable a user
    Enable {
        /// Employee number
        employee_id: String,
    },
    /// Disable a user
    Disable {
        /// Employee number
        employee_id: String,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: String,
    /// Employee number
    employee_id: String,
    /// Username
    username: String,
    /// Email
    email: String,
    /// Role
    role: String,
    /// Status
    status: String,
    /// Created at
    created_at: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            employee_id: u.employee_id.clone(),
            username: u.username.clone(),
            email: output::or_dash(u.email.as_deref()),
            role: u.role.to_string(),
            status: u.status.to_string(),
            created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    let users = UserService::new(std::sync::Arc::new(UserRepository::new(pool)));

    match &args.command {
        UserCommand::Create {
            employee_id,
            username,
            email,
            role,
        } => {
            let role: UserRole = role.parse()?;
            let user = users
                .create(CreateUser {
                    employee_id: employee_id.clone(),
                    username: username.clone(),
                    email: email.clone(),
                    role,
                })
                .await?;
            output::print_success(&format!("Created {} '{}'", user.role, user.employee_id));
            output::print_item(&user, format);
        }
        UserCommand::List => {
            let rows: Vec<UserRow> = users.list().await?.iter().map(UserRow::from).collect();
            output::print_list(&rows, format);
        }
        UserCommand::Enable { employee_id } => {
            let user = users.find_by_employee_id(employee_id).await?;
            users.set_status(user.id, UserStatus::Active).await?;
            output::print_success(&format!("User '{employee_id}' enabled"));
        }
        UserCommand::Disable { employee_id } => {
            let user = users.find_by_employee_id(employee_id).await?;
            users.set_status(user.id, UserStatus::Inactive).await?;
            output::print_success(&format!("User '{employee_id}' disabled"));
        }
    }

    Ok(())
}
