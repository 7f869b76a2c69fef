//! Assignment code commands.

use clap::{Args, Subcommand};

use tabaudit_core::error::AppError;

use super::AdminSession;
use super::tab::resolve_tab;
use crate::output::{self, OutputFormat};

/// Arguments for OTP commands
#[derive(Debug, Args)]
pub struct OtpArgs {
    #[command(subcommand)]
    pub command: OtpCommand,
}

/// OTP subcommands
#[derive(Debug, Subcommand)]
pub enum OtpCommand {
    /// Issue an assignment code for a tab type
    Generate {
        /// Tab type ID or name
        tab: String,
    },
}

/// Execute OTP commands
pub async fn execute(
    args: &OtpArgs,
    session: AdminSession,
    format: OutputFormat,
) -> Result<(), AppError> {
    let AdminSession { state, ctx } = session;

    match &args.command {
        OtpCommand::Generate { tab } => {
            let tab = resolve_tab(&state, &ctx, tab).await?;
            let otp = state
                .inventory_service
                .generate_assignment_otp(&ctx, tab.id)
                .await?;
            match format {
                OutputFormat::Table => {
                    output::print_success(&format!("Assignment code for '{}'", tab.name));
                    output::print_kv("Code", &otp.otp_code);
                    output::print_kv("Expires", &otp.expires_at.to_rfc3339());
                }
                OutputFormat::Json => output::print_item(&otp, format),
            }
        }
    }

    Ok(())
}
