//! Device provisioning and listing commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use tabaudit_core::error::AppError;
use tabaudit_entity::device::{DeviceStatus, TabletDevice};
use tabaudit_service::inventory::ProvisionDevice;

use super::AdminSession;
use super::tab::resolve_tab;
use crate::output::{self, OutputFormat};

/// Arguments for device commands
#[derive(Debug, Args)]
pub struct DeviceArgs {
    #[command(subcommand)]
    pub command: DeviceCommand,
}

/// Device subcommands
#[derive(Debug, Subcommand)]
pub enum DeviceCommand {
    /// Register a physical device
    Provision {
        /// Tab type ID or name
        tab: String,
        /// Serial number
        serial_number: String,
        /// Label scan code
        scan_code: String,
        /// Initial condition
        #[arg(long)]
        condition: Option<String>,
    },
    /// List devices
    List {
        /// Restrict to a tab type (ID or name)
        #[arg(long)]
        tab: Option<String>,
        /// Restrict to a status
        #[arg(long)]
        status: Option<String>,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct DeviceRow {
    serial_number: String,
    scan_code: String,
    status: String,
    condition: String,
    assigned_to: String,
    assigned_at: String,
}

impl From<&TabletDevice> for DeviceRow {
    fn from(d: &TabletDevice) -> Self {
        Self {
            serial_number: d.serial_number.clone(),
            scan_code: d.scan_code.clone(),
            status: d.status.to_string(),
            condition: d.condition.clone(),
            assigned_to: output::or_dash(d.assigned_to),
            assigned_at: output::or_dash(d.assigned_at.map(|t| t.format("%Y-%m-%d %H:%M"))),
        }
    }
}

/// Execute device commands
pub async fn execute(
    args: &DeviceArgs,
    session: AdminSession,
    format: OutputFormat,
) -> Result<(), AppError> {
    let AdminSession { state, ctx } = session;

    match &args.command {
        DeviceCommand::Provision {
            tab,
            serial_number,
            scan_code,
            condition,
        } => {
            let tab = resolve_tab(&state, &ctx, tab).await?;
            let device = state
                .inventory_service
                .provision_device(
                    &ctx,
                    ProvisionDevice {
                        tab_type_id: tab.id,
                        serial_number: serial_number.clone(),
                        scan_code: scan_code.clone(),
                        condition: condition.clone(),
                    },
                )
                .await?;
            output::print_success(&format!(
                "Provisioned '{}' for '{}'",
                device.serial_number, tab.name
            ));
            output::print_item(&device, format);
        }
        DeviceCommand::List { tab, status } => {
            let tab_type_id = match tab {
                Some(key) => Some(resolve_tab(&state, &ctx, key).await?.id),
                None => None,
            };
            let status = status
                .as_deref()
                .map(str::parse::<DeviceStatus>)
                .transpose()?;
            let devices = state
                .inventory_service
                .list_devices(&ctx, tab_type_id, status)
                .await?;
            let rows: Vec<DeviceRow> = devices.iter().map(DeviceRow::from).collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
