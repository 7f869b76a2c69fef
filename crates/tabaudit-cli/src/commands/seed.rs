//! Sample data for a fresh installation.

use tabaudit_core::error::AppError;

use super::AdminSession;
use crate::output;

/// Tab types created by `seed`: name, daily limit, initial stock.
const SAMPLE_TABS: &[(&str, i32, i32)] = &[("Standard Blue Tab", 2, 50), ("Premium Red Tab", 1, 50)];

/// Create the sample tab types that do not exist yet.
pub async fn execute(session: AdminSession) -> Result<(), AppError> {
    let AdminSession { state, ctx } = session;
    println!("Seeding data...");

    let existing = state.ledger_service.list_tabs(&ctx).await?;
    for (name, limit, stock) in SAMPLE_TABS {
        if existing.iter().any(|t| t.name == *name) {
            output::print_warning(&format!("'{name}' already exists, skipped"));
            continue;
        }
        let update = state
            .inventory_service
            .add_tab(&ctx, name, *stock, *limit)
            .await?;
        output::print_success(&update.message);
    }

    output::print_success("Database seeded successfully!");
    Ok(())
}
