//! Reply templates.
//!
//! Every user-visible string lives here, keyed by reply kind or error
//! kind. Handlers never format text themselves.

use crate::error::Error;
use crate::tracker::{Reply, Standing};

pub const HELP: &str = "Work & Reward Tracker Bot\n\n\
    Anyone can view the ledger with /list and /details <name>.\n\
    Only the admin can record work and payments:\n\
    /add <name> <amount>\n\
    /pay <name> <amount>\n\
    /setdue <name> <amount>\n\
    /reset_today";

pub const NO_DATA: &str = "No data yet.";

/// Render a successful reply.
pub fn render_reply(reply: &Reply) -> String {
    match reply {
        Reply::Help => HELP.to_string(),
        Reply::WorkAdded { name, amount } => format!("{name} did {amount} units of work today"),
        Reply::Paid { name, amount } => format!("Paid {amount} to {name}"),
        Reply::DueSet { name, amount } => format!("Due work for {name} set to {amount}"),
        Reply::TodayReset { .. } => "Today's work has been reset".to_string(),
        Reply::NoData => NO_DATA.to_string(),
        Reply::Listing(rows) => render_listing(rows),
        Reply::Details { name, record } => format!(
            "Work & payment summary\n\n\
             Name: {name}\n\
             Total work: {}\n\
             Today's work: {}\n\
             Work due for payment: {}\n\
             Amount paid: {}",
            record.total, record.today, record.due, record.paid_amount
        ),
    }
}

fn render_listing(rows: &[Standing]) -> String {
    let mut out = String::from("Current work list\n\n");
    for row in rows {
        out.push_str(&format!(
            "- {}: total {} | today {} | due {}\n",
            row.name, row.record.total, row.record.today, row.record.due
        ));
    }
    out
}

/// Render a failed command for the caller.
///
/// Internal failures are reported without their details; those go to the
/// log instead.
pub fn render_error(error: &Error) -> String {
    match error {
        Error::NotAuthorized => "Only the admin can use this command.".to_string(),
        Error::InvalidArguments { usage } => format!("Usage: {usage}"),
        Error::AmountOutOfRange => "That amount is out of range.".to_string(),
        Error::UnknownWorker(name) => format!("No record found for {name}."),
        Error::UnknownCommand(_) => format!("Unknown command.\n\n{HELP}"),
        Error::StorageCorrupt { .. } => {
            "The ledger file could not be read. Please contact the admin.".to_string()
        }
        Error::Io(_) | Error::Json(_) => {
            "Could not access the ledger. Please try again.".to_string()
        }
        Error::Config(_) | Error::Telegram(_) | Error::Http(_) | Error::Other(_) => {
            "Something went wrong.".to_string()
        }
    }
}

/// Render either outcome of a command.
pub fn render(result: &crate::error::Result<Reply>) -> String {
    match result {
        Ok(reply) => render_reply(reply),
        Err(e) => render_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WorkerRecord;

    #[test]
    fn listing_shows_total_today_and_due_per_row() {
        let text = render_reply(&Reply::Listing(vec![Standing {
            name: "alice".to_string(),
            record: WorkerRecord {
                total: 5,
                today: 0,
                due: 2,
                paid_amount: 3,
            },
        }]));
        assert!(text.contains("alice: total 5 | today 0 | due 2"));
        assert!(!text.contains("paid"));
    }

    #[test]
    fn storage_errors_do_not_leak_paths() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let text = render_error(&Error::StorageCorrupt {
            path: "/srv/secret/data.json".into(),
            source,
        });
        assert!(!text.contains("/srv/secret"));
    }

    #[test]
    fn io_errors_fit_reads_and_writes() {
        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let text = render_error(&Error::Io(denied));
        assert_eq!(text, "Could not access the ledger. Please try again.");
        assert!(!text.contains("save"));
    }
}
