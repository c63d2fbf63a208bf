//! CSV report of the member roster.

use crate::models::Member;
use chrono::NaiveDate;
use std::fmt::Write;

pub const CSV_HEADER: &str = "Name,Phone,Plan,Next Payment,Status";

pub fn report_filename(today: NaiveDate) -> String {
    format!("Adams_Inn_Report_{}.csv", today.format("%Y-%m-%d"))
}

/// Serializes every member, header first, with no index column.
///
/// `Status` is evaluated against `today`, the same rule the directory uses.
pub fn members_csv(members: &[Member], today: NaiveDate) -> String {
    let mut csv = String::with_capacity(CSV_HEADER.len() + 1 + members.len() * 64);
    csv.push_str(CSV_HEADER);
    csv.push('\n');

    for member in members {
        let _ = writeln!(
            csv,
            "{},{},{},{},{}",
            escape_field(&member.name),
            escape_field(&member.phone),
            escape_field(member.plan.label()),
            member.next_payment.format("%Y-%m-%d"),
            member.status(today).as_str()
        );
    }

    csv
}

fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
