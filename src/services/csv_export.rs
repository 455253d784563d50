//! CSV rendering of registrations for the admin export

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::domain::{DomainError, Registration};
use crate::utils::time::locale_date;

pub const CSV_HEADERS: [&str; 12] = [
    "ID",
    "Team Name",
    "Leader Name",
    "Email",
    "Mobile",
    "College",
    "Department",
    "Member 2",
    "Member 3",
    "Project Title",
    "Status",
    "Created At",
];

const NOT_AVAILABLE: &str = "N/A";

fn or_na(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(NOT_AVAILABLE)
}

fn row(r: &Registration) -> [String; 12] {
    [
        r.id.to_string(),
        r.team_name.clone(),
        r.leader_name.clone(),
        r.email.clone(),
        r.mobile.clone(),
        r.college.clone(),
        r.leader_dept.clone(),
        format!("{} ({})", r.member2_name, r.member2_email),
        format!(
            "{} ({})",
            or_na(r.member3_name.as_deref()),
            or_na(r.member3_email.as_deref())
        ),
        or_na(r.project_title.as_deref()).to_string(),
        r.status.to_string(),
        locale_date(&r.created_at),
    ]
}

/// Every cell quoted, embedded quotes doubled, `\n` between rows and no
/// trailing newline.
pub fn registrations_to_csv(records: &[Registration]) -> Result<String, DomainError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let csv_err = |e: csv::Error| DomainError::Internal(format!("CSV error: {}", e));

    writer.write_record(CSV_HEADERS).map_err(csv_err)?;
    for record in records {
        writer.write_record(row(record)).map_err(csv_err)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DomainError::Internal(format!("CSV error: {}", e)))?;
    let mut out =
        String::from_utf8(bytes).map_err(|e| DomainError::Internal(format!("CSV error: {}", e)))?;
    if out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}
