//! Sample leads shown when no sheet credentials are configured.

use leadbox_sheet::SheetRows;

const HEADER: [&str; 12] = [
    "First Name",
    "Last Name",
    "Company",
    "Website",
    "Direct Phone Number",
    "Mobile Phone Number",
    "Email",
    "Status",
    "Call Outcome",
    "Notes",
    "Sales Rep",
    "Date Called",
];

const ROWS: [[&str; 12]; 3] = [
    [
        "Alex", "Smith", "TechFlow", "www.techflow.com", "555-0101", "555-9991",
        "alex@example.com", "New", "Not Called", "", "", "",
    ],
    [
        "Jordan", "Doe", "Innovate", "www.innovate.io", "555-0102", "555-9992",
        "jordan@example.com", "New", "Not Called", "", "", "",
    ],
    [
        "Casey", "Jones", "SoftSys", "www.softsys.net", "555-0103", "555-9993",
        "casey@example.com", "Attempted", "Left Voicemail", "Call back later", "", "",
    ],
];

/// The demo dataset, in the same shape a sheet read returns.
pub fn demo_rows() -> SheetRows {
    SheetRows {
        header: HEADER.iter().map(|s| s.to_string()).collect(),
        rows: ROWS
            .iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_rows_are_rectangular() {
        let rows = demo_rows();
        assert_eq!(rows.rows.len(), 3);
        assert!(rows.rows.iter().all(|r| r.len() == rows.header.len()));
        assert_eq!(rows.rows[2][9], "Call back later");
    }
}
