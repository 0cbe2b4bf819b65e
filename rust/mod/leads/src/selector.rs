use serde::Serialize;

use crate::error::LeadError;
use crate::model::{CallOutcome, LeadRecord, LeadTable};

/// One entry of the "Select Lead to Update" dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadOption {
    pub label: String,
    /// Index into `LeadTable::rows`.
    pub row: usize,
}

/// `"{first} {last} ({company})"`.
pub fn label(record: &LeadRecord) -> String {
    format!(
        "{} {} ({})",
        record.first_name(),
        record.last_name(),
        record.company()
    )
}

/// Dropdown entries sorted by first name. The sort is stable, so leads with
/// the same first name keep their sheet order.
pub fn lead_options(table: &LeadTable) -> Vec<LeadOption> {
    let mut order: Vec<usize> = (0..table.rows.len()).collect();
    order.sort_by(|&a, &b| table.rows[a].first_name().cmp(table.rows[b].first_name()));
    order
        .into_iter()
        .map(|row| LeadOption {
            label: label(&table.rows[row]),
            row,
        })
        .collect()
}

/// Resolve a chosen label to a row index.
///
/// Labels are not unique. The first match in dropdown order wins.
pub fn resolve(table: &LeadTable, chosen: &str) -> Result<usize, LeadError> {
    lead_options(table)
        .into_iter()
        .find(|option| option.label == chosen)
        .map(|option| option.row)
        .ok_or_else(|| LeadError::LeadNotFound(chosen.to_string()))
}

/// Detail-panel view of one lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadCard {
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub website: String,
    /// `website` with an `https://` scheme added when it has none.
    pub website_url: String,
    pub email: String,
    pub mailto: String,
    pub direct_phone: String,
    pub mobile_phone: String,
    pub call_outcome: String,
    pub notes: String,
    pub sales_rep: String,
    pub date_called: String,
}

impl LeadCard {
    pub fn from_record(record: &LeadRecord) -> Self {
        Self {
            first_name: record.first_name().to_string(),
            last_name: record.last_name().to_string(),
            company: record.company().to_string(),
            website: record.website().to_string(),
            website_url: website_url(record.website()),
            email: record.email().to_string(),
            mailto: format!("mailto:{}", record.email()),
            direct_phone: record.direct_phone().to_string(),
            mobile_phone: record.mobile_phone().to_string(),
            call_outcome: record.call_outcome().to_string(),
            notes: record.notes().to_string(),
            sales_rep: record.sales_rep().to_string(),
            date_called: record.date_called().to_string(),
        }
    }

    /// Outcome preselected in the log form.
    pub fn default_outcome(&self) -> CallOutcome {
        CallOutcome::form_default(&self.call_outcome)
    }
}

fn website_url(website: &str) -> String {
    if website.is_empty() || website.starts_with("http") {
        website.to_string()
    } else {
        format!("https://{}", website)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(first: &str, last: &str, company: &str, phone: &str) -> LeadRecord {
        [
            ("First Name", first),
            ("Last Name", last),
            ("Company", company),
            ("Direct Phone Number", phone),
        ]
        .into_iter()
        .collect()
    }

    fn table(rows: Vec<LeadRecord>) -> LeadTable {
        LeadTable {
            columns: vec![],
            rows,
        }
    }

    #[test]
    fn label_format() {
        assert_eq!(
            label(&record("Alex", "Smith", "TechFlow", "555-0101")),
            "Alex Smith (TechFlow)"
        );
    }

    #[test]
    fn options_sorted_by_first_name_stable() {
        let t = table(vec![
            record("Casey", "Jones", "SoftSys", "1"),
            record("Alex", "Smith", "TechFlow", "2"),
            record("Casey", "Adams", "Zeta", "3"),
        ]);
        let options = lead_options(&t);
        let rows: Vec<usize> = options.iter().map(|o| o.row).collect();
        assert_eq!(rows, vec![1, 0, 2]);
        assert_eq!(options[1].label, "Casey Jones (SoftSys)");
    }

    #[test]
    fn duplicate_labels_resolve_to_first_in_sorted_order() {
        let t = table(vec![
            record("Taylor", "Ray", "Acme", "1"),
            record("Jordan", "Doe", "Innovate", "555-0102"),
            record("Alex", "Smith", "TechFlow", "555-0101"),
            record("Jordan", "Doe", "Innovate", "555-0199"),
        ]);
        let row = resolve(&t, "Jordan Doe (Innovate)").unwrap();
        assert_eq!(row, 1);
        assert_eq!(t.rows[row].direct_phone(), "555-0102");
        // Deterministic across calls.
        assert_eq!(resolve(&t, "Jordan Doe (Innovate)").unwrap(), row);
    }

    #[test]
    fn unknown_label_is_lead_not_found() {
        let t = table(vec![record("Alex", "Smith", "TechFlow", "1")]);
        assert!(matches!(
            resolve(&t, "Alex Smith (Other)"),
            Err(LeadError::LeadNotFound(l)) if l == "Alex Smith (Other)"
        ));
    }

    #[test]
    fn card_website_and_mailto() {
        let mut r = record("Alex", "Smith", "TechFlow", "555-0101");
        r.set("Website", "www.techflow.com");
        r.set("Email", "alex@example.com");
        r.set("Call Outcome", "Left Voicemail");
        let card = LeadCard::from_record(&r);
        assert_eq!(card.website_url, "https://www.techflow.com");
        assert_eq!(card.mailto, "mailto:alex@example.com");
        assert_eq!(card.default_outcome(), CallOutcome::LeftVoicemail);

        assert_eq!(website_url("http://a.io"), "http://a.io");
        assert_eq!(website_url("https://a.io"), "https://a.io");
        assert_eq!(website_url(""), "");
    }
}
