//! Source id helpers.
//!
//! A source id is either a full sheet URL
//! (`https://docs.google.com/spreadsheets/d/<key>/edit#gid=0`) or a bare key.

use crate::error::SheetError;

/// Marker left in campaign entries that were never filled in.
const PLACEHOLDER_MARKER: &str = "ENTER_YOUR";

const URL_KEY_PREFIX: &str = "/spreadsheets/d/";

/// True when the source id is blank or still the placeholder.
pub fn is_placeholder(source_id: &str) -> bool {
    source_id.trim().is_empty() || source_id.contains(PLACEHOLDER_MARKER)
}

/// Extract the spreadsheet key from a source id.
pub fn spreadsheet_id(source_id: &str) -> Result<String, SheetError> {
    let source_id = source_id.trim();
    if is_placeholder(source_id) {
        return Err(SheetError::InvalidSource(source_id.to_string()));
    }

    if let Some(idx) = source_id.find(URL_KEY_PREFIX) {
        let rest = &source_id[idx + URL_KEY_PREFIX.len()..];
        let key: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        if key.is_empty() {
            return Err(SheetError::InvalidSource(source_id.to_string()));
        }
        return Ok(key);
    }

    if source_id.contains("://") || source_id.contains('/') {
        return Err(SheetError::InvalidSource(source_id.to_string()));
    }
    Ok(source_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_key_from_edit_url() {
        let url = "https://docs.google.com/spreadsheets/d/1xzC6ez5Ql7Jg6sw-Mep_dz/edit?usp=sharing";
        assert_eq!(spreadsheet_id(url).unwrap(), "1xzC6ez5Ql7Jg6sw-Mep_dz");
    }

    #[test]
    fn extracts_key_from_gid_url() {
        let url = "https://docs.google.com/spreadsheets/d/1_8NjjRtmad9/edit?gid=0#gid=0";
        assert_eq!(spreadsheet_id(url).unwrap(), "1_8NjjRtmad9");
    }

    #[test]
    fn bare_key_passes_through() {
        assert_eq!(spreadsheet_id("  abc123 ").unwrap(), "abc123");
    }

    #[test]
    fn placeholder_is_rejected() {
        assert!(is_placeholder("ENTER_YOUR_SHEET_URL_HERE"));
        assert!(is_placeholder("   "));
        assert!(matches!(
            spreadsheet_id("https://ENTER_YOUR_URL"),
            Err(SheetError::InvalidSource(_))
        ));
    }

    #[test]
    fn foreign_url_is_rejected() {
        assert!(matches!(
            spreadsheet_id("https://example.com/sheet"),
            Err(SheetError::InvalidSource(_))
        ));
    }
}
