use serde::{Deserialize, Serialize};

use leadbox_sheet::is_placeholder;

use crate::error::LeadError;

/// A named lead list and the sheet it lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    /// Display name shown in the campaign dropdown.
    pub name: String,
    /// Sheet URL or key.
    pub source: String,
}

impl Campaign {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// False while the source is still the placeholder.
    pub fn is_configured(&self) -> bool {
        !is_placeholder(&self.source)
    }
}

/// Read-only, ordered campaign list loaded from config.
#[derive(Debug, Clone, Default)]
pub struct CampaignRegistry {
    campaigns: Vec<Campaign>,
}

impl CampaignRegistry {
    /// Build the registry. A later entry with the same name as an earlier one
    /// is ignored.
    pub fn new(campaigns: Vec<Campaign>) -> Self {
        let mut unique: Vec<Campaign> = Vec::with_capacity(campaigns.len());
        for campaign in campaigns {
            if unique.iter().any(|c| c.name == campaign.name) {
                tracing::warn!("duplicate campaign '{}' ignored", campaign.name);
                continue;
            }
            unique.push(campaign);
        }
        Self { campaigns: unique }
    }

    pub fn get(&self, name: &str) -> Result<&Campaign, LeadError> {
        self.campaigns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| LeadError::CampaignNotFound(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Campaign> {
        self.campaigns.iter()
    }

    pub fn len(&self) -> usize {
        self.campaigns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CampaignRegistry {
        CampaignRegistry::new(vec![
            Campaign::new("Texas FI Warm Leads", "https://docs.google.com/spreadsheets/d/aaa/edit"),
            Campaign::new("Florida FO Warm Leads", "ENTER_YOUR_SHEET_URL"),
            Campaign::new("Texas FI Warm Leads", "https://docs.google.com/spreadsheets/d/bbb/edit"),
        ])
    }

    #[test]
    fn keeps_config_order_and_drops_duplicates() {
        let reg = registry();
        let names: Vec<_> = reg.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Texas FI Warm Leads", "Florida FO Warm Leads"]);
        assert!(reg.get("Texas FI Warm Leads").unwrap().source.contains("/d/aaa/"));
    }

    #[test]
    fn unknown_campaign() {
        assert!(matches!(
            registry().get("Ohio"),
            Err(LeadError::CampaignNotFound(name)) if name == "Ohio"
        ));
    }

    #[test]
    fn placeholder_is_not_configured() {
        let reg = registry();
        assert!(reg.get("Texas FI Warm Leads").unwrap().is_configured());
        assert!(!reg.get("Florida FO Warm Leads").unwrap().is_configured());
    }
}
