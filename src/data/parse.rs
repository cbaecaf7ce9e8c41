use std::collections::HashSet;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use super::records::{ContactRecord, ExchangeDirection, NetworkData, ReferralRecord};

#[derive(Debug, Deserialize)]
struct RawExport {
    #[serde(default)]
    organization: String,
    #[serde(default)]
    contacts: Vec<RawContact>,
    #[serde(default)]
    referrals: Vec<RawReferral>,
}

#[derive(Debug, Deserialize)]
struct RawContact {
    id: String,
    #[serde(default, rename = "firstName")]
    first_name: String,
    #[serde(default, rename = "lastName")]
    last_name: String,
    #[serde(default)]
    company: String,
    #[serde(default)]
    industry: String,
    #[serde(default, rename = "relationshipType")]
    relationship_type: String,
    #[serde(default)]
    generation: u32,
    #[serde(default, rename = "referralScore")]
    referral_score: f32,
    #[serde(default, rename = "referralCount")]
    referral_count: u32,
    #[serde(default, rename = "dealValue")]
    deal_value: f64,
    #[serde(default, rename = "profilePhotoUrl")]
    profile_photo_url: Option<String>,
    #[serde(default, rename = "exchangeDirection")]
    exchange_direction: Option<ExchangeDirection>,
}

#[derive(Debug, Deserialize)]
struct RawReferral {
    source: String,
    target: String,
    #[serde(default, rename = "type")]
    kind: String,
}

pub fn parse_network_export(raw: &str) -> Result<NetworkData> {
    let export: RawExport =
        serde_json::from_str(raw).context("invalid network export JSON")?;

    let mut seen_ids = HashSet::with_capacity(export.contacts.len());
    let mut contacts = Vec::with_capacity(export.contacts.len());

    for raw_contact in export.contacts {
        let id = raw_contact.id.trim().to_string();
        if id.is_empty() {
            return Err(anyhow!("network export contains a contact without an id"));
        }
        if !seen_ids.insert(id.clone()) {
            return Err(anyhow!("network export contains duplicate contact id {id}"));
        }

        contacts.push(ContactRecord {
            id,
            first_name: raw_contact.first_name,
            last_name: raw_contact.last_name,
            company: raw_contact.company,
            industry: raw_contact.industry,
            relationship_type: raw_contact.relationship_type,
            generation: raw_contact.generation,
            referral_score: raw_contact.referral_score,
            referral_count: raw_contact.referral_count,
            deal_value: raw_contact.deal_value,
            profile_photo_url: raw_contact
                .profile_photo_url
                .filter(|url| !url.trim().is_empty()),
            exchange_direction: raw_contact.exchange_direction,
        });
    }

    let referrals = export
        .referrals
        .into_iter()
        .filter_map(|raw_referral| {
            let source = raw_referral.source.trim().to_string();
            let target = raw_referral.target.trim().to_string();
            if source.is_empty() || target.is_empty() {
                return None;
            }
            Some(ReferralRecord {
                source,
                target,
                kind: raw_referral.kind,
            })
        })
        .collect();

    let organization = if export.organization.trim().is_empty() {
        "Unnamed organization".to_string()
    } else {
        export.organization
    };

    Ok(NetworkData {
        organization,
        contacts,
        referrals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "organization": "Acme Partners",
        "contacts": [
            {
                "id": "c1",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "company": "Analytical Engines",
                "industry": "Software",
                "relationshipType": "Client",
                "generation": 0,
                "referralScore": 9.1,
                "referralCount": 4,
                "dealValue": 120000
            },
            {
                "id": "c2",
                "firstName": "Grace",
                "lastName": "Hopper",
                "exchangeDirection": "received"
            }
        ],
        "referrals": [
            { "source": "c1", "target": "c2", "type": "warm-intro" },
            { "source": "c1", "target": "missing", "type": "warm-intro" }
        ]
    }"#;

    #[test]
    fn parses_a_full_export() {
        let network = parse_network_export(SAMPLE).unwrap();
        assert_eq!(network.organization, "Acme Partners");
        assert_eq!(network.contact_count(), 2);
        assert_eq!(network.referral_count(), 2);

        let ada = network.contact("c1").unwrap();
        assert_eq!(ada.display_name(), "Ada Lovelace");
        assert_eq!(ada.referral_count, 4);
        assert!(!ada.is_exchange_partner());
    }

    #[test]
    fn missing_metrics_default_to_zero() {
        let network = parse_network_export(SAMPLE).unwrap();
        let grace = network.contact("c2").unwrap();
        assert_eq!(grace.generation, 0);
        assert_eq!(grace.referral_score, 0.0);
        assert_eq!(grace.deal_value, 0.0);
        assert_eq!(grace.exchange_direction, Some(ExchangeDirection::Received));
    }

    #[test]
    fn unresolved_referrals_are_kept_for_the_transformer() {
        let network = parse_network_export(SAMPLE).unwrap();
        assert!(
            network
                .referrals
                .iter()
                .any(|referral| referral.target == "missing")
        );
    }

    #[test]
    fn duplicate_contact_ids_are_rejected() {
        let raw = r#"{
            "contacts": [ { "id": "c1" }, { "id": "c1" } ],
            "referrals": []
        }"#;
        let error = parse_network_export(raw).unwrap_err();
        assert!(error.to_string().contains("duplicate contact id"));
    }

    #[test]
    fn empty_contact_lists_parse() {
        let network = parse_network_export(r#"{ "contacts": [], "referrals": [] }"#).unwrap();
        assert_eq!(network.contact_count(), 0);
        assert_eq!(network.organization, "Unnamed organization");
    }
}
