use serde::Deserialize;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeDirection {
    Sent,
    Received,
}

impl ExchangeDirection {
    pub fn label(self) -> &'static str {
        match self {
            Self::Sent => "Sent",
            Self::Received => "Received",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ContactRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub industry: String,
    pub relationship_type: String,
    pub generation: u32,
    pub referral_score: f32,
    pub referral_count: u32,
    pub deal_value: f64,
    pub profile_photo_url: Option<String>,
    pub exchange_direction: Option<ExchangeDirection>,
}

impl ContactRecord {
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim().to_string();
        if name.is_empty() {
            self.id.clone()
        } else {
            name
        }
    }

    pub fn is_exchange_partner(&self) -> bool {
        self.exchange_direction.is_some()
    }
}

#[derive(Clone, Debug)]
pub struct ReferralRecord {
    pub source: String,
    pub target: String,
    pub kind: String,
}

#[derive(Clone, Debug)]
pub struct NetworkData {
    pub organization: String,
    pub contacts: Vec<ContactRecord>,
    pub referrals: Vec<ReferralRecord>,
}

impl NetworkData {
    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    pub fn referral_count(&self) -> usize {
        self.referrals.len()
    }

    pub fn contact(&self, id: &str) -> Option<&ContactRecord> {
        self.contacts.iter().find(|contact| contact.id == id)
    }

    pub fn top_by_score(&self, limit: usize) -> Vec<String> {
        self.ranked(limit, |a, b| {
            b.referral_score
                .total_cmp(&a.referral_score)
                .then_with(|| b.referral_count.cmp(&a.referral_count))
        })
    }

    pub fn top_by_deal_value(&self, limit: usize) -> Vec<String> {
        self.ranked(limit, |a, b| {
            b.deal_value
                .total_cmp(&a.deal_value)
                .then_with(|| b.referral_score.total_cmp(&a.referral_score))
        })
    }

    pub fn top_by_referrals(&self, limit: usize) -> Vec<String> {
        self.ranked(limit, |a, b| {
            b.referral_count
                .cmp(&a.referral_count)
                .then_with(|| b.deal_value.total_cmp(&a.deal_value))
        })
    }

    fn ranked(
        &self,
        limit: usize,
        compare: impl Fn(&ContactRecord, &ContactRecord) -> std::cmp::Ordering,
    ) -> Vec<String> {
        let mut contacts = self.contacts.iter().collect::<Vec<_>>();
        contacts.sort_by(|a, b| compare(a, b).then_with(|| a.id.cmp(&b.id)));
        contacts
            .into_iter()
            .take(limit)
            .map(|contact| contact.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(id: &str, score: f32, value: f64, referrals: u32) -> ContactRecord {
        ContactRecord {
            id: id.to_string(),
            first_name: id.to_uppercase(),
            last_name: "Contact".to_string(),
            company: String::new(),
            industry: String::new(),
            relationship_type: String::new(),
            generation: 0,
            referral_score: score,
            referral_count: referrals,
            deal_value: value,
            profile_photo_url: None,
            exchange_direction: None,
        }
    }

    fn sample() -> NetworkData {
        NetworkData {
            organization: "Org".to_string(),
            contacts: vec![
                contact("a", 3.0, 50_000.0, 1),
                contact("b", 9.0, 10_000.0, 4),
                contact("c", 9.0, 90_000.0, 4),
            ],
            referrals: Vec::new(),
        }
    }

    #[test]
    fn rankings_sort_descending_with_stable_ties() {
        let network = sample();
        assert_eq!(network.top_by_deal_value(2), vec!["c", "a"]);
        // Equal scores fall back to referral count, then id order.
        assert_eq!(network.top_by_score(3), vec!["b", "c", "a"]);
        assert_eq!(network.top_by_referrals(1), vec!["c"]);
    }

    #[test]
    fn display_name_falls_back_to_the_id() {
        let mut record = contact("c-77", 0.0, 0.0, 0);
        record.first_name = String::new();
        record.last_name = String::new();
        assert_eq!(record.display_name(), "c-77");
    }
}
