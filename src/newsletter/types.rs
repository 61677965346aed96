use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Default, Deserialize)]
pub struct CampaignsResponse {
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Campaign {
    pub id: i64,
    pub name: String,
    #[serde(rename = "sentDate")]
    pub sent_date: Option<String>,
    #[serde(default)]
    pub statistics: CampaignStatistics,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignStatistics {
    /// One entry per distribution list the campaign was sent to.
    #[serde(rename = "campaignStats", default)]
    pub campaign_stats: Vec<Map<String, Value>>,
}

/// Numeric statistic, kept integral while every summand is an integer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatValue {
    Int(i64),
    Float(f64),
}

impl StatValue {
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        let Value::Number(number) = value else {
            return None;
        };
        if let Some(int) = number.as_i64() {
            return Some(StatValue::Int(int));
        }
        number.as_f64().map(StatValue::Float)
    }

    #[must_use]
    pub fn add(self, other: Self) -> Self {
        match (self, other) {
            (StatValue::Int(left), StatValue::Int(right)) => left
                .checked_add(right)
                .map_or_else(|| StatValue::Float(left as f64 + right as f64), StatValue::Int),
            (left, right) => StatValue::Float(left.as_f64() + right.as_f64()),
        }
    }

    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            StatValue::Int(value) => value as f64,
            StatValue::Float(value) => value,
        }
    }

    #[must_use]
    pub fn render(self) -> String {
        match self {
            StatValue::Int(value) => value.to_string(),
            StatValue::Float(value) => value.to_string(),
        }
    }
}

/// One output line: campaign info followed by statistics summed over lists.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignRow {
    pub campaign: String,
    pub campaign_brevo_id: i64,
    pub sent_date: Option<String>,
    /// `None` when a statistic is missing from at least one list.
    pub stats: Vec<(String, Option<StatValue>)>,
}
