use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(pub String);

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Individual,
    Business,
}

/// Purchasable membership card. Prices are whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberCardPlan {
    pub id: PlanId,
    pub name: String,
    pub plan_type: PlanType,
    pub duration_months: u32,
    pub price: i64,
    pub currency: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub popular: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlan {
    pub name: String,
    pub plan_type: PlanType,
    pub duration_months: u32,
    pub price: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub popular: bool,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_currency() -> String {
    "TWD".to_string()
}

fn default_active() -> bool {
    true
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanUpdate {
    pub name: Option<String>,
    pub plan_type: Option<PlanType>,
    pub duration_months: Option<u32>,
    pub price: Option<i64>,
    pub currency: Option<String>,
    pub features: Option<Vec<String>>,
    pub popular: Option<bool>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanQuery {
    #[serde(default)]
    pub active_only: bool,
    pub plan_type: Option<PlanType>,
}
