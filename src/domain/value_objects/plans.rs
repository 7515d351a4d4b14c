use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

use crate::domain::entities::plans::PlanEntity;

/// Billing interval of a plan. Stored as text in the database.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlanInterval {
    #[default]
    Monthly,
    Yearly,
    Lifetime,
}

impl PlanInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanInterval::Monthly => "monthly",
            PlanInterval::Yearly => "yearly",
            PlanInterval::Lifetime => "lifetime",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "monthly" => Some(PlanInterval::Monthly),
            "yearly" => Some(PlanInterval::Yearly),
            "lifetime" => Some(PlanInterval::Lifetime),
            _ => None,
        }
    }
}

impl Display for PlanInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One feature line on a plan. Stored inside the plan's JSONB `features` array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanFeature {
    pub name: String,

    #[serde(default)]
    pub included: bool,

    #[serde(default)]
    pub limit: Option<i64>,

    #[serde(default)]
    pub description: Option<String>,
}

/// Usage limits attached to a plan. Stored as JSONB; every field falls back
/// to its own default so a partial document stays valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlanLimits {
    #[serde(default = "default_franchises")]
    pub franchises: i32,

    #[serde(default = "default_forms")]
    pub forms: i32,

    #[serde(default = "default_submissions")]
    pub submissions: i32,

    #[serde(default = "default_staff")]
    pub staff: i32,

    /// Storage allowance in megabytes.
    #[serde(default = "default_storage")]
    pub storage: i32,

    #[serde(default = "default_api_calls")]
    pub api_calls: i32,
}

impl Default for PlanLimits {
    fn default() -> Self {
        Self {
            franchises: default_franchises(),
            forms: default_forms(),
            submissions: default_submissions(),
            staff: default_staff(),
            storage: default_storage(),
            api_calls: default_api_calls(),
        }
    }
}

fn default_franchises() -> i32 {
    1
}

fn default_forms() -> i32 {
    5
}

fn default_submissions() -> i32 {
    100
}

fn default_staff() -> i32 {
    5
}

fn default_storage() -> i32 {
    1024
}

fn default_api_calls() -> i32 {
    1000
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_is_active() -> bool {
    true
}

/// Create-plan request body. `name` and `price` are validated by the use
/// case; everything else falls back to its documented default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertPlanModel {
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    pub price: Option<f64>,

    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default)]
    pub interval: PlanInterval,

    #[serde(default)]
    pub features: Vec<PlanFeature>,

    #[serde(default)]
    pub limits: PlanLimits,

    #[serde(default)]
    pub stripe_price_id: Option<String>,

    #[serde(default)]
    pub stripe_product_id: Option<String>,

    #[serde(default = "default_is_active")]
    pub is_active: bool,

    #[serde(default)]
    pub is_popular: bool,

    #[serde(default)]
    pub sort_order: i32,
}

/// Update-plan request body. Omitted fields leave the stored column
/// untouched (merge semantics, not full replace).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlanModel {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub interval: Option<PlanInterval>,
    pub features: Option<Vec<PlanFeature>>,
    pub limits: Option<PlanLimits>,
    pub stripe_price_id: Option<String>,
    pub stripe_product_id: Option<String>,
    pub is_active: Option<bool>,
    pub is_popular: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Listing filters. Only `true` narrows: `?active=true` keeps live plans,
/// `?popular=true` keeps highlighted ones. `false` is accepted and ignored.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct ListPlansFilter {
    pub active: Option<bool>,
    pub popular: Option<bool>,
}

/// Plan as serialized to API consumers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanModel {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub currency: String,
    pub interval: PlanInterval,
    pub features: Vec<PlanFeature>,
    pub limits: PlanLimits,
    pub stripe_price_id: Option<String>,
    pub stripe_product_id: Option<String>,
    pub is_active: bool,
    pub is_popular: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PlanEntity> for PlanModel {
    fn from(value: PlanEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            price: value.price,
            currency: value.currency,
            interval: value.interval,
            features: value.features,
            limits: value.limits,
            stripe_price_id: value.stripe_price_id,
            stripe_product_id: value.stripe_product_id,
            is_active: value.is_active,
            is_popular: value.is_popular,
            sort_order: value.sort_order,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Projection of a plan down to its feature flags and usage limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanFeaturesModel {
    pub features: Vec<PlanFeature>,
    pub limits: PlanLimits,
}

impl From<PlanEntity> for PlanFeaturesModel {
    fn from(value: PlanEntity) -> Self {
        Self {
            features: value.features,
            limits: value.limits,
        }
    }
}
