use chrono::{DateTime, Utc};
use diesel::{AsChangeset, prelude::*};
use uuid::Uuid;

use crate::domain::value_objects::plans::{PlanFeature, PlanInterval, PlanLimits};
use crate::infrastructure::postgres::schema::plans;

#[derive(Debug, Clone, PartialEq)]
pub struct PlanEntity {
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

/// Raw row used for Diesel queries. JSONB columns stay as JSON and are
/// parsed into the typed value objects.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = plans)]
pub struct PlanRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub currency: String,
    pub interval: String,
    pub features: serde_json::Value,
    pub limits: serde_json::Value,
    pub stripe_price_id: Option<String>,
    pub stripe_product_id: Option<String>,
    pub is_active: bool,
    pub is_popular: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PlanRow> for PlanEntity {
    fn from(value: PlanRow) -> Self {
        let features = serde_json::from_value(value.features).unwrap_or_default();
        let limits = serde_json::from_value(value.limits).unwrap_or_default();
        let interval = PlanInterval::from_str(&value.interval).unwrap_or_default();

        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            price: value.price,
            currency: value.currency,
            interval,
            features,
            limits,
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

#[derive(Debug, Clone, Insertable, PartialEq)]
#[diesel(table_name = plans)]
pub struct InsertPlanEntity {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub currency: String,
    pub interval: String,
    pub features: serde_json::Value,
    pub limits: serde_json::Value,
    pub stripe_price_id: Option<String>,
    pub stripe_product_id: Option<String>,
    pub is_active: bool,
    pub is_popular: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for PUT updates. `None` leaves the column untouched; only
/// `updated_at` is written unconditionally.
#[derive(Debug, Clone, AsChangeset, PartialEq)]
#[diesel(table_name = plans)]
pub struct UpdatePlanEntity {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub interval: Option<String>,
    pub features: Option<serde_json::Value>,
    pub limits: Option<serde_json::Value>,
    pub stripe_price_id: Option<String>,
    pub stripe_product_id: Option<String>,
    pub is_active: Option<bool>,
    pub is_popular: Option<bool>,
    pub sort_order: Option<i32>,
    pub updated_at: DateTime<Utc>,
}
