use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::plans::{InsertPlanEntity, UpdatePlanEntity},
    repositories::plans::PlanRepository,
    value_objects::plans::{
        InsertPlanModel, ListPlansFilter, PlanFeaturesModel, PlanModel, UpdatePlanModel,
    },
};

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Plan not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PlanError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PlanError::NotFound => StatusCode::NOT_FOUND,
            PlanError::Validation(_) => StatusCode::BAD_REQUEST,
            PlanError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, PlanError>;

pub struct PlanUseCase<T>
where
    T: PlanRepository + Send + Sync + 'static,
{
    plan_repo: Arc<T>,
}

impl<T> PlanUseCase<T>
where
    T: PlanRepository + Send + Sync + 'static,
{
    pub fn new(plan_repo: Arc<T>) -> Self {
        Self { plan_repo }
    }

    pub async fn list(&self, filter: ListPlansFilter) -> UseCaseResult<Vec<PlanModel>> {
        let plans = self.plan_repo.list(filter).await.map_err(|err| {
            error!(db_error = ?err, "plans: failed to list plans");
            PlanError::Internal(err)
        })?;

        let plan_count = plans.len();
        info!(plan_count, "plans: plans listed");

        Ok(plans.into_iter().map(PlanModel::from).collect())
    }

    pub async fn get_by_id(&self, plan_id: Uuid) -> UseCaseResult<PlanModel> {
        let plan = self.plan_repo.find_by_id(plan_id).await.map_err(|err| {
            error!(%plan_id, db_error = ?err, "plans: failed to load plan");
            PlanError::Internal(err)
        })?;

        match plan {
            Some(plan) => Ok(plan.into()),
            None => {
                warn!(%plan_id, "plans: plan not found");
                Err(PlanError::NotFound)
            }
        }
    }

    pub async fn create(&self, insert_plan_model: InsertPlanModel) -> UseCaseResult<PlanModel> {
        let insert_plan_entity = build_insert_entity(insert_plan_model)?;

        info!(name = %insert_plan_entity.name, "plans: creating plan");
        let plan = self.plan_repo.create(insert_plan_entity).await.map_err(|err| {
            error!(db_error = ?err, "plans: failed to create plan");
            PlanError::Internal(err)
        })?;

        info!(plan_id = %plan.id, "plans: plan created");
        Ok(plan.into())
    }

    pub async fn update(
        &self,
        plan_id: Uuid,
        update_plan_model: UpdatePlanModel,
    ) -> UseCaseResult<PlanModel> {
        let update_plan_entity = build_update_entity(update_plan_model)?;

        let plan = self
            .plan_repo
            .update(plan_id, update_plan_entity)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "plans: failed to update plan");
                PlanError::Internal(err)
            })?;

        match plan {
            Some(plan) => {
                info!(%plan_id, "plans: plan updated");
                Ok(plan.into())
            }
            None => {
                warn!(%plan_id, "plans: update target not found");
                Err(PlanError::NotFound)
            }
        }
    }

    pub async fn soft_delete(&self, plan_id: Uuid) -> UseCaseResult<PlanModel> {
        let plan = self.plan_repo.soft_delete(plan_id).await.map_err(|err| {
            error!(%plan_id, db_error = ?err, "plans: failed to deactivate plan");
            PlanError::Internal(err)
        })?;

        match plan {
            Some(plan) => {
                info!(%plan_id, "plans: plan deactivated");
                Ok(plan.into())
            }
            None => {
                warn!(%plan_id, "plans: deactivate target not found");
                Err(PlanError::NotFound)
            }
        }
    }

    pub async fn get_features(&self, plan_id: Uuid) -> UseCaseResult<PlanFeaturesModel> {
        let plan = self.plan_repo.find_by_id(plan_id).await.map_err(|err| {
            error!(%plan_id, db_error = ?err, "plans: failed to load plan features");
            PlanError::Internal(err)
        })?;

        match plan {
            Some(plan) => Ok(plan.into()),
            None => {
                warn!(%plan_id, "plans: features target not found");
                Err(PlanError::NotFound)
            }
        }
    }
}

/// Validates the create payload and fills every omitted optional field
/// with its documented default. A price of zero is valid; only absence
/// is rejected.
fn build_insert_entity(model: InsertPlanModel) -> UseCaseResult<InsertPlanEntity> {
    let name = model
        .name
        .map(|name| name.trim().to_string())
        .unwrap_or_default();

    let price = match model.price {
        Some(value) => value,
        None => return Err(validation_error()),
    };

    if name.is_empty() {
        return Err(validation_error());
    }

    let now = Utc::now();

    Ok(InsertPlanEntity {
        name,
        description: model.description,
        price,
        currency: model.currency,
        interval: model.interval.to_string(),
        features: serde_json::to_value(&model.features).map_err(anyhow::Error::new)?,
        limits: serde_json::to_value(&model.limits).map_err(anyhow::Error::new)?,
        stripe_price_id: model.stripe_price_id,
        stripe_product_id: model.stripe_product_id,
        is_active: model.is_active,
        is_popular: model.is_popular,
        sort_order: model.sort_order,
        created_at: now,
        updated_at: now,
    })
}

fn validation_error() -> PlanError {
    let err = PlanError::Validation("Name and price are required".to_string());
    warn!(
        status = err.status_code().as_u16(),
        "plans: create payload failed validation"
    );
    err
}

/// Maps the PUT body onto a changeset. Fields absent from the request stay
/// `None` and the stored column is left untouched.
fn build_update_entity(model: UpdatePlanModel) -> UseCaseResult<UpdatePlanEntity> {
    let features = match model.features {
        Some(features) => Some(serde_json::to_value(&features).map_err(anyhow::Error::new)?),
        None => None,
    };
    let limits = match model.limits {
        Some(limits) => Some(serde_json::to_value(&limits).map_err(anyhow::Error::new)?),
        None => None,
    };

    Ok(UpdatePlanEntity {
        name: model.name,
        description: model.description,
        price: model.price,
        currency: model.currency,
        interval: model.interval.map(|interval| interval.to_string()),
        features,
        limits,
        stripe_price_id: model.stripe_price_id,
        stripe_product_id: model.stripe_product_id,
        is_active: model.is_active,
        is_popular: model.is_popular,
        sort_order: model.sort_order,
        updated_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::plans::PlanEntity;
    use crate::domain::repositories::plans::MockPlanRepository;
    use crate::domain::value_objects::plans::{PlanFeature, PlanInterval, PlanLimits};
    use mockall::predicate::eq;
    use serde_json::json;

    fn sample_entity(id: Uuid, insert: &InsertPlanEntity) -> PlanEntity {
        PlanEntity {
            id,
            name: insert.name.clone(),
            description: insert.description.clone(),
            price: insert.price,
            currency: insert.currency.clone(),
            interval: PlanInterval::from_str(&insert.interval).unwrap_or_default(),
            features: serde_json::from_value(insert.features.clone()).unwrap_or_default(),
            limits: serde_json::from_value(insert.limits.clone()).unwrap_or_default(),
            stripe_price_id: insert.stripe_price_id.clone(),
            stripe_product_id: insert.stripe_product_id.clone(),
            is_active: insert.is_active,
            is_popular: insert.is_popular,
            sort_order: insert.sort_order,
            created_at: insert.created_at,
            updated_at: insert.updated_at,
        }
    }

    fn stored_plan(id: Uuid, name: &str, price: f64) -> PlanEntity {
        let now = Utc::now();
        PlanEntity {
            id,
            name: name.to_string(),
            description: None,
            price,
            currency: "USD".to_string(),
            interval: PlanInterval::Monthly,
            features: vec![PlanFeature {
                name: "Forms".to_string(),
                included: true,
                limit: Some(5),
                description: None,
            }],
            limits: PlanLimits::default(),
            stripe_price_id: None,
            stripe_product_id: None,
            is_active: true,
            is_popular: false,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn create_applies_documented_defaults() {
        let model: InsertPlanModel =
            serde_json::from_value(json!({ "name": "Basic", "price": 9.99 })).unwrap();

        let plan_id = Uuid::new_v4();
        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_create()
            .withf(|insert| {
                insert.name == "Basic"
                    && insert.price == 9.99
                    && insert.currency == "USD"
                    && insert.interval == "monthly"
                    && insert.features == json!([])
                    && insert.limits["franchises"] == json!(1)
                    && insert.limits["apiCalls"] == json!(1000)
                    && insert.is_active
                    && !insert.is_popular
                    && insert.sort_order == 0
                    && insert.created_at == insert.updated_at
            })
            .returning(move |insert| {
                let plan = sample_entity(plan_id, &insert);
                Box::pin(async move { Ok(plan) })
            });

        let usecase = PlanUseCase::new(Arc::new(plan_repo));
        let plan = usecase.create(model).await.unwrap();

        assert_eq!(plan.id, plan_id);
        assert_eq!(plan.name, "Basic");
        assert_eq!(plan.price, 9.99);
        assert_eq!(plan.currency, "USD");
        assert_eq!(plan.interval, PlanInterval::Monthly);
        assert_eq!(plan.limits, PlanLimits::default());
        assert!(plan.is_active);
    }

    #[tokio::test]
    async fn create_without_name_is_rejected_before_any_write() {
        let model: InsertPlanModel = serde_json::from_value(json!({ "price": 9.99 })).unwrap();

        // No expectation set: any repository call would panic the test.
        let plan_repo = MockPlanRepository::new();
        let usecase = PlanUseCase::new(Arc::new(plan_repo));

        let err = usecase.create(model).await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_without_price_is_rejected_but_zero_price_is_valid() {
        let missing: InsertPlanModel =
            serde_json::from_value(json!({ "name": "Basic" })).unwrap();

        let plan_repo = MockPlanRepository::new();
        let usecase = PlanUseCase::new(Arc::new(plan_repo));
        let err = usecase.create(missing).await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);

        let free: InsertPlanModel =
            serde_json::from_value(json!({ "name": "Free", "price": 0 })).unwrap();

        let plan_id = Uuid::new_v4();
        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_create()
            .withf(|insert| insert.price == 0.0)
            .returning(move |insert| {
                let plan = sample_entity(plan_id, &insert);
                Box::pin(async move { Ok(plan) })
            });

        let usecase = PlanUseCase::new(Arc::new(plan_repo));
        let plan = usecase.create(free).await.unwrap();
        assert_eq!(plan.price, 0.0);
    }

    #[tokio::test]
    async fn get_by_id_maps_missing_row_to_not_found() {
        let plan_id = Uuid::new_v4();

        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_find_by_id()
            .with(eq(plan_id))
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = PlanUseCase::new(Arc::new(plan_repo));
        let err = usecase.get_by_id(plan_id).await.unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_keeps_unsupplied_fields_out_of_the_changeset() {
        let model: UpdatePlanModel = serde_json::from_value(json!({ "price": 50 })).unwrap();

        let plan_id = Uuid::new_v4();
        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_update()
            .withf(move |id, changes| {
                *id == plan_id
                    && changes.price == Some(50.0)
                    && changes.name.is_none()
                    && changes.currency.is_none()
                    && changes.features.is_none()
                    && changes.is_active.is_none()
            })
            .returning(|_, changes| {
                let mut plan = stored_plan(Uuid::new_v4(), "Pro", 29.0);
                plan.price = changes.price.unwrap_or(plan.price);
                plan.updated_at = changes.updated_at;
                Box::pin(async move { Ok(Some(plan)) })
            });

        let usecase = PlanUseCase::new(Arc::new(plan_repo));
        let plan = usecase.update(plan_id, model).await.unwrap();

        // Merge semantics: the name survives a price-only update.
        assert_eq!(plan.name, "Pro");
        assert_eq!(plan.price, 50.0);
    }

    #[tokio::test]
    async fn update_of_unknown_plan_is_not_found() {
        let plan_id = Uuid::new_v4();

        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_update()
            .returning(|_, _| Box::pin(async { Ok(None) }));

        let usecase = PlanUseCase::new(Arc::new(plan_repo));
        let err = usecase
            .update(plan_id, UpdatePlanModel::default())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn soft_delete_is_idempotent() {
        let plan_id = Uuid::new_v4();

        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_soft_delete()
            .with(eq(plan_id))
            .times(2)
            .returning(move |id| {
                let mut plan = stored_plan(id, "Basic", 9.99);
                plan.is_active = false;
                Box::pin(async move { Ok(Some(plan)) })
            });

        let usecase = PlanUseCase::new(Arc::new(plan_repo));

        let first = usecase.soft_delete(plan_id).await.unwrap();
        let second = usecase.soft_delete(plan_id).await.unwrap();

        assert!(!first.is_active);
        assert!(!second.is_active);
    }

    #[tokio::test]
    async fn list_forwards_the_filter_to_the_repository() {
        let filter = ListPlansFilter {
            active: Some(true),
            popular: None,
        };

        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_list()
            .with(eq(filter))
            .returning(|_| {
                let plans = vec![
                    stored_plan(Uuid::new_v4(), "Basic", 9.99),
                    stored_plan(Uuid::new_v4(), "Pro", 29.0),
                ];
                Box::pin(async move { Ok(plans) })
            });

        let usecase = PlanUseCase::new(Arc::new(plan_repo));
        let plans = usecase.list(filter).await.unwrap();

        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].name, "Basic");
    }

    #[tokio::test]
    async fn get_features_projects_features_and_limits_only() {
        let plan_id = Uuid::new_v4();

        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_find_by_id()
            .with(eq(plan_id))
            .returning(move |id| {
                let plan = stored_plan(id, "Basic", 9.99);
                Box::pin(async move { Ok(Some(plan)) })
            });

        let usecase = PlanUseCase::new(Arc::new(plan_repo));
        let projection = usecase.get_features(plan_id).await.unwrap();

        assert_eq!(projection.features.len(), 1);
        assert_eq!(projection.features[0].name, "Forms");
        assert_eq!(projection.limits, PlanLimits::default());
    }

    #[tokio::test]
    async fn storage_fault_surfaces_as_internal_error() {
        let mut plan_repo = MockPlanRepository::new();
        plan_repo.expect_list().returning(|_| {
            Box::pin(async { Err(anyhow::anyhow!("connection refused")) })
        });

        let usecase = PlanUseCase::new(Arc::new(plan_repo));
        let err = usecase.list(ListPlansFilter::default()).await.unwrap_err();

        assert_eq!(
            err.status_code(),
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
