use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::application::usecases::plans::{PlanError, PlanUseCase};
use crate::domain::{
    repositories::plans::PlanRepository,
    value_objects::plans::{InsertPlanModel, ListPlansFilter, UpdatePlanModel},
};
use crate::infrastructure::axum_http::error_responses::SuccessResponse;
use crate::infrastructure::postgres::{
    postgres_connection::PgPoolSquad, repositories::plans::PlanPostgres,
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let plan_repository = PlanPostgres::new(Arc::clone(&db_pool));
    let plan_usecase = PlanUseCase::new(Arc::new(plan_repository));

    Router::new()
        .route("/", get(list))
        .route("/", post(create))
        .route("/:id", get(get_by_id))
        .route("/:id", put(update))
        .route("/:id", delete(soft_delete))
        .route("/:id/features", get(get_features))
        .with_state(Arc::new(plan_usecase))
}

pub async fn list<T>(
    State(plan_usecase): State<Arc<PlanUseCase<T>>>,
    Query(filter): Query<ListPlansFilter>,
) -> impl IntoResponse
where
    T: PlanRepository + Send + Sync,
{
    match plan_usecase.list(filter).await {
        Ok(plans) => {
            let count = plans.len();
            (
                StatusCode::OK,
                Json(SuccessResponse::with_count(plans, count)),
            )
                .into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn get_by_id<T>(
    State(plan_usecase): State<Arc<PlanUseCase<T>>>,
    Path(id): Path<String>,
) -> impl IntoResponse
where
    T: PlanRepository + Send + Sync,
{
    // A malformed identifier resolves the same as an unknown one.
    let plan_id = match id.parse::<Uuid>() {
        Ok(value) => value,
        Err(_) => return PlanError::NotFound.into_response(),
    };

    match plan_usecase.get_by_id(plan_id).await {
        Ok(plan) => (StatusCode::OK, Json(SuccessResponse::new(plan))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn create<T>(
    State(plan_usecase): State<Arc<PlanUseCase<T>>>,
    Json(insert_plan_model): Json<InsertPlanModel>,
) -> impl IntoResponse
where
    T: PlanRepository + Send + Sync,
{
    match plan_usecase.create(insert_plan_model).await {
        Ok(plan) => (StatusCode::CREATED, Json(SuccessResponse::new(plan))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update<T>(
    State(plan_usecase): State<Arc<PlanUseCase<T>>>,
    Path(id): Path<String>,
    Json(update_plan_model): Json<UpdatePlanModel>,
) -> impl IntoResponse
where
    T: PlanRepository + Send + Sync,
{
    let plan_id = match id.parse::<Uuid>() {
        Ok(value) => value,
        Err(_) => return PlanError::NotFound.into_response(),
    };

    match plan_usecase.update(plan_id, update_plan_model).await {
        Ok(plan) => (StatusCode::OK, Json(SuccessResponse::new(plan))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn soft_delete<T>(
    State(plan_usecase): State<Arc<PlanUseCase<T>>>,
    Path(id): Path<String>,
) -> impl IntoResponse
where
    T: PlanRepository + Send + Sync,
{
    let plan_id = match id.parse::<Uuid>() {
        Ok(value) => value,
        Err(_) => return PlanError::NotFound.into_response(),
    };

    match plan_usecase.soft_delete(plan_id).await {
        Ok(plan) => (StatusCode::OK, Json(SuccessResponse::new(plan))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn get_features<T>(
    State(plan_usecase): State<Arc<PlanUseCase<T>>>,
    Path(id): Path<String>,
) -> impl IntoResponse
where
    T: PlanRepository + Send + Sync,
{
    let plan_id = match id.parse::<Uuid>() {
        Ok(value) => value,
        Err(_) => return PlanError::NotFound.into_response(),
    };

    match plan_usecase.get_features(plan_id).await {
        Ok(projection) => (StatusCode::OK, Json(SuccessResponse::new(projection))).into_response(),
        Err(err) => err.into_response(),
    }
}
