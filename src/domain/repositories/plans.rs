use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::plans::{InsertPlanEntity, PlanEntity, UpdatePlanEntity};
use crate::domain::value_objects::plans::ListPlansFilter;

#[async_trait]
#[automock]
pub trait PlanRepository {
    /// Matching plans ordered by `sort_order` ascending, then `price`.
    async fn list(&self, filter: ListPlansFilter) -> Result<Vec<PlanEntity>>;
    async fn find_by_id(&self, plan_id: Uuid) -> Result<Option<PlanEntity>>;
    async fn create(&self, insert_plan_entity: InsertPlanEntity) -> Result<PlanEntity>;
    async fn update(
        &self,
        plan_id: Uuid,
        update_plan_entity: UpdatePlanEntity,
    ) -> Result<Option<PlanEntity>>;
    async fn soft_delete(&self, plan_id: Uuid) -> Result<Option<PlanEntity>>;
}
