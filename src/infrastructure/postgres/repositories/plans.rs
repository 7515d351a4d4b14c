use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    entities::plans::{InsertPlanEntity, PlanEntity, PlanRow, UpdatePlanEntity},
    repositories::plans::PlanRepository,
    value_objects::plans::ListPlansFilter,
};
use crate::infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::plans};

pub struct PlanPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PlanPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PlanRepository for PlanPostgres {
    async fn list(&self, filter: ListPlansFilter) -> Result<Vec<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = plans::table.select(PlanRow::as_select()).into_boxed();

        if filter.active == Some(true) {
            query = query.filter(plans::is_active.eq(true));
        }
        if filter.popular == Some(true) {
            query = query.filter(plans::is_popular.eq(true));
        }

        let rows = query
            .order((plans::sort_order.asc(), plans::price.asc()))
            .load::<PlanRow>(&mut conn)?;

        Ok(rows.into_iter().map(PlanEntity::from).collect())
    }

    async fn find_by_id(&self, plan_id: Uuid) -> Result<Option<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = plans::table
            .filter(plans::id.eq(plan_id))
            .select(PlanRow::as_select())
            .first::<PlanRow>(&mut conn)
            .optional()?;

        Ok(row.map(PlanEntity::from))
    }

    async fn create(&self, insert_plan_entity: InsertPlanEntity) -> Result<PlanEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = insert_into(plans::table)
            .values(&insert_plan_entity)
            .returning(PlanRow::as_returning())
            .get_result::<PlanRow>(&mut conn)?;

        Ok(row.into())
    }

    async fn update(
        &self,
        plan_id: Uuid,
        update_plan_entity: UpdatePlanEntity,
    ) -> Result<Option<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = diesel::update(plans::table.filter(plans::id.eq(plan_id)))
            .set(&update_plan_entity)
            .returning(PlanRow::as_returning())
            .get_result::<PlanRow>(&mut conn)
            .optional()?;

        Ok(row.map(PlanEntity::from))
    }

    async fn soft_delete(&self, plan_id: Uuid) -> Result<Option<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = diesel::update(plans::table.filter(plans::id.eq(plan_id)))
            .set((plans::is_active.eq(false), plans::updated_at.eq(Utc::now())))
            .returning(PlanRow::as_returning())
            .get_result::<PlanRow>(&mut conn)
            .optional()?;

        Ok(row.map(PlanEntity::from))
    }
}
