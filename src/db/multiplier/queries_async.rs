use super::{queries, schema::Multiplier};
use crate::model::TravelModel;
use crate::Result;
use deadpool_sqlite::Pool;

pub async fn upsert(
    model: TravelModel,
    origin_taz: i64,
    destination_taz: i64,
    value: f64,
    pool: &Pool,
) -> Result<Multiplier> {
    pool.get()
        .await?
        .interact(move |conn| queries::upsert(model, origin_taz, destination_taz, value, conn))
        .await?
}

pub async fn select_by_pair(
    model: TravelModel,
    origin_taz: i64,
    destination_taz: i64,
    pool: &Pool,
) -> Result<Option<Multiplier>> {
    pool.get()
        .await?
        .interact(move |conn| queries::select_by_pair(model, origin_taz, destination_taz, conn))
        .await?
}

pub async fn select_count(model: TravelModel, pool: &Pool) -> Result<i64> {
    pool.get()
        .await?
        .interact(move |conn| queries::select_count(model, conn))
        .await?
}
