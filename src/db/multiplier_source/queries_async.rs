use super::{queries, schema::MultiplierSource};
use crate::model::TravelModel;
use crate::Result;
use deadpool_sqlite::Pool;

pub async fn upsert(
    model: TravelModel,
    origin_taz: i64,
    destination_taz: i64,
    source: String,
    pool: &Pool,
) -> Result<MultiplierSource> {
    pool.get()
        .await?
        .interact(move |conn| {
            queries::upsert(model, origin_taz, destination_taz, &source, conn)
        })
        .await?
}

pub async fn select_by_pair(
    model: TravelModel,
    origin_taz: i64,
    destination_taz: i64,
    pool: &Pool,
) -> Result<Option<MultiplierSource>> {
    pool.get()
        .await?
        .interact(move |conn| queries::select_by_pair(model, origin_taz, destination_taz, conn))
        .await?
}
