use crate::batch::BatchRepo;
use crate::db;
use crate::model::TravelModel;
use crate::zone::{self, GeoPoint, ZoneRepo};
use crate::{Error, Result};
use deadpool_sqlite::Pool;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Primary,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMultiplier {
    pub origin_taz: i64,
    pub destination_taz: i64,
    pub multiplier: f64,
    pub source: String,
    pub provenance: Provenance,
}

pub async fn resolve(
    model: TravelModel,
    origin: GeoPoint,
    destination: GeoPoint,
    zones: &ZoneRepo,
    batches: &BatchRepo,
    pool: &Pool,
) -> Result<ResolvedMultiplier> {
    if !origin.is_finite() || !destination.is_finite() {
        return Err(Error::InvalidInput("Invalid coordinates".into()));
    }

    let dataset = zones.dataset(model);
    let (origin_zone, destination_zone) =
        zone::service::locate_pair(&origin, &destination, dataset);
    let origin_taz =
        origin_zone.ok_or(Error::NotFound("No zone contains the origin point".into()))?;
    let destination_taz = destination_zone.ok_or(Error::NotFound(
        "No zone contains the destination point".into(),
    ))?;

    // A zero-row result falls through to the batch trees just like an
    // unreachable store, the trees are the authority of last resort
    match primary_lookup(model, origin_taz, destination_taz, pool).await {
        Ok(Some((multiplier, source))) => {
            return Ok(ResolvedMultiplier {
                origin_taz,
                destination_taz,
                multiplier,
                source,
                provenance: Provenance::Primary,
            })
        }
        Ok(None) => {}
        Err(e) => warn!(?e, "Primary store lookup failed, falling back to batch files"),
    }

    let multiplier = batches.multiplier(model, origin_taz, destination_taz)?;
    let source = batches.source(model, origin_taz, destination_taz)?;
    Ok(ResolvedMultiplier {
        origin_taz,
        destination_taz,
        multiplier,
        source,
        provenance: Provenance::Fallback,
    })
}

async fn primary_lookup(
    model: TravelModel,
    origin_taz: i64,
    destination_taz: i64,
    pool: &Pool,
) -> Result<Option<(f64, String)>> {
    let multiplier =
        db::multiplier::queries_async::select_by_pair(model, origin_taz, destination_taz, pool)
            .await?;
    let Some(multiplier) = multiplier else {
        return Ok(None);
    };
    let source = db::multiplier_source::queries_async::select_by_pair(
        model,
        origin_taz,
        destination_taz,
        pool,
    )
    .await?;
    // A value without its citation counts as an incomplete row
    let Some(source) = source else {
        return Ok(None);
    };
    Ok(Some((multiplier.value, source.source)))
}
