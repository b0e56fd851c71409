use super::model::{GeoPoint, ZoneDataset};
use geo::Point;

pub fn locate(point: &GeoPoint, dataset: &ZoneDataset) -> Option<i64> {
    let point: Point = point.into();
    dataset
        .features
        .iter()
        .find(|it| it.geometry.contains(&point))
        .map(|it| it.id)
}

// One pass over the dataset resolves both endpoints, stopping as soon as both
// are known
pub fn locate_pair(
    origin: &GeoPoint,
    destination: &GeoPoint,
    dataset: &ZoneDataset,
) -> (Option<i64>, Option<i64>) {
    let origin: Point = origin.into();
    let destination: Point = destination.into();
    let mut origin_zone: Option<i64> = None;
    let mut destination_zone: Option<i64> = None;
    for feature in &dataset.features {
        if origin_zone.is_none() && feature.geometry.contains(&origin) {
            origin_zone = Some(feature.id);
        }
        if destination_zone.is_none() && feature.geometry.contains(&destination) {
            destination_zone = Some(feature.id);
        }
        if origin_zone.is_some() && destination_zone.is_some() {
            break;
        }
    }
    (origin_zone, destination_zone)
}
