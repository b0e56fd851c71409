use crate::conf::Conf;
use crate::model::TravelModel;
use crate::{Error, Result};
use geo::{Area, Contains, MultiPolygon, Point, Polygon};
use geojson::{FeatureCollection, GeoJson};
use serde_json::Value;
use std::collections::HashMap;
use std::fs::read_to_string;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        GeoPoint { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<&GeoPoint> for Point {
    fn from(val: &GeoPoint) -> Self {
        Point::new(val.lng, val.lat)
    }
}

#[derive(Debug, Clone)]
pub enum ZoneGeometry {
    Polygon(Polygon),
    MultiPolygon(MultiPolygon),
}

impl ZoneGeometry {
    pub fn contains(&self, point: &Point) -> bool {
        match self {
            ZoneGeometry::Polygon(poly) => poly.contains(point),
            ZoneGeometry::MultiPolygon(multi_poly) => multi_poly.contains(point),
        }
    }

    fn unsigned_area(&self) -> f64 {
        match self {
            ZoneGeometry::Polygon(poly) => poly.unsigned_area(),
            ZoneGeometry::MultiPolygon(multi_poly) => multi_poly.unsigned_area(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ZoneFeature {
    pub id: i64,
    pub geometry: ZoneGeometry,
    pub area: f64,
}

#[derive(Debug, Clone)]
pub struct ZoneDataset {
    pub model: TravelModel,
    pub features: Vec<ZoneFeature>,
}

impl ZoneDataset {
    pub fn load(model: TravelModel, path: &Path) -> Result<ZoneDataset> {
        let geo_json: GeoJson = read_to_string(path)
            .map_err(|e| {
                Error::Generic(format!(
                    "Failed to read zone dataset {}: {e}",
                    path.display(),
                ))
            })?
            .parse()?;
        let collection = FeatureCollection::try_from(geo_json)?;
        ZoneDataset::from_feature_collection(model, collection)
    }

    pub fn from_feature_collection(
        model: TravelModel,
        collection: FeatureCollection,
    ) -> Result<ZoneDataset> {
        let id_attribute = model.zone_id_attribute();
        let mut features = Vec::with_capacity(collection.features.len());
        for feature in collection.features {
            let id = feature
                .properties
                .as_ref()
                .and_then(|props| props.get(id_attribute))
                .and_then(zone_id_value)
                .ok_or_else(|| {
                    Error::Generic(format!(
                        "Zone feature in {model} dataset is missing an integer {id_attribute} attribute",
                    ))
                })?;
            let geometry = feature.geometry.ok_or_else(|| {
                Error::Generic(format!("Zone {id} in {model} dataset has no geometry"))
            })?;
            let geometry = match &geometry.value {
                geojson::Value::Polygon(_) => {
                    ZoneGeometry::Polygon((&geometry.value).try_into()?)
                }
                geojson::Value::MultiPolygon(_) => {
                    ZoneGeometry::MultiPolygon((&geometry.value).try_into()?)
                }
                _ => {
                    return Err(Error::Generic(format!(
                        "Zone {id} in {model} dataset has non-polygonal geometry",
                    )))
                }
            };
            let area = geometry.unsigned_area();
            features.push(ZoneFeature { id, geometry, area });
        }
        // Smallest zone first, so a first-match scan is deterministic even if
        // polygons overlap
        features.sort_by(|a, b| a.area.total_cmp(&b.area));
        Ok(ZoneDataset { model, features })
    }
}

fn zone_id_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(num) => num.as_i64(),
        Value::String(str) => str.parse().ok(),
        _ => None,
    }
}

pub struct ZoneRepo {
    datasets: HashMap<TravelModel, ZoneDataset>,
}

impl ZoneRepo {
    pub fn load(conf: &Conf) -> Result<ZoneRepo> {
        let mut datasets = HashMap::new();
        for model in TravelModel::ALL {
            let path = conf.zones_dir().join(model.zone_file_name());
            datasets.insert(model, ZoneDataset::load(model, &path)?);
        }
        Ok(ZoneRepo { datasets })
    }

    pub fn dataset(&self, model: TravelModel) -> &ZoneDataset {
        &self.datasets[&model]
    }

    #[cfg(test)]
    pub fn mock(datasets: Vec<ZoneDataset>) -> ZoneRepo {
        ZoneRepo {
            datasets: datasets.into_iter().map(|it| (it.model, it)).collect(),
        }
    }
}
