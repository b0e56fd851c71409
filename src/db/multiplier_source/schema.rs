use crate::model::TravelModel;
use rusqlite::Row;
use std::str::FromStr;
use std::sync::OnceLock;

pub const TABLE_NAME: &str = "multiplier_source";

pub enum Columns {
    Id,
    Model,
    OriginTaz,
    DestinationTaz,
    Source,
}

impl Columns {
    pub fn as_str(&self) -> &'static str {
        match self {
            Columns::Id => "id",
            Columns::Model => "model",
            Columns::OriginTaz => "origin_taz",
            Columns::DestinationTaz => "destination_taz",
            Columns::Source => "source",
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct MultiplierSource {
    pub id: i64,
    pub model: TravelModel,
    pub origin_taz: i64,
    pub destination_taz: i64,
    pub source: String,
}

impl MultiplierSource {
    pub fn projection() -> &'static str {
        static PROJECTION: OnceLock<String> = OnceLock::new();
        PROJECTION.get_or_init(|| {
            [
                Columns::Id,
                Columns::Model,
                Columns::OriginTaz,
                Columns::DestinationTaz,
                Columns::Source,
            ]
            .iter()
            .map(Columns::as_str)
            .collect::<Vec<_>>()
            .join(", ")
        })
    }

    pub const fn mapper() -> fn(&Row) -> rusqlite::Result<MultiplierSource> {
        |row: &_| {
            let model: String = row.get(Columns::Model.as_str())?;
            let model = TravelModel::from_str(&model).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    1,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;
            Ok(MultiplierSource {
                id: row.get(Columns::Id.as_str())?,
                model,
                origin_taz: row.get(Columns::OriginTaz.as_str())?,
                destination_taz: row.get(Columns::DestinationTaz.as_str())?,
                source: row.get(Columns::Source.as_str())?,
            })
        }
    }
}
