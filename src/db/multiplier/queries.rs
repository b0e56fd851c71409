use super::schema::{self, Columns, Multiplier};
use crate::model::TravelModel;
use crate::{Error, Result};
use rusqlite::{named_params, Connection, OptionalExtension};

pub fn upsert(
    model: TravelModel,
    origin_taz: i64,
    destination_taz: i64,
    value: f64,
    conn: &Connection,
) -> Result<Multiplier> {
    let sql = format!(
        r#"
            INSERT INTO {table} (
                {model},
                {origin_taz},
                {destination_taz},
                {value}
            ) VALUES (
                :model,
                :origin_taz,
                :destination_taz,
                :value
            )
            ON CONFLICT ({model}, {origin_taz}, {destination_taz})
            DO UPDATE SET {value} = excluded.{value}
        "#,
        table = schema::TABLE_NAME,
        model = Columns::Model.as_str(),
        origin_taz = Columns::OriginTaz.as_str(),
        destination_taz = Columns::DestinationTaz.as_str(),
        value = Columns::Value.as_str(),
    );
    conn.execute(
        &sql,
        named_params! {
            ":model": model.to_string(),
            ":origin_taz": origin_taz,
            ":destination_taz": destination_taz,
            ":value": value,
        },
    )?;
    select_by_pair(model, origin_taz, destination_taz, conn)?.ok_or(Error::Generic(
        "Failed to select an upserted multiplier".into(),
    ))
}

pub fn select_by_pair(
    model: TravelModel,
    origin_taz: i64,
    destination_taz: i64,
    conn: &Connection,
) -> Result<Option<Multiplier>> {
    let sql = format!(
        r#"
            SELECT {projection}
            FROM {table}
            WHERE {model} = :model
                AND {origin_taz} = :origin_taz
                AND {destination_taz} = :destination_taz
        "#,
        projection = Multiplier::projection(),
        table = schema::TABLE_NAME,
        model = Columns::Model.as_str(),
        origin_taz = Columns::OriginTaz.as_str(),
        destination_taz = Columns::DestinationTaz.as_str(),
    );
    conn.query_row(
        &sql,
        named_params! {
            ":model": model.to_string(),
            ":origin_taz": origin_taz,
            ":destination_taz": destination_taz,
        },
        Multiplier::mapper(),
    )
    .optional()
    .map_err(Into::into)
}

pub fn select_count(model: TravelModel, conn: &Connection) -> Result<i64> {
    let sql = format!(
        r#"
            SELECT count(*)
            FROM {table}
            WHERE {model} = :model
        "#,
        table = schema::TABLE_NAME,
        model = Columns::Model.as_str(),
    );
    conn.query_row(&sql, named_params! { ":model": model.to_string() }, |row| {
        row.get(0)
    })
    .map_err(Into::into)
}
