use super::schema::{self, Columns, MultiplierSource};
use crate::model::TravelModel;
use crate::{Error, Result};
use rusqlite::{named_params, Connection, OptionalExtension};

pub fn upsert(
    model: TravelModel,
    origin_taz: i64,
    destination_taz: i64,
    source: &str,
    conn: &Connection,
) -> Result<MultiplierSource> {
    let sql = format!(
        r#"
            INSERT INTO {table} (
                {model},
                {origin_taz},
                {destination_taz},
                {source}
            ) VALUES (
                :model,
                :origin_taz,
                :destination_taz,
                :source
            )
            ON CONFLICT ({model}, {origin_taz}, {destination_taz})
            DO UPDATE SET {source} = excluded.{source}
        "#,
        table = schema::TABLE_NAME,
        model = Columns::Model.as_str(),
        origin_taz = Columns::OriginTaz.as_str(),
        destination_taz = Columns::DestinationTaz.as_str(),
        source = Columns::Source.as_str(),
    );
    conn.execute(
        &sql,
        named_params! {
            ":model": model.to_string(),
            ":origin_taz": origin_taz,
            ":destination_taz": destination_taz,
            ":source": source,
        },
    )?;
    select_by_pair(model, origin_taz, destination_taz, conn)?.ok_or(Error::Generic(
        "Failed to select an upserted multiplier source".into(),
    ))
}

pub fn select_by_pair(
    model: TravelModel,
    origin_taz: i64,
    destination_taz: i64,
    conn: &Connection,
) -> Result<Option<MultiplierSource>> {
    let sql = format!(
        r#"
            SELECT {projection}
            FROM {table}
            WHERE {model} = :model
                AND {origin_taz} = :origin_taz
                AND {destination_taz} = :destination_taz
        "#,
        projection = MultiplierSource::projection(),
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
        MultiplierSource::mapper(),
    )
    .optional()
    .map_err(Into::into)
}

#[cfg(test)]
mod test {
    use crate::db::{self, test::conn};
    use crate::model::TravelModel;
    use crate::Result;

    #[test]
    fn upsert_then_select() -> Result<()> {
        let conn = conn();
        let source = db::multiplier_source::queries::upsert(
            TravelModel::Freight,
            305,
            410,
            "2023 Model Update",
            &conn,
        )?;
        assert_eq!("2023 Model Update", source.source);
        let selected =
            db::multiplier_source::queries::select_by_pair(TravelModel::Freight, 305, 410, &conn)?;
        assert_eq!(Some(source), selected);
        Ok(())
    }

    #[test]
    fn upsert_overwrites_existing_pair() -> Result<()> {
        let conn = conn();
        db::multiplier_source::queries::upsert(TravelModel::Freight, 305, 410, "old", &conn)?;
        let updated =
            db::multiplier_source::queries::upsert(TravelModel::Freight, 305, 410, "new", &conn)?;
        assert_eq!("new", updated.source);
        Ok(())
    }

    #[test]
    fn select_missing_pair() -> Result<()> {
        let conn = conn();
        assert_eq!(
            None,
            db::multiplier_source::queries::select_by_pair(
                TravelModel::Passenger,
                305,
                410,
                &conn,
            )?,
        );
        Ok(())
    }
}
