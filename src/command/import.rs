use crate::batch::Shard;
use crate::conf::Conf;
use crate::db;
use crate::model::TravelModel;
use crate::{Error, Result};
use rusqlite::Connection;
use std::fs::{read_dir, read_to_string};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

pub fn run(args: &[String], conf: &Conf, mut conn: Connection) -> Result<()> {
    let model = match args.first() {
        Some(some) => some,
        None => Err(Error::CLI("No travel model passed".into()))?,
    };
    let model = TravelModel::from_str(model)
        .map_err(|_| Error::CLI(format!("Unknown travel model: {model}")))?;
    import(model, conf, &mut conn)
}

// Loads a model's batch trees into the relational store. The trees stay in
// place afterwards, they remain the fallback path.
pub fn import(model: TravelModel, conf: &Conf, conn: &mut Connection) -> Result<()> {
    let model_dir = conf.batches_dir().join(model.to_string());
    let multipliers_dir = model_dir.join("multipliers");
    let sources_dir = model_dir.join("sources");

    let mut shard_files: Vec<PathBuf> = read_dir(&multipliers_dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|it| it.path())
        .filter(|it| it.extension().is_some_and(|ext| ext == "json"))
        .collect();
    shard_files.sort();

    let mut counter = 1;
    for path in &shard_files {
        info!("Processing shard {} of {}", counter, shard_files.len());
        let multipliers: Shard<f64> = serde_json::from_str(&read_to_string(path)?)?;
        let sources: Shard<String> = match path.file_name() {
            Some(file_name) => {
                let sources_path = sources_dir.join(file_name);
                if sources_path.exists() {
                    serde_json::from_str(&read_to_string(&sources_path)?)?
                } else {
                    Shard::new()
                }
            }
            None => Shard::new(),
        };
        let sp = conn.savepoint()?;
        for (origin, row) in &multipliers {
            let origin_taz: i64 = origin
                .parse()
                .map_err(|_| Error::Generic(format!("Non-integer origin zone key: {origin}")))?;
            for (destination, value) in row {
                let destination_taz: i64 = destination.parse().map_err(|_| {
                    Error::Generic(format!("Non-integer destination zone key: {destination}"))
                })?;
                db::multiplier::queries::upsert(model, origin_taz, destination_taz, *value, &sp)?;
                if let Some(source) = sources.get(origin).and_then(|it| it.get(destination)) {
                    db::multiplier_source::queries::upsert(
                        model,
                        origin_taz,
                        destination_taz,
                        source,
                        &sp,
                    )?;
                }
            }
        }
        sp.commit()?;
        counter += 1;
    }

    let count = db::multiplier::queries::select_count(model, conn)?;
    info!(count, %model, "Import finished");

    Ok(())
}
