use crate::conf::Conf;
use crate::model::TravelModel;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Origin zone id (as string) -> destination zone id (as string) -> value.
pub type Shard<V> = HashMap<String, HashMap<String, V>>;

pub const SHARD_SIZE: i64 = 100;

pub fn shard_file_name(origin_taz: i64) -> String {
    format!("batch_{:03}.json", origin_taz.div_euclid(SHARD_SIZE))
}

/// Disk-backed lookup over the pre-partitioned batch trees. Shards are parsed
/// once and kept for the lifetime of the process, the trees are immutable
/// reference data.
pub struct BatchRepo {
    root: PathBuf,
    multipliers: Mutex<HashMap<PathBuf, Arc<Shard<f64>>>>,
    sources: Mutex<HashMap<PathBuf, Arc<Shard<String>>>>,
}

impl BatchRepo {
    pub fn new(conf: &Conf) -> BatchRepo {
        BatchRepo {
            root: conf.batches_dir(),
            multipliers: Mutex::new(HashMap::new()),
            sources: Mutex::new(HashMap::new()),
        }
    }

    pub fn multiplier(
        &self,
        model: TravelModel,
        origin_taz: i64,
        destination_taz: i64,
    ) -> Result<f64> {
        let path = self.shard_path(model, "multipliers", origin_taz);
        let shard = cached_shard(&self.multipliers, &path)?;
        lookup(&shard, origin_taz, destination_taz).copied()
    }

    pub fn source(
        &self,
        model: TravelModel,
        origin_taz: i64,
        destination_taz: i64,
    ) -> Result<String> {
        let path = self.shard_path(model, "sources", origin_taz);
        let shard = cached_shard(&self.sources, &path)?;
        lookup(&shard, origin_taz, destination_taz).cloned()
    }

    fn shard_path(&self, model: TravelModel, tree: &str, origin_taz: i64) -> PathBuf {
        self.root
            .join(model.to_string())
            .join(tree)
            .join(shard_file_name(origin_taz))
    }
}

fn cached_shard<V: DeserializeOwned>(
    cache: &Mutex<HashMap<PathBuf, Arc<Shard<V>>>>,
    path: &Path,
) -> Result<Arc<Shard<V>>> {
    let mut cache = cache.lock().unwrap_or_else(|it| it.into_inner());
    if let Some(shard) = cache.get(path) {
        return Ok(shard.clone());
    }
    let shard = Arc::new(read_shard(path)?);
    cache.insert(path.to_path_buf(), shard.clone());
    Ok(shard)
}

fn read_shard<V: DeserializeOwned>(path: &Path) -> Result<Shard<V>> {
    if !path.exists() {
        let file_name = path
            .file_name()
            .map(|it| it.to_string_lossy().into_owned())
            .unwrap_or_default();
        return Err(Error::NotFound(format!("Batch file {file_name} not found")));
    }
    Ok(serde_json::from_str(&read_to_string(path)?)?)
}

fn lookup<'a, V>(shard: &'a Shard<V>, origin_taz: i64, destination_taz: i64) -> Result<&'a V> {
    let row = shard.get(&origin_taz.to_string()).ok_or_else(|| {
        Error::NotFound(format!("Origin zone {origin_taz} not found in batch"))
    })?;
    row.get(&destination_taz.to_string()).ok_or_else(|| {
        Error::NotFound(format!(
            "Destination zone {destination_taz} not found for origin zone {origin_taz}",
        ))
    })
}

#[cfg(test)]
mod test {
    use super::{shard_file_name, BatchRepo};
    use crate::model::TravelModel;
    use crate::test::{mock_batch_pair, mock_conf};
    use crate::Result;

    #[test]
    fn shard_naming() {
        assert_eq!("batch_000.json", shard_file_name(0));
        assert_eq!("batch_000.json", shard_file_name(99));
        assert_eq!("batch_001.json", shard_file_name(100));
        assert_eq!("batch_003.json", shard_file_name(305));
        assert_eq!("batch_012.json", shard_file_name(1234));
    }

    #[test]
    fn multiplier_and_source_round_trip() -> Result<()> {
        let conf = mock_conf();
        mock_batch_pair(&conf, TravelModel::Passenger, 305, 410, 1.42, "2023 Model Update")?;
        let repo = BatchRepo::new(&conf);
        assert_eq!(1.42, repo.multiplier(TravelModel::Passenger, 305, 410)?);
        assert_eq!(
            "2023 Model Update",
            repo.source(TravelModel::Passenger, 305, 410)?,
        );
        Ok(())
    }

    #[test]
    fn missing_shard_file() {
        let conf = mock_conf();
        let repo = BatchRepo::new(&conf);
        let res = repo.multiplier(TravelModel::Passenger, 305, 410);
        assert_eq!(
            "Batch file batch_003.json not found",
            res.unwrap_err().to_string(),
        );
    }

    #[test]
    fn missing_origin_row() -> Result<()> {
        let conf = mock_conf();
        mock_batch_pair(&conf, TravelModel::Passenger, 305, 410, 1.42, "src")?;
        let repo = BatchRepo::new(&conf);
        // Zone 399 lands in the same shard as 305 but has no row there
        let res = repo.multiplier(TravelModel::Passenger, 399, 410);
        assert_eq!(
            "Origin zone 399 not found in batch",
            res.unwrap_err().to_string(),
        );
        Ok(())
    }

    #[test]
    fn missing_destination_entry() -> Result<()> {
        let conf = mock_conf();
        mock_batch_pair(&conf, TravelModel::Passenger, 305, 410, 1.42, "src")?;
        let repo = BatchRepo::new(&conf);
        let res = repo.multiplier(TravelModel::Passenger, 305, 411);
        assert_eq!(
            "Destination zone 411 not found for origin zone 305",
            res.unwrap_err().to_string(),
        );
        Ok(())
    }

    #[test]
    fn shards_are_cached_across_calls() -> Result<()> {
        let conf = mock_conf();
        mock_batch_pair(&conf, TravelModel::Passenger, 305, 410, 1.42, "src")?;
        let repo = BatchRepo::new(&conf);
        assert_eq!(1.42, repo.multiplier(TravelModel::Passenger, 305, 410)?);
        // The first read pinned the parsed shard, removing the tree is now
        // invisible to lookups
        std::fs::remove_dir_all(conf.batches_dir())?;
        assert_eq!(1.42, repo.multiplier(TravelModel::Passenger, 305, 410)?);
        Ok(())
    }

    #[test]
    fn models_have_separate_trees() -> Result<()> {
        let conf = mock_conf();
        mock_batch_pair(&conf, TravelModel::Passenger, 305, 410, 1.42, "src")?;
        let repo = BatchRepo::new(&conf);
        assert!(repo.multiplier(TravelModel::Freight, 305, 410).is_err());
        Ok(())
    }
}
