use crate::Result;
use std::env;
use std::fs::create_dir_all;
use std::path::PathBuf;

pub struct Conf {
    pub data_dir: PathBuf,
    pub address: String,
}

impl Conf {
    pub fn from_env() -> Result<Conf> {
        let data_dir = match env::var("TAZ_API_DATA_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => {
                #[allow(deprecated)]
                std::env::home_dir()
                    .ok_or("Home directory does not exist")?
                    .join(".local/share/taz-api")
            }
        };
        if !data_dir.exists() {
            create_dir_all(&data_dir)?;
        }
        let address =
            env::var("TAZ_API_ADDRESS").unwrap_or_else(|_| "127.0.0.1:8000".to_string());
        Ok(Conf { data_dir, address })
    }

    pub fn db_file_path(&self) -> PathBuf {
        self.data_dir.join("taz-api.db")
    }

    pub fn zones_dir(&self) -> PathBuf {
        self.data_dir.join("zones")
    }

    pub fn batches_dir(&self) -> PathBuf {
        self.data_dir.join("batches")
    }
}
