pub mod migration;
pub mod multiplier;
pub mod multiplier_source;

use crate::conf::Conf;
use crate::Result;
use deadpool_sqlite::{Config, Hook, Pool, Runtime};
use rusqlite::Connection;

pub fn pool(conf: &Conf) -> Result<Pool> {
    let pool_size = std::thread::available_parallelism()
        .map(|n| n.get() * 2)
        .unwrap_or(8);
    let pool = Config::new(conf.db_file_path())
        .builder(Runtime::Tokio1)?
        .max_size(pool_size)
        .post_create(Hook::Fn(Box::new(|conn, _| {
            let conn = conn.lock().unwrap();
            conn.pragma_update(None, "journal_mode", "WAL").unwrap();
            conn.pragma_update(None, "synchronous", "NORMAL").unwrap();
            Ok(())
        })))
        .build()?;
    Ok(pool)
}

pub fn open_connection(conf: &Conf) -> Result<Connection> {
    let conn = Connection::open(conf.db_file_path())?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    Ok(conn)
}
