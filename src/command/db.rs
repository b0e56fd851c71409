use crate::conf::Conf;
use crate::{Error, Result};
use rusqlite::Connection;
use std::fs::remove_file;
use tracing::info;

pub fn run(args: &[String], conf: &Conf, conn: Connection) -> Result<()> {
    let first_arg = match args.first() {
        Some(some) => some,
        None => Err(Error::CLI("No db actions passed".into()))?,
    };

    match first_arg.as_str() {
        // Migrations already ran on startup
        "migrate" => {}
        "drop" => drop_db(conf, conn)?,
        _ => Err(Error::CLI(format!("Unknown command: {first_arg}")))?,
    }

    Ok(())
}

fn drop_db(conf: &Conf, conn: Connection) -> Result<()> {
    drop(conn);
    remove_file(conf.db_file_path())?;
    info!("Database file was removed");
    Ok(())
}
