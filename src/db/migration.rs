use crate::Result;
use include_dir::include_dir;
use include_dir::Dir;
use rusqlite::Connection;
use tracing::info;
use tracing::warn;

static MIGRATIONS_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/migrations");

// Migrations are numbered 1.sql, 2.sql, .. and tracked via PRAGMA user_version
pub fn run(db: &mut Connection) -> Result<()> {
    let mut schema_ver: i16 =
        db.query_row("SELECT user_version FROM pragma_user_version", [], |row| {
            row.get(0)
        })?;

    loop {
        let next_ver = schema_ver + 1;
        let file_name = format!("{next_ver}.sql");
        let Some(file) = MIGRATIONS_DIR.get_file(&file_name) else {
            break;
        };
        let sql = file.contents_utf8().ok_or(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Can't read {file_name} in UTF-8"),
        ))?;
        warn!(next_ver, "Applying migration");
        let tx = db.transaction()?;
        tx.execute_batch(sql)?;
        tx.execute_batch(&format!("PRAGMA user_version={next_ver}"))?;
        tx.commit()?;
        schema_ver = next_ver;
    }

    info!(schema_ver, "Database schema is up to date");

    Ok(())
}
