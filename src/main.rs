pub use error::Error;
mod batch;
mod command;
mod conf;
mod db;
mod error;
mod model;
mod multiplier;
mod server;
mod zone;

use crate::conf::Conf;
use std::env;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[actix_web::main]
async fn main() -> Result<()> {
    init_logging();

    let conf = Conf::from_env()?;

    let mut db = db::open_connection(&conf)?;
    db::migration::run(&mut db)?;

    let args: Vec<String> = env::args().collect();

    let command = match args.get(1) {
        Some(some) => some,
        None => Err(Error::CLI("No actions passed".into()))?,
    };

    match command.as_str() {
        "server" => server::run(conf).await?,
        "db" => command::db::run(&args[2..], &conf, db)?,
        "import" => command::import::run(&args[2..], &conf, db)?,
        first_arg => Err(Error::CLI(format!("Unknown command: {first_arg}")))?,
    }

    Ok(())
}

fn init_logging() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    let filter = tracing_subscriber::EnvFilter::from_default_env();

    if cfg!(debug_assertions) {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    }
}
