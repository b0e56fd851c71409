use crate::batch::BatchRepo;
use crate::conf::Conf;
use crate::multiplier;
use crate::zone::ZoneRepo;
use crate::{db, error, Result};
use actix_web::dev::Service;
use actix_web::web::{scope, Data, QueryConfig};
use actix_web::{
    middleware::{Compress, NormalizePath},
    App, HttpServer,
};
use futures_util::future::FutureExt;
use time::OffsetDateTime;
use tracing::info;

pub async fn run(conf: Conf) -> Result<()> {
    // All the worker threads are sharing a single connection pool, and the
    // reference data is loaded once
    let pool = Data::new(db::pool(&conf)?);
    let zones = Data::new(ZoneRepo::load(&conf)?);
    let batches = Data::new(BatchRepo::new(&conf));

    info!(address = %conf.address, "Starting HTTP server");

    HttpServer::new(move || {
        App::new()
            .wrap_fn(|req, srv| {
                let req_query_string = req.query_string().to_string();
                let req_method = req.method().as_str().to_string();
                let req_path = req.path().to_string();
                let req_time = OffsetDateTime::now_utc();
                let req_ip = req
                    .connection_info()
                    .peer_addr()
                    .unwrap_or_default()
                    .to_string();
                srv.call(req).map(move |res| {
                    if let Ok(res) = res.as_ref() {
                        let res_status = res.status().as_u16();
                        let res_time_sec = (OffsetDateTime::now_utc() - req_time).as_seconds_f64();
                        info!(
                            req_query_string,
                            req_method,
                            req_path,
                            req_ip,
                            res_status,
                            res_time_sec,
                        );
                    }
                    res
                })
            })
            .wrap(NormalizePath::trim())
            .wrap(Compress::default())
            .app_data(pool.clone())
            .app_data(zones.clone())
            .app_data(batches.clone())
            .app_data(QueryConfig::default().error_handler(error::query_error_handler))
            .service(scope("v1").service(multiplier::v1::get))
    })
    .bind(conf.address.as_str())?
    .run()
    .await?;

    Ok(())
}
