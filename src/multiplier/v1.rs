use super::service::{self, Provenance, ResolvedMultiplier};
use crate::batch::BatchRepo;
use crate::model::TravelModel;
use crate::zone::{GeoPoint, ZoneRepo};
use crate::Error;
use actix_web::get;
use actix_web::web::Data;
use actix_web::web::Json;
use actix_web::web::Path;
use actix_web::web::Query;
use deadpool_sqlite::Pool;
use serde::Deserialize;
use serde::Serialize;
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetArgs {
    origin_lat: f64,
    origin_lng: f64,
    destination_lat: f64,
    destination_lng: f64,
}

#[derive(Serialize, Deserialize, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GetItem {
    pub origin_taz: i64,
    pub destination_taz: i64,
    pub multiplier: f64,
    pub source_multiplier: String,
    pub source: Provenance,
}

impl From<ResolvedMultiplier> for GetItem {
    fn from(val: ResolvedMultiplier) -> Self {
        GetItem {
            origin_taz: val.origin_taz,
            destination_taz: val.destination_taz,
            multiplier: val.multiplier,
            source_multiplier: val.source,
            source: val.provenance,
        }
    }
}

impl From<ResolvedMultiplier> for Json<GetItem> {
    fn from(val: ResolvedMultiplier) -> Self {
        Json(val.into())
    }
}

#[get("{model}/multiplier")]
pub async fn get(
    model: Path<String>,
    args: Query<GetArgs>,
    zones: Data<ZoneRepo>,
    batches: Data<BatchRepo>,
    pool: Data<Pool>,
) -> Result<Json<GetItem>, Error> {
    let model = TravelModel::from_str(&model)
        .map_err(|_| Error::NotFound(format!("Unknown travel model {}", model.as_str())))?;
    service::resolve(
        model,
        GeoPoint::new(args.origin_lat, args.origin_lng),
        GeoPoint::new(args.destination_lat, args.destination_lng),
        &zones,
        &batches,
        &pool,
    )
    .await
    .map(Into::into)
}

#[cfg(test)]
mod test {
    use crate::error::{self, ApiError};
    use crate::model::TravelModel;
    use crate::multiplier::service::Provenance;
    use crate::test::{mock_batch_pair, mock_puget_dataset, mock_state, State};
    use crate::{db, Result};
    use actix_web::dev::ServiceResponse;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use actix_web::web::{scope, Data, QueryConfig};
    use actix_web::{test, App};

    const QUERY: &str =
        "originLat=47.6062&originLng=-122.3321&destinationLat=47.2529&destinationLng=-122.4443";

    async fn call(state: State, uri: &str) -> ServiceResponse {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(state.pool))
                .app_data(Data::new(state.zones))
                .app_data(Data::new(state.batches))
                .app_data(QueryConfig::default().error_handler(error::query_error_handler))
                .service(scope("").service(super::get)),
        )
        .await;
        let req = TestRequest::get().uri(uri).to_request();
        test::call_service(&app, req).await
    }

    #[test]
    async fn get_from_primary() -> Result<()> {
        let state = mock_state(vec![mock_puget_dataset(TravelModel::Passenger)]);
        db::multiplier::queries_async::upsert(TravelModel::Passenger, 305, 410, 1.42, &state.pool)
            .await?;
        db::multiplier_source::queries_async::upsert(
            TravelModel::Passenger,
            305,
            410,
            "2023 Model Update".into(),
            &state.pool,
        )
        .await?;
        let res = call(state, &format!("/passenger/multiplier?{QUERY}")).await;
        assert_eq!(StatusCode::OK, res.status());
        let body: super::GetItem = test::read_body_json(res).await;
        assert_eq!(
            super::GetItem {
                origin_taz: 305,
                destination_taz: 410,
                multiplier: 1.42,
                source_multiplier: "2023 Model Update".into(),
                source: Provenance::Primary,
            },
            body,
        );
        Ok(())
    }

    #[test]
    async fn get_from_fallback() -> Result<()> {
        let state = mock_state(vec![mock_puget_dataset(TravelModel::Passenger)]);
        mock_batch_pair(
            &state.conf,
            TravelModel::Passenger,
            305,
            410,
            1.37,
            "2019 Baseline",
        )?;
        let res = call(state, &format!("/passenger/multiplier?{QUERY}")).await;
        assert_eq!(StatusCode::OK, res.status());
        let body: super::GetItem = test::read_body_json(res).await;
        assert_eq!(Provenance::Fallback, body.source);
        assert_eq!(1.37, body.multiplier);
        assert_eq!("2019 Baseline", body.source_multiplier);
        Ok(())
    }

    #[test]
    async fn get_malformed_coordinate() -> Result<()> {
        let state = mock_state(vec![mock_puget_dataset(TravelModel::Passenger)]);
        let res = call(
            state,
            "/passenger/multiplier?originLat=abc&originLng=-122.3321&destinationLat=47.2529&destinationLng=-122.4443",
        )
        .await;
        assert_eq!(StatusCode::BAD_REQUEST, res.status());
        let body: ApiError = test::read_body_json(res).await;
        assert_eq!("Invalid coordinates", body.error);
        Ok(())
    }

    #[test]
    async fn get_missing_coordinate() -> Result<()> {
        let state = mock_state(vec![mock_puget_dataset(TravelModel::Passenger)]);
        let res = call(state, "/passenger/multiplier?originLat=47.6062").await;
        assert_eq!(StatusCode::BAD_REQUEST, res.status());
        Ok(())
    }

    #[test]
    async fn get_unknown_model() -> Result<()> {
        let state = mock_state(vec![mock_puget_dataset(TravelModel::Passenger)]);
        let res = call(state, &format!("/transit/multiplier?{QUERY}")).await;
        assert_eq!(StatusCode::NOT_FOUND, res.status());
        Ok(())
    }

    #[test]
    async fn get_point_outside_every_zone() -> Result<()> {
        let state = mock_state(vec![mock_puget_dataset(TravelModel::Passenger)]);
        let res = call(
            state,
            "/passenger/multiplier?originLat=0&originLng=0&destinationLat=47.2529&destinationLng=-122.4443",
        )
        .await;
        assert_eq!(StatusCode::NOT_FOUND, res.status());
        let body: ApiError = test::read_body_json(res).await;
        assert_eq!("No zone contains the origin point", body.error);
        Ok(())
    }

    #[test]
    async fn get_missing_batch_and_store_rows() -> Result<()> {
        let state = mock_state(vec![mock_puget_dataset(TravelModel::Passenger)]);
        let res = call(state, &format!("/passenger/multiplier?{QUERY}")).await;
        assert_eq!(StatusCode::NOT_FOUND, res.status());
        let body: ApiError = test::read_body_json(res).await;
        assert_eq!("Batch file batch_003.json not found", body.error);
        Ok(())
    }
}
