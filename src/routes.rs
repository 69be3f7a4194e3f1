//! HTTP routes.
//!
//! - `GET /get_rates/{fdate}` fetches the feed for `fdate` and stores it.
//! - `GET /currency/{date}` and `GET /currency/{date}/{code}` return stored
//!   rates as a JSON array.
//!
//! Errors are rendered as `{"message": ...}` by [`Error`]'s `ResponseError`
//! implementation.

use std::sync::Arc;

use actix_web::{HttpResponse, http::header::ContentType, web};
use log::error;

use crate::error::{Error, Result};
use crate::feed::RateSource;
use crate::persist::BatchPersister;
use crate::query::QueryService;
use crate::store::RateStore;

pub const ACCEPTED: &str = "Request accepted. Data will be processed asynchronously.\n";

/// Shared handler state. Every component holds the same store handle.
#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<dyn RateSource>,
    pub persister: BatchPersister,
    pub queries: QueryService,
}

impl AppState {
    pub fn new(feed: Arc<dyn RateSource>, store: Arc<dyn RateStore>) -> Self {
        Self {
            feed,
            persister: BatchPersister::new(Arc::clone(&store)),
            queries: QueryService::new(store),
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/get_rates/{fdate}", web::get().to(get_rates))
        .route("/get_rates", web::get().to(missing_fdate))
        .route("/get_rates/", web::get().to(missing_fdate))
        .route("/currency/{date}/{code}", web::get().to(get_currencies_by_code))
        .route("/currency/{date}", web::get().to(get_currencies))
        .route("/currency", web::get().to(missing_date))
        .route("/currency/", web::get().to(missing_date));
}

async fn get_rates(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let fdate = required(path.into_inner(), "fdate")?;

    let batch = state.feed.fetch(&fdate).await.inspect_err(|err| {
        error!("Error fetching rates for {}: {}", fdate, err);
    })?;
    state.persister.persist(batch).await.inspect_err(|err| {
        error!("Error saving rates for {}: {}", fdate, err);
    })?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(ACCEPTED))
}

async fn get_currencies(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let date = required(path.into_inner(), "date")?;
    respond_with_rates(&state, &date, None).await
}

async fn get_currencies_by_code(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (date, code) = path.into_inner();
    let date = required(date, "date")?;
    let code = code.trim();
    let code = (!code.is_empty()).then_some(code);

    respond_with_rates(&state, &date, code).await
}

async fn respond_with_rates(state: &AppState, date: &str, code: Option<&str>) -> Result<HttpResponse> {
    let records = state.queries.query(date, code).await?;
    Ok(HttpResponse::Ok().json(records))
}

async fn missing_fdate() -> Result<HttpResponse> {
    Err(Error::Validation("fdate"))
}

async fn missing_date() -> Result<HttpResponse> {
    Err(Error::Validation("date"))
}

fn required(value: String, name: &'static str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(Error::Validation(name));
    }
    Ok(value)
}
