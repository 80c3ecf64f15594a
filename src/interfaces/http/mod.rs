pub mod error;
pub mod multipart;

use crate::application::{CaptionUseCase, PlaceInfoUseCase};
use crate::domain::caption::{CaptionResponse, CaptionStyle};
use crate::domain::error::AppError;
use crate::domain::place::PlaceQuery;
use crate::infrastructure::config::AppConfig;
use actix_cors::Cors;
use actix_multipart::Multipart;
use actix_web::{dev::Server, get, post, web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use serde::Serialize;
use std::sync::Arc;

pub const API_KEY_HEADER: &str = "x-api-key";
const JSON_BODY_LIMIT: usize = 1024 * 1024;

pub struct HttpState {
    pub config: Arc<AppConfig>,
    pub caption_use_case: Arc<CaptionUseCase>,
    pub place_info_use_case: Arc<PlaceInfoUseCase>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

/// The caller's own model credential, forwarded as-is.
fn caller_api_key(req: &HttpRequest) -> Result<String, AppError> {
    req.headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::Unauthorized("Please provide a valid API key".to_string()))
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[get("/styles")]
async fn list_styles() -> impl Responder {
    let styles: Vec<_> = CaptionStyle::ALL.iter().map(|style| style.profile()).collect();
    HttpResponse::Ok().json(styles)
}

#[post("/caption")]
async fn caption(
    data: web::Data<HttpState>,
    req: HttpRequest,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let api_key = caller_api_key(&req)?;
    let (request, image) =
        multipart::read_caption_form(payload, data.config.max_upload_bytes).await?;
    image.validate(data.config.max_upload_bytes)?;

    let llm_config = data.config.llm_config(&api_key);

    match data
        .caption_use_case
        .execute(&llm_config, request, image.into_image_input())
        .await
    {
        Ok(captions) => Ok(HttpResponse::Ok().json(CaptionResponse { captions })),
        Err(e) => {
            tracing::error!(error = %e, "Caption generation failed");
            Err(e)
        }
    }
}

#[post("/place-info")]
async fn place_info(
    data: web::Data<HttpState>,
    req: HttpRequest,
    query: web::Json<PlaceQuery>,
) -> Result<HttpResponse, AppError> {
    let api_key = caller_api_key(&req)?;
    let llm_config = data.config.llm_config(&api_key);

    tracing::info!(place = %query.name, "Looking up place info");

    match data
        .place_info_use_case
        .execute(&llm_config, query.into_inner())
        .await
    {
        Ok(info) => Ok(HttpResponse::Ok().json(info)),
        Err(e) => {
            tracing::error!(error = %e, "Place info lookup failed");
            Err(e)
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into());

    cfg.app_data(json_config).service(health).service(
        web::scope("/api")
            .service(list_styles)
            .service(caption)
            .service(place_info),
    );
}

pub fn start_server(state: HttpState, host: &str, port: u16) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((host, port))?
    .run();

    Ok(server)
}
