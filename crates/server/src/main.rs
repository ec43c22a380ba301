use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use server_api::{list_papers, load_upload, store_upload, ApiContext, UploadedFile, MISSING_FORM_DATA};
use shared::{
    domain::Paper,
    error::{ApiError, ErrorCode},
    protocol::{
        UploadForm, ADMIN_ROUTE, HEALTHZ_ROUTE, PAPERS_ROUTE, UPLOAD_FILE_FIELD, UPLOAD_ROUTE,
    },
};
use storage::PaperArchive;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod pages;

use app_state::AppState;
use config::load_settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings();
    let archive = PaperArchive::new(&settings.upload_dir)
        .await
        .map_err(|error| {
            error!(
                upload_dir = %settings.upload_dir.display(),
                %error,
                "failed to prepare upload directory; verify permissions"
            );
            error
        })?;
    archive.health_check().await?;

    let state = AppState {
        api: ApiContext { archive },
    };
    let app = build_router(Arc::new(state), settings.max_upload_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, upload_dir = %settings.upload_dir.display(), "archive server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route(HEALTHZ_ROUTE, get(healthz))
        .route(PAPERS_ROUTE, get(http_list_papers))
        .route("/uploads/*filename", get(download_upload))
        .route(ADMIN_ROUTE, get(admin_form))
        .route(
            UPLOAD_ROUTE,
            post(upload_paper)
                .layer::<_, std::convert::Infallible>(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(max_upload_bytes)),
        )
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> Result<&'static str, StatusCode> {
    state.api.archive.health_check().await.map_err(|error| {
        error!(%error, "archive health check failed");
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    Ok("ok")
}

async fn http_list_papers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Paper>>, (StatusCode, Json<ApiError>)> {
    let papers = list_papers(&state.api).await.map_err(json_error)?;
    Ok(Json(papers))
}

async fn download_upload(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<ApiError>)> {
    let bytes = load_upload(&state.api, &filename)
        .await
        .map_err(json_error)?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    if let Ok(value) = HeaderValue::from_str(&format!("inline; filename=\"{filename}\"")) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    Ok((StatusCode::OK, headers, bytes))
}

async fn admin_form() -> Html<String> {
    Html(pages::upload_form())
}

/// Accepts the admin form. Browsers get HTML pages back; clients sending
/// `Accept: application/json` get an `UploadReceipt` or `ApiError`.
async fn upload_paper(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let wants_json = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));

    let result = match read_upload(multipart).await {
        Ok((form, file)) => store_upload(&state.api, &form, file.as_ref()).await,
        Err(err) => Err(err),
    };

    match (result, wants_json) {
        (Ok(receipt), true) => Json(receipt).into_response(),
        (Ok(receipt), false) => Html(pages::upload_succeeded(&receipt)).into_response(),
        (Err(err), true) => json_error(err).into_response(),
        (Err(err), false) => {
            (status_for(err.code), Html(pages::upload_failed(&err.message))).into_response()
        }
    }
}

async fn read_upload(
    mut multipart: Multipart,
) -> Result<(UploadForm, Option<UploadedFile>), ApiError> {
    let mut form = UploadForm::default();
    let mut seen = Vec::new();
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name == UPLOAD_FILE_FIELD {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(malformed)?;
            file = Some(UploadedFile {
                filename,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field.text().await.map_err(malformed)?;
        if form.set_field(&name, value) {
            seen.push(name);
        } else {
            warn!(field = %name, "ignoring unknown upload field");
        }
    }

    let complete = shared::protocol::UPLOAD_TEXT_FIELDS
        .iter()
        .all(|required| seen.iter().any(|name| name == required));
    if !complete {
        return Err(ApiError::validation(MISSING_FORM_DATA));
    }
    Ok((form, file))
}

fn malformed(err: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::validation(format!("malformed upload: {err}"))
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn json_error(err: ApiError) -> (StatusCode, Json<ApiError>) {
    (status_for(err.code), Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
