use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;

use crate::catalog::persistence::{Persistence, PersistenceConfig};
use crate::catalog::service::{
    IngestOutcome, InventoryHooks, InventoryService, Notice, ServiceError,
};
use crate::catalog::store::{StoreError, BULK_VIEW_LIMIT};
use crate::cli::ServeArgs;
use crate::core::record::{InventoryRecord, ManualEntry};
use crate::core::types::RecordId;
use crate::utils::validation::{validate_upload, ValidationError};

/// Security configuration constants to prevent `DoS` attacks
pub const MAX_MULTIPART_FIELDS: usize = 10;
pub const MAX_FILE_FIELD_SIZE: usize = 16 * 1024 * 1024; // 16MB

/// Filename used for uploads that carry none
const DEFAULT_UPLOAD_NAME: &str = "upload.csv";

/// Shared application state
pub struct AppState {
    pub service: Mutex<InventoryService>,
}

impl AppState {
    #[must_use]
    pub fn new(service: InventoryService) -> Arc<Self> {
        Arc::new(Self {
            service: Mutex::new(service),
        })
    }
}

/// Enhanced error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    pub details: Option<String>,
}

#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    notices: Vec<Notice>,
}

#[derive(Serialize)]
struct RecordResponse {
    record: InventoryRecord,
    notices: Vec<Notice>,
}

#[derive(Deserialize)]
struct LocationUpdate {
    location: String,
}

#[derive(Deserialize)]
struct BulkLocationRequest {
    ids: Vec<RecordId>,
    location: String,
}

#[derive(Serialize)]
struct BulkLocationResponse {
    updated: usize,
    notices: Vec<Notice>,
}

#[derive(Deserialize)]
struct BulkQueryParams {
    /// Only offer records without a location
    #[serde(default)]
    unassigned: bool,
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Serialize)]
struct ImportResponse {
    imported: usize,
    files: Vec<IngestOutcome>,
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    // Log detailed error server-side for debugging (not exposed to client)
    if let Some(internal_msg) = internal_error {
        tracing::error!("Internal error ({}): {}", error_type, internal_msg);
    }

    ErrorResponse {
        error: user_message.to_string(),
        error_type: error_type.to_string(),
        details: None, // Never expose internal details to prevent information disclosure
    }
}

fn error_response(
    status: StatusCode,
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> Response {
    (
        status,
        Json(create_safe_error_response(
            error_type,
            user_message,
            internal_error,
        )),
    )
        .into_response()
}

/// Map a service failure to a status code and a safe body
fn service_error_response(err: &ServiceError) -> Response {
    match err {
        ServiceError::Store(StoreError::UnknownRecord(_)) => {
            error_response(StatusCode::NOT_FOUND, "not_found", "Item not found", None)
        }
        ServiceError::Store(StoreError::EmptyLocation) => error_response(
            StatusCode::BAD_REQUEST,
            "empty_location",
            "Please enter a location",
            None,
        ),
        ServiceError::Store(StoreError::EmptySelection) => error_response(
            StatusCode::BAD_REQUEST,
            "empty_selection",
            "No items selected",
            None,
        ),
        ServiceError::Store(StoreError::IncompleteEntry) => error_response(
            StatusCode::BAD_REQUEST,
            "incomplete_entry",
            "A part number or description is required",
            None,
        ),
        ServiceError::Store(StoreError::Validation(ValidationError::LocationTooLong)) => {
            error_response(
                StatusCode::BAD_REQUEST,
                "invalid_location",
                "Location exceeds maximum length limit",
                None,
            )
        }
        ServiceError::Store(StoreError::Validation(_)) => error_response(
            StatusCode::BAD_REQUEST,
            "invalid_input",
            "Request contains invalid input",
            None,
        ),
        ServiceError::Store(StoreError::ParseError(e)) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "serialization_error",
            "Failed to process inventory data",
            Some(&e.to_string()),
        ),
        ServiceError::Persist(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "storage_error",
            "Failed to access inventory storage",
            Some(&e.to_string()),
        ),
    }
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the tokio runtime cannot be created, the inventory
/// cannot be loaded, or the server fails to start.
pub fn run(args: ServeArgs, persistence: PersistenceConfig) -> anyhow::Result<()> {
    // Build tokio runtime
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args, persistence).await })
}

/// API routes without middleware.
///
/// [`create_router`] wraps these in the security layers; tests drive them
/// directly since rate limiting needs the peer address.
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/inventory",
            get(inventory_handler)
                .post(replace_inventory_handler)
                .delete(clear_inventory_handler),
        )
        .route("/api/inventory/items", post(add_item_handler))
        .route("/api/inventory/{id}/location", put(update_location_handler))
        .route("/api/inventory/bulk", get(bulk_candidates_handler))
        .route("/api/inventory/bulk-location", post(bulk_location_handler))
        .route("/api/search", get(search_handler))
        .route("/api/import", post(import_handler))
        .with_state(state)
}

/// Create the application router with all routes and middleware configured.
///
/// # Errors
///
/// Returns an error if the rate limiter configuration is rejected.
pub fn create_router(state: Arc<AppState>) -> anyhow::Result<Router> {
    // Configure IP-based rate limiting
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10) // 10 requests per second per IP
        .burst_size(50) // Allow bursts of 50 requests
        .finish()
        .ok_or_else(|| anyhow::anyhow!("invalid rate limit configuration"))?;

    // Build router with comprehensive security layers
    let app = api_routes(state).layer(
        ServiceBuilder::new()
            // Security headers for browser protection
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("x-content-type-options"),
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("x-frame-options"),
                HeaderValue::from_static("DENY"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("referrer-policy"),
                HeaderValue::from_static("strict-origin-when-cross-origin"),
            ))
            // IP-based rate limiting to prevent abuse
            .layer(GovernorLayer {
                config: Arc::new(governor_conf),
            })
            // Request timeout to prevent slow client attacks
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(30),
            ))
            // Limit concurrent requests to prevent DOS
            .layer(ConcurrencyLimitLayer::new(100))
            // Limit request body size (accommodate largest file + multipart overhead)
            .layer(DefaultBodyLimit::max(20 * 1024 * 1024)), // 20MB limit
    );

    Ok(app)
}

async fn run_server(args: ServeArgs, persistence: PersistenceConfig) -> anyhow::Result<()> {
    let (service, notices) = InventoryService::open(Persistence::new(persistence)).await?;
    for notice in &notices {
        tracing::warn!("{notice}");
    }
    tracing::info!("serving {} records", service.store().len());

    let app = create_router(AppState::new(service))?;

    let addr = format!("{}:{}", args.address, args.port);
    println!("Starting partscout server at http://{addr}");

    if args.open {
        let _ = open::that(format!("http://{addr}/api/inventory"));
    }

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn inventory_handler(State(state): State<Arc<AppState>>) -> Json<Vec<InventoryRecord>> {
    let service = state.service.lock().await;
    Json(service.store().records().to_vec())
}

async fn replace_inventory_handler(
    State(state): State<Arc<AppState>>,
    Json(records): Json<Vec<InventoryRecord>>,
) -> Response {
    let mut service = state.service.lock().await;
    let notices = service.replace_all(records).await;
    Json(StatusResponse {
        status: "success",
        notices,
    })
    .into_response()
}

async fn clear_inventory_handler(State(state): State<Arc<AppState>>) -> Response {
    let mut service = state.service.lock().await;
    let notices = service.clear().await;
    Json(StatusResponse {
        status: "success",
        notices,
    })
    .into_response()
}

async fn add_item_handler(
    State(state): State<Arc<AppState>>,
    Json(entry): Json<ManualEntry>,
) -> Response {
    let mut service = state.service.lock().await;
    match service.add_manual(entry).await {
        Ok((record, notices)) => {
            (StatusCode::CREATED, Json(RecordResponse { record, notices })).into_response()
        }
        Err(e) => service_error_response(&e),
    }
}

async fn update_location_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<LocationUpdate>,
) -> Response {
    let id = RecordId::new(id);
    let mut service = state.service.lock().await;
    if let Err(e) = service.on_location_edit(&id, &update.location).await {
        return service_error_response(&e);
    }
    match service.store().get(&id) {
        Some(record) => Json(record.clone()).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "not_found", "Item not found", None),
    }
}

async fn bulk_candidates_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BulkQueryParams>,
) -> Response {
    let service = state.service.lock().await;
    let view = service
        .store()
        .bulk_candidates(params.unassigned, BULK_VIEW_LIMIT);
    Json(view).into_response()
}

async fn bulk_location_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BulkLocationRequest>,
) -> Response {
    let mut service = state.service.lock().await;
    match service.bulk_location(&request.ids, &request.location).await {
        Ok((updated, notices)) => Json(BulkLocationResponse { updated, notices }).into_response(),
        Err(e) => service_error_response(&e),
    }
}

async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<serde_json::Value> {
    let service = state.service.lock().await;
    let results = service.on_search(&params.q);
    Json(serde_json::json!({
        "query": params.q.trim(),
        "count": results.len(),
        "results": results,
    }))
}

/// Import one or more CSV exports posted as `file` fields
async fn import_handler(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let mut uploads = Vec::new();
    let mut fields_received = 0usize;

    loop {
        // Check field count limit before processing
        if fields_received >= MAX_MULTIPART_FIELDS {
            return error_response(
                StatusCode::BAD_REQUEST,
                "field_limit_exceeded",
                "Too many form fields",
                None,
            );
        }

        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    "invalid_multipart",
                    "Malformed upload",
                    Some(&e.to_string()),
                );
            }
        };
        fields_received += 1;

        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().map(std::string::ToString::to_string);

        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    "invalid_multipart",
                    "Failed to read uploaded file",
                    Some(&e.to_string()),
                );
            }
        };

        // Validate field size before processing
        if bytes.len() > MAX_FILE_FIELD_SIZE {
            return error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                "file_too_large",
                "File size exceeds limit",
                None,
            );
        }

        match validate_upload(filename.as_deref(), &bytes) {
            Ok(validated) => {
                let name = validated.unwrap_or_else(|| DEFAULT_UPLOAD_NAME.to_string());
                let text = String::from_utf8_lossy(&bytes).into_owned();
                uploads.push((name, text));
            }
            Err(e) => return upload_error_response(&e),
        }
    }

    if uploads.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "no_file",
            "No file was uploaded",
            None,
        );
    }

    let mut service = state.service.lock().await;
    let mut files = Vec::with_capacity(uploads.len());
    for (name, text) in uploads {
        match service.on_ingest(&text, &name).await {
            Ok(outcome) => files.push(outcome),
            Err(e) => return service_error_response(&e),
        }
    }

    let imported = files.iter().map(|f| f.imported).sum();
    Json(ImportResponse { imported, files }).into_response()
}

fn upload_error_response(err: &ValidationError) -> Response {
    match err {
        ValidationError::FilenameTooLong => error_response(
            StatusCode::BAD_REQUEST,
            "filename_too_long",
            "Filename exceeds maximum length limit",
            Some("Filename validation failed due to length constraints"),
        ),
        ValidationError::InvalidFilename | ValidationError::EmptyFilename => error_response(
            StatusCode::BAD_REQUEST,
            "invalid_filename",
            "Filename contains invalid or dangerous characters",
            Some("Filename validation failed due to invalid characters"),
        ),
        ValidationError::InvalidFileContent => error_response(
            StatusCode::BAD_REQUEST,
            "invalid_content",
            "File content appears malformed or corrupted",
            None,
        ),
        ValidationError::LocationTooLong => error_response(
            StatusCode::BAD_REQUEST,
            "invalid_input",
            "Request contains invalid input",
            None,
        ),
    }
}
