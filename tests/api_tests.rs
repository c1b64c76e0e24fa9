//! HTTP API tests driven through the router without a socket.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use partscout::catalog::persistence::Persistence;
use partscout::web::server::{api_routes, AppState};
use partscout::{InventoryService, InventoryStore};

const LCSC_CSV: &str = "LCSC Part Number,Manufacture Part Number,Manufacturer,Description,Order Qty.\r\n\
C25804,0603WAF1002T5E,UNI-ROYAL,10k resistor 0603,100\r\n\
C1525,CL05B104KO5NNNC,Samsung,100nF capacitor 0402,50\r\n";

const BOUNDARY: &str = "partscout-test-boundary";

fn test_app(dir: &TempDir) -> Router {
    let service = InventoryService::new(
        InventoryStore::new(),
        Persistence::local(dir.path().join("db.json")),
    );
    api_routes(AppState::new(service))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn upload(files: &[(&str, &str)]) -> Request<Body> {
    let mut body = String::new();
    for (name, content) in files {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\nContent-Type: text/csv\r\n\r\n{content}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    Request::builder()
        .method(Method::POST)
        .uri("/api/import")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn app_with_lcsc_import(dir: &TempDir) -> Router {
    let app = test_app(dir);
    let (status, _) = send(&app, upload(&[("LCSC_Exported__20240305101112.csv", LCSC_CSV)])).await;
    assert_eq!(status, StatusCode::OK);
    app
}

#[tokio::test]
async fn test_import_then_list() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(&app, upload(&[("LCSC_Exported__20240305101112.csv", LCSC_CSV)])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["imported"], 2);
    assert_eq!(body["files"][0]["source"], "LCSC");
    assert_eq!(body["files"][0]["notices"][0]["message"], "Imported 2 items (LCSC)");

    let (status, body) = send(&app, get("/api/inventory")).await;
    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["partNumber"], "C25804");
    assert_eq!(records[0]["orderDate"], "2024-03-05");
    assert_eq!(records[0]["tags"][0], "Resistor");

    assert!(dir.path().join("db.json").exists());
}

#[tokio::test]
async fn test_import_unrecognized_file() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(&app, upload(&[("notes.txt", "nothing useful here")])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["imported"], 0);
    assert_eq!(body["files"][0]["notices"][0]["level"], "warning");
    assert_eq!(
        body["files"][0]["notices"][0]["message"],
        "Could not recognize data in notes.txt"
    );
}

#[tokio::test]
async fn test_import_multiple_files() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);
    let digikey = "Digi-Key Part Number,Quantity,Description\n296-1395-5-ND,10,IC OSC TIMER\n";

    let (status, body) = send(
        &app,
        upload(&[("lcsc.csv", LCSC_CSV), ("digikey.csv", digikey)]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["imported"], 3);
    assert_eq!(body["files"][1]["source"], "DigiKey");
}

#[tokio::test]
async fn test_import_requires_a_file() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"comment\"\r\n\r\nhello\r\n--{BOUNDARY}--\r\n"
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/import")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "no_file");
}

#[tokio::test]
async fn test_search() {
    let dir = TempDir::new().unwrap();
    let app = app_with_lcsc_import(&dir).await;

    let (status, body) = send(&app, get("/api/search?q=100nf")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["partNumber"], "C1525");

    // Unit equivalent of the 10k resistor
    let (_, body) = send(&app, get("/api/search?q=10000ohm")).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["partNumber"], "C25804");

    // Blank query returns a sample of everything
    let (_, body) = send(&app, get("/api/search?q=")).await;
    assert_eq!(body["count"], 2);
    let (_, body) = send(&app, get("/api/search")).await;
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn test_replace_then_get_round_trips() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let records = json!([
        {
            "id": "a1",
            "partNumber": "C1",
            "mfrPart": "M1",
            "manufacturer": "Acme",
            "description": "thing",
            "quantity": "5",
            "orderDate": "2024-01-02",
            "source": "LCSC",
            "tags": ["Capacitor"],
            "link": "",
            "location": "Bin 1"
        },
        {
            "id": "b2",
            "partNumber": "C2",
            "mfrPart": "",
            "manufacturer": "",
            "description": "",
            "quantity": "",
            "source": "Mouser",
            "tags": [],
            "link": "",
            "location": ""
        }
    ]);

    let (status, body) = send(&app, json_request(Method::POST, "/api/inventory", &records)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let (_, body) = send(&app, get("/api/inventory")).await;
    assert_eq!(body, records);
}

#[tokio::test]
async fn test_replace_assigns_missing_ids() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let records = json!([{ "partNumber": "X" }, { "partNumber": "Y", "id": "" }]);
    send(&app, json_request(Method::POST, "/api/inventory", &records)).await;

    let (_, body) = send(&app, get("/api/inventory")).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.iter().all(|id| !id.is_empty()));
    assert_ne!(ids[0], ids[1]);
}

#[tokio::test]
async fn test_replace_rejects_malformed_json() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/inventory")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_update_location() {
    let dir = TempDir::new().unwrap();
    let app = app_with_lcsc_import(&dir).await;

    let (_, body) = send(&app, get("/api/inventory")).await;
    let id = body[0]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        json_request(
            Method::PUT,
            &format!("/api/inventory/{id}/location"),
            &json!({ "location": "  Drawer A3 " }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"], "Drawer A3");

    let (status, body) = send(
        &app,
        json_request(
            Method::PUT,
            "/api/inventory/does-not-exist/location",
            &json!({ "location": "x" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_type"], "not_found");
    assert!(body["details"].is_null());
}

#[tokio::test]
async fn test_bulk_location_flow() {
    let dir = TempDir::new().unwrap();
    let app = app_with_lcsc_import(&dir).await;

    let (status, body) = send(&app, get("/api/inventory/bulk?unassigned=true")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hidden"], 0);
    let ids: Vec<Value> = body["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].clone())
        .collect();
    assert_eq!(ids.len(), 2);

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/inventory/bulk-location",
            &json!({ "ids": ids, "location": "Box 7" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 2);
    assert_eq!(body["notices"][0]["message"], "Updated location for 2 items.");

    let (_, body) = send(&app, get("/api/inventory/bulk?unassigned=true")).await;
    assert!(body["records"].as_array().unwrap().is_empty());

    let (_, body) = send(&app, get("/api/inventory/bulk")).await;
    assert_eq!(body["records"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_bulk_location_rejects_empty_input() {
    let dir = TempDir::new().unwrap();
    let app = app_with_lcsc_import(&dir).await;
    let (_, body) = send(&app, get("/api/inventory")).await;
    let id = body[0]["id"].clone();

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/inventory/bulk-location",
            &json!({ "ids": [id], "location": "   " }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "empty_location");

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/inventory/bulk-location",
            &json!({ "ids": [], "location": "Box" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "empty_selection");
}

#[tokio::test]
async fn test_add_item() {
    let dir = TempDir::new().unwrap();
    let app = app_with_lcsc_import(&dir).await;

    let entry = json!({
        "partNumber": "1N4148",
        "manufacturer": "onsemi",
        "description": "small signal diode",
        "quantity": "100 pcs",
        "location": "Diodes",
        "source": "Mouser"
    });
    let (status, body) = send(&app, json_request(Method::POST, "/api/inventory/items", &entry)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["record"]["mfrPart"], "1N4148");
    assert_eq!(body["record"]["quantity"], "100");
    assert_eq!(body["record"]["source"], "Mouser");
    assert_eq!(body["record"]["tags"][0], "Diode");
    assert_eq!(body["notices"][0]["message"], "Item Added Successfully");

    let (_, body) = send(&app, get("/api/inventory")).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert_eq!(body[0]["partNumber"], "1N4148");

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/inventory/items",
            &json!({ "manufacturer": "onsemi" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "incomplete_entry");
}

#[tokio::test]
async fn test_clear() {
    let dir = TempDir::new().unwrap();
    let app = app_with_lcsc_import(&dir).await;

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/inventory")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notices"][0]["message"], "All data cleared.");

    let (_, body) = send(&app, get("/api/inventory")).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_import_survives_unwritable_cache() {
    let dir = TempDir::new().unwrap();
    // The cache path is a directory, so saving fails
    let service = InventoryService::new(InventoryStore::new(), Persistence::local(dir.path()));
    let app = api_routes(AppState::new(service));

    let (status, body) = send(&app, upload(&[("lcsc.csv", LCSC_CSV)])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["imported"], 2);
    assert_eq!(body["files"][0]["notices"][1]["level"], "warning");

    let (_, body) = send(&app, get("/api/inventory")).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}
