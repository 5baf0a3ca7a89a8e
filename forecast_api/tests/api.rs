use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use forecast_api::{router, AppState};
use price_feed::{EiaClient, YahooClient};
use serde_json::Value;
use tower::ServiceExt;

const BOUNDARY: &str = "test-boundary-7d8f2a";

fn app(with_eia: bool) -> axum::Router {
    router(AppState {
        yahoo: YahooClient::new(),
        eia: with_eia.then(|| EiaClient::new("TESTKEY")),
    })
}

/// Thirty days of slowly climbing prices, enough for a clean backtest.
fn sample_csv() -> String {
    let mut csv = String::from("date,price\n");
    for day in 1..=30 {
        csv.push_str(&format!("2025-01-{:02},{:.2}\n", day, 100.0 + day as f64));
    }
    csv
}

fn multipart_body(filename: &str, csv: &str, method: Option<&str>) -> String {
    // Content type follows the filename, as a browser would send it
    let content_type = if filename.ends_with(".csv") {
        "text/csv"
    } else {
        "application/octet-stream"
    };

    let mut body = String::new();
    body.push_str(&format!("--{}\r\n", BOUNDARY));
    body.push_str(&format!(
        "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
        filename
    ));
    body.push_str(&format!("Content-Type: {}\r\n\r\n", content_type));
    body.push_str(csv);
    body.push_str("\r\n");
    if let Some(method) = method {
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        body.push_str("Content-Disposition: form-data; name=\"method\"\r\n\r\n");
        body.push_str(method);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));
    body
}

fn upload_request(uri: &str, filename: &str, csv: &str, method: Option<&str>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(filename, csv, method)))
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_upload_round_trip() {
    let response = app(false)
        .oneshot(upload_request("/api/upload", "prices.csv", &sample_csv(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;

    let best = json["best_method"].as_str().unwrap();
    assert!(["naive", "moving_average", "ewm"].contains(&best));
    assert!(json["mape"].as_f64().unwrap() >= 0.0);
    assert!(json["rmse"].as_f64().unwrap() >= 0.0);

    // Default horizon is 7, datelined from the day after the last row
    let series = json["series"].as_array().unwrap();
    assert_eq!(series.len(), 7);
    assert_eq!(series[0]["date"], "2025-01-31");
    assert_eq!(series[6]["date"], "2025-02-06");
}

#[tokio::test]
async fn test_upload_honors_horizon_and_method() {
    let response = app(false)
        .oneshot(upload_request(
            "/api/upload?horizon=3",
            "prices.csv",
            &sample_csv(),
            Some("ewm"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["best_method"], "ewm");
    assert_eq!(json["series"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_upload_unknown_method() {
    let response = app(false)
        .oneshot(upload_request(
            "/api/upload",
            "prices.csv",
            &sample_csv(),
            Some("arima"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["detail"].as_str().unwrap().contains("unknown method"));
}

#[tokio::test]
async fn test_upload_rejects_out_of_range_horizons() {
    for uri in ["/api/upload?horizon=0", "/api/upload?horizon=366"] {
        let response = app(false)
            .oneshot(upload_request(uri, "prices.csv", &sample_csv(), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert!(json["detail"].as_str().unwrap().contains("horizon"));
    }
}

#[tokio::test]
async fn test_upload_rejects_non_csv() {
    let response = app(false)
        .oneshot(upload_request("/api/upload", "prices.xlsx", "junk", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["detail"]
        .as_str()
        .unwrap()
        .contains("only CSV uploads"));
}

#[tokio::test]
async fn test_upload_rejects_short_series() {
    let csv = "date,price\n2025-01-01,100.0\n2025-01-02,101.0\n";

    let response = app(false)
        .oneshot(upload_request("/api/upload", "prices.csv", csv, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["detail"].as_str().unwrap().contains("at least 8"));
}

#[tokio::test]
async fn test_upload_requires_a_file_field() {
    let mut body = String::new();
    body.push_str(&format!("--{}\r\n", BOUNDARY));
    body.push_str("Content-Disposition: form-data; name=\"method\"\r\n\r\nnaive\r\n");
    body.push_str(&format!("--{}--\r\n", BOUNDARY));

    let request = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app(false).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["detail"].as_str().unwrap().contains("missing 'file'"));
}

#[tokio::test]
async fn test_upload_accepts_close_column() {
    let mut csv = String::from("date,close\n");
    for day in 1..=12 {
        csv.push_str(&format!("2025-03-{:02},{:.2}\n", day, 60.0 + day as f64));
    }

    let response = app(false)
        .oneshot(upload_request("/api/upload?horizon=2", "prices.csv", &csv, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["series"].as_array().unwrap().len(), 2);
    assert_eq!(json["series"][0]["date"], "2025-03-13");
}

#[tokio::test]
async fn test_online_unknown_source() {
    let response = app(false)
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/online?source=bloomberg")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["detail"].as_str().unwrap().contains("unknown source"));
}

#[tokio::test]
async fn test_online_eia_without_token() {
    let response = app(false)
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/online?source=eia")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["detail"].as_str().unwrap().contains("EIA API key"));
}

#[tokio::test]
async fn test_online_validates_horizon_before_fetching() {
    // An out-of-range horizon must fail fast, not reach the network
    let response = app(false)
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/online?source=yahoo&horizon=9999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["detail"].as_str().unwrap().contains("horizon"));
}

#[tokio::test]
async fn test_eia_status_reflects_configuration() {
    let response = app(true)
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/eia_status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["eia_key_present"], true);

    let response = app(false)
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/eia_status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = body_json(response).await;
    assert_eq!(json["eia_key_present"], false);
}

#[tokio::test]
async fn test_error_payloads_carry_a_detail_field() {
    let response = app(false)
        .oneshot(upload_request("/api/upload", "prices.txt", "junk", None))
        .await
        .unwrap();

    let json = body_json(response).await;
    assert!(json.get("detail").is_some());
    assert_eq!(json.as_object().unwrap().len(), 1);
}
