use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;

fn score_request(payload: serde_json::Value) -> Request<Body> {
    Request::post("/api/v1/risk/score")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn form_payload() -> serde_json::Value {
    json!({
        "dependents": 2,
        "education": "Graduate",
        "self_employed": "No",
        "annual_income": 500000,
        "loan_amount": 200000,
        "loan_term_months": 120,
        "cibil_score": 750,
        "residential_assets_value": 100000,
        "commercial_assets_value": 50000,
        "luxury_assets_value": 80000,
        "bank_asset_value": 60000
    })
}

#[tokio::test]
async fn score_route_returns_verdict_and_ratios() {
    let response = router_with(0.7)
        .oneshot(score_request(form_payload()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["outcome"], "high_risk");
    assert_eq!(body["probability"], 0.7);
    assert_eq!(body["displayed_probability"], 0.7);
    assert_eq!(body["loan_to_income_ratio"], 0.4);
    assert!(body["html"]
        .as_str()
        .expect("html string")
        .contains("Rejection Probability: 0.70"));
}

#[tokio::test]
async fn score_route_returns_warnings_as_verdicts() {
    let mut payload = form_payload();
    payload["loan_amount"] = serde_json::Value::Null;

    let response = router_with(0.7)
        .oneshot(score_request(payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["outcome"], "warning");
    assert_eq!(body["message"], "Please enter a valid Loan Amount");
    assert!(body["probability"].is_null());
}

#[tokio::test]
async fn score_route_accepts_not_graduate_label() {
    let mut payload = form_payload();
    payload["education"] = json!("Not Graduate");
    payload["self_employed"] = json!("Yes");

    let response = router_with(0.1)
        .oneshot(score_request(payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["outcome"], "low_risk");
}

#[tokio::test]
async fn score_route_rejects_missing_features() {
    let mut payload = form_payload();
    payload
        .as_object_mut()
        .expect("object payload")
        .remove("luxury_assets_value");

    let response = router_with(0.1)
        .oneshot(score_request(payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error string")
        .contains("luxury_assets_value"));
}

#[tokio::test]
async fn root_serves_the_form() {
    let response = router_with(0.1)
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .expect("content type")
        .to_str()
        .expect("ascii header");
    assert!(content_type.starts_with("text/html"));
}

#[tokio::test]
async fn score_route_treats_null_dropdowns_as_blank_choices() {
    let mut payload = form_payload();
    payload["education"] = serde_json::Value::Null;
    payload["self_employed"] = serde_json::Value::Null;

    let response = router_with(0.7)
        .oneshot(score_request(payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["outcome"], "high_risk");
}

#[tokio::test]
async fn blank_form_fields_still_report_the_loan_amount_warning() {
    let payload = json!({
        "dependents": null,
        "education": null,
        "self_employed": null,
        "annual_income": 500000,
        "loan_amount": null,
        "loan_term_months": null,
        "cibil_score": null,
        "residential_assets_value": null,
        "commercial_assets_value": null,
        "luxury_assets_value": null,
        "bank_asset_value": null
    });

    let response = router_with(0.7)
        .oneshot(score_request(payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["outcome"], "warning");
    assert_eq!(body["message"], "Please enter a valid Loan Amount");
    assert!(body["html"]
        .as_str()
        .expect("html string")
        .contains("class='warn'"));
}

#[tokio::test]
async fn scoring_faults_are_reported_as_json() {
    let mut payload = form_payload();
    payload["cibil_score"] = serde_json::Value::Null;

    let response = router_with(0.7)
        .oneshot(score_request(payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .expect("content type")
        .to_str()
        .expect("ascii header")
        .to_string();
    assert!(content_type.starts_with("application/json"));
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error string")
        .starts_with("scoring error:"));
}
