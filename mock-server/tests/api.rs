use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, Problem, Property, Version, VersionLink, VersionsEnvelope, ACTIVE};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header("PAPI-Use-Prefixes", "true")
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header("PAPI-Use-Prefixes", "true")
        .body(body.to_string())
        .unwrap()
}

/// prp_1 with versions 1..=3; 2 active on production, 3 active on staging.
fn property() -> Property {
    let mut property = Property::new("prp_1", "ctr_1", "grp_1");
    let mut v2 = Version::new(2, "prod");
    v2.production_status = ACTIVE.to_string();
    let mut v3 = Version::new(3, "staging");
    v3.staging_status = ACTIVE.to_string();
    property.versions.push(v2);
    property.versions.push(v3);
    property
}

// --- list ---

#[tokio::test]
async fn list_versions_newest_first() {
    let resp = app_with(vec![property()])
        .oneshot(get_request("/papi/v1/properties/prp_1/versions?contractId=ctr_1&groupId=grp_1"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let env: VersionsEnvelope = body_json(resp).await;
    assert_eq!(env.property_id, "prp_1");
    let numbers: Vec<u32> = env.versions.items.iter().map(|v| v.property_version).collect();
    assert_eq!(numbers, vec![3, 2, 1]);
}

#[tokio::test]
async fn list_versions_paginates() {
    let resp = app_with(vec![property()])
        .oneshot(get_request(
            "/papi/v1/properties/prp_1/versions?contractId=ctr_1&groupId=grp_1&limit=1&offset=1",
        ))
        .await
        .unwrap();

    let env: VersionsEnvelope = body_json(resp).await;
    assert_eq!(env.versions.items.len(), 1);
    assert_eq!(env.versions.items[0].property_version, 2);
}

#[tokio::test]
async fn list_versions_unknown_property_is_problem() {
    let resp = app()
        .oneshot(get_request("/papi/v1/properties/prp_404/versions?contractId=&groupId="))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        resp.headers().get(http::header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
    let problem: Problem = body_json(resp).await;
    assert_eq!(problem.status, 404);
}

#[tokio::test]
async fn wrong_contract_is_forbidden() {
    let resp = app_with(vec![property()])
        .oneshot(get_request("/papi/v1/properties/prp_1/versions?contractId=ctr_2&groupId=grp_1"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn prefixes_are_stripped_when_disabled() {
    let resp = app_with(vec![property()])
        .oneshot(
            Request::builder()
                .uri("/papi/v1/properties/1/versions?contractId=1&groupId=1")
                .header("PAPI-Use-Prefixes", "false")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let env: VersionsEnvelope = body_json(resp).await;
    assert_eq!(env.property_id, "1");
    assert_eq!(env.group_id, "1");
}

// --- latest ---

#[tokio::test]
async fn latest_overall_and_per_network() {
    let app = app_with(vec![property()]);
    let cases = [
        ("", 3),
        ("&activatedOn=PRODUCTION", 2),
        ("&activatedOn=STAGING", 3),
    ];
    for (extra, expected) in cases {
        let uri = format!("/papi/v1/properties/prp_1/versions/latest?contractId=ctr_1&groupId=grp_1{extra}");
        let resp = app.clone().oneshot(get_request(&uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        let env: VersionsEnvelope = body_json(resp).await;
        assert_eq!(env.versions.items[0].property_version, expected, "{uri}");
    }
}

#[tokio::test]
async fn latest_without_activation_is_not_found() {
    let resp = app_with(vec![Property::new("prp_2", "ctr_1", "grp_1")])
        .oneshot(get_request(
            "/papi/v1/properties/prp_2/versions/latest?contractId=ctr_1&groupId=grp_1&activatedOn=PRODUCTION",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn latest_rejects_unknown_network() {
    let resp = app_with(vec![property()])
        .oneshot(get_request(
            "/papi/v1/properties/prp_1/versions/latest?contractId=ctr_1&groupId=grp_1&activatedOn=QA",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- get ---

#[tokio::test]
async fn get_version_found_and_missing() {
    let app = app_with(vec![property()]);
    let resp = app
        .clone()
        .oneshot(get_request("/papi/v1/properties/prp_1/versions/2?contractId=ctr_1&groupId=grp_1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let env: VersionsEnvelope = body_json(resp).await;
    assert_eq!(env.versions.items.len(), 1);
    assert_eq!(env.versions.items[0].note, "prod");

    let resp = app
        .oneshot(get_request("/papi/v1/properties/prp_1/versions/9?contractId=ctr_1&groupId=grp_1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_version_bad_number_returns_400() {
    let resp = app_with(vec![property()])
        .oneshot(get_request("/papi/v1/properties/prp_1/versions/abc"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- create ---

#[tokio::test]
async fn create_then_get_new_version() {
    let app = app_with(vec![property()]);
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/papi/v1/properties/prp_1/versions?contractId=ctr_1&groupId=grp_1",
            r#"{"createFromVersion":2}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let link: VersionLink = body_json(resp).await;
    assert_eq!(
        link.version_link,
        "/papi/v1/properties/prp_1/versions/4?contractId=ctr_1&groupId=grp_1"
    );

    let resp = app
        .oneshot(get_request("/papi/v1/properties/prp_1/versions/4?contractId=ctr_1&groupId=grp_1"))
        .await
        .unwrap();
    let env: VersionsEnvelope = body_json(resp).await;
    let created = &env.versions.items[0];
    assert_eq!(created.note, "prod");
    assert_eq!(created.production_status, "INACTIVE");
}

#[tokio::test]
async fn create_rejects_stale_etag() {
    let resp = app_with(vec![property()])
        .oneshot(json_request(
            "POST",
            "/papi/v1/properties/prp_1/versions?contractId=ctr_1&groupId=grp_1",
            r#"{"createFromVersion":1,"createFromVersionEtag":"stale"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let problem: Problem = body_json(resp).await;
    assert!(problem.detail.contains("stale"));
}

#[tokio::test]
async fn create_from_missing_version_is_not_found() {
    let resp = app_with(vec![property()])
        .oneshot(json_request(
            "POST",
            "/papi/v1/properties/prp_1/versions?contractId=ctr_1&groupId=grp_1",
            r#"{"createFromVersion":42}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_malformed_json_returns_422() {
    let resp = app_with(vec![property()])
        .oneshot(json_request(
            "POST",
            "/papi/v1/properties/prp_1/versions",
            r#"{"fromVersion":1}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
