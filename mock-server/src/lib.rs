use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const ACTIVE: &str = "ACTIVE";
pub const INACTIVE: &str = "INACTIVE";

const USE_PREFIXES_HEADER: &str = "papi-use-prefixes";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub property_version: u32,
    pub etag: String,
    pub note: String,
    pub product_id: String,
    pub rule_format: String,
    pub production_status: String,
    pub staging_status: String,
    pub updated_by_user: String,
    pub updated_date: String,
}

impl Version {
    /// An inactive version with a fresh etag.
    pub fn new(number: u32, note: &str) -> Self {
        Self {
            property_version: number,
            etag: Uuid::new_v4().simple().to_string(),
            note: note.to_string(),
            product_id: "prd_Fresca".to_string(),
            rule_format: "latest".to_string(),
            production_status: INACTIVE.to_string(),
            staging_status: INACTIVE.to_string(),
            updated_by_user: "mockuser".to_string(),
            updated_date: OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default(),
        }
    }
}

/// A stored property. IDs are kept with their type prefixes.
#[derive(Clone, Debug)]
pub struct Property {
    pub property_id: String,
    pub property_name: String,
    pub account_id: String,
    pub contract_id: String,
    pub group_id: String,
    pub asset_id: String,
    pub versions: Vec<Version>,
}

impl Property {
    /// A property with a single inactive version 1.
    pub fn new(property_id: &str, contract_id: &str, group_id: &str) -> Self {
        Self {
            property_id: property_id.to_string(),
            property_name: format!("{}.example.com", strip_prefix(property_id)),
            account_id: "act_A-CCT1234".to_string(),
            contract_id: contract_id.to_string(),
            group_id: group_id.to_string(),
            asset_id: format!("aid_{}", strip_prefix(property_id)),
            versions: vec![Version::new(1, "initial version")],
        }
    }

    fn latest(&self) -> Option<&Version> {
        self.versions.iter().max_by_key(|v| v.property_version)
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VersionsEnvelope {
    pub property_id: String,
    pub property_name: String,
    pub account_id: String,
    pub contract_id: String,
    pub group_id: String,
    pub asset_id: String,
    pub versions: VersionItems,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct VersionItems {
    pub items: Vec<Version>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVersion {
    pub create_from_version: u32,
    pub create_from_version_etag: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VersionLink {
    pub version_link: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VersionsQuery {
    pub contract_id: Option<String>,
    pub group_id: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub activated_on: Option<String>,
}

/// RFC 7807 error body.
#[derive(Serialize, Deserialize, Debug)]
pub struct Problem {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub detail: String,
    pub status: u16,
}

impl Problem {
    fn new(status: StatusCode, kind: &str, detail: impl Into<String>) -> Self {
        Self {
            problem_type: format!("https://problems.example.net/papi/v0/{kind}"),
            title: status.canonical_reason().unwrap_or_default().to_string(),
            detail: detail.into(),
            status: status.as_u16(),
        }
    }

    fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not-found", detail)
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            [(header::CONTENT_TYPE, "application/problem+json")],
            Json(self),
        )
            .into_response()
    }
}

pub type Db = Arc<RwLock<HashMap<String, Property>>>;

pub fn app() -> Router {
    app_with(Vec::new())
}

/// Router serving `properties`, keyed by their unprefixed property ID.
pub fn app_with(properties: Vec<Property>) -> Router {
    let db: Db = Arc::new(RwLock::new(
        properties
            .into_iter()
            .map(|p| (strip_prefix(&p.property_id).to_string(), p))
            .collect(),
    ));
    Router::new()
        .route(
            "/papi/v1/properties/{property_id}/versions",
            get(list_versions).post(create_version),
        )
        .route(
            "/papi/v1/properties/{property_id}/versions/latest",
            get(latest_version),
        )
        .route(
            "/papi/v1/properties/{property_id}/versions/{version}",
            get(get_version),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener, properties: Vec<Property>) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(properties)).await
}

async fn list_versions(
    State(db): State<Db>,
    Path(property_id): Path<String>,
    Query(query): Query<VersionsQuery>,
    headers: HeaderMap,
) -> Result<Json<VersionsEnvelope>, Problem> {
    let db = db.read().await;
    let property = lookup(&db, &property_id, &query)?;

    let mut items = property.versions.clone();
    items.sort_by(|a, b| b.property_version.cmp(&a.property_version));
    let items = items
        .into_iter()
        .skip(query.offset.unwrap_or(0))
        .take(query.limit.unwrap_or(usize::MAX))
        .collect();
    tracing::debug!(%property_id, "list versions");
    Ok(Json(envelope(property, items, use_prefixes(&headers))))
}

async fn latest_version(
    State(db): State<Db>,
    Path(property_id): Path<String>,
    Query(query): Query<VersionsQuery>,
    headers: HeaderMap,
) -> Result<Json<VersionsEnvelope>, Problem> {
    let db = db.read().await;
    let property = lookup(&db, &property_id, &query)?;

    let version = match query.activated_on.as_deref() {
        None => property.latest(),
        Some("PRODUCTION") => property
            .versions
            .iter()
            .filter(|v| v.production_status == ACTIVE)
            .max_by_key(|v| v.property_version),
        Some("STAGING") => property
            .versions
            .iter()
            .filter(|v| v.staging_status == ACTIVE)
            .max_by_key(|v| v.property_version),
        Some(other) => {
            return Err(Problem::new(
                StatusCode::BAD_REQUEST,
                "invalid-network",
                format!("activatedOn must be PRODUCTION or STAGING, got {other}"),
            ))
        }
    };
    let version = version
        .cloned()
        .ok_or_else(|| Problem::not_found(format!("no matching version for {property_id}")))?;
    Ok(Json(envelope(property, vec![version], use_prefixes(&headers))))
}

async fn get_version(
    State(db): State<Db>,
    Path((property_id, version)): Path<(String, u32)>,
    Query(query): Query<VersionsQuery>,
    headers: HeaderMap,
) -> Result<Json<VersionsEnvelope>, Problem> {
    let db = db.read().await;
    let property = lookup(&db, &property_id, &query)?;
    let found = property
        .versions
        .iter()
        .find(|v| v.property_version == version)
        .cloned()
        .ok_or_else(|| Problem::not_found(format!("version {version} of {property_id} does not exist")))?;
    Ok(Json(envelope(property, vec![found], use_prefixes(&headers))))
}

async fn create_version(
    State(db): State<Db>,
    Path(property_id): Path<String>,
    Query(query): Query<VersionsQuery>,
    headers: HeaderMap,
    Json(input): Json<CreateVersion>,
) -> Result<(StatusCode, Json<VersionLink>), Problem> {
    let mut db = db.write().await;
    lookup(&db, &property_id, &query)?;
    let property = db
        .get_mut(strip_prefix(&property_id))
        .ok_or_else(|| Problem::not_found(format!("property {property_id} does not exist")))?;

    let source = property
        .versions
        .iter()
        .find(|v| v.property_version == input.create_from_version)
        .cloned()
        .ok_or_else(|| {
            Problem::not_found(format!(
                "version {} of {property_id} does not exist",
                input.create_from_version
            ))
        })?;
    if let Some(etag) = input.create_from_version_etag.as_deref() {
        if etag != source.etag {
            return Err(Problem::new(
                StatusCode::BAD_REQUEST,
                "etag-mismatch",
                format!("etag {etag} does not match version {}", source.property_version),
            ));
        }
    }

    let next = property.latest().map_or(1, |v| v.property_version + 1);
    let version = Version {
        property_version: next,
        note: source.note.clone(),
        product_id: source.product_id.clone(),
        rule_format: source.rule_format.clone(),
        ..Version::new(next, "")
    };
    property.versions.push(version);
    tracing::debug!(%property_id, version = next, "created version");

    let prefixes = use_prefixes(&headers);
    let link = format!(
        "/papi/v1/properties/{}/versions/{next}?contractId={}&groupId={}",
        render_id(&property.property_id, prefixes),
        render_id(&property.contract_id, prefixes),
        render_id(&property.group_id, prefixes),
    );
    Ok((StatusCode::CREATED, Json(VersionLink { version_link: link })))
}

/// Find a property, rejecting a contract or group that does not own it.
fn lookup<'a>(
    db: &'a HashMap<String, Property>,
    property_id: &str,
    query: &VersionsQuery,
) -> Result<&'a Property, Problem> {
    let property = db
        .get(strip_prefix(property_id))
        .ok_or_else(|| Problem::not_found(format!("property {property_id} does not exist")))?;
    let mismatch = |given: &Option<String>, owned: &str| {
        given
            .as_deref()
            .is_some_and(|g| !g.is_empty() && strip_prefix(g) != strip_prefix(owned))
    };
    if mismatch(&query.contract_id, &property.contract_id) || mismatch(&query.group_id, &property.group_id) {
        return Err(Problem::new(
            StatusCode::FORBIDDEN,
            "forbidden",
            format!("property {property_id} is not in the given contract and group"),
        ));
    }
    Ok(property)
}

fn envelope(property: &Property, items: Vec<Version>, prefixes: bool) -> VersionsEnvelope {
    VersionsEnvelope {
        property_id: render_id(&property.property_id, prefixes),
        property_name: property.property_name.clone(),
        account_id: render_id(&property.account_id, prefixes),
        contract_id: render_id(&property.contract_id, prefixes),
        group_id: render_id(&property.group_id, prefixes),
        asset_id: render_id(&property.asset_id, prefixes),
        versions: VersionItems { items },
    }
}

fn use_prefixes(headers: &HeaderMap) -> bool {
    headers
        .get(USE_PREFIXES_HEADER)
        .and_then(|v| v.to_str().ok())
        .map_or(true, |v| !v.eq_ignore_ascii_case("false"))
}

const PREFIXES: [&str; 5] = ["prp_", "ctr_", "grp_", "act_", "aid_"];

fn strip_prefix(id: &str) -> &str {
    PREFIXES
        .iter()
        .find_map(|prefix| id.strip_prefix(prefix))
        .unwrap_or(id)
}

fn render_id(id: &str, prefixes: bool) -> String {
    if prefixes {
        id.to_string()
    } else {
        strip_prefix(id).to_string()
    }
}
