//! Stateless HTTP request builder and response parser for PAPI versions.
//!
//! # Design
//! `PapiClient` holds only a `base_url` and the prefix preference. Each
//! operation is split into a `build_*` method that validates its parameters
//! and produces an `HttpRequest`, and a `parse_*` method that consumes an
//! `HttpResponse`. Whoever executes the round-trip in between is free to
//! pick the transport; see `Session` for the bundled one.

use serde::de::DeserializeOwned;
use url::form_urlencoded;

use crate::error::{ApiError, ProblemDetails};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, USE_PREFIXES_HEADER};
use crate::location::version_from_location;
use crate::types::{
    CreatePropertyVersionRequest, CreatePropertyVersionResponse, GetLatestVersionRequest,
    GetPropertyVersionRequest, GetPropertyVersionsRequest, GetPropertyVersionsResponse,
};
use crate::validate::Validate;

const PROPERTIES_PATH: &str = "/papi/v1/properties";

#[derive(Debug, Clone)]
pub struct PapiClient {
    base_url: String,
    use_prefixes: bool,
}

impl PapiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            use_prefixes: false,
        }
    }

    /// Ask the server to return IDs with (`true`) or without their type prefixes.
    pub fn with_use_prefixes(mut self, use_prefixes: bool) -> Self {
        self.use_prefixes = use_prefixes;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn use_prefixes(&self) -> bool {
        self.use_prefixes
    }

    pub fn build_get_property_versions(
        &self,
        params: &GetPropertyVersionsRequest,
    ) -> Result<HttpRequest, ApiError> {
        params.validate()?;

        let mut query = scope_query(&params.contract_id, &params.group_id);
        // Zero paging values are treated as unset.
        if let Some(limit) = params.limit.filter(|v| *v != 0) {
            query.append_pair("limit", &limit.to_string());
        }
        if let Some(offset) = params.offset.filter(|v| *v != 0) {
            query.append_pair("offset", &offset.to_string());
        }
        let path = self.versions_url(&params.property_id, None, query.finish());
        tracing::debug!(url = %path, "GetPropertyVersions");
        Ok(self.get(path))
    }

    pub fn build_get_latest_version(
        &self,
        params: &GetLatestVersionRequest,
    ) -> Result<HttpRequest, ApiError> {
        params.validate()?;

        let mut query = scope_query(&params.contract_id, &params.group_id);
        if let Some(network) = params.activated_on {
            query.append_pair("activatedOn", network.as_str());
        }
        let path = self.versions_url(&params.property_id, Some("latest"), query.finish());
        tracing::debug!(url = %path, "GetLatestVersion");
        Ok(self.get(path))
    }

    pub fn build_get_property_version(
        &self,
        params: &GetPropertyVersionRequest,
    ) -> Result<HttpRequest, ApiError> {
        params.validate()?;

        let query = scope_query(&params.contract_id, &params.group_id).finish();
        let version = params.property_version.to_string();
        let path = self.versions_url(&params.property_id, Some(&version), query);
        tracing::debug!(url = %path, "GetPropertyVersion");
        Ok(self.get(path))
    }

    pub fn build_create_property_version(
        &self,
        params: &CreatePropertyVersionRequest,
    ) -> Result<HttpRequest, ApiError> {
        params.validate()?;

        let body = serde_json::to_string(&params.version)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let query = scope_query(&params.contract_id, &params.group_id).finish();
        let path = self.versions_url(&params.property_id, None, query);
        tracing::debug!(url = %path, "CreatePropertyVersion");

        let mut headers = self.common_headers();
        headers.push(("content-type".to_string(), "application/json".to_string()));
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path,
            headers,
            body: Some(body),
        })
    }

    pub fn parse_get_property_versions(
        &self,
        response: HttpResponse,
    ) -> Result<GetPropertyVersionsResponse, ApiError> {
        check_status(&response, 200, true)?;
        decode(&response)
    }

    pub fn parse_get_latest_version(
        &self,
        response: HttpResponse,
    ) -> Result<GetPropertyVersionsResponse, ApiError> {
        check_status(&response, 200, true)?;
        decode(&response)
    }

    pub fn parse_get_property_version(
        &self,
        response: HttpResponse,
    ) -> Result<GetPropertyVersionsResponse, ApiError> {
        check_status(&response, 200, true)?;
        decode(&response)
    }

    /// Decode the create response and fill `property_version` from its link.
    pub fn parse_create_property_version(
        &self,
        response: HttpResponse,
    ) -> Result<CreatePropertyVersionResponse, ApiError> {
        check_status(&response, 201, false)?;
        let mut created: CreatePropertyVersionResponse = decode(&response)?;
        created.property_version = version_from_location(&created.version_link)?;
        Ok(created)
    }

    fn versions_url(&self, property_id: &str, version: Option<&str>, query: String) -> String {
        let property = urlencoding::encode(property_id);
        match version {
            Some(version) => format!(
                "{}{PROPERTIES_PATH}/{property}/versions/{}?{query}",
                self.base_url,
                urlencoding::encode(version)
            ),
            None => format!("{}{PROPERTIES_PATH}/{property}/versions?{query}", self.base_url),
        }
    }

    fn common_headers(&self) -> Vec<(String, String)> {
        vec![(USE_PREFIXES_HEADER.to_string(), self.use_prefixes.to_string())]
    }

    fn get(&self, path: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: self.common_headers(),
            body: None,
        }
    }
}

/// `contractId` and `groupId` are always sent, even when empty.
fn scope_query(contract_id: &str, group_id: &str) -> form_urlencoded::Serializer<'static, String> {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("contractId", contract_id);
    query.append_pair("groupId", group_id);
    query
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16, not_found: bool) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if not_found && response.status == 404 {
        return Err(ApiError::NotFound(ProblemDetails::from_body(
            response.status,
            &response.body,
        )));
    }
    tracing::warn!(status = response.status, "unexpected PAPI response status");
    Err(ApiError::Api {
        status: response.status,
        problem: ProblemDetails::from_body(response.status, &response.body),
    })
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
