//! Session: a `PapiClient` paired with a transport that performs the I/O.

use crate::client::PapiClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{
    CreatePropertyVersionRequest, CreatePropertyVersionResponse, GetLatestVersionRequest,
    GetPropertyVersionRequest, GetPropertyVersionsRequest, GetPropertyVersionsResponse,
};

/// Executes one HTTP exchange.
///
/// Implementations must return non-success statuses as `Ok` responses;
/// status interpretation belongs to `PapiClient`.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

#[derive(Debug, Clone)]
pub struct Session<T> {
    client: PapiClient,
    transport: T,
}

impl<T: Transport> Session<T> {
    pub fn new(client: PapiClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &PapiClient {
        &self.client
    }

    /// Lists versions of a property, newest first.
    #[tracing::instrument(skip_all, fields(property_id = %params.property_id))]
    pub fn get_property_versions(
        &self,
        params: &GetPropertyVersionsRequest,
    ) -> Result<GetPropertyVersionsResponse, ApiError> {
        let request = self.client.build_get_property_versions(params)?;
        let response = self.transport.execute(request)?;
        self.client.parse_get_property_versions(response)
    }

    /// Latest version overall, or the latest one active on `activated_on`.
    #[tracing::instrument(skip_all, fields(property_id = %params.property_id))]
    pub fn get_latest_version(
        &self,
        params: &GetLatestVersionRequest,
    ) -> Result<GetPropertyVersionsResponse, ApiError> {
        let request = self.client.build_get_latest_version(params)?;
        let response = self.transport.execute(request)?;
        self.client.parse_get_latest_version(response)
    }

    #[tracing::instrument(skip_all, fields(property_id = %params.property_id, version = params.property_version))]
    pub fn get_property_version(
        &self,
        params: &GetPropertyVersionRequest,
    ) -> Result<GetPropertyVersionsResponse, ApiError> {
        let request = self.client.build_get_property_version(params)?;
        let response = self.transport.execute(request)?;
        self.client.parse_get_property_version(response)
    }

    #[tracing::instrument(skip_all, fields(property_id = %params.property_id, from = params.version.create_from_version))]
    pub fn create_property_version(
        &self,
        params: &CreatePropertyVersionRequest,
    ) -> Result<CreatePropertyVersionResponse, ApiError> {
        let request = self.client.build_create_property_version(params)?;
        let response = self.transport.execute(request)?;
        let created = self.client.parse_create_property_version(response)?;
        tracing::debug!(version = created.property_version, "created property version");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::http::HttpMethod;
    use crate::types::PropertyVersionCreate;

    /// Replays canned responses and records the requests it saw.
    struct Canned {
        responses: RefCell<Vec<HttpResponse>>,
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl Canned {
        fn new(responses: Vec<HttpResponse>) -> Self {
            Self {
                responses: RefCell::new(responses),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for Canned {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.borrow_mut().push(request);
            let mut responses = self.responses.borrow_mut();
            if responses.is_empty() {
                return Err(ApiError::Transport("connection refused".to_string()));
            }
            Ok(responses.remove(0))
        }
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn validation_failure_skips_transport() {
        let transport = Canned::new(Vec::new());
        let session = Session::new(PapiClient::new("http://papi"), &transport);
        let err = session
            .get_property_versions(&GetPropertyVersionsRequest::default())
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(transport.seen.borrow().is_empty());
    }

    #[test]
    fn transport_failure_is_propagated() {
        let transport = Canned::new(Vec::new());
        let session = Session::new(PapiClient::new("http://papi"), &transport);
        let params = GetLatestVersionRequest {
            property_id: "prp_1".to_string(),
            ..Default::default()
        };
        let err = session.get_latest_version(&params).unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[test]
    fn create_posts_and_reads_link() {
        let transport = Canned::new(vec![response(
            201,
            r#"{"versionLink":"/papi/v1/properties/prp_1/versions/5?contractId=ctr_1&groupId=grp_1"}"#,
        )]);
        let session = Session::new(PapiClient::new("http://papi"), &transport);
        let params = CreatePropertyVersionRequest {
            property_id: "prp_1".to_string(),
            contract_id: "ctr_1".to_string(),
            group_id: "grp_1".to_string(),
            version: PropertyVersionCreate {
                create_from_version: 4,
                create_from_version_etag: None,
            },
        };
        let created = session.create_property_version(&params).unwrap();
        assert_eq!(created.property_version, 5);

        let seen = transport.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, HttpMethod::Post);
        assert_eq!(
            seen[0].path,
            "http://papi/papi/v1/properties/prp_1/versions?contractId=ctr_1&groupId=grp_1"
        );
    }

    #[test]
    fn get_version_not_found() {
        let transport = Canned::new(vec![response(404, "")]);
        let session = Session::new(PapiClient::new("http://papi"), Box::new(transport) as Box<dyn Transport>);
        let params = GetPropertyVersionRequest {
            property_id: "prp_1".to_string(),
            property_version: 9,
            ..Default::default()
        };
        assert!(matches!(session.get_property_version(&params), Err(ApiError::NotFound(_))));
    }
}
