//! Roster and service-store provider backed by the Gestao REST backend.

use async_trait::async_trait;
use reqwest::{Client as HttpClient, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use gestao_core::{
    model::{Client, ClientId, ServiceId, ServiceInput, ServiceRecord},
    ports::{PortError, RosterPort, ServiceStore},
};

/// Error payload returned by the backend on rejected requests.
#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

/// Port implementation talking to the CRM REST API.
///
/// The lenient bins deserializers live in the core models, so a malformed
/// persisted service row cannot abort a roster fetch.
pub struct ApiRoster {
    http: HttpClient,
    base_url: String,
    token: Option<String>,
}

impl ApiRoster {
    /// Create a provider bound to the given HTTP client.
    ///
    /// `base_url` points at the API root (e.g. `http://localhost:4000/api`);
    /// a trailing slash is tolerated. The optional bearer token is attached
    /// to every request.
    #[must_use]
    pub fn new<S: Into<String>>(http: HttpClient, base_url: S, token: Option<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http,
            base_url,
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl RosterPort for ApiRoster {
    async fn clients(&self) -> Result<Vec<Client>, PortError> {
        let request = self.authorized(self.http.get(self.url("/clients")));
        fetch_json(request, PortError::ClientNotFound).await
    }

    async fn client(&self, id: &ClientId) -> Result<Client, PortError> {
        let request = self.authorized(self.http.get(self.url(&format!("/clients/{id}"))));
        fetch_json(request, PortError::ClientNotFound).await
    }

    async fn services(&self, client: Option<&ClientId>) -> Result<Vec<ServiceRecord>, PortError> {
        let mut request = self.authorized(self.http.get(self.url("/services")));
        if let Some(id) = client {
            request = request.query(&[("clientId", id.0.as_str())]);
        }
        fetch_json(request, PortError::ServiceNotFound).await
    }

    async fn service(&self, id: &ServiceId) -> Result<ServiceRecord, PortError> {
        let request = self.authorized(self.http.get(self.url(&format!("/services/{id}"))));
        fetch_json(request, PortError::ServiceNotFound).await
    }
}

#[async_trait]
impl ServiceStore for ApiRoster {
    async fn create_service(&self, input: &ServiceInput) -> Result<ServiceRecord, PortError> {
        let request = self
            .authorized(self.http.post(self.url("/services")))
            .json(input);
        // The backend answers 404 here when the referenced client is gone.
        fetch_json(request, PortError::ClientNotFound).await
    }

    async fn update_service(
        &self,
        id: &ServiceId,
        input: &ServiceInput,
    ) -> Result<ServiceRecord, PortError> {
        let request = self
            .authorized(self.http.put(self.url(&format!("/services/{id}"))))
            .json(input);
        fetch_json(request, PortError::ServiceNotFound).await
    }

    async fn delete_service(&self, id: &ServiceId) -> Result<(), PortError> {
        let request = self.authorized(self.http.delete(self.url(&format!("/services/{id}"))));
        let response = request.send().await.map_err(PortError::from)?;
        check_status(response, PortError::ServiceNotFound).await?;
        Ok(())
    }
}

/// Map an HTTP status to the port error taxonomy before decoding a body.
async fn check_status(response: Response, not_found: PortError) -> Result<Response, PortError> {
    let status = response.status();
    if !status.is_client_error() {
        return response.error_for_status().map_err(PortError::from);
    }
    let message = match status {
        StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND => None,
        _ => response
            .json::<ApiMessage>()
            .await
            .ok()
            .map(|body| body.message),
    };
    Err(map_client_error(status, message, not_found))
}

/// Pure status mapping for client errors: 401 and 404 have dedicated
/// variants, everything else is a rejection carrying the backend message
/// (or the status line when the body had none).
fn map_client_error(status: StatusCode, message: Option<String>, not_found: PortError) -> PortError {
    match status {
        StatusCode::UNAUTHORIZED => PortError::Unauthorized,
        StatusCode::NOT_FOUND => not_found,
        _ => PortError::Rejected(message.unwrap_or_else(|| status.to_string())),
    }
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    not_found: PortError,
) -> Result<T, PortError> {
    let response = request.send().await.map_err(PortError::from)?;
    let response = check_status(response, not_found).await?;
    response.json().await.map_err(PortError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slashes_are_trimmed() {
        let provider = ApiRoster::new(HttpClient::new(), "http://localhost:4000/api/", None);
        assert_eq!(provider.url("/clients"), "http://localhost:4000/api/clients");
    }

    #[test]
    fn unauthorized_and_not_found_map_to_their_variants() {
        assert!(matches!(
            map_client_error(StatusCode::UNAUTHORIZED, None, PortError::ClientNotFound),
            PortError::Unauthorized
        ));
        assert!(matches!(
            map_client_error(StatusCode::NOT_FOUND, None, PortError::ClientNotFound),
            PortError::ClientNotFound
        ));
        assert!(matches!(
            map_client_error(StatusCode::NOT_FOUND, None, PortError::ServiceNotFound),
            PortError::ServiceNotFound
        ));
    }

    #[test]
    fn bad_request_carries_the_backend_message() {
        let error = map_client_error(
            StatusCode::BAD_REQUEST,
            Some("Cliente inválido".to_owned()),
            PortError::ServiceNotFound,
        );
        match error {
            PortError::Rejected(message) => assert_eq!(message, "Cliente inválido"),
            other => panic!("expected a rejection, got {other}"),
        }
    }

    #[test]
    fn rejection_without_a_body_falls_back_to_the_status_line() {
        let error = map_client_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            None,
            PortError::ServiceNotFound,
        );
        match error {
            PortError::Rejected(message) => assert_eq!(message, "422 Unprocessable Entity"),
            other => panic!("expected a rejection, got {other}"),
        }
    }
}
