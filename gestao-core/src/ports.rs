//! Traits describing the persistence backend and the shared error type.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;

use crate::model::{Client, ClientId, ServiceId, ServiceInput, ServiceRecord, ValidationError};
use crate::schedule::ScheduleError;

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to the persistence backend or while
/// validating the data it returns.
pub enum PortError {
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// Input failed a money invariant.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    /// A weekday edit was rejected.
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),
    /// A referenced client does not exist.
    #[error("Client not found")]
    ClientNotFound,
    /// A referenced service does not exist.
    #[error("Service not found")]
    ServiceNotFound,
    /// The backend rejected the credentials.
    #[error("Unauthorized")]
    Unauthorized,
    /// The backend rejected the payload.
    #[error("Rejected by backend: {0}")]
    Rejected(String),
    /// Internal backend error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[async_trait]
/// Read access to the client and service roster.
pub trait RosterPort: Send + Sync {
    /// Load the full client roster including employees and quotes.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the backend request fails.
    async fn clients(&self) -> Result<Vec<Client>, PortError>;

    /// Load a single client.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::ClientNotFound`] when the id does not resolve.
    async fn client(&self, id: &ClientId) -> Result<Client, PortError>;

    /// Load service records, optionally filtered to one client.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the backend request fails.
    async fn services(&self, client: Option<&ClientId>) -> Result<Vec<ServiceRecord>, PortError>;

    /// Load a single service record.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::ServiceNotFound`] when the id does not resolve.
    async fn service(&self, id: &ServiceId) -> Result<ServiceRecord, PortError>;
}

#[async_trait]
/// Write access to service records.
///
/// Updates replace the whole record, bins block included; there is no
/// field-level merge.
pub trait ServiceStore: Send + Sync {
    /// Create a service record.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the backend rejects the payload.
    async fn create_service(&self, input: &ServiceInput) -> Result<ServiceRecord, PortError>;

    /// Fully replace a service record.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::ServiceNotFound`] when the id does not resolve.
    async fn update_service(
        &self,
        id: &ServiceId,
        input: &ServiceInput,
    ) -> Result<ServiceRecord, PortError>;

    /// Delete a service record.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::ServiceNotFound`] when the id does not resolve.
    async fn delete_service(&self, id: &ServiceId) -> Result<(), PortError>;
}
