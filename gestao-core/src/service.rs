//! High-level service facade combining billing, scheduling, and persistence.

use std::sync::Arc;

use crate::billing::{self, MonthlySnapshot};
use crate::model::{ServiceId, ServiceInput, ServiceRecord};
use crate::ports::{PortError, RosterPort, ServiceStore};
use crate::schedule::{self, BinEvent};

/// Public entry point for the dashboard and service management flows.
///
/// The facade is stateless: every call fetches a fresh roster snapshot and
/// runs a pure computation over it, so concurrent calls need no coordination.
pub struct GestaoService {
    roster: Arc<dyn RosterPort>,
    store: Arc<dyn ServiceStore>,
}

impl GestaoService {
    /// Create a new facade bound to the provided ports.
    #[must_use]
    pub fn new(roster: Arc<dyn RosterPort>, store: Arc<dyn ServiceStore>) -> Self {
        Self { roster, store }
    }

    /// Compute the financial snapshot for the given reference month.
    ///
    /// The month and year are explicit parameters; callers inject the current
    /// date rather than this core reading a clock.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the roster fetch fails or a client record
    /// violates a money invariant.
    pub async fn monthly_snapshot(
        &self,
        month: u32,
        year: i32,
    ) -> Result<MonthlySnapshot, PortError> {
        let clients = self.roster.clients().await?;
        Ok(billing::aggregate(&clients, month, year)?)
    }

    /// Derive the weekly bin calendar across every service.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when a roster fetch fails.
    pub async fn bin_calendar(&self) -> Result<Vec<BinEvent>, PortError> {
        let services = self.roster.services(None).await?;
        let clients = self.roster.clients().await?;
        Ok(schedule::generate_bin_events(&services, &clients))
    }

    /// List every registered service record.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the roster fetch fails.
    pub async fn services(&self) -> Result<Vec<ServiceRecord>, PortError> {
        self.roster.services(None).await
    }

    /// Register a service for a client.
    ///
    /// The referenced client must exist; a dangling id is a
    /// [`PortError::ClientNotFound`], distinct from a validation failure.
    /// Validation happens before the store is touched, so a failed create
    /// never half-applies.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when validation fails or the backend rejects
    /// the payload.
    pub async fn create_service(&self, input: &ServiceInput) -> Result<ServiceRecord, PortError> {
        self.roster.client(&input.client_id).await?;
        self.store.create_service(input).await
    }

    /// Fully replace an existing service, bins block included.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::ServiceNotFound`] for an unknown service,
    /// [`PortError::ClientNotFound`] for a dangling client reference, or any
    /// backend failure.
    pub async fn update_service(
        &self,
        id: &ServiceId,
        input: &ServiceInput,
    ) -> Result<ServiceRecord, PortError> {
        self.roster.service(id).await?;
        self.roster.client(&input.client_id).await?;
        self.store.update_service(id, input).await
    }

    /// Delete a service record.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::ServiceNotFound`] when the id does not resolve.
    pub async fn delete_service(&self, id: &ServiceId) -> Result<(), PortError> {
        self.store.delete_service(id).await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    use crate::model::{
        BillingFrequency, Client, ClientId, ClientStatus, ContractStatus, Employee,
        PaymentMethod,
    };
    use crate::schedule::BinsConfig;

    use super::*;

    struct FixedRoster {
        clients: Vec<Client>,
        services: Vec<ServiceRecord>,
    }

    #[async_trait]
    impl RosterPort for FixedRoster {
        async fn clients(&self) -> Result<Vec<Client>, PortError> {
            Ok(self.clients.clone())
        }

        async fn client(&self, id: &ClientId) -> Result<Client, PortError> {
            self.clients
                .iter()
                .find(|client| client.id == *id)
                .cloned()
                .ok_or(PortError::ClientNotFound)
        }

        async fn services(
            &self,
            client: Option<&ClientId>,
        ) -> Result<Vec<ServiceRecord>, PortError> {
            Ok(self
                .services
                .iter()
                .filter(|service| client.is_none_or(|id| service.client_id == *id))
                .cloned()
                .collect())
        }

        async fn service(&self, id: &ServiceId) -> Result<ServiceRecord, PortError> {
            self.services
                .iter()
                .find(|service| service.id == *id)
                .cloned()
                .ok_or(PortError::ServiceNotFound)
        }
    }

    struct EchoStore;

    #[async_trait]
    impl ServiceStore for EchoStore {
        async fn create_service(&self, input: &ServiceInput) -> Result<ServiceRecord, PortError> {
            let timestamp = Utc
                .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
                .single()
                .ok_or_else(|| PortError::Internal("bad fixture timestamp".to_owned()))?;
            Ok(ServiceRecord {
                id: ServiceId("created".to_owned()),
                client_id: input.client_id.clone(),
                client: None,
                category: input.category.clone(),
                freq: input.freq.clone(),
                weekday: input.weekday.clone(),
                time: input.time.clone(),
                notes: input.notes.clone(),
                bins: input.bins.clone(),
                created_at: timestamp,
                updated_at: timestamp,
            })
        }

        async fn update_service(
            &self,
            id: &ServiceId,
            input: &ServiceInput,
        ) -> Result<ServiceRecord, PortError> {
            let mut record = self.create_service(input).await?;
            record.id = id.clone();
            Ok(record)
        }

        async fn delete_service(&self, _id: &ServiceId) -> Result<(), PortError> {
            Ok(())
        }
    }

    fn roster_client(id: &str) -> Client {
        Client {
            id: ClientId(id.to_owned()),
            name: "Residencia Alvalade".to_owned(),
            client_status: ClientStatus::Ativo,
            client_type: "Imovel".to_owned(),
            start_date: None,
            service_address: None,
            billing_address: None,
            value: dec!(1000),
            frequency: BillingFrequency::Mensal,
            method: PaymentMethod::Transferencia,
            service: None,
            contract: ContractStatus::ComContrato,
            employees: vec![Employee {
                id: "e1".to_owned(),
                name: "Maria".to_owned(),
                salary: dec!(300),
            }],
            devis: Vec::new(),
        }
    }

    fn facade(clients: Vec<Client>, services: Vec<ServiceRecord>) -> GestaoService {
        GestaoService::new(
            Arc::new(FixedRoster { clients, services }),
            Arc::new(EchoStore),
        )
    }

    fn input_for(client: &str) -> ServiceInput {
        ServiceInput {
            client_id: ClientId(client.to_owned()),
            category: Some("Limpeza".to_owned()),
            freq: None,
            weekday: None,
            time: None,
            notes: None,
            bins: BinsConfig::default(),
        }
    }

    #[tokio::test]
    async fn monthly_snapshot_aggregates_the_roster() {
        let subject = facade(vec![roster_client("c1")], Vec::new());
        let snapshot = subject.monthly_snapshot(3, 2024).await.expect("snapshot");
        assert_eq!(snapshot.billed, dec!(1000));
        assert_eq!(snapshot.costs, dec!(300));
    }

    #[tokio::test]
    async fn create_service_rejects_dangling_client() {
        let subject = facade(Vec::new(), Vec::new());
        let result = subject.create_service(&input_for("missing")).await;
        assert!(matches!(result, Err(PortError::ClientNotFound)));
    }

    #[tokio::test]
    async fn create_service_passes_through_for_known_client() {
        let subject = facade(vec![roster_client("c1")], Vec::new());
        let record = subject
            .create_service(&input_for("c1"))
            .await
            .expect("created");
        assert_eq!(record.client_id, ClientId("c1".to_owned()));
    }

    #[tokio::test]
    async fn update_service_requires_an_existing_record() {
        let subject = facade(vec![roster_client("c1")], Vec::new());
        let result = subject
            .update_service(&ServiceId("missing".to_owned()), &input_for("c1"))
            .await;
        assert!(matches!(result, Err(PortError::ServiceNotFound)));
    }
}
