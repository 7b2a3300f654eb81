//! Domain data structures for clients, employees, quotes, and service records.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::schedule::BinsConfig;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a client record.
pub struct ClientId(pub String);

impl fmt::Display for ClientId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a recurring service record.
pub struct ServiceId(pub String);

impl fmt::Display for ServiceId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Commercial status of a client.
pub enum ClientStatus {
    /// Active client under contract.
    Ativo,
    /// Prospect still being negotiated.
    Especulativo,
    /// Former or paused client.
    Inativo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
/// How often a client is billed.
pub enum BillingFrequency {
    /// Fixed amount every month.
    Mensal,
    /// Weekly amount, normalized to a month with the 4.33 weeks factor.
    Semanal,
    /// One-off payment counted only in its start month.
    PagamentoUnico,
    /// Anything else; billed like [`BillingFrequency::Mensal`].
    Outro,
}

impl From<String> for BillingFrequency {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "MENSAL" => Self::Mensal,
            "SEMANAL" => Self::Semanal,
            "PAGAMENTO_UNICO" => Self::PagamentoUnico,
            _ => Self::Outro,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
/// Preferred payment channel of a client.
pub enum PaymentMethod {
    /// Bank transfer.
    Transferencia,
    /// Cheque.
    Cheque,
    /// Cash.
    Dinheiro,
    /// Unspecified or other channel.
    Outro,
}

impl From<String> for PaymentMethod {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "TRANSFERENCIA" => Self::Transferencia,
            "CHEQUE" => Self::Cheque,
            "DINHEIRO" => Self::Dinheiro,
            _ => Self::Outro,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Contractual situation of a client.
pub enum ContractStatus {
    /// Signed contract on file.
    ComContrato,
    /// Working without a contract.
    SemContrato,
    /// Contract still under negotiation.
    ANegociar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Lifecycle status of a quote.
pub enum DevisStatus {
    /// Sent to the client, awaiting an answer.
    Enviado,
    /// Accepted by the client.
    Aceite,
    /// Declined by the client.
    Recusado,
    /// Draft, not sent yet.
    Rascunho,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Quote ("devis") proposed to a client. Quotes never enter billing aggregation.
pub struct Devis {
    /// Unique identifier.
    #[serde(default)]
    pub id: String,
    /// Short description of the proposed work.
    pub title: String,
    /// Proposed price.
    pub amount: Decimal,
    /// Date the quote was issued.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    /// Date until which the quote is valid.
    #[serde(default)]
    pub valid: Option<DateTime<Utc>>,
    /// Lifecycle status.
    pub status: DevisStatus,
    /// Whether the quote is still shown as active.
    #[serde(default)]
    pub active: bool,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Employee assigned to a client. Salaries always count as full monthly amounts.
pub struct Employee {
    /// Unique identifier.
    #[serde(default)]
    pub id: String,
    /// Employee name.
    pub name: String,
    /// Monthly salary.
    pub salary: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Full client record including owned employees and quotes.
pub struct Client {
    /// Unique identifier.
    pub id: ClientId,
    /// Client name.
    pub name: String,
    /// Commercial status. Billing aggregation includes every status.
    pub client_status: ClientStatus,
    /// Free-form client category, e.g. "Imovel".
    pub client_type: String,
    /// Date the engagement started; required for one-off billing.
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Address where the service is performed.
    #[serde(default)]
    pub service_address: Option<String>,
    /// Address used on invoices.
    #[serde(default)]
    pub billing_address: Option<String>,
    /// Nominal billed value, interpreted through [`Client::frequency`].
    pub value: Decimal,
    /// Billing frequency for [`Client::value`].
    pub frequency: BillingFrequency,
    /// Preferred payment channel.
    pub method: PaymentMethod,
    /// Free-form description of the contracted service.
    #[serde(default)]
    pub service: Option<String>,
    /// Contractual situation.
    pub contract: ContractStatus,
    /// Employees working for this client (cascade-owned).
    #[serde(default)]
    pub employees: Vec<Employee>,
    /// Quotes issued to this client (cascade-owned).
    #[serde(default)]
    pub devis: Vec<Devis>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Minimal client reference embedded on a service row.
pub struct ClientRef {
    /// Referenced client id.
    pub id: ClientId,
    /// Client name at the time the row was loaded.
    pub name: String,
    /// Client category.
    pub client_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Recurring service registered for a client, with an optional bins sub-schedule.
pub struct ServiceRecord {
    /// Unique identifier.
    pub id: ServiceId,
    /// Owning client.
    pub client_id: ClientId,
    /// Embedded client reference, when the backend joined it in.
    #[serde(default)]
    pub client: Option<ClientRef>,
    /// Service category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Free-form frequency descriptor for the primary activity.
    #[serde(default)]
    pub freq: Option<String>,
    /// Free-form weekday descriptor for the primary activity.
    #[serde(default)]
    pub weekday: Option<String>,
    /// Free-form time descriptor for the primary activity.
    #[serde(default)]
    pub time: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Bin collection sub-schedule.
    #[serde(flatten)]
    pub bins: BinsConfig,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Payload for creating or fully replacing a service record.
///
/// Updates carry the whole bins block; there is no field-level merge.
pub struct ServiceInput {
    /// Owning client; must resolve to an existing record.
    pub client_id: ClientId,
    /// Service category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Free-form frequency descriptor.
    #[serde(default)]
    pub freq: Option<String>,
    /// Free-form weekday descriptor.
    #[serde(default)]
    pub weekday: Option<String>,
    /// Free-form time descriptor.
    #[serde(default)]
    pub time: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Full replacement bins configuration.
    #[serde(flatten)]
    pub bins: BinsConfig,
}

#[derive(thiserror::Error, Debug)]
/// Input that cannot be defensively normalized and must be rejected.
pub enum ValidationError {
    /// A client carries a negative billed value.
    #[error("Client {client} has a negative billing value")]
    NegativeValue {
        /// Offending client name.
        client: String,
    },
    /// An employee carries a negative salary.
    #[error("Employee {employee} of client {client} has a negative salary")]
    NegativeSalary {
        /// Owning client name.
        client: String,
        /// Offending employee name.
        employee: String,
    },
    /// A quote carries a negative amount.
    #[error("Devis {devis} of client {client} has a negative amount")]
    NegativeAmount {
        /// Owning client name.
        client: String,
        /// Offending quote title.
        devis: String,
    },
}

impl Client {
    /// Check the money invariants of this record.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for a negative billed value, salary, or
    /// quote amount. Negative amounts are never silently corrected.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.value < Decimal::ZERO {
            return Err(ValidationError::NegativeValue {
                client: self.name.clone(),
            });
        }
        for employee in &self.employees {
            if employee.salary < Decimal::ZERO {
                return Err(ValidationError::NegativeSalary {
                    client: self.name.clone(),
                    employee: employee.name.clone(),
                });
            }
        }
        for devis in &self.devis {
            if devis.amount < Decimal::ZERO {
                return Err(ValidationError::NegativeAmount {
                    client: self.name.clone(),
                    devis: devis.title.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn client(value: Decimal) -> Client {
        Client {
            id: ClientId("c1".to_owned()),
            name: "Residencia Alvalade".to_owned(),
            client_status: ClientStatus::Ativo,
            client_type: "Imovel".to_owned(),
            start_date: None,
            service_address: None,
            billing_address: None,
            value,
            frequency: BillingFrequency::Mensal,
            method: PaymentMethod::Transferencia,
            service: None,
            contract: ContractStatus::ComContrato,
            employees: Vec::new(),
            devis: Vec::new(),
        }
    }

    #[test]
    fn validate_accepts_zero_and_positive_values() {
        assert!(client(Decimal::ZERO).validate().is_ok());
        assert!(client(dec!(1500.50)).validate().is_ok());
    }

    #[test]
    fn validate_rejects_negative_billing_value() {
        let result = client(dec!(-1)).validate();
        assert!(matches!(
            result,
            Err(ValidationError::NegativeValue { .. })
        ));
    }

    #[test]
    fn validate_rejects_negative_salary() {
        let mut subject = client(dec!(100));
        subject.employees.push(Employee {
            id: "e1".to_owned(),
            name: "Maria".to_owned(),
            salary: dec!(-300),
        });
        assert!(matches!(
            subject.validate(),
            Err(ValidationError::NegativeSalary { .. })
        ));
    }

    #[test]
    fn unknown_frequency_deserializes_as_outro() {
        let frequency: BillingFrequency =
            serde_json::from_str("\"QUINZENAL\"").expect("lenient frequency");
        assert_eq!(frequency, BillingFrequency::Outro);
    }

    #[test]
    fn client_accepts_string_money_values() {
        let json = r#"{
            "id": "c9",
            "name": "Loja Baixa",
            "clientStatus": "ATIVO",
            "clientType": "Comercio",
            "value": "1500.50",
            "frequency": "MENSAL",
            "method": "TRANSFERENCIA",
            "contract": "SEM_CONTRATO",
            "employees": [{"id": "e1", "name": "Rui", "salary": 300}]
        }"#;
        let parsed: Client = serde_json::from_str(json).expect("wire client");
        assert_eq!(parsed.value, dec!(1500.50));
        assert_eq!(parsed.employees[0].salary, dec!(300));
    }
}
