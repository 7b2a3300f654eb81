//! Monthly revenue, tax, and cost aggregation over the client roster.

use chrono::Datelike;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::model::{BillingFrequency, Client, ValidationError};

/// Statutory deduction applied to billed revenue. A fixed configured rate,
/// not derived from any calendar or payroll computation.
pub const URSSAF_RATE: Decimal = dec!(0.238);

/// Average weeks per month used to normalize weekly billing. A fixed
/// approximation, deliberately not calendar-accurate.
pub const WEEKS_PER_MONTH: Decimal = dec!(4.33);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Financial summary for one calendar month.
///
/// Computed fresh from the roster on every request and never persisted.
/// Serializes as five plain JSON numbers for the dashboard.
pub struct MonthlySnapshot {
    /// Revenue billed across the whole roster.
    #[serde(with = "rust_decimal::serde::float")]
    pub billed: Decimal,
    /// Statutory deduction on billed revenue.
    #[serde(with = "rust_decimal::serde::float")]
    pub urssaf: Decimal,
    /// Sum of all employee salaries.
    #[serde(with = "rust_decimal::serde::float")]
    pub costs: Decimal,
    /// Billed revenue minus employee costs.
    #[serde(with = "rust_decimal::serde::float")]
    pub gross: Decimal,
    /// Billed revenue minus the statutory deduction and employee costs.
    #[serde(with = "rust_decimal::serde::float")]
    pub net: Decimal,
}

impl MonthlySnapshot {
    /// Round every figure to currency precision for presentation.
    ///
    /// Accumulation always happens at full precision; rounding is applied
    /// only at this final step.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            billed: self.billed.round_dp(2),
            urssaf: self.urssaf.round_dp(2),
            costs: self.costs.round_dp(2),
            gross: self.gross.round_dp(2),
            net: self.net.round_dp(2),
        }
    }
}

/// Amount a client contributes to the given reference month.
///
/// `MENSAL` bills the nominal value, `SEMANAL` the value times
/// [`WEEKS_PER_MONTH`], and `PAGAMENTO_UNICO` the value only when the client's
/// start date falls inside the reference month. Unknown frequencies bill like
/// `MENSAL`.
#[must_use]
pub fn monthly_amount(client: &Client, month: u32, year: i32) -> Decimal {
    match client.frequency {
        BillingFrequency::Mensal | BillingFrequency::Outro => client.value,
        BillingFrequency::Semanal => client.value * WEEKS_PER_MONTH,
        BillingFrequency::PagamentoUnico => match client.start_date {
            Some(start) if start.month() == month && start.year() == year => client.value,
            _ => Decimal::ZERO,
        },
    }
}

/// Aggregate the full roster into a [`MonthlySnapshot`] for one month.
///
/// Every client counts regardless of status; salaries always count as full
/// monthly amounts. The reference month and year are explicit parameters so
/// the computation stays deterministic and testable.
///
/// # Errors
///
/// Returns a [`ValidationError`] when a client carries a negative billed
/// value or salary. Such input is rejected, never corrected.
pub fn aggregate(
    clients: &[Client],
    month: u32,
    year: i32,
) -> Result<MonthlySnapshot, ValidationError> {
    let mut billed = Decimal::ZERO;
    let mut costs = Decimal::ZERO;

    for client in clients {
        client.validate()?;
        billed += monthly_amount(client, month, year);
        for employee in &client.employees {
            costs += employee.salary;
        }
    }

    let urssaf = billed * URSSAF_RATE;
    Ok(MonthlySnapshot {
        billed,
        urssaf,
        costs,
        gross: billed - costs,
        net: billed - urssaf - costs,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::model::{
        ClientId, ClientStatus, ContractStatus, Employee, PaymentMethod,
    };

    use super::*;

    fn client(value: Decimal, frequency: BillingFrequency) -> Client {
        Client {
            id: ClientId("c1".to_owned()),
            name: "Residencia Alvalade".to_owned(),
            client_status: ClientStatus::Ativo,
            client_type: "Imovel".to_owned(),
            start_date: None,
            service_address: None,
            billing_address: None,
            value,
            frequency,
            method: PaymentMethod::Transferencia,
            service: None,
            contract: ContractStatus::ComContrato,
            employees: Vec::new(),
            devis: Vec::new(),
        }
    }

    #[test]
    fn mensal_bills_the_nominal_value() {
        let subject = client(dec!(1000), BillingFrequency::Mensal);
        assert_eq!(monthly_amount(&subject, 3, 2024), dec!(1000));
    }

    #[test]
    fn semanal_applies_the_weeks_per_month_factor() {
        let subject = client(dec!(100), BillingFrequency::Semanal);
        assert_eq!(monthly_amount(&subject, 3, 2024), dec!(433.00));
    }

    #[test]
    fn pagamento_unico_counts_only_in_its_start_month() {
        let mut subject = client(dec!(500), BillingFrequency::PagamentoUnico);
        subject.start_date = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).single();

        assert_eq!(monthly_amount(&subject, 3, 2024), dec!(500));
        assert_eq!(monthly_amount(&subject, 4, 2024), Decimal::ZERO);
        assert_eq!(monthly_amount(&subject, 3, 2023), Decimal::ZERO);
    }

    #[test]
    fn pagamento_unico_without_start_date_bills_nothing() {
        let subject = client(dec!(500), BillingFrequency::PagamentoUnico);
        assert_eq!(monthly_amount(&subject, 3, 2024), Decimal::ZERO);
    }

    #[test]
    fn unknown_frequency_falls_back_to_mensal() {
        let subject = client(dec!(250), BillingFrequency::Outro);
        assert_eq!(monthly_amount(&subject, 3, 2024), dec!(250));
    }

    #[test]
    fn aggregate_combines_revenue_tax_and_costs() {
        let mut first = client(dec!(1000), BillingFrequency::Mensal);
        first.employees.push(Employee {
            id: "e1".to_owned(),
            name: "Maria".to_owned(),
            salary: dec!(300),
        });
        let second = client(dec!(100), BillingFrequency::Semanal);

        let snapshot = aggregate(&[first, second], 3, 2024).expect("valid roster");
        assert_eq!(snapshot.billed, dec!(1433.00));
        assert_eq!(snapshot.costs, dec!(300.00));
        assert_eq!(snapshot.urssaf, dec!(341.054));
        assert_eq!(snapshot.gross, dec!(1133.00));
        assert_eq!(snapshot.net, dec!(791.946));

        let rounded = snapshot.rounded();
        assert_eq!(rounded.urssaf, dec!(341.05));
        assert_eq!(rounded.net, dec!(791.95));
    }

    #[test]
    fn aggregate_includes_clients_of_every_status() {
        let mut speculative = client(dec!(200), BillingFrequency::Mensal);
        speculative.client_status = ClientStatus::Especulativo;
        let mut inactive = client(dec!(300), BillingFrequency::Mensal);
        inactive.client_status = ClientStatus::Inativo;

        let snapshot = aggregate(&[speculative, inactive], 1, 2024).expect("valid roster");
        assert_eq!(snapshot.billed, dec!(500));
    }

    #[test]
    fn aggregate_rejects_negative_values() {
        let subject = client(dec!(-10), BillingFrequency::Mensal);
        assert!(aggregate(&[subject], 1, 2024).is_err());
    }

    #[test]
    fn empty_roster_aggregates_to_zero() {
        let snapshot = aggregate(&[], 1, 2024).expect("empty roster");
        assert_eq!(snapshot.billed, Decimal::ZERO);
        assert_eq!(snapshot.net, Decimal::ZERO);
    }

    #[test]
    fn snapshot_serializes_as_plain_numbers() {
        let snapshot = MonthlySnapshot {
            billed: dec!(1433.00),
            urssaf: dec!(341.05),
            costs: dec!(300.00),
            gross: dec!(1133.00),
            net: dec!(791.95),
        };
        let json = serde_json::to_value(&snapshot).expect("snapshot json");
        assert_eq!(json["billed"], 1433.0);
        assert_eq!(json["urssaf"], 341.05);
    }
}
