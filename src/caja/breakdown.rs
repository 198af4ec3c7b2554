use serde::{Deserialize, Serialize};

use super::money::{CurrencyFormat, MoneyValue};

/// Per-method totals for a session. Missing methods mean "no data".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    #[serde(rename = "EFECTIVO", alias = "CASH", default)]
    pub cash: Option<MoneyValue>,
    #[serde(rename = "TARJETA", alias = "CARD", default)]
    pub card: Option<MoneyValue>,
    #[serde(rename = "YAPE", alias = "WALLET_A", default)]
    pub wallet_a: Option<MoneyValue>,
    #[serde(rename = "PLIN", alias = "WALLET_B", default)]
    pub wallet_b: Option<MoneyValue>,
    #[serde(rename = "TRANSFERENCIA", alias = "TRANSFER", default)]
    pub transfer: Option<MoneyValue>,
}

impl PaymentBreakdown {
    /// Both wallet channels reported as one bucket. A side without a
    /// numeric amount counts as zero.
    pub fn wallets(&self) -> Option<f64> {
        let a = self.wallet_a.as_ref().and_then(MoneyValue::as_number);
        let b = self.wallet_b.as_ref().and_then(MoneyValue::as_number);
        match (a, b) {
            (None, None) => None,
            (a, b) => Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Cash,
    Card,
    Wallets,
    Transfer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationRow {
    pub bucket: Bucket,
    pub label: &'static str,
    pub icon: &'static str,
    pub amount: Option<f64>,
    pub formatted: String,
    /// What the amount must be checked against when closing.
    pub note: Option<&'static str>,
}

/// Build the four display rows of the desglose.
pub fn reconcile(breakdown: &PaymentBreakdown, fmt: &CurrencyFormat) -> Vec<ReconciliationRow> {
    let row = |bucket, label, icon, value: Option<MoneyValue>, note| ReconciliationRow {
        bucket,
        label,
        icon,
        amount: value.as_ref().and_then(MoneyValue::as_number),
        formatted: fmt.format(value.as_ref()),
        note,
    };

    vec![
        row(
            Bucket::Cash,
            "Efectivo",
            "banknote",
            breakdown.cash.clone(),
            Some("Debe coincidir con el conteo físico de la caja"),
        ),
        row(
            Bucket::Card,
            "Tarjeta",
            "credit-card",
            breakdown.card.clone(),
            Some("Debe cuadrar con el cierre de lote del POS"),
        ),
        row(
            Bucket::Wallets,
            "Billeteras (Yape + Plin)",
            "smartphone",
            breakdown.wallets().map(MoneyValue::Number),
            Some("Debe cuadrar con el celular registrado"),
        ),
        row(
            Bucket::Transfer,
            "Transferencias",
            "landmark",
            breakdown.transfer.clone(),
            None,
        ),
    ]
}
