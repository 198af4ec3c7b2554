use serde::{Deserialize, Serialize};

use super::money::{CurrencyFormat, MoneyValue};

/// Operational KPIs for a session. The average ticket is computed upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationalSummary {
    #[serde(rename = "cantidad_ventas", alias = "sale_count", default)]
    pub sale_count: u64,
    #[serde(rename = "ticket_promedio", alias = "average_ticket", default)]
    pub average_ticket: Option<MoneyValue>,
    #[serde(rename = "cantidad_devoluciones", alias = "return_count", default)]
    pub return_count: u64,
    #[serde(rename = "monto_devoluciones", alias = "returned_amount", default)]
    pub returned_amount: Option<MoneyValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    /// Flags a revenue reduction.
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    pub label: &'static str,
    pub value: String,
    pub unit: Option<&'static str>,
    pub tone: Tone,
}

pub fn summarize(summary: &OperationalSummary, fmt: &CurrencyFormat) -> Vec<StatRow> {
    vec![
        StatRow {
            label: "Ventas",
            value: summary.sale_count.to_string(),
            unit: Some("tickets"),
            tone: Tone::Normal,
        },
        StatRow {
            label: "Ticket promedio",
            value: fmt.format(summary.average_ticket.as_ref()),
            unit: None,
            tone: Tone::Normal,
        },
        StatRow {
            label: "Devoluciones",
            value: format!(
                "{} ({})",
                summary.return_count,
                fmt.format(summary.returned_amount.as_ref())
            ),
            unit: None,
            tone: Tone::Warning,
        },
    ]
}
