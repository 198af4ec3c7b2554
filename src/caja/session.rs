use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::breakdown::PaymentBreakdown;
use super::money::MoneyValue;
use super::summary::OperationalSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    #[serde(rename = "OPEN", alias = "ABIERTA")]
    Open,
    #[serde(rename = "CLOSED", alias = "CERRADA")]
    Closed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Open => write!(f, "OPEN"),
            SessionStatus::Closed => write!(f, "CLOSED"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum ActorRole {
    #[serde(rename = "OWNER", alias = "CAJERO")]
    #[value(name = "owner", alias = "cajero")]
    Owner,
    #[serde(rename = "ADMINISTRATOR", alias = "ADMIN")]
    #[value(name = "admin", aliases = ["administrator", "administrador"])]
    Administrator,
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorRole::Owner => write!(f, "owner"),
            ActorRole::Administrator => write!(f, "admin"),
        }
    }
}

/// The logged-in user operating the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: String,
    pub name: String,
    pub role: ActorRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "nombre", alias = "name")]
    pub name: String,
}

/// Read-only snapshot of one cash-drawer period, as served by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashSession {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "estado", alias = "status")]
    pub status: SessionStatus,
    #[serde(rename = "usuario", alias = "owner")]
    pub owner: Owner,
    #[serde(rename = "fecha_apertura", alias = "opened_at", default)]
    pub opened_at: Option<DateTime<Utc>>,
    #[serde(rename = "fecha_cierre", alias = "closed_at", default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(rename = "monto_inicial", alias = "opening_amount", default)]
    pub opening_amount: Option<MoneyValue>,
    #[serde(rename = "desglose", alias = "breakdown", default)]
    pub breakdown: PaymentBreakdown,
    #[serde(rename = "resumen", alias = "summary", default)]
    pub summary: OperationalSummary,
}

impl CashSession {
    pub fn is_open(&self) -> bool {
        self.status == SessionStatus::Open
    }

    pub fn is_owned_by(&self, actor: &Actor) -> bool {
        self.owner.id == actor.user_id
    }
}

/// Accept identifiers serialized either as JSON strings or numbers.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
    })
}
