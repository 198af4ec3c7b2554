mod http;

pub use http::HttpApi;

use serde::{Deserialize, Serialize};

use crate::caja::{CashSession, ClosureKind, ClosureRecord, HistoryFilter, Page};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementKind {
    #[serde(rename = "INGRESO", alias = "INCOME")]
    Income,
    #[serde(rename = "EGRESO", alias = "EXPENSE")]
    Expense,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenSessionRequest {
    pub usuario_id: String,
    pub monto_inicial: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MovementRequest {
    #[serde(rename = "tipo")]
    pub kind: MovementKind,
    #[serde(rename = "monto")]
    pub amount: f64,
    #[serde(rename = "concepto")]
    pub concept: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CloseRequest {
    #[serde(rename = "tipo")]
    pub kind: ClosureKind,
    #[serde(rename = "monto_contado")]
    pub counted_cash: f64,
    #[serde(rename = "observacion", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Movement {
    #[serde(deserialize_with = "crate::caja::string_or_number")]
    pub id: String,
    #[serde(rename = "tipo", alias = "kind")]
    pub kind: MovementKind,
    #[serde(rename = "monto", alias = "amount")]
    pub amount: f64,
    #[serde(rename = "concepto", alias = "concept", default)]
    pub concept: String,
}

/// Everything the dashboard needs from the cash register backend.
pub trait CajaApi {
    fn open_sessions(&self) -> Result<Vec<CashSession>>;
    fn session(&self, id: &str) -> Result<CashSession>;
    fn current_session(&self, user_id: &str) -> Result<Option<CashSession>>;
    fn closure_history(&self, filter: &HistoryFilter) -> Result<Page<ClosureRecord>>;
    fn open_session(&self, request: &OpenSessionRequest) -> Result<CashSession>;
    fn register_movement(&self, session_id: &str, request: &MovementRequest) -> Result<Movement>;
    fn close_session(&self, session_id: &str, request: &CloseRequest) -> Result<ClosureRecord>;
}
