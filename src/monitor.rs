use crate::caja::{ActionGate, Actor, AdminOwnSession, AllowedActions, CashSession};
use crate::error::{CajaError, Result};

pub const UNKNOWN_ERROR: &str = "Error desconocido";
pub const ERROR_HINT: &str =
    "Verifica que el backend esté disponible y que tu usuario tenga permisos de administrador.";
pub const EMPTY_TITLE: &str = "No hay cajas abiertas";
pub const EMPTY_CALL_TO_ACTION: &str =
    "Cuando un cajero abra su caja aparecerá aquí. Usa 'caja open --amount <monto>' para abrir la tuya.";

/// Lifecycle of one remote fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> FetchState<T> {
    /// Replace the state with a finished fetch. The last response received
    /// wins; there is no ordering between overlapping requests.
    pub fn receive(&mut self, result: Result<T>) {
        *self = match result {
            Ok(value) => FetchState::Ready(value),
            Err(err) => FetchState::Failed(upstream_message(&err)),
        };
    }

    pub fn from_result(result: Result<T>) -> Self {
        let mut state = FetchState::Loading;
        state.receive(result);
        state
    }
}

fn upstream_message(err: &CajaError) -> String {
    match err {
        CajaError::Api { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionCard<'a> {
    pub session: &'a CashSession,
    pub is_admin: bool,
    pub actions: AllowedActions,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MonitorView<'a> {
    Loading,
    Error {
        message: String,
        hint: &'static str,
    },
    Empty {
        title: &'static str,
        call_to_action: &'static str,
    },
    Grid(Vec<SessionCard<'a>>),
}

/// Active Monitor: one card per open cash session, for administrative
/// oversight.
pub fn monitor_view<'a>(
    state: &'a FetchState<Vec<CashSession>>,
    actor: &Actor,
    policy: AdminOwnSession,
) -> MonitorView<'a> {
    match state {
        FetchState::Loading => MonitorView::Loading,
        FetchState::Failed(message) => MonitorView::Error {
            message: if message.trim().is_empty() {
                UNKNOWN_ERROR.to_string()
            } else {
                message.clone()
            },
            hint: ERROR_HINT,
        },
        FetchState::Ready(sessions) if sessions.is_empty() => MonitorView::Empty {
            title: EMPTY_TITLE,
            call_to_action: EMPTY_CALL_TO_ACTION,
        },
        FetchState::Ready(sessions) => MonitorView::Grid(
            sessions
                .iter()
                .map(|session| {
                    let gate = ActionGate::resolve(session, actor, policy);
                    SessionCard {
                        session,
                        is_admin: gate.capability().is_admin(),
                        actions: gate.allowed(),
                    }
                })
                .collect(),
        ),
    }
}
