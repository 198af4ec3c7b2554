use serde::{Deserialize, Serialize};

use crate::caja::{Actor, CashSession};

/// Who is logged in. Written by `caja login`, removed by `caja logout`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SessionRef {
    pub logged_in_at: chrono::DateTime<chrono::Utc>,
    pub actor: Actor,
}

/// Read-only session state handed to the page: the actor plus their current
/// cash session, if the backend reports one.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub actor: Actor,
    pub current: Option<CashSession>,
    /// False when the backend could not be asked; `current` is then unknown.
    pub resolved: bool,
}

impl SessionContext {
    pub fn unresolved(actor: Actor) -> Self {
        Self {
            actor,
            current: None,
            resolved: false,
        }
    }

    /// "Abrir caja" is offered only when the actor is known to have nothing
    /// open.
    pub fn can_open_session(&self) -> bool {
        self.resolved && self.current.as_ref().map_or(true, |s| !s.is_open())
    }
}
