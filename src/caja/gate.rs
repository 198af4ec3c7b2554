use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::session::{Actor, ActorRole, CashSession, SessionStatus};
use crate::error::{CajaError, Result};

/// How an administrator looking at their own open session is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminOwnSession {
    #[default]
    Owner,
    Administrator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Owner,
    Administrator,
}

impl Capability {
    pub fn resolve(actor: &Actor, session: &CashSession, policy: AdminOwnSession) -> Self {
        match actor.role {
            ActorRole::Owner => Capability::Owner,
            ActorRole::Administrator if !session.is_owned_by(actor) => Capability::Administrator,
            ActorRole::Administrator => match policy {
                AdminOwnSession::Owner => Capability::Owner,
                AdminOwnSession::Administrator => Capability::Administrator,
            },
        }
    }

    pub fn is_admin(self) -> bool {
        self == Capability::Administrator
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClosureKind {
    #[serde(rename = "NORMAL")]
    Normal,
    #[serde(rename = "ADMINISTRATIVE", alias = "ADMINISTRATIVO")]
    Administrative,
}

impl fmt::Display for ClosureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClosureKind::Normal => write!(f, "normal"),
            ClosureKind::Administrative => write!(f, "administrative"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionAction {
    RegisterIncome,
    RegisterExpense,
    Close(ClosureKind),
    PrintReport,
}

impl SessionAction {
    pub const ALL: [SessionAction; 5] = [
        SessionAction::RegisterIncome,
        SessionAction::RegisterExpense,
        SessionAction::Close(ClosureKind::Normal),
        SessionAction::Close(ClosureKind::Administrative),
        SessionAction::PrintReport,
    ];

    fn bit(self) -> u8 {
        match self {
            SessionAction::RegisterIncome => 1,
            SessionAction::RegisterExpense => 1 << 1,
            SessionAction::Close(ClosureKind::Normal) => 1 << 2,
            SessionAction::Close(ClosureKind::Administrative) => 1 << 3,
            SessionAction::PrintReport => 1 << 4,
        }
    }

    /// Button caption in the action bar.
    pub fn label(self) -> &'static str {
        match self {
            SessionAction::RegisterIncome => "Registrar ingreso",
            SessionAction::RegisterExpense => "Registrar egreso",
            SessionAction::Close(ClosureKind::Normal) => "Cerrar caja",
            SessionAction::Close(ClosureKind::Administrative) => "Cierre administrativo",
            SessionAction::PrintReport => "Imprimir reporte",
        }
    }

    /// CLI subcommand that triggers the action.
    pub fn command(self) -> &'static str {
        match self {
            SessionAction::RegisterIncome => "income",
            SessionAction::RegisterExpense => "expense",
            SessionAction::Close(_) => "close",
            SessionAction::PrintReport => "print",
        }
    }

    /// Overrides another user's session.
    pub fn is_destructive(self) -> bool {
        self == SessionAction::Close(ClosureKind::Administrative)
    }
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionAction::RegisterIncome => write!(f, "register income"),
            SessionAction::RegisterExpense => write!(f, "register expense"),
            SessionAction::Close(kind) => write!(f, "{kind} close"),
            SessionAction::PrintReport => write!(f, "print report"),
        }
    }
}

/// Immutable set of reachable actions.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct AllowedActions(u8);

impl AllowedActions {
    pub fn for_session(status: SessionStatus, capability: Capability) -> Self {
        let actions: &[SessionAction] = match (status, capability) {
            (SessionStatus::Closed, _) => &[SessionAction::PrintReport],
            (SessionStatus::Open, Capability::Owner) => &[
                SessionAction::RegisterIncome,
                SessionAction::RegisterExpense,
                SessionAction::Close(ClosureKind::Normal),
            ],
            (SessionStatus::Open, Capability::Administrator) => {
                &[SessionAction::Close(ClosureKind::Administrative)]
            }
        };
        AllowedActions(actions.iter().fold(0, |bits, a| bits | a.bit()))
    }

    pub fn contains(&self, action: SessionAction) -> bool {
        self.0 & action.bit() != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = SessionAction> + '_ {
        SessionAction::ALL
            .into_iter()
            .filter(move |a| self.contains(*a))
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn closure_kind(&self) -> Option<ClosureKind> {
        self.iter().find_map(|a| match a {
            SessionAction::Close(kind) => Some(kind),
            _ => None,
        })
    }
}

impl fmt::Debug for AllowedActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Caller-supplied callbacks for each action.
pub trait ActionHandler {
    fn register_income(&mut self, session: &CashSession) -> Result<()>;
    fn register_expense(&mut self, session: &CashSession) -> Result<()>;
    fn close(&mut self, session: &CashSession, kind: ClosureKind) -> Result<()>;
    fn print_report(&mut self, session: &CashSession) -> Result<()>;
}

/// Which session actions are reachable for a (status, capability) pair.
///
/// The gate never mutates a session. Callers hand it an [`ActionHandler`] and
/// it forwards to the matching method only when the action is allowed.
#[derive(Debug, Clone, Copy)]
pub struct ActionGate<'a> {
    session: &'a CashSession,
    capability: Capability,
    allowed: AllowedActions,
}

impl<'a> ActionGate<'a> {
    pub fn resolve(session: &'a CashSession, actor: &Actor, policy: AdminOwnSession) -> Self {
        let capability = Capability::resolve(actor, session, policy);
        let allowed = AllowedActions::for_session(session.status, capability);
        debug!(
            session = %session.id,
            status = %session.status,
            ?capability,
            ?allowed,
            "resolved session actions"
        );
        Self {
            session,
            capability,
            allowed,
        }
    }

    pub fn session(&self) -> &'a CashSession {
        self.session
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn allowed(&self) -> AllowedActions {
        self.allowed
    }

    pub fn closure_kind(&self) -> Option<ClosureKind> {
        self.allowed.closure_kind()
    }

    pub fn dispatch<H>(&self, action: SessionAction, handler: &mut H) -> Result<()>
    where
        H: ActionHandler + ?Sized,
    {
        if !self.allowed.contains(action) {
            return Err(CajaError::ActionNotAllowed {
                action,
                status: self.session.status,
            });
        }

        debug!(session = %self.session.id, %action, "dispatching action");
        match action {
            SessionAction::RegisterIncome => handler.register_income(self.session),
            SessionAction::RegisterExpense => handler.register_expense(self.session),
            SessionAction::Close(kind) => handler.close(self.session, kind),
            SessionAction::PrintReport => handler.print_report(self.session),
        }
    }

    /// Close with whichever closure variant the capability allows.
    pub fn close<H>(&self, handler: &mut H) -> Result<()>
    where
        H: ActionHandler + ?Sized,
    {
        let kind = self.closure_kind().unwrap_or(match self.capability {
            Capability::Owner => ClosureKind::Normal,
            Capability::Administrator => ClosureKind::Administrative,
        });
        self.dispatch(SessionAction::Close(kind), handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caja::session::Owner;

    fn session(status: SessionStatus, owner_id: &str) -> CashSession {
        CashSession {
            id: "c-1".to_string(),
            status,
            owner: Owner {
                id: owner_id.to_string(),
                name: "Rosa".to_string(),
            },
            opened_at: None,
            closed_at: None,
            opening_amount: None,
            breakdown: Default::default(),
            summary: Default::default(),
        }
    }

    fn actor(id: &str, role: ActorRole) -> Actor {
        Actor {
            user_id: id.to_string(),
            name: "someone".to_string(),
            role,
        }
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl ActionHandler for Recorder {
        fn register_income(&mut self, _: &CashSession) -> Result<()> {
            self.calls.push("income".to_string());
            Ok(())
        }
        fn register_expense(&mut self, _: &CashSession) -> Result<()> {
            self.calls.push("expense".to_string());
            Ok(())
        }
        fn close(&mut self, _: &CashSession, kind: ClosureKind) -> Result<()> {
            self.calls.push(format!("close:{kind}"));
            Ok(())
        }
        fn print_report(&mut self, _: &CashSession) -> Result<()> {
            self.calls.push("print".to_string());
            Ok(())
        }
    }

    #[test]
    fn open_session_for_owner() {
        let s = session(SessionStatus::Open, "u1");
        let gate = ActionGate::resolve(&s, &actor("u1", ActorRole::Owner), Default::default());
        let allowed = gate.allowed();

        assert!(allowed.contains(SessionAction::RegisterIncome));
        assert!(allowed.contains(SessionAction::RegisterExpense));
        assert!(allowed.contains(SessionAction::Close(ClosureKind::Normal)));
        assert!(!allowed.contains(SessionAction::Close(ClosureKind::Administrative)));
        assert!(!allowed.contains(SessionAction::PrintReport));
        assert_eq!(allowed.len(), 3);
        assert_eq!(gate.closure_kind(), Some(ClosureKind::Normal));
    }

    #[test]
    fn open_session_for_admin_on_another_owner() {
        let s = session(SessionStatus::Open, "u1");
        let gate = ActionGate::resolve(
            &s,
            &actor("admin", ActorRole::Administrator),
            Default::default(),
        );

        assert!(gate.capability().is_admin());
        let actions: Vec<_> = gate.allowed().iter().collect();
        assert_eq!(actions, vec![SessionAction::Close(ClosureKind::Administrative)]);
        assert!(actions[0].is_destructive());
    }

    #[test]
    fn closed_session_only_prints_for_every_role() {
        let s = session(SessionStatus::Closed, "u1");
        for a in [
            actor("u1", ActorRole::Owner),
            actor("u2", ActorRole::Owner),
            actor("u1", ActorRole::Administrator),
            actor("admin", ActorRole::Administrator),
        ] {
            for policy in [AdminOwnSession::Owner, AdminOwnSession::Administrator] {
                let gate = ActionGate::resolve(&s, &a, policy);
                let actions: Vec<_> = gate.allowed().iter().collect();
                assert_eq!(actions, vec![SessionAction::PrintReport]);
                assert_eq!(gate.closure_kind(), None);
            }
        }
    }

    #[test]
    fn admin_on_own_session_follows_policy() {
        let s = session(SessionStatus::Open, "boss");
        let me = actor("boss", ActorRole::Administrator);

        let as_owner = ActionGate::resolve(&s, &me, AdminOwnSession::Owner);
        assert_eq!(as_owner.capability(), Capability::Owner);
        assert!(as_owner.allowed().contains(SessionAction::RegisterIncome));

        let as_admin = ActionGate::resolve(&s, &me, AdminOwnSession::Administrator);
        assert_eq!(as_admin.capability(), Capability::Administrator);
        assert!(!as_admin.allowed().contains(SessionAction::RegisterIncome));
    }

    #[test]
    fn dispatch_forwards_allowed_actions() {
        let s = session(SessionStatus::Open, "u1");
        let gate = ActionGate::resolve(&s, &actor("u1", ActorRole::Owner), Default::default());
        let mut recorder = Recorder::default();

        gate.dispatch(SessionAction::RegisterIncome, &mut recorder).unwrap();
        gate.dispatch(SessionAction::RegisterExpense, &mut recorder).unwrap();
        gate.close(&mut recorder).unwrap();

        assert_eq!(recorder.calls, vec!["income", "expense", "close:normal"]);
    }

    #[test]
    fn dispatch_refuses_unreachable_actions() {
        let s = session(SessionStatus::Open, "u1");
        let gate = ActionGate::resolve(
            &s,
            &actor("admin", ActorRole::Administrator),
            Default::default(),
        );
        let mut recorder = Recorder::default();

        let err = gate
            .dispatch(SessionAction::RegisterIncome, &mut recorder)
            .unwrap_err();
        assert!(matches!(err, CajaError::ActionNotAllowed { .. }));
        assert!(gate.dispatch(SessionAction::PrintReport, &mut recorder).is_err());

        gate.close(&mut recorder).unwrap();
        assert_eq!(recorder.calls, vec!["close:administrative"]);
    }

    #[test]
    fn closing_a_closed_session_is_refused() {
        let s = session(SessionStatus::Closed, "u1");
        let gate = ActionGate::resolve(&s, &actor("u1", ActorRole::Owner), Default::default());
        let mut recorder = Recorder::default();

        let err = gate.close(&mut recorder).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Action 'normal close' is not available for a CLOSED session"
        );
        assert!(recorder.calls.is_empty());
    }
}
