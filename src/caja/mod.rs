mod breakdown;
mod gate;
mod history;
mod money;
mod session;
mod summary;

pub use breakdown::{reconcile, Bucket, PaymentBreakdown, ReconciliationRow};
pub use gate::{
    ActionGate, ActionHandler, AdminOwnSession, AllowedActions, Capability, ClosureKind,
    SessionAction,
};
pub use history::{parse_date, ClosureRecord, HistoryFilter, Page, MAX_PER_PAGE};
pub use money::{CurrencyFormat, MoneyValue, DEFAULT_FALLBACK};
pub use session::{Actor, ActorRole, CashSession, Owner, SessionStatus};
pub(crate) use session::string_or_number;
pub use summary::{summarize, OperationalSummary, StatRow, Tone};
