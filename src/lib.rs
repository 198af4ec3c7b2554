pub mod api;
pub mod caja;
pub mod config;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod page;
pub mod render;
pub mod report;

pub use api::{CajaApi, HttpApi};
pub use caja::{ActionGate, Actor, ActorRole, CashSession, CurrencyFormat, SessionStatus};
pub use config::{Config, SessionContext, SessionRef};
pub use error::{CajaError, Result};
