use tabled::builder::Builder;
use tabled::settings::Style;

use super::{session::action_bar, timestamp};
use crate::caja::{CurrencyFormat, SessionStatus};
use crate::monitor::{MonitorView, SessionCard};

pub fn session_card(card: &SessionCard<'_>, fmt: &CurrencyFormat) -> String {
    let session = card.session;
    let title = if card.is_admin {
        format!("Caja #{} · {} [supervisión]", session.id, session.owner.name)
    } else {
        format!("Caja #{} · {}", session.id, session.owner.name)
    };
    let status = match session.status {
        SessionStatus::Open => "ABIERTA",
        SessionStatus::Closed => "CERRADA",
    };

    let mut builder = Builder::default();
    builder.push_record([title, status.to_string()]);
    builder.push_record([
        "Apertura".to_string(),
        timestamp(session.opened_at.as_ref()),
    ]);
    builder.push_record([
        "Ventas".to_string(),
        format!("{} tickets", session.summary.sale_count),
    ]);
    builder.push_record([
        "Ticket promedio".to_string(),
        fmt.format(session.summary.average_ticket.as_ref()),
    ]);
    builder.push_record([
        "Efectivo".to_string(),
        fmt.format(session.breakdown.cash.as_ref()),
    ]);

    let mut out = builder.build().with(Style::rounded()).to_string();
    out.push('\n');
    out.push_str(&action_bar(&session.id, card.actions));
    out
}

pub fn monitor(view: &MonitorView<'_>, fmt: &CurrencyFormat) -> String {
    match view {
        MonitorView::Loading => "⠋ Cargando cajas abiertas…".to_string(),
        MonitorView::Error { message, hint } => {
            format!("✖ No se pudo cargar el monitor: {message}\n  {hint}")
        }
        MonitorView::Empty {
            title,
            call_to_action,
        } => format!("    ┌───────┐\n    │  $ 0  │\n    └───────┘\n{title}\n{call_to_action}"),
        MonitorView::Grid(cards) => {
            let mut out = format!("Cajas abiertas: {}\n", cards.len());
            for card in cards {
                out.push('\n');
                out.push_str(&session_card(card, fmt));
                out.push('\n');
            }
            out
        }
    }
}
