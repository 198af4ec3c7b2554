use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{icon_glyph, timestamp};
use crate::caja::{
    reconcile, summarize, ActionGate, AllowedActions, CashSession, CurrencyFormat,
    ReconciliationRow, SessionAction, SessionStatus, StatRow, Tone,
};

#[derive(Tabled)]
struct BreakdownRow {
    #[tabled(rename = "MÉTODO")]
    method: String,
    #[tabled(rename = "MONTO")]
    amount: String,
    #[tabled(rename = "VERIFICACIÓN")]
    note: String,
}

/// KPI cards side by side: labels on top, values below.
pub fn stat_cards(rows: &[StatRow]) -> String {
    let mut builder = Builder::default();
    builder.push_record(rows.iter().map(|r| r.label.to_string()));
    builder.push_record(rows.iter().map(|r| {
        let value = match r.unit {
            Some(unit) => format!("{} {unit}", r.value),
            None => r.value.clone(),
        };
        match r.tone {
            Tone::Normal => value,
            Tone::Warning => format!("⚠ {value}"),
        }
    }));
    builder.build().with(Style::rounded()).to_string()
}

pub fn breakdown_table(rows: &[ReconciliationRow]) -> String {
    let rows: Vec<BreakdownRow> = rows
        .iter()
        .map(|r| BreakdownRow {
            method: format!("{} {}", icon_glyph(r.icon), r.label),
            amount: r.formatted.clone(),
            note: r.note.unwrap_or("").to_string(),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// One line per reachable action, with the command that triggers it.
pub fn action_bar(session_id: &str, actions: AllowedActions) -> String {
    if actions.is_empty() {
        return "Sin acciones disponibles".to_string();
    }

    actions
        .iter()
        .map(|action| {
            let caption = if action.is_destructive() {
                format!("[! {}]", action.label())
            } else {
                format!("[{}]", action.label())
            };
            let usage = match action {
                SessionAction::RegisterIncome | SessionAction::RegisterExpense => format!(
                    "caja {} {session_id} --amount <monto> --concept <texto>",
                    action.command()
                ),
                SessionAction::Close(_) => {
                    format!("caja close {session_id} --counted <efectivo contado>")
                }
                SessionAction::PrintReport => format!("caja print {session_id}"),
            };
            format!("{caption:<26} {usage}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn status_label(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::Open => "ABIERTA",
        SessionStatus::Closed => "CERRADA",
    }
}

/// Full view of one session: KPIs, desglose and action bar.
pub fn session_detail(gate: &ActionGate<'_>, fmt: &CurrencyFormat) -> String {
    let session: &CashSession = gate.session();
    let mut out = String::new();

    out.push_str(&format!(
        "Caja #{} · {} · {}\n",
        session.id,
        status_label(session.status),
        session.owner.name
    ));
    out.push_str(&format!(
        "Apertura: {}   Cierre: {}   Monto inicial: {}\n",
        timestamp(session.opened_at.as_ref()),
        timestamp(session.closed_at.as_ref()),
        fmt.format(session.opening_amount.as_ref())
    ));
    if gate.capability().is_admin() {
        out.push_str("Vista de administrador: los movimientos quedan a cargo del cajero.\n");
    }
    out.push('\n');

    out.push_str(&stat_cards(&summarize(&session.summary, fmt)));
    out.push_str("\n\nDesglose por método de pago\n");
    out.push_str(&breakdown_table(&reconcile(&session.breakdown, fmt)));
    out.push_str("\n\nAcciones\n");
    out.push_str(&action_bar(&session.id, gate.allowed()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caja::{Actor, ActorRole, ClosureKind};

    fn session(status: &str) -> CashSession {
        serde_json::from_str(&format!(
            r#"{{
                "id": 12,
                "estado": "{status}",
                "usuario": {{ "id": 7, "nombre": "Rosa" }},
                "desglose": {{"EFECTIVO":120.5,"TARJETA":300,"YAPE":40,"PLIN":10,"TRANSFERENCIA":0}},
                "resumen": {{ "cantidad_ventas": 0, "ticket_promedio": 0 }}
            }}"#
        ))
        .unwrap()
    }

    fn owner() -> Actor {
        Actor {
            user_id: "7".to_string(),
            name: "Rosa".to_string(),
            role: ActorRole::Owner,
        }
    }

    #[test]
    fn detail_shows_breakdown_and_owner_actions() {
        let s = session("OPEN");
        let gate = ActionGate::resolve(&s, &owner(), Default::default());
        let out = session_detail(&gate, &CurrencyFormat::default());

        assert!(out.contains("Caja #12 · ABIERTA · Rosa"));
        assert!(out.contains("S/ 50.00"));
        assert!(out.contains("S/ 120.50"));
        assert!(out.contains("0 tickets"));
        assert!(out.contains("[Registrar ingreso]"));
        assert!(out.contains("[Registrar egreso]"));
        assert!(out.contains("[Cerrar caja]"));
        assert!(!out.contains("Cierre administrativo"));
        assert!(!out.contains("Imprimir reporte"));
    }

    #[test]
    fn closed_detail_only_offers_print() {
        let s = session("CLOSED");
        let gate = ActionGate::resolve(&s, &owner(), Default::default());
        let out = session_detail(&gate, &CurrencyFormat::default());

        assert!(out.contains("[Imprimir reporte]"));
        assert!(out.contains("caja print 12"));
        assert!(!out.contains("Registrar"));
        assert!(!out.contains("[Cerrar caja]"));
    }

    #[test]
    fn administrative_close_is_marked_destructive() {
        let allowed =
            AllowedActions::for_session(SessionStatus::Open, crate::caja::Capability::Administrator);
        let bar = action_bar("3", allowed);
        assert!(bar.starts_with("[! Cierre administrativo]"));
        assert!(allowed.contains(SessionAction::Close(ClosureKind::Administrative)));
    }

    #[test]
    fn returns_card_uses_warning_marker() {
        let rows = summarize(&Default::default(), &CurrencyFormat::default());
        assert!(stat_cards(&rows).contains("⚠ 0 (—)"));
    }
}
