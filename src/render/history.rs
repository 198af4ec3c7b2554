use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::timestamp;
use crate::caja::{ClosureKind, ClosureRecord, CurrencyFormat, Page};

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "CAJA")]
    session: String,
    #[tabled(rename = "CAJERO")]
    owner: String,
    #[tabled(rename = "APERTURA")]
    opened: String,
    #[tabled(rename = "CIERRE")]
    closed: String,
    #[tabled(rename = "TIPO")]
    kind: String,
    #[tabled(rename = "ESPERADO")]
    expected: String,
    #[tabled(rename = "CONTADO")]
    counted: String,
    #[tabled(rename = "DIFERENCIA")]
    difference: String,
}

pub fn history_table(page: &Page<ClosureRecord>, fmt: &CurrencyFormat) -> String {
    if page.items.is_empty() {
        return "No hay cierres registrados para los filtros indicados.".to_string();
    }

    let rows: Vec<HistoryRow> = page
        .items
        .iter()
        .map(|r| HistoryRow {
            session: format!("#{}", r.session_id),
            owner: r.owner.name.clone(),
            opened: timestamp(r.opened_at.as_ref()),
            closed: timestamp(r.closed_at.as_ref()),
            kind: match r.kind {
                ClosureKind::Normal => "Normal".to_string(),
                ClosureKind::Administrative => match &r.closed_by {
                    Some(by) => format!("Administrativo ({by})"),
                    None => "Administrativo".to_string(),
                },
            },
            expected: fmt.format(r.expected_cash.as_ref()),
            counted: fmt.format(r.counted_cash.as_ref()),
            difference: fmt.format(r.difference.as_ref()),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    format!(
        "{table}\nPágina {} de {} ({} cierres)",
        page.page,
        page.total_pages().max(1),
        page.total
    )
}
