use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::caja::{reconcile, summarize, CashSession, CurrencyFormat};
use crate::config::Business;
use crate::error::Result;

/// Columns of an 80mm thermal printer.
pub const WIDTH: usize = 48;

fn separator(ch: char) -> String {
    std::iter::repeat(ch).take(WIDTH).collect()
}

fn centered(text: &str) -> String {
    let len = text.chars().count();
    if len >= WIDTH {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((WIDTH - len) / 2), text)
}

/// Label on the left, value flush right.
fn amount_line(label: &str, value: &str) -> String {
    let used = label.chars().count() + value.chars().count();
    let pad = WIDTH.saturating_sub(used).max(1);
    format!("{label}{}{value}", " ".repeat(pad))
}

/// Closure ticket for a session, one line per entry.
pub fn render_report(session: &CashSession, business: &Business, fmt: &CurrencyFormat) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(centered(&business.name));
    if let Some(ruc) = &business.ruc {
        lines.push(centered(&format!("RUC: {ruc}")));
    }
    if let Some(address) = &business.address {
        lines.push(centered(address));
    }
    lines.push(separator('-'));
    lines.push(centered("CIERRE DE CAJA"));
    lines.push(separator('-'));

    lines.push(format!("Caja:     #{}", session.id));
    lines.push(format!("Cajero:   {}", session.owner.name));
    if let Some(opened) = session.opened_at {
        lines.push(format!(
            "Apertura: {}",
            opened.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        ));
    }
    if let Some(closed) = session.closed_at {
        lines.push(format!(
            "Cierre:   {}",
            closed.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        ));
    }
    lines.push(separator('='));

    lines.push("VENTAS".to_string());
    for row in summarize(&session.summary, fmt) {
        let value = match row.unit {
            Some(unit) => format!("{} {unit}", row.value),
            None => row.value,
        };
        lines.push(amount_line(&format!("{}:", row.label), &value));
    }
    lines.push(String::new());

    lines.push("FORMAS DE PAGO".to_string());
    for row in reconcile(&session.breakdown, fmt) {
        lines.push(amount_line(&format!("{}:", row.label), &row.formatted));
    }
    lines.push(separator('='));

    lines.push(amount_line(
        "Monto inicial:",
        &fmt.format(session.opening_amount.as_ref()),
    ));
    lines.push(String::new());
    lines.push(centered(&format!(
        "Impreso {}",
        Local::now().format("%Y-%m-%d %H:%M")
    )));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// `REPORTE-CAJA-<id>.txt`, with characters outside `[A-Za-z0-9_-]` in the
/// id replaced by `_`.
pub fn report_file_name(session_id: &str) -> String {
    let id: String = session_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("REPORTE-CAJA-{id}.txt")
}

/// Write the report to [`report_file_name`] inside `output_dir`.
pub fn write_report(
    session: &CashSession,
    business: &Business,
    fmt: &CurrencyFormat,
    output_dir: &Path,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(report_file_name(&session.id));
    fs::write(&path, render_report(session, business, fmt))?;
    info!(session = %session.id, path = %path.display(), "closure report written");
    Ok(path)
}
