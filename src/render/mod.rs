mod history;
mod monitor;
mod session;

pub use history::history_table;
pub use monitor::{monitor, session_card};
pub use session::{action_bar, breakdown_table, session_detail, stat_cards};

use chrono::{DateTime, Local, Utc};
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::caja::Actor;
use crate::config::{Config, Theme};
use crate::page::Tab;

pub const MENU_ENTRIES: [&str; 3] = ["Perfil", "Preferencias", "Cerrar sesión"];

/// Header chrome: business, search, notifications, theme, user and settings menu.
pub fn header(config: &Config, actor: Option<&Actor>) -> String {
    let theme = match config.display.theme {
        Theme::Light => "☀ Claro",
        Theme::Dark => "☾ Oscuro",
    };
    let user = actor
        .map(|a| format!("{} ({})", a.name, a.role))
        .unwrap_or_else(|| "Sin sesión".to_string());

    let mut builder = Builder::default();
    builder.push_record([
        format!("{} · Caja", config.business.name),
        "🔍 Buscar…".to_string(),
        "🔔".to_string(),
        theme.to_string(),
        user,
        format!("⚙ {}", MENU_ENTRIES.join(" | ")),
    ]);
    builder.build().with(Style::rounded()).to_string()
}

pub fn tab_bar(active: Tab) -> String {
    Tab::ALL
        .iter()
        .map(|tab| {
            if *tab == active {
                format!("[ {} ]", tab.title())
            } else {
                format!("  {}  ", tab.title())
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn open_session_offer() -> String {
    "No tienes una caja abierta. Ábrela con: caja open --amount <monto inicial>".to_string()
}

fn timestamp(value: Option<&DateTime<Utc>>) -> String {
    value
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "—".to_string())
}

fn icon_glyph(icon: &str) -> &'static str {
    match icon {
        "banknote" => "💵",
        "credit-card" => "💳",
        "smartphone" => "📱",
        "landmark" => "🏦",
        _ => "•",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_bar_marks_the_active_tab() {
        let bar = tab_bar(Tab::History);
        assert!(bar.contains("[ Historial de cierres ]"));
        assert!(bar.contains("  Monitor activo  "));
    }

    #[test]
    fn header_lists_settings_menu() {
        let config: Config = toml::from_str(crate::config::CONFIG_TEMPLATE).unwrap();
        let out = header(&config, None);
        assert!(out.contains("Mi Negocio · Caja"));
        assert!(out.contains("Perfil | Preferencias | Cerrar sesión"));
        assert!(out.contains("Sin sesión"));
    }
}
