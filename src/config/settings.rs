use serde::{Deserialize, Serialize};

use crate::caja::{AdminOwnSession, CurrencyFormat, DEFAULT_FALLBACK};

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub business: Business,
    pub api: ApiSettings,
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub policy: PolicySettings,
    #[serde(default)]
    pub report: ReportSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Business {
    pub name: String,
    #[serde(default)]
    pub ruc: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub token: Option<String>,
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DisplaySettings {
    pub currency_symbol: String,
    pub thousands_separator: String,
    pub decimal_separator: String,
    pub fallback: String,
    pub theme: Theme,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            currency_symbol: "S/".to_string(),
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            fallback: DEFAULT_FALLBACK.to_string(),
            theme: Theme::default(),
        }
    }
}

impl DisplaySettings {
    pub fn currency(&self) -> CurrencyFormat {
        CurrencyFormat {
            symbol: self.currency_symbol.clone(),
            thousands_separator: self.thousands_separator.clone(),
            decimal_separator: self.decimal_separator.clone(),
            fallback: self.fallback.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct PolicySettings {
    #[serde(default)]
    pub admin_own_session: AdminOwnSession,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ReportSettings {
    pub output_dir: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output_dir: "reports".to_string(),
        }
    }
}
