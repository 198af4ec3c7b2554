use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::gate::ClosureKind;
use super::money::MoneyValue;
use super::session::{string_or_number, Owner};
use crate::error::{CajaError, Result};

pub const MAX_PER_PAGE: u32 = 100;

/// One audited closure, as listed in the history tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosureRecord {
    #[serde(rename = "caja_id", alias = "session_id", deserialize_with = "string_or_number")]
    pub session_id: String,
    #[serde(rename = "usuario", alias = "owner")]
    pub owner: Owner,
    #[serde(rename = "fecha_apertura", alias = "opened_at", default)]
    pub opened_at: Option<DateTime<Utc>>,
    #[serde(rename = "fecha_cierre", alias = "closed_at", default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(rename = "tipo_cierre", alias = "closure_kind")]
    pub kind: ClosureKind,
    #[serde(rename = "cerrado_por", alias = "closed_by", default)]
    pub closed_by: Option<String>,
    #[serde(rename = "monto_esperado", alias = "expected_cash", default)]
    pub expected_cash: Option<MoneyValue>,
    #[serde(rename = "monto_contado", alias = "counted_cash", default)]
    pub counted_cash: Option<MoneyValue>,
    #[serde(rename = "diferencia", alias = "difference", default)]
    pub difference: Option<MoneyValue>,
    #[serde(rename = "observacion", alias = "note", default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        if self.per_page == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.per_page))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub owner: Option<String>,
    pub page: u32,
    pub per_page: u32,
}

impl Default for HistoryFilter {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            owner: None,
            page: 1,
            per_page: 20,
        }
    }
}

impl HistoryFilter {
    /// Build a filter from raw CLI input, validating dates and paging.
    pub fn parse(
        from: Option<&str>,
        to: Option<&str>,
        owner: Option<String>,
        page: u32,
        per_page: u32,
    ) -> Result<Self> {
        let filter = Self {
            from: from.map(parse_date).transpose()?,
            to: to.map(parse_date).transpose()?,
            owner,
            page,
            per_page,
        };
        filter.validate()?;
        Ok(filter)
    }

    pub fn validate(&self) -> Result<()> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(CajaError::InvalidFilter(format!(
                    "--from {from} is after --to {to}"
                )));
            }
        }
        if self.page == 0 {
            return Err(CajaError::InvalidFilter("pages start at 1".to_string()));
        }
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(CajaError::InvalidFilter(format!(
                "--per-page must be between 1 and {MAX_PER_PAGE}"
            )));
        }
        Ok(())
    }

    /// Query string pairs understood by the history endpoint.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(from) = self.from {
            pairs.push(("desde", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("hasta", to.format("%Y-%m-%d").to_string()));
        }
        if let Some(owner) = &self.owner {
            pairs.push(("usuario", owner.clone()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("per_page", self.per_page.to_string()));
        pairs
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| CajaError::InvalidDate(s.to_string()))
}
