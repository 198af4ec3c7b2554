use serde::{Deserialize, Serialize};

pub const DEFAULT_FALLBACK: &str = "—";

/// An amount as it arrives from the backend: usually a number, sometimes a
/// pre-rendered string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MoneyValue {
    Number(f64),
    Text(String),
}

impl From<f64> for MoneyValue {
    fn from(value: f64) -> Self {
        MoneyValue::Number(value)
    }
}

impl From<&str> for MoneyValue {
    fn from(value: &str) -> Self {
        MoneyValue::Text(value.to_string())
    }
}

impl MoneyValue {
    /// Numeric view of the value. Blank strings coerce to zero.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MoneyValue::Number(n) => Some(*n),
            MoneyValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Some(0.0)
                } else {
                    // "inf" and "NaN" parse as f64 but are not amounts.
                    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
                }
            }
        }
    }
}

/// Locale settings for currency output. Defaults to Peruvian soles.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub thousands_separator: String,
    pub decimal_separator: String,
    pub fallback: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "S/".to_string(),
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            fallback: DEFAULT_FALLBACK.to_string(),
        }
    }
}

impl CurrencyFormat {
    /// Format with the configured fallback.
    pub fn format(&self, value: Option<&MoneyValue>) -> String {
        self.format_or(value, &self.fallback)
    }

    /// Format an optional amount.
    ///
    /// Absent and non-finite values render as `fallback`. Strings that do not
    /// coerce to a number are returned unchanged.
    pub fn format_or(&self, value: Option<&MoneyValue>, fallback: &str) -> String {
        let Some(value) = value else {
            return fallback.to_string();
        };

        match value.as_number() {
            Some(n) if n.is_finite() => self.amount(n),
            Some(_) => fallback.to_string(),
            None => match value {
                MoneyValue::Text(s) => s.clone(),
                MoneyValue::Number(_) => fallback.to_string(),
            },
        }
    }

    /// Format a finite number, e.g. `S/ 1,234.50`.
    pub fn amount(&self, value: f64) -> String {
        let fixed = format!("{:.2}", value.abs());
        let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let grouped = group_digits(whole, &self.thousands_separator);

        let is_zero = whole.chars().all(|c| c == '0') && frac.chars().all(|c| c == '0');
        let sign = if value < 0.0 && !is_zero { "-" } else { "" };

        format!(
            "{sign}{} {grouped}{}{frac}",
            self.symbol, self.decimal_separator
        )
    }
}

fn group_digits(digits: &str, separator: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soles() -> CurrencyFormat {
        CurrencyFormat::default()
    }

    #[test]
    fn absent_value_uses_fallback() {
        assert_eq!(soles().format(None), "—");
        assert_eq!(soles().format_or(None, "n/d"), "n/d");
    }

    #[test]
    fn numbers_always_have_two_fraction_digits() {
        let fmt = soles();
        assert_eq!(fmt.amount(0.0), "S/ 0.00");
        assert_eq!(fmt.amount(120.5), "S/ 120.50");
        assert_eq!(fmt.amount(0.005), "S/ 0.01");
        assert_eq!(fmt.amount(0.001), "S/ 0.00");
        assert_eq!(fmt.amount(1234567.891), "S/ 1,234,567.89");
        assert_eq!(fmt.amount(100.0), "S/ 100.00");
        assert_eq!(fmt.amount(999.0), "S/ 999.00");
        assert_eq!(fmt.amount(1000.0), "S/ 1,000.00");
    }

    #[test]
    fn negative_amounts_keep_the_sign_in_front() {
        assert_eq!(soles().amount(-12.0), "-S/ 12.00");
        assert_eq!(soles().amount(-0.001), "S/ 0.00");
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let fmt = soles();
        assert_eq!(fmt.format(Some(&"45.5".into())), "S/ 45.50");
        assert_eq!(fmt.format(Some(&" 10 ".into())), "S/ 10.00");
        assert_eq!(fmt.format(Some(&"".into())), "S/ 0.00");
    }

    #[test]
    fn non_numeric_strings_pass_through() {
        let fmt = soles();
        assert_eq!(fmt.format(Some(&"pendiente".into())), "pendiente");
        assert_eq!(fmt.format(Some(&"NaN".into())), "NaN");
        assert_eq!(fmt.format(Some(&"12,50".into())), "12,50");
    }

    #[test]
    fn non_finite_numbers_use_fallback() {
        let fmt = soles();
        assert_eq!(fmt.format(Some(&MoneyValue::Number(f64::NAN))), "—");
        assert_eq!(fmt.format(Some(&MoneyValue::Number(f64::INFINITY))), "—");
    }

    #[test]
    fn infinity_spelled_as_text_passes_through() {
        let fmt = soles();
        assert_eq!(fmt.format(Some(&"inf".into())), "inf");
        assert_eq!(fmt.format(Some(&"+infinity".into())), "+infinity");
        assert_eq!(MoneyValue::from("-inf").as_number(), None);
    }

    #[test]
    fn formatting_is_idempotent_on_its_own_output() {
        let fmt = soles();
        let once = fmt.amount(50.0);
        assert_eq!(fmt.format(Some(&MoneyValue::Text(once.clone()))), once);
    }

    #[test]
    fn custom_locale_settings() {
        let fmt = CurrencyFormat {
            symbol: "$".to_string(),
            thousands_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
            fallback: "-".to_string(),
        };
        assert_eq!(fmt.amount(1234.5), "$ 1.234,50");
        assert_eq!(fmt.format(None), "-");
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let n: MoneyValue = serde_json::from_str("12.5").unwrap();
        let s: MoneyValue = serde_json::from_str("\"12.5\"").unwrap();
        assert_eq!(n, MoneyValue::Number(12.5));
        assert_eq!(s, MoneyValue::Text("12.5".to_string()));
    }
}
