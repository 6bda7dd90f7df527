//! # Currency Formatting
//!
//! Turns a [`Money`] amount into display text using the store's currency
//! settings. Every monetary string the register shows or prints comes
//! through here.
//!
//! ## Formatting Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  symbol configured?                                                     │
//! │     │                                                                   │
//! │     ├── yes ──► "{symbol} {amount}"   (prefix)                         │
//! │     │           "{amount} {symbol}"   (suffix)                         │
//! │     │           amount is plain "1234.50", no grouping                  │
//! │     │                                                                   │
//! │     └── no ───► locale + code standard format                          │
//! │                 en-US / USD  → "$1,234.50"                              │
//! │                 de-DE / EUR  → "1.234,50 €"                             │
//! │                 unknown code → formatted as USD ("$1,234.50")           │
//! │                 (XYZ, "US", "€€€" all fall back the same way)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Always two fraction digits.

use rusty_money::iso;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::DEFAULT_CURRENCY_CODE;

/// Where a custom symbol goes relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    #[default]
    Prefix,
    Suffix,
}

/// Currency settings chosen by the store.
///
/// Missing fields take their defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrencyConfig {
    /// ISO 4217 code ("USD", "EUR", "PKR", ...).
    pub code: String,

    /// Custom symbol. Overrides the locale's symbol when set.
    #[serde(default)]
    pub symbol: Option<String>,

    #[serde(default)]
    pub position: SymbolPosition,

    /// BCP 47 locale tag ("en-US", "de-DE", ...).
    pub locale: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        CurrencyConfig {
            code: DEFAULT_CURRENCY_CODE.to_string(),
            symbol: None,
            position: SymbolPosition::Prefix,
            locale: "en-US".to_string(),
        }
    }
}

impl CurrencyConfig {
    /// Creates a config with a custom symbol.
    pub fn with_symbol(
        code: impl Into<String>,
        symbol: impl Into<String>,
        position: SymbolPosition,
    ) -> Self {
        CurrencyConfig {
            code: code.into(),
            symbol: Some(symbol.into()),
            position,
            ..CurrencyConfig::default()
        }
    }

    /// Formats an amount for display.
    ///
    /// ```rust
    /// use rxpos_core::currency::{CurrencyConfig, SymbolPosition};
    /// use rxpos_core::money::Money;
    ///
    /// let prefix = CurrencyConfig::with_symbol("USD", "$", SymbolPosition::Prefix);
    /// assert_eq!(prefix.format(Money::from_cents(1250)), "$ 12.50");
    ///
    /// let suffix = CurrencyConfig::with_symbol("USD", "$", SymbolPosition::Suffix);
    /// assert_eq!(suffix.format(Money::from_cents(1250)), "12.50 $");
    /// ```
    pub fn format(&self, amount: Money) -> String {
        match self.custom_symbol() {
            Some(symbol) => match self.position {
                SymbolPosition::Prefix => format!("{} {}", symbol, amount.to_decimal_string()),
                SymbolPosition::Suffix => format!("{} {}", amount.to_decimal_string(), symbol),
            },
            None => self.format_standard(amount),
        }
    }

    /// The currency code actually used for standard formatting.
    ///
    /// Codes missing from the ISO 4217 table fall back to
    /// [`DEFAULT_CURRENCY_CODE`].
    pub fn resolved_code(&self) -> String {
        self.iso_currency().iso_alpha_code.to_string()
    }

    fn iso_currency(&self) -> &'static iso::Currency {
        iso::find(&self.code.trim().to_ascii_uppercase())
            .or_else(|| iso::find(DEFAULT_CURRENCY_CODE))
            .unwrap_or(iso::USD)
    }

    fn custom_symbol(&self) -> Option<&str> {
        self.symbol
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn format_standard(&self, amount: Money) -> String {
        let style = LocaleStyle::for_tag(&self.locale);
        let symbol = self.iso_currency().symbol;
        let number = style.number(amount);
        let sign = if amount.is_negative() { "-" } else { "" };

        if style.symbol_first {
            format!("{}{}{}{}", sign, symbol, style.symbol_gap, number)
        } else {
            format!("{}{} {}", sign, number, symbol)
        }
    }
}

/// Separator and symbol placement conventions of a locale's language.
#[derive(Debug, Clone, Copy)]
struct LocaleStyle {
    group: &'static str,
    decimal: &'static str,
    symbol_first: bool,
    symbol_gap: &'static str,
}

impl LocaleStyle {
    const ENGLISH: LocaleStyle = LocaleStyle {
        group: ",",
        decimal: ".",
        symbol_first: true,
        symbol_gap: "",
    };

    /// Unknown languages format like English.
    fn for_tag(tag: &str) -> Self {
        let language = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match language.as_str() {
            "de" | "es" | "it" => LocaleStyle {
                group: ".",
                decimal: ",",
                symbol_first: false,
                symbol_gap: " ",
            },
            "fr" => LocaleStyle {
                group: " ",
                decimal: ",",
                symbol_first: false,
                symbol_gap: " ",
            },
            "nl" | "pt" => LocaleStyle {
                group: ".",
                decimal: ",",
                symbol_first: true,
                symbol_gap: " ",
            },
            _ => LocaleStyle::ENGLISH,
        }
    }

    /// Unsigned, grouped, two-decimal number.
    fn number(&self, amount: Money) -> String {
        let whole = amount.dollars().unsigned_abs().to_string();
        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push_str(self.group);
            }
            grouped.push(digit);
        }
        format!("{}{}{:02}", grouped, self.decimal, amount.cents_part())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
