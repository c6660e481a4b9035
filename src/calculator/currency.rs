use std::str::FromStr;

use num_format::{Locale, ToFormattedString};
use strum::{Display, EnumString};
use thiserror::Error;

pub const DEFAULT_LOCALE: &str = "en-US";
pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NumberStyle {
    Currency,
    Decimal,
    Percent,
}

#[derive(Error, Debug, PartialEq)]
pub enum FormatError {
    #[error("Unknown locale: {0}")]
    UnknownLocale(String),
    #[error("Unknown number style: {0}")]
    UnknownStyle(String),
    #[error("Currency code must be three letters: {0}")]
    InvalidCurrency(String),
    /// NaN, infinite, or too large to print digit for digit
    #[error("Amount cannot be formatted: {0}")]
    UnrepresentableAmount(f64),
}

/// Formats amounts for display, `en-US` / `currency` / `USD` unless told otherwise.
#[derive(Debug, Clone)]
pub struct CurrencyFormat {
    locale: Locale,
    style: NumberStyle,
    currency: String,
}

impl CurrencyFormat {
    /// Any argument left as `None` falls back to the default
    pub fn new(
        locale: Option<&str>,
        style: Option<&str>,
        currency: Option<&str>,
    ) -> Result<Self, FormatError> {
        let format = CurrencyFormat::default();

        let format = match locale {
            Some(locale) => format.set_locale(locale)?,
            None => format,
        };

        let format = match style {
            Some(style) => format.set_style(
                NumberStyle::from_str(style)
                    .map_err(|_| FormatError::UnknownStyle(style.to_string()))?,
            ),
            None => format,
        };

        match currency {
            Some(currency) => format.set_currency(currency),
            None => Ok(format),
        }
    }

    /// Accepts CLDR names such as `en`, `de` or `fr-CA`. Region-qualified names
    /// unknown to CLDR (`en-US`) fall back to their language.
    pub fn set_locale(mut self, name: &str) -> Result<Self, FormatError> {
        self.locale = resolve_locale(name)?;
        Ok(self)
    }

    pub fn set_style(mut self, style: NumberStyle) -> Self {
        self.style = style;
        self
    }

    pub fn set_currency(mut self, code: &str) -> Result<Self, FormatError> {
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(FormatError::InvalidCurrency(code.to_string()));
        }

        self.currency = code.to_ascii_uppercase();
        Ok(self)
    }

    pub fn format(&self, value: f64) -> Result<String, FormatError> {
        let formatted = match self.style {
            NumberStyle::Currency => {
                let digits = currency_fraction_digits(&self.currency);
                let (negative, number) = self.group(value, digits, false)?;

                format!(
                    "{}{}{}",
                    self.sign(negative),
                    currency_symbol(&self.currency),
                    number
                )
            }
            NumberStyle::Decimal => {
                let (negative, number) = self.group(value, 3, true)?;

                format!("{}{}", self.sign(negative), number)
            }
            NumberStyle::Percent => {
                let (negative, number) = self.group(value * 100.0, 0, false)?;

                format!("{}{}%", self.sign(negative), number)
            }
        };

        Ok(formatted)
    }

    fn sign(&self, negative: bool) -> &'static str {
        if negative {
            self.locale.minus_sign()
        } else {
            ""
        }
    }

    /// Rounds half away from zero to `fraction_digits` and applies the locale's
    /// grouping and decimal separator. Returns whether the rounded value is negative.
    fn group(
        &self,
        value: f64,
        fraction_digits: u32,
        trim_zeros: bool,
    ) -> Result<(bool, String), FormatError> {
        let factor = 10u128.pow(fraction_digits);
        let scaled = (value.abs() * factor as f64).round();

        // `as` saturates, anything at or past u128::MAX would print the wrong digits
        if !scaled.is_finite() || scaled >= u128::MAX as f64 {
            return Err(FormatError::UnrepresentableAmount(value));
        }

        let scaled = scaled as u128;

        let integer = scaled / factor;
        let fraction = scaled % factor;

        let mut number = integer.to_formatted_string(&self.locale);

        if fraction_digits > 0 {
            let fraction = format!("{:0width$}", fraction, width = fraction_digits as usize);
            let fraction = if trim_zeros {
                fraction.trim_end_matches('0')
            } else {
                fraction.as_str()
            };

            if !fraction.is_empty() {
                number.push_str(self.locale.decimal());
                number.push_str(fraction);
            }
        }

        Ok((value < 0.0 && scaled != 0, number))
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            locale: resolve_locale(DEFAULT_LOCALE).unwrap_or(Locale::en),
            style: NumberStyle::Currency,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

fn resolve_locale(name: &str) -> Result<Locale, FormatError> {
    if let Ok(locale) = Locale::from_name(name) {
        return Ok(locale);
    }

    name.split(['-', '_'])
        .next()
        .and_then(|language| Locale::from_name(language).ok())
        .ok_or_else(|| FormatError::UnknownLocale(name.to_string()))
}

fn currency_symbol(code: &str) -> String {
    match code {
        "USD" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        "JPY" => "¥".to_string(),
        "CAD" => "CA$".to_string(),
        "AUD" => "A$".to_string(),
        "INR" => "₹".to_string(),
        other => format!("{}\u{a0}", other),
    }
}

fn currency_fraction_digits(code: &str) -> u32 {
    match code {
        "JPY" | "KRW" | "VND" | "CLP" | "ISK" => 0,
        _ => 2,
    }
}

/// Shorthand for `CurrencyFormat::new(..)?.format(value)`
pub fn format_using_locale(
    value: f64,
    locale: Option<&str>,
    style: Option<&str>,
    currency: Option<&str>,
) -> Result<String, FormatError> {
    CurrencyFormat::new(locale, style, currency)?.format(value)
}
