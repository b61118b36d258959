//! Locale-aware number formatting.
//!
//! Formatting is delegated through [`NumberLocale`] so hosts can plug in a
//! platform formatter. [`Locale`] covers the two locales we ship with.

use smol_str::SmolStr;

/// Options for [`NumberLocale::format_number`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberFormatOptions {
    pub minimum_fraction_digits: usize,
    pub maximum_fraction_digits: usize,
    /// ISO 4217 code used by currency formatting.
    pub currency: SmolStr,
}

impl Default for NumberFormatOptions {
    fn default() -> Self {
        Self {
            minimum_fraction_digits: 0,
            maximum_fraction_digits: 3,
            currency: SmolStr::new_static("USD"),
        }
    }
}

impl NumberFormatOptions {
    pub fn fraction_digits(digits: usize) -> Self {
        Self {
            minimum_fraction_digits: digits,
            maximum_fraction_digits: digits,
            ..Self::default()
        }
    }

    pub fn with_currency(mut self, currency: impl Into<SmolStr>) -> Self {
        self.currency = currency.into();
        self
    }
}

/// Locale primitives the numeric transforms depend on.
pub trait NumberLocale {
    /// BCP 47 tag, e.g. `en-US`.
    fn tag(&self) -> &str;

    fn grouping_separator(&self) -> char;

    fn decimal_separator(&self) -> char;

    /// Symbol displayed for a currency code. Unknown codes display as-is.
    fn currency_symbol(&self, code: &str) -> SmolStr {
        match code {
            "USD" => SmolStr::new_static("$"),
            "EUR" => SmolStr::new_static("€"),
            "GBP" => SmolStr::new_static("£"),
            "JPY" => SmolStr::new_static("¥"),
            other => SmolStr::new(other),
        }
    }

    /// Format a plain number with grouping and bounded fraction digits.
    fn format_number(&self, value: f64, options: &NumberFormatOptions) -> String {
        format_grouped(
            value,
            options.minimum_fraction_digits,
            options.maximum_fraction_digits,
            self.grouping_separator(),
            self.decimal_separator(),
        )
    }

    /// Format an amount of `options.currency`.
    fn format_currency(&self, value: f64, options: &NumberFormatOptions) -> String;
}

/// Where the currency symbol goes relative to the amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolPosition {
    Prefix,
    Suffix,
}

/// Table-driven locale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Locale {
    pub tag: SmolStr,
    pub grouping: char,
    pub decimal: char,
    pub symbol_position: SymbolPosition,
}

impl Locale {
    pub fn en_us() -> Self {
        Self {
            tag: SmolStr::new_static("en-US"),
            grouping: ',',
            decimal: '.',
            symbol_position: SymbolPosition::Prefix,
        }
    }

    pub fn de_de() -> Self {
        Self {
            tag: SmolStr::new_static("de-DE"),
            grouping: '.',
            decimal: ',',
            symbol_position: SymbolPosition::Suffix,
        }
    }

    /// Look up a shipped locale by tag. Anything unknown falls back to `en-US`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "de" | "de-DE" => Self::de_de(),
            _ => Self::en_us(),
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::en_us()
    }
}

impl NumberLocale for Locale {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn grouping_separator(&self) -> char {
        self.grouping
    }

    fn decimal_separator(&self) -> char {
        self.decimal
    }

    fn format_currency(&self, value: f64, options: &NumberFormatOptions) -> String {
        let digits = currency_fraction_digits(&options.currency);
        let symbol = self.currency_symbol(&options.currency);
        let amount = format_grouped(value.abs(), digits, digits, self.grouping, self.decimal);
        let sign = if value < 0.0 { "-" } else { "" };
        match self.symbol_position {
            SymbolPosition::Prefix => format!("{sign}{symbol}{amount}"),
            SymbolPosition::Suffix => format!("{sign}{amount} {symbol}"),
        }
    }
}

/// Minor unit digits for a currency code.
pub fn currency_fraction_digits(code: &str) -> usize {
    match code {
        "JPY" | "KRW" => 0,
        _ => 2,
    }
}

/// Group the integer part in threes and render between `min_fraction` and
/// `max_fraction` fraction digits, rounding half away from zero.
pub fn format_grouped(
    value: f64,
    min_fraction: usize,
    max_fraction: usize,
    grouping: char,
    decimal: char,
) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let max_fraction = max_fraction.max(min_fraction);
    let factor = 10f64.powi(max_fraction as i32);
    let rounded = (value.abs() * factor).round() / factor;
    let fixed = format!("{rounded:.max_fraction$}");
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (fixed.as_str(), ""),
    };

    let mut frac = frac_part.trim_end_matches('0').to_string();
    while frac.len() < min_fraction {
        frac.push('0');
    }

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(grouping);
        }
        grouped.push(c);
    }

    let negative = value < 0.0 && rounded != 0.0;
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac.is_empty() {
        out.push(decimal);
        out.push_str(&frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouping_en_us() {
        let en = Locale::en_us();
        let opts = NumberFormatOptions::default();
        assert_eq!(en.format_number(1234567.891, &opts), "1,234,567.891");
        assert_eq!(en.format_number(1234.5, &opts), "1,234.5");
        assert_eq!(en.format_number(-12.0, &opts), "-12");
        assert_eq!(en.format_number(0.12345, &opts), "0.123");
        assert_eq!(en.format_number(999.0, &opts), "999");
    }

    #[test]
    fn test_grouping_de_de() {
        let de = Locale::de_de();
        let opts = NumberFormatOptions::default();
        assert_eq!(de.format_number(1234.5, &opts), "1.234,5");
        assert_eq!(de.format_number(1234.5, &NumberFormatOptions::fraction_digits(0)), "1.235");
    }

    #[test]
    fn test_minimum_fraction_digits_pad() {
        let en = Locale::en_us();
        let opts = NumberFormatOptions::fraction_digits(2);
        assert_eq!(en.format_number(3.0, &opts), "3.00");
        assert_eq!(en.format_number(3.456, &opts), "3.46");
    }

    #[test]
    fn test_currency_formats() {
        let opts = NumberFormatOptions::default();
        assert_eq!(Locale::en_us().format_currency(1234.5, &opts), "$1,234.50");
        assert_eq!(Locale::en_us().format_currency(-2.0, &opts), "-$2.00");
        assert_eq!(Locale::de_de().format_currency(1234.5, &opts), "1.234,50 $");
        let yen = NumberFormatOptions::default().with_currency("JPY");
        assert_eq!(Locale::en_us().format_currency(1500.0, &yen), "¥1,500");
    }

    #[test]
    fn test_non_finite() {
        let en = Locale::en_us();
        let opts = NumberFormatOptions::default();
        assert_eq!(en.format_number(f64::INFINITY, &opts), "∞");
        assert_eq!(en.format_number(f64::NAN, &opts), "NaN");
    }

    #[test]
    fn test_negative_rounding_to_zero_drops_sign() {
        let en = Locale::en_us();
        assert_eq!(en.format_number(-0.0001, &NumberFormatOptions::default()), "0");
    }

    #[test]
    fn test_from_tag_fallback() {
        assert_eq!(Locale::from_tag("de-DE"), Locale::de_de());
        assert_eq!(Locale::from_tag("fr-FR"), Locale::en_us());
    }
}
