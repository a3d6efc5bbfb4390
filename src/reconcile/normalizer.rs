//! Price string normalization.
//!
//! Retailer prices arrive as Chilean-peso strings such as `"$1.234"`, where
//! `.` groups thousands and `,` separates decimals. Pesos have no fractional
//! unit in practice, so anything after the decimal separator is dropped.

use thiserror::Error;

/// Why a price string could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceParseError {
    #[error("no digits in price")]
    Empty,

    #[error("unexpected character '{0}' in price")]
    InvalidCharacter(char),

    #[error("price exceeds the supported range")]
    Overflow,
}

const CURRENCY_SYMBOL: char = '$';
const THOUSANDS_SEPARATOR: char = '.';
const DECIMAL_SEPARATOR: char = ',';

/// Parses a currency-formatted price into whole pesos.
pub fn parse_price(text: &str) -> Result<u64, PriceParseError> {
    let text = text.trim();
    let text = text.strip_prefix(CURRENCY_SYMBOL).unwrap_or(text).trim_start();

    let (whole, fraction) = match text.split_once(DECIMAL_SEPARATOR) {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text, None),
    };

    if let Some(fraction) = fraction {
        if let Some(c) = fraction.chars().find(|c| !c.is_ascii_digit()) {
            return Err(PriceParseError::InvalidCharacter(c));
        }
    }

    let mut value: u64 = 0;
    let mut digits = 0usize;

    for c in whole.chars() {
        match c {
            THOUSANDS_SEPARATOR => continue,
            '0'..='9' => {
                let digit = u64::from(c as u8 - b'0');
                value = value
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(digit))
                    .ok_or(PriceParseError::Overflow)?;
                digits += 1;
            }
            other => return Err(PriceParseError::InvalidCharacter(other)),
        }
    }

    if digits == 0 {
        return Err(PriceParseError::Empty);
    }

    Ok(value)
}

/// Formats whole pesos the way retailers print them: `$1.234.567`.
pub fn format_price(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(THOUSANDS_SEPARATOR);
        }
        grouped.push(c);
    }

    format!("{}{}", CURRENCY_SYMBOL, grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_plain() {
        assert_eq!(parse_price("$1.234"), Ok(1234));
        assert_eq!(parse_price("$990"), Ok(990));
        assert_eq!(parse_price("$1.234.567"), Ok(1_234_567));
        assert_eq!(parse_price("1.290"), Ok(1290));
    }

    #[test]
    fn test_parse_price_zero() {
        assert_eq!(parse_price("$0"), Ok(0));
    }

    #[test]
    fn test_parse_price_drops_decimals() {
        assert_eq!(parse_price("$1.234,50"), Ok(1234));
        assert_eq!(parse_price("$1.234,99"), Ok(1234));
        assert_eq!(parse_price("$5,"), Ok(5));
    }

    #[test]
    fn test_parse_price_whitespace() {
        assert_eq!(parse_price("  $1.500  "), Ok(1500));
        assert_eq!(parse_price("$ 1.500"), Ok(1500));
    }

    #[test]
    fn test_parse_price_no_digits() {
        assert_eq!(parse_price(""), Err(PriceParseError::Empty));
        assert_eq!(parse_price("$"), Err(PriceParseError::Empty));
        assert_eq!(parse_price("$."), Err(PriceParseError::Empty));
        assert_eq!(parse_price("$,50"), Err(PriceParseError::Empty));
    }

    #[test]
    fn test_parse_price_dash_placeholder() {
        assert_eq!(parse_price("$-"), Err(PriceParseError::InvalidCharacter('-')));
    }

    #[test]
    fn test_parse_price_negative_rejected() {
        assert_eq!(parse_price("-$100"), Err(PriceParseError::InvalidCharacter('-')));
        assert_eq!(parse_price("$-100"), Err(PriceParseError::InvalidCharacter('-')));
    }

    #[test]
    fn test_parse_price_embedded_characters() {
        assert_eq!(parse_price("$1.2a4"), Err(PriceParseError::InvalidCharacter('a')));
        assert_eq!(parse_price("N/A"), Err(PriceParseError::InvalidCharacter('N')));
        assert_eq!(parse_price("$1 234"), Err(PriceParseError::InvalidCharacter(' ')));
        assert_eq!(parse_price("$1.234,5x"), Err(PriceParseError::InvalidCharacter('x')));
        assert_eq!(parse_price("$1.234,50,1"), Err(PriceParseError::InvalidCharacter(',')));
    }

    #[test]
    fn test_parse_price_other_currency_symbol() {
        assert_eq!(parse_price("€1.234"), Err(PriceParseError::InvalidCharacter('€')));
    }

    #[test]
    fn test_parse_price_overflow() {
        assert_eq!(parse_price("$99.999.999.999.999.999.999"), Err(PriceParseError::Overflow));
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0), "$0");
        assert_eq!(format_price(990), "$990");
        assert_eq!(format_price(1234), "$1.234");
        assert_eq!(format_price(1_234_567), "$1.234.567");
        assert_eq!(format_price(100_000), "$100.000");
    }

    #[test]
    fn test_format_then_parse() {
        for value in [0, 7, 1_000, 25_990, 1_000_000] {
            assert_eq!(parse_price(&format_price(value)), Ok(value));
        }
    }
}
