//! Keystroke formatters.
//!
//! Every formatter re-derives the whole display string from the cleaned raw
//! characters, so applying one to its own output is a no-op.

pub const MOBILE_DIGITS: usize = 10;
pub const AADHAAR_DIGITS: usize = 12;
pub const DATE_DIGITS: usize = 8;

/// Display shape applied to a text field on every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formatter {
    /// `98765 43210`
    Mobile,
    /// `1234 5678 9012`
    Aadhaar,
    /// `DD/MM/YYYY`
    Date,
    /// Digits only, at most `n` of them.
    Digits(usize),
    /// Upper-case ASCII letters and digits, at most `n` of them.
    Upper(usize),
    /// Rupee amount with at most two decimal places.
    Amount,
}

impl Formatter {
    pub fn apply(&self, raw: &str) -> String {
        match self {
            Formatter::Mobile => group(&digits(raw, MOBILE_DIGITS), &[5], ' '),
            Formatter::Aadhaar => group(&digits(raw, AADHAAR_DIGITS), &[4, 8], ' '),
            Formatter::Date => group(&digits(raw, DATE_DIGITS), &[2, 4], '/'),
            Formatter::Digits(max) => digits(raw, *max),
            Formatter::Upper(max) => raw
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .map(|c| c.to_ascii_uppercase())
                .take(*max)
                .collect(),
            Formatter::Amount => amount(raw),
        }
    }
}

/// Keeps at most `max` ASCII digits from `raw`.
pub fn digits(raw: &str, max: usize) -> String {
    raw.chars().filter(char::is_ascii_digit).take(max).collect()
}

fn group(clean: &str, breaks: &[usize], separator: char) -> String {
    let mut out = String::with_capacity(clean.len() + breaks.len());
    for (i, c) in clean.chars().enumerate() {
        if i > 0 && breaks.contains(&i) {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

fn amount(raw: &str) -> String {
    let mut out = String::new();
    let mut decimals: Option<usize> = None;
    for c in raw.chars() {
        match (c, decimals) {
            ('0'..='9', None) => out.push(c),
            ('0'..='9', Some(n)) if n < 2 => {
                out.push(c);
                decimals = Some(n + 1);
            }
            ('.', None) => {
                if out.is_empty() {
                    out.push('0');
                }
                out.push('.');
                decimals = Some(0);
            }
            _ => {}
        }
    }
    out
}
