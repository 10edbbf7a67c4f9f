use super::format::Formatter;
use super::money::Promo;
use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

static VEHICLE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{2}[0-9]{1,2}[A-Z]{1,2}[0-9]{4}$").expect("vehicle number pattern")
});

/// Outcome of checking one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    Invalid(String),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }

    fn invalid(reason: impl Into<String>) -> Self {
        Validation::Invalid(reason.into())
    }
}

/// A value held by a session for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl FieldValue {
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Flag(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Flag(_) => None,
        }
    }
}

/// Format constraint for a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Any non-blank text.
    NonEmpty,
    /// Exactly `n` digits; whitespace used for grouping is ignored.
    ExactDigits(usize),
    /// Between `min` and `max` digits.
    DigitsBetween(usize, usize),
    /// A one-time password of the configured length.
    Otp(usize),
    /// Indian vehicle registration number, e.g. `MH12AB1234`.
    VehicleNumber,
    /// A calendar date written `DD/MM/YYYY`.
    Date,
    /// A rupee amount no smaller than the given minimum.
    MinAmount(Decimal),
    /// One of a fixed set of options, compared case-insensitively.
    OneOf(&'static [&'static str]),
    /// A known promo code.
    Promo,
    /// A flag that must be set, e.g. a consent checkbox.
    Checked,
}

impl Rule {
    pub fn check(&self, value: &FieldValue) -> Validation {
        let text = match value {
            FieldValue::Flag(set) => return self.check_flag(*set),
            FieldValue::Text(text) => text.trim(),
        };

        match self {
            Rule::NonEmpty => {
                if text.is_empty() {
                    Validation::invalid("This field is required")
                } else {
                    Validation::Valid
                }
            }
            Rule::ExactDigits(n) => match digit_count(text) {
                Some(count) if count == *n => Validation::Valid,
                _ => Validation::invalid(format!("Enter exactly {n} digits")),
            },
            Rule::DigitsBetween(min, max) => match digit_count(text) {
                Some(count) if (*min..=*max).contains(&count) => Validation::Valid,
                _ => Validation::invalid(format!("Enter {min} to {max} digits")),
            },
            Rule::Otp(n) => match digit_count(text) {
                Some(count) if count == *n => Validation::Valid,
                _ => Validation::invalid(format!("Enter the {n}-digit OTP")),
            },
            Rule::VehicleNumber => {
                if VEHICLE_NUMBER.is_match(text) {
                    Validation::Valid
                } else {
                    Validation::invalid("Enter a valid vehicle number, e.g. MH12AB1234")
                }
            }
            Rule::Date => match NaiveDate::parse_from_str(text, "%d/%m/%Y") {
                Ok(_) if text.len() == 10 => Validation::Valid,
                _ => Validation::invalid("Use DD/MM/YYYY"),
            },
            Rule::MinAmount(min) => match Decimal::from_str(text) {
                Ok(amount) if amount >= *min => Validation::Valid,
                Ok(_) => Validation::invalid(format!("Minimum amount is ₹{min}")),
                Err(_) => Validation::invalid("Enter a valid amount"),
            },
            Rule::OneOf(options) => {
                if options.iter().any(|o| o.eq_ignore_ascii_case(text)) {
                    Validation::Valid
                } else {
                    Validation::invalid(format!("Choose one of: {}", options.join(", ")))
                }
            }
            Rule::Promo => {
                if Promo::lookup(text).is_some() {
                    Validation::Valid
                } else {
                    Validation::invalid("Invalid promo code")
                }
            }
            Rule::Checked => Validation::invalid("Please confirm to continue"),
        }
    }

    fn check_flag(&self, set: bool) -> Validation {
        match (self, set) {
            (Rule::Checked, true) => Validation::Valid,
            (Rule::Checked, false) => Validation::invalid("Please confirm to continue"),
            _ => Validation::invalid("Expected a text value"),
        }
    }
}

/// Counts digits, allowing spaces between groups. `None` if anything else appears.
fn digit_count(text: &str) -> Option<usize> {
    let mut count = 0;
    for c in text.chars() {
        if c.is_ascii_digit() {
            count += 1;
        } else if c != ' ' {
            return None;
        }
    }
    Some(count)
}

/// Validation and formatting contract for one input.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub rule: Rule,
    pub formatter: Option<Formatter>,
    /// Left out of summaries (OTPs and the like).
    pub sensitive: bool,
}

impl FieldSpec {
    pub fn new(name: &'static str, label: &'static str, rule: Rule) -> Self {
        Self {
            name,
            label,
            required: true,
            rule,
            formatter: None,
            sensitive: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn formatted(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn format(&self, raw: &str) -> String {
        match self.formatter {
            Some(formatter) => formatter.apply(raw),
            None => raw.to_string(),
        }
    }
}

/// Checks `value` against `spec`. Blank optional fields are valid.
pub fn validate(spec: &FieldSpec, value: Option<&FieldValue>) -> Validation {
    match value {
        None => missing(spec),
        Some(v) if v.is_blank() => missing(spec),
        Some(v) => spec.rule.check(v),
    }
}

fn missing(spec: &FieldSpec) -> Validation {
    if !spec.required {
        Validation::Valid
    } else if spec.rule == Rule::Checked {
        Validation::invalid("Please confirm to continue")
    } else {
        Validation::invalid(format!("{} is required", spec.label))
    }
}
