use crate::error::WizardError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt;
use std::str::FromStr;

/// A positive rupee amount.
///
/// Wraps `rust_decimal::Decimal` so a zero or negative payment can never be
/// constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, WizardError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(WizardError::validation("amount", "Amount must be positive"))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = WizardError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl FromStr for Amount {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim())
            .map_err(|_| WizardError::validation("amount", "Enter a valid amount"))?;
        Self::new(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", rupees(self.0))
    }
}

/// Renders a decimal as `₹1234.00`.
pub fn rupees(value: Decimal) -> String {
    format!("₹{:.2}", value.round_dp(2))
}

/// A discount code accepted on bill payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Promo {
    /// Flat ₹50 off bills of at least ₹100.
    Save50,
    /// 10% off, capped at ₹100.
    First10,
}

impl Promo {
    pub fn code(&self) -> &'static str {
        match self {
            Promo::Save50 => "SAVE50",
            Promo::First10 => "FIRST10",
        }
    }

    pub fn lookup(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "SAVE50" => Some(Promo::Save50),
            "FIRST10" => Some(Promo::First10),
            _ => None,
        }
    }

    fn discount_on(&self, bill: Amount) -> Result<Decimal, WizardError> {
        match self {
            Promo::Save50 => {
                if bill.value() < dec!(100) {
                    Err(WizardError::validation(
                        "promo",
                        "SAVE50 needs a bill of at least ₹100",
                    ))
                } else {
                    Ok(dec!(50))
                }
            }
            Promo::First10 => Ok((bill.value() * dec!(0.10)).round_dp(2).min(dec!(100))),
        }
    }
}

/// What the payer sees before confirming a bill payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub bill: Amount,
    pub discount: Decimal,
    pub total: Amount,
}

impl Quote {
    pub fn new(bill: Amount, promo: Option<Promo>) -> Result<Self, WizardError> {
        let discount = match promo {
            Some(promo) => promo.discount_on(bill)?,
            None => Decimal::ZERO,
        };
        let total = Amount::new(bill.value() - discount)
            .map_err(|_| WizardError::validation("promo", "Promo cannot cover the whole bill"))?;
        Ok(Self {
            bill,
            discount,
            total,
        })
    }
}
