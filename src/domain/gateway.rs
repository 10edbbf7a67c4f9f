//! Payloads exchanged with the (simulated) backend.

use super::flow::{FlowKind, VerificationKind};
use super::money::Amount;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// A lookup matched nothing; the user should edit the input and retry.
    #[error("{title}: {message}")]
    NotFound { title: String, message: String },
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("Unexpected failure: {0}")]
    Unexpected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpRequest {
    pub flow: FlowKind,
    pub mobile: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpDispatch {
    pub request_id: String,
    /// Last four digits the OTP was sent to.
    pub masked_mobile: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillQuery {
    pub flow: FlowKind,
    pub biller: String,
    pub account: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillDetails {
    pub customer_name: String,
    pub biller: String,
    pub account: String,
    pub amount: Amount,
    pub bill_date: NaiveDate,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationQuery {
    pub flow: FlowKind,
    pub kind: VerificationKind,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedDetails {
    pub subject: String,
    pub details: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub flow: FlowKind,
    pub payer: String,
    pub amount: Amount,
    pub discount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub reference: String,
    pub amount: Amount,
    pub discount: Decimal,
    pub paid_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationRequest {
    pub flow: FlowKind,
    pub prefix: String,
    pub fields: BTreeMap<String, String>,
    pub documents: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationReceipt {
    pub application_id: String,
    pub submitted_on: NaiveDate,
    pub status: String,
}

/// A canned outcome held by the session until the next step renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayResponse {
    OtpSent(OtpDispatch),
    Bill(BillDetails),
    Verified(VerifiedDetails),
    Payment(PaymentReceipt),
    Application(ApplicationReceipt),
}

impl GatewayResponse {
    /// The reference identifier shown on a success screen, if this response carries one.
    pub fn reference(&self) -> Option<&str> {
        match self {
            GatewayResponse::Payment(receipt) => Some(&receipt.reference),
            GatewayResponse::Application(receipt) => Some(&receipt.application_id),
            GatewayResponse::OtpSent(_)
            | GatewayResponse::Bill(_)
            | GatewayResponse::Verified(_) => None,
        }
    }
}
