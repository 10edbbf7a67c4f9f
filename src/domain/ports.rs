use super::document::DocumentReference;
use super::gateway::{
    ApplicationReceipt, ApplicationRequest, BillDetails, BillQuery, GatewayError, OtpDispatch,
    OtpRequest, PaymentReceipt, PaymentRequest, VerificationQuery, VerifiedDetails,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;

/// The backend, one method per simulated operation.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn send_otp(&self, request: OtpRequest) -> Result<OtpDispatch, GatewayError>;
    async fn fetch_bill(&self, query: BillQuery) -> Result<BillDetails, GatewayError>;
    async fn verify(&self, query: VerificationQuery) -> Result<VerifiedDetails, GatewayError>;
    async fn submit_payment(&self, request: PaymentRequest)
    -> Result<PaymentReceipt, GatewayError>;
    async fn submit_application(
        &self,
        request: ApplicationRequest,
    ) -> Result<ApplicationReceipt, GatewayError>;
}

/// Time source for simulated latency and canned dates.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
    fn today(&self) -> NaiveDate;
}

/// Produces cosmetic reference codes such as `TXN2026K3F9Q1Z`.
pub trait IdGenerator: Send + Sync {
    fn reference(&self, prefix: &str) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Picked(DocumentReference),
    Cancelled,
}

#[async_trait]
pub trait DocumentPicker: Send + Sync {
    async fn pick(&self, allowed_extensions: &[&str]) -> PickOutcome;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

#[async_trait]
pub trait ContactsPicker: Send + Sync {
    async fn request_permission(&self) -> Permission;
    async fn phone_numbers(&self) -> Vec<String>;
}

/// The host's navigation stack.
pub trait NavigationHost {
    fn back(&mut self);
    fn push(&mut self, route: &str);
    fn replace(&mut self, route: &str);
}

pub type GatewayBox = Arc<dyn Gateway>;
pub type ClockBox = Arc<dyn Clock>;
pub type IdGeneratorBox = Arc<dyn IdGenerator>;
