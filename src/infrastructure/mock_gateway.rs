use crate::config::LatencyConfig;
use crate::domain::flow::{FlowKind, VerificationKind};
use crate::domain::gateway::{
    ApplicationReceipt, ApplicationRequest, BillDetails, BillQuery, GatewayError, OtpDispatch,
    OtpRequest, PaymentReceipt, PaymentRequest, VerificationQuery, VerifiedDetails,
};
use crate::domain::money::Amount;
use crate::domain::ports::{ClockBox, Gateway, IdGeneratorBox};
use async_trait::async_trait;
use chrono::{Datelike, TimeDelta};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;

/// Accounts starting with this prefix are reported as not found.
pub const NOT_FOUND_PREFIX: &str = "000";

/// A stand-in backend: waits a fixed latency, then returns canned data.
///
/// The only failure it produces on its own is the not-found card for
/// sentinel account numbers.
pub struct MockGateway {
    latency: LatencyConfig,
    clock: ClockBox,
    ids: IdGeneratorBox,
}

impl MockGateway {
    pub fn new(latency: LatencyConfig, clock: ClockBox, ids: IdGeneratorBox) -> Self {
        Self {
            latency,
            clock,
            ids,
        }
    }

    async fn delay(&self, operation: &str, duration: Duration) {
        tracing::debug!(operation, ?duration, "simulating gateway latency");
        self.clock.sleep(duration).await;
    }

    fn reference(&self, prefix: &str) -> String {
        let year = self.clock.today().year();
        self.ids.reference(&format!("{prefix}{year}"))
    }
}

fn mask(digits: &str) -> String {
    let clean: String = digits.chars().filter(char::is_ascii_digit).collect();
    let visible = clean.len().saturating_sub(4);
    format!("{}{}", "X".repeat(visible), &clean[visible..])
}

fn canned_customer(flow: FlowKind) -> (&'static str, Decimal) {
    match flow {
        FlowKind::MobilePostpaid => ("Rahul Sharma", dec!(499)),
        FlowKind::Broadband => ("Priya Patil", dec!(799)),
        _ => ("Amit Verma", dec!(349)),
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn send_otp(&self, request: OtpRequest) -> Result<OtpDispatch, GatewayError> {
        self.delay("send-otp", self.latency.send_otp()).await;
        Ok(OtpDispatch {
            request_id: self.ids.reference("OTP"),
            masked_mobile: mask(&request.mobile),
        })
    }

    async fn fetch_bill(&self, query: BillQuery) -> Result<BillDetails, GatewayError> {
        self.delay("fetch-bill", self.latency.fetch_bill(query.flow))
            .await;
        if query.account.starts_with(NOT_FOUND_PREFIX) {
            return Err(GatewayError::NotFound {
                title: "Account Not Found".to_string(),
                message: format!(
                    "No {} account matches {}. Check the number and try again.",
                    query.biller, query.account
                ),
            });
        }
        let today = self.clock.today();
        let (customer, amount) = canned_customer(query.flow);
        let amount = Amount::new(amount).map_err(|e| GatewayError::Unexpected(e.to_string()))?;
        Ok(BillDetails {
            customer_name: customer.to_string(),
            biller: query.biller,
            account: query.account,
            amount,
            bill_date: today - TimeDelta::days(5),
            due_date: today + TimeDelta::days(10),
        })
    }

    async fn verify(&self, query: VerificationQuery) -> Result<VerifiedDetails, GatewayError> {
        self.delay("verify", self.latency.verify()).await;
        let details = match query.kind {
            VerificationKind::Vehicle => vec![
                ("Owner".to_string(), "Rahul Sharma".to_string()),
                ("Vehicle Class".to_string(), "Car / Jeep / Van (VC4)".to_string()),
                ("Tag Status".to_string(), "Active".to_string()),
                ("Tag Balance".to_string(), "₹245.00".to_string()),
            ],
            VerificationKind::Otp => vec![("Mobile Verification".to_string(), "Verified".to_string())],
        };
        let subject = match query.kind {
            VerificationKind::Vehicle => query.subject,
            VerificationKind::Otp => mask(&query.subject),
        };
        Ok(VerifiedDetails { subject, details })
    }

    async fn submit_payment(
        &self,
        request: PaymentRequest,
    ) -> Result<PaymentReceipt, GatewayError> {
        self.delay("submit-payment", self.latency.payment()).await;
        Ok(PaymentReceipt {
            reference: self.reference("TXN"),
            amount: request.amount,
            discount: request.discount,
            paid_on: self.clock.today(),
        })
    }

    async fn submit_application(
        &self,
        request: ApplicationRequest,
    ) -> Result<ApplicationReceipt, GatewayError> {
        self.delay("submit-application", self.latency.application())
            .await;
        Ok(ApplicationReceipt {
            application_id: self.reference(&request.prefix),
            submitted_on: self.clock.today(),
            status: "Submitted".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::InstantClock;
    use crate::infrastructure::ids::SequentialIdGenerator;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn gateway() -> (MockGateway, InstantClock) {
        let clock = InstantClock::new(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        let gateway = MockGateway::new(
            LatencyConfig::default(),
            Arc::new(clock.clone()),
            Arc::new(SequentialIdGenerator::new()),
        );
        (gateway, clock)
    }

    #[tokio::test]
    async fn test_postpaid_bill() {
        let (gateway, clock) = gateway();
        let bill = gateway
            .fetch_bill(BillQuery {
                flow: FlowKind::MobilePostpaid,
                biller: "Jio".into(),
                account: "98765 43210".into(),
            })
            .await
            .unwrap();
        assert_eq!(bill.amount.value(), dec!(499));
        assert_eq!(bill.due_date, NaiveDate::from_ymd_opt(2026, 10, 26).unwrap());
        assert_eq!(clock.slept().await, vec![Duration::from_millis(2000)]);
    }

    #[tokio::test]
    async fn test_sentinel_account_not_found() {
        let (gateway, clock) = gateway();
        let err = gateway
            .fetch_bill(BillQuery {
                flow: FlowKind::Broadband,
                biller: "ACT Fibernet".into(),
                account: "000123456".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::NotFound { ref title, .. } if title == "Account Not Found"));
        assert_eq!(clock.slept().await, vec![Duration::from_millis(2200)]);
    }

    #[tokio::test]
    async fn test_payment_reference_has_year_prefix() {
        let (gateway, _) = gateway();
        let receipt = gateway
            .submit_payment(PaymentRequest {
                flow: FlowKind::MobilePostpaid,
                payer: "98765 43210".into(),
                amount: Amount::new(dec!(449)).unwrap(),
                discount: dec!(50),
            })
            .await
            .unwrap();
        assert_eq!(receipt.reference, "TXN20260000001");
        assert_eq!(receipt.amount.value(), dec!(449));
    }

    #[tokio::test]
    async fn test_application_and_otp() {
        let (gateway, _) = gateway();
        let otp = gateway
            .send_otp(OtpRequest {
                flow: FlowKind::AadhaarUpdate,
                mobile: "98765 43210".into(),
            })
            .await
            .unwrap();
        assert_eq!(otp.masked_mobile, "XXXXXX3210");

        let receipt = gateway
            .submit_application(ApplicationRequest {
                flow: FlowKind::AadhaarUpdate,
                prefix: "UPD".into(),
                fields: BTreeMap::new(),
                documents: vec![],
            })
            .await
            .unwrap();
        assert_eq!(receipt.application_id, "UPD20260000002");
        assert_eq!(receipt.status, "Submitted");
    }
}
