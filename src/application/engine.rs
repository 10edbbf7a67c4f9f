use crate::domain::document::DocumentReference;
use crate::domain::field::FieldValue;
use crate::domain::flow::{AmountSource, ExitAction, FlowKind, Operation};
use crate::domain::format::{MOBILE_DIGITS, digits};
use crate::domain::gateway::{
    ApplicationRequest, BillQuery, GatewayError, GatewayResponse, OtpRequest, PaymentRequest,
    VerificationQuery,
};
use crate::domain::money::{Amount, Promo, Quote};
use crate::domain::ports::{ContactsPicker, DocumentPicker, GatewayBox, Permission, PickOutcome};
use crate::domain::session::{Transition, WizardSession};
use crate::error::{Result, WizardError};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A fully built gateway request, ready to be sent.
#[derive(Debug, Clone, PartialEq)]
enum Call {
    Otp(OtpRequest),
    Bill(BillQuery),
    Verify(VerificationQuery),
    Payment(PaymentRequest),
    Application(ApplicationRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Attached(DocumentReference),
    Cancelled,
}

/// Drives [`WizardSession`]s against the gateway and the device pickers.
///
/// The session is borrowed mutably for the whole of a gateway call, so a
/// second submission cannot start while one is in flight.
pub struct WizardEngine {
    gateway: GatewayBox,
    documents: Option<Arc<dyn DocumentPicker>>,
    contacts: Option<Arc<dyn ContactsPicker>>,
}

impl WizardEngine {
    pub fn new(gateway: GatewayBox) -> Self {
        Self {
            gateway,
            documents: None,
            contacts: None,
        }
    }

    pub fn with_document_picker(mut self, picker: Arc<dyn DocumentPicker>) -> Self {
        self.documents = Some(picker);
        self
    }

    pub fn with_contacts_picker(mut self, picker: Arc<dyn ContactsPicker>) -> Self {
        self.contacts = Some(picker);
        self
    }

    /// Validates the current step and leaves it.
    ///
    /// Validation problems come back as `Err` with the session untouched. A
    /// gateway failure is not an error here: the session moves to its failed
    /// phase and the returned transition carries the failure card.
    pub async fn continue_step(&self, session: &mut WizardSession) -> Result<Transition> {
        let step = session.current_step().id;
        let exit = session.current_exit().inspect_err(|e| {
            tracing::debug!(flow = %session.kind(), step, error = %e, "step blocked");
        })?;

        let call = match exit {
            ExitAction::Advance => {
                let transition = session.continue_step()?;
                tracing::debug!(flow = %session.kind(), step, ?transition, "advanced");
                return Ok(transition);
            }
            ExitAction::Invoke(operation) => build_call(session, &operation)?,
        };

        let operation = match session.continue_step()? {
            Transition::AwaitGateway(operation) => operation,
            other => return Ok(other),
        };
        tracing::info!(flow = %session.kind(), step, operation = operation.name(), "calling gateway");

        let outcome = self.invoke(call).await;
        if let Err(error) = &outcome {
            tracing::warn!(flow = %session.kind(), step, %error, "gateway call failed");
        }
        session.resolve(outcome)
    }

    /// Runs the call on its own task so a panicking gateway surfaces as a
    /// retryable failure instead of tearing down the caller.
    async fn invoke(&self, call: Call) -> std::result::Result<GatewayResponse, GatewayError> {
        let gateway = Arc::clone(&self.gateway);
        let handle = tokio::spawn(async move {
            match call {
                Call::Otp(request) => gateway.send_otp(request).await.map(GatewayResponse::OtpSent),
                Call::Bill(query) => gateway.fetch_bill(query).await.map(GatewayResponse::Bill),
                Call::Verify(query) => gateway.verify(query).await.map(GatewayResponse::Verified),
                Call::Payment(request) => gateway
                    .submit_payment(request)
                    .await
                    .map(GatewayResponse::Payment),
                Call::Application(request) => gateway
                    .submit_application(request)
                    .await
                    .map(GatewayResponse::Application),
            }
        });
        match handle.await {
            Ok(outcome) => outcome,
            Err(join_error) => Err(GatewayError::Unexpected(join_error.to_string())),
        }
    }

    /// What the current step would charge, for steps that pay a fetched bill.
    pub fn quote(&self, session: &WizardSession) -> Result<Quote> {
        match session.current_step().exit {
            ExitAction::Invoke(Operation::SubmitPayment {
                amount: AmountSource::Bill { promo },
                ..
            }) => bill_quote(session, promo),
            _ => Err(WizardError::Unavailable(format!(
                "step `{}` does not pay a bill",
                session.current_step().id
            ))),
        }
    }

    /// Opens the document picker for `slot` and attaches the result.
    ///
    /// A file over the slot's ceiling is rejected with
    /// [`UploadError::TooLarge`](crate::domain::document::UploadError) and
    /// the slot keeps its previous content.
    pub async fn pick_document(
        &self,
        session: &mut WizardSession,
        slot: &str,
    ) -> Result<UploadOutcome> {
        let picker = self
            .documents
            .as_ref()
            .ok_or_else(|| WizardError::Unavailable("document picker".to_string()))?;
        if session.is_closed() {
            return Err(WizardError::SessionClosed);
        }
        if session.is_busy() {
            return Err(WizardError::Busy);
        }
        let allowed = session
            .current_step()
            .document_spec(slot)
            .map(|spec| spec.allowed_extensions)
            .ok_or_else(|| WizardError::UnknownField {
                field: slot.to_string(),
                step: session.current_step().id.to_string(),
            })?;

        match picker.pick(allowed).await {
            PickOutcome::Cancelled => Ok(UploadOutcome::Cancelled),
            PickOutcome::Picked(doc) => {
                session
                    .attach_document(slot, doc.clone())
                    .inspect_err(|e| tracing::warn!(slot, error = %e, "upload rejected"))?;
                Ok(UploadOutcome::Attached(doc))
            }
        }
    }

    /// Fills a mobile-number field with the first number in the contacts book.
    pub async fn fill_from_contacts(
        &self,
        session: &mut WizardSession,
        field: &str,
    ) -> Result<String> {
        let contacts = self
            .contacts
            .as_ref()
            .ok_or_else(|| WizardError::Unavailable("contacts picker".to_string()))?;
        if contacts.request_permission().await == Permission::Denied {
            return Err(WizardError::PermissionDenied("contacts".to_string()));
        }
        let numbers = contacts.phone_numbers().await;
        let first = numbers
            .iter()
            .find(|n| digits(n, usize::MAX).len() >= MOBILE_DIGITS)
            .ok_or_else(|| WizardError::validation(field, "No phone number found in contacts"))?;
        session.set_field(field, &national_number(first))
    }
}

/// Drops country code and trunk prefix, keeping the last ten digits.
fn national_number(raw: &str) -> String {
    let all = digits(raw, usize::MAX);
    all[all.len().saturating_sub(MOBILE_DIGITS)..].to_string()
}

fn required_text(session: &WizardSession, name: &str) -> Result<String> {
    session.text(name).map(str::to_string).ok_or_else(|| {
        let label = session
            .definition()
            .field_spec(name)
            .map_or(name, |spec| spec.label);
        WizardError::validation(name, format!("{label} is required"))
    })
}

fn bill_quote(session: &WizardSession, promo_field: Option<&str>) -> Result<Quote> {
    let bill = session
        .bill()
        .ok_or_else(|| WizardError::Unavailable("no bill has been fetched".to_string()))?;
    let promo = promo_field
        .and_then(|field| session.text(field))
        .map(|code| {
            Promo::lookup(code)
                .ok_or_else(|| WizardError::validation("promo", "Invalid promo code"))
        })
        .transpose()?;
    Quote::new(bill.amount, promo)
}

fn build_call(session: &WizardSession, operation: &Operation) -> Result<Call> {
    let flow = session.kind();
    let call = match *operation {
        Operation::SendOtp { mobile } => Call::Otp(OtpRequest {
            flow,
            mobile: required_text(session, mobile)?,
        }),
        Operation::FetchBill { biller, account } => Call::Bill(BillQuery {
            flow,
            biller: required_text(session, biller)?,
            account: required_text(session, account)?,
        }),
        Operation::Verify { kind, subject } => Call::Verify(VerificationQuery {
            flow,
            kind,
            subject: required_text(session, subject)?,
        }),
        Operation::SubmitPayment { payer, amount } => {
            let (amount, discount) = match amount {
                AmountSource::Field(field) => {
                    let amount = required_text(session, field)?
                        .parse::<Amount>()
                        .map_err(|_| WizardError::validation(field, "Enter a valid amount"))?;
                    (amount, Decimal::ZERO)
                }
                AmountSource::Bill { promo } => {
                    let quote = bill_quote(session, promo)?;
                    (quote.total, quote.discount)
                }
            };
            Call::Payment(PaymentRequest {
                flow,
                payer: required_text(session, payer)?,
                amount,
                discount,
            })
        }
        Operation::SubmitApplication { prefix } => Call::Application(application_request(
            session, flow, prefix,
        )),
    };
    Ok(call)
}

fn application_request(session: &WizardSession, flow: FlowKind, prefix: &str) -> ApplicationRequest {
    let definition = session.definition();
    let fields: BTreeMap<String, String> = session
        .values()
        .iter()
        .filter(|(name, _)| {
            definition
                .field_spec(name)
                .is_some_and(|spec| !spec.sensitive)
        })
        .filter_map(|(name, value)| match value {
            FieldValue::Text(text) => Some((name.clone(), text.clone())),
            FieldValue::Flag(_) => None,
        })
        .collect();
    let documents = session
        .uploaded_documents()
        .map(|(_, doc)| doc.name.clone())
        .collect();
    ApplicationRequest {
        flow,
        prefix: prefix.to_string(),
        fields,
        documents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::flows::FlowCatalog;
    use crate::config::LatencyConfig;
    use crate::domain::document::MIB;
    use crate::domain::gateway::{
        ApplicationReceipt, BillDetails, OtpDispatch, PaymentReceipt, VerifiedDetails,
    };
    use crate::domain::ports::Gateway;
    use crate::domain::session::{FailureKind, Phase};
    use crate::infrastructure::clock::InstantClock;
    use crate::infrastructure::ids::SequentialIdGenerator;
    use crate::infrastructure::in_memory::{ScriptedDocumentPicker, StaticContactsPicker};
    use crate::infrastructure::mock_gateway::MockGateway;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn engine() -> WizardEngine {
        let clock = InstantClock::new(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        WizardEngine::new(Arc::new(MockGateway::new(
            LatencyConfig::default(),
            Arc::new(clock),
            Arc::new(SequentialIdGenerator::new()),
        )))
    }

    fn session(kind: FlowKind) -> WizardSession {
        WizardSession::new(FlowCatalog::default().get(kind)).unwrap()
    }

    /// Panics on every call.
    struct PanickingGateway;

    #[async_trait]
    impl Gateway for PanickingGateway {
        async fn send_otp(&self, _: OtpRequest) -> std::result::Result<OtpDispatch, GatewayError> {
            panic!("boom")
        }
        async fn fetch_bill(&self, _: BillQuery) -> std::result::Result<BillDetails, GatewayError> {
            panic!("boom")
        }
        async fn verify(
            &self,
            _: VerificationQuery,
        ) -> std::result::Result<VerifiedDetails, GatewayError> {
            panic!("boom")
        }
        async fn submit_payment(
            &self,
            _: PaymentRequest,
        ) -> std::result::Result<PaymentReceipt, GatewayError> {
            panic!("boom")
        }
        async fn submit_application(
            &self,
            _: ApplicationRequest,
        ) -> std::result::Result<ApplicationReceipt, GatewayError> {
            panic!("boom")
        }
    }

    #[tokio::test]
    async fn test_recharge_pays_typed_amount() {
        let engine = engine();
        let mut session = session(FlowKind::MobileRecharge);
        session.set_field("mobile", "9876543210").unwrap();
        session.set_field("operator", "Airtel").unwrap();
        session.set_field("circle", "Mumbai").unwrap();
        engine.continue_step(&mut session).await.unwrap();

        session.set_field("amount", "99").unwrap();
        let err = engine.continue_step(&mut session).await.unwrap_err();
        assert!(matches!(err, WizardError::ValidationError { ref field, .. } if field == "amount"));

        session.set_field("amount", "299").unwrap();
        let transition = engine.continue_step(&mut session).await.unwrap();
        assert_eq!(transition, Transition::Completed);
        match session.last_response() {
            Some(GatewayResponse::Payment(receipt)) => {
                assert_eq!(receipt.amount.value(), dec!(299));
                assert_eq!(receipt.reference, "TXN20260000001");
            }
            other => panic!("expected a payment receipt, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_quote_needs_a_bill_step() {
        let engine = engine();
        let session = session(FlowKind::MobilePostpaid);
        assert!(matches!(
            engine.quote(&session),
            Err(WizardError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_panicking_gateway_becomes_generic_failure() {
        let engine = WizardEngine::new(Arc::new(PanickingGateway));
        let mut session = session(FlowKind::Broadband);
        session.set_field("provider", "Hathway").unwrap();
        engine.continue_step(&mut session).await.unwrap();
        session.set_field("account_number", "123456789").unwrap();

        let transition = engine.continue_step(&mut session).await.unwrap();
        let failure = match transition {
            Transition::Failed(failure) => failure,
            other => panic!("expected failure, got {other:?}"),
        };
        assert_eq!(failure.kind, FailureKind::Generic);
        assert_eq!(failure.title, "Something went wrong");
        assert_eq!(session.step_index(), 1);
        assert!(matches!(session.phase(), Phase::Failed(_)));
    }

    #[tokio::test]
    async fn test_upload_cancel_and_oversize() {
        let picker = ScriptedDocumentPicker::new();
        let engine = engine().with_document_picker(Arc::new(picker.clone()));
        let mut session = session(FlowKind::Ferfar);
        for (field, value) in [
            ("district", "Pune"),
            ("taluka", "Haveli"),
            ("village", "Wagholi"),
            ("survey_number", "123/4a"),
        ] {
            session.set_field(field, value).unwrap();
        }
        engine.continue_step(&mut session).await.unwrap();
        session.set_field("name", "Sunita Jadhav").unwrap();
        session.set_field("mobile", "9876543210").unwrap();
        session.set_field("purpose", "Sale").unwrap();
        engine.continue_step(&mut session).await.unwrap();

        assert_eq!(
            engine.pick_document(&mut session, "sale_deed").await.unwrap(),
            UploadOutcome::Cancelled
        );

        picker
            .push_file(DocumentReference::new("deed.pdf", 6 * MIB, "file:///deed.pdf"))
            .await;
        let err = engine.pick_document(&mut session, "sale_deed").await.unwrap_err();
        assert!(err.to_string().starts_with("Too Large"));
        assert!(!session.document("sale_deed").is_uploaded());

        picker
            .push_file(DocumentReference::new("deed.pdf", 4 * MIB, "file:///deed.pdf"))
            .await;
        assert!(matches!(
            engine.pick_document(&mut session, "sale_deed").await.unwrap(),
            UploadOutcome::Attached(_)
        ));
        assert!(session.document("sale_deed").is_uploaded());
    }

    #[tokio::test]
    async fn test_missing_picker_is_reported() {
        let engine = engine();
        let mut session = session(FlowKind::Ferfar);
        assert!(matches!(
            engine.pick_document(&mut session, "sale_deed").await,
            Err(WizardError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_fill_from_contacts() {
        let contacts = StaticContactsPicker::new(
            Permission::Granted,
            vec!["100".into(), "+91 98765-43210".into()],
        );
        let engine = engine().with_contacts_picker(Arc::new(contacts));
        let mut session = session(FlowKind::MobileRecharge);
        let shown = engine.fill_from_contacts(&mut session, "mobile").await.unwrap();
        assert_eq!(shown, "98765 43210");
    }

    #[tokio::test]
    async fn test_contacts_permission_denied() {
        let contacts = StaticContactsPicker::new(Permission::Denied, vec!["9876543210".into()]);
        let engine = engine().with_contacts_picker(Arc::new(contacts));
        let mut session = session(FlowKind::MobileRecharge);
        assert!(matches!(
            engine.fill_from_contacts(&mut session, "mobile").await,
            Err(WizardError::PermissionDenied(_))
        ));
        assert_eq!(session.value("mobile"), None);
    }

    #[test]
    fn test_national_number() {
        assert_eq!(national_number("+91 98765 43210"), "9876543210");
        assert_eq!(national_number("09876543210"), "9876543210");
    }
}
