//! The step lists for each supported screen.

use crate::config::FlowConfig;
use crate::domain::document::DocumentSpec;
use crate::domain::field::{FieldSpec, Rule};
use crate::domain::flow::{
    AmountSource, FlowDefinition, FlowKind, Operation, StepSpec, VerificationKind,
};
use crate::domain::format::Formatter;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const MOBILE_OPERATORS: &[&str] = &["Jio", "Airtel", "Vi", "BSNL"];
pub const TELECOM_CIRCLES: &[&str] = &[
    "Andhra Pradesh",
    "Delhi NCR",
    "Gujarat",
    "Karnataka",
    "Kolkata",
    "Maharashtra & Goa",
    "Mumbai",
    "Tamil Nadu",
    "Uttar Pradesh (East)",
    "Uttar Pradesh (West)",
];
pub const BROADBAND_PROVIDERS: &[&str] = &[
    "ACT Fibernet",
    "Airtel Xstream Fiber",
    "BSNL Bharat Fiber",
    "Hathway",
    "JioFiber",
];
pub const FASTAG_BANKS: &[&str] = &[
    "Axis Bank",
    "HDFC Bank",
    "ICICI Bank",
    "IDFC First Bank",
    "Kotak Mahindra Bank",
    "Paytm Payments Bank",
    "State Bank of India",
];
pub const FERFAR_PURPOSES: &[&str] = &["Sale", "Inheritance", "Gift", "Partition", "Mortgage"];

fn mobile() -> FieldSpec {
    FieldSpec::new("mobile", "Mobile Number", Rule::ExactDigits(10)).formatted(Formatter::Mobile)
}

fn aadhaar() -> FieldSpec {
    FieldSpec::new("aadhaar", "Aadhaar Number", Rule::ExactDigits(12))
        .formatted(Formatter::Aadhaar)
}

fn otp(length: usize) -> FieldSpec {
    FieldSpec::new("otp", "OTP", Rule::Otp(length))
        .formatted(Formatter::Digits(length))
        .sensitive()
}

fn consent() -> FieldSpec {
    FieldSpec::new("consent", "Declaration", Rule::Checked).sensitive()
}

fn amount(config: &FlowConfig) -> FieldSpec {
    FieldSpec::new("amount", "Amount", Rule::MinAmount(config.minimum_amount))
        .formatted(Formatter::Amount)
}

fn verify_otp_step(config: &FlowConfig) -> StepSpec {
    StepSpec::new("verify-otp", "Verify OTP")
        .field(otp(config.otp_length))
        .on_exit(Operation::Verify {
            kind: VerificationKind::Otp,
            subject: "mobile",
        })
}

fn mobile_postpaid() -> FlowDefinition {
    FlowDefinition {
        kind: FlowKind::MobilePostpaid,
        title: "Mobile Postpaid Bill",
        steps: vec![
            StepSpec::new("select-operator", "Select Operator")
                .field(FieldSpec::new("operator", "Operator", Rule::OneOf(MOBILE_OPERATORS))),
            StepSpec::new("enter-number", "Enter Mobile Number")
                .field(mobile())
                .on_exit(Operation::FetchBill {
                    biller: "operator",
                    account: "mobile",
                }),
            StepSpec::new("review-bill", "Review Bill")
                .field(
                    FieldSpec::new("promo", "Promo Code", Rule::Promo)
                        .optional()
                        .formatted(Formatter::Upper(12)),
                )
                .on_exit(Operation::SubmitPayment {
                    payer: "mobile",
                    amount: AmountSource::Bill {
                        promo: Some("promo"),
                    },
                }),
        ],
    }
}

fn mobile_recharge(config: &FlowConfig) -> FlowDefinition {
    FlowDefinition {
        kind: FlowKind::MobileRecharge,
        title: "Mobile Recharge",
        steps: vec![
            StepSpec::new("enter-number", "Enter Mobile Number")
                .field(mobile())
                .field(FieldSpec::new("operator", "Operator", Rule::OneOf(MOBILE_OPERATORS)))
                .field(FieldSpec::new("circle", "Circle", Rule::OneOf(TELECOM_CIRCLES))),
            StepSpec::new("choose-plan", "Choose Plan")
                .field(amount(config))
                .on_exit(Operation::SubmitPayment {
                    payer: "mobile",
                    amount: AmountSource::Field("amount"),
                }),
        ],
    }
}

fn broadband() -> FlowDefinition {
    FlowDefinition {
        kind: FlowKind::Broadband,
        title: "Broadband Bill",
        steps: vec![
            StepSpec::new("select-provider", "Select Provider")
                .field(FieldSpec::new("provider", "Provider", Rule::OneOf(BROADBAND_PROVIDERS))),
            StepSpec::new("enter-account", "Enter Account Number")
                .field(
                    FieldSpec::new("account_number", "Account Number", Rule::DigitsBetween(6, 12))
                        .formatted(Formatter::Digits(12)),
                )
                .on_exit(Operation::FetchBill {
                    biller: "provider",
                    account: "account_number",
                }),
            StepSpec::new("review-bill", "Review Bill").on_exit(Operation::SubmitPayment {
                payer: "account_number",
                amount: AmountSource::Bill { promo: None },
            }),
        ],
    }
}

fn fastag(config: &FlowConfig) -> FlowDefinition {
    FlowDefinition {
        kind: FlowKind::Fastag,
        title: "FASTag Recharge",
        steps: vec![
            StepSpec::new("select-bank", "Select Issuer Bank")
                .field(FieldSpec::new("bank", "Issuer Bank", Rule::OneOf(FASTAG_BANKS))),
            StepSpec::new("vehicle", "Vehicle Details")
                .field(
                    FieldSpec::new("vehicle_number", "Vehicle Number", Rule::VehicleNumber)
                        .formatted(Formatter::Upper(10)),
                )
                .on_exit(Operation::Verify {
                    kind: VerificationKind::Vehicle,
                    subject: "vehicle_number",
                }),
            StepSpec::new("recharge", "Recharge Amount")
                .field(amount(config))
                .on_exit(Operation::SubmitPayment {
                    payer: "vehicle_number",
                    amount: AmountSource::Field("amount"),
                }),
        ],
    }
}

fn aadhaar_update(config: &FlowConfig) -> FlowDefinition {
    FlowDefinition {
        kind: FlowKind::AadhaarUpdate,
        title: "Aadhaar Address Update",
        steps: vec![
            StepSpec::new("identity", "Identity")
                .field(aadhaar())
                .field(mobile())
                .on_exit(Operation::SendOtp { mobile: "mobile" }),
            verify_otp_step(config),
            StepSpec::new("details", "New Address")
                .field(FieldSpec::new("name", "Full Name", Rule::NonEmpty))
                .field(
                    FieldSpec::new("date_of_birth", "Date of Birth", Rule::Date)
                        .formatted(Formatter::Date),
                )
                .field(FieldSpec::new("address", "Address", Rule::NonEmpty))
                .field(
                    FieldSpec::new("pincode", "Pincode", Rule::ExactDigits(6))
                        .formatted(Formatter::Digits(6)),
                )
                .document(DocumentSpec::new(
                    "address_proof",
                    "Address Proof",
                    config.identity_upload_max_bytes,
                )),
            StepSpec::new("review", "Review & Submit")
                .field(consent())
                .on_exit(Operation::SubmitApplication { prefix: "UPD" }),
        ],
    }
}

fn pmjay(config: &FlowConfig) -> FlowDefinition {
    FlowDefinition {
        kind: FlowKind::Pmjay,
        title: "PM-JAY Card Application",
        steps: vec![
            StepSpec::new("eligibility", "Check Eligibility")
                .field(aadhaar())
                .field(mobile())
                .on_exit(Operation::SendOtp { mobile: "mobile" }),
            verify_otp_step(config),
            StepSpec::new("family", "Family Details")
                .field(FieldSpec::new("head_of_family", "Head of Family", Rule::NonEmpty))
                .field(
                    FieldSpec::new("ration_card", "Ration Card Number", Rule::NonEmpty)
                        .formatted(Formatter::Upper(15)),
                )
                .field(
                    FieldSpec::new("family_members", "Family Members", Rule::DigitsBetween(1, 2))
                        .formatted(Formatter::Digits(2)),
                )
                .document(DocumentSpec::new(
                    "ration_card_copy",
                    "Ration Card Copy",
                    config.identity_upload_max_bytes,
                ))
                .document(
                    DocumentSpec::new(
                        "income_certificate",
                        "Income Certificate",
                        config.identity_upload_max_bytes,
                    )
                    .optional(),
                ),
            StepSpec::new("review", "Review & Submit")
                .field(consent())
                .on_exit(Operation::SubmitApplication { prefix: "PMJAY" }),
        ],
    }
}

fn ferfar(config: &FlowConfig) -> FlowDefinition {
    FlowDefinition {
        kind: FlowKind::Ferfar,
        title: "Ferfar (Mutation Entry) Application",
        steps: vec![
            StepSpec::new("property", "Property Details")
                .field(FieldSpec::new("district", "District", Rule::NonEmpty))
                .field(FieldSpec::new("taluka", "Taluka", Rule::NonEmpty))
                .field(FieldSpec::new("village", "Village", Rule::NonEmpty))
                .field(
                    FieldSpec::new("survey_number", "Survey / Gat Number", Rule::NonEmpty)
                        .formatted(Formatter::Upper(12)),
                ),
            StepSpec::new("applicant", "Applicant Details")
                .field(FieldSpec::new("name", "Applicant Name", Rule::NonEmpty))
                .field(mobile())
                .field(FieldSpec::new("purpose", "Purpose", Rule::OneOf(FERFAR_PURPOSES))),
            StepSpec::new("documents", "Documents")
                .document(DocumentSpec::new(
                    "sale_deed",
                    "Registered Deed",
                    config.record_upload_max_bytes,
                ))
                .document(DocumentSpec::new(
                    "seven_twelve",
                    "7/12 Extract",
                    config.record_upload_max_bytes,
                )),
            StepSpec::new("review", "Review & Submit")
                .field(consent())
                .on_exit(Operation::SubmitApplication { prefix: "FER" }),
        ],
    }
}

/// Every flow definition, built once from configuration and shared by the
/// sessions that run it.
#[derive(Debug, Clone)]
pub struct FlowCatalog {
    flows: BTreeMap<FlowKind, Arc<FlowDefinition>>,
}

impl FlowCatalog {
    pub fn new(config: &FlowConfig) -> Self {
        let flows = [
            mobile_postpaid(),
            mobile_recharge(config),
            broadband(),
            fastag(config),
            aadhaar_update(config),
            pmjay(config),
            ferfar(config),
        ]
        .into_iter()
        .map(|definition| (definition.kind, Arc::new(definition)))
        .collect();
        Self { flows }
    }

    pub fn get(&self, kind: FlowKind) -> Arc<FlowDefinition> {
        // every FlowKind is registered in `new`
        Arc::clone(&self.flows[&kind])
    }

    pub fn kinds(&self) -> impl Iterator<Item = FlowKind> + '_ {
        self.flows.keys().copied()
    }
}

impl Default for FlowCatalog {
    fn default() -> Self {
        Self::new(&FlowConfig::default())
    }
}
