use super::document::DocumentSpec;
use super::field::FieldSpec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowKind {
    MobilePostpaid,
    MobileRecharge,
    Broadband,
    Fastag,
    AadhaarUpdate,
    Pmjay,
    Ferfar,
}

impl FlowKind {
    pub const ALL: [FlowKind; 7] = [
        FlowKind::MobilePostpaid,
        FlowKind::MobileRecharge,
        FlowKind::Broadband,
        FlowKind::Fastag,
        FlowKind::AadhaarUpdate,
        FlowKind::Pmjay,
        FlowKind::Ferfar,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            FlowKind::MobilePostpaid => "mobile-postpaid",
            FlowKind::MobileRecharge => "mobile-recharge",
            FlowKind::Broadband => "broadband",
            FlowKind::Fastag => "fastag",
            FlowKind::AadhaarUpdate => "aadhaar-update",
            FlowKind::Pmjay => "pmjay",
            FlowKind::Ferfar => "ferfar",
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for FlowKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FlowKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| {
                let known: Vec<_> = FlowKind::ALL.iter().map(FlowKind::slug).collect();
                format!("unknown flow `{s}` (expected one of: {})", known.join(", "))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationKind {
    Vehicle,
    Otp,
}

/// Where a payment's amount comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountSource {
    /// An amount typed on the current step.
    Field(&'static str),
    /// The last fetched bill, less any promo typed into `promo`.
    Bill { promo: Option<&'static str> },
}

/// A simulated backend call made when leaving a step. Field names refer to
/// session values read to build the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SendOtp {
        mobile: &'static str,
    },
    FetchBill {
        biller: &'static str,
        account: &'static str,
    },
    Verify {
        kind: VerificationKind,
        subject: &'static str,
    },
    SubmitPayment {
        payer: &'static str,
        amount: AmountSource,
    },
    SubmitApplication {
        prefix: &'static str,
    },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::SendOtp { .. } => "send-otp",
            Operation::FetchBill { .. } => "fetch-bill",
            Operation::Verify { .. } => "verify",
            Operation::SubmitPayment { .. } => "submit-payment",
            Operation::SubmitApplication { .. } => "submit-application",
        }
    }

    /// The field an "edit details" action clears after a not-found result.
    pub fn input_field(&self) -> Option<&'static str> {
        match self {
            Operation::FetchBill { account, .. } => Some(account),
            Operation::Verify { subject, .. } => Some(subject),
            Operation::SendOtp { mobile } => Some(mobile),
            Operation::SubmitPayment { .. } | Operation::SubmitApplication { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitAction {
    Advance,
    Invoke(Operation),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub fields: Vec<FieldSpec>,
    pub documents: Vec<DocumentSpec>,
    pub exit: ExitAction,
}

impl StepSpec {
    pub fn new(id: &'static str, title: &'static str) -> Self {
        Self {
            id,
            title,
            fields: Vec::new(),
            documents: Vec::new(),
            exit: ExitAction::Advance,
        }
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn document(mut self, document: DocumentSpec) -> Self {
        self.documents.push(document);
        self
    }

    pub fn on_exit(mut self, operation: Operation) -> Self {
        self.exit = ExitAction::Invoke(operation);
        self
    }

    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn document_spec(&self, name: &str) -> Option<&DocumentSpec> {
        self.documents.iter().find(|d| d.name == name)
    }
}

/// The ordered steps of one screen's flow.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowDefinition {
    pub kind: FlowKind,
    pub title: &'static str,
    pub steps: Vec<StepSpec>,
}

impl FlowDefinition {
    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.steps.iter().find_map(|s| s.field_spec(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_kind_round_trips_through_slug() {
        for kind in FlowKind::ALL {
            assert_eq!(kind.slug().parse::<FlowKind>().unwrap(), kind);
        }
        let err = "electricity".parse::<FlowKind>().unwrap_err();
        assert!(err.contains("mobile-postpaid"));
    }

    #[test]
    fn test_serde_name_matches_slug() {
        let json = serde_json::to_string(&FlowKind::AadhaarUpdate).unwrap();
        assert_eq!(json, "\"aadhaar-update\"");
    }

    #[test]
    fn test_input_field_for_retry() {
        let fetch = Operation::FetchBill {
            biller: "provider",
            account: "account_number",
        };
        assert_eq!(fetch.input_field(), Some("account_number"));
        assert_eq!(Operation::SubmitApplication { prefix: "FER" }.input_field(), None);
    }
}
