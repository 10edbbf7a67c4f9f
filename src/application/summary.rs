use crate::domain::field::FieldValue;
use crate::domain::flow::FlowKind;
use crate::domain::gateway::GatewayResponse;
use crate::domain::money::rupees;
use crate::domain::session::WizardSession;
use crate::error::{Result, WizardError};
use rust_decimal::Decimal;
use serde::Serialize;

const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub label: String,
    pub value: String,
}

impl SummaryRow {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// The read-only confirmation view of a completed flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub flow: FlowKind,
    pub title: String,
    pub reference: String,
    pub rows: Vec<SummaryRow>,
}

impl Summary {
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }
}

/// Projects a completed session into its success screen.
///
/// Rows come in step order: entered fields (sensitive ones left out),
/// uploaded documents, then whatever the gateway returned along the way.
pub fn render(session: &WizardSession) -> Result<Summary> {
    if !session.is_completed() {
        return Err(WizardError::Unavailable(format!(
            "flow has not completed (current step `{}`)",
            session.current_step().id
        )));
    }
    let reference = session
        .responses()
        .rev()
        .find_map(GatewayResponse::reference)
        .ok_or_else(|| WizardError::Unavailable("no reference was issued".to_string()))?
        .to_string();

    let mut rows = Vec::new();
    for step in &session.definition().steps {
        for spec in step.fields.iter().filter(|spec| !spec.sensitive) {
            match session.value(spec.name) {
                Some(FieldValue::Text(text)) if !text.trim().is_empty() => {
                    rows.push(SummaryRow::new(spec.label, text.as_str()));
                }
                Some(FieldValue::Flag(set)) => {
                    rows.push(SummaryRow::new(spec.label, if *set { "Yes" } else { "No" }));
                }
                _ => {}
            }
        }
        for doc in &step.documents {
            if let Some(file) = session.document(doc.name).reference() {
                rows.push(SummaryRow::new(doc.label, file.name.as_str()));
            }
        }
    }

    for response in session.responses() {
        response_rows(response, &mut rows);
    }

    Ok(Summary {
        flow: session.kind(),
        title: session.definition().title.to_string(),
        reference,
        rows,
    })
}

fn response_rows(response: &GatewayResponse, rows: &mut Vec<SummaryRow>) {
    match response {
        GatewayResponse::OtpSent(dispatch) => {
            rows.push(SummaryRow::new("OTP Sent To", dispatch.masked_mobile.as_str()));
        }
        GatewayResponse::Bill(bill) => {
            rows.push(SummaryRow::new("Customer Name", bill.customer_name.as_str()));
            rows.push(SummaryRow::new("Bill Amount", bill.amount.to_string()));
            rows.push(SummaryRow::new(
                "Due Date",
                bill.due_date.format(DATE_FORMAT).to_string(),
            ));
        }
        GatewayResponse::Verified(verified) => {
            rows.extend(
                verified
                    .details
                    .iter()
                    .map(|(label, value)| SummaryRow::new(label.as_str(), value.as_str())),
            );
        }
        GatewayResponse::Payment(receipt) => {
            if receipt.discount > Decimal::ZERO {
                rows.push(SummaryRow::new("Discount", rupees(receipt.discount)));
            }
            rows.push(SummaryRow::new("Total Paid", receipt.amount.to_string()));
            rows.push(SummaryRow::new(
                "Paid On",
                receipt.paid_on.format(DATE_FORMAT).to_string(),
            ));
            rows.push(SummaryRow::new("Transaction ID", receipt.reference.as_str()));
        }
        GatewayResponse::Application(receipt) => {
            rows.push(SummaryRow::new(
                "Submitted On",
                receipt.submitted_on.format(DATE_FORMAT).to_string(),
            ));
            rows.push(SummaryRow::new("Status", receipt.status.as_str()));
            rows.push(SummaryRow::new("Application ID", receipt.application_id.as_str()));
        }
    }
}
