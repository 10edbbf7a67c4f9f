use super::document::{DocumentReference, DocumentSlot};
use super::field::{FieldValue, Validation, validate};
use super::flow::{ExitAction, FlowDefinition, FlowKind, Operation, StepSpec};
use super::gateway::{BillDetails, GatewayError, GatewayResponse};
use crate::error::{Result, WizardError};
use std::collections::BTreeMap;
use std::sync::Arc;

static NOT_UPLOADED: DocumentSlot = DocumentSlot::NotUploaded;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The gateway looked the input up and found nothing.
    NotFound,
    /// Anything else; retrying as-is may succeed.
    Generic,
}

/// A retry-capable error state shown instead of the next step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub title: String,
    pub message: String,
    /// Cleared by [`WizardSession::edit_details`].
    pub reset_field: Option<&'static str>,
}

impl Failure {
    pub fn from_gateway(error: &GatewayError, operation: &Operation) -> Self {
        match error {
            GatewayError::NotFound { title, message } => Self {
                kind: FailureKind::NotFound,
                title: title.clone(),
                message: message.clone(),
                reset_field: operation.input_field(),
            },
            GatewayError::Unavailable(_) | GatewayError::Unexpected(_) => Self {
                kind: FailureKind::Generic,
                title: "Something went wrong".to_string(),
                message: "Please try again.".to_string(),
                reset_field: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Editing,
    /// A gateway call is in flight; continue and back are disabled.
    Pending(Operation),
    Failed(Failure),
    Completed,
    /// The user backed out of the first step.
    Exited,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Advanced { to: &'static str },
    AwaitGateway(Operation),
    Failed(Failure),
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackTransition {
    Moved { to: &'static str },
    /// An error card was dismissed; the step is unchanged.
    Dismissed,
    /// Already on the first step: the host should leave the flow.
    ExitFlow,
}

/// One in-progress multi-step form.
///
/// The step index only moves forward through [`continue_step`] once every
/// required field and document on the current step is valid, and moving back
/// never discards entered values. Once completed or exited the session is
/// read-only.
///
/// [`continue_step`]: WizardSession::continue_step
#[derive(Debug, Clone)]
pub struct WizardSession {
    definition: Arc<FlowDefinition>,
    index: usize,
    phase: Phase,
    values: BTreeMap<String, FieldValue>,
    documents: BTreeMap<String, DocumentSlot>,
    /// Gateway outcomes keyed by the step that requested them.
    responses: BTreeMap<usize, GatewayResponse>,
}

impl WizardSession {
    pub fn new(definition: Arc<FlowDefinition>) -> Result<Self> {
        if definition.steps.is_empty() {
            return Err(WizardError::InvalidConfig(format!(
                "flow `{}` has no steps",
                definition.kind
            )));
        }
        Ok(Self {
            definition,
            index: 0,
            phase: Phase::Editing,
            values: BTreeMap::new(),
            documents: BTreeMap::new(),
            responses: BTreeMap::new(),
        })
    }

    pub fn kind(&self) -> FlowKind {
        self.definition.kind
    }

    pub fn definition(&self) -> &FlowDefinition {
        &self.definition
    }

    pub fn step_index(&self) -> usize {
        self.index
    }

    pub fn current_step(&self) -> &StepSpec {
        &self.definition.steps[self.index]
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Pending(_))
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.phase, Phase::Completed | Phase::Exited)
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(FieldValue::as_text)
            .filter(|t| !t.trim().is_empty())
    }

    pub fn values(&self) -> &BTreeMap<String, FieldValue> {
        &self.values
    }

    pub fn document(&self, name: &str) -> &DocumentSlot {
        self.documents.get(name).unwrap_or(&NOT_UPLOADED)
    }

    pub fn uploaded_documents(&self) -> impl Iterator<Item = (&str, &DocumentReference)> {
        self.documents
            .iter()
            .filter_map(|(name, slot)| slot.reference().map(|doc| (name.as_str(), doc)))
    }

    /// Outcomes in step order, at most one per step.
    pub fn responses(&self) -> impl DoubleEndedIterator<Item = &GatewayResponse> {
        self.responses.values()
    }

    pub fn last_response(&self) -> Option<&GatewayResponse> {
        self.responses.values().next_back()
    }

    pub fn bill(&self) -> Option<&BillDetails> {
        self.responses.values().rev().find_map(|r| match r {
            GatewayResponse::Bill(bill) => Some(bill),
            _ => None,
        })
    }

    fn ensure_editable(&self) -> Result<()> {
        match self.phase {
            Phase::Completed | Phase::Exited => Err(WizardError::SessionClosed),
            Phase::Pending(_) => Err(WizardError::Busy),
            Phase::Editing | Phase::Failed(_) => Ok(()),
        }
    }

    fn unknown_field(&self, name: &str) -> WizardError {
        WizardError::UnknownField {
            field: name.to_string(),
            step: self.current_step().id.to_string(),
        }
    }

    /// Formats `raw` with the field's formatter and stores it. Returns the
    /// display string.
    pub fn set_field(&mut self, name: &str, raw: &str) -> Result<String> {
        self.ensure_editable()?;
        let spec = self
            .current_step()
            .field_spec(name)
            .ok_or_else(|| self.unknown_field(name))?;
        let (key, formatted) = (spec.name, spec.format(raw));
        self.values
            .insert(key.to_string(), FieldValue::Text(formatted.clone()));
        self.phase = Phase::Editing;
        Ok(formatted)
    }

    pub fn set_flag(&mut self, name: &str, set: bool) -> Result<()> {
        self.ensure_editable()?;
        let key = self
            .current_step()
            .field_spec(name)
            .ok_or_else(|| self.unknown_field(name))?
            .name;
        self.values.insert(key.to_string(), FieldValue::Flag(set));
        self.phase = Phase::Editing;
        Ok(())
    }

    /// Stores a picked file if it fits the slot's constraints. A rejected file
    /// leaves the slot as it was.
    pub fn attach_document(&mut self, name: &str, doc: DocumentReference) -> Result<()> {
        self.ensure_editable()?;
        let spec = self
            .current_step()
            .document_spec(name)
            .ok_or_else(|| self.unknown_field(name))?;
        spec.accept(&doc)?;
        let key = spec.name;
        self.documents
            .insert(key.to_string(), DocumentSlot::Uploaded(doc));
        self.phase = Phase::Editing;
        Ok(())
    }

    pub fn remove_document(&mut self, name: &str) -> Result<()> {
        self.ensure_editable()?;
        if self.current_step().document_spec(name).is_none() {
            return Err(self.unknown_field(name));
        }
        self.documents.insert(name.to_string(), DocumentSlot::NotUploaded);
        self.phase = Phase::Editing;
        Ok(())
    }

    /// The first invalid field or missing document on the current step.
    pub fn first_error(&self) -> Option<(&'static str, String)> {
        let step = self.current_step();
        for spec in &step.fields {
            if let Validation::Invalid(reason) = validate(spec, self.values.get(spec.name)) {
                return Some((spec.name, reason));
            }
        }
        step.documents
            .iter()
            .find(|doc| doc.required && !self.document(doc.name).is_uploaded())
            .map(|doc| (doc.name, format!("Please upload {}", doc.label)))
    }

    /// Whether the advancing control should be enabled.
    pub fn can_continue(&self) -> bool {
        self.ensure_editable().is_ok() && self.first_error().is_none()
    }

    /// Validates the current step and reports what leaving it requires,
    /// without changing anything.
    pub fn current_exit(&self) -> Result<ExitAction> {
        self.ensure_editable()?;
        if let Some((field, reason)) = self.first_error() {
            return Err(WizardError::validation(field, reason));
        }
        Ok(self.current_step().exit)
    }

    pub fn continue_step(&mut self) -> Result<Transition> {
        match self.current_exit()? {
            ExitAction::Advance => Ok(self.advance()),
            ExitAction::Invoke(operation) => {
                self.phase = Phase::Pending(operation);
                Ok(Transition::AwaitGateway(operation))
            }
        }
    }

    fn advance(&mut self) -> Transition {
        if self.index + 1 == self.definition.steps.len() {
            self.phase = Phase::Completed;
            Transition::Completed
        } else {
            self.index += 1;
            self.phase = Phase::Editing;
            Transition::Advanced {
                to: self.current_step().id,
            }
        }
    }

    /// Feeds the outcome of the in-flight gateway call back into the session.
    pub fn resolve(
        &mut self,
        outcome: std::result::Result<GatewayResponse, GatewayError>,
    ) -> Result<Transition> {
        let operation = match &self.phase {
            Phase::Pending(operation) => *operation,
            _ => return Err(WizardError::NotPending),
        };
        match outcome {
            Ok(response) => {
                // later outcomes were derived from the one being replaced
                let index = self.index;
                self.responses.retain(|step, _| *step < index);
                self.responses.insert(index, response);
                Ok(self.advance())
            }
            Err(error) => {
                let failure = Failure::from_gateway(&error, &operation);
                self.phase = Phase::Failed(failure.clone());
                Ok(Transition::Failed(failure))
            }
        }
    }

    /// Leaves the error state, clearing the field that caused a not-found
    /// result so the user can type it again.
    pub fn edit_details(&mut self) -> Result<()> {
        self.ensure_editable()?;
        if let Phase::Failed(failure) = &self.phase {
            if let Some(field) = failure.reset_field {
                self.values.remove(field);
            }
            self.phase = Phase::Editing;
        }
        Ok(())
    }

    pub fn back(&mut self) -> Result<BackTransition> {
        match self.phase {
            Phase::Completed | Phase::Exited => return Err(WizardError::SessionClosed),
            Phase::Pending(_) => return Err(WizardError::Busy),
            Phase::Failed(_) => {
                self.phase = Phase::Editing;
                return Ok(BackTransition::Dismissed);
            }
            Phase::Editing => {}
        }
        if self.index == 0 {
            self.phase = Phase::Exited;
            return Ok(BackTransition::ExitFlow);
        }
        self.index -= 1;
        Ok(BackTransition::Moved {
            to: self.current_step().id,
        })
    }
}
