//! Application layer: running wizard sessions against their collaborators.
//!
//! [`engine::WizardEngine`] is the entry point for advancing a session. It
//! builds gateway requests from session values and feeds the canned outcome
//! back in. The flow catalog, summary renderer and back-button interceptor
//! sit alongside it.

pub mod engine;
pub mod flows;
pub mod navigation;
pub mod summary;
