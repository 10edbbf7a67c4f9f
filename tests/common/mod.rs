#![allow(dead_code)]

use chrono::NaiveDate;
use paywizard::application::engine::WizardEngine;
use paywizard::config::LatencyConfig;
use paywizard::domain::ports::GatewayBox;
use paywizard::infrastructure::clock::InstantClock;
use paywizard::infrastructure::ids::SequentialIdGenerator;
use paywizard::infrastructure::in_memory::ScriptedDocumentPicker;
use paywizard::infrastructure::mock_gateway::MockGateway;
use std::fs::File;
use std::io::Error;
use std::path::Path;
use std::sync::Arc;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

/// A mock gateway on an instant clock with sequential references.
pub fn instant_gateway() -> (GatewayBox, InstantClock) {
    let clock = InstantClock::new(today());
    let gateway: GatewayBox = Arc::new(MockGateway::new(
        LatencyConfig::default(),
        Arc::new(clock.clone()),
        Arc::new(SequentialIdGenerator::new()),
    ));
    (gateway, clock)
}

pub fn instant_engine() -> (WizardEngine, ScriptedDocumentPicker, InstantClock) {
    let (gateway, clock) = instant_gateway();
    let picker = ScriptedDocumentPicker::new();
    let engine = WizardEngine::new(gateway).with_document_picker(Arc::new(picker.clone()));
    (engine, picker, clock)
}

/// Writes an action script. Every row is padded to three columns.
pub fn write_script(path: &Path, rows: &[&[&str]]) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["action", "field", "value"])?;
    for row in rows {
        let mut record = [""; 3];
        for (slot, value) in record.iter_mut().zip(row.iter()) {
            *slot = value;
        }
        wtr.write_record(record)?;
    }

    wtr.flush()?;
    Ok(())
}

pub const POSTPAID_SCRIPT: &[&[&str]] = &[
    &["set", "operator", "Jio"],
    &["continue"],
    &["set", "mobile", "9876543210"],
    &["continue"],
    &["set", "promo", "SAVE50"],
    &["continue"],
];
