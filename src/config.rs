use crate::domain::document::MIB;
use crate::domain::flow::FlowKind;
use crate::error::{Result, WizardError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Top-level settings, loaded from TOML. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub flows: FlowConfig,
    pub latency: LatencyConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlowConfig {
    /// Either 4 or 6.
    pub otp_length: usize,
    /// Smallest recharge or top-up accepted, in rupees.
    pub minimum_amount: Decimal,
    /// Ceiling for identity documents (Aadhaar, PM-JAY).
    pub identity_upload_max_bytes: u64,
    /// Ceiling for land-record documents (Ferfar).
    pub record_upload_max_bytes: u64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            otp_length: 6,
            minimum_amount: dec!(100),
            identity_upload_max_bytes: 2 * MIB,
            record_upload_max_bytes: 5 * MIB,
        }
    }
}

/// Simulated gateway latency per operation, in milliseconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LatencyConfig {
    pub send_otp_ms: u64,
    pub fetch_bill_ms: u64,
    pub broadband_fetch_ms: u64,
    pub verify_ms: u64,
    pub payment_ms: u64,
    pub application_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            send_otp_ms: 1500,
            fetch_bill_ms: 2000,
            broadband_fetch_ms: 2200,
            verify_ms: 2500,
            payment_ms: 1200,
            application_ms: 2000,
        }
    }
}

impl LatencyConfig {
    pub fn send_otp(&self) -> Duration {
        Duration::from_millis(self.send_otp_ms)
    }

    pub fn fetch_bill(&self, flow: FlowKind) -> Duration {
        match flow {
            FlowKind::Broadband => Duration::from_millis(self.broadband_fetch_ms),
            _ => Duration::from_millis(self.fetch_bill_ms),
        }
    }

    pub fn verify(&self) -> Duration {
        Duration::from_millis(self.verify_ms)
    }

    pub fn payment(&self) -> Duration {
        Duration::from_millis(self.payment_ms)
    }

    pub fn application(&self) -> Duration {
        Duration::from_millis(self.application_ms)
    }
}

impl AppConfig {
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml(&source)
    }

    fn validate(&self) -> Result<()> {
        let flows = &self.flows;
        if flows.otp_length != 4 && flows.otp_length != 6 {
            return Err(WizardError::InvalidConfig(format!(
                "otp_length must be 4 or 6, got {}",
                flows.otp_length
            )));
        }
        if flows.minimum_amount <= Decimal::ZERO {
            return Err(WizardError::InvalidConfig(
                "minimum_amount must be positive".to_string(),
            ));
        }
        if flows.identity_upload_max_bytes == 0 || flows.record_upload_max_bytes == 0 {
            return Err(WizardError::InvalidConfig(
                "upload ceilings must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
