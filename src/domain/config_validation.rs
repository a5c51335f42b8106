//! Configuration validation.
//!
//! Every key is optional and falls back to a default, but a key that is
//! present must hold a usable value.

use crate::domain::advisor::AnalysisMode;
use crate::domain::error::TwodayError;
use crate::ports::config_port::ConfigPort;

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), TwodayError> {
    validate_period(config, "ma_short")?;
    validate_period(config, "ma_long")?;
    validate_mode(config)?;
    Ok(())
}

pub fn validate_risk_config(config: &dyn ConfigPort) -> Result<(), TwodayError> {
    validate_total_assets(config)?;
    validate_risk_fraction(config)?;
    validate_stop_loss_pct(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> TwodayError {
    TwodayError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_period(config: &dyn ConfigPort, key: &str) -> Result<(), TwodayError> {
    let Some(raw) = config.get_string("strategy", key) else {
        return Ok(());
    };
    match raw.trim().parse::<i64>() {
        Ok(p) if p >= 1 => Ok(()),
        Ok(_) => Err(invalid("strategy", key, "period must be at least 1")),
        Err(_) => Err(invalid("strategy", key, "period must be an integer")),
    }
}

fn validate_mode(config: &dyn ConfigPort) -> Result<(), TwodayError> {
    match config.get_string("strategy", "mode") {
        None => Ok(()),
        Some(raw) => raw
            .parse::<AnalysisMode>()
            .map(|_| ())
            .map_err(|_| invalid("strategy", "mode", "mode must be short or long")),
    }
}

/// Parse a present `[risk]` key as a finite number. Absent keys are `None`.
fn risk_value(config: &dyn ConfigPort, key: &str) -> Result<Option<f64>, TwodayError> {
    let Some(raw) = config.get_string("risk", key) else {
        return Ok(None);
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        Ok(_) => Err(invalid("risk", key, "value must be a finite number")),
        Err(_) => Err(invalid("risk", key, "value must be a number")),
    }
}

fn validate_total_assets(config: &dyn ConfigPort) -> Result<(), TwodayError> {
    if let Some(value) = risk_value(config, "total_assets")? {
        if value <= 0.0 {
            return Err(invalid("risk", "total_assets", "total_assets must be positive"));
        }
    }
    Ok(())
}

fn validate_risk_fraction(config: &dyn ConfigPort) -> Result<(), TwodayError> {
    if let Some(value) = risk_value(config, "risk_fraction")? {
        if value <= 0.0 || value >= 1.0 {
            return Err(invalid(
                "risk",
                "risk_fraction",
                "risk_fraction must be between 0 and 1",
            ));
        }
    }
    Ok(())
}

fn validate_stop_loss_pct(config: &dyn ConfigPort) -> Result<(), TwodayError> {
    if let Some(value) = risk_value(config, "stop_loss_pct")? {
        if value <= 0.0 || value >= 100.0 {
            return Err(invalid(
                "risk",
                "stop_loss_pct",
                "stop_loss_pct must be between 0 and 100",
            ));
        }
    }
    Ok(())
}
