use anyhow::{anyhow, Result};
use std::collections::HashMap;

/// Product-tuned cutoffs used by the insight strings and tail metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightThresholds {
    /// Relative expectancy edge for one side to "outperform" the other (0.2 = 20%).
    pub direction_outperform_margin: f64,
    /// A loss is "large" at this multiple of the average loss.
    pub large_loss_multiple: f64,
    /// Payoff warns about large losses above this rate (percent of trades).
    pub payoff_large_loss_warning_rate: f64,
    /// Payoff warns about exits when capture drops below this ratio.
    pub capture_warning_ratio: f64,
    pub p95_min_losses: usize,
    pub p95_percentile: f64,
    /// Swing insight calls out the worst day from this nuke ratio upwards.
    pub nuke_ratio_warning: f64,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            direction_outperform_margin: 0.2,
            large_loss_multiple: 2.0,
            payoff_large_loss_warning_rate: 5.0,
            capture_warning_ratio: 0.35,
            p95_min_losses: 5,
            p95_percentile: 95.0,
            nuke_ratio_warning: 10.0,
        }
    }
}

impl InsightThresholds {
    /// Builds thresholds from a settings map; absent keys keep their defaults.
    pub fn from_settings_map(settings: &HashMap<String, String>) -> Result<Self> {
        let defaults = Self::default();

        let direction_outperform_margin = optional_setting_f64(
            settings,
            "DIRECTION_OUTPERFORM_MARGIN",
            defaults.direction_outperform_margin,
            Some(0.0),
            None,
        )?;
        let large_loss_multiple = optional_setting_f64(
            settings,
            "LARGE_LOSS_MULTIPLE",
            defaults.large_loss_multiple,
            Some(0.0),
            None,
        )?;
        let payoff_large_loss_warning_rate = optional_setting_f64(
            settings,
            "PAYOFF_LARGE_LOSS_WARNING_RATE",
            defaults.payoff_large_loss_warning_rate,
            Some(0.0),
            Some(100.0),
        )?;
        let capture_warning_ratio = optional_setting_f64(
            settings,
            "CAPTURE_WARNING_RATIO",
            defaults.capture_warning_ratio,
            Some(0.0),
            None,
        )?;
        let p95_min_losses =
            optional_setting_usize(settings, "P95_MIN_LOSSES", defaults.p95_min_losses, 1)?;
        let p95_percentile = optional_setting_f64(
            settings,
            "P95_PERCENTILE",
            defaults.p95_percentile,
            Some(0.0),
            Some(100.0),
        )?;
        let nuke_ratio_warning = optional_setting_f64(
            settings,
            "NUKE_RATIO_WARNING",
            defaults.nuke_ratio_warning,
            Some(0.0),
            None,
        )?;

        if large_loss_multiple <= 0.0 {
            return Err(anyhow!(
                "LARGE_LOSS_MULTIPLE must be > 0 (value: {})",
                large_loss_multiple
            ));
        }

        Ok(Self {
            direction_outperform_margin,
            large_loss_multiple,
            payoff_large_loss_warning_rate,
            capture_warning_ratio,
            p95_min_losses,
            p95_percentile,
            nuke_ratio_warning,
        })
    }

    /// Collects `METRICS_`-prefixed environment variables into a settings map.
    pub fn settings_from_env() -> HashMap<String, String> {
        std::env::vars()
            .filter_map(|(key, value)| {
                key.strip_prefix("METRICS_")
                    .map(|name| (name.to_string(), value))
            })
            .collect()
    }
}

fn optional_setting<'a>(settings: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    settings
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn optional_setting_f64(
    settings: &HashMap<String, String>,
    key: &str,
    default: f64,
    min: Option<f64>,
    max: Option<f64>,
) -> Result<f64> {
    let Some(raw) = optional_setting(settings, key) else {
        return Ok(default);
    };
    let value = raw
        .parse::<f64>()
        .map_err(|_| anyhow!("Setting {} must be a number (value: {})", key, raw))?;
    if !value.is_finite() {
        return Err(anyhow!("Setting {} must be finite (value: {})", key, raw));
    }
    if let Some(min_value) = min {
        if value < min_value {
            return Err(anyhow!(
                "Setting {} must be >= {} (value: {})",
                key,
                min_value,
                raw
            ));
        }
    }
    if let Some(max_value) = max {
        if value > max_value {
            return Err(anyhow!(
                "Setting {} must be <= {} (value: {})",
                key,
                max_value,
                raw
            ));
        }
    }
    Ok(value)
}

fn optional_setting_usize(
    settings: &HashMap<String, String>,
    key: &str,
    default: usize,
    min: usize,
) -> Result<usize> {
    let Some(raw) = optional_setting(settings, key) else {
        return Ok(default);
    };
    let value = raw
        .parse::<usize>()
        .map_err(|_| anyhow!("Setting {} must be a non-negative integer (value: {})", key, raw))?;
    if value < min {
        return Err(anyhow!(
            "Setting {} must be >= {} (value: {})",
            key,
            min,
            raw
        ));
    }
    Ok(value)
}
