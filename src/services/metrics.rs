use time::Date;

use crate::config::MetricsConfig;
use crate::models::Metrics;

/// Headline metrics as of `today`.
///
/// With a configured raid start date the countdown is derived from it and
/// never goes below zero; otherwise the configured constant is reported.
pub fn current_metrics(config: &MetricsConfig, today: Date) -> Metrics {
    let days_to_go = match config.raid_start_date {
        Some(start) => (start - today).whole_days().max(0),
        None => config.days_to_go,
    };

    Metrics {
        km: config.km,
        kg: config.kg,
        sponsors: config.sponsors,
        days_to_go,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_constant_countdown_without_start_date() {
        let config = MetricsConfig::default();
        let metrics = current_metrics(&config, date!(2026 - 01 - 10));
        assert_eq!(metrics.days_to_go, 42);
        assert_eq!(metrics.km, 3_200.0);
        assert_eq!(metrics.sponsors, 10);
    }

    #[test]
    fn test_countdown_from_start_date() {
        let config = MetricsConfig {
            raid_start_date: Some(date!(2026 - 02 - 21)),
            ..MetricsConfig::default()
        };
        assert_eq!(current_metrics(&config, date!(2026 - 02 - 01)).days_to_go, 20);
        assert_eq!(current_metrics(&config, date!(2026 - 02 - 21)).days_to_go, 0);
        // After departure the countdown stays at zero
        assert_eq!(current_metrics(&config, date!(2026 - 03 - 05)).days_to_go, 0);
    }

    #[test]
    fn test_metrics_wire_format() {
        let metrics = current_metrics(&MetricsConfig::default(), date!(2026 - 01 - 01));
        let json = serde_json::to_value(metrics).unwrap();
        assert_eq!(json["daysToGo"], 42);
        assert_eq!(json["kg"], 84.0);
    }
}
