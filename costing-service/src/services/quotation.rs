//! Server-side quoting of submitted cost specifications.
//!
//! Every specification that reaches the store is priced here: negative
//! amounts are refused, the pricing engine recomputes all totals, and any
//! totals the caller sent along must agree with that recomputation.

use crate::models::{CostResult, CostSpecification};
use crate::services::metrics::{record_quote_computed, record_quote_rejected};
use crate::services::pricing::{compute, PricingError};
use service_core::error::AppError;

/// Where a quote request came from, kept apart in the quote counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteSource {
    /// Live calculator display, nothing is stored.
    Preview,
    /// A cost record being created or re-submitted.
    Submission,
}

impl QuoteSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteSource::Preview => "preview",
            QuoteSource::Submission => "submission",
        }
    }
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        AppError::InvalidInput(anyhow::Error::new(err))
    }
}

/// Price `spec` and check it against the caller's own `claimed` totals.
///
/// The returned result is always the server's recomputation.
pub fn quote(
    spec: &CostSpecification,
    claimed: Option<&CostResult>,
    tolerance: f64,
    source: QuoteSource,
) -> Result<CostResult, AppError> {
    let source = source.as_str();

    if let Some((field, value)) = spec
        .numeric_fields()
        .into_iter()
        .find(|(_, value)| *value < 0.0)
    {
        record_quote_rejected("negative_input", source);
        return Err(AppError::InvalidInput(anyhow::anyhow!(
            "{} must not be negative, got {}",
            field,
            value
        )));
    }

    let result = compute(spec).map_err(|e| {
        record_quote_rejected("invalid_input", source);
        AppError::from(e)
    })?;

    if let Some(mismatch) = claimed.and_then(|claimed| result.first_mismatch(claimed, tolerance)) {
        record_quote_rejected("result_mismatch", source);
        tracing::warn!(
            field = mismatch.field,
            expected = mismatch.expected,
            submitted = mismatch.submitted,
            "Submitted totals disagree with recomputation"
        );
        return Err(AppError::InvalidInput(anyhow::anyhow!(
            "{} does not match the computed value: expected {}, got {}",
            mismatch.field,
            mismatch.expected,
            mismatch.submitted
        )));
    }

    record_quote_computed(spec.selected_price_type, source);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DualModePrice, LineItem, PriceType};
    use axum::http::StatusCode;
    use metrics_exporter_prometheus::PrometheusBuilder;

    fn spec() -> CostSpecification {
        CostSpecification {
            watts_per_panel: 550.0,
            panel_count: 10,
            rate_per_watt: 20.0,
            inverters: vec![LineItem {
                quantity: 1,
                unit_price: 50000.0,
            }],
            batteries: vec![],
            cable_dc_price: 0.0,
            cable_ac_price: 0.0,
            breaker_dc_price: 0.0,
            breaker_ac_price: 0.0,
            breaker_battery_price: 0.0,
            battery_cable_price: 0.0,
            lux_battery_price: 0.0,
            change_over_price: 0.0,
            db_price: 0.0,
            accessories_price: 0.0,
            transportation_price: 0.0,
            netmetering_price: 0.0,
            earthing_price: 0.0,
            loopers_spd_price: 0.0,
            service: DualModePrice::PerWatt { per_watt_rate: 2.0 },
            frames: DualModePrice::Total { total_price: 0.0 },
            profit_percentage: 10.0,
            profit_amount: 0.0,
            selected_price_type: PriceType::Percentage,
        }
    }

    fn details(err: AppError) -> String {
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        err.to_string()
    }

    #[test]
    fn test_quote_without_claim() {
        let result = quote(&spec(), None, 1e-6, QuoteSource::Submission).unwrap();
        assert_eq!(result.service_price, 11000.0);
        assert_eq!(result.final_price, 188100.0);
    }

    #[test]
    fn test_matching_claim_accepted() {
        let expected = compute(&spec()).unwrap();
        let mut claimed = expected;
        // Within relative tolerance of 188100
        claimed.final_price += 0.1;
        claimed.final_price_with_percentage += 0.1;

        let result = quote(&spec(), Some(&claimed), 1e-6, QuoteSource::Submission).unwrap();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_mismatching_claim_rejected() {
        let mut claimed = compute(&spec()).unwrap();
        claimed.service_price = 0.0;

        let message = details(
            quote(&spec(), Some(&claimed), 1e-6, QuoteSource::Submission).unwrap_err(),
        );
        assert!(message.contains("servicePrice"), "{}", message);
    }

    #[test]
    fn test_zero_tolerance_requires_exact_match() {
        let mut claimed = compute(&spec()).unwrap();
        claimed.total_watts = 5500.000001;
        assert!(quote(&spec(), Some(&claimed), 0.0, QuoteSource::Submission).is_err());

        let claimed = compute(&spec()).unwrap();
        assert!(quote(&spec(), Some(&claimed), 0.0, QuoteSource::Submission).is_ok());
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut spec = spec();
        spec.db_price = -1.0;
        let message =
            details(quote(&spec, None, 1e-6, QuoteSource::Submission).unwrap_err());
        assert!(message.contains("dbPrice"), "{}", message);
    }

    #[test]
    fn test_negative_line_item_rejected() {
        let mut spec = spec();
        spec.inverters.push(LineItem {
            quantity: 2,
            unit_price: -10.0,
        });
        let message =
            details(quote(&spec, None, 1e-6, QuoteSource::Submission).unwrap_err());
        assert!(message.contains("inverters[1].unitPrice"), "{}", message);
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let mut spec = spec();
        spec.accessories_price = f64::INFINITY;
        let message =
            details(quote(&spec, None, 1e-6, QuoteSource::Submission).unwrap_err());
        assert!(message.contains("accessoriesPrice"), "{}", message);
    }

    fn counter_value(rendered: &str, name: &str, labels: &[&str]) -> Option<u64> {
        rendered
            .lines()
            .filter(|line| line.starts_with(name))
            .find(|line| labels.iter().all(|label| line.contains(label)))
            .and_then(|line| line.rsplit(' ').next())
            .and_then(|value| value.parse().ok())
    }

    #[test]
    fn test_previews_counted_apart_from_submissions() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            quote(&spec(), None, 1e-6, QuoteSource::Preview).unwrap();
            quote(&spec(), None, 1e-6, QuoteSource::Preview).unwrap();
            quote(&spec(), None, 1e-6, QuoteSource::Submission).unwrap();

            let mut negative = spec();
            negative.db_price = -1.0;
            quote(&negative, None, 1e-6, QuoteSource::Preview).unwrap_err();
        });

        let rendered = handle.render();
        assert_eq!(
            counter_value(
                &rendered,
                "cost_quotes_computed_total",
                &["source=\"preview\""]
            ),
            Some(2)
        );
        assert_eq!(
            counter_value(
                &rendered,
                "cost_quotes_computed_total",
                &["source=\"submission\""]
            ),
            Some(1)
        );
        assert_eq!(
            counter_value(
                &rendered,
                "cost_quotes_rejected_total",
                &["reason=\"negative_input\"", "source=\"preview\""]
            ),
            Some(1)
        );
    }
}
