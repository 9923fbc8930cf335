//! Pricing engine.
//!
//! Turns a [`CostSpecification`] into its [`CostResult`]. The computation is
//! pure and runs the same steps in the same order on every call, so two calls
//! with equal input produce bit-identical output.

use crate::models::{CostResult, CostSpecification, PriceType};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("Invalid input: {field} must be a finite number, got {value}")]
    InvalidInput { field: String, value: f64 },
}

/// Compute every derived total of a quotation.
///
/// Fails only when an input, or a total derived from finite inputs, is not a
/// finite number.
pub fn compute(spec: &CostSpecification) -> Result<CostResult, PricingError> {
    ensure_finite_inputs(spec)?;

    let total_watts = spec.watts_per_panel * f64::from(spec.panel_count);
    let total_panels_price = total_watts * spec.rate_per_watt;
    let total_inverters_price = spec
        .inverters
        .iter()
        .fold(0.0, |total, item| total + item.total_price());
    let total_batteries_price = spec
        .batteries
        .iter()
        .fold(0.0, |total, item| total + item.total_price());
    let service_price = spec.service.price_for(total_watts);
    let frames_price = spec.frames.price_for(total_watts);

    let total_price = total_panels_price
        + total_inverters_price
        + total_batteries_price
        + spec.cable_dc_price
        + spec.cable_ac_price
        + spec.breaker_dc_price
        + spec.breaker_ac_price
        + spec.breaker_battery_price
        + spec.battery_cable_price
        + spec.lux_battery_price
        + spec.change_over_price
        + spec.db_price
        + spec.accessories_price
        + spec.transportation_price
        + service_price
        + frames_price
        + spec.netmetering_price
        + spec.earthing_price
        + spec.loopers_spd_price;

    let profit_with_percentage = total_price * spec.profit_percentage / 100.0;
    let profit_with_amount = spec.profit_amount;
    let final_price_with_percentage = total_price + profit_with_percentage;
    let final_price_with_amount = total_price + profit_with_amount;
    let final_price = match spec.selected_price_type {
        PriceType::Percentage => final_price_with_percentage,
        PriceType::Amount => final_price_with_amount,
    };

    let result = CostResult {
        total_watts,
        total_panels_price,
        total_inverters_price,
        total_batteries_price,
        service_price,
        frames_price,
        total_price,
        profit_with_percentage,
        profit_with_amount,
        final_price_with_percentage,
        final_price_with_amount,
        final_price,
    };

    // Finite inputs can still overflow
    if let Some((field, value)) = result.fields().into_iter().find(|(_, v)| !v.is_finite()) {
        return Err(PricingError::InvalidInput {
            field: field.to_string(),
            value,
        });
    }

    Ok(result)
}

fn ensure_finite_inputs(spec: &CostSpecification) -> Result<(), PricingError> {
    match spec
        .numeric_fields()
        .into_iter()
        .find(|(_, value)| !value.is_finite())
    {
        Some((field, value)) => Err(PricingError::InvalidInput { field, value }),
        None => Ok(()),
    }
}
