//! Persisted cost record.
//!
//! A record is one flat document holding the specification a quote was
//! computed from next to every derived total. Dual-mode components are
//! spread over a mode field and two optional amounts.

use super::quote::{
    CostResult, CostSpecification, DualModePrice, LineItem, PriceType, PricingMode,
};
use super::stored_now;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoredLineItem {
    pub quantity: u32,
    pub unit_price: f64,
    pub total_price: f64,
}

impl From<&LineItem> for StoredLineItem {
    fn from(item: &LineItem) -> Self {
        Self {
            quantity: item.quantity,
            unit_price: item.unit_price,
            total_price: item.total_price(),
        }
    }
}

impl From<&StoredLineItem> for LineItem {
    fn from(item: &StoredLineItem) -> Self {
        Self {
            quantity: item.quantity,
            unit_price: item.unit_price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub system_id: String,

    // Panels
    pub watts_per_panel: f64,
    pub panel_count: u32,
    pub rate_per_watt: f64,
    pub total_watts: f64,
    pub total_panels_price: f64,

    // Inverters and batteries
    pub inverters: Vec<StoredLineItem>,
    pub total_inverters_price: f64,
    pub batteries: Vec<StoredLineItem>,
    pub total_batteries_price: f64,

    // Cables, breakers, battery components
    pub cable_dc_price: f64,
    pub cable_ac_price: f64,
    pub breaker_dc_price: f64,
    pub breaker_ac_price: f64,
    pub breaker_battery_price: f64,
    pub battery_cable_price: f64,
    pub lux_battery_price: f64,

    // Infrastructure
    pub change_over_price: f64,
    pub db_price: f64,
    pub accessories_price: f64,
    pub transportation_price: f64,

    // Service and frames
    pub service_type: PricingMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_per_watt_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_total_price: Option<f64>,
    pub service_price: f64,
    pub frames_type: PricingMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames_per_watt_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames_total_price: Option<f64>,
    pub frames_price: f64,

    // Additional components
    pub netmetering_price: f64,
    pub earthing_price: f64,
    pub loopers_spd_price: f64,

    pub total_price: f64,

    // Profit
    pub profit_percentage: f64,
    pub profit_amount: f64,
    pub profit_with_percentage: f64,
    pub profit_with_amount: f64,

    // Final price
    pub final_price_with_percentage: f64,
    pub final_price_with_amount: f64,
    pub selected_price_type: PriceType,
    pub final_price: f64,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl CostRecord {
    pub fn new(system_id: String, spec: &CostSpecification, result: &CostResult) -> Self {
        let now = stored_now();
        let (service_per_watt_rate, service_total_price) = split_dual_mode(&spec.service);
        let (frames_per_watt_rate, frames_total_price) = split_dual_mode(&spec.frames);

        Self {
            id: Uuid::new_v4().to_string(),
            system_id,
            watts_per_panel: spec.watts_per_panel,
            panel_count: spec.panel_count,
            rate_per_watt: spec.rate_per_watt,
            total_watts: result.total_watts,
            total_panels_price: result.total_panels_price,
            inverters: spec.inverters.iter().map(StoredLineItem::from).collect(),
            total_inverters_price: result.total_inverters_price,
            batteries: spec.batteries.iter().map(StoredLineItem::from).collect(),
            total_batteries_price: result.total_batteries_price,
            cable_dc_price: spec.cable_dc_price,
            cable_ac_price: spec.cable_ac_price,
            breaker_dc_price: spec.breaker_dc_price,
            breaker_ac_price: spec.breaker_ac_price,
            breaker_battery_price: spec.breaker_battery_price,
            battery_cable_price: spec.battery_cable_price,
            lux_battery_price: spec.lux_battery_price,
            change_over_price: spec.change_over_price,
            db_price: spec.db_price,
            accessories_price: spec.accessories_price,
            transportation_price: spec.transportation_price,
            service_type: spec.service.mode(),
            service_per_watt_rate,
            service_total_price,
            service_price: result.service_price,
            frames_type: spec.frames.mode(),
            frames_per_watt_rate,
            frames_total_price,
            frames_price: result.frames_price,
            netmetering_price: spec.netmetering_price,
            earthing_price: spec.earthing_price,
            loopers_spd_price: spec.loopers_spd_price,
            total_price: result.total_price,
            profit_percentage: spec.profit_percentage,
            profit_amount: spec.profit_amount,
            profit_with_percentage: result.profit_with_percentage,
            profit_with_amount: result.profit_with_amount,
            final_price_with_percentage: result.final_price_with_percentage,
            final_price_with_amount: result.final_price_with_amount,
            selected_price_type: spec.selected_price_type,
            final_price: result.final_price,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every specification and result field, keeping identity and
    /// creation time.
    pub fn resubmitted(&self, spec: &CostSpecification, result: &CostResult) -> Self {
        Self {
            id: self.id.clone(),
            created_at: self.created_at,
            ..Self::new(self.system_id.clone(), spec, result)
        }
    }

    /// Rebuild the specification this record was computed from.
    pub fn specification(&self) -> anyhow::Result<CostSpecification> {
        Ok(CostSpecification {
            watts_per_panel: self.watts_per_panel,
            panel_count: self.panel_count,
            rate_per_watt: self.rate_per_watt,
            inverters: self.inverters.iter().map(LineItem::from).collect(),
            batteries: self.batteries.iter().map(LineItem::from).collect(),
            cable_dc_price: self.cable_dc_price,
            cable_ac_price: self.cable_ac_price,
            breaker_dc_price: self.breaker_dc_price,
            breaker_ac_price: self.breaker_ac_price,
            breaker_battery_price: self.breaker_battery_price,
            battery_cable_price: self.battery_cable_price,
            lux_battery_price: self.lux_battery_price,
            change_over_price: self.change_over_price,
            db_price: self.db_price,
            accessories_price: self.accessories_price,
            transportation_price: self.transportation_price,
            netmetering_price: self.netmetering_price,
            earthing_price: self.earthing_price,
            loopers_spd_price: self.loopers_spd_price,
            service: join_dual_mode(
                "service",
                self.service_type,
                self.service_per_watt_rate,
                self.service_total_price,
            )?,
            frames: join_dual_mode(
                "frames",
                self.frames_type,
                self.frames_per_watt_rate,
                self.frames_total_price,
            )?,
            profit_percentage: self.profit_percentage,
            profit_amount: self.profit_amount,
            selected_price_type: self.selected_price_type,
        })
    }

    pub fn result(&self) -> CostResult {
        CostResult {
            total_watts: self.total_watts,
            total_panels_price: self.total_panels_price,
            total_inverters_price: self.total_inverters_price,
            total_batteries_price: self.total_batteries_price,
            service_price: self.service_price,
            frames_price: self.frames_price,
            total_price: self.total_price,
            profit_with_percentage: self.profit_with_percentage,
            profit_with_amount: self.profit_with_amount,
            final_price_with_percentage: self.final_price_with_percentage,
            final_price_with_amount: self.final_price_with_amount,
            final_price: self.final_price,
        }
    }
}

fn split_dual_mode(price: &DualModePrice) -> (Option<f64>, Option<f64>) {
    match *price {
        DualModePrice::PerWatt { per_watt_rate } => (Some(per_watt_rate), None),
        DualModePrice::Total { total_price } => (None, Some(total_price)),
    }
}

fn join_dual_mode(
    component: &str,
    mode: PricingMode,
    per_watt_rate: Option<f64>,
    total_price: Option<f64>,
) -> anyhow::Result<DualModePrice> {
    match (mode, per_watt_rate, total_price) {
        (PricingMode::PerWatt, Some(per_watt_rate), _) => {
            Ok(DualModePrice::PerWatt { per_watt_rate })
        }
        (PricingMode::Total, _, Some(total_price)) => Ok(DualModePrice::Total { total_price }),
        _ => Err(anyhow::anyhow!(
            "Stored {} price has mode {:?} without its amount",
            component,
            mode
        )),
    }
}
