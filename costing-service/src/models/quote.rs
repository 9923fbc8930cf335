//! Value types of a cost quotation.
//!
//! [`CostSpecification`] holds the raw itemized inputs collected from the
//! calculator form, [`CostResult`] everything the pricing engine derives from
//! them. Both travel over the wire in camelCase, and the specification also
//! accepts the field names used by the legacy calculator form.

use serde::{Deserialize, Serialize};

/// Which profit model determines the final quoted price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    Percentage,
    Amount,
}

impl PriceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceType::Percentage => "percentage",
            PriceType::Amount => "amount",
        }
    }
}

impl std::fmt::Display for PriceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminator of a [`DualModePrice`], stored alongside its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricingMode {
    #[serde(rename = "perWatt")]
    PerWatt,
    #[serde(rename = "total")]
    Total,
}

/// A component priced either per installed watt or as a flat total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum DualModePrice {
    #[serde(rename = "perWatt")]
    PerWatt {
        #[serde(rename = "perWattRate")]
        per_watt_rate: f64,
    },
    #[serde(rename = "total")]
    Total {
        #[serde(rename = "totalPrice")]
        total_price: f64,
    },
}

impl DualModePrice {
    pub fn mode(&self) -> PricingMode {
        match self {
            DualModePrice::PerWatt { .. } => PricingMode::PerWatt,
            DualModePrice::Total { .. } => PricingMode::Total,
        }
    }

    /// The price of this component for a system of `total_watts`.
    pub fn price_for(&self, total_watts: f64) -> f64 {
        match *self {
            DualModePrice::PerWatt { per_watt_rate } => total_watts * per_watt_rate,
            DualModePrice::Total { total_price } => total_price,
        }
    }

    fn amount(&self) -> f64 {
        match *self {
            DualModePrice::PerWatt { per_watt_rate } => per_watt_rate,
            DualModePrice::Total { total_price } => total_price,
        }
    }
}

/// One inverter or battery line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub quantity: u32,
    #[serde(alias = "price")]
    pub unit_price: f64,
}

impl LineItem {
    pub fn total_price(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }
}

/// Raw itemized inputs of a price quotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSpecification {
    #[serde(alias = "totalWattsPerPanel")]
    pub watts_per_panel: f64,
    #[serde(alias = "totalPanels")]
    pub panel_count: u32,
    pub rate_per_watt: f64,

    pub inverters: Vec<LineItem>,
    pub batteries: Vec<LineItem>,

    #[serde(rename = "cableDCPrice")]
    pub cable_dc_price: f64,
    #[serde(rename = "cableACPrice")]
    pub cable_ac_price: f64,
    #[serde(rename = "breakerDCPrice")]
    pub breaker_dc_price: f64,
    #[serde(rename = "breakerACPrice")]
    pub breaker_ac_price: f64,
    pub breaker_battery_price: f64,
    pub battery_cable_price: f64,
    pub lux_battery_price: f64,
    pub change_over_price: f64,
    pub db_price: f64,
    pub accessories_price: f64,
    pub transportation_price: f64,
    pub netmetering_price: f64,
    pub earthing_price: f64,
    #[serde(rename = "loopersSPDPrice")]
    pub loopers_spd_price: f64,

    pub service: DualModePrice,
    pub frames: DualModePrice,

    pub profit_percentage: f64,
    pub profit_amount: f64,
    pub selected_price_type: PriceType,
}

impl CostSpecification {
    /// Every numeric input paired with its wire name, line items indexed.
    pub fn numeric_fields(&self) -> Vec<(String, f64)> {
        let mut fields = vec![
            ("wattsPerPanel".to_string(), self.watts_per_panel),
            ("ratePerWatt".to_string(), self.rate_per_watt),
        ];

        for (group, items) in [("inverters", &self.inverters), ("batteries", &self.batteries)] {
            for (i, item) in items.iter().enumerate() {
                fields.push((format!("{}[{}].unitPrice", group, i), item.unit_price));
            }
        }

        fields.extend(
            self.component_prices()
                .into_iter()
                .map(|(name, value)| (name.to_string(), value)),
        );

        let service_field = match self.service.mode() {
            PricingMode::PerWatt => "service.perWattRate",
            PricingMode::Total => "service.totalPrice",
        };
        let frames_field = match self.frames.mode() {
            PricingMode::PerWatt => "frames.perWattRate",
            PricingMode::Total => "frames.totalPrice",
        };
        fields.push((service_field.to_string(), self.service.amount()));
        fields.push((frames_field.to_string(), self.frames.amount()));
        fields.push(("profitPercentage".to_string(), self.profit_percentage));
        fields.push(("profitAmount".to_string(), self.profit_amount));

        fields
    }

    /// The flat component prices, in quotation order.
    pub fn component_prices(&self) -> [(&'static str, f64); 14] {
        [
            ("cableDCPrice", self.cable_dc_price),
            ("cableACPrice", self.cable_ac_price),
            ("breakerDCPrice", self.breaker_dc_price),
            ("breakerACPrice", self.breaker_ac_price),
            ("breakerBatteryPrice", self.breaker_battery_price),
            ("batteryCablePrice", self.battery_cable_price),
            ("luxBatteryPrice", self.lux_battery_price),
            ("changeOverPrice", self.change_over_price),
            ("dbPrice", self.db_price),
            ("accessoriesPrice", self.accessories_price),
            ("transportationPrice", self.transportation_price),
            ("netmeteringPrice", self.netmetering_price),
            ("earthingPrice", self.earthing_price),
            ("loopersSPDPrice", self.loopers_spd_price),
        ]
    }
}

/// Everything derived from a [`CostSpecification`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostResult {
    pub total_watts: f64,
    pub total_panels_price: f64,
    pub total_inverters_price: f64,
    pub total_batteries_price: f64,
    pub service_price: f64,
    pub frames_price: f64,
    pub total_price: f64,
    pub profit_with_percentage: f64,
    pub profit_with_amount: f64,
    pub final_price_with_percentage: f64,
    pub final_price_with_amount: f64,
    pub final_price: f64,
}

impl CostResult {
    pub fn fields(&self) -> [(&'static str, f64); 12] {
        [
            ("totalWatts", self.total_watts),
            ("totalPanelsPrice", self.total_panels_price),
            ("totalInvertersPrice", self.total_inverters_price),
            ("totalBatteriesPrice", self.total_batteries_price),
            ("servicePrice", self.service_price),
            ("framesPrice", self.frames_price),
            ("totalPrice", self.total_price),
            ("profitWithPercentage", self.profit_with_percentage),
            ("profitWithAmount", self.profit_with_amount),
            ("finalPriceWithPercentage", self.final_price_with_percentage),
            ("finalPriceWithAmount", self.final_price_with_amount),
            ("finalPrice", self.final_price),
        ]
    }

    /// First field where `claimed` differs from `self` by more than
    /// `tolerance` relative to `max(1, |expected|)`.
    pub fn first_mismatch(
        &self,
        claimed: &CostResult,
        tolerance: f64,
    ) -> Option<FieldMismatch> {
        self.fields()
            .into_iter()
            .zip(claimed.fields())
            .find(|((_, expected), (_, submitted))| {
                let allowed = tolerance * expected.abs().max(1.0);
                // NaN never compares within tolerance
                !((expected - submitted).abs() <= allowed)
            })
            .map(|((field, expected), (_, submitted))| FieldMismatch {
                field,
                expected,
                submitted,
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldMismatch {
    pub field: &'static str,
    pub expected: f64,
    pub submitted: f64,
}
