//! Pricing engine: pure, total price computation for a customized entry.

use serde::{Deserialize, Serialize};

/// Cost of each sauce unit beyond the first, in whole currency units.
pub const SAUCE_UNIT_COST: u64 = 50;

/// Sauce surcharge for a given intensity: the first unit is on the house,
/// every unit beyond it costs [`SAUCE_UNIT_COST`].
///
/// Total over all inputs — an intensity below 1 is clamped to 1 rather than
/// rejected.
pub fn surcharge(sauce_intensity: u32) -> u64 {
    u64::from(sauce_intensity.max(1) - 1) * SAUCE_UNIT_COST
}

/// Final price of a line: catalog base price plus sauce surcharge.
///
/// The spice flag carries no price effect; it is a preparation attribute
/// only.
pub fn compute_price(base_price: u64, sauce_intensity: u32) -> u64 {
    base_price + surcharge(sauce_intensity)
}

/// Qualitative sauce-intensity tier shown next to the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SauceTier {
    Standard,
    Lover,
    Extreme,
}

impl SauceTier {
    /// Tier for a given intensity: 1 is Standard, 2 is Lover, 3 and above is
    /// Extreme. Intensities below 1 fall into the clamped Standard tier.
    pub fn for_intensity(sauce_intensity: u32) -> Self {
        match sauce_intensity {
            0 | 1 => Self::Standard,
            2 => Self::Lover,
            _ => Self::Extreme,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Lover => "Lover",
            Self::Extreme => "Extreme",
        }
    }
}

impl core::fmt::Display for SauceTier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Display label for a sauce intensity.
pub fn sauce_label(sauce_intensity: u32) -> &'static str {
    SauceTier::for_intensity(sauce_intensity).label()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn first_sauce_unit_is_free() {
        assert_eq!(compute_price(950, 1), 950);
        assert_eq!(surcharge(1), 0);
    }

    #[test]
    fn each_extra_unit_costs_fifty() {
        assert_eq!(compute_price(950, 2), 1000);
        assert_eq!(compute_price(950, 3), 1050);
        assert_eq!(surcharge(4), 150);
    }

    #[test]
    fn intensity_below_one_is_clamped() {
        assert_eq!(compute_price(950, 0), compute_price(950, 1));
        assert_eq!(surcharge(0), 0);
    }

    #[test]
    fn tier_thresholds_are_fixed() {
        assert_eq!(sauce_label(1), "Standard");
        assert_eq!(sauce_label(2), "Lover");
        assert_eq!(sauce_label(3), "Extreme");
        assert_eq!(sauce_label(17), "Extreme");
        // Clamped input lands in the Standard tier.
        assert_eq!(sauce_label(0), "Standard");
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: each additional sauce unit raises the price by exactly
        /// the unit cost, for every intensity >= 1.
        #[test]
        fn price_steps_by_unit_cost(base in 0u64..10_000_000, n in 1u32..10_000) {
            prop_assert_eq!(
                compute_price(base, n + 1) - compute_price(base, n),
                SAUCE_UNIT_COST
            );
        }

        /// Property: intensity 1 is always the base price.
        #[test]
        fn base_intensity_is_base_price(base in 0u64..10_000_000) {
            prop_assert_eq!(compute_price(base, 1), base);
        }
    }
}
