use serde::{Deserialize, Serialize};

use traykit_core::ValueObject;

/// Sauce units on a fresh customization (the first unit is included).
pub const DEFAULT_SAUCE_INTENSITY: u32 = 1;

/// Per-item customization state while an entry is being configured.
///
/// `sauce_intensity` is always at least 1; decrementing below 1 clamps.
/// There is no upper bound. A fresh customization is not spicy with a single
/// sauce unit, and the draft resets to this state after every add-to-tray
/// commit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customization {
    pub is_spicy: bool,
    pub sauce_intensity: u32,
}

impl Default for Customization {
    fn default() -> Self {
        Self {
            is_spicy: false,
            sauce_intensity: DEFAULT_SAUCE_INTENSITY,
        }
    }
}

impl Customization {
    /// Build a customization, clamping the sauce intensity to at least 1.
    pub fn new(is_spicy: bool, sauce_intensity: u32) -> Self {
        Self {
            is_spicy,
            sauce_intensity: sauce_intensity.max(1),
        }
    }

    /// Return a copy with the intensity clamped into the valid range.
    ///
    /// Total rather than failing: malformed input is corrected, never
    /// rejected.
    pub fn clamped(self) -> Self {
        Self::new(self.is_spicy, self.sauce_intensity)
    }

    pub fn toggle_spicy(&mut self) -> bool {
        self.is_spicy = !self.is_spicy;
        self.is_spicy
    }

    pub fn add_sauce(&mut self) -> u32 {
        self.sauce_intensity = self.sauce_intensity.saturating_add(1);
        self.sauce_intensity
    }

    /// Remove one sauce unit, clamped at 1.
    pub fn remove_sauce(&mut self) -> u32 {
        self.sauce_intensity = self.sauce_intensity.saturating_sub(1).max(1);
        self.sauce_intensity
    }
}

impl ValueObject for Customization {}
