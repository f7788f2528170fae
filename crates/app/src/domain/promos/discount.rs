//! Discount computation.

/// The two discount shapes a promo can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discount {
    /// A percentage (0–100) off the cart subtotal.
    PercentageOff { percentage: u16 },
    /// A fixed amount off, in minor units.
    AmountOff { amount: u64 },
}

impl Discount {
    /// Storage tag for the discount kind.
    #[must_use]
    pub const fn kind_as_str(&self) -> &'static str {
        match self {
            Self::PercentageOff { .. } => "percentage_off",
            Self::AmountOff { .. } => "amount_off",
        }
    }

    /// The raw value column for storage.
    #[must_use]
    pub fn value(&self) -> u64 {
        match self {
            Self::PercentageOff { percentage } => u64::from(*percentage),
            Self::AmountOff { amount } => *amount,
        }
    }

    /// Rebuild a discount from its storage tag and value.
    #[must_use]
    pub fn from_parts(kind: &str, value: u64) -> Option<Self> {
        match kind {
            "percentage_off" => u16::try_from(value)
                .ok()
                .filter(|percentage| *percentage <= 100)
                .map(|percentage| Self::PercentageOff { percentage }),
            "amount_off" => Some(Self::AmountOff { amount: value }),
            _ => None,
        }
    }

    /// The discount granted against a subtotal, clamped so the payable
    /// total can never go negative.
    #[must_use]
    pub fn amount_for(&self, subtotal: u64) -> u64 {
        let raw = match self {
            Self::PercentageOff { percentage } => {
                let scaled = u128::from(subtotal) * u128::from(*percentage) / 100;

                // percentage <= 100, so the result always fits back in u64
                u64::try_from(scaled).unwrap_or(subtotal)
            }
            Self::AmountOff { amount } => *amount,
        };

        raw.min(subtotal)
    }
}
