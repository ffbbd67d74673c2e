//! Status and choice enums shared by the storefront and the CLI.

use serde::{Deserialize, Serialize};

/// How often a recurring item is meant to be re-ordered.
///
/// Stored with each recurring item; nothing evaluates it against the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
        }
    }
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(format!("invalid frequency: {s}")),
        }
    }
}

/// Delivery tier chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryTier {
    /// Delivery within 10-15 minutes.
    #[default]
    Express,
    /// Delivery within 25-30 minutes.
    Standard,
}

impl DeliveryTier {
    /// Human-readable label shown on the confirmation.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Express => "Express Delivery",
            Self::Standard => "Standard Delivery",
        }
    }

    /// Promised delivery window in minutes (min, max).
    #[must_use]
    pub const fn window_minutes(self) -> (u32, u32) {
        match self {
            Self::Express => (10, 15),
            Self::Standard => (25, 30),
        }
    }
}

impl std::fmt::Display for DeliveryTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Express => write!(f, "express"),
            Self::Standard => write!(f, "standard"),
        }
    }
}

impl std::str::FromStr for DeliveryTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "express" => Ok(Self::Express),
            "standard" => Ok(Self::Standard),
            _ => Err(format!("invalid delivery tier: {s}")),
        }
    }
}

/// Payment method chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Credit/debit card; requires card number, expiry and CVV.
    #[default]
    Card,
    Upi,
    /// Cash on delivery.
    Cod,
}

impl PaymentMethod {
    /// Human-readable label shown on the confirmation.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Card => "Credit/Debit Card",
            Self::Upi => "UPI",
            Self::Cod => "Cash on Delivery",
        }
    }
}

/// Severity of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Success,
    Error,
    #[default]
    Info,
}
