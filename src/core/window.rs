//! Model order and forecast horizon parameters for a single run.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest accepted value for any AR, I or MA order.
pub const MAX_ORDER: usize = 5;

/// Largest accepted seasonal period.
pub const MAX_SEASONAL_PERIOD: usize = 24;

/// Largest accepted forecast horizon, in days.
pub const MAX_HORIZON: usize = 365;

/// Non-seasonal ARIMA order (p, d, q).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// AR order (p)
    pub p: usize,
    /// Differencing order (d)
    pub d: usize,
    /// MA order (q)
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }
}

impl Default for ArimaOrder {
    fn default() -> Self {
        Self::new(2, 1, 2)
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.p, self.d, self.q)
    }
}

/// Seasonal order (P, D, Q, s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalOrder {
    /// Seasonal AR order (P)
    pub p: usize,
    /// Seasonal differencing order (D)
    pub d: usize,
    /// Seasonal MA order (Q)
    pub q: usize,
    /// Season length (s)
    pub s: usize,
}

impl SeasonalOrder {
    pub fn new(p: usize, d: usize, q: usize, s: usize) -> Self {
        Self { p, d, q, s }
    }

    /// No seasonal component.
    pub fn none() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// True when any seasonal AR, I or MA term is requested.
    pub fn is_active(&self) -> bool {
        self.p + self.d + self.q > 0
    }
}

impl Default for SeasonalOrder {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for SeasonalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.p, self.d, self.q, self.s)
    }
}

/// Which calendar date the first prediction is stamped with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForecastAnchor {
    /// First prediction carries the requested end date itself.
    #[default]
    EndDate,
    /// First prediction carries the day after the end date.
    DayAfterEnd,
}

/// Caller-chosen model orders and horizon for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastWindow {
    order: ArimaOrder,
    seasonal: SeasonalOrder,
    horizon: usize,
}

impl ForecastWindow {
    /// Create a window with independent seasonal orders.
    pub fn new(order: ArimaOrder, seasonal: SeasonalOrder, horizon: usize) -> Result<Self> {
        let window = Self {
            order,
            seasonal,
            horizon,
        };
        window.validate()?;
        Ok(window)
    }

    /// Window whose seasonal AR, I and MA orders repeat `p, d, q`.
    ///
    /// The seasonal order is `(p, d, q, s)`, so a `(2, 1, 2)` window with
    /// `s = 12` fits `SARIMAX(2, 1, 2)x(2, 1, 2, 12)`.
    pub fn reference(p: usize, d: usize, q: usize, s: usize, horizon: usize) -> Result<Self> {
        Self::new(
            ArimaOrder::new(p, d, q),
            SeasonalOrder::new(p, d, q, s),
            horizon,
        )
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn seasonal(&self) -> SeasonalOrder {
        self.seasonal
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    fn validate(&self) -> Result<()> {
        let orders = [
            ("p", self.order.p),
            ("d", self.order.d),
            ("q", self.order.q),
            ("seasonal P", self.seasonal.p),
            ("seasonal D", self.seasonal.d),
            ("seasonal Q", self.seasonal.q),
        ];
        for (name, value) in orders {
            if value > MAX_ORDER {
                return Err(ForecastError::InvalidInput(format!(
                    "{} must be in 0..={}, got {}",
                    name, MAX_ORDER, value
                )));
            }
        }
        if self.seasonal.s > MAX_SEASONAL_PERIOD {
            return Err(ForecastError::InvalidInput(format!(
                "seasonal period must be in 0..={}, got {}",
                MAX_SEASONAL_PERIOD, self.seasonal.s
            )));
        }
        validate_horizon(self.horizon)
    }
}

/// Check a horizon lies in `1..=MAX_HORIZON`.
pub fn validate_horizon(horizon: usize) -> Result<()> {
    if horizon == 0 || horizon > MAX_HORIZON {
        return Err(ForecastError::InvalidInput(format!(
            "forecast horizon must be in 1..={}, got {}",
            MAX_HORIZON, horizon
        )));
    }
    Ok(())
}
