//! Rate entity: a purchasable pricing tier with an inventory cap.

use serde::Serialize;
use std::fmt;

/// A currency amount stored in minor units (kopecks, cents).
///
/// Rendered with two decimal places, which is the format payment providers
/// expect for amount values (`"1500.00"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Money(i64);

impl Money {
    pub fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    pub fn minor_units(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// A pricing tier.
///
/// `clicks` counts successful purchase attempts and is only ever incremented.
/// `click_limit` can be changed by an administrator at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rate {
    pub id: i64,
    pub price: Money,
    pub clicks: i64,
    pub click_limit: i64,
}

impl Rate {
    pub fn new(id: i64, price: Money, clicks: i64, click_limit: i64) -> Self {
        Self {
            id,
            price,
            clicks,
            click_limit,
        }
    }

    /// Purchase-time inventory check.
    ///
    /// Strictly greater: a rate whose counter sits exactly at the limit still
    /// sells. [`Rate::limit_reached`] uses `>=` for the public status, so the
    /// two intentionally disagree at `clicks == click_limit`.
    pub fn is_sold_out(&self) -> bool {
        self.clicks > self.click_limit
    }

    /// Status-page inventory check (`clicks >= click_limit`).
    pub fn limit_reached(&self) -> bool {
        self.clicks >= self.click_limit
    }
}

/// Public sale state of a single rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateStatus {
    /// The global sale flag is off.
    Off,
    /// The rate reached its limit.
    Stop,
    /// The rate is on sale.
    Start,
}

impl RateStatus {
    /// Derives the status of `rate` under the given global sale flag.
    pub fn derive(sale_enabled: bool, rate: &Rate) -> Self {
        if !sale_enabled {
            RateStatus::Off
        } else if rate.limit_reached() {
            RateStatus::Stop
        } else {
            RateStatus::Start
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RateStatus::Off => "off",
            RateStatus::Stop => "stop",
            RateStatus::Start => "start",
        }
    }
}

impl fmt::Display for RateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
