//! Monetary amounts in integer cents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

/// An amount of Brazilian reais stored as whole cents.
///
/// Every total in the system is a sum of cents, so recomputing an order any number of
/// times from the same items always lands on the same value.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);
    pub const MAX: Money = Money(i64::MAX);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// `Money::from_reais(39, 90)` is R$ 39,90.
    pub const fn from_reais(reais: i64, cents: i64) -> Self {
        Self(reais * 100 + cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Unit price times a line quantity. `None` on overflow.
    pub fn times(self, quantity: u32) -> Option<Money> {
        self.0.checked_mul(i64::from(quantity)).map(Money)
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// A share expressed in basis points (1000 = 10%), rounded half up to the cent.
    pub fn basis_points(self, bp: u32) -> Money {
        let share = (i128::from(self.0) * i128::from(bp) + 5_000).div_euclid(10_000);
        Money(i64::try_from(share).unwrap_or(if share < 0 { i64::MIN } else { i64::MAX }))
    }

    /// Loyalty points earned for this amount: `floor(amount × rate)`, all in integers.
    pub fn loyalty_points(self, rate: PointsRate) -> i64 {
        if self.0 <= 0 {
            return 0;
        }
        let points = i128::from(self.0) * i128::from(rate.millis()) / 100_000;
        i64::try_from(points).unwrap_or(i64::MAX)
    }
}

/// Loyalty points earned per currency unit, held in thousandths of a point so accrual
/// never touches floating point. `PointsRate::from_millis(700)` is 0.7 points per real.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PointsRate(u32);

impl PointsRate {
    pub const ONE: PointsRate = PointsRate(1_000);

    pub const fn from_millis(millis: u32) -> Self {
        Self(millis)
    }

    pub const fn millis(self) -> u32 {
        self.0
    }
}

impl FromStr for PointsRate {
    type Err = String;

    /// Parses a decimal such as `"1"`, `"0.7"` or `"1.25"`, exact to three places.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (whole, fraction) = s.split_once('.').unwrap_or((s, ""));
        let invalid = || format!("invalid points rate: {s}");
        if (whole.is_empty() && fraction.is_empty())
            || fraction.len() > 3
            || !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }
        let whole: u32 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| invalid())? };
        let fraction: u32 = if fraction.is_empty() {
            0
        } else {
            format!("{fraction:0<3}").parse().map_err(|_| invalid())?
        };
        whole
            .checked_mul(1_000)
            .and_then(|w| w.checked_add(fraction))
            .map(PointsRate)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for PointsRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.0 / 1_000, self.0 % 1_000)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}R$ {},{:02}", abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_brazilian_format() {
        assert_eq!(Money::from_reais(39, 90).to_string(), "R$ 39,90");
        assert_eq!(Money::from_cents(5).to_string(), "R$ 0,05");
        assert_eq!(Money::from_cents(-150).to_string(), "-R$ 1,50");
    }

    #[test]
    fn test_basis_points_round_half_up() {
        // 10% of 40,00
        assert_eq!(Money::from_reais(40, 0).basis_points(1000), Money::from_reais(4, 0));
        // 10% of 0,05 is half a cent
        assert_eq!(Money::from_cents(5).basis_points(1000), Money::from_cents(1));
        assert_eq!(Money::from_cents(4).basis_points(1000), Money::ZERO);
    }

    fn rate(s: &str) -> PointsRate {
        s.parse().expect("Valid rate")
    }

    #[test]
    fn test_loyalty_points_floor() {
        assert_eq!(Money::from_reais(39, 90).loyalty_points(PointsRate::ONE), 39);
        assert_eq!(Money::from_reais(40, 0).loyalty_points(PointsRate::ONE), 40);
        assert_eq!(Money::from_reais(10, 0).loyalty_points(rate("0.5")), 5);
        assert_eq!(Money::from_cents(99).loyalty_points(PointsRate::ONE), 0);
        assert_eq!(Money::from_reais(10, 0).loyalty_points(rate("0")), 0);
        // Rates with no exact binary form must not lose the last point.
        assert_eq!(Money::from_reais(110, 0).loyalty_points(rate("0.7")), 77);
        assert_eq!(Money::from_reais(100, 0).loyalty_points(rate("0.57")), 57);
        assert_eq!(Money::from_reais(100, 0).loyalty_points(rate("1.005")), 100);
        assert_eq!(Money::from_reais(33, 33).loyalty_points(rate("0.3")), 9);
    }

    #[test]
    fn test_points_rate_parsing() {
        assert_eq!(rate("1"), PointsRate::ONE);
        assert_eq!(rate(" 0.7 "), PointsRate::from_millis(700));
        assert_eq!(rate(".25"), PointsRate::from_millis(250));
        assert_eq!(rate("2.5").to_string(), "2.500");
        assert!("0.0001".parse::<PointsRate>().is_err());
        assert!("-1".parse::<PointsRate>().is_err());
        assert!("abc".parse::<PointsRate>().is_err());
        assert!(".".parse::<PointsRate>().is_err());
    }

    #[test]
    fn test_sum_and_times() {
        let lines = [
            Money::from_reais(10, 0).times(4).expect("No overflow"),
            Money::from_cents(250),
        ];
        let total: Money = lines.into_iter().sum();
        assert_eq!(total, Money::from_cents(4250));
    }

    #[test]
    fn test_times_reports_overflow() {
        assert_eq!(Money::from_cents(i64::MAX / 2).times(3), None);
        assert_eq!(Money::from_reais(10, 0).times(u32::MAX), Some(Money::from_cents(1_000 * i64::from(u32::MAX))));
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
    }
}
