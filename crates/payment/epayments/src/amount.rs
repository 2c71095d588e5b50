use std::{
    fmt::{Debug, Display},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const DECIMALS: u32 = 2;
const SCALE: i64 = 10i64.pow(DECIMALS);

/// Order sum in minor units with a fixed two digit fraction.
///
/// Rendered with `.` as the separator and without grouping, which is the
/// exact form the gateway hashes and expects in `orderSumAmount`.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    /// Saturates at the `i64` bounds of minor units.
    pub fn int(value: i64) -> Amount {
        Amount(value.saturating_mul(SCALE))
    }

    pub fn from_minor(value: i64) -> Amount {
        Amount(value)
    }

    pub fn minor(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Debug for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(
            f,
            "{}{}.{:02}",
            sign,
            abs / SCALE as u64,
            abs % SCALE as u64
        )
    }
}

/// Rounds the shortest decimal form of the value half away from zero, the
/// same way `FromStr` does, so `10.005` and `"10.005"` both become `10.01`.
/// Values out of range saturate and NaN becomes zero.
impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        if !value.is_finite() {
            return Amount((value * SCALE as f64) as i64);
        }
        Amount::try_from(value.to_string().as_str())
            .unwrap_or_else(|_| Amount((value * SCALE as f64).round() as i64))
    }
}

impl From<u32> for Amount {
    fn from(value: u32) -> Self {
        Amount::int(value as i64)
    }
}

impl TryFrom<&str> for Amount {
    type Error = ParseAmountError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        let (negative, digits) = match value.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, value),
        };
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ParseAmountError);
        }
        if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
            return Err(ParseAmountError);
        }

        let int = if int_part.is_empty() {
            0
        } else {
            int_part.parse::<i64>().map_err(|_| ParseAmountError)?
        };

        let mut frac = frac_part.bytes().map(|b| (b - b'0') as i64);
        let tenths = frac.next().unwrap_or(0);
        let hundredths = frac.next().unwrap_or(0);
        let round_up = frac.next().map(|d| d >= 5).unwrap_or(false);

        let mut minor = int
            .checked_mul(SCALE)
            .and_then(|v| v.checked_add(tenths * 10 + hundredths))
            .ok_or(ParseAmountError)?;
        if round_up {
            minor = minor.checked_add(1).ok_or(ParseAmountError)?;
        }
        Ok(Amount(if negative { -minor } else { minor }))
    }
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::try_from(s)
    }
}

#[derive(Debug)]
pub struct ParseAmountError;

impl std::fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse amount value")
    }
}

impl std::error::Error for ParseAmountError {}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Amount, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(Amount::from)
                .ok_or_else(|| serde::de::Error::custom("amount out of range")),
            serde_json::Value::String(s) => Amount::try_from(s.as_str())
                .map_err(serde::de::Error::custom),
            _ => Err(serde::de::Error::custom("expected number or string amount")),
        }
    }
}
