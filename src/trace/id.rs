//! 128-bit tracing identifiers
//!
//! Held as two `u64` halves so the header formats that only care about the
//! low 64 bits never need to touch the full value.

use rand::Rng;

/// Text encodings for a [`TracingId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdRepresentation {
    /// Base-10 rendering of the full 128-bit value
    Decimal,
    /// Base-10 rendering of the low 64 bits
    LowDecimal,
    /// Hex of the full value with no padding
    Hex,
    /// Hex of the low 64 bits, padded to 16 characters
    Hex16Chars,
    /// Hex of the high 64 bits, padded to 16 characters
    HighHex16Chars,
    /// Hex of the full value, padded to 32 characters
    Hex32Chars,
}

/// An immutable 128-bit identifier used for trace and span ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TracingId {
    high: u64,
    low: u64,
}

impl TracingId {
    pub const fn new(high: u64, low: u64) -> Self {
        Self { high, low }
    }

    /// Random id with the top bit of the low half cleared, as span ids require.
    pub fn create_63_bit() -> Self {
        let low: u64 = rand::rng().random();
        Self::new(0, low & (u64::MAX >> 1))
    }

    pub fn create_64_bit() -> Self {
        Self::new(0, rand::rng().random())
    }

    pub fn create_128_bit() -> Self {
        let mut rng = rand::rng();
        let low: u64 = rng.random();
        let high: u64 = rng.random();
        Self::new(high, low)
    }

    pub fn high(&self) -> u64 {
        self.high
    }

    pub fn low(&self) -> u64 {
        self.low
    }

    pub fn as_u128(&self) -> u128 {
        ((self.high as u128) << 64) | self.low as u128
    }

    /// Render the id in the requested representation.
    pub fn to_string_as(&self, representation: IdRepresentation) -> String {
        match representation {
            IdRepresentation::Decimal => self.as_u128().to_string(),
            IdRepresentation::LowDecimal => self.low.to_string(),
            IdRepresentation::Hex => {
                if self.high > 0 {
                    format!("{:X}{:016X}", self.high, self.low)
                } else {
                    format!("{:X}", self.low)
                }
            }
            IdRepresentation::Hex16Chars => format!("{:016X}", self.low),
            IdRepresentation::HighHex16Chars => format!("{:016X}", self.high),
            IdRepresentation::Hex32Chars => format!("{:032X}", self.as_u128()),
        }
    }
}

impl From<u128> for TracingId {
    fn from(value: u128) -> Self {
        Self::new((value >> 64) as u64, value as u64)
    }
}

impl std::fmt::Display for TracingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u128())
    }
}
