//! Signal-level building blocks: the availability-tagged value type and the
//! little-endian field readers every decoder uses.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// A physical quantity as reported by the sensor side.
///
/// Some schema generations reserve a raw wire pattern for "no data"; their
/// decoders map that pattern here instead of letting a magic number leak
/// into the decoded state. `NotAvailable` is unambiguous even for signals
/// whose legitimate range includes negative values.
pub enum SignalValue<T> {
    Available(T),
    #[default]
    NotAvailable,
}

impl<T> SignalValue<T> {
    /// `Some(value)` when the sensor reported data.
    pub fn get(self) -> Option<T> {
        match self {
            SignalValue::Available(value) => Some(value),
            SignalValue::NotAvailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, SignalValue::Available(_))
    }

    /// Transform the carried value, preserving availability.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SignalValue<U> {
        match self {
            SignalValue::Available(value) => SignalValue::Available(f(value)),
            SignalValue::NotAvailable => SignalValue::NotAvailable,
        }
    }
}

/// Read an unsigned 16-bit little-endian field from `d[0..2]`.
#[inline]
pub fn read_le_u16(d: &[u8]) -> u16 {
    u16::from_le_bytes([d[0], d[1]])
}

/// Read a two's-complement 16-bit little-endian field from `d[0..2]`.
#[inline]
pub fn read_le_i16(d: &[u8]) -> i16 {
    i16::from_le_bytes([d[0], d[1]])
}
