//! Byte-order-aware decoding of stored scalars.
//!
//! Model data is stored in a declared byte order that need not match the
//! host. Values are reconstructed byte by byte in stored order rather than
//! reinterpreted in place.

/// Byte order of data stored in the model image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Least significant byte first. The model container's native order.
    #[default]
    Little,
    /// Most significant byte first.
    Big,
}

impl ByteOrder {
    /// Byte order of the host this code runs on.
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::Big
        } else {
            Self::Little
        }
    }

    /// Decode a signed 64-bit integer from the first 8 bytes of `bytes`.
    ///
    /// Returns `None` if fewer than 8 bytes are available. Trailing bytes
    /// are ignored.
    pub fn read_i64(self, bytes: &[u8]) -> Option<i64> {
        let raw: [u8; 8] = bytes.get(..8)?.try_into().ok()?;
        Some(match self {
            Self::Little => i64::from_le_bytes(raw),
            Self::Big => i64::from_be_bytes(raw),
        })
    }

    /// Encode a signed 64-bit integer in this byte order.
    pub fn write_i64(self, value: i64) -> [u8; 8] {
        match self {
            Self::Little => value.to_le_bytes(),
            Self::Big => value.to_be_bytes(),
        }
    }
}
