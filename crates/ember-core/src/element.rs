//! Element types and the byte-width table.

use std::fmt;

use crate::error::TensorError;

/// Element type of a tensor.
///
/// The discriminants are the raw tag values stored in the model schema.
/// Every variant is a tag the container may legitimately carry, but only
/// the fixed-width numeric types have a byte width; see
/// [`ElementType::size_of`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum ElementType {
    /// 32-bit IEEE float.
    Float32 = 0,
    /// 16-bit IEEE float. Recognized, but has no storage width here.
    Float16 = 1,
    /// Signed 32-bit integer.
    Int32 = 2,
    /// Unsigned 8-bit integer.
    UInt8 = 3,
    /// Signed 64-bit integer.
    Int64 = 4,
    /// Variable-length string. Recognized, but has no storage width.
    String = 5,
    /// Boolean, one byte per element.
    Bool = 6,
    /// Signed 16-bit integer.
    Int16 = 7,
    /// Complex number as two 32-bit floats.
    Complex64 = 8,
    /// Signed 8-bit integer.
    Int8 = 9,
}

impl ElementType {
    /// All recognized element types, in tag order.
    pub const ALL: [ElementType; 10] = [
        Self::Float32,
        Self::Float16,
        Self::Int32,
        Self::UInt8,
        Self::Int64,
        Self::String,
        Self::Bool,
        Self::Int16,
        Self::Complex64,
        Self::Int8,
    ];

    /// Convert a raw schema tag into an element type.
    ///
    /// Returns [`TensorError::TypeConversion`] for tags outside the schema.
    pub fn from_raw(tag: i8) -> Result<Self, TensorError> {
        Self::ALL
            .iter()
            .copied()
            .find(|ty| ty.raw() == tag)
            .ok_or(TensorError::TypeConversion { tag })
    }

    /// The raw schema tag for this type.
    pub fn raw(self) -> i8 {
        self as i8
    }

    /// Byte width of one element.
    ///
    /// Fails with [`TensorError::UnsupportedType`] for types that have no
    /// fixed width (`Float16`, `String`). Never falls back to a default.
    pub fn size_of(self) -> Result<usize, TensorError> {
        let size = match self {
            Self::Float32 => std::mem::size_of::<f32>(),
            Self::Int16 => std::mem::size_of::<i16>(),
            Self::Int32 => std::mem::size_of::<i32>(),
            Self::Int8 => std::mem::size_of::<i8>(),
            Self::UInt8 => std::mem::size_of::<u8>(),
            Self::Int64 => std::mem::size_of::<i64>(),
            Self::Bool => std::mem::size_of::<bool>(),
            Self::Complex64 => std::mem::size_of::<f32>() * 2,
            Self::Float16 | Self::String => {
                return Err(TensorError::UnsupportedType { element_type: self })
            }
        };
        Ok(size)
    }

    /// Upper-case schema name, used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Float32 => "FLOAT32",
            Self::Float16 => "FLOAT16",
            Self::Int32 => "INT32",
            Self::UInt8 => "UINT8",
            Self::Int64 => "INT64",
            Self::String => "STRING",
            Self::Bool => "BOOL",
            Self::Int16 => "INT16",
            Self::Complex64 => "COMPLEX64",
            Self::Int8 => "INT8",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i8> for ElementType {
    type Error = TensorError;

    fn try_from(tag: i8) -> Result<Self, Self::Error> {
        Self::from_raw(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_widths_are_exact() {
        let expected = [
            (ElementType::Float32, 4),
            (ElementType::Int8, 1),
            (ElementType::UInt8, 1),
            (ElementType::Int16, 2),
            (ElementType::Int32, 4),
            (ElementType::Int64, 8),
            (ElementType::Bool, 1),
            (ElementType::Complex64, 8),
        ];
        for (ty, width) in expected {
            assert_eq!(ty.size_of(), Ok(width), "{ty}");
        }
    }

    #[test]
    fn string_and_float16_are_unsupported() {
        for ty in [ElementType::String, ElementType::Float16] {
            assert_eq!(
                ty.size_of(),
                Err(TensorError::UnsupportedType { element_type: ty })
            );
        }
    }

    #[test]
    fn raw_tags_round_trip() {
        for ty in ElementType::ALL {
            assert_eq!(ElementType::from_raw(ty.raw()), Ok(ty));
        }
    }

    #[test]
    fn unknown_tag_is_conversion_error() {
        assert_eq!(
            ElementType::try_from(42),
            Err(TensorError::TypeConversion { tag: 42 })
        );
        assert_eq!(
            ElementType::from_raw(-1),
            Err(TensorError::TypeConversion { tag: -1 })
        );
    }

    #[test]
    fn display_uses_schema_name() {
        assert_eq!(ElementType::Complex64.to_string(), "COMPLEX64");
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn every_tag_converts_or_fails_cleanly(tag in any::<i8>()) {
                match ElementType::from_raw(tag) {
                    Ok(ty) => prop_assert_eq!(ty.raw(), tag),
                    Err(e) => prop_assert_eq!(e, TensorError::TypeConversion { tag }),
                }
            }
        }
    }
}
