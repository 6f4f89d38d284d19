//! Byte-size computation for tensors.

use crate::element::ElementType;
use crate::error::TensorError;

/// Number of elements implied by a shape.
///
/// An empty shape is a scalar and yields 1. A negative dimension fails
/// with [`TensorError::InvalidShape`]; an overflowing product fails with
/// [`TensorError::SizeOverflow`].
pub fn shape_element_count(shape: &[i32]) -> Result<usize, TensorError> {
    shape
        .iter()
        .enumerate()
        .try_fold(1usize, |count, (index, &dimension)| {
            let dim = usize::try_from(dimension)
                .map_err(|_| TensorError::InvalidShape { index, dimension })?;
            count.checked_mul(dim).ok_or(TensorError::SizeOverflow)
        })
}

/// Total bytes for `element_count` elements of `element_type`.
///
/// Returns `(total_bytes, element_size)`.
pub fn bytes_required(
    element_type: ElementType,
    element_count: usize,
) -> Result<(usize, usize), TensorError> {
    let element_size = element_type.size_of()?;
    let total = element_count
        .checked_mul(element_size)
        .ok_or(TensorError::SizeOverflow)?;
    Ok((total, element_size))
}
