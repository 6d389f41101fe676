//! Range validation shared by every block encoding.
//!
//! All checks fail fast with a range error and never clamp.

use crate::{Result, error::Error};

/// Fails unless `position < position_count`.
#[inline]
pub fn check_readable_position(position: usize, position_count: usize) -> Result<()> {
    if position < position_count {
        Ok(())
    } else {
        Err(Error::position_out_of_range(position, position_count))
    }
}

/// Fails unless `[offset, offset + length)` lies within `[0, position_count)`.
///
/// A zero-length region at `offset == position_count` is valid.
#[inline]
pub fn check_valid_region(position_count: usize, offset: usize, length: usize) -> Result<()> {
    if offset <= position_count && length <= position_count - offset {
        Ok(())
    } else {
        Err(Error::region_out_of_range(offset, length, position_count))
    }
}

/// Fails unless `[offset, offset + length)` lies within an array of `array_len` elements.
#[inline]
pub fn check_array_range(array_len: usize, offset: usize, length: usize) -> Result<()> {
    check_valid_region(array_len, offset, length)
}

/// Validates the `length` entries of `positions` starting at `offset`, and returns
/// them as a sub-slice once every entry is a readable position.
pub fn check_valid_positions(
    positions: &[usize],
    offset: usize,
    length: usize,
    position_count: usize,
) -> Result<&[usize]> {
    check_array_range(positions.len(), offset, length)?;
    let selected = &positions[offset..offset + length];
    for &position in selected {
        check_readable_position(position, position_count)?;
    }
    Ok(selected)
}

/// Converts a signed count (as decoded from external data) into a `usize`.
pub fn checked_count(name: &str, value: i64) -> Result<usize> {
    if value < 0 {
        return Err(Error::negative_count(name, value));
    }
    usize::try_from(value).map_err(|_| Error::invalid_arg(name, "count exceeds usize"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_readable_position() {
        assert!(check_readable_position(0, 1).is_ok());
        assert!(check_readable_position(9, 10).is_ok());
        assert!(check_readable_position(10, 10).unwrap_err().is_out_of_range());
        assert!(check_readable_position(0, 0).unwrap_err().is_out_of_range());
    }

    #[test]
    fn test_valid_region() {
        assert!(check_valid_region(100, 90, 10).is_ok());
        assert!(check_valid_region(100, 100, 0).is_ok());
        assert!(check_valid_region(0, 0, 0).is_ok());
        assert!(check_valid_region(100, 91, 10).is_err());
        assert!(check_valid_region(100, 101, 0).is_err());
        assert!(check_valid_region(100, 1, usize::MAX).is_err());
        assert!(check_valid_region(100, usize::MAX, 2).is_err());
    }

    #[test]
    fn test_valid_positions() {
        let positions = [2, 4, 6, 8];
        assert_eq!(
            check_valid_positions(&positions, 1, 2, 10).unwrap(),
            &[4, 6]
        );
        assert!(check_valid_positions(&positions, 0, 4, 8).is_err());
        assert!(check_valid_positions(&positions, 3, 2, 100).is_err());
        assert!(check_valid_positions(&positions, 4, 0, 0).unwrap().is_empty());
    }

    #[test]
    fn test_checked_count() {
        assert_eq!(checked_count("position_count", 0).unwrap(), 0);
        assert_eq!(checked_count("position_count", 42).unwrap(), 42);
        let err = checked_count("position_count", -1).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::NegativeCount { value: -1, .. }
        ));
    }
}
