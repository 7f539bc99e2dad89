/// Sum segment tree with lazy range-add and range-assign
pub mod lazy;
/// Segment tree with point updates and range queries
pub mod point;

/// Splits the inclusive range `[tl, tr]` so that the left half is never shorter
#[inline]
pub(crate) const fn midpoint(tl: usize, tr: usize) -> usize {
    tl + (tr - tl) / 2
}

/// Validates a deserialized layout: `len` elements need a width of `len.next_power_of_two()`
/// and twice that many node slots
#[cfg(feature = "serde")]
pub(crate) fn check_layout(len: usize, size: usize, nodes: usize) -> Result<(), crate::Error> {
    if len == 0 {
        log::warn!("rejected a serialized tree without elements");
        return Err(crate::Error::EmptyInput);
    }
    if len.checked_next_power_of_two() != Some(size) || size.checked_mul(2) != Some(nodes) {
        log::warn!("rejected a serialized tree with {len} elements, width {size} and {nodes} nodes");
        return Err(crate::Error::InvalidLayout { len, size, nodes });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoint_splits() {
        assert_eq!(midpoint(0, 7), 3);
        assert_eq!(midpoint(0, 2), 1);
        assert_eq!(midpoint(4, 4), 4);
        assert_eq!(midpoint(usize::MAX - 1, usize::MAX), usize::MAX - 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn layout_checks() {
        assert!(check_layout(1, 1, 2).is_ok());
        assert!(check_layout(5, 8, 16).is_ok());
        assert!(check_layout(0, 1, 2).unwrap_err().is_empty_input());
        assert!(check_layout(5, 8, 2).unwrap_err().is_invalid_layout());
        assert!(check_layout(5, 4, 8).unwrap_err().is_invalid_layout());
        assert!(check_layout(1, usize::MAX, 0).unwrap_err().is_invalid_layout());
        assert!(check_layout(usize::MAX, 1, 2).unwrap_err().is_invalid_layout());
    }
}
