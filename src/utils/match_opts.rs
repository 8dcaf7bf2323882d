//! Helper function for combining Option-wrapped values

/// Combines two Option-wrapped values:
/// - both `None` returns `None`
/// - exactly one value returns that value in a `Some`
/// - two values returns the result of the combining operation `op`
#[inline]
pub fn match_opts<T, F>(a: Option<T>, b: Option<T>, op: F) -> Option<T>
where
    F: Fn(T, T) -> T,
{
    match (a, b) {
        (None, None) => None,
        (None, Some(b)) => Some(b),
        (Some(a), None) => Some(a),
        (Some(a), Some(b)) => Some(op(a, b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_present_value() {
        assert_eq!(match_opts(None, Some(2), i32::min), Some(2));
        assert_eq!(match_opts(Some(1), None, i32::min), Some(1));
        assert_eq!(match_opts::<i32, _>(None, None, i32::min), None);
    }

    #[test]
    fn combines_both() {
        assert_eq!(match_opts(Some(1), Some(2), i32::min), Some(1));
    }
}
