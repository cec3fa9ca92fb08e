// shape preconditions
// fatal checks for the operators, recoverable ones for the try_* variants
use anyhow::{bail, Result};
use log::debug;

/// Asserts a caller precondition.
///
/// Active with `debug_assertions` or the `strict-checks` feature, a no-op otherwise.
macro_rules! precondition {
    ($cond:expr, $($arg:tt)+) => {
        if cfg!(any(debug_assertions, feature = "strict-checks")) {
            assert!($cond, $($arg)+);
        }
    };
}

pub(crate) use precondition;

pub(crate) fn check_len(op: &str, left: usize, right: usize) -> Result<()> {
    if left != right {
        debug!("{op} rejected: length {left} != {right}");
        bail!("{op}: length mismatch ({left} vs {right})");
    }
    Ok(())
}

pub(crate) fn check_shape(op: &str, left: (usize, usize), right: (usize, usize)) -> Result<()> {
    if left != right {
        debug!("{op} rejected: shape {left:?} != {right:?}");
        bail!(
            "{op}: shape mismatch ({}x{} vs {}x{})",
            left.0,
            left.1,
            right.0,
            right.1
        );
    }
    Ok(())
}
