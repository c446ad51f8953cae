//! Splitting a passage sequence into bounded windows

use crate::error::SelectError;

/// Split `passages` into windows of up to `n` items starting every `step` items.
///
/// Windows stop once one reaches the end of the sequence, so with `step < n`
/// no trailing window is fully contained in its predecessor. `step > n`
/// leaves gaps: the passages in between are never scored.
pub fn window<T: Clone>(
    passages: &[T],
    n: usize,
    step: usize,
) -> Result<Vec<Vec<T>>, SelectError> {
    if n == 0 || step == 0 {
        return Err(SelectError::InvalidWindow { n, step });
    }

    let mut windows = Vec::new();
    let mut start = 0;
    while start < passages.len() {
        let end = (start + n).min(passages.len());
        windows.push(passages[start..end].to_vec());
        if end == passages.len() {
            break;
        }
        start += step;
    }
    Ok(windows)
}
