use crate::error::{Error, Result};

/// Length of the common affix shared by all of the given sequences.
///
/// Elements are compared pairwise from the front, or from the back when
/// `from_end` is set, stopping at the first disagreement or at the end of the
/// shortest sequence. At least two sequences are required.
///
/// The same primitive serves both domains of this crate: path components
/// during trie splits, and file-name stems during duplicate clustering.
pub fn common_affix<T: PartialEq>(seqs: &[&[T]], from_end: bool) -> Result<usize> {
    if seqs.len() < 2 {
        return Err(Error::InvalidArgument(
            "at least two sequences must be provided".into(),
        ));
    }

    let limit = seqs.iter().map(|s| s.len()).min().unwrap_or(0);

    for idx in 0..limit {
        for pair in seqs.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (x, y) = if from_end {
                (&a[a.len() - 1 - idx], &b[b.len() - 1 - idx])
            } else {
                (&a[idx], &b[idx])
            };
            if x != y {
                return Ok(idx);
            }
        }
    }

    Ok(limit)
}
