/// Out-of-range index handling for windowed filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Clamp to the nearest edge sample: `x0 x0 | x0 x1 ...`.
    Replicate,
    /// Mirror including the edge sample: `x1 x0 | x0 x1 ...`.
    Symmetric,
}

impl Boundary {
    /// Maps a possibly out-of-range position onto `0..len`. `len` must be > 0.
    pub fn resolve(self, position: isize, len: usize) -> usize {
        let n = len as isize;
        match self {
            Boundary::Replicate => position.clamp(0, n - 1) as usize,
            Boundary::Symmetric => {
                let folded = position.rem_euclid(2 * n);
                if folded < n {
                    folded as usize
                } else {
                    (2 * n - 1 - folded) as usize
                }
            }
        }
    }
}
