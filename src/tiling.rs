//! Row-band partitioning for parallel rendering.
//!
//! The image is split into contiguous, non-overlapping bands of rows, one
//! per worker. Disjointness of the bands is the entire correctness argument
//! for lock-free framebuffer writes.

use std::num::NonZeroUsize;
use std::thread;

/// Worker count used when hardware parallelism cannot be detected.
const FALLBACK_WORKERS: NonZeroUsize = match NonZeroUsize::new(4) {
    Some(n) => n,
    None => unreachable!(),
};

/// A contiguous half-open range of image rows assigned to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBand {
    /// First row of the band (inclusive)
    pub start: u32,
    /// One past the last row of the band
    pub end: u32,
}

impl RowBand {
    /// Number of rows in the band.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// True if the band contains no rows.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Iterate over the row indices of the band.
    pub fn rows(&self) -> std::ops::Range<u32> {
        self.start..self.end
    }
}

/// Split `[0, height)` into exactly `workers` contiguous disjoint bands.
///
/// Every band gets `height / workers` rows and the last band absorbs the
/// remainder. When `height < workers`, leading bands are empty and the last
/// band carries all rows; empty bands simply finish immediately.
pub fn partition_rows(height: u32, workers: NonZeroUsize) -> Vec<RowBand> {
    let workers = workers.get() as u32;
    let rows_per_band = height / workers;

    (0..workers)
        .map(|i| RowBand {
            start: i * rows_per_band,
            end: if i == workers - 1 {
                height
            } else {
                (i + 1) * rows_per_band
            },
        })
        .collect()
}

/// Resolve the number of render workers.
///
/// An explicit request wins; otherwise detected hardware parallelism, with
/// a fixed fallback when detection fails.
pub fn worker_count(requested: Option<NonZeroUsize>) -> NonZeroUsize {
    requested
        .or_else(|| thread::available_parallelism().ok())
        .unwrap_or(FALLBACK_WORKERS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(workers: usize) -> NonZeroUsize {
        NonZeroUsize::new(workers).unwrap()
    }

    /// Bands must tile [0, height) exactly: correct count, no gaps, no
    /// overlaps, nothing outside the image.
    fn assert_exact_cover(height: u32, workers: usize) {
        let bands = partition_rows(height, n(workers));
        assert_eq!(bands.len(), workers);

        let mut next = 0;
        for band in &bands {
            assert_eq!(band.start, next, "gap or overlap before row {next}");
            assert!(band.end >= band.start);
            next = band.end;
        }
        assert_eq!(next, height);
    }

    #[test]
    fn even_division() {
        assert_exact_cover(8, 4);
        let bands = partition_rows(8, n(4));
        assert!(bands.iter().all(|b| b.len() == 2));
    }

    #[test]
    fn last_band_absorbs_remainder() {
        assert_exact_cover(7, 3);
        let bands = partition_rows(7, n(3));
        assert_eq!(bands[0], RowBand { start: 0, end: 2 });
        assert_eq!(bands[1], RowBand { start: 2, end: 4 });
        assert_eq!(bands[2], RowBand { start: 4, end: 7 });
    }

    #[test]
    fn more_workers_than_rows() {
        assert_exact_cover(2, 5);
        let bands = partition_rows(2, n(5));
        assert!(bands[..4].iter().all(|b| b.is_empty()));
        assert_eq!(bands[4], RowBand { start: 0, end: 2 });
    }

    #[test]
    fn single_worker_takes_everything() {
        assert_exact_cover(123, 1);
        assert_eq!(partition_rows(123, n(1))[0], RowBand { start: 0, end: 123 });
    }

    #[test]
    fn partition_is_exact_across_sizes() {
        for height in [1, 2, 3, 16, 37, 480] {
            for workers in [1, 2, 3, 4, 7, 13] {
                assert_exact_cover(height, workers);
            }
        }
    }

    #[test]
    fn requested_worker_count_wins() {
        assert_eq!(worker_count(Some(n(3))).get(), 3);
        // Detection path returns something usable either way
        assert!(worker_count(None).get() >= 1);
    }
}
