use log::trace;

use super::config::{SEED_PEAKS_PER_WINDOW, SEED_WINDOW_WIDTH};
use crate::spectrum::PeakView;

/// Keep the `peaks_per_window` most intense peaks in each of a series of
/// non-overlapping m/z windows of width `window_width`.
///
/// The first window starts at the lowest m/z in the peak list and each subsequent
/// window starts where the last one ended, so every peak belongs to exactly one
/// window. Ties in intensity go to the peak with the lower index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpingWindowFilter {
    pub window_width: f64,
    pub peaks_per_window: usize,
}

impl Default for JumpingWindowFilter {
    fn default() -> Self {
        Self {
            window_width: SEED_WINDOW_WIDTH,
            peaks_per_window: SEED_PEAKS_PER_WINDOW,
        }
    }
}

impl JumpingWindowFilter {
    pub fn new(window_width: f64, peaks_per_window: usize) -> Self {
        Self {
            window_width,
            peaks_per_window,
        }
    }

    fn window_of(&self, origin: f64, mz: f64) -> u64 {
        ((mz - origin) / self.window_width).floor().max(0.0) as u64
    }

    /// The indices of the retained peaks in ascending order. `peaks` must be
    /// sorted by m/z.
    pub fn select(&self, peaks: &PeakView<'_>) -> Vec<usize> {
        let n = peaks.len();
        if n == 0 || self.peaks_per_window == 0 {
            return Vec::new();
        }
        let origin = peaks.mz(0);
        let mut selected = Vec::new();
        let mut window_start = 0;
        while window_start < n {
            let window = self.window_of(origin, peaks.mz(window_start));
            let mut window_end = window_start + 1;
            while window_end < n && self.window_of(origin, peaks.mz(window_end)) == window {
                window_end += 1;
            }

            let mut members: Vec<usize> = (window_start..window_end).collect();
            members.sort_by(|a, b| {
                peaks
                    .intensity(*b)
                    .total_cmp(&peaks.intensity(*a))
                    .then(a.cmp(b))
            });
            members.truncate(self.peaks_per_window);
            selected.extend(members);

            window_start = window_end;
        }
        selected.sort_unstable();
        trace!(
            "Selected {} seed peaks from {} peaks with {}-wide windows",
            selected.len(),
            n,
            self.window_width
        );
        selected
    }
}

#[cfg(test)]
mod test {
    use std::borrow::Cow;

    use super::*;

    fn view_of(mzs: Vec<f64>, intensities: Vec<f64>) -> PeakView<'static> {
        PeakView::new(Cow::Owned(mzs), Cow::Owned(intensities)).unwrap()
    }

    #[test]
    fn test_one_per_window() {
        let view = view_of(
            vec![100.0, 101.0, 102.0, 104.5, 105.0, 110.0],
            vec![5.0, 20.0, 10.0, 3.0, 8.0, 1.0],
        );
        let seeds = JumpingWindowFilter::default().select(&view);
        assert_eq!(seeds, vec![1, 4, 5]);
    }

    #[test]
    fn test_edges() {
        let filter = JumpingWindowFilter::default();
        assert!(filter.select(&view_of(vec![], vec![])).is_empty());
        assert_eq!(filter.select(&view_of(vec![500.0], vec![1.0])), vec![0]);

        // The boundary peak opens a new window
        let view = view_of(vec![100.0, 104.0], vec![1.0, 1.0]);
        assert_eq!(filter.select(&view), vec![0, 1]);

        // Ties go to the lower index
        let view = view_of(vec![100.0, 101.0, 102.0], vec![7.0, 7.0, 2.0]);
        assert_eq!(filter.select(&view), vec![0]);
    }

    #[test]
    fn test_top_n() {
        let view = view_of(
            vec![100.0, 100.5, 101.0, 101.5, 110.0],
            vec![1.0, 4.0, 3.0, 2.0, 1.0],
        );
        let seeds = JumpingWindowFilter::new(4.0, 2).select(&view);
        assert_eq!(seeds, vec![1, 2, 4]);
    }
}
