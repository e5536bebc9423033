use std::borrow::Cow;

use mzpeaks::{peak::CentroidPeak, IndexType, Tolerance};

use super::bindata::{ArrayRetrievalError, ArrayType, BinaryArrayMap};

/// Convert a [`Tolerance`] into an absolute width in Daltons around `mz`
#[inline]
pub fn tolerance_at(error_tolerance: Tolerance, mz: f64) -> f64 {
    match error_tolerance {
        Tolerance::PPM(tol) => tol * mz * 1e-6,
        Tolerance::Da(tol) => tol,
    }
}

/// A read-only snapshot of the m/z and intensity arrays of a peak list.
///
/// Searches assume the m/z values are sorted in ascending order, which callers
/// should confirm with [`PeakView::is_sorted`] before relying on them.
#[derive(Debug, Clone)]
pub struct PeakView<'a> {
    mzs: Cow<'a, [f64]>,
    intensities: Cow<'a, [f64]>,
}

impl<'a> PeakView<'a> {
    pub fn new(
        mzs: Cow<'a, [f64]>,
        intensities: Cow<'a, [f64]>,
    ) -> Result<Self, ArrayRetrievalError> {
        if mzs.len() != intensities.len() {
            return Err(ArrayRetrievalError::LengthMismatch {
                array: ArrayType::IntensityArray,
                expected: mzs.len(),
                actual: intensities.len(),
            });
        }
        Ok(Self { mzs, intensities })
    }

    pub fn from_arrays(arrays: &'a BinaryArrayMap) -> Result<Self, ArrayRetrievalError> {
        Self::new(arrays.mzs()?, arrays.intensities()?)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.mzs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mzs.is_empty()
    }

    #[inline]
    pub fn mz(&self, i: usize) -> f64 {
        self.mzs[i]
    }

    #[inline]
    pub fn intensity(&self, i: usize) -> f64 {
        self.intensities[i]
    }

    pub fn mzs(&self) -> &[f64] {
        &self.mzs
    }

    pub fn intensities(&self) -> &[f64] {
        &self.intensities
    }

    /// Get the `i`th peak, carrying `i` as its index. [`CentroidPeak`] stores
    /// intensity as `f32`.
    pub fn get(&self, i: usize) -> Option<CentroidPeak> {
        match (self.mzs.get(i), self.intensities.get(i)) {
            (Some(mz), Some(intensity)) => {
                Some(CentroidPeak::new(*mz, *intensity as f32, i as IndexType))
            }
            _ => None,
        }
    }

    /// The position of the first peak whose m/z is smaller than the m/z of the peak
    /// before it, if there is one
    pub fn first_unsorted_index(&self) -> Option<usize> {
        self.mzs
            .windows(2)
            .position(|w| w[1] < w[0])
            .map(|i| i + 1)
    }

    pub fn is_sorted(&self) -> bool {
        self.first_unsorted_index().is_none()
    }

    /// Find the peak whose m/z is closest to `query` among all peaks within `tolerance`
    /// Daltons of it. When two peaks are equally close, the one with the lower m/z wins.
    pub fn find_nearest(&self, query: f64, tolerance: f64) -> Option<usize> {
        let lower = query - tolerance;
        let upper = query + tolerance;
        let start = self.mzs.partition_point(|mz| *mz < lower);

        let mut best: Option<(usize, f64)> = None;
        for (i, mz) in self.mzs[start..].iter().enumerate() {
            if *mz > upper {
                break;
            }
            let err = (mz - query).abs();
            match best {
                Some((_, best_err)) if best_err <= err => {}
                _ => best = Some((start + i, err)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Compute the base peak of the peak list
    pub fn base_peak(&self) -> Option<CentroidPeak> {
        self.intensities
            .iter()
            .enumerate()
            .max_by(|ia, ib| ia.1.total_cmp(ib.1))
            .and_then(|(i, _)| self.get(i))
    }

    /// Compute the total ion current of the peak list
    pub fn tic(&self) -> f64 {
        self.intensities.iter().sum()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn make_view() -> PeakView<'static> {
        PeakView::new(
            Cow::Owned(vec![100.0, 100.5, 101.0, 101.004, 250.0]),
            Cow::Owned(vec![10.0, 50.0, 20.0, 5.0, 1.0]),
        )
        .unwrap()
    }

    #[test]
    fn test_find_nearest() {
        let view = make_view();
        assert_eq!(view.find_nearest(100.5, 0.01), Some(1));
        assert_eq!(view.find_nearest(101.003, 0.01), Some(3));
        assert_eq!(view.find_nearest(101.001, 0.01), Some(2));
        assert_eq!(view.find_nearest(100.75, 0.01), None);
        assert_eq!(view.find_nearest(99.995, 0.01), Some(0));
        assert_eq!(view.find_nearest(300.0, 0.01), None);
        assert_eq!(view.find_nearest(1.0, 0.01), None);
    }

    #[test]
    fn test_find_nearest_tie() {
        let view = PeakView::new(
            Cow::Owned(vec![200.0, 200.02]),
            Cow::Owned(vec![1.0, 1.0]),
        )
        .unwrap();
        assert_eq!(view.find_nearest(200.01, 0.02), Some(0));
    }

    #[test]
    fn test_tolerance_at() {
        assert!((tolerance_at(Tolerance::PPM(10.0), 1000.0) - 0.01).abs() < 1e-12);
        assert_eq!(tolerance_at(Tolerance::Da(0.02), 1000.0), 0.02);
    }

    #[test]
    fn test_sortedness() {
        let view = make_view();
        assert!(view.is_sorted());
        let view = PeakView::new(
            Cow::Owned(vec![100.0, 99.0, 101.0]),
            Cow::Owned(vec![1.0, 1.0, 1.0]),
        )
        .unwrap();
        assert_eq!(view.first_unsorted_index(), Some(1));
        assert!(!view.is_sorted());
    }

    #[test]
    fn test_summaries() {
        let view = make_view();
        let bp = view.base_peak().unwrap();
        assert_eq!(bp.index, 1);
        assert_eq!(bp.mz, 100.5);
        assert_eq!(view.tic(), 86.0);
        assert!(PeakView::new(Cow::Owned(vec![1.0]), Cow::Owned(vec![])).is_err());
    }
}
