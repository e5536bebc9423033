use log::{debug, trace};

use super::chain::{ChainStop, IsotopicChain, IsotopicChainExtender};
use super::config::DeisotopingParameters;
use crate::spectrum::PeakView;

/// The working state of a single peak during feature assignment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakState {
    /// The feature that claimed this peak, if any
    pub feature: Option<usize>,
    /// The assigned charge if this is a monoisotopic peak, otherwise 0
    pub charge: i32,
    /// The number of peaks in the isotopic series this peak starts, 1 otherwise
    pub iso_peak_count: usize,
    /// The summed intensity of the isotopic series this peak starts, otherwise
    /// its own intensity
    pub intensity: f64,
}

impl PeakState {
    fn new(intensity: f64) -> Self {
        Self {
            feature: None,
            charge: 0,
            iso_peak_count: 1,
            intensity,
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.feature.is_some()
    }

    pub fn is_monoisotopic(&self) -> bool {
        self.charge != 0
    }
}

/// A group of peaks recognized as a single isotopic series
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: usize,
    pub monoisotopic: usize,
    pub charge: i32,
    /// The peaks of the series, starting with the monoisotopic peak
    pub members: Vec<usize>,
}

/// Which of the two search passes is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPass {
    /// Start only from locally dominant seed peaks
    Seed,
    /// Start from every peak that has not been claimed yet
    Exhaustive,
}

/// The per-peak assignment table built by [`FeatureAssigner`]. Indices refer to
/// positions in the peak list that was searched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeakAssignments {
    states: Vec<PeakState>,
    features: Vec<Feature>,
}

impl PeakAssignments {
    pub fn new(peaks: &PeakView<'_>) -> Self {
        Self {
            states: peaks.intensities().iter().copied().map(PeakState::new).collect(),
            features: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PeakState> {
        self.states.get(index)
    }

    pub fn states(&self) -> &[PeakState] {
        &self.states
    }

    pub fn is_claimed(&self, index: usize) -> bool {
        self.states[index].is_claimed()
    }

    /// The features found so far, in the order they were claimed
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// The assigned charge of every peak, 0 for peaks that do not start a series
    pub fn charges(&self) -> Vec<i32> {
        self.states.iter().map(|s| s.charge).collect()
    }

    /// The isotopic series length of every peak, 1 for peaks that do not start a series
    pub fn iso_peak_counts(&self) -> Vec<i32> {
        self.states.iter().map(|s| s.iso_peak_count as i32).collect()
    }

    /// Record `chain` as a new feature. A peak is never moved from one feature
    /// to another.
    fn claim(&mut self, chain: &IsotopicChain, peaks: &PeakView<'_>) -> usize {
        let id = self.features.len();
        let mono = chain.monoisotopic();
        let mut members = Vec::with_capacity(chain.len());
        let mut total = 0.0f64;
        for i in chain.indices.iter().copied() {
            let state = &mut self.states[i];
            if state.feature.is_none() {
                state.feature = Some(id);
                members.push(i);
                total += peaks.intensity(i);
            }
        }
        let state = &mut self.states[mono];
        state.charge = chain.charge;
        state.iso_peak_count = chain.len();
        state.intensity = total;

        self.features.push(Feature {
            id,
            monoisotopic: mono,
            charge: chain.charge,
            members,
        });
        id
    }
}

/// Resolves isotopic chains into disjoint features. Earlier claims win, so a chain
/// ends at the first peak another feature already holds. The highest charge state
/// that yields a valid chain is taken for each start peak.
#[derive(Debug, Clone, Copy)]
pub struct FeatureAssigner<'a, 'b> {
    peaks: &'a PeakView<'b>,
    params: &'a DeisotopingParameters,
    extender: IsotopicChainExtender<'a, 'b>,
}

impl<'a, 'b> FeatureAssigner<'a, 'b> {
    pub fn new(
        peaks: &'a PeakView<'b>,
        params: &'a DeisotopingParameters,
        precursor_mass: Option<f64>,
    ) -> Self {
        Self {
            peaks,
            params,
            extender: IsotopicChainExtender::new(peaks, params, precursor_mass),
        }
    }

    fn uses_lower_noise_bound(&self, pass: SearchPass) -> bool {
        match pass {
            SearchPass::Seed => true,
            SearchPass::Exhaustive => self.params.noise_bound_in_exhaustive_pass,
        }
    }

    /// Search from each of `starts` in order, claiming the first valid chain found
    /// for each unclaimed start peak
    pub fn run_pass<I: IntoIterator<Item = usize>>(
        &self,
        assignments: &mut PeakAssignments,
        starts: I,
        pass: SearchPass,
    ) {
        let lower_noise_bound = self.uses_lower_noise_bound(pass);
        let before = assignments.feature_count();
        for start in starts {
            if assignments.is_claimed(start) {
                continue;
            }
            for charge in self.params.charges() {
                let Some(mut chain) = self.extender.extend(start, charge, lower_noise_bound)
                else {
                    continue;
                };
                let conflict = chain.indices.iter().enumerate().position(|(j, i)| {
                    assignments.is_claimed(*i) || chain.indices[..j].contains(i)
                });
                if let Some(pos) = conflict {
                    chain.truncate(pos, self.params.min_isotopic_peaks, ChainStop::ClaimedPeak);
                }
                if chain.valid {
                    let id = assignments.claim(&chain, self.peaks);
                    trace!(
                        "Feature {id} claims {:?} at charge {charge} during {pass:?} pass",
                        chain.indices
                    );
                    break;
                }
            }
        }
        debug!(
            "{pass:?} pass found {} features",
            assignments.feature_count() - before
        );
    }

    /// Run the seed pass over `seeds` followed by the exhaustive pass over every peak
    pub fn assign(&self, seeds: &[usize]) -> PeakAssignments {
        let mut assignments = PeakAssignments::new(self.peaks);
        self.run_pass(&mut assignments, seeds.iter().copied(), SearchPass::Seed);
        self.run_pass(&mut assignments, 0..self.peaks.len(), SearchPass::Exhaustive);
        assignments
    }
}

#[cfg(test)]
mod test {
    use std::borrow::Cow;

    use mzpeaks::Tolerance;

    use super::*;
    use crate::utils::NEUTRON_SHIFT;

    fn params() -> DeisotopingParameters {
        DeisotopingParameters::default()
            .with_tolerance(Tolerance::Da(0.01))
            .with_charge_range(1, 3)
            .with_isotopic_peak_range(2, 3)
    }

    #[test_log::test]
    fn test_prefers_high_charge() {
        let step = NEUTRON_SHIFT / 2.0;
        let view = PeakView::new(
            Cow::Owned(vec![500.0, 500.0 + step, 500.0 + 2.0 * step]),
            Cow::Owned(vec![100.0, 80.0, 50.0]),
        )
        .unwrap();
        let params = params();
        let assigner = FeatureAssigner::new(&view, &params, None);
        let assignments = assigner.assign(&[0]);

        assert_eq!(assignments.feature_count(), 1);
        let feature = &assignments.features()[0];
        assert_eq!(feature.charge, 2);
        assert_eq!(feature.members, vec![0, 1, 2]);
        assert_eq!(assignments.charges(), vec![2, 0, 0]);
        assert_eq!(assignments.iso_peak_counts(), vec![3, 1, 1]);
        assert_eq!(assignments.get(0).unwrap().intensity, 230.0);
        assert!(assignments.states().iter().all(|s| s.is_claimed()));
    }

    #[test_log::test]
    fn test_seed_pass_claims_first() {
        // Peak 0 would claim peak 1 at charge 1, but peak 1 is the seed and
        // claims its own series first.
        let view = PeakView::new(
            Cow::Owned(vec![
                499.0,
                499.0 + NEUTRON_SHIFT,
                499.0 + 2.0 * NEUTRON_SHIFT,
                499.0 + 3.0 * NEUTRON_SHIFT,
            ]),
            Cow::Owned(vec![60.0, 100.0, 50.0, 20.0]),
        )
        .unwrap();
        let params = params().with_decreasing_model(None);
        let assigner = FeatureAssigner::new(&view, &params, None);

        let assignments = assigner.assign(&[1]);
        assert_eq!(assignments.features()[0].monoisotopic, 1);
        assert_eq!(assignments.features()[0].members, vec![1, 2, 3]);
        assert!(!assignments.is_claimed(0));
        assert_eq!(assignments.charges(), vec![0, 1, 0, 0]);

        let assignments = assigner.assign(&[]);
        assert_eq!(assignments.features()[0].monoisotopic, 0);
        assert_eq!(assignments.features()[0].members, vec![0, 1, 2]);
    }

    fn weak_first_isotope() -> PeakView<'static> {
        PeakView::new(
            Cow::Owned(vec![500.0, 500.0 + NEUTRON_SHIFT, 500.0 + 2.0 * NEUTRON_SHIFT]),
            Cow::Owned(vec![1000.0, 5.0, 2.0]),
        )
        .unwrap()
    }

    #[test_log::test]
    fn test_noise_bound_by_pass() {
        let view = weak_first_isotope();
        let params = params();
        let assigner = FeatureAssigner::new(&view, &params, None);

        let mut assignments = PeakAssignments::new(&view);
        assigner.run_pass(&mut assignments, [0], SearchPass::Seed);
        assert_eq!(assignments.feature_count(), 0);
        assigner.run_pass(&mut assignments, [0], SearchPass::Exhaustive);
        assert_eq!(assignments.feature_count(), 1);
        assert_eq!(assignments.features()[0].members, vec![0, 1, 2]);

        let assignments = assigner.assign(&[0]);
        assert_eq!(assignments.charges(), vec![1, 0, 0]);

        // With the bound in both passes, the weak isotope can only start its own series
        let strict = params.with_noise_bound_in_exhaustive_pass(true);
        let assignments = FeatureAssigner::new(&view, &strict, None).assign(&[0]);
        assert_eq!(assignments.feature_count(), 1);
        assert!(!assignments.is_claimed(0));
        assert_eq!(assignments.features()[0].members, vec![1, 2]);
        assert_eq!(assignments.charges(), vec![0, 1, 0]);
    }

    fn claimed_third_isotope() -> PeakView<'static> {
        // Peaks 2-4 are a charge 2 series whose second peak sits where the third
        // isotope of a charge 1 series starting at peak 0 would be
        PeakView::new(
            Cow::Owned(vec![
                600.0,
                600.0 + NEUTRON_SHIFT,
                600.0 + 1.5 * NEUTRON_SHIFT,
                600.0 + 2.0 * NEUTRON_SHIFT,
                600.0 + 2.5 * NEUTRON_SHIFT,
            ]),
            Cow::Owned(vec![100.0, 60.0, 90.0, 80.0, 40.0]),
        )
        .unwrap()
    }

    #[test_log::test]
    fn test_chain_stops_at_claimed_peak() {
        let view = claimed_third_isotope();
        let params = params()
            .with_charge_range(1, 2)
            .with_decreasing_model(None);

        let assignments = FeatureAssigner::new(&view, &params, None).assign(&[2]);
        assert_eq!(assignments.feature_count(), 2);
        assert_eq!(assignments.features()[0].members, vec![2, 3, 4]);
        assert_eq!(assignments.features()[0].charge, 2);
        assert_eq!(assignments.features()[1].members, vec![0, 1]);
        assert_eq!(assignments.features()[1].charge, 1);
        assert_eq!(assignments.iso_peak_counts(), vec![2, 1, 3, 1, 1]);
        assert_eq!(assignments.get(3).unwrap().feature, Some(0));

        // Cut short below the minimum, the series is rejected
        let params = params.with_isotopic_peak_range(3, 3);
        let assignments = FeatureAssigner::new(&view, &params, None).assign(&[2]);
        assert_eq!(assignments.feature_count(), 1);
        assert!(!assignments.is_claimed(0));
        assert!(!assignments.is_claimed(1));
        assert_eq!(assignments.charges(), vec![0, 0, 2, 0, 0]);
    }

    #[test]
    fn test_chain_stops_at_repeated_peak() {
        // With a tolerance wider than half the charge 3 spacing, the second and
        // third isotopes both resolve to peak 1
        let view = PeakView::new(
            Cow::Owned(vec![500.0, 500.5]),
            Cow::Owned(vec![100.0, 80.0]),
        )
        .unwrap();
        let params = params().with_tolerance(Tolerance::Da(0.4));
        let assignments = FeatureAssigner::new(&view, &params, None).assign(&[]);
        assert_eq!(assignments.feature_count(), 1);
        assert_eq!(assignments.features()[0].charge, 3);
        assert_eq!(assignments.features()[0].members, vec![0, 1]);
        assert_eq!(assignments.iso_peak_counts(), vec![2, 1]);
    }

    #[test]
    fn test_features_are_disjoint() {
        let mut mzs = Vec::new();
        let mut ints = Vec::new();
        for (i, base) in [300.0, 300.4, 301.3, 450.0, 450.2].iter().enumerate() {
            for k in 0..3 {
                mzs.push(base + k as f64 * NEUTRON_SHIFT / (1 + i % 3) as f64);
                ints.push(100.0 / (k + 1) as f64);
            }
        }
        let mut order: Vec<usize> = (0..mzs.len()).collect();
        order.sort_by(|a, b| mzs[*a].total_cmp(&mzs[*b]));
        let mzs: Vec<f64> = order.iter().map(|i| mzs[*i]).collect();
        let ints: Vec<f64> = order.iter().map(|i| ints[*i]).collect();

        let view = PeakView::new(Cow::Owned(mzs), Cow::Owned(ints)).unwrap();
        let params = params();
        let assignments = FeatureAssigner::new(&view, &params, None).assign(&[]);

        let mut seen = vec![false; view.len()];
        for feature in assignments.features() {
            assert!(feature.members.len() <= params.max_isotopic_peaks);
            assert!(feature.members.len() >= params.min_isotopic_peaks);
            assert_eq!(feature.members[0], feature.monoisotopic);
            for i in feature.members.iter().copied() {
                assert!(!seen[i]);
                seen[i] = true;
                assert_eq!(assignments.get(i).unwrap().feature, Some(feature.id));
            }
        }
    }
}
