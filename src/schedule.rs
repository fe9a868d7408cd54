//! The coarse-to-fine radius schedule.
//!
//! The ink budget is split into five bands. While most of the budget remains, dots are large and
//! give an immediate impression of the image; as the budget runs down, dots shrink and fill in
//! detail. The schedule depends only on the remaining budget, never on wall-clock time.

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, PartialEq, Eq, Copy, Clone, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ScheduleKind {
    /// Radii of 16, 8, 4, 2, 1 pixels regardless of image size.
    #[default]
    Fixed,
    /// Radii proportional to the long edge of the image.
    SizeAware,
}

#[derive(Debug, Copy, Clone)]
enum Rule {
    Pixels(f64),
    /// `max(1, long_edge / divisor)`.
    LongEdgeOver(f64),
}

#[derive(Debug, Copy, Clone)]
struct Band {
    /// Inclusive lower bound, in fifths of the initial budget.
    fifths: i64,
    rule: Rule,
}

#[rustfmt::skip]
const FIXED: &[Band] = &[
    Band { fifths: 4, rule: Rule::Pixels(16.0) },
    Band { fifths: 3, rule: Rule::Pixels(8.0) },
    Band { fifths: 2, rule: Rule::Pixels(4.0) },
    Band { fifths: 1, rule: Rule::Pixels(2.0) },
    Band { fifths: 0, rule: Rule::Pixels(1.0) },
];

#[rustfmt::skip]
const SIZE_AWARE: &[Band] = &[
    Band { fifths: 4, rule: Rule::LongEdgeOver(50.0) },
    Band { fifths: 3, rule: Rule::LongEdgeOver(100.0) },
    Band { fifths: 2, rule: Rule::LongEdgeOver(200.0) },
    Band { fifths: 1, rule: Rule::LongEdgeOver(400.0) },
    Band { fifths: 0, rule: Rule::Pixels(1.0) },
];

#[derive(Debug, Copy, Clone)]
pub struct RadiusSchedule {
    bands: &'static [Band],
    /// Inclusive lower bound of each band, in budget units.
    floors: [i64; 5],
}

impl RadiusSchedule {
    pub fn new(kind: ScheduleKind, initial_budget: i64) -> Self {
        let bands = match kind {
            ScheduleKind::Fixed => FIXED,
            ScheduleKind::SizeAware => SIZE_AWARE,
        };
        // Widened so that budgets near `i64::MAX` don't overflow; each floor is at most
        // `initial_budget`, so it fits back into an `i64`.
        let floors = std::array::from_fn(|i| {
            (i128::from(initial_budget) * i128::from(bands[i].fifths) / 5) as i64
        });
        RadiusSchedule { bands, floors }
    }

    /// Index of the band that `remaining` falls in (0 is the coarsest), or `None` once the budget
    /// is spent.
    pub fn band_index(&self, remaining: i64) -> Option<usize> {
        if remaining <= 0 {
            return None;
        }
        // The last band has a lower bound of zero, so this always finds one.
        self.floors.iter().position(|&floor| remaining >= floor)
    }

    /// The exclusive upper bound on dot radius while `remaining` budget is left, or `None` if the
    /// session should stop.
    pub fn max_radius(&self, remaining: i64, long_edge: u32) -> Option<f64> {
        let band = self.bands[self.band_index(remaining)?];
        Some(match band.rule {
            Rule::Pixels(px) => px,
            Rule::LongEdgeOver(divisor) => f64::max(1.0, f64::from(long_edge) / divisor),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUDGET: i64 = 200000;

    #[test]
    fn test_fixed_bands() {
        const TEST_CASES: &[(i64, Option<f64>)] = &[
            (200000, Some(16.0)),
            (160000, Some(16.0)),
            (159999, Some(8.0)),
            (120000, Some(8.0)),
            (119960, Some(4.0)),
            (80000, Some(4.0)),
            (79999, Some(2.0)),
            (40000, Some(2.0)),
            (39999, Some(1.0)),
            (1, Some(1.0)),
            (0, None),
            (-40, None),
        ];
        let schedule = RadiusSchedule::new(ScheduleKind::Fixed, BUDGET);
        for &(remaining, want) in TEST_CASES {
            let got = schedule.max_radius(remaining, 1000);
            if got != want {
                panic!("max_radius({}): got {:?}, want {:?}", remaining, got, want);
            }
        }
    }

    #[test]
    fn test_size_aware_bands() {
        const TEST_CASES: &[(i64, u32, Option<f64>)] = &[
            (180000, 800, Some(16.0)),
            (140000, 800, Some(8.0)),
            (100000, 800, Some(4.0)),
            (60000, 800, Some(2.0)),
            (20000, 800, Some(1.0)),
            (180000, 1000, Some(20.0)),
            (60000, 1000, Some(2.5)),
            (180000, 10, Some(1.0)),
            (60000, 10, Some(1.0)),
            (0, 800, None),
        ];
        let schedule = RadiusSchedule::new(ScheduleKind::SizeAware, BUDGET);
        for &(remaining, long_edge, want) in TEST_CASES {
            let got = schedule.max_radius(remaining, long_edge);
            if got != want {
                panic!(
                    "max_radius({}, {}): got {:?}, want {:?}",
                    remaining, long_edge, got, want
                );
            }
        }
    }

    #[test]
    fn test_monotonic_as_budget_drains() {
        for kind in [ScheduleKind::Fixed, ScheduleKind::SizeAware] {
            let schedule = RadiusSchedule::new(kind, BUDGET);
            let mut previous = f64::INFINITY;
            let mut remaining = BUDGET;
            while let Some(r) = schedule.max_radius(remaining, 1234) {
                assert!(r <= previous, "{:?} grew at {}: {} > {}", kind, remaining, r, previous);
                assert!(r >= 1.0);
                previous = r;
                remaining -= 40;
            }
            assert!(remaining <= 0);
        }
    }

    #[test]
    fn test_huge_budget_keeps_band_order() {
        const TEST_CASES: &[(i64, Option<usize>)] = &[
            (i64::MAX, Some(0)),
            (i64::MAX / 5 * 4 + 1, Some(0)),
            (i64::MAX / 5 * 4 - 1, Some(1)),
            (i64::MAX / 2, Some(2)),
            (i64::MAX / 5 - 1, Some(4)),
            (40, Some(4)),
            (0, None),
        ];
        let schedule = RadiusSchedule::new(ScheduleKind::Fixed, i64::MAX);
        for &(remaining, want) in TEST_CASES {
            let got = schedule.band_index(remaining);
            if got != want {
                panic!("band_index({}): got {:?}, want {:?}", remaining, got, want);
            }
        }
        assert_eq!(schedule.max_radius(i64::MAX - 40, 100), Some(16.0));
    }

    #[test]
    fn test_custom_budget_scales_bands() {
        let schedule = RadiusSchedule::new(ScheduleKind::Fixed, 1000);
        assert_eq!(schedule.band_index(1000), Some(0));
        assert_eq!(schedule.band_index(800), Some(0));
        assert_eq!(schedule.band_index(799), Some(1));
        assert_eq!(schedule.band_index(199), Some(4));
        assert_eq!(schedule.band_index(0), None);
    }
}
