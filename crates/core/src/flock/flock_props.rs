//! Property tests for the mortality invariant.

use proptest::prelude::*;

use super::{FlockError, apply_mortality};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Replaying any sequence of mortality events keeps
    /// `current = initial - Σ accepted` and never goes negative.
    #[test]
    fn prop_current_count_tracks_accepted_mortality(
        initial in 1i32..5_000,
        events in prop::collection::vec(0i32..800, 0..30),
    ) {
        let mut current = initial;
        let mut accepted = 0i32;

        for mortality in events {
            match apply_mortality(current, mortality) {
                Ok(next) => {
                    current = next;
                    accepted += mortality;
                }
                Err(FlockError::MortalityExceedsLiveCount { requested, available }) => {
                    prop_assert_eq!(requested, mortality);
                    prop_assert_eq!(available, current);
                    prop_assert!(mortality > current);
                }
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }
            prop_assert!(current >= 0);
            prop_assert_eq!(current, initial - accepted);
        }
    }
}
