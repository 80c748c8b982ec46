//! Property tests for sale pricing and the purchase ledger arithmetic.

use coop_shared::Money;
use proptest::prelude::*;

use super::{reversal_delta, sale_total};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The stored total is exactly quantity × unit price.
    #[test]
    fn prop_total_is_quantity_times_price(
        quantity in 1i32..10_000,
        price in 1i64..10_000_000,
    ) {
        let total = sale_total(quantity, Money::from_minor(price)).unwrap();
        prop_assert_eq!(total.minor(), i64::from(quantity) * price);
    }

    /// Reversal deltas cancel recorded totals exactly, for any subset.
    #[test]
    fn prop_reversals_cancel_recorded_totals(
        sales in prop::collection::vec((1i32..500, 1i64..100_000), 1..40),
        deleted in prop::collection::vec(any::<bool>(), 40),
    ) {
        let totals: Vec<Money> = sales
            .iter()
            .map(|&(q, p)| sale_total(q, Money::from_minor(p)).unwrap())
            .collect();

        let mut ledger = Money::checked_sum(totals.iter().copied()).unwrap();
        let mut survivors = Money::ZERO;
        for (total, gone) in totals.iter().zip(&deleted) {
            if *gone {
                ledger = ledger.checked_add(reversal_delta(*total)).unwrap();
            } else {
                survivors = survivors.checked_add(*total).unwrap();
            }
        }

        prop_assert_eq!(ledger, survivors);
    }

    /// Non-positive inputs never price.
    #[test]
    fn prop_non_positive_inputs_rejected(
        quantity in -1000i32..=0,
        price in -1000i64..=0,
    ) {
        prop_assert!(sale_total(quantity, Money::from_minor(500)).is_err());
        prop_assert!(sale_total(5, Money::from_minor(price)).is_err());
    }
}
