//! Property-based tests for the order workflow.

use proptest::prelude::*;

use crate::orders::error::OrderError;
use crate::orders::types::OrderStatus;
use crate::orders::workflow::OrderWorkflow;

fn arb_status() -> impl Strategy<Value = OrderStatus> {
    prop_oneof![
        Just(OrderStatus::New),
        Just(OrderStatus::Confirmed),
        Just(OrderStatus::Processing),
        Just(OrderStatus::Delivered),
        Just(OrderStatus::Cancelled),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Terminal states only accept themselves.
    #[test]
    fn prop_terminal_states_are_final(from in arb_status(), to in arb_status()) {
        prop_assume!(from.is_terminal());
        let result = OrderWorkflow::transition(from, to);
        if from == to {
            prop_assert_eq!(result, Ok(to));
        } else {
            prop_assert_eq!(result, Err(OrderError::InvalidTransition { from, to }));
        }
    }

    /// Cancelling is allowed from every non-terminal state.
    #[test]
    fn prop_cancel_from_any_open_state(from in arb_status()) {
        prop_assume!(!from.is_terminal());
        prop_assert_eq!(
            OrderWorkflow::transition(from, OrderStatus::Cancelled),
            Ok(OrderStatus::Cancelled)
        );
    }

    /// Any accepted walk never revisits an earlier point on the forward path.
    #[test]
    fn prop_accepted_walks_are_monotonic(steps in prop::collection::vec(arb_status(), 1..20)) {
        let mut current = OrderStatus::New;
        for requested in steps {
            if let Ok(next) = OrderWorkflow::transition(current, requested) {
                if let (Some(before), Some(after)) = (current.rank(), next.rank()) {
                    prop_assert!(after >= before);
                }
                prop_assert!(!current.is_terminal() || next == current);
                current = next;
            }
        }
    }
}
