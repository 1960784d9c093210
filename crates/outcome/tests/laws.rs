//! Algebraic laws of the synchronous combinators.
//!
//! Uses proptest to check, over arbitrary inputs:
//! - every outcome is exactly one of success or failure
//! - `join(each(xs, Ok)) == Ok(xs)`
//! - `join` reports the first failure by index
//! - `each`, `range`, `ok_all` and `void_all` keep input length
//! - `flat` is the concatenation of `disjoin`s
//! - `sliced` produces `ceil(n / size)` outputs whose sums add up

use nebula_outcome::{
    ErrorCapability, Outcome, OutcomeError, and, disjoin, each, flat, join, ok_all, only_errors,
    only_oks, range, sliced, void_all,
};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategy: outcomes whose failures carry their own index
// ---------------------------------------------------------------------------

fn arb_outcomes() -> impl Strategy<Value = Vec<Outcome<i32>>> {
    prop::collection::vec(any::<(bool, i32)>(), 0..40).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(index, (ok, value))| {
                if ok {
                    Ok(value)
                } else {
                    Err(OutcomeError::msg(format!("failure #{index}")))
                }
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn exactly_one_predicate_holds(outcomes in arb_outcomes()) {
        for outcome in &outcomes {
            prop_assert_ne!(ErrorCapability::is_ok(outcome), outcome.is_error());
        }
    }

    #[test]
    fn join_of_each_ok_is_identity(values in prop::collection::vec(any::<i64>(), 0..64)) {
        let mapped = each(ok_all(values.clone()), Ok);
        prop_assert_eq!(join(mapped), Ok(values));
    }

    #[test]
    fn join_reports_first_failure_by_index(outcomes in arb_outcomes()) {
        let expected = outcomes.iter().find_map(|o| o.as_ref().err().cloned());
        match join(outcomes) {
            Ok(_) => prop_assert!(expected.is_none()),
            Err(error) => prop_assert_eq!(Some(error), expected),
        }
    }

    #[test]
    fn elementwise_combinators_keep_length(outcomes in arb_outcomes(), n in 0usize..64) {
        let len = outcomes.len();
        prop_assert_eq!(each(outcomes.clone(), |v| Ok(v / 2)).len(), len);
        prop_assert_eq!(range(n, Ok).len(), n);
        prop_assert_eq!(ok_all(0..n).len(), n);

        let errors: Vec<Option<&str>> = outcomes
            .iter()
            .map(|o| o.as_ref().err().map(|_| "x"))
            .collect();
        prop_assert_eq!(void_all(errors).len(), len);
    }

    #[test]
    fn filters_partition(outcomes in arb_outcomes()) {
        let oks = only_oks(outcomes.clone());
        let errors = only_errors(outcomes.clone());
        prop_assert_eq!(oks.len() + errors.len(), outcomes.len());
        prop_assert!(oks.iter().all(Result::is_ok));
        prop_assert!(errors.iter().all(Result::is_err));
    }

    #[test]
    fn flat_concatenates_disjoins(
        groups in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..5), 0..10)
    ) {
        let outcomes: Vec<Outcome<Vec<u8>>> = ok_all(groups.clone());
        let expected: Vec<Outcome<u8>> = groups.into_iter().flat_map(|g| disjoin(Ok(g))).collect();
        prop_assert_eq!(flat(outcomes), expected);
    }

    #[test]
    fn sliced_chunk_count_and_sum(
        values in prop::collection::vec(-1000i64..1000, 0..50),
        size in 1usize..8
    ) {
        let sums = sliced(size, ok_all(values.clone()), |chunk| Ok(chunk.iter().sum::<i64>()));
        prop_assert_eq!(sums.len(), values.len().div_ceil(size));
        let total: i64 = sums.into_iter().map(|s| s.unwrap_or(0)).sum();
        prop_assert_eq!(total, values.iter().sum::<i64>());
    }
}

#[test]
fn and_on_failure_never_invokes() {
    let mut calls = 0;
    let out = and(Outcome::<i32>::Err(OutcomeError::msg("e")), |v| {
        calls += 1;
        Ok(v)
    });
    assert_eq!(out, Err(OutcomeError::msg("e")));
    assert_eq!(calls, 0);
}

#[test]
fn disjoin_examples() {
    assert_eq!(disjoin(Ok(vec![1, 2, 3])), vec![Ok(1), Ok(2), Ok(3)]);
    let e = OutcomeError::msg("e");
    assert_eq!(disjoin::<i32>(Err(e.clone())), vec![Err(e)]);
}

#[test]
fn sliced_example() {
    let sums = sliced(2, ok_all(1..=5), |chunk| Ok(chunk.iter().sum::<i32>()));
    assert_eq!(sums, vec![Ok(3), Ok(7), Ok(5)]);
}
