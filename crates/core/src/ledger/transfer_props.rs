//! Property-based tests for transfer planning.
//!
//! Feature: transfer-engine, balance conservation and lock ordering.

use proptest::prelude::*;

use super::ordering::lock_order;
use super::transfer::TransferPlan;

/// Strategy to generate a valid account id.
fn account_id() -> impl Strategy<Value = i64> {
    1i64..1_000_000i64
}

/// Strategy to generate a valid positive amount in minor units.
fn positive_amount() -> impl Strategy<Value = i64> {
    1i64..100_000_000i64
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The debit and credit of any transfer sum to zero.
    #[test]
    fn prop_entries_balance(
        from in account_id(),
        to in account_id(),
        amount in positive_amount(),
    ) {
        let plan = TransferPlan::new(from, to, amount).unwrap();
        prop_assert_eq!(plan.debit().amount + plan.credit().amount, 0);
        prop_assert_eq!(plan.debit().account_id, from);
        prop_assert_eq!(plan.credit().account_id, to);
    }

    /// Applying the planned updates moves exactly `amount` from source to destination.
    #[test]
    fn prop_balance_conservation(
        from in account_id(),
        to in account_id(),
        amount in positive_amount(),
        from_balance in -1_000_000i64..1_000_000i64,
        to_balance in -1_000_000i64..1_000_000i64,
    ) {
        prop_assume!(from != to);
        let plan = TransferPlan::new(from, to, amount).unwrap();

        let mut balances = std::collections::HashMap::from([(from, from_balance), (to, to_balance)]);
        for update in plan.balance_updates() {
            *balances.get_mut(&update.account_id).unwrap() += update.amount;
        }

        prop_assert_eq!(balances[&from], from_balance - amount);
        prop_assert_eq!(balances[&to], to_balance + amount);
    }

    /// Transfers in opposite directions lock the same row first.
    #[test]
    fn prop_opposite_directions_share_lock_order(
        a in account_id(),
        b in account_id(),
        amount in positive_amount(),
    ) {
        let forward = TransferPlan::new(a, b, amount).unwrap();
        let backward = TransferPlan::new(b, a, amount).unwrap();

        let forward_ids: Vec<i64> = forward.balance_updates().iter().map(|u| u.account_id).collect();
        let backward_ids: Vec<i64> = backward.balance_updates().iter().map(|u| u.account_id).collect();

        prop_assert_eq!(&forward_ids, &backward_ids);
        prop_assert!(forward_ids[0] <= forward_ids[1]);
        prop_assert_eq!(forward_ids[0], lock_order(a, b).0);
    }

    /// Non-positive amounts never produce a plan.
    #[test]
    fn prop_non_positive_amount_rejected(
        from in account_id(),
        to in account_id(),
        amount in i64::MIN..=0i64,
    ) {
        prop_assert!(TransferPlan::new(from, to, amount).is_err());
    }
}
