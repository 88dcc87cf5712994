//! Unit tests for billing domain validation and fee arithmetic.

use crate::billing::domain::{
    Amount, BillingDomainError, Transaction, TransactionStatus,
};
use crate::identity::domain::IdentityId;
use crate::task::domain::TaskId;
use mockable::DefaultClock;
use rstest::rstest;

#[rstest]
#[case(10_000, 1_000)]
#[case(99_999, 10_000)]
#[case(105, 11)]
#[case(104, 10)]
#[case(5, 1)]
#[case(4, 0)]
#[case(1, 0)]
fn platform_fee_is_ten_percent_rounded_half_up(#[case] amount: i64, #[case] expected_fee: i64) {
    let amount = Amount::from_minor_units(amount).expect("valid amount");
    assert_eq!(amount.platform_fee_minor(), expected_fee);
}

#[rstest]
#[case(0)]
#[case(-10)]
fn non_positive_amounts_are_rejected(#[case] minor_units: i64) {
    assert_eq!(
        Amount::from_minor_units(minor_units),
        Err(BillingDomainError::InvalidAmount(minor_units))
    );
}

#[test]
fn new_transactions_are_pending_with_the_fee_frozen() {
    let clock = DefaultClock;
    let amount = Amount::from_minor_units(95_00).expect("valid amount");
    let transaction = Transaction::new(
        TaskId::new(),
        IdentityId::new(),
        IdentityId::new(),
        amount,
        &clock,
    );

    assert_eq!(transaction.status(), TransactionStatus::Pending);
    assert_eq!(transaction.platform_fee_minor(), 9_50);
    assert!(transaction.paid_at().is_none());
}

#[test]
fn mark_paid_settles_exactly_once() {
    let clock = DefaultClock;
    let amount = Amount::from_minor_units(95_00).expect("valid amount");
    let mut transaction = Transaction::new(
        TaskId::new(),
        IdentityId::new(),
        IdentityId::new(),
        amount,
        &clock,
    );

    transaction.mark_paid(&clock).expect("settlement should succeed");
    assert_eq!(transaction.status(), TransactionStatus::Paid);
    assert!(transaction.paid_at().is_some());

    let again = transaction.mark_paid(&clock);
    assert!(matches!(
        again,
        Err(BillingDomainError::AlreadyFinalized {
            status: TransactionStatus::Paid,
            ..
        })
    ));
}

#[test]
fn mark_failed_is_rejected_after_settlement() {
    let clock = DefaultClock;
    let amount = Amount::from_minor_units(10_00).expect("valid amount");
    let mut transaction = Transaction::new(
        TaskId::new(),
        IdentityId::new(),
        IdentityId::new(),
        amount,
        &clock,
    );
    transaction.mark_paid(&clock).expect("settlement should succeed");

    assert!(matches!(
        transaction.mark_failed(),
        Err(BillingDomainError::AlreadyFinalized { .. })
    ));
}

#[rstest]
#[case(TransactionStatus::Pending)]
#[case(TransactionStatus::Paid)]
#[case(TransactionStatus::Failed)]
fn every_status_round_trips_through_its_storage_form(#[case] status: TransactionStatus) {
    assert_eq!(TransactionStatus::try_from(status.as_str()), Ok(status));
}
