//! Unit tests for bid submission and assignment through bids.

use super::fixtures::draft;
use crate::identity::domain::IdentityId;
use crate::task::domain::{Bid, BidId, BidOffer, Budget, Task, TaskDomainError, TaskState};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

fn open_task(client: IdentityId, clock: &DefaultClock) -> Task {
    Task::new(draft(client), clock).expect("valid draft")
}

fn offer_bid(bidder: IdentityId, clock: &DefaultClock) -> Bid {
    let offer = BidOffer::new()
        .with_amount(Budget::from_minor_units(90_00).expect("valid amount"))
        .with_proposal("Can start this weekend, parts included.")
        .with_estimated_hours(3);
    Bid::new(bidder, offer, clock).expect("valid bid")
}

#[rstest]
fn submitted_bid_is_appended_without_a_state_change(clock: DefaultClock) {
    let client = IdentityId::new();
    let bidder = IdentityId::new();
    let mut task = open_task(client, &clock);

    let bid_id = task
        .submit_bid(offer_bid(bidder, &clock), &clock)
        .expect("bid should be accepted");

    assert_eq!(task.state(), TaskState::Open);
    assert_eq!(task.bids().len(), 1);
    let stored = task.find_bid(bid_id).expect("bid should be stored");
    assert_eq!(stored.bidder(), bidder);
    assert_eq!(stored.amount().map(Budget::minor_units), Some(90_00));
    assert_eq!(stored.estimated_hours(), Some(3));
}

#[rstest]
fn the_posting_client_cannot_bid_on_their_own_task(clock: DefaultClock) {
    let client = IdentityId::new();
    let mut task = open_task(client, &clock);

    let result = task.submit_bid(offer_bid(client, &clock), &clock);
    assert!(matches!(result, Err(TaskDomainError::OwnTaskBid { .. })));
    assert!(task.bids().is_empty());
}

#[rstest]
fn duplicate_bids_from_one_identity_are_rejected(clock: DefaultClock) {
    let client = IdentityId::new();
    let bidder = IdentityId::new();
    let mut task = open_task(client, &clock);

    task.submit_bid(offer_bid(bidder, &clock), &clock)
        .expect("first bid should be accepted");
    let result = task.submit_bid(offer_bid(bidder, &clock), &clock);

    assert!(matches!(
        result,
        Err(TaskDomainError::DuplicateBid { bidder: entry, .. }) if entry == bidder
    ));
    assert_eq!(task.bids().len(), 1);
}

#[rstest]
fn bids_are_rejected_once_the_task_leaves_open(clock: DefaultClock) {
    let client = IdentityId::new();
    let provider = IdentityId::new();
    let late_bidder = IdentityId::new();
    let mut task = open_task(client, &clock);
    task.book(client, provider, &clock).expect("booking should succeed");

    let result = task.submit_bid(offer_bid(late_bidder, &clock), &clock);
    assert!(matches!(
        result,
        Err(TaskDomainError::BiddingClosed {
            state: TaskState::Pending,
            ..
        })
    ));
}

#[rstest]
fn blank_proposals_are_rejected(clock: DefaultClock) {
    let result = Bid::new(
        IdentityId::new(),
        BidOffer::new().with_proposal("   "),
        &clock,
    );
    assert_eq!(result.err(), Some(TaskDomainError::EmptyProposal));
}

#[rstest]
fn assigning_a_bid_sets_the_provider_and_state(clock: DefaultClock) {
    let client = IdentityId::new();
    let bidder = IdentityId::new();
    let mut task = open_task(client, &clock);
    let bid_id = task
        .submit_bid(offer_bid(bidder, &clock), &clock)
        .expect("bid should be accepted");

    let assigned = task
        .assign_bid(client, bid_id, &clock)
        .expect("assignment should succeed");

    assert_eq!(assigned, bidder);
    assert_eq!(task.provider(), Some(bidder));
    assert_eq!(task.state(), TaskState::Assigned);
}

#[rstest]
fn assigning_an_unknown_bid_fails(clock: DefaultClock) {
    let client = IdentityId::new();
    let mut task = open_task(client, &clock);
    let missing = BidId::new();

    let result = task.assign_bid(client, missing, &clock);
    assert!(matches!(
        result,
        Err(TaskDomainError::UnknownBid { bid_id, .. }) if bid_id == missing
    ));
    assert_eq!(task.state(), TaskState::Open);
}

#[rstest]
fn assignment_is_reserved_for_the_posting_client(clock: DefaultClock) {
    let client = IdentityId::new();
    let bidder = IdentityId::new();
    let mut task = open_task(client, &clock);
    let bid_id = task
        .submit_bid(offer_bid(bidder, &clock), &clock)
        .expect("bid should be accepted");

    let result = task.assign_bid(bidder, bid_id, &clock);
    assert!(matches!(result, Err(TaskDomainError::NotTaskClient { .. })));
    assert_eq!(task.state(), TaskState::Open);
    assert!(task.provider().is_none());
}
