//! Unit tests for review domain validation.

use crate::identity::domain::IdentityId;
use crate::review::domain::{Rating, Review, ReviewDomainError};
use crate::task::domain::TaskId;
use mockable::DefaultClock;
use rstest::rstest;

#[rstest]
#[case(0, false)]
#[case(1, true)]
#[case(3, true)]
#[case(5, true)]
#[case(6, false)]
#[case(250, false)]
fn rating_bounds_are_enforced(#[case] value: u8, #[case] expected_valid: bool) {
    assert_eq!(Rating::new(value).is_ok(), expected_valid);
}

#[test]
fn self_reviews_are_rejected() {
    let identity = IdentityId::new();
    let result = Review::new(
        TaskId::new(),
        identity,
        identity,
        Rating::new(4).expect("valid rating"),
        None,
        &DefaultClock,
    );
    assert_eq!(result.err(), Some(ReviewDomainError::SelfReview));
}

#[test]
fn blank_comments_are_rejected() {
    let result = Review::new(
        TaskId::new(),
        IdentityId::new(),
        IdentityId::new(),
        Rating::new(4).expect("valid rating"),
        Some("   ".to_owned()),
        &DefaultClock,
    );
    assert_eq!(result.err(), Some(ReviewDomainError::EmptyComment));
}

#[test]
fn comments_are_trimmed_and_optional() {
    let with_comment = Review::new(
        TaskId::new(),
        IdentityId::new(),
        IdentityId::new(),
        Rating::new(5).expect("valid rating"),
        Some("  Prompt and tidy.  ".to_owned()),
        &DefaultClock,
    )
    .expect("valid review");
    assert_eq!(with_comment.comment(), Some("Prompt and tidy."));

    let without_comment = Review::new(
        TaskId::new(),
        IdentityId::new(),
        IdentityId::new(),
        Rating::new(5).expect("valid rating"),
        None,
        &DefaultClock,
    )
    .expect("valid review");
    assert!(without_comment.comment().is_none());
}
