use schooladmin_backend::workflow::{
    authorize_request, review_eligibility, review_sponsorship, EligibilityAction, ReviewAction,
    Role, SponsorshipStatus, StudentStatus,
};

#[test]
fn full_happy_path_from_intake_to_sponsored() {
    let overseer = Role::SponsorshipsOverseer;
    let admin = Role::Admin;

    // Intake review by the overseer.
    let s = review_eligibility(
        StudentStatus::EligibilityCheck,
        EligibilityAction::Approve,
        overseer,
    )
    .expect("approve eligibility");
    assert_eq!(s, StudentStatus::Eligible);

    let s = review_eligibility(s, EligibilityAction::Open, overseer).expect("open to sponsors");
    assert_eq!(s, StudentStatus::AvailableForSponsors);

    // A sponsor claims the student.
    authorize_request(s, false, Role::Sponsor).expect("request allowed");

    // Overseer approves the pending request: both records move together.
    let t = review_sponsorship(SponsorshipStatus::Pending, ReviewAction::Approve, overseer)
        .expect("overseer approval");
    assert_eq!(t.sponsorship_status, SponsorshipStatus::CoordinatorApproved);
    assert_eq!(t.student_status, StudentStatus::CoordinatorApproved);

    // Admin signs off.
    let t = review_sponsorship(t.sponsorship_status, ReviewAction::Approve, admin)
        .expect("admin approval");
    assert_eq!(t.sponsorship_status, SponsorshipStatus::Sponsored);
    assert_eq!(t.student_status, StudentStatus::Sponsored);
    assert_eq!(t.admitted_by, Some("admin"));
}

#[test]
fn rejection_at_admin_stage_reopens_the_student() {
    let t = review_sponsorship(
        SponsorshipStatus::CoordinatorApproved,
        ReviewAction::Reject,
        Role::Admin,
    )
    .expect("admin rejection");
    assert_eq!(t.sponsorship_status, SponsorshipStatus::Rejected);
    assert_eq!(t.student_status, StudentStatus::AvailableForSponsors);

    // A rejected record is no longer a live claim, so a new request is legal.
    authorize_request(t.student_status, false, Role::Sponsor).expect("student back in pool");
}

#[test]
fn actors_cannot_cross_their_stage() {
    // Sponsor can neither review eligibility nor decide requests.
    assert!(review_eligibility(
        StudentStatus::EligibilityCheck,
        EligibilityAction::Approve,
        Role::Sponsor
    )
    .is_err());
    assert!(
        review_sponsorship(SponsorshipStatus::Pending, ReviewAction::Approve, Role::Sponsor)
            .is_err()
    );
    // Overseer cannot give the final sign-off.
    assert!(review_sponsorship(
        SponsorshipStatus::CoordinatorApproved,
        ReviewAction::Approve,
        Role::SponsorshipsOverseer
    )
    .is_err());
}

#[test]
fn pool_membership_excludes_students_with_live_claims() {
    // Fixture mirrors the view the pool query computes: students marked
    // available, some of which still have a live sponsorship record.
    let students = [
        ("s1", StudentStatus::AvailableForSponsors, None),
        (
            "s2",
            StudentStatus::AvailableForSponsors,
            Some(SponsorshipStatus::Pending),
        ),
        (
            "s3",
            StudentStatus::AvailableForSponsors,
            Some(SponsorshipStatus::Rejected),
        ),
        ("s4", StudentStatus::Eligible, None),
        (
            "s5",
            StudentStatus::AvailableForSponsors,
            Some(SponsorshipStatus::Sponsored),
        ),
    ];

    let pool: Vec<&str> = students
        .iter()
        .filter(|(_, status, claim)| {
            *status == StudentStatus::AvailableForSponsors
                && !claim.map(|c| c.is_live()).unwrap_or(false)
        })
        .map(|(name, _, _)| *name)
        .collect();

    assert_eq!(pool, vec!["s1", "s3"]);
}

#[test]
fn legacy_status_strings_normalize_to_the_same_state() {
    for alias in ["pending", "awaiting", "eligibility-check"] {
        assert_eq!(
            alias.parse::<StudentStatus>().unwrap(),
            StudentStatus::EligibilityCheck
        );
    }
}
