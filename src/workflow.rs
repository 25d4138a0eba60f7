//! Sponsorship workflow state machine.
//!
//! Every status transition in the system goes through this module. Statuses are
//! stored as text in the database; this module owns the closed set of legal
//! values and the role-gated transition table, so no handler mutates a status
//! string directly.

use axum::http::StatusCode;
use std::fmt;
use std::str::FromStr;

/// Student-level sponsorship status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudentStatus {
    None,
    EligibilityCheck,
    Eligible,
    AvailableForSponsors,
    CoordinatorApproved,
    Sponsored,
}

impl StudentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentStatus::None => "none",
            StudentStatus::EligibilityCheck => "eligibility-check",
            StudentStatus::Eligible => "eligible",
            StudentStatus::AvailableForSponsors => "available-for-sponsors",
            StudentStatus::CoordinatorApproved => "coordinator-approved",
            StudentStatus::Sponsored => "sponsored",
        }
    }
}

impl FromStr for StudentStatus {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Legacy records used "pending" and "awaiting" for the intake stage.
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(StudentStatus::None),
            "eligibility-check" | "pending" | "awaiting" => Ok(StudentStatus::EligibilityCheck),
            "eligible" => Ok(StudentStatus::Eligible),
            "available-for-sponsors" => Ok(StudentStatus::AvailableForSponsors),
            "coordinator-approved" => Ok(StudentStatus::CoordinatorApproved),
            "sponsored" => Ok(StudentStatus::Sponsored),
            other => Err(WorkflowError::UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sponsorship-record status, distinct from the student-level one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SponsorshipStatus {
    Pending,
    CoordinatorApproved,
    Sponsored,
    Rejected,
}

/// Statuses that count as a live claim on a student. A student with a
/// sponsorship in any of these must not appear in the available pool.
pub const LIVE_SPONSORSHIP_STATUSES: [SponsorshipStatus; 3] = [
    SponsorshipStatus::Pending,
    SponsorshipStatus::CoordinatorApproved,
    SponsorshipStatus::Sponsored,
];

impl SponsorshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SponsorshipStatus::Pending => "pending",
            SponsorshipStatus::CoordinatorApproved => "coordinator-approved",
            SponsorshipStatus::Sponsored => "sponsored",
            SponsorshipStatus::Rejected => "rejected",
        }
    }

    pub fn is_live(&self) -> bool {
        LIVE_SPONSORSHIP_STATUSES.contains(self)
    }
}

impl FromStr for SponsorshipStatus {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(SponsorshipStatus::Pending),
            "coordinator-approved" => Ok(SponsorshipStatus::CoordinatorApproved),
            "sponsored" => Ok(SponsorshipStatus::Sponsored),
            "rejected" => Ok(SponsorshipStatus::Rejected),
            other => Err(WorkflowError::UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for SponsorshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Teacher,
    SuperTeacher,
    Sponsor,
    SponsorshipsOverseer,
    Parent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::SuperTeacher => "super-teacher",
            Role::Sponsor => "sponsor",
            Role::SponsorshipsOverseer => "sponsorships-overseer",
            Role::Parent => "parent",
        }
    }
}

impl FromStr for Role {
    type Err = WorkflowError;

    // Role strings arrive in mixed casing and with either separator
    // ("SPONSORSHIPS_OVERSEER", "sponsorships-overseer"); normalize both.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "admin" => Ok(Role::Admin),
            "teacher" | "user" => Ok(Role::Teacher),
            "super-teacher" => Ok(Role::SuperTeacher),
            "sponsor" => Ok(Role::Sponsor),
            "sponsorships-overseer" => Ok(Role::SponsorshipsOverseer),
            "parent" => Ok(Role::Parent),
            other => Err(WorkflowError::UnknownRole(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overseer actions on a student's eligibility, before any sponsorship exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EligibilityAction {
    /// eligibility-check -> eligible
    Approve,
    /// eligible -> available-for-sponsors
    Open,
    /// available-for-sponsors -> eligible
    Withdraw,
}

impl FromStr for EligibilityAction {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approve" => Ok(EligibilityAction::Approve),
            "open" => Ok(EligibilityAction::Open),
            "withdraw" | "disapprove" => Ok(EligibilityAction::Withdraw),
            other => Err(WorkflowError::UnknownAction(other.to_string())),
        }
    }
}

/// Approve/reject decision on a sponsorship record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
}

/// Combined effect of a sponsorship-record transition. Both sides must be
/// persisted in the same transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SponsorshipTransition {
    pub sponsorship_status: SponsorshipStatus,
    pub student_status: StudentStatus,
    pub admitted_by: Option<&'static str>,
}

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("unknown status '{0}'")]
    UnknownStatus(String),

    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("role '{actor}' may not perform '{action}'")]
    Forbidden { actor: Role, action: &'static str },

    #[error("invalid transition: {subject} in '{from}' cannot '{action}'")]
    InvalidTransition {
        subject: &'static str,
        from: String,
        action: &'static str,
    },
}

impl WorkflowError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WorkflowError::Forbidden { .. } => StatusCode::FORBIDDEN,
            WorkflowError::InvalidTransition { .. } => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Overseer review of a student's eligibility. Returns the new student status.
pub fn review_eligibility(
    current: StudentStatus,
    action: EligibilityAction,
    actor: Role,
) -> Result<StudentStatus, WorkflowError> {
    if actor != Role::SponsorshipsOverseer {
        return Err(WorkflowError::Forbidden {
            actor,
            action: "eligibility review",
        });
    }

    match (current, action) {
        (StudentStatus::EligibilityCheck, EligibilityAction::Approve) => Ok(StudentStatus::Eligible),
        (StudentStatus::Eligible, EligibilityAction::Open) => {
            Ok(StudentStatus::AvailableForSponsors)
        }
        (StudentStatus::AvailableForSponsors, EligibilityAction::Withdraw) => {
            Ok(StudentStatus::Eligible)
        }
        (from, action) => Err(WorkflowError::InvalidTransition {
            subject: "student",
            from: from.to_string(),
            action: match action {
                EligibilityAction::Approve => "approve",
                EligibilityAction::Open => "open",
                EligibilityAction::Withdraw => "withdraw",
            },
        }),
    }
}

/// Guard for creating a new sponsorship request.
pub fn authorize_request(
    student_status: StudentStatus,
    has_live_sponsorship: bool,
    actor: Role,
) -> Result<(), WorkflowError> {
    if actor != Role::Sponsor && actor != Role::Admin {
        return Err(WorkflowError::Forbidden {
            actor,
            action: "sponsorship request",
        });
    }
    if student_status != StudentStatus::AvailableForSponsors || has_live_sponsorship {
        return Err(WorkflowError::InvalidTransition {
            subject: "student",
            from: student_status.to_string(),
            action: "request sponsorship",
        });
    }
    Ok(())
}

/// Approve or reject a sponsorship record. Pending records are decided by the
/// overseer, coordinator-approved records by the admin; a rejection at either
/// stage releases the student back into the pool.
pub fn review_sponsorship(
    current: SponsorshipStatus,
    action: ReviewAction,
    actor: Role,
) -> Result<SponsorshipTransition, WorkflowError> {
    let action_name = match action {
        ReviewAction::Approve => "approve",
        ReviewAction::Reject => "reject",
    };

    match current {
        SponsorshipStatus::Pending => {
            if actor != Role::SponsorshipsOverseer {
                return Err(WorkflowError::Forbidden {
                    actor,
                    action: "pending sponsorship review",
                });
            }
            match action {
                ReviewAction::Approve => Ok(SponsorshipTransition {
                    sponsorship_status: SponsorshipStatus::CoordinatorApproved,
                    student_status: StudentStatus::CoordinatorApproved,
                    admitted_by: None,
                }),
                ReviewAction::Reject => Ok(SponsorshipTransition {
                    sponsorship_status: SponsorshipStatus::Rejected,
                    student_status: StudentStatus::AvailableForSponsors,
                    admitted_by: None,
                }),
            }
        }
        SponsorshipStatus::CoordinatorApproved => {
            if actor != Role::Admin {
                return Err(WorkflowError::Forbidden {
                    actor,
                    action: "final sponsorship approval",
                });
            }
            match action {
                ReviewAction::Approve => Ok(SponsorshipTransition {
                    sponsorship_status: SponsorshipStatus::Sponsored,
                    student_status: StudentStatus::Sponsored,
                    admitted_by: Some("admin"),
                }),
                ReviewAction::Reject => Ok(SponsorshipTransition {
                    sponsorship_status: SponsorshipStatus::Rejected,
                    student_status: StudentStatus::AvailableForSponsors,
                    admitted_by: None,
                }),
            }
        }
        from => Err(WorkflowError::InvalidTransition {
            subject: "sponsorship",
            from: from.to_string(),
            action: action_name,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_status_accepts_legacy_aliases() {
        assert_eq!(
            "pending".parse::<StudentStatus>().unwrap(),
            StudentStatus::EligibilityCheck
        );
        assert_eq!(
            "awaiting".parse::<StudentStatus>().unwrap(),
            StudentStatus::EligibilityCheck
        );
        assert_eq!(
            "Available-For-Sponsors".parse::<StudentStatus>().unwrap(),
            StudentStatus::AvailableForSponsors
        );
        assert!("definitely-not-a-status".parse::<StudentStatus>().is_err());
    }

    #[test]
    fn role_parsing_is_separator_and_case_insensitive() {
        assert_eq!(
            "SPONSORSHIPS_OVERSEER".parse::<Role>().unwrap(),
            Role::SponsorshipsOverseer
        );
        assert_eq!(
            "sponsorships-overseer".parse::<Role>().unwrap(),
            Role::SponsorshipsOverseer
        );
        assert_eq!("SUPER_TEACHER".parse::<Role>().unwrap(), Role::SuperTeacher);
    }

    #[test]
    fn eligibility_chain_is_overseer_only() {
        let next = review_eligibility(
            StudentStatus::EligibilityCheck,
            EligibilityAction::Approve,
            Role::SponsorshipsOverseer,
        )
        .unwrap();
        assert_eq!(next, StudentStatus::Eligible);

        let err = review_eligibility(
            StudentStatus::EligibilityCheck,
            EligibilityAction::Approve,
            Role::Admin,
        )
        .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn withdraw_returns_student_to_eligible() {
        let next = review_eligibility(
            StudentStatus::AvailableForSponsors,
            EligibilityAction::Withdraw,
            Role::SponsorshipsOverseer,
        )
        .unwrap();
        assert_eq!(next, StudentStatus::Eligible);
    }

    #[test]
    fn skipping_a_stage_is_a_conflict() {
        let err = review_eligibility(
            StudentStatus::EligibilityCheck,
            EligibilityAction::Open,
            Role::SponsorshipsOverseer,
        )
        .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn overseer_approval_moves_both_records() {
        let t = review_sponsorship(
            SponsorshipStatus::Pending,
            ReviewAction::Approve,
            Role::SponsorshipsOverseer,
        )
        .unwrap();
        assert_eq!(t.sponsorship_status, SponsorshipStatus::CoordinatorApproved);
        assert_eq!(t.student_status, StudentStatus::CoordinatorApproved);
        assert_eq!(t.admitted_by, None);
    }

    #[test]
    fn admin_final_approval_records_admitted_by() {
        let t = review_sponsorship(
            SponsorshipStatus::CoordinatorApproved,
            ReviewAction::Approve,
            Role::Admin,
        )
        .unwrap();
        assert_eq!(t.sponsorship_status, SponsorshipStatus::Sponsored);
        assert_eq!(t.student_status, StudentStatus::Sponsored);
        assert_eq!(t.admitted_by, Some("admin"));
    }

    #[test]
    fn rejection_releases_student_at_either_stage() {
        for (status, actor) in [
            (SponsorshipStatus::Pending, Role::SponsorshipsOverseer),
            (SponsorshipStatus::CoordinatorApproved, Role::Admin),
        ] {
            let t = review_sponsorship(status, ReviewAction::Reject, actor).unwrap();
            assert_eq!(t.sponsorship_status, SponsorshipStatus::Rejected);
            assert_eq!(t.student_status, StudentStatus::AvailableForSponsors);
        }
    }

    #[test]
    fn admin_cannot_shortcut_pending_review() {
        let err = review_sponsorship(SponsorshipStatus::Pending, ReviewAction::Approve, Role::Admin)
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn terminal_states_reject_further_review() {
        for status in [SponsorshipStatus::Sponsored, SponsorshipStatus::Rejected] {
            let err =
                review_sponsorship(status, ReviewAction::Approve, Role::Admin).unwrap_err();
            assert_eq!(err.status_code(), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn requests_require_an_unclaimed_pool_student() {
        assert!(authorize_request(StudentStatus::AvailableForSponsors, false, Role::Sponsor).is_ok());
        assert!(authorize_request(StudentStatus::AvailableForSponsors, true, Role::Sponsor).is_err());
        assert!(authorize_request(StudentStatus::Eligible, false, Role::Sponsor).is_err());
        assert!(
            authorize_request(StudentStatus::AvailableForSponsors, false, Role::Teacher).is_err()
        );
    }
}
