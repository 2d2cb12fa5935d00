use chrono::{DateTime, Utc};

use crate::domain::request::{Request, RequestStatus};

const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressColor {
    Red,
    Orange,
    Green,
    Blue,
}

/// Timeline rendering inputs for a single request: how far along the
/// lifecycle it is and how it should be tinted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusProgress {
    pub percent: u8,
    pub color: ProgressColor,
}

impl StatusProgress {
    pub fn of(status: RequestStatus) -> Self {
        Self { percent: percent(status), color: color(status) }
    }

    /// Progress for a raw wire status. Unknown statuses render as 0% blue
    /// rather than failing the whole screen.
    pub fn of_raw(raw: &str) -> Self {
        match RequestStatus::parse(raw) {
            Some(status) => Self::of(status),
            None => Self { percent: 0, color: ProgressColor::Blue },
        }
    }
}

/// Fixed lookup; rejected counts as 100 because the timeline is over.
pub fn percent(status: RequestStatus) -> u8 {
    match status {
        RequestStatus::Draft => 10,
        RequestStatus::Pending => 25,
        RequestStatus::RevisionRequested => 30,
        RequestStatus::InReview => 40,
        RequestStatus::Approved => 60,
        RequestStatus::Purchasing => 70,
        RequestStatus::Ordered => 80,
        RequestStatus::Delivered => 90,
        RequestStatus::Completed => 100,
        RequestStatus::Rejected => 100,
    }
}

pub fn color(status: RequestStatus) -> ProgressColor {
    match status {
        RequestStatus::Rejected => ProgressColor::Red,
        RequestStatus::RevisionRequested => ProgressColor::Orange,
        RequestStatus::Completed => ProgressColor::Green,
        _ => ProgressColor::Blue,
    }
}

/// Whole days since submission (creation for never-submitted requests),
/// clamped to zero for future timestamps.
pub fn days_elapsed(request: &Request, now: DateTime<Utc>) -> i64 {
    let elapsed_ms = now.signed_duration_since(request.age_reference()).num_milliseconds();
    (elapsed_ms / MILLIS_PER_DAY).max(0)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    use crate::domain::request::{Request, RequestId, RequestStatus, Unit};
    use crate::domain::user::UserId;

    use super::{days_elapsed, percent, ProgressColor, StatusProgress};

    fn request() -> Request {
        let now = Utc::now();
        Request {
            id: RequestId(1),
            request_number: "REQ-2025-AB12CD".to_string(),
            item: "Drill".to_string(),
            quantity: Decimal::ONE,
            unit: Unit::Pieces,
            description: String::new(),
            category: String::new(),
            reason: String::new(),
            status: RequestStatus::Pending,
            created_by: UserId(1),
            created_by_name: String::new(),
            created_at: now,
            updated_at: now,
            submitted_at: None,
            revision_count: 0,
            revision_notes: String::new(),
        }
    }

    #[test]
    fn mapping_is_total_over_every_status() {
        for status in RequestStatus::ALL {
            let progress = StatusProgress::of(status);
            assert!(progress.percent > 0, "{status} must map to a fixed nonzero percent");
        }
    }

    #[test]
    fn lifecycle_percentages_are_monotonic_along_the_happy_path() {
        let path = [
            RequestStatus::Draft,
            RequestStatus::Pending,
            RequestStatus::InReview,
            RequestStatus::Approved,
            RequestStatus::Purchasing,
            RequestStatus::Ordered,
            RequestStatus::Delivered,
            RequestStatus::Completed,
        ];
        for pair in path.windows(2) {
            assert!(percent(pair[0]) < percent(pair[1]));
        }
    }

    #[test]
    fn unknown_status_maps_to_zero() {
        let progress = StatusProgress::of_raw("archived");
        assert_eq!(progress.percent, 0);
        assert_eq!(progress.color, ProgressColor::Blue);
    }

    #[test]
    fn terminal_colors_follow_the_fixed_palette() {
        assert_eq!(StatusProgress::of(RequestStatus::Rejected).color, ProgressColor::Red);
        assert_eq!(
            StatusProgress::of(RequestStatus::RevisionRequested).color,
            ProgressColor::Orange
        );
        assert_eq!(StatusProgress::of(RequestStatus::Completed).color, ProgressColor::Green);
        assert_eq!(StatusProgress::of(RequestStatus::Ordered).color, ProgressColor::Blue);
    }

    #[test]
    fn days_elapsed_uses_submission_time_when_present() {
        let mut request = request();
        let now = Utc::now();
        request.created_at = now - Duration::days(10);
        request.submitted_at = Some(now - Duration::days(3));

        assert_eq!(days_elapsed(&request, now), 3);
    }

    #[test]
    fn days_elapsed_falls_back_to_creation_time() {
        let mut request = request();
        let now = Utc::now();
        request.created_at = now - Duration::hours(36);
        request.submitted_at = None;

        assert_eq!(days_elapsed(&request, now), 1);
    }

    #[test]
    fn future_reference_clamps_to_zero() {
        let mut request = request();
        let now = Utc::now();
        request.submitted_at = Some(now + Duration::days(2));

        assert_eq!(days_elapsed(&request, now), 0);
    }
}
