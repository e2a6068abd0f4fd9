//! Completion time estimation.
//!
//! Speed is the average since the first checkpoint: pages reached divided by
//! hours elapsed up to `now`. There is no regression over the intermediate
//! checkpoints.

use chrono::{DateTime, TimeDelta, Utc};
use readtrack_core::{Book, Checkpoint, Time};
use serde::Serialize;
use tracing::trace;

/// Lowest reported speed in pages per hour.
pub const SPEED_FLOOR: f64 = 0.001;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// A point on the projected reading line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectionPoint {
    /// Instant on the time axis
    pub time: Time,

    /// Page on the progress axis
    pub page: i64,
}

/// Progress of a book and, given enough history, a completion projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Estimation {
    /// Fewer than two checkpoints; no speed can be derived.
    InsufficientData {
        /// Page of the latest checkpoint, or 0
        current_page: i64,
        /// Share of the book read, 0-100 (can exceed 100)
        percent: f64,
        /// Pages left; negative when over-reported
        pages_remaining: i64,
    },

    /// Average speed since the first checkpoint, extrapolated to the last page.
    Estimated {
        /// Page of the latest checkpoint
        current_page: i64,
        /// Share of the book read, 0-100 (can exceed 100)
        percent: f64,
        /// Pages left; negative when over-reported
        pages_remaining: i64,
        /// Pages per hour, never below [`SPEED_FLOOR`]
        speed: f64,
        /// Hours until the last page; negative when over-reported
        hours_remaining: f64,
        /// Projected completion instant
        eta: Time,
        /// `(first checkpoint time, 0)`
        projection_start: ProjectionPoint,
        /// `(eta, total pages)`
        projection_end: ProjectionPoint,
    },
}

impl Estimation {
    /// Page of the latest checkpoint.
    pub fn current_page(&self) -> i64 {
        match self {
            Self::InsufficientData { current_page, .. } | Self::Estimated { current_page, .. } => {
                *current_page
            }
        }
    }

    /// Share of the book read.
    pub fn percent(&self) -> f64 {
        match self {
            Self::InsufficientData { percent, .. } | Self::Estimated { percent, .. } => *percent,
        }
    }

    /// Pages left.
    pub fn pages_remaining(&self) -> i64 {
        match self {
            Self::InsufficientData { pages_remaining, .. }
            | Self::Estimated { pages_remaining, .. } => *pages_remaining,
        }
    }

    /// Pages per hour, if estimated.
    pub fn speed(&self) -> Option<f64> {
        match self {
            Self::Estimated { speed, .. } => Some(*speed),
            Self::InsufficientData { .. } => None,
        }
    }

    /// Hours until completion, if estimated.
    pub fn hours_remaining(&self) -> Option<f64> {
        match self {
            Self::Estimated { hours_remaining, .. } => Some(*hours_remaining),
            Self::InsufficientData { .. } => None,
        }
    }

    /// Projected completion instant, if estimated.
    pub fn eta(&self) -> Option<Time> {
        match self {
            Self::Estimated { eta, .. } => Some(*eta),
            Self::InsufficientData { .. } => None,
        }
    }

    /// Endpoints of the projected reading line, if estimated.
    pub fn projection(&self) -> Option<(ProjectionPoint, ProjectionPoint)> {
        match self {
            Self::Estimated {
                projection_start,
                projection_end,
                ..
            } => Some((*projection_start, *projection_end)),
            Self::InsufficientData { .. } => None,
        }
    }

    /// Whether a speed projection was made.
    pub fn is_estimated(&self) -> bool {
        matches!(self, Self::Estimated { .. })
    }
}

/// Completion time estimator.
#[derive(Debug, Clone, Copy)]
pub struct CompletionEstimator {
    speed_floor: f64,
}

impl CompletionEstimator {
    /// Estimator with a custom speed floor. Non-positive or non-finite floors
    /// fall back to [`SPEED_FLOOR`].
    pub fn with_speed_floor(speed_floor: f64) -> Self {
        let speed_floor = if speed_floor.is_finite() && speed_floor > 0.0 {
            speed_floor
        } else {
            SPEED_FLOOR
        };
        Self { speed_floor }
    }

    /// Estimate a book's completion as seen at `now`.
    ///
    /// Checkpoints need not be sorted: the earliest and latest are picked by
    /// timestamp, with ties resolved the way a stable sort would order them.
    pub fn estimate(&self, book: &Book, now: Time) -> Estimation {
        let first = book.checkpoints.iter().min_by_key(|cp| cp.timestamp);
        let last = book.checkpoints.iter().max_by_key(|cp| cp.timestamp);

        let total_pages = i64::from(book.total_pages);
        let current_page = last.map_or(0, |cp| cp.page);
        let pages_remaining = total_pages.saturating_sub(current_page);
        let percent = if total_pages > 0 {
            current_page as f64 / total_pages as f64 * 100.0
        } else {
            0.0
        };

        let first = match first {
            Some(first) if book.checkpoints.len() >= 2 => first,
            _ => {
                return Estimation::InsufficientData {
                    current_page,
                    percent,
                    pages_remaining,
                }
            }
        };

        let speed = self.speed(first, current_page, now);
        let hours_remaining = pages_remaining as f64 / speed;
        let eta = offset_by_hours(now, hours_remaining);

        trace!(
            book_id = %book.id,
            current_page,
            speed,
            hours_remaining,
            "Estimated completion"
        );

        Estimation::Estimated {
            current_page,
            percent,
            pages_remaining,
            speed,
            hours_remaining,
            eta,
            projection_start: ProjectionPoint {
                time: first.timestamp,
                page: 0,
            },
            projection_end: ProjectionPoint {
                time: eta,
                page: total_pages,
            },
        }
    }

    fn speed(&self, first: &Checkpoint, current_page: i64, now: Time) -> f64 {
        let elapsed = now.signed_duration_since(first.timestamp);
        let elapsed_hours = elapsed.num_milliseconds() as f64 / MILLIS_PER_HOUR;

        let speed = if elapsed_hours > 0.0 {
            current_page as f64 / elapsed_hours
        } else {
            self.speed_floor
        };
        speed.max(self.speed_floor)
    }
}

impl Default for CompletionEstimator {
    fn default() -> Self {
        Self {
            speed_floor: SPEED_FLOOR,
        }
    }
}

/// Estimate a book's completion with the default speed floor.
pub fn estimate(book: &Book, now: Time) -> Estimation {
    CompletionEstimator::default().estimate(book, now)
}

/// `now + hours`, saturating at the representable range.
fn offset_by_hours(now: Time, hours: f64) -> Time {
    // `as` saturates out-of-range floats.
    let millis = (hours * MILLIS_PER_HOUR).round() as i64;
    TimeDelta::try_milliseconds(millis)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(if hours < 0.0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use readtrack_core::{BookId, Checkpoint, CheckpointId};

    fn t0() -> Time {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    fn checkpoint(page: i64, at: Time) -> Checkpoint {
        Checkpoint {
            id: CheckpointId::generate(),
            page,
            timestamp: at,
            notes: None,
        }
    }

    fn book(total_pages: u32, checkpoints: Vec<Checkpoint>) -> Book {
        Book {
            id: BookId::new("b1"),
            name: "Test".to_string(),
            total_pages,
            created_at: t0(),
            checkpoints,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_reference_scenario() {
        let book = book(
            300,
            vec![checkpoint(0, t0()), checkpoint(100, t0() + Duration::hours(10))],
        );
        let now = t0() + Duration::hours(10);

        let est = estimate(&book, now);
        assert!(est.is_estimated());
        assert_eq!(est.current_page(), 100);
        assert_close(est.percent(), 100.0 / 3.0);
        assert_eq!(est.pages_remaining(), 200);
        assert_close(est.speed().unwrap(), 10.0);
        assert_close(est.hours_remaining().unwrap(), 20.0);
        assert_eq!(est.eta(), Some(t0() + Duration::hours(30)));

        let (start, end) = est.projection().unwrap();
        assert_eq!(start, ProjectionPoint { time: t0(), page: 0 });
        assert_eq!(end, ProjectionPoint { time: t0() + Duration::hours(30), page: 300 });
    }

    #[test]
    fn test_speed_uses_first_checkpoint_not_previous() {
        let book = book(
            400,
            vec![
                checkpoint(0, t0()),
                checkpoint(150, t0() + Duration::hours(1)),
                checkpoint(200, t0() + Duration::hours(20)),
            ],
        );

        let est = estimate(&book, t0() + Duration::hours(20));
        assert_close(est.speed().unwrap(), 10.0);
        assert_close(est.hours_remaining().unwrap(), 20.0);
    }

    #[test]
    fn test_no_checkpoints_is_insufficient() {
        let est = estimate(&book(300, vec![]), t0());

        assert_eq!(
            est,
            Estimation::InsufficientData {
                current_page: 0,
                percent: 0.0,
                pages_remaining: 300,
            }
        );
        assert!(est.speed().is_none());
        assert!(est.eta().is_none());
        assert!(est.projection().is_none());
    }

    #[test]
    fn test_single_checkpoint_is_insufficient() {
        let book = book(200, vec![checkpoint(50, t0())]);
        let est = estimate(&book, t0() + Duration::hours(5));

        assert!(!est.is_estimated());
        assert_eq!(est.current_page(), 50);
        assert_close(est.percent(), 25.0);
        assert_eq!(est.pages_remaining(), 150);
        assert!(est.hours_remaining().is_none());
    }

    #[test]
    fn test_stalled_book_uses_speed_floor() {
        let book = book(
            100,
            vec![checkpoint(0, t0()), checkpoint(0, t0() + Duration::hours(3))],
        );

        let est = estimate(&book, t0() + Duration::hours(3));
        assert_close(est.speed().unwrap(), SPEED_FLOOR);
        assert_close(est.hours_remaining().unwrap(), 100.0 / SPEED_FLOOR);
    }

    #[test]
    fn test_now_before_first_checkpoint_uses_speed_floor() {
        let book = book(
            100,
            vec![checkpoint(0, t0()), checkpoint(10, t0() + Duration::hours(1))],
        );

        let est = estimate(&book, t0() - Duration::hours(1));
        assert_close(est.speed().unwrap(), SPEED_FLOOR);

        let est = estimate(&book, t0());
        assert_close(est.speed().unwrap(), SPEED_FLOOR);
    }

    #[test]
    fn test_over_read_book_has_negative_remaining() {
        let book = book(
            100,
            vec![checkpoint(0, t0()), checkpoint(120, t0() + Duration::hours(12))],
        );
        let now = t0() + Duration::hours(12);

        let est = estimate(&book, now);
        assert_eq!(est.pages_remaining(), -20);
        assert_close(est.speed().unwrap(), 10.0);
        assert_close(est.hours_remaining().unwrap(), -2.0);
        assert_eq!(est.eta(), Some(now - Duration::hours(2)));
        assert_close(est.percent(), 120.0);
    }

    #[test]
    fn test_current_page_follows_latest_timestamp_when_unsorted() {
        let book = book(
            300,
            vec![
                checkpoint(90, t0() + Duration::hours(9)),
                checkpoint(0, t0()),
                checkpoint(30, t0() + Duration::hours(3)),
            ],
        );

        let est = estimate(&book, t0() + Duration::hours(9));
        assert_eq!(est.current_page(), 90);
        assert_close(est.speed().unwrap(), 10.0);
        assert_eq!(est.projection().unwrap().0.time, t0());
    }

    #[test]
    fn test_equal_latest_timestamps_take_the_later_entry() {
        let at = t0() + Duration::hours(2);
        let book = book(
            300,
            vec![checkpoint(0, t0()), checkpoint(10, at), checkpoint(20, at)],
        );

        assert_eq!(estimate(&book, at).current_page(), 20);
    }

    #[test]
    fn test_extreme_values_do_not_panic() {
        let book = book(
            1,
            vec![
                checkpoint(i64::MIN, t0()),
                checkpoint(i64::MIN, t0() + Duration::milliseconds(1)),
            ],
        );

        let est = estimate(&book, t0() + Duration::hours(1));
        assert_eq!(est.pages_remaining(), i64::MAX);
        assert_eq!(est.eta(), Some(DateTime::<Utc>::MAX_UTC));
    }

    #[test]
    fn test_custom_speed_floor() {
        let estimator = CompletionEstimator::with_speed_floor(0.5);
        let book = book(
            10,
            vec![checkpoint(0, t0()), checkpoint(0, t0() + Duration::hours(1))],
        );

        let est = estimator.estimate(&book, t0() + Duration::hours(1));
        assert_close(est.speed().unwrap(), 0.5);
        assert_close(est.hours_remaining().unwrap(), 20.0);

        let fallback = CompletionEstimator::with_speed_floor(-1.0);
        let est = fallback.estimate(&book, t0() + Duration::hours(1));
        assert_close(est.speed().unwrap(), SPEED_FLOOR);
    }

    #[test]
    fn test_serializes_with_status_tag() {
        let est = estimate(&book(300, vec![]), t0());
        let json = serde_json::to_value(&est).unwrap();

        assert_eq!(json["status"], "insufficient_data");
        assert_eq!(json["pages_remaining"], 300);
    }
}
