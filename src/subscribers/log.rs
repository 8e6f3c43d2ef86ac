//! # Logging subscriber.
//!
//! [`LogWriter`] turns every notice into one `tracing` event under the
//! `seatvisor::notice` target. Seat movements log at `info`, delivery and
//! snapshot problems at `warn`/`error`.
//!
//! ## Output (fmt subscriber)
//! ```text
//! INFO seatvisor::notice: team admitted team="Beta" seats=4 pending=5 used=60 capacity=60
//! INFO seatvisor::notice: team waitlisted team="Beta" seats=5 position=1
//! INFO seatvisor::notice: team promoted team="Beta" seats=5 pending=0 used=9 capacity=60
//! ERROR seatvisor::notice: snapshot failed revision=7 reason="disk full"
//! ```

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::notices::{Notice, NoticeKind};
use crate::subscribers::Subscribe;

const TARGET: &str = "seatvisor::notice";

/// Subscriber that logs notices through `tracing`.
///
/// Enabled via the `logging` feature.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_notice(&self, n: &Notice) {
        let team = n.team.as_deref().unwrap_or("-");
        match n.kind {
            NoticeKind::TeamAdmitted | NoticeKind::TeamPromoted => info!(
                target: TARGET,
                team,
                seats = n.seats,
                pending = n.pending,
                used = n.used,
                capacity = n.capacity,
                "{}",
                describe(n.kind)
            ),
            NoticeKind::TeamWaitlisted => info!(
                target: TARGET,
                team,
                seats = n.seats,
                position = n.position,
                "team waitlisted"
            ),
            NoticeKind::TeamResized | NoticeKind::TeamRemoved => info!(
                target: TARGET,
                team,
                seats = n.seats,
                pending = n.pending,
                requester = n.requester.as_deref(),
                reason = n.reason.as_deref(),
                "{}",
                describe(n.kind)
            ),
            NoticeKind::AssignmentReleased => info!(
                target: TARGET,
                team,
                requester = n.requester.as_deref(),
                "assignment released"
            ),
            NoticeKind::SnapshotFailed => error!(
                target: TARGET,
                revision = n.revision,
                reason = n.reason.as_deref(),
                "snapshot failed"
            ),
            NoticeKind::SubscriberOverflow | NoticeKind::SubscriberPanicked => warn!(
                target: TARGET,
                subscriber = n.subscriber,
                reason = n.reason.as_deref(),
                "{}",
                describe(n.kind)
            ),
            _ => info!(
                target: TARGET,
                seats = n.seats,
                capacity = n.capacity,
                reason = n.reason.as_deref(),
                "{}",
                describe(n.kind)
            ),
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

fn describe(kind: NoticeKind) -> &'static str {
    match kind {
        NoticeKind::TeamAdmitted => "team admitted",
        NoticeKind::TeamWaitlisted => "team waitlisted",
        NoticeKind::TeamPromoted => "team promoted",
        NoticeKind::TeamResized => "team resized",
        NoticeKind::TeamRemoved => "team removed",
        NoticeKind::CapacityExpanded => "capacity expanded",
        NoticeKind::CapacityClamped => "capacity clamped",
        NoticeKind::RegistrationClosed => "registration closed",
        NoticeKind::RegistrationOpened => "registration opened",
        NoticeKind::TeamSizeLimitChanged => "team size limit changed",
        NoticeKind::EventCreated => "event created",
        NoticeKind::EventDeleted => "event deleted",
        NoticeKind::EventExpired => "event expired",
        NoticeKind::AssignmentReleased => "assignment released",
        NoticeKind::SnapshotFailed => "snapshot failed",
        NoticeKind::SubscriberPanicked => "subscriber panicked",
        NoticeKind::SubscriberOverflow => "subscriber overflow",
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Shared buffer the fmt layer writes into.
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn lines(&self) -> Vec<String> {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8(bytes)
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    async fn log_all(notices: &[Notice]) -> Vec<String> {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        for n in notices {
            LogWriter.on_notice(n).await;
        }
        capture.lines()
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_admission_logs_at_info_with_usage() {
        let admitted = Notice::new(NoticeKind::TeamAdmitted)
            .with_team("Beta")
            .with_seats(4)
            .with_pending(5)
            .with_usage(60, 60);

        let lines = log_all(&[admitted]).await;
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert!(line.trim_start().starts_with("INFO seatvisor::notice: team admitted"), "{line}");
        for field in ["team=\"Beta\"", "seats=4", "pending=5", "used=60", "capacity=60"] {
            assert!(line.contains(field), "missing {field}: {line}");
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_snapshot_failure_logs_at_error() {
        let failed = Notice::new(NoticeKind::SnapshotFailed)
            .with_revision(7)
            .with_reason("disk full");
        let overflow = Notice::subscriber_overflow("mailer", "full");

        let lines = log_all(&[failed, overflow]).await;
        assert_eq!(lines.len(), 2);
        assert!(lines[0].trim_start().starts_with("ERROR seatvisor::notice: snapshot failed"), "{}", lines[0]);
        assert!(lines[0].contains("revision=7"), "{}", lines[0]);
        assert!(lines[0].contains("reason=\"disk full\""), "{}", lines[0]);
        assert!(lines[1].trim_start().starts_with("WARN seatvisor::notice: subscriber overflow"), "{}", lines[1]);
        assert!(lines[1].contains("subscriber=\"mailer\""), "{}", lines[1]);
    }

    #[test]
    fn test_every_kind_has_a_description() {
        assert_eq!(describe(NoticeKind::CapacityClamped), "capacity clamped");
        assert_eq!(describe(NoticeKind::EventExpired), "event expired");
    }
}
