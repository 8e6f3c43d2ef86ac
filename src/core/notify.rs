//! Translation of allocation outcomes into notices.
//!
//! Notices of one outcome follow the order in which the engine applied the
//! changes: promotions that preceded a placement, the team's own change, then
//! the promotions it caused.

use crate::allocation::{Admission, Allocator, Promotion, Removal, Resize};
use crate::notices::{Notice, NoticeKind};

pub(super) fn admission(a: &Admission, alloc: &Allocator) -> Vec<Notice> {
    let mut out = promotions(&a.promoted, alloc);
    if a.admitted > 0 {
        out.push(
            Notice::new(NoticeKind::TeamAdmitted)
                .with_team(a.team.as_str())
                .with_seats(a.admitted)
                .with_pending(a.pending)
                .with_usage(alloc.used_seats(), alloc.capacity()),
        );
    }
    if a.waitlisted > 0 {
        out.push(waitlisted(a));
    }
    out
}

pub(super) fn promotions(promotions: &[Promotion], alloc: &Allocator) -> Vec<Notice> {
    promotions
        .iter()
        .map(|p| {
            Notice::new(NoticeKind::TeamPromoted)
                .with_team(p.team.as_str())
                .with_seats(p.moved)
                .with_pending(p.remaining)
                .with_usage(alloc.used_seats(), alloc.capacity())
        })
        .collect()
}

pub(super) fn removal(r: &Removal, requester: Option<&str>, alloc: &Allocator) -> Vec<Notice> {
    let mut removed = Notice::new(NoticeKind::TeamRemoved)
        .with_team(r.team.as_str())
        .with_seats(r.freed_registered)
        .with_pending(r.dropped_pending);
    if let Some(requester) = requester {
        removed = removed.with_requester(requester);
    }
    let mut out = vec![removed];
    out.extend(promotions(&r.promotions, alloc));
    out
}

pub(super) fn resize(outcome: &Resize, alloc: &Allocator) -> Vec<Notice> {
    match outcome {
        Resize::Unchanged { .. } => Vec::new(),
        Resize::Removed(r) => removal(r, None, alloc),
        Resize::Grown(a) => {
            let mut out = promotions(&a.promoted, alloc);
            out.push(resized(a.team.as_str(), a.registered + a.pending, a.pending, "grown"));
            if a.waitlisted > 0 {
                out.push(waitlisted(a));
            }
            out
        }
        Resize::Shrunk {
            team,
            registered,
            pending,
            promotions: promoted,
            ..
        } => {
            let mut out = vec![resized(team.as_str(), registered + pending, *pending, "shrunk")];
            out.extend(promotions(promoted, alloc));
            out
        }
        Resize::Requeued { team, to, .. } => vec![resized(team.as_str(), *to, *to, "requeued")],
    }
}

fn resized(team: &str, size: u32, pending: u32, how: &'static str) -> Notice {
    Notice::new(NoticeKind::TeamResized)
        .with_team(team)
        .with_seats(size)
        .with_pending(pending)
        .with_reason(how)
}

fn waitlisted(a: &Admission) -> Notice {
    Notice::new(NoticeKind::TeamWaitlisted)
        .with_team(a.team.as_str())
        .with_seats(a.waitlisted)
        .with_pending(a.pending)
        .with_position(a.position)
}
