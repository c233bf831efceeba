// ── Operation lifecycle records ──
//
// One record per operation kind. A new invocation overwrites the record of
// its kind; there is no queue and no per-call history.

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::IntoEnumIterator;
use tokio::sync::watch;
use tracing::debug;

/// The store operations that carry a lifecycle record.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum OperationKind {
    List,
    FetchOne,
    Update,
    Delete,
    Create,
}

impl OperationKind {
    pub(crate) const COUNT: usize = 5;

    /// Slot of this kind in [`Lifecycles`].
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::List => 0,
            Self::FetchOne => 1,
            Self::Update => 2,
            Self::Delete => 3,
            Self::Create => 4,
        }
    }
}

/// Coarse state derived from a [`Lifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Idle,
    Pending,
    Failed,
}

/// State of the most recent invocation of one operation kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lifecycle {
    pub in_flight: bool,
    /// Display string of the last failure. Cleared when a new call starts.
    pub error: Option<String>,
    /// When the last call settled (success or failure).
    pub settled_at: Option<DateTime<Utc>>,
}

impl Lifecycle {
    pub fn phase(&self) -> Phase {
        if self.in_flight {
            Phase::Pending
        } else if self.error.is_some() {
            Phase::Failed
        } else {
            Phase::Idle
        }
    }
}

/// All lifecycle records, one `watch` channel per kind.
pub(crate) struct Lifecycles {
    /// Indexed by [`OperationKind::index`].
    records: [watch::Sender<Lifecycle>; OperationKind::COUNT],
}

impl Lifecycles {
    pub(crate) fn new() -> Self {
        let records = std::array::from_fn(|_| watch::channel(Lifecycle::default()).0);
        Self { records }
    }

    fn sender(&self, kind: OperationKind) -> &watch::Sender<Lifecycle> {
        &self.records[kind.index()]
    }

    pub(crate) fn get(&self, kind: OperationKind) -> Lifecycle {
        self.sender(kind).borrow().clone()
    }

    pub(crate) fn subscribe(&self, kind: OperationKind) -> watch::Receiver<Lifecycle> {
        self.sender(kind).subscribe()
    }

    /// idle/failed → pending.
    pub(crate) fn begin(&self, kind: OperationKind) {
        debug!(operation = %kind, "pending");
        self.sender(kind).send_replace(Lifecycle {
            in_flight: true,
            error: None,
            settled_at: None,
        });
    }

    /// pending → idle.
    pub(crate) fn succeed(&self, kind: OperationKind) {
        debug!(operation = %kind, "succeeded");
        self.sender(kind).send_replace(Lifecycle {
            in_flight: false,
            error: None,
            settled_at: Some(Utc::now()),
        });
    }

    /// Any state → failed. Also used for precondition failures, which
    /// never pass through pending.
    pub(crate) fn fail(&self, kind: OperationKind, error: String) {
        debug!(operation = %kind, %error, "failed");
        self.sender(kind).send_replace(Lifecycle {
            in_flight: false,
            error: Some(error),
            settled_at: Some(Utc::now()),
        });
    }

    pub(crate) fn clear_error(&self, kind: OperationKind) {
        self.sender(kind).send_if_modified(|rec| rec.error.take().is_some());
    }

    pub(crate) fn clear_all_errors(&self) {
        for kind in OperationKind::iter() {
            self.clear_error(kind);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn kinds_display_in_camel_case() {
        assert_eq!(OperationKind::List.to_string(), "list");
        assert_eq!(OperationKind::FetchOne.to_string(), "fetchOne");
        assert_eq!(OperationKind::FetchOne.as_ref(), "fetchOne");
        assert_eq!(OperationKind::iter().count(), 5);
    }

    #[test]
    fn every_kind_has_its_own_slot() {
        let mut slots: Vec<usize> = OperationKind::iter().map(OperationKind::index).collect();
        assert_eq!(slots.len(), OperationKind::COUNT);
        assert!(slots.iter().all(|&i| i < OperationKind::COUNT));
        slots.sort_unstable();
        slots.dedup();
        assert_eq!(slots.len(), OperationKind::COUNT);
    }

    #[test]
    fn record_walks_through_phases() {
        let lc = Lifecycles::new();
        assert_eq!(lc.get(OperationKind::Update).phase(), Phase::Idle);

        lc.begin(OperationKind::Update);
        assert_eq!(lc.get(OperationKind::Update).phase(), Phase::Pending);

        lc.fail(OperationKind::Update, "HTTP 500".into());
        let rec = lc.get(OperationKind::Update);
        assert_eq!(rec.phase(), Phase::Failed);
        assert_eq!(rec.error.as_deref(), Some("HTTP 500"));
        assert!(rec.settled_at.is_some());

        lc.begin(OperationKind::Update);
        assert!(lc.get(OperationKind::Update).error.is_none());

        lc.succeed(OperationKind::Update);
        assert_eq!(lc.get(OperationKind::Update).phase(), Phase::Idle);
    }

    #[test]
    fn kinds_are_independent() {
        let lc = Lifecycles::new();
        lc.begin(OperationKind::List);
        lc.fail(OperationKind::Delete, "nope".into());
        assert!(lc.get(OperationKind::List).in_flight);
        assert!(!lc.get(OperationKind::Delete).in_flight);
        assert_eq!(lc.get(OperationKind::FetchOne), Lifecycle::default());
    }

    #[test]
    fn clear_errors_keeps_in_flight() {
        let lc = Lifecycles::new();
        lc.fail(OperationKind::List, "a".into());
        lc.fail(OperationKind::FetchOne, "b".into());
        lc.begin(OperationKind::Create);

        lc.clear_all_errors();
        for kind in OperationKind::iter() {
            assert!(lc.get(kind).error.is_none());
        }
        assert!(lc.get(OperationKind::Create).in_flight);
    }

    #[test]
    fn subscribers_observe_transitions() {
        let lc = Lifecycles::new();
        let mut rx = lc.subscribe(OperationKind::List);
        lc.begin(OperationKind::List);
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().in_flight);
    }
}
