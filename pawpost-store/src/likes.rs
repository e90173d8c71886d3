//! Bookkeeping for optimistic like toggles.
//!
//! Every toggle is numbered from a single counter. An entity's displayed state
//! is its last confirmed state flipped once per toggle that was started after
//! that confirmation and has not settled yet. A failed toggle simply drops out
//! of that count, so a lone failure lands exactly on the pre-toggle snapshot,
//! while a success replaces the confirmed state unless a newer toggle already
//! did.
//!
//! A settled entity is only remembered while some fetch sent before its last
//! toggle is still open, since that fetch's like data must not land.

use derive_where::derive_where;
use pawpost_common::model::{Id, like::LikeState};
use std::collections::HashMap;

/// Handle for one in-flight toggle, returned by [`LikeLedger::begin`].
#[derive_where(Clone, Eq, PartialEq, Debug)]
#[must_use]
pub struct LikeTicket<Marker> {
    id: Id<Marker>,
    seq: u64,
    snapshot: Option<LikeState>,
}

impl<Marker> LikeTicket<Marker> {
    #[must_use]
    pub fn id(&self) -> &Id<Marker> {
        &self.id
    }

    /// The state shown before the toggle, or `None` if the entity was not loaded.
    #[must_use]
    pub fn snapshot(&self) -> Option<LikeState> {
        self.snapshot
    }
}

#[derive(Clone, Debug)]
struct Tracker {
    confirmed: LikeState,
    confirmed_seq: u64,
    pending: Vec<u64>,
    last_started: u64,
}

impl Tracker {
    fn is_settled(&self) -> bool {
        self.pending.is_empty()
    }

    /// A settled tracker only matters to fetches sent before its last toggle.
    fn is_needed(&self, oldest_open: Option<u64>) -> bool {
        !self.is_settled() || oldest_open.is_some_and(|stamp| stamp < self.last_started)
    }

    fn displayed(&self) -> LikeState {
        self.pending
            .iter()
            .filter(|&&seq| seq > self.confirmed_seq)
            .fold(self.confirmed, |state, _| state.toggled())
    }
}

#[derive_where(Debug, Default)]
pub struct LikeLedger<Marker> {
    last_seq: u64,
    /// Toggles numbered up to here were issued before the last [`LikeLedger::clear`].
    cleared_at: u64,
    /// Stamps of fetches that were opened and not closed yet.
    open: Vec<u64>,
    trackers: HashMap<Id<Marker>, Tracker>,
}

impl<Marker> LikeLedger<Marker> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a toggle of `id`, whose currently displayed state is
    /// `current` (`None` if the entity is not loaded). Returns the ticket and
    /// the optimistic state to display.
    pub fn begin(
        &mut self,
        id: &Id<Marker>,
        current: Option<LikeState>,
    ) -> (LikeTicket<Marker>, Option<LikeState>) {
        self.last_seq += 1;
        let seq = self.last_seq;
        let ticket = LikeTicket {
            id: id.clone(),
            seq,
            snapshot: current,
        };

        let Some(current) = current else {
            return (ticket, None);
        };

        let tracker = self.trackers.entry(id.clone()).or_insert(Tracker {
            confirmed: current,
            confirmed_seq: 0,
            pending: Vec::new(),
            last_started: 0,
        });
        // A settled entity may have been overwritten by a fetch since.
        if tracker.is_settled() {
            tracker.confirmed = current;
        }
        tracker.pending.push(seq);
        tracker.last_started = seq;

        (ticket, Some(tracker.displayed()))
    }

    /// Settles a toggle with the backend's answer, `None` meaning it failed.
    ///
    /// Returns the state the entity should now display. For an entity that was
    /// never tracked that is the server state itself, if any.
    pub fn resolve(
        &mut self,
        ticket: LikeTicket<Marker>,
        server: Option<LikeState>,
    ) -> Option<LikeState> {
        if !self.is_current(&ticket) {
            return None;
        }
        let oldest_open = self.oldest_open();
        let Some(tracker) = self.trackers.get_mut(&ticket.id) else {
            return server;
        };

        tracker.pending.retain(|&seq| seq != ticket.seq);
        if let Some(state) = server
            && ticket.seq > tracker.confirmed_seq
        {
            tracker.confirmed = state;
            tracker.confirmed_seq = ticket.seq;
        }

        let shown = tracker.displayed();
        if !tracker.is_needed(oldest_open) {
            self.trackers.remove(&ticket.id);
        }
        Some(shown)
    }

    /// Whether `ticket` was issued since the last [`LikeLedger::clear`].
    #[must_use]
    pub fn is_current(&self, ticket: &LikeTicket<Marker>) -> bool {
        ticket.seq > self.cleared_at
    }

    /// The newest toggle number handed out. Server data requested now is
    /// judged against it by [`LikeLedger::accepts`].
    #[must_use]
    pub fn stamp(&self) -> u64 {
        self.last_seq
    }

    /// Like [`LikeLedger::stamp`], for a fetch that is about to be sent.
    /// Settled entities stay remembered until the fetch is closed.
    pub fn open_fetch(&mut self) -> u64 {
        self.open.push(self.last_seq);
        self.last_seq
    }

    /// Marks the fetch opened at `stamp` as answered and forgets settled
    /// entities no open fetch needs anymore.
    pub fn close_fetch(&mut self, stamp: u64) {
        if let Some(index) = self.open.iter().position(|&open| open == stamp) {
            self.open.swap_remove(index);
        }
        let oldest_open = self.oldest_open();
        self.trackers.retain(|_, tracker| tracker.is_needed(oldest_open));
    }

    #[must_use]
    pub fn tracked(&self) -> usize {
        self.trackers.len()
    }

    fn oldest_open(&self) -> Option<u64> {
        self.open.iter().min().copied()
    }

    /// Whether server data requested at `stamp` may overwrite the like state
    /// of `id`: no toggle of it may be in flight or have started since.
    #[must_use]
    pub fn accepts(&self, id: &Id<Marker>, stamp: u64) -> bool {
        self.trackers
            .get(id)
            .is_none_or(|tracker| tracker.is_settled() && tracker.last_started <= stamp)
    }

    #[must_use]
    pub fn is_pending(&self, id: &Id<Marker>) -> bool {
        self.trackers
            .get(id)
            .is_some_and(|tracker| !tracker.is_settled())
    }

    /// Forgets every tracked entity and open fetch. Toggle numbers keep
    /// counting up, and tickets issued before the reset resolve to nothing.
    pub fn clear(&mut self) {
        self.cleared_at = self.last_seq;
        self.open.clear();
        self.trackers.clear();
    }
}
