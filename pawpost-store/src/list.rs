use crate::likes::{LikeLedger, LikeTicket};
use derive_where::derive_where;
use pawpost_common::model::{
    Id,
    like::{LikeState, Likeable},
    page::Page,
};

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// The last page loaded and whether the server has more after it.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct PageCursor {
    pub page: u32,
    pub has_more: bool,
}

impl PageCursor {
    #[must_use]
    pub fn next_page(self) -> Option<u32> {
        self.page.checked_add(1).filter(|_| self.has_more)
    }
}

impl Default for PageCursor {
    /// Nothing loaded yet, so page 1 is still to come.
    fn default() -> Self {
        Self {
            page: 0,
            has_more: true,
        }
    }
}

/// Read-only copy of a list handed to the view.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ListSnapshot<T> {
    pub items: Vec<T>,
    pub cursor: PageCursor,
    pub status: LoadStatus,
    pub error: Option<String>,
}

impl<T: Likeable> ListSnapshot<T> {
    #[must_use]
    pub fn get(&self, id: &Id<T::Marker>) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }
}

/// Taken when a fetch is sent; the response is judged by it when it lands.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[must_use]
pub struct FetchStamp {
    generation: u64,
    toggles: u64,
}

#[derive(Clone, Debug)]
struct Entry<T> {
    item: T,
    /// Page the item was last seen on; created items count as page 1.
    page: u32,
}

/// An ordered, id-unique list of likeable items loaded page by page.
///
/// Never held across an await: callers lock, mutate and release.
#[derive_where(Debug; T, T::Marker)]
pub struct PagedList<T: Likeable> {
    /// Bumped by [`PagedList::clear`]; fetches sent before that are dropped.
    generation: u64,
    entries: Vec<Entry<T>>,
    cursor: PageCursor,
    status: LoadStatus,
    error: Option<String>,
    likes: LikeLedger<T::Marker>,
}

impl<T: Likeable> Default for PagedList<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            entries: Vec::new(),
            cursor: PageCursor::default(),
            status: LoadStatus::default(),
            error: None,
            likes: LikeLedger::new(),
        }
    }
}

impl<T: Likeable + Clone> PagedList<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn snapshot(&self) -> ListSnapshot<T> {
        ListSnapshot {
            items: self.entries.iter().map(|entry| entry.item.clone()).collect(),
            cursor: self.cursor,
            status: self.status,
            error: self.error.clone(),
        }
    }

    #[must_use]
    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    #[must_use]
    pub fn status(&self) -> LoadStatus {
        self.status
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &Id<T::Marker>) -> Option<&T> {
        self.position(id).map(|index| &self.entries[index].item)
    }

    fn position(&self, id: &Id<T::Marker>) -> Option<usize> {
        self.entries.iter().position(|entry| entry.item.id() == id)
    }

    /// Marks a fetch as started and returns the stamp its response is judged by.
    pub fn begin_fetch(&mut self) -> FetchStamp {
        self.status = LoadStatus::Loading;
        self.error = None;
        self.open_fetch()
    }

    /// Like [`PagedList::begin_fetch`] for a background refetch, which leaves
    /// the status alone.
    pub fn begin_resync(&mut self) -> FetchStamp {
        self.open_fetch()
    }

    fn open_fetch(&mut self) -> FetchStamp {
        FetchStamp {
            generation: self.generation,
            toggles: self.likes.open_fetch(),
        }
    }

    /// Whether the list was cleared since `stamp` was taken.
    #[must_use]
    pub fn is_stale(&self, stamp: FetchStamp) -> bool {
        stamp.generation != self.generation
    }

    fn close_fetch(&mut self, stamp: FetchStamp) {
        self.likes.close_fetch(stamp.toggles);
    }

    /// Applies a fetched page. Page 1 replaces the list; later pages append
    /// new items and update known ones in place. Returns `false`, changing
    /// nothing, if the list was cleared after the fetch was sent.
    pub fn apply_page(&mut self, stamp: FetchStamp, requested: u32, page: Page<T>) -> bool {
        if self.is_stale(stamp) {
            return false;
        }
        let has_more = page.has_more();

        if requested <= 1 {
            let mut previous = std::mem::take(&mut self.entries);
            for item in page.items {
                let item = match previous.iter().position(|entry| entry.item.id() == item.id()) {
                    Some(index) => {
                        let mut kept = previous.swap_remove(index).item;
                        self.merge(&mut kept, item, stamp.toggles);
                        kept
                    }
                    None => item,
                };
                self.insert_or_merge(item, 1, stamp.toggles);
            }
        } else {
            for item in page.items {
                self.insert_or_merge(item, requested, stamp.toggles);
            }
        }

        self.cursor = PageCursor {
            page: requested.max(1),
            has_more,
        };
        self.status = LoadStatus::Loaded;
        self.close_fetch(stamp);
        true
    }

    /// Records a failed fetch; the items stay as they were. Returns `false`
    /// if the list was cleared after the fetch was sent.
    pub fn fail_fetch(&mut self, stamp: FetchStamp, message: String) -> bool {
        if self.is_stale(stamp) {
            return false;
        }
        self.status = LoadStatus::Errored;
        self.error = Some(message);
        self.close_fetch(stamp);
        true
    }

    /// Records a failed background refetch without touching the status.
    pub fn fail_resync(&mut self, stamp: FetchStamp, message: String) -> bool {
        if self.is_stale(stamp) {
            return false;
        }
        self.error = Some(message);
        self.close_fetch(stamp);
        true
    }

    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Refreshes items that are already loaded from a page fetched at
    /// `stamp`. Nothing is added, removed or reordered.
    pub fn absorb(&mut self, stamp: FetchStamp, items: Vec<T>) -> bool {
        if self.is_stale(stamp) {
            return false;
        }
        for item in items {
            if let Some(index) = self.position(item.id()) {
                let mut existing = self.entries[index].item.clone();
                self.merge(&mut existing, item, stamp.toggles);
                self.entries[index].item = existing;
            }
        }
        self.close_fetch(stamp);
        true
    }

    /// Places a freshly created item at the head of the list.
    pub fn prepend(&mut self, item: T) {
        if let Some(index) = self.position(item.id()) {
            self.entries.remove(index);
        }
        self.entries.insert(0, Entry { item, page: 1 });
    }

    /// Swaps in an edited item. Its like state is kept while a toggle is
    /// unsettled. Returns whether the item was loaded.
    pub fn replace(&mut self, item: T) -> bool {
        let stamp = self.likes.stamp();
        let Some(index) = self.position(item.id()) else {
            return false;
        };

        let mut existing = self.entries[index].item.clone();
        self.merge(&mut existing, item, stamp);
        self.entries[index].item = existing;
        true
    }

    pub fn remove(&mut self, id: &Id<T::Marker>) -> Option<T> {
        self.position(id).map(|index| self.entries.remove(index).item)
    }

    /// Flips the displayed like state of `id` optimistically.
    pub fn begin_toggle(&mut self, id: &Id<T::Marker>) -> LikeTicket<T::Marker> {
        let index = self.position(id);
        let current = index.map(|index| self.entries[index].item.like_state());
        let (ticket, shown) = self.likes.begin(id, current);

        if let (Some(index), Some(shown)) = (index, shown) {
            self.entries[index].item.set_like_state(shown);
        }

        ticket
    }

    /// Settles a toggle, `None` meaning it failed. Returns the page to
    /// refetch afterwards: the item's own page, or the current page when the
    /// item is not loaded. `None` if nothing has been loaded at all, or if
    /// the list was cleared while the toggle was in flight.
    pub fn resolve_toggle(
        &mut self,
        ticket: LikeTicket<T::Marker>,
        server: Option<LikeState>,
    ) -> Option<u32> {
        if !self.likes.is_current(&ticket) {
            return None;
        }
        let index = self.position(ticket.id());
        let shown = self.likes.resolve(ticket, server);

        match (index, shown) {
            (Some(index), Some(shown)) => {
                self.entries[index].item.set_like_state(shown);
                Some(self.entries[index].page)
            }
            (Some(index), None) => Some(self.entries[index].page),
            (None, _) => (self.cursor.page > 0).then_some(self.cursor.page),
        }
    }

    #[must_use]
    pub fn is_like_pending(&self, id: &Id<T::Marker>) -> bool {
        self.likes.is_pending(id)
    }

    /// Back to the initial state: empty, idle, nothing tracked. Responses to
    /// fetches and toggles sent before this are dropped.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.entries.clear();
        self.cursor = PageCursor::default();
        self.status = LoadStatus::Idle;
        self.error = None;
        self.likes.clear();
    }

    fn insert_or_merge(&mut self, item: T, page: u32, stamp: u64) {
        match self.position(item.id()) {
            Some(index) => {
                let mut existing = self.entries[index].item.clone();
                self.merge(&mut existing, item, stamp);
                self.entries[index] = Entry {
                    item: existing,
                    page,
                };
            }
            None => self.entries.push(Entry { item, page }),
        }
    }

    /// Overwrites `existing` with `incoming`, keeping the local like state
    /// when the server data may be older than a toggle.
    fn merge(&self, existing: &mut T, incoming: T, stamp: u64) {
        let accepted = self.likes.accepts(incoming.id(), stamp);
        let local = existing.like_state();
        *existing = incoming;
        if !accepted {
            existing.set_like_state(local);
        }
    }
}
