use crate::model::ResetEvent;

/// Observer of history trims.
///
/// Implemented for any `FnMut(&ResetEvent<K>)` closure, so most callers just pass one to
/// [`Selector::on_reset`](crate::Selector::on_reset).
pub trait ResetListener<K>: Send {
    fn on_reset(&mut self, event: &ResetEvent<K>);
}

impl<K, F> ResetListener<K> for F
where
    F: FnMut(&ResetEvent<K>) + Send,
{
    fn on_reset(&mut self, event: &ResetEvent<K>) {
        self(event)
    }
}

/// Handle returned on registration, used to remove the listener again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Ordered set of reset listeners, notified synchronously in registration order
pub struct Listeners<K> {
    next_id: u64,
    entries: Vec<(ListenerId, Box<dyn ResetListener<K>>)>,
}

impl<K> Listeners<K> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, listener: Box<dyn ResetListener<K>>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Returns false when the id was never registered or was already removed.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn notify(&mut self, event: &ResetEvent<K>) {
        for (_, listener) in self.entries.iter_mut() {
            listener.on_reset(event);
        }
    }
}

impl<K> Default for Listeners<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> std::fmt::Debug for Listeners<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}
