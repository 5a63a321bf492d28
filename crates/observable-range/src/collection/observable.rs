//! The ranged observable collection.

use std::fmt;
use std::iter::FromIterator;
use std::sync::atomic::{AtomicBool, Ordering};

use observable_range_core::logging::span_names;
use observable_range_core::{Signal, Stopwatch};
use parking_lot::RwLock;

use super::change::{CollectionChanged, CollectionProperty};
use super::config::{CollectionBuilder, CollectionConfig, EmptyRangePolicy};
use super::error::{CollectionError, CollectionResult};
use super::storage::Storage;

/// Signals emitted by an [`ObservableCollection`].
///
/// For every structural change the collection emits, in order:
/// `property_changed(Count)`, `property_changed(Indexer)`, then one
/// `collection_changed`.
pub struct CollectionSignals<T> {
    /// Emitted once per completed mutation.
    pub collection_changed: Signal<CollectionChanged<T>>,
    /// Emitted for the count and indexer companion properties.
    pub property_changed: Signal<CollectionProperty>,
}

impl<T: 'static> CollectionSignals<T> {
    /// Creates a new set of collection signals.
    pub fn new() -> Self {
        Self {
            collection_changed: Signal::new(),
            property_changed: Signal::new(),
        }
    }
}

impl<T: 'static> Default for CollectionSignals<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a collection is currently delivering a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// No notification is being delivered; mutations are allowed.
    Idle,
    /// Observers are running; mutations fail with `ReentrancyViolation`.
    DispatchingNotification,
}

/// Holds the dispatch flag set and restores its previous value when dropped,
/// including by unwinding.
struct DispatchGuard<'a> {
    flag: &'a AtomicBool,
    previous: bool,
}

impl<'a> DispatchGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        let previous = flag.swap(true, Ordering::SeqCst);
        Self { flag, previous }
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(self.previous, Ordering::SeqCst);
    }
}

/// An ordered collection that reports each bulk mutation with a single
/// change notification.
///
/// Observers connect to [`signals()`](Self::signals). Notifications are
/// delivered synchronously on the mutating thread before the mutating call
/// returns. An observer may read the collection while it is notified, but
/// any mutation attempted from inside a notification fails with
/// [`CollectionError::ReentrancyViolation`].
///
/// # Example
///
/// ```
/// use observable_range::collection::{ChangeKind, ObservableCollection};
/// use std::sync::{Arc, Mutex};
///
/// let names = ObservableCollection::from_vec(vec!["jim", "rob"]);
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let recv = seen.clone();
/// names.signals().collection_changed.connect(move |change| {
///     recv.lock().unwrap().push((change.kind(), change.new_starting_index()));
/// });
///
/// names.add_range(["ralph", "paula"]).unwrap();
///
/// assert_eq!(*seen.lock().unwrap(), vec![(ChangeKind::Add, Some(2))]);
/// assert_eq!(names.to_vec(), vec!["jim", "rob", "ralph", "paula"]);
/// ```
pub struct ObservableCollection<T, S = Vec<T>> {
    items: RwLock<S>,
    signals: CollectionSignals<T>,
    dispatching: AtomicBool,
    config: CollectionConfig,
}

impl<T: Clone + 'static> ObservableCollection<T> {
    /// Creates an empty collection backed by a `Vec`.
    pub fn new() -> Self {
        Self::with_storage(Vec::new())
    }

    /// Creates a collection holding `items`. No notification is emitted.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self::with_storage(items)
    }

    /// Returns a builder for a `Vec`-backed collection.
    pub fn builder() -> CollectionBuilder<T> {
        CollectionBuilder::new()
    }
}

impl<T: Clone + 'static> Default for ObservableCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> FromIterator<T> for ObservableCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T, S> ObservableCollection<T, S>
where
    T: Clone + 'static,
    S: Storage<T>,
{
    /// Creates a collection over existing storage with default configuration.
    pub fn with_storage(storage: S) -> Self {
        Self::with_config(storage, CollectionConfig::default())
    }

    /// Creates a collection over existing storage.
    pub fn with_config(storage: S, config: CollectionConfig) -> Self {
        Self {
            items: RwLock::new(storage),
            signals: CollectionSignals::new(),
            dispatching: AtomicBool::new(false),
            config,
        }
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    /// Returns the collection's signals.
    pub fn signals(&self) -> &CollectionSignals<T> {
        &self.signals
    }

    /// Returns the collection's configuration.
    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    /// Returns whether a notification is currently being delivered.
    pub fn state(&self) -> DispatchState {
        if self.dispatching.load(Ordering::SeqCst) {
            DispatchState::DispatchingNotification
        } else {
            DispatchState::Idle
        }
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns `true` if the collection holds no elements.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Returns a clone of the element at `index`.
    pub fn get(&self, index: usize) -> Option<T> {
        self.items.read().get(index).cloned()
    }

    /// Returns a clone of every element, in order.
    pub fn to_vec(&self) -> Vec<T> {
        let items = self.items.read();
        (0..items.len()).filter_map(|i| items.get(i).cloned()).collect()
    }

    /// Runs `f` with read access to the underlying storage.
    ///
    /// The collection reports [`DispatchState::DispatchingNotification`] while
    /// `f` runs, so a mutation attempted from inside `f` fails with
    /// [`CollectionError::ReentrancyViolation`] instead of waiting on the
    /// read lock `f` is holding.
    pub fn with_items<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        let items = self.items.read();
        let _reading = DispatchGuard::enter(&self.dispatching);
        f(&items)
    }

    // -------------------------------------------------------------------------
    // Single-element mutations
    // -------------------------------------------------------------------------

    /// Appends one element.
    ///
    /// Emits `Add` with the element and the previous length as starting index.
    #[tracing::instrument(skip_all, target = "observable_range::collection", level = "trace")]
    pub fn add(&self, item: T) -> CollectionResult<()> {
        self.check_reentrancy("add")?;
        let index = {
            let mut items = self.items.write();
            let index = items.len();
            items.insert(index, item.clone());
            index
        };
        self.trace_mutation("add", index, 1);
        self.notify(CollectionChanged::added(vec![item], index));
        Ok(())
    }

    /// Inserts one element at `index` (`0..=len`).
    #[tracing::instrument(skip_all, target = "observable_range::collection", level = "trace")]
    pub fn insert(&self, index: usize, item: T) -> CollectionResult<()> {
        self.check_reentrancy("insert")?;
        {
            let mut items = self.items.write();
            Self::check_index(index, items.len())?;
            items.insert(index, item.clone());
        }
        self.trace_mutation("insert", index, 1);
        self.notify(CollectionChanged::added(vec![item], index));
        Ok(())
    }

    /// Removes and returns the element at `index` (`0..len`).
    #[tracing::instrument(skip_all, target = "observable_range::collection", level = "trace")]
    pub fn remove_at(&self, index: usize) -> CollectionResult<T> {
        self.check_reentrancy("remove_at")?;
        let removed = {
            let mut items = self.items.write();
            let len = items.len();
            if index >= len {
                return Err(CollectionError::IndexOutOfRange {
                    name: "index",
                    value: index,
                    len,
                });
            }
            items.remove(index)
        };
        self.trace_mutation("remove_at", index, 1);
        self.notify(CollectionChanged::removed(vec![removed.clone()], Some(index)));
        Ok(removed)
    }

    /// Replaces the element at `index`, returning the previous one.
    ///
    /// Emits `Replace` with both elements at `index`.
    #[tracing::instrument(skip_all, target = "observable_range::collection", level = "trace")]
    pub fn set(&self, index: usize, item: T) -> CollectionResult<T> {
        self.check_reentrancy("set")?;
        let old = {
            let mut items = self.items.write();
            let len = items.len();
            if index >= len {
                return Err(CollectionError::IndexOutOfRange {
                    name: "index",
                    value: index,
                    len,
                });
            }
            items.replace(index, item.clone())
        };
        self.trace_mutation("set", index, 1);
        self.notify(CollectionChanged::replaced(
            vec![item],
            vec![old.clone()],
            Some(index),
        ));
        Ok(old)
    }

    /// Removes every element and emits `Reset`.
    #[tracing::instrument(skip_all, target = "observable_range::collection", level = "trace")]
    pub fn clear(&self) -> CollectionResult<()> {
        self.check_reentrancy("clear")?;
        let count = {
            let mut items = self.items.write();
            let count = items.len();
            items.clear();
            count
        };
        self.trace_mutation("clear", 0, count);
        self.notify(CollectionChanged::reset());
        Ok(())
    }

    /// Re-emits the count, indexer and `Reset` notifications without
    /// changing anything, forcing observers to re-read the collection.
    #[tracing::instrument(skip_all, target = "observable_range::collection", level = "trace")]
    pub fn refresh(&self) -> CollectionResult<()> {
        self.check_reentrancy("refresh")?;
        self.notify(CollectionChanged::reset());
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Ranged mutations
    // -------------------------------------------------------------------------

    /// Appends `items` and emits one `Add` notification.
    ///
    /// `items` is evaluated exactly once, before the collection changes; the
    /// notification carries that snapshot with the previous length as its
    /// starting index.
    #[tracing::instrument(skip_all, target = "observable_range::collection", level = "trace")]
    pub fn add_range<I>(&self, items: I) -> CollectionResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        let snapshot: Vec<T> = items.into_iter().collect();
        self.check_reentrancy("add_range")?;

        let index = {
            let mut items = self.items.write();
            let index = items.len();
            if self.suppress_empty("add_range", &snapshot) {
                return Ok(());
            }
            items.insert_many(index, snapshot.clone());
            index
        };
        self.trace_mutation("add_range", index, snapshot.len());
        self.notify(CollectionChanged::added(snapshot, index));
        Ok(())
    }

    /// [`add_range`](Self::add_range) for callers holding an optional
    /// sequence. `None` fails with `InvalidArgument` and changes nothing.
    pub fn add_range_nullable<I>(&self, items: Option<I>) -> CollectionResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.add_range(Self::require(items)?)
    }

    /// Inserts `items` starting at `index` (`0..=len`) and emits one `Add`
    /// notification whose starting index is `index`.
    #[tracing::instrument(skip_all, target = "observable_range::collection", level = "trace")]
    pub fn insert_range<I>(&self, index: usize, items: I) -> CollectionResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        let snapshot: Vec<T> = items.into_iter().collect();
        self.check_reentrancy("insert_range")?;

        {
            let mut items = self.items.write();
            Self::check_index(index, items.len())?;
            if self.suppress_empty("insert_range", &snapshot) {
                return Ok(());
            }
            items.insert_many(index, snapshot.clone());
        }
        self.trace_mutation("insert_range", index, snapshot.len());
        self.notify(CollectionChanged::added(snapshot, index));
        Ok(())
    }

    /// [`insert_range`](Self::insert_range) for callers holding an optional
    /// sequence. `None` fails with `InvalidArgument` and changes nothing.
    pub fn insert_range_nullable<I>(&self, index: usize, items: Option<I>) -> CollectionResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.insert_range(index, Self::require(items)?)
    }

    /// Removes `count` elements starting at `index` and inserts `items` in
    /// their place, emitting one `Replace` notification.
    ///
    /// The notification's `old_items` are exactly the `count` removed
    /// elements in their original order.
    #[tracing::instrument(skip_all, target = "observable_range::collection", level = "trace")]
    pub fn replace_range<I>(&self, index: usize, count: usize, items: I) -> CollectionResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        let snapshot: Vec<T> = items.into_iter().collect();
        self.check_reentrancy("replace_range")?;

        let old_items = {
            let mut items = self.items.write();
            let len = items.len();
            Self::check_index(index, len)?;
            if index.checked_add(count).is_none_or(|end| end > len) {
                return Err(CollectionError::IndexOutOfRange {
                    name: "count",
                    value: count,
                    len,
                });
            }
            let old_items = items.drain_range(index, count);
            items.insert_many(index, snapshot.clone());
            old_items
        };
        self.trace_mutation("replace_range", index, snapshot.len());
        self.notify(CollectionChanged::replaced(snapshot, old_items, Some(index)));
        Ok(())
    }

    /// [`replace_range`](Self::replace_range) for callers holding an optional
    /// sequence. `None` fails with `InvalidArgument` and changes nothing.
    pub fn replace_range_nullable<I>(
        &self,
        index: usize,
        count: usize,
        items: Option<I>,
    ) -> CollectionResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.replace_range(index, count, Self::require(items)?)
    }

    /// Makes the contents equal to `items`.
    ///
    /// An empty `items` clears the collection and emits `Reset`. Otherwise
    /// one `Replace` is emitted with the previous contents as `old_items`
    /// and no starting index. If an observer panics while that `Replace` is
    /// delivered, the failure is logged and a `Reset` is delivered to every
    /// observer instead; the call still succeeds.
    #[tracing::instrument(skip_all, target = "observable_range::collection", level = "trace")]
    pub fn assume_range<I>(&self, items: I) -> CollectionResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        let snapshot: Vec<T> = items.into_iter().collect();
        self.check_reentrancy("assume_range")?;

        if snapshot.is_empty() {
            let count = {
                let mut items = self.items.write();
                let count = items.len();
                items.clear();
                count
            };
            self.trace_mutation("assume_range", 0, count);
            self.notify(CollectionChanged::reset());
            return Ok(());
        }

        let old_items = {
            let mut items = self.items.write();
            let len = items.len();
            let old_items = items.drain_range(0, len);
            items.insert_many(0, snapshot.clone());
            old_items
        };
        self.trace_mutation("assume_range", 0, snapshot.len());
        self.notify_replace_or_reset(CollectionChanged::replaced(snapshot, old_items, None));
        Ok(())
    }

    /// [`assume_range`](Self::assume_range) for callers holding an optional
    /// sequence. `None` clears the collection and emits `Reset`.
    pub fn assume_range_nullable<I>(&self, items: Option<I>) -> CollectionResult<()>
    where
        I: IntoIterator<Item = T>,
    {
        match items {
            Some(items) => self.assume_range(items),
            None => self.assume_range(std::iter::empty()),
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn name(&self) -> &str {
        self.config.name.as_deref().unwrap_or("")
    }

    fn require<I>(items: Option<I>) -> CollectionResult<I> {
        items.ok_or(CollectionError::InvalidArgument { name: "items" })
    }

    fn check_index(index: usize, len: usize) -> CollectionResult<()> {
        if index > len {
            return Err(CollectionError::IndexOutOfRange {
                name: "index",
                value: index,
                len,
            });
        }
        Ok(())
    }

    fn check_reentrancy(&self, operation: &'static str) -> CollectionResult<()> {
        if self.dispatching.load(Ordering::SeqCst) {
            tracing::warn!(
                target: "observable_range::collection",
                collection = self.name(),
                operation,
                "mutation attempted during change notification"
            );
            return Err(CollectionError::ReentrancyViolation);
        }
        Ok(())
    }

    fn suppress_empty(&self, operation: &'static str, snapshot: &[T]) -> bool {
        let suppress =
            snapshot.is_empty() && self.config.empty_range_policy == EmptyRangePolicy::Suppress;
        if suppress {
            tracing::debug!(
                target: "observable_range::collection",
                collection = self.name(),
                operation,
                "empty range suppressed"
            );
        }
        suppress
    }

    fn trace_mutation(&self, operation: &'static str, index: usize, count: usize) {
        tracing::trace!(
            target: "observable_range::collection",
            collection = self.name(),
            operation,
            index,
            count,
            "collection mutated"
        );
    }

    fn notify_properties(&self) {
        self.signals
            .property_changed
            .emit(CollectionProperty::Count);
        self.signals
            .property_changed
            .emit(CollectionProperty::Indexer);
    }

    /// Delivers the companion property signals followed by `change`.
    fn notify(&self, change: CollectionChanged<T>) {
        self.dispatch(change, |signal, change| signal.emit(change));
    }

    /// Delivers `change`; if an observer panics, logs the failure and
    /// delivers `Reset` to every observer.
    fn notify_replace_or_reset(&self, change: CollectionChanged<T>) {
        self.dispatch(change, |signal, change| {
            let Err(err) = signal.try_emit(change) else {
                return;
            };
            tracing::error!(
                target: "observable_range::collection",
                collection = self.name(),
                error = %err,
                "replace notification failed, delivering reset"
            );
            signal.emit(CollectionChanged::reset());
        });
    }

    /// Runs a timed delivery inside the dispatch span with the flag held.
    fn dispatch<F>(&self, change: CollectionChanged<T>, deliver: F)
    where
        F: FnOnce(&Signal<CollectionChanged<T>>, CollectionChanged<T>),
    {
        let watch = Stopwatch::start();
        let kind = change.kind();
        let _span = tracing::trace_span!(span_names::DISPATCH, %kind).entered();
        {
            let _dispatch = DispatchGuard::enter(&self.dispatching);
            self.notify_properties();
            deliver(&self.signals.collection_changed, change);
        }
        watch.finish("dispatch");
    }
}

impl<T: PartialEq + Clone + 'static, S: Storage<T>> ObservableCollection<T, S> {
    /// Returns the position of the first element equal to `item`.
    pub fn index_of(&self, item: &T) -> Option<usize> {
        Self::position(&self.items.read(), item)
    }

    /// Returns `true` if an element equal to `item` is present.
    pub fn contains(&self, item: &T) -> bool {
        self.index_of(item).is_some()
    }

    /// Removes the first element equal to `item`.
    ///
    /// Returns `false`, without notifying, if no element matched.
    #[tracing::instrument(skip_all, target = "observable_range::collection", level = "trace")]
    pub fn remove(&self, item: &T) -> CollectionResult<bool> {
        self.check_reentrancy("remove")?;
        let removed = {
            let mut items = self.items.write();
            Self::position(&items, item).map(|index| (index, items.remove(index)))
        };
        let Some((index, removed)) = removed else {
            return Ok(false);
        };
        self.trace_mutation("remove", index, 1);
        self.notify(CollectionChanged::removed(vec![removed], Some(index)));
        Ok(true)
    }

    /// Removes the first occurrence of each element of `items` that is
    /// present and emits one `Remove` notification listing what was removed.
    ///
    /// The removed elements need not be contiguous, so the notification has
    /// no starting index. Nothing is emitted when nothing matched. Returns the
    /// number of elements removed.
    #[tracing::instrument(skip_all, target = "observable_range::collection", level = "trace")]
    pub fn remove_range<I>(&self, items: I) -> CollectionResult<usize>
    where
        I: IntoIterator<Item = T>,
    {
        let snapshot: Vec<T> = items.into_iter().collect();
        self.check_reentrancy("remove_range")?;

        let removed: Vec<T> = {
            let mut items = self.items.write();
            snapshot
                .iter()
                .filter_map(|item| Self::position(&items, item).map(|index| items.remove(index)))
                .collect()
        };
        if removed.is_empty() {
            return Ok(0);
        }
        let count = removed.len();
        self.trace_mutation("remove_range", 0, count);
        self.notify(CollectionChanged::removed(removed, None));
        Ok(count)
    }

    /// [`remove_range`](Self::remove_range) for callers holding an optional
    /// sequence. `None` fails with `InvalidArgument` and changes nothing.
    pub fn remove_range_nullable<I>(&self, items: Option<I>) -> CollectionResult<usize>
    where
        I: IntoIterator<Item = T>,
    {
        self.remove_range(Self::require(items)?)
    }

    fn position(items: &S, item: &T) -> Option<usize> {
        (0..items.len()).find(|&i| items.get(i) == Some(item))
    }
}

impl<T, S> fmt::Debug for ObservableCollection<T, S>
where
    T: Clone + fmt::Debug + 'static,
    S: Storage<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableCollection")
            .field("name", &self.config.name)
            .field("items", &self.to_vec())
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::ChangeKind;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;

    type Log<T> = Arc<Mutex<Vec<CollectionChanged<T>>>>;

    fn record<T: Clone + Send + Sync + 'static, S: Storage<T>>(
        collection: &ObservableCollection<T, S>,
    ) -> Log<T> {
        let log: Log<T> = Arc::new(Mutex::new(Vec::new()));
        let recv = log.clone();
        collection
            .signals()
            .collection_changed
            .connect(move |change| recv.lock().push(change.clone()));
        log
    }

    #[test]
    fn test_add_single() {
        let collection = ObservableCollection::from_vec(vec!["test1"]);
        let log = record(&collection);

        collection.add("test2").unwrap();

        let events = log.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), ChangeKind::Add);
        assert_eq!(events[0].new_items(), Some(&["test2"][..]));
        assert_eq!(events[0].new_starting_index(), Some(1));
    }

    #[test]
    fn test_insert_and_bounds() {
        let collection = ObservableCollection::from_vec(vec![1, 3]);
        let log = record(&collection);

        collection.insert(1, 2).unwrap();
        assert_eq!(collection.to_vec(), vec![1, 2, 3]);
        assert_eq!(
            collection.insert(4, 9),
            Err(CollectionError::IndexOutOfRange {
                name: "index",
                value: 4,
                len: 3
            })
        );
        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn test_remove_at() {
        let collection = ObservableCollection::from_vec(vec!['a', 'b', 'c']);
        let log = record(&collection);

        assert_eq!(collection.remove_at(1), Ok('b'));
        assert!(collection.remove_at(2).is_err());

        let events = log.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), ChangeKind::Remove);
        assert_eq!(events[0].old_items(), Some(&['b'][..]));
        assert_eq!(events[0].old_starting_index(), Some(1));
        assert!(events[0].new_items().is_none());
    }

    #[test]
    fn test_set_replaces_one() {
        let collection = ObservableCollection::from_vec(vec![10, 20]);
        let log = record(&collection);

        assert_eq!(collection.set(0, 11), Ok(10));

        let events = log.lock();
        assert_eq!(events[0].kind(), ChangeKind::Replace);
        assert_eq!(events[0].new_items(), Some(&[11][..]));
        assert_eq!(events[0].old_items(), Some(&[10][..]));
        assert_eq!(events[0].new_starting_index(), Some(0));
    }

    #[test]
    fn test_remove_by_value() {
        let collection = ObservableCollection::from_vec(vec![1, 2, 1]);
        let log = record(&collection);

        assert_eq!(collection.remove(&1), Ok(true));
        assert_eq!(collection.remove(&5), Ok(false));
        assert_eq!(collection.to_vec(), vec![2, 1]);
        assert_eq!(log.lock().len(), 1);
        assert_eq!(log.lock()[0].old_starting_index(), Some(0));
    }

    #[test]
    fn test_remove_range_skips_missing() {
        let collection = ObservableCollection::from_vec(vec!["jim", "rob", "ralph", "rob"]);
        let log = record(&collection);

        assert_eq!(collection.remove_range(["rob", "paula", "jim"]), Ok(2));
        assert_eq!(collection.to_vec(), vec!["ralph", "rob"]);

        let events = log.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), ChangeKind::Remove);
        assert_eq!(events[0].old_items(), Some(&["rob", "jim"][..]));
        assert_eq!(events[0].old_starting_index(), None);
    }

    #[test]
    fn test_remove_range_nothing_matched() {
        let collection = ObservableCollection::from_vec(vec![1, 2]);
        let log = record(&collection);

        assert_eq!(collection.remove_range([7, 8]), Ok(0));
        assert_eq!(
            collection.remove_range_nullable(None::<Vec<i32>>),
            Err(CollectionError::InvalidArgument { name: "items" })
        );
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_clear_emits_reset() {
        let collection = ObservableCollection::from_vec(vec![1, 2]);
        let log = record(&collection);

        collection.clear().unwrap();

        assert!(collection.is_empty());
        assert_eq!(log.lock()[0], CollectionChanged::reset());
    }

    #[test]
    fn test_property_signals_precede_change() {
        let collection = ObservableCollection::<u32>::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let recv = order.clone();
        collection
            .signals()
            .property_changed
            .connect(move |prop| recv.lock().push(prop.name().to_string()));
        let recv = order.clone();
        collection
            .signals()
            .collection_changed
            .connect(move |change| recv.lock().push(change.kind().to_string()));

        collection.add_range([1, 2]).unwrap();

        assert_eq!(*order.lock(), vec!["Count", "Item[]", "Add"]);
    }

    #[test]
    fn test_replace_range_count_overflow() {
        let collection = ObservableCollection::from_vec(vec![1, 2, 3]);

        assert_eq!(
            collection.replace_range(1, usize::MAX, [0]),
            Err(CollectionError::IndexOutOfRange {
                name: "count",
                value: usize::MAX,
                len: 3
            })
        );
        assert_eq!(collection.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_state_during_dispatch() {
        let collection = Arc::new(ObservableCollection::<i32>::new());
        let states = Arc::new(Mutex::new(Vec::new()));

        let weak = Arc::downgrade(&collection);
        let recv = states.clone();
        collection.signals().collection_changed.connect(move |_| {
            if let Some(collection) = weak.upgrade() {
                recv.lock().push(collection.state());
            }
        });

        assert_eq!(collection.state(), DispatchState::Idle);
        collection.add(1).unwrap();
        assert_eq!(collection.state(), DispatchState::Idle);
        assert_eq!(
            *states.lock(),
            vec![DispatchState::DispatchingNotification]
        );
    }

    #[test]
    fn test_panicking_observer_leaves_collection_usable() {
        let collection = ObservableCollection::<i32>::new();
        let id = collection
            .signals()
            .collection_changed
            .connect(|_| panic!("observer failed"));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = collection.add(1);
        }));
        assert!(result.is_err());

        collection.signals().collection_changed.disconnect(id);
        assert_eq!(collection.state(), DispatchState::Idle);
        assert!(collection.add(2).is_ok());
        assert_eq!(collection.to_vec(), vec![1, 2]);
    }

    #[test]
    fn test_deque_backed_collection() {
        let collection = ObservableCollection::with_storage(VecDeque::from(vec![3, 4]));
        let log = record(&collection);

        collection.insert_range(0, [1, 2]).unwrap();
        collection.replace_range(1, 2, [20, 30]).unwrap();

        assert_eq!(collection.to_vec(), vec![1, 20, 30, 4]);
        let events = log.lock();
        assert_eq!(events[1].old_items(), Some(&[2, 3][..]));
    }

    #[test]
    fn test_read_access() {
        let collection: ObservableCollection<&str> = ["jim", "rob", "jim"].into_iter().collect();
        let log = record(&collection);

        assert_eq!(collection.len(), 3);
        assert_eq!(collection.get(1), Some("rob"));
        assert_eq!(collection.get(3), None);
        assert_eq!(collection.index_of(&"jim"), Some(0));
        assert!(collection.contains(&"rob"));
        assert!(!collection.contains(&"ralph"));
        assert_eq!(collection.with_items(|items| items.iter().filter(|n| **n == "jim").count()), 2);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_with_items_rejects_mutation() {
        let collection = ObservableCollection::from_vec(vec![1, 2]);
        let log = record(&collection);

        let result = collection.with_items(|items| {
            assert_eq!(items.len(), 2);
            collection.add(3)
        });

        assert_eq!(result, Err(CollectionError::ReentrancyViolation));
        assert_eq!(collection.state(), DispatchState::Idle);
        assert!(collection.add(3).is_ok());
        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn test_with_items_inside_observer_keeps_dispatch_state() {
        let collection = Arc::new(ObservableCollection::<i32>::new());
        let states = Arc::new(Mutex::new(Vec::new()));

        let weak = Arc::downgrade(&collection);
        let recv = states.clone();
        collection.signals().collection_changed.connect(move |_| {
            if let Some(collection) = weak.upgrade() {
                collection.with_items(|items| items.len());
                recv.lock().push(collection.state());
            }
        });

        collection.add(1).unwrap();

        assert_eq!(
            *states.lock(),
            vec![DispatchState::DispatchingNotification]
        );
        assert_eq!(collection.state(), DispatchState::Idle);
    }

    #[test]
    fn test_debug_output() {
        let collection = ObservableCollection::builder().name("dbg").items([1]).build();
        let text = format!("{collection:?}");
        assert!(text.contains("dbg"));
        assert!(text.contains("Idle"));
    }
}
