//! Tests for mutation during notification and notification failure handling.

use std::sync::{Arc, Weak};

use observable_range::collection::{
    ChangeKind, CollectionChanged, CollectionError, CollectionProperty, DispatchState,
    ObservableCollection,
};
use parking_lot::Mutex;

type Shared = Arc<ObservableCollection<i32>>;

/// Connects an observer that tries `mutate` on every change and records the outcome.
fn mutate_on_change<F>(collection: &Shared, mutate: F) -> Arc<Mutex<Vec<Result<(), CollectionError>>>>
where
    F: Fn(&ObservableCollection<i32>) -> Result<(), CollectionError> + Send + Sync + 'static,
{
    let outcomes = Arc::new(Mutex::new(Vec::new()));
    let weak: Weak<ObservableCollection<i32>> = Arc::downgrade(collection);
    let recv = outcomes.clone();
    collection.signals().collection_changed.connect(move |_| {
        if let Some(collection) = weak.upgrade() {
            recv.lock().push(mutate(&collection));
        }
    });
    outcomes
}

#[test]
fn mutation_from_observer_is_rejected() {
    let collection: Shared = Arc::new(ObservableCollection::from_vec(vec![1, 2]));
    let outcomes = mutate_on_change(&collection, |c| c.add_range([99]));

    collection.add_range([3]).unwrap();

    assert_eq!(
        *outcomes.lock(),
        vec![Err(CollectionError::ReentrancyViolation)]
    );
    assert_eq!(collection.to_vec(), vec![1, 2, 3]);
}

#[test]
fn every_mutator_is_guarded() {
    let collection: Shared = Arc::new(ObservableCollection::from_vec(vec![1, 2, 3]));
    let outcomes = mutate_on_change(&collection, |c| {
        let attempts = [
            c.add(0),
            c.insert(0, 0),
            c.remove_at(0).map(drop),
            c.set(0, 0).map(drop),
            c.clear(),
            c.refresh(),
            c.add_range([0]),
            c.insert_range(0, [0]),
            c.replace_range(0, 1, [0]),
            c.assume_range([0]),
            c.remove(&1).map(drop),
            c.remove_range([1]).map(drop),
        ];
        match attempts.iter().find(|r| **r != Err(CollectionError::ReentrancyViolation)) {
            Some(unexpected) => unexpected.clone(),
            None => Err(CollectionError::ReentrancyViolation),
        }
    });

    collection.add(4).unwrap();

    assert_eq!(
        *outcomes.lock(),
        vec![Err(CollectionError::ReentrancyViolation)]
    );
    assert_eq!(collection.to_vec(), vec![1, 2, 3, 4]);
}

#[test]
fn property_observers_are_guarded_too() {
    let collection: Shared = Arc::new(ObservableCollection::new());
    let outcomes = Arc::new(Mutex::new(Vec::new()));

    let weak = Arc::downgrade(&collection);
    let recv = outcomes.clone();
    collection
        .signals()
        .property_changed
        .connect(move |prop: &CollectionProperty| {
            if *prop == CollectionProperty::Count
                && let Some(collection) = weak.upgrade()
            {
                recv.lock().push(collection.add(7));
            }
        });

    collection.add(1).unwrap();

    assert_eq!(
        *outcomes.lock(),
        vec![Err(CollectionError::ReentrancyViolation)]
    );
    assert_eq!(collection.len(), 1);
}

#[test]
fn observers_can_read_during_dispatch() {
    let collection: Shared = Arc::new(ObservableCollection::from_vec(vec![1]));
    let seen = Arc::new(Mutex::new(Vec::new()));

    let weak = Arc::downgrade(&collection);
    let recv = seen.clone();
    collection.signals().collection_changed.connect(move |_| {
        if let Some(collection) = weak.upgrade() {
            recv.lock().push((collection.to_vec(), collection.state()));
        }
    });

    collection.insert_range(0, [0]).unwrap();

    assert_eq!(
        *seen.lock(),
        vec![(vec![0, 1], DispatchState::DispatchingNotification)]
    );
    assert_eq!(collection.state(), DispatchState::Idle);
}

#[test]
fn rejected_argument_is_reported_before_reentrancy() {
    let collection: Shared = Arc::new(ObservableCollection::new());
    let outcomes = mutate_on_change(&collection, |c| c.add_range_nullable(None::<Vec<i32>>));

    collection.add(1).unwrap();

    assert_eq!(
        *outcomes.lock(),
        vec![Err(CollectionError::InvalidArgument { name: "items" })]
    );
}

#[test]
fn separate_collections_do_not_block_each_other() {
    let source: Shared = Arc::new(ObservableCollection::new());
    let mirror: Shared = Arc::new(ObservableCollection::new());

    let target = mirror.clone();
    source
        .signals()
        .collection_changed
        .connect(move |change: &CollectionChanged<i32>| {
            if let Some(items) = change.new_items() {
                target.add_range(items.iter().copied()).unwrap();
            }
        });

    source.add_range([1, 2]).unwrap();
    source.add(3).unwrap();

    assert_eq!(mirror.to_vec(), vec![1, 2, 3]);
}

// -------------------------------------------------------------------------
// assume_range notification failure
// -------------------------------------------------------------------------

fn failing_replace_observer(collection: &ObservableCollection<i32>) -> Arc<Mutex<Vec<ChangeKind>>> {
    let kinds = Arc::new(Mutex::new(Vec::new()));
    let recv = kinds.clone();
    collection
        .signals()
        .collection_changed
        .connect(move |change: &CollectionChanged<i32>| {
            recv.lock().push(change.kind());
            if change.kind() == ChangeKind::Replace {
                panic!("view cannot apply replace");
            }
        });
    kinds
}

#[test]
fn assume_range_falls_back_to_reset() {
    let collection = ObservableCollection::from_vec(vec![1, 2, 3]);
    let kinds = failing_replace_observer(&collection);

    collection.assume_range([7, 8]).unwrap();

    assert_eq!(*kinds.lock(), vec![ChangeKind::Replace, ChangeKind::Reset]);
    assert_eq!(collection.to_vec(), vec![7, 8]);
    assert_eq!(collection.state(), DispatchState::Idle);

    // The collection keeps working after the fallback.
    collection.add(9).unwrap();
    assert_eq!(kinds.lock().last(), Some(&ChangeKind::Add));
}

fn kind_recorder(collection: &ObservableCollection<i32>) -> Arc<Mutex<Vec<ChangeKind>>> {
    let kinds = Arc::new(Mutex::new(Vec::new()));
    let recv = kinds.clone();
    collection
        .signals()
        .collection_changed
        .connect(move |change: &CollectionChanged<i32>| recv.lock().push(change.kind()));
    kinds
}

#[test]
fn reset_reaches_observers_after_the_failing_one() {
    let collection = ObservableCollection::from_vec(vec![1, 2, 3]);
    let first = kind_recorder(&collection);
    let failing = failing_replace_observer(&collection);
    let last = kind_recorder(&collection);

    let result = collection.assume_range([5]);

    assert_eq!(result, Ok(()));
    assert_eq!(*first.lock(), vec![ChangeKind::Replace, ChangeKind::Reset]);
    assert_eq!(*failing.lock(), vec![ChangeKind::Replace, ChangeKind::Reset]);
    assert_eq!(*last.lock(), vec![ChangeKind::Reset]);
    assert_eq!(collection.to_vec(), vec![5]);
    assert_eq!(collection.state(), DispatchState::Idle);
}

#[test]
fn mutation_from_reset_fallback_is_rejected() {
    let collection: Shared = Arc::new(ObservableCollection::from_vec(vec![1]));
    failing_replace_observer(&collection);
    let outcomes = mutate_on_change(&collection, |c| c.add(0));

    collection.assume_range([2, 3]).unwrap();

    // Only the fallback reaches this observer; the failing one stopped the Replace.
    assert_eq!(
        *outcomes.lock(),
        vec![Err(CollectionError::ReentrancyViolation)]
    );
    assert_eq!(collection.to_vec(), vec![2, 3]);
}
