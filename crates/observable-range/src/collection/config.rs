//! Collection configuration and builder.

use std::marker::PhantomData;

use super::observable::ObservableCollection;
use super::storage::Storage;

/// What `add_range` and `insert_range` do with an empty input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyRangePolicy {
    /// Emit an `Add` notification with no items.
    #[default]
    Notify,
    /// Emit nothing.
    Suppress,
}

/// Configuration for an [`ObservableCollection`].
#[derive(Debug, Clone, Default)]
pub struct CollectionConfig {
    /// Name attached to the collection's log events.
    pub name: Option<String>,
    /// Handling of empty ranges in `add_range` / `insert_range`.
    pub empty_range_policy: EmptyRangePolicy,
}

impl CollectionConfig {
    /// Create a new configuration with the given name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// Builder for creating collections with custom configuration.
///
/// ```
/// use observable_range::collection::{EmptyRangePolicy, ObservableCollection};
///
/// let names: ObservableCollection<String> = ObservableCollection::builder()
///     .name("contacts")
///     .empty_range_policy(EmptyRangePolicy::Suppress)
///     .items(vec!["jim".to_string(), "rob".to_string()])
///     .build();
/// assert_eq!(names.len(), 2);
/// ```
#[derive(Debug)]
pub struct CollectionBuilder<T, S = Vec<T>> {
    config: CollectionConfig,
    storage: S,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for CollectionBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CollectionBuilder<T> {
    /// Create a builder with default settings and empty `Vec` storage.
    pub fn new() -> Self {
        Self {
            config: CollectionConfig::default(),
            storage: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Start from these items.
    pub fn items(mut self, items: impl IntoIterator<Item = T>) -> Self {
        self.storage = items.into_iter().collect();
        self
    }
}

impl<T, S: Storage<T>> CollectionBuilder<T, S> {
    /// Use a different storage backend, keeping the configuration.
    pub fn storage<S2: Storage<T>>(self, storage: S2) -> CollectionBuilder<T, S2> {
        CollectionBuilder {
            config: self.config,
            storage,
            _marker: PhantomData,
        }
    }

    /// Set the name attached to log events.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = Some(name.into());
        self
    }

    /// Set the empty range policy.
    pub fn empty_range_policy(mut self, policy: EmptyRangePolicy) -> Self {
        self.config.empty_range_policy = policy;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: CollectionConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the collection.
    pub fn build(self) -> ObservableCollection<T, S>
    where
        T: Clone + 'static,
    {
        ObservableCollection::with_config(self.storage, self.config)
    }
}
