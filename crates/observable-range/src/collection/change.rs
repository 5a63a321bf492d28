//! Change notification payloads.

use std::fmt;

/// The kind of mutation a [`CollectionChanged`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Items were inserted.
    Add,
    /// Items were removed.
    Remove,
    /// Items were replaced by other items.
    Replace,
    /// The contents changed drastically; observers should re-read everything.
    Reset,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Add => "Add",
            Self::Remove => "Remove",
            Self::Replace => "Replace",
            Self::Reset => "Reset",
        };
        f.write_str(name)
    }
}

/// One completed mutation of an observable collection.
///
/// The constructors enforce which fields each kind carries:
///
/// | kind      | `new_items` | `old_items` |
/// |-----------|-------------|-------------|
/// | `Add`     | yes         | no          |
/// | `Remove`  | no          | yes         |
/// | `Replace` | yes         | yes         |
/// | `Reset`   | no          | no          |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionChanged<T> {
    kind: ChangeKind,
    new_items: Option<Vec<T>>,
    old_items: Option<Vec<T>>,
    new_starting_index: Option<usize>,
    old_starting_index: Option<usize>,
}

impl<T> CollectionChanged<T> {
    /// `items` were inserted starting at `index`.
    pub fn added(items: Vec<T>, index: usize) -> Self {
        Self {
            kind: ChangeKind::Add,
            new_items: Some(items),
            old_items: None,
            new_starting_index: Some(index),
            old_starting_index: None,
        }
    }

    /// `items` were removed. `index` is where they started, when they formed
    /// a single contiguous run.
    pub fn removed(items: Vec<T>, index: Option<usize>) -> Self {
        Self {
            kind: ChangeKind::Remove,
            new_items: None,
            old_items: Some(items),
            new_starting_index: None,
            old_starting_index: index,
        }
    }

    /// `old_items` were replaced by `new_items`, both starting at `index`
    /// when the ranges share one.
    pub fn replaced(new_items: Vec<T>, old_items: Vec<T>, index: Option<usize>) -> Self {
        Self {
            kind: ChangeKind::Replace,
            new_items: Some(new_items),
            old_items: Some(old_items),
            new_starting_index: index,
            old_starting_index: index,
        }
    }

    /// The contents changed; no diff is provided.
    pub fn reset() -> Self {
        Self {
            kind: ChangeKind::Reset,
            new_items: None,
            old_items: None,
            new_starting_index: None,
            old_starting_index: None,
        }
    }

    /// The kind of mutation.
    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    /// Items added by the mutation, in order.
    pub fn new_items(&self) -> Option<&[T]> {
        self.new_items.as_deref()
    }

    /// Items removed or replaced by the mutation, in their original order.
    pub fn old_items(&self) -> Option<&[T]> {
        self.old_items.as_deref()
    }

    /// Position at which `new_items` were inserted.
    pub fn new_starting_index(&self) -> Option<usize> {
        self.new_starting_index
    }

    /// Position at which `old_items` used to start.
    pub fn old_starting_index(&self) -> Option<usize> {
        self.old_starting_index
    }

    /// Consume the notification, returning `(new_items, old_items)`.
    pub fn into_items(self) -> (Option<Vec<T>>, Option<Vec<T>>) {
        (self.new_items, self.old_items)
    }
}

/// Companion properties signalled alongside structural changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionProperty {
    /// The element count may have changed.
    Count,
    /// Indexed access may return different elements.
    Indexer,
}

impl CollectionProperty {
    /// The conventional binding name of the property.
    pub fn name(self) -> &'static str {
        match self {
            Self::Count => "Count",
            Self::Indexer => "Item[]",
        }
    }
}

impl fmt::Display for CollectionProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
