//! Contact list walkthrough
//!
//! Drives an `ObservableCollection` through each ranged operation and prints
//! the notifications a bound view would receive.
//!
//! Run with: RUST_LOG=observable_range=trace cargo run -p observable-range --example contacts

use observable_range::collection::{CollectionChanged, CollectionResult, ObservableCollection};
use tracing_subscriber::EnvFilter;

fn describe(change: &CollectionChanged<String>) -> String {
    let mut text = change.kind().to_string();
    if let Some(index) = change.new_starting_index().or(change.old_starting_index()) {
        text.push_str(&format!(" at {index}"));
    }
    if let Some(old) = change.old_items() {
        text.push_str(&format!(" old={old:?}"));
    }
    if let Some(new) = change.new_items() {
        text.push_str(&format!(" new={new:?}"));
    }
    text
}

fn main() -> CollectionResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let contacts = ObservableCollection::<String>::builder()
        .name("contacts")
        .build();

    contacts
        .signals()
        .property_changed
        .connect(|prop| println!("  property {prop}"));
    contacts
        .signals()
        .collection_changed
        .connect(|change| println!("  changed: {}", describe(change)));

    let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    println!("add_range");
    contacts.add_range(names(&["jim", "rob", "ralph"]))?;

    println!("insert_range");
    contacts.insert_range(0, names(&["john", "rork"]))?;

    println!("replace_range");
    contacts.replace_range(1, 2, names(&["logan"]))?;

    println!("remove_range");
    contacts.remove_range(names(&["ralph", "nobody"]))?;

    println!("assume_range");
    contacts.assume_range(names(&["paula"]))?;

    println!("refresh");
    contacts.refresh()?;

    println!("assume_range (empty)");
    contacts.assume_range(Vec::new())?;

    println!("final: {:?}", contacts.to_vec());
    Ok(())
}
