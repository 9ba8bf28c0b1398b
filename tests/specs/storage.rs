//! Storage-type policy specs.

use berth_core::{attributes_to_type, type_to_attributes, StorageType};

#[yare::parameterized(
    persistent = { StorageType::Persistent },
    ephemeral  = { StorageType::Ephemeral },
    async_     = { StorageType::Async },
)]
fn round_trip_is_identity(storage_type: StorageType) {
    // attributesToType(typeToAttributes(t)) === t
    assert_eq!(attributes_to_type(&type_to_attributes(storage_type)), storage_type);
}

#[test]
fn no_flags_means_persistent() {
    assert_eq!(
        attributes_to_type(&indexmap::IndexMap::new()),
        StorageType::Persistent
    );
}
