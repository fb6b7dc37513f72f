//! Data type registries.
//!
//! A [`TypeRegistry`] is a frozen set of [`DataType`](dsg_model::DataType)s
//! with alias lookup. Registries are built from a property-file catalog,
//! either the builtin one or an external file pinned by sha256.
//!
//! ```
//! use dsg_standards::{load_builtin_registries, names};
//!
//! let registries = load_builtin_registries().unwrap();
//! let lon = registries.user.lookup("Longitude").unwrap();
//! assert_eq!(lon.var_name(), names::LONGITUDE);
//! assert!(registries.data.get(names::WOCE_AUTOCHECK).is_some());
//! ```

#![deny(unsafe_code)]

pub mod catalog;
pub mod codec;
pub mod error;
pub mod hash;
pub mod names;
pub mod properties;
pub mod registry;

pub use crate::catalog::{
    BUILTIN_CATALOG, Registries, load_builtin_catalog, load_builtin_registries,
    load_catalog_from_file, load_registries_from_file, parse_catalog, write_catalog,
};
pub use crate::codec::{from_property_value, to_property_value};
pub use crate::error::StandardsError;
pub use crate::registry::{TypeRegistry, TypeRegistryBuilder};
