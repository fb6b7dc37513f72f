#![deny(unsafe_code)]

use std::collections::BTreeMap;

use dsg_model::{DataType, Role, name_key};

use crate::error::StandardsError;

/// Collects data types and checks them for conflicts before freezing.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistryBuilder {
    types: BTreeMap<String, DataType>,
}

impl TypeRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a type.
    ///
    /// Re-adding an identical type is a no-op. A different definition under
    /// the same name, or a differently named type sharing an alias with an
    /// existing type, is rejected.
    pub fn register(&mut self, data_type: DataType) -> Result<&mut Self, StandardsError> {
        if let Some(existing) = self.types.get(data_type.var_name()) {
            if *existing == data_type {
                return Ok(self);
            }
            return Err(StandardsError::DuplicateType {
                name: data_type.var_name().to_string(),
            });
        }
        if let Some(clash) = self
            .types
            .values()
            .find(|existing| existing.type_name_equals(&data_type))
        {
            return Err(StandardsError::configuration(format!(
                "data type {} ({}) has the same name as {} ({})",
                data_type.var_name(),
                data_type.display_name(),
                clash.var_name(),
                clash.display_name()
            )));
        }
        self.types
            .insert(data_type.var_name().to_string(), data_type);
        Ok(self)
    }

    /// Adds every type, stopping at the first conflict.
    pub fn register_all(
        &mut self,
        types: impl IntoIterator<Item = DataType>,
    ) -> Result<&mut Self, StandardsError> {
        for data_type in types {
            self.register(data_type)?;
        }
        Ok(self)
    }

    pub fn build(&self) -> TypeRegistry {
        let mut types: Vec<DataType> = self.types.values().cloned().collect();
        types.sort_by(DataType::sort_cmp);
        let by_name = types
            .iter()
            .enumerate()
            .map(|(index, data_type)| (data_type.var_name().to_string(), index))
            .collect();
        TypeRegistry { types, by_name }
    }
}

/// A frozen, named set of data types.
///
/// Iteration follows the serialization order: sort order, display name,
/// kind, then name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeRegistry {
    types: Vec<DataType>,
    by_name: BTreeMap<String, usize>,
}

impl TypeRegistry {
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::new()
    }

    /// Builds a registry from the types holding `role`.
    pub fn with_role<'a>(
        types: impl IntoIterator<Item = &'a DataType>,
        role: Role,
    ) -> Result<Self, StandardsError> {
        let mut builder = TypeRegistryBuilder::new();
        builder.register_all(
            types
                .into_iter()
                .filter(|data_type| data_type.has_role(role))
                .cloned(),
        )?;
        Ok(builder.build())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DataType> {
        self.types.iter()
    }

    pub fn contains(&self, data_type: &DataType) -> bool {
        self.get(data_type.var_name()) == Some(data_type)
    }

    /// Exact-name lookup.
    pub fn get(&self, var_name: &str) -> Option<&DataType> {
        self.by_name.get(var_name).map(|&index| &self.types[index])
    }

    /// Alias lookup.
    ///
    /// Tries the exact name, a case-insensitive name, the name key, the
    /// exact display name and finally the display-name key.
    pub fn lookup(&self, name: &str) -> Option<&DataType> {
        if let Some(found) = self.get(name) {
            return Some(found);
        }
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return None;
        }
        let key = name_key(trimmed);
        self.types
            .iter()
            .find(|t| t.var_name().eq_ignore_ascii_case(trimmed))
            .or_else(|| {
                (!key.is_empty())
                    .then(|| self.types.iter().find(|t| name_key(t.var_name()) == key))
                    .flatten()
            })
            .or_else(|| self.types.iter().find(|t| t.display_name() == trimmed))
            .or_else(|| {
                (!key.is_empty())
                    .then(|| self.types.iter().find(|t| name_key(t.display_name()) == key))
                    .flatten()
            })
    }

    /// Lookup for a user column header, falling back to a declared
    /// alternate name.
    pub fn lookup_column(&self, header: &str, alternate: Option<&str>) -> Option<&DataType> {
        self.lookup(header)
            .or_else(|| alternate.and_then(|name| self.lookup(name)))
    }

    /// Exact-name lookup that fails with a configuration error.
    pub fn require(&self, var_name: &str) -> Result<&DataType, StandardsError> {
        self.get(var_name)
            .ok_or_else(|| StandardsError::configuration(format!("unknown data type {var_name}")))
    }
}

impl<'a> IntoIterator for &'a TypeRegistry {
    type Item = &'a DataType;
    type IntoIter = std::slice::Iter<'a, DataType>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsg_model::DataKind;

    fn dtype(name: &str, display: &str, sort: f64) -> DataType {
        DataType::builder(name, DataKind::Double, sort)
            .display_name(display)
            .build()
            .unwrap()
    }

    #[test]
    fn identical_registration_is_noop() {
        let mut builder = TypeRegistryBuilder::new();
        builder.register(dtype("sal", "salinity", 600.0)).unwrap();
        builder.register(dtype("sal", "salinity", 600.0)).unwrap();
        assert_eq!(builder.build().len(), 1);
    }

    #[test]
    fn conflicting_registration_fails() {
        let mut builder = TypeRegistryBuilder::new();
        builder.register(dtype("sal", "salinity", 600.0)).unwrap();
        let err = builder.register(dtype("sal", "salt", 600.0)).unwrap_err();
        assert!(matches!(err, StandardsError::DuplicateType { .. }));
        let err = builder
            .register(dtype("Salinity", "other", 601.0))
            .unwrap_err();
        assert!(matches!(err, StandardsError::InvalidConfiguration { .. }));
    }

    #[test]
    fn lookup_order() {
        let mut builder = TypeRegistryBuilder::new();
        builder
            .register_all([
                dtype("temp", "sea surface temperature", 611.0),
                dtype("Temperature_equi", "equilibrator temperature", 610.0),
            ])
            .unwrap();
        let registry = builder.build();
        assert_eq!(registry.lookup("temp").unwrap().var_name(), "temp");
        assert_eq!(registry.lookup("TEMP").unwrap().var_name(), "temp");
        assert_eq!(
            registry.lookup("temperature equi").unwrap().var_name(),
            "Temperature_equi"
        );
        assert_eq!(
            registry.lookup("Sea-Surface Temperature").unwrap().var_name(),
            "temp"
        );
        assert!(registry.lookup("  ").is_none());
        assert_eq!(
            registry.lookup_column("SST", Some("temp")).unwrap().var_name(),
            "temp"
        );
        let names: Vec<_> = registry.iter().map(DataType::var_name).collect();
        assert_eq!(names, vec!["Temperature_equi", "temp"]);
    }
}
