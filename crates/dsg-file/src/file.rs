//! Creating and reading whole DSG files.

use std::path::{Path, PathBuf};
use std::time::Instant;

use dsg_core::{MetadataRecord, StdDataArray, StdUserDataArray, string_dimension_length};
use dsg_model::{DataKind, DataType, DataValue};
use dsg_nc::{Attribute, NcDefinition, NcFile, NcType, NcWriter, Values};
use dsg_standards::{TypeRegistry, names};
use tracing::{debug, info, info_span, warn};

use crate::error::{AtPath, DsgFileError, Result};
use crate::layout::{
    Axes, DATA_STRLEN_DIM, Encoded, HISTORY, METADATA_STRLEN_DIM, NUM_OBS, OBS_DIM,
    TRAJECTORY_DIM, decode, define_variable, encode,
};

/// A single-trajectory DSG file on disk.
///
/// Every operation opens the file, does its work and closes it again; no
/// handle is kept between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DsgFile {
    path: PathBuf,
}

impl DsgFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn open(&self) -> Result<NcFile> {
        NcFile::open(&self.path).at(&self.path)
    }

    /// Names and lengths of the file's dimensions, in definition order.
    pub fn dimensions(&self) -> Result<Vec<(String, usize)>> {
        let file = self.open()?;
        Ok(file
            .header()
            .dimensions
            .iter()
            .map(|dim| (dim.name.clone(), dim.len))
            .collect())
    }

    /// Creates (or replaces) the file.
    ///
    /// Every type of `data_types` gets a variable; types without a column
    /// in `data` are written as missing values. Metadata variables are
    /// exactly the entries of `metadata`.
    pub fn create(
        &self,
        metadata: &MetadataRecord,
        data: &StdDataArray,
        data_types: &TypeRegistry,
    ) -> Result<()> {
        let span = info_span!("write_dsg", path = %self.path.display());
        let _guard = span.enter();
        let start = Instant::now();

        let num_samples = data.num_samples();
        if num_samples == 0 {
            return Err(DsgFileError::file_format(&self.path, "no data samples to write"));
        }
        if data_types.is_empty() {
            return Err(DsgFileError::file_format(&self.path, "no data types given"));
        }
        let num_obs = i32::try_from(num_samples).map_err(|_| {
            DsgFileError::file_format(&self.path, format!("{num_samples} samples are too many"))
        })?;

        let mut columns: Vec<(&DataType, Option<usize>)> = Vec::with_capacity(data_types.len());
        for data_type in data_types.iter() {
            let col = data
                .data_types()
                .iter()
                .position(|t| t.var_name() == data_type.var_name());
            if let Some(col) = col
                && data.data_types()[col].kind() != data_type.kind()
            {
                return Err(DsgFileError::file_format(
                    &self.path,
                    format!("column {} does not hold {} values", data_type.var_name(), data_type.kind()),
                ));
            }
            if col.is_none() {
                debug!(variable = data_type.var_name(), "no data column; writing missing values");
            }
            columns.push((data_type, col));
        }
        for unused in data
            .data_types()
            .iter()
            .filter(|t| data_types.get(t.var_name()).is_none())
        {
            warn!(column = unused.var_name(), "not a file data type; not written");
        }

        let definition = self.definition(metadata, data, &columns).at(&self.path)?;
        let mut writer = NcWriter::create(&self.path, definition).at(&self.path)?;
        writer.put(NUM_OBS, &Values::Ints(vec![num_obs])).at(&self.path)?;
        for (data_type, value) in metadata.entries() {
            let value = (!data_type.is_missing_value(value)).then_some(value);
            put(&mut writer, data_type, &[value]).at(&self.path)?;
        }
        let missing = vec![None; num_samples];
        for (data_type, col) in &columns {
            let values: Vec<Option<&DataValue>> = match col {
                Some(col) => data.column_values(*col).collect(),
                None => missing.clone(),
            };
            put(&mut writer, data_type, &values).at(&self.path)?;
        }
        writer.finish().at(&self.path)?;

        info!(
            samples = num_samples,
            variables = columns.len() + metadata.data_types().count() + 1,
            duration_ms = start.elapsed().as_millis(),
            "wrote DSG file"
        );
        Ok(())
    }

    /// Creates the file from a standardized submission.
    pub fn create_from_user_data(
        &self,
        metadata: &MetadataRecord,
        user: &StdUserDataArray,
        data_types: &TypeRegistry,
    ) -> Result<StdDataArray> {
        let data = StdDataArray::from_user_array(user, data_types)?;
        self.create(metadata, &data, data_types)?;
        Ok(data)
    }

    fn definition(
        &self,
        metadata: &MetadataRecord,
        data: &StdDataArray,
        columns: &[(&DataType, Option<usize>)],
    ) -> dsg_nc::Result<NcDefinition> {
        let mut definition = NcDefinition::new();
        definition.add_global_attribute(Attribute::text("featureType", "Trajectory"));
        definition.add_global_attribute(Attribute::text("Conventions", "CF-1.6"));
        definition.add_global_attribute(Attribute::text("history", HISTORY));

        let trajectory = definition.add_dimension(TRAJECTORY_DIM, 1)?;
        let meta_len = definition.add_dimension(METADATA_STRLEN_DIM, metadata.max_string_length())?;
        let obs = definition.add_dimension(OBS_DIM, data.num_samples())?;
        let data_len = definition.add_dimension(
            DATA_STRLEN_DIM,
            string_dimension_length(data.max_string_length()),
        )?;

        let var = definition.add_variable(NUM_OBS, NcType::Int, &[trajectory])?;
        definition.add_variable_attribute(var, Attribute::text("sample_dimension", OBS_DIM))?;
        definition.add_variable_attribute(var, Attribute::text("long_name", "Number of Observations"))?;
        definition.add_variable_attribute(var, Attribute::int("missing_value", dsg_model::INT_MISSING_VALUE))?;
        definition.add_variable_attribute(var, Attribute::int("_FillValue", dsg_model::INT_MISSING_VALUE))?;

        let metadata_axes = Axes {
            rows: trajectory,
            string_len: meta_len,
        };
        for data_type in metadata.data_types() {
            let dataset_id = data_type.var_name() == names::EXPOCODE;
            define_variable(&mut definition, data_type, metadata_axes, dataset_id)?;
        }
        let data_axes = Axes {
            rows: obs,
            string_len: data_len,
        };
        for (data_type, _) in columns {
            define_variable(&mut definition, data_type, data_axes, false)?;
        }
        Ok(definition)
    }

    /// Reads the metadata variables of `registry`.
    ///
    /// Returns the record and the names of the types with no variable in
    /// the file; those are left missing.
    pub fn read_metadata(&self, registry: &TypeRegistry) -> Result<(MetadataRecord, Vec<String>)> {
        let file = self.open()?;
        let mut record = MetadataRecord::new(registry);
        let mut not_found = Vec::new();
        for data_type in registry.iter() {
            let name = data_type.var_name();
            let Some(mut values) = self.read_variable(&file, data_type, None)? else {
                warn!(path = %self.path.display(), variable = name, "metadata variable not found");
                not_found.push(name.to_string());
                continue;
            };
            if values.len() != 1 {
                return Err(DsgFileError::file_format(
                    &self.path,
                    format!("more than one value for metadata variable {name}"),
                ));
            }
            record.set_value(name, values.pop().flatten())?;
        }
        Ok((record, not_found))
    }

    /// Reads the data variables of `registry`.
    ///
    /// The number of samples is the length of the `time` variable, which
    /// must exist. Returns the array and the names of the types with no
    /// variable in the file; those columns are all missing.
    pub fn read_data(&self, registry: &TypeRegistry) -> Result<(StdDataArray, Vec<String>)> {
        let file = self.open()?;
        let num_samples = *file
            .shape(names::TIME)
            .at(&self.path)?
            .first()
            .ok_or_else(|| DsgFileError::file_format(&self.path, "time variable has no dimensions"))?;

        let mut types = Vec::with_capacity(registry.len());
        let mut columns = Vec::with_capacity(registry.len());
        let mut not_found = Vec::new();
        for data_type in registry.iter() {
            let values = match self.read_variable(&file, data_type, Some(num_samples))? {
                Some(values) => values,
                None => {
                    warn!(path = %self.path.display(), variable = data_type.var_name(), "data variable not found");
                    not_found.push(data_type.var_name().to_string());
                    vec![None; num_samples]
                }
            };
            types.push(data_type.clone());
            columns.push(values);
        }
        let array = StdDataArray::from_columns(types, columns)?;
        debug!(
            path = %self.path.display(),
            samples = num_samples,
            missing_variables = not_found.len(),
            "read DSG data"
        );
        Ok((array, not_found))
    }

    /// Decoded values of the variable for `data_type`, or `None` if the file
    /// has no such variable. With `rows`, the first dimension must match.
    fn read_variable(
        &self,
        file: &NcFile,
        data_type: &DataType,
        rows: Option<usize>,
    ) -> Result<Option<Vec<Option<DataValue>>>> {
        let name = data_type.var_name();
        if file.find_variable(name).is_none() {
            return Ok(None);
        }
        let shape = file.shape(name).at(&self.path)?;
        let actual = shape.first().copied().unwrap_or(0);
        if let Some(expected) = rows
            && actual != expected
        {
            return Err(DsgFileError::ShapeMismatch {
                path: self.path.clone(),
                name: name.to_string(),
                expected,
                actual,
            });
        }
        let row_len = match (data_type.kind(), shape.as_slice()) {
            (DataKind::String, [_, row_len]) => *row_len,
            (DataKind::String, _) => {
                return Err(DsgFileError::file_format(
                    &self.path,
                    format!("variable {name} is not a string variable"),
                ));
            }
            _ => 0,
        };
        let values = file.read(name).at(&self.path)?;
        let found = values.nc_type();
        decode(data_type.kind(), values, row_len).map(Some).ok_or_else(|| {
            DsgFileError::file_format(
                &self.path,
                format!("variable {name} holds {found} values, not {} values", data_type.kind()),
            )
        })
    }
}

fn put(writer: &mut NcWriter, data_type: &DataType, values: &[Option<&DataValue>]) -> dsg_nc::Result<()> {
    match encode(data_type.kind(), values) {
        Encoded::Text(rows) => writer.put_text_rows(data_type.var_name(), &rows),
        Encoded::Values(values) => writer.put(data_type.var_name(), &values),
    }
}
