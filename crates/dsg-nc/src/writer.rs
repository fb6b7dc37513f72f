//! Creating classic NetCDF files.
//!
//! A file is described with an [`NcDefinition`], created with
//! [`NcWriter::create`], which writes the header and fills every variable
//! with its default fill value, and then populated variable by variable.

use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{NcError, Result};
use crate::header::{Header, padded};
use crate::reader::type_mismatch;
use crate::types::{Attribute, Dimension, NcType, Values, Variable};

/// Dimensions, attributes and variables of a file to be created.
#[derive(Debug, Clone, Default)]
pub struct NcDefinition {
    header: Header,
}

impl NcDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fixed-size dimension and returns its index.
    pub fn add_dimension(&mut self, name: &str, len: usize) -> Result<usize> {
        if len == 0 {
            return Err(NcError::invalid_definition(format!(
                "dimension {name} must not be empty"
            )));
        }
        if self.header.dimension_index(name).is_some() {
            return Err(NcError::DuplicateName {
                name: name.to_string(),
            });
        }
        self.header.dimensions.push(Dimension {
            name: name.to_string(),
            len,
        });
        Ok(self.header.dimensions.len() - 1)
    }

    pub fn add_global_attribute(&mut self, attribute: Attribute) {
        self.header.attributes.push(attribute);
    }

    /// Adds a variable over the given dimensions and returns its index.
    pub fn add_variable(&mut self, name: &str, nc_type: NcType, dimensions: &[usize]) -> Result<usize> {
        if self.header.variable(name).is_some() {
            return Err(NcError::DuplicateName {
                name: name.to_string(),
            });
        }
        if let Some(&dim) = dimensions.iter().find(|&&dim| dim >= self.header.dimensions.len()) {
            return Err(NcError::invalid_definition(format!(
                "variable {name} uses undefined dimension {dim}"
            )));
        }
        self.header.variables.push(Variable {
            name: name.to_string(),
            dimensions: dimensions.to_vec(),
            attributes: Vec::new(),
            nc_type,
            vsize: 0,
            begin: 0,
        });
        Ok(self.header.variables.len() - 1)
    }

    pub fn add_variable_attribute(&mut self, variable: usize, attribute: Attribute) -> Result<()> {
        let var = self.header.variables.get_mut(variable).ok_or_else(|| {
            NcError::invalid_definition(format!("no variable with index {variable}"))
        })?;
        var.attributes.push(attribute);
        Ok(())
    }
}

/// Writer for a newly created file. Dropping it closes the file.
pub struct NcWriter {
    path: PathBuf,
    header: Header,
    writer: BufWriter<File>,
}

impl NcWriter {
    /// Creates the file, writing the header and fill values for all data.
    pub fn create(path: &Path, definition: NcDefinition) -> Result<Self> {
        let mut header = definition.header;
        let size = header.assign_layout()?;
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&header.encode()?)?;
        for variable in &header.variables {
            let count = header.num_values(variable);
            let bytes = Values::fill(variable.nc_type, count).to_be_bytes();
            writer.write_all(&bytes)?;
            writer.write_all(&vec![0; padded(bytes.len()) - bytes.len()])?;
        }
        debug!(
            path = %path.display(),
            variables = header.variables.len(),
            bytes = size,
            "created NetCDF file"
        );
        Ok(Self {
            path: path.to_path_buf(),
            header,
            writer,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Writes all values of a variable.
    pub fn put(&mut self, name: &str, values: &Values) -> Result<()> {
        let begin = checked_target(&self.header, name, values)?;
        self.writer.seek(SeekFrom::Start(begin))?;
        self.writer.write_all(&values.to_be_bytes())?;
        Ok(())
    }

    /// Writes the rows of a two-dimensional char variable.
    pub fn put_text_rows<S: AsRef<str>>(&mut self, name: &str, rows: &[S]) -> Result<()> {
        let chars = encode_text_rows(&self.header, name, rows)?;
        self.put(name, &chars)
    }

    /// Flushes and closes the file.
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Validates that `values` exactly fills variable `name`; returns its offset.
pub(crate) fn checked_target(header: &Header, name: &str, values: &Values) -> Result<u64> {
    let variable = header
        .variable(name)
        .ok_or_else(|| NcError::variable_not_found(name))?;
    if variable.nc_type != values.nc_type() {
        return Err(type_mismatch(name, variable.nc_type, values.nc_type()));
    }
    let expected = header.num_values(variable);
    if values.len() != expected {
        return Err(NcError::ShapeMismatch {
            name: name.to_string(),
            expected,
            actual: values.len(),
        });
    }
    Ok(variable.begin)
}

/// NUL-padded chars for the rows of a two-dimensional char variable.
pub(crate) fn encode_text_rows<S: AsRef<str>>(header: &Header, name: &str, rows: &[S]) -> Result<Values> {
    let variable = header
        .variable(name)
        .ok_or_else(|| NcError::variable_not_found(name))?;
    if variable.nc_type != NcType::Char {
        return Err(type_mismatch(name, NcType::Char, variable.nc_type));
    }
    let shape = header.shape(variable);
    let &[num_rows, row_len] = shape.as_slice() else {
        return Err(NcError::invalid_definition(format!(
            "variable {name} is not a string variable"
        )));
    };
    if rows.len() != num_rows {
        return Err(NcError::ShapeMismatch {
            name: name.to_string(),
            expected: num_rows,
            actual: rows.len(),
        });
    }
    let mut chars = Vec::with_capacity(num_rows * row_len);
    for row in rows {
        let bytes = row.as_ref().as_bytes();
        if bytes.len() > row_len {
            return Err(NcError::StringTooLong {
                name: name.to_string(),
                max: row_len,
                actual: bytes.len(),
            });
        }
        chars.extend_from_slice(bytes);
        chars.resize(chars.len() + row_len - bytes.len(), 0);
    }
    Ok(Values::Chars(chars))
}
