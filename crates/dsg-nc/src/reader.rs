//! Read-only access to a classic NetCDF file.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::{NcError, Result};
use crate::header::Header;
use crate::types::{NcType, Values, Variable, text_rows};

/// An opened classic NetCDF file held in memory.
///
/// The file handle is closed as soon as the content is read.
#[derive(Debug, Clone)]
pub struct NcFile {
    path: PathBuf,
    header: Header,
    data: Vec<u8>,
}

impl NcFile {
    /// Open and read a NetCDF file.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| NcError::from_open(e, path))?;
        let mut data = Vec::new();
        BufReader::new(file).read_to_end(&mut data)?;
        let header = Header::decode(&data)?;
        trace!(
            path = %path.display(),
            variables = header.variables.len(),
            "read NetCDF header"
        );
        Ok(Self {
            path: path.to_path_buf(),
            header,
            data,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn find_variable(&self, name: &str) -> Option<&Variable> {
        self.header.variable(name)
    }

    pub fn variable(&self, name: &str) -> Result<&Variable> {
        self.find_variable(name)
            .ok_or_else(|| NcError::variable_not_found(name))
    }

    /// Dimension lengths of a variable.
    pub fn shape(&self, name: &str) -> Result<Vec<usize>> {
        Ok(self.header.shape(self.variable(name)?))
    }

    /// Length of a named dimension.
    pub fn dimension_len(&self, name: &str) -> Result<usize> {
        self.header
            .dimension(name)
            .map(|dim| dim.len)
            .ok_or_else(|| NcError::DimensionNotFound {
                name: name.to_string(),
            })
    }

    /// All values of a variable, flattened in row-major order.
    pub fn read(&self, name: &str) -> Result<Values> {
        let variable = self.variable(name)?;
        let len = self.header.num_values(variable) * variable.nc_type.size();
        let start = usize::try_from(variable.begin)
            .map_err(|_| NcError::invalid_format(0, format!("variable {name} starts out of range")))?;
        let bytes = start
            .checked_add(len)
            .and_then(|end| self.data.get(start..end))
            .ok_or_else(|| {
                NcError::invalid_format(start, format!("data of variable {name} is truncated"))
            })?;
        Ok(Values::from_be_bytes(variable.nc_type, bytes))
    }

    pub fn read_ints(&self, name: &str) -> Result<Vec<i32>> {
        match self.read(name)? {
            Values::Ints(values) => Ok(values),
            other => Err(type_mismatch(name, NcType::Int, other.nc_type())),
        }
    }

    pub fn read_doubles(&self, name: &str) -> Result<Vec<f64>> {
        match self.read(name)? {
            Values::Doubles(values) => Ok(values),
            other => Err(type_mismatch(name, NcType::Double, other.nc_type())),
        }
    }

    pub fn read_chars(&self, name: &str) -> Result<Vec<u8>> {
        match self.read(name)? {
            Values::Chars(values) => Ok(values),
            other => Err(type_mismatch(name, NcType::Char, other.nc_type())),
        }
    }

    /// The rows of a two-dimensional char variable as trimmed strings.
    pub fn read_text_rows(&self, name: &str) -> Result<Vec<String>> {
        let shape = self.shape(name)?;
        let chars = self.read_chars(name)?;
        match shape.as_slice() {
            [_, row_len] => Ok(text_rows(&chars, *row_len)),
            _ => Err(NcError::invalid_format(
                0,
                format!("variable {name} is not a string variable"),
            )),
        }
    }
}

pub(crate) fn type_mismatch(name: &str, expected: NcType, actual: NcType) -> NcError {
    NcError::TypeMismatch {
        name: name.to_string(),
        expected,
        actual,
    }
}
