//! In-place updates of existing files.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{NcError, Result};
use crate::header::Header;
use crate::types::{Values, text_rows};
use crate::writer::{checked_target, encode_text_rows};

/// Rewrites variable values of an existing file.
///
/// Dimensions and the header never change, so every write must exactly
/// fill its variable. Shapes and string lengths are checked before any
/// byte is written. Dropping the patcher closes the file.
pub struct NcPatcher {
    path: PathBuf,
    header: Header,
    file: File,
}

impl NcPatcher {
    pub fn open(path: &Path) -> Result<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| NcError::from_open(e, path))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        let header = Header::decode(&data)?;
        Ok(Self {
            path: path.to_path_buf(),
            header,
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn shape(&self, name: &str) -> Result<Vec<usize>> {
        let variable = self
            .header
            .variable(name)
            .ok_or_else(|| NcError::variable_not_found(name))?;
        Ok(self.header.shape(variable))
    }

    pub fn read(&mut self, name: &str) -> Result<Values> {
        let variable = self
            .header
            .variable(name)
            .ok_or_else(|| NcError::variable_not_found(name))?;
        let mut bytes = vec![0; self.header.num_values(variable) * variable.nc_type.size()];
        let nc_type = variable.nc_type;
        self.file.seek(SeekFrom::Start(variable.begin))?;
        self.file.read_exact(&mut bytes)?;
        Ok(Values::from_be_bytes(nc_type, &bytes))
    }

    pub fn read_text_rows(&mut self, name: &str) -> Result<Vec<String>> {
        let shape = self.shape(name)?;
        let Values::Chars(chars) = self.read(name)? else {
            return Err(NcError::invalid_format(
                0,
                format!("variable {name} is not a string variable"),
            ));
        };
        match shape.as_slice() {
            [_, row_len] => Ok(text_rows(&chars, *row_len)),
            _ => Err(NcError::invalid_format(
                0,
                format!("variable {name} is not a string variable"),
            )),
        }
    }

    /// Overwrites all values of a variable.
    pub fn write(&mut self, name: &str, values: &Values) -> Result<()> {
        let begin = checked_target(&self.header, name, values)?;
        self.file.seek(SeekFrom::Start(begin))?;
        self.file.write_all(&values.to_be_bytes())?;
        self.file.flush()?;
        debug!(path = %self.path.display(), variable = name, "patched variable");
        Ok(())
    }

    /// Overwrites the rows of a two-dimensional char variable.
    pub fn write_text_rows<S: AsRef<str>>(&mut self, name: &str, rows: &[S]) -> Result<()> {
        let chars = encode_text_rows(&self.header, name, rows)?;
        self.write(name, &chars)
    }
}
