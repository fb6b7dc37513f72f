//! Header encoding and decoding.
//!
//! Layout of a classic (version 1) header, all integers big-endian:
//!
//! ```text
//! magic    "CDF" 0x01
//! numrecs  u32
//! dims     ABSENT | NC_DIMENSION count [name len]...
//! gatts    ABSENT | NC_ATTRIBUTE count [name type count values]...
//! vars     ABSENT | NC_VARIABLE count [name ndims dimids vatts type vsize begin]...
//! ```
//!
//! Names and attribute values are padded with zero bytes to a multiple of
//! four.

use crate::error::{NcError, Result};
use crate::types::{Attribute, Dimension, NcType, Values, Variable};

pub const MAGIC: &[u8; 4] = b"CDF\x01";

const NC_DIMENSION: u32 = 0x0A;
const NC_VARIABLE: u32 = 0x0B;
const NC_ATTRIBUTE: u32 = 0x0C;

/// Largest offset the version 1 format can address.
const MAX_OFFSET: u64 = i32::MAX as u64;

/// Rounds up to a multiple of four.
pub fn padded(len: usize) -> usize {
    len.div_ceil(4) * 4
}

/// Everything before the data section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    pub num_records: u32,
    pub dimensions: Vec<Dimension>,
    pub attributes: Vec<Attribute>,
    pub variables: Vec<Variable>,
}

impl Header {
    pub fn dimension_index(&self, name: &str) -> Option<usize> {
        self.dimensions.iter().position(|dim| dim.name == name)
    }

    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|dim| dim.name == name)
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|var| var.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Dimension lengths of a variable.
    pub fn shape(&self, variable: &Variable) -> Vec<usize> {
        variable
            .dimensions
            .iter()
            .map(|&dim| self.dimensions.get(dim).map_or(0, |d| d.len))
            .collect()
    }

    /// Number of values a variable holds.
    pub fn num_values(&self, variable: &Variable) -> usize {
        self.shape(variable).iter().product()
    }

    /// Assigns `vsize` and `begin` of every variable, packing the data
    /// right after the header. Returns the total file size.
    pub fn assign_layout(&mut self) -> Result<u64> {
        let mut sizes = Vec::with_capacity(self.variables.len());
        for variable in &self.variables {
            let bytes = self.num_values(variable) * variable.nc_type.size();
            let vsize = u32::try_from(padded(bytes)).map_err(|_| NcError::TooLarge {
                size: bytes as u64,
            })?;
            sizes.push(vsize);
        }
        // Offsets have a fixed width, so the header length does not depend
        // on their values.
        let mut offset = self.encode()?.len() as u64;
        for (variable, vsize) in self.variables.iter_mut().zip(sizes) {
            variable.vsize = vsize;
            variable.begin = offset;
            offset += u64::from(vsize);
        }
        if offset > MAX_OFFSET {
            return Err(NcError::TooLarge { size: offset });
        }
        Ok(offset)
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.extend_from_slice(MAGIC);
        put_u32(&mut out, self.num_records);

        if self.dimensions.is_empty() {
            put_absent(&mut out);
        } else {
            put_u32(&mut out, NC_DIMENSION);
            put_count(&mut out, self.dimensions.len())?;
            for dim in &self.dimensions {
                put_name(&mut out, &dim.name)?;
                put_count(&mut out, dim.len)?;
            }
        }

        put_attributes(&mut out, &self.attributes)?;

        if self.variables.is_empty() {
            put_absent(&mut out);
        } else {
            put_u32(&mut out, NC_VARIABLE);
            put_count(&mut out, self.variables.len())?;
            for var in &self.variables {
                put_name(&mut out, &var.name)?;
                put_count(&mut out, var.dimensions.len())?;
                for &dim in &var.dimensions {
                    put_count(&mut out, dim)?;
                }
                put_attributes(&mut out, &var.attributes)?;
                put_u32(&mut out, var.nc_type.code());
                put_u32(&mut out, var.vsize);
                let begin = u32::try_from(var.begin)
                    .map_err(|_| NcError::TooLarge { size: var.begin })?;
                put_u32(&mut out, begin);
            }
        }
        Ok(out)
    }

    /// Decodes the header at the start of `data`.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor { data, pos: 0 };
        if cursor.take(4)? != MAGIC {
            return Err(NcError::invalid_format(0, "not a classic NetCDF file"));
        }
        let num_records = cursor.u32()?;

        let mut dimensions = Vec::new();
        match cursor.list_tag(NC_DIMENSION)? {
            0 => {}
            count => {
                for _ in 0..count {
                    let name = cursor.name()?;
                    let at = cursor.pos;
                    let len = cursor.count()?;
                    if len == 0 {
                        return Err(NcError::invalid_format(
                            at,
                            format!("record dimension {name} is not supported"),
                        ));
                    }
                    dimensions.push(Dimension { name, len });
                }
            }
        }

        let attributes = cursor.attributes()?;

        let mut variables = Vec::new();
        let count = cursor.list_tag(NC_VARIABLE)?;
        for _ in 0..count {
            let name = cursor.name()?;
            let ndims = cursor.count()?;
            let mut dims = Vec::with_capacity(ndims.min(16));
            for _ in 0..ndims {
                let at = cursor.pos;
                let dim = cursor.count()?;
                if dim >= dimensions.len() {
                    return Err(NcError::invalid_format(
                        at,
                        format!("variable {name} uses undefined dimension {dim}"),
                    ));
                }
                dims.push(dim);
            }
            let attributes = cursor.attributes()?;
            let nc_type = cursor.nc_type()?;
            let vsize = cursor.u32()?;
            let begin = u64::from(cursor.u32()?);
            variables.push(Variable {
                name,
                dimensions: dims,
                attributes,
                nc_type,
                vsize,
                begin,
            });
        }

        Ok(Self {
            num_records,
            dimensions,
            attributes,
            variables,
        })
    }
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn put_count(out: &mut Vec<u8>, count: usize) -> Result<()> {
    let count = u32::try_from(count)
        .map_err(|_| NcError::invalid_definition(format!("count {count} is too large")))?;
    put_u32(out, count);
    Ok(())
}

fn put_absent(out: &mut Vec<u8>) {
    put_u32(out, 0);
    put_u32(out, 0);
}

fn put_padded(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(bytes);
    out.resize(out.len() + padded(bytes.len()) - bytes.len(), 0);
}

fn put_name(out: &mut Vec<u8>, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(NcError::invalid_definition("names must not be empty"));
    }
    put_count(out, name.len())?;
    put_padded(out, name.as_bytes());
    Ok(())
}

fn put_attributes(out: &mut Vec<u8>, attributes: &[Attribute]) -> Result<()> {
    if attributes.is_empty() {
        put_absent(out);
        return Ok(());
    }
    put_u32(out, NC_ATTRIBUTE);
    put_count(out, attributes.len())?;
    for attr in attributes {
        put_name(out, &attr.name)?;
        put_u32(out, attr.values.nc_type().code());
        put_count(out, attr.values.len())?;
        put_padded(out, &attr.values.to_be_bytes());
    }
    Ok(())
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| NcError::invalid_format(self.pos, "header is truncated"))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn count(&mut self) -> Result<usize> {
        let at = self.pos;
        let value = self.u32()?;
        usize::try_from(value).map_err(|_| NcError::invalid_format(at, "count does not fit"))
    }

    fn padded_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let bytes = self.take(len)?;
        self.take(padded(len) - len)?;
        Ok(bytes)
    }

    fn name(&mut self) -> Result<String> {
        let len = self.count()?;
        let at = self.pos;
        let bytes = self.padded_bytes(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| NcError::invalid_format(at, "name is not valid UTF-8"))
    }

    fn nc_type(&mut self) -> Result<NcType> {
        let at = self.pos;
        let code = self.u32()?;
        NcType::from_code(code)
            .ok_or_else(|| NcError::invalid_format(at, format!("unknown type code {code}")))
    }

    /// Reads a list tag and count; an absent list has count zero.
    fn list_tag(&mut self, expected: u32) -> Result<usize> {
        let at = self.pos;
        let tag = self.u32()?;
        let count = self.count()?;
        match tag {
            0 if count == 0 => Ok(0),
            tag if tag == expected => Ok(count),
            _ => Err(NcError::invalid_format(
                at,
                format!("expected list tag {expected:#x}, found {tag:#x}"),
            )),
        }
    }

    fn attributes(&mut self) -> Result<Vec<Attribute>> {
        let count = self.list_tag(NC_ATTRIBUTE)?;
        let mut attributes = Vec::with_capacity(count.min(64));
        for _ in 0..count {
            let name = self.name()?;
            let nc_type = self.nc_type()?;
            let len = self.count()?;
            let at = self.pos;
            let size = len
                .checked_mul(nc_type.size())
                .ok_or_else(|| NcError::invalid_format(at, "attribute is too large"))?;
            let bytes = self.padded_bytes(size)?;
            attributes.push(Attribute {
                name,
                values: Values::from_be_bytes(nc_type, bytes),
            });
        }
        Ok(attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Header {
        Header {
            num_records: 0,
            dimensions: vec![
                Dimension {
                    name: "obs".to_string(),
                    len: 3,
                },
                Dimension {
                    name: "string_length".to_string(),
                    len: 32,
                },
            ],
            attributes: vec![Attribute::text("Conventions", "CF-1.6")],
            variables: vec![
                Variable {
                    name: "time".to_string(),
                    dimensions: vec![0],
                    attributes: vec![Attribute::double("missing_value", -1.0E34)],
                    nc_type: NcType::Double,
                    vsize: 0,
                    begin: 0,
                },
                Variable {
                    name: "flag".to_string(),
                    dimensions: vec![0],
                    attributes: Vec::new(),
                    nc_type: NcType::Char,
                    vsize: 0,
                    begin: 0,
                },
                Variable {
                    name: "label".to_string(),
                    dimensions: vec![0, 1],
                    attributes: Vec::new(),
                    nc_type: NcType::Char,
                    vsize: 0,
                    begin: 0,
                },
            ],
        }
    }

    #[test]
    fn layout_packs_padded_variables() {
        let mut header = sample();
        let size = header.assign_layout().unwrap();
        let header_len = header.encode().unwrap().len() as u64;

        let time = &header.variables[0];
        assert_eq!(time.vsize, 24);
        assert_eq!(time.begin, header_len);
        // Three chars are padded to four bytes.
        assert_eq!(header.variables[1].vsize, 4);
        assert_eq!(header.variables[2].begin, header_len + 28);
        assert_eq!(size, header_len + 28 + 96);
    }

    #[test]
    fn decode_reads_back_the_encoded_header() {
        let mut header = sample();
        header.assign_layout().unwrap();
        let bytes = header.encode().unwrap();
        assert_eq!(&bytes[..4], MAGIC);
        assert_eq!(Header::decode(&bytes).unwrap(), header);
    }

    #[test]
    fn names_are_padded() {
        let mut out = Vec::new();
        put_name(&mut out, "obs").unwrap();
        assert_eq!(out, vec![0, 0, 0, 3, b'o', b'b', b's', 0]);
        assert!(put_name(&mut out, "").is_err());
    }

    #[test]
    fn rejects_foreign_and_truncated_data() {
        assert!(matches!(
            Header::decode(b"CDF\x02\0\0\0\0"),
            Err(NcError::InvalidFormat { offset: 0, .. })
        ));
        let bytes = sample().encode().unwrap();
        assert!(matches!(
            Header::decode(&bytes[..bytes.len() - 2]),
            Err(NcError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn record_dimensions_are_rejected() {
        let mut header = sample();
        header.dimensions[0].len = 0;
        let bytes = header.encode().unwrap();
        let err = Header::decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("record dimension obs"));
    }
}
