//! Dimensions, attributes, variables and value arrays.

use std::fmt;

/// External data types of the classic format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NcType {
    Byte,
    Char,
    Short,
    Int,
    Float,
    Double,
}

impl NcType {
    /// Tag written in the header.
    pub fn code(self) -> u32 {
        match self {
            Self::Byte => 1,
            Self::Char => 2,
            Self::Short => 3,
            Self::Int => 4,
            Self::Float => 5,
            Self::Double => 6,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::Byte),
            2 => Some(Self::Char),
            3 => Some(Self::Short),
            4 => Some(Self::Int),
            5 => Some(Self::Float),
            6 => Some(Self::Double),
            _ => None,
        }
    }

    /// Size of one value in bytes.
    pub fn size(self) -> usize {
        match self {
            Self::Byte | Self::Char => 1,
            Self::Short => 2,
            Self::Int | Self::Float => 4,
            Self::Double => 8,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Char => "char",
            Self::Short => "short",
            Self::Int => "int",
            Self::Float => "float",
            Self::Double => "double",
        }
    }
}

impl fmt::Display for NcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    pub len: usize,
}

/// A homogeneous array of values, as stored for one variable or attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    Bytes(Vec<i8>),
    Chars(Vec<u8>),
    Shorts(Vec<i16>),
    Ints(Vec<i32>),
    Floats(Vec<f32>),
    Doubles(Vec<f64>),
}

impl Values {
    pub fn nc_type(&self) -> NcType {
        match self {
            Self::Bytes(_) => NcType::Byte,
            Self::Chars(_) => NcType::Char,
            Self::Shorts(_) => NcType::Short,
            Self::Ints(_) => NcType::Int,
            Self::Floats(_) => NcType::Float,
            Self::Doubles(_) => NcType::Double,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Bytes(values) => values.len(),
            Self::Chars(values) => values.len(),
            Self::Shorts(values) => values.len(),
            Self::Ints(values) => values.len(),
            Self::Floats(values) => values.len(),
            Self::Doubles(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `count` copies of the default fill value of `nc_type`.
    pub fn fill(nc_type: NcType, count: usize) -> Self {
        match nc_type {
            NcType::Byte => Self::Bytes(vec![-127; count]),
            NcType::Char => Self::Chars(vec![0; count]),
            NcType::Short => Self::Shorts(vec![-32767; count]),
            NcType::Int => Self::Ints(vec![-2_147_483_647; count]),
            NcType::Float => Self::Floats(vec![9.969_21E36; count]),
            NcType::Double => Self::Doubles(vec![9.969_209_968_386_869E36; count]),
        }
    }

    /// Big-endian bytes without padding.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len() * self.nc_type().size());
        match self {
            Self::Bytes(values) => out.extend(values.iter().map(|v| v.to_be_bytes()[0])),
            Self::Chars(values) => out.extend_from_slice(values),
            Self::Shorts(values) => values.iter().for_each(|v| out.extend(v.to_be_bytes())),
            Self::Ints(values) => values.iter().for_each(|v| out.extend(v.to_be_bytes())),
            Self::Floats(values) => values.iter().for_each(|v| out.extend(v.to_be_bytes())),
            Self::Doubles(values) => values.iter().for_each(|v| out.extend(v.to_be_bytes())),
        }
        out
    }

    /// Decodes `bytes`, whose length must be a multiple of the type size.
    pub fn from_be_bytes(nc_type: NcType, bytes: &[u8]) -> Self {
        fn chunks<const N: usize>(bytes: &[u8]) -> impl Iterator<Item = [u8; N]> + '_ {
            bytes.chunks_exact(N).map(|chunk| {
                let mut array = [0u8; N];
                array.copy_from_slice(chunk);
                array
            })
        }
        match nc_type {
            NcType::Byte => Self::Bytes(bytes.iter().map(|&b| i8::from_be_bytes([b])).collect()),
            NcType::Char => Self::Chars(bytes.to_vec()),
            NcType::Short => Self::Shorts(chunks::<2>(bytes).map(i16::from_be_bytes).collect()),
            NcType::Int => Self::Ints(chunks::<4>(bytes).map(i32::from_be_bytes).collect()),
            NcType::Float => Self::Floats(chunks::<4>(bytes).map(f32::from_be_bytes).collect()),
            NcType::Double => Self::Doubles(chunks::<8>(bytes).map(f64::from_be_bytes).collect()),
        }
    }
}

/// A named attribute; text attributes are stored as chars.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub values: Values,
}

impl Attribute {
    pub fn text(name: impl Into<String>, text: impl AsRef<str>) -> Self {
        Self {
            name: name.into(),
            values: Values::Chars(text.as_ref().as_bytes().to_vec()),
        }
    }

    pub fn int(name: impl Into<String>, value: i32) -> Self {
        Self {
            name: name.into(),
            values: Values::Ints(vec![value]),
        }
    }

    pub fn double(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            values: Values::Doubles(vec![value]),
        }
    }

    /// The value of a char attribute, with trailing NULs removed.
    pub fn as_text(&self) -> Option<String> {
        match &self.values {
            Values::Chars(bytes) => Some(
                String::from_utf8_lossy(bytes)
                    .trim_end_matches('\0')
                    .to_string(),
            ),
            _ => None,
        }
    }
}

/// A variable as described by the header.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    /// Indices into the header's dimensions, slowest varying first.
    pub dimensions: Vec<usize>,
    pub attributes: Vec<Attribute>,
    pub nc_type: NcType,
    /// Size of the data in bytes, padded to a multiple of four.
    pub vsize: u32,
    /// File offset of the data.
    pub begin: u64,
}

impl Variable {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }
}

/// Splits fixed-width char rows into strings, dropping NUL and trailing
/// space padding.
pub fn text_rows(chars: &[u8], row_len: usize) -> Vec<String> {
    if row_len == 0 {
        return Vec::new();
    }
    chars
        .chunks(row_len)
        .map(|row| {
            let end = row.iter().position(|&b| b == 0).unwrap_or(row.len());
            String::from_utf8_lossy(&row[..end]).trim_end().to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn big_endian_values() {
        let values = Values::Ints(vec![1, -99]);
        let bytes = values.to_be_bytes();
        assert_eq!(bytes, vec![0, 0, 0, 1, 0xFF, 0xFF, 0xFF, 0x9D]);
        assert_eq!(Values::from_be_bytes(NcType::Int, &bytes), values);

        let doubles = Values::Doubles(vec![-1.0E34]);
        assert_eq!(
            Values::from_be_bytes(NcType::Double, &doubles.to_be_bytes()),
            doubles
        );
    }

    #[test]
    fn padded_rows_become_strings() {
        let chars = b"33RO\0\0\0\0ab  \0\0\0\0\0\0\0\0\0\0\0\0";
        assert_eq!(text_rows(chars, 8), vec!["33RO", "ab", ""]);
    }

    #[test]
    fn type_codes() {
        for nc_type in [
            NcType::Byte,
            NcType::Char,
            NcType::Short,
            NcType::Int,
            NcType::Float,
            NcType::Double,
        ] {
            assert_eq!(NcType::from_code(nc_type.code()), Some(nc_type));
        }
        assert_eq!(NcType::from_code(7), None);
    }
}
