use std::borrow::Cow;
use std::io::Read;
use std::ops::Deref;

use byteorder::ReadBytesExt;

pub mod types;

use self::types::FieldType;
use crate::header::Header;
use crate::reading::{DescriptorCheck, TERMINATOR_VALUE};
use crate::Error;

pub(crate) const DELETION_FLAG_SIZE: usize = 1; // 1 byte
/// The name occupies 11 bytes on disk but only 10 are meaningful
const FIELD_NAME_LENGTH: usize = 10;

/// Index to a field in a record
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
pub struct FieldIndex(pub usize);

/// Struct giving the info for a record field
///
/// This is a small value copied out of the descriptor bytes,
/// the name is kept as raw bytes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldInfo {
    pub(crate) name: [u8; FIELD_NAME_LENGTH],
    pub(crate) field_type: FieldType,
    pub(crate) field_length: u8,
    pub(crate) num_decimal_places: u8,
    pub(crate) work_area_id: u8,
    pub(crate) set_fields_flag: u8,
    pub(crate) index_flag: u8,
}

impl FieldInfo {
    pub(crate) const SIZE: usize = 32;

    /// The name, up to the first NUL byte
    ///
    /// Non UTF-8 bytes are replaced, use [Self::name_bytes] to get them verbatim.
    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.name_bytes())
    }

    pub fn name_bytes(&self) -> &[u8] {
        let end = self
            .name
            .iter()
            .position(|b| *b == 0)
            .unwrap_or(FIELD_NAME_LENGTH);
        &self.name[..end]
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn length(&self) -> u8 {
        self.field_length
    }

    pub fn num_decimal_places(&self) -> u8 {
        self.num_decimal_places
    }

    pub fn work_area_id(&self) -> u8 {
        self.work_area_id
    }

    pub fn is_in_set_fields(&self) -> bool {
        self.set_fields_flag != 0
    }

    /// The field is part of the production .mdx index
    pub fn is_indexed(&self) -> bool {
        self.index_flag != 0
    }

    pub(crate) fn read_from<T: Read>(source: &mut T) -> std::io::Result<Self> {
        let mut name = [0u8; FIELD_NAME_LENGTH];
        source.read_exact(&mut name)?;
        let _name_pad = source.read_u8()?;

        let field_type = FieldType::from(source.read_u8()?);

        // field address in memory, meaningless on disk
        let mut _address = [0u8; 4];
        source.read_exact(&mut _address)?;

        let field_length = source.read_u8()?;
        let num_decimal_places = source.read_u8()?;

        let mut _reserved = [0u8; 2];
        source.read_exact(&mut _reserved)?;
        let work_area_id = source.read_u8()?;
        source.read_exact(&mut _reserved)?;
        let set_fields_flag = source.read_u8()?;

        let mut _reserved = [0u8; 7];
        source.read_exact(&mut _reserved)?;
        let index_flag = source.read_u8()?;

        Ok(Self {
            name,
            field_type,
            field_length,
            num_decimal_places,
            work_area_id,
            set_fields_flag,
            index_flag,
        })
    }
}

impl std::fmt::Display for FieldInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FieldInfo {{ Name: {}, Field Type: {}, Length: {} }}",
            self.name(),
            self.field_type,
            self.field_length
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeletionFlag {
    NotDeleted,
    Deleted,
}

impl DeletionFlag {
    pub(crate) const fn from_byte(byte: u8) -> Self {
        match byte {
            0x2A => Self::Deleted,
            // Silently consider other values as not deleted
            _ => Self::NotDeleted,
        }
    }

    pub fn is_deleted(self) -> bool {
        self == Self::Deleted
    }
}

/// The ordered field descriptors of a table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldsInfo {
    pub(crate) inner: Vec<FieldInfo>,
}

impl FieldsInfo {
    /// Scans the descriptors that follow the 32 bytes header.
    ///
    /// The scan stops on the terminator byte (0x0D) found where a descriptor
    /// would start. With [DescriptorCheck::Strict] the terminator must be at
    /// `header_length - 1`, with [DescriptorCheck::Lenient] it may also come
    /// before, but never after.
    pub fn parse(
        bytes: &[u8],
        header_length: u16,
        check: DescriptorCheck,
    ) -> Result<Self, Error> {
        let header_length = header_length as usize;
        let min_length = Header::SIZE + std::mem::size_of::<u8>();

        if header_length < min_length {
            return Err(Error::malformed_descriptors(format!(
                "header length {} is smaller than {}",
                header_length, min_length
            )));
        }
        if check == DescriptorCheck::Strict && (header_length - min_length) % FieldInfo::SIZE != 0
        {
            return Err(Error::malformed_descriptors(format!(
                "header length {} does not end on a descriptor boundary",
                header_length
            )));
        }
        let expected_terminator_pos = header_length - 1;

        let mut inner = Vec::with_capacity((expected_terminator_pos - Header::SIZE) / FieldInfo::SIZE);
        let mut pos = Header::SIZE;
        loop {
            match bytes.get(pos) {
                None => {
                    return Err(Error::malformed_descriptors(format!(
                        "input ends at offset {} before the terminator",
                        pos
                    )))
                }
                Some(&TERMINATOR_VALUE) => break,
                Some(_) => {}
            }
            if pos >= expected_terminator_pos {
                return Err(Error::malformed_descriptors(format!(
                    "no terminator at offset {} (header length {})",
                    expected_terminator_pos, header_length
                )));
            }

            let end = pos + FieldInfo::SIZE;
            let mut source = bytes.get(pos..end).ok_or_else(|| {
                Error::malformed_descriptors(format!(
                    "descriptor at offset {} runs past the end of input",
                    pos
                ))
            })?;
            let info = FieldInfo::read_from(&mut source)
                .map_err(|_| Error::truncated(end as u64, bytes.len()))?;

            if let FieldType::Unknown(code) = info.field_type {
                tracing::warn!(
                    field = %info.name(),
                    code,
                    "unknown field type code, the column can only be read raw"
                );
            }
            inner.push(info);
            pos = end;
        }

        if pos > expected_terminator_pos {
            return Err(Error::malformed_descriptors(format!(
                "terminator at offset {} is past the header length {}",
                pos, header_length
            )));
        }
        if pos < expected_terminator_pos {
            match check {
                DescriptorCheck::Strict => {
                    return Err(Error::malformed_descriptors(format!(
                        "terminator found at offset {} but header length implies {}",
                        pos, expected_terminator_pos
                    )))
                }
                DescriptorCheck::Lenient => tracing::warn!(
                    terminator_pos = pos,
                    header_length,
                    "skipping {} bytes between the descriptor terminator and the first record",
                    expected_terminator_pos - pos
                ),
            }
        }

        tracing::debug!(num_fields = inner.len(), "parsed field descriptors");
        Ok(Self { inner })
    }

    /// Returns the index of the field whose name matches, ignoring ASCII case
    pub fn index_of(&self, name: &str) -> Option<FieldIndex> {
        self.inner
            .iter()
            .position(|info| info.name_bytes().eq_ignore_ascii_case(name.as_bytes()))
            .map(FieldIndex)
    }
}

impl Deref for FieldsInfo {
    type Target = [FieldInfo];

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl AsRef<[FieldInfo]> for FieldsInfo {
    fn as_ref(&self) -> &[FieldInfo] {
        &self.inner
    }
}
