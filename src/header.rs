use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Read;

use crate::field::types::Date;
use crate::reading::VersionCheck;
use crate::{Error, ErrorKind};

/// First byte of the file.
///
/// Plain dBase III, IV and V files have 3, 4 or 5 here. Some writers
/// also set the memo bit (0x80) on dBase III and IV files, other values
/// belong to formats with a different layout (FoxPro, SQL tables, ...).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FileType(pub(crate) u8);

impl FileType {
    /// The dBase version, `None` for bytes this crate does not know
    pub fn version_number(self) -> Option<u8> {
        match self.0 {
            0x03 | 0x83 => Some(3),
            0x04 | 0x8B => Some(4),
            0x05 => Some(5),
            _ => None,
        }
    }

    pub fn raw(self) -> u8 {
        self.0
    }

    pub fn has_memo(self) -> bool {
        matches!(self.0, 0x83 | 0x8B)
    }

    pub fn is_supported(self, check: VersionCheck) -> bool {
        match check {
            VersionCheck::Strict => matches!(self.0, 0x03..=0x05),
            VersionCheck::AcceptMemoVariants => self.version_number().is_some(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TableFlags(pub(crate) u8);

impl TableFlags {
    /// dBase IV and later: a production .mdx index exists
    pub fn has_production_index(self) -> bool {
        (self.0 & 0x01) != 0
    }
}

/// The 32 bytes block at the start of every file
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Header {
    pub file_type: FileType,
    /// Raw YY/MM/DD, years counted from 1900
    pub last_update: [u8; 3],
    pub num_records: u32,
    /// Total size of the header, descriptors and terminator
    pub offset_to_first_record: u16,
    /// Size of one record, deletion flag included
    pub size_of_record: u16,
    pub is_transaction_incomplete: bool,
    pub encryption_flag: u8,
    pub table_flags: TableFlags,
    pub language_driver: u8,
}

impl Header {
    pub(crate) const SIZE: usize = 32;

    /// Decodes the header found at the start of `bytes`
    ///
    /// Fails with [ErrorKind::TruncatedInput] if less than 32 bytes
    /// are available, and with [ErrorKind::UnsupportedVersion] unless the
    /// first byte is 3, 4 or 5.
    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        Self::parse_with(bytes, VersionCheck::Strict)
    }

    /// Same as [Self::parse], `check` selects the accepted first bytes
    pub fn parse_with(bytes: &[u8], check: VersionCheck) -> Result<Self, Error> {
        if bytes.len() < Self::SIZE {
            return Err(Error::truncated(Self::SIZE as u64, bytes.len()));
        }
        let mut source = &bytes[..Self::SIZE];
        let header = Self::read_from(&mut source)
            .map_err(|_| Error::truncated(Self::SIZE as u64, bytes.len()))?;

        if !header.file_type.is_supported(check) {
            return Err(ErrorKind::UnsupportedVersion(header.file_type.raw()).into());
        }

        tracing::debug!(
            version = ?header.file_type.version_number(),
            raw_version = header.file_type.raw(),
            num_records = header.num_records,
            header_length = header.offset_to_first_record,
            record_length = header.size_of_record,
            "parsed dbase header"
        );
        Ok(header)
    }

    fn read_from<T: Read>(source: &mut T) -> std::io::Result<Self> {
        let file_type = FileType(source.read_u8()?);

        let mut last_update = [0u8; 3];
        source.read_exact(&mut last_update)?;

        let num_records = source.read_u32::<LittleEndian>()?;
        let offset_to_first_record = source.read_u16::<LittleEndian>()?;
        let size_of_record = source.read_u16::<LittleEndian>()?;

        let _reserved = source.read_u16::<LittleEndian>()?;

        let is_transaction_incomplete = source.read_u8()? != 0;
        let encryption_flag = source.read_u8()?;

        // multi-user / LAN bytes
        let mut _reserved = [0u8; 12];
        source.read_exact(&mut _reserved)?;

        let table_flags = TableFlags(source.read_u8()?);
        let language_driver = source.read_u8()?;

        let _reserved = source.read_u16::<LittleEndian>()?;

        Ok(Self {
            file_type,
            last_update,
            num_records,
            offset_to_first_record,
            size_of_record,
            is_transaction_incomplete,
            encryption_flag,
            table_flags,
            language_driver,
        })
    }

    /// The last update date, `None` when the bytes do not form a valid date
    pub fn last_update_date(&self) -> Option<Date> {
        let [yy, mm, dd] = self.last_update;
        Date::try_new(1900 + u32::from(yy), u32::from(mm), u32::from(dd))
    }

    /// Byte position of the record at `index`, `None` if there is no such record
    pub(crate) fn record_position(&self, index: usize) -> Option<usize> {
        if index >= self.num_records as usize {
            None
        } else {
            Some(
                self.offset_to_first_record as usize + index * self.size_of_record as usize,
            )
        }
    }
}
