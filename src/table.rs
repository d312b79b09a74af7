use rayon::prelude::*;

use crate::column::{copy_span, RawColumn};
use crate::field::{DeletionFlag, FieldIndex, FieldsInfo};
use crate::header::Header;
use crate::layout::{FieldSpan, Layout};
use crate::reading::ReadingOptions;
use crate::{Error, ErrorKind, FieldInfo};

/// Validated view over the bytes of a whole .dbf file.
///
/// The header, the field descriptors and the record layout are parsed and
/// cross-checked once, when the table is created. Columns are then
/// extracted on demand; since the table only reads the borrowed bytes,
/// it can be shared between threads to extract several columns at once.
///
/// # Example
///
/// ```
/// # fn main() -> Result<(), dbase_raw::Error> {
/// # let mut bytes = vec![0x03, 0, 0, 0, 2, 0, 0, 0, 65, 0, 4, 0];
/// # bytes.resize(32, 0);
/// # let mut descriptor = [0u8; 32];
/// # descriptor[..4].copy_from_slice(b"CODE");
/// # descriptor[11] = b'C';
/// # descriptor[16] = 3;
/// # bytes.extend_from_slice(&descriptor);
/// # bytes.push(0x0D);
/// # bytes.extend_from_slice(b" abc*def");
/// let table = dbase_raw::Table::new(&bytes)?;
/// assert_eq!(table.num_records(), 2);
///
/// let codes = table.column_by_name("code")?;
/// assert_eq!(codes.as_bytes(), b"abcdef");
///
/// let deleted = table.deletion_flags()?;
/// assert!(!deleted[0].is_deleted());
/// assert!(deleted[1].is_deleted());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Table<'a> {
    bytes: &'a [u8],
    header: Header,
    fields_info: FieldsInfo,
    layout: Layout,
    options: ReadingOptions,
}

impl<'a> Table<'a> {
    /// Parses and validates the table with the default (strict) options
    pub fn new(bytes: &'a [u8]) -> Result<Self, Error> {
        Self::with_options(bytes, ReadingOptions::default())
    }

    pub fn with_options(bytes: &'a [u8], options: ReadingOptions) -> Result<Self, Error> {
        let header = Header::parse_with(bytes, options.version_check)?;
        let fields_info =
            FieldsInfo::parse(bytes, header.offset_to_first_record, options.descriptor_check)?;
        let layout = Layout::resolve(&fields_info, header.size_of_record)?;

        Ok(Self {
            bytes,
            header,
            fields_info,
            layout,
            options,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns the information about fields present in the records
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields_info
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn options(&self) -> ReadingOptions {
        self.options
    }

    /// The bytes the table reads from
    pub fn source(&self) -> &'a [u8] {
        self.bytes
    }

    /// Returns the number of records declared in the header
    pub fn num_records(&self) -> usize {
        self.header.num_records as usize
    }

    /// Returns the field index that corresponds to the given name
    pub fn field_index(&self, name: &str) -> Option<FieldIndex> {
        self.fields_info.index_of(name)
    }

    /// Extracts the raw bytes of the column at `index`
    pub fn column(&self, index: FieldIndex) -> Result<RawColumn, Error> {
        RawColumn::extract(self.bytes, &self.header, &self.layout, index).map_err(|error| {
            match self.fields_info.get(index.0) {
                Some(info) => error.with_field(*info),
                None => error,
            }
        })
    }

    /// Same as [Self::column] for callers holding a signed index,
    /// negative values are out of range.
    pub fn column_at(&self, index: i64) -> Result<RawColumn, Error> {
        match usize::try_from(index) {
            Ok(index) => self.column(FieldIndex(index)),
            Err(_) => Err(ErrorKind::ColumnIndexOutOfRange {
                index,
                num_fields: self.fields_info.len(),
            }
            .into()),
        }
    }

    /// Extracts the column whose name matches `name`, ignoring ASCII case
    pub fn column_by_name(&self, name: &str) -> Result<RawColumn, Error> {
        let index = self
            .field_index(name)
            .ok_or_else(|| ErrorKind::FieldNotFound(name.to_owned()))?;
        self.column(index)
    }

    /// Extracts several columns in parallel.
    ///
    /// Either every column is returned, or the first error encountered.
    pub fn columns(&self, indices: &[FieldIndex]) -> Result<Vec<RawColumn>, Error> {
        indices
            .par_iter()
            .map(|index| self.column(*index))
            .collect()
    }

    /// Extracts every column, in field order
    pub fn all_columns(&self) -> Result<Vec<RawColumn>, Error> {
        let indices = (0..self.fields_info.len())
            .map(FieldIndex)
            .collect::<Vec<_>>();
        self.columns(&indices)
    }

    /// The deletion flag of every record
    pub fn deletion_flags(&self) -> Result<Vec<DeletionFlag>, Error> {
        let span = FieldSpan {
            offset: 0,
            length: crate::field::DELETION_FLAG_SIZE,
        };
        let flags = copy_span(self.bytes, &self.header, span)?;
        Ok(flags.into_iter().map(DeletionFlag::from_byte).collect())
    }

    /// The bytes of one whole record, deletion flag included.
    ///
    /// Returns None if no record exist for the given index, or if the
    /// source is too short to hold it.
    pub fn record_bytes(&self, index: usize) -> Option<&'a [u8]> {
        let start = self.header.record_position(index)?;
        self.bytes.get(start..start + self.layout.record_length())
    }
}
