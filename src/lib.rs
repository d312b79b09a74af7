//! dbase_raw reads the layout of dBase III, IV and V (.dbf) files
//! and extracts columns as raw bytes.
//!
//! A .dbf stores its size information three times: the record length in the
//! header, the length of every field in the field descriptors, and the header
//! length. A [Table] checks that all three agree before any column is read,
//! and every column extraction checks the source is long enough for the
//! records the header announces.
//!
//! Nothing is decoded unless asked for: a [RawColumn] holds the verbatim bytes
//! of a field for every record, the typed readers ([RawColumn::numerics],
//! [RawColumn::dates], ...) are optional post-processing.
//!
//! # Examples
//!
//! The four steps can be called one by one:
//!
//! ```
//! # fn main() -> Result<(), dbase_raw::Error> {
//! # let mut bytes = vec![0x03, 0, 0, 0, 3, 0, 0, 0, 65, 0, 5, 0];
//! # bytes.resize(32, 0);
//! # let mut descriptor = [0u8; 32];
//! # descriptor[..4].copy_from_slice(b"CODE");
//! # descriptor[11] = b'C';
//! # descriptor[16] = 4;
//! # bytes.extend_from_slice(&descriptor);
//! # bytes.push(0x0D);
//! # bytes.extend_from_slice(b" ABCD EFGH IJKL");
//! use dbase_raw::FieldIndex;
//!
//! let header = dbase_raw::parse_header(&bytes)?;
//! let fields = dbase_raw::parse_descriptors(&bytes, header.offset_to_first_record)?;
//! let layout = dbase_raw::resolve_layout(&fields, header.size_of_record)?;
//! let column = dbase_raw::extract_column(&bytes, &header, &layout, FieldIndex(0))?;
//!
//! assert_eq!(column.as_bytes(), b"ABCDEFGHIJKL");
//! # Ok(())
//! # }
//! ```
//!
//! Or a [DbfFile] can map a file and give a [Table] to work with:
//!
//! ```no_run
//! # fn main() -> Result<(), dbase_raw::Error> {
//! let file = dbase_raw::DbfFile::open("tests/data/stations.dbf")?;
//! let table = file.table()?;
//! let names = table.column_by_name("name")?;
//! for name in names.characters(dbase_raw::TrimOption::BeginEnd) {
//!     println!("{:?}", name);
//! }
//! # Ok(())
//! # }
//! ```

use std::path::Path;

mod column;
mod error;
pub mod export;
mod field;
mod file;
mod header;
mod layout;
mod reading;
mod table;

pub use crate::column::RawColumn;
pub use crate::error::{Error, ErrorKind};
pub use crate::export::{write_csv, CsvOptions};
pub use crate::field::types::{Date, FieldType};
pub use crate::field::{DeletionFlag, FieldIndex, FieldInfo, FieldsInfo};
pub use crate::file::DbfFile;
pub use crate::header::{FileType, Header, TableFlags};
pub use crate::layout::{FieldSpan, Layout};
pub use crate::reading::{DescriptorCheck, ReadingOptions, TrimOption, VersionCheck};
pub use crate::table::Table;

/// Decodes the 32 bytes header at the start of `bytes`,
/// the first byte must be 3, 4 or 5
pub fn parse_header(bytes: &[u8]) -> Result<Header, Error> {
    Header::parse(bytes)
}

/// Reads the field descriptors, requiring the terminator to be
/// exactly at `header_length - 1`
pub fn parse_descriptors(bytes: &[u8], header_length: u16) -> Result<FieldsInfo, Error> {
    FieldsInfo::parse(bytes, header_length, DescriptorCheck::Strict)
}

/// Computes the offset of every field and checks the declared record length
pub fn resolve_layout(fields: &[FieldInfo], record_length: u16) -> Result<Layout, Error> {
    Layout::resolve(fields, record_length)
}

/// Copies the bytes of one column across all records
pub fn extract_column(
    bytes: &[u8],
    header: &Header,
    layout: &Layout,
    index: FieldIndex,
) -> Result<RawColumn, Error> {
    RawColumn::extract(bytes, header, layout, index)
}

/// One liner to read a column of a .dbf file by name
///
/// ```no_run
/// let codes = dbase_raw::read_column("tests/data/stations.dbf", "line").unwrap();
/// println!("{} values of {} bytes", codes.len(), codes.width());
/// ```
pub fn read_column<P: AsRef<Path>>(path: P, name: &str) -> Result<RawColumn, Error> {
    let file = DbfFile::open(path)?;
    let table = file.table()?;
    table.column_by_name(name)
}
