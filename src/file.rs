use std::fmt::{Debug, Formatter};
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::reading::ReadingOptions;
use crate::{Error, Table};

/// Read-only memory map of a .dbf file.
///
/// The map is what [Table]s borrow from, so it outlives
/// every column extracted through them.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), dbase_raw::Error> {
/// let file = dbase_raw::DbfFile::open("stations.dbf")?;
/// let table = file.table()?;
///
/// for field in table.fields() {
///     println!("{} {} {}", field.name(), field.field_type(), field.length());
/// }
/// # Ok(())
/// # }
/// ```
pub struct DbfFile {
    path: PathBuf,
    mmap: Mmap,
}

impl Debug for DbfFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbfFile")
            .field("path", &self.path)
            .field("len", &self.mmap.len())
            .finish()
    }
}

impl DbfFile {
    /// Maps the file at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_owned();
        let file = std::fs::File::open(&path)?;
        // Safety: the map is read-only, the file must not be truncated
        // by someone else while it is mapped.
        let mmap = unsafe { Mmap::map(&file)? };
        tracing::debug!(path = %path.display(), len = mmap.len(), "mapped dbase file");
        Ok(Self { path, mmap })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap
    }

    /// Validates the file with the default options
    pub fn table(&self) -> Result<Table<'_>, Error> {
        Table::new(&self.mmap)
    }

    pub fn table_with_options(&self, options: ReadingOptions) -> Result<Table<'_>, Error> {
        Table::with_options(&self.mmap, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn open_maps_whole_file() {
        let mut bytes = vec![0u8; 32];
        bytes[0] = 0x05;
        bytes[8..10].copy_from_slice(&33u16.to_le_bytes());
        bytes[10..12].copy_from_slice(&1u16.to_le_bytes());
        bytes.push(0x0D);

        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&bytes).unwrap();
        tmp.flush().unwrap();

        let file = DbfFile::open(tmp.path()).unwrap();
        assert_eq!(file.as_bytes(), &bytes[..]);
        let table = file.table().unwrap();
        assert!(table.fields().is_empty());
        assert_eq!(table.num_records(), 0);
    }

    #[test]
    fn missing_file() {
        let error = DbfFile::open("does/not/exist.dbf").unwrap_err();
        assert!(matches!(error.kind(), crate::ErrorKind::IoError(_)));
    }
}
