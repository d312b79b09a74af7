//! Dump a whole table as CSV

use std::io::Write;

use crate::{Error, RawColumn, Table};

/// Options for [write_csv]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
    /// Leave out the records whose deletion flag is set
    pub skip_deleted: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            skip_deleted: false,
        }
    }
}

/// Writes the field names, then one line per record.
///
/// Values are the raw field bytes decoded as UTF-8 (lossy) and trimmed
/// according to the table's [crate::ReadingOptions::character_trim].
/// Values containing the delimiter, a quote or a line break are quoted.
pub fn write_csv<W: Write>(table: &Table<'_>, dst: &mut W, options: CsvOptions) -> Result<(), Error> {
    let columns = table.all_columns()?;
    let deleted = if options.skip_deleted {
        Some(table.deletion_flags()?)
    } else {
        None
    };
    let trim = table.options().character_trim;

    let names = table
        .fields()
        .iter()
        .map(|info| info.name().into_owned())
        .collect::<Vec<_>>();
    write_row(dst, names.iter().map(String::as_str), options.delimiter)?;

    let mut num_written = 0usize;
    for record in 0..table.num_records() {
        if deleted
            .as_ref()
            .map_or(false, |flags| flags[record].is_deleted())
        {
            continue;
        }
        let values = columns
            .iter()
            .map(|column| value_of(column, record))
            .collect::<Vec<_>>();
        write_row(dst, values.iter().map(|v| trim.trim(v)), options.delimiter)?;
        num_written += 1;
    }

    tracing::debug!(num_written, num_fields = columns.len(), "wrote csv");
    Ok(())
}

fn value_of(column: &RawColumn, record: usize) -> String {
    column
        .get(record)
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .unwrap_or_default()
}

fn write_row<'a, W, I>(dst: &mut W, values: I, delimiter: u8) -> std::io::Result<()>
where
    W: Write,
    I: Iterator<Item = &'a str>,
{
    for (i, value) in values.enumerate() {
        if i > 0 {
            dst.write_all(&[delimiter])?;
        }
        write_value(dst, value, delimiter)?;
    }
    dst.write_all(b"\n")
}

fn write_value<W: Write>(dst: &mut W, value: &str, delimiter: u8) -> std::io::Result<()> {
    let needs_quotes = value
        .bytes()
        .any(|b| b == delimiter || b == b'"' || b == b'\n' || b == b'\r');
    if !needs_quotes {
        return dst.write_all(value.as_bytes());
    }

    dst.write_all(b"\"")?;
    dst.write_all(value.replace('"', "\"\"").as_bytes())?;
    dst.write_all(b"\"")
}
