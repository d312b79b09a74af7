//! Typed readers over a [RawColumn]
//!
//! These are convenience decoders, they do not look at the field type:
//! calling [RawColumn::numerics] on a character column is allowed and
//! simply fails on the first value that is not a number.

use byteorder::{LittleEndian, ReadBytesExt};
use time::{PrimitiveDateTime, Time};

use super::RawColumn;
use crate::field::types::Date;
use crate::reading::TrimOption;
use crate::{Error, ErrorKind};

const TIMESTAMP_SIZE: usize = 8;
const DATE_SIZE: usize = 8;
const MILLIS_PER_DAY: u32 = 24 * 60 * 60 * 1000;

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(|b| *b == b' ' || *b == 0)
}

impl RawColumn {
    /// Character values, decoded as UTF-8 (invalid sequences are replaced).
    ///
    /// A value that is empty once trimmed is `None`.
    pub fn characters(&self, trim: TrimOption) -> Vec<Option<String>> {
        self.iter()
            .map(|bytes| {
                let value = String::from_utf8_lossy(bytes);
                let trimmed = trim.trim(&value);
                if trimmed.trim_matches(|c| c == ' ' || c == '\0').is_empty() {
                    None
                } else {
                    Some(trimmed.to_owned())
                }
            })
            .collect()
    }

    /// Numeric ('N' and 'F') values
    ///
    /// Blank values and values made only of `*` (overflow marker) are `None`.
    pub fn numerics(&self) -> Result<Vec<Option<f64>>, Error> {
        self.iter()
            .enumerate()
            .map(|(i, bytes)| {
                if is_blank(bytes) || bytes.iter().all(|b| *b == b'*') {
                    return Ok(None);
                }
                let value = String::from_utf8_lossy(bytes);
                value
                    .trim_matches(|c| c == ' ' || c == '\0')
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|e| Error::new(ErrorKind::from(e)).at_record(i))
            })
            .collect()
    }

    /// Logical values, `?` or anything unknown is `None`
    pub fn logicals(&self) -> Vec<Option<bool>> {
        self.iter()
            .map(|bytes| match bytes.first() {
                Some(b'T' | b't' | b'Y' | b'y' | b'1') => Some(true),
                Some(b'F' | b'f' | b'N' | b'n' | b'0') => Some(false),
                _ => None,
            })
            .collect()
    }

    /// Date values stored as `YYYYMMDD` text
    ///
    /// Blank values and `00000000` are `None`.
    pub fn dates(&self) -> Result<Vec<Option<Date>>, Error> {
        self.expect_width(DATE_SIZE)?;
        self.iter()
            .enumerate()
            .map(|(i, bytes)| {
                if is_blank(bytes) || bytes.iter().all(|b| *b == b'0') {
                    return Ok(None);
                }
                String::from_utf8_lossy(bytes)
                    .parse::<Date>()
                    .map(Some)
                    .map_err(|kind| Error::new(kind).at_record(i))
            })
            .collect()
    }

    /// Date-time values stored as two little endian 32 bits integers:
    /// the julian day number then the milliseconds since midnight.
    ///
    /// A value with both integers at 0 is `None`.
    pub fn timestamps(&self) -> Result<Vec<Option<PrimitiveDateTime>>, Error> {
        self.expect_width(TIMESTAMP_SIZE)?;
        self.iter()
            .enumerate()
            .map(|(i, bytes)| read_timestamp(bytes).map_err(|kind| Error::new(kind).at_record(i)))
            .collect()
    }

    fn expect_width(&self, expected: usize) -> Result<(), Error> {
        if self.width != expected && !self.is_empty() {
            return Err(ErrorKind::IncompatibleWidth {
                expected,
                actual: self.width,
            }
            .into());
        }
        Ok(())
    }
}

fn read_timestamp(mut bytes: &[u8]) -> Result<Option<PrimitiveDateTime>, ErrorKind> {
    let julian_day = bytes.read_i32::<LittleEndian>()?;
    let millis = bytes.read_u32::<LittleEndian>()?;
    debug_assert!(bytes.is_empty());
    if julian_day == 0 && millis == 0 {
        return Ok(None);
    }

    if millis >= MILLIS_PER_DAY {
        return Err(ErrorKind::InvalidDate);
    }

    let date = time::Date::from_julian_day(julian_day).map_err(|_| ErrorKind::InvalidDate)?;
    let (seconds, millis) = (millis / 1000, millis % 1000);
    let time = Time::from_hms_milli(
        (seconds / 3600) as u8,
        ((seconds / 60) % 60) as u8,
        (seconds % 60) as u8,
        millis as u16,
    )
    .map_err(|_| ErrorKind::InvalidDate)?;
    Ok(Some(PrimitiveDateTime::new(date, time)))
}
