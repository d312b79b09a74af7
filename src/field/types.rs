use std::str::FromStr;

use crate::ErrorKind;

/// Enum listing the field type codes we know of
///
/// Codes that are not listed here are kept as `Unknown`,
/// the column bytes can still be extracted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldType {
    // dBASE III
    Character,
    Date,
    Numeric,
    Logical,
    Memo,
    // dBASE IV
    Float,
    // dBASE V / 7
    Binary,
    General,
    Timestamp,
    // Visual FoxPro, seen in files that otherwise look like dBase III
    DateTime,
    Unknown(u8),
}

impl From<u8> for FieldType {
    fn from(code: u8) -> Self {
        match code {
            b'C' => FieldType::Character,
            b'D' => FieldType::Date,
            b'N' => FieldType::Numeric,
            b'L' => FieldType::Logical,
            b'M' => FieldType::Memo,
            b'F' => FieldType::Float,
            b'B' => FieldType::Binary,
            b'G' => FieldType::General,
            b'@' => FieldType::Timestamp,
            b'T' => FieldType::DateTime,
            other => FieldType::Unknown(other),
        }
    }
}

impl From<FieldType> for u8 {
    fn from(t: FieldType) -> Self {
        match t {
            FieldType::Character => b'C',
            FieldType::Date => b'D',
            FieldType::Numeric => b'N',
            FieldType::Logical => b'L',
            FieldType::Memo => b'M',
            FieldType::Float => b'F',
            FieldType::Binary => b'B',
            FieldType::General => b'G',
            FieldType::Timestamp => b'@',
            FieldType::DateTime => b'T',
            FieldType::Unknown(code) => code,
        }
    }
}

impl FieldType {
    /// The one-letter code as written in the field descriptor
    pub fn code(self) -> char {
        u8::from(self) as char
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// dBase representation of date
///
/// # Note
///
/// This is a naive date, it holds the year, month and day.
/// dBase files do not have concept of timezones.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Date {
    pub(crate) year: u32,
    pub(crate) month: u32,
    pub(crate) day: u32,
}

impl Date {
    /// Creates a date, `None` if it does not exist in the calendar
    pub fn try_new(year: u32, month: u32, day: u32) -> Option<Self> {
        let date = Self { year, month, day };
        time::Date::try_from(date).ok().map(|_| date)
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }
}

impl TryFrom<Date> for time::Date {
    type Error = ErrorKind;

    fn try_from(d: Date) -> Result<Self, Self::Error> {
        let month = u8::try_from(d.month)
            .ok()
            .and_then(|m| time::Month::try_from(m).ok())
            .ok_or(ErrorKind::InvalidDate)?;
        let day = u8::try_from(d.day).map_err(|_| ErrorKind::InvalidDate)?;
        let year = i32::try_from(d.year).map_err(|_| ErrorKind::InvalidDate)?;
        time::Date::from_calendar_date(year, month, day).map_err(|_| ErrorKind::InvalidDate)
    }
}

impl From<time::Date> for Date {
    fn from(d: time::Date) -> Self {
        Self {
            year: d.year() as u32,
            month: u8::from(d.month()) as u32,
            day: u32::from(d.day()),
        }
    }
}

impl FromStr for Date {
    type Err = ErrorKind;

    /// Parses the `YYYYMMDD` text representation
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // u32::from_str alone would accept a leading '+'
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ErrorKind::InvalidDate);
        }
        let year = s[0..4].parse::<u32>()?;
        let month = s[4..6].parse::<u32>()?;
        let day = s[6..8].parse::<u32>()?;

        Date::try_new(year, month, day).ok_or(ErrorKind::InvalidDate)
    }
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}
