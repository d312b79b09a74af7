use crate::FieldInfo;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The version number in the first byte is not dBase III, IV or V
    #[error("unsupported dBase version byte {0:#04x}")]
    UnsupportedVersion(u8),
    /// The source is shorter than what the header or layout requires
    #[error("truncated input: needed {needed} bytes, only {available} available")]
    TruncatedInput { needed: u64, available: u64 },
    /// The field descriptor array is not terminated where the header says it is
    #[error("malformed field descriptor table: {0}")]
    MalformedDescriptorTable(String),
    /// The sum of the field lengths (plus the deletion flag) does not match
    /// the record length declared in the header
    #[error("record length mismatch: header declares {declared}, fields sum to {derived}")]
    RecordLengthMismatch { declared: u16, derived: usize },
    /// The requested column does not exist
    #[error("column index {index} out of range ({num_fields} fields)")]
    ColumnIndexOutOfRange { index: i64, num_fields: usize },
    /// No field has the requested name
    #[error("no field named '{0}'")]
    FieldNotFound(String),
    /// Wrapper to forward errors when trying to parse a float from the file
    #[error("invalid numeric value: {0}")]
    ParseFloatError(#[from] std::num::ParseFloatError),
    /// Wrapper to forward errors when trying to parse an integer value from the file
    #[error("invalid integer value: {0}")]
    ParseIntError(#[from] std::num::ParseIntError),
    /// The digits form a date that does not exist in the calendar
    #[error("invalid date")]
    InvalidDate,
    /// The column width does not match what the typed reader needs
    #[error("column width is {actual}, expected {expected}")]
    IncompatibleWidth { expected: usize, actual: usize },
    /// Wrapper of `std::io::Error`, only produced when opening files
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// The error type for this crate
pub struct Error {
    pub(crate) record_num: usize,
    pub(crate) field: Option<FieldInfo>,
    pub(crate) kind: ErrorKind,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Self {
        Self {
            record_num: 0,
            field: None,
            kind,
        }
    }

    pub(crate) fn with_field(mut self, field: FieldInfo) -> Self {
        self.field = Some(field);
        self
    }

    pub(crate) fn at_record(mut self, record_num: usize) -> Self {
        self.record_num = record_num;
        self
    }

    pub(crate) fn truncated(needed: u64, available: usize) -> Self {
        Self::new(ErrorKind::TruncatedInput {
            needed,
            available: available as u64,
        })
    }

    pub(crate) fn malformed_descriptors<S: Into<String>>(msg: S) -> Self {
        Self::new(ErrorKind::MalformedDescriptorTable(msg.into()))
    }

    /// Returns the kind of error that happened
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the index of the record for which the error occurred
    ///
    /// 0 may be the first record or an error that occurred before
    /// handling the first record (eg: an error reading the header)
    pub fn record_num(&self) -> usize {
        self.record_num
    }

    /// Returns the information of the field for which the error occurred
    pub fn field(&self) -> &Option<FieldInfo> {
        &self.field
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::new(ErrorKind::IoError(e))
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(field_info) = &self.field {
            write!(
                f,
                "Error {{ record_num: {}, kind: {:?}, {} }}",
                self.record_num, self.kind, field_info
            )
        } else {
            write!(
                f,
                "Error {{ record_num: {}, kind: {:?} }}",
                self.record_num, self.kind
            )
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field_info) => write!(
                f,
                "{} (field '{}', record {})",
                self.kind,
                field_info.name(),
                self.record_num
            ),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
