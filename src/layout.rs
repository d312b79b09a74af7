//! Position of each field inside a record

use crate::field::{FieldIndex, FieldInfo, DELETION_FLAG_SIZE};
use crate::{Error, ErrorKind};

/// Where one field lives inside a record
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FieldSpan {
    /// Byte offset from the start of the record (the deletion flag is at 0)
    pub offset: usize,
    pub length: usize,
}

/// Offsets of every field within a record, checked against the
/// record length the header declares.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    spans: Vec<FieldSpan>,
    record_length: usize,
}

impl Layout {
    /// Accumulates the field lengths, starting after the deletion flag.
    ///
    /// The total must be exactly `record_length`, otherwise
    /// [ErrorKind::RecordLengthMismatch] is returned with both values.
    pub fn resolve(fields: &[FieldInfo], record_length: u16) -> Result<Self, Error> {
        let mut spans = Vec::with_capacity(fields.len());
        let mut offset = DELETION_FLAG_SIZE;
        for info in fields {
            let length = info.field_length as usize;
            spans.push(FieldSpan { offset, length });
            offset += length;
        }

        if offset != record_length as usize {
            return Err(ErrorKind::RecordLengthMismatch {
                declared: record_length,
                derived: offset,
            }
            .into());
        }

        tracing::debug!(num_fields = spans.len(), record_length, "resolved record layout");
        Ok(Self {
            spans,
            record_length: offset,
        })
    }

    pub fn span(&self, index: FieldIndex) -> Option<FieldSpan> {
        self.spans.get(index.0).copied()
    }

    pub fn spans(&self) -> &[FieldSpan] {
        &self.spans
    }

    pub fn offsets(&self) -> impl Iterator<Item = usize> + '_ {
        self.spans.iter().map(|s| s.offset)
    }

    pub fn num_fields(&self) -> usize {
        self.spans.len()
    }

    /// Size of a record, deletion flag included
    pub fn record_length(&self) -> usize {
        self.record_length
    }
}
