//! Extraction of the verbatim bytes of one field across all records

mod values;

use crate::field::FieldIndex;
use crate::header::Header;
use crate::layout::{FieldSpan, Layout};
use crate::{Error, ErrorKind};

/// The bytes of one field for every record, row-major.
///
/// Nothing is decoded, trimmed or converted: slot `i` holds exactly
/// the `width` bytes stored in record `i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawColumn {
    data: Vec<u8>,
    width: usize,
    len: usize,
}

impl RawColumn {
    /// Copies the column `index` out of `bytes`.
    ///
    /// Before copying anything, the end of the last record is checked
    /// against the length of `bytes`: a header claiming more records than the
    /// source holds gives [ErrorKind::TruncatedInput] for every column, with
    /// [Error::record_num] set to the first record that does not fully fit.
    /// A `layout` resolved for another record length gives
    /// [ErrorKind::RecordLengthMismatch].
    pub fn extract(
        bytes: &[u8],
        header: &Header,
        layout: &Layout,
        index: FieldIndex,
    ) -> Result<Self, Error> {
        let span = layout
            .span(index)
            .ok_or(ErrorKind::ColumnIndexOutOfRange {
                index: index.0 as i64,
                num_fields: layout.num_fields(),
            })?;
        if layout.record_length() != header.size_of_record as usize {
            return Err(ErrorKind::RecordLengthMismatch {
                declared: header.size_of_record,
                derived: layout.record_length(),
            }
            .into());
        }
        let data = copy_span(bytes, header, span)?;
        Ok(Self {
            data,
            width: span.length,
            len: header.num_records as usize,
        })
    }

    /// Size of one value in bytes
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of values, one per record
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The whole buffer, `len() * width()` bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// The bytes of record `index`
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        if index >= self.len {
            return None;
        }
        let start = index * self.width;
        Some(&self.data[start..start + self.width])
    }

    /// Iterates over the values, also works for zero-width fields
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        (0..self.len).map(move |i| &self.data[i * self.width..(i + 1) * self.width])
    }
}

/// Copies `span` out of every record, after a single bounds check.
///
/// The check covers every record up to its last byte, so a source too
/// short for the records the header announces fails whatever the span.
/// `span` must lie within a record.
pub(crate) fn copy_span(bytes: &[u8], header: &Header, span: FieldSpan) -> Result<Vec<u8>, Error> {
    let num_records = header.num_records as u64;
    if num_records == 0 {
        return Ok(Vec::new());
    }
    debug_assert!(span.offset + span.length <= header.size_of_record as usize);

    // u64 cannot overflow here: u32 records * u16 record length
    let start = u64::from(header.offset_to_first_record);
    let record_length = u64::from(header.size_of_record);
    let end = start + num_records * record_length;

    let available = bytes.len() as u64;
    if end > available {
        let first_missing = if available < start || record_length == 0 {
            0
        } else {
            (available - start) / record_length
        };
        return Err(Error::truncated(end, bytes.len()).at_record(first_missing as usize));
    }

    // every position is now known to fit in `bytes`, hence in usize
    let start = start as usize + span.offset;
    let record_length = record_length as usize;
    let mut data = Vec::with_capacity(num_records as usize * span.length);
    for i in 0..num_records as usize {
        let pos = start + i * record_length;
        data.extend_from_slice(&bytes[pos..pos + span.length]);
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldsInfo;
    use crate::reading::DescriptorCheck;

    /// 3 records, a 4 bytes field followed by a 2 bytes one
    fn sample() -> Vec<u8> {
        let mut bytes = vec![0u8; 32];
        bytes[0] = 0x03;
        bytes[4..8].copy_from_slice(&3u32.to_le_bytes());
        bytes[8..10].copy_from_slice(&97u16.to_le_bytes());
        bytes[10..12].copy_from_slice(&7u16.to_le_bytes());
        for (name, length) in [(b"A", 4u8), (b"B", 2u8)] {
            let mut descriptor = [0u8; 32];
            descriptor[0] = name[0];
            descriptor[11] = b'C';
            descriptor[16] = length;
            bytes.extend_from_slice(&descriptor);
        }
        bytes.push(0x0D);
        for record in [b" ABCD12", b"*EFGH34", b" IJKL56"] {
            bytes.extend_from_slice(record);
        }
        bytes.push(0x1A);
        bytes
    }

    fn parts(bytes: &[u8]) -> (Header, Layout) {
        let header = Header::parse(bytes).unwrap();
        let fields =
            FieldsInfo::parse(bytes, header.offset_to_first_record, DescriptorCheck::Strict).unwrap();
        let layout = Layout::resolve(&fields, header.size_of_record).unwrap();
        (header, layout)
    }

    #[test]
    fn extracts_consecutive_values() {
        let bytes = sample();
        let (header, layout) = parts(&bytes);

        let column = RawColumn::extract(&bytes, &header, &layout, FieldIndex(0)).unwrap();
        assert_eq!(column.as_bytes(), b"ABCDEFGHIJKL");
        assert_eq!(column.len(), 3);
        assert_eq!(column.width(), 4);
        assert_eq!(column.get(1), Some(&b"EFGH"[..]));
        assert_eq!(column.get(3), None);

        let column = RawColumn::extract(&bytes, &header, &layout, FieldIndex(1)).unwrap();
        assert_eq!(column.iter().collect::<Vec<_>>(), vec![b"12", b"34", b"56"]);
    }

    #[test]
    fn extraction_is_idempotent() {
        let bytes = sample();
        let (header, layout) = parts(&bytes);
        let first = RawColumn::extract(&bytes, &header, &layout, FieldIndex(1)).unwrap();
        let second = RawColumn::extract(&bytes, &header, &layout, FieldIndex(1)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn index_out_of_range() {
        let bytes = sample();
        let (header, layout) = parts(&bytes);
        let error = RawColumn::extract(&bytes, &header, &layout, FieldIndex(2)).unwrap_err();
        match error.kind() {
            ErrorKind::ColumnIndexOutOfRange { index, num_fields } => {
                assert_eq!(*index, 2);
                assert_eq!(*num_fields, 2);
            }
            kind => panic!("unexpected error kind {:?}", kind),
        }
    }

    #[test]
    fn truncated_source() {
        let bytes = sample();
        let (header, layout) = parts(&bytes);

        // without the end of file marker the last record ends exactly at the end
        let exact = &bytes[..bytes.len() - 1];
        for index in [FieldIndex(0), FieldIndex(1)] {
            assert!(RawColumn::extract(exact, &header, &layout, index).is_ok());
        }

        // the last record loses its final 2 bytes, which belong to the second
        // field, the first field of that record is still there
        let short = &bytes[..bytes.len() - 3];
        for index in [FieldIndex(0), FieldIndex(1)] {
            let error = RawColumn::extract(short, &header, &layout, index).unwrap_err();
            match error.kind() {
                ErrorKind::TruncatedInput { needed, available } => {
                    assert_eq!(*needed, 97 + 3 * 7);
                    assert_eq!(*available, short.len() as u64);
                }
                kind => panic!("unexpected error kind {:?}", kind),
            }
            assert_eq!(error.record_num(), 2);
        }

        let error = RawColumn::extract(&bytes[..97], &header, &layout, FieldIndex(0)).unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::TruncatedInput { .. }));
        assert_eq!(error.record_num(), 0);

        let error = RawColumn::extract(&bytes[..50], &header, &layout, FieldIndex(0)).unwrap_err();
        assert_eq!(error.record_num(), 0);
    }

    #[test]
    fn short_by_one_byte() {
        // 2 records of a 4 bytes then a 3 bytes field, cut inside the data region
        let mut bytes = vec![0u8; 32];
        bytes[0] = 0x03;
        bytes[4..8].copy_from_slice(&2u32.to_le_bytes());
        bytes[8..10].copy_from_slice(&97u16.to_le_bytes());
        bytes[10..12].copy_from_slice(&8u16.to_le_bytes());
        for (name, length) in [(b"A", 4u8), (b"B", 3u8)] {
            let mut descriptor = [0u8; 32];
            descriptor[0] = name[0];
            descriptor[11] = b'C';
            descriptor[16] = length;
            bytes.extend_from_slice(&descriptor);
        }
        bytes.push(0x0D);
        bytes.extend_from_slice(b" abcd123 efgh456");
        let (header, layout) = parts(&bytes);
        assert!(RawColumn::extract(&bytes, &header, &layout, FieldIndex(0)).is_ok());

        let short = &bytes[..bytes.len() - 2];
        let error = RawColumn::extract(short, &header, &layout, FieldIndex(0)).unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::TruncatedInput { .. }));
        assert_eq!(error.record_num(), 1);
    }

    #[test]
    fn layout_of_another_record_length() {
        let bytes = sample();
        let (mut header, layout) = parts(&bytes);
        header.size_of_record = 8;
        let error = RawColumn::extract(&bytes, &header, &layout, FieldIndex(0)).unwrap_err();
        assert!(matches!(
            error.kind(),
            ErrorKind::RecordLengthMismatch {
                declared: 8,
                derived: 7
            }
        ));
    }

    #[test]
    fn no_records() {
        let mut bytes = sample();
        bytes[4..8].copy_from_slice(&0u32.to_le_bytes());
        bytes.truncate(97);
        let (header, layout) = parts(&bytes);
        let column = RawColumn::extract(&bytes, &header, &layout, FieldIndex(0)).unwrap();
        assert!(column.is_empty());
        assert!(column.as_bytes().is_empty());
    }

    #[test]
    fn zero_width_column() {
        let column = RawColumn {
            data: Vec::new(),
            width: 0,
            len: 3,
        };
        assert_eq!(column.iter().count(), 3);
        assert!(column.iter().all(|v| v.is_empty()));
        assert_eq!(column.get(2), Some(&b""[..]));
    }
}
