#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

/// Builds .dbf images in memory.
///
/// Header length, record length and record count are derived from the
/// fields and records unless overridden, so tests can break one of them
/// at a time.
pub struct DbfBuilder {
    version: u8,
    fields: Vec<(&'static str, u8, u8, u8)>,
    records: Vec<Vec<u8>>,
    num_records: Option<u32>,
    header_length: Option<u16>,
    record_length: Option<u16>,
    padding: usize,
    terminator: bool,
}

impl DbfBuilder {
    pub fn new() -> Self {
        Self {
            version: 0x03,
            fields: vec![],
            records: vec![],
            num_records: None,
            header_length: None,
            record_length: None,
            padding: 0,
            terminator: true,
        }
    }

    pub fn version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    pub fn field(mut self, name: &'static str, code: u8, length: u8) -> Self {
        self.fields.push((name, code, length, 0));
        self
    }

    pub fn numeric(mut self, name: &'static str, length: u8, decimals: u8) -> Self {
        self.fields.push((name, b'N', length, decimals));
        self
    }

    /// A record, deletion flag included
    pub fn record(mut self, bytes: &[u8]) -> Self {
        self.records.push(bytes.to_vec());
        self
    }

    pub fn num_records(mut self, n: u32) -> Self {
        self.num_records = Some(n);
        self
    }

    pub fn header_length(mut self, n: u16) -> Self {
        self.header_length = Some(n);
        self
    }

    pub fn record_length(mut self, n: u16) -> Self {
        self.record_length = Some(n);
        self
    }

    /// Bytes inserted between the terminator and the first record
    pub fn padding(mut self, n: usize) -> Self {
        self.padding = n;
        self
    }

    pub fn without_terminator(mut self) -> Self {
        self.terminator = false;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let header_length = self
            .header_length
            .unwrap_or((32 + 32 * self.fields.len() + 1 + self.padding) as u16);
        let record_length = self.record_length.unwrap_or(
            1 + self
                .fields
                .iter()
                .map(|(_, _, length, _)| *length as u16)
                .sum::<u16>(),
        );
        let num_records = self.num_records.unwrap_or(self.records.len() as u32);

        let mut dst = Vec::new();
        dst.write_u8(self.version).unwrap();
        dst.write_all(&[124, 10, 16]).unwrap();
        dst.write_u32::<LittleEndian>(num_records).unwrap();
        dst.write_u16::<LittleEndian>(header_length).unwrap();
        dst.write_u16::<LittleEndian>(record_length).unwrap();
        dst.write_all(&[0u8; 20]).unwrap();

        for (name, code, length, decimals) in &self.fields {
            let mut name_bytes = [0u8; 11];
            name_bytes[..name.len()].copy_from_slice(name.as_bytes());
            dst.write_all(&name_bytes).unwrap();
            dst.write_u8(*code).unwrap();
            dst.write_u32::<LittleEndian>(0).unwrap();
            dst.write_u8(*length).unwrap();
            dst.write_u8(*decimals).unwrap();
            dst.write_all(&[0u8; 14]).unwrap();
        }
        dst.write_u8(if self.terminator { 0x0D } else { b' ' }).unwrap();
        dst.write_all(&vec![0u8; self.padding]).unwrap();

        for record in &self.records {
            dst.write_all(record).unwrap();
        }
        dst.write_u8(0x1A).unwrap();
        dst
    }
}

/// Three records of one 4 bytes character field
pub fn abcd_efgh_ijkl() -> Vec<u8> {
    DbfBuilder::new()
        .field("CODE", b'C', 4)
        .record(b" ABCD")
        .record(b" EFGH")
        .record(b" IJKL")
        .build()
}

/// A small table using most field types
pub fn stations() -> Vec<u8> {
    DbfBuilder::new()
        .version(0x04)
        .field("name", b'C', 12)
        .numeric("line", 3, 0)
        .numeric("dist", 7, 2)
        .field("opened", b'D', 8)
        .field("active", b'L', 1)
        .record(station(' ', "Van Dorn", "1", "1.50", "19910415", 'T').as_bytes())
        .record(station('*', "Franconia", "2", "12.00", "19970615", 'F').as_bytes())
        .record(station(' ', "Huntington", "1", "", "00000000", '?').as_bytes())
        .build()
}

fn station(flag: char, name: &str, line: &str, dist: &str, opened: &str, active: char) -> String {
    format!("{}{:<12}{:>3}{:>7}{}{}", flag, name, line, dist, opened, active)
}
