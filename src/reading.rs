//! Options that control how strictly a .dbf is validated and how
//! character data is presented.

/// Value of the byte between the last field descriptor and the first record
pub(crate) const TERMINATOR_VALUE: u8 = 0x0D;

/// How the descriptor terminator and the header length must agree
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum DescriptorCheck {
    /// The terminator must sit exactly at `header length - 1`
    #[default]
    Strict,
    /// The terminator may come earlier than `header length - 1`,
    /// the bytes in between (padding, backlinks) are skipped.
    Lenient,
}

/// Which first bytes are read as dBase III, IV or V
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum VersionCheck {
    /// Only 0x03, 0x04 and 0x05
    #[default]
    Strict,
    /// Also 0x83 (dBase III with memo) and 0x8B (dBase IV with memo),
    /// the memo flag does not change the table layout.
    AcceptMemoVariants,
}

/// Which blanks to remove when decoding character values
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum TrimOption {
    Begin,
    End,
    #[default]
    BeginEnd,
    /// Keep the padding
    None,
}

impl TrimOption {
    pub(crate) fn trim<'a>(&self, s: &'a str) -> &'a str {
        let is_pad = |c: char| c == ' ' || c == '\0';
        match self {
            TrimOption::Begin => s.trim_start_matches(is_pad),
            TrimOption::End => s.trim_end_matches(is_pad),
            TrimOption::BeginEnd => s.trim_matches(is_pad),
            TrimOption::None => s,
        }
    }
}

/// Options for reading a table
///
/// # Example
///
/// ```
/// use dbase_raw::{DescriptorCheck, ReadingOptions, TrimOption};
///
/// let options = ReadingOptions::default()
///     .descriptor_check(DescriptorCheck::Lenient)
///     .character_trim(TrimOption::End);
/// assert_eq!(options.descriptor_check, DescriptorCheck::Lenient);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct ReadingOptions {
    pub descriptor_check: DescriptorCheck,
    pub version_check: VersionCheck,
    pub character_trim: TrimOption,
}

impl ReadingOptions {
    pub fn descriptor_check(mut self, check: DescriptorCheck) -> Self {
        self.descriptor_check = check;
        self
    }

    pub fn version_check(mut self, check: VersionCheck) -> Self {
        self.version_check = check;
        self
    }

    pub fn character_trim(mut self, trim: TrimOption) -> Self {
        self.character_trim = trim;
        self
    }
}
