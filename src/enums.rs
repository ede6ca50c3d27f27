use std::cmp::Ordering;
use std::fmt;

/// Sample layout of a single-frame, single-channel pixel payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    U8,
    U16,
    I16,
}

impl SampleFormat {
    /// Map BitsAllocated / PixelRepresentation onto a supported format
    pub fn from_attributes(bits_allocated: u16, pixel_representation: u16) -> Option<Self> {
        match (bits_allocated, pixel_representation) {
            (8, 0) => Some(SampleFormat::U8),
            (16, 0) => Some(SampleFormat::U16),
            (16, 1) => Some(SampleFormat::I16),
            _ => None,
        }
    }

    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::U8 => 1,
            SampleFormat::U16 | SampleFormat::I16 => 2,
        }
    }
}

/// Series key taken from SeriesNumber.
///
/// Numeric keys sort numerically and ahead of textual ones, so `Serie 2` is
/// listed before `Serie 10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SeriesId {
    Number(i64),
    Text(String),
}

impl SeriesId {
    /// Parse a raw SeriesNumber value; `None` when it is blank
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim_matches(|c: char| c.is_whitespace() || c == '\0');
        if trimmed.is_empty() {
            return None;
        }
        Some(match trimmed.parse::<i64>() {
            Ok(number) => SeriesId::Number(number),
            Err(_) => SeriesId::Text(trimmed.to_string()),
        })
    }

    /// Name of the per-series output directory, `Serie_<id>`
    pub fn dir_name(&self) -> String {
        let key = self.to_string().replace(['/', '\\'], "_");
        format!("Serie_{key}")
    }
}

impl Ord for SeriesId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SeriesId::Number(a), SeriesId::Number(b)) => a.cmp(b),
            (SeriesId::Number(_), SeriesId::Text(_)) => Ordering::Less,
            (SeriesId::Text(_), SeriesId::Number(_)) => Ordering::Greater,
            (SeriesId::Text(a), SeriesId::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for SeriesId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesId::Number(number) => write!(f, "{number}"),
            SeriesId::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for SeriesId {
    fn from(number: i64) -> Self {
        SeriesId::Number(number)
    }
}
