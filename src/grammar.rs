//! Line grammar for WinSpectro `.dat` files.
//!
//! The format has no published specification; the grammar below encodes the
//! reverse-engineered conventions: colon-delimited metadata lines, a block of
//! literal `reserved` markers, one column-header line, and whitespace-
//! separated integer data rows. Each line type gets its own parse function
//! over explicit character classes, and [`classify`] tries them in a fixed
//! priority order.

// ---------------------------------------------------------------------------
// Line classification
// ---------------------------------------------------------------------------

/// What section a single line belongs to, judged from its text alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Metadata,
    Reserved,
    ColumnHeaders,
    DataRow,
    Unrecognized,
}

/// The literal content of every line in the reserved block.
pub const RESERVED_MARKER: &str = "reserved";

/// The metadata delimiter: a colon followed by exactly four spaces.
const DELIMITER: &str = ":    ";

/// Classify one line of input.
///
/// Checks run in fixed priority order — metadata, reserved, data row, column
/// headers — and the first match wins. A line that could plausibly match two
/// patterns is resolved by this precedence, never by surrounding context.
pub fn classify(line: &str) -> LineKind {
    if parse_metadata(line).is_some() {
        LineKind::Metadata
    } else if line.trim() == RESERVED_MARKER {
        LineKind::Reserved
    } else if parse_data_row(line).is_some() {
        LineKind::DataRow
    } else if parse_header(line).is_some() {
        LineKind::ColumnHeaders
    } else {
        LineKind::Unrecognized
    }
}

// ---------------------------------------------------------------------------
// Parsed line shapes
// ---------------------------------------------------------------------------

/// A metadata line split into its parts. `key` and `value` keep the source's
/// multi-word form, tokens joined by single spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataLine {
    pub key: String,
    pub unit: Option<String>,
    pub value: String,
}

/// One column descriptor from the header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderDescriptor {
    pub name: String,
    pub unit: Option<String>,
}

// ---------------------------------------------------------------------------
// Character classes (the instrument's, exactly)
// ---------------------------------------------------------------------------

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn is_unit_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '%'
}

fn is_value_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '/' | '=' | ':')
}

// ---------------------------------------------------------------------------
// Cursor: a minimal left-to-right tokenizer
// ---------------------------------------------------------------------------

struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a str) -> Self {
        Cursor { rest: line }
    }

    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    /// Consume the longest non-empty run of characters in `class`.
    fn word(&mut self, class: impl Fn(char) -> bool) -> Option<&'a str> {
        let end = self
            .rest
            .find(|c: char| !class(c))
            .unwrap_or(self.rest.len());
        if end == 0 {
            return None;
        }
        let (word, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(word)
    }

    /// Consume `lit` exactly, without skipping whitespace first.
    fn literal(&mut self, lit: &str) -> bool {
        match self.rest.strip_prefix(lit) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn at_end(&self) -> bool {
        self.rest.is_empty()
    }
}

/// Parse a bracketed unit: `[` unit-word `]`. Restores the cursor on a
/// partial match so a stray `[` falls through to the surrounding grammar.
fn parse_unit(cur: &mut Cursor<'_>) -> Option<String> {
    let saved = cur.rest;
    if cur.literal("[") {
        cur.skip_ws();
        if let Some(unit) = cur.word(is_unit_char) {
            cur.skip_ws();
            if cur.literal("]") {
                return Some(unit.to_string());
            }
        }
    }
    cur.rest = saved;
    None
}

// ---------------------------------------------------------------------------
// Per-line-type parse functions
// ---------------------------------------------------------------------------

/// Parse a metadata line: one or more key words, an optional bracketed unit,
/// the `:    ` delimiter, one or more value words. The whole line must be
/// consumed (surrounding whitespace allowed).
pub fn parse_metadata(line: &str) -> Option<MetadataLine> {
    let mut cur = Cursor::new(line);

    let mut key_tokens: Vec<&str> = Vec::new();
    loop {
        cur.skip_ws();
        match cur.word(is_key_char) {
            Some(word) => key_tokens.push(word),
            None => break,
        }
    }
    if key_tokens.is_empty() {
        return None;
    }

    // The unit, when present, sits between the key and the delimiter.
    let unit = parse_unit(&mut cur);

    cur.skip_ws();
    if !cur.literal(DELIMITER) {
        return None;
    }

    let mut value_tokens: Vec<&str> = Vec::new();
    loop {
        cur.skip_ws();
        match cur.word(is_value_char) {
            Some(word) => value_tokens.push(word),
            None => break,
        }
    }
    if value_tokens.is_empty() || !cur.at_end() {
        return None;
    }

    Some(MetadataLine {
        key: key_tokens.join(" "),
        unit,
        value: value_tokens.join(" "),
    })
}

/// Parse a data row: two or more whitespace-separated tokens, every one an
/// optionally-negative integer. Values widen to `f64` here; the file never
/// carries fractional counts.
pub fn parse_data_row(line: &str) -> Option<Vec<f64>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 2 {
        return None;
    }
    tokens.iter().map(|t| numeric_token(t)).collect()
}

fn numeric_token(token: &str) -> Option<f64> {
    let digits = token.strip_prefix('-').unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse::<f64>().ok()
}

/// Parse the column-header line: two or more key words, each optionally
/// followed by a bracketed unit.
pub fn parse_header(line: &str) -> Option<Vec<HeaderDescriptor>> {
    let mut cur = Cursor::new(line);
    let mut descriptors = Vec::new();

    loop {
        cur.skip_ws();
        let name = match cur.word(is_key_char) {
            Some(word) => word.to_string(),
            None => break,
        };
        cur.skip_ws();
        let unit = parse_unit(&mut cur);
        descriptors.push(HeaderDescriptor { name, unit });
    }

    cur.skip_ws();
    if descriptors.len() < 2 || !cur.at_end() {
        return None;
    }
    Some(descriptors)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
