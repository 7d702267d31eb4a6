use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Section kinds (for diagnostics)
// ---------------------------------------------------------------------------

/// The four sections a well-formed WinSpectro file is made of, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Metadata,
    Reserved,
    ColumnHeaders,
    DataRows,
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectionKind::Metadata => "metadata",
            SectionKind::Reserved => "reserved",
            SectionKind::ColumnHeaders => "column-header",
            SectionKind::DataRows => "data",
        };
        write!(f, "{name}")
    }
}

/// Which end of the energy axis a boundary check refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Start,
    Stop,
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boundary::Start => write!(f, "start"),
            Boundary::Stop => write!(f, "stop"),
        }
    }
}

// ---------------------------------------------------------------------------
// Import errors
// ---------------------------------------------------------------------------

/// Why a `.dat` file was rejected.
///
/// Every structural or cross-consistency failure maps to one variant here;
/// an `Err` means "this file could not be imported" and there is no partial
/// result to recover.
#[derive(Debug, Error)]
pub enum FormatError {
    /// A line matched none of the known section grammars.
    #[error("line {line} does not belong to any known section")]
    UnrecognizedLine { line: usize },

    /// A required section never appears.
    #[error("missing {0} section")]
    MissingSection(SectionKind),

    /// A section that must appear exactly once appears again.
    #[error("more than one {0} section")]
    DuplicateSection(SectionKind),

    /// All sections are present but not in metadata → reserved → column
    /// headers → data order.
    #[error("sections out of order")]
    SectionOrderViolation,

    /// A data row's token count disagrees with the column-header line.
    #[error("line {line}: expected {expected} columns, found {found}")]
    ColumnCountMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Declared `DataPoints` disagrees with the number of data rows.
    #[error("metadata declares {declared} data points, file has {actual}")]
    PointCountMismatch { declared: f64, actual: usize },

    /// Declared start/stop energy disagrees with the basis column.
    #[error("declared {which} energy {declared} V, basis gives {observed} V")]
    BoundaryEnergyMismatch {
        which: Boundary,
        declared: f64,
        observed: f64,
    },

    /// The basis column is not an arithmetic progression at 2-decimal
    /// precision.
    #[error("basis values are not evenly spaced")]
    StepSizeInconsistent,

    /// The observed basis spacing disagrees with the declared `Stepwidth`.
    #[error("declared step width {declared} V, basis spacing is {observed} V")]
    StepWidthMismatch { declared: f64, observed: f64 },

    /// A metadata key the cross-checks depend on is absent or non-numeric.
    #[error("metadata key `{key}` is missing or not numeric")]
    MissingMetadata { key: String },

    /// The file could not be read at all.
    #[error("reading data file: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Filter errors
// ---------------------------------------------------------------------------

/// Why a smooth/differentiate request was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The key names nothing in the dataset.
    #[error("unknown key `{key}`")]
    UnknownKey { key: String },

    /// The key exists but does not resolve to a numeric array.
    #[error("key `{key}` does not name a numeric channel")]
    NotNumeric { key: String },

    /// The window length must be a positive odd number.
    #[error("window length {window} must be a positive odd number")]
    WindowNotOdd { window: usize },

    /// The window is too short to fit a polynomial of the requested order.
    #[error("window length {window} too small for polynomial order {order}")]
    WindowTooSmall { window: usize, order: usize },

    /// The polynomial order cannot produce the requested derivative.
    #[error("polynomial order {order} cannot produce a derivative of order {deriv}")]
    OrderTooSmall { order: usize, deriv: usize },
}
