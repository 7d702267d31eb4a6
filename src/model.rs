use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{FilterError, FormatError, SectionKind};
use crate::filter;

// ---------------------------------------------------------------------------
// MetadataValue – one coerced metadata scalar
// ---------------------------------------------------------------------------

/// A metadata value after type coercion: integer first, then float, else the
/// source text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl MetadataValue {
    /// Interpret the value as an `f64` for the numeric cross-checks.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Integer(i) => Some(*i as f64),
            MetadataValue::Float(v) => Some(*v),
            MetadataValue::Text(_) => None,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Integer(i) => write!(f, "{i}"),
            MetadataValue::Float(v) => write!(f, "{v}"),
            MetadataValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// One metadata entry: the coerced value plus the bracketed unit, when the
/// source key carried one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataEntry {
    pub value: MetadataValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl MetadataEntry {
    pub fn as_f64(&self) -> Option<f64> {
        self.value.as_f64()
    }
}

// ---------------------------------------------------------------------------
// DataTable – the raw numeric columns
// ---------------------------------------------------------------------------

/// One named data column with its values in file order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub values: Vec<f64>,
}

/// The columnar data block. Column order follows the header line; every
/// column holds exactly one value per data row.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct DataTable {
    pub columns: Vec<Column>,
}

impl DataTable {
    /// The basis column: the first column, the millivolt energy axis.
    pub fn basis(&self) -> Option<&Column> {
        self.columns.first()
    }

    /// Look up a column by its header name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Number of data rows.
    pub fn rows(&self) -> usize {
        self.basis().map_or(0, |c| c.values.len())
    }
}

// ---------------------------------------------------------------------------
// Dataset – the importer's result
// ---------------------------------------------------------------------------

/// A fully validated WinSpectro spectrum.
///
/// Constructed only after every structural and consistency check has passed;
/// there is no mutation API. Derived channels are materialized once at
/// construction:
///
/// * `kinetic_energy` (KE, eV) – the basis column divided by 1000,
/// * `binding_energy` (BE, eV) – declared source energy minus KE,
/// * `channels` – one plain array per non-basis column, addressable as
///   `C1`, `C2`, … in header order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    filename: String,
    file_text: Vec<String>,
    metadata: BTreeMap<String, MetadataEntry>,
    table: DataTable,
    kinetic_energy: Vec<f64>,
    binding_energy: Vec<f64>,
    channels: Vec<Vec<f64>>,
}

impl Dataset {
    /// Assemble the dataset from validated parts, computing the derived
    /// channels.
    pub(crate) fn assemble(
        filename: String,
        file_text: Vec<String>,
        metadata: BTreeMap<String, MetadataEntry>,
        table: DataTable,
    ) -> Result<Self, FormatError> {
        let basis = table
            .basis()
            .ok_or(FormatError::MissingSection(SectionKind::ColumnHeaders))?;

        // mV → eV; the analyzer is internally biased, so no work-function
        // correction applies.
        let kinetic_energy: Vec<f64> = basis.values.iter().map(|v| v / 1000.0).collect();

        let source_energy = metadata
            .get("SourceEnergy")
            .and_then(MetadataEntry::as_f64)
            .ok_or_else(|| FormatError::MissingMetadata {
                key: "SourceEnergy".to_string(),
            })?;
        let binding_energy: Vec<f64> =
            kinetic_energy.iter().map(|ke| source_energy - ke).collect();

        let channels: Vec<Vec<f64>> = table.columns[1..]
            .iter()
            .map(|c| c.values.clone())
            .collect();

        Ok(Dataset {
            filename,
            file_text,
            metadata,
            table,
            kinetic_energy,
            binding_energy,
            channels,
        })
    }

    // ---- Read surface -----------------------------------------------------

    /// The path this dataset was imported from.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The original input, one entry per line, unmodified.
    pub fn file_text(&self) -> &[String] {
        &self.file_text
    }

    /// Every metadata entry, keyed by the whitespace-compressed key.
    pub fn metadata(&self) -> &BTreeMap<String, MetadataEntry> {
        &self.metadata
    }

    /// The raw data columns.
    pub fn table(&self) -> &DataTable {
        &self.table
    }

    /// The basis column (millivolt energy axis).
    pub fn basis(&self) -> &Column {
        &self.table.columns[0]
    }

    /// Number of data points; equals the declared `DataPoints` after
    /// validation.
    pub fn data_points(&self) -> usize {
        self.kinetic_energy.len()
    }

    /// Kinetic energy in eV.
    pub fn kinetic_energy(&self) -> &[f64] {
        &self.kinetic_energy
    }

    /// Binding energy in eV. Equals `SourceEnergy − KE`.
    pub fn binding_energy(&self) -> &[f64] {
        &self.binding_energy
    }

    /// All count channels (every column after the basis), in header order.
    pub fn channels(&self) -> &[Vec<f64>] {
        &self.channels
    }

    /// Count channel `n`, 1-based: `channel(1)` is the first column after
    /// the basis.
    pub fn channel(&self, n: usize) -> Option<&[f64]> {
        if n == 0 {
            return None;
        }
        self.channels.get(n - 1).map(Vec::as_slice)
    }

    fn metadata_f64(&self, key: &str) -> Option<f64> {
        self.metadata.get(key).and_then(MetadataEntry::as_f64)
    }

    /// Declared start energy in volts.
    pub fn start_energy(&self) -> Option<f64> {
        self.metadata_f64("Startenergy")
    }

    /// Declared stop energy in volts.
    pub fn stop_energy(&self) -> Option<f64> {
        self.metadata_f64("Stopenergy")
    }

    /// Declared step width in volts.
    pub fn step_width(&self) -> Option<f64> {
        self.metadata_f64("Stepwidth")
    }

    /// Declared source energy in eV.
    pub fn source_energy(&self) -> Option<f64> {
        self.metadata_f64("SourceEnergy")
    }

    /// Render the whole dataset as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    // ---- Numeric channels and filtering -----------------------------------

    /// Resolve a key to one of the derived numeric arrays: `KE`, `BE`, or
    /// `C1`, `C2`, ….
    ///
    /// Keys that exist but hold something other than a numeric array (the
    /// file text, metadata scalars, the unit-tagged raw columns) fail with
    /// [`FilterError::NotNumeric`]; keys that name nothing fail with
    /// [`FilterError::UnknownKey`].
    pub fn numeric_channel(&self, key: &str) -> Result<&[f64], FilterError> {
        match key {
            "KE" => return Ok(&self.kinetic_energy),
            "BE" => return Ok(&self.binding_energy),
            _ => {}
        }
        if let Some(rest) = key.strip_prefix('C') {
            if let Ok(n) = rest.parse::<usize>() {
                return match self.channel(n) {
                    Some(values) => Ok(values),
                    None => Err(FilterError::UnknownKey {
                        key: key.to_string(),
                    }),
                };
            }
        }
        let exists = key == "filename"
            || key == "fileText"
            || self.metadata.contains_key(key)
            || self.table.column(key).is_some();
        if exists {
            Err(FilterError::NotNumeric {
                key: key.to_string(),
            })
        } else {
            Err(FilterError::UnknownKey {
                key: key.to_string(),
            })
        }
    }

    /// Savitzky-Golay smoothing of the named channel. See [`filter::smooth`].
    pub fn smooth(&self, key: &str, window: usize, order: usize) -> Result<Vec<f64>, FilterError> {
        filter::smooth(self.numeric_channel(key)?, window, order)
    }

    /// Savitzky-Golay first derivative of the named channel. See
    /// [`filter::differentiate`].
    pub fn differentiate(
        &self,
        key: &str,
        window: usize,
        order: usize,
    ) -> Result<Vec<f64>, FilterError> {
        filter::differentiate(self.numeric_channel(key)?, window, order)
    }
}
