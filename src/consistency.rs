//! Cross-checks between the metadata block and the data table.
//!
//! The instrument writes redundant information: the point count, the energy
//! range, and the step width all appear both as metadata and implicitly in
//! the basis column. A file is only accepted when the two agree. Energy
//! comparisons round to 2 decimal places first, absorbing the rounding the
//! acquisition software applies when it prints the metadata block.

use std::collections::BTreeMap;

use crate::error::{Boundary, FormatError, SectionKind};
use crate::model::{DataTable, MetadataEntry};

/// Round to 2 decimal places, the fixed comparison precision.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn required(
    metadata: &BTreeMap<String, MetadataEntry>,
    key: &str,
) -> Result<f64, FormatError> {
    metadata
        .get(key)
        .and_then(MetadataEntry::as_f64)
        .ok_or_else(|| FormatError::MissingMetadata {
            key: key.to_string(),
        })
}

/// Verify that the declared metadata agrees with the extracted table.
///
/// Checks run in order and the first failure returns immediately:
/// 1. `DataPoints` equals the basis length (exact),
/// 2. `Stopenergy` equals the last basis value in volts (rounded),
/// 3. `Startenergy` equals the first basis value in volts (rounded),
/// 4. the basis is an arithmetic progression at 2-decimal precision,
/// 5. the common step equals the declared `Stepwidth` (rounded).
pub fn verify(
    metadata: &BTreeMap<String, MetadataEntry>,
    table: &DataTable,
) -> Result<(), FormatError> {
    let basis = table
        .basis()
        .ok_or(FormatError::MissingSection(SectionKind::ColumnHeaders))?;

    let declared_points = required(metadata, "DataPoints")?;
    let actual = basis.values.len();
    if declared_points != actual as f64 {
        return Err(FormatError::PointCountMismatch {
            declared: declared_points,
            actual,
        });
    }

    let (Some(&first), Some(&last)) = (basis.values.first(), basis.values.last()) else {
        return Err(FormatError::StepSizeInconsistent);
    };

    // Basis is stored in millivolts; the declared energies are volts.
    let stop = required(metadata, "Stopenergy")?;
    if round2(stop) != round2(last / 1000.0) {
        return Err(FormatError::BoundaryEnergyMismatch {
            which: Boundary::Stop,
            declared: stop,
            observed: last / 1000.0,
        });
    }

    let start = required(metadata, "Startenergy")?;
    if round2(start) != round2(first / 1000.0) {
        return Err(FormatError::BoundaryEnergyMismatch {
            which: Boundary::Start,
            declared: start,
            observed: first / 1000.0,
        });
    }

    // Walk the progression from the end, the direction the acquisition
    // software sweeps.
    let steps: Vec<f64> = basis
        .values
        .windows(2)
        .rev()
        .map(|pair| round2((pair[1] - pair[0]) / 1000.0))
        .collect();
    let Some(&step) = steps.first() else {
        // A single data point leaves the declared step width unverifiable.
        return Err(FormatError::StepSizeInconsistent);
    };
    if steps.iter().any(|&s| s != step) {
        return Err(FormatError::StepSizeInconsistent);
    }

    let declared_step = required(metadata, "Stepwidth")?;
    if step != round2(declared_step) {
        return Err(FormatError::StepWidthMismatch {
            declared: declared_step,
            observed: step,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, MetadataValue};

    fn metadata(entries: &[(&str, f64)]) -> BTreeMap<String, MetadataEntry> {
        entries
            .iter()
            .map(|(key, value)| {
                (
                    (*key).to_string(),
                    MetadataEntry {
                        value: MetadataValue::Float(*value),
                        unit: None,
                    },
                )
            })
            .collect()
    }

    fn table(basis: &[f64]) -> DataTable {
        DataTable {
            columns: vec![
                Column {
                    name: "Basis".to_string(),
                    unit: Some("mV".to_string()),
                    values: basis.to_vec(),
                },
                Column {
                    name: "Channel_1".to_string(),
                    unit: None,
                    values: vec![0.0; basis.len()],
                },
            ],
        }
    }

    fn good_metadata() -> BTreeMap<String, MetadataEntry> {
        metadata(&[
            ("DataPoints", 3.0),
            ("Startenergy", 100.0),
            ("Stopenergy", 300.0),
            ("Stepwidth", 100.0),
        ])
    }

    #[test]
    fn accepts_consistent_file() {
        let basis = [100_000.0, 200_000.0, 300_000.0];
        assert!(verify(&good_metadata(), &table(&basis)).is_ok());
    }

    #[test]
    fn tolerates_sub_centivolt_rounding() {
        // 100.004 V rounds to 100.00, matching the declared 100 V
        let basis = [100_004.0, 200_004.0, 300_004.0];
        assert!(verify(&good_metadata(), &table(&basis)).is_ok());
    }

    #[test]
    fn rejects_wrong_point_count() {
        let basis = [100_000.0, 200_000.0];
        assert!(matches!(
            verify(&good_metadata(), &table(&basis)),
            Err(FormatError::PointCountMismatch { actual: 2, .. })
        ));
    }

    #[test]
    fn rejects_wrong_stop_energy() {
        let mut meta = good_metadata();
        meta.insert(
            "Stopenergy".to_string(),
            MetadataEntry {
                value: MetadataValue::Float(299.0),
                unit: None,
            },
        );
        let basis = [100_000.0, 200_000.0, 300_000.0];
        assert!(matches!(
            verify(&meta, &table(&basis)),
            Err(FormatError::BoundaryEnergyMismatch {
                which: Boundary::Stop,
                ..
            })
        ));
    }

    #[test]
    fn rejects_wrong_start_energy() {
        let mut meta = good_metadata();
        meta.insert(
            "Startenergy".to_string(),
            MetadataEntry {
                value: MetadataValue::Float(101.0),
                unit: None,
            },
        );
        let basis = [100_000.0, 200_000.0, 300_000.0];
        assert!(matches!(
            verify(&meta, &table(&basis)),
            Err(FormatError::BoundaryEnergyMismatch {
                which: Boundary::Start,
                ..
            })
        ));
    }

    #[test]
    fn rejects_uneven_steps() {
        let basis = [100_000.0, 210_000.0, 300_000.0];
        assert!(matches!(
            verify(&good_metadata(), &table(&basis)),
            Err(FormatError::StepSizeInconsistent)
        ));
    }

    #[test]
    fn rejects_wrong_step_width() {
        let mut meta = good_metadata();
        meta.insert(
            "Stepwidth".to_string(),
            MetadataEntry {
                value: MetadataValue::Float(50.0),
                unit: None,
            },
        );
        let basis = [100_000.0, 200_000.0, 300_000.0];
        assert!(matches!(
            verify(&meta, &table(&basis)),
            Err(FormatError::StepWidthMismatch { .. })
        ));
    }

    #[test]
    fn rejects_missing_required_key() {
        let mut meta = good_metadata();
        meta.remove("Stepwidth");
        let basis = [100_000.0, 200_000.0, 300_000.0];
        assert!(matches!(
            verify(&meta, &table(&basis)),
            Err(FormatError::MissingMetadata { .. })
        ));
    }
}
