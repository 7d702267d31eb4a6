//! File-level structure checks over the per-line classifications.

use crate::error::{FormatError, SectionKind};
use crate::grammar::{self, LineKind};

/// The only acceptable section order, as a run-length-compressed sequence.
const EXPECTED: [(LineKind, SectionKind); 4] = [
    (LineKind::Metadata, SectionKind::Metadata),
    (LineKind::Reserved, SectionKind::Reserved),
    (LineKind::ColumnHeaders, SectionKind::ColumnHeaders),
    (LineKind::DataRow, SectionKind::DataRows),
];

/// Validate the classified line sequence and return the index of the
/// column-header line.
///
/// Four checks, each sufficient to reject the file on its own:
/// 1. every line was recognized,
/// 2. exactly one column-header line exists,
/// 3. the compressed classification sequence is metadata → reserved →
///    column headers → data rows (which also rejects a file with zero data
///    rows),
/// 4. every data row carries exactly one token per column header.
pub fn verify(lines: &[String], kinds: &[LineKind]) -> Result<usize, FormatError> {
    if let Some(index) = kinds.iter().position(|k| *k == LineKind::Unrecognized) {
        return Err(FormatError::UnrecognizedLine { line: index + 1 });
    }

    let header_positions: Vec<usize> = kinds
        .iter()
        .enumerate()
        .filter(|(_, k)| **k == LineKind::ColumnHeaders)
        .map(|(i, _)| i)
        .collect();
    let header_index = match header_positions.as_slice() {
        [] => return Err(FormatError::MissingSection(SectionKind::ColumnHeaders)),
        [index] => *index,
        _ => return Err(FormatError::DuplicateSection(SectionKind::ColumnHeaders)),
    };

    let mut compressed: Vec<LineKind> = Vec::with_capacity(4);
    for kind in kinds {
        if compressed.last() != Some(kind) {
            compressed.push(*kind);
        }
    }
    if compressed != EXPECTED.map(|(kind, _)| kind) {
        for (kind, section) in EXPECTED {
            if !kinds.contains(&kind) {
                return Err(FormatError::MissingSection(section));
            }
        }
        return Err(FormatError::SectionOrderViolation);
    }

    let columns = grammar::parse_header(&lines[header_index])
        .map(|d| d.len())
        .unwrap_or(0);
    for (index, line) in lines.iter().enumerate().skip(header_index + 1) {
        let found = grammar::parse_data_row(line).map(|v| v.len()).unwrap_or(0);
        if found != columns {
            return Err(FormatError::ColumnCountMismatch {
                line: index + 1,
                expected: columns,
                found,
            });
        }
    }

    Ok(header_index)
}
