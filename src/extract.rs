//! Typed extraction of the classified sections.

use std::collections::BTreeMap;

use crate::grammar::{self, LineKind};
use crate::model::{Column, DataTable, MetadataEntry, MetadataValue};

/// Everything pulled out of a structurally valid file.
#[derive(Debug)]
pub struct Extracted {
    pub metadata: BTreeMap<String, MetadataEntry>,
    pub table: DataTable,
}

/// Re-parse the classified lines into the metadata map and the data table.
///
/// Runs only after [`crate::structure::verify`] has accepted the file, so
/// every line re-parses under the grammar it was classified with; lines that
/// somehow do not are skipped rather than trusted.
pub fn extract(lines: &[String], kinds: &[LineKind], header_index: usize) -> Extracted {
    let mut metadata = BTreeMap::new();
    for (line, kind) in lines.iter().zip(kinds) {
        if *kind != LineKind::Metadata {
            continue;
        }
        if let Some(parsed) = grammar::parse_metadata(line) {
            // Keys compress to a single word: "Data Points" → "DataPoints".
            let key: String = parsed.key.split_whitespace().collect();
            metadata.insert(
                key,
                MetadataEntry {
                    value: coerce(&parsed.value),
                    unit: parsed.unit,
                },
            );
        }
    }

    let mut columns: Vec<Column> = grammar::parse_header(&lines[header_index])
        .unwrap_or_default()
        .into_iter()
        .map(|d| Column {
            name: d.name,
            unit: d.unit,
            values: Vec::new(),
        })
        .collect();

    for line in &lines[header_index + 1..] {
        if let Some(values) = grammar::parse_data_row(line) {
            for (column, value) in columns.iter_mut().zip(values) {
                column.values.push(value);
            }
        }
    }

    Extracted {
        metadata,
        table: DataTable { columns },
    }
}

/// Coerce a metadata value string: integer first, then float, else text.
fn coerce(raw: &str) -> MetadataValue {
    if let Ok(i) = raw.parse::<i64>() {
        return MetadataValue::Integer(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return MetadataValue::Float(f);
    }
    MetadataValue::Text(raw.trim().to_string())
}
