//! The import pipeline: file → lines → classify → validate → extract →
//! cross-check → [`Dataset`].

use std::fs;
use std::path::Path;

use log::debug;

use crate::consistency;
use crate::error::FormatError;
use crate::extract::{self, Extracted};
use crate::grammar::{self, LineKind};
use crate::model::Dataset;
use crate::structure;

/// Import a WinSpectro `.dat` file.
///
/// Synchronous; either returns a fully validated [`Dataset`] or fails with
/// the first [`FormatError`] encountered. There is no partial result.
pub fn import(path: impl AsRef<Path>) -> Result<Dataset, FormatError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    import_text(&path.to_string_lossy(), &text)
}

/// Run the import pipeline over in-memory text.
///
/// `filename` is recorded on the dataset verbatim; it does not have to name
/// a real file.
pub fn import_text(filename: &str, text: &str) -> Result<Dataset, FormatError> {
    let lines: Vec<String> = text.lines().map(str::to_owned).collect();
    let kinds: Vec<LineKind> = lines.iter().map(|l| grammar::classify(l)).collect();

    let header_index = structure::verify(&lines, &kinds)?;
    debug!(
        "{filename}: structure ok, column headers at line {}",
        header_index + 1
    );

    let Extracted { metadata, table } = extract::extract(&lines, &kinds, header_index);
    consistency::verify(&metadata, &table)?;

    let dataset = Dataset::assemble(filename.to_owned(), lines, metadata, table)?;
    debug!(
        "{filename}: imported {} points, {} count channels",
        dataset.data_points(),
        dataset.channels().len()
    );
    Ok(dataset)
}
