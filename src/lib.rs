//! Importer for Staib WinSpectro XPS/AES `.dat` spectra.
//!
//! The WinSpectro acquisition software writes a line-oriented text format
//! with no published specification: a metadata block of colon-delimited
//! key/value pairs, a block of literal `reserved` markers, one column-header
//! line, and whitespace-separated integer data rows. This crate
//! reverse-engineers that layout, validates it aggressively (both the
//! section structure and the numeric agreement between metadata and data),
//! and exposes the result as a typed [`Dataset`] with derived kinetic- and
//! binding-energy channels plus Savitzky-Golay smoothing and
//! differentiation.
//!
//! Architecture:
//! ```text
//!  .dat file
//!       │
//!       ▼
//!  ┌──────────┐   classify each line (metadata / reserved /
//!  │ grammar   │   column headers / data row / unrecognized)
//!  └──────────┘
//!       │
//!       ▼
//!  ┌──────────┐   section order, cardinality,
//!  │ structure │   per-row column counts
//!  └──────────┘
//!       │
//!       ▼
//!  ┌──────────┐   typed metadata map +
//!  │ extract   │   columnar data table
//!  └──────────┘
//!       │
//!       ▼
//!  ┌─────────────┐  declared vs. observed point count,
//!  │ consistency  │  energy range, step width
//!  └─────────────┘
//!       │
//!       ▼
//!  ┌──────────┐   Dataset: metadata, columns,
//!  │  model    │   KE / BE / C1… derived channels
//!  └──────────┘
//! ```
//!
//! Quick start:
//! ```no_run
//! let spectrum = staib_dat::import("scan_042.dat")?;
//! let smoothed = spectrum.smooth("C1", 13, 3)?;
//! println!(
//!     "{} points from {} eV to {} eV",
//!     spectrum.data_points(),
//!     spectrum.kinetic_energy().first().unwrap_or(&0.0),
//!     spectrum.kinetic_energy().last().unwrap_or(&0.0),
//! );
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod consistency;
pub mod error;
pub mod extract;
pub mod filter;
pub mod grammar;
pub mod loader;
pub mod model;
pub mod structure;

pub use error::{Boundary, FilterError, FormatError, SectionKind};
pub use loader::{import, import_text};
pub use model::{Column, DataTable, Dataset, MetadataEntry, MetadataValue};
