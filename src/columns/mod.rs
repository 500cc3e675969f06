//! Column metadata module
//!
//! Turns raw Graph column definitions into fixed-shape table rows.
//!
//! # Features
//!
//! - **Type Detection**: Picks the column type from the facet present,
//!   following a fixed priority order
//! - **Multi-Choice**: Choice columns allowing several selections get their own type
//! - **Details**: One-line summary of the relevant facet sub-fields
//! - **Selection**: Picks columns by internal or display name

mod detect;
mod select;
mod table;
mod types;

pub use detect::{detect_type, recognized_facets, summarize_details};
pub use select::normalize_name;
pub use table::{build_table, normalize_column};
pub use types::{
    ColumnDescriptor, ColumnType, Facet, FacetKind, NormalizedColumn, ResultTable, Selection,
};

#[cfg(test)]
mod tests;
