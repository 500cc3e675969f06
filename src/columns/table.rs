//! Result table assembly

use super::detect::{detect_type, recognized_facets, summarize_details};
use super::types::{ColumnDescriptor, NormalizedColumn, ResultTable};
use crate::types::JsonValue;
use tracing::{debug, warn};

/// Normalize one raw column definition
pub fn normalize_column(item: &JsonValue) -> NormalizedColumn {
    let descriptor = ColumnDescriptor::from_json(item);
    let internal_name = descriptor.internal_name();

    let facets = recognized_facets(&descriptor);
    if facets.len() > 1 {
        let names: Vec<&str> = facets.iter().map(|f| f.key()).collect();
        warn!(
            "Column '{}' carries several facets ({}), using '{}'",
            internal_name,
            names.join(", "),
            names[0]
        );
    }

    let column_type = detect_type(&descriptor);
    let details = summarize_details(column_type, &descriptor);

    NormalizedColumn {
        display_name: descriptor
            .display_name
            .clone()
            .unwrap_or_else(|| internal_name.clone()),
        internal_name,
        column_type,
        required: descriptor.required,
        read_only: descriptor.read_only,
        hidden: descriptor.hidden,
        indexed: descriptor.indexed,
        enforce_unique: descriptor.enforce_unique_values,
        details,
    }
}

/// Normalize every item, keeping input order
pub fn build_table(items: Vec<JsonValue>) -> ResultTable {
    let rows: Vec<NormalizedColumn> = items.iter().map(normalize_column).collect();
    debug!("Built table with {} rows", rows.len());
    ResultTable::new(rows)
}
