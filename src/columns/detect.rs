//! Facet-based type detection and details summaries

use super::types::{ColumnDescriptor, ColumnType, Facet, FacetKind};
use crate::types::JsonValue;

/// Facets present on a descriptor, in priority order
pub fn recognized_facets(descriptor: &ColumnDescriptor) -> Vec<FacetKind> {
    FacetKind::PRIORITY
        .into_iter()
        .filter(|kind| descriptor.facet(*kind).is_some())
        .collect()
}

/// Infer the column type from the highest-priority facet present
///
/// A choice facet allowing multiple selections yields `multiChoice`;
/// a descriptor without any known facet yields `unknown`.
pub fn detect_type(descriptor: &ColumnDescriptor) -> ColumnType {
    let Some(kind) = FacetKind::PRIORITY
        .into_iter()
        .find(|kind| descriptor.facet(*kind).is_some())
    else {
        return ColumnType::Unknown;
    };

    match Facet::parse(kind, descriptor.facet(kind)) {
        Facet::Choice {
            allow_multiple: true,
            ..
        } => ColumnType::MultiChoice,
        _ => ColumnType::from(kind),
    }
}

/// Condense the facet behind `column_type` into one line of text
pub fn summarize_details(column_type: ColumnType, descriptor: &ColumnDescriptor) -> String {
    match column_type.facet() {
        Some(kind) => Facet::parse(kind, descriptor.facet(kind)).summary(),
        None => String::new(),
    }
}

impl Facet {
    /// Read the summarized sub-fields of a facet value
    pub fn parse(kind: FacetKind, value: Option<&JsonValue>) -> Self {
        let field = |key: &str| value.and_then(|v| v.get(key)).and_then(display_scalar);
        let either = |key: &str, alt: &str| field(key).or_else(|| field(alt));

        match kind {
            FacetKind::Choice => Facet::Choice {
                choices: value
                    .and_then(|v| v.get("choices"))
                    .and_then(JsonValue::as_array)
                    .map(|items| items.iter().filter_map(display_scalar).collect())
                    .unwrap_or_default(),
                allow_multiple: value
                    .and_then(|v| v.get("allowMultipleSelections"))
                    .and_then(JsonValue::as_bool)
                    .unwrap_or(false),
            },
            FacetKind::Calculated => Facet::Calculated {
                formula: field("formula"),
                output_type: field("outputType"),
            },
            FacetKind::Boolean => Facet::Boolean,
            FacetKind::Currency => Facet::Currency {
                locale: field("locale"),
                symbol: field("symbol"),
            },
            FacetKind::DateTime => Facet::DateTime {
                display_as: field("displayAs"),
                format: field("format"),
            },
            FacetKind::HyperlinkOrPicture => Facet::HyperlinkOrPicture {
                is_picture: field("isPicture"),
            },
            FacetKind::Lookup => Facet::Lookup {
                list_id: field("listId"),
                column_name: field("columnName"),
            },
            FacetKind::Number => Facet::Number {
                decimals: field("decimalPlaces"),
                min: field("minimum"),
                max: field("maximum"),
            },
            // Older payloads use allowMultiple / allowedUserType
            FacetKind::PersonOrGroup => Facet::PersonOrGroup {
                allow_multiple: either("allowMultipleSelection", "allowMultiple"),
                choose_from: either("chooseFromType", "allowedUserType"),
            },
            FacetKind::Text => Facet::Text {
                max_length: field("maxLength"),
                multiline: field("allowMultipleLines"),
            },
            FacetKind::Location => Facet::Location,
            FacetKind::Term => Facet::Term {
                allow_multiple: field("allowMultipleValues"),
            },
            FacetKind::Thumbnail => Facet::Thumbnail,
            FacetKind::ContentType => Facet::ContentType,
        }
    }

    /// One-line summary; absent sub-fields are left out
    pub fn summary(&self) -> String {
        match self {
            Facet::Choice { choices, .. } => format!("choices=[{}]", choices.join(", ")),
            Facet::Lookup {
                list_id,
                column_name,
            } => {
                let pairs = join_pairs(&[("listId", list_id), ("columnName", column_name)]);
                format!("lookup:{pairs}")
            }
            Facet::PersonOrGroup {
                allow_multiple,
                choose_from,
            } => join_pairs(&[("allowMultiple", allow_multiple), ("chooseFrom", choose_from)]),
            Facet::DateTime { display_as, format } => {
                join_pairs(&[("displayAs", display_as), ("format", format)])
            }
            Facet::Number { decimals, min, max } => {
                join_pairs(&[("decimals", decimals), ("min", min), ("max", max)])
            }
            Facet::Currency { locale, symbol } => {
                join_pairs(&[("locale", locale), ("symbol", symbol)])
            }
            Facet::HyperlinkOrPicture { is_picture } => join_pairs(&[("isPicture", is_picture)]),
            Facet::Calculated {
                formula,
                output_type,
            } => join_pairs(&[("formula", formula), ("outputType", output_type)]),
            Facet::Text {
                max_length,
                multiline,
            } => join_pairs(&[("maxLength", max_length), ("multiline", multiline)]),
            Facet::Term { allow_multiple } => join_pairs(&[("allowMultiple", allow_multiple)]),
            Facet::Boolean | Facet::Location | Facet::Thumbnail | Facet::ContentType => {
                String::new()
            }
        }
    }
}

/// `key=value` pairs joined by `, `, skipping absent values
fn join_pairs(pairs: &[(&str, &Option<String>)]) -> String {
    pairs
        .iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| format!("{key}={v}")))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Text of a string, number or boolean; `None` for anything else
fn display_scalar(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
