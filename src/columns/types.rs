//! Column metadata types

use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

// ============================================================================
// Facet Kinds
// ============================================================================

/// Facet keys a Graph column definition can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FacetKind {
    Choice,
    Calculated,
    Boolean,
    Currency,
    DateTime,
    HyperlinkOrPicture,
    Lookup,
    Number,
    PersonOrGroup,
    Text,
    Location,
    Term,
    Thumbnail,
    ContentType,
}

impl FacetKind {
    /// Detection order; the first present facet decides the column type
    pub const PRIORITY: [FacetKind; 14] = [
        FacetKind::Choice,
        FacetKind::Calculated,
        FacetKind::Boolean,
        FacetKind::Currency,
        FacetKind::DateTime,
        FacetKind::HyperlinkOrPicture,
        FacetKind::Lookup,
        FacetKind::Number,
        FacetKind::PersonOrGroup,
        FacetKind::Text,
        FacetKind::Location,
        FacetKind::Term,
        FacetKind::Thumbnail,
        FacetKind::ContentType,
    ];

    /// JSON key of the facet on a column definition
    pub fn key(self) -> &'static str {
        match self {
            FacetKind::Choice => "choice",
            FacetKind::Calculated => "calculated",
            FacetKind::Boolean => "boolean",
            FacetKind::Currency => "currency",
            FacetKind::DateTime => "dateTime",
            FacetKind::HyperlinkOrPicture => "hyperlinkOrPicture",
            FacetKind::Lookup => "lookup",
            FacetKind::Number => "number",
            FacetKind::PersonOrGroup => "personOrGroup",
            FacetKind::Text => "text",
            FacetKind::Location => "location",
            FacetKind::Term => "term",
            FacetKind::Thumbnail => "thumbnail",
            FacetKind::ContentType => "contentType",
        }
    }
}

impl std::fmt::Display for FacetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

// ============================================================================
// Column Type
// ============================================================================

/// Inferred type of a list column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnType {
    Choice,
    MultiChoice,
    Calculated,
    Boolean,
    Currency,
    DateTime,
    HyperlinkOrPicture,
    Lookup,
    Number,
    PersonOrGroup,
    Text,
    Location,
    Term,
    Thumbnail,
    ContentType,
    /// No recognized facet
    Unknown,
}

impl ColumnType {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::MultiChoice => "multiChoice",
            ColumnType::Unknown => "unknown",
            other => other.facet().map_or("unknown", FacetKind::key),
        }
    }

    /// Facet that carries the details for this type
    pub fn facet(self) -> Option<FacetKind> {
        let kind = match self {
            ColumnType::Choice | ColumnType::MultiChoice => FacetKind::Choice,
            ColumnType::Calculated => FacetKind::Calculated,
            ColumnType::Boolean => FacetKind::Boolean,
            ColumnType::Currency => FacetKind::Currency,
            ColumnType::DateTime => FacetKind::DateTime,
            ColumnType::HyperlinkOrPicture => FacetKind::HyperlinkOrPicture,
            ColumnType::Lookup => FacetKind::Lookup,
            ColumnType::Number => FacetKind::Number,
            ColumnType::PersonOrGroup => FacetKind::PersonOrGroup,
            ColumnType::Text => FacetKind::Text,
            ColumnType::Location => FacetKind::Location,
            ColumnType::Term => FacetKind::Term,
            ColumnType::Thumbnail => FacetKind::Thumbnail,
            ColumnType::ContentType => FacetKind::ContentType,
            ColumnType::Unknown => return None,
        };
        Some(kind)
    }
}

impl From<FacetKind> for ColumnType {
    fn from(kind: FacetKind) -> Self {
        match kind {
            FacetKind::Choice => ColumnType::Choice,
            FacetKind::Calculated => ColumnType::Calculated,
            FacetKind::Boolean => ColumnType::Boolean,
            FacetKind::Currency => ColumnType::Currency,
            FacetKind::DateTime => ColumnType::DateTime,
            FacetKind::HyperlinkOrPicture => ColumnType::HyperlinkOrPicture,
            FacetKind::Lookup => ColumnType::Lookup,
            FacetKind::Number => ColumnType::Number,
            FacetKind::PersonOrGroup => ColumnType::PersonOrGroup,
            FacetKind::Text => ColumnType::Text,
            FacetKind::Location => ColumnType::Location,
            FacetKind::Term => ColumnType::Term,
            FacetKind::Thumbnail => ColumnType::Thumbnail,
            FacetKind::ContentType => ColumnType::ContentType,
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Facets
// ============================================================================

/// The facet sub-fields that end up in a column summary
///
/// Every sub-field is kept as display text; values of unexpected shape are
/// treated as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Facet {
    Choice {
        choices: Vec<String>,
        allow_multiple: bool,
    },
    Calculated {
        formula: Option<String>,
        output_type: Option<String>,
    },
    Boolean,
    Currency {
        locale: Option<String>,
        symbol: Option<String>,
    },
    DateTime {
        display_as: Option<String>,
        format: Option<String>,
    },
    HyperlinkOrPicture {
        is_picture: Option<String>,
    },
    Lookup {
        list_id: Option<String>,
        column_name: Option<String>,
    },
    Number {
        decimals: Option<String>,
        min: Option<String>,
        max: Option<String>,
    },
    PersonOrGroup {
        allow_multiple: Option<String>,
        choose_from: Option<String>,
    },
    Text {
        max_length: Option<String>,
        multiline: Option<String>,
    },
    Location,
    Term {
        allow_multiple: Option<String>,
    },
    Thumbnail,
    ContentType,
}

// ============================================================================
// Column Descriptor
// ============================================================================

/// A raw column definition as returned by `GET .../lists/{list}/columns`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnDescriptor {
    pub id: Option<String>,
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub column_group: Option<String>,
    pub required: bool,
    pub read_only: bool,
    pub hidden: bool,
    pub indexed: bool,
    pub enforce_unique_values: bool,
    /// Every key not extracted above, facets included
    pub facets: JsonObject,
}

impl ColumnDescriptor {
    /// Extract a descriptor from one item of the `value` array
    ///
    /// Extraction never fails: fields of the wrong type are treated as
    /// absent and flags default to false.
    pub fn from_json(item: &JsonValue) -> Self {
        let Some(obj) = item.as_object() else {
            return Self::default();
        };

        let text = |key: &str| obj.get(key).and_then(JsonValue::as_str).map(str::to_string);
        let flag = |key: &str| obj.get(key).and_then(JsonValue::as_bool).unwrap_or(false);

        let facets = obj
            .iter()
            .filter(|(key, _)| !Self::FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            id: text("id"),
            name: text("name"),
            display_name: text("displayName"),
            description: text("description"),
            column_group: text("columnGroup"),
            required: flag("required"),
            read_only: flag("readOnly"),
            hidden: flag("hidden"),
            indexed: flag("indexed"),
            enforce_unique_values: flag("enforceUniqueValues"),
            facets,
        }
    }

    const FIELDS: [&'static str; 10] = [
        "id",
        "name",
        "displayName",
        "description",
        "columnGroup",
        "required",
        "readOnly",
        "hidden",
        "indexed",
        "enforceUniqueValues",
    ];

    /// Facet value for a kind, when present and not null
    pub fn facet(&self, kind: FacetKind) -> Option<&JsonValue> {
        self.facets.get(kind.key()).filter(|v| !v.is_null())
    }

    /// Internal name, falling back to the column id
    pub fn internal_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.id.clone())
            .unwrap_or_default()
    }
}

// ============================================================================
// Normalized Column
// ============================================================================

/// One row of the result table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedColumn {
    pub internal_name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub required: bool,
    pub read_only: bool,
    pub hidden: bool,
    pub indexed: bool,
    pub enforce_unique: bool,
    pub details: String,
}

impl NormalizedColumn {
    /// Field values in header order
    pub fn to_record(&self) -> [String; 9] {
        [
            self.internal_name.clone(),
            self.display_name.clone(),
            self.column_type.to_string(),
            self.required.to_string(),
            self.read_only.to_string(),
            self.hidden.to_string(),
            self.indexed.to_string(),
            self.enforce_unique.to_string(),
            self.details.clone(),
        ]
    }
}

// ============================================================================
// Result Table
// ============================================================================

/// Normalized columns of one list, in API order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultTable {
    rows: Vec<NormalizedColumn>,
}

impl ResultTable {
    /// Fixed header order
    pub const HEADERS: [&'static str; 9] = [
        "internalName",
        "displayName",
        "type",
        "required",
        "readOnly",
        "hidden",
        "indexed",
        "enforceUnique",
        "details",
    ];

    pub fn new(rows: Vec<NormalizedColumn>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[NormalizedColumn] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedColumn> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> Vec<NormalizedColumn> {
        self.rows
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a NormalizedColumn;
    type IntoIter = std::slice::Iter<'a, NormalizedColumn>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Result of selecting named columns from a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Matched rows, in request order
    pub table: ResultTable,
    /// Requested names that matched no column
    pub missing: Vec<String>,
}
