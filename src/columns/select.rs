//! Column selection by name

use super::types::{ResultTable, Selection};
use regex::{Captures, Regex};
use std::collections::HashSet;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// SharePoint escape of a UTF-16 code unit in internal names: `_x0020_`
static ESCAPE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_x([0-9A-Fa-f]{4})_").unwrap());

/// Decode `_xNNNN_` escapes, apply NFKC, trim and lower-case a column name
///
/// `My_x0020_Field` and ` my field ` both normalize to `my field`.
pub fn normalize_name(name: &str) -> String {
    let decoded = ESCAPE_REGEX.replace_all(name, |caps: &Captures<'_>| {
        u32::from_str_radix(&caps[1], 16)
            .ok()
            .and_then(char::from_u32)
            .map_or_else(|| caps[0].to_string(), |c| c.to_string())
    });
    decoded.nfkc().collect::<String>().trim().to_lowercase()
}

impl ResultTable {
    /// Pick rows by internal or display name, in request order
    ///
    /// Blank names are ignored; a row requested twice appears once.
    pub fn select(&self, names: &[String]) -> Selection {
        let mut picked = Vec::new();
        let mut seen = HashSet::new();
        let mut missing = Vec::new();

        for requested in names {
            let wanted = normalize_name(requested);
            if wanted.is_empty() {
                continue;
            }

            let found = self.iter().position(|row| {
                normalize_name(&row.internal_name) == wanted
                    || normalize_name(&row.display_name) == wanted
            });

            match found {
                Some(index) => {
                    if seen.insert(index) {
                        picked.push(self.rows()[index].clone());
                    }
                }
                None => missing.push(requested.trim().to_string()),
            }
        }

        Selection {
            table: ResultTable::new(picked),
            missing,
        }
    }
}
