//! Tests for the columns module

use super::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_case::test_case;

fn descriptor(value: Value) -> ColumnDescriptor {
    ColumnDescriptor::from_json(&value)
}

// ============================================================================
// Descriptor extraction
// ============================================================================

#[test]
fn test_descriptor_extracts_fields_and_facets() {
    let desc = descriptor(json!({
        "id": "fa564e0f-0c70-4ab9-b863-0177e6ddd247",
        "name": "Title",
        "displayName": "Title",
        "columnGroup": "Custom Columns",
        "required": true,
        "indexed": true,
        "text": {"maxLength": 255}
    }));

    assert_eq!(desc.name.as_deref(), Some("Title"));
    assert_eq!(desc.column_group.as_deref(), Some("Custom Columns"));
    assert!(desc.required);
    assert!(desc.indexed);
    assert!(!desc.hidden);
    assert!(desc.facets.contains_key("text"));
    assert!(!desc.facets.contains_key("name"));
}

#[test]
fn test_descriptor_is_lenient() {
    let desc = descriptor(json!({
        "name": 42,
        "required": "yes",
        "hidden": null
    }));

    assert_eq!(desc.name, None);
    assert!(!desc.required);
    assert!(!desc.hidden);

    assert_eq!(descriptor(json!("not an object")), ColumnDescriptor::default());
}

#[test]
fn test_null_facet_is_not_present() {
    let desc = descriptor(json!({"name": "x", "choice": null, "text": {}}));
    assert_eq!(recognized_facets(&desc), vec![FacetKind::Text]);
    assert_eq!(detect_type(&desc), ColumnType::Text);
}

// ============================================================================
// Type detection
// ============================================================================

#[test_case("choice", ColumnType::Choice)]
#[test_case("calculated", ColumnType::Calculated)]
#[test_case("boolean", ColumnType::Boolean)]
#[test_case("currency", ColumnType::Currency)]
#[test_case("dateTime", ColumnType::DateTime)]
#[test_case("hyperlinkOrPicture", ColumnType::HyperlinkOrPicture)]
#[test_case("lookup", ColumnType::Lookup)]
#[test_case("number", ColumnType::Number)]
#[test_case("personOrGroup", ColumnType::PersonOrGroup)]
#[test_case("text", ColumnType::Text)]
#[test_case("location", ColumnType::Location)]
#[test_case("term", ColumnType::Term)]
#[test_case("thumbnail", ColumnType::Thumbnail)]
#[test_case("contentType", ColumnType::ContentType)]
fn test_single_facet_detection(key: &str, expected: ColumnType) {
    let mut item = json!({"name": "Col"});
    item[key] = json!({});
    assert_eq!(detect_type(&descriptor(item)), expected);
}

#[test_case(json!({"name": "Plain"}) ; "no facet")]
#[test_case(json!({"name": "Geo", "geolocation": {}}) ; "unrecognized facet")]
#[test_case(json!({}) ; "empty object")]
#[test_case(json!([1, 2, 3]) ; "not an object")]
fn test_unknown_detection(item: Value) {
    assert_eq!(detect_type(&descriptor(item)), ColumnType::Unknown);
}

#[test]
fn test_multi_choice_discrimination() {
    let single = descriptor(json!({
        "choice": {"choices": ["A", "B"], "allowMultipleSelections": false}
    }));
    let multi = descriptor(json!({
        "choice": {"choices": ["A", "B"], "allowMultipleSelections": true}
    }));
    let flag_missing = descriptor(json!({"choice": {"choices": ["A"]}}));

    assert_eq!(detect_type(&single), ColumnType::Choice);
    assert_eq!(detect_type(&multi), ColumnType::MultiChoice);
    assert_eq!(detect_type(&flag_missing), ColumnType::Choice);
}

#[test]
fn test_priority_resolves_ambiguous_facets() {
    let desc = descriptor(json!({
        "name": "Total",
        "text": {"maxLength": 10},
        "calculated": {"formula": "=[A]+[B]"}
    }));

    assert_eq!(
        recognized_facets(&desc),
        vec![FacetKind::Calculated, FacetKind::Text]
    );
    assert_eq!(detect_type(&desc), ColumnType::Calculated);
}

#[test]
fn test_column_type_serialization() {
    assert_eq!(
        serde_json::to_value(ColumnType::MultiChoice).unwrap(),
        json!("multiChoice")
    );
    assert_eq!(
        serde_json::to_value(ColumnType::HyperlinkOrPicture).unwrap(),
        json!("hyperlinkOrPicture")
    );
    for kind in FacetKind::PRIORITY {
        let ty = ColumnType::from(kind);
        assert_eq!(ty.as_str(), kind.key());
        assert_eq!(serde_json::to_value(ty).unwrap(), json!(kind.key()));
    }
    assert_eq!(ColumnType::Unknown.to_string(), "unknown");
}

// ============================================================================
// Summaries
// ============================================================================

fn summary_of(item: Value) -> String {
    let desc = descriptor(item);
    summarize_details(detect_type(&desc), &desc)
}

#[test_case(
    json!({"choice": {"choices": ["Red", "Green", "Blue"]}}),
    "choices=[Red, Green, Blue]" ; "choice")]
#[test_case(
    json!({"choice": {"choices": ["A", "B"], "allowMultipleSelections": true}}),
    "choices=[A, B]" ; "multi choice")]
#[test_case(
    json!({"lookup": {"listId": "0f1e", "columnName": "Title"}}),
    "lookup:listId=0f1e, columnName=Title" ; "lookup")]
#[test_case(
    json!({"personOrGroup": {"allowMultipleSelection": true, "chooseFromType": "peopleOnly"}}),
    "allowMultiple=true, chooseFrom=peopleOnly" ; "person or group")]
#[test_case(
    json!({"personOrGroup": {"allowMultiple": false, "allowedUserType": "peopleAndGroups"}}),
    "allowMultiple=false, chooseFrom=peopleAndGroups" ; "person or group legacy keys")]
#[test_case(
    json!({"dateTime": {"displayAs": "default", "format": "dateOnly"}}),
    "displayAs=default, format=dateOnly" ; "date time")]
#[test_case(
    json!({"number": {"decimalPlaces": "two", "minimum": 0, "maximum": 100.5}}),
    "decimals=two, min=0, max=100.5" ; "number")]
#[test_case(
    json!({"number": {"decimalPlaces": "automatic"}}),
    "decimals=automatic" ; "number without bounds")]
#[test_case(json!({"currency": {"locale": "de-DE"}}), "locale=de-DE" ; "currency")]
#[test_case(
    json!({"currency": {"locale": "de-DE", "symbol": "€"}}),
    "locale=de-DE, symbol=€" ; "currency with symbol")]
#[test_case(
    json!({"hyperlinkOrPicture": {"isPicture": true}}),
    "isPicture=true" ; "hyperlink or picture")]
#[test_case(
    json!({"calculated": {"formula": "=[A]*2", "outputType": "number"}}),
    "formula==[A]*2, outputType=number" ; "calculated")]
#[test_case(
    json!({"text": {"maxLength": 255, "allowMultipleLines": false}}),
    "maxLength=255, multiline=false" ; "text")]
#[test_case(json!({"term": {"allowMultipleValues": true}}), "allowMultiple=true" ; "term")]
#[test_case(json!({"boolean": {}}), "" ; "boolean")]
#[test_case(json!({"location": {}}), "" ; "location")]
#[test_case(json!({"thumbnail": {}}), "" ; "thumbnail")]
#[test_case(json!({"name": "x"}), "" ; "unknown")]
fn test_summaries(item: Value, expected: &str) {
    assert_eq!(summary_of(item), expected);
}

#[test]
fn test_summary_drops_malformed_sub_fields() {
    assert_eq!(
        summary_of(json!({"choice": {"choices": ["A", {"x": 1}, null, 3]}})),
        "choices=[A, 3]"
    );
    assert_eq!(summary_of(json!({"choice": {"choices": "A,B"}})), "choices=[]");
    assert_eq!(
        summary_of(json!({"lookup": {"listId": ["x"], "columnName": "Title"}})),
        "lookup:columnName=Title"
    );
}

#[test]
fn test_summary_for_empty_facets() {
    assert_eq!(summary_of(json!({"choice": {}})), "choices=[]");
    assert_eq!(summary_of(json!({"lookup": {}})), "lookup:");
    assert_eq!(summary_of(json!({"dateTime": {}})), "");
}

// ============================================================================
// Table assembly
// ============================================================================

fn team_a_columns() -> Vec<Value> {
    vec![
        json!({
            "id": "1",
            "name": "Status",
            "displayName": "Status",
            "required": false,
            "hidden": false,
            "choice": {
                "allowTextEntry": false,
                "choices": ["Open", "In Progress", "Closed"],
                "displayAs": "dropDownMenu"
            }
        }),
        json!({
            "id": "2",
            "name": "DueDate",
            "displayName": "Due Date",
            "dateTime": {"displayAs": "default", "format": "dateOnly"}
        }),
        json!({
            "id": "3",
            "name": "Notes",
            "displayName": "Notes",
            "text": {"allowMultipleLines": false, "maxLength": 255}
        }),
    ]
}

#[test]
fn test_team_a_scenario() {
    let table = build_table(team_a_columns());

    assert_eq!(table.len(), 3);
    let types: Vec<ColumnType> = table.iter().map(|r| r.column_type).collect();
    assert_eq!(
        types,
        vec![ColumnType::Choice, ColumnType::DateTime, ColumnType::Text]
    );

    let choice = &table.rows()[0];
    for option in ["Open", "In Progress", "Closed"] {
        assert!(choice.details.contains(option));
    }

    for row in &table {
        assert!(!row.required);
        assert!(!row.read_only);
        assert!(!row.hidden);
        assert!(!row.indexed);
        assert!(!row.enforce_unique);
    }
}

#[test]
fn test_normalize_column_full_row() {
    let row = normalize_column(&json!({
        "name": "Amount",
        "displayName": "Invoice Amount",
        "required": true,
        "readOnly": true,
        "hidden": true,
        "indexed": true,
        "enforceUniqueValues": true,
        "currency": {"locale": "en-US"}
    }));

    assert_eq!(
        row,
        NormalizedColumn {
            internal_name: "Amount".to_string(),
            display_name: "Invoice Amount".to_string(),
            column_type: ColumnType::Currency,
            required: true,
            read_only: true,
            hidden: true,
            indexed: true,
            enforce_unique: true,
            details: "locale=en-US".to_string(),
        }
    );
}

#[test]
fn test_name_fallbacks() {
    let by_id = normalize_column(&json!({"id": "abc-123"}));
    assert_eq!(by_id.internal_name, "abc-123");
    assert_eq!(by_id.display_name, "abc-123");

    let by_name = normalize_column(&json!({"name": "Internal"}));
    assert_eq!(by_name.display_name, "Internal");

    let nothing = normalize_column(&json!({}));
    assert_eq!(nothing.internal_name, "");
    assert_eq!(nothing.column_type, ColumnType::Unknown);
}

#[test]
fn test_build_table_preserves_order_and_count() {
    let items: Vec<Value> = (0..250)
        .map(|i| json!({"name": format!("col{i}"), "text": {}}))
        .collect();
    let table = build_table(items);

    assert_eq!(table.len(), 250);
    assert_eq!(table.rows()[0].internal_name, "col0");
    assert_eq!(table.rows()[249].internal_name, "col249");
}

#[test]
fn test_build_table_is_deterministic() {
    assert_eq!(build_table(team_a_columns()), build_table(team_a_columns()));
}

#[test]
fn test_build_table_empty() {
    let table = build_table(Vec::new());
    assert!(table.is_empty());
}

#[test]
fn test_row_record_order_matches_headers() {
    let table = build_table(team_a_columns());
    let record = table.rows()[1].to_record();

    assert_eq!(ResultTable::HEADERS.len(), record.len());
    assert_eq!(
        record,
        [
            "DueDate",
            "Due Date",
            "dateTime",
            "false",
            "false",
            "false",
            "false",
            "false",
            "displayAs=default, format=dateOnly",
        ]
        .map(String::from)
    );
}

#[test]
fn test_table_serializes_as_array() {
    let table = build_table(vec![json!({"name": "A", "boolean": {}})]);
    let value = serde_json::to_value(&table).unwrap();

    assert_eq!(
        value,
        json!([{
            "internalName": "A",
            "displayName": "A",
            "type": "boolean",
            "required": false,
            "readOnly": false,
            "hidden": false,
            "indexed": false,
            "enforceUnique": false,
            "details": ""
        }])
    );
}

// ============================================================================
// Selection
// ============================================================================

#[test_case("My_x0020_Field", "my field" ; "escaped space")]
#[test_case("  Due Date ", "due date" ; "trimmed")]
#[test_case("Caf_x00e9_", "caf\u{e9}" ; "escaped accent")]
#[test_case("Odd_x00zz_", "odd_x00zz_" ; "invalid escape kept")]
#[test_case("Title", "title" ; "plain")]
#[test_case("\u{ff33}\u{ff54}\u{ff41}\u{ff54}\u{ff55}\u{ff53}", "status" ; "fullwidth letters")]
#[test_case("\u{fb01}eld", "field" ; "ligature")]
#[test_case("Cafe_x0301_", "caf\u{e9}" ; "escaped combining accent composes")]
fn test_normalize_name(input: &str, expected: &str) {
    assert_eq!(normalize_name(input), expected);
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_select_in_request_order() {
    let table = build_table(team_a_columns());
    let selection = table.select(&names(&["notes", "Due Date", "STATUS"]));

    let picked: Vec<&str> = selection
        .table
        .iter()
        .map(|r| r.internal_name.as_str())
        .collect();
    assert_eq!(picked, vec!["Notes", "DueDate", "Status"]);
    assert!(selection.missing.is_empty());
}

#[test]
fn test_select_reports_missing() {
    let table = build_table(team_a_columns());
    let selection = table.select(&names(&["Status", " Budget ", "", "Owner"]));

    assert_eq!(selection.table.len(), 1);
    assert_eq!(selection.missing, names(&["Budget", "Owner"]));
}

#[test]
fn test_select_matches_escaped_internal_names() {
    let table = build_table(vec![json!({
        "name": "Project_x0020_Code",
        "displayName": "Code",
        "text": {}
    })]);

    let selection = table.select(&names(&["project code"]));
    assert_eq!(selection.table.len(), 1);
    assert_eq!(selection.table.rows()[0].display_name, "Code");
}

#[test]
fn test_select_ignores_repeats() {
    let table = build_table(team_a_columns());
    let selection = table.select(&names(&["Status", "status", "Status"]));

    assert_eq!(selection.table.len(), 1);
    assert!(selection.missing.is_empty());
}

#[test]
fn test_select_matches_compatibility_forms() {
    let table = build_table(team_a_columns());
    let selection = table.select(&names(&["\u{ff33}\u{ff54}\u{ff41}\u{ff54}\u{ff55}\u{ff53}"]));

    assert_eq!(selection.table.len(), 1);
    assert_eq!(selection.table.rows()[0].internal_name, "Status");
}
