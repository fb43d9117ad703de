//! Field-merge policies for read-modify-write edits.
//!
//! The backend has no PATCH endpoints, so editing an entity means fetching
//! it, overlaying the caller-supplied fields and issuing a full PUT. Which
//! caller values count as "supplied" differs per field and must stay
//! compatible with the original adapter: string fields honour an explicit
//! empty string, while numeric and enum fields fall back to the fetched
//! value unless the caller's value is truthy. The rules are kept in one
//! declarative table per entity kind so the asymmetry stays visible.

use serde_json::{Map, Value};

/// How a caller-supplied field overlays the fetched entity's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Use the caller's value whenever one was supplied, even an empty string.
    OverrideIfProvided,
    /// Use the caller's value only when it is truthy; zero, the empty string
    /// and null all fall back to the fetched value. A legitimate zero cannot
    /// be set through such a field; preserved for compatibility.
    OverrideIfTruthy,
}

use MergePolicy::{OverrideIfProvided, OverrideIfTruthy};

/// Editable fields of a client.
pub const CLIENT_FIELDS: &[(&str, MergePolicy)] = &[
    ("name", OverrideIfProvided),
    ("contactInformation", OverrideIfProvided),
    ("address", OverrideIfProvided),
    ("notes", OverrideIfProvided),
];

/// Editable fields of a case.
pub const CASE_FIELDS: &[(&str, MergePolicy)] = &[
    ("title", OverrideIfProvided),
    ("description", OverrideIfProvided),
    ("courtDate", OverrideIfProvided),
    ("status", OverrideIfTruthy),
    ("clientId", OverrideIfTruthy),
    ("assignedUserId", OverrideIfTruthy),
];

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Overlay caller-supplied fields onto the fetched entity, producing the
/// full update payload. `input` holds only the fields the caller actually
/// supplied. Entity fields outside the rule table pass through untouched,
/// so backend fields the adapter does not model survive the round trip.
pub fn merge_entity(
    current: &Value,
    input: &Map<String, Value>,
    rules: &[(&str, MergePolicy)],
) -> Map<String, Value> {
    let mut merged = current.as_object().cloned().unwrap_or_default();

    for (name, policy) in rules {
        let Some(supplied) = input.get(*name) else {
            continue;
        };
        let take = match policy {
            OverrideIfProvided => true,
            OverrideIfTruthy => is_truthy(supplied),
        };
        if take {
            merged.insert((*name).to_string(), supplied.clone());
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn as_map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn no_supplied_fields_is_a_noop_update() {
        let current = json!({
            "id": 3,
            "name": "Acme",
            "contactInformation": "x",
            "address": "Y"
        });

        let merged = merge_entity(&current, &Map::new(), CLIENT_FIELDS);
        assert_eq!(Value::Object(merged), current);
    }

    #[test]
    fn provided_string_fields_win_even_when_empty() {
        let current = json!({ "name": "Acme", "notes": "antiguo" });
        let input = as_map(json!({ "name": "Acme S.L.", "notes": "" }));

        let merged = merge_entity(&current, &input, CLIENT_FIELDS);
        assert_eq!(
            Value::Object(merged),
            json!({ "name": "Acme S.L.", "notes": "" })
        );
    }

    #[test]
    fn falsy_values_fall_back_on_truthy_fields() {
        let current = json!({ "title": "Caso", "status": "Closed", "clientId": 9 });
        let input = as_map(json!({ "status": "", "clientId": 0 }));

        let merged = merge_entity(&current, &input, CASE_FIELDS);
        assert_eq!(
            Value::Object(merged),
            json!({ "title": "Caso", "status": "Closed", "clientId": 9 })
        );
    }

    #[test]
    fn truthy_values_override_on_truthy_fields() {
        let current = json!({ "status": "Open", "clientId": 9 });
        let input = as_map(json!({ "status": "Pending", "clientId": 4 }));

        let merged = merge_entity(&current, &input, CASE_FIELDS);
        assert_eq!(
            Value::Object(merged),
            json!({ "status": "Pending", "clientId": 4 })
        );
    }

    #[test]
    fn unmodeled_backend_fields_survive_the_merge() {
        let current = json!({ "name": "Acme", "createdAt": "2024-01-01" });
        let input = as_map(json!({ "name": "Nuevo" }));

        let merged = merge_entity(&current, &input, CLIENT_FIELDS);
        assert_eq!(
            Value::Object(merged),
            json!({ "name": "Nuevo", "createdAt": "2024-01-01" })
        );
    }

    #[test]
    fn truthiness_matches_the_original_rules() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("Open")));
    }
}
