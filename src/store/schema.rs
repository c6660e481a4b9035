use std::{collections::HashSet, fmt};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::{consts::consts::MIN_NAME_LENGTH, model::employee::Employee};

const RELATIONSHIPS: [&str; 2] = ["Child", "Spouse"];

#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    /// JSON path to the offending value, e.g. `[2].dependents[0].relationship`
    pub path: String,
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} {}", self.path, self.message)
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", format_violations(.violations))]
pub struct SchemaValidationError {
    pub violations: Vec<FieldViolation>,
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}

#[derive(Default)]
struct Violations(Vec<FieldViolation>);

impl Violations {
    fn push(&mut self, path: String, message: &str) {
        self.0.push(FieldViolation {
            path,
            message: message.to_string(),
        });
    }
}

/// Checks a parsed JSON document against the employee collection schema and,
/// when it conforms, converts it into employees. Every violation is reported,
/// not only the first.
///
/// Shape:
/// - the document is a required array of objects
/// - `id` is a required non-empty string
/// - `first_name` / `last_name` are required strings of at least two characters
/// - `dependents` is missing, `null`, or an array of objects whose optional
///   `first_name` / `last_name` are strings and `relationship` is `Child` or `Spouse`
///
/// Numbers and booleans in string fields are converted to their string form
/// first, so `"id": 7` is read as `"7"`. Unknown keys are ignored. Duplicate ids
/// are logged but accepted.
pub fn validate_employees(document: &Value) -> Result<Vec<Employee>, SchemaValidationError> {
    let mut violations = Violations::default();

    let mut document = document.clone();
    coerce_string_fields(&mut document);

    let items = match &document {
        Value::Array(items) => items,
        Value::Null => {
            violations.push(String::new(), "is a required field");
            return Err(SchemaValidationError {
                violations: violations.0,
            });
        }
        _ => {
            violations.push(String::new(), "must be an array of employees");
            return Err(SchemaValidationError {
                violations: violations.0,
            });
        }
    };

    for (index, item) in items.iter().enumerate() {
        validate_employee(&format!("[{}]", index), item, &mut violations);
    }

    if !violations.0.is_empty() {
        return Err(SchemaValidationError {
            violations: violations.0,
        });
    }

    let employees: Vec<Employee> =
        serde_json::from_value(document).map_err(|e| SchemaValidationError {
            violations: vec![FieldViolation {
                path: String::new(),
                message: e.to_string(),
            }],
        })?;

    warn_on_duplicate_ids(&employees);

    Ok(employees)
}

const EMPLOYEE_STRING_FIELDS: [&str; 3] = ["id", "first_name", "last_name"];
const DEPENDENT_STRING_FIELDS: [&str; 3] = ["first_name", "last_name", "relationship"];

fn coerce_string_fields(document: &mut Value) {
    let Value::Array(items) = document else {
        return;
    };

    for item in items.iter_mut() {
        let Value::Object(fields) = item else {
            continue;
        };

        coerce_fields(fields, &EMPLOYEE_STRING_FIELDS);

        if let Some(Value::Array(dependents)) = fields.get_mut("dependents") {
            for dependent in dependents.iter_mut() {
                if let Value::Object(fields) = dependent {
                    coerce_fields(fields, &DEPENDENT_STRING_FIELDS);
                }
            }
        }
    }
}

fn coerce_fields(fields: &mut Map<String, Value>, keys: &[&str]) {
    for key in keys {
        let coerced = match fields.get(*key) {
            Some(Value::Number(number)) => number.to_string(),
            Some(Value::Bool(flag)) => flag.to_string(),
            _ => continue,
        };

        fields.insert(key.to_string(), Value::String(coerced));
    }
}

fn validate_employee(path: &str, item: &Value, violations: &mut Violations) {
    let fields = match item {
        Value::Object(fields) => fields,
        _ => {
            violations.push(path.to_string(), "must be an object");
            return;
        }
    };

    required_string(path, fields, "id", 1, violations);
    required_string(path, fields, "first_name", MIN_NAME_LENGTH, violations);
    required_string(path, fields, "last_name", MIN_NAME_LENGTH, violations);

    match fields.get("dependents") {
        None | Some(Value::Null) => {}
        Some(Value::Array(dependents)) => {
            for (index, dependent) in dependents.iter().enumerate() {
                validate_dependent(
                    &format!("{}.dependents[{}]", path, index),
                    dependent,
                    violations,
                );
            }
        }
        Some(_) => violations.push(format!("{}.dependents", path), "must be an array"),
    }
}

fn validate_dependent(path: &str, item: &Value, violations: &mut Violations) {
    let fields = match item {
        Value::Object(fields) => fields,
        _ => {
            violations.push(path.to_string(), "must be an object");
            return;
        }
    };

    optional_string(path, fields, "first_name", violations);
    optional_string(path, fields, "last_name", violations);

    if let Some(relationship) = optional_string(path, fields, "relationship", violations) {
        if !RELATIONSHIPS.contains(&relationship) {
            violations.push(
                format!("{}.relationship", path),
                "must be one of the following values: Child, Spouse",
            );
        }
    }
}

fn required_string(
    path: &str,
    fields: &Map<String, Value>,
    key: &str,
    min_length: usize,
    violations: &mut Violations,
) {
    let field_path = format!("{}.{}", path, key);

    match fields.get(key) {
        None | Some(Value::Null) => violations.push(field_path, "is a required field"),
        Some(Value::String(value)) if value.is_empty() => {
            violations.push(field_path, "is a required field")
        }
        Some(Value::String(value)) if value.chars().count() < min_length => violations.push(
            field_path,
            &format!("must be at least {} characters", min_length),
        ),
        Some(Value::String(_)) => {}
        Some(_) => violations.push(field_path, "must be a string"),
    }
}

/// Missing is fine, present must be a string (`null` included)
fn optional_string<'a>(
    path: &str,
    fields: &'a Map<String, Value>,
    key: &str,
    violations: &mut Violations,
) -> Option<&'a str> {
    match fields.get(key) {
        None => None,
        Some(Value::String(value)) => Some(value.as_str()),
        Some(_) => {
            violations.push(format!("{}.{}", path, key), "must be a string");
            None
        }
    }
}

fn warn_on_duplicate_ids(employees: &[Employee]) {
    let mut seen = HashSet::new();

    for employee in employees {
        if !seen.insert(employee.id.as_str()) {
            log::warn!("Duplicate employee id in collection: {}", employee.id);
        }
    }
}
