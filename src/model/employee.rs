use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

use crate::consts::consts::EmployeeId;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Relationship {
    Child,
    Spouse,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Dependent {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<Relationship>,
}

impl Dependent {
    pub fn new(first_name: String, last_name: String, relationship: Relationship) -> Self {
        Dependent {
            first_name,
            last_name,
            relationship: Some(relationship),
        }
    }
}

/// An employee as stored in the collection. The default value is the blank
/// record a form starts from before anything has been typed.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    /// Stored as `null`, `[]` or missing; always normalized to a vector
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dependents: Vec<Dependent>,
}

impl Employee {
    pub fn new(first_name: String, last_name: String, dependents: Vec<Dependent>) -> Self {
        Employee {
            id: EmployeeId::new(),
            first_name,
            last_name,
            dependents,
        }
    }

    pub fn new_test() -> Self {
        Employee {
            id: EmployeeId("1".to_string()),
            first_name: "Test".to_string(),
            last_name: "Employee".to_string(),
            dependents: vec![],
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Dependent>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<Dependent>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_null_dependents_are_empty() {
        let employees: Vec<Employee> = serde_json::from_str(
            r#"[
                {"id": "1", "first_name": "Ann", "last_name": "Lee"},
                {"id": "2", "first_name": "Bob", "last_name": "Ray", "dependents": null}
            ]"#,
        )
        .unwrap();

        assert!(employees[0].dependents.is_empty());
        assert!(employees[1].dependents.is_empty());
    }

    #[test]
    fn dependent_without_relationship_is_not_serialized_with_one() {
        let dependent = Dependent {
            first_name: "Amy".to_string(),
            last_name: "Lee".to_string(),
            relationship: None,
        };

        let json = serde_json::to_value(&dependent).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"first_name": "Amy", "last_name": "Lee"})
        );
    }

    #[test]
    fn relationship_parses_case_insensitively() {
        assert_eq!("spouse".parse::<Relationship>().unwrap(), Relationship::Spouse);
        assert_eq!("CHILD".parse::<Relationship>().unwrap(), Relationship::Child);
        assert!("Cousin".parse::<Relationship>().is_err());
    }

    #[test]
    fn blank_employee_has_empty_fields() {
        let employee = Employee::default();

        assert_eq!(employee.id.as_str(), "");
        assert_eq!(employee.first_name, "");
        assert_eq!(employee.last_name, "");
        assert!(employee.dependents.is_empty());
    }

    #[test]
    fn new_employee_gets_a_unique_id() {
        let one = Employee::new("Ann".to_string(), "Lee".to_string(), vec![]);
        let two = Employee::new("Ann".to_string(), "Lee".to_string(), vec![]);

        assert_ne!(one.id, two.id);
    }
}
