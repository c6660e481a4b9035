use serde::{Deserialize, Serialize};
use uuid::Uuid;

// New Type Pattern -- https://doc.rust-lang.org/rust-by-example/generics/new_types.html
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct EmployeeId(pub String);

impl EmployeeId {
    pub fn new() -> EmployeeId {
        EmployeeId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Values

/// Gross amount of a single biweekly paycheck
pub const EMPLOYEE_BI_WEEKLY_PAYCHECK: f64 = 2000.0;
pub const PAYCHECKS_PER_YEAR: f64 = 26.0;
/// Annual cost of benefits for the employee themselves
pub const EMPLOYEE_COSTS_PER_YEAR: f64 = 1000.0;
/// Annual cost of benefits for each dependent
pub const DEPENDENTS_COSTS_PER_YEAR: f64 = 500.0;
/// Applied to anyone (employee or dependent) whose first name starts with 'A'
pub const DISCOUNT_PERCENTAGE: f64 = 10.0;

/// Key the whole employee collection is stored under
pub const STORAGE_KEY: &str = "state";

/// Names shorter than this are rejected by the schema
pub const MIN_NAME_LENGTH: usize = 2;
