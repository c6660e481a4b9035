use crate::{
    consts::consts::{
        DEPENDENTS_COSTS_PER_YEAR, DISCOUNT_PERCENTAGE, EMPLOYEE_BI_WEEKLY_PAYCHECK,
        EMPLOYEE_COSTS_PER_YEAR, PAYCHECKS_PER_YEAR,
    },
    model::employee::Employee,
};

/// Organisation-wide cost inputs. Every field defaults to the matching
/// organisational constant, override only what differs.
#[derive(Debug, Clone, PartialEq)]
pub struct CostParameters {
    pub special_discount_percent: f64,
    pub paycheck_amount: f64,
    pub paychecks_per_year: f64,
    pub individual_annual_cost: f64,
    pub dependent_annual_cost: f64,
}

// Implements: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
impl CostParameters {
    pub fn set_special_discount_percent(mut self, percent: f64) -> Self {
        self.special_discount_percent = percent;
        self
    }

    pub fn set_paycheck_amount(mut self, amount: f64) -> Self {
        self.paycheck_amount = amount;
        self
    }

    pub fn set_paychecks_per_year(mut self, paychecks: f64) -> Self {
        self.paychecks_per_year = paychecks;
        self
    }

    pub fn set_individual_annual_cost(mut self, cost: f64) -> Self {
        self.individual_annual_cost = cost;
        self
    }

    pub fn set_dependent_annual_cost(mut self, cost: f64) -> Self {
        self.dependent_annual_cost = cost;
        self
    }

    /// Each `None` keeps the organisational default
    pub fn with_overrides(
        special_discount_percent: Option<f64>,
        paycheck_amount: Option<f64>,
        paychecks_per_year: Option<f64>,
        individual_annual_cost: Option<f64>,
        dependent_annual_cost: Option<f64>,
    ) -> Self {
        let defaults = CostParameters::default();

        Self {
            special_discount_percent: special_discount_percent
                .unwrap_or(defaults.special_discount_percent),
            paycheck_amount: paycheck_amount.unwrap_or(defaults.paycheck_amount),
            paychecks_per_year: paychecks_per_year.unwrap_or(defaults.paychecks_per_year),
            individual_annual_cost: individual_annual_cost
                .unwrap_or(defaults.individual_annual_cost),
            dependent_annual_cost: dependent_annual_cost.unwrap_or(defaults.dependent_annual_cost),
        }
    }

    pub fn annual_salary(&self) -> f64 {
        self.paycheck_amount * self.paychecks_per_year
    }
}

impl Default for CostParameters {
    fn default() -> Self {
        Self {
            special_discount_percent: DISCOUNT_PERCENTAGE,
            paycheck_amount: EMPLOYEE_BI_WEEKLY_PAYCHECK,
            paychecks_per_year: PAYCHECKS_PER_YEAR,
            individual_annual_cost: EMPLOYEE_COSTS_PER_YEAR,
            dependent_annual_cost: DEPENDENTS_COSTS_PER_YEAR,
        }
    }
}

/// True when the first character is 'a' or 'A'. An empty name is never eligible.
pub fn is_eligible_for_discount(first_name: &str) -> bool {
    first_name
        .chars()
        .next()
        .map(|c| c.to_lowercase().eq(['a']))
        .unwrap_or(false)
}

pub fn discounted_cost(cost: f64, discount_percent: f64) -> f64 {
    cost - (cost * discount_percent) / 100.0
}

fn effective_cost(first_name: &str, cost: f64, discount_percent: f64) -> f64 {
    if is_eligible_for_discount(first_name) {
        discounted_cost(cost, discount_percent)
    } else {
        cost
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BenefitBreakdown {
    pub annual_salary: f64,
    pub employee_cost: f64,
    /// One entry per dependent, in the employee's dependent order
    pub dependent_costs: Vec<f64>,
    pub paychecks_per_year: f64,
}

impl BenefitBreakdown {
    pub fn new(employee: &Employee, parameters: &CostParameters) -> Self {
        let discount = parameters.special_discount_percent;

        let dependent_costs = employee
            .dependents
            .iter()
            .map(|dependent| {
                effective_cost(
                    &dependent.first_name,
                    parameters.dependent_annual_cost,
                    discount,
                )
            })
            .collect();

        BenefitBreakdown {
            annual_salary: parameters.annual_salary(),
            employee_cost: effective_cost(
                &employee.first_name,
                parameters.individual_annual_cost,
                discount,
            ),
            dependent_costs,
            paychecks_per_year: parameters.paychecks_per_year,
        }
    }

    pub fn total_cost(&self) -> f64 {
        self.dependent_costs
            .iter()
            .fold(self.employee_cost, |total, cost| total + cost)
    }

    /// Salary left after every benefit cost is subtracted. Not clamped, can go negative.
    pub fn net(&self) -> f64 {
        // Subtracted one at a time, in order, so the result is bit-for-bit the running total
        self.dependent_costs
            .iter()
            .fold(self.annual_salary - self.employee_cost, |total, cost| {
                total - cost
            })
    }

    /// Zero when there are no paychecks rather than dividing by zero
    pub fn deduction_per_paycheck(&self) -> f64 {
        if self.paychecks_per_year == 0.0 {
            return 0.0;
        }

        self.total_cost() / self.paychecks_per_year
    }
}

/// Annual salary minus the (possibly discounted) cost of the employee and each dependent
pub fn calculate_benefits(employee: &Employee, parameters: &CostParameters) -> f64 {
    BenefitBreakdown::new(employee, parameters).net()
}
