use std::path::PathBuf;

use anyhow::{anyhow, bail};
use benefits::{
    calculator::{
        benefits::{BenefitBreakdown, CostParameters},
        currency::CurrencyFormat,
    },
    consts::consts::EmployeeId,
    model::employee::{Dependent, Employee, Relationship},
    persistence::storage::{memory::MemoryStorage, StorageEngine},
    store::{options::StoreOptions, request_manager::RequestManager, store::EmployeeStore},
};
use clap::{Args, Parser, Subcommand};

/// 🩺 Benefits CLI, manages employees and previews their annual benefit costs
///
/// Employees are kept in a single JSON collection under the data directory.
/// The bundled default employees are written on first use.
#[derive(Parser, Debug)]
struct Cli {
    /// Location of the employee store. Reads / writes to this directory. Note: Does not support shell paths, e.g. ~
    #[clap(short, long, default_value = "data")]
    data: PathBuf,

    /// Keep employees in memory only, nothing is read from or written to disk
    #[clap(long)]
    in_memory: bool,

    /// Locale used to format amounts, e.g. en-US or de
    #[clap(long, default_value = "en-US")]
    locale: String,

    /// ISO 4217 currency code used to format amounts
    #[clap(long, default_value = "USD")]
    currency: String,

    #[clap(flatten)]
    costs: CostArgs,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct CostArgs {
    /// Discount percentage for anyone whose first name starts with 'A'
    #[clap(long)]
    discount: Option<f64>,

    /// Amount of a single paycheck
    #[clap(long)]
    paycheck: Option<f64>,

    #[clap(long)]
    paychecks_per_year: Option<f64>,

    /// Annual benefit cost of the employee
    #[clap(long)]
    employee_cost: Option<f64>,

    /// Annual benefit cost of each dependent
    #[clap(long)]
    dependent_cost: Option<f64>,
}

impl CostArgs {
    fn parameters(&self) -> CostParameters {
        CostParameters::with_overrides(
            self.discount,
            self.paycheck,
            self.paychecks_per_year,
            self.employee_cost,
            self.dependent_cost,
        )
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lists every employee with their net annual benefits
    List,

    /// Shows the cost breakdown of a single employee
    Show { id: String },

    /// Adds a new employee
    Add {
        first_name: String,
        last_name: String,

        /// Dependent as FIRST:LAST:RELATIONSHIP, e.g. Amy:Lee:Child. Repeatable
        #[clap(long = "dependent", value_parser = parse_dependent)]
        dependents: Vec<Dependent>,
    },

    /// Changes an employee's name
    Rename {
        id: String,

        #[clap(long)]
        first_name: Option<String>,

        #[clap(long)]
        last_name: Option<String>,
    },

    /// Adds a dependent to an existing employee
    AddDependent {
        id: String,
        first_name: String,
        last_name: String,

        /// Child or Spouse
        relationship: Relationship,
    },

    /// Removes an employee
    Remove { id: String },
}

fn parse_dependent(value: &str) -> Result<Dependent, String> {
    let parts: Vec<&str> = value.split(':').collect();

    match parts.as_slice() {
        [first_name, last_name, relationship] => {
            let relationship = relationship
                .parse::<Relationship>()
                .map_err(|_| format!("Unknown relationship: {}", relationship))?;

            Ok(Dependent::new(
                first_name.to_string(),
                last_name.to_string(),
                relationship,
            ))
        }
        _ => Err("Expected FIRST:LAST:RELATIONSHIP".to_string()),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Cli::parse();

    let storage_engine = if args.in_memory {
        StorageEngine::Memory(MemoryStorage::new())
    } else {
        StorageEngine::File(args.data.clone())
    };

    let request_manager =
        EmployeeStore::new(StoreOptions::default().set_storage_engine(storage_engine))?.run()?;

    let format = CurrencyFormat::new(Some(&args.locale), None, Some(&args.currency))?;

    let result = execute(
        args.command,
        &request_manager,
        &args.costs.parameters(),
        &format,
    );

    let shutdown_response = request_manager.send_shutdown_request()?;

    log::info!("{}", shutdown_response);

    result
}

fn execute(
    command: Command,
    request_manager: &RequestManager,
    parameters: &CostParameters,
    format: &CurrencyFormat,
) -> anyhow::Result<()> {
    match command {
        Command::List => {
            for employee in request_manager.get()? {
                let breakdown = BenefitBreakdown::new(&employee, parameters);

                println!(
                    "{}  {:<24} dependents: {}  net: {}  per paycheck: -{}",
                    employee.id,
                    employee.full_name(),
                    employee.dependents.len(),
                    format.format(breakdown.net())?,
                    format.format(breakdown.deduction_per_paycheck())?,
                );
            }
        }
        Command::Show { id } => {
            let employee = find_employee(&request_manager.get()?, &id)?;

            print_breakdown(&employee, parameters, format)?;
        }
        Command::Add {
            first_name,
            last_name,
            dependents,
        } => {
            let employee = Employee::new(first_name, last_name, dependents);
            let added = employee.clone();

            request_manager.post(move |mut employees| {
                employees.push(added);
                Some(employees)
            })?;

            println!("Added {} ({})", employee.full_name(), employee.id);
        }
        Command::Rename {
            id,
            first_name,
            last_name,
        } => {
            if first_name.is_none() && last_name.is_none() {
                bail!("Nothing to rename, pass --first-name and / or --last-name");
            }

            let id = existing_id(request_manager, &id)?;

            let employees = request_manager.put(move |employees| {
                Some(
                    employees
                        .into_iter()
                        .map(|mut employee| {
                            if employee.id == id {
                                if let Some(first_name) = &first_name {
                                    employee.first_name = first_name.clone();
                                }
                                if let Some(last_name) = &last_name {
                                    employee.last_name = last_name.clone();
                                }
                            }
                            employee
                        })
                        .collect(),
                )
            })?;

            println!("Saved {} employees", employees.len());
        }
        Command::AddDependent {
            id,
            first_name,
            last_name,
            relationship,
        } => {
            let id = existing_id(request_manager, &id)?;
            let dependent = Dependent::new(first_name, last_name, relationship);

            let employees = request_manager.put(move |employees| {
                Some(
                    employees
                        .into_iter()
                        .map(|mut employee| {
                            if employee.id == id {
                                employee.dependents.push(dependent.clone());
                            }
                            employee
                        })
                        .collect(),
                )
            })?;

            println!("Saved {} employees", employees.len());
        }
        Command::Remove { id } => {
            let id = existing_id(request_manager, &id)?;

            let employees = request_manager.delete(move |employees| {
                Some(employees.into_iter().filter(|e| e.id != id).collect())
            })?;

            println!("Removed, {} employees remaining", employees.len());
        }
    }

    Ok(())
}

fn find_employee(employees: &[Employee], id: &str) -> anyhow::Result<Employee> {
    employees
        .iter()
        .find(|employee| employee.id.as_str() == id)
        .cloned()
        .ok_or_else(|| anyhow!("No employee with id: {}", id))
}

fn existing_id(request_manager: &RequestManager, id: &str) -> anyhow::Result<EmployeeId> {
    Ok(find_employee(&request_manager.get()?, id)?.id)
}

fn print_breakdown(
    employee: &Employee,
    parameters: &CostParameters,
    format: &CurrencyFormat,
) -> anyhow::Result<()> {
    let breakdown = BenefitBreakdown::new(employee, parameters);

    println!("{} ({})", employee.full_name(), employee.id);
    println!("  Annual salary:        {}", format.format(breakdown.annual_salary)?);
    println!("  Employee benefits:    -{}", format.format(breakdown.employee_cost)?);

    for (dependent, cost) in employee.dependents.iter().zip(&breakdown.dependent_costs) {
        let relationship = dependent
            .relationship
            .map(|r| r.to_string())
            .unwrap_or_else(|| "Dependent".to_string());

        println!(
            "  {:<21} -{}",
            format!("{} ({}):", dependent.first_name, relationship),
            format.format(*cost)?
        );
    }

    println!("  Total benefit cost:   -{}", format.format(breakdown.total_cost())?);
    println!(
        "  Per paycheck:         -{}",
        format.format(breakdown.deduction_per_paycheck())?
    );
    println!("  Net annual:           {}", format.format(breakdown.net())?);

    Ok(())
}
