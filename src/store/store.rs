use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::mpsc::{self, Receiver},
    thread,
};

use serde_json::Value;

use crate::{
    consts::consts::STORAGE_KEY,
    model::{employee::Employee, method::HttpMethod},
    persistence::storage::{ReadBlobState, Storage},
};

use super::{
    options::StoreOptions,
    request_manager::{RequestManager, StoreCommand, StoreRequest, StoreResponse},
    schema::validate_employees,
    StoreError, StoreResult,
};

/// Written to storage the first time the collection is needed and nothing is stored yet
pub const DEFAULT_EMPLOYEES: &str = include_str!("default_employees.json");

/// The bundled default dataset, validated like any stored collection
pub fn default_employees() -> StoreResult<Vec<Employee>> {
    let document: Value =
        serde_json::from_str(DEFAULT_EMPLOYEES).map_err(StoreError::Deserialization)?;

    Ok(validate_employees(&document)?)
}

/// Owns the storage backend and applies requests to the employee collection.
///
/// Every request reads the whole collection, validates it, optionally hands it
/// to the caller's transform, and writes the whole result back. Use `process`
/// directly from a single thread, or `run` to move the store onto its own
/// worker so that every caller is serialized through one request queue.
pub struct EmployeeStore {
    storage: Box<dyn Storage + Send>,
    options: StoreOptions,
}

impl EmployeeStore {
    pub fn new(options: StoreOptions) -> StoreResult<Self> {
        let storage = options.storage_engine.get_engine();

        storage.init()?;

        log::info!(
            "Employee store location: [{}]",
            options.storage_engine.describe()
        );

        Ok(Self { storage, options })
    }

    /// Starts the store worker and returns a request manager connected to it.
    /// The worker stops after a shutdown request or once every request manager is dropped.
    pub fn run(self) -> StoreResult<RequestManager> {
        let (store_sender, store_receiver) = mpsc::channel::<StoreRequest>();

        let request_timeout = self.options.request_timeout;

        thread::Builder::new()
            .name("Employee Store".to_string())
            .spawn(move || self.serve(store_receiver))
            .map_err(StoreError::Startup)?;

        Ok(RequestManager::new(store_sender, request_timeout))
    }

    fn serve(self, store_receiver: Receiver<StoreRequest>) {
        while let Ok(StoreRequest {
            command,
            response_sender,
        }) = store_receiver.recv()
        {
            log::info!("Received request: {}", command.log_format());

            match command {
                StoreCommand::Request {
                    method,
                    endpoint,
                    transform,
                } => {
                    // A caller that timed out has dropped its receiver, its request must not commit
                    let result = self.process_unless_cancelled(method, &endpoint, transform, || {
                        response_sender.is_closed()
                    });

                    if let Err(StoreError::Cancelled) = result {
                        log::warn!(
                            "{} {}: caller stopped waiting, nothing persisted",
                            method,
                            endpoint
                        );
                        continue;
                    }

                    let _ = response_sender.send(StoreResponse::Result(result));
                }
                StoreCommand::Shutdown => {
                    let _ = response_sender.send(StoreResponse::Shutdown(
                        "Successfully shutdown employee store".to_string(),
                    ));

                    return;
                }
            }
        }

        log::info!("All request managers dropped, stopping employee store");
    }

    /// Applies one request. GET returns the stored collection, PUT / POST /
    /// DELETE return the collection that was persisted, HEAD / OPTIONS / PATCH
    /// return `None` without touching storage.
    ///
    /// `endpoint` is accepted for call-site compatibility and is not used for routing.
    pub fn process<F>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        transform: F,
    ) -> StoreResult<Option<Vec<Employee>>>
    where
        F: FnOnce(Vec<Employee>) -> Option<Vec<Employee>>,
    {
        self.process_unless_cancelled(method, endpoint, transform, || false)
    }

    /// `cancelled` is checked before the collection is loaded and again right
    /// before a write, so an abandoned request never reaches storage.
    fn process_unless_cancelled<F, C>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        transform: F,
        cancelled: C,
    ) -> StoreResult<Option<Vec<Employee>>>
    where
        F: FnOnce(Vec<Employee>) -> Option<Vec<Employee>>,
        C: Fn() -> bool,
    {
        if cancelled() {
            return Err(StoreError::Cancelled);
        }

        if method.is_no_op() {
            log::debug!("{} {}: no-op", method, endpoint);
            return Ok(None);
        }

        let current = self.load()?;

        if method.is_query() {
            return Ok(Some(current));
        }

        let modified = match apply_transform(transform, current)? {
            Some(modified) => modified,
            None if method.requires_result() => {
                return Err(StoreError::EmptyResult(
                    "Modified data is empty, transform returned no employees".to_string(),
                ))
            }
            None => vec![],
        };

        if cancelled() {
            return Err(StoreError::Cancelled);
        }

        self.persist(&modified)?;

        log::info!("✅ {}: persisted {} employees", method, modified.len());

        Ok(Some(modified))
    }

    /// Reads, parses and validates the stored collection, seeding it first if nothing is stored
    #[tracing::instrument(skip(self))]
    fn load(&self) -> StoreResult<Vec<Employee>> {
        let bytes = match self.storage.read_blob(STORAGE_KEY.to_string())? {
            ReadBlobState::Found(bytes) => bytes,
            ReadBlobState::NotFound => self.seed()?,
        };

        let document: Value = serde_json::from_slice(&bytes).map_err(StoreError::Deserialization)?;

        Ok(validate_employees(&document)?)
    }

    fn seed(&self) -> StoreResult<Vec<u8>> {
        log::info!("No stored employees found, seeding the bundled default dataset");

        self.storage
            .write_blob(STORAGE_KEY.to_string(), DEFAULT_EMPLOYEES.as_bytes().to_vec())?;

        match self.storage.read_blob(STORAGE_KEY.to_string())? {
            ReadBlobState::Found(bytes) => Ok(bytes),
            ReadBlobState::NotFound => Err(StoreError::EmptyResult(
                "Unable to fetch list of employees".to_string(),
            )),
        }
    }

    #[tracing::instrument(skip(self, employees))]
    fn persist(&self, employees: &[Employee]) -> StoreResult<()> {
        let bytes = if self.options.validate_writes {
            let document = serde_json::to_value(employees).map_err(StoreError::Serialization)?;

            validate_employees(&document)?;

            serde_json::to_vec(&document)
        } else {
            serde_json::to_vec(employees)
        }
        .map_err(StoreError::Serialization)?;

        self.storage.write_blob(STORAGE_KEY.to_string(), bytes)?;

        Ok(())
    }
}

/// A panicking transform is reported as an unknown error instead of taking the store down
fn apply_transform<F>(transform: F, current: Vec<Employee>) -> StoreResult<Option<Vec<Employee>>>
where
    F: FnOnce(Vec<Employee>) -> Option<Vec<Employee>>,
{
    panic::catch_unwind(AssertUnwindSafe(|| transform(current)))
        .map_err(|payload| StoreError::Unknown(panic_message(payload)))
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return message.to_string();
    }

    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }

    "transform panicked".to_string()
}
