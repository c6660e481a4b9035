use std::{sync::mpsc::Sender, time::Duration};

use crate::model::{employee::Employee, method::HttpMethod};

use super::{StoreError, StoreResult};

/// Caller supplied transform applied to the current collection. `None` stands
/// for "no collection", which PUT and POST refuse.
pub type Transform = Box<dyn FnOnce(Vec<Employee>) -> Option<Vec<Employee>> + Send>;

pub enum StoreCommand {
    Request {
        method: HttpMethod,
        endpoint: String,
        transform: Transform,
    },
    Shutdown,
}

impl StoreCommand {
    pub fn log_format(&self) -> String {
        match self {
            StoreCommand::Request {
                method, endpoint, ..
            } => format!("{} {}", method, endpoint),
            StoreCommand::Shutdown => "Shutdown".to_string(),
        }
    }
}

pub enum StoreResponse {
    Result(StoreResult<Option<Vec<Employee>>>),
    Shutdown(String),
}

pub struct StoreRequest {
    pub response_sender: oneshot::Sender<StoreResponse>,
    pub command: StoreCommand,
}

/// Handle used to talk to a running employee store. Cheap to clone, every
/// clone feeds the same request queue so requests never interleave.
///
/// Two styles of API are provided:
/// 1. Typed -- `get`, `put`, `post`, `delete` and `send_request` return the failure reason
/// 2. Lossy -- `api_request` logs the failure and only returns `None`
#[derive(Clone)]
pub struct RequestManager {
    store_sender: Sender<StoreRequest>,
    request_timeout: Duration,
}

impl RequestManager {
    pub fn new(store_sender: Sender<StoreRequest>, request_timeout: Duration) -> Self {
        Self {
            store_sender,
            request_timeout,
        }
    }

    pub fn get(&self) -> StoreResult<Vec<Employee>> {
        let result = self.send_request(HttpMethod::Get, "", |_| None)?;

        expect_collection(HttpMethod::Get, result)
    }

    pub fn put<F>(&self, transform: F) -> StoreResult<Vec<Employee>>
    where
        F: FnOnce(Vec<Employee>) -> Option<Vec<Employee>> + Send + 'static,
    {
        let result = self.send_request(HttpMethod::Put, "", transform)?;

        expect_collection(HttpMethod::Put, result)
    }

    pub fn post<F>(&self, transform: F) -> StoreResult<Vec<Employee>>
    where
        F: FnOnce(Vec<Employee>) -> Option<Vec<Employee>> + Send + 'static,
    {
        let result = self.send_request(HttpMethod::Post, "", transform)?;

        expect_collection(HttpMethod::Post, result)
    }

    pub fn delete<F>(&self, transform: F) -> StoreResult<Vec<Employee>>
    where
        F: FnOnce(Vec<Employee>) -> Option<Vec<Employee>> + Send + 'static,
    {
        let result = self.send_request(HttpMethod::Delete, "", transform)?;

        expect_collection(HttpMethod::Delete, result)
    }

    /// Any method, with the failure reason. No-op methods resolve to `Ok(None)`.
    pub fn send_request<F>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        transform: F,
    ) -> StoreResult<Option<Vec<Employee>>>
    where
        F: FnOnce(Vec<Employee>) -> Option<Vec<Employee>> + Send + 'static,
    {
        let command = StoreCommand::Request {
            method,
            endpoint: endpoint.to_string(),
            transform: Box::new(transform),
        };

        match self.send_store_request(command)? {
            StoreResponse::Result(result) => result,
            StoreResponse::Shutdown(_) => Err(StoreError::Stopped),
        }
    }

    /// Any method, failures are logged as `<METHOD>: <message>` and collapse to `None`.
    /// Callers cannot tell failure kinds apart from the return value.
    pub fn api_request<F>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        transform: F,
    ) -> Option<Vec<Employee>>
    where
        F: FnOnce(Vec<Employee>) -> Option<Vec<Employee>> + Send + 'static,
    {
        match self.send_request(method, endpoint, transform) {
            Ok(employees) => employees,
            Err(err) => {
                log::error!("{}: {}", method, err);
                None
            }
        }
    }

    /// Sends a shutdown request to the store and returns the store's response
    pub fn send_shutdown_request(&self) -> StoreResult<String> {
        match self.send_store_request(StoreCommand::Shutdown)? {
            StoreResponse::Shutdown(message) => Ok(message),
            StoreResponse::Result(_) => Err(StoreError::Unknown(
                "Store answered a shutdown request with a result".to_string(),
            )),
        }
    }

    fn send_store_request(&self, command: StoreCommand) -> StoreResult<StoreResponse> {
        let (response_sender, response_receiver) = oneshot::channel::<StoreResponse>();

        let request = StoreRequest {
            response_sender,
            command,
        };

        // The store worker answers on the response_receiver once it has processed the request
        self.store_sender
            .send(request)
            .map_err(|_| StoreError::Stopped)?;

        match response_receiver.recv_timeout(self.request_timeout) {
            Ok(response) => Ok(response),
            Err(oneshot::RecvTimeoutError::Timeout) => Err(StoreError::Timeout),
            Err(oneshot::RecvTimeoutError::Disconnected) => Err(StoreError::Stopped),
        }
    }
}

fn expect_collection(
    method: HttpMethod,
    result: Option<Vec<Employee>>,
) -> StoreResult<Vec<Employee>> {
    result.ok_or_else(|| StoreError::EmptyResult(format!("{} returned no employees", method)))
}

#[cfg(test)]
mod tests {
    use std::{
        sync::mpsc,
        thread::{self, JoinHandle},
    };

    use super::*;
    use crate::{
        consts::consts::EmployeeId,
        store::{
            options::StoreOptions,
            store::{default_employees, EmployeeStore},
        },
    };

    fn new_test_manager() -> RequestManager {
        EmployeeStore::new(StoreOptions::new_in_memory())
            .and_then(EmployeeStore::run)
            .expect("Should be able to start an in-memory store")
    }

    fn employee(index: usize) -> Employee {
        Employee {
            id: EmployeeId(format!("employee-{}", index)),
            first_name: format!("Worker{}", index),
            last_name: "Tester".to_string(),
            dependents: vec![],
        }
    }

    #[test_log::test]
    fn get_seeds_through_the_worker() {
        let request_manager = new_test_manager();

        assert_eq!(request_manager.get().unwrap(), default_employees().unwrap());
    }

    #[test_log::test]
    fn put_then_get() {
        let request_manager = new_test_manager();

        let before = request_manager.get().unwrap();

        request_manager
            .put(|mut employees| {
                employees.push(employee(1));
                Some(employees)
            })
            .unwrap();

        let mut expected = before;
        expected.push(employee(1));

        assert_eq!(request_manager.get().unwrap(), expected);
    }

    #[test]
    fn no_op_methods_return_nothing() {
        let request_manager = new_test_manager();

        for method in [HttpMethod::Head, HttpMethod::Options, HttpMethod::Patch] {
            assert!(matches!(
                request_manager.send_request(method, "/employees", |e| Some(e)),
                Ok(None)
            ));
        }
    }

    #[test]
    fn typed_errors_reach_the_caller() {
        let request_manager = new_test_manager();

        assert!(matches!(
            request_manager.post(|_| None),
            Err(StoreError::EmptyResult(_))
        ));
    }

    mod api_request {
        use super::*;

        #[test]
        fn success_returns_collection() {
            let request_manager = new_test_manager();

            let employees = request_manager.api_request(HttpMethod::Get, "/employees", |_| None);

            assert_eq!(employees, Some(default_employees().unwrap()));
        }

        #[test]
        fn failure_collapses_to_none() {
            let request_manager = new_test_manager();

            assert_eq!(request_manager.api_request(HttpMethod::Put, "", |_| None), None);
            assert_eq!(
                request_manager.api_request(HttpMethod::Post, "", |_| panic!("boom")),
                None
            );
        }

        #[test]
        fn delete_to_empty_is_not_a_failure() {
            let request_manager = new_test_manager();

            assert_eq!(
                request_manager.api_request(HttpMethod::Delete, "", |_| Some(vec![])),
                Some(vec![])
            );
            assert_eq!(
                request_manager.api_request(HttpMethod::Get, "", |_| None),
                Some(vec![])
            );
        }
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn shutdown_stops_the_worker() {
            let request_manager = new_test_manager();

            assert_eq!(
                request_manager.send_shutdown_request().unwrap(),
                "Successfully shutdown employee store".to_string()
            );

            assert!(matches!(request_manager.get(), Err(StoreError::Stopped)));
        }

        #[test_log::test]
        fn timed_out_write_is_not_persisted() {
            let request_manager = EmployeeStore::new(
                StoreOptions::new_in_memory().set_request_timeout(Duration::from_millis(50)),
            )
            .and_then(EmployeeStore::run)
            .expect("Should be able to start an in-memory store");

            let before = request_manager.get().unwrap();

            let result = request_manager.api_request(HttpMethod::Post, "", |mut employees| {
                thread::sleep(Duration::from_millis(200));
                employees.push(employee(99));
                Some(employees)
            });

            assert_eq!(result, None);

            // Let the worker finish the abandoned request before reading again
            thread::sleep(Duration::from_millis(400));

            assert_eq!(request_manager.get().unwrap(), before);
        }

        #[test]
        fn slow_store_times_out() {
            let (store_sender, _store_receiver) = mpsc::channel::<StoreRequest>();

            // Nothing ever answers on this channel
            let request_manager = RequestManager::new(store_sender, Duration::from_millis(20));

            assert!(matches!(request_manager.get(), Err(StoreError::Timeout)));
        }
    }

    mod concurrency {
        use super::*;

        #[test_log::test]
        fn concurrent_appends_are_not_lost() {
            let request_manager = new_test_manager();

            let seeded = request_manager.get().unwrap().len();

            let worker_threads = 4;
            let appends_per_thread = 10;

            let handles: Vec<JoinHandle<()>> = (0..worker_threads)
                .map(|thread_id| {
                    let rm = request_manager.clone();

                    thread::spawn(move || {
                        for index in 0..appends_per_thread {
                            let new_employee = employee(thread_id * appends_per_thread + index);

                            rm.post(move |mut employees| {
                                employees.push(new_employee);
                                Some(employees)
                            })
                            .expect("Should not timeout");
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }

            let employees = request_manager.get().unwrap();

            assert_eq!(
                employees.len(),
                seeded + worker_threads * appends_per_thread
            );
        }
    }
}
