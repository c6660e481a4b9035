use benefits::{
    model::employee::Employee,
    store::{options::StoreOptions, store::EmployeeStore},
};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("get 100", |b| {
        b.iter_batched(
            || {
                EmployeeStore::new(StoreOptions::new_in_memory())
                    .and_then(EmployeeStore::run)
                    .expect("Should start")
            },
            |request_manager| {
                for _ in 0..100 {
                    request_manager.get().expect("Should not timeout");
                }
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("append 100", |b| {
        b.iter_batched(
            || {
                EmployeeStore::new(StoreOptions::new_in_memory())
                    .and_then(EmployeeStore::run)
                    .expect("Should start")
            },
            |request_manager| {
                for index in 0..100 {
                    let employee =
                        Employee::new(format!("Bench{}", index), "Employee".to_string(), vec![]);

                    request_manager
                        .post(move |mut employees| {
                            employees.push(employee);
                            Some(employees)
                        })
                        .expect("Should not timeout");
                }
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
