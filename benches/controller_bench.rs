//! Tick latency of the access controller.
//!
//! Run benchmarks with:
//! ```sh
//! cargo bench --bench controller_bench
//! ```

use criterion::{Criterion, criterion_group, criterion_main};
use doorlock_controller::AccessController;
use doorlock_core::ControllerConfig;
use doorlock_hardware::Peripherals;
use std::hint::black_box;

fn controller() -> (AccessController, doorlock_hardware::MockPeripherals) {
    let (peripherals, mock) = Peripherals::mock();
    let mut controller = AccessController::new(ControllerConfig::default(), peripherals).unwrap();
    controller.start();
    (controller, mock)
}

/// Benchmark a tick with no input and nothing in range.
fn bench_idle_tick(c: &mut Criterion) {
    let (mut controller, _mock) = controller();
    let mut now = 0u64;

    c.bench_function("idle_tick", |b| {
        b.iter(|| {
            now += 50;
            black_box(controller.tick(black_box(now)));
        });
    });
}

/// Benchmark a full entry cycle, one key per tick.
fn bench_entry_cycle(c: &mut Criterion) {
    let (mut controller, mock) = controller();
    let mut now = 0u64;

    c.bench_function("entry_cycle", |b| {
        b.iter(|| {
            mock.keypad.type_keys("12345678#4567#").unwrap();
            for _ in 0..14 {
                now += 50;
                black_box(controller.tick(now));
            }
            mock.serial.take_sent();
        });
    });
}

/// Benchmark ticks under a persistent obstruction.
fn bench_obstructed_tick(c: &mut Criterion) {
    let (mut controller, mock) = controller();
    mock.range_finder.set_distance(10.0).unwrap();
    let mut now = 0u64;

    c.bench_function("obstructed_tick", |b| {
        b.iter(|| {
            now += 50;
            black_box(controller.tick(now));
            mock.serial.take_sent();
        });
    });
}

criterion_group!(benches, bench_idle_tick, bench_entry_cycle, bench_obstructed_tick);
criterion_main!(benches);
