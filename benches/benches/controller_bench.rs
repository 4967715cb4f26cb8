//! # Position Controller Benchmarks
//!
//! Measures the move path (load → map → render → dispatch → save) with an
//! in-memory store and an executor that does nothing.
//!
//! Run: `cargo bench --bench controller_bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use piservo_core::transport::{CommandExecutor, CommandOutput};
use piservo_core::{ActuatorChannel, DispatchError, MemoryPositionStore, PositionController, RangeConfig};

/// Accepts every command without running it
struct NullExecutor;

impl CommandExecutor for NullExecutor {
    fn execute(&mut self, command: &str) -> Result<CommandOutput, DispatchError> {
        black_box(command);
        Ok(CommandOutput::success())
    }
}

fn controller() -> PositionController<MemoryPositionStore, NullExecutor> {
    PositionController::servoblaster(
        ActuatorChannel::new("0").unwrap(),
        RangeConfig::new(10, 90).unwrap(),
        MemoryPositionStore::new(),
        NullExecutor,
    )
}

/// Benchmark absolute and relative moves
fn bench_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("moves");

    group.bench_function("absolute", |b| {
        let mut servo = controller();
        b.iter(|| black_box(servo.move_absolute(black_box(150)).unwrap()))
    });

    group.bench_function("relative", |b| {
        let mut servo = controller();
        b.iter(|| black_box(servo.move_relative(black_box(3)).unwrap()))
    });

    group.bench_function("current", |b| {
        let servo = controller();
        b.iter(|| black_box(servo.current()))
    });

    group.finish();
}

criterion_group!(benches, bench_moves);
criterion_main!(benches);
