//! Benchmarks for shader generation and CPU-side stepping.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use automata_gpu::color::CellState;
use automata_gpu::gpu::step::step_shader_source;
use automata_gpu::rules::Rule;

fn bench_rule_to_wgsl(c: &mut Criterion) {
    let mut group = c.benchmark_group("rule_to_wgsl");

    for rule in Rule::ALL {
        group.bench_function(rule.label(), |b| b.iter(|| black_box(rule.to_wgsl())));
    }

    group.finish();
}

fn bench_step_shader_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_shader_source");

    for rule in Rule::ALL {
        group.bench_with_input(BenchmarkId::new("assemble", rule.label()), &rule, |b, &rule| {
            b.iter(|| black_box(step_shader_source(rule)))
        });
    }

    group.finish();
}

fn bench_cpu_transition(c: &mut Criterion) {
    let mut group = c.benchmark_group("next_state");

    for rule in [Rule::GameOfLife, Rule::BriansBrain, Rule::DayAndNight] {
        group.bench_function(rule.label(), |b| {
            b.iter(|| {
                for state in [CellState::Dead, CellState::Alive, CellState::Dying] {
                    for alive in 0..=8u32 {
                        black_box(rule.next_state(state, alive));
                    }
                }
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_rule_to_wgsl,
    bench_step_shader_assembly,
    bench_cpu_transition,
);
criterion_main!(benches);
