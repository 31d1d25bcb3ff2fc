//! logsage Benchmark Suite
//!
//! Targets on a CI runner:
//!   normalize_passthrough_8k ........ < 20μs
//!   normalize_truncate_50k_lines .... < 15ms
//!   normalize_truncate_ansi_10k ..... < 10ms
//!   prompt_build_12k ................ < 50μs

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use logsage_core::config::TruncationConfig;
use logsage_core::normalize::Normalizer;
use logsage_llm::prompt::{PromptBuilder, PromptTemplate};
use logsage_llm::GenerationSettings;

/// A job log of `lines` lines with a failure every 997 lines.
fn make_log(lines: usize, ansi: bool) -> String {
    (0..lines)
        .map(|i| {
            if i % 997 == 0 && i > 0 {
                if ansi {
                    format!("\x1b[31mError:\x1b[0m step {i} exited with code 1")
                } else {
                    format!("Error: step {i} exited with code 1")
                }
            } else {
                format!("2024-05-02T10:00:00Z [build] compiling module_{i} (release)")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Benchmark: a log under budget passes straight through (target: < 20μs).
fn bench_passthrough(c: &mut Criterion) {
    let normalizer = Normalizer::default();
    let log = make_log(130, false);
    assert!(log.chars().count() <= normalizer.budget());

    c.bench_function("normalize_passthrough_8k", |b| {
        b.iter(|| black_box(normalizer.normalize_text(black_box(&log))));
    });
}

/// Benchmark: head/tail/keyword truncation at several log sizes.
fn bench_truncate(c: &mut Criterion) {
    let normalizer = Normalizer::default();
    let mut group = c.benchmark_group("normalize_truncate");
    for lines in [1_000_usize, 10_000, 50_000] {
        let log = make_log(lines, false);
        group.bench_with_input(BenchmarkId::from_parameter(lines), &log, |b, log| {
            b.iter(|| black_box(normalizer.normalize_text(black_box(log))));
        });
    }
    group.finish();
}

/// Benchmark: ANSI stripping ahead of truncation (target: < 10ms).
fn bench_truncate_ansi(c: &mut Criterion) {
    let normalizer = Normalizer::new(TruncationConfig {
        strip_ansi: true,
        ..TruncationConfig::default()
    });
    let log = make_log(10_000, true);

    c.bench_function("normalize_truncate_ansi_10k", |b| {
        b.iter(|| black_box(normalizer.normalize_text(black_box(&log))));
    });
}

/// Benchmark: prompt assembly for a full-budget excerpt (target: < 50μs).
fn bench_prompt_build(c: &mut Criterion) {
    let normalized = Normalizer::default().normalize_text(&make_log(5_000, false));
    let builder = PromptBuilder::new(PromptTemplate::builtin(), GenerationSettings::default());

    c.bench_function("prompt_build_12k", |b| {
        b.iter(|| black_box(builder.build(black_box(&normalized))));
    });
}

criterion_group!(
    benches,
    bench_passthrough,
    bench_truncate,
    bench_truncate_ansi,
    bench_prompt_build,
);
criterion_main!(benches);
