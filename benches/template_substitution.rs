//! Benchmarks for command template expansion
//!
//! Measures token substitution and shell quoting for custom folder commands.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use foldwatch_tools::template::{expand, shell_quote};
use foldwatch_tools::TemplateContext;
use std::path::Path;

/// Template with only the file token
const TEMPLATE_SIMPLE: &str = "gzip {}";

/// Typical conversion command
const TEMPLATE_CONVERT: &str = "convert {} -quality 80 {dir}/{name}.webp && rm {}";

/// Template using every token twice
const TEMPLATE_ALL_TOKENS: &str = "{} {name} {ext} {dir} {} {name} {ext} {dir}";

/// Template with no tokens (baseline)
const TEMPLATE_NO_TOKENS: &str = "notify-send foldwatch done";

const PLAIN_FILE: &str = "/home/user/inbox/IMG_2024_0001.png";
const AWKWARD_FILE: &str = "/home/user/My Pictures/it's a $holiday (1).jpeg";

fn bench_expand(c: &mut Criterion) {
    let mut group = c.benchmark_group("expand");
    let file = Path::new(PLAIN_FILE);

    for (name, template) in [
        ("no_tokens", TEMPLATE_NO_TOKENS),
        ("simple", TEMPLATE_SIMPLE),
        ("convert", TEMPLATE_CONVERT),
        ("all_tokens", TEMPLATE_ALL_TOKENS),
    ] {
        group.throughput(Throughput::Bytes(template.len() as u64));
        group.bench_with_input(BenchmarkId::new("template", name), &template, |b, template| {
            b.iter(|| expand(black_box(template), black_box(file)));
        });
    }

    group.finish();
}

fn bench_context_reuse(c: &mut Criterion) {
    let mut group = c.benchmark_group("context_reuse");
    let ctx = TemplateContext::for_file(Path::new(AWKWARD_FILE));

    let bindings: Vec<String> = (0..10)
        .map(|i| format!("step{i} {{}} -o {{dir}}/{{name}}.{i}{{ext}}"))
        .collect();

    group.bench_with_input(
        BenchmarkId::new("bindings", "10_templates"),
        &bindings,
        |b, templates| {
            b.iter(|| {
                templates
                    .iter()
                    .map(|t| ctx.substitute(black_box(t)))
                    .collect::<Vec<_>>()
            });
        },
    );

    group.finish();
}

fn bench_shell_quote(c: &mut Criterion) {
    let mut group = c.benchmark_group("shell_quote");

    group.bench_function("safe_path", |b| {
        b.iter(|| shell_quote(black_box(PLAIN_FILE)));
    });

    group.bench_function("awkward_path", |b| {
        b.iter(|| shell_quote(black_box(AWKWARD_FILE)));
    });

    group.finish();
}

criterion_group!(benches, bench_expand, bench_context_reuse, bench_shell_quote);
criterion_main!(benches);
