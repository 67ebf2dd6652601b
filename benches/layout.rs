use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use timetable_layout::config::{Config, LayoutConfig};
use timetable_layout::ir::format_clock;
use timetable_layout::layout::compute_layout;
use timetable_layout::parser::parse_schedule;
use timetable_layout::render::render_svg;

/// Line-format week with `per_day` sessions on each day. `stagger` controls how
/// tightly sessions pile up: small values give deep overlap clusters.
fn week_source(per_day: usize, stagger: u32) -> String {
    let mut out = String::from("name: Bench Week\n");
    for day in ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat"] {
        for i in 0..per_day {
            let start = 420 + (i as u32 * stagger) % 780;
            let end = (start + 50 + (i as u32 % 4) * 25).min(1440);
            out.push_str(&format!(
                "{day} {}-{} Course {i} @ R{}\n",
                format_clock(start),
                format_clock(end),
                i % 17
            ));
        }
    }
    out
}

fn cases() -> Vec<(&'static str, String)> {
    vec![
        ("sparse_8", week_source(8, 110)),
        ("typical_20", week_source(20, 35)),
        ("dense_80", week_source(80, 9)),
        ("stacked_200", week_source(200, 2)),
    ]
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for (name, input) in cases() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, data| {
            b.iter(|| {
                let parsed = parse_schedule(black_box(data)).expect("parse failed");
                black_box(parsed.schedule.sessions.len());
            });
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let config = LayoutConfig::default();
    for (name, input) in cases() {
        let schedule = parse_schedule(&input).expect("parse failed").schedule;
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &schedule.sessions,
            |b, sessions| {
                b.iter(|| {
                    let layout = compute_layout(black_box(sessions), &config).expect("layout failed");
                    black_box(layout.rects.len());
                });
            },
        );
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let config = Config::default();
    for (name, input) in cases() {
        let schedule = parse_schedule(&input).expect("parse failed").schedule;
        let layout = compute_layout(&schedule.sessions, &config.layout).expect("layout failed");
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter(|| {
                let svg = render_svg(
                    black_box(&layout),
                    &schedule,
                    &config.theme,
                    &config.render,
                );
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_layout, bench_render);
criterion_main!(benches);
