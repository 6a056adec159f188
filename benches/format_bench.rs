use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dashchat_lib::{format_message, render_message, Role};
use std::hint::black_box;

/// A reply shaped like what the model usually sends back: numbered headings,
/// dash bullets and key/value lines split into `###` sections.
fn typical_reply(sections: usize) -> String {
    (0..sections)
        .map(|i| {
            format!(
                "### {}. Section {} overview\n- **Key point** number {}\nStatus: **done**, see note: {}\nPlain sentence with nothing special in it.\n",
                i + 1,
                i,
                i,
                i
            )
        })
        .collect()
}

fn bench_format_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_message");
    for sections in [1usize, 10, 100] {
        let text = typical_reply(sections);
        group.bench_with_input(BenchmarkId::from_parameter(sections), &text, |b, text| {
            b.iter(|| black_box(format_message(text.as_str())))
        });
    }
    group.finish();
}

fn bench_plain_paragraphs(c: &mut Criterion) {
    let text = "Just a plain line of text without markers.\n".repeat(200);
    c.bench_function("format_plain_200_lines", |b| {
        b.iter(|| black_box(format_message(text.as_str())))
    });
}

fn bench_render_bot_bubble(c: &mut Criterion) {
    let text = typical_reply(10);
    c.bench_function("render_bot_bubble", |b| {
        b.iter(|| black_box(render_message(Role::Bot, &text)))
    });
}

criterion_group!(benches, bench_format_sizes, bench_plain_paragraphs, bench_render_bot_bubble);
criterion_main!(benches);
