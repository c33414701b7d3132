use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use quantum_chat::markup::plain_text;

/// Assistant-style reply with text, entities, inline code and a fenced block
fn generate_reply(paragraphs: usize) -> String {
    let mut reply = String::new();
    for i in 0..paragraphs {
        reply.push_str(&format!(
            "Paragraph {} talks about <b>qubits</b> &amp; `gates` with \u{1b}[1mstyle\u{1b}[0m.\n",
            i
        ));
        if i % 4 == 3 {
            reply.push_str("```rust\nlet q = Qubit::zero();\nq.hadamard();\n```\n");
        }
    }
    reply
}

fn bench_plain_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("plain_text_projection");

    for paragraphs in [1, 10, 100, 1_000].iter() {
        let reply = generate_reply(*paragraphs);

        group.throughput(Throughput::Bytes(reply.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(paragraphs), &reply, |b, reply| {
            b.iter(|| plain_text(black_box(reply)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_plain_text);
criterion_main!(benches);
