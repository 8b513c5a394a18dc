//! Benchmarks for fenced block substitution.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fenced_code::{
    CodeHilite, FencedBlockPreprocessor, HighlightConfig, HtmlStash, Preprocessor,
};

/// Generate a document with `blocks` fenced blocks separated by prose.
fn generate_document(blocks: usize) -> Vec<String> {
    let mut md = String::with_capacity(blocks * 120);
    md.push_str("# Document Title\n\n");

    for i in 0..blocks {
        md.push_str(&format!("Paragraph {i} introduces the next listing.\n\n"));
        md.push_str("```{.python hl_lines=\"2\" linenums=\"true\"}\n");
        md.push_str(&format!("def f{i}():\n    return {i}\n"));
        md.push_str("```\n\n");
    }

    md.split('\n').map(str::to_owned).collect()
}

fn bench_plain_varying_blocks(c: &mut Criterion) {
    let mut group = c.benchmark_group("plain_substitution");

    for blocks in [1, 10, 100, 1000] {
        let document = generate_document(blocks);
        let bytes: usize = document.iter().map(|l| l.len() + 1).sum();
        group.throughput(Throughput::Bytes(u64::try_from(bytes).unwrap_or(u64::MAX)));
        group.bench_with_input(BenchmarkId::from_parameter(blocks), &document, |b, doc| {
            let mut preprocessor = FencedBlockPreprocessor::new();
            b.iter(|| {
                let mut stash = HtmlStash::new();
                preprocessor.run(doc.clone(), &mut stash)
            });
        });
    }

    group.finish();
}

fn bench_highlighted(c: &mut Criterion) {
    let document = generate_document(100);
    let mut preprocessor =
        FencedBlockPreprocessor::new().with_highlighter(CodeHilite, HighlightConfig::default());

    c.bench_function("highlighted_substitution_100_blocks", |b| {
        b.iter(|| {
            let mut stash = HtmlStash::new();
            preprocessor.run(document.clone(), &mut stash)
        });
    });
}

criterion_group!(benches, bench_plain_varying_blocks, bench_highlighted);
criterion_main!(benches);
