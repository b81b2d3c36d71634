use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, rngs::StdRng};
use script_editor_core::{
    EditKind, EditorSession, HighlightOverlay, PlainGrammar, Position, RecordingSink,
    SearchIndex, SearchOptions, TextBuffer, Tokenizer, find_all,
};
use std::time::Instant;

fn large_text(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 64);
    for i in 0..line_count {
        out.push_str(&format!(
            "    resultado{i} = valor * {i} ' the quick brown fox jumps over the lazy dog\n"
        ));
    }
    out.pop();
    out
}

fn bench_tokenize_and_highlight(c: &mut Criterion) {
    let text = large_text(20_000);
    let buffer = TextBuffer::from_text(&text);
    let tokenizer = Tokenizer::new(PlainGrammar);

    c.bench_function("highlight_pass/20k_lines", |b| {
        b.iter_batched(
            || (HighlightOverlay::new(), RecordingSink::new()),
            |(mut overlay, mut sink)| {
                let tokens = tokenizer.tokenize(black_box(&text));
                overlay.apply(&tokens, &buffer, &mut sink).unwrap();
                black_box(overlay.generation());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_find_all(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("find_all/50k_lines_case_insensitive", |b| {
        b.iter(|| {
            let matches = find_all(
                black_box(&text),
                "VALOR",
                SearchOptions::case_insensitive(),
            )
            .unwrap();
            black_box(matches.len());
        })
    });
}

fn bench_reindex(c: &mut Criterion) {
    let text = large_text(20_000);
    let buffer = TextBuffer::from_text(&text);
    c.bench_function("search_reindex/20k_lines", |b| {
        b.iter_batched(
            || (SearchIndex::new(), RecordingSink::new()),
            |(mut index, mut sink)| {
                let count = index
                    .reindex("resultado", SearchOptions::default(), &buffer, &mut sink)
                    .unwrap();
                black_box(count);
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_random_typing(c: &mut Criterion) {
    let text = large_text(5_000);
    c.bench_function("session_typing/100_random_inserts", |b| {
        b.iter_batched(
            || {
                let mut session = EditorSession::new(PlainGrammar, RecordingSink::new());
                session.load_content(&text).unwrap();
                (session, StdRng::seed_from_u64(7))
            },
            |(mut session, mut rng)| {
                let now = Instant::now();
                for _ in 0..100 {
                    let line = rng.gen_range(1..=session.buffer().line_count());
                    let column = rng.gen_range(0..=session.buffer().line_len(line).unwrap_or(0));
                    session
                        .insert(
                            Position::new(line, column),
                            "x",
                            EditKind::Insert('x'),
                            now,
                        )
                        .unwrap();
                }
                session.rehighlight().unwrap();
                black_box(session.overlay().generation());
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_tokenize_and_highlight,
    bench_find_all,
    bench_reindex,
    bench_random_typing
);
criterion_main!(benches);
