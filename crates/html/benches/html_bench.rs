use criterion::{Criterion, black_box, criterion_group, criterion_main};
use html::{Dom, tokenize};

const SMALL_BLOCKS: usize = 64;
const LARGE_BLOCKS: usize = 20_000;

fn make_blocks(count: usize) -> String {
    let block = r#"<div class="box" item item-id="box-{{i}}"><span>hello &amp; bye</span><img src=x></div>"#;
    let mut out = String::with_capacity(block.len() * count + 16);
    out.push_str("<body>");
    for _ in 0..count {
        out.push_str(block);
    }
    out.push_str("</body>");
    out
}

fn make_rawtext_adversarial(bytes: usize) -> String {
    let mut body = String::with_capacity(bytes + 32);
    body.push_str("<script>");
    while body.len() < bytes {
        body.push_str("</scri<pt");
    }
    body.push_str("</script>");
    body
}

fn bench_tokenize_small(c: &mut Criterion) {
    let input = make_blocks(SMALL_BLOCKS);
    c.bench_function("bench_tokenize_small", |b| {
        b.iter(|| black_box(tokenize(black_box(&input)).len()));
    });
}

fn bench_tokenize_large(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    c.bench_function("bench_tokenize_large", |b| {
        b.iter(|| black_box(tokenize(black_box(&input)).len()));
    });
}

fn bench_parse_large_end_to_end(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    c.bench_function("bench_parse_large_end_to_end", |b| {
        b.iter(|| black_box(Dom::parse_document(black_box(&input))));
    });
}

fn bench_query_items(c: &mut Criterion) {
    let dom = Dom::parse_document(&make_blocks(LARGE_BLOCKS));
    c.bench_function("bench_query_items", |b| {
        b.iter(|| {
            let found = dom.query_selector_all(dom.root(), black_box("div.box[item]"));
            black_box(found.map(|ids| ids.len()).unwrap_or(0))
        });
    });
}

fn bench_rawtext_adversarial(c: &mut Criterion) {
    let input = make_rawtext_adversarial(256 * 1024);
    c.bench_function("bench_rawtext_adversarial", |b| {
        b.iter(|| black_box(tokenize(black_box(&input)).len()));
    });
}

criterion_group!(
    benches,
    bench_tokenize_small,
    bench_tokenize_large,
    bench_parse_large_end_to_end,
    bench_query_items,
    bench_rawtext_adversarial
);
criterion_main!(benches);
