use criterion::*;
use fortune_spider::sec::resolve::{normalize, Resolver};
use fortune_spider::sec::tickers::{Registry, Ticker};
use fortune_spider::sec::Cik;

const WORDS: [&str; 12] = [
    "American", "Global", "Holdings", "Systems", "Energy", "Financial", "Pacific", "Health",
    "Technologies", "Industries", "Capital", "Resources",
];

// a registry about the size of the SEC's, with a few real titles mixed in
fn registry(len: usize) -> Registry {
    let mut tickers: Vec<Ticker> = (0..len)
        .map(|i| Ticker {
            key: i.to_string(),
            cik: Cik::new(1_000_000 + i as u64),
            ticker: format!("T{i}"),
            title: format!(
                "{} {} {} {i} Inc.",
                WORDS[i % WORDS.len()],
                WORDS[(i / WORDS.len()) % WORDS.len()],
                WORDS[(i / 7) % WORDS.len()]
            ),
        })
        .collect();
    for (i, title) in ["Apple Inc.", "MICROSOFT CORP", "Cisco Systems, Inc."]
        .into_iter()
        .enumerate()
    {
        tickers[len / 2 + i].title = title.to_string();
    }
    Registry::new(tickers)
}

fn benchmark_normalize(c: &mut Criterion) {
    c.bench_function("normalize title", |b| {
        b.iter(|| normalize(black_box("The Goldman Sachs Group, Inc. (Delaware)")))
    });
}

fn benchmark_resolver(c: &mut Criterion) {
    let registry = registry(10_000);

    c.bench_function("build resolver", |b| {
        b.iter(|| Resolver::new(black_box(&registry)))
    });

    let resolver = Resolver::new(&registry);
    let companies: Vec<String> = ["Apple", "Microsoft Corp", "Cisco", "NoSuchCompany XYZ"]
        .iter()
        .cycle()
        .take(100)
        .map(|name| name.to_string())
        .collect();

    c.bench_function("resolve 100 companies", |b| {
        b.iter(|| resolver.resolve_many(black_box(&companies)))
    });
}

criterion_group!(benches, benchmark_normalize, benchmark_resolver);
criterion_main!(benches);
