use std::hint::black_box;

use base64::{Engine, engine::general_purpose::STANDARD};
use criterion::{Criterion, criterion_group, criterion_main};
use node_manager::{Node, NodeCollection, canonicalize};

const NAMES: &[&str] = &[
    "🇭🇰 HK-IPLC", "美国 洛杉矶", "日本 东京", "Singapore", "台湾 家宽", "Random", "🇰🇷 首尔", "London UK",
];

fn vmess(i: usize) -> String {
    let body = format!(
        r#"{{"v":"2","ps":"node {i}","add":"{}.example.com","port":"443","id":"b831381d-6324-4d53-ad4f-8cda48b30811","net":"ws"}}"#,
        i % 97
    );
    format!("vmess://{}", STANDARD.encode(body))
}

fn sample_nodes(count: usize) -> Vec<Node> {
    (0..count)
        .map(|i| Node::new(format!("{} {:03}", NAMES[i % NAMES.len()], i), vmess(i)))
        .collect()
}

fn bench_canonicalize(c: &mut Criterion) {
    let vmess_uri = vmess(1);
    let trojan_uri = "trojan://password@example.com:443?sni=example.com#香港 01";
    c.bench_function("canonicalize_vmess", |b| {
        b.iter(|| canonicalize(black_box(&vmess_uri)))
    });
    c.bench_function("canonicalize_fragment", |b| {
        b.iter(|| canonicalize(black_box(trojan_uri)))
    });
}

fn bench_collection(c: &mut Criterion) {
    let nodes = sample_nodes(2000);

    c.bench_function("auto_sort_2000", |b| {
        b.iter(|| {
            let mut collection = NodeCollection::default();
            collection.initialize(nodes.clone());
            let _ = collection.auto_sort();
            black_box(collection.total_count())
        })
    });

    c.bench_function("deduplicate_2000", |b| {
        b.iter(|| {
            let mut collection = NodeCollection::default();
            collection.initialize(nodes.clone());
            black_box(collection.deduplicate().removed)
        })
    });
}

criterion_group!(benches, bench_canonicalize, bench_collection);
criterion_main!(benches);
