use criterion::{criterion_group, criterion_main, Criterion};
use enum_iterator::all;
use nerspan::{convert_tags, MentionEncoder, SchemeType, Sentence};
use pprof::criterion::{Output, PProfProfiler};
use serde::Deserialize;
use serde_jsonlines::json_lines;
use std::path::Path;

#[derive(Deserialize)]
struct Example {
    sentences: Vec<Vec<String>>,
    gold_tags: Vec<Vec<String>>,
}

/// Sentences of the fixture with their BIO tags, repeated `repeat` times.
fn build_sentences<P: AsRef<Path>>(path: P, repeat: usize) -> Vec<(Sentence, Vec<String>)> {
    let examples = json_lines::<Example, P>(path)
        .unwrap()
        .map(|r| r.unwrap())
        .collect::<Vec<_>>();
    let mut sentences = vec![];
    for _ in 0..repeat {
        for example in examples.iter() {
            for (texts, tags) in example.sentences.iter().zip(example.gold_tags.iter()) {
                let sentence = Sentence::from_texts(texts, 0).unwrap();
                sentences.push((sentence, tags.clone()));
            }
        }
    }
    sentences
}

fn benchmark_decode_all_schemes(c: &mut Criterion) {
    let sentences = build_sentences("./tests/data/sentences.jsonl", 1000);
    for scheme in all::<SchemeType>() {
        let encoded: Vec<(Sentence, Vec<String>)> = sentences
            .iter()
            .map(|(sentence, tags)| {
                let tags = convert_tags(sentence, tags, &SchemeType::BIO, &scheme).unwrap();
                (sentence.clone(), tags)
            })
            .collect();
        c.bench_function(&format!("decode_{}", scheme), |b| {
            b.iter(|| {
                for (sentence, tags) in encoded.iter() {
                    scheme.decode_mentions(sentence, tags).unwrap();
                }
            })
        });
    }
}

fn benchmark_encode_all_schemes(c: &mut Criterion) {
    let sentences = build_sentences("./tests/data/sentences.jsonl", 1000);
    let mentions: Vec<_> = sentences
        .iter()
        .map(|(sentence, tags)| SchemeType::BIO.decode_mentions(sentence, tags).unwrap())
        .collect();
    for scheme in all::<SchemeType>() {
        c.bench_function(&format!("encode_{}", scheme), |b| {
            b.iter(|| {
                for ((sentence, _), mentions) in sentences.iter().zip(mentions.iter()) {
                    scheme.encode_mentions(sentence, mentions).unwrap();
                }
            })
        });
    }
}

criterion_group!(
    name=transcoding_benches;
    config = Criterion::default().sample_size(100).with_profiler(PProfProfiler::new(3000, Output::Flamegraph(None)));
    targets =
    benchmark_decode_all_schemes,
    benchmark_encode_all_schemes,
);
criterion_main!(transcoding_benches);
