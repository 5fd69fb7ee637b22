use criterion::{criterion_group, criterion_main, Criterion};
use nerspan::{
    count_conf, score_prf_conf, DefaultNerConfig, Document, DocumentBuilder, NerConfigBuilder,
    Sentence,
};
use pprof::criterion::{Output, PProfProfiler};
use serde::Deserialize;
use serde_jsonlines::json_lines;
use std::path::Path;

#[derive(Deserialize)]
struct Example {
    id: String,
    sentences: Vec<Vec<String>>,
    gold_tags: Vec<Vec<String>>,
    system_tags: Vec<Vec<String>>,
}

impl Example {
    fn into_documents<P: AsRef<Path>>(
        path: P,
        repeat: usize,
        config: &DefaultNerConfig,
    ) -> (Vec<Document>, Vec<Document>) {
        let examples = json_lines::<Example, P>(path)
            .unwrap()
            .map(|r| r.unwrap())
            .collect::<Vec<_>>();
        let mut gold_docs = Vec::with_capacity(examples.len() * repeat);
        let mut system_docs = Vec::with_capacity(examples.len() * repeat);
        for copy in 0..repeat {
            for ex in examples.iter() {
                let mut builder = DocumentBuilder::new(format!("{}-{}", ex.id, copy)).unwrap();
                for texts in ex.sentences.iter() {
                    let index = builder.next_sentence_index();
                    builder
                        .add_sentence(Sentence::from_texts(texts, index).unwrap())
                        .unwrap();
                }
                let document = builder.build();
                gold_docs.push(config.decode_document(&document, &ex.gold_tags).unwrap());
                system_docs.push(config.decode_document(&document, &ex.system_tags).unwrap());
            }
        }
        (gold_docs, system_docs)
    }
}

fn benchmark_scoring(c: &mut Criterion) {
    for parallel in [false, true] {
        let config = NerConfigBuilder::default()
            .check_docids(true)
            .parallel(parallel)
            .build();
        let (gold_docs, system_docs) =
            Example::into_documents("./tests/data/sentences.jsonl", 5000, &config);
        let name = if parallel {
            "full_dataset_parallel_scoring"
        } else {
            "full_dataset_scoring"
        };
        c.bench_function(name, |b| {
            b.iter(|| score_prf_conf(&gold_docs, &system_docs, &config).unwrap())
        });
    }
}

fn benchmark_counting(c: &mut Criterion) {
    let config = DefaultNerConfig::default();
    let (gold_docs, system_docs) =
        Example::into_documents("./tests/data/sentences.jsonl", 5000, &config);
    c.bench_function("full_dataset_counting", |b| {
        b.iter(|| count_conf(&system_docs, &gold_docs, &config).unwrap())
    });
}

criterion_group!(
    name=scoring_benches;
    config = Criterion::default().sample_size(100).with_profiler(PProfProfiler::new(3000, Output::Flamegraph(None)));
    targets =
    benchmark_scoring,
    benchmark_counting,
);
criterion_main!(scoring_benches);
