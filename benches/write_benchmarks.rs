use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use fluent_writer::sender::fluent::encode_message;
use fluent_writer::{FluentWriter, Record, TagStrategy, Transport, TransportError};

/// Accepts everything, so only classification and tagging are measured.
struct NullTransport;

impl Transport for NullTransport {
    fn post(&self, tag: &str, record: &Record) -> Result<(), TransportError> {
        std::hint::black_box((tag, record));
        Ok(())
    }

    fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

fn benchmark_write_paths(c: &mut Criterion) {
    let json_line = br#"{"level":"info","msg":"Got a request","requestID":"45234523","path":"/"}"#;
    let tab_line = b"requestID\t123455\n";
    let plain_line = b"2023/12/25 10:00:00 [error] 29#29: *1 connect() failed\n";

    let writer = FluentWriter::from_transport(NullTransport, "app", TagStrategy::keys(["level"]))
        .unwrap()
        .with_normalizer(|raw| {
            let line = String::from_utf8_lossy(raw);
            Ok(line.trim_end().split_once('\t').map(|(key, value)| {
                let mut record = Record::new();
                record.insert(key.to_string(), serde_json::Value::from(value));
                record
            }))
        })
        .unwrap();

    let mut group = c.benchmark_group("write_pipeline");
    group.throughput(Throughput::Bytes(json_line.len() as u64));

    group.bench_function("structured_line", |b| {
        b.iter(|| writer.forward(std::hint::black_box(json_line)));
    });

    group.bench_function("normalized_line", |b| {
        b.iter(|| writer.forward(std::hint::black_box(tab_line)));
    });

    group.bench_function("unstructured_line", |b| {
        b.iter(|| writer.forward(std::hint::black_box(plain_line)));
    });

    group.finish();
}

fn benchmark_encode(c: &mut Criterion) {
    let record: Record = serde_json::from_slice(
        br#"{"level":"warn","msg":"Access denied","requestID":"546745643","path":"/tardis","user":"TheMaster"}"#,
    )
    .unwrap();

    c.bench_function("encode_message_mode", |b| {
        b.iter(|| encode_message("app.warn", 1_700_000_000, std::hint::black_box(&record)));
    });
}

criterion_group!(benches, benchmark_write_paths, benchmark_encode);
criterion_main!(benches);
