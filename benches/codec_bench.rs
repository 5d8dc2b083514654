//! Criterion benchmark untuk codec dan slot store
//!
//! Run dengan: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use voltcache::{
    decode, encode, BinaryDecoder, BinaryEncoder, CurrentPriceData, MmapSlotStore, Price,
    PriceData, SlotStore, Timestamp,
};

/// Satu hari price list: 48 forecast + 48 previous half-hour blocks.
fn sample_record() -> CurrentPriceData {
    let base = 589_714_200.0;
    let price = |i: usize| Price {
        period: Timestamp::from_reference_offset(base + i as f64 * 1800.0),
        price_kwh: 15.0 + (i % 7) as f64 * 1.25,
        renewable_in_grid: 30.0 + (i % 5) as f64 * 4.0,
        color: ["green", "yellow", "red"][i % 3].to_string(),
    };
    CurrentPriceData {
        data: PriceData {
            current_price_kwh: 21.5,
            current_renewable_in_grid: 38.0,
            current_price_color: "yellow".to_string(),
            current_price_period: Timestamp::from_reference_offset(base),
            forecast_prices: (0..48).map(price).collect(),
            previous_prices: (48..96).map(price).collect(),
        },
        service_response_type: 1,
        message: None,
    }
}

fn bench_record(c: &mut Criterion) {
    let record = sample_record();
    let bytes = encode(&record).unwrap();

    let mut group = c.benchmark_group("price_record");
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("encode", |b| {
        b.iter(|| encode(black_box(&record)).unwrap());
    });

    group.bench_function("decode", |b| {
        b.iter(|| decode::<CurrentPriceData>(black_box(&bytes)).unwrap());
    });

    group.finish();
}

fn bench_primitives(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitives");

    for count in [100usize, 10_000].iter() {
        let values: Vec<u64> = (0..*count as u64).collect();
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_function(format!("encode_u64_array_{}", count), |b| {
            b.iter(|| {
                let mut encoder = BinaryEncoder::with_capacity(8 + count * 8);
                encoder
                    .encode_array(black_box(&values), |enc, v| {
                        enc.encode_integer(*v);
                        Ok(())
                    })
                    .unwrap();
                encoder.into_bytes()
            });
        });

        let bytes = encode(&values).unwrap();
        group.bench_function(format!("decode_u64_array_{}", count), |b| {
            b.iter(|| {
                let mut decoder = BinaryDecoder::new(black_box(&bytes));
                decoder.decode_array(|dec| dec.decode_integer::<u64>()).unwrap()
            });
        });
    }

    group.finish();
}

fn bench_slot_store(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let mut store = MmapSlotStore::open(dir.path()).unwrap();
    let bytes = encode(&sample_record()).unwrap();

    let mut group = c.benchmark_group("slot_store");
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("store", |b| {
        b.iter(|| store.store("lastPrice", black_box(&bytes)).unwrap());
    });

    group.bench_function("load", |b| {
        b.iter(|| store.load("lastPrice").unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_record, bench_primitives, bench_slot_store);
criterion_main!(benches);
