//! Benchmarks for BTHome advertisement assembly

use bthome::{
    catalog, BtHomeDevice, DeviceConfig, DeviceIdentity, EncryptionConfig, EncryptionKey,
    MeasurementBuffer,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn generate_readings(count: usize) -> Vec<f32> {
    (0..count).map(|i| 20.0 + (i % 10) as f32 * 0.1).collect()
}

fn plain_device() -> BtHomeDevice {
    let identity = DeviceIdentity::new("DIY-", "DIY-sensor").unwrap();
    BtHomeDevice::new(DeviceConfig::new(identity))
}

fn encrypted_device() -> BtHomeDevice {
    let identity = DeviceIdentity::new("DIY-", "DIY-sensor").unwrap();
    let encryption = EncryptionConfig::new(
        EncryptionKey::from_hex("231d39c1d7cc1ab1aee224cd096db932").unwrap(),
        "54:48:E6:8F:80:A5".parse().unwrap(),
    );
    BtHomeDevice::new(DeviceConfig::new(identity).with_encryption(encryption))
}

fn bench_buffer(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer");

    let readings = generate_readings(1000);
    group.throughput(Throughput::Elements(1000));

    group.bench_function("add_1000_measurements", |b| {
        let mut buffer = MeasurementBuffer::default();
        b.iter(|| {
            for r in &readings {
                if buffer.add_measurement(&catalog::TEMPERATURE, *r).is_err() {
                    buffer.reset();
                }
            }
            black_box(&buffer);
        })
    });

    group.finish();
}

fn bench_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("cycle");

    let readings = generate_readings(1000);
    group.throughput(Throughput::Elements(1000));

    group.bench_function("plain_1000_cycles", |b| {
        let mut device = plain_device();
        b.iter(|| {
            for r in &readings {
                device.reset();
                device.add_measurement(&catalog::TEMPERATURE, *r).ok();
                device.add_measurement(&catalog::HUMIDITY, 45.0).ok();
                device.add_state(&catalog::MOTION, 1, None).ok();
                black_box(device.assemble().ok());
            }
        })
    });

    group.bench_function("encrypted_1000_cycles", |b| {
        let mut device = encrypted_device();
        b.iter(|| {
            for r in &readings {
                device.reset();
                device.add_measurement(&catalog::TEMPERATURE, *r).ok();
                device.add_measurement(&catalog::HUMIDITY, 45.0).ok();
                black_box(device.assemble().ok());
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_buffer, bench_cycle);
criterion_main!(benches);
