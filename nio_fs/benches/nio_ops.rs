use criterion::{Criterion, criterion_group, criterion_main};
use nio_core::EngineConfig;
use nio_fs::{Engine, NativeIo, NativeIoSync};

fn engine_with_files(file_count: usize) -> Engine {
    let engine = Engine::new("https://bench.example", EngineConfig::default());
    let io = NativeIoSync::new(engine.clone());
    for i in 0..file_count {
        let mut file = io.open(&format!("file_{i}")).unwrap();
        file.write(b"x", 0).unwrap();
    }
    engine
}

fn bench_sync_write_read(c: &mut Criterion) {
    let io = NativeIoSync::new(engine_with_files(0));
    let mut file = io.open("hot").unwrap();
    let chunk = [7u8; 4096];
    let mut buf = [0u8; 4096];

    c.bench_function("nio_sync_write_read_4k", |b| {
        b.iter(|| {
            file.write(&chunk, 0).unwrap();
            file.read(&mut buf, 0).unwrap();
        });
    });
}

fn bench_async_write_read(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let rt_handle = &rt;

    let file = rt_handle.block_on(async {
        let io = NativeIo::new(engine_with_files(0));
        io.open("hot").await.unwrap()
    });

    c.bench_function("nio_async_write_read_4k", |b| {
        b.iter(|| {
            rt_handle.block_on(async {
                file.write(vec![7u8; 4096], 0).await.unwrap();
                let _ = file.read(vec![0u8; 4096], 0).await.unwrap();
            });
        });
    });
}

fn bench_rename_list(c: &mut Criterion) {
    // Pre-populate a namespace and then benchmark rename + listing on it.
    let io = NativeIoSync::new(engine_with_files(5_000));

    c.bench_function("nio_rename_list_5k_entries", |b| {
        b.iter(|| {
            io.rename("file_0", "renamed").unwrap();
            io.rename("renamed", "file_0").unwrap();
            let _names = io.get_all().unwrap();
        });
    });
}

criterion_group!(
    nio,
    bench_sync_write_read,
    bench_async_write_read,
    bench_rename_list
);
criterion_main!(nio);
