//! Racing namespace operations from many callers.

use futures::future::join_all;
use nio_core::{EngineConfig, ErrorKind};
use nio_fs::{Engine, NativeIo, NativeIoSync};
use std::{sync::Barrier, thread};

fn engine() -> Engine {
    let _ = env_logger::builder().is_test(true).try_init();
    Engine::new("https://race.test", EngineConfig::default())
}

#[test]
fn concurrent_opens_share_one_file() {
    let engine = engine();
    let barrier = Barrier::new(8);

    thread::scope(|s| {
        for i in 0..8u8 {
            let io = NativeIoSync::new(engine.clone());
            let barrier = &barrier;
            s.spawn(move || {
                barrier.wait();
                let mut file = io.open("contended").unwrap();
                file.write(&[i + 1], u64::from(i)).unwrap();
            });
        }
    });

    let io = NativeIoSync::new(engine);
    assert_eq!(io.get_all().unwrap(), vec!["contended".to_owned()]);

    // Every writer landed in the same record.
    let mut file = io.open("contended").unwrap();
    let mut buf = [0u8; 8];
    file.read(&mut buf, 0).unwrap();
    assert_eq!(buf, [1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn concurrent_renames_of_one_source_succeed_once() {
    let engine = engine();
    let io = NativeIoSync::new(engine.clone());
    let mut file = io.open("source").unwrap();
    file.write(b"payload", 0).unwrap();
    file.close();

    let barrier = Barrier::new(8);
    let results: Vec<_> = thread::scope(|s| {
        let workers: Vec<_> = (0..8)
            .map(|i| {
                let io = io.clone();
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    io.rename("source", &format!("dest_{i}"))
                })
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    let names = io.get_all().unwrap();
    assert_eq!(names.len(), 1);
    assert!(names[0].starts_with("dest_"));

    let mut file = io.open(&names[0]).unwrap();
    let mut buf = [0u8; 7];
    file.read(&mut buf, 0).unwrap();
    assert_eq!(&buf, b"payload");
}

#[test]
fn listing_never_sees_half_applied_renames() {
    let engine = engine();
    let io = NativeIoSync::new(engine);
    let mut file = io.open("ping").unwrap();
    file.close();

    thread::scope(|s| {
        let renamer = io.clone();
        s.spawn(move || {
            for _ in 0..500 {
                renamer.rename("ping", "pong").unwrap();
                renamer.rename("pong", "ping").unwrap();
            }
        });

        let lister = io.clone();
        s.spawn(move || {
            for _ in 0..500 {
                let names = lister.get_all().unwrap();
                assert_eq!(names.len(), 1, "saw {names:?}");
                assert!(names[0] == "ping" || names[0] == "pong");
            }
        });
    });
}

#[test]
fn open_racing_delete_never_orphans_a_handle() {
    let engine = engine();
    let io = NativeIoSync::new(engine);

    for _ in 0..200 {
        let mut file = io.open("flicker").unwrap();
        file.close();

        let (opened, deleted) = thread::scope(|s| {
            let opener = io.clone();
            let open = s.spawn(move || opener.open("flicker"));
            let deleter = io.clone();
            let delete = s.spawn(move || deleter.delete("flicker"));
            (open.join().unwrap(), delete.join().unwrap())
        });

        let mut file = opened.unwrap();
        // Either the delete ran first (and open recreated the file), or it
        // was refused because the handle was already attached.
        if let Err(err) = deleted {
            assert_eq!(err.kind(), ErrorKind::InvalidState);
        }
        assert!(io.get_all().unwrap().contains(&"flicker".to_owned()));
        file.close();
        io.delete("flicker").unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn async_files_progress_independently() {
    let io = NativeIo::new(engine());

    let writers = (0..16u8).map(|i| {
        let io = io.clone();
        async move {
            let file = io.open(&format!("file_{i}")).await.unwrap();
            for chunk in 0..32u64 {
                file.write(vec![i; 16], chunk * 16).await.unwrap();
            }
            let length = file.get_length().await.unwrap();
            file.close().await;
            length
        }
    });
    let lengths = join_all(writers).await;
    assert!(lengths.iter().all(|len| *len == 512));

    let names = io.get_all().await.unwrap();
    assert_eq!(names.len(), 16);
    for name in names {
        io.delete(&name).await.unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sync_and_async_callers_share_one_namespace() {
    let engine = engine();
    let nonblocking = NativeIo::new(engine.clone());
    let blocking = NativeIoSync::new(engine);

    let file = nonblocking.open("shared").await.unwrap();
    file.write(vec![5, 6, 7], 0).await.unwrap();

    let err = blocking.rename("shared", "moved").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);

    file.close().await;
    blocking.rename("shared", "moved").unwrap();
    assert_eq!(nonblocking.get_all().await.unwrap(), vec!["moved".to_owned()]);

    let mut file = blocking.open("moved").unwrap();
    let mut buf = [0u8; 3];
    file.read(&mut buf, 0).unwrap();
    assert_eq!(buf, [5, 6, 7]);
}
