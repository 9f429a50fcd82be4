//! Integration tests for the async facade.

use core_async::{fs, sync, task, time};

#[tokio::test]
async fn test_task_spawn() {
    let handle = task::spawn(async { 42 });
    assert_eq!(handle.await.unwrap(), 42);
}

#[tokio::test]
async fn test_task_spawn_blocking() {
    let handle = task::spawn_blocking(|| {
        std::thread::sleep(std::time::Duration::from_millis(10));
        100
    });
    assert_eq!(handle.await.unwrap(), 100);
}

#[tokio::test]
async fn test_blocking_task_can_reach_runtime_handle() {
    let handle = task::spawn_blocking(|| {
        let runtime = core_async::runtime::Handle::current();
        runtime.block_on(async { 7 })
    });
    assert_eq!(handle.await.unwrap(), 7);
}

#[tokio::test]
async fn test_timeout_failure() {
    let result = time::timeout(time::Duration::from_millis(10), async {
        time::sleep(time::Duration::from_millis(100)).await;
    })
    .await;

    assert!(result.is_err());
}

#[test]
fn test_unbounded_channel_blocking_consumer() {
    let (tx, mut rx) = sync::mpsc::unbounded_channel::<u32>();
    let consumer = std::thread::spawn(move || {
        let mut seen = Vec::new();
        while let Some(value) = rx.blocking_recv() {
            seen.push(value);
        }
        seen
    });

    for i in 0..5 {
        tx.send(i).unwrap();
    }
    drop(tx);

    assert_eq!(consumer.join().unwrap(), vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_oneshot() {
    let (tx, rx) = sync::oneshot::channel();
    task::spawn(async move {
        tx.send("reply").unwrap();
    });
    assert_eq!(rx.await.unwrap(), "reply");
}

#[test]
fn test_fs_roundtrip() {
    core_async::runtime::block_on(async {
        let dir = std::env::temp_dir().join(format!("core-async-fs-{}", std::process::id()));
        fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("sample.bin");
        fs::write(&path, b"abc").await.unwrap();
        assert!(fs::try_exists(&path).await.unwrap());
        assert_eq!(std::fs::read(&path).unwrap(), b"abc");
        fs::remove_file(&path).await.unwrap();
        assert!(!fs::try_exists(&path).await.unwrap());
    });
}

#[test]
fn test_fs_link_and_rename() {
    core_async::runtime::block_on(async {
        let dir = std::env::temp_dir().join(format!("core-async-link-{}", std::process::id()));
        fs::create_dir_all(&dir).await.unwrap();
        let temp = dir.join("staged.tmp");
        let linked = dir.join("linked.bin");
        let renamed = dir.join("renamed.bin");
        fs::write(&temp, b"xyz").await.unwrap();

        fs::hard_link(&temp, &linked).await.unwrap();
        let again = fs::hard_link(&temp, &linked).await.unwrap_err();
        assert_eq!(again.kind(), std::io::ErrorKind::AlreadyExists);

        fs::rename(&temp, &renamed).await.unwrap();
        assert!(!fs::try_exists(&temp).await.unwrap());
        assert_eq!(std::fs::read(&linked).unwrap(), b"xyz");
        assert_eq!(std::fs::read(&renamed).unwrap(), b"xyz");

        fs::remove_file(&linked).await.unwrap();
        fs::remove_file(&renamed).await.unwrap();
    });
}
