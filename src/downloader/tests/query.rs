use super::*;

#[tokio::test]
async fn test_status_unknown_id_is_none() {
    let (downloader, _temp) = create_test_downloader(ScriptedExtractor::new(), 1).await;
    assert!(downloader.status(TaskId::new()).await.is_none());
}

#[tokio::test]
async fn test_status_str_parses_ids() {
    let extractor = ScriptedExtractor::new().wait_for_gate();
    let gate = extractor.gate();
    let (downloader, _temp) = create_test_downloader(extractor, 1).await;

    let id = downloader
        .submit(DownloadRequest::new("https://example.com/x"))
        .await
        .unwrap();

    assert!(downloader.status_str(&id.to_string()).await.is_some());
    assert!(downloader.status_str("not-a-task-id").await.is_none());
    assert!(downloader.status_str("").await.is_none());
    assert!(
        downloader
            .status_str("00000000-0000-0000-0000-000000000000")
            .await
            .is_none()
    );

    gate.send(true).unwrap();
    wait_for_terminal(&downloader, id).await;
}

#[tokio::test]
async fn test_terminal_status_is_stable() {
    let extractor = ScriptedExtractor::new().report(RawProgress::bytes(40, 100));
    let (downloader, _temp) = create_test_downloader(extractor, 1).await;

    let id = downloader
        .submit(DownloadRequest::new("https://example.com/x"))
        .await
        .unwrap();
    let first = wait_for_terminal(&downloader, id).await;

    for _ in 0..5 {
        assert_eq!(downloader.status(id).await.unwrap(), first);
    }
}

#[tokio::test]
async fn test_task_counts_track_outcomes() {
    let (downloader, _temp) = create_test_downloader(ScriptedExtractor::new(), 2).await;

    let a = downloader
        .submit(DownloadRequest::new("https://example.com/a"))
        .await
        .unwrap();
    let b = downloader
        .submit(DownloadRequest::new("https://example.com/b"))
        .await
        .unwrap();
    wait_for_terminal(&downloader, a).await;
    wait_for_terminal(&downloader, b).await;

    let counts = downloader.task_counts().await;
    assert_eq!(counts.get(&Status::Completed), Some(&2));
}
