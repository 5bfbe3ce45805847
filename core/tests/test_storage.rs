use ridepower_core::{
    check_streams_availability, InMemoryStreamSource, JsonDirStreamSource, StoreError,
    StreamSource, StreamType, StreamsBundle,
};

#[test]
fn json_dir_save_and_fetch() {
    let dir = std::env::temp_dir().join("ridepower_streams_test");
    let source = JsonDirStreamSource::new(&dir);
    let bundle = StreamsBundle::new(77)
        .with_series(StreamType::Watts, vec![180.0, 190.0, 200.0])
        .with_recorded_ftp(240.0);

    let path = source.save_streams(&bundle).unwrap();
    assert!(path.ends_with("77.json"));

    let loaded = source.fetch_streams(77).unwrap().expect("stored");
    assert_eq!(loaded, bundle);
    assert!(source.fetch_streams(78).unwrap().is_none());
    assert_eq!(source.available_activity_ids(&[76, 77, 78]).unwrap(), vec![77]);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn json_dir_fills_missing_activity_id() {
    let dir = std::env::temp_dir().join("ridepower_streams_noid");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("5.json"), r#"{"streams": [{"type": "watts", "data": [100]}]}"#).unwrap();
    let loaded = JsonDirStreamSource::new(&dir).fetch_streams(5).unwrap().unwrap();
    assert_eq!(loaded.activity_id, 5);
    assert_eq!(loaded.series(StreamType::Watts), &[100.0]);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn availability_in_memory() {
    let source: InMemoryStreamSource = [StreamsBundle::new(1), StreamsBundle::new(3)].into_iter().collect();
    assert_eq!(source.len(), 2);
    assert_eq!(check_streams_availability(&source, &[1, 2, 3]), vec![1, 3]);
    assert!(check_streams_availability(&source, &[]).is_empty());
}

struct DownStore;

impl StreamSource for DownStore {
    fn fetch_streams(&self, _activity_id: i64) -> Result<Option<StreamsBundle>, StoreError> {
        Err(StoreError::Http("connection refused".into()))
    }
}

#[test]
fn availability_failure_gives_empty_list() {
    assert!(check_streams_availability(&DownStore, &[1, 2]).is_empty());
}
