use simgram::{CharMode, ErrorKind, Measure, Reader, ReaderConfig, Writer, WriterConfig};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn build(dir: &TempDir, config: WriterConfig, strings: &[&str]) -> PathBuf {
    let path = dir.path().join("strings.db");
    let mut writer = Writer::open(&path, config).unwrap();
    for s in strings {
        writer.insert(s).unwrap();
    }
    writer.close().unwrap();
    path
}

fn names(dir: &TempDir) -> PathBuf {
    build(dir, WriterConfig::default(), &["Barack Hussein Obama II", "James Gordon Brown"])
}

fn open(path: &Path, measure: Measure, threshold: f64) -> Reader {
    let config = ReaderConfig::default().with_measure(measure).with_threshold(threshold);
    Reader::open_with_config(path, config).unwrap()
}

#[test]
fn test_cosine_walkthrough() {
    let dir = TempDir::new().unwrap();
    let reader = open(&names(&dir), Measure::Cosine, 0.6);
    assert_eq!(reader.retrieve("Barack Obama").unwrap(), vec!["Barack Hussein Obama II"]);
    assert_eq!(reader.retrieve("Gordon Brown").unwrap(), vec!["James Gordon Brown"]);
    assert!(reader.retrieve("Obama").unwrap().is_empty());
}

#[test]
fn test_overlap_walkthrough() {
    let dir = TempDir::new().unwrap();
    let reader = open(&names(&dir), Measure::Overlap, 1.0);
    assert_eq!(reader.retrieve("Obama").unwrap(), vec!["Barack Hussein Obama II"]);
    assert!(reader.check("Obama").unwrap());
    assert!(!reader.check("Merkel").unwrap());
}

#[test]
fn test_every_string_matches_itself() {
    let strings = [
        "Barack Hussein Obama II",
        "James Gordon Brown",
        "a",
        "ab",
        "abababab",
        "Gordon",
        "mississippi",
    ];
    for boundary_marks in [false, true] {
        for gram_size in [1, 2, 3, 4] {
            let dir = TempDir::new().unwrap();
            let config = WriterConfig::default()
                .with_gram_size(gram_size)
                .with_boundary_marks(boundary_marks);
            let path = build(&dir, config, &strings);
            let reader = open(&path, Measure::Overlap, 1.0);
            for s in strings {
                let found = reader.retrieve(s).unwrap();
                assert!(found.iter().any(|f| f == s), "n={} marks={} {}", gram_size, boundary_marks, s);
            }
        }
    }
}

#[test]
fn test_repeated_calls_agree() {
    let dir = TempDir::new().unwrap();
    let path = build(
        &dir,
        WriterConfig::default(),
        &["Gordon Brown", "Gordon Brown", "Gordon Browne", "Jordan Brown", "Brown"],
    );
    let reader = open(&path, Measure::Jaccard, 0.5);
    let first = reader.retrieve("Gordon Brown").unwrap();
    assert_eq!(first, vec!["Gordon Brown", "Gordon Brown", "Gordon Browne"]);
    for _ in 0..5 {
        assert_eq!(reader.retrieve("Gordon Brown").unwrap(), first);
    }
}

#[test]
fn test_scored_results_are_ranked() {
    let dir = TempDir::new().unwrap();
    let path = build(&dir, WriterConfig::default(), &["Gordon Browne", "Gordon Brown", "Jordan Brown"]);
    let reader = open(&path, Measure::Dice, 0.5);
    let scored = reader.retrieve_scored("Gordon Brown").unwrap();
    let texts: Vec<&str> = scored.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts[0], "Gordon Brown");
    assert!((scored[0].score - 1.0).abs() < 1e-12);
    assert!(scored.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_empty_query_matches_only_empty_strings() {
    let dir = TempDir::new().unwrap();
    let path = build(&dir, WriterConfig::default(), &["", "ab", "abc", ""]);
    for measure in Measure::ALL {
        let reader = open(&path, measure, 1.0);
        let scored = reader.retrieve_scored("").unwrap();
        let ids: Vec<u32> = scored.iter().map(|m| m.id.0).collect();
        assert_eq!(ids, vec![0, 3], "{}", measure);
        assert!(scored.iter().all(|m| m.score == 1.0));
    }
}

#[test]
fn test_empty_dictionary() {
    let dir = TempDir::new().unwrap();
    let path = build(&dir, WriterConfig::default(), &[]);
    let reader = open(&path, Measure::Cosine, 0.1);
    assert!(reader.retrieve("anything").unwrap().is_empty());
    assert!(reader.retrieve("").unwrap().is_empty());
    assert!(!reader.check("anything").unwrap());
    let stats = reader.stats().unwrap();
    assert_eq!(stats.num_entries, 0);
    assert_eq!(stats.num_buckets, 0);
    assert_eq!(stats.max_gram_count, None);
}

#[test]
fn test_changing_measure_only_affects_later_calls() {
    let dir = TempDir::new().unwrap();
    let mut reader = open(&names(&dir), Measure::Cosine, 0.6);
    let before = reader.retrieve("Obama").unwrap();
    assert!(before.is_empty());

    reader.set_measure(Measure::Overlap);
    reader.set_threshold(1.0).unwrap();
    let after = reader.retrieve("Obama").unwrap();
    assert_eq!(after, vec!["Barack Hussein Obama II"]);
    assert!(before.is_empty());

    reader.set_measure(Measure::Cosine);
    reader.set_threshold(0.6).unwrap();
    assert!(reader.retrieve("Obama").unwrap().is_empty());
}

#[test]
fn test_threshold_outside_unit_interval() {
    let dir = TempDir::new().unwrap();
    let path = names(&dir);
    let mut reader = open(&path, Measure::Cosine, 0.6);
    for bad in [0.0, -0.5, 1.5, f64::NAN] {
        assert_eq!(reader.set_threshold(bad).unwrap_err().kind(), ErrorKind::InvalidParameter);
    }
    assert_eq!(reader.threshold(), 0.6);

    let reader = Reader::open_with_config(&path, ReaderConfig::default().with_threshold(0.0)).unwrap();
    assert_eq!(reader.retrieve("Obama").unwrap_err().kind(), ErrorKind::InvalidParameter);
}

#[test]
fn test_unset_measure() {
    let dir = TempDir::new().unwrap();
    let config = ReaderConfig { measure: None, ..ReaderConfig::default() };
    let mut reader = Reader::open_with_config(names(&dir), config).unwrap();
    assert_eq!(reader.retrieve("Obama").unwrap_err().kind(), ErrorKind::InvalidParameter);
    reader.set_measure(Measure::Overlap);
    reader.set_threshold(1.0).unwrap();
    assert_eq!(reader.retrieve("Obama").unwrap().len(), 1);
}

#[test]
fn test_closed_reader() {
    let dir = TempDir::new().unwrap();
    let mut reader = open(&names(&dir), Measure::Cosine, 0.6);
    reader.close();
    reader.close();
    assert!(reader.is_closed());
    assert_eq!(reader.retrieve("Obama").unwrap_err().kind(), ErrorKind::ClosedResource);
    assert_eq!(reader.check("Obama").unwrap_err().kind(), ErrorKind::ClosedResource);
    assert_eq!(reader.stats().unwrap_err().kind(), ErrorKind::ClosedResource);
}

#[test]
fn test_unicode_mode() {
    let dir = TempDir::new().unwrap();
    let config = WriterConfig::default().with_char_mode(CharMode::Unicode);
    let path = build(&dir, config, &["スパゲティ", "ラーメン"]);

    let reader = Reader::open_with_config(
        &path,
        ReaderConfig::default()
            .with_measure(Measure::Cosine)
            .with_threshold(0.6)
            .with_expected_mode(CharMode::Unicode),
    )
    .unwrap();
    assert_eq!(reader.retrieve("スパゲティー").unwrap(), vec!["スパゲティ"]);

    let stats = reader.stats().unwrap();
    assert_eq!(stats.char_mode, CharMode::Unicode);
    // 4 and 5 characters, n = 3
    assert_eq!(stats.min_gram_count, Some(2));
    assert_eq!(stats.max_gram_count, Some(3));
}

#[test]
fn test_mode_mismatch() {
    let dir = TempDir::new().unwrap();
    let path = names(&dir);
    let err = Reader::open_with_config(&path, ReaderConfig::default().with_expected_mode(CharMode::Unicode))
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::ModeMismatch);
    assert!(Reader::open_with_config(&path, ReaderConfig::default().with_expected_mode(CharMode::Byte)).is_ok());
}

#[test]
fn test_stats_track_cache() {
    let dir = TempDir::new().unwrap();
    let reader = open(&names(&dir), Measure::Overlap, 1.0);
    reader.retrieve("Obama").unwrap();
    reader.retrieve("Obama").unwrap();
    let stats = reader.stats().unwrap();
    assert_eq!(stats.num_entries, 2);
    assert_eq!(stats.gram_size, 3);
    assert_eq!(stats.num_buckets, 2);
    assert_eq!((stats.min_gram_count, stats.max_gram_count), (Some(16), Some(21)));
    assert!(stats.cache_stats.hits >= 1);
    assert!(stats.cache_stats.misses >= 1);

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["gram_size"], 3);
    assert_eq!(json["char_mode"], "Byte");
}
