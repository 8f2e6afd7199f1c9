/// simgram walkthrough
///
/// Builds a two-name database, then queries it with cosine similarity and
/// with the overlap coefficient. A second database in Unicode mode shows
/// retrieval over multi-byte characters.
///
/// Run with `RUST_LOG=simgram=debug cargo run --example sample` to see the
/// pruning statistics of every query.

use simgram::{CharMode, Measure, Reader, ReaderConfig, Writer, WriterConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let dir = tempfile::tempdir()?;

    // Step 1: build
    let path = dir.path().join("sample.db");
    let mut writer = Writer::create(&path)?;
    writer.insert("Barack Hussein Obama II")?;
    writer.insert("James Gordon Brown")?;
    writer.close()?;

    // Step 2: cosine, threshold 0.6
    let mut reader = Reader::open(&path)?;
    reader.set_measure(Measure::Cosine);
    reader.set_threshold(0.6)?;
    for query in ["Barack Obama", "Gordon Brown", "Obama"] {
        println!("cosine  0.6  {:<14} -> {:?}", query, reader.retrieve(query)?);
    }

    // Step 3: overlap, threshold 1.0
    reader.set_measure(Measure::Overlap);
    reader.set_threshold(1.0)?;
    for m in reader.retrieve_scored("Obama")? {
        println!("overlap 1.0  {:<14} -> #{} {} ({:.3})", "Obama", m.id.0, m.text, m.score);
    }

    let stats = reader.stats()?;
    println!(
        "\n{} strings in {} buckets, cache hits {} / misses {}",
        stats.num_entries, stats.num_buckets, stats.cache_stats.hits, stats.cache_stats.misses
    );
    reader.close();

    // Step 4: Unicode mode
    let path = dir.path().join("sample_unicode.db");
    let config = WriterConfig::default().with_char_mode(CharMode::Unicode);
    let mut writer = Writer::open(&path, config)?;
    writer.insert("スパゲティ")?;
    writer.close()?;

    let reader = Reader::open_with_config(
        &path,
        ReaderConfig::default()
            .with_measure(Measure::Cosine)
            .with_threshold(0.6)
            .with_expected_mode(CharMode::Unicode),
    )?;
    println!("\ncosine  0.6  スパゲティー -> {}", reader.retrieve("スパゲティー")?.join(" "));

    Ok(())
}
