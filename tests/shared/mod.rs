//! Snapshot fixtures shared by the integration tests.

use std::{io::Write, path::PathBuf};

use flate2::{write::GzEncoder, Compression};
use tempfile::TempDir;

/// Routes engine tracing into captured test output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Gzip-encodes snapshot lines the way the upstream scraper ships
/// them.
pub fn encode_snapshot(lines: &[&str]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    for line in lines {
        writeln!(encoder, "{line}").unwrap();
    }
    encoder.finish().unwrap()
}

/// Writes an encoded snapshot into `dir` and returns its path.
pub fn write_snapshot(dir: &TempDir, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, encode_snapshot(lines)).unwrap();
    path
}

/// A small three-band catalogue exercising every row shape: genres in
/// need of cleaning, a declared preferred track, a preferred wire
/// flag, and an undated album.
pub fn demo_catalogue() -> Vec<&'static str> {
    vec![
        "B|@|1|@|Abba|@|http://img/abba|@|Swedish pop group.|@|Agnetha, Björn, Benny, Anni-Frid|@|pop",
        "A|@|10|@|Arrival|@|http://img/arrival|@|1976|@|Dancing Queen",
        "T|@|100|@|Dancing Queen|@|http://media/100|@|false",
        "T|@|101|@|Knowing Me, Knowing You|@|http://media/101|@|false",
        "A|@|11|@|Waterloo|@|http://img/waterloo|@|1974",
        "T|@|110|@|Waterloo|@|http://media/110|@|true",
        "B|@|2|@|Queen|@|http://img/queen|@||@||@|rock, unknown",
        "A|@|20|@|A Night at the Opera|@|http://img/opera|@|1975",
        "T|@|200|@|Bohemian Rhapsody|@|http://media/200|@|false",
        "T|@|201|@|Love of My Life|@|http://media/201|@|false",
        "B|@|3|@|The Storytellers|@|http://img/st|@||@||@|children's stories",
        "A|@|30|@|Bedtime|@|http://img/bedtime|@|",
        "T|@|300|@|Three Little Pigs|@|http://media/300|@|false",
    ]
}

/// Track ids of `demo_catalogue`, for whole-result comparisons.
pub const DEMO_TRACK_IDS: [&str; 6] = ["100", "101", "110", "200", "201", "300"];
