use cpool_logger::{Logger, Rotation};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn json_file_output_writes_structured_lines() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;

    let logger = Logger::builder("replenisher")
        .console(false)
        .file(tmp_dir.path())
        .rotation(Rotation::NEVER)
        .json()
        .init()?;

    tracing::warn!(mode = "decrypt", "Engine pool exhausted");
    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let line = fs::read_to_string(tmp_dir.path().join("replenisher.log"))?;
    let line = line.lines().find(|l| l.contains("exhausted")).expect("event was written");
    assert!(line.starts_with('{'), "{line}");
    assert!(line.contains(r#""mode":"decrypt""#), "{line}");
    assert!(line.contains(r#""level":"WARN""#), "{line}");

    Ok(())
}
