use std::{fs, io, path::Path};

pub mod languages;
pub mod translation_limiter;

/// Read a text file into lines.
///
/// Invalid UTF-8 is dropped, surrounding whitespace of the whole file is
/// trimmed and the rest is split on `\n`.
pub fn load_file(file_path: &Path) -> io::Result<Vec<String>> {
    let bytes = fs::read(file_path)?;

    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }

    Ok(text.trim().split('\n').map(str::to_string).collect())
}

/// Split a line into the segments used for the per sentence fallback.
///
/// Empty segments are kept so joining the results with `.` keeps the layout.
pub fn split_sentences(line: &str) -> Vec<&str> {
    line.split('.').collect()
}

/// Write the translated lines, replacing any existing file
pub fn write_output(file_path: &Path, lines: &[String]) -> io::Result<()> {
    fs::write(file_path, lines.join("\n"))
}

#[test]
fn test_load_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.txt");
    fs::write(&path, b"\n  Hola mundo\nBuenos d\xc3\xadas\xff\n\nadi\xf3s \n\n").unwrap();

    let lines = load_file(&path).unwrap();

    assert_eq!(lines, vec!["Hola mundo", "Buenos días", "", "adis"]);
}

#[test]
fn test_load_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    fs::write(&path, "   \n").unwrap();

    assert_eq!(load_file(&path).unwrap(), vec![String::new()]);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();

    assert!(load_file(&dir.path().join("missing.txt")).is_err());
}

#[test]
fn test_split_sentences() {
    assert_eq!(
        split_sentences("Uno. Dos.Tres."),
        vec!["Uno", " Dos", "Tres", ""]
    );
    assert_eq!(split_sentences("sin punto"), vec!["sin punto"]);
}

#[test]
fn test_write_output_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    fs::write(&path, "old content that is longer").unwrap();

    write_output(&path, &["one".to_string(), String::new(), "three".to_string()]).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "one\n\nthree");
}
