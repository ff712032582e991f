//! Read back `.love` archives produced in tests.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use zip::ZipArchive;

fn open(path: &Path) -> ZipArchive<File> {
    let file = File::open(path).unwrap_or_else(|e| panic!("cannot open archive {path:?}: {e}"));
    ZipArchive::new(file).unwrap_or_else(|e| panic!("{path:?} is not a zip archive: {e}"))
}

/// Entry names of the archive, sorted.
pub fn entry_names(path: &Path) -> Vec<String> {
    let archive = open(path);
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}

/// Contents of one entry.
pub fn entry_bytes(path: &Path, name: &str) -> Vec<u8> {
    let mut archive = open(path);
    let mut entry = archive
        .by_name(name)
        .unwrap_or_else(|e| panic!("{path:?} has no entry {name}: {e}"));
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf).expect("Failed to read archive entry");
    buf
}
