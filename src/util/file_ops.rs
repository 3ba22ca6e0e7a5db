// File Operations for key records
// Whole-file text reads and writes; missing files are reported as None

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

/// Read an entire file as UTF-8 text, or None if it does not exist
pub fn read_text(path: &Path) -> io::Result<Option<String>> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    let mut text = String::new();
    file.read_to_string(&mut text)?;
    Ok(Some(text))
}

/// Write text to a file, replacing any previous content
pub fn write_text(path: &Path, text: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(text.as_bytes())?;
    Ok(())
}
