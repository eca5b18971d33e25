use std::fs;
use std::io::Read;

use camino::Utf8Path;
use flate2::read::GzDecoder;

use crate::error::MirrorError;

/// Read a dump file to a string, decompressing transparently when the
/// filename ends in `.gz`.
pub fn read_dump(path: &Utf8Path) -> Result<String, MirrorError> {
    if !path.as_std_path().exists() {
        return Err(MirrorError::MissingSourceFile(path.to_owned()));
    }
    let file = fs::File::open(path.as_std_path())
        .map_err(|err| MirrorError::Filesystem(format!("open {path}: {err}")))?;
    let mut content = String::new();
    if path.as_str().ends_with(".gz") {
        GzDecoder::new(file)
            .read_to_string(&mut content)
            .map_err(|err| MirrorError::Filesystem(format!("decompress {path}: {err}")))?;
    } else {
        let mut file = file;
        file.read_to_string(&mut content)
            .map_err(|err| MirrorError::Filesystem(format!("read {path}: {err}")))?;
    }
    Ok(content)
}

/// Filenames of the table dumps (`*.txt.gz` or `*.txt`) in a job directory.
pub fn list_dump_files(dir: &Utf8Path) -> Result<Vec<String>, MirrorError> {
    let mut files = Vec::new();
    let entries = fs::read_dir(dir.as_std_path())
        .map_err(|err| MirrorError::Filesystem(format!("read dir {dir}: {err}")))?;
    for entry in entries {
        let entry = entry.map_err(|err| MirrorError::Filesystem(err.to_string()))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.ends_with(".txt.gz") || name.ends_with(".txt") {
            files.push(name.to_string());
        }
    }
    files.sort();
    Ok(files)
}

/// The destination table for a dump filename: the name with its `.txt` /
/// `.txt.gz` extension stripped.
pub fn table_name_of(dump_file: &str) -> &str {
    dump_file
        .strip_suffix(".txt.gz")
        .or_else(|| dump_file.strip_suffix(".txt"))
        .unwrap_or(dump_file)
}
