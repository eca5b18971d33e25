use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::domain::{GencodeVersion, OrganismDb, TableName};
use crate::error::MirrorError;

/// On-disk layout of a mirror run. Every path is absolute and rooted at a
/// caller-supplied directory; nothing here touches the process working
/// directory.
#[derive(Debug, Clone)]
pub struct DumpStore {
    root: Utf8PathBuf,
}

impl DumpStore {
    pub fn new() -> Result<Self, MirrorError> {
        let cwd = std::env::current_dir().map_err(|err| MirrorError::Filesystem(err.to_string()))?;
        let root = Utf8PathBuf::from_path_buf(cwd)
            .map_err(|_| MirrorError::Filesystem("non-utf8 working directory".to_string()))?;
        Ok(Self::new_with_root(root))
    }

    pub fn new_with_root(root: Utf8PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn ucsc_files(&self) -> Utf8PathBuf {
        self.root.join("ucsc_files")
    }

    /// Directory holding the organism-wide dumps (trackDb, hgFindSpec).
    pub fn organism_dir(&self, db: &OrganismDb) -> Utf8PathBuf {
        self.ucsc_files().join(db.as_str())
    }

    pub fn trackdb_dump(&self, db: &OrganismDb) -> Utf8PathBuf {
        self.organism_dir(db).join("trackDb.txt.gz")
    }

    pub fn hgfindspec_dump(&self, db: &OrganismDb) -> Utf8PathBuf {
        self.organism_dir(db).join("hgFindSpec.txt.gz")
    }

    /// Job directory for a gencode release.
    pub fn gencode_dir(&self, db: &OrganismDb, version: GencodeVersion) -> Utf8PathBuf {
        self.ucsc_files()
            .join(format!("{}_gencodeV{}", db.as_str(), version.number()))
    }

    /// Job directory for a single named track.
    pub fn track_dir(&self, db: &OrganismDb, table: &TableName) -> Utf8PathBuf {
        self.ucsc_files()
            .join(format!("{}_{}", db.as_str(), table.as_str()))
    }

    pub fn trackdb_inserts(&self, job_dir: &Utf8Path) -> Utf8PathBuf {
        job_dir.join("trackDb_inserts.sql")
    }

    pub fn hgfindspec_inserts(&self, job_dir: &Utf8Path) -> Utf8PathBuf {
        job_dir.join("hgFindSpec_inserts.sql")
    }

    pub fn table_inserts(&self, job_dir: &Utf8Path, table: &str) -> Utf8PathBuf {
        job_dir.join(format!("{table}_inserts.sql"))
    }

    pub fn wrapper_script(&self, job_dir: &Utf8Path) -> Utf8PathBuf {
        job_dir.join("run.sh")
    }

    pub fn ensure_dir(&self, dir: &Utf8Path) -> Result<(), MirrorError> {
        fs::create_dir_all(dir.as_std_path())
            .map_err(|err| MirrorError::Filesystem(format!("create {dir}: {err}")))
    }
}
