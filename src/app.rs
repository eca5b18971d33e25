use std::time::Duration;

use camino::Utf8Path;
use serde::Serialize;
use tracing::info;

use crate::convert::{
    ConvertOutcome, filtered_line_inserts, table_dump_inserts, trackdb_inserts,
};
use crate::domain::{Dbms, GencodeVersion, OrganismDb, TableName};
use crate::error::MirrorError;
use crate::fs_util::{list_dump_files, table_name_of};
use crate::matcher::{TableMatcher, TableNameSet};
use crate::store::DumpStore;
use crate::ucsc::UcscClient;

/// Marker shared by every gencode composite table name.
const GENCODE_MARKER: &str = "wgEncodeGencode";

#[derive(Debug, Clone)]
pub struct MirrorOptions {
    pub force: bool,
    pub skip_download: bool,
    pub dbms: Dbms,
}

#[derive(Debug, Clone, Serialize)]
pub struct GencodeResult {
    pub db: String,
    pub version: u32,
    pub downloaded: Vec<String>,
    pub tables: Vec<ConvertOutcome>,
    pub trackdb: ConvertOutcome,
    pub hgfindspec: ConvertOutcome,
    pub wrapper: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackResult {
    pub db: String,
    pub table: String,
    pub downloaded: Vec<String>,
    pub tables: Vec<ConvertOutcome>,
    pub trackdb: ConvertOutcome,
    pub hgfindspec: ConvertOutcome,
    pub wrapper: String,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

#[derive(Clone)]
pub struct App<U: UcscClient> {
    store: DumpStore,
    ucsc: U,
}

impl<U: UcscClient> App<U> {
    pub fn new(store: DumpStore, ucsc: U) -> Self {
        Self { store, ucsc }
    }

    /// Set up everything needed to mirror one gencode release: the
    /// per-version table dumps, the trackDb and hgFindSpec selections, and
    /// the loader script.
    pub fn add_gencode(
        &self,
        db: &OrganismDb,
        version: GencodeVersion,
        options: &MirrorOptions,
        sink: &dyn ProgressSink,
    ) -> Result<GencodeResult, MirrorError> {
        let job_dir = self.store.gencode_dir(db, version);
        self.store.ensure_dir(&job_dir)?;
        self.store.ensure_dir(&self.store.organism_dir(db))?;

        let tag = version.tag();
        let downloaded = if options.skip_download {
            Vec::new()
        } else {
            sink.event(ProgressEvent {
                message: format!("phase=Fetch; gencode {tag} dumps for {db}"),
                elapsed: None,
            });
            let fetched = self.fetch_matching_dumps(db, &job_dir, |name| {
                name.contains(GENCODE_MARKER) && name.contains(&tag)
            })?;
            self.fetch_organism_files(db, sink)?;
            fetched
        };

        sink.event(ProgressEvent {
            message: "phase=Convert; table dumps".to_string(),
            elapsed: None,
        });
        let (tables, table_names) = self.convert_table_dumps(&job_dir, options.force)?;

        sink.event(ProgressEvent {
            message: "phase=Convert; trackDb".to_string(),
            elapsed: None,
        });
        let name_set = TableNameSet::from_tables(table_names).with_gencode_umbrella(version);
        let trackdb = trackdb_inserts(
            &self.store.trackdb_dump(db),
            &self.store.trackdb_inserts(&job_dir),
            &TableMatcher::ExactSet(name_set),
            options.force,
        )?;

        sink.event(ProgressEvent {
            message: "phase=Convert; hgFindSpec".to_string(),
            elapsed: None,
        });
        let hgfindspec = filtered_line_inserts(
            &self.store.hgfindspec_dump(db),
            &self.store.hgfindspec_inserts(&job_dir),
            "hgFindSpec",
            &TableMatcher::marker_with_version(GENCODE_MARKER, tag),
            options.force,
        )?;

        let wrapper = self.write_wrapper(
            &job_dir,
            &format!("Gencode {version}"),
            options.dbms,
            db,
            options.force,
        )?;

        info!(db = %db, %version, "gencode job complete");
        Ok(GencodeResult {
            db: db.to_string(),
            version: version.number(),
            downloaded,
            tables,
            trackdb,
            hgfindspec,
            wrapper,
        })
    }

    /// Same pipeline keyed by a single table name; hgFindSpec selection is
    /// by marker substring only, with no version token.
    pub fn add_track(
        &self,
        db: &OrganismDb,
        table: &TableName,
        options: &MirrorOptions,
        sink: &dyn ProgressSink,
    ) -> Result<TrackResult, MirrorError> {
        let job_dir = self.store.track_dir(db, table);
        self.store.ensure_dir(&job_dir)?;
        self.store.ensure_dir(&self.store.organism_dir(db))?;

        let downloaded = if options.skip_download {
            Vec::new()
        } else {
            sink.event(ProgressEvent {
                message: format!("phase=Fetch; {table} dumps for {db}"),
                elapsed: None,
            });
            let fetched =
                self.fetch_matching_dumps(db, &job_dir, |name| name.starts_with(table.as_str()))?;
            self.fetch_organism_files(db, sink)?;
            fetched
        };

        sink.event(ProgressEvent {
            message: "phase=Convert; table dumps".to_string(),
            elapsed: None,
        });
        let (tables, table_names) = self.convert_table_dumps(&job_dir, options.force)?;

        sink.event(ProgressEvent {
            message: "phase=Convert; trackDb".to_string(),
            elapsed: None,
        });
        let trackdb = trackdb_inserts(
            &self.store.trackdb_dump(db),
            &self.store.trackdb_inserts(&job_dir),
            &TableMatcher::ExactSet(TableNameSet::from_tables(table_names)),
            options.force,
        )?;

        sink.event(ProgressEvent {
            message: "phase=Convert; hgFindSpec".to_string(),
            elapsed: None,
        });
        let hgfindspec = filtered_line_inserts(
            &self.store.hgfindspec_dump(db),
            &self.store.hgfindspec_inserts(&job_dir),
            "hgFindSpec",
            &TableMatcher::marker(table.as_str()),
            options.force,
        )?;

        let wrapper =
            self.write_wrapper(&job_dir, table.as_str(), options.dbms, db, options.force)?;

        info!(db = %db, %table, "track job complete");
        Ok(TrackResult {
            db: db.to_string(),
            table: table.to_string(),
            downloaded,
            tables,
            trackdb,
            hgfindspec,
            wrapper,
        })
    }

    /// Download the database dumps the filter keeps into the job directory,
    /// leaving already-present files untouched.
    fn fetch_matching_dumps<F>(
        &self,
        db: &OrganismDb,
        job_dir: &Utf8Path,
        keep: F,
    ) -> Result<Vec<String>, MirrorError>
    where
        F: Fn(&str) -> bool,
    {
        let listing = self.ucsc.list_database_files(db)?;
        let mut fetched = Vec::new();
        for name in listing.iter().filter(|name| keep(name)) {
            let destination = job_dir.join(name);
            if destination.as_std_path().exists() {
                info!(file = %name, "dump already present, not re-downloading");
                continue;
            }
            self.ucsc.download_file(db, name, &destination)?;
            fetched.push(name.clone());
        }
        Ok(fetched)
    }

    fn fetch_organism_files(
        &self,
        db: &OrganismDb,
        sink: &dyn ProgressSink,
    ) -> Result<(), MirrorError> {
        sink.event(ProgressEvent {
            message: format!("phase=Fetch; organism dumps for {db}"),
            elapsed: None,
        });
        for path in [self.store.trackdb_dump(db), self.store.hgfindspec_dump(db)] {
            if path.as_std_path().exists() {
                info!(file = %path, "dump already present, not re-downloading");
                continue;
            }
            let filename = path
                .file_name()
                .ok_or_else(|| MirrorError::Filesystem(format!("bad dump path {path}")))?;
            self.ucsc.download_file(db, filename, &path)?;
        }
        Ok(())
    }

    /// Convert every table dump in the job directory and collect the
    /// destination table names for the trackDb matcher.
    fn convert_table_dumps(
        &self,
        job_dir: &Utf8Path,
        force: bool,
    ) -> Result<(Vec<ConvertOutcome>, Vec<String>), MirrorError> {
        let mut outcomes = Vec::new();
        let mut table_names = Vec::new();
        for dump_file in list_dump_files(job_dir)? {
            let table = table_name_of(&dump_file).to_string();
            let outcome = table_dump_inserts(
                &job_dir.join(&dump_file),
                &self.store.table_inserts(job_dir, &table),
                &table,
                force,
            )?;
            outcomes.push(outcome);
            table_names.push(table);
        }
        Ok((outcomes, table_names))
    }

    fn write_wrapper(
        &self,
        job_dir: &Utf8Path,
        label: &str,
        dbms: Dbms,
        db: &OrganismDb,
        force: bool,
    ) -> Result<String, MirrorError> {
        let path = self.store.wrapper_script(job_dir);
        if path.as_std_path().exists() && !force {
            return Ok(path.to_string());
        }
        let script = wrapper_script(label, dbms, db);
        std::fs::write(path.as_std_path(), script)
            .map_err(|err| MirrorError::Filesystem(format!("write {path}: {err}")))?;
        Ok(path.to_string())
    }
}

/// Loader script that replays every generated inserts file against the
/// mirror database.
pub fn wrapper_script(label: &str, dbms: Dbms, db: &OrganismDb) -> String {
    format!(
        "#!/usr/bin/env bash\n\
         # Loads {label} into the {db} mirror database.\n\
         # Generated by track-mirror/{version} at {timestamp}.\n\
         set -euo pipefail\n\
         \n\
         cd \"$(dirname \"$0\")\"\n\
         \n\
         for file in *_inserts.sql; do\n\
         \techo \"loading ${{file}}\"\n\
         \tsudo {dbms} -u root -p {db} < \"${{file}}\"\n\
         done\n\
         echo \"done\"\n",
        version = env!("CARGO_PKG_VERSION"),
        timestamp = iso_timestamp(),
    )
}

fn iso_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
