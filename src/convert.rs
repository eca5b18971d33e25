//! Conversion pipelines: dump text in, SQL INSERT artifacts out.
//!
//! Each conversion checks its destination before reading anything, so an
//! existing artifact means the whole run is a no-op skip, and a missing
//! source surfaces before the destination is ever created or truncated.

use std::fs;

use camino::Utf8Path;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::MirrorError;
use crate::fs_util::read_dump;
use crate::matcher::TableMatcher;
use crate::sql::{insert_statement, sanitize_field};
use crate::stanza::stanzas;
use crate::trackdb::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvertAction {
    Written,
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConvertOutcome {
    pub output: String,
    pub action: ConvertAction,
    pub statements: usize,
}

impl ConvertOutcome {
    fn skipped(output: &Utf8Path) -> Self {
        Self {
            output: output.to_string(),
            action: ConvertAction::Skipped,
            statements: 0,
        }
    }

    fn written(output: &Utf8Path, statements: usize) -> Self {
        Self {
            output: output.to_string(),
            action: ConvertAction::Written,
            statements,
        }
    }
}

/// Convert the stanzas of a trackDb dump whose declared table the matcher
/// keeps into `INSERT INTO trackDb ...` statements.
pub fn trackdb_inserts(
    source: &Utf8Path,
    output: &Utf8Path,
    matcher: &TableMatcher,
    force: bool,
) -> Result<ConvertOutcome, MirrorError> {
    if output.as_std_path().exists() && !force {
        info!(output = %output, "insert statements already created, skipping");
        return Ok(ConvertOutcome::skipped(output));
    }

    let text = read_dump(source)?;
    let mut statements = Vec::new();
    for stanza in stanzas(&text) {
        let Some(table) = stanza.table_name() else {
            continue;
        };
        if !matcher.matches(table) {
            continue;
        }
        debug!(table, "stanza matched");
        let row = normalize(&stanza)?;
        statements.push(insert_statement("trackDb", row.fields()));
    }

    write_statements(output, &statements)?;
    info!(output = %output, count = statements.len(), "wrote trackDb inserts");
    Ok(ConvertOutcome::written(output, statements.len()))
}

/// Per-line filter path for flat, one-record-per-line dumps such as
/// hgFindSpec: keep the lines whose first field the matcher accepts and
/// emit them against a fixed destination table. No padding applies; the
/// schema is not fixed-width here.
pub fn filtered_line_inserts(
    source: &Utf8Path,
    output: &Utf8Path,
    destination_table: &str,
    matcher: &TableMatcher,
    force: bool,
) -> Result<ConvertOutcome, MirrorError> {
    if output.as_std_path().exists() && !force {
        info!(output = %output, "insert statements already created, skipping");
        return Ok(ConvertOutcome::skipped(output));
    }

    let text = read_dump(source)?;
    let mut statements = Vec::new();
    for line in text.lines() {
        if line.is_empty() {
            continue;
        }
        let fields: Vec<String> = line.split('\t').map(sanitize_field).collect();
        if !matcher.matches(&fields[0]) {
            continue;
        }
        statements.push(insert_statement(destination_table, &fields));
    }

    write_statements(output, &statements)?;
    info!(output = %output, count = statements.len(), "wrote filtered line inserts");
    Ok(ConvertOutcome::written(output, statements.len()))
}

/// Convert a whole flat table dump, one INSERT per line, no filtering.
pub fn table_dump_inserts(
    source: &Utf8Path,
    output: &Utf8Path,
    table: &str,
    force: bool,
) -> Result<ConvertOutcome, MirrorError> {
    if output.as_std_path().exists() && !force {
        info!(table, "insert statements already created, skipping");
        return Ok(ConvertOutcome::skipped(output));
    }

    let text = read_dump(source)?;
    let statements: Vec<String> = text
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| {
            let fields: Vec<String> = line.split('\t').map(sanitize_field).collect();
            insert_statement(table, &fields)
        })
        .collect();

    write_statements(output, &statements)?;
    info!(table, count = statements.len(), "wrote table dump inserts");
    Ok(ConvertOutcome::written(output, statements.len()))
}

fn write_statements(output: &Utf8Path, statements: &[String]) -> Result<(), MirrorError> {
    let mut content = statements.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    fs::write(output.as_std_path(), content)
        .map_err(|err| MirrorError::Filesystem(format!("write {output}: {err}")))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use camino::Utf8PathBuf;

    use super::*;
    use crate::matcher::{TableMatcher, TableNameSet};

    fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_source_reported_before_output_exists() {
        let (_guard, root) = temp_root();
        let source = root.join("trackDb.txt");
        let output = root.join("trackDb_inserts.sql");
        let matcher = TableMatcher::ExactSet(TableNameSet::from_tables(["geneA"]));

        let err = trackdb_inserts(&source, &output, &matcher, false).unwrap_err();
        assert_matches!(err, MirrorError::MissingSourceFile(_));
        assert!(!output.as_std_path().exists());
    }

    #[test]
    fn existing_output_short_circuits() {
        let (_guard, root) = temp_root();
        let source = root.join("trackDb.txt");
        let output = root.join("trackDb_inserts.sql");
        std::fs::write(output.as_std_path(), "existing\n").unwrap();
        let matcher = TableMatcher::ExactSet(TableNameSet::from_tables(["geneA"]));

        // skip happens before the missing source would be noticed
        let outcome = trackdb_inserts(&source, &output, &matcher, false).unwrap();
        assert_eq!(outcome.action, ConvertAction::Skipped);
        assert_eq!(
            std::fs::read_to_string(output.as_std_path()).unwrap(),
            "existing\n"
        );
    }

    #[test]
    fn duplicates_are_preserved_in_source_order() {
        let (_guard, root) = temp_root();
        let source = root.join("trackDb.txt");
        std::fs::write(
            source.as_std_path(),
            "geneA\tone\tlast\n\ngeneB\ttwo\tlast\n\ngeneA\tone\tlast\n",
        )
        .unwrap();
        let output = root.join("trackDb_inserts.sql");
        let matcher = TableMatcher::ExactSet(TableNameSet::from_tables(["geneA"]));

        let outcome = trackdb_inserts(&source, &output, &matcher, false).unwrap();
        assert_eq!(outcome.statements, 2);
        let content = std::fs::read_to_string(output.as_std_path()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], lines[1]);
    }

    #[test]
    fn flat_dump_converts_every_line() {
        let (_guard, root) = temp_root();
        let source = root.join("knownGene.txt");
        std::fs::write(source.as_std_path(), "a\t1\nb\t2\n").unwrap();
        let output = root.join("knownGene_inserts.sql");

        let outcome = table_dump_inserts(&source, &output, "knownGene", false).unwrap();
        assert_eq!(outcome.statements, 2);
        let content = std::fs::read_to_string(output.as_std_path()).unwrap();
        assert_eq!(
            content,
            "INSERT INTO knownGene VALUES (\"a\",\"1\");\nINSERT INTO knownGene VALUES (\"b\",\"2\");\n"
        );
    }
}
