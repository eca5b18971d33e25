use std::io::Write;

use camino::Utf8PathBuf;
use flate2::Compression;
use flate2::write::GzEncoder;

use ucsc_track_mirror::convert::{ConvertAction, filtered_line_inserts, trackdb_inserts};
use ucsc_track_mirror::matcher::{TableMatcher, TableNameSet};
use ucsc_track_mirror::sql::insert_statement;
use ucsc_track_mirror::stanza::stanzas;
use ucsc_track_mirror::trackdb::{WIDTH, normalize, normalize_with_width};

fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    (dir, path)
}

fn write_gz(path: &Utf8PathBuf, content: &str) {
    let file = std::fs::File::create(path.as_std_path()).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

#[test]
fn stanza_to_statement_with_narrow_schema() {
    let text = "geneA\tmRNA\tchr1\\\nmore text\\\n";
    let stanza = stanzas(text).next().unwrap();
    let row = normalize_with_width(&stanza, 3).unwrap();
    assert_eq!(row.fields(), ["geneA", "mRNA", "chr1\n more text"]);

    let statement = insert_statement(stanza.table_name().unwrap(), row.fields());
    assert_eq!(
        statement,
        "INSERT INTO geneA VALUES (\"geneA\",\"mRNA\",\"chr1\n more text\");"
    );
}

#[test]
fn normalized_width_is_schema_width_for_any_head() {
    for head_len in 1..=WIDTH {
        let head = vec!["x"; head_len].join("\t");
        let stanza = stanzas(&head).next().unwrap();
        let row = normalize(&stanza).unwrap();
        assert_eq!(row.fields().len(), WIDTH);
    }
}

#[test]
fn trackdb_pipeline_over_gzip_dump() {
    let (_guard, root) = temp_root();
    let source = root.join("trackDb.txt.gz");
    write_gz(
        &source,
        "knownGene\tKnown Genes\tgenePred\tlast column\\\nhtml fragment\n\nrefGene\tRefSeq\tgenePred\tother\n",
    );
    let output = root.join("trackDb_inserts.sql");
    let matcher = TableMatcher::ExactSet(TableNameSet::from_tables(["knownGene"]));

    let outcome = trackdb_inserts(&source, &output, &matcher, false).unwrap();
    assert_eq!(outcome.action, ConvertAction::Written);
    assert_eq!(outcome.statements, 1);

    let content = std::fs::read_to_string(output.as_std_path()).unwrap();
    assert!(content.starts_with("INSERT INTO trackDb VALUES (\"knownGene\",\"Known Genes\","));
    assert!(content.contains("last column\n html fragment"));
    assert!(!content.contains("refGene"));
    assert!(!content.contains('\\'));
    // padded to the full schema: 21 fields means 20 separators
    assert_eq!(content.matches("\",\"").count(), WIDTH - 1);
}

#[test]
fn hgfindspec_marker_and_version_filter() {
    let (_guard, root) = temp_root();
    let source = root.join("hgFindSpec.txt.gz");
    write_gz(
        &source,
        "wgEncodeGencodeBasicV44\tfoo\tbar\nwgEncodeGencodeBasicV45\tfoo\tbar\nrefGeneV44\tfoo\tbar\n",
    );

    let output = root.join("hgFindSpec_inserts.sql");
    let matcher = TableMatcher::marker_with_version("wgEncodeGencode", "V44");
    let outcome = filtered_line_inserts(&source, &output, "hgFindSpec", &matcher, false).unwrap();
    assert_eq!(outcome.statements, 1);

    let content = std::fs::read_to_string(output.as_std_path()).unwrap();
    assert_eq!(
        content,
        "INSERT INTO hgFindSpec VALUES (\"wgEncodeGencodeBasicV44\",\"foo\",\"bar\");\n"
    );

    // same lines against the next release: nothing matches
    let output_v45 = root.join("hgFindSpec_inserts_v45.sql");
    let matcher = TableMatcher::marker_with_version("wgEncodeGencode", "V46");
    let outcome =
        filtered_line_inserts(&source, &output_v45, "hgFindSpec", &matcher, false).unwrap();
    assert_eq!(outcome.statements, 0);
    assert_eq!(
        std::fs::read_to_string(output_v45.as_std_path()).unwrap(),
        ""
    );
}

#[test]
fn rerun_is_byte_identical_noop() {
    let (_guard, root) = temp_root();
    let source = root.join("trackDb.txt.gz");
    write_gz(&source, "geneA\ta\tb\n");
    let output = root.join("trackDb_inserts.sql");
    let matcher = TableMatcher::ExactSet(TableNameSet::from_tables(["geneA"]));

    let first = trackdb_inserts(&source, &output, &matcher, false).unwrap();
    assert_eq!(first.action, ConvertAction::Written);
    let before = std::fs::read(output.as_std_path()).unwrap();

    let second = trackdb_inserts(&source, &output, &matcher, false).unwrap();
    assert_eq!(second.action, ConvertAction::Skipped);
    let after = std::fs::read(output.as_std_path()).unwrap();
    assert_eq!(before, after);
}

#[test]
fn force_rewrites_existing_output() {
    let (_guard, root) = temp_root();
    let source = root.join("trackDb.txt.gz");
    write_gz(&source, "geneA\ta\tb\n");
    let output = root.join("trackDb_inserts.sql");
    std::fs::write(output.as_std_path(), "stale\n").unwrap();
    let matcher = TableMatcher::ExactSet(TableNameSet::from_tables(["geneA"]));

    let outcome = trackdb_inserts(&source, &output, &matcher, true).unwrap();
    assert_eq!(outcome.action, ConvertAction::Written);
    let content = std::fs::read_to_string(output.as_std_path()).unwrap();
    assert!(content.starts_with("INSERT INTO trackDb VALUES (\"geneA\""));
}
