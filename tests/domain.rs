use assert_matches::assert_matches;

use ucsc_track_mirror::domain::{GencodeVersion, OrganismDb, TableName};
use ucsc_track_mirror::error::MirrorError;

#[test]
fn parse_organism_db_valid() {
    let db: OrganismDb = "hg38".parse().unwrap();
    assert_eq!(db.as_str(), "hg38");

    let db: OrganismDb = "mm39".parse().unwrap();
    assert_eq!(db.as_str(), "mm39");
}

#[test]
fn parse_organism_db_invalid() {
    let err = "".parse::<OrganismDb>().unwrap_err();
    assert_matches!(err, MirrorError::InvalidOrganismDb(_));

    let err = "38hg".parse::<OrganismDb>().unwrap_err();
    assert_matches!(err, MirrorError::InvalidOrganismDb(_));
}

#[test]
fn parse_gencode_version_forms() {
    for input in ["44", "v44", "V44"] {
        let version: GencodeVersion = input.parse().unwrap();
        assert_eq!(version.number(), 44);
    }
}

#[test]
fn gencode_umbrella_names() {
    let version: GencodeVersion = "40".parse().unwrap();
    assert_eq!(version.umbrella_table(), "wgEncodeGencodeV40");
    assert_eq!(version.view_genes_table(), "wgEncodeGencodeV40ViewGenes");
}

#[test]
fn parse_table_name_rejects_separators() {
    let table: TableName = "mane".parse().unwrap();
    assert_eq!(table.as_str(), "mane");

    let err = "a/b".parse::<TableName>().unwrap_err();
    assert_matches!(err, MirrorError::InvalidTableName(_));
}
