use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum MirrorError {
    #[error("invalid organism database name: {0}")]
    InvalidOrganismDb(String),

    #[error("invalid gencode version: {0}")]
    InvalidGencodeVersion(String),

    #[error("invalid table name: {0}")]
    InvalidTableName(String),

    #[error("missing source dump file: {0}")]
    MissingSourceFile(Utf8PathBuf),

    #[error("malformed stanza for table {table}: {found} columns, schema holds {width}")]
    MalformedStanza {
        table: String,
        found: usize,
        width: usize,
    },

    #[error("UCSC request failed: {0}")]
    UcscHttp(String),

    #[error("UCSC returned status {status} for {url}")]
    UcscStatus { status: u16, url: String },

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
