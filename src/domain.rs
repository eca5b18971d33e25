use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::MirrorError;

/// UCSC organism database name, e.g. `hg38` or `mm39`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganismDb(String);

impl OrganismDb {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrganismDb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrganismDb {
    type Err = MirrorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_string();
        let is_valid = !normalized.is_empty()
            && normalized.chars().all(|ch| ch.is_ascii_alphanumeric())
            && normalized.starts_with(|ch: char| ch.is_ascii_alphabetic())
            && normalized.chars().any(|ch| ch.is_ascii_digit());
        if !is_valid {
            return Err(MirrorError::InvalidOrganismDb(value.to_string()));
        }
        Ok(Self(normalized))
    }
}

/// Gencode release number, e.g. 44 for the wgEncodeGencode*V44 tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GencodeVersion(u32);

impl GencodeVersion {
    pub fn number(&self) -> u32 {
        self.0
    }

    /// The umbrella composite track for this release.
    pub fn umbrella_table(&self) -> String {
        format!("wgEncodeGencodeV{}", self.0)
    }

    /// The gene-view companion of the umbrella track.
    pub fn view_genes_table(&self) -> String {
        format!("wgEncodeGencodeV{}ViewGenes", self.0)
    }

    /// Version token as it appears inside composite table names.
    pub fn tag(&self) -> String {
        format!("V{}", self.0)
    }
}

impl fmt::Display for GencodeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GencodeVersion {
    type Err = MirrorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim().trim_start_matches(['v', 'V']);
        let number: u32 = trimmed
            .parse()
            .map_err(|_| MirrorError::InvalidGencodeVersion(value.to_string()))?;
        if number == 0 {
            return Err(MirrorError::InvalidGencodeVersion(value.to_string()));
        }
        Ok(Self(number))
    }
}

/// A UCSC table identifier as found in dump filenames and trackDb stanzas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableName(String);

impl TableName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TableName {
    type Err = MirrorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_string();
        let is_valid = !normalized.is_empty()
            && normalized
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' || ch == '.');
        if !is_valid {
            return Err(MirrorError::InvalidTableName(value.to_string()));
        }
        Ok(Self(normalized))
    }
}

/// Database engine the generated loader script shells out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Dbms {
    Mysql,
    Mariadb,
}

impl fmt::Display for Dbms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dbms::Mysql => write!(f, "mysql"),
            Dbms::Mariadb => write!(f, "mariadb"),
        }
    }
}
