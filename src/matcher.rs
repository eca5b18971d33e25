//! Selection of the stanzas and lines that belong to an extraction job.

use std::collections::HashSet;

use crate::domain::GencodeVersion;

/// The destination table identifiers a run cares about. Built once per job
/// from the dump filenames on disk, plus the synthesized umbrella names
/// for version-scoped jobs.
#[derive(Debug, Clone, Default)]
pub struct TableNameSet {
    names: HashSet<String>,
}

impl TableNameSet {
    pub fn from_tables<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: tables.into_iter().map(Into::into).collect(),
        }
    }

    /// Add the composite umbrella track and its ViewGenes companion for a
    /// gencode release.
    pub fn with_gencode_umbrella(mut self, version: GencodeVersion) -> Self {
        self.names.insert(version.umbrella_table());
        self.names.insert(version.view_genes_table());
        self
    }

    pub fn contains(&self, table: &str) -> bool {
        self.names.contains(table)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Matching policy applied to a stanza head's (or flat line's) first field.
#[derive(Debug, Clone)]
pub enum TableMatcher {
    /// Exact membership in the job's table name set.
    ExactSet(TableNameSet),
    /// The field must contain the marker, and the version token when one
    /// is set.
    Substring {
        marker: String,
        version: Option<String>,
    },
}

impl TableMatcher {
    pub fn marker(marker: impl Into<String>) -> Self {
        TableMatcher::Substring {
            marker: marker.into(),
            version: None,
        }
    }

    pub fn marker_with_version(marker: impl Into<String>, version: impl Into<String>) -> Self {
        TableMatcher::Substring {
            marker: marker.into(),
            version: Some(version.into()),
        }
    }

    pub fn matches(&self, first_field: &str) -> bool {
        match self {
            TableMatcher::ExactSet(set) => set.contains(first_field),
            TableMatcher::Substring { marker, version } => {
                first_field.contains(marker.as_str())
                    && version
                        .as_ref()
                        .is_none_or(|token| first_field.contains(token.as_str()))
            }
        }
    }
}
