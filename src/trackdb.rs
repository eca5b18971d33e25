//! The trackDb record schema and stanza normalization.
//!
//! trackDb dumps hold up to 21 positional columns per record. Short records
//! are padded with blanks inserted before the final two columns so that
//! those two keep their tail positions, and the free-text `settings` column
//! is reassembled from the stanza's continuation lines.

use crate::error::MirrorError;
use crate::stanza::Stanza;

/// trackDb column names, in dump order. The last column (`settings`) is the
/// one that line-continues across the rest of the stanza.
pub const COLUMNS: [&str; 21] = [
    "tableName",
    "shortLabel",
    "type",
    "longLabel",
    "visibility",
    "priority",
    "colorR",
    "colorG",
    "colorB",
    "altColorR",
    "altColorG",
    "altColorB",
    "useScore",
    "private",
    "restrictCount",
    "restrictList",
    "url",
    "html",
    "grp",
    "canPack",
    "settings",
];

pub const WIDTH: usize = COLUMNS.len();

/// A record brought to the fixed schema width, with every literal double
/// quote translated away so the SQL emitter's delimiters cannot break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow {
    fields: Vec<String>,
}

impl NormalizedRow {
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        COLUMNS
            .iter()
            .position(|name| *name == column)
            .and_then(|index| self.fields.get(index))
            .map(String::as_str)
    }
}

/// Bring a stanza's head to exactly [`WIDTH`] fields and fold its
/// continuation lines into the `settings` column.
pub fn normalize(stanza: &Stanza) -> Result<NormalizedRow, MirrorError> {
    normalize_with_width(stanza, WIDTH)
}

/// [`normalize`] against an arbitrary schema width.
///
/// Empty stanzas are a caller error; the matcher filters them out before
/// normalization runs. Heads wider than the schema are rejected rather
/// than truncated.
pub fn normalize_with_width(stanza: &Stanza, width: usize) -> Result<NormalizedRow, MirrorError> {
    let head = stanza.head().ok_or_else(|| MirrorError::MalformedStanza {
        table: String::new(),
        found: 0,
        width,
    })?;

    let mut fields: Vec<String> = head.fields().to_vec();
    if fields.len() > width {
        return Err(MirrorError::MalformedStanza {
            table: fields[0].clone(),
            found: fields.len(),
            width,
        });
    }

    pad_before_tail(&mut fields, width);

    let fragments: Vec<String> = stanza
        .continuations()
        .iter()
        .map(|line| strip_continuation_marker(line.first_field()).to_string())
        .collect();

    let last = &mut fields[width - 1];
    *last = strip_continuation_marker(last).to_string();
    if !fragments.is_empty() {
        *last = format!("{last}\n {}", fragments.join("\n "));
    }

    for field in &mut fields {
        if field.contains('"') {
            *field = field.replace('"', "'");
        }
    }

    Ok(NormalizedRow { fields })
}

/// Insert blanks strictly before the last two fields until the schema
/// width is reached. The final two columns carry sortable metadata and
/// must stay at the tail.
fn pad_before_tail(fields: &mut Vec<String>, width: usize) {
    while fields.len() < width {
        let position = fields.len().saturating_sub(2);
        fields.insert(position, String::new());
    }
}

/// Trailing (or leading) backslashes are line-continuation markers and
/// must never reach the output; embedded backslashes are data.
fn strip_continuation_marker(field: &str) -> &str {
    field.trim_matches('\\')
}
