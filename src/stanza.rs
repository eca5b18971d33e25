//! Splitting of trackDb-style dump text into blank-line delimited stanzas.

/// One physical line, decomposed on the hard tab delimiter.
///
/// A line with no tab at all yields a single field; an empty line yields
/// a single empty field, which is the stanza terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    fields: Vec<String>,
}

impl RawLine {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.strip_suffix('\n').unwrap_or(line);
        let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
        Self {
            fields: trimmed.split('\t').map(str::to_string).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }

    pub fn first_field(&self) -> &str {
        // split always yields at least one field
        &self.fields[0]
    }

    /// A terminator is the decomposition of a fully empty line.
    pub fn is_terminator(&self) -> bool {
        self.fields.len() == 1 && self.fields[0].is_empty()
    }
}

/// A blank-line delimited group of lines describing one record plus its
/// continuation fragments. May be empty when the source holds consecutive
/// blank lines; callers skip those.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stanza {
    lines: Vec<RawLine>,
}

impl Stanza {
    pub fn new(lines: Vec<RawLine>) -> Self {
        Self { lines }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The head line carrying the positional field values.
    pub fn head(&self) -> Option<&RawLine> {
        self.lines.first()
    }

    /// The declared table name, i.e. the head's first field.
    pub fn table_name(&self) -> Option<&str> {
        self.head().map(RawLine::first_field)
    }

    /// Lines after the head; each one's first field is a fragment of the
    /// head's final column.
    pub fn continuations(&self) -> &[RawLine] {
        if self.lines.is_empty() {
            &[]
        } else {
            &self.lines[1..]
        }
    }

    pub fn into_lines(self) -> Vec<RawLine> {
        self.lines
    }
}

/// Lazy iterator over the stanzas of a dump file's text.
///
/// A blank line closes the current stanza; a trailing stanza without a
/// closing blank line is still emitted.
pub struct Stanzas<'a> {
    lines: std::str::Lines<'a>,
    done: bool,
}

impl<'a> Stanzas<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            done: false,
        }
    }
}

impl<'a> Iterator for Stanzas<'a> {
    type Item = Stanza;

    fn next(&mut self) -> Option<Stanza> {
        if self.done {
            return None;
        }
        let mut accumulator = Vec::new();
        for line in self.lines.by_ref() {
            let raw = RawLine::parse(line);
            if raw.is_terminator() {
                return Some(Stanza::new(accumulator));
            }
            accumulator.push(raw);
        }
        self.done = true;
        if accumulator.is_empty() {
            None
        } else {
            Some(Stanza::new(accumulator))
        }
    }
}

/// Convenience over [`Stanzas`] with empty stanzas already dropped.
pub fn stanzas(text: &str) -> impl Iterator<Item = Stanza> + '_ {
    Stanzas::new(text).filter(|stanza| !stanza.is_empty())
}
