//! Emission of SQL INSERT statements.
//!
//! Every field is emitted as a double-quoted string literal regardless of
//! the destination column type; the receiving database casts implicitly.

/// Translate away literal double quotes so a field can never break the
/// statement's string delimiters. Total over any input.
pub fn sanitize_field(field: &str) -> String {
    field.replace('"', "'")
}

/// One `INSERT INTO <table> VALUES ("f0","f1",...);` statement, fields
/// joined with `","` and the whole list wrapped in double quotes.
pub fn insert_statement(table: &str, fields: &[String]) -> String {
    let values = fields.join("\",\"");
    format!("INSERT INTO {table} VALUES (\"{values}\");")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_quoted_separator() {
        let fields = vec!["a".to_string(), "b".to_string(), String::new()];
        assert_eq!(
            insert_statement("trackDb", &fields),
            "INSERT INTO trackDb VALUES (\"a\",\"b\",\"\");"
        );
    }

    #[test]
    fn single_field() {
        let fields = vec!["only".to_string()];
        assert_eq!(
            insert_statement("t", &fields),
            "INSERT INTO t VALUES (\"only\");"
        );
    }

    #[test]
    fn sanitize_is_total() {
        assert_eq!(sanitize_field(""), "");
        assert_eq!(sanitize_field("it's"), "it's");
        assert_eq!(sanitize_field("say \"hi\""), "say 'hi'");
        assert!(!sanitize_field("\"\"\"").contains('"'));
    }
}
