//! Table identifier parsing.
//!
//! Splits a possibly schema-qualified, possibly quoted table identifier into
//! its parts so estimators can match catalog rows on schema and name.

use std::fmt;

/// A parsed table identifier.
///
/// Built from the raw identifier the query was constructed against, e.g.
/// `profiles`, `myschema.mytable` or `"myschema"."mytable"`. Quoting
/// characters are stripped before matching against catalog metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableIdent {
    schema: Option<String>,
    table: String,
}

impl TableIdent {
    /// Parse a raw table identifier.
    ///
    /// If the identifier contains a `.` separator, it is split into
    /// (schema, table); otherwise the schema is left unset. Double quotes
    /// and backticks are stripped from each part.
    ///
    /// # Examples
    ///
    /// ```
    /// use headcount::TableIdent;
    ///
    /// let table = TableIdent::parse("\"myschema\".\"mytable\"");
    /// assert_eq!(table.schema(), Some("myschema"));
    /// assert_eq!(table.table(), "mytable");
    /// ```
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('.') {
            Some((schema, table)) => TableIdent {
                schema: Some(strip_quotes(schema)),
                table: strip_quotes(table),
            },
            None => TableIdent {
                schema: None,
                table: strip_quotes(raw),
            },
        }
    }

    /// Schema part, if the identifier was schema-qualified.
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Table name, quotes stripped.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Double-quoted rendering for embedding in raw administrative SQL.
    pub fn quoted(&self) -> String {
        match &self.schema {
            Some(schema) => format!("\"{}\".\"{}\"", schema, self.table),
            None => format!("\"{}\"", self.table),
        }
    }
}

impl fmt::Display for TableIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.table),
            None => write!(f, "{}", self.table),
        }
    }
}

fn strip_quotes(part: &str) -> String {
    part.trim()
        .trim_matches(|c| c == '"' || c == '`')
        .to_string()
}
