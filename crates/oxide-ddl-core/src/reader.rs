//! Reading descriptors from tabular text.
//!
//! Two sources are supported:
//!
//! - Delimited text, one descriptor per line. With a header row the fields
//!   are located by name; without one they are read positionally as
//!   `table, column, primary key, type, not null[, references]`.
//! - A JSON array of descriptor objects.

use crate::descriptor::ColumnDescriptor;
use crate::error::{Result, ValidationError};
use crate::flags::BoolEncoding;

/// Number of required fields in a row.
pub const REQUIRED_FIELDS: usize = 5;

/// How delimited input is laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFormat {
    /// Field separator.
    pub delimiter: char,
    /// Whether the first data line names the fields.
    pub has_header: bool,
    /// Accepted spellings of the flag columns.
    pub booleans: BoolEncoding,
}

impl Default for InputFormat {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_header: false,
            booleans: BoolEncoding::default(),
        }
    }
}

impl InputFormat {
    /// Creates the default format: comma separated, no header.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field separator.
    #[must_use]
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether the first line is a header row.
    #[must_use]
    pub fn header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Sets the boolean encoding.
    #[must_use]
    pub fn booleans(mut self, booleans: BoolEncoding) -> Self {
        self.booleans = booleans;
        self
    }
}

/// Field positions within a row.
#[derive(Debug, Clone, Copy)]
struct Layout {
    table_name: usize,
    column_name: usize,
    is_primary_key: usize,
    data_type: usize,
    not_null: usize,
    references: Option<usize>,
}

impl Layout {
    const POSITIONAL: Self = Self {
        table_name: 0,
        column_name: 1,
        is_primary_key: 2,
        data_type: 3,
        not_null: 4,
        references: Some(5),
    };

    fn from_header(header: &[String]) -> Result<Self> {
        let find = |name: &'static str| {
            header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &'static str| find(name).ok_or(ValidationError::MissingHeader(name));

        Ok(Self {
            table_name: require("table_name")?,
            column_name: require("column_name")?,
            is_primary_key: require("is_primary_key")?,
            data_type: require("data_type")?,
            not_null: require("not_null")?,
            references: find("references"),
        })
    }
}

/// Reads descriptors from delimited text.
///
/// Blank lines and lines starting with `#` are skipped. All row problems are
/// collected and reported together.
pub fn read_delimited(text: &str, format: &InputFormat) -> Result<Vec<ColumnDescriptor>> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        });

    let (layout, expected) = if format.has_header {
        let Some((_, header)) = lines.next() else {
            return Err(ValidationError::EmptyInput);
        };
        let header = split_fields(header, format.delimiter);
        (Layout::from_header(&header)?, Some(header.len()))
    } else {
        (Layout::POSITIONAL, None)
    };

    let mut descriptors = Vec::new();
    let mut errors = Vec::new();

    for (line_no, line) in lines {
        let fields = split_fields(line, format.delimiter);

        let count_ok = match expected {
            Some(n) => fields.len() == n,
            None => fields.len() == REQUIRED_FIELDS || fields.len() == REQUIRED_FIELDS + 1,
        };
        if !count_ok {
            errors.push(ValidationError::FieldCount {
                line: line_no,
                expected: expected.unwrap_or(REQUIRED_FIELDS),
                found: fields.len(),
            });
            continue;
        }

        let required = [
            (layout.table_name, "table_name"),
            (layout.column_name, "column_name"),
            (layout.data_type, "data_type"),
        ];
        let blank: Vec<ValidationError> = required
            .into_iter()
            .filter(|&(index, _)| fields[index].is_empty())
            .map(|(_, field)| ValidationError::BlankField {
                line: line_no,
                field,
            })
            .collect();
        if !blank.is_empty() {
            errors.extend(blank);
            continue;
        }

        let mut flag = |index: usize, field: &'static str| {
            let value = &fields[index];
            format.booleans.parse(value).unwrap_or_else(|| {
                errors.push(ValidationError::InvalidFlag {
                    line: line_no,
                    field,
                    value: value.clone(),
                });
                false
            })
        };
        let is_primary_key = flag(layout.is_primary_key, "is_primary_key");
        let not_null = flag(layout.not_null, "not_null");

        descriptors.push(ColumnDescriptor {
            table_name: fields[layout.table_name].clone(),
            column_name: fields[layout.column_name].clone(),
            is_primary_key,
            data_type: fields[layout.data_type].clone(),
            not_null,
            references: layout
                .references
                .and_then(|i| fields.get(i))
                .filter(|s| !s.is_empty())
                .cloned(),
        });
    }

    if let Some(err) = ValidationError::collect(errors) {
        return Err(err);
    }
    Ok(descriptors)
}

/// Reads descriptors from a JSON array of objects.
pub fn read_json(text: &str) -> Result<Vec<ColumnDescriptor>> {
    serde_json::from_str(text).map_err(|e| ValidationError::Malformed(e.to_string()))
}

/// Formats a descriptor as one positional row.
///
/// Flags are written as `TRUE`/`FALSE` and the reference, when present, as a
/// sixth field. Fields that [`read_delimited`] would otherwise split or trim
/// are wrapped in double quotes, so the row reads back unchanged.
#[must_use]
pub fn format_row(descriptor: &ColumnDescriptor, delimiter: char) -> String {
    let flag = |b: bool| if b { "TRUE" } else { "FALSE" };
    let mut fields = vec![
        quote_field(&descriptor.table_name, delimiter),
        quote_field(&descriptor.column_name, delimiter),
        flag(descriptor.is_primary_key).to_string(),
        quote_field(&descriptor.data_type, delimiter),
        flag(descriptor.not_null).to_string(),
    ];
    if let Some(target) = descriptor.reference() {
        fields.push(quote_field(target, delimiter));
    }
    fields.join(&delimiter.to_string())
}

fn quote_field(value: &str, delimiter: char) -> String {
    let needs_quotes = value.contains(delimiter)
        || value.contains('"')
        || value.starts_with('#')
        || value.trim() != value;
    if needs_quotes {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Splits one line into trimmed fields.
///
/// Fields may be wrapped in double quotes; a doubled quote inside a quoted
/// field is a literal quote.
fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else if c == '"' {
            in_quotes = true;
        } else if c == delimiter {
            result.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(c);
        }
    }

    result.push(current.trim().to_string());
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_quoted() {
        assert_eq!(
            split_fields(r#"t, "a,b" ,"say ""hi""""#, ','),
            vec!["t", "a,b", r#"say "hi""#]
        );
    }

    #[test]
    fn test_positional() {
        let text = "test,column1,TRUE,SERIAL,TRUE\n\
                    test,column2,FALSE,INTEGER,TRUE\n\
                    \n\
                    # trailing comment\n\
                    test,column3,FALSE,VARCHAR,FALSE\n";
        let descriptors = read_delimited(text, &InputFormat::new()).unwrap();

        assert_eq!(descriptors.len(), 3);
        assert_eq!(
            descriptors[0],
            ColumnDescriptor::new("test", "column1", "SERIAL")
                .primary_key()
                .not_null()
        );
        assert_eq!(descriptors[2], ColumnDescriptor::new("test", "column3", "VARCHAR"));
    }

    #[test]
    fn test_positional_with_reference() {
        let text = "addresses,user_id,0,INTEGER,0,users.id\naddresses,email,0,TEXT,1,";
        let descriptors = read_delimited(text, &InputFormat::new()).unwrap();
        assert_eq!(descriptors[0].references.as_deref(), Some("users.id"));
        assert_eq!(descriptors[1].references, None);
    }

    #[test]
    fn test_header_resolves_by_name() {
        let text = "data_type;not_null;Column_Name;table_name;is_primary_key\n\
                    INTEGER;yes;id;users;yes\n\
                    VARCHAR;no;name;users;no";
        let format = InputFormat::new().delimiter(';').header(true);
        let descriptors = read_delimited(text, &format).unwrap();

        assert_eq!(
            descriptors,
            vec![
                ColumnDescriptor::new("users", "id", "INTEGER")
                    .primary_key()
                    .not_null(),
                ColumnDescriptor::new("users", "name", "VARCHAR"),
            ]
        );
    }

    #[test]
    fn test_missing_header() {
        let text = "table_name,column_name,data_type,not_null\nt,c,TEXT,0";
        let format = InputFormat::new().header(true);
        assert_eq!(
            read_delimited(text, &format),
            Err(ValidationError::MissingHeader("is_primary_key"))
        );
    }

    #[test]
    fn test_collects_row_errors() {
        let text = "t,a,maybe,TEXT,0\nt,b,0,TEXT\nt,c,1,TEXT,perhaps";
        let err = read_delimited(text, &InputFormat::new()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Multiple(vec![
                ValidationError::InvalidFlag {
                    line: 1,
                    field: "is_primary_key",
                    value: "maybe".to_string(),
                },
                ValidationError::FieldCount {
                    line: 2,
                    expected: 5,
                    found: 4,
                },
                ValidationError::InvalidFlag {
                    line: 3,
                    field: "not_null",
                    value: "perhaps".to_string(),
                },
            ])
        );
    }

    #[test]
    fn test_blank_required_cell_reports_line() {
        let text = "# comment\n\nt,a,0,TEXT,0\nt,,0,,0";
        assert_eq!(
            read_delimited(text, &InputFormat::new()),
            Err(ValidationError::Multiple(vec![
                ValidationError::BlankField {
                    line: 4,
                    field: "column_name",
                },
                ValidationError::BlankField {
                    line: 4,
                    field: "data_type",
                },
            ]))
        );
    }

    #[test]
    fn test_format_row_reads_back() {
        let descriptors = vec![
            ColumnDescriptor::new("prices", "amount", "DECIMAL(10,2)").not_null(),
            ColumnDescriptor::new("notes", "label", r#"TEXT "quoted""#).primary_key(),
            ColumnDescriptor::new("addresses", "user_id", "INTEGER").references("users.id"),
        ];

        let rows: Vec<String> = descriptors.iter().map(|d| format_row(d, ',')).collect();
        assert_eq!(rows[0], r#"prices,amount,FALSE,"DECIMAL(10,2)",TRUE"#);
        assert_eq!(rows[1], r#"notes,label,TRUE,"TEXT ""quoted""",FALSE"#);
        assert_eq!(rows[2], "addresses,user_id,FALSE,INTEGER,FALSE,users.id");

        let read = read_delimited(&rows.join("\n"), &InputFormat::new()).unwrap();
        assert_eq!(read, descriptors);
    }

    #[test]
    fn test_format_row_other_delimiter() {
        let descriptor = ColumnDescriptor::new("t", "a;b", "DECIMAL(10,2)");
        let row = format_row(&descriptor, ';');
        assert_eq!(row, r#"t;"a;b";FALSE;DECIMAL(10,2);FALSE"#);

        let format = InputFormat::new().delimiter(';');
        assert_eq!(read_delimited(&row, &format).unwrap(), vec![descriptor]);
    }

    #[test]
    fn test_custom_booleans() {
        let format = InputFormat::new().booleans(BoolEncoding::new(["x"], [""]));
        let descriptors = read_delimited("t,id,x,INTEGER,", &format).unwrap();
        assert!(descriptors[0].is_primary_key);
        assert!(!descriptors[0].not_null);
    }

    #[test]
    fn test_read_json() {
        let text = r#"[
            {"table_name": "users", "column_name": "id", "is_primary_key": true,
             "data_type": "INTEGER", "not_null": true},
            {"table_name": "users", "column_name": "name", "is_primary_key": "FALSE",
             "data_type": "VARCHAR", "not_null": 0}
        ]"#;
        let descriptors = read_json(text).unwrap();
        assert_eq!(descriptors.len(), 2);
        assert!(descriptors[0].is_primary_key);
        assert!(!descriptors[1].not_null);
    }

    #[test]
    fn test_read_json_malformed() {
        assert!(matches!(
            read_json(r#"[{"table_name": "users"}]"#),
            Err(ValidationError::Malformed(_))
        ));
    }
}
