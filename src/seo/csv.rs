//! Minimal quote-aware CSV reading and writing for the route inventory.
//!
//! The inventory is produced by our own generator, which quotes every field,
//! so only the RFC 4180 essentials are handled: quoted fields, `""` escapes,
//! and commas/newlines inside quotes. `\r` outside quotes is dropped.

/// Parse CSV text into rows of fields.
///
/// A trailing row without a final newline is still emitted. A trailing
/// newline does not produce an extra empty row.
pub fn parse_csv(content: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            '\r' => {}
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/// Quote one field, doubling embedded quotes.
fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Serialize a header and rows with every field quoted, rows joined by `\n`.
pub fn write_csv<S: AsRef<str>>(header: &[S], rows: &[Vec<String>]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        header
            .iter()
            .map(|h| h.as_ref())
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in rows {
        lines.push(
            row.iter()
                .map(|v| quote_field(v))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n")
}
