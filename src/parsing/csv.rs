//! Quote-aware CSV tokenizer.
//!
//! Follows RFC 4180 quoting: a doubled quote inside a quoted field is a
//! literal quote and separators inside quotes are data. `\r\n`, `\r` and `\n`
//! all end a row. Blank lines produce no row, a trailing row without a
//! terminator is still emitted, and every cell is trimmed.

/// Split raw CSV text into rows of trimmed cells
#[must_use]
pub fn tokenize(text: &str) -> Vec<Vec<String>> {
    // Excel and LCSC exports start with a UTF-8 byte order mark
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                cell.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                row.push(cell.trim().to_string());
                cell.clear();
            }
            '\r' | '\n' if !in_quotes => {
                if !cell.is_empty() || !row.is_empty() {
                    row.push(cell.trim().to_string());
                    rows.push(std::mem::take(&mut row));
                    cell.clear();
                }
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            _ => cell.push(c),
        }
    }

    if !cell.is_empty() || !row.is_empty() {
        row.push(cell.trim().to_string());
        rows.push(row);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_rows() {
        let rows = tokenize("a,b,c\n1,2,3\n");
        assert_eq!(rows, vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]);
    }

    #[test]
    fn test_quoted_comma_and_escaped_quote() {
        let rows = tokenize("\"100,000\",Foo,\"3.3nF \"\"cap\"\"\"\n");
        assert_eq!(rows, vec![vec!["100,000", "Foo", "3.3nF \"cap\""]]);
    }

    #[test]
    fn test_line_terminators() {
        let rows = tokenize("a,b\r\nc,d\re,f\ng,h");
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1], vec!["c", "d"]);
        assert_eq!(rows[3], vec!["g", "h"]);
    }

    #[test]
    fn test_crlf_counts_once() {
        // \r\n must not produce an empty row in between
        let rows = tokenize("a\r\n\r\nb\r\n");
        assert_eq!(rows, vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn test_newline_inside_quotes() {
        let rows = tokenize("\"line one\nline two\",x\n");
        assert_eq!(rows, vec![vec!["line one\nline two", "x"]]);
    }

    #[test]
    fn test_cells_are_trimmed() {
        let rows = tokenize("  a  ,\t b \n");
        assert_eq!(rows, vec![vec!["a", "b"]]);
    }

    #[test]
    fn test_trailing_empty_cell() {
        let rows = tokenize("a,b,\n");
        assert_eq!(rows, vec![vec!["a", "b", ""]]);
    }

    #[test]
    fn test_byte_order_mark_stripped() {
        let rows = tokenize("\u{feff}LCSC Part Number,Qty\n");
        assert_eq!(rows[0][0], "LCSC Part Number");
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("\n\r\n").is_empty());
    }
}
