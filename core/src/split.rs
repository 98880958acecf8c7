//! Quote- and comment-aware splitting of SQL text into statements.
//!
//! This is a lexer, not a parser. It tracks exactly two things while
//! scanning: whether it is inside a quoted literal (and which quote opened
//! it), and whether a `--` line comment is being skipped. Block comments,
//! nested statements, and custom delimiters are not recognized.
//!
//! # Examples
//!
//! ```
//! use litestudio_core::split_statements;
//!
//! let batch = split_statements("SELECT ';' ; SELECT 1; -- done\nSELECT 2");
//! assert_eq!(batch, ["SELECT ';'", "SELECT 1", "SELECT 2"]);
//! ```

/// Splits `sql` into trimmed, non-empty statements in input order.
///
/// - `'` and `"` open a literal that runs until the same quote character; a
///   doubled quote inside the literal is an escape and keeps it open.
/// - Outside a literal, `--` starts a comment that runs through the next
///   newline (or end of input) and contributes nothing.
/// - Outside a literal, `;` ends the current statement.
///
/// Text after the final `;` is kept as a last statement. Whitespace-only
/// segments are dropped.
pub fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_comment = false;
    let mut chars = sql.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_comment {
            if ch == '\n' {
                in_comment = false;
            }
            continue;
        }

        if let Some(open) = quote {
            current.push(ch);
            if ch == open {
                if chars.peek() == Some(&open) {
                    // Doubled quote: an escaped quote character, not the end.
                    current.push(open);
                    chars.next();
                } else {
                    quote = None;
                }
            }
            continue;
        }

        match ch {
            '\'' | '"' => {
                quote = Some(ch);
                current.push(ch);
            }
            '-' if chars.peek() == Some(&'-') => {
                chars.next();
                in_comment = true;
            }
            ';' => {
                push_trimmed(&mut statements, &current);
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    push_trimmed(&mut statements, &current);
    statements
}

fn push_trimmed(statements: &mut Vec<String>, segment: &str) {
    let trimmed = segment.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }
}
