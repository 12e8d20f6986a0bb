//! Read-only check for model-generated SQL.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::AgentError;

fn write_keywords() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(insert|update|delete|drop|alter|create|truncate|grant|revoke|copy|merge|vacuum)\b")
            .expect("static regex")
    })
}

/// Strips a Markdown code fence and surrounding whitespace, if present.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("sql", "postgresql", …) on the opening line
    let body = rest.split_once('\n').map(|(_, b)| b).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Removes `--` and `/* */` comments that sit outside quoted text.
/// Line breaks are kept.
pub fn strip_comments(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                out.push(c);
                if c == q {
                    quote = None;
                }
            }
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                out.push(c);
            }
            None if c == '-' && chars.peek() == Some(&'-') => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            None if c == '/' && chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
                out.push(' ');
            }
            None => out.push(c),
        }
    }
    out
}

/// Blanks the inside of string literals and quoted identifiers so keyword
/// and separator checks only see SQL syntax. Doubled quotes need no special
/// case: they close and reopen the same literal.
fn mask_quoted(sql: &str) -> String {
    let mut quote: Option<char> = None;
    sql.chars()
        .map(|c| match quote {
            Some(q) if c == q => {
                quote = None;
                c
            }
            Some(_) => ' ',
            None => {
                if c == '\'' || c == '"' {
                    quote = Some(c);
                }
                c
            }
        })
        .collect()
}

/// Returns the statement without comments or a trailing semicolon if it is a
/// single SELECT (or WITH … SELECT) with no write keywords.
pub fn ensure_read_only(sql: &str) -> Result<String, AgentError> {
    let cleaned = strip_comments(strip_code_fence(sql));
    let stmt = cleaned.trim().trim_end_matches(';').trim();

    if stmt.is_empty() {
        return Err(AgentError::Rejected("empty statement".to_string()));
    }

    let masked = mask_quoted(stmt);
    if masked.contains(';') {
        return Err(AgentError::Rejected("multiple statements".to_string()));
    }

    let head = masked
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    if head != "select" && head != "with" {
        return Err(AgentError::Rejected(format!("statement starts with {head:?}")));
    }
    if let Some(m) = write_keywords().find(&masked) {
        return Err(AgentError::Rejected(format!("write keyword {:?}", m.as_str())));
    }

    Ok(stmt.to_string())
}
