use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::traits::{CompileOptions, QueryCompiler};
use crate::types::StructuredQuery;

/// Hands query-language text to the backend's own `query_string` parser.
///
/// Only structural problems the backend would reject anyway are caught here:
/// empty input, unbalanced parentheses and unterminated phrases.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryStringCompiler;

impl QueryStringCompiler {
    pub fn new() -> Self { Self }
}

impl QueryCompiler for QueryStringCompiler {
    fn compile(
        &self,
        text: &str,
        content_field: &str,
        allowed_fields: &[String],
        options: CompileOptions,
    ) -> Result<StructuredQuery> {
        check_syntax(text)?;

        let mut body = json!({
            "query": text.trim(),
            "default_field": content_field,
            "default_operator": if options.conjunctive { "AND" } else { "OR" },
            "lenient": options.lenient,
        });
        if !allowed_fields.is_empty() {
            body["fields"] = Value::from(allowed_fields.to_vec());
        }

        let mut query = StructuredQuery::new();
        query.set("query", json!({ "query_string": body }));
        Ok(query)
    }
}

fn check_syntax(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::Parse("query is empty".to_string()));
    }
    let mut depth = 0i32;
    let mut in_phrase = false;
    let mut escaped = false;
    for (pos, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => in_phrase = !in_phrase,
            '(' if !in_phrase => depth += 1,
            ')' if !in_phrase => {
                depth -= 1;
                if depth < 0 {
                    return Err(Error::Parse(format!("unmatched ')' at offset {}", pos)));
                }
            }
            _ => {}
        }
    }
    if in_phrase {
        return Err(Error::Parse("unterminated phrase".to_string()));
    }
    if depth > 0 {
        return Err(Error::Parse(format!("{} unclosed '('", depth)));
    }
    Ok(())
}
