//! Argument tokenizer
//!
//! Splits free-text command input into an ordered argument list. Whitespace
//! runs delimit arguments, except inside a quoted span: a chunk opening with
//! `"` absorbs following chunks until one ends with an unescaped `"`. A span
//! left open at end of input produces no token for its accumulated content.

/// Tokenize raw argument text into an ordered argument list
///
/// Pure and stateless; never panics for any input. Empty or all-whitespace
/// input yields an empty list.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut buffer = String::new();
    let mut in_span = false;

    for chunk in text.split_whitespace() {
        if !in_span {
            if !chunk.starts_with('"') {
                tokens.push(chunk.to_string());
            } else if chunk.len() > 1 && chunk.ends_with('"') {
                tokens.push(chunk[1..chunk.len() - 1].to_string());
            } else {
                in_span = true;
                buffer.push_str(&chunk[1..]);
                buffer.push(' ');
            }
        } else if chunk.ends_with("\\\"") {
            // Escaped terminator: keep the quote, drop the backslash, stay
            // in the span.
            buffer.push_str(&chunk[..chunk.len() - 2]);
            buffer.push('"');
            buffer.push(' ');
        } else if chunk.ends_with('"') {
            buffer.push_str(&chunk[..chunk.len() - 1].replace("\\\"", "\""));
            tokens.push(std::mem::take(&mut buffer));
            in_span = false;
        } else {
            buffer.push_str(chunk);
            buffer.push(' ');
        }
    }

    // A span that never closed is discarded wholesale.
    tokens
}
