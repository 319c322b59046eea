//! Extraction of the actionable code block from a completion.

const FENCE_OPEN: &str = "```python\n";
const FENCE_CLOSE: &str = "```";

/// Pulls the first fenced Python block out of a model response.
///
/// Returns `None` when no fence is present. An empty interior yields
/// `Some("")` — a distinct outcome the parser reports faithfully; callers
/// treat both as the model declining to act.
pub fn extract_code_block(response: &str) -> Option<String> {
    let start = response.find(FENCE_OPEN)? + FENCE_OPEN.len();
    let rest = &response[start..];
    let end = rest.find(FENCE_CLOSE)?;
    Some(rest[..end].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_block() {
        let response = "Sure, here you go:\n```python\nprint(\"hi\")\n```\nDone.";
        assert_eq!(extract_code_block(response).as_deref(), Some("print(\"hi\")"));
    }

    #[test]
    fn no_fence_is_none() {
        assert_eq!(extract_code_block("I cannot help with that."), None);
    }

    #[test]
    fn unterminated_fence_is_none() {
        assert_eq!(extract_code_block("```python\nprint('x')"), None);
    }

    #[test]
    fn first_of_multiple_blocks_wins() {
        let response = "```python\nfirst()\n```\ntext\n```python\nsecond()\n```";
        assert_eq!(extract_code_block(response).as_deref(), Some("first()"));
    }

    #[test]
    fn empty_interior_is_some_empty() {
        assert_eq!(extract_code_block("```python\n```").as_deref(), Some(""));
    }

    #[test]
    fn other_languages_are_ignored() {
        assert_eq!(extract_code_block("```bash\nls\n```"), None);
    }

    #[test]
    fn multiline_block_is_preserved() {
        let response = "```python\nx = 1\ny = 2\nprint(x + y)\n```";
        assert_eq!(
            extract_code_block(response).as_deref(),
            Some("x = 1\ny = 2\nprint(x + y)")
        );
    }
}
