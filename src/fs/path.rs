//! Splits an absolute path into name tokens.

use crate::error::{Error, Result};
use crate::layout::MAX_NAME_LEN;

/// Parses an absolute path (must start with `/`) into an ordered sequence of name tokens.
/// The root path `/` yields an empty sequence. Any token longer than [`MAX_NAME_LEN`] bytes
/// is rejected.
pub fn parse(path: &str) -> Result<Vec<&str>> {
    if !path.starts_with('/') {
        return Err(Error::InvalidArgument);
    }
    let mut tokens = Vec::new();
    for part in path.split('/') {
        if part.is_empty() {
            continue;
        }
        if part.len() > MAX_NAME_LEN {
            return Err(Error::InvalidArgument);
        }
        tokens.push(part);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_path_is_empty_sequence() {
        assert_eq!(parse("/").unwrap(), Vec::<&str>::new());
    }

    #[test]
    fn splits_nested_path() {
        assert_eq!(parse("/a/b/c").unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn rejects_relative_path() {
        assert_eq!(parse("a/b").unwrap_err(), Error::InvalidArgument);
    }

    #[test]
    fn rejects_oversized_token() {
        let long = format!("/{}", "x".repeat(MAX_NAME_LEN + 1));
        assert_eq!(parse(&long).unwrap_err(), Error::InvalidArgument);
    }

    #[test]
    fn collapses_repeated_separators() {
        assert_eq!(parse("/a//b").unwrap(), vec!["a", "b"]);
    }
}
