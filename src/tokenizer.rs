/// Splits a raw input line into owned argument tokens.
///
/// Tokens are separated by runs of whitespace; consecutive delimiters
/// never produce empty tokens, and an empty or all-whitespace line yields
/// an empty vector. Quotes and escapes are not interpreted. Each token is
/// an independent copy, so the caller may drop the source line right away.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        assert_eq!(tokenize("ls -l ../"), vec!["ls", "-l", "../"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t  ").is_empty());
    }

    #[test]
    fn test_tokenize_collapses_repeated_whitespace() {
        assert_eq!(tokenize("ls   -l"), vec!["ls", "-l"]);
        assert_eq!(tokenize("\tsleep\t100\t&"), vec!["sleep", "100", "&"]);
    }

    #[test]
    fn test_tokenize_does_not_interpret_quotes() {
        assert_eq!(
            tokenize("echo \"hello world\""),
            vec!["echo", "\"hello", "world\""]
        );
    }

    #[test]
    fn test_tokenize_returns_owned_tokens() {
        let tokens = {
            let line = String::from("pwd");
            tokenize(&line)
        };
        assert_eq!(tokens, vec!["pwd"]);
    }
}
