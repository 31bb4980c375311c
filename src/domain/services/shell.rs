//! Shell word quoting for remotely executed commands
//!
//! Every value spliced into a remote command goes through `quote`, which
//! yields a single POSIX shell word regardless of content.

/// Quote `s` as one single-quoted shell word
pub fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

/// Quote each argument and join them with spaces
pub fn join<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .map(|a| quote(a.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_words_are_wrapped() {
        assert_eq!(quote("/opt/acme"), "'/opt/acme'");
    }

    #[test]
    fn embedded_single_quote_is_escaped() {
        assert_eq!(quote("it's"), "'it'\\''s'");
    }

    #[test]
    fn metacharacters_stay_literal() {
        assert_eq!(quote("$(reboot); `id`"), "'$(reboot); `id`'");
    }

    #[test]
    fn join_quotes_each_argument() {
        assert_eq!(join(["rm", "-f", "a b"]), "'rm' '-f' 'a b'");
    }
}
