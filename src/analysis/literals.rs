//! String-literal stripping shared by the bracket scanner and the
//! complexity estimator.
//!
//! Brackets, loop keywords, and operators inside quoted text must not feed
//! the heuristics. The contents of `"…"` and `'…'` spans are blanked with
//! spaces so byte offsets and line numbers stay aligned with the original.

/// Replace the interior of string and char literals with spaces.
///
/// The surrounding quote characters are kept. A backslash escapes the next
/// character inside a literal. A newline ends an open literal: quotes don't
/// span lines in the supported languages, so one stray quote cannot swallow
/// the rest of the file.
pub fn strip_string_literals(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut in_quote: Option<char> = None;
    let mut escaped = false;

    for ch in code.chars() {
        match in_quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                    out.push(' ');
                } else if ch == '\\' {
                    escaped = true;
                    out.push(' ');
                } else if ch == q {
                    in_quote = None;
                    out.push(ch);
                } else if ch == '\n' {
                    in_quote = None;
                    out.push('\n');
                } else {
                    out.push(' ');
                }
            }
            None => {
                if ch == '"' || ch == '\'' {
                    in_quote = Some(ch);
                }
                out.push(ch);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blanks_double_quoted_contents() {
        let out = strip_string_literals(r#"print("hello (world)")"#);
        assert_eq!(out, r#"print("             ")"#);
    }

    #[test]
    fn keeps_code_outside_literals() {
        let out = strip_string_literals("x = a[0] + 'b]'");
        assert!(out.starts_with("x = a[0] + '"));
        assert!(!out.contains("b]"));
    }

    #[test]
    fn escaped_quote_does_not_close_the_literal() {
        let out = strip_string_literals(r#"s = "a\"b{" + t"#);
        assert!(!out.contains('{'), "brace inside the literal must be blanked: {out}");
        assert!(out.ends_with("+ t"));
    }

    #[test]
    fn newline_closes_an_unterminated_literal() {
        let out = strip_string_literals("s = \"oops\nwhile (x) {");
        assert!(out.contains("while (x) {"), "second line must survive: {out}");
    }

    #[test]
    fn length_and_line_count_are_preserved() {
        let src = "a = \"( [ {\"\nb = 2";
        let out = strip_string_literals(src);
        assert_eq!(src.chars().count(), out.chars().count());
        assert_eq!(src.lines().count(), out.lines().count());
    }
}
