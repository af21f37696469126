//! Line comment removal
//!
//! AnnoyScript comments start at the first `;` on a line and run to the end
//! of that line. They are removed before parsing, so a `;` inside a token pair
//! still starts a comment.
//!
//! A line ends at `\n`, `\r\n` or any other Unicode line separator (lone `\r`,
//! vertical tab, form feed, U+001C..=U+001E, NEL, U+2028, U+2029).

/// Marker that starts a line comment
pub const COMMENT_MARKER: char = ';';

/// Characters that end a line
pub fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}'
            | '\u{2028}' | '\u{2029}'
    )
}

/// Split `source` into lines without their terminators
///
/// `\r\n` counts as a single break. A trailing break does not start an
/// extra empty line.
pub fn split_lines(source: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = source.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&source[start..i]);
        start = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                chars.next();
                start = j + 1;
            }
        }
    }

    if start < source.len() {
        lines.push(&source[start..]);
    }
    lines
}

/// Remove every line comment from `source`
///
/// Lines are rejoined with `\n`; a trailing newline in the input is not
/// preserved, which is harmless because whitespace between blocks is skipped.
pub fn strip_comments(source: &str) -> String {
    split_lines(source)
        .into_iter()
        .map(|line| match line.find(COMMENT_MARKER) {
            Some(pos) => &line[..pos],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_to_end_of_line() {
        let source = "(< ++ >) ; add three\n(< . >)";
        assert_eq!(strip_comments(source), "(< ++ >) \n(< . >)");
    }

    #[test]
    fn test_only_first_marker_matters() {
        assert_eq!(strip_comments("(<+>);a;b"), "(<+>)");
    }

    #[test]
    fn test_marker_inside_block_still_comments() {
        // The closer ends up on the next line, so the block stays well formed
        let source = "(< + ; not an operator\n>)";
        assert_eq!(strip_comments(source), "(< + \n>)");
    }

    #[test]
    fn test_crlf_lines() {
        assert_eq!(strip_comments("(<>);x\r\n(<>)\r\n"), "(<>)\n(<>)");
    }

    #[test]
    fn test_bare_carriage_return_ends_comment() {
        assert_eq!(strip_comments("(< ++++++++ . >);c\r(< >)"), "(< ++++++++ . >)\n(< >)");
    }

    #[test]
    fn test_other_line_separators_end_comment() {
        let separators = [
            "\u{0b}", "\u{0c}", "\u{1c}", "\u{1d}", "\u{1e}", "\u{85}", "\u{2028}", "\u{2029}",
        ];
        for sep in separators {
            let source = format!("(<>);x{}(<>)", sep);
            assert_eq!(strip_comments(&source), "(<>)\n(<>)", "separator {:?}", sep);
        }
    }

    #[test]
    fn test_split_lines() {
        assert!(split_lines("").is_empty());
        assert_eq!(split_lines("a\n"), vec!["a"]);
        assert_eq!(split_lines("a\n\nb"), vec!["a", "", "b"]);
        assert_eq!(split_lines("a\r\nb\rc"), vec!["a", "b", "c"]);
        assert_eq!(split_lines("\r\r\n"), vec!["", ""]);
    }

    #[test]
    fn test_no_comments_unchanged() {
        assert_eq!(strip_comments("(? ^ ?)"), "(? ^ ?)");
    }
}
