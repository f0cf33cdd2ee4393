use crate::error::RuleErrorKind;
use crate::scanner::{RuleChar, RuleScanner, strip_rules};

/// Drain the scanner, collecting (char, escaped) pairs until end of input.
fn scan_all(rules: &str) -> Vec<(u32, bool)> {
    let mut scanner = RuleScanner::new(rules);
    let mut out = Vec::new();
    loop {
        let c = scanner.next_char().expect(rules);
        match c {
            RuleChar { ch: Some(ch), escaped } => out.push((ch, escaped)),
            RuleChar { ch: None, .. } => return out,
        }
    }
}

fn chars(rules: &str) -> String {
    scan_all(rules)
        .iter()
        .filter_map(|&(c, _)| char::from_u32(c))
        .collect()
}

#[test]
fn plain_characters() {
    assert_eq!(
        scan_all("ab"),
        vec![('a' as u32, false), ('b' as u32, false)]
    );
}

#[test]
fn backslash_escapes() {
    assert_eq!(
        scan_all(r"a\u0041b"),
        vec![('a' as u32, false), (0x41, true), ('b' as u32, false)]
    );
    assert_eq!(scan_all(r"\n"), vec![(0x0A, true)]);
    assert_eq!(scan_all(r"\."), vec![('.' as u32, true)]);
}

#[test]
fn bad_escape_is_an_error() {
    let mut scanner = RuleScanner::new(r"\u12;");
    let err = scanner.next_char().unwrap_err();
    assert_eq!(err.kind, RuleErrorKind::HexDigitsExpected);
}

#[test]
fn comments_read_as_the_terminating_newline() {
    assert_eq!(chars("a#comment\nb"), "a\nb");
    // comment at end of input just stops
    assert_eq!(chars("a#comment"), "a");
}

#[test]
fn quoted_run_reads_as_grouped_escaped_chars() {
    let got = scan_all("'ab'");
    assert_eq!(
        got,
        vec![
            ('(' as u32, false),
            ('a' as u32, true),
            ('b' as u32, true),
            (')' as u32, false),
        ]
    );
}

#[test]
fn doubled_quote_is_a_literal_quote() {
    assert_eq!(scan_all("''"), vec![('\'' as u32, true)]);
    // inside a quoted run too
    assert_eq!(
        scan_all("'a''b'"),
        vec![
            ('(' as u32, false),
            ('a' as u32, true),
            ('\'' as u32, true),
            ('b' as u32, true),
            (')' as u32, false),
        ]
    );
}

#[test]
fn comment_inside_quotes_is_literal() {
    let got = scan_all("'#'");
    assert_eq!(
        got,
        vec![('(' as u32, false), ('#' as u32, true), (')' as u32, false)]
    );
}

#[test]
fn newline_inside_quotes_is_an_error() {
    let mut scanner = RuleScanner::new("'ab\ncd'");
    let err = loop {
        match scanner.next_char() {
            Ok(RuleChar { ch: None, .. }) => panic!("expected an error"),
            Ok(_) => {}
            Err(e) => break e,
        }
    };
    assert_eq!(err.kind, RuleErrorKind::NewLineInQuotedString);
    assert_eq!(err.line, 2);
}

#[test]
fn line_and_column_tracking() {
    let mut scanner = RuleScanner::new("ab\ncd");
    scanner.next_char().unwrap(); // a
    assert_eq!((scanner.line(), scanner.column()), (1, 1));
    scanner.next_char().unwrap(); // b
    assert_eq!((scanner.line(), scanner.column()), (1, 2));
    scanner.next_char().unwrap(); // \n
    assert_eq!((scanner.line(), scanner.column()), (2, 0));
    scanner.next_char().unwrap(); // c
    assert_eq!((scanner.line(), scanner.column()), (2, 1));
}

#[test]
fn crlf_counts_as_one_line() {
    let mut scanner = RuleScanner::new("a\r\nb");
    scanner.next_char().unwrap(); // a
    scanner.next_char().unwrap(); // \r
    assert_eq!(scanner.line(), 2);
    scanner.next_char().unwrap(); // \n, still line 2
    assert_eq!(scanner.line(), 2);
    scanner.next_char().unwrap(); // b
    assert_eq!((scanner.line(), scanner.column()), (2, 1));
}

#[test]
fn nel_and_ls_start_new_lines() {
    let mut scanner = RuleScanner::new("a\u{85}b\u{2028}c");
    scanner.next_char().unwrap(); // a
    scanner.next_char().unwrap(); // NEL
    assert_eq!(scanner.line(), 2);
    scanner.next_char().unwrap(); // b
    scanner.next_char().unwrap(); // LS
    assert_eq!(scanner.line(), 3);
}

#[test]
fn scan_index_spans_the_current_character() {
    let mut scanner = RuleScanner::new(r"a\u0041b");
    scanner.next_char().unwrap();
    assert_eq!((scanner.scan_index(), scanner.next_index()), (0, 1));
    scanner.next_char().unwrap(); // the whole A escape
    assert_eq!((scanner.scan_index(), scanner.next_index()), (1, 7));
    scanner.next_char().unwrap();
    assert_eq!((scanner.scan_index(), scanner.next_index()), (7, 8));
}

#[test]
fn strip_rules_removes_comments_and_controls() {
    assert_eq!(strip_rules("a#comment\nb"), "ab");
    assert_eq!(strip_rules("a\tb\u{7F}c"), "abc");
    assert_eq!(strip_rules("[a-z]+;"), "[a-z]+;");
    // the comment's newline terminator is a control and goes too
    assert_eq!(strip_rules("x # one\ny # two\nz"), "x y z");
}
