use super::*;

fn kinds(src: &str) -> Vec<TokenKind> {
    lex(src).unwrap().into_iter().map(|t| t.kind).collect()
}

#[test]
fn lexes_statements_and_operators() {
    assert_eq!(
        kinds("let x = a ** 2 !== b;"),
        vec![
            TokenKind::Let,
            TokenKind::Ident("x".to_owned()),
            TokenKind::Assign,
            TokenKind::Ident("a".to_owned()),
            TokenKind::StarStar,
            TokenKind::Number(2.0),
            TokenKind::NeEq,
            TokenKind::Ident("b".to_owned()),
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn compound_assignment_and_update() {
    assert_eq!(
        kinds("i++ j -= 1 k %= 2"),
        vec![
            TokenKind::Ident("i".to_owned()),
            TokenKind::PlusPlus,
            TokenKind::Ident("j".to_owned()),
            TokenKind::MinusAssign,
            TokenKind::Number(1.0),
            TokenKind::Ident("k".to_owned()),
            TokenKind::PercentAssign,
            TokenKind::Number(2.0),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn numbers() {
    assert_eq!(
        kinds("1 2.5 .5 1e3 0xff 3."),
        vec![
            TokenKind::Number(1.0),
            TokenKind::Number(2.5),
            TokenKind::Number(0.5),
            TokenKind::Number(1000.0),
            TokenKind::Number(255.0),
            TokenKind::Number(3.0),
            TokenKind::Eof,
        ]
    );
    assert!(lex("1e").is_err());
    assert!(lex("12px").is_err());
}

#[test]
fn strings_with_escapes_and_unicode() {
    assert_eq!(
        kinds(r#""a\"b" 'it\'s' "é\n" "héllo""#),
        vec![
            TokenKind::Str("a\"b".to_owned()),
            TokenKind::Str("it's".to_owned()),
            TokenKind::Str("é\n".to_owned()),
            TokenKind::Str("héllo".to_owned()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn unterminated_string_reports_its_start() {
    let err = lex("let s = 'abc").unwrap_err();
    assert_eq!(err.offset, 8);
    assert!(err.message.contains("unterminated"));
}

#[test]
fn comments_are_skipped_and_track_newlines() {
    let toks = lex("a // c\n/* x\ny */ b /* z */ c").unwrap();
    let idents: Vec<_> = toks
        .iter()
        .filter(|t| matches!(t.kind, TokenKind::Ident(_)))
        .map(|t| t.newline_before)
        .collect();
    assert_eq!(idents, vec![false, true, false]);
    assert!(lex("/* open").is_err());
}

#[test]
fn keywords_vs_identifiers() {
    assert_eq!(
        kinds("for of offset $x _y null undefined"),
        vec![
            TokenKind::For,
            TokenKind::Of,
            TokenKind::Ident("offset".to_owned()),
            TokenKind::Ident("$x".to_owned()),
            TokenKind::Ident("_y".to_owned()),
            TokenKind::Null,
            TokenKind::Undefined,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn rejects_unknown_characters() {
    let err = lex("a # b").unwrap_err();
    assert_eq!(err.offset, 2);
    assert!(lex("`tpl`").is_err());
    assert!(lex("let π = 3").is_err());
}

#[test]
fn spans_cover_tokens() {
    let toks = lex("foo  === 'x'").unwrap();
    assert_eq!(toks[0].span, Span { start: 0, end: 3 });
    assert_eq!(toks[1].span, Span { start: 5, end: 8 });
    assert_eq!(toks[2].span, Span { start: 9, end: 12 });
}
