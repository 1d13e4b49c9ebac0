use implidx_fragments::ImplementorFragment;
use pretty_assertions::assert_eq;

use super::{DataFile, ParseError, ParseErrorKind, parse, render};

const STATEMENTS: &str = include_str!("../../tests/fixtures/implementors/num_traits/cast/trait.FromPrimitive.js");
const LITERAL: &str = include_str!("../../tests/fixtures/implementors/core/fmt/trait.Display.js");

#[test]
fn parses_statement_layout_with_trailing_comma() {
	let file = parse(STATEMENTS).unwrap();

	assert_eq!(file.producers().collect::<Vec<_>>(), ["rowdy"]);
	let rowdy = &file.fragments()[0];
	assert_eq!(rowdy.len(), 3);
	assert!(rowdy.implementors()[0].ends_with(r#"title="enum chrono::Weekday">Weekday</a>"#));
	assert!(rowdy.implementors()[2].contains("&lt;"));
}

#[test]
fn parses_literal_layout() {
	let file = parse(LITERAL).unwrap();

	assert_eq!(file.producers().collect::<Vec<_>>(), ["rowdy", "empty_crate"]);
	assert_eq!(file.fragments()[0].len(), 1);
	assert!(file.fragments()[1].is_empty());
	assert_eq!(file.total_implementors(), 1);
}

#[test]
fn keeps_repeated_producers_in_file_order() {
	let src = r#"(function() {var implementors = {};
implementors["a"] = ["1"];
implementors["b"] = [];
implementors["a"] = ["2"];
})()"#;
	let file = parse(src).unwrap();
	assert_eq!(file.producers().collect::<Vec<_>>(), ["a", "b", "a"]);
}

#[test]
fn decodes_json_escapes() {
	let src = r#"var implementors = {"c":["tab\there \"quoted\" é"]};"#;
	let file = parse(src).unwrap();
	assert_eq!(&*file.fragments()[0].implementors()[0], "tab\there \"quoted\" é");
}

#[test]
fn empty_object_yields_no_fragments() {
	let file = parse("(function() {var implementors = {};\nif (window.register_implementors) {}})()").unwrap();
	assert!(file.is_empty());
}

#[test]
fn rendered_file_parses_back() {
	let original = DataFile::new(vec![
		ImplementorFragment::new("rowdy", ["impl <a href=\"x\">A</a> for B", "impl C for D&lt;u8&gt;"]),
		ImplementorFragment::empty("empty_crate"),
	]);

	let text = render(&original);

	assert!(text.starts_with("(function() {var implementors = {};\n"));
	assert!(text.contains("window.pending_implementors = implementors;"));
	assert!(text.contains(r#"implementors["empty_crate"] = [];"#));
	assert_eq!(parse(&text).unwrap(), original);
}

#[test]
fn line_separators_are_escaped_for_script_engines() {
	let snippet = "impl A\u{2028}for\u{2029}B";
	let original = DataFile::new(vec![ImplementorFragment::new("sep", [snippet])]);

	let text = render(&original);

	assert!(!text.contains('\u{2028}') && !text.contains('\u{2029}'));
	assert!(text.contains(r#"implementors["sep"] = ["impl A\u2028for\u2029B"];"#));
	assert_eq!(&*parse(&text).unwrap().fragments()[0].implementors()[0], snippet);
}

#[test]
fn missing_declaration_is_reported() {
	let err = parse("console.log(1)").unwrap_err();
	assert_eq!(err.kind, ParseErrorKind::MissingDeclaration);
}

#[test]
fn unterminated_string_reports_eof() {
	let err = parse(r#"var implementors = {"crate":["never closed"#).unwrap_err();
	assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
}

#[test]
fn malformed_separator_reports_offset() {
	let src = r#"var implementors = {"a":[] "b":[]};"#;
	let err = parse(src).unwrap_err();
	assert_eq!(
		err,
		ParseError {
			offset: src.find(r#""b""#).unwrap(),
			kind: ParseErrorKind::Expected("`,` or `}`"),
		}
	);
	assert_eq!(err.to_string(), format!("expected `,` or `}}` at byte {}", err.offset));
}

#[test]
fn invalid_escape_is_rejected() {
	let err = parse(r#"var implementors = {"a":["bad \q escape"]};"#).unwrap_err();
	assert!(matches!(err.kind, ParseErrorKind::InvalidString(_)), "got {err:?}");
}
