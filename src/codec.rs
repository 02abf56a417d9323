use tracing::trace;

use crate::parser::{DELIMITER, Parser, Token};
use crate::store::Store;

/// Build a [`Store`] from configuration text. Later definitions of a name overwrite earlier ones.
#[must_use]
pub fn parse(text: &str) -> Store {
    let mut store = Store::new();

    for token in Parser::new(text) {
        if let Token::Definition(definition) = token {
            trace!(name = definition.name, "parsed definition");
            store.set(definition.name, definition.value);
        }
    }

    store
}

/// Rewrite `source` with the values currently held in `store`.
///
/// Comments and whitespace are copied verbatim, and each definition keeps its name and separator
/// but takes its value from the store. Variables the source never mentions are appended at the end,
/// one per line.
#[must_use]
pub fn render(source: &str, store: &Store) -> String {
    let mut output = String::with_capacity(source.len() + 64);
    let mut written = vec![false; store.len()];

    for token in Parser::new(source) {
        match token {
            Token::Blank(text) | Token::Comment(text) => output.push_str(text),
            Token::Definition(definition) => {
                output.push_str(definition.name);
                output.push(definition.separator.unwrap_or(' '));

                if let Some(i) = store.position(definition.name) {
                    output.push_str(store.entries()[i].value());
                    written[i] = true;
                } else {
                    output.push_str(definition.value);
                }

                output.push(DELIMITER);
            }
        }
    }

    let mut unwritten = store
        .entries()
        .iter()
        .zip(written)
        .filter(|&(_, written)| !written)
        .peekable();

    if unwritten.peek().is_some() && !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }

    for (entry, _) in unwritten {
        push_line(&mut output, entry.name(), entry.value());
    }

    output
}

/// Render one `name value;` line per variable, in store order, ignoring any previous layout.
#[must_use]
pub fn render_canonical(store: &Store) -> String {
    let mut output = String::new();

    for entry in store.entries() {
        push_line(&mut output, entry.name(), entry.value());
    }

    output
}

fn push_line(output: &mut String, name: &str, value: &str) {
    output.push_str(name);
    output.push(' ');
    output.push_str(value);
    output.push(DELIMITER);
    output.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "#Custom comment

#Examples:
MyVar 10;
MySentense Hello world !;
MyArray\t10 56 38 52 46;

# A value can contain '\\n'
MyMultilineValue Dear sir,
This a message for you

Yours faithfully,
Thibaut CHARLES;
";

    #[test]
    fn parse_sample() {
        let store = parse(SAMPLE);

        assert_eq!(store.len(), 4);
        assert_eq!(store.get("MyVar"), Some("10"));
        assert_eq!(store.get("MySentense"), Some("Hello world !"));
        assert_eq!(store.get("MyArray"), Some("10 56 38 52 46"));
        assert_eq!(
            store.get("MyMultilineValue"),
            Some("Dear sir,\nThis a message for you\n\nYours faithfully,\nThibaut CHARLES")
        );
    }

    #[test]
    fn later_definition_wins_in_first_position() {
        let store = parse("a 1;\nb 2;\na 3;\n");

        assert_eq!(store.get("a"), Some("3"));
        assert_eq!(store.entries()[0].name(), "a");
    }

    #[test]
    fn render_without_changes_is_identical() {
        let store = parse(SAMPLE);

        assert_eq!(render(SAMPLE, &store), SAMPLE);
    }

    #[test]
    fn render_replaces_only_the_changed_value() {
        let mut store = parse(SAMPLE);
        store.set("MySentense", "This world is great :)");

        let expected = SAMPLE.replace("Hello world !", "This world is great :)");

        assert_eq!(render(SAMPLE, &store), expected);
    }

    #[test]
    fn render_appends_new_variables() {
        let mut store = parse(SAMPLE);
        store.set("NewVar", "68");

        let rendered = render(SAMPLE, &store);

        assert_eq!(rendered, format!("{SAMPLE}NewVar 68;\n"));
    }

    #[test]
    fn render_appends_after_missing_final_newline() {
        let source = "a 1; # done";
        let mut store = parse(source);
        store.set("b", "2");

        assert_eq!(render(source, &store), "a 1; # done\nb 2;\n");
    }

    #[test]
    fn render_terminates_trailing_definition() {
        let source = "a 1;\nb unterminated";
        let store = parse(source);

        assert_eq!(render(source, &store), "a 1;\nb unterminated;");
    }

    #[test]
    fn render_is_idempotent() {
        let mut store = parse(SAMPLE);
        store.set("Extra", "1 2");

        let once = render(SAMPLE, &store);
        let twice = render(SAMPLE, &store);

        assert_eq!(once, twice);
        assert_eq!(render(&once, &parse(&once)), once);
    }

    #[test]
    fn render_empty_source() {
        let mut store = Store::new();
        store.set("key", "value");

        assert_eq!(render("", &store), "key value;\n");
    }

    #[test]
    fn canonical_round_trip() {
        let store = parse(SAMPLE);
        let canonical = render_canonical(&store);

        assert!(canonical.starts_with("MyVar 10;\nMySentense Hello world !;\n"));
        assert_eq!(parse(&canonical), store);
    }

    #[test]
    fn canonical_keeps_leading_spaces_in_values() {
        let mut store = Store::new();
        store.set("padded", "  x ");
        store.set("empty", "");

        assert_eq!(parse(&render_canonical(&store)), store);
    }
}
