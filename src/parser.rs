/// Starts a comment that runs to the end of the line.
pub const COMMENT: char = '#';

/// Terminates a value.
pub const DELIMITER: char = ';';

/// Characters skipped between tokens. Carriage returns are included so CRLF files parse.
const BLANK: [char; 4] = [' ', '\t', '\n', '\r'];

/// Characters that end a variable name.
const SEPARATOR: [char; 2] = [' ', '\t'];

/// A piece of the source text, borrowed from it unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// A run of whitespace between tokens.
    Blank(&'a str),
    /// A comment, from the marker up to and including the newline.
    Comment(&'a str),
    Definition(Definition<'a>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Definition<'a> {
    pub name: &'a str,
    /// The space or tab that ended the name; `None` if input ended first.
    pub separator: Option<char>,
    pub value: &'a str,
    /// Whether the value was closed by the delimiter rather than by the end of input.
    pub terminated: bool,
}

/// Represents an on-going parse.
///
/// Parsing is total: every input splits into tokens, and a token cut short by the end of input
/// keeps whatever it had accumulated.
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    text: &'a str,
    position: usize,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self { text, position: 0 }
    }

    fn take(&mut self, len: usize) -> &'a str {
        let text = self.text;
        let token = &text[self.position..self.position + len];
        self.position += len;
        token
    }

    fn read_blank(&mut self, rest: &str) -> &'a str {
        let len = rest.find(|c: char| !BLANK.contains(&c)).unwrap_or(rest.len());
        self.take(len)
    }

    /// Read up to and including the next newline.
    fn read_comment(&mut self, rest: &str) -> &'a str {
        let len = rest.find('\n').map_or(rest.len(), |i| i + 1);
        self.take(len)
    }

    fn read_definition(&mut self, rest: &str) -> Definition<'a> {
        let Some(end) = rest.find(SEPARATOR) else {
            return Definition {
                name: self.take(rest.len()),
                separator: None,
                value: "",
                terminated: false,
            };
        };

        let name = self.take(end);
        let separator = rest[end..].chars().next();
        self.position += 1;

        // The comment marker has no meaning once inside a value.
        let text = self.text;
        let rest = &text[self.position..];
        let (value, terminated) = match rest.find(DELIMITER) {
            Some(i) => {
                let value = self.take(i);
                self.position += DELIMITER.len_utf8();
                (value, true)
            }
            None => (self.take(rest.len()), false),
        };

        Definition {
            name,
            separator,
            value,
            terminated,
        }
    }
}

impl<'a> Iterator for Parser<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.text;
        let rest = &text[self.position..];

        Some(match rest.chars().next()? {
            c if BLANK.contains(&c) => Token::Blank(self.read_blank(rest)),
            COMMENT => Token::Comment(self.read_comment(rest)),
            _ => Token::Definition(self.read_definition(rest)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definitions(text: &str) -> Vec<Definition<'_>> {
        Parser::new(text)
            .filter_map(|token| match token {
                Token::Definition(definition) => Some(definition),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn tokens_cover_the_whole_input() {
        let text = "# header\n\nMyVar 10;\n\tMyArray\t1 2 3;  # trailing\n";
        let tokens = Parser::new(text).collect::<Vec<_>>();

        let rebuilt = tokens
            .iter()
            .map(|token| match *token {
                Token::Blank(s) | Token::Comment(s) => s.to_owned(),
                Token::Definition(d) => format!(
                    "{}{}{}{}",
                    d.name,
                    d.separator.map(String::from).unwrap_or_default(),
                    d.value,
                    if d.terminated { ";" } else { "" }
                ),
            })
            .collect::<String>();

        assert_eq!(rebuilt, text);
        assert_eq!(tokens[0], Token::Comment("# header\n"));
        assert_eq!(tokens[1], Token::Blank("\n"));
    }

    #[test]
    fn tab_separator_is_recorded() {
        let defs = definitions("MyArray\t1 2 3;");

        assert_eq!(
            defs,
            [Definition {
                name: "MyArray",
                separator: Some('\t'),
                value: "1 2 3",
                terminated: true,
            }]
        );
    }

    #[test]
    fn value_keeps_comment_marker_and_newlines() {
        let defs = definitions("Letter Dear sir,\n# not a comment\nBye;");

        assert_eq!(defs[0].value, "Dear sir,\n# not a comment\nBye");
    }

    #[test]
    fn unterminated_value_at_end_of_input() {
        let defs = definitions("a 1;\nb partial");

        assert_eq!(defs[1].name, "b");
        assert_eq!(defs[1].value, "partial");
        assert!(!defs[1].terminated);
    }

    #[test]
    fn bare_name_at_end_of_input() {
        let defs = definitions("lonely");

        assert_eq!(defs[0].name, "lonely");
        assert_eq!(defs[0].separator, None);
        assert_eq!(defs[0].value, "");
    }

    #[test]
    fn unterminated_comment_at_end_of_input() {
        let tokens = Parser::new("a 1;# no newline").collect::<Vec<_>>();

        assert_eq!(tokens.last(), Some(&Token::Comment("# no newline")));
    }

    #[test]
    fn leading_space_belongs_to_the_value() {
        let defs = definitions("key  spaced ;");

        assert_eq!(defs[0].separator, Some(' '));
        assert_eq!(defs[0].value, " spaced ");
    }

    #[test]
    fn crlf_line_endings() {
        let defs = definitions("a 1;\r\nb 2;\r\n");

        assert_eq!(defs.len(), 2);
        assert_eq!(defs[1].name, "b");
        assert_eq!(defs[1].value, "2");
    }

    #[test]
    fn empty_value() {
        let defs = definitions("empty ;next x;");

        assert_eq!(defs[0].value, "");
        assert_eq!(defs[1].name, "next");
    }
}
