//! Tokenizer for the markup adapter, built on [Logos].
//!
//! Tokens are context-free: the lexer does not know which tags are void or
//! which elements hold raw text. The parser decides that and, for raw-text
//! elements, asks [`Tokens::raw_text`] to consume everything up to the
//! closing tag.
//!
//! [Logos]: https://docs.rs/logos

use std::ops::Range;

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<!-- ... -->`, or to end of input when unterminated
    #[token("<!--", comment_end)]
    Comment,

    /// `<!DOCTYPE ...>` and other declarations
    #[regex(r"<![^->][^>]*>")]
    Doctype,

    /// `<tag attr="v">` or `<tag/>`
    #[regex(r#"<[a-zA-Z][a-zA-Z0-9-]*([^>"']|"[^"]*"|'[^']*')*>"#)]
    OpenTag,

    /// `</tag>`
    #[regex(r"</[a-zA-Z][a-zA-Z0-9-]*[ \t\r\n]*>")]
    CloseTag,

    /// A run of character data
    #[regex(r"[^<]+")]
    Text,

    /// A `<` that starts no tag
    #[token("<")]
    Lt,
}

fn comment_end(lex: &mut logos::Lexer<TokenKind>) -> bool {
    let rest = lex.remainder();
    let len = rest.find("-->").map_or(rest.len(), |i| i + 3);
    lex.bump(len);
    true
}

/// A lexed token with its source slice and byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Range<usize>,
}

/// Token stream over a markup source.
pub struct Tokens<'a> {
    lexer: logos::Lexer<'a, TokenKind>,
}

impl<'a> Tokens<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            lexer: TokenKind::lexer(src),
        }
    }

    /// Consume the source up to (not including) `</tag`, matched without
    /// regard to case, and return it verbatim.
    pub fn raw_text(&mut self, tag: &str) -> &'a str {
        let rest = self.lexer.remainder();
        let closing = format!("</{}", tag.to_ascii_lowercase());
        let len = rest
            .to_ascii_lowercase()
            .find(&closing)
            .unwrap_or(rest.len());
        self.lexer.bump(len);
        &rest[..len]
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.lexer.next()?;
        // Anything unrecognized is character data
        let kind = result.unwrap_or(TokenKind::Text);
        Some(Token {
            kind,
            text: self.lexer.slice(),
            span: self.lexer.span(),
        })
    }
}

/// Lex `src` into tokens. Every byte of the input lands in exactly one token.
pub fn lex(src: &str) -> Vec<Token<'_>> {
    Tokens::new(src).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(src: &str) -> Vec<TokenKind> {
        lex(src).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tags_and_text() {
        use TokenKind::*;
        assert_eq!(
            kinds("<p class=\"a\">hi <br/>there</p>"),
            vec![OpenTag, Text, OpenTag, Text, CloseTag]
        );
    }

    #[test]
    fn test_comments_and_doctype() {
        use TokenKind::*;
        assert_eq!(
            kinds("<!DOCTYPE html><!-- a <b> -->x"),
            vec![Doctype, Comment, Text]
        );
    }

    #[test]
    fn test_quoted_gt_stays_inside_the_tag() {
        let tokens = lex("<a title=\"1 > 0\">x</a>");
        assert_eq!(tokens[0].kind, TokenKind::OpenTag);
        assert_eq!(tokens[0].text, "<a title=\"1 > 0\">");
    }

    #[test]
    fn test_stray_lt_is_its_own_token() {
        use TokenKind::*;
        assert_eq!(kinds("a < b"), vec![Text, Lt, Text]);
    }

    #[test]
    fn test_lexing_is_lossless() {
        let src = "<!doctype html><div id=x>a &amp; b<!-- c --></div> < tail";
        let rebuilt: String = lex(src).iter().map(|t| t.text).collect();
        assert_eq!(rebuilt, src);
    }

    #[test]
    fn test_raw_text_runs_to_the_closing_tag() {
        let mut tokens = Tokens::new("<script>if (a<b) {}</SCRIPT>after");
        assert_eq!(tokens.next().map(|t| t.kind), Some(TokenKind::OpenTag));
        assert_eq!(tokens.raw_text("script"), "if (a<b) {}");
        assert_eq!(tokens.next().map(|t| t.kind), Some(TokenKind::CloseTag));
        assert_eq!(tokens.next().map(|t| t.text), Some("after"));
    }
}
