//! Token trees and the recursive token colorer for code blocks.
//!
//! Syntax tokenization is delegated to a [`Tokenizer`]: given a source string
//! and a grammar name it returns a tree of [`TokenNode`]s. Coloring walks that
//! tree carrying the resolved color of the enclosing token as the default for
//! its children, so nested tokens without a palette entry inherit from their
//! parent rather than from the global text color.

use std::collections::HashMap;

use crate::{color::Color, config::Theme};

/// A node of a token tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenNode {
    /// Raw text, colored with the color of the enclosing token.
    Text(String),
    Token(Token),
}

impl TokenNode {
    pub fn text(text: &str) -> Self {
        Self::Text(text.to_string())
    }

    pub fn token(kind: &str, content: Vec<TokenNode>) -> Self {
        Self::Token(Token {
            kind: kind.to_string(),
            content,
        })
    }
}

/// A classified span whose content may itself contain tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: String,
    pub content: Vec<TokenNode>,
}

/// Black-box lexer contract consumed by the code-block renderer.
pub trait Tokenizer {
    /// Tokenizes `source` with the grammar named `language`.
    fn tokenize(&self, source: &str, language: &str) -> Vec<TokenNode>;
}

/// A tokenizer that performs no classification.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTokenizer;

impl Tokenizer for PlainTokenizer {
    fn tokenize(&self, source: &str, _language: &str) -> Vec<TokenNode> {
        if source.is_empty() {
            Vec::new()
        } else {
            vec![TokenNode::text(source)]
        }
    }
}

/// Colors for token kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPalette {
    colors: HashMap<&'static str, Color>,
}

impl TokenPalette {
    pub fn for_theme(theme: Theme) -> Self {
        let entries: [(&'static str, [u8; 3], [u8; 3]); 10] = [
            ("keyword", [0xc9, 0x2a, 0x2a], [0xff, 0x7b, 0x72]),
            ("string", [0x2b, 0x8a, 0x3e], [0xa5, 0xd6, 0xff]),
            ("comment", [0x86, 0x8e, 0x96], [0x8b, 0x94, 0x9e]),
            ("number", [0x19, 0x71, 0xc2], [0x79, 0xc0, 0xff]),
            ("function", [0x6f, 0x42, 0xc1], [0xd2, 0xa8, 0xff]),
            ("type", [0xe6, 0x77, 0x00], [0xff, 0xa6, 0x57]),
            ("constant", [0x19, 0x71, 0xc2], [0x79, 0xc0, 0xff]),
            ("operator", [0x49, 0x50, 0x57], [0xce, 0xd4, 0xda]),
            ("punctuation", [0x49, 0x50, 0x57], [0xce, 0xd4, 0xda]),
            ("property", [0x0c, 0x85, 0x99], [0x7e, 0xe7, 0x87]),
        ];
        let colors = entries
            .into_iter()
            .map(|(kind, light, dark)| {
                let [r, g, b] = match theme {
                    Theme::Light => light,
                    Theme::Dark => dark,
                };
                (kind, Color::from_rgba8(r, g, b, 255))
            })
            .collect();
        Self { colors }
    }

    /// Color for `kind`, or `None` when the kind inherits its parent's color.
    pub fn color_for(&self, kind: &str) -> Option<Color> {
        self.colors.get(kind).copied()
    }

    pub fn with_color(mut self, kind: &'static str, color: Color) -> Self {
        self.colors.insert(kind, color);
        self
    }
}

/// A run of text in one color.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSpan {
    pub text: String,
    pub color: Color,
}

/// Flattens a token tree into colored spans.
///
/// A text leaf takes the `inherited` color; a token resolves its own color
/// (falling back to `inherited`) and passes it down as the new default.
///
/// # Examples
///
/// ```
/// use easel_core::color::Color;
/// use easel_core::config::Theme;
/// use easel_core::syntax::{flatten_tokens, TokenNode, TokenPalette};
///
/// let palette = TokenPalette::for_theme(Theme::Light);
/// let base = Color::new("#000000").unwrap();
/// let tree = vec![TokenNode::token("string", vec![
///     TokenNode::text("\"a "),
///     TokenNode::token("interpolation", vec![TokenNode::text("${x}")]),
///     TokenNode::text("\""),
/// ])];
///
/// let spans = flatten_tokens(&tree, base, &palette);
/// let string = palette.color_for("string").unwrap();
/// assert!(spans.iter().all(|s| s.color == string));
/// ```
pub fn flatten_tokens(nodes: &[TokenNode], inherited: Color, palette: &TokenPalette) -> Vec<TokenSpan> {
    let mut spans = Vec::new();
    collect_spans(nodes, inherited, palette, &mut spans);
    spans
}

fn collect_spans(nodes: &[TokenNode], inherited: Color, palette: &TokenPalette, out: &mut Vec<TokenSpan>) {
    for node in nodes {
        match node {
            TokenNode::Text(text) if text.is_empty() => {}
            TokenNode::Text(text) => match out.last_mut() {
                Some(last) if last.color == inherited => last.text.push_str(text),
                _ => out.push(TokenSpan {
                    text: text.clone(),
                    color: inherited,
                }),
            },
            TokenNode::Token(token) => {
                let resolved = palette.color_for(&token.kind).unwrap_or(inherited);
                collect_spans(&token.content, resolved, palette, out);
            }
        }
    }
}

/// Splits spans into lines at `\n`, keeping colors.
///
/// The result always has one entry per source line, including empty ones.
pub fn split_lines(spans: &[TokenSpan]) -> Vec<Vec<TokenSpan>> {
    let mut lines = vec![Vec::new()];
    for span in spans {
        let mut parts = span.text.split('\n');
        if let Some(first) = parts.next() {
            push_part(&mut lines, first, span.color);
        }
        for part in parts {
            lines.push(Vec::new());
            push_part(&mut lines, part, span.color);
        }
    }
    lines
}

fn push_part(lines: &mut [Vec<TokenSpan>], text: &str, color: Color) {
    let text = text.strip_suffix('\r').unwrap_or(text);
    if text.is_empty() {
        return;
    }
    if let Some(line) = lines.last_mut() {
        line.push(TokenSpan {
            text: text.to_string(),
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors() -> (Color, Color, Color) {
        (
            Color::new("#000000").unwrap(),
            Color::new("#ff0000").unwrap(),
            Color::new("#0000ff").unwrap(),
        )
    }

    #[test]
    fn test_nested_token_inherits_parent_not_global() {
        let (base, red, _) = colors();
        let palette = TokenPalette::for_theme(Theme::Light).with_color("outer", red);
        let tree = vec![
            TokenNode::text("a"),
            TokenNode::token("outer", vec![TokenNode::token("unknown", vec![TokenNode::text("b")])]),
        ];

        let spans = flatten_tokens(&tree, base, &palette);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].color, base);
        assert_eq!(spans[1].text, "b");
        assert_eq!(spans[1].color, red);
    }

    #[test]
    fn test_inner_palette_color_overrides_parent() {
        let (base, red, blue) = colors();
        let palette = TokenPalette::for_theme(Theme::Light)
            .with_color("outer", red)
            .with_color("inner", blue);
        let tree = vec![TokenNode::token(
            "outer",
            vec![
                TokenNode::text("x"),
                TokenNode::token("inner", vec![TokenNode::text("y")]),
                TokenNode::text("z"),
            ],
        )];

        let spans = flatten_tokens(&tree, base, &palette);
        let flat: Vec<(&str, Color)> = spans.iter().map(|s| (s.text.as_str(), s.color)).collect();
        assert_eq!(flat, vec![("x", red), ("y", blue), ("z", red)]);
    }

    #[test]
    fn test_split_lines_keeps_empty_lines() {
        let (base, red, _) = colors();
        let spans = vec![
            TokenSpan { text: "fn a()\n\n".to_string(), color: base },
            TokenSpan { text: "x".to_string(), color: red },
        ];
        let lines = split_lines(&spans);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0][0].text, "fn a()");
        assert!(lines[1].is_empty());
        assert_eq!(lines[2][0].color, red);
    }

    #[test]
    fn test_plain_tokenizer() {
        assert_eq!(PlainTokenizer.tokenize("let x", "rust"), vec![TokenNode::text("let x")]);
        assert!(PlainTokenizer.tokenize("", "rust").is_empty());
    }
}
