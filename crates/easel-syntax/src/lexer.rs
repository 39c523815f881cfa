//! Winnow-based lexer producing token trees.
//!
//! The lexer is lossless: concatenating every text leaf of the produced tree
//! yields the source again. Anything it does not recognize is kept as plain
//! text rather than reported, since a code card must always show its source.
//!
//! Interpolating string literals (`` `a ${b} c` ``) are the one nested
//! construct: the interpolation becomes an `interpolation` token inside the
//! `string` token, holding the tokens of the embedded expression.

use winnow::{
    Parser as _,
    combinator::{alt, opt, preceded, repeat},
    error::ModalResult,
    token::{any, literal, none_of, one_of, rest, take_until, take_while},
};

use easel_core::syntax::TokenNode;

use crate::{error::TokenizeError, grammar::Grammar};

type Input<'a> = &'a str;

/// Deepest template-in-template nesting accepted.
pub const MAX_TEMPLATE_DEPTH: usize = 16;

const OPERATOR_CHARS: &str = "+-*/%=<>!&|^~?:@";

/// Runs `parser`, restoring the input if it fails.
fn attempt<'a, O>(
    input: &mut Input<'a>,
    mut parser: impl FnMut(&mut Input<'a>) -> ModalResult<O>,
) -> Option<O> {
    let start = *input;
    match parser(input) {
        Ok(output) => Some(output),
        Err(_) => {
            *input = start;
            None
        }
    }
}

fn whitespace<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    take_while(1.., char::is_whitespace).parse_next(input)
}

fn line_comment<'a>(input: &mut Input<'a>, marker: &'static str) -> ModalResult<&'a str> {
    (literal(marker), take_while(0.., |c: char| c != '\n'))
        .take()
        .parse_next(input)
}

/// A block comment; an unterminated one runs to the end of the input.
fn block_comment<'a>(
    input: &mut Input<'a>,
    open: &'static str,
    close: &'static str,
) -> ModalResult<&'a str> {
    alt((
        (literal(open), take_until(0.., close), literal(close)).take(),
        (literal(open), rest).take(),
    ))
    .parse_next(input)
}

fn string_body(input: &mut Input<'_>, quote: char) -> ModalResult<()> {
    repeat(
        0..,
        alt((
            preceded('\\', any).void(),
            none_of([quote, '\\', '\n']).void(),
        )),
    )
    .parse_next(input)
}

/// A quoted string; an unterminated one stops at the end of the line.
fn quoted_string<'a>(input: &mut Input<'a>, quote: char) -> ModalResult<&'a str> {
    (quote, |i: &mut Input<'a>| string_body(i, quote), opt(quote))
        .take()
        .parse_next(input)
}

fn number<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        .verify(|s: &str| s.starts_with(|c: char| c.is_ascii_digit()))
        .parse_next(input)
}

fn word<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_' || c == '$')
        .verify(|s: &str| {
            s.chars()
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        })
        .parse_next(input)
}

fn operator<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    take_while(1.., |c: char| OPERATOR_CHARS.contains(c)).parse_next(input)
}

fn punctuation(input: &mut Input<'_>) -> ModalResult<char> {
    one_of(['(', ')', '{', '}', '[', ']', ';', ',', '.']).parse_next(input)
}

/// Collects nodes, merging adjacent text.
#[derive(Debug, Default)]
struct NodeBuffer {
    nodes: Vec<TokenNode>,
    text: String,
    after_dot: bool,
}

impl NodeBuffer {
    fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn push_char(&mut self, c: char) {
        self.text.push(c);
    }

    fn push_token(&mut self, kind: &str, text: &str) {
        self.push_node(TokenNode::token(kind, vec![TokenNode::text(text)]));
    }

    fn push_node(&mut self, node: TokenNode) {
        self.flush();
        self.nodes.push(node);
    }

    fn flush(&mut self) {
        if !self.text.is_empty() {
            self.nodes.push(TokenNode::Text(std::mem::take(&mut self.text)));
        }
    }

    fn finish(mut self) -> Vec<TokenNode> {
        self.flush();
        self.nodes
    }
}

struct Lexer<'g> {
    grammar: &'g Grammar,
    source_len: usize,
}

impl Lexer<'_> {
    fn offset(&self, input: &Input<'_>) -> usize {
        self.source_len - input.len()
    }

    /// Tokenizes until the input ends or, inside an interpolation, until the
    /// `}` that closes it (left unconsumed).
    fn tokens(&self, input: &mut Input<'_>, depth: usize, out: &mut NodeBuffer) -> Result<(), TokenizeError> {
        let mut braces = 0usize;
        while !input.is_empty() {
            if depth > 0 {
                if input.starts_with('}') {
                    if braces == 0 {
                        return Ok(());
                    }
                    braces -= 1;
                } else if input.starts_with('{') {
                    braces += 1;
                }
            }
            self.step(input, depth, out)?;
        }
        Ok(())
    }

    /// Consumes one lexeme.
    fn step(&self, input: &mut Input<'_>, depth: usize, out: &mut NodeBuffer) -> Result<(), TokenizeError> {
        let grammar = self.grammar;

        if let Some(space) = attempt(input, whitespace) {
            out.push_text(space);
            return Ok(());
        }
        if let Some(marker) = grammar.line_comment {
            if let Some(comment) = attempt(input, |i| line_comment(i, marker)) {
                out.push_token("comment", comment);
                return Ok(());
            }
        }
        if let Some((open, close)) = grammar.block_comment {
            if let Some(comment) = attempt(input, |i| block_comment(i, open, close)) {
                out.push_token("comment", comment);
                return Ok(());
            }
        }
        if let Some(quote) = grammar.template_quote {
            if input.starts_with(quote) {
                let node = self.template(input, quote, depth)?;
                out.push_node(node);
                out.after_dot = false;
                return Ok(());
            }
        }
        for &quote in grammar.quotes {
            if let Some(string) = attempt(input, |i| quoted_string(i, quote)) {
                out.push_token("string", string);
                out.after_dot = false;
                return Ok(());
            }
        }
        if let Some(digits) = attempt(input, number) {
            out.push_token("number", digits);
            out.after_dot = false;
            return Ok(());
        }
        if let Some(ident) = attempt(input, word) {
            match self.classify_word(ident, *input, out.after_dot) {
                Some(kind) => out.push_token(kind, ident),
                None => out.push_text(ident),
            }
            out.after_dot = false;
            return Ok(());
        }
        if let Some(op) = attempt(input, operator) {
            out.push_token("operator", op);
            out.after_dot = false;
            return Ok(());
        }
        if let Some(c) = attempt(input, punctuation) {
            let mut buf = [0u8; 4];
            out.push_token("punctuation", c.encode_utf8(&mut buf));
            out.after_dot = c == '.';
            return Ok(());
        }
        if let Some(c) = attempt(input, |i| any.parse_next(i)) {
            out.push_char(c);
        }
        Ok(())
    }

    fn classify_word(&self, word: &str, rest: &str, after_dot: bool) -> Option<&'static str> {
        let grammar = self.grammar;
        if grammar.is_keyword(word) {
            Some("keyword")
        } else if grammar.is_constant(word) {
            Some("constant")
        } else if rest.trim_start_matches([' ', '\t']).starts_with('(') {
            Some("function")
        } else if after_dot {
            Some("property")
        } else if word.starts_with(|c: char| c.is_uppercase()) {
            Some("type")
        } else {
            None
        }
    }

    /// An interpolating string literal, starting at its opening quote.
    fn template(&self, input: &mut Input<'_>, mut quote: char, depth: usize) -> Result<TokenNode, TokenizeError> {
        if depth >= MAX_TEMPLATE_DEPTH {
            return Err(TokenizeError::NestingTooDeep {
                limit: MAX_TEMPLATE_DEPTH,
                offset: self.offset(input),
            });
        }
        let mut parts = NodeBuffer::default();
        if let Some(open) = attempt(input, |i| quote.parse_next(i)) {
            parts.push_char(open);
        }

        while !input.is_empty() {
            if let Some(close) = attempt(input, |i| quote.parse_next(i)) {
                parts.push_char(close);
                break;
            }
            if let Some(open) = attempt(input, |i| literal("${").parse_next(i)) {
                let mut inner = NodeBuffer::default();
                inner.push_token("punctuation", open);
                self.tokens(input, depth + 1, &mut inner)?;
                if let Some(close) = attempt(input, |i| literal("}").parse_next(i)) {
                    inner.push_token("punctuation", close);
                }
                parts.push_node(TokenNode::token("interpolation", inner.finish()));
                continue;
            }
            if let Some(escaped) = attempt(input, |i| ('\\', any).take().parse_next(i)) {
                parts.push_text(escaped);
                continue;
            }
            let chunk = attempt(input, |i| {
                take_while(1.., |c: char| c != quote && c != '\\' && c != '$').parse_next(i)
            });
            match chunk {
                Some(chunk) => parts.push_text(chunk),
                None => {
                    if let Some(c) = attempt(input, |i| any.parse_next(i)) {
                        parts.push_char(c);
                    }
                }
            }
        }
        Ok(TokenNode::token("string", parts.finish()))
    }
}

/// Tokenizes `source` with `grammar`.
///
/// # Errors
///
/// Returns [`TokenizeError::NestingTooDeep`] when interpolations nest deeper
/// than [`MAX_TEMPLATE_DEPTH`].
pub fn tokenize(source: &str, grammar: &Grammar) -> Result<Vec<TokenNode>, TokenizeError> {
    if source.is_empty() {
        return Ok(Vec::new());
    }
    if grammar.is_plain() {
        return Ok(vec![TokenNode::text(source)]);
    }
    let lexer = Lexer {
        grammar,
        source_len: source.len(),
    };
    let mut input = source;
    let mut out = NodeBuffer::default();
    lexer.tokens(&mut input, 0, &mut out)?;
    Ok(out.finish())
}

/// Concatenates every text leaf of a token tree.
pub fn flatten_text(nodes: &[TokenNode]) -> String {
    let mut text = String::new();
    for node in nodes {
        match node {
            TokenNode::Text(t) => text.push_str(t),
            TokenNode::Token(token) => text.push_str(&flatten_text(&token.content)),
        }
    }
    text
}
