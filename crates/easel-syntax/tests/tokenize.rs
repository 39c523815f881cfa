use easel_core::{
    color::Color,
    config::Theme,
    syntax::{TokenNode, TokenPalette, Tokenizer, flatten_tokens, split_lines},
};
use easel_syntax::{SyntaxTokenizer, TokenizeError, lexer::flatten_text};

#[test]
fn test_unknown_language_falls_back_to_plain_text() {
    let tokenizer = SyntaxTokenizer::new();
    assert_eq!(
        tokenizer.try_tokenize("x", "cobol"),
        Err(TokenizeError::UnknownLanguage("cobol".to_string()))
    );
    assert_eq!(tokenizer.tokenize("x", "cobol"), vec![TokenNode::text("x")]);
}

#[test]
fn test_multiline_source_round_trips() {
    let source = "def f(x):\n    return x + 1  # inc\n\nprint(f(2))\n";
    let nodes = SyntaxTokenizer::new().tokenize(source, "python");
    assert_eq!(flatten_text(&nodes), source);
}

#[test]
fn test_interpolation_inherits_string_color() {
    let palette = TokenPalette::for_theme(Theme::Light);
    let base = Color::new("#000000").expect("valid color");
    let nodes = SyntaxTokenizer::new().tokenize("`total: ${count}`", "js");

    let spans = flatten_tokens(&nodes, base, &palette);
    let string = palette.color_for("string").expect("string color");
    let count = spans
        .iter()
        .find(|span| span.text.contains("count"))
        .expect("count span");
    // `count` is a plain identifier inside the interpolation token, which has
    // no palette entry, so it takes the enclosing string color.
    assert_eq!(count.color, string);
}

#[test]
fn test_lines_follow_source_lines() {
    let palette = TokenPalette::for_theme(Theme::Dark);
    let base = Color::new("#ffffff").expect("valid color");
    let source = "/* a\nb */\nlet y = 2;";
    let nodes = SyntaxTokenizer::new().tokenize(source, "ts");

    let lines = split_lines(&flatten_tokens(&nodes, base, &palette));
    assert_eq!(lines.len(), 3);
    let comment = palette.color_for("comment").expect("comment color");
    assert_eq!(lines[1][0].color, comment);
}
