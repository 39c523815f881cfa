//! Lexical grammars known to the tokenizer.
//!
//! A [`Grammar`] is a small table of word lists and delimiters. It is enough to
//! tell keywords, literals and comments apart, which is all a code card needs.

/// Lexical rules for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grammar {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub constants: &'static [&'static str],
    pub line_comment: Option<&'static str>,
    pub block_comment: Option<(&'static str, &'static str)>,
    pub quotes: &'static [char],
    /// Quote of an interpolating string literal (`${...}` inside).
    pub template_quote: Option<char>,
}

const RUST: Grammar = Grammar {
    name: "rust",
    keywords: &[
        "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
        "extern", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
        "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "type",
        "unsafe", "use", "where", "while",
    ],
    constants: &["true", "false", "None", "Some", "Ok", "Err"],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    quotes: &['"'],
    template_quote: None,
};

const JAVASCRIPT: Grammar = Grammar {
    name: "javascript",
    keywords: &[
        "async", "await", "break", "case", "catch", "class", "const", "continue", "default",
        "delete", "do", "else", "export", "extends", "finally", "for", "from", "function", "if",
        "import", "in", "instanceof", "let", "new", "of", "return", "static", "switch", "this",
        "throw", "try", "typeof", "var", "void", "while", "yield",
    ],
    constants: &["true", "false", "null", "undefined", "NaN", "Infinity"],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    quotes: &['"', '\''],
    template_quote: Some('`'),
};

const TYPESCRIPT: Grammar = Grammar {
    name: "typescript",
    keywords: &[
        "abstract", "as", "async", "await", "break", "case", "catch", "class", "const",
        "continue", "declare", "default", "else", "enum", "export", "extends", "finally", "for",
        "from", "function", "if", "implements", "import", "in", "interface", "keyof", "let",
        "namespace", "new", "of", "private", "protected", "public", "readonly", "return",
        "static", "switch", "this", "throw", "try", "type", "typeof", "var", "while",
    ],
    constants: &["true", "false", "null", "undefined"],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    quotes: &['"', '\''],
    template_quote: Some('`'),
};

const PYTHON: Grammar = Grammar {
    name: "python",
    keywords: &[
        "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del",
        "elif", "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is",
        "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with",
        "yield",
    ],
    constants: &["True", "False", "None"],
    line_comment: Some("#"),
    block_comment: None,
    quotes: &['"', '\''],
    template_quote: None,
};

const JSON: Grammar = Grammar {
    name: "json",
    keywords: &[],
    constants: &["true", "false", "null"],
    line_comment: None,
    block_comment: None,
    quotes: &['"'],
    template_quote: None,
};

const PLAINTEXT: Grammar = Grammar {
    name: "plaintext",
    keywords: &[],
    constants: &[],
    line_comment: None,
    block_comment: None,
    quotes: &[],
    template_quote: None,
};

impl Grammar {
    /// Looks up a grammar by language name or common alias, case-insensitively.
    pub fn for_language(language: &str) -> Option<&'static Grammar> {
        match language.trim().to_ascii_lowercase().as_str() {
            "rust" | "rs" => Some(&RUST),
            "javascript" | "js" | "jsx" | "mjs" => Some(&JAVASCRIPT),
            "typescript" | "ts" | "tsx" => Some(&TYPESCRIPT),
            "python" | "py" => Some(&PYTHON),
            "json" => Some(&JSON),
            "plaintext" | "text" | "txt" | "" => Some(&PLAINTEXT),
            _ => None,
        }
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.contains(&word)
    }

    pub fn is_constant(&self, word: &str) -> bool {
        self.constants.contains(&word)
    }

    /// True when this grammar does no classification at all.
    pub fn is_plain(&self) -> bool {
        self.name == PLAINTEXT.name
    }
}
