//! Lex one side of a reaction equation into a series of tokens for later parsing
//!
//! Terms are separated by the literal `" + "`. Within a term, a leading run of
//! coefficient characters (digits, `.`, `(`, `)`, `e`, `-`) followed by whitespace
//! is the coefficient; everything after it is the metabolite identifier. The run
//! only counts as a coefficient if it parses as a number once parentheses are
//! stripped, so `"2 B"` is a coefficient and a name while `"2B"` is just a name.

use crate::io::eqn_parse::token::Token;

pub(crate) struct Lexer {
    source: Vec<char>,
    tokens: Vec<Token>,
    current: usize,
}

impl Lexer {
    pub(crate) fn new(source: &str) -> Self {
        Lexer {
            source: source.chars().collect(),
            tokens: Vec::new(),
            current: 0,
        }
    }

    pub(crate) fn scan_tokens(&mut self) -> &[Token] {
        while !self.is_at_end() {
            if self.at_separator() {
                self.current += 3;
                self.add_token(Token::Separator);
            } else {
                let chunk = self.scan_chunk();
                self.lex_chunk(&chunk);
            }
        }
        self.add_token(Token::Eof);
        &self.tokens
    }

    /// Collect characters up to the next `" + "` separator or the end of the side
    fn scan_chunk(&mut self) -> String {
        let start = self.current;
        while !self.is_at_end() && !self.at_separator() {
            self.current += 1;
        }
        self.source[start..self.current].iter().collect()
    }

    /// Emit the tokens for a single raw term
    fn lex_chunk(&mut self, chunk: &str) {
        let term = chunk.trim_start();
        if term.trim_end().is_empty() {
            // Empty term, e.g. the substrate side of an exchange reaction
            return;
        }
        let split = term
            .chars()
            .take_while(|c| Lexer::is_coefficient_char(*c))
            .count();
        // Coefficient characters are all ASCII, so the char count is also a byte offset
        if split > 0 && term[split..].starts_with(|c: char| c.is_whitespace()) {
            let text: String = term[..split]
                .chars()
                .filter(|c| *c != '(' && *c != ')')
                .collect();
            if let Ok(value) = text.parse::<f64>() {
                self.add_token(Token::Coefficient(value));
                let name = term[split..].trim();
                if !name.is_empty() {
                    self.add_token(Token::Identifier(name.to_string()));
                }
                return;
            }
        }
        self.add_token(Token::Identifier(term.trim_end().to_string()));
    }

    fn at_separator(&self) -> bool {
        self.source.len() >= self.current + 3
            && self.source[self.current] == ' '
            && self.source[self.current + 1] == '+'
            && self.source[self.current + 2] == ' '
    }

    fn is_coefficient_char(c: char) -> bool {
        c.is_ascii_digit() || matches!(c, '.' | '(' | ')' | 'e' | '-')
    }

    fn add_token(&mut self, token: Token) {
        self.tokens.push(token);
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }
}
