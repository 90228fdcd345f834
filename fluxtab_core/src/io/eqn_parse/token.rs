//! Module providing Token struct for lexing

/// Represents Tokens in one side of a reaction equation
#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    /// A leading numeric coefficient, e.g. the `2` in `"2 akg"`
    Coefficient(f64),
    /// A metabolite identifier; may contain inner whitespace
    Identifier(String),
    /// The literal `" + "` separating two terms
    Separator,
    Eof,
}
