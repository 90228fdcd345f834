//! Module for parsing reaction equation strings into stoichiometric terms

use thiserror::Error;

use crate::io::eqn_parse::arrow::{ArrowPattern, MalformedEquationError};
use crate::io::eqn_parse::lexer::Lexer;
use crate::io::eqn_parse::token::Token;

pub mod arrow;
mod lexer;
mod token;

/// A single stoichiometric term: a coefficient and a metabolite name
///
/// The coefficient is the unsigned magnitude as written in the equation; the
/// sign is applied later, when the term is attributed to a substrate or
/// product side.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    /// Stoichiometric coefficient, 1.0 when the equation does not spell one out
    pub coefficient: f64,
    /// Metabolite identifier, trimmed of surrounding whitespace
    pub metabolite: String,
}

/// A fully parsed reaction equation
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEquation {
    /// Terms on the substrate (left-hand) side
    pub substrates: Vec<Term>,
    /// Terms on the product (right-hand) side
    pub products: Vec<Term>,
    /// Whether the arrow allows the reaction to run in both directions
    pub reversible: bool,
}

/// Parse one side of an equation, yielding each term separately
///
/// Empty terms (an empty side, or a dangling `" + "`) are skipped. A term with
/// a coefficient but no metabolite identifier yields an `Err` entry, so callers
/// choose whether to fail or to drop the offending term.
pub fn parse_terms(side: &str) -> Vec<Result<Term, MalformedTermError>> {
    let mut lexer = Lexer::new(side);
    let mut parsed = Vec::new();
    let mut pending: Option<f64> = None;
    for token in lexer.scan_tokens() {
        match token {
            Token::Coefficient(value) => pending = Some(*value),
            Token::Identifier(name) => parsed.push(Ok(Term {
                coefficient: pending.take().unwrap_or(1.0),
                metabolite: name.clone(),
            })),
            Token::Separator | Token::Eof => {
                if let Some(coefficient) = pending.take() {
                    parsed.push(Err(MalformedTermError::MissingIdentifier { coefficient }));
                }
            }
        }
    }
    parsed
}

/// Parse one side of an equation into its terms, failing on the first malformed term
pub fn parse_side(side: &str) -> Result<Vec<Term>, MalformedTermError> {
    parse_terms(side).into_iter().collect()
}

/// Parse a reaction equation string into its substrate and product terms
///
/// # Examples
/// ```rust
/// use fluxtab_core::io::eqn_parse::arrow::ArrowPattern;
/// use fluxtab_core::io::eqn_parse::parse_equation;
/// let parsed = parse_equation("akg + 2 nadh <=> glu", &ArrowPattern::default()).unwrap();
/// assert!(parsed.reversible);
/// assert_eq!(parsed.substrates.len(), 2);
/// assert_eq!(parsed.products[0].metabolite, "glu");
/// ```
pub fn parse_equation(
    equation: &str,
    arrow: &ArrowPattern,
) -> Result<ParsedEquation, EquationParseError> {
    let split = arrow.split(equation)?;
    Ok(ParsedEquation {
        substrates: parse_side(split.substrates)?,
        products: parse_side(split.products)?,
        reversible: split.reversible,
    })
}

/// Reject the `[compartment]` prefix syntax some model collections use
///
/// Equations such as `"[c] : akg -> glu"` embed the compartment of every
/// metabolite in a bracketed tag at the start of the string. That notation is
/// not supported here and is refused up front rather than misparsed.
pub fn reject_compartment_prefix(equation: &str) -> Result<(), MalformedEquationError> {
    if equation.trim_start().starts_with('[') {
        return Err(MalformedEquationError::CompartmentPrefix {
            equation: equation.to_string(),
        });
    }
    Ok(())
}

/// Enum representing possible term parse errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MalformedTermError {
    /// A coefficient was written without a metabolite after it
    #[error("term with coefficient {coefficient} has no metabolite identifier")]
    MissingIdentifier { coefficient: f64 },
}

/// Enum representing possible equation parse errors
#[derive(Debug, Error)]
pub enum EquationParseError {
    /// Error occurred while splitting the equation on its arrow
    #[error("error occurred during splitting (location of the equation arrow)")]
    SplitError(#[from] MalformedEquationError),
    /// Error occurred while parsing the terms of one side
    #[error("error occurred during term parsing (conversion of a side to terms)")]
    TermError(#[from] MalformedTermError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_terms_defaults_coefficient() {
        let terms = parse_side("akg + 2 nadh + (0.5) glu").unwrap();
        assert_eq!(
            terms,
            vec![
                Term {
                    coefficient: 1.0,
                    metabolite: String::from("akg")
                },
                Term {
                    coefficient: 2.0,
                    metabolite: String::from("nadh")
                },
                Term {
                    coefficient: 0.5,
                    metabolite: String::from("glu")
                },
            ]
        );
    }

    #[test]
    fn test_empty_side_has_no_terms() {
        assert!(parse_side("").unwrap().is_empty());
        assert!(parse_side("   ").unwrap().is_empty());
    }

    #[test]
    fn test_dangling_coefficient_is_malformed() {
        match parse_side("akg + 2 ") {
            Err(MalformedTermError::MissingIdentifier { coefficient }) => {
                assert_eq!(coefficient, 2.0)
            }
            other => panic!("expected MissingIdentifier, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_terms_keeps_good_terms_around_bad_ones() {
        let parsed = parse_terms("2  + akg");
        assert_eq!(parsed.len(), 2);
        assert!(parsed[0].is_err());
        assert_eq!(
            parsed[1],
            Ok(Term {
                coefficient: 1.0,
                metabolite: String::from("akg")
            })
        );
    }

    #[test]
    fn test_parse_equation() {
        let parsed = parse_equation("A + 2 B -> C", &ArrowPattern::default()).unwrap();
        assert!(!parsed.reversible);
        assert_eq!(parsed.substrates.len(), 2);
        assert_eq!(parsed.products.len(), 1);
        assert_eq!(parsed.substrates[1].coefficient, 2.0);
        assert_eq!(parsed.products[0].metabolite, "C");
    }

    #[test]
    fn test_round_trip_of_terms() {
        let original = "1 akg + 2.5 nadh";
        let terms = parse_side(original).unwrap();
        let rebuilt = terms
            .iter()
            .map(|t| format!("{} {}", t.coefficient, t.metabolite))
            .collect::<Vec<_>>()
            .join(" + ");
        assert_eq!(rebuilt, original);
        assert_eq!(parse_side(&rebuilt).unwrap(), terms);
    }

    #[test]
    fn test_compartment_prefix_rejected() {
        match reject_compartment_prefix("[c] : akg -> glu") {
            Err(MalformedEquationError::CompartmentPrefix { .. }) => {}
            other => panic!("expected CompartmentPrefix, got {:?}", other),
        }
        assert!(reject_compartment_prefix("akg -> glu").is_ok());
    }
}
