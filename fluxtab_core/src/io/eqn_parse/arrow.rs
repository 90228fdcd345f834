//! Split a reaction equation into its substrate and product sides
//!
//! The arrow is recognized by an explicit scan rather than a regular expression:
//! one or more shaft characters (`-` or `=` by default), optionally preceded by
//! `<` and/or followed by `>`. A `<` anywhere in the arrow marks the reaction
//! as reversible.

use thiserror::Error;

/// The shape of the arrow separating substrates from products
#[derive(Debug, Clone)]
pub struct ArrowPattern {
    /// Characters allowed in the arrow shaft
    shaft: Vec<char>,
}

impl Default for ArrowPattern {
    fn default() -> Self {
        ArrowPattern {
            shaft: vec!['-', '='],
        }
    }
}

/// A single arrow occurrence within an equation, as byte offsets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowMatch {
    /// Byte offset of the first character of the arrow
    pub start: usize,
    /// Byte offset one past the last character of the arrow
    pub end: usize,
    /// Whether the arrow includes a left-pointing head
    pub reversible: bool,
}

/// An equation split into its two sides
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitEquation<'eq> {
    /// Substrate side text, trimmed; empty for pure uptake reactions
    pub substrates: &'eq str,
    /// Product side text, trimmed; empty for pure secretion reactions
    pub products: &'eq str,
    /// Whether the reaction is permitted to run in both directions
    pub reversible: bool,
}

impl ArrowPattern {
    /// Create a pattern with a custom set of shaft characters
    pub fn new(shaft: &[char]) -> Self {
        ArrowPattern {
            shaft: shaft.to_vec(),
        }
    }

    /// Find every arrow occurrence in `equation`
    pub fn find(&self, equation: &str) -> Vec<ArrowMatch> {
        let chars: Vec<(usize, char)> = equation.char_indices().collect();
        let mut matches = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            if chars[i].1 != '<' && !self.is_shaft(chars[i].1) {
                i += 1;
                continue;
            }
            let start = i;
            let mut j = i;
            let mut reversible = false;
            if chars[j].1 == '<' {
                reversible = true;
                j += 1;
            }
            let shaft_start = j;
            while j < chars.len() && self.is_shaft(chars[j].1) {
                j += 1;
            }
            if j == shaft_start {
                // A '<' with no shaft behind it is not an arrow
                i += 1;
                continue;
            }
            if j < chars.len() && chars[j].1 == '>' {
                j += 1;
            }
            let end = if j < chars.len() {
                chars[j].0
            } else {
                equation.len()
            };
            matches.push(ArrowMatch {
                start: chars[start].0,
                end,
                reversible,
            });
            i = j;
        }
        matches
    }

    /// Split `equation` on its single arrow into substrate and product sides
    ///
    /// # Errors
    /// Returns a [`MalformedEquationError`] if the equation contains no arrow,
    /// or more than one.
    ///
    /// # Examples
    /// ```rust
    /// use fluxtab_core::io::eqn_parse::arrow::ArrowPattern;
    /// let split = ArrowPattern::default().split("akg + nadh <=> glu").unwrap();
    /// assert_eq!(split.substrates, "akg + nadh");
    /// assert_eq!(split.products, "glu");
    /// assert!(split.reversible);
    /// ```
    pub fn split<'eq>(
        &self,
        equation: &'eq str,
    ) -> Result<SplitEquation<'eq>, MalformedEquationError> {
        let matches = self.find(equation);
        match matches.as_slice() {
            [] => Err(MalformedEquationError::MissingArrow {
                equation: equation.to_string(),
            }),
            [arrow] => Ok(SplitEquation {
                substrates: equation[..arrow.start].trim(),
                products: equation[arrow.end..].trim(),
                reversible: arrow.reversible,
            }),
            found => Err(MalformedEquationError::MultipleArrows {
                equation: equation.to_string(),
                count: found.len(),
            }),
        }
    }

    fn is_shaft(&self, c: char) -> bool {
        self.shaft.contains(&c)
    }
}

/// Errors raised while locating the arrow of an equation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MalformedEquationError {
    /// The equation contains no arrow at all
    #[error("no arrow found in equation '{equation}'")]
    MissingArrow { equation: String },
    /// The equation contains more than one arrow
    #[error("found {count} arrows in equation '{equation}', expected exactly one")]
    MultipleArrows { equation: String, count: usize },
    /// The equation starts with a bracketed compartment tag, which is not supported
    #[error("equation '{equation}' begins with a compartment prefix, which is not supported")]
    CompartmentPrefix { equation: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn irreversible_arrow() {
        let split = ArrowPattern::default().split("A + 2 B -> C").unwrap();
        assert_eq!(split.substrates, "A + 2 B");
        assert_eq!(split.products, "C");
        assert!(!split.reversible);
    }

    #[test]
    fn reversible_arrows() {
        for equation in ["A <=> B", "A <-> B", "A <- B", "A<=>B"] {
            let split = ArrowPattern::default().split(equation).unwrap();
            assert!(split.reversible, "'{}' should be reversible", equation);
            assert_eq!(split.substrates, "A");
            assert_eq!(split.products, "B");
        }
    }

    #[test]
    fn long_shafts_are_one_arrow() {
        for equation in ["A --> B", "A ==> B", "A === B"] {
            let split = ArrowPattern::default().split(equation).unwrap();
            assert!(!split.reversible);
            assert_eq!(split.substrates, "A");
            assert_eq!(split.products, "B");
        }
    }

    #[test]
    fn empty_sides_are_legal() {
        let split = ArrowPattern::default().split(" -> D").unwrap();
        assert_eq!(split.substrates, "");
        assert_eq!(split.products, "D");

        let split = ArrowPattern::default().split("D -> ").unwrap();
        assert_eq!(split.substrates, "D");
        assert_eq!(split.products, "");
    }

    #[test]
    fn missing_arrow() {
        match ArrowPattern::default().split("A + B") {
            Err(MalformedEquationError::MissingArrow { equation }) => {
                assert_eq!(equation, "A + B")
            }
            other => panic!("expected MissingArrow, got {:?}", other),
        }
    }

    #[test]
    fn multiple_arrows() {
        match ArrowPattern::default().split("A -> B -> C") {
            Err(MalformedEquationError::MultipleArrows { count, .. }) => assert_eq!(count, 2),
            other => panic!("expected MultipleArrows, got {:?}", other),
        }
    }

    #[test]
    fn custom_shaft() {
        let arrow = ArrowPattern::new(&['~']);
        let split = arrow.split("A - B ~> C").unwrap();
        assert_eq!(split.substrates, "A - B");
        assert_eq!(split.products, "C");
    }

    #[test]
    fn rejoining_sides_reconstructs_the_equation() {
        let equation = "  A + 2 B  ->  C ";
        let arrow = ArrowPattern::default();
        let m = arrow.find(equation)[0];
        let split = arrow.split(equation).unwrap();
        let rebuilt = format!(
            "{} {} {}",
            split.substrates,
            &equation[m.start..m.end],
            split.products
        );
        assert_eq!(rebuilt, "A + 2 B -> C");
    }
}
