//! Shared formula translation
//!
//! XLSX files store a shared formula once, on its anchor cell. Every other
//! cell of the group refers back to it and must see the anchor text with its
//! relative references moved by the cell's offset from the anchor.

use crate::error::FormulaResult;
use crate::scanner::Scanner;

/// Rewrite `formula` as if it were copied `row_offset` rows down and
/// `col_offset` columns right
///
/// Absolute (`$`) parts stay put. A reference pushed off the grid becomes
/// `#REF!`, keeping its sheet prefix.
///
/// # Example
/// ```rust
/// use cellgraph_formula::translate_formula;
///
/// let child = translate_formula("=A1*$B$1+Data!C$2", 2, 1).unwrap();
/// assert_eq!(child, "=B3*$B$1+Data!D$2");
/// ```
pub fn translate_formula(formula: &str, row_offset: i64, col_offset: i64) -> FormulaResult<String> {
    let mut out = String::with_capacity(formula.len());
    let mut copied = 0;

    for raw in Scanner::new(formula) {
        let raw = raw?;
        let area = raw.area_span();
        out.push_str(&formula[copied..area.start]);

        let first = raw.first.address.offset(row_offset, col_offset);
        match &raw.second {
            None => match first {
                Some(addr) => out.push_str(&addr.to_a1_string()),
                None => out.push_str("#REF!"),
            },
            Some(second) => match (first, second.address.offset(row_offset, col_offset)) {
                (Some(a), Some(b)) => {
                    out.push_str(&a.to_a1_string());
                    // `:` and any repeated sheet prefix
                    out.push_str(&formula[raw.first.span.end..second.span.start]);
                    out.push_str(&b.to_a1_string());
                }
                _ => out.push_str("#REF!"),
            },
        }
        copied = area.end;
    }

    out.push_str(&formula[copied..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_zero_offset_is_identity() {
        let formula = "=SUM(a1:B2)+'My Sheet'!$C$3*\"A1\"";
        assert_eq!(translate_formula(formula, 0, 0).unwrap(), "=SUM(A1:B2)+'My Sheet'!$C$3*\"A1\"");
    }

    #[test]
    fn test_relative_parts_move() {
        assert_eq!(translate_formula("=A1+B2", 1, 0).unwrap(), "=A2+B3");
        assert_eq!(translate_formula("=SUM(A1:A3)", 0, 2).unwrap(), "=SUM(C1:C3)");
        assert_eq!(translate_formula("=$A1+A$1", 4, 4).unwrap(), "=$A5+E$1");
    }

    #[test]
    fn test_prefixes_and_literals_are_kept() {
        assert_eq!(
            translate_formula("=Jan:Mar!B2+'Bob''s'!A1&\"B2\"+LOG10(C1)", 1, 1).unwrap(),
            "=Jan:Mar!C3+'Bob''s'!B2&\"B2\"+LOG10(D2)"
        );
    }

    #[test]
    fn test_repeated_prefix_is_kept() {
        assert_eq!(
            translate_formula("=SUM(Data!A1:Data!B2)", 1, 0).unwrap(),
            "=SUM(Data!A2:Data!B3)"
        );
        assert_eq!(
            translate_formula("='My Sheet'!A1:'My Sheet'!$B$2", 0, 1).unwrap(),
            "='My Sheet'!B1:'My Sheet'!$B$2"
        );
    }

    #[test]
    fn test_off_grid_becomes_ref_error() {
        assert_eq!(translate_formula("=A1+B1", 0, -1).unwrap(), "=#REF!+A1");
        assert_eq!(translate_formula("=Data!A1:B2", -1, 0).unwrap(), "=Data!#REF!");
        assert_eq!(translate_formula("=XFD1", 0, 1).unwrap(), "=#REF!");
    }

    #[test]
    fn test_malformed_formula_is_an_error() {
        assert!(translate_formula("=SUM(A1", 1, 1).is_err());
    }
}
