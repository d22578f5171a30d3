//! Reference extraction
//!
//! Turns formula text into the cells and ranges it reads from. Sheet names
//! are resolved against a [`SheetResolver`]; references that cannot be
//! resolved (unknown sheets, other workbooks) are left out.

use crate::error::FormulaResult;
use crate::reference::ReferenceToken;
use crate::scanner::{RawReference, Scanner, SheetPrefix};
use cellgraph_core::{Cell, CellCoord, CellRange, SheetId, SheetResolver};

/// Extract the references of a formula, lazily, in source order
///
/// Unqualified addresses resolve to `current_sheet`. A malformed formula
/// yields one [`FormulaError::Parse`](crate::FormulaError::Parse) after
/// whatever references preceded the problem, then ends.
///
/// # Example
/// ```rust
/// use cellgraph_core::Workbook;
/// use cellgraph_formula::references;
///
/// let wb = Workbook::new();
/// let sheet = wb.active_sheet();
/// let refs: Vec<_> = references("=SUM(A1:A3)+B1", sheet, &wb)
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(refs.len(), 2);
/// ```
pub fn references<'a, R>(
    formula: &'a str,
    current_sheet: SheetId,
    resolver: &'a R,
) -> References<'a, R>
where
    R: SheetResolver + ?Sized,
{
    References {
        scanner: Scanner::new(formula),
        current_sheet,
        resolver,
    }
}

/// Extract all references of a formula
///
/// A malformed formula has no references: the error is logged at debug
/// level and an empty list returned.
pub fn tokenize<R>(formula: &str, current_sheet: SheetId, resolver: &R) -> Vec<ReferenceToken>
where
    R: SheetResolver + ?Sized,
{
    match references(formula, current_sheet, resolver).collect::<FormulaResult<Vec<_>>>() {
        Ok(refs) => refs,
        Err(e) => {
            log::debug!("skipping malformed formula '{}': {}", formula, e);
            Vec::new()
        }
    }
}

/// Extract the references of a cell; anything but a formula has none
pub fn cell_references<R>(cell: &Cell, at: CellCoord, resolver: &R) -> Vec<ReferenceToken>
where
    R: SheetResolver + ?Sized,
{
    match cell.formula_text() {
        Some(formula) => tokenize(formula, at.sheet, resolver),
        None => Vec::new(),
    }
}

/// Iterator returned by [`references`]
pub struct References<'a, R: ?Sized> {
    scanner: Scanner<'a>,
    current_sheet: SheetId,
    resolver: &'a R,
}

impl<'a, R> References<'a, R>
where
    R: SheetResolver + ?Sized,
{
    fn resolve(&self, raw: RawReference<'_>) -> Option<ReferenceToken> {
        let (first_sheet, last_sheet, spans_sheets) = match &raw.prefix {
            None => (self.current_sheet, self.current_sheet, false),
            Some(SheetPrefix::Single(name)) => {
                let id = self.lookup(name)?;
                (id, id, false)
            }
            Some(SheetPrefix::Span(first, last)) => (self.lookup(first)?, self.lookup(last)?, true),
            Some(SheetPrefix::External) => {
                log::trace!("ignoring external workbook reference");
                return None;
            }
        };

        let start = CellCoord::from_address(first_sheet, &raw.first.address);
        let token = match &raw.second {
            None if !spans_sheets => ReferenceToken::Single(start),
            None => ReferenceToken::Range(CellRange::new(
                start,
                CellCoord::from_address(last_sheet, &raw.first.address),
            )),
            Some(second) => ReferenceToken::Range(CellRange::new(
                start,
                CellCoord::from_address(last_sheet, &second.address),
            )),
        };
        Some(token)
    }

    fn lookup(&self, name: &str) -> Option<SheetId> {
        let id = self.resolver.resolve_sheet(name);
        if id.is_none() {
            log::trace!("ignoring reference to unknown sheet '{}'", name);
        }
        id
    }
}

impl<'a, R> Iterator for References<'a, R>
where
    R: SheetResolver + ?Sized,
{
    type Item = FormulaResult<ReferenceToken>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.scanner.next()? {
                Ok(raw) => {
                    if let Some(token) = self.resolve(raw) {
                        return Some(Ok(token));
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FormulaError;
    use cellgraph_core::Workbook;
    use pretty_assertions::assert_eq;

    /// Sheet1, Data, "My Sheet", "Bob's", Jan, Feb, Mar
    fn workbook() -> Workbook {
        let mut wb = Workbook::new();
        for name in ["Data", "My Sheet", "Bob's", "Jan", "Feb", "Mar"] {
            wb.add_worksheet_with_name(name).unwrap();
        }
        wb
    }

    fn at(sheet: usize, a1: &str) -> CellCoord {
        let addr = cellgraph_core::CellAddress::parse(a1).unwrap();
        CellCoord::from_address(SheetId::new(sheet), &addr)
    }

    fn single(sheet: usize, a1: &str) -> ReferenceToken {
        ReferenceToken::Single(at(sheet, a1))
    }

    fn range(s1: usize, a: &str, s2: usize, b: &str) -> ReferenceToken {
        ReferenceToken::Range(CellRange::new(at(s1, a), at(s2, b)))
    }

    fn tok(formula: &str) -> Vec<ReferenceToken> {
        tokenize(formula, SheetId::new(0), &workbook())
    }

    #[test]
    fn test_simple_references() {
        assert_eq!(tok("=A1+B2"), vec![single(0, "A1"), single(0, "B2")]);
        assert_eq!(tok("A1"), vec![single(0, "A1")]);
        assert_eq!(tok("=$c$7"), vec![single(0, "C7")]);
    }

    #[test]
    fn test_current_sheet() {
        let refs = tokenize("=A1", SheetId::new(2), &workbook());
        assert_eq!(refs, vec![single(2, "A1")]);
    }

    #[test]
    fn test_ranges_are_normalized() {
        assert_eq!(tok("=SUM(A1:B3)"), vec![range(0, "A1", 0, "B3")]);
        assert_eq!(tok("=SUM(B3:A1)"), vec![range(0, "A1", 0, "B3")]);
        assert_eq!(tok("=SUM(A3:B1)"), vec![range(0, "A1", 0, "B3")]);
    }

    #[test]
    fn test_sheet_qualified() {
        assert_eq!(
            tok("=Data!A1+'My Sheet'!B2+'Bob''s'!C3+data!D4"),
            vec![
                single(1, "A1"),
                single(2, "B2"),
                single(3, "C3"),
                single(1, "D4"),
            ]
        );
        assert_eq!(tok("=SUM(Data!A1:B2)"), vec![range(1, "A1", 1, "B2")]);
    }

    #[test]
    fn test_second_corner_may_repeat_the_sheet() {
        assert_eq!(tok("=SUM(Sheet1!A1:Sheet1!B2)"), vec![range(0, "A1", 0, "B2")]);
        assert_eq!(
            tok("=SUM('My Sheet'!A1:'My Sheet'!B1)+Data!C1:DATA!C3"),
            vec![range(2, "A1", 2, "B1"), range(1, "C1", 1, "C3")]
        );
        assert_eq!(
            tok("=Data!A1:Jan!B2"),
            vec![single(1, "A1"), single(4, "B2")]
        );
    }

    #[test]
    fn test_three_d_references() {
        assert_eq!(tok("=SUM(Jan:Mar!B2)"), vec![range(4, "B2", 6, "B2")]);
        assert_eq!(tok("=SUM(Mar:Jan!B2)"), vec![range(4, "B2", 6, "B2")]);
        assert_eq!(tok("=SUM('Jan:Feb'!A1:B2)"), vec![range(4, "A1", 5, "B2")]);
    }

    #[test]
    fn test_unresolvable_references_are_omitted() {
        assert_eq!(tok("=Nope!A1+B1"), vec![single(0, "B1")]);
        assert!(tok("=SUM(Jan:Nope!A1)").is_empty());
        assert!(tok("=[1]Data!A1+'[Book.xlsx]Data'!A2").is_empty());
    }

    #[test]
    fn test_non_references_are_skipped() {
        assert_eq!(
            tok("=IF(A1>0,\"B1\",SUM(C:C))+LOG10(D1)+Total+#REF!+{1,2}"),
            vec![single(0, "A1"), single(0, "D1")]
        );
    }

    #[test]
    fn test_malformed_formula_has_no_references() {
        assert!(tok("=A1+\"open").is_empty());
        assert!(tok("=SUM(A1").is_empty());
        assert!(tok("=A1+Data!").is_empty());
    }

    #[test]
    fn test_references_iterator_reports_parse_error() {
        let wb = workbook();
        let items: Vec<_> = references("=A1+(B1", SheetId::new(0), &wb).collect();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], Ok(single(0, "A1")));
        assert_eq!(items[1], Ok(single(0, "B1")));
        assert!(matches!(items[2], Err(FormulaError::Parse { .. })));
    }

    #[test]
    fn test_cell_references() {
        let wb = workbook();
        let here = at(0, "Z1");
        assert_eq!(
            cell_references(&Cell::formula("=A1"), here, &wb),
            vec![single(0, "A1")]
        );
        assert!(cell_references(&Cell::Text("=A1".into()), here, &wb).is_empty());
        assert!(cell_references(&Cell::Blank, here, &wb).is_empty());
    }

    #[test]
    fn test_dyn_resolver() {
        let wb = workbook();
        let resolver: &dyn SheetResolver = &wb;
        assert_eq!(tokenize("=Mar!A1", SheetId::new(0), resolver), vec![single(6, "A1")]);
    }
}
