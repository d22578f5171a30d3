//! Formula scanner
//!
//! A single forward pass over formula text that finds reference-shaped
//! fragments and skips everything else. It knows only syntax: sheet names
//! are not resolved here, so the same pass serves both reference extraction
//! and shared formula translation.

use crate::error::{FormulaError, FormulaResult};
use cellgraph_core::CellAddress;
use std::borrow::Cow;
use std::ops::Range;

/// Sheet qualifier in front of a reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SheetPrefix<'a> {
    /// `Sheet1!` or `'My Sheet'!`
    Single(Cow<'a, str>),
    /// `First:Last!` or `'First:Last'!`
    Span(Cow<'a, str>, Cow<'a, str>),
    /// `[1]Sheet1!` or `'[Book.xlsx]Sheet1'!`
    External,
}

/// A cell address together with where it sits in the formula text
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Located {
    pub address: CellAddress,
    pub span: Range<usize>,
}

/// A reference as written, before sheet resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawReference<'a> {
    pub prefix: Option<SheetPrefix<'a>>,
    pub first: Located,
    pub second: Option<Located>,
}

impl RawReference<'_> {
    /// Byte span of the address part (without the sheet prefix)
    pub fn area_span(&self) -> Range<usize> {
        let end = self.second.as_ref().map_or(self.first.span.end, |s| s.span.end);
        self.first.span.start..end
    }
}

/// Scans formula text, yielding raw references in source order
///
/// A malformed formula yields a single error and then stops.
pub(crate) struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    paren_depth: usize,
    brace_depth: usize,
    /// Position just after the last `]`, used to spot `[1]Sheet1!A1`
    bracket_end: Option<usize>,
    finished: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        let trimmed = input.trim_start();
        let mut pos = input.len() - trimmed.len();
        if trimmed.starts_with('=') {
            pos += 1;
        }
        Self {
            input,
            pos,
            paren_depth: 0,
            brace_depth: 0,
            bracket_end: None,
            finished: false,
        }
    }

    // === Token scanning ===

    fn scan_next(&mut self) -> FormulaResult<Option<RawReference<'a>>> {
        while let Some(c) = self.peek_char() {
            match c {
                '"' => self.skip_string()?,
                '#' => self.skip_error_literal(),
                '(' => {
                    self.paren_depth += 1;
                    self.advance();
                }
                ')' => {
                    if self.paren_depth == 0 {
                        return Err(self.error("unmatched ')'"));
                    }
                    self.paren_depth -= 1;
                    self.advance();
                }
                '{' => {
                    self.brace_depth += 1;
                    self.advance();
                }
                '}' => {
                    if self.brace_depth == 0 {
                        return Err(self.error("unmatched '}'"));
                    }
                    self.brace_depth -= 1;
                    self.advance();
                }
                '[' => self.skip_brackets()?,
                ']' => return Err(self.error("unmatched ']'")),
                '\'' => {
                    if let Some(reference) = self.scan_quoted_prefix()? {
                        return Ok(Some(reference));
                    }
                }
                c if c.is_ascii_digit() || c == '.' => self.skip_number(),
                c if is_word_start(c) => {
                    if let Some(reference) = self.scan_word()? {
                        return Ok(Some(reference));
                    }
                }
                _ => self.advance(),
            }
        }

        if self.paren_depth > 0 {
            return Err(self.error("unclosed '('"));
        }
        if self.brace_depth > 0 {
            return Err(self.error("unclosed '{'"));
        }
        Ok(None)
    }

    /// A word: function name, defined name, boolean, bare sheet prefix or address
    fn scan_word(&mut self) -> FormulaResult<Option<RawReference<'a>>> {
        let start = self.pos;
        let external = self.bracket_end == Some(start);
        let word = self.take_word();

        match self.peek_char() {
            Some('!') => {
                self.advance();
                let prefix = if external {
                    SheetPrefix::External
                } else {
                    SheetPrefix::Single(Cow::Borrowed(word))
                };
                return self.scan_after_prefix(prefix, start);
            }
            // Function call; the parenthesis is counted by the main loop
            Some('(') => return Ok(None),
            Some(':') if self.peek_char_at(1).map_or(false, is_word_start) => {
                let colon = self.pos;
                self.advance();
                let last = self.take_word();
                if self.peek_char() == Some('!') {
                    self.advance();
                    let prefix = if external {
                        SheetPrefix::External
                    } else {
                        SheetPrefix::Span(Cow::Borrowed(word), Cow::Borrowed(last))
                    };
                    return self.scan_after_prefix(prefix, start);
                }
                self.pos = colon;
            }
            _ => {}
        }

        self.pos = start;
        if let Some((first, second)) = self.scan_area(None) {
            return Ok(Some(RawReference {
                prefix: None,
                first,
                second,
            }));
        }

        // Defined name, boolean or bare column letters
        self.pos = start + word.len();
        Ok(None)
    }

    fn scan_quoted_prefix(&mut self) -> FormulaResult<Option<RawReference<'a>>> {
        let start = self.pos;
        let Some(name) = self.quoted_name() else {
            return Err(FormulaError::parse(start, "unterminated sheet name"));
        };

        if self.peek_char() != Some('!') {
            return Err(FormulaError::parse(start, "quoted sheet name must be followed by '!'"));
        }
        self.advance();

        self.scan_after_prefix(classify_quoted(name), start)
    }

    /// The unescaped body of `'...'`, leaving the position after the closing quote
    fn quoted_name(&mut self) -> Option<Cow<'a, str>> {
        self.advance(); // Skip opening quote

        let body_start = self.pos;
        let mut escaped = None::<String>;
        loop {
            match self.peek_char() {
                None => return None,
                Some('\'') if self.peek_char_at(1) == Some('\'') => {
                    let buf = escaped.get_or_insert_with(|| self.input[body_start..self.pos].to_string());
                    buf.push('\'');
                    self.advance();
                    self.advance();
                }
                Some('\'') => break,
                Some(c) => {
                    if let Some(buf) = escaped.as_mut() {
                        buf.push(c);
                    }
                    self.advance();
                }
            }
        }
        let name = match escaped {
            Some(buf) => Cow::Owned(buf),
            None => Cow::Borrowed(&self.input[body_start..self.pos]),
        };
        self.advance(); // Skip closing quote
        Some(name)
    }

    fn scan_after_prefix(
        &mut self,
        prefix: SheetPrefix<'a>,
        start: usize,
    ) -> FormulaResult<Option<RawReference<'a>>> {
        if let Some((first, second)) = self.scan_area(Some(&prefix)) {
            return Ok(Some(RawReference {
                prefix: Some(prefix),
                first,
                second,
            }));
        }

        match self.peek_char() {
            // Sheet1!#REF!
            Some('#') => {
                self.skip_error_literal();
                Ok(None)
            }
            // Sheet-scoped name, whole columns (A:C) or whole rows (1:3)
            Some(c) if is_word_char(c) => {
                self.take_word();
                if self.peek_char() == Some(':') && self.peek_char_at(1).map_or(false, is_word_char) {
                    self.advance();
                    self.take_word();
                }
                Ok(None)
            }
            _ => Err(FormulaError::parse(start, "sheet prefix without a reference")),
        }
    }

    /// `A1` or `A1:B2` at the current position, with no whitespace around `:`
    ///
    /// The second corner may repeat the sheet prefix of the first
    /// (`Data!A1:Data!B2`, `'My Sheet'!A1:'My Sheet'!B2`).
    fn scan_area(&mut self, prefix: Option<&SheetPrefix<'a>>) -> Option<(Located, Option<Located>)> {
        let first = self.scan_cell()?;
        if self.peek_char() == Some(':') {
            let colon = self.pos;
            self.advance();
            if let Some(second) = self.scan_cell() {
                return Some((first, Some(second)));
            }
            if let Some(SheetPrefix::Single(sheet)) = prefix {
                if self.skip_repeated_prefix(sheet) {
                    if let Some(second) = self.scan_cell() {
                        return Some((first, Some(second)));
                    }
                }
            }
            self.pos = colon;
        }
        Some((first, None))
    }

    /// Step over `sheet!` or `'sheet'!` when it names `sheet` (ignoring case)
    fn skip_repeated_prefix(&mut self, sheet: &str) -> bool {
        let name = match self.peek_char() {
            Some('\'') => match self.quoted_name() {
                Some(name) => name,
                None => return false,
            },
            Some(c) if is_word_start(c) => Cow::Borrowed(self.take_word()),
            _ => return false,
        };
        if self.peek_char() != Some('!') || name.to_lowercase() != sheet.to_lowercase() {
            return false;
        }
        self.advance();
        true
    }

    /// `$?letters$?digits`, not followed by anything that continues a name
    ///
    /// Rejects function names (`LOG10(`), sheet names (`Q1!`) and tables
    /// (`Tbl1[Col]`) that happen to look like addresses.
    fn scan_cell(&mut self) -> Option<Located> {
        let start = self.pos;
        if self.peek_char() == Some('$') {
            self.advance();
        }
        let letters = self.pos;
        while self.peek_char().map_or(false, |c| c.is_ascii_alphabetic()) {
            self.advance();
        }
        let ok = self.pos > letters && {
            if self.peek_char() == Some('$') {
                self.advance();
            }
            let digits = self.pos;
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
            self.pos > digits
        };
        let ok = ok && !self.peek_char().map_or(false, |c| is_word_char(c) || matches!(c, '(' | '!' | '['));

        let address = if ok {
            CellAddress::parse(&self.input[start..self.pos]).ok()
        } else {
            None
        };
        match address {
            Some(address) => Some(Located {
                address,
                span: start..self.pos,
            }),
            None => {
                self.pos = start;
                None
            }
        }
    }

    fn take_word(&mut self) -> &'a str {
        let input = self.input;
        let start = self.pos;
        while self.peek_char().map_or(false, is_word_char) {
            self.advance();
        }
        &input[start..self.pos]
    }

    // === Skipped constructs ===

    fn skip_string(&mut self) -> FormulaResult<()> {
        let start = self.pos;
        self.advance(); // Skip opening quote

        loop {
            match self.peek_char() {
                None => return Err(FormulaError::parse(start, "unterminated string")),
                Some('"') if self.peek_char_at(1) == Some('"') => {
                    self.advance();
                    self.advance();
                }
                Some('"') => {
                    self.advance();
                    return Ok(());
                }
                Some(_) => self.advance(),
            }
        }
    }

    /// `#REF!`, `#N/A`, `#DIV/0!`, `#NAME?` and friends
    fn skip_error_literal(&mut self) {
        self.advance();
        while self
            .peek_char()
            .map_or(false, |c| c.is_ascii_alphanumeric() || c == '/' || c == '_')
        {
            self.advance();
        }
        if matches!(self.peek_char(), Some('!') | Some('?')) {
            self.advance();
        }
    }

    fn skip_number(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_ascii_digit() || c == '.') {
            self.advance();
        }
        if matches!(self.peek_char(), Some('e') | Some('E')) {
            let sign = matches!(self.peek_char_at(1), Some('+') | Some('-'));
            let digit_at = if sign { 2 } else { 1 };
            if self.peek_char_at(digit_at).map_or(false, |c| c.is_ascii_digit()) {
                for _ in 0..digit_at {
                    self.advance();
                }
                while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }
    }

    /// Structured references and external workbook indexes: `[...]`, nested
    ///
    /// Inside brackets `'` escapes the next character.
    fn skip_brackets(&mut self) -> FormulaResult<()> {
        let start = self.pos;
        let mut depth = 0usize;
        loop {
            match self.peek_char() {
                None => return Err(FormulaError::parse(start, "unclosed '['")),
                Some('[') => depth += 1,
                Some(']') => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        self.bracket_end = Some(self.pos);
                        return Ok(());
                    }
                }
                Some('\'') => self.advance(),
                Some(_) => {}
            }
            self.advance();
        }
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn error(&self, message: &str) -> FormulaError {
        FormulaError::parse(self.pos, message)
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = FormulaResult<RawReference<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.scan_next() {
            Ok(Some(reference)) => Some(Ok(reference)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '\\' || c == '$'
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '\\' | '.' | '$' | '?')
}

/// Split the body of a quoted prefix into its sheet qualifier
fn classify_quoted(name: Cow<'_, str>) -> SheetPrefix<'_> {
    if name.contains('[') {
        return SheetPrefix::External;
    }
    match name {
        Cow::Borrowed(s) => match s.split_once(':') {
            Some((first, last)) => SheetPrefix::Span(Cow::Borrowed(first), Cow::Borrowed(last)),
            None => SheetPrefix::Single(Cow::Borrowed(s)),
        },
        Cow::Owned(s) => match s.split_once(':') {
            Some((first, last)) => {
                SheetPrefix::Span(Cow::Owned(first.to_string()), Cow::Owned(last.to_string()))
            }
            None => SheetPrefix::Single(Cow::Owned(s)),
        },
    }
}
