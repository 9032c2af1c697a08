//! Type extraction: what a document defines and what its fields reference.
//!
//! Extraction works on the token stream from [`lexer`](crate::lexer) with
//! trivia removed, over a deliberately loose grammar:
//!
//! ```text
//! declaration := ("type" | "interface") Identifier ["implements" ...] body?
//! body        := "{" ... "}"                 (braces matched by depth)
//! reference   := ":" "["* CapitalizedIdentifier   (inside a body)
//! ```
//!
//! Only capitalized declarations count as definitions. A declaration whose
//! body does not open before the next declaration, or never closes,
//! contributes no references. Nothing here fails: input that matches nothing
//! yields empty results.

use std::collections::{BTreeSet, HashSet};

use log::trace;

use strata_core::identifier::Id;

use crate::{
    lexer,
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Keyword a definition was introduced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    Type,
    Interface,
}

/// A type or interface definition site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    name: Spanned<Id>,
    kind: DefinitionKind,
    implements: Vec<Id>,
}

impl Definition {
    /// The defined name.
    pub fn name(&self) -> Id {
        *self.name.inner()
    }

    /// Span of the defined name in the document.
    pub fn span(&self) -> Span {
        self.name.span()
    }

    pub fn kind(&self) -> DefinitionKind {
        self.kind
    }

    /// Interface names listed in the `implements` clause, in source order.
    pub fn implements(&self) -> &[Id] {
        &self.implements
    }

    /// Returns `true` if the implements clause names `interface`.
    pub fn implements_interface(&self, interface: Id) -> bool {
        self.implements.contains(&interface)
    }
}

/// Everything the extractor learned about one document.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    definitions: Vec<Definition>,
    references: BTreeSet<Id>,
}

impl Extraction {
    /// Every capitalized definition site, in source order, repeats included.
    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    /// Defined names in order of first appearance, without repeats.
    pub fn defined_types(&self) -> Vec<Id> {
        let mut seen = HashSet::new();
        self.definitions
            .iter()
            .map(Definition::name)
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// First definition site of `name`, if any.
    pub fn definition(&self, name: Id) -> Option<&Definition> {
        self.definitions.iter().find(|def| def.name() == name)
    }

    /// Capitalized names found in field-type positions.
    pub fn references(&self) -> &BTreeSet<Id> {
        &self.references
    }
}

/// Extract definitions and references from document text.
pub fn extract(source: &str) -> Extraction {
    let tokens: Vec<PositionedToken<'_>> = lexer::tokenize(source)
        .into_iter()
        .filter(|token| !token.is_trivia())
        .collect();

    let scanner = Scanner { tokens: &tokens };
    let extraction = Extraction {
        definitions: scanner.definitions(),
        references: scanner.references(),
    };

    trace!(
        definitions = extraction.definitions.len(),
        references = extraction.references.len();
        "Document extracted"
    );

    extraction
}

/// Names defined by `type` / `interface` declarations, in order of first
/// appearance.
pub fn defined_types(source: &str) -> Vec<Id> {
    extract(source).defined_types()
}

/// Capitalized names referenced from field-type positions inside bodies.
pub fn referenced_types(source: &str) -> BTreeSet<Id> {
    extract(source).references
}

/// Walks a trivia-free token slice.
struct Scanner<'t, 'src> {
    tokens: &'t [PositionedToken<'src>],
}

impl<'src> Scanner<'_, 'src> {
    fn token(&self, idx: usize) -> Option<&Token<'src>> {
        self.tokens.get(idx).map(|positioned| &positioned.token)
    }

    /// Returns the declared name when a declaration starts at `idx`.
    fn declaration_at(&self, idx: usize) -> Option<(DefinitionKind, &'src str, Span)> {
        let kind = match self.token(idx)? {
            Token::Type => DefinitionKind::Type,
            Token::Interface => DefinitionKind::Interface,
            _ => return None,
        };
        let name_token = self.tokens.get(idx + 1)?;
        match name_token.token {
            Token::Identifier(name) => Some((kind, name, name_token.span)),
            _ => None,
        }
    }

    fn definitions(&self) -> Vec<Definition> {
        (0..self.tokens.len())
            .filter_map(|idx| {
                let (kind, name, span) = self.declaration_at(idx)?;
                let id = Id::new(name);
                if !id.is_capitalized() {
                    return None;
                }
                Some(Definition {
                    name: Spanned::new(id, span),
                    kind,
                    implements: self.implements_clause(idx + 2),
                })
            })
            .collect()
    }

    /// Identifiers after `implements` up to the body, a directive or the
    /// next declaration.
    fn implements_clause(&self, idx: usize) -> Vec<Id> {
        if self.token(idx) != Some(&Token::Implements) {
            return Vec::new();
        }

        let mut interfaces = Vec::new();
        let mut cursor = idx + 1;
        while let Some(token) = self.token(cursor) {
            match token {
                Token::LeftBrace | Token::RightBrace | Token::Punct('@') => break,
                _ if self.declaration_at(cursor).is_some() => break,
                Token::Identifier(name) => interfaces.push(Id::new(name)),
                _ => {}
            }
            cursor += 1;
        }
        interfaces
    }

    /// Index of the `{` opening the body of the declaration at `idx`.
    ///
    /// Only an implements clause and directives may sit between the name
    /// and the body. Anything else means the declaration has no body.
    fn body_open(&self, idx: usize) -> Option<usize> {
        let mut cursor = idx + 2;
        let mut in_implements = false;
        loop {
            match self.token(cursor)? {
                Token::LeftBrace => return Some(cursor),
                Token::Implements if !in_implements => in_implements = true,
                Token::Identifier(_) if in_implements => {}
                Token::Punct('&' | ',') if in_implements => {}
                Token::Punct('@') => {
                    in_implements = false;
                    cursor = self.directive_end(cursor)?;
                }
                _ => return None,
            }
            cursor += 1;
        }
    }

    /// Index of the last token of the directive starting at the `@` at `at`.
    fn directive_end(&self, at: usize) -> Option<usize> {
        let name = at + 1;
        if !matches!(self.token(name)?, Token::Identifier(_)) {
            return None;
        }
        if self.token(name + 1) != Some(&Token::LeftParen) {
            return Some(name);
        }

        let mut depth = 0usize;
        for (offset, positioned) in self.tokens[name + 1..].iter().enumerate() {
            match positioned.token {
                Token::LeftParen => depth += 1,
                Token::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(name + 1 + offset);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Index of the `}` matching the `{` at `open`.
    fn body_close(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (offset, positioned) in self.tokens[open..].iter().enumerate() {
            match positioned.token {
                Token::LeftBrace => depth += 1,
                Token::RightBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(open + offset);
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn references(&self) -> BTreeSet<Id> {
        let mut references = BTreeSet::new();
        let mut idx = 0;

        while idx < self.tokens.len() {
            let Some(body) = self
                .declaration_at(idx)
                .and_then(|_| self.body_open(idx))
                .and_then(|open| Some((open, self.body_close(open)?)))
            else {
                idx += 1;
                continue;
            };

            let (open, close) = body;
            self.collect_field_types(open + 1, close, &mut references);
            idx = close + 1;
        }

        references
    }

    /// Collects `: [* Name` patterns in `start..end`.
    fn collect_field_types(&self, start: usize, end: usize, into: &mut BTreeSet<Id>) {
        for idx in start..end {
            if self.token(idx) != Some(&Token::Colon) {
                continue;
            }
            let mut cursor = idx + 1;
            while cursor < end && self.token(cursor) == Some(&Token::LeftBracket) {
                cursor += 1;
            }
            if cursor >= end {
                continue;
            }
            if let Some(Token::Identifier(name)) = self.token(cursor) {
                let id = Id::new(name);
                if id.is_capitalized() {
                    into.insert(id);
                }
            }
        }
    }
}
