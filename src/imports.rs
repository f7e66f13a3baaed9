//! Import-table construction from `use` statements and the `namespace`
//! declaration, plus short-name expansion to fully-qualified form.

use std::collections::HashMap;

use crate::NamespacePolicy;
use crate::token::{Token, TokenKind};

/// Last segment of a namespace-qualified name.
pub(crate) fn short_name(name: &str) -> &str {
    name.rsplit('\\').next().unwrap_or(name)
}

/// Mapping of short (imported) class names to fully-qualified names.
///
/// Derived fresh from the token stream on every resolution — nothing is
/// cached across calls, so the table is always a pure function of the
/// current buffer contents and can never go stale after an edit.
#[derive(Debug, Default)]
pub struct ImportTable {
    imports: HashMap<String, String>,
    namespace: Option<String>,
}

impl ImportTable {
    /// Scan the whole token stream for `use …;` imports and the first
    /// `namespace …;` declaration.
    ///
    /// Handled forms: `use A\B;`, `use A\B as X;`, comma lists
    /// `use A\B, C\D;`, and group imports `use App\{User, Post as P};`.
    /// `use function` / `use const` imports and closure `use ($x)`
    /// capture clauses are skipped.
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let mut table = Self::default();
        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            if token.is_keyword("namespace")
                && table.namespace.is_none()
                && let Some(next) = tokens.get(i + 1)
                && next.kind == TokenKind::Identifier
            {
                table.namespace = Some(next.text.trim_start_matches('\\').to_string());
                i += 2;
                continue;
            }
            if token.is_keyword("use") && !is_capture_clause(tokens, i) {
                i = table.scan_use_statement(tokens, i + 1);
                continue;
            }
            i += 1;
        }
        table
    }

    /// The `namespace` declaration the file opened with, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Expand a short class name to its fully-qualified form.
    ///
    /// Qualified names come back as written (leading `\` stripped), with
    /// the first segment expanded when it is an import alias. Unqualified
    /// names match an import alias first, then the final segment of any
    /// imported name; failing both, `policy` decides between prefixing
    /// the current namespace and returning the name untouched.
    pub fn qualify(&self, name: &str, policy: NamespacePolicy) -> String {
        let name = name.trim_start_matches('\\');
        if let Some((first, rest)) = name.split_once('\\') {
            if let Some(prefix) = self.imports.get(first) {
                return format!("{}\\{}", prefix, rest);
            }
            return name.to_string();
        }
        if let Some(fqn) = self.imports.get(name) {
            return fqn.clone();
        }
        if let Some(fqn) = self.imports.values().find(|v| short_name(v) == name) {
            return fqn.clone();
        }
        match policy {
            NamespacePolicy::CurrentNamespace => match &self.namespace {
                // Class names resolve against the current namespace and
                // never fall back to the global scope, unlike functions
                // and constants.
                Some(ns) => format!("{}\\{}", ns, name),
                None => name.to_string(),
            },
            NamespacePolicy::Bare => name.to_string(),
        }
    }

    /// Consume one `use` statement starting after the keyword; returns
    /// the index to resume scanning at.
    fn scan_use_statement(&mut self, tokens: &[Token], mut i: usize) -> usize {
        // `use function …` / `use const …` bring in non-class symbols.
        if tokens
            .get(i)
            .is_some_and(|t| t.is_keyword("function") || t.is_keyword("const"))
        {
            return skip_to_semicolon(tokens, i);
        }
        loop {
            let Some(name_token) = tokens.get(i) else {
                return i;
            };
            if name_token.kind != TokenKind::Identifier {
                return skip_to_semicolon(tokens, i);
            }
            let base = name_token.text.trim_start_matches('\\').to_string();
            i += 1;
            match tokens.get(i) {
                // Group import: `use App\{User, Post as P};`.
                Some(t)
                    if t.kind == TokenKind::Operator
                        && t.text == "\\"
                        && tokens
                            .get(i + 1)
                            .is_some_and(|t| t.kind == TokenKind::OpenBrace) =>
                {
                    i = self.scan_group_items(tokens, i + 2, &base);
                    return skip_to_semicolon(tokens, i);
                }
                // Alias: `use A\B as X;`.
                Some(t) if t.is_keyword("as") => {
                    if let Some(alias) = tokens.get(i + 1)
                        && alias.kind == TokenKind::Identifier
                    {
                        self.imports.insert(alias.text.clone(), base);
                        i += 2;
                    } else {
                        return skip_to_semicolon(tokens, i);
                    }
                }
                _ => {
                    self.imports.insert(short_name(&base).to_string(), base);
                }
            }
            match tokens.get(i) {
                Some(t) if t.kind == TokenKind::Comma => i += 1,
                _ => return skip_to_semicolon(tokens, i),
            }
        }
    }

    /// Consume the items of a group import until the closing brace.
    fn scan_group_items(&mut self, tokens: &[Token], mut i: usize, prefix: &str) -> usize {
        while let Some(token) = tokens.get(i) {
            match token.kind {
                TokenKind::CloseBrace => return i + 1,
                TokenKind::Comma => i += 1,
                TokenKind::Keyword
                    if token.is_keyword("function") || token.is_keyword("const") =>
                {
                    // `use App\{function helper};` — not a class import.
                    i = skip_group_item(tokens, i + 1);
                }
                TokenKind::Identifier => {
                    let fqn = format!("{}\\{}", prefix, token.text);
                    if tokens.get(i + 1).is_some_and(|t| t.is_keyword("as"))
                        && let Some(alias) = tokens.get(i + 2)
                        && alias.kind == TokenKind::Identifier
                    {
                        self.imports.insert(alias.text.clone(), fqn);
                        i += 3;
                    } else {
                        self.imports.insert(short_name(&fqn).to_string(), fqn.clone());
                        i += 1;
                    }
                }
                _ => i += 1,
            }
        }
        i
    }
}

/// A `use` directly after a closed parameter list is a closure capture
/// clause, not an import.
fn is_capture_clause(tokens: &[Token], use_idx: usize) -> bool {
    use_idx > 0 && tokens[use_idx - 1].kind == TokenKind::CloseParen
}

fn skip_to_semicolon(tokens: &[Token], mut i: usize) -> usize {
    while let Some(token) = tokens.get(i) {
        i += 1;
        if token.kind == TokenKind::Semicolon {
            break;
        }
    }
    i
}

fn skip_group_item(tokens: &[Token], mut i: usize) -> usize {
    while let Some(token) = tokens.get(i) {
        if matches!(token.kind, TokenKind::Comma | TokenKind::CloseBrace) {
            return i;
        }
        i += 1;
    }
    i
}
