//! Model class resolver: follows an alias token back to the class that
//! declared it.
//!
//! Case analysis on how the alias was introduced, nearest binding first:
//!
//!   1. static class reference (`User::`, `self::`, `static::`)
//!   2. parameter of an enclosing function or closure; an untyped
//!      closure parameter proxies the result of the chain the closure
//!      is attached to and resolves recursively one scope up
//!   3. nearest prior assignment in the same or an enclosing scope
//!
//! followed by import-table expansion of the short name. Every dead end
//! is a `None`, never an error: the consumer degrades to showing no
//! suggestions.

use tracing::{debug, trace};

use crate::Config;
use crate::imports::ImportTable;
use crate::scan;
use crate::token::{Token, TokenKind};

/// Upper bound on cross-scope and cross-variable recursion. Cyclic
/// assignments (`$a = $b; $b = $a;`) degrade to `None` instead of
/// spinning.
const MAX_DEPTH: u32 = 8;

/// Resolve the alias token at `alias` to a fully-qualified class name.
///
/// The token sequence is the same one the alias index was produced from;
/// the import table is rebuilt from it on every call, so the result only
/// depends on the arguments.
pub fn resolve(tokens: &[Token], alias: usize, config: &Config) -> Option<String> {
    let short = short_class_name(tokens, alias, 0)?;
    let table = ImportTable::from_tokens(tokens);
    let fqcn = table.qualify(&short, config.namespace_policy);
    debug!(%short, %fqcn, "resolved alias");
    Some(fqcn)
}

/// The short (as-written) class name behind the alias token.
fn short_class_name(tokens: &[Token], alias: usize, depth: u32) -> Option<String> {
    if depth > MAX_DEPTH {
        return None;
    }
    let token = tokens.get(alias)?;
    match token.kind {
        TokenKind::Identifier | TokenKind::Keyword => {
            // Only a static class reference names a class directly; a
            // bare identifier root (function call, property, constant)
            // does not.
            let at_static_call = tokens
                .get(alias + 1)
                .is_some_and(|t| t.kind == TokenKind::DoubleColon);
            if !at_static_call {
                return None;
            }
            if token.is_keyword("self") || token.is_keyword("static") {
                enclosing_class_name(tokens, alias)
            } else if token.kind == TokenKind::Identifier {
                Some(token.text.clone())
            } else {
                None
            }
        }
        TokenKind::Variable => resolve_variable(tokens, alias, depth),
        _ => None,
    }
}

/// Resolve a `$variable` alias with a single scope-aware backward walk.
///
/// Nearest binding wins: an assignment found before leaving the
/// innermost enclosing callable beats that callable's parameter, which
/// beats anything further out. Sibling closure bodies encountered on
/// the way are skipped wholesale — their bindings are invisible here —
/// while plain `{ … }` blocks (if / loops) are transparent, matching
/// PHP's function-level variable scoping.
fn resolve_variable(tokens: &[Token], alias: usize, depth: u32) -> Option<String> {
    let name = tokens[alias].text.clone();
    let mut i = alias;
    while i > 0 {
        i -= 1;
        match tokens[i].kind {
            TokenKind::Variable if tokens[i].text == name => {
                if tokens
                    .get(i + 1)
                    .is_some_and(|t| t.kind == TokenKind::Assign)
                {
                    if let Some(found) = resolve_assignment_rhs(tokens, i + 2, depth) {
                        return Some(found);
                    }
                    // Unrecognised right-hand side: keep walking for an
                    // earlier, resolvable binding.
                    trace!(var = %name, "skipping unresolvable assignment");
                }
            }
            TokenKind::CloseBrace => {
                // A completed block behind us. Closure bodies are opaque
                // (they have their own scope); everything else is walked
                // into as usual.
                if let Some(open) = scan::matching_open_brace(tokens, i)
                    && let Some(header) = scan::callable_header_before(tokens, open)
                {
                    i = header.fn_kw;
                }
            }
            TokenKind::OpenBrace => {
                // Unmatched open brace: we are leaving the current block.
                if let Some(header) = scan::callable_header_before(tokens, i) {
                    if let Some((_, hint)) =
                        scan::find_param(tokens, header.params_open, header.params_close, &name)
                    {
                        return match hint {
                            Some(h) => Some(tokens[h].text.clone()),
                            // Untyped closure parameter: it stands in for
                            // the chain the closure is attached to, one
                            // scope up.
                            None => resolve_closure_proxy(tokens, header.fn_kw, depth),
                        };
                    }
                    // Not a parameter. A capture clause that omits the
                    // name means the variable is unbound in this closure;
                    // otherwise resolution continues in the enclosing
                    // scope.
                    if let (Some(open), Some(close)) = (header.capture_open, header.capture_close)
                        && !scan::capture_lists_var(tokens, open, close, &name)
                    {
                        return None;
                    }
                    i = header.fn_kw;
                }
                // Plain block boundary: transparent.
            }
            TokenKind::Operator if tokens[i].text == "=>" => {
                // Arrow-function boundary: `fn ( … ) =>` binds its
                // parameters for the expression on the right.
                if i >= 1
                    && tokens[i - 1].kind == TokenKind::CloseParen
                    && let Some(open) = scan::matching_open_paren(tokens, i - 1)
                    && open >= 1
                    && tokens[open - 1].is_keyword("fn")
                    && let Some((_, hint)) = scan::find_param(tokens, open, i - 1, &name)
                {
                    return match hint {
                        Some(h) => Some(tokens[h].text.clone()),
                        None => resolve_closure_proxy(tokens, open - 1, depth),
                    };
                }
            }
            _ => {}
        }
    }
    None
}

/// Extract a class name from the right-hand side of `$var = …`.
///
/// Understood shapes: `ClassName::…` (a static call chain or `::class`
/// constant), `new ClassName(…)`, `self::` / `static::`, and `$other`,
/// which is followed recursively.
fn resolve_assignment_rhs(tokens: &[Token], rhs: usize, depth: u32) -> Option<String> {
    let token = tokens.get(rhs)?;
    match token.kind {
        TokenKind::Identifier => tokens
            .get(rhs + 1)
            .filter(|t| t.kind == TokenKind::DoubleColon)
            .map(|_| token.text.clone()),
        TokenKind::Keyword if token.is_keyword("new") => tokens
            .get(rhs + 1)
            .filter(|t| t.kind == TokenKind::Identifier)
            .map(|t| t.text.clone()),
        TokenKind::Keyword if token.is_keyword("self") || token.is_keyword("static") => {
            enclosing_class_name(tokens, rhs)
        }
        TokenKind::Variable => short_class_name(tokens, rhs, depth + 1),
        _ => None,
    }
}

/// Resolve an untyped closure parameter by resolving the root of the
/// call chain the closure is an argument of.
///
/// For `$user->when(…, function ($query) { … })` the parameter `$query`
/// is handed the same builder the `when` call runs on, so resolving
/// `$user` one scope up answers for `$query` too. Applies recursively
/// at every nesting depth.
fn resolve_closure_proxy(tokens: &[Token], fn_kw: usize, depth: u32) -> Option<String> {
    if fn_kw == 0 {
        return None;
    }
    let open = scan::enclosing_open_paren(tokens, fn_kw - 1)?;
    if open == 0 || tokens[open - 1].kind != TokenKind::Identifier {
        return None;
    }
    let root = scan::chain_root(tokens, open - 1)?;
    trace!(root = %tokens[root].text, "following closure parameter to outer chain");
    short_class_name(tokens, root, depth + 1)
}

/// Name of the nearest enclosing `class` declaration, for `self::` and
/// `static::` references. Skips `::class` constant accesses.
fn enclosing_class_name(tokens: &[Token], from: usize) -> Option<String> {
    let mut i = from;
    while i > 0 {
        i -= 1;
        if tokens[i].is_keyword("class")
            && (i == 0 || tokens[i - 1].kind != TokenKind::DoubleColon)
            && let Some(next) = tokens.get(i + 1)
            && next.kind == TokenKind::Identifier
        {
            return Some(next.text.clone());
        }
    }
    None
}
