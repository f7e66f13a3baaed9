//! eloquery — resolve the Eloquent model class behind the query-builder
//! call under a cursor.
//!
//! Given PHP source text and a cursor position inside a query-builder
//! method call (`where`, `orWhere`, …), the engine answers one question:
//! which model class is that builder rooted at? Editors use the answer
//! to suggest the right columns and scopes while the user is still
//! typing.
//!
//! The engine works on the flat token stream — no syntax tree — so
//! half-typed, syntactically broken code still resolves. The pipeline is
//! tokenize → [`locator`] → [`resolver`]; every stage is a pure function
//! of its inputs and reports "nothing found" as `None` rather than an
//! error, because the consuming feature degrades to showing no
//! suggestions.
//!
//! ```
//! use eloquery::{Config, Position, resolve_model_at};
//!
//! let source = concat!(
//!     "<?php\n",
//!     "use App\\User;\n",
//!     "$user = User::where('');\n",
//! );
//! // Cursor between the quotes of `where('')`.
//! let class = resolve_model_at(source, Position::new(2, 21), &Config::default());
//! assert_eq!(class.as_deref(), Some("App\\User"));
//! ```

pub mod imports;
pub mod lexer;
pub mod locator;
pub mod resolver;
pub(crate) mod scan;
pub mod token;

pub use token::{Position, Token, TokenKind};

/// Query-builder method names that trigger resolution by default.
///
/// Hosts can swap in their own set via [`Config::trigger_methods`];
/// these cover the common Eloquent builder entry points.
pub const DEFAULT_TRIGGER_METHODS: &[&str] = &[
    "where",
    "orWhere",
    "whereIn",
    "whereNotIn",
    "whereNull",
    "whereNotNull",
    "whereBetween",
    "whereDate",
    "whereColumn",
    "whereHas",
    "firstWhere",
    "orderBy",
    "groupBy",
    "pluck",
    "value",
    "select",
];

/// What to do with an unqualified class name that no `use` statement
/// explains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamespacePolicy {
    /// Prefix the file's `namespace` declaration — PHP's own lookup rule
    /// for class names, which never fall back to the global scope.
    #[default]
    CurrentNamespace,
    /// Return the short name untouched.
    Bare,
}

/// Host-supplied knobs for a resolution run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Method names whose call chains are worth resolving.
    pub trigger_methods: Vec<String>,
    /// Fallback rule for unqualified names without an import.
    pub namespace_policy: NamespacePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trigger_methods: DEFAULT_TRIGGER_METHODS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            namespace_policy: NamespacePolicy::default(),
        }
    }
}

/// Resolve the model class whose builder method is being called at
/// `cursor`.
///
/// Composes the full pipeline: tokenize the source, locate the root of
/// the trigger call chain under the cursor, then follow that root to a
/// declaring class and expand it against the file's imports. Returns
/// `None` whenever any stage comes up empty.
pub fn resolve_model_at(source: &str, cursor: Position, config: &Config) -> Option<String> {
    let tokens = lexer::tokenize(source);
    let alias = locator::find_alias_token(&tokens, &config.trigger_methods, cursor)?;
    resolver::resolve(&tokens, alias, config)
}
