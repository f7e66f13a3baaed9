//! Call-site locator: walks backward from the cursor to the root of the
//! query-builder call chain it sits inside.

use tracing::trace;

use crate::scan;
use crate::token::{Position, Token, TokenKind};

/// Find the token the call chain under the cursor is rooted at,
/// restricted to chains entered through a call named in `triggers`.
///
/// Returns an index into `tokens`, or `None` when the cursor is not
/// inside a recognised trigger-method call. Incomplete calls match too:
/// the search needs only the opening parenthesis of the call, never its
/// close, so `where('` mid-typing resolves like finished code.
pub fn find_alias_token(tokens: &[Token], triggers: &[String], cursor: Position) -> Option<usize> {
    let anchor = scan::anchor_index(tokens, cursor)?;
    let mut from = anchor;
    loop {
        let open = scan::enclosing_open_paren(tokens, from)?;
        if open == 0 {
            return None;
        }
        let callee = &tokens[open - 1];
        if callee.kind == TokenKind::Identifier && triggers.iter().any(|t| t == &callee.text) {
            trace!(method = %callee.text, "matched trigger call");
            return scan::chain_root(tokens, open - 1);
        }
        // Some other enclosing parenthesis (closure parameter list,
        // control structure, unrelated call): keep searching outward.
        // Sibling chains are balanced and never reach here.
        from = open - 1;
    }
}
