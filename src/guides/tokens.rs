//! Token rules of the tidy guide
//!
//! Token rules rewrite `text` and `kind`. They only run at scope `tokens`,
//! where the round-trip validation is waived.

use crate::guides::{Nest, RuleContext};
use crate::language::Kind;

/// Assignment is spelled `<-`. Named arguments (`EqSub`) and formal
/// defaults (`EqFormals`) are different kinds and stay untouched.
pub fn force_arrow_assignment(nest: &mut Nest, _context: &RuleContext) {
    for token in nest
        .tokens
        .iter_mut()
    {
        if token.kind == Kind::EqAssign && !token.verbatim {
            token.kind = Kind::LeftAssign;
            token.text = "<-".to_string();
        }
    }
}

/// String constants prefer double quotes, unless the contents contain a
/// double quote themselves.
pub fn prefer_double_quotes(nest: &mut Nest, _context: &RuleContext) {
    for token in nest
        .tokens
        .iter_mut()
    {
        if token.kind != Kind::StrConst || token.verbatim {
            continue;
        }
        if !token
            .text
            .starts_with('\'')
        {
            continue;
        }
        let inner = &token.text[1..token
            .text
            .len()
            - 1];
        if inner.contains('"') {
            continue;
        }
        token.text = format!("\"{}\"", inner);
    }
}
