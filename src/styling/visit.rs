//! Transformer visitor
//!
//! Walks the nested table applying the guide's rule phases at every nest
//! in a fixed order: `initialize`, `line_break`, `space`, and `token`
//! rules run parent-before-child; `indention` rules run child-before-
//! parent, so inner constructs settle before outer alignment decisions.

use crate::guides::{Nest, Rule, RuleContext, StyleGuide};
use crate::language::Token;

pub fn apply_guide(root: &mut Token, guide: &StyleGuide) {
    let context = guide.context();

    let forward: [&[Rule]; 4] = [
        &guide.initialize,
        &guide.line_breaks,
        &guide.spaces,
        &guide.tokens,
    ];
    pre_order(root, true, &mut |tokens, top| {
        for phase in forward {
            apply_phase(phase, tokens, top, &context);
        }
    });

    post_order(root, true, &mut |tokens, top| {
        apply_phase(&guide.indention, tokens, top, &context);
    });
}

fn apply_phase(phase: &[Rule], tokens: &mut Vec<Token>, top: bool, context: &RuleContext) {
    for rule in phase {
        let mut nest = Nest {
            top,
            tokens: &mut *tokens,
        };
        (rule.apply)(&mut nest, context);
    }
}

fn pre_order(token: &mut Token, top: bool, f: &mut impl FnMut(&mut Vec<Token>, bool)) {
    if token.terminal {
        return;
    }
    f(&mut token.children, top);
    for child in token
        .children
        .iter_mut()
    {
        pre_order(child, false, f);
    }
}

fn post_order(token: &mut Token, top: bool, f: &mut impl FnMut(&mut Vec<Token>, bool)) {
    if token.terminal {
        return;
    }
    for child in token
        .children
        .iter_mut()
    {
        post_order(child, false, f);
    }
    f(&mut token.children, top);
}
