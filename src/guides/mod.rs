//! Style guides
//!
//! A style guide is data, not a type: an ordered list of named rules per
//! phase, plus the options that shape them. The visitor applies the phases
//! in a fixed order at every nest; each rule is a plain function over the
//! nest's token vector. The phase decides what a rule may write: line
//! break rules touch `lag_newlines`, space rules `spaces`, token rules
//! `text` and `kind`, indention rules `indent_ref`.

use crate::language::{
    GuideOptions, Kind, MathTokenSpacing, Reindention, Scope, Token,
};
use crate::problem::StyleError;

mod indention;
mod line_breaks;
mod spaces;
mod tokens;

/// One level of the nested parse table as seen by a rule: the immediate
/// children of a non-terminal, in source order.
pub struct Nest<'a> {
    /// Whether these are the top-level rows of the file.
    pub top: bool,
    pub tokens: &'a mut Vec<Token>,
}

/// What the children of a nest represent, judged from their leading
/// tokens. Rules dispatch on this instead of re-deriving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Braces,
    Group,
    Call,
    Index,
    If,
    For,
    While,
    Repeat,
    Function,
    /// A (possibly flattened) operator chain, including `$`-style tight
    /// access and named-argument `=` nests.
    Ops,
    /// A prefix operator and its operand.
    Unary,
    Other,
}

pub fn shape_of(tokens: &[Token]) -> Shape {
    if tokens.is_empty() {
        return Shape::Other;
    }
    match tokens
        .first()
        .map(|t| t.kind)
    {
        Some(Kind::Minus) | Some(Kind::Plus) | Some(Kind::Bang) | Some(Kind::Tilde)
        | Some(Kind::Help) => Shape::Unary,
        Some(Kind::LeftBrace) => Shape::Braces,
        Some(Kind::LeftParen) => Shape::Group,
        Some(Kind::If) => Shape::If,
        Some(Kind::For) => Shape::For,
        Some(Kind::While) => Shape::While,
        Some(Kind::Repeat) => Shape::Repeat,
        Some(Kind::Function) => Shape::Function,
        // a comment between the first operand and the operator must not
        // hide the shape
        _ => match tokens[1..]
            .iter()
            .find(|t| t.kind != Kind::Comment)
            .map(|t| t.kind)
        {
            Some(Kind::LeftParen) => Shape::Call,
            Some(Kind::LeftBracket) | Some(Kind::LeftBracket2) => Shape::Index,
            Some(kind) if kind.is_binary_op() || kind.is_tight_op() => Shape::Ops,
            _ => Shape::Other,
        },
    }
}

/// Options a rule body consults.
pub struct RuleContext {
    pub strict: bool,
    pub indent_by: usize,
    pub math_spacing: MathTokenSpacing,
}

pub type RuleFn = fn(&mut Nest, &RuleContext);

#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub apply: RuleFn,
}

impl Rule {
    fn new(name: &'static str, apply: RuleFn) -> Rule {
        Rule { name, apply }
    }
}

#[derive(Clone)]
pub struct StyleGuide {
    pub name: String,
    pub version: String,
    pub scope: Scope,
    pub strict: bool,
    pub indent_by: usize,
    pub base_indention: usize,
    pub include_roxygen_examples: bool,
    pub math_spacing: MathTokenSpacing,
    pub reindention: Reindention,
    pub use_raw_indention: bool,

    pub initialize: Vec<Rule>,
    pub line_breaks: Vec<Rule>,
    pub spaces: Vec<Rule>,
    pub tokens: Vec<Rule>,
    pub indention: Vec<Rule>,
}

impl StyleGuide {
    pub fn context(&self) -> RuleContext {
        RuleContext {
            strict: self.strict,
            indent_by: self.indent_by,
            math_spacing: self
                .math_spacing
                .clone(),
        }
    }

    /// The identity fed into every cache hash: everything that influences
    /// the produced text, and nothing that does not.
    pub fn signature(&self) -> String {
        format!(
            "{}/{};strict={};scope={};indent_by={};math={};reindention={};roxygen={}",
            self.name,
            self.version,
            self.strict,
            self.scope
                .as_str(),
            self.indent_by,
            self.math_spacing
                .signature(),
            self.reindention
                .signature(),
            self.include_roxygen_examples,
        )
    }

    /// A guide without a name and version cannot feed the cache and is
    /// rejected before styling starts.
    pub fn validate(&self) -> Result<(), StyleError> {
        if self
            .name
            .is_empty()
            || self
                .version
                .is_empty()
        {
            return Err(StyleError::InvalidOption(
                "style guides must carry a name and a version".to_string(),
            ));
        }
        Ok(())
    }
}

/// The tidyverse-flavoured guide with default options.
pub fn tidy() -> StyleGuide {
    tidy_with(GuideOptions::default())
}

/// The tidyverse-flavoured guide. The scope decides which phases carry
/// rules at all; each level includes the less invasive ones.
pub fn tidy_with(options: GuideOptions) -> StyleGuide {
    let mut guide = StyleGuide {
        name: "tidy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        scope: options.scope,
        strict: options.strict,
        indent_by: options.indent_by,
        base_indention: options.base_indention,
        include_roxygen_examples: options.include_roxygen_examples,
        math_spacing: options.math_spacing,
        reindention: options.reindention,
        use_raw_indention: false,

        initialize: vec![Rule::new("seed_multi_line", initialize_multi_line)],
        line_breaks: Vec::new(),
        spaces: Vec::new(),
        tokens: Vec::new(),
        indention: Vec::new(),
    };

    if options
        .scope
        .includes(Scope::Spaces)
    {
        guide.spaces = vec![
            Rule::new("style_op_spacing", spaces::style_op_spacing),
            Rule::new("style_delimiter_spacing", spaces::style_delimiter_spacing),
            Rule::new("style_comma_spacing", spaces::style_comma_spacing),
            Rule::new("style_keyword_spacing", spaces::style_keyword_spacing),
            Rule::new("style_brace_spacing", spaces::style_brace_spacing),
            Rule::new("style_comment_spacing", spaces::style_comment_spacing),
        ];
    }

    if options
        .scope
        .includes(Scope::Indention)
    {
        guide.indention = vec![
            Rule::new("indent_braces", indention::indent_braces),
            Rule::new("indent_delimiters", indention::indent_delimiters),
            Rule::new("indent_keyword_bodies", indention::indent_keyword_bodies),
            Rule::new("align_function_formals", indention::align_function_formals),
            Rule::new("indent_op_continuations", indention::indent_op_continuations),
        ];
    }

    if options
        .scope
        .includes(Scope::LineBreaks)
    {
        guide.line_breaks = vec![
            Rule::new("resolve_semicolons", line_breaks::resolve_semicolons),
            Rule::new("break_around_braces", line_breaks::break_around_braces),
            Rule::new("attach_else_to_brace", line_breaks::attach_else_to_brace),
            Rule::new("attach_call_paren", line_breaks::attach_call_paren),
            Rule::new("break_before_call_close", line_breaks::break_before_call_close),
            Rule::new("break_after_commas", line_breaks::break_after_commas),
            Rule::new("cap_blank_lines", line_breaks::cap_blank_lines),
        ];
    }

    if options
        .scope
        .includes(Scope::Tokens)
    {
        guide.tokens = vec![
            Rule::new("force_arrow_assignment", tokens::force_arrow_assignment),
            Rule::new("prefer_double_quotes", tokens::prefer_double_quotes),
        ];
    }

    guide
}

/// Initialize phase: seed `multi_line` from the source spans so space
/// rules can tell spread-out constructs from one-liners.
fn initialize_multi_line(nest: &mut Nest, _context: &RuleContext) {
    for token in nest
        .tokens
        .iter_mut()
    {
        token.multi_line = token.spans_multiple_lines();
    }
}

#[cfg(test)]
mod check {
    use super::*;
    use crate::parsing;
    use crate::styling::nest::nest;

    #[test]
    fn scope_prunes_phases() {
        let mut options = GuideOptions::default();
        options.scope = Scope::Spaces;
        let guide = tidy_with(options);
        assert!(!guide
            .spaces
            .is_empty());
        assert!(guide
            .line_breaks
            .is_empty());
        assert!(guide
            .tokens
            .is_empty());
        assert!(guide
            .indention
            .is_empty());

        let full = tidy();
        assert!(!full
            .line_breaks
            .is_empty());
        assert!(!full
            .tokens
            .is_empty());
    }

    #[test]
    fn signature_reflects_options() {
        let tidy_default = tidy();
        let mut options = GuideOptions::default();
        options.indent_by = 4;
        let wide = tidy_with(options);
        assert_ne!(tidy_default.signature(), wide.signature());
    }

    #[test]
    fn shapes_are_recognized() {
        let root = nest(parsing::parse("f(x)\n{ y }\nif (a) b\n-z\na + b").unwrap());
        let shapes: Vec<Shape> = root
            .children
            .iter()
            .filter(|child| !child.terminal)
            .map(|child| shape_of(&child.children))
            .collect();
        assert_eq!(
            shapes,
            vec![Shape::Call, Shape::Braces, Shape::If, Shape::Unary, Shape::Ops]
        );
    }

    #[test]
    fn missing_identity_is_rejected() {
        let mut guide = tidy();
        guide.version = String::new();
        assert!(guide
            .validate()
            .is_err());
    }
}
