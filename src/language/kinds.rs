//! Token kinds of the parse table

/// The kind tag carried by every row of the parse table. Terminals are
/// spelled the way the host grammar spells them; `Expr` is the synthetic
/// non-terminal introduced for every expression during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Expr,

    Symbol,
    NumConst,
    StrConst,
    Null,
    Comment,

    LeftAssign,
    RightAssign,
    EqAssign,
    EqSub,
    EqFormals,

    Special,
    SpecialPipe,
    SpecialIn,
    SpecialOther,
    Pipe,

    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Colon,
    NamespaceGet,

    Gt,
    Ge,
    Lt,
    Le,
    Eq2,
    Ne,
    And,
    And2,
    Or,
    Or2,
    Bang,
    Tilde,
    Help,

    Dollar,
    At,

    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    LeftBracket2,

    Comma,
    Semicolon,

    If,
    Else,
    For,
    While,
    Repeat,
    Function,
    In,
    Break,
    Next,
}

impl Kind {
    /// Refine the generic `Special` kind (any `%...%` operator) using the
    /// spelling of the token. The host lexer only distinguishes the shape;
    /// the formatter cares which operator it is.
    pub fn enhance(self, text: &str) -> Kind {
        match self {
            Kind::Special => match text {
                "%>%" => Kind::SpecialPipe,
                "%in%" => Kind::SpecialIn,
                _ => Kind::SpecialOther,
            },
            other => other,
        }
    }

    /// Operators that take a left and a right operand.
    pub fn is_binary_op(self) -> bool {
        matches!(
            self,
            Kind::LeftAssign
                | Kind::RightAssign
                | Kind::EqAssign
                | Kind::EqSub
                | Kind::EqFormals
                | Kind::SpecialPipe
                | Kind::SpecialIn
                | Kind::SpecialOther
                | Kind::Pipe
                | Kind::Plus
                | Kind::Minus
                | Kind::Star
                | Kind::Slash
                | Kind::Caret
                | Kind::Gt
                | Kind::Ge
                | Kind::Lt
                | Kind::Le
                | Kind::Eq2
                | Kind::Ne
                | Kind::And
                | Kind::And2
                | Kind::Or
                | Kind::Or2
                | Kind::Tilde
        )
    }

    /// Tight operators never get surrounding spaces.
    pub fn is_tight_op(self) -> bool {
        matches!(
            self,
            Kind::Dollar | Kind::At | Kind::Colon | Kind::NamespaceGet | Kind::Help
        )
    }

    pub fn is_opening(self) -> bool {
        matches!(
            self,
            Kind::LeftParen | Kind::LeftBrace | Kind::LeftBracket | Kind::LeftBracket2
        )
    }

    pub fn is_closing(self) -> bool {
        matches!(
            self,
            Kind::RightParen | Kind::RightBrace | Kind::RightBracket
        )
    }
}
