//! Operators, precedence and small value types shared by the expression nodes.

use smallvec::SmallVec;

/// Associativity used when deciding whether a child needs parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    LeftToRight,
    RightToLeft,
}

/// C operator precedence level (lower binds tighter) with its associativity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Precedence {
    pub level: u8,
    pub assoc: Associativity,
}

impl Precedence {
    pub const fn ltr(level: u8) -> Self {
        Self { level, assoc: Associativity::LeftToRight }
    }

    pub const fn rtl(level: u8) -> Self {
        Self { level, assoc: Associativity::RightToLeft }
    }

    /// Whether `child` must be parenthesized when printed as the left (`is_left`) or right operand of `self`.
    pub fn needs_parentheses(&self, child: Precedence, is_left: bool) -> bool {
        child.level > self.level
            || (child.level == self.level
                && match self.assoc {
                    Associativity::LeftToRight => !is_left,
                    Associativity::RightToLeft => is_left,
                })
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(any(test, feature = "proptest"), derive(proptest_derive::Arbitrary))]
pub enum UnaryOp {
    Minus,
    BitwiseNot,
    LogicalNot,
    Dereference,
    AddressOf,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

impl UnaryOp {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minus => "-",
            Self::BitwiseNot => "~",
            Self::LogicalNot => "!",
            Self::Dereference => "*",
            Self::AddressOf => "&",
            Self::PreIncrement | Self::PostIncrement => "++",
            Self::PreDecrement | Self::PostDecrement => "--",
        }
    }

    pub const fn precedence(&self) -> Precedence {
        match self {
            Self::PostIncrement | Self::PostDecrement => Precedence::ltr(1),
            _ => Precedence::rtl(2),
        }
    }
}

/// Binary operators, including assignments and the comma operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(any(test, feature = "proptest"), derive(proptest_derive::Arbitrary))]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
    Equal,
    NotEqual,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    LogicalAnd,
    LogicalOr,
    LeftShift,
    RightShift,
    Assignment,
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
    ModuloAssign,
    LeftShiftAssign,
    RightShiftAssign,
    BitwiseAndAssign,
    BitwiseOrAssign,
    BitwiseXorAssign,
    Comma,
}

impl BinaryOp {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Greater => ">",
            Self::Less => "<",
            Self::GreaterEqual => ">=",
            Self::LessEqual => "<=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::BitwiseAnd => "&",
            Self::BitwiseOr => "|",
            Self::BitwiseXor => "^",
            Self::LogicalAnd => "&&",
            Self::LogicalOr => "||",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::Assignment => "=",
            Self::AddAssign => "+=",
            Self::SubtractAssign => "-=",
            Self::MultiplyAssign => "*=",
            Self::DivideAssign => "/=",
            Self::ModuloAssign => "%=",
            Self::LeftShiftAssign => "<<=",
            Self::RightShiftAssign => ">>=",
            Self::BitwiseAndAssign => "&=",
            Self::BitwiseOrAssign => "|=",
            Self::BitwiseXorAssign => "^=",
            Self::Comma => ",",
        }
    }

    pub const fn precedence(&self) -> Precedence {
        match self {
            Self::Multiply | Self::Divide | Self::Modulo => Precedence::ltr(3),
            Self::Add | Self::Subtract => Precedence::ltr(4),
            Self::LeftShift | Self::RightShift => Precedence::ltr(5),
            Self::Less | Self::Greater | Self::LessEqual | Self::GreaterEqual => Precedence::ltr(6),
            Self::Equal | Self::NotEqual => Precedence::ltr(7),
            Self::BitwiseAnd => Precedence::ltr(8),
            Self::BitwiseXor => Precedence::ltr(9),
            Self::BitwiseOr => Precedence::ltr(10),
            Self::LogicalAnd => Precedence::ltr(11),
            Self::LogicalOr => Precedence::ltr(12),
            Self::Assignment
            | Self::AddAssign
            | Self::SubtractAssign
            | Self::MultiplyAssign
            | Self::DivideAssign
            | Self::ModuloAssign
            | Self::LeftShiftAssign
            | Self::RightShiftAssign
            | Self::BitwiseAndAssign
            | Self::BitwiseOrAssign
            | Self::BitwiseXorAssign => Precedence::rtl(14),
            Self::Comma => Precedence::ltr(15),
        }
    }

    pub const fn is_assignment(&self) -> bool {
        matches!(self.precedence().level, 14)
    }
}

/// Lane selection of a swizzle expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Swizzle {
    /// Explicit lane indices, e.g. `.xy` or `.s0123`.
    Lanes(SmallVec<[u8; 16]>),
    Lo,
    Hi,
    Even,
    Odd,
}

/// Literal value extracted from an immediate expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Imm {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Imm {
    /// Integer view of the literal, `None` for floats or out-of-range values.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Int(v) => Some(v),
            Self::UInt(v) => i64::try_from(v).ok(),
            Self::Float(_) => None,
        }
    }
}
