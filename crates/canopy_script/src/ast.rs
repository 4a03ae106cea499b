//! Syntax tree of the component language.

use std::fmt;
use std::ops::Range;

/// Byte range into the source text.
pub type Span = Range<usize>;

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Real(f64),
    Text(String),
    Bool(bool),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    /// `name: kind [= literal];`
    Field {
        name: Spanned<String>,
        kind: Spanned<String>,
        default: Option<Spanned<Literal>>,
    },
    /// `link name[?]: Type;`
    Link {
        name: Spanned<String>,
        type_name: Spanned<String>,
        optional: bool,
    },
}

impl Member {
    pub fn name(&self) -> &Spanned<String> {
        match self {
            Self::Field { name, .. } | Self::Link { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDef {
    pub public: bool,
    pub name: Spanned<String>,
    pub members: Vec<Member>,
}

/// Everything in one source text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceUnit {
    pub components: Vec<ComponentDef>,
}
