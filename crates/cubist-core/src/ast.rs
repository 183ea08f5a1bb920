//! Typed AST handed over by the parser.
//!
//! The parser lives outside this workspace and serializes its output as JSON.
//! Declarations and expressions are internally tagged by `kind`, so every
//! variant is a closed Rust enum case and the analyzer matches exhaustively.

use std::fmt;
use std::ops::Range;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Byte range into the original program text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Root container: declarations in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

impl Program {
    pub fn new(declarations: Vec<Declaration>) -> Self {
        Self { declarations }
    }

    /// Decode a program from the parser's JSON output.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    pub fn cubes(&self) -> impl Iterator<Item = &CubeDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Cube(cube) => Some(cube),
            _ => None,
        })
    }

    pub fn slices(&self) -> impl Iterator<Item = &SliceDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Slice(slice) => Some(slice),
            _ => None,
        })
    }

    pub fn concepts(&self) -> impl Iterator<Item = &ConceptDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Concept(concept) => Some(concept),
            _ => None,
        })
    }

    pub fn standards(&self) -> impl Iterator<Item = &StandardsDecl> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Standards(block) => Some(block),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    Cube(CubeDecl),
    Slice(SliceDecl),
    Model(ModelDecl),
    Derive(DeriveDecl),
    Aggregate(AggregateDecl),
    Display(DisplayDecl),
    Concept(ConceptDecl),
    Standards(StandardsDecl),
}

impl Declaration {
    /// Declared name. Standards blocks and untitled displays have none.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Cube(d) => Some(&d.name),
            Self::Slice(d) => Some(&d.name),
            Self::Model(d) => Some(&d.name),
            Self::Derive(d) => Some(&d.name),
            Self::Aggregate(d) => Some(&d.name),
            Self::Display(d) => d.name.as_deref(),
            Self::Concept(d) => Some(&d.name),
            Self::Standards(_) => None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Cube(d) => d.span,
            Self::Slice(d) => d.span,
            Self::Model(d) => d.span,
            Self::Derive(d) => d.span,
            Self::Aggregate(d) => d.span,
            Self::Display(d) => d.span,
            Self::Concept(d) => d.span,
            Self::Standards(d) => d.span,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Cube(_) => "cube",
            Self::Slice(_) => "slice",
            Self::Model(_) => "model",
            Self::Derive(_) => "derive",
            Self::Aggregate(_) => "aggregate",
            Self::Display(_) => "display",
            Self::Concept(_) => "concept",
            Self::Standards(_) => "standards",
        }
    }
}

// ============================================================================
// Cubes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeDecl {
    pub name: String,
    /// Standards domain (e.g. `DM`, `AE`). Defaults to the cube name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Analysis dataset structure class (e.g. `ADSL`, `BDS`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default)]
    pub structure: CubeStructure,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl CubeDecl {
    /// Dimensions, then measures, then attributes.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        let s = &self.structure;
        s.dimensions.iter().chain(&s.measures).chain(&s.attributes)
    }

    /// Declared domain, else the cube name.
    pub fn effective_domain(&self) -> &str {
        self.domain.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CubeStructure {
    #[serde(default)]
    pub dimensions: Vec<Component>,
    #[serde(default)]
    pub measures: Vec<Component>,
    #[serde(default)]
    pub attributes: Vec<Component>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl Component {
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            span: None,
        }
    }
}

/// Component type as written in the source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "base", rename_all = "snake_case")]
pub enum TypeExpr {
    Identifier,
    Text,
    Integer,
    Numeric {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
    DateTime,
    Date,
    Flag,
    CodedValue {
        codelist: String,
    },
}

impl TypeExpr {
    pub fn numeric() -> Self {
        Self::Numeric { unit: None }
    }

    pub fn numeric_in(unit: impl Into<String>) -> Self {
        Self::Numeric {
            unit: Some(unit.into()),
        }
    }

    pub fn coded(codelist: impl Into<String>) -> Self {
        Self::CodedValue {
            codelist: codelist.into(),
        }
    }
}

// ============================================================================
// Slices
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceDecl {
    pub name: String,
    pub source_ref: String,
    #[serde(default)]
    pub fix: IndexMap<String, Literal>,
    #[serde(default)]
    pub vary: Vec<String>,
    /// Measures to retain; `None` keeps all of them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measures: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<Expr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

// ============================================================================
// Models
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDecl {
    pub name: String,
    pub input_ref: String,
    pub formula: Formula,
    pub family: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random: Option<RandomEffects>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

/// Wilkinson formula `response ~ predictors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formula {
    pub response: Expr,
    pub predictors: Expr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

/// Random-effects term `(terms | group)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomEffects {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms: Option<Expr>,
    pub group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

// ============================================================================
// Derive / Aggregate / Display
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeriveDecl {
    pub name: String,
    pub input_ref: String,
    #[serde(default)]
    pub derivations: Vec<Derivation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Derivation {
    pub target: String,
    pub expression: Expr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateDecl {
    pub name: String,
    pub input_ref: String,
    #[serde(default)]
    pub group_by: Vec<String>,
    #[serde(default)]
    pub aggregations: Vec<Aggregation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub target: String,
    pub function: String,
    /// Absent for row counts (`count()`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<Expr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayDecl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub display_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub source_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl DisplayDecl {
    /// Label used in messages: name, then title, then the display type.
    pub fn label(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        if let Some(title) = &self.title {
            return format!("\"{title}\"");
        }
        format!("{} of {}", self.display_type, self.source_ref)
    }
}

// ============================================================================
// Concepts and standards
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_type: Option<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub code_lists: Vec<CodeEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeEntry {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardsDecl {
    #[serde(default)]
    pub entries: Vec<StandardEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardEntry {
    pub standard: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    Ref {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        span: Option<Span>,
    },
    Literal {
        value: Literal,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        span: Option<Span>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        span: Option<Span>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        span: Option<Span>,
    },
    Call {
        function: String,
        #[serde(default)]
        args: Vec<Expr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        span: Option<Span>,
    },
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Self::Ref {
            name: name.into(),
            span: None,
        }
    }

    pub fn lit(value: impl Into<Literal>) -> Self {
        Self::Literal {
            value: value.into(),
            span: None,
        }
    }

    pub fn int(value: i64) -> Self {
        Self::lit(Literal::Integer(value))
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::lit(Literal::Text(value.into()))
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            span: None,
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
            span: None,
        }
    }

    pub fn call(function: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::Call {
            function: function.into(),
            args,
            span: None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Ref { span, .. }
            | Self::Literal { span, .. }
            | Self::Binary { span, .. }
            | Self::Unary { span, .. }
            | Self::Call { span, .. } => *span,
        }
    }

    pub fn with_span(mut self, new_span: Span) -> Self {
        match &mut self {
            Self::Ref { span, .. }
            | Self::Literal { span, .. }
            | Self::Binary { span, .. }
            | Self::Unary { span, .. }
            | Self::Call { span, .. } => *span = Some(new_span),
        }
        self
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ref { name, .. } => write!(f, "{name}"),
            Self::Literal { value, .. } => write!(f, "{value}"),
            Self::Binary { op, lhs, rhs, .. } => write!(f, "({lhs} {op} {rhs})"),
            Self::Unary { op, operand, .. } => match op {
                UnaryOp::Not => write!(f, "not {operand}"),
                UnaryOp::Neg => write!(f, "-{operand}"),
            },
            Self::Call { function, args, .. } => {
                write!(f, "{function}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    /// Formula interaction term `a:b`.
    Interaction,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
            Self::Interaction => ":",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "and",
            Self::Or => "or",
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Pow
        )
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Not,
    Neg,
}

/// Literal value. Untagged: JSON scalars map onto the variants directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Flag(bool),
    Integer(i64),
    Numeric(f64),
    Text(String),
}

impl Literal {
    /// Formula intercept markers `1` and `0`.
    pub fn is_intercept(&self) -> bool {
        matches!(self, Self::Integer(0 | 1))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Numeric(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "\"{v}\""),
        }
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Numeric(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
