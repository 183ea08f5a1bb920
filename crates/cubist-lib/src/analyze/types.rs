//! Value types and cube component namespaces.
//!
//! `Type` is the scalar lattice every component and expression lives in.
//! `Type::Error` is the poison value: it is assignable both ways, so once a
//! sub-expression has been reported nothing above it reports again.

use std::fmt;

use cubist_core::{CubeDecl, Literal, TypeExpr};
use indexmap::IndexMap;

/// Physical dimension a unit measures. Units of one family are interconvertible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitFamily {
    Mass,
    Length,
    Volume,
    Time,
    Concentration,
}

impl UnitFamily {
    pub fn of(symbol: &str) -> Option<Self> {
        let lowered = symbol.to_ascii_lowercase();
        let family = match lowered.as_str() {
            "kg" | "g" | "mg" | "ug" | "mcg" | "lb" => Self::Mass,
            "km" | "m" | "cm" | "mm" | "in" | "ft" => Self::Length,
            "l" | "dl" | "ml" | "ul" => Self::Volume,
            "s" | "sec" | "min" | "h" | "hr" | "day" | "days" | "week" | "weeks" | "month"
            | "months" | "year" | "years" => Self::Time,
            "mg/dl" | "mg/l" | "g/l" | "g/dl" | "mmol/l" | "umol/l" | "ng/ml" | "ug/ml" => {
                Self::Concentration
            }
            _ => return None,
        };
        Some(family)
    }
}

/// Measurement unit attached to a numeric type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Unit(String);

impl Unit {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn symbol(&self) -> &str {
        &self.0
    }

    pub fn family(&self) -> Option<UnitFamily> {
        UnitFamily::of(&self.0)
    }

    /// Same family, or (for units outside the table) the same symbol.
    pub fn is_compatible_with(&self, other: &Unit) -> bool {
        match (self.family(), other.family()) {
            (Some(a), Some(b)) => a == b,
            _ => self.0.eq_ignore_ascii_case(&other.0),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Identifier,
    Text,
    Integer,
    Numeric(Option<Unit>),
    DateTime,
    Date,
    Flag,
    CodedValue(String),
    /// Already reported; suppresses follow-up diagnostics.
    Error,
}

impl Type {
    pub fn numeric() -> Self {
        Self::Numeric(None)
    }

    pub fn from_type_expr(expr: &TypeExpr) -> Self {
        match expr {
            TypeExpr::Identifier => Self::Identifier,
            TypeExpr::Text => Self::Text,
            TypeExpr::Integer => Self::Integer,
            TypeExpr::Numeric { unit } => Self::Numeric(unit.as_ref().map(Unit::new)),
            TypeExpr::DateTime => Self::DateTime,
            TypeExpr::Date => Self::Date,
            TypeExpr::Flag => Self::Flag,
            TypeExpr::CodedValue { codelist } => Self::CodedValue(codelist.clone()),
        }
    }

    pub fn of_literal(literal: &Literal) -> Self {
        match literal {
            Literal::Flag(_) => Self::Flag,
            Literal::Integer(_) => Self::Integer,
            Literal::Numeric(_) => Self::numeric(),
            Literal::Text(_) => Self::Text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Numeric(_))
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::DateTime)
    }

    fn is_textual(&self) -> bool {
        matches!(self, Self::Text | Self::Identifier | Self::CodedValue(_))
    }

    /// False only for a coded value whose code list name is blank.
    pub fn has_declared_range(&self) -> bool {
        !matches!(self, Self::CodedValue(list) if list.trim().is_empty())
    }

    pub fn unit(&self) -> Option<&Unit> {
        match self {
            Self::Numeric(unit) => unit.as_ref(),
            _ => None,
        }
    }

    /// Whether a value of `self` can be stored where `target` is expected.
    pub fn is_assignable_to(&self, target: &Type) -> bool {
        match (self, target) {
            (Self::Error, _) | (_, Self::Error) => true,
            (Self::Numeric(a), Self::Numeric(b)) => units_compatible(a.as_ref(), b.as_ref()),
            (Self::Integer, Self::Numeric(_)) => true,
            (Self::Text, Self::CodedValue(_)) => true,
            (a, b) => a == b,
        }
    }

    /// Whether `==`/`!=` between the two types makes sense.
    pub fn is_comparable_with(&self, other: &Type) -> bool {
        if self.is_error() || other.is_error() {
            return true;
        }
        if self.is_numeric() && other.is_numeric() {
            return units_compatible(self.unit(), other.unit());
        }
        if self.is_textual() && other.is_textual() {
            return true;
        }
        if self.is_temporal() && (other.is_temporal() || *other == Type::Text) {
            return true;
        }
        if other.is_temporal() && *self == Type::Text {
            return true;
        }
        self == other
    }

    /// Whether `<`, `<=`, `>`, `>=` between the two types makes sense.
    pub fn is_orderable_with(&self, other: &Type) -> bool {
        if self.is_error() || other.is_error() {
            return true;
        }
        if self.is_numeric() && other.is_numeric() {
            return units_compatible(self.unit(), other.unit());
        }
        let temporal_or_text = |t: &Type| t.is_temporal() || *t == Type::Text;
        (self.is_temporal() || other.is_temporal()) && temporal_or_text(self) && temporal_or_text(other)
    }

    /// Whether a literal may be fixed to a component of this type.
    pub fn accepts_literal(&self, literal: &Literal) -> bool {
        match (literal, self) {
            (_, Self::Error) => true,
            (
                Literal::Text(_),
                Self::Text | Self::Identifier | Self::CodedValue(_) | Self::Date | Self::DateTime,
            ) => true,
            (Literal::Integer(_), Self::Identifier) => true,
            _ => Type::of_literal(literal).is_assignable_to(self),
        }
    }
}

fn units_compatible(a: Option<&Unit>, b: Option<&Unit>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.is_compatible_with(b),
        _ => true,
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier => write!(f, "Identifier"),
            Self::Text => write!(f, "Text"),
            Self::Integer => write!(f, "Integer"),
            Self::Numeric(None) => write!(f, "Numeric"),
            Self::Numeric(Some(unit)) => write!(f, "Numeric[{unit}]"),
            Self::DateTime => write!(f, "DateTime"),
            Self::Date => write!(f, "Date"),
            Self::Flag => write!(f, "Flag"),
            Self::CodedValue(codelist) => write!(f, "CodedValue[{codelist}]"),
            Self::Error => write!(f, "<error>"),
        }
    }
}

/// Role of a component inside a cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Dimension,
    Measure,
    Attribute,
}

impl ComponentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dimension => "dimension",
            Self::Measure => "measure",
            Self::Attribute => "attribute",
        }
    }

    /// "a dimension", "an attribute".
    pub fn with_article(self) -> &'static str {
        match self {
            Self::Dimension => "a dimension",
            Self::Measure => "a measure",
            Self::Attribute => "an attribute",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentInfo {
    pub kind: ComponentKind,
    pub ty: Type,
    pub optional: bool,
    /// Set on dimensions a slice upstream already pinned to one value.
    pub fixed: bool,
}

/// Component namespace of one cube. Names are unique across all three roles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CubeType {
    components: IndexMap<String, ComponentInfo>,
}

impl CubeType {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a cube declaration. On duplicate names the first declaration wins;
    /// integrity checks report the clash.
    pub fn from_decl(cube: &CubeDecl) -> Self {
        let mut cube_type = Self::new();
        let roles = [
            (ComponentKind::Dimension, &cube.structure.dimensions),
            (ComponentKind::Measure, &cube.structure.measures),
            (ComponentKind::Attribute, &cube.structure.attributes),
        ];
        for (kind, components) in roles {
            for component in components {
                if cube_type.contains(&component.name) {
                    continue;
                }
                cube_type.components.insert(
                    component.name.clone(),
                    ComponentInfo {
                        kind,
                        ty: Type::from_type_expr(&component.ty),
                        optional: component.optional,
                        fixed: false,
                    },
                );
            }
        }
        cube_type
    }

    /// Add or replace a component.
    pub fn insert(&mut self, name: impl Into<String>, kind: ComponentKind, ty: Type) {
        self.components.insert(
            name.into(),
            ComponentInfo {
                kind,
                ty,
                optional: false,
                fixed: false,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&ComponentInfo> {
        self.components.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    pub fn kind_of(&self, name: &str) -> Option<ComponentKind> {
        self.get(name).map(|c| c.kind)
    }

    pub fn type_of(&self, name: &str) -> Option<&Type> {
        self.get(name).map(|c| &c.ty)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ComponentInfo)> {
        self.components.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> Vec<&str> {
        self.components.keys().map(String::as_str).collect()
    }

    pub fn names_of(&self, kind: ComponentKind) -> Vec<&str> {
        self.iter()
            .filter(|(_, c)| c.kind == kind)
            .map(|(n, _)| n)
            .collect()
    }

    pub fn dimensions(&self) -> Vec<&str> {
        self.names_of(ComponentKind::Dimension)
    }

    /// Dimensions not yet fixed by an upstream slice.
    pub fn free_dimensions(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, c)| c.kind == ComponentKind::Dimension && !c.fixed)
            .map(|(n, _)| n)
            .collect()
    }

    pub fn is_fixed(&self, name: &str) -> bool {
        self.get(name).is_some_and(|c| c.fixed)
    }

    pub fn measures(&self) -> Vec<&str> {
        self.names_of(ComponentKind::Measure)
    }

    pub fn attributes(&self) -> Vec<&str> {
        self.names_of(ComponentKind::Attribute)
    }

    /// Mark the listed dimensions as fixed. Other names are ignored.
    pub fn fix_dimensions<'n>(&mut self, names: impl IntoIterator<Item = &'n String>) {
        for name in names {
            if let Some(c) = self.components.get_mut(name)
                && c.kind == ComponentKind::Dimension
            {
                c.fixed = true;
            }
        }
    }

    /// Keep only the listed measures; dimensions and attributes are untouched.
    pub fn retain_measures(&mut self, keep: &[String]) {
        self.components
            .retain(|name, c| c.kind != ComponentKind::Measure || keep.contains(name));
    }
}
