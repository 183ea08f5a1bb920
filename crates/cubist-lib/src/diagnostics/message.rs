use cubist_core::Span;
use serde::{Deserialize, Serialize};

/// Diagnostic kinds, grouped by the pass that reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Symbol table
    DuplicateDefinition,

    // Name resolution
    UndefinedReference,
    WrongSymbolKind,
    UndefinedComponent,
    WrongComponentKind,

    // Construct structure
    FixVaryOverlap,
    AlreadyFixed,
    InvalidResponse,
    InvalidPredictor,
    UnknownFamily,
    UnknownLink,
    IncompatibleLink,
    CanonicalLinkAssumed,
    ShadowedComponent,
    UnknownAggregation,
    UnknownDisplayType,

    // Expression typing
    TypeMismatch,
    NonFlagCondition,
    UnknownFunction,
    ArityMismatch,

    // Dependency graph
    CircularDependency,

    // Standards
    IntegrityViolation,
    DuplicateSlice,
    ConformanceViolation,
    UnknownStandard,
    UnsupportedVersion,
    IncompatibleVersions,

    // Concepts
    CircularConceptReference,
    UndefinedPropertyType,
    DuplicateConcept,
    EmptyCodeValue,
    PropertyRedefinition,
}

impl DiagnosticKind {
    /// Default severity for this kind. Rule-driven kinds override it per rule.
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::FixVaryOverlap
            | Self::ShadowedComponent
            | Self::DuplicateSlice
            | Self::UnknownDisplayType
            | Self::UnknownStandard
            | Self::UnsupportedVersion
            | Self::IncompatibleVersions
            | Self::EmptyCodeValue
            | Self::PropertyRedefinition => Severity::Warning,
            Self::CanonicalLinkAssumed => Severity::Hint,
            _ => Severity::Error,
        }
    }

    /// Stable machine-readable code, used when no rule id applies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateDefinition => "duplicate-definition",
            Self::UndefinedReference => "undefined-reference",
            Self::WrongSymbolKind => "wrong-symbol-kind",
            Self::UndefinedComponent => "undefined-component",
            Self::WrongComponentKind => "wrong-component-kind",
            Self::FixVaryOverlap => "fix-vary-overlap",
            Self::AlreadyFixed => "already-fixed",
            Self::InvalidResponse => "invalid-response",
            Self::InvalidPredictor => "invalid-predictor",
            Self::UnknownFamily => "unknown-family",
            Self::UnknownLink => "unknown-link",
            Self::IncompatibleLink => "incompatible-link",
            Self::CanonicalLinkAssumed => "canonical-link",
            Self::ShadowedComponent => "shadowed-component",
            Self::UnknownAggregation => "unknown-aggregation",
            Self::UnknownDisplayType => "unknown-display-type",
            Self::TypeMismatch => "type-mismatch",
            Self::NonFlagCondition => "non-flag-condition",
            Self::UnknownFunction => "unknown-function",
            Self::ArityMismatch => "arity-mismatch",
            Self::CircularDependency => "circular-dependency",
            Self::IntegrityViolation => "integrity-violation",
            Self::DuplicateSlice => "duplicate-slice",
            Self::ConformanceViolation => "conformance-violation",
            Self::UnknownStandard => "unknown-standard",
            Self::UnsupportedVersion => "unsupported-version",
            Self::IncompatibleVersions => "incompatible-versions",
            Self::CircularConceptReference => "circular-concept",
            Self::UndefinedPropertyType => "undefined-property-type",
            Self::DuplicateConcept => "duplicate-concept",
            Self::EmptyCodeValue => "empty-code-value",
            Self::PropertyRedefinition => "property-redefinition",
        }
    }

    /// Default hint for this kind, automatically attached on emit.
    pub fn default_hint(&self) -> Option<&'static str> {
        match self {
            Self::FixVaryOverlap => Some("remove the name from either `fix` or `vary`"),
            Self::CircularDependency => {
                Some("break the cycle by reading one of these constructs from a cube")
            }
            Self::NonFlagCondition => Some("use a comparison such as `AVAL > 0` to get a Flag"),
            _ => None,
        }
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::DuplicateDefinition => "duplicate definition",
            Self::UndefinedReference => "undefined reference",
            Self::WrongSymbolKind => "reference to the wrong kind of construct",
            Self::UndefinedComponent => "undefined component",
            Self::WrongComponentKind => "component used in the wrong role",
            Self::FixVaryOverlap => "component is both fixed and varied",
            Self::AlreadyFixed => "dimension is already fixed by the source slice",
            Self::InvalidResponse => "response variable must be a measure",
            Self::InvalidPredictor => "predictor variable cannot be an attribute",
            Self::UnknownFamily => "unknown distribution family",
            Self::UnknownLink => "unknown link function",
            Self::IncompatibleLink => "link function is not compatible with the family",
            Self::CanonicalLinkAssumed => "canonical link assumed",
            Self::ShadowedComponent => "derived variable shadows an existing component",
            Self::UnknownAggregation => "unknown aggregation function",
            Self::UnknownDisplayType => "unknown display type",
            Self::TypeMismatch => "type mismatch",
            Self::NonFlagCondition => "condition must be a Flag",
            Self::UnknownFunction => "unknown function",
            Self::ArityMismatch => "wrong number of arguments",
            Self::CircularDependency => "circular dependency",
            Self::IntegrityViolation => "integrity constraint violated",
            Self::DuplicateSlice => "slice duplicates another slice",
            Self::ConformanceViolation => "conformance rule violated",
            Self::UnknownStandard => "unknown standard",
            Self::UnsupportedVersion => "unsupported standard version",
            Self::IncompatibleVersions => "standard versions have compatibility issues",
            Self::CircularConceptReference => "circular reference in concept hierarchy",
            Self::UndefinedPropertyType => "property has an undefined type",
            Self::DuplicateConcept => "concept is defined multiple times",
            Self::EmptyCodeValue => "empty code value",
            Self::PropertyRedefinition => "property redefines an inherited property",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::DuplicateDefinition => "'{}' is defined multiple times".to_string(),
            Self::CircularDependency => "Circular dependency detected: {}".to_string(),
            Self::CircularConceptReference => {
                "Circular reference in concept hierarchy: {}".to_string()
            }

            // Callers compose the whole sentence
            _ => "{}".to_string(),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

/// Diagnostic severity, ordered from most to least severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
    Hint,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Hint => write!(f, "hint"),
        }
    }
}

/// The source construct a diagnostic is attached to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub construct: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl NodeRef {
    pub fn is_empty(&self) -> bool {
        self.construct.is_none() && self.span.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    pub message: String,
}

impl RelatedInfo {
    pub fn new(span: Option<Span>, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// One diagnostic record, in the shape editors consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    #[serde(skip)]
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "NodeRef::is_empty")]
    pub node: NodeRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<RelatedInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
}

impl Diagnostic {
    pub(crate) fn with_default_message(kind: DiagnosticKind, span: Option<Span>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            message: kind.fallback_message().to_string(),
            node: NodeRef {
                construct: None,
                span,
            },
            code: Some(kind.code().to_string()),
            related: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        self.node.span
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    pub fn is_hint(&self) -> bool {
        self.severity == Severity::Hint
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(code) = &self.code {
            write!(f, "[{code}]")?;
        }
        if let Some(span) = self.node.span {
            write!(f, " at {span}")?;
        }
        write!(f, ": {}", self.message)?;
        for related in &self.related {
            match related.span {
                Some(span) => write!(f, " (related: {} at {span})", related.message)?,
                None => write!(f, " (related: {})", related.message)?,
            }
        }
        for hint in &self.hints {
            write!(f, " (hint: {hint})")?;
        }
        Ok(())
    }
}
