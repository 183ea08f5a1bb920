//! Expression typing against one cube's component namespace.
//!
//! Used for `where` clauses, derivations and aggregation inputs. A node that
//! fails to type is reported once and becomes `Type::Error`; parents that see
//! an `Error` operand return `Error` without reporting again.

use cubist_core::{BinaryOp, Expr, UnaryOp};

use super::resolve::report_undefined_component;
use super::types::{CubeType, Type};
use super::utils::suggest;
use crate::Diagnostics;
use crate::diagnostics::DiagnosticKind;

/// Functions callable from expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Log,
    Exp,
    Sqrt,
    Abs,
    Round,
    Floor,
    Ceil,
    Year,
    Month,
    Day,
    IsMissing,
    Lower,
    Upper,
}

impl Builtin {
    pub const ALL: &'static [Builtin] = &[
        Self::Log,
        Self::Exp,
        Self::Sqrt,
        Self::Abs,
        Self::Round,
        Self::Floor,
        Self::Ceil,
        Self::Year,
        Self::Month,
        Self::Day,
        Self::IsMissing,
        Self::Lower,
        Self::Upper,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Exp => "exp",
            Self::Sqrt => "sqrt",
            Self::Abs => "abs",
            Self::Round => "round",
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::IsMissing => "is_missing",
            Self::Lower => "lower",
            Self::Upper => "upper",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.name() == name)
    }

    /// Minimum and maximum argument count.
    pub fn arity(self) -> (usize, usize) {
        match self {
            Self::Round => (1, 2),
            _ => (1, 1),
        }
    }

    /// Result type for well-typed arguments, or a description of what was expected.
    fn apply(self, args: &[Type]) -> Result<Type, &'static str> {
        let first = &args[0];
        match self {
            Self::Log | Self::Exp | Self::Sqrt if first.is_numeric() => Ok(Type::numeric()),
            Self::Abs if first.is_numeric() => Ok(first.clone()),
            Self::Round if first.is_numeric() => {
                if args.get(1).is_some_and(|digits| *digits != Type::Integer) {
                    return Err("Integer digits");
                }
                Ok(Type::Numeric(first.unit().cloned()))
            }
            Self::Floor | Self::Ceil if first.is_numeric() => Ok(Type::Integer),
            Self::Log
            | Self::Exp
            | Self::Sqrt
            | Self::Abs
            | Self::Round
            | Self::Floor
            | Self::Ceil => Err("a numeric argument"),
            Self::Year | Self::Month | Self::Day if first.is_temporal() => Ok(Type::Integer),
            Self::Year | Self::Month | Self::Day => Err("a Date or DateTime argument"),
            Self::IsMissing => Ok(Type::Flag),
            Self::Lower | Self::Upper
                if matches!(first, Type::Text | Type::Identifier | Type::CodedValue(_)) =>
            {
                Ok(Type::Text)
            }
            Self::Lower | Self::Upper => Err("a Text argument"),
        }
    }
}

pub struct ExprChecker<'a> {
    scope: &'a CubeType,
    context: &'a str,
}

impl<'a> ExprChecker<'a> {
    /// `context` prefixes every message, e.g. `Derive 'D' target 'X'`.
    pub fn new(scope: &'a CubeType, context: &'a str) -> Self {
        Self { scope, context }
    }

    /// Type `expr`, reporting problems into `diag`.
    pub fn check(&self, expr: &Expr, diag: &mut Diagnostics) -> Type {
        match expr {
            Expr::Ref { name, span } => match self.scope.type_of(name) {
                Some(ty) => ty.clone(),
                None => {
                    report_undefined_component(self.scope, name, &[], self.context, *span, diag);
                    Type::Error
                }
            },
            Expr::Literal { value, .. } => Type::of_literal(value),
            Expr::Unary { op, operand, .. } => {
                let ty = self.check(operand, diag);
                self.check_unary(*op, ty, expr, diag)
            }
            Expr::Binary { op, lhs, rhs, .. } => {
                let left = self.check(lhs, diag);
                let right = self.check(rhs, diag);
                self.check_binary(*op, left, right, expr, diag)
            }
            Expr::Call { function, args, span } => {
                let arg_types: Vec<Type> = args.iter().map(|a| self.check(a, diag)).collect();
                let Some(builtin) = Builtin::from_name(function) else {
                    let names: Vec<&str> = Builtin::ALL.iter().map(|b| b.name()).collect();
                    let mut message = format!("{}: unknown function '{function}'", self.context);
                    if let Some(similar) = suggest(function, &names) {
                        message.push_str(&format!(". Did you mean '{similar}'?"));
                    }
                    diag.report(DiagnosticKind::UnknownFunction, *span)
                        .message(message)
                        .emit();
                    return Type::Error;
                };
                self.check_call(builtin, &arg_types, expr, diag)
            }
        }
    }

    /// Type `expr` and require a Flag. `what` names the position, e.g. "where clause".
    pub fn check_condition(&self, expr: &Expr, what: &str, diag: &mut Diagnostics) -> Type {
        let ty = self.check(expr, diag);
        if ty.is_error() || ty == Type::Flag {
            return ty;
        }
        diag.report(DiagnosticKind::NonFlagCondition, expr.span())
            .message(format!("{} {what} must be a Flag, found {ty}", self.context))
            .emit();
        Type::Error
    }

    fn check_unary(&self, op: UnaryOp, ty: Type, expr: &Expr, diag: &mut Diagnostics) -> Type {
        if ty.is_error() {
            return ty;
        }
        match op {
            UnaryOp::Not if ty == Type::Flag => Type::Flag,
            UnaryOp::Neg if ty.is_numeric() => ty,
            UnaryOp::Not => {
                let detail = format!("operator 'not' expects Flag, found {ty}");
                self.mismatch(expr, detail, diag)
            }
            UnaryOp::Neg => {
                let detail = format!("unary '-' expects a numeric operand, found {ty}");
                self.mismatch(expr, detail, diag)
            }
        }
    }

    fn check_binary(
        &self,
        op: BinaryOp,
        left: Type,
        right: Type,
        expr: &Expr,
        diag: &mut Diagnostics,
    ) -> Type {
        if op == BinaryOp::Interaction {
            return self.mismatch(
                expr,
                "interaction ':' is only valid in model formulas".to_string(),
                diag,
            );
        }
        if left.is_error() || right.is_error() {
            return Type::Error;
        }

        if op.is_logical() {
            if left == Type::Flag && right == Type::Flag {
                return Type::Flag;
            }
            return self.mismatch(
                expr,
                format!("operator '{op}' expects Flag operands, found {left} and {right}"),
                diag,
            );
        }

        if op.is_comparison() {
            let ok = match op {
                BinaryOp::Eq | BinaryOp::Ne => left.is_comparable_with(&right),
                _ => left.is_orderable_with(&right),
            };
            if ok {
                return Type::Flag;
            }
            return self.mismatch(
                expr,
                format!("operator '{op}' cannot compare {left} with {right}"),
                diag,
            );
        }

        if !left.is_numeric() || !right.is_numeric() {
            return self.mismatch(
                expr,
                format!("operator '{op}' expects numeric operands, found {left} and {right}"),
                diag,
            );
        }
        arithmetic_result(op, &left, &right).unwrap_or_else(|| {
            self.mismatch(
                expr,
                format!("operator '{op}' combines incompatible units in {left} and {right}"),
                diag,
            )
        })
    }

    fn check_call(
        &self,
        builtin: Builtin,
        args: &[Type],
        expr: &Expr,
        diag: &mut Diagnostics,
    ) -> Type {
        let (min, max) = builtin.arity();
        if args.len() < min || args.len() > max {
            let expected = if min == max {
                format!("{min} argument{}", if min == 1 { "" } else { "s" })
            } else {
                format!("{min} to {max} arguments")
            };
            diag.report(DiagnosticKind::ArityMismatch, expr.span())
                .message(format!(
                    "{}: function '{}' expects {expected}, found {}",
                    self.context,
                    builtin.name(),
                    args.len()
                ))
                .emit();
            return Type::Error;
        }
        if args.iter().any(Type::is_error) {
            return Type::Error;
        }

        match builtin.apply(args) {
            Ok(ty) => ty,
            Err(expected) => self.mismatch(
                expr,
                format!("function '{}' expects {expected}, found {}", builtin.name(), args[0]),
                diag,
            ),
        }
    }

    fn mismatch(&self, expr: &Expr, detail: String, diag: &mut Diagnostics) -> Type {
        diag.report(DiagnosticKind::TypeMismatch, expr.span())
            .message(format!("{}: {detail}", self.context))
            .emit();
        Type::Error
    }
}

/// `None` when the units cannot be combined.
fn arithmetic_result(op: BinaryOp, left: &Type, right: &Type) -> Option<Type> {
    let both_integer = *left == Type::Integer && *right == Type::Integer;
    match op {
        BinaryOp::Add | BinaryOp::Sub => {
            if !left.is_assignable_to(right) && !right.is_assignable_to(left) {
                return None;
            }
            if both_integer {
                return Some(Type::Integer);
            }
            Some(Type::Numeric(left.unit().or(right.unit()).cloned()))
        }
        BinaryOp::Mul if both_integer => Some(Type::Integer),
        BinaryOp::Mul => {
            let unit = match (left.unit(), right.unit()) {
                (Some(u), None) | (None, Some(u)) => Some(u.clone()),
                _ => None,
            };
            Some(Type::Numeric(unit))
        }
        BinaryOp::Div => {
            let unit = match right.unit() {
                None => left.unit().cloned(),
                Some(_) => None,
            };
            Some(Type::Numeric(unit))
        }
        _ => Some(Type::numeric()),
    }
}
