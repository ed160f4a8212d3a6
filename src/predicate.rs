//! Predicates: the fixed set of checks an expectation can make.
//!
//! Each constructor takes typed [`Operand`]s, decides the outcome once, and
//! keeps type-erased copies of the operands so the call can be rebuilt for
//! the report line.
//!
//! Equality is only offered for types implementing [`Eq`]. Floats do not, so
//! comparing them with `eq`/`ne` is a compile error and has to go through
//! [`almost_eq`]:
//!
//! ```compile_fail
//! use vouch::operand::Operand;
//! use vouch::predicate;
//!
//! let (a, b) = (0.1_f64 + 0.2, 0.3_f64);
//! let _ = predicate::eq(Operand::new("a", &a), Operand::new("b", &b));
//! ```
//!
//! ```compile_fail
//! use vouch::operand::Operand;
//! use vouch::predicate;
//!
//! let (a, b) = (0.1_f64, 0.2_f64);
//! let _ = predicate::ne(Operand::new("a", &a), Operand::new("b", &b));
//! ```
//!
//! ```compile_fail
//! use vouch::operand::Operand;
//! use vouch::predicate;
//!
//! let (a, b) = (0.5_f32, 0.5_f32);
//! let _ = predicate::eq(Operand::new("a", &a), Operand::new("b", &b));
//! ```
//!
//! ```compile_fail
//! use vouch::operand::Operand;
//! use vouch::predicate;
//!
//! let (a, b) = (0.5_f32, 0.25_f32);
//! let _ = predicate::ne(Operand::new("a", &a), Operand::new("b", &b));
//! ```
//!
//! The same rule applies to any other type that only implements
//! [`PartialEq`]. Integers go through fine:
//!
//! ```
//! use vouch::operand::Operand;
//! use vouch::predicate;
//!
//! let (a, b) = (4_u64, 4_u64);
//! assert!(predicate::eq(Operand::new("a", &a), Operand::new("b", &b)).holds());
//! ```

use std::fmt;

use crate::operand::{Captured, Operand};

// ============================================================================
// PREDICATE VALUE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateKind {
    True,
    False,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    AlmostEq,
    NotAlmostEq,
}

impl PredicateKind {
    /// Token used to rebuild the macro name, `expect_<token>!`.
    pub fn name(self) -> &'static str {
        match self {
            PredicateKind::True => "",
            PredicateKind::False => "not",
            PredicateKind::Eq => "eq",
            PredicateKind::Ne => "ne",
            PredicateKind::Lt => "lt",
            PredicateKind::Le => "le",
            PredicateKind::Gt => "gt",
            PredicateKind::Ge => "ge",
            PredicateKind::AlmostEq => "almost_eq",
            PredicateKind::NotAlmostEq => "not_almost_eq",
        }
    }
}

/// A decided check over one to three operands.
pub struct Predicate<'a> {
    kind: PredicateKind,
    holds: bool,
    operands: Vec<Captured<'a>>,
}

impl<'a> Predicate<'a> {
    fn new(kind: PredicateKind, holds: bool, operands: Vec<Captured<'a>>) -> Self {
        Self {
            kind,
            holds,
            operands,
        }
    }

    pub fn kind(&self) -> PredicateKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn holds(&self) -> bool {
        self.holds
    }

    pub fn operands(&self) -> &[Captured<'a>] {
        &self.operands
    }
}

/// Renders the call form, e.g. `expect_eq!(2 + 2, 4)`.
impl fmt::Display for Predicate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expect")?;
        if !self.name().is_empty() {
            write!(f, "_{}", self.name())?;
        }
        f.write_str("!(")?;
        for (i, operand) in self.operands.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(operand.src())?;
        }
        f.write_str(")")
    }
}

impl fmt::Debug for Predicate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("call", &self.to_string())
            .field("holds", &self.holds)
            .finish()
    }
}

// ============================================================================
// VALUE TRAITS
// ============================================================================

/// Values that `expect!` and `expect_not!` can test directly.
pub trait Truthy {
    fn truthy(&self) -> bool;
}

impl Truthy for bool {
    fn truthy(&self) -> bool {
        *self
    }
}

impl<T> Truthy for Option<T> {
    fn truthy(&self) -> bool {
        self.is_some()
    }
}

impl<T, E> Truthy for Result<T, E> {
    fn truthy(&self) -> bool {
        self.is_ok()
    }
}

impl<T: Truthy + ?Sized> Truthy for &T {
    fn truthy(&self) -> bool {
        (**self).truthy()
    }
}

/// Numeric values accepted as the epsilon multiplier of [`almost_eq`].
pub trait Coefficient: Copy {
    fn to_f64(self) -> f64;
}

macro_rules! impl_coefficient {
    ($($num:ty),*) => {
        $(
            impl Coefficient for $num {
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_coefficient!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

/// Floating-point types comparable within a multiple of their epsilon.
pub trait Tolerance: Copy {
    /// `|rhs - self| < EPSILON * coef`
    fn is_near(self, rhs: Self, coef: f64) -> bool;
}

macro_rules! impl_tolerance {
    ($($float:ty),*) => {
        $(
            impl Tolerance for $float {
                fn is_near(self, rhs: Self, coef: f64) -> bool {
                    (rhs - self).abs() < <$float>::EPSILON * (coef as $float)
                }
            }
        )*
    };
}

impl_tolerance!(f32, f64);

// ============================================================================
// CONSTRUCTORS
// ============================================================================

pub fn is_true<'a, T>(operand: Operand<'a, T>) -> Predicate<'a>
where
    T: Truthy + fmt::Debug,
{
    let holds = operand.value().truthy();
    Predicate::new(PredicateKind::True, holds, vec![operand.erase()])
}

pub fn is_false<'a, T>(operand: Operand<'a, T>) -> Predicate<'a>
where
    T: Truthy + fmt::Debug,
{
    let holds = !operand.value().truthy();
    Predicate::new(PredicateKind::False, holds, vec![operand.erase()])
}

pub fn eq<'a, L, R>(lhs: Operand<'a, L>, rhs: Operand<'a, R>) -> Predicate<'a>
where
    L: Eq + PartialEq<R> + fmt::Debug,
    R: fmt::Debug,
{
    let holds = lhs.value() == rhs.value();
    Predicate::new(PredicateKind::Eq, holds, vec![lhs.erase(), rhs.erase()])
}

pub fn ne<'a, L, R>(lhs: Operand<'a, L>, rhs: Operand<'a, R>) -> Predicate<'a>
where
    L: Eq + PartialEq<R> + fmt::Debug,
    R: fmt::Debug,
{
    let holds = lhs.value() != rhs.value();
    Predicate::new(PredicateKind::Ne, holds, vec![lhs.erase(), rhs.erase()])
}

macro_rules! ordering_predicate {
    ($(#[$doc:meta])* $fn_name:ident, $kind:ident, $op:tt) => {
        $(#[$doc])*
        pub fn $fn_name<'a, L, R>(lhs: Operand<'a, L>, rhs: Operand<'a, R>) -> Predicate<'a>
        where
            L: PartialOrd<R> + fmt::Debug,
            R: fmt::Debug,
        {
            let holds = lhs.value() $op rhs.value();
            Predicate::new(PredicateKind::$kind, holds, vec![lhs.erase(), rhs.erase()])
        }
    };
}

ordering_predicate!(
    /// `lhs < rhs`
    lt, Lt, <
);
ordering_predicate!(
    /// `lhs <= rhs`
    le, Le, <=
);
ordering_predicate!(
    /// `lhs > rhs`
    gt, Gt, >
);
ordering_predicate!(
    /// `lhs >= rhs`
    ge, Ge, >=
);

/// Holds when `|rhs - lhs| < EPSILON * coef`, with `EPSILON` taken from the
/// type of `lhs`.
pub fn almost_eq<'a, F, C>(
    lhs: Operand<'a, F>,
    rhs: Operand<'a, F>,
    coef: Operand<'a, C>,
) -> Predicate<'a>
where
    F: Tolerance + fmt::Debug,
    C: Coefficient + fmt::Debug,
{
    let holds = lhs.value().is_near(*rhs.value(), coef.value().to_f64());
    Predicate::new(
        PredicateKind::AlmostEq,
        holds,
        vec![lhs.erase(), rhs.erase(), coef.erase()],
    )
}

/// Exact negation of [`almost_eq`].
pub fn not_almost_eq<'a, F, C>(
    lhs: Operand<'a, F>,
    rhs: Operand<'a, F>,
    coef: Operand<'a, C>,
) -> Predicate<'a>
where
    F: Tolerance + fmt::Debug,
    C: Coefficient + fmt::Debug,
{
    let holds = !lhs.value().is_near(*rhs.value(), coef.value().to_f64());
    Predicate::new(
        PredicateKind::NotAlmostEq,
        holds,
        vec![lhs.erase(), rhs.erase(), coef.erase()],
    )
}
