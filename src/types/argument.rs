//! Argument type descriptors
//!
//! An [`ArgumentType`] is what a resolver produces for a `namespace:name`
//! reference and its parameter tokens. It is owned by the argument node it
//! was resolved for.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Namespace of the built-in primitive types.
pub const BUILTIN_NAMESPACE: &str = "builtin";

/// Which string shape a string argument accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringKind {
    SingleWord,
    QuotablePhrase,
    GreedyPhrase,
}

impl StringKind {
    /// Parses a selector parameter such as `single_word`.
    pub fn from_selector(selector: &str) -> Option<Self> {
        match selector {
            "single_word" => Some(StringKind::SingleWord),
            "quotable_phrase" => Some(StringKind::QuotablePhrase),
            "greedy_phrase" => Some(StringKind::GreedyPhrase),
            _ => None,
        }
    }

    pub fn selector(&self) -> &'static str {
        match self {
            StringKind::SingleWord => "single_word",
            StringKind::QuotablePhrase => "quotable_phrase",
            StringKind::GreedyPhrase => "greedy_phrase",
        }
    }
}

/// Numeric types that can bound an argument.
pub trait BoundValue: Copy + PartialEq + fmt::Display + std::str::FromStr {
    const MIN: Self;
    const MAX: Self;
    /// Type name used in error messages
    const LABEL: &'static str;

    /// Whether the value can bound a range. NaN can't, since it is not
    /// equal to itself.
    fn is_comparable(self) -> bool {
        true
    }
}

impl BoundValue for i32 {
    const MIN: Self = i32::MIN;
    const MAX: Self = i32::MAX;
    const LABEL: &'static str = "int";
}

impl BoundValue for i64 {
    const MIN: Self = i64::MIN;
    const MAX: Self = i64::MAX;
    const LABEL: &'static str = "long";
}

impl BoundValue for f32 {
    const MIN: Self = f32::MIN;
    const MAX: Self = f32::MAX;
    const LABEL: &'static str = "float";

    fn is_comparable(self) -> bool {
        !self.is_nan()
    }
}

impl BoundValue for f64 {
    const MIN: Self = f64::MIN;
    const MAX: Self = f64::MAX;
    const LABEL: &'static str = "double";

    fn is_comparable(self) -> bool {
        !self.is_nan()
    }
}

/// Inclusive numeric range. An unbounded side holds the type's extreme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T: BoundValue> Bounds<T> {
    pub fn unbounded() -> Self {
        Self {
            min: T::MIN,
            max: T::MAX,
        }
    }

    pub fn at_least(min: T) -> Self {
        Self { min, max: T::MAX }
    }

    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Shortest parameter list that resolves back to these bounds.
    pub fn parameters(&self) -> Vec<String> {
        let render = |value: T| {
            if value == T::MIN {
                "min".to_string()
            } else if value == T::MAX {
                "max".to_string()
            } else {
                value.to_string()
            }
        };

        if self.max != T::MAX {
            vec![render(self.min), render(self.max)]
        } else if self.min != T::MIN {
            vec![render(self.min)]
        } else {
            Vec::new()
        }
    }
}

impl<T: BoundValue> Default for Bounds<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// A type from a caller-supplied namespace, kept as raw parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomType {
    pub namespace: String,
    pub name: String,
    pub parameters: Vec<String>,
}

/// Resolved argument type of an argument node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArgumentType {
    Bool,
    String { kind: StringKind },
    Integer { bounds: Bounds<i32> },
    Long { bounds: Bounds<i64> },
    Float { bounds: Bounds<f32> },
    Double { bounds: Bounds<f64> },
    Custom(CustomType),
}

impl ArgumentType {
    pub fn namespace(&self) -> &str {
        match self {
            ArgumentType::Custom(custom) => &custom.namespace,
            _ => BUILTIN_NAMESPACE,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ArgumentType::Bool => "bool",
            ArgumentType::String { .. } => "string",
            ArgumentType::Integer { .. } => "integer",
            ArgumentType::Long { .. } => "long",
            ArgumentType::Float { .. } => "float",
            ArgumentType::Double { .. } => "double",
            ArgumentType::Custom(custom) => &custom.name,
        }
    }

    /// The `namespace:name` key this type is referenced by.
    pub fn key(&self) -> String {
        format!("{}:{}", self.namespace(), self.name())
    }

    /// Parameter tokens that follow the key when this type is written out.
    pub fn parameters(&self) -> Vec<String> {
        match self {
            ArgumentType::Bool => Vec::new(),
            ArgumentType::String { kind } => vec![kind.selector().to_string()],
            ArgumentType::Integer { bounds } => bounds.parameters(),
            ArgumentType::Long { bounds } => bounds.parameters(),
            ArgumentType::Float { bounds } => bounds.parameters(),
            ArgumentType::Double { bounds } => bounds.parameters(),
            ArgumentType::Custom(custom) => custom.parameters.clone(),
        }
    }
}

impl fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())?;
        for param in self.parameters() {
            write!(f, " {}", param)?;
        }
        Ok(())
    }
}
