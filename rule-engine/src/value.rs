//! # Value 模块
//!
//! 规则求值的运行时值模型与显式类型转换规则。
//!
//! ## 设计原则
//!
//! - 值是**不可变**的标签联合，所有消费点做穷尽匹配
//! - 类型转换必须**显式请求**且可失败，没有隐式加宽
//! - 数值/布尔值不会被隐式字符串化

use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// 运行时值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// 整数
    Int(i64),
    /// 字符串
    Str(String),
    /// 布尔值
    Bool(bool),
    /// 数组
    Array(Vec<Value>),
}

impl Value {
    /// 值的类型名，用于错误信息
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "Int",
            Value::Str(_) => "Str",
            Value::Bool(_) => "Bool",
            Value::Array(_) => "Array",
        }
    }

    /// 显式转换为整数
    ///
    /// 仅当值本身是 `Int` 时成功。`context` 描述请求转换的位置。
    pub fn as_int(&self, context: &str) -> Result<i64, EvalError> {
        match self {
            Value::Int(n) => Ok(*n),
            other => Err(EvalError::TypeMismatch {
                expected: "Int",
                actual: other.kind().to_string(),
                context: context.to_string(),
            }),
        }
    }

    /// 显式转换为字符串
    ///
    /// 仅当值本身是 `Str` 时成功，不做数值/布尔值的字符串化。
    pub fn as_str(&self, context: &str) -> Result<&str, EvalError> {
        match self {
            Value::Str(s) => Ok(s),
            other => Err(EvalError::TypeMismatch {
                expected: "Str",
                actual: other.kind().to_string(),
                context: context.to_string(),
            }),
        }
    }

    /// 显式转换为布尔值
    ///
    /// 仅当值本身是 `Bool` 时成功。
    pub fn as_bool(&self, context: &str) -> Result<bool, EvalError> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(EvalError::TypeMismatch {
                expected: "Bool",
                actual: other.kind().to_string(),
                context: context.to_string(),
            }),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

/// JSON 边界转换
///
/// 整数与可无损表示为 i64 的浮点数映射为 `Int`；
/// 带小数部分的数值、null 和对象一律拒绝。
impl TryFrom<&serde_json::Value> for Value {
    type Error = EvalError;

    fn try_from(value: &serde_json::Value) -> Result<Self, EvalError> {
        match value {
            serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_json::Value::String(s) => Ok(Value::Str(s.clone())),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Ok(Value::Int(i));
                }
                // 浮点形态但小数部分为零的数值仍可无损绑定
                if let Some(f) = n.as_f64() {
                    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                        return Ok(Value::Int(f as i64));
                    }
                }
                Err(EvalError::TypeMismatch {
                    expected: "Int",
                    actual: format!("Number({n})"),
                    context: "JSON 数值绑定".to_string(),
                })
            }
            serde_json::Value::Array(items) => items
                .iter()
                .map(Value::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Err(EvalError::TypeMismatch {
                expected: "Int/Str/Bool/Array",
                actual: format!("{other}"),
                context: "JSON 值绑定".to_string(),
            }),
        }
    }
}
