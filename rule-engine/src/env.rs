//! # Environment 模块
//!
//! 求值环境：变量名到值的只读映射。
//!
//! 环境由调用方提供，求值器只做按名查找，绝不修改环境内容。
//! 同一条已解析的规则可以在任意多个环境上重复求值。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::EvalError;
use crate::value::Value;

/// 求值环境
///
/// 提供变量查找能力。
pub trait Environment {
    /// 获取变量值
    fn get_var(&self, name: &str) -> Option<&Value>;
}

impl Environment for HashMap<String, Value> {
    fn get_var(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

/// 变量绑定集合
///
/// 以构建器风格组装的自有环境：
///
/// ```ignore
/// let env = Bindings::new().with("a", 1).with("c", "test");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bindings {
    vars: HashMap<String, Value>,
}

impl Bindings {
    /// 创建空的绑定集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加一个绑定（构建器风格）
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// 设置一个绑定
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(name.into(), value.into());
    }

    /// 绑定数量
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// 从 JSON 对象构建绑定集合
    ///
    /// 顶层必须是 JSON 对象；各字段值按 [`Value`] 的 JSON 边界规则转换。
    pub fn from_json_value(value: &serde_json::Value) -> Result<Self, EvalError> {
        let map = value.as_object().ok_or_else(|| EvalError::TypeMismatch {
            expected: "JSON 对象",
            actual: json_kind(value).to_string(),
            context: "环境绑定".to_string(),
        })?;

        let mut bindings = Self::new();
        for (name, field) in map {
            bindings.set(name.clone(), Value::try_from(field)?);
        }
        Ok(bindings)
    }
}

impl Environment for Bindings {
    fn get_var(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
