//! # Rule 模块
//!
//! 规则的解析与匹配入口。
//!
//! 规则解析一次得到 [`Rule`]，之后可以在任意多个环境上重复求值，
//! 相同输入必然得到相同结果。

use serde::{Deserialize, Serialize};

use crate::env::Environment;
use crate::error::{EvalError, RuleResult};
use crate::eval::Evaluator;
use crate::expr::{Expr, parse_expression};
use crate::functions::{FunctionRegistry, default_registry};
use crate::value::Value;

/// 一条已解析的规则
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    expr: Expr,
}

impl Rule {
    /// 解析规则文本
    pub fn parse(text: &str) -> RuleResult<Self> {
        Ok(Self {
            expr: parse_expression(text)?,
        })
    }

    /// 底层表达式树
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// 在默认函数注册表下对环境求值
    pub fn matches(&self, env: &dyn Environment) -> RuleResult<bool> {
        self.matches_with(env, default_registry())
    }

    /// 在指定函数注册表下对环境求值
    ///
    /// 根表达式必须产出布尔值，其他类型按类型错误处理。
    pub fn matches_with(
        &self,
        env: &dyn Environment,
        registry: &FunctionRegistry,
    ) -> RuleResult<bool> {
        let evaluator = Evaluator::new(env, registry);
        match evaluator.eval(&self.expr)? {
            Value::Bool(b) => Ok(b),
            other => Err(EvalError::TypeMismatch {
                expected: "Bool",
                actual: other.kind().to_string(),
                context: "规则根表达式".to_string(),
            }
            .into()),
        }
    }
}

/// 解析并匹配一条规则
///
/// 解析 `expression`，成功后在 `env` 上求值；
/// 词法/语法/类型/未定义变量/未注册函数错误原样向上传播。
pub fn match_rule(expression: &str, env: &dyn Environment) -> RuleResult<bool> {
    Rule::parse(expression)?.matches(env)
}
