//! # Rule Engine
//!
//! 布尔规则表达式引擎的核心库。
//!
//! ## 架构概述
//!
//! `rule-engine` 是纯逻辑核心，不依赖任何 IO：
//! 规则文本解析一次得到 AST，之后可以在任意多个环境上重复求值。
//!
//! ```text
//! 规则文本 → [Lexer] → Token 流 → [Parser] → Expr
//!                                              │
//!                 环境 (变量名 → 值)  ──────► [Evaluator] → Value → bool
//! ```
//!
//! ## 使用示例
//!
//! ```ignore
//! use rule_engine::{Bindings, Rule, match_rule};
//!
//! // 一次性求值
//! let env = Bindings::new().with("a", 1).with("c", "test");
//! assert!(match_rule("a == 1 && c == \"test\"", &env)?);
//!
//! // 解析一次，多环境复用
//! let rule = Rule::parse("in_organization(org, \"111111/222222\")")?;
//! for record in records {
//!     let env = Bindings::from_json_value(&record)?;
//!     if rule.matches(&env)? {
//!         // ...
//!     }
//! }
//! ```
//!
//! ## 核心类型
//!
//! - [`Rule`]：已解析的规则，可重复求值
//! - [`Bindings`] / [`Environment`]：变量名到值的只读映射
//! - [`Value`]：运行时值（Int / Str / Bool / Array）
//! - [`FunctionRegistry`]：命名函数注册表，冻结后只读
//! - [`RuleError`]：统一错误类型
//!
//! ## 模块结构
//!
//! - [`expr`]：词法、AST 与解析器
//! - [`value`]：运行时值与显式类型转换
//! - [`env`]：求值环境
//! - [`eval`]：树遍历求值器
//! - [`functions`]：函数注册表与内置函数
//! - [`version`]：点分版本号比较
//! - [`rule`]：解析与匹配入口
//! - [`error`]：错误类型定义

pub mod env;
pub mod error;
pub mod eval;
pub mod expr;
pub mod functions;
pub mod rule;
pub mod value;
pub mod version;

// 重导出核心类型
pub use env::{Bindings, Environment};
pub use error::{EvalError, LexError, ParseError, RuleError, RuleResult};
pub use eval::Evaluator;
pub use expr::{BinaryOp, Expr, UnaryOp, parse_expression};
pub use functions::{FunctionRegistry, RegistryBuilder, RuleFn, default_registry};
pub use rule::{Rule, match_rule};
pub use value::Value;
pub use version::compare_versions;
