//! # Evaluator 模块
//!
//! 树遍历求值器。
//!
//! ## 设计原则
//!
//! - 求值是**无副作用**的纯函数：不修改环境，也不修改 AST
//! - 求值是**确定性**的，不依赖 IO 或真实时间
//! - 二元运算按左操作数的运行时类型选择 Int/Str/Bool 路径，
//!   两侧操作数都显式转换到该类型
//! - `&&` / `||` 两侧操作数总是都被求值（不短路）

use crate::env::Environment;
use crate::error::EvalError;
use crate::expr::{BinaryOp, Expr, UnaryOp};
use crate::functions::FunctionRegistry;
use crate::value::Value;

/// 求值作用域
///
/// 绑定环境与函数注册表。注册表中的处理函数接收未求值的参数节点
/// 和这个作用域，需要时再回调 [`Evaluator::eval`]。
pub struct Evaluator<'a> {
    env: &'a dyn Environment,
    registry: &'a FunctionRegistry,
}

impl<'a> Evaluator<'a> {
    /// 创建求值作用域
    pub fn new(env: &'a dyn Environment, registry: &'a FunctionRegistry) -> Self {
        Self { env, registry }
    }

    /// 对表达式节点求值
    pub fn eval(&self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Int(n) => Ok(Value::Int(*n)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Bool(b) => Ok(Value::Bool(*b)),

            Expr::Ident(name) => self
                .env
                .get_var(name)
                .cloned()
                .ok_or_else(|| EvalError::UndefinedVariable { name: name.clone() }),

            Expr::Array(elements) => elements
                .iter()
                .map(|e| self.eval(e))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),

            Expr::Paren(inner) => self.eval(inner),

            Expr::Unary { op, operand } => self.eval_unary(*op, operand),

            Expr::Binary { op, left, right } => self.eval_binary(*op, left, right),

            Expr::Call { name, args } => {
                let handler = self
                    .registry
                    .get(name)
                    .ok_or_else(|| EvalError::FunctionNotFound { name: name.clone() })?;
                handler(args, self)
            }
        }
    }

    fn eval_unary(&self, op: UnaryOp, operand: &Expr) -> Result<Value, EvalError> {
        let value = self.eval(operand)?;
        match op {
            UnaryOp::Not => {
                let b = value.as_bool("逻辑非操作数")?;
                Ok(Value::Bool(!b))
            }
            UnaryOp::Neg => {
                let n = value.as_int("取负操作数")?;
                Ok(Value::Int(n.wrapping_neg()))
            }
        }
    }

    /// 二元运算：先求左操作数，由它的运行时类型决定求值路径
    fn eval_binary(&self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<Value, EvalError> {
        let lhs = self.eval(left)?;
        let rhs = self.eval(right)?;

        match lhs {
            Value::Int(_) => int_binary(&lhs, &rhs, op),
            Value::Str(_) => str_binary(&lhs, &rhs, op),
            Value::Bool(_) => bool_binary(&lhs, &rhs, op),
            Value::Array(_) => Err(EvalError::UnsupportedOperator {
                op: op.to_string(),
                kind: "Array",
            }),
        }
    }
}

/// Int 路径：比较与四则运算
fn int_binary(lhs: &Value, rhs: &Value, op: BinaryOp) -> Result<Value, EvalError> {
    let x = lhs.as_int("二元运算左操作数")?;
    let y = rhs.as_int("二元运算右操作数")?;

    let value = match op {
        BinaryOp::Eq => Value::Bool(x == y),
        BinaryOp::NotEq => Value::Bool(x != y),
        BinaryOp::Lt => Value::Bool(x < y),
        BinaryOp::Gt => Value::Bool(x > y),
        BinaryOp::Le => Value::Bool(x <= y),
        BinaryOp::Ge => Value::Bool(x >= y),
        BinaryOp::Add => Value::Int(x.wrapping_add(y)),
        BinaryOp::Sub => Value::Int(x.wrapping_sub(y)),
        BinaryOp::Mul => Value::Int(x.wrapping_mul(y)),
        // 除数为零按规则语义定义为 0，不是错误
        BinaryOp::Div => {
            if y == 0 {
                Value::Int(0)
            } else {
                Value::Int(x.wrapping_div(y))
            }
        }
        BinaryOp::And | BinaryOp::Or => {
            return Err(EvalError::UnsupportedOperator {
                op: op.to_string(),
                kind: "Int",
            });
        }
    };
    Ok(value)
}

/// Str 路径：只有六种比较（字典序）
fn str_binary(lhs: &Value, rhs: &Value, op: BinaryOp) -> Result<Value, EvalError> {
    let x = lhs.as_str("二元运算左操作数")?;
    let y = rhs.as_str("二元运算右操作数")?;

    let matched = match op {
        BinaryOp::Eq => x == y,
        BinaryOp::NotEq => x != y,
        BinaryOp::Lt => x < y,
        BinaryOp::Gt => x > y,
        BinaryOp::Le => x <= y,
        BinaryOp::Ge => x >= y,
        _ => {
            return Err(EvalError::UnsupportedOperator {
                op: op.to_string(),
                kind: "Str",
            });
        }
    };
    Ok(Value::Bool(matched))
}

/// Bool 路径：逻辑与/或和相等比较
fn bool_binary(lhs: &Value, rhs: &Value, op: BinaryOp) -> Result<Value, EvalError> {
    let x = lhs.as_bool("二元运算左操作数")?;
    let y = rhs.as_bool("二元运算右操作数")?;

    let matched = match op {
        BinaryOp::And => x && y,
        BinaryOp::Or => x || y,
        BinaryOp::Eq => x == y,
        BinaryOp::NotEq => x != y,
        _ => {
            return Err(EvalError::UnsupportedOperator {
                op: op.to_string(),
                kind: "Bool",
            });
        }
    };
    Ok(Value::Bool(matched))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Bindings;
    use crate::expr::parse_expression;
    use crate::functions::FunctionRegistry;

    fn eval_str(input: &str, env: &Bindings) -> Result<Value, EvalError> {
        let registry = FunctionRegistry::with_builtins();
        let expr = parse_expression(input).unwrap();
        Evaluator::new(env, &registry).eval(&expr)
    }

    #[test]
    fn test_literal_evaluation() {
        let env = Bindings::new();
        assert_eq!(eval_str("42", &env).unwrap(), Value::Int(42));
        assert_eq!(
            eval_str("\"hi\"", &env).unwrap(),
            Value::Str("hi".to_string())
        );
        assert_eq!(eval_str("true", &env).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_variable_lookup() {
        let env = Bindings::new().with("a", 7);
        assert_eq!(eval_str("a", &env).unwrap(), Value::Int(7));

        let err = eval_str("missing", &env).unwrap_err();
        assert_eq!(
            err,
            EvalError::UndefinedVariable {
                name: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_array_literal_evaluation() {
        let env = Bindings::new();
        assert_eq!(
            eval_str("[1, \"x\", true]", &env).unwrap(),
            Value::Array(vec![
                Value::Int(1),
                Value::Str("x".to_string()),
                Value::Bool(true),
            ])
        );
    }

    #[test]
    fn test_int_comparisons() {
        let env = Bindings::new().with("a", 5);
        assert_eq!(eval_str("a == 5", &env).unwrap(), Value::Bool(true));
        assert_eq!(eval_str("a != 5", &env).unwrap(), Value::Bool(false));
        assert_eq!(eval_str("a < 6", &env).unwrap(), Value::Bool(true));
        assert_eq!(eval_str("a > 5", &env).unwrap(), Value::Bool(false));
        assert_eq!(eval_str("a <= 5", &env).unwrap(), Value::Bool(true));
        assert_eq!(eval_str("a >= 6", &env).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_int_arithmetic() {
        let env = Bindings::new().with("a", 7).with("b", 2);
        assert_eq!(eval_str("a + b", &env).unwrap(), Value::Int(9));
        assert_eq!(eval_str("a - b", &env).unwrap(), Value::Int(5));
        assert_eq!(eval_str("a * b", &env).unwrap(), Value::Int(14));
        assert_eq!(eval_str("a / b", &env).unwrap(), Value::Int(3));
        assert_eq!(eval_str("a + b * 10 == 27", &env).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_division_by_zero_yields_zero() {
        let env = Bindings::new().with("x", 17);
        assert_eq!(eval_str("x / 0", &env).unwrap(), Value::Int(0));
        assert_eq!(eval_str("0 / 0", &env).unwrap(), Value::Int(0));
        assert_eq!(eval_str("x / 0 == 0", &env).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_string_comparisons_lexicographic() {
        let env = Bindings::new()
            .with("a", "0.0.2")
            .with("b", "0.9.9")
            .with("c", "1.0.0");
        assert_eq!(eval_str("a >= \"0.0.1\"", &env).unwrap(), Value::Bool(true));
        assert_eq!(eval_str("c <= \"1.0.0\"", &env).unwrap(), Value::Bool(true));
        assert_eq!(eval_str("b < \"1.0.0\"", &env).unwrap(), Value::Bool(true));

        // 字典序而非数值序
        let env = Bindings::new().with("osVersion", "7");
        assert_eq!(
            eval_str("osVersion > \"10\"", &env).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_string_arithmetic_rejected() {
        let env = Bindings::new().with("s", "x");
        let err = eval_str("s + \"y\"", &env).unwrap_err();
        assert_eq!(
            err,
            EvalError::UnsupportedOperator {
                op: "+".to_string(),
                kind: "Str"
            }
        );
    }

    #[test]
    fn test_bool_path() {
        let env = Bindings::new().with("t", true).with("f", false);
        assert_eq!(eval_str("t && f", &env).unwrap(), Value::Bool(false));
        assert_eq!(eval_str("t || f", &env).unwrap(), Value::Bool(true));
        assert_eq!(eval_str("t == true", &env).unwrap(), Value::Bool(true));
        assert_eq!(eval_str("t != f", &env).unwrap(), Value::Bool(true));

        let err = eval_str("t < f", &env).unwrap_err();
        assert_eq!(
            err,
            EvalError::UnsupportedOperator {
                op: "<".to_string(),
                kind: "Bool"
            }
        );
    }

    #[test]
    fn test_logical_ops_do_not_short_circuit() {
        // 左侧已决定结果时右侧仍被求值，未定义变量照样报错
        let env = Bindings::new().with("f", false).with("t", true);
        let err = eval_str("f && missing == 1", &env).unwrap_err();
        assert_eq!(
            err,
            EvalError::UndefinedVariable {
                name: "missing".to_string()
            }
        );

        let err = eval_str("t || missing == 1", &env).unwrap_err();
        assert_eq!(
            err,
            EvalError::UndefinedVariable {
                name: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_path_selected_by_left_operand() {
        // 左操作数是 Int，右操作数是 Str：Int 路径转换失败
        let env = Bindings::new().with("a", 1).with("s", "x");
        let err = eval_str("a == s", &env).unwrap_err();
        assert!(matches!(err, EvalError::TypeMismatch { expected: "Int", .. }));

        // 反过来走 Str 路径
        let err = eval_str("s == a", &env).unwrap_err();
        assert!(matches!(err, EvalError::TypeMismatch { expected: "Str", .. }));
    }

    #[test]
    fn test_array_left_operand_rejected() {
        let env = Bindings::new();
        let err = eval_str("[1, 2] == [1, 2]", &env).unwrap_err();
        assert_eq!(
            err,
            EvalError::UnsupportedOperator {
                op: "==".to_string(),
                kind: "Array"
            }
        );
    }

    #[test]
    fn test_unary_ops() {
        let env = Bindings::new().with("flag", true).with("n", 3);
        assert_eq!(eval_str("!flag", &env).unwrap(), Value::Bool(false));
        assert_eq!(eval_str("-n + 5 == 2", &env).unwrap(), Value::Bool(true));

        let err = eval_str("!n", &env).unwrap_err();
        assert!(matches!(err, EvalError::TypeMismatch { expected: "Bool", .. }));
        let err = eval_str("-flag", &env).unwrap_err();
        assert!(matches!(err, EvalError::TypeMismatch { expected: "Int", .. }));
    }

    #[test]
    fn test_paren_transparent() {
        let env = Bindings::new().with("a", 1);
        assert_eq!(eval_str("(a)", &env).unwrap(), Value::Int(1));
        assert_eq!(eval_str("((a == 1))", &env).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_unknown_function() {
        let env = Bindings::new();
        let err = eval_str("no_such(1)", &env).unwrap_err();
        assert_eq!(
            err,
            EvalError::FunctionNotFound {
                name: "no_such".to_string()
            }
        );
    }

    #[test]
    fn test_purity_env_not_mutated() {
        let env = Bindings::new().with("a", 1).with("b", 2);
        let before = env.clone();
        let expr = parse_expression("a + b == 3 && a == 1").unwrap();
        let registry = FunctionRegistry::with_builtins();
        let evaluator = Evaluator::new(&env, &registry);
        let _ = evaluator.eval(&expr).unwrap();
        let _ = evaluator.eval(&expr).unwrap();
        assert_eq!(env, before);
    }
}
