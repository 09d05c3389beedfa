//! # AST 模块
//!
//! 定义规则表达式的抽象语法树。
//!
//! ## 设计说明
//!
//! AST 是解析器的输出，节点一经构建不可变。
//! 求值器读取 AST 并产生 [`Value`](crate::value::Value)，
//! 同一棵树可以在不同环境上重复求值。

use std::fmt;

use serde::{Deserialize, Serialize};

/// 二元运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

impl BinaryOp {
    /// 运算符的源文本
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// 一元运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// `!`
    Not,
    /// `-`
    Neg,
}

impl UnaryOp {
    /// 运算符的源文本
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// 表达式节点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// 变量引用
    Ident(String),

    /// 整数字面量
    Int(i64),

    /// 字符串字面量
    Str(String),

    /// 布尔字面量
    Bool(bool),

    /// 数组字面量
    ///
    /// 元素只允许字面量，由解析器保证
    Array(Vec<Expr>),

    /// 一元运算
    Unary {
        /// 运算符
        op: UnaryOp,
        /// 操作数
        operand: Box<Expr>,
    },

    /// 二元运算
    Binary {
        /// 运算符
        op: BinaryOp,
        /// 左操作数
        left: Box<Expr>,
        /// 右操作数
        right: Box<Expr>,
    },

    /// 括号分组
    Paren(Box<Expr>),

    /// 函数调用
    ///
    /// 参数以未求值的节点形式传给注册表中的处理函数
    Call {
        /// 函数名
        name: String,
        /// 参数节点
        args: Vec<Expr>,
    },
}

impl Expr {
    /// 创建变量引用
    pub fn var(name: impl Into<String>) -> Self {
        Self::Ident(name.into())
    }

    /// 创建整数字面量
    pub fn int(n: i64) -> Self {
        Self::Int(n)
    }

    /// 创建字符串字面量
    pub fn string(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    /// 创建布尔字面量
    pub fn bool(b: bool) -> Self {
        Self::Bool(b)
    }

    /// 创建二元运算
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// 创建相等比较
    pub fn eq(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Eq, left, right)
    }

    /// 创建不等比较
    pub fn not_eq(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::NotEq, left, right)
    }

    /// 创建逻辑与
    pub fn and(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::And, left, right)
    }

    /// 创建逻辑或
    pub fn or(left: Expr, right: Expr) -> Self {
        Self::binary(BinaryOp::Or, left, right)
    }

    /// 创建逻辑非
    #[allow(clippy::should_implement_trait)]
    pub fn not(expr: Expr) -> Self {
        Self::Unary {
            op: UnaryOp::Not,
            operand: Box::new(expr),
        }
    }

    /// 创建算术取负
    #[allow(clippy::should_implement_trait)]
    pub fn neg(expr: Expr) -> Self {
        Self::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(expr),
        }
    }

    /// 创建函数调用
    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::Call {
            name: name.into(),
            args,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(Expr::var("a"), Expr::Ident("a".to_string()));
        assert_eq!(Expr::int(3), Expr::Int(3));
        assert_eq!(Expr::string("x"), Expr::Str("x".to_string()));
        assert_eq!(Expr::bool(true), Expr::Bool(true));

        let expr = Expr::and(
            Expr::eq(Expr::var("a"), Expr::int(1)),
            Expr::not(Expr::var("b")),
        );
        assert_eq!(
            expr,
            Expr::Binary {
                op: BinaryOp::And,
                left: Box::new(Expr::Binary {
                    op: BinaryOp::Eq,
                    left: Box::new(Expr::Ident("a".to_string())),
                    right: Box::new(Expr::Int(1)),
                }),
                right: Box::new(Expr::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(Expr::Ident("b".to_string())),
                }),
            }
        );
    }

    #[test]
    fn test_operator_symbols() {
        assert_eq!(BinaryOp::Le.to_string(), "<=");
        assert_eq!(BinaryOp::Or.to_string(), "||");
        assert_eq!(UnaryOp::Not.to_string(), "!");
        assert_eq!(UnaryOp::Neg.to_string(), "-");
    }

    #[test]
    fn test_ast_serialization() {
        let expr = Expr::call(
            "in_array",
            vec![
                Expr::var("a"),
                Expr::Array(vec![Expr::int(1), Expr::string("x")]),
            ],
        );
        let json = serde_json::to_string(&expr).unwrap();
        let back: Expr = serde_json::from_str(&json).unwrap();
        assert_eq!(expr, back);
    }
}
