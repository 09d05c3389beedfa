//! # Error 模块
//!
//! 定义 rule-engine 中使用的错误类型。
//!
//! 错误始终作为返回值传播，不做局部恢复，也没有部分成功的概念。
//! 唯一的例外是整数除以零：按规则语义定义为 0，不是错误。

use thiserror::Error;

/// 词法错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    /// 无法识别的字符
    #[error("偏移 {offset}：无法识别的字符 '{ch}'")]
    UnexpectedChar { ch: char, offset: usize },

    /// 字符串字面量未闭合
    #[error("偏移 {offset}：字符串字面量未闭合")]
    UnterminatedString { offset: usize },

    /// 整数字面量超出 i64 范围
    #[error("偏移 {offset}：整数字面量 '{literal}' 超出 i64 范围")]
    IntegerOverflow { literal: String, offset: usize },
}

/// 语法错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// 词法错误
    #[error("词法错误: {0}")]
    Lex(#[from] LexError),

    /// 意外的 token
    #[error("偏移 {offset}：期望 {expected}，实际为 '{found}'")]
    UnexpectedToken {
        offset: usize,
        expected: String,
        found: String,
    },

    /// 表达式意外结束
    #[error("表达式意外结束：期望 {expected}")]
    UnexpectedEnd { expected: String },

    /// 表达式末尾存在多余内容
    #[error("偏移 {offset}：表达式末尾存在无法解析的内容 '{found}'")]
    TrailingInput { offset: usize, found: String },
}

/// 求值错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// 变量未定义
    #[error("变量 '{name}' 未定义")]
    UndefinedVariable { name: String },

    /// 函数未注册
    #[error("函数 '{name}' 未注册")]
    FunctionNotFound { name: String },

    /// 类型不匹配
    #[error("类型不匹配: 期望 {expected}，实际 {actual} ({context})")]
    TypeMismatch {
        expected: &'static str,
        actual: String,
        context: String,
    },

    /// 当前操作数类型不支持该运算符
    #[error("{kind} 类型不支持运算符 '{op}'")]
    UnsupportedOperator { op: String, kind: &'static str },

    /// 内置函数参数使用错误
    #[error("函数 '{function}' 参数错误: {message}")]
    BadFunctionArg {
        function: &'static str,
        message: String,
    },

    /// 版本号段格式错误
    #[error("版本号段 '{segment}' 不是合法的非负整数")]
    BadVersionSegment { segment: String },
}

/// rule-engine 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    /// 解析错误（含词法错误）
    #[error("解析错误: {0}")]
    Parse(#[from] ParseError),

    /// 求值错误
    #[error("求值错误: {0}")]
    Eval(#[from] EvalError),
}

impl From<LexError> for RuleError {
    fn from(e: LexError) -> Self {
        Self::Parse(ParseError::Lex(e))
    }
}

/// Result 类型别名
pub type RuleResult<T> = Result<T, RuleError>;
