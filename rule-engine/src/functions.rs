//! # Functions 模块
//!
//! 可从规则中调用的命名函数注册表及内置函数。
//!
//! ## 调用约定
//!
//! 处理函数接收**未求值**的参数节点和当前求值作用域：
//! 若干内置函数需要区分"参数是字面量模式"和"参数是待求值的变量"，
//! 因此由处理函数自行决定对哪些参数回调
//! [`Evaluator::eval`](crate::eval::Evaluator::eval)。
//!
//! ## 不可变性
//!
//! 注册表通过 [`RegistryBuilder`] 在冻结前注册，`build` 之后只读，
//! 可以在多个并发求值间安全共享。进程级默认注册表只初始化一次。

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::EvalError;
use crate::eval::Evaluator;
use crate::expr::Expr;
use crate::value::Value;
use crate::version::compare_versions;

/// 规则函数签名
///
/// `args` 是未求值的参数节点，`scope` 提供环境查找与求值回调。
pub type RuleFn = fn(&[Expr], &Evaluator<'_>) -> Result<Value, EvalError>;

/// 函数注册表（构建后不可变）
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, RuleFn>,
}

impl FunctionRegistry {
    /// 创建注册表构建器
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// 创建带全部内置函数的注册表
    pub fn with_builtins() -> Self {
        Self::builder()
            .register("in_array", in_array)
            .register("start_with", start_with)
            .register("in_organization", in_organization)
            .register("contain_organization", contain_organization)
            .register("compare_version", compare_version)
            .build()
    }

    /// 按名查找处理函数
    pub fn get(&self, name: &str) -> Option<RuleFn> {
        self.functions.get(name).copied()
    }

    /// 是否注册了指定名称
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// 已注册的函数数量
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// 注册表是否为空
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// 注册表构建器
///
/// 冻结前注册宿主自定义函数，`build` 之后不再变更：
///
/// ```ignore
/// let registry = FunctionRegistry::builder()
///     .register("in_array", in_array)
///     .register("my_predicate", my_predicate)
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    functions: HashMap<String, RuleFn>,
}

impl RegistryBuilder {
    /// 注册一个命名函数；同名后注册者覆盖先注册者
    pub fn register(mut self, name: impl Into<String>, handler: RuleFn) -> Self {
        self.functions.insert(name.into(), handler);
        self
    }

    /// 冻结为不可变注册表
    pub fn build(self) -> FunctionRegistry {
        FunctionRegistry {
            functions: self.functions,
        }
    }
}

/// 进程级默认注册表
///
/// 首次使用时构建一次，此后所有求值共享同一份只读表。
pub fn default_registry() -> &'static FunctionRegistry {
    static REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();
    REGISTRY.get_or_init(FunctionRegistry::with_builtins)
}

// ---------------------------------------------------------------------------
// 参数检查辅助
// ---------------------------------------------------------------------------

fn expect_arg_count(
    function: &'static str,
    args: &[Expr],
    count: usize,
) -> Result<(), EvalError> {
    if args.len() == count {
        Ok(())
    } else {
        Err(EvalError::BadFunctionArg {
            function,
            message: format!("期望 {count} 个参数，实际 {} 个", args.len()),
        })
    }
}

/// 要求参数节点是字符串字面量，返回其文本
fn literal_str<'e>(
    function: &'static str,
    arg: &'e Expr,
    what: &str,
) -> Result<&'e str, EvalError> {
    match arg {
        Expr::Str(s) => Ok(s),
        _ => Err(EvalError::BadFunctionArg {
            function,
            message: format!("{what}必须是字符串字面量"),
        }),
    }
}

/// 要求参数节点是数组字面量，返回其元素节点
fn literal_array<'e>(
    function: &'static str,
    arg: &'e Expr,
    what: &str,
) -> Result<&'e [Expr], EvalError> {
    match arg {
        Expr::Array(elements) => Ok(elements),
        _ => Err(EvalError::BadFunctionArg {
            function,
            message: format!("{what}必须是数组字面量"),
        }),
    }
}

// ---------------------------------------------------------------------------
// 内置函数
// ---------------------------------------------------------------------------

/// `in_array(x, arr)`：变量是否等于数组字面量中的某个元素
///
/// 每个元素按自己的运行时类型（Int 或 Str）决定比较方式；
/// 变量转换到该类型失败时整体判为不匹配，其他类型的元素跳过。
fn in_array(args: &[Expr], scope: &Evaluator<'_>) -> Result<Value, EvalError> {
    expect_arg_count("in_array", args, 2)?;
    let param = scope.eval(&args[0])?;
    let elements = literal_array("in_array", &args[1], "第二个参数")?;

    for element in elements {
        match scope.eval(element)? {
            Value::Int(n) => {
                let Ok(x) = param.as_int("in_array 变量") else {
                    return Ok(Value::Bool(false));
                };
                if x == n {
                    return Ok(Value::Bool(true));
                }
            }
            Value::Str(s) => {
                let Ok(x) = param.as_str("in_array 变量") else {
                    return Ok(Value::Bool(false));
                };
                if x == s {
                    return Ok(Value::Bool(true));
                }
            }
            // 其他元素类型不参与匹配
            _ => {}
        }
    }
    Ok(Value::Bool(false))
}

/// `start_with(x, prefix)`：变量（字符串）是否以字面量前缀开头
fn start_with(args: &[Expr], scope: &Evaluator<'_>) -> Result<Value, EvalError> {
    expect_arg_count("start_with", args, 2)?;
    let param = scope.eval(&args[0])?;
    let prefix = literal_str("start_with", &args[1], "第二个参数")?;

    let value = param.as_str("start_with 变量")?;
    Ok(Value::Bool(value.starts_with(prefix)))
}

/// `in_organization(x, path)`：变量的组织路径是否属于规则路径之下
///
/// 两侧都按 `/` 切分；规则路径的每一段都必须与变量路径同位置的段相等。
/// 变量路径比规则路径短则一定不匹配。
fn in_organization(args: &[Expr], scope: &Evaluator<'_>) -> Result<Value, EvalError> {
    expect_arg_count("in_organization", args, 2)?;
    let param = scope.eval(&args[0])?;
    let rule_path = literal_str("in_organization", &args[1], "第二个参数")?;

    let value = param.as_str("in_organization 变量")?;
    let input_segments: Vec<&str> = value.split('/').collect();
    let rule_segments: Vec<&str> = rule_path.split('/').collect();

    if input_segments.len() < rule_segments.len() {
        return Ok(Value::Bool(false));
    }

    let matched = rule_segments
        .iter()
        .zip(&input_segments)
        .all(|(rule, input)| rule == input);
    Ok(Value::Bool(matched))
}

/// `contain_organization(x, arr)`：变量（字符串）是否以数组中某个元素为前缀
///
/// 变量不是字符串时判为不匹配；数组元素要求字符串，遇到其他类型判为不匹配。
fn contain_organization(args: &[Expr], scope: &Evaluator<'_>) -> Result<Value, EvalError> {
    expect_arg_count("contain_organization", args, 2)?;
    let param = scope.eval(&args[0])?;
    let elements = literal_array("contain_organization", &args[1], "第二个参数")?;

    let Ok(value) = param.as_str("contain_organization 变量") else {
        return Ok(Value::Bool(false));
    };

    for element in elements {
        let Value::Str(org) = scope.eval(element)? else {
            return Ok(Value::Bool(false));
        };
        if value.starts_with(org.as_str()) {
            return Ok(Value::Bool(true));
        }
    }
    Ok(Value::Bool(false))
}

/// `compare_version(x, version, op)`：按点分版本号序比较变量与字面量
///
/// `op` 取 `>` `>=` `=` `!=` `<` `<=` 之一，其他文本判为不匹配；
/// 版本号段格式错误作为错误传播，不折叠成 false。
fn compare_version(args: &[Expr], scope: &Evaluator<'_>) -> Result<Value, EvalError> {
    expect_arg_count("compare_version", args, 3)?;
    let param = scope.eval(&args[0])?;
    let version = literal_str("compare_version", &args[1], "第二个参数（版本号）")?;
    let op = literal_str("compare_version", &args[2], "第三个参数（比较符）")?;

    let Ok(value) = param.as_str("compare_version 变量") else {
        return Ok(Value::Bool(false));
    };

    let ordering = compare_versions(value, version)?;
    let matched = match op {
        ">" => ordering == Ordering::Greater,
        ">=" => ordering != Ordering::Less,
        "=" => ordering == Ordering::Equal,
        "!=" => ordering != Ordering::Equal,
        "<" => ordering == Ordering::Less,
        "<=" => ordering != Ordering::Greater,
        _ => false,
    };
    Ok(Value::Bool(matched))
}
