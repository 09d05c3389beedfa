//! # rule-cli - 规则求值命令行工具
//!
//! ## 命令
//!
//! - `eval <expr> [--data <json>]`: 对单条规则求值
//! - `check <file>`: 逐行检查规则文件的语法
//!
//! ## 退出码
//!
//! - 0: 匹配成功 / 检查通过
//! - 1: 不匹配 / 检查发现语法错误
//! - 2: 求值或参数错误

use std::process::ExitCode;

use anyhow::Context;
use rule_engine::{Bindings, Rule, match_rule};

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("rule-cli error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    let mut args = std::env::args().skip(1);
    let sub = args.next().unwrap_or_else(|| "help".to_string());

    match sub.as_str() {
        "eval" => {
            let expr = args
                .next()
                .context("eval 需要规则表达式参数，见 rule-cli help")?;
            let data = parse_data_flag(args)?;
            eval_rule(&expr, &data)
        }
        "check" => {
            let path = args
                .next()
                .context("check 需要规则文件路径参数，见 rule-cli help")?;
            check_file(&path)
        }
        "help" | "-h" | "--help" => {
            print_help();
            Ok(ExitCode::SUCCESS)
        }
        other => anyhow::bail!("unknown rule-cli subcommand: {other}"),
    }
}

/// 解析 `--data <json>`，缺省为空环境
fn parse_data_flag(mut args: impl Iterator<Item = String>) -> anyhow::Result<String> {
    match args.next().as_deref() {
        None => Ok("{}".to_string()),
        Some("--data") => args.next().context("--data 需要 JSON 参数"),
        Some(other) => anyhow::bail!("unknown eval flag: {other}"),
    }
}

fn eval_rule(expr: &str, data: &str) -> anyhow::Result<ExitCode> {
    let json: serde_json::Value =
        serde_json::from_str(data).context("解析 --data JSON 失败")?;
    let env = Bindings::from_json_value(&json).context("绑定环境变量失败")?;

    let matched = match_rule(expr, &env)?;
    if matched {
        println!("matched");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("not matched");
        Ok(ExitCode::from(1))
    }
}

/// 逐行检查规则文件；空行与 `#` 开头的行跳过
fn check_file(path: &str) -> anyhow::Result<ExitCode> {
    let text = std::fs::read_to_string(path).with_context(|| format!("读取 {path} 失败"))?;

    let mut errors = 0usize;
    let mut checked = 0usize;
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        checked += 1;
        if let Err(e) = Rule::parse(line) {
            errors += 1;
            eprintln!("{path}:{}: {e}", index + 1);
        }
    }

    eprintln!("checked {checked} rule(s), {errors} error(s)");
    if errors == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

fn print_help() {
    eprintln!(
        r#"rule-cli - 规则求值命令行工具

USAGE:
  rule-cli eval <expr> [--data <json>]
  rule-cli check <file>

EXAMPLES:
  rule-cli eval 'a == 1 && c == "test"' --data '{{"a": 1, "c": "test"}}'
  rule-cli eval 'in_organization(org, "111111/222222")' --data '{{"org": "111111/222222/333333"}}'
  rule-cli check rules.txt

EXIT CODES:
  0  匹配成功 / 检查通过
  1  不匹配 / 检查发现语法错误
  2  求值或参数错误
"#
    );
}
