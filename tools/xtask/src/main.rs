//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-engine`: 运行 rule-engine 覆盖率
//! - `cov-workspace`: 运行 workspace 覆盖率
//! - `rule-check`: 检查规则文件（语法）

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use rule_engine::Rule;

fn run(step: &str, cmd: &mut Command) -> anyhow::Result<()> {
    eprintln!("\n==> {step}");
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("{step} failed with {status}");
    }
    Ok(())
}

fn ensure_cargo_llvm_cov_available() -> anyhow::Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["llvm-cov", "--version"]);
    let status = cmd.status();
    match status {
        Ok(s) if s.success() => Ok(()),
        _ => anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        ),
    }
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let sub = args.next().unwrap_or_else(|| "help".to_string());

    match sub.as_str() {
        "check-all" => {
            let mut fmt = Command::new("cargo");
            fmt.args(["fmt", "--all", "--", "--check"]);
            run("cargo fmt --all -- --check", &mut fmt)?;

            let mut clippy = Command::new("cargo");
            clippy.args(["clippy", "--workspace", "--all-targets"]);
            run("cargo clippy --workspace --all-targets", &mut clippy)?;

            let mut test = Command::new("cargo");
            test.args(["test", "--workspace"]);
            run("cargo test --workspace", &mut test)?;
        }
        "cov-engine" => {
            ensure_cargo_llvm_cov_available()?;

            let mut cov = Command::new("cargo");
            cov.args(["llvm-cov", "-p", "rule-engine", "--all-features", "--html"]);
            run(
                "cargo llvm-cov -p rule-engine --all-features --html",
                &mut cov,
            )?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "cov-workspace" => {
            ensure_cargo_llvm_cov_available()?;

            // 口径上排除 tool crates 以免稀释信号
            let mut cov = Command::new("cargo");
            cov.args([
                "llvm-cov",
                "--workspace",
                "--exclude",
                "xtask",
                "--all-features",
                "--html",
            ]);
            run(
                "cargo llvm-cov --workspace --exclude xtask --all-features --html",
                &mut cov,
            )?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "rule-check" => {
            let path = args.next();
            rule_check(path.as_deref())?;
        }
        "help" | "-h" | "--help" => {
            print_help();
        }
        other => anyhow::bail!("unknown xtask subcommand: {other}"),
    }

    Ok(())
}

fn print_help() {
    eprintln!(
        r#"xtask - 开发辅助工具

USAGE:
  cargo xtask <command>

COMMANDS:
  check-all       运行 fmt、clippy、test 门禁检查
  cov-engine      运行 rule-engine 覆盖率报告
  cov-workspace   运行 workspace 覆盖率报告
  rule-check      检查规则文件

RULE-CHECK:
  cargo xtask rule-check [path]

  不带参数：检查 rules/ 下所有 .rules 文件
  带路径参数：检查指定文件或目录

  规则文件每行一条规则，空行与 '#' 开头的行跳过。
"#
    );
}

//=============================================================================
// rule-check 命令实现
//=============================================================================

/// 执行规则文件检查
fn rule_check(path: Option<&str>) -> anyhow::Result<()> {
    // 确定要检查的文件
    let files = match path {
        Some(p) => {
            let path = PathBuf::from(p);
            if path.is_file() {
                vec![path]
            } else if path.is_dir() {
                collect_rule_files(&path)
            } else {
                anyhow::bail!("路径不存在: {p}");
            }
        }
        None => collect_rule_files(&PathBuf::from("rules")),
    };

    if files.is_empty() {
        eprintln!("没有找到规则文件");
        return Ok(());
    }

    let mut checked = 0usize;
    let mut errors = 0usize;
    for file in &files {
        let text = std::fs::read_to_string(file)?;
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            checked += 1;
            if let Err(e) = Rule::parse(line) {
                errors += 1;
                eprintln!("{}:{}: {e}", file.display(), index + 1);
            }
        }
    }

    eprintln!(
        "\nrule-check: {} 个文件，{checked} 条规则，{errors} 个错误",
        files.len()
    );
    if errors > 0 {
        anyhow::bail!("rule-check 发现 {errors} 个语法错误");
    }
    Ok(())
}

/// 收集目录下所有 .rules 文件
fn collect_rule_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| {
            entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == "rules")
        })
        .map(|entry| entry.into_path())
        .collect()
}
