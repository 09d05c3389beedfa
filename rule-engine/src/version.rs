//! # Version 模块
//!
//! 点分十进制版本号比较，供内置函数 `compare_version` 使用。

use std::cmp::Ordering;

use crate::error::EvalError;

/// 比较两个点分版本号
///
/// 按 `.` 切分后逐段从左到右比较，较短一侧缺失的尾段按 0 处理。
/// 任何一段不是非负整数都返回 [`EvalError::BadVersionSegment`]。
///
/// # 示例
///
/// - `1.1` 与 `1.0` → `Greater`
/// - `1.0` 与 `1.0.0` → `Equal`
/// - `0.9.1` 与 `1.0.0` → `Less`
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering, EvalError> {
    let left: Vec<&str> = a.split('.').collect();
    let right: Vec<&str> = b.split('.').collect();
    let len = left.len().max(right.len());

    for i in 0..len {
        let x = parse_segment(left.get(i).copied())?;
        let y = parse_segment(right.get(i).copied())?;
        match x.cmp(&y) {
            Ordering::Equal => continue,
            other => return Ok(other),
        }
    }
    Ok(Ordering::Equal)
}

/// 解析单个版本号段；缺失的段按 0 处理
fn parse_segment(segment: Option<&str>) -> Result<u64, EvalError> {
    match segment {
        None => Ok(0),
        Some(s) => s.parse::<u64>().map_err(|_| EvalError::BadVersionSegment {
            segment: s.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_orderings() {
        assert_eq!(compare_versions("1.1", "1.0").unwrap(), Ordering::Greater);
        assert_eq!(compare_versions("0.9.1", "1.0.0").unwrap(), Ordering::Less);
        assert_eq!(compare_versions("1.0.0", "1.0.0").unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_missing_segments_read_as_zero() {
        assert_eq!(compare_versions("1.0", "1.0.0").unwrap(), Ordering::Equal);
        assert_eq!(compare_versions("1", "1.0.0.0").unwrap(), Ordering::Equal);
        assert_eq!(compare_versions("1.0.1", "1.0").unwrap(), Ordering::Greater);
        assert_eq!(compare_versions("2", "1.9.9").unwrap(), Ordering::Greater);
    }

    #[test]
    fn test_numeric_not_lexicographic() {
        // 按段数值比较，不是字符串字典序
        assert_eq!(compare_versions("10.0", "9.0").unwrap(), Ordering::Greater);
        assert_eq!(compare_versions("1.10", "1.9").unwrap(), Ordering::Greater);
    }

    #[test]
    fn test_malformed_segment() {
        let err = compare_versions("1.x.0", "1.0").unwrap_err();
        assert_eq!(
            err,
            EvalError::BadVersionSegment {
                segment: "x".to_string()
            }
        );

        // 空串切分出空段
        assert!(compare_versions("", "1.0").is_err());
        // 负数段不是非负整数
        assert!(compare_versions("1.-2", "1.0").is_err());
    }

    #[test]
    fn test_antisymmetry_and_reflexivity() {
        let versions = ["0", "0.0.1", "0.9.9", "1.0", "1.0.0", "1.1", "2.0.3", "10.2"];
        for a in versions {
            assert_eq!(compare_versions(a, a).unwrap(), Ordering::Equal);
            for b in versions {
                let ab = compare_versions(a, b).unwrap();
                let ba = compare_versions(b, a).unwrap();
                assert_eq!(ab, ba.reverse());
            }
        }
    }
}
