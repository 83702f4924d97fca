use crate::models::{Aggregation, AggregationWarning};
use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;
use std::str::FromStr;

/// 可按单据号聚合的明细行
pub trait LineItem {
    /// 单据号列名
    const KEY_COLUMN: &'static str;

    fn document_key(&self) -> &str;

    /// 取自首行的表头字段 (列名, 值)
    fn header_fields(&self) -> Vec<(&'static str, &str)>;
}

/// 按单据号分组, 保持首次出现顺序; 空单据号同样成组
pub fn group_by_key<L: LineItem>(rows: Vec<L>) -> IndexMap<String, Vec<L>> {
    let mut groups: IndexMap<String, Vec<L>> = IndexMap::new();
    for row in rows {
        groups
            .entry(row.document_key().to_string())
            .or_default()
            .push(row);
    }
    groups
}

/// 分组 + 表头校验 + 按组归约
///
/// `reduce` 收到的行列表非空。
pub fn aggregate_by_key<L, A, F>(rows: Vec<L>, mut reduce: F) -> Aggregation<A>
where
    L: LineItem,
    F: FnMut(String, Vec<L>, &mut Vec<AggregationWarning>) -> A,
{
    let row_count = rows.len();
    let groups = group_by_key(rows);
    tracing::debug!("Grouped {} rows by {} into {} documents", row_count, L::KEY_COLUMN, groups.len());

    let mut warnings = Vec::new();
    let items = groups
        .into_iter()
        .map(|(key, lines)| {
            check_headers(&key, &lines, &mut warnings);
            reduce(key, lines, &mut warnings)
        })
        .collect();

    Aggregation { items, warnings }
}

/// 表头字段以首行为准, 其余行不一致时记告警
pub fn check_headers<L: LineItem>(key: &str, lines: &[L], warnings: &mut Vec<AggregationWarning>) {
    let Some((first, rest)) = lines.split_first() else {
        return;
    };
    let expected = first.header_fields();

    for (offset, line) in rest.iter().enumerate() {
        for ((column, want), (_, got)) in expected.iter().zip(line.header_fields()) {
            if *want != got {
                warnings.push(AggregationWarning::HeaderMismatch {
                    key: key.to_string(),
                    item: offset + 2,
                    column: column.to_string(),
                    expected: want.to_string(),
                    found: got.to_string(),
                });
            }
        }
    }
}

/// 科学计数法指数上限, 超出视为无法解析
const MAX_EXPONENT: i64 = 64;

/// 解析金额: 仅接受普通十进制写法, 整数部分可带严格的三位千分位逗号;
/// 空值, 非数字或其他分隔写法 (如 `12,50`, `1_000`) 返回 None
pub fn parse_amount(raw: &str) -> Option<BigDecimal> {
    let trimmed = raw.trim();
    let (mantissa, exponent) = match trimmed.find(|c| c == 'e' || c == 'E') {
        Some(pos) => (&trimmed[..pos], Some(parse_exponent(&trimmed[pos + 1..])?)),
        None => (trimmed, None),
    };

    let (negative, unsigned) = match mantissa.as_bytes().first() {
        Some(b'-') => (true, &mantissa[1..]),
        Some(b'+') => (false, &mantissa[1..]),
        _ => (false, mantissa),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (unsigned, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !is_digits(frac_part) {
        return None;
    }
    let int_digits = strip_grouping(int_part)?;

    let mut normalized = String::with_capacity(trimmed.len() + 2);
    if negative {
        normalized.push('-');
    }
    normalized.push_str(if int_digits.is_empty() { "0" } else { &int_digits });
    if !frac_part.is_empty() {
        normalized.push('.');
        normalized.push_str(frac_part);
    }
    if let Some(exp) = exponent {
        normalized.push_str(&format!("e{}", exp));
    }
    BigDecimal::from_str(&normalized).ok()
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

/// 整数部分: 无逗号时须全为数字; 有逗号时首组 1-3 位, 其后每组恰好 3 位
fn strip_grouping(int_part: &str) -> Option<String> {
    if !int_part.contains(',') {
        return is_digits(int_part).then(|| int_part.to_string());
    }
    let mut groups = int_part.split(',');
    let head = groups.next()?;
    if head.is_empty() || head.len() > 3 || !is_digits(head) {
        return None;
    }
    let mut digits = head.to_string();
    for group in groups {
        if group.len() != 3 || !is_digits(group) {
            return None;
        }
        digits.push_str(group);
    }
    Some(digits)
}

fn parse_exponent(raw: &str) -> Option<i64> {
    let digits = raw.strip_prefix(|c| c == '+' || c == '-').unwrap_or(raw);
    if digits.is_empty() || !is_digits(digits) {
        return None;
    }
    let exp: i64 = raw.parse().ok()?;
    (exp.abs() <= MAX_EXPONENT).then_some(exp)
}

/// 对一列求和, 无法解析的值按 0 计并记告警
pub fn sum_column<L, F>(
    key: &str,
    lines: &[L],
    column: &'static str,
    value: F,
    warnings: &mut Vec<AggregationWarning>,
) -> BigDecimal
where
    F: Fn(&L) -> &str,
{
    let mut total = BigDecimal::zero();
    for (idx, line) in lines.iter().enumerate() {
        let raw = value(line);
        match parse_amount(raw) {
            Some(amount) => total += amount,
            None => warnings.push(AggregationWarning::UnparsableAmount {
                key: key.to_string(),
                item: idx + 1,
                column: column.to_string(),
                value: raw.to_string(),
            }),
        }
    }
    total
}
