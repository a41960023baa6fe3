//! 読取コードのパーサー
//!
//! 2種類の入力を固定文法で検証する:
//! - 顧客ラベル: `A-123`（英字1文字 + ハイフン + 数字3桁）
//! - カンバン: `X|A-123|0007[|任意]`
//!
//! どちらも純粋関数で、状態の変更や通信は行わない。

use crate::error::{Error, Result};
use regex::Regex;

/// 顧客ラベルの固定長
pub const LABEL_LENGTH: usize = 5;

/// カンバン読取の固定長（`X|A-123|0007`）
pub const KANBAN_SCAN_LENGTH: usize = 12;

lazy_static::lazy_static! {
    static ref LABEL_RE: Regex = Regex::new(r"(?i)^[A-Z]-\d{3}$").unwrap();
    static ref KANBAN_RE: Regex = Regex::new(r"(?i)^X\|([A-Z]-\d{3})\|(\d{4})(?:\|.*)?$").unwrap();
}

/// 検証済みの顧客ラベル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientLabel(String);

impl ClientLabel {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// ラベル内の数字部分（`A-123` → `123`）
    pub fn digits(&self) -> String {
        digits_only(&self.0)
    }
}

/// 検証済みのカンバン
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KanbanCode {
    /// 読取値そのもの
    pub raw: String,
    /// ラベル部分（`A-123`）
    pub label: String,
    /// 連番部分（4桁）
    pub sequence: String,
}

impl KanbanCode {
    /// ラベルの数字 + 連番（`X|A-123|0007` → `1230007`）
    pub fn digits_key(&self) -> String {
        format!("{}{}", digits_only(&self.label), self.sequence)
    }

    /// 顧客ラベルがこのカンバンのラベル部分と一致するか
    pub fn matches_label(&self, label: &ClientLabel) -> bool {
        self.label.eq_ignore_ascii_case(label.as_str())
    }
}

/// 数字のみを取り出す
pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// 顧客ラベルを検証
///
/// # Examples
/// ```
/// use picking_common::parse_label;
///
/// let label = parse_label("A-123").unwrap();
/// assert_eq!(label.as_str(), "A-123");
/// assert!(parse_label("A123").is_err());
/// ```
pub fn parse_label(input: &str) -> Result<ClientLabel> {
    if LABEL_RE.is_match(input) {
        Ok(ClientLabel(input.to_string()))
    } else {
        Err(Error::Validation(format!(
            "etiqueta \"{}\" fora do padrão A-000",
            input
        )))
    }
}

/// ラベル入力欄の状態を判定
///
/// 固定長に満たない間は `None`（待機中）。固定長以上で初めて検証する。
pub fn check_label_buffer(buffer: &str) -> Option<Result<ClientLabel>> {
    if buffer.chars().count() < LABEL_LENGTH {
        return None;
    }
    Some(parse_label(buffer))
}

/// カンバンを検証し、ラベル部分と連番部分を取り出す
pub fn parse_kanban(input: &str) -> Result<KanbanCode> {
    let caps = KANBAN_RE.captures(input).ok_or_else(|| {
        Error::Validation(format!(
            "kanban \"{}\" fora do padrão X|A-000|0000",
            input
        ))
    })?;

    Ok(KanbanCode {
        raw: input.to_string(),
        label: caps[1].to_string(),
        sequence: caps[2].to_string(),
    })
}

/// カンバン入力が読取固定長に達したか（ラベル欄へフォーカス移動の判定）
pub fn kanban_scan_complete(buffer: &str) -> bool {
    buffer.chars().count() >= KANBAN_SCAN_LENGTH
}
