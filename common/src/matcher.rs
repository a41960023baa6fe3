//! カンバン照合
//!
//! バックエンドに保存されたカンバン表記は読取形式と一致しないことがあるため、
//! 照合方式を優先順に並べ、最初に一致したものを採用する。
//! 各方式は単独でテスト可能な純粋関数。

use crate::codes::{digits_only, ClientLabel, KanbanCode};
use crate::error::{Error, Result};
use crate::types::Item;

/// 照合方式（優先順）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// 読取値と保存値が完全一致
    Exact,
    /// ラベル数字+連番 == 保存値の数字部分
    DigitsEqual,
    /// 保存値の数字部分がラベル数字+連番で終わる
    DigitsSuffix,
    /// 保存値の数字部分 == ラベル数字
    LabelDigits,
    /// 保存値がラベル部分を含む
    ContainsLabel,
    /// 保存値が顧客ラベルそのもの
    BareLabel,
}

/// 評価順
pub const STRATEGIES: [MatchStrategy; 6] = [
    MatchStrategy::Exact,
    MatchStrategy::DigitsEqual,
    MatchStrategy::DigitsSuffix,
    MatchStrategy::LabelDigits,
    MatchStrategy::ContainsLabel,
    MatchStrategy::BareLabel,
];

impl MatchStrategy {
    /// 保存カンバン1件に対して判定
    pub fn matches(&self, scan: &KanbanCode, label: &ClientLabel, stored: &str) -> bool {
        match self {
            MatchStrategy::Exact => scan.raw.eq_ignore_ascii_case(stored.trim()),
            MatchStrategy::DigitsEqual => digits_only(stored) == scan.digits_key(),
            MatchStrategy::DigitsSuffix => {
                let key = scan.digits_key();
                !key.is_empty() && digits_only(stored).ends_with(&key)
            }
            MatchStrategy::LabelDigits => {
                let key = digits_only(&scan.label);
                !key.is_empty() && digits_only(stored) == key
            }
            MatchStrategy::ContainsLabel => stored
                .to_ascii_uppercase()
                .contains(&scan.label.to_ascii_uppercase()),
            MatchStrategy::BareLabel => stored.trim().eq_ignore_ascii_case(label.as_str()),
        }
    }
}

/// 照合結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemMatch {
    /// パレット内アイテムのインデックス
    pub index: usize,
    pub strategy: MatchStrategy,
}

/// 読取カンバンに対応するアイテムを探す
///
/// 方式ごとに全アイテムを走査し、最初に一致した1件を返す。
/// 一致しなければ `KanbanNotFound`。
pub fn find_item(items: &[Item], scan: &KanbanCode, label: &ClientLabel) -> Result<ItemMatch> {
    STRATEGIES
        .iter()
        .find_map(|strategy| {
            items
                .iter()
                .position(|item| strategy.matches(scan, label, &item.kanban))
                .map(|index| ItemMatch { index, strategy: *strategy })
        })
        .ok_or_else(|| Error::KanbanNotFound(scan.raw.clone()))
}

/// アイテムを特定し、顧客ラベルがカンバンのラベル部分と一致するか確認する
pub fn match_scan(items: &[Item], scan: &KanbanCode, label: &ClientLabel) -> Result<ItemMatch> {
    let found = find_item(items, scan, label)?;

    if !scan.matches_label(label) {
        return Err(Error::LabelMismatch {
            label: label.as_str().to_string(),
            expected: scan.label.clone(),
        });
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::{parse_kanban, parse_label};
    use crate::types::{Status, PLACEHOLDER};

    fn item(kanban: &str) -> Item {
        Item {
            kanban: kanban.to_string(),
            sequence: PLACEHOLDER.into(),
            box_quantity: "1".into(),
            piece_quantity: PLACEHOLDER.into(),
            packaging: PLACEHOLDER.into(),
            multiple: PLACEHOLDER.into(),
            status: Status::Pending,
        }
    }

    fn scan() -> (KanbanCode, ClientLabel) {
        (parse_kanban("X|A-123|0007").unwrap(), parse_label("A-123").unwrap())
    }

    #[test]
    fn test_digits_suffix_scenario() {
        let (kanban, label) = scan();
        let items = vec![item("999B4560001"), item("000A1230007")];

        let found = find_item(&items, &kanban, &label).unwrap();
        assert_eq!(found.index, 1);
        assert_eq!(found.strategy, MatchStrategy::DigitsSuffix);
    }

    #[test]
    fn test_each_strategy_individually() {
        let (kanban, label) = scan();
        let cases = [
            (MatchStrategy::Exact, "X|A-123|0007"),
            (MatchStrategy::DigitsEqual, "1230007"),
            (MatchStrategy::DigitsSuffix, "000A1230007"),
            (MatchStrategy::LabelDigits, "K123"),
            (MatchStrategy::ContainsLabel, "KB A-123 LOTE"),
            (MatchStrategy::BareLabel, "a-123"),
        ];

        for (strategy, stored) in cases {
            assert!(strategy.matches(&kanban, &label, stored), "{:?} が {} に一致しない", strategy, stored);
        }
    }

    #[test]
    fn test_lowercase_scan_matches_every_strategy() {
        let kanban = parse_kanban("x|a-123|0007").unwrap();
        let label = parse_label("a-123").unwrap();
        let cases = [
            (MatchStrategy::Exact, "X|A-123|0007"),
            (MatchStrategy::DigitsEqual, "1230007"),
            (MatchStrategy::DigitsSuffix, "000A1230007"),
            (MatchStrategy::LabelDigits, "K123"),
            (MatchStrategy::ContainsLabel, "PN-A-123-7"),
            (MatchStrategy::BareLabel, "A-123"),
        ];

        for (strategy, stored) in cases {
            assert!(strategy.matches(&kanban, &label, stored), "{:?} が {} に一致しない", strategy, stored);

            let upper = find_item(&[item(stored)], &parse_kanban("X|A-123|0007").unwrap(), &parse_label("A-123").unwrap());
            let lower = find_item(&[item(stored)], &kanban, &label);
            assert_eq!(upper.unwrap().strategy, lower.unwrap().strategy);
        }
    }

    #[test]
    fn test_six_forms_resolve_to_same_item() {
        let (kanban, label) = scan();
        let forms = ["X|A-123|0007", "1230007", "000A1230007", "123", "PN-A-123", "A-123"];

        for form in forms {
            let items = vec![item("B-456"), item("4560001"), item(form), item(PLACEHOLDER)];
            let found = find_item(&items, &kanban, &label).unwrap();
            assert_eq!(found.index, 2, "{} が別のアイテムに一致", form);
        }
    }

    #[test]
    fn test_first_strategy_wins_over_item_order() {
        let (kanban, label) = scan();
        // 先頭は ContainsLabel、2件目は Exact。優先度の高い Exact が採用される
        let items = vec![item("A-123 avulso"), item("X|A-123|0007")];

        let found = find_item(&items, &kanban, &label).unwrap();
        assert_eq!(found.index, 1);
        assert_eq!(found.strategy, MatchStrategy::Exact);
    }

    #[test]
    fn test_not_found() {
        let (kanban, label) = scan();
        let items = vec![item("B-456"), item(PLACEHOLDER)];

        let result = find_item(&items, &kanban, &label);
        assert!(matches!(result, Err(Error::KanbanNotFound(_))));
    }

    #[test]
    fn test_empty_pallet_not_found() {
        let (kanban, label) = scan();
        assert!(matches!(find_item(&[], &kanban, &label), Err(Error::KanbanNotFound(_))));
    }

    #[test]
    fn test_placeholder_never_matches() {
        let (kanban, label) = scan();
        for strategy in STRATEGIES {
            assert!(!strategy.matches(&kanban, &label, PLACEHOLDER));
        }
    }

    #[test]
    fn test_label_mismatch() {
        let kanban = parse_kanban("X|A-123|0007").unwrap();
        let label = parse_label("B-999").unwrap();
        let items = vec![item("000A1230007")];

        let result = match_scan(&items, &kanban, &label);
        assert!(matches!(result, Err(Error::LabelMismatch { .. })));
    }

    #[test]
    fn test_match_scan_ok() {
        let (kanban, label) = scan();
        let items = vec![item("000A1230007")];
        assert_eq!(match_scan(&items, &kanban, &label).unwrap().index, 0);
    }
}
