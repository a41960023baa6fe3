//! 作業順序ポリシー
//!
//! パレット内アイテムの順序番号の付き方で3つの方式に分類する:
//! - 全件順序あり: 未完了のうち最小の順序番号のアイテムのみ作業可
//! - 全件順序なし: 未完了なら任意の順で作業可
//! - 混在: 順序ありを昇順で全て完了させてから、順序なしを任意の順で作業可
//!
//! 判定は呼び出し時点のアイテム一覧から毎回導出する（状態を保持しない）。

use crate::error::{Error, Result};
use crate::types::Item;

/// 順序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    AllSequenced,
    NoneSequenced,
    Mixed,
}

/// パレットの順序方式を判定
///
/// 空のパレットは「順序なし」とする
pub fn classify(items: &[Item]) -> Regime {
    let sequenced = items.iter().filter(|i| i.is_sequenced()).count();
    if sequenced == 0 {
        Regime::NoneSequenced
    } else if sequenced == items.len() {
        Regime::AllSequenced
    } else {
        Regime::Mixed
    }
}

/// 未完了の順序ありアイテムのうち最小の順序番号
pub fn next_sequence(items: &[Item]) -> Option<u32> {
    items
        .iter()
        .filter(|i| !i.is_finalized())
        .filter_map(|i| i.sequence_number())
        .min()
}

/// 対象アイテムを次に作業してよいか判定
///
/// 完了済みのアイテムはここでは拒否せず、数量チェックに委ねる。
pub fn check_sequence(items: &[Item], target: &Item) -> Result<()> {
    if target.is_finalized() {
        return Ok(());
    }

    match classify(items) {
        Regime::NoneSequenced => Ok(()),
        Regime::AllSequenced | Regime::Mixed => {
            let next = match next_sequence(items) {
                Some(n) => n,
                None => return Ok(()),
            };

            match target.sequence_number() {
                Some(seq) if seq == next => Ok(()),
                Some(seq) => Err(Error::Sequencing(format!(
                    "sequência {} solicitada, próxima é {}",
                    seq, next
                ))),
                None => Err(Error::Sequencing(format!(
                    "itens sem sequência só após concluir os sequenciados (próxima é {})",
                    next
                ))),
            }
        }
    }
}

/// 表示順のインデックス
///
/// 未完了を先、完了を最後に。未完了の中では順序ありを昇順、順序なしはその後ろ。
pub fn display_order(items: &[Item]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by_key(|&i| {
        let item = &items[i];
        (
            item.is_finalized(),
            item.sequence_number().is_none(),
            item.sequence_number().unwrap_or(0),
        )
    });
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Status, PLACEHOLDER};

    fn item(seq: &str, status: Status) -> Item {
        Item {
            kanban: format!("K{}", seq),
            sequence: seq.to_string(),
            box_quantity: "2".into(),
            piece_quantity: PLACEHOLDER.into(),
            packaging: PLACEHOLDER.into(),
            multiple: PLACEHOLDER.into(),
            status,
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(&[]), Regime::NoneSequenced);
        assert_eq!(
            classify(&[item("1", Status::Pending), item("2", Status::Pending)]),
            Regime::AllSequenced
        );
        assert_eq!(
            classify(&[item("0", Status::Pending), item("-", Status::Pending)]),
            Regime::NoneSequenced
        );
        assert_eq!(
            classify(&[item("1", Status::Pending), item("0", Status::Pending)]),
            Regime::Mixed
        );
    }

    #[test]
    fn test_all_sequenced_order() {
        let mut items = vec![
            item("1", Status::Pending),
            item("2", Status::Pending),
            item("3", Status::Pending),
        ];

        assert!(check_sequence(&items, &items[0]).is_ok());
        assert!(matches!(check_sequence(&items, &items[1]), Err(Error::Sequencing(_))));
        assert!(matches!(check_sequence(&items, &items[2]), Err(Error::Sequencing(_))));

        items[0].status = Status::Finalized;
        assert!(check_sequence(&items, &items[1]).is_ok());
        assert!(matches!(check_sequence(&items, &items[2]), Err(Error::Sequencing(_))));
    }

    #[test]
    fn test_all_sequenced_unordered_list() {
        // 一覧の並び順ではなく順序番号で判定する
        let items = vec![item("5", Status::Pending), item("2", Status::InProgress)];
        assert!(check_sequence(&items, &items[1]).is_ok());
        assert!(check_sequence(&items, &items[0]).is_err());
    }

    #[test]
    fn test_none_sequenced_any_order() {
        let items = vec![item("-", Status::Pending), item("0", Status::Pending), item("", Status::Pending)];
        for target in &items {
            assert!(check_sequence(&items, target).is_ok());
        }
    }

    #[test]
    fn test_mixed_sequenced_first() {
        let mut items = vec![
            item("0", Status::Pending),
            item("2", Status::Pending),
            item("1", Status::Pending),
            item("-", Status::Pending),
        ];

        assert!(matches!(check_sequence(&items, &items[0]), Err(Error::Sequencing(_))));
        assert!(matches!(check_sequence(&items, &items[1]), Err(Error::Sequencing(_))));
        assert!(check_sequence(&items, &items[2]).is_ok());

        items[2].status = Status::Finalized;
        assert!(check_sequence(&items, &items[1]).is_ok());
        assert!(check_sequence(&items, &items[3]).is_err());

        items[1].status = Status::Finalized;
        assert!(check_sequence(&items, &items[0]).is_ok());
        assert!(check_sequence(&items, &items[3]).is_ok());
    }

    #[test]
    fn test_finalized_target_passes_through() {
        let items = vec![item("1", Status::Pending), item("2", Status::Finalized)];
        assert!(check_sequence(&items, &items[1]).is_ok());
    }

    #[test]
    fn test_divergent_blocks_sequence() {
        // 差異ありは完了ではないので順番待ちの対象になる
        let items = vec![item("1", Status::Divergent), item("2", Status::Pending)];
        assert_eq!(next_sequence(&items), Some(1));
        assert!(check_sequence(&items, &items[1]).is_err());
    }

    #[test]
    fn test_display_order() {
        let items = vec![
            item("2", Status::Finalized),
            item("-", Status::Pending),
            item("3", Status::Pending),
            item("1", Status::InProgress),
            item("0", Status::Pending),
        ];
        assert_eq!(display_order(&items), vec![3, 2, 1, 4, 0]);
    }

    #[test]
    fn test_next_sequence() {
        let items = vec![item("3", Status::Pending), item("1", Status::Finalized), item("2", Status::Pending)];
        assert_eq!(next_sequence(&items), Some(2));
        assert_eq!(next_sequence(&[item("1", Status::Finalized)]), None);
    }
}
