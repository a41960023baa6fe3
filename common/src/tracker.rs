//! 箱数カウントと完了判定
//!
//! アイテムの状態遷移: 未着手(0) → 作業中(1) → 完了(3) / 差異あり(2)
//!
//! ここでは書き戻し内容（[`ScanPlan`]）を組み立てるだけで、通信は行わない。
//! 実行と結果の反映は呼び出し側（オーケストレーター）が担う。

use crate::error::{Error, Result};
use crate::types::{
    Item, ItemProgress, Operation, Pallet, PalletStatusUpdate, ShipmentStatusUpdate, Status,
};

/// 書き戻し1件
#[derive(Debug, Clone, PartialEq)]
pub enum WriteBack {
    Item(ItemProgress),
    Pallet(PalletStatusUpdate),
    Shipment(ShipmentStatusUpdate),
}

impl WriteBack {
    /// エラー表示用の対象名
    pub fn target(&self) -> &'static str {
        match self {
            WriteBack::Item(_) => "o item",
            WriteBack::Pallet(_) => "o palete",
            WriteBack::Shipment(_) => "a carga",
        }
    }
}

/// 1回の読取で行う書き戻しの計画
#[derive(Debug, Clone, PartialEq)]
pub struct ScanPlan {
    /// 対象アイテムのインデックス
    pub index: usize,
    /// 読取後の箱数
    pub boxes_read: u32,
    /// 予定箱数
    pub expected: u32,
    /// この読取でアイテムが完了するか
    pub finalizes: bool,
    /// 実行順の書き戻し
    pub writes: Vec<WriteBack>,
}

/// 1箱読取の計画を立てる
///
/// 1. 予定箱数に達している・確定済みなら `Quantity`（書き戻しなし）
/// 2. パレットが未着手なら先にパレット状態 1 を書き戻す
/// 3. 新しい箱数で読取（operac=1）を書き戻す
/// 4. 予定箱数に達したら完了（operac=3）を書き戻す
pub fn plan_box_read(pallet: &Pallet, index: usize, boxes_read: u32) -> Result<ScanPlan> {
    let item = pallet
        .items
        .get(index)
        .ok_or_else(|| Error::KanbanNotFound(format!("#{}", index)))?;
    let expected = item.expected_boxes();

    if item.status.is_terminal() || boxes_read >= expected {
        return Err(Error::Quantity(item.kanban.clone()));
    }

    let new_count = boxes_read + 1;
    let finalizes = new_count == expected;
    let mut writes = Vec::new();

    if pallet.status == Status::Pending {
        writes.push(WriteBack::Pallet(PalletStatusUpdate {
            cod_carg: pallet.shipment_id.clone(),
            cod_pale: pallet.id.clone(),
            status: Status::InProgress,
        }));
    }

    writes.push(WriteBack::Item(item_progress(pallet, item, new_count, Operation::BoxRead)));

    if finalizes {
        writes.push(WriteBack::Item(item_progress(pallet, item, new_count, Operation::Finalize)));
    }

    Ok(ScanPlan {
        index,
        boxes_read: new_count,
        expected,
        finalizes,
        writes,
    })
}

fn item_progress(pallet: &Pallet, item: &Item, count: u32, operation: Operation) -> ItemProgress {
    ItemProgress {
        cod_carg: pallet.shipment_id.clone(),
        cod_pale: pallet.id.clone(),
        cod_kanb: item.kanban.clone(),
        cod_sequ: item.sequence.clone(),
        qtdrest: count,
        operac: operation,
    }
}

/// 書き戻し成功後のローカル状態反映
///
/// 戻り値は読取セッションに記録する箱数（完了時は 0）
pub fn apply_plan(pallet: &mut Pallet, plan: &ScanPlan) -> u32 {
    if pallet.status == Status::Pending {
        pallet.status = Status::InProgress;
    }

    if let Some(item) = pallet.items.get_mut(plan.index) {
        if plan.finalizes {
            item.status = Status::Finalized;
        } else if item.status == Status::Pending {
            item.status = Status::InProgress;
        }
    }

    if plan.finalizes {
        0
    } else {
        plan.boxes_read
    }
}

/// 全アイテムが完了しているか（空のパレットは完了扱いしない）
pub fn all_items_finalized(items: &[Item]) -> bool {
    !items.is_empty() && items.iter().all(Item::is_finalized)
}

/// パレット完了の書き戻しが必要なら返す（冪等）
pub fn pallet_completion(pallet: &Pallet) -> Option<PalletStatusUpdate> {
    if pallet.status == Status::Finalized || !all_items_finalized(&pallet.items) {
        return None;
    }
    Some(PalletStatusUpdate {
        cod_carg: pallet.shipment_id.clone(),
        cod_pale: pallet.id.clone(),
        status: Status::Finalized,
    })
}

/// 全パレットが完了していれば出荷完了の書き戻しを返す（空の出荷は対象外）
pub fn shipment_completion(shipment_id: &str, pallets: &[Pallet]) -> Option<ShipmentStatusUpdate> {
    if pallets.is_empty() || pallets.iter().any(|p| p.status != Status::Finalized) {
        return None;
    }
    Some(ShipmentStatusUpdate {
        cod_carg: shipment_id.to_string(),
        status: Status::Finalized,
    })
}
