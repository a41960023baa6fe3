//! 読取セッション
//!
//! パレット詳細画面1つにつき1セッション。保存はしない。

use crate::error::{Error, Result};
use crate::types::{Pallet, Status};

/// 成功メッセージの自動消去までの時間（ミリ秒）
pub const SUCCESS_NOTICE_MS: u64 = 2000;

/// 読取セッションの状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSession {
    /// カンバン入力欄
    pub kanban_buffer: String,
    /// 顧客ラベル入力欄
    pub label_buffer: String,
    /// 照合中アイテムのインデックス
    pub active_item: Option<usize>,
    /// 照合中アイテムの読取済み箱数
    pub boxes_read: u32,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 対象アイテムの読取済み箱数を取得（対象が変わったら 0 から数え直す）
    pub fn boxes_read_for(&self, index: usize) -> u32 {
        if self.active_item == Some(index) {
            self.boxes_read
        } else {
            0
        }
    }

    /// 読取結果を記録
    pub fn record(&mut self, index: usize, boxes_read: u32) {
        self.active_item = Some(index);
        self.boxes_read = boxes_read;
    }

    /// 照合中アイテムをリセット（完了時・パレット切替時）
    pub fn reset_item(&mut self) {
        self.active_item = None;
        self.boxes_read = 0;
    }

    /// 次の読取に備えて両方の入力欄をクリア
    pub fn clear_inputs(&mut self) {
        self.kanban_buffer.clear();
        self.label_buffer.clear();
    }

    /// パレット切替時のリセット
    pub fn reset(&mut self) {
        self.clear_inputs();
        self.reset_item();
    }
}

/// 現在のパレットから離れてよいか
///
/// 作業中（1）のパレットは完了または差異ありになるまで移動不可
pub fn check_leave_pallet(pallet: &Pallet) -> Result<()> {
    if pallet.status == Status::InProgress {
        return Err(Error::PalletInProgress(pallet.id.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pallet(status: Status) -> Pallet {
        serde_json::from_value(serde_json::json!({
            "cod_palete": "P01",
            "stat_pale": status.code().to_string(),
        }))
        .unwrap()
    }

    #[test]
    fn test_boxes_read_resets_on_item_change() {
        let mut session = ScanSession::new();
        session.record(2, 1);
        assert_eq!(session.boxes_read_for(2), 1);
        assert_eq!(session.boxes_read_for(0), 0);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = ScanSession {
            kanban_buffer: "X|A-123|0007".into(),
            label_buffer: "A-123".into(),
            active_item: Some(1),
            boxes_read: 2,
        };
        session.reset();
        assert_eq!(session, ScanSession::default());
    }

    #[test]
    fn test_clear_inputs_keeps_count() {
        let mut session = ScanSession::new();
        session.kanban_buffer = "X|A-123|0007".into();
        session.record(0, 1);
        session.clear_inputs();
        assert!(session.kanban_buffer.is_empty());
        assert_eq!(session.boxes_read_for(0), 1);
    }

    #[test]
    fn test_check_leave_pallet() {
        assert!(check_leave_pallet(&pallet(Status::Pending)).is_ok());
        assert!(check_leave_pallet(&pallet(Status::Finalized)).is_ok());
        assert!(check_leave_pallet(&pallet(Status::Divergent)).is_ok());
        assert!(matches!(
            check_leave_pallet(&pallet(Status::InProgress)),
            Err(Error::PalletInProgress(_))
        ));
    }
}
