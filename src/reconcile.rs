//! 照合オーケストレーター
//!
//! 入力イベントごとに パーサー → 照合 → 順序ポリシー → 箱数カウント を実行し、
//! 書き戻しを1件ずつ待ってから次へ進む。
//! フォーカス移動や通知は [`UiEffect`] として呼び出し側に返す。

use crate::gateway::{load_shipment, PickingGateway};
use picking_common::{
    all_items_finalized, apply_plan, check_label_buffer, check_leave_pallet, check_sequence,
    kanban_scan_complete, match_scan, pallet_completion, parse_kanban, plan_box_read,
    shipment_completion, ClientLabel, Error, Pallet, Result, ScanPlan, ScanSession, Status, WriteBack, SUCCESS_NOTICE_MS,
};
use std::time::Duration;
use tracing::{debug, info, warn};

/// 画面側で行う副作用
#[derive(Debug, Clone, PartialEq)]
pub enum UiEffect {
    /// 顧客ラベル入力欄へフォーカス
    FocusLabel,
    /// 前回のエラー・成功表示を消す
    ClearNotices,
    /// 両方の入力欄をクリア
    ClearInputs,
    /// 一定時間後に自動で消える成功表示
    ShowSuccess { message: String, dismiss_after: Duration },
    ShowError(String),
    /// 出荷の全パレット完了
    ShipmentComplete,
}

/// 完了判定の結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Completion {
    pub pallet_finalized: bool,
    pub shipment_finalized: bool,
}

/// 1回の読取の結果
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    pub kanban: String,
    pub boxes_read: u32,
    pub expected: u32,
    pub item_finalized: bool,
    pub completion: Completion,
}

impl ScanReport {
    /// 成功表示のメッセージ
    pub fn message(&self) -> String {
        if self.completion.shipment_finalized {
            "Carga finalizada com sucesso!".to_string()
        } else if self.completion.pallet_finalized {
            "Palete finalizado!".to_string()
        } else if self.item_finalized {
            format!("Kanban {} finalizado ({}/{})", self.kanban, self.boxes_read, self.expected)
        } else {
            format!("Caixa {}/{} lida", self.boxes_read, self.expected)
        }
    }
}

/// パレット詳細画面1つ分の照合状態
pub struct Reconciler<G> {
    gateway: G,
    shipment_id: String,
    pallets: Vec<Pallet>,
    pallet_index: usize,
    session: ScanSession,
    shipment_finalized: bool,
}

impl<G: PickingGateway> Reconciler<G> {
    /// 出荷のパレットとアイテムを読み込んで開始
    ///
    /// 前回の完了書き戻しが失敗していた場合はここで書き戻しをやり直す。
    /// やり直しに失敗しても画面は開く（移動・再取得時に再度試みる）。
    pub async fn open(gateway: G, shipment_id: &str) -> Result<Self> {
        let pallets = load_shipment(&gateway, shipment_id).await?;
        let listed = gateway
            .fetch_shipments()
            .await?
            .into_iter()
            .find(|s| s.id == shipment_id)
            .map(|s| s.status);
        let shipment_finalized = match listed {
            Some(status) => status == Status::Finalized,
            // 一覧にない出荷は読込時点で全パレット完了なら完了済み
            None => shipment_completion(shipment_id, &pallets).is_some(),
        };
        info!(shipment = shipment_id, pallets = pallets.len(), "shipment loaded");

        let mut reconciler = Self {
            gateway,
            shipment_id: shipment_id.to_string(),
            pallets,
            pallet_index: 0,
            session: ScanSession::new(),
            shipment_finalized,
        };

        if let Err(e) = reconciler.settle().await {
            warn!(shipment = shipment_id, error = %e, "pending completion not written");
        }
        Ok(reconciler)
    }

    pub fn shipment_id(&self) -> &str {
        &self.shipment_id
    }

    pub fn pallets(&self) -> &[Pallet] {
        &self.pallets
    }

    pub fn pallet_index(&self) -> usize {
        self.pallet_index
    }

    /// 現在のパレット（パレットのない出荷では None）
    pub fn current_pallet(&self) -> Option<&Pallet> {
        self.pallets.get(self.pallet_index)
    }

    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    /// この画面で出荷完了を書き戻したか
    pub fn is_shipment_finalized(&self) -> bool {
        self.shipment_finalized
    }

    /// カンバン入力欄の変更
    ///
    /// 読取固定長に達したらラベル欄へフォーカスを移す。ラベル欄は毎回クリアする。
    pub fn on_kanban_input(&mut self, value: &str) -> Vec<UiEffect> {
        self.session.kanban_buffer = value.to_string();
        self.session.label_buffer.clear();

        if kanban_scan_complete(value) {
            vec![UiEffect::FocusLabel]
        } else {
            Vec::new()
        }
    }

    /// 顧客ラベル入力欄の変更
    ///
    /// 固定長未満なら表示を消して待機。固定長に達したら照合を実行する。
    pub async fn on_label_input(&mut self, value: &str) -> Vec<UiEffect> {
        self.session.label_buffer = value.to_string();

        let label = match check_label_buffer(value) {
            None => return vec![UiEffect::ClearNotices],
            Some(Err(e)) => return vec![UiEffect::ShowError(e.to_string())],
            Some(Ok(label)) => label,
        };

        match self.reconcile(&label).await {
            Ok(report) => {
                self.session.clear_inputs();
                let mut effects = vec![
                    UiEffect::ShowSuccess {
                        message: report.message(),
                        dismiss_after: Duration::from_millis(SUCCESS_NOTICE_MS),
                    },
                    UiEffect::ClearInputs,
                ];
                if report.completion.shipment_finalized {
                    effects.push(UiEffect::ShipmentComplete);
                }
                effects
            }
            Err(e) => {
                if e.is_remote() {
                    warn!(error = %e, "scan not recorded");
                } else {
                    debug!(error = %e, "scan rejected");
                }
                vec![UiEffect::ShowError(e.to_string())]
            }
        }
    }

    /// 現在のカンバン入力と検証済みラベルで1箱分を照合する
    ///
    /// 失敗時はパレット・アイテムの状態を変更しない
    pub async fn reconcile(&mut self, label: &ClientLabel) -> Result<ScanReport> {
        let kanban = parse_kanban(&self.session.kanban_buffer)?;

        let pallet = self
            .pallets
            .get(self.pallet_index)
            .ok_or_else(|| Error::KanbanNotFound(kanban.raw.clone()))?;

        let found = match_scan(&pallet.items, &kanban, label)?;
        debug!(kanban = %kanban.raw, index = found.index, strategy = ?found.strategy, "kanban matched");

        check_sequence(&pallet.items, &pallet.items[found.index])?;

        let plan = plan_box_read(pallet, found.index, self.session.boxes_read_for(found.index))?;
        let kanban_code = pallet.items[found.index].kanban.clone();

        self.execute(&plan).await?;

        let pallet = &mut self.pallets[self.pallet_index];
        let count = apply_plan(pallet, &plan);
        if plan.finalizes {
            info!(kanban = %kanban_code, boxes = plan.boxes_read, "item finalized");
            self.session.reset_item();
        } else {
            self.session.record(found.index, count);
        }

        let completion = if plan.finalizes {
            self.recompute_completion().await?
        } else {
            Completion::default()
        };

        Ok(ScanReport {
            kanban: kanban_code,
            boxes_read: plan.boxes_read,
            expected: plan.expected,
            item_finalized: plan.finalizes,
            completion,
        })
    }

    /// 計画の書き戻しを順に実行（1件でも失敗したら中断）
    async fn execute(&self, plan: &ScanPlan) -> Result<()> {
        for write in &plan.writes {
            let result = match write {
                WriteBack::Item(body) => self.gateway.post_item_progress(body).await,
                WriteBack::Pallet(body) => self.gateway.post_pallet_status(body).await,
                WriteBack::Shipment(body) => self.gateway.post_shipment_status(body).await,
            };
            if let Err(e) = result {
                warn!(resource = write.target(), error = %e, "write-back failed");
                return Err(e);
            }
        }
        Ok(())
    }

    /// 現在のパレットと出荷の完了判定をやり直す
    ///
    /// アイテムを再取得して全件完了ならパレット状態 3 を書き戻し、
    /// パレットが完了していれば出荷のパレットを再取得して全件完了なら出荷状態 3 を書き戻す。
    /// 何度呼んでも同じ書き戻しは繰り返さない。
    pub async fn recompute_completion(&mut self) -> Result<Completion> {
        let mut completion = Completion::default();

        let pallet_id = match self.current_pallet() {
            Some(p) => p.id.clone(),
            None => return Ok(completion),
        };

        let items = self
            .gateway
            .fetch_pallet_items(&self.shipment_id, &pallet_id)
            .await?;
        self.pallets[self.pallet_index].items = items;

        completion.pallet_finalized = self.finalize_pallet(self.pallet_index).await?;

        if self.pallets[self.pallet_index].status != Status::Finalized {
            return Ok(completion);
        }

        let fresh = self.gateway.fetch_shipment_pallets(&self.shipment_id).await?;
        for pallet in &mut self.pallets {
            if let Some(f) = fresh.iter().find(|f| f.id == pallet.id) {
                pallet.status = f.status;
            }
        }

        completion.shipment_finalized = self.finalize_shipment().await?;
        Ok(completion)
    }

    /// 読込済みの状態から、書き戻されていない完了をすべて書き戻す
    async fn settle(&mut self) -> Result<()> {
        for index in 0..self.pallets.len() {
            self.finalize_pallet(index).await?;
        }
        self.finalize_shipment().await?;
        Ok(())
    }

    /// 全アイテム完了のパレットに状態 3 を書き戻す（書き戻したら true）
    async fn finalize_pallet(&mut self, index: usize) -> Result<bool> {
        let Some(update) = self.pallets.get(index).and_then(pallet_completion) else {
            return Ok(false);
        };
        self.gateway.post_pallet_status(&update).await?;
        self.pallets[index].status = Status::Finalized;
        info!(pallet = %update.cod_pale, "pallet finalized");
        Ok(true)
    }

    /// 全パレット完了の出荷に状態 3 を書き戻す（1画面につき1回まで）
    async fn finalize_shipment(&mut self) -> Result<bool> {
        if self.shipment_finalized {
            return Ok(false);
        }
        let Some(update) = shipment_completion(&self.shipment_id, &self.pallets) else {
            return Ok(false);
        };
        self.gateway.post_shipment_status(&update).await?;
        self.shipment_finalized = true;
        info!(shipment = %self.shipment_id, "shipment finalized");
        Ok(true)
    }

    /// 現在のパレットのアイテムを再取得し、完了判定をやり直す
    pub async fn refresh_pallet(&mut self) -> Result<Completion> {
        self.session.reset();
        self.recompute_completion().await
    }

    /// 次のパレットへ（末尾なら移動しない）
    pub async fn next_pallet(&mut self) -> Result<bool> {
        if self.pallet_index + 1 >= self.pallets.len() {
            return Ok(false);
        }
        self.leave_current().await?;
        self.pallet_index += 1;
        Ok(true)
    }

    /// 前のパレットへ（先頭なら移動しない）
    pub async fn previous_pallet(&mut self) -> Result<bool> {
        if self.pallet_index == 0 {
            return Ok(false);
        }
        self.leave_current().await?;
        self.pallet_index -= 1;
        Ok(true)
    }

    /// パレットコードを指定して移動（見つからなければ false）
    pub async fn select_pallet(&mut self, pallet_id: &str) -> Result<bool> {
        let Some(index) = self.pallets.iter().position(|p| p.id == pallet_id) else {
            return Ok(false);
        };
        if index != self.pallet_index {
            self.leave_current().await?;
            self.pallet_index = index;
        }
        Ok(true)
    }

    /// 作業中のままでも全アイテムが完了していれば、完了を書き戻してから離れる
    async fn leave_current(&mut self) -> Result<()> {
        let unsettled = self
            .current_pallet()
            .is_some_and(|p| p.status == Status::InProgress && all_items_finalized(&p.items));
        if unsettled {
            self.recompute_completion().await?;
        }

        if let Some(pallet) = self.current_pallet() {
            check_leave_pallet(pallet)?;
        }
        self.session.reset();
        Ok(())
    }
}
