//! 対話式ピッキング画面
//!
//! パレット詳細画面の代わりに端末上でカンバン・顧客ラベルを読み取る。
//! 表示用の整形は純粋関数にして、プロンプトのループから分離している。

use crate::error::{PickingError, Result};
use crate::gateway::PickingGateway;
use crate::reconcile::{Reconciler, UiEffect};
use dialoguer::Input;
use picking_common::{display_order, Pallet, Shipment};

/// カンバン欄で受け付ける操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// カンバンを読取
    Scan(String),
    /// 前のパレット
    Previous,
    /// 次のパレット
    Next,
    /// アイテムを再取得
    Refresh,
    /// 終了
    Quit,
}

/// カンバン欄の入力を操作に変換
pub fn parse_action(input: &str) -> SessionAction {
    match input.trim() {
        "<" => SessionAction::Previous,
        ">" => SessionAction::Next,
        "r" | "R" => SessionAction::Refresh,
        "q" | "Q" => SessionAction::Quit,
        other => SessionAction::Scan(other.to_string()),
    }
}

/// パレットの見出しとアイテム一覧（表示順）
pub fn render_pallet(pallet: &Pallet, position: usize, total: usize) -> String {
    let mut lines = vec![
        format!(
            "Palete {} ({}/{})  Lane {}  Grupo {}  Ordem {}  Doca {}  [{}]",
            pallet.id,
            position + 1,
            total,
            pallet.lane,
            pallet.group,
            pallet.order,
            pallet.dock,
            pallet.status.label()
        ),
        format!(
            "  {:>4}  {:<16} {:>6} {:>6} {:<10} {:>4}  {}",
            "Seq", "Kanban", "Cxs", "Peças", "Embal.", "Mult", "Status"
        ),
    ];

    for index in display_order(&pallet.items) {
        let item = &pallet.items[index];
        lines.push(format!(
            "  {:>4}  {:<16} {:>6} {:>6} {:<10} {:>4}  {}",
            item.sequence_display(),
            item.kanban,
            item.box_quantity,
            item.piece_quantity,
            item.packaging,
            item.multiple,
            item.status.label()
        ));
    }

    if pallet.items.is_empty() {
        lines.push("  (sem itens)".to_string());
    }

    lines.join("\n")
}

/// 出荷一覧の1行
pub fn render_shipment(shipment: &Shipment) -> String {
    format!(
        "{:<10} {:<8} {:<30} {} {}  paletes: {:<4} [{}]",
        shipment.id,
        shipment.client_id,
        shipment.client_name,
        shipment.collection_date,
        shipment.collection_time,
        shipment.pallet_count,
        shipment.status.label()
    )
}

/// 未完了の出荷を集荷日時順に並べる（日時不明は末尾）
pub fn sort_open_shipments(shipments: Vec<Shipment>, include_done: bool) -> Vec<Shipment> {
    let mut list: Vec<Shipment> = shipments
        .into_iter()
        .filter(|s| include_done || s.is_open())
        .collect();
    list.sort_by_key(|s| (s.collection_at().is_none(), s.collection_at()));
    list
}

/// 効果を端末に出力。出荷完了なら true
fn print_effects(effects: &[UiEffect]) -> bool {
    let mut done = false;
    for effect in effects {
        match effect {
            UiEffect::ShowSuccess { message, .. } => println!("  ✔ {}", message),
            UiEffect::ShowError(message) => println!("  ✖ {}", message),
            UiEffect::ShipmentComplete => done = true,
            UiEffect::FocusLabel | UiEffect::ClearNotices | UiEffect::ClearInputs => {}
        }
    }
    done
}

fn prompt(label: &str) -> Result<String> {
    Input::new()
        .with_prompt(label)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| PickingError::Prompt(e.to_string()))
}

/// 対話式の読取ループ
pub async fn run_pick_session<G: PickingGateway>(reconciler: &mut Reconciler<G>) -> Result<()> {
    let total = reconciler.pallets().len();
    if total == 0 {
        println!("Nenhum palete encontrado para a carga {}", reconciler.shipment_id());
        return Ok(());
    }

    println!("---");
    println!("操作: カンバンを読取 [<]前のパレット [>]次のパレット [r]再取得 [q]終了");
    println!("---\n");

    let mut show_pallet = true;
    loop {
        if show_pallet {
            if let Some(pallet) = reconciler.current_pallet() {
                println!("{}\n", render_pallet(pallet, reconciler.pallet_index(), total));
            }
            show_pallet = false;
        }

        let input = prompt("Kanban")?;
        match parse_action(&input) {
            SessionAction::Quit => break,
            SessionAction::Previous => match reconciler.previous_pallet().await {
                Ok(moved) => show_pallet = moved,
                Err(e) => println!("  ✖ {}", e),
            },
            SessionAction::Next => match reconciler.next_pallet().await {
                Ok(moved) => show_pallet = moved,
                Err(e) => println!("  ✖ {}", e),
            },
            SessionAction::Refresh => match reconciler.refresh_pallet().await {
                Ok(completion) => {
                    if completion.shipment_finalized {
                        println!("\n✅ Carga {} finalizada", reconciler.shipment_id());
                        break;
                    }
                    show_pallet = true;
                }
                Err(e) => println!("  ✖ {}", e),
            },
            SessionAction::Scan(kanban) => {
                if kanban.is_empty() {
                    continue;
                }
                reconciler.on_kanban_input(&kanban);

                let label = prompt("Etiqueta cliente")?;
                let effects = reconciler.on_label_input(label.trim()).await;
                if effects == [UiEffect::ClearNotices] {
                    println!("  … etiqueta incompleta, leia novamente");
                    continue;
                }

                let succeeded = effects
                    .iter()
                    .any(|e| matches!(e, UiEffect::ShowSuccess { .. }));
                if print_effects(&effects) {
                    println!("\n✅ Carga {} finalizada", reconciler.shipment_id());
                    break;
                }
                show_pallet = succeeded;
            }
        }
    }

    Ok(())
}
