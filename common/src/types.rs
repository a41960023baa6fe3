//! ピッキングデータの型定義
//!
//! バックエンド（PICK_CARGA / PICK_PALETE / PICK_ITENS）から受け取るレコード:
//! - Shipment: 出荷（カルガ）
//! - Pallet: パレット（出荷の構成単位）
//! - Item: パレット内のカンバン単位の明細
//!
//! バックエンドのフィールド名は小文字・先頭大文字が混在するため両方を受け付け、
//! 欠落値はプレースホルダー `"-"` に置き換える。

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 欠落フィールドのプレースホルダー
pub const PLACEHOLDER: &str = "-";

/// 状態コード（アイテム・パレット・出荷で共通）
///
/// 0=未着手, 1=作業中, 2=差異あり, 3=完了
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Divergent,
    Finalized,
}

impl Status {
    /// コード文字列から変換（不明なコードは未着手扱い）
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "1" => Status::InProgress,
            "2" => Status::Divergent,
            "3" => Status::Finalized,
            _ => Status::Pending,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Status::Pending => 0,
            Status::InProgress => 1,
            Status::Divergent => 2,
            Status::Finalized => 3,
        }
    }

    /// 完了または差異ありで確定済みか
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Finalized | Status::Divergent)
    }

    /// 画面表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            Status::Pending => "Pendente",
            Status::InProgress => "Em montagem",
            Status::Divergent => "Divergência",
            Status::Finalized => "Finalizado",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code().to_string())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = lenient_string(deserializer)?;
        Ok(Status::from_code(&raw))
    }
}

/// 文字列・数値・null のいずれでも受け付けて文字列化する
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Bool(b)) => b.to_string(),
        _ => PLACEHOLDER.to_string(),
    })
}

fn placeholder() -> String {
    PLACEHOLDER.to_string()
}

/// 数量文字列を解釈（"3", "3.00" など）。解釈できなければ None
pub fn parse_quantity(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<u32>() {
        return Some(n);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 => Some(f as u32),
        _ => None,
    }
}

/// 出荷（カルガ）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    #[serde(rename = "cod_carg", alias = "Cod_Carg", default = "placeholder", deserialize_with = "lenient_string")]
    pub id: String,

    #[serde(rename = "cod_cli", alias = "Cod_Cli", default = "placeholder", deserialize_with = "lenient_string")]
    pub client_id: String,

    #[serde(rename = "nome_cli", alias = "Nome_Cli", default = "placeholder", deserialize_with = "lenient_string")]
    pub client_name: String,

    #[serde(rename = "data_col", alias = "Data_Col", default = "placeholder", deserialize_with = "lenient_string")]
    pub collection_date: String,

    #[serde(rename = "hora_col", alias = "Hora_Col", default = "placeholder", deserialize_with = "lenient_string")]
    pub collection_time: String,

    #[serde(rename = "qtd_pale", alias = "Qtd_Pale", default = "placeholder", deserialize_with = "lenient_string")]
    pub pallet_count: String,

    #[serde(rename = "stat_col", alias = "Stat_Col", default)]
    pub status: Status,
}

impl Shipment {
    /// 未完了（未着手または作業中）か
    pub fn is_open(&self) -> bool {
        matches!(self.status, Status::Pending | Status::InProgress)
    }

    /// 集荷日時を解釈
    ///
    /// 受け付ける日付形式: `YYYYMMDD`, `DD/MM/YYYY`, `YYYY-MM-DD`
    /// 時刻が解釈できない場合は 00:00 とする
    pub fn collection_at(&self) -> Option<NaiveDateTime> {
        let date = self.collection_date.trim();
        let date = NaiveDate::parse_from_str(date, "%Y%m%d")
            .or_else(|_| NaiveDate::parse_from_str(date, "%d/%m/%Y"))
            .or_else(|_| NaiveDate::parse_from_str(date, "%Y-%m-%d"))
            .ok()?;

        let time = self.collection_time.trim();
        match NaiveTime::parse_from_str(time, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
        {
            Ok(t) => Some(date.and_time(t)),
            Err(_) => date.and_hms_opt(0, 0, 0),
        }
    }
}

/// パレット内アイテム（カンバン単位）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "kanban", alias = "Kanban", default = "placeholder", deserialize_with = "lenient_string")]
    pub kanban: String,

    /// 順序番号（欠落・0・非数値は順序なし）
    #[serde(rename = "sequen", alias = "Sequen", alias = "sequencia", default = "placeholder", deserialize_with = "lenient_string")]
    pub sequence: String,

    #[serde(rename = "qtd_caixa", alias = "Qtd_Caixa", default = "placeholder", deserialize_with = "lenient_string")]
    pub box_quantity: String,

    #[serde(rename = "qtd_peca", alias = "Qtd_Peca", default = "placeholder", deserialize_with = "lenient_string")]
    pub piece_quantity: String,

    #[serde(rename = "embalagem", alias = "Embalagem", default = "placeholder", deserialize_with = "lenient_string")]
    pub packaging: String,

    #[serde(rename = "multiplo", alias = "Multiplo", default = "placeholder", deserialize_with = "lenient_string")]
    pub multiple: String,

    #[serde(rename = "status", alias = "Status", default)]
    pub status: Status,
}

impl Item {
    /// 有効な（正の）順序番号
    pub fn sequence_number(&self) -> Option<u32> {
        parse_quantity(&self.sequence).filter(|n| *n > 0)
    }

    pub fn is_sequenced(&self) -> bool {
        self.sequence_number().is_some()
    }

    /// 予定箱数（解釈できなければ 0）
    pub fn expected_boxes(&self) -> u32 {
        parse_quantity(&self.box_quantity).unwrap_or(0)
    }

    pub fn is_finalized(&self) -> bool {
        self.status == Status::Finalized
    }

    /// 表示用の順序番号（順序なしは "-"）
    pub fn sequence_display(&self) -> String {
        self.sequence_number()
            .map(|n| n.to_string())
            .unwrap_or_else(placeholder)
    }
}

/// パレット
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pallet {
    #[serde(rename = "cod_palete", alias = "Cod_Palete", default = "placeholder", deserialize_with = "lenient_string")]
    pub id: String,

    /// 所属する出荷ID（ゲートウェイが設定）
    #[serde(skip)]
    pub shipment_id: String,

    #[serde(rename = "num_order", alias = "Num_Order", default = "placeholder", deserialize_with = "lenient_string")]
    pub order: String,

    #[serde(rename = "cod_doca", alias = "Cod_Doca", default = "placeholder", deserialize_with = "lenient_string")]
    pub dock: String,

    #[serde(rename = "sup_doc", alias = "Sup_Doc", default = "placeholder", deserialize_with = "lenient_string")]
    pub dock_support: String,

    #[serde(rename = "cod_grupo", alias = "Cod_Grupo", default = "placeholder", deserialize_with = "lenient_string")]
    pub group: String,

    #[serde(rename = "cod_lane", alias = "Cod_Lane", default = "placeholder", deserialize_with = "lenient_string")]
    pub lane: String,

    #[serde(rename = "stat_pale", alias = "Stat_Pale", default)]
    pub status: Status,

    #[serde(rename = "itens", default)]
    pub items: Vec<Item>,
}

impl Pallet {
    /// パレットコードがあるか（コードなしのレコードは一覧から除外する）
    pub fn has_id(&self) -> bool {
        let id = self.id.trim();
        !id.is_empty() && id != PLACEHOLDER
    }
}

/// アイテム書き戻しの操作コード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// 1箱読取
    BoxRead,
    /// アイテム完了
    Finalize,
}

impl Operation {
    pub fn code(&self) -> u8 {
        match self {
            Operation::BoxRead => 1,
            Operation::Finalize => 3,
        }
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code().to_string())
    }
}

fn serialize_display<T: fmt::Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

/// POST items のボディ
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemProgress {
    pub cod_carg: String,
    pub cod_pale: String,
    pub cod_kanb: String,
    pub cod_sequ: String,
    #[serde(serialize_with = "serialize_display")]
    pub qtdrest: u32,
    pub operac: Operation,
}

/// POST pallets のボディ
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PalletStatusUpdate {
    pub cod_carg: String,
    pub cod_pale: String,
    pub status: Status,
}

/// POST shipments のボディ
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentStatusUpdate {
    pub cod_carg: String,
    pub status: Status,
}
