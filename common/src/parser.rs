//! APIレスポンスパーサー
//!
//! PICK_CARGA / PICK_PALETE / PICK_ITENS のレスポンスから一覧を取り出し、
//! 書き戻し（POST）のレスポンスを成功・サーバーエラー・失敗に分類する。

use crate::error::{Error, Result};
use crate::types::{Item, Pallet, Shipment};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// 書き戻し成功を示すマーカー
pub const SUCCESS_MARKER: &str = "OK";

/// レスポンスから配列部分を取り出す
///
/// 取り出し優先順位:
/// 1. 指定キー（小文字・先頭大文字）の配列
/// 2. レスポンス自体が配列
/// 3. それ以外は空（一覧なしは正常な状態）
fn extract_list(value: Value, key: &str) -> Vec<Value> {
    match value {
        Value::Array(list) => list,
        Value::Object(mut map) => {
            let capitalized = capitalize(key);
            match map.remove(key).or_else(|| map.remove(&capitalized)) {
                Some(Value::Array(list)) => list,
                _ => Vec::new(),
            }
        }
        _ => Vec::new(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// 配列要素をレコードに変換（オブジェクトでない要素は読み飛ばす）
fn records<T: DeserializeOwned>(list: Vec<Value>) -> Vec<T> {
    list.into_iter()
        .filter(Value::is_object)
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect()
}

/// 出荷一覧レスポンスをパース（`{ cargas: [...] }`）
pub fn parse_shipments_response(body: &str) -> Result<Vec<Shipment>> {
    let value: Value = serde_json::from_str(body)?;
    Ok(records(extract_list(value, "cargas")))
}

/// パレット一覧レスポンスをパース（`{ paletes: [...] }`）
///
/// パレットコードのないレコードは除外し、所属する出荷IDを設定する
pub fn parse_pallets_response(body: &str, shipment_id: &str) -> Result<Vec<Pallet>> {
    let value: Value = serde_json::from_str(body)?;
    let pallets = records::<Pallet>(extract_list(value, "paletes"))
        .into_iter()
        .filter(Pallet::has_id)
        .map(|mut p| {
            p.shipment_id = shipment_id.to_string();
            p
        })
        .collect();
    Ok(pallets)
}

/// アイテム一覧レスポンスをパース（`{ itens: [...] }`）
pub fn parse_items_response(body: &str) -> Result<Vec<Item>> {
    let value: Value = serde_json::from_str(body)?;
    Ok(records(extract_list(value, "itens")))
}

/// 書き戻しレスポンスを判定
///
/// - 成功マーカー（文字列、または `status` フィールド）→ `Ok`
/// - `Erro` フィールドを持つオブジェクト → `Backend`（メッセージそのまま）
/// - それ以外 → `UpdateFailed`
///
/// # Examples
/// ```
/// use picking_common::interpret_write_response;
///
/// assert!(interpret_write_response("\"OK\"", "o item").is_ok());
/// assert!(interpret_write_response(r#"{"Erro": "Kanban bloqueado"}"#, "o item").is_err());
/// ```
pub fn interpret_write_response(body: &str, target: &str) -> Result<()> {
    let trimmed = body.trim();

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(v) => v,
        Err(_) if trimmed.eq_ignore_ascii_case(SUCCESS_MARKER) => return Ok(()),
        Err(_) => return Err(Error::UpdateFailed(target.to_string())),
    };

    match value {
        Value::String(s) if s.trim().eq_ignore_ascii_case(SUCCESS_MARKER) => Ok(()),
        Value::Object(map) => {
            if let Some(erro) = map.get("Erro").or_else(|| map.get("erro")) {
                let message = match erro {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                return Err(Error::Backend(message));
            }

            let status = map.get("status").or_else(|| map.get("Status"));
            match status {
                Some(Value::String(s)) if s.trim().eq_ignore_ascii_case(SUCCESS_MARKER) => Ok(()),
                _ => Err(Error::UpdateFailed(target.to_string())),
            }
        }
        _ => Err(Error::UpdateFailed(target.to_string())),
    }
}
