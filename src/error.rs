use thiserror::Error;

#[derive(Error, Debug)]
pub enum PickingError {
    /// 照合・通信エラー（オペレーター向けメッセージをそのまま表示）
    #[error(transparent)]
    Common(#[from] picking_common::Error),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("API URLが設定されていません（{0}）。`picking config --set-url {0}=URL` で設定してください")]
    MissingUrl(&'static str),

    #[error("出荷が見つかりません: {0}")]
    ShipmentNotFound(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("入力エラー: {0}")]
    Prompt(String),
}

pub type Result<T> = std::result::Result<T, PickingError>;
