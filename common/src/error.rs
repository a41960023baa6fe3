//! エラー型定義
//!
//! 読取セッションで発生するエラーはすべて回復可能。
//! 表示メッセージはオペレーター向け（ポルトガル語）。

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 読取値の形式不正（ラベル・カンバン）
    #[error("Leitura inválida: {0}")]
    Validation(String),

    #[error("Kanban {0} não encontrado neste palete")]
    KanbanNotFound(String),

    #[error("Etiqueta {label} não confere com o kanban esperado ({expected})")]
    LabelMismatch { label: String, expected: String },

    /// 順序違反（先に現在のアイテムを完了させる必要がある）
    #[error("Finalize o item atual antes de continuar: {0}")]
    Sequencing(String),

    #[error("Todas as caixas do kanban {0} já foram lidas")]
    Quantity(String),

    /// 作業中のパレットから移動しようとした
    #[error("Palete {0} em montagem: finalize antes de trocar de palete")]
    PalletInProgress(String),

    #[error("Erro de comunicação: {0}")]
    Network(String),

    /// サーバーが返した `Erro` フィールドをそのまま表示
    #[error("{0}")]
    Backend(String),

    #[error("Falha ao atualizar {0}")]
    UpdateFailed(String),

    #[error("Resposta inválida do servidor: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// 通信系エラー（再読取で回復する）か
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::Backend(_) | Error::UpdateFailed(_)
        )
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
