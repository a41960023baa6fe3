use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "picking")]
#[command(about = "ピッキングリスト照合ツール（カンバン・顧客ラベル読取）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 出荷（カルガ）一覧を表示
    Shipments {
        /// 完了済みの出荷も含める
        #[arg(long)]
        all: bool,
    },

    /// 出荷のパレットとアイテムを表示（読取なし）
    View {
        /// 出荷コード（cod_carg）
        #[arg(required = true)]
        shipment: String,
    },

    /// 対話的にカンバン・顧客ラベルを読み取って照合
    Pick {
        /// 出荷コード（cod_carg）
        #[arg(required = true)]
        shipment: String,

        /// 開始するパレットコード
        #[arg(short, long)]
        pallet: Option<String>,
    },

    /// 設定を表示/編集
    Config {
        /// APIのURLを設定（shipments=URL / pallets=URL / items=URL）
        #[arg(long, value_name = "RESOURCE=URL")]
        set_url: Vec<String>,

        /// Basic認証ユーザーを設定
        #[arg(long)]
        set_user: Option<String>,

        /// Basic認証パスワードを設定
        #[arg(long)]
        set_password: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
