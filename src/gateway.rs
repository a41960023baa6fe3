//! リモートデータゲートウェイ
//!
//! 出荷・パレット・アイテムの取得と状態の書き戻し。
//! 失敗しても自動リトライはしない（再読取はオペレーターが行う）。

use crate::config::{Config, Resource};
use async_trait::async_trait;
use picking_common::{
    interpret_write_response, parse_items_response, parse_pallets_response,
    parse_shipments_response, Error, Item, ItemProgress, Pallet, PalletStatusUpdate, Result,
    Shipment, ShipmentStatusUpdate,
};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// バックエンドとのやり取り
///
/// オーケストレーターはこのトレイト越しにのみ通信する
#[async_trait]
pub trait PickingGateway: Send + Sync {
    /// 出荷一覧
    async fn fetch_shipments(&self) -> Result<Vec<Shipment>>;

    /// 出荷に属するパレット一覧（アイテムは空）
    async fn fetch_shipment_pallets(&self, shipment_id: &str) -> Result<Vec<Pallet>>;

    /// パレットのアイテム一覧
    async fn fetch_pallet_items(&self, shipment_id: &str, pallet_id: &str) -> Result<Vec<Item>>;

    async fn post_item_progress(&self, body: &ItemProgress) -> Result<()>;

    async fn post_pallet_status(&self, body: &PalletStatusUpdate) -> Result<()>;

    async fn post_shipment_status(&self, body: &ShipmentStatusUpdate) -> Result<()>;
}

/// パレット一覧とそれぞれのアイテムをまとめて取得
pub async fn load_shipment<G: PickingGateway + ?Sized>(
    gateway: &G,
    shipment_id: &str,
) -> Result<Vec<Pallet>> {
    let mut pallets = gateway.fetch_shipment_pallets(shipment_id).await?;
    for pallet in &mut pallets {
        pallet.items = gateway.fetch_pallet_items(shipment_id, &pallet.id).await?;
    }
    Ok(pallets)
}

/// 一覧レスポンスが解釈できない場合は通信エラーとして扱う
fn invalid_body(error: Error) -> Error {
    match error {
        Error::Json(e) => {
            warn!(error = %e, "unreadable list response");
            Error::Network(format!("resposta inválida do servidor ({})", e))
        }
        other => other,
    }
}

/// REST API 実装（reqwest）
pub struct HttpGateway {
    client: reqwest::Client,
    shipments_url: String,
    pallets_url: String,
    items_url: String,
    credentials: Option<(String, String)>,
}

impl HttpGateway {
    pub fn new(config: &Config) -> crate::error::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| crate::error::PickingError::Config(e.to_string()))?;

        Ok(Self {
            client,
            shipments_url: config.url(Resource::Shipments)?,
            pallets_url: config.url(Resource::Pallets)?,
            items_url: config.url(Resource::Items)?,
            credentials: config.credentials(),
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Some((user, password)) => request.basic_auth(user, Some(password)),
            None => request,
        }
    }

    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        debug!(url, ?query, "GET");

        let request = self.authorize(self.client.get(url).query(query));
        let response = request.send().await.map_err(|e| {
            warn!(url, error = %e, "GET failed");
            Error::Network(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !status.is_success() {
            warn!(url, %status, "GET returned error status");
            return Err(Error::Network(format!("HTTP {}", status)));
        }
        Ok(body)
    }

    async fn post_json<T: Serialize + Sync>(&self, url: &str, body: &T, target: &str) -> Result<()> {
        debug!(url, "POST");

        let request = self.authorize(self.client.post(url).json(body));
        let response = request.send().await.map_err(|e| {
            warn!(url, error = %e, "POST failed");
            Error::UpdateFailed(target.to_string())
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            warn!(url, error = %e, "POST response unreadable");
            Error::UpdateFailed(target.to_string())
        })?;
        debug!(url, %status, response = %text, "POST response");

        interpret_write_response(&text, target)
    }
}


#[async_trait]
impl PickingGateway for HttpGateway {
    async fn fetch_shipments(&self) -> Result<Vec<Shipment>> {
        let body = self.get_text(&self.shipments_url, &[]).await?;
        parse_shipments_response(&body).map_err(invalid_body)
    }

    async fn fetch_shipment_pallets(&self, shipment_id: &str) -> Result<Vec<Pallet>> {
        let body = self
            .get_text(&self.pallets_url, &[("cCarga", shipment_id)])
            .await?;
        parse_pallets_response(&body, shipment_id).map_err(invalid_body)
    }

    async fn fetch_pallet_items(&self, shipment_id: &str, pallet_id: &str) -> Result<Vec<Item>> {
        let body = self
            .get_text(&self.items_url, &[("cCarga", shipment_id), ("cPalet", pallet_id)])
            .await?;
        parse_items_response(&body).map_err(invalid_body)
    }

    async fn post_item_progress(&self, body: &ItemProgress) -> Result<()> {
        self.post_json(&self.items_url, body, "o item").await
    }

    async fn post_pallet_status(&self, body: &PalletStatusUpdate) -> Result<()> {
        self.post_json(&self.pallets_url, body, "o palete").await
    }

    async fn post_shipment_status(&self, body: &ShipmentStatusUpdate) -> Result<()> {
        self.post_json(&self.shipments_url, body, "a carga").await
    }
}
