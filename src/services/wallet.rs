use super::ListParams;
use crate::envelope::{unwrap_data, Paginated};
use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::models::{RechargeRequest, RechargeResponse, WalletTransaction};
use tracing::{info, instrument};

pub const TRANSACTIONS_PATH: &str = "wallet_transactions";
pub const RECHARGE_PATH: &str = "wallets/recharge";

#[derive(Clone)]
pub struct WalletService {
    http: HttpClient,
}

impl WalletService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    #[instrument(skip(self))]
    pub async fn transactions(&self, params: &ListParams) -> ApiResult<Paginated<WalletTransaction>> {
        let body = self.http.get(TRANSACTIONS_PATH, params.to_query()).await?;
        Paginated::from_body(body, "Failed to fetch wallet transactions")
    }

    // Starts a top-up; the answer carries the payment page to send the user to
    #[instrument(skip(self))]
    pub async fn recharge(&self, amount: u64) -> ApiResult<RechargeResponse> {
        let body = self
            .http
            .post(RECHARGE_PATH, &RechargeRequest { amount })
            .await?;
        let response: RechargeResponse = unwrap_data(body, "Failed to recharge wallet")?;
        info!(amount, reference = ?response.reference, "wallet recharge initiated");
        Ok(response)
    }
}
