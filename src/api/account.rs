//! Account and asset queries.

use serde_json::json;

use crate::api::types::{Account, Amount, AssetInfo};
use crate::rpc::{RpcClient, RpcResult};

impl RpcClient {
    pub fn account_exists(&self, name: &str) -> RpcResult<bool> {
        self.call("account_accountIsExist", vec![json!(name)])
    }

    pub fn get_account_by_name(&self, name: &str) -> RpcResult<Account> {
        self.call("account_getAccountByName", vec![json!(name)])
    }

    /// Like [`RpcClient::get_account_by_name`], with extended author info.
    pub fn get_account_ex_by_name(&self, name: &str) -> RpcResult<Account> {
        self.call("account_getAccountExByName", vec![json!(name)])
    }

    pub fn get_account_by_id(&self, id: u64) -> RpcResult<Account> {
        self.call("account_getAccountById", vec![json!(id)])
    }

    pub fn get_account_ex_by_id(&self, id: u64) -> RpcResult<Account> {
        self.call("account_getAccountExById", vec![json!(id)])
    }

    /// Balance of `asset_id` held by `name`.
    pub fn get_balance(&self, name: &str, asset_id: u64) -> RpcResult<Amount> {
        self.call("account_getAccountBalanceByID", vec![json!(name), json!(asset_id)])
    }

    /// Next action nonce the node expects from `name`.
    pub fn get_nonce(&self, name: &str) -> RpcResult<u64> {
        self.call("account_getNonce", vec![json!(name)])
    }

    pub fn get_asset_by_name(&self, asset_name: &str) -> RpcResult<AssetInfo> {
        self.call("account_getAssetInfoByName", vec![json!(asset_name)])
    }

    pub fn get_asset_by_id(&self, asset_id: u64) -> RpcResult<AssetInfo> {
        self.call("account_getAssetInfoByID", vec![json!(asset_id)])
    }
}
