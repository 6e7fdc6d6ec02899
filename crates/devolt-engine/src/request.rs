//! Action requests.
//!
//! A request is the JSON document `{"path": <action>, "payload": {...}}`,
//! sent as the input payload or as the execution-layer data of a deposit.
//! Amounts accept decimal strings or integers.

use devolt_types::{
    Address, AuctionId, AuctionUpdate, BidId, BidUpdate, DevoltError, OrderId, Result, Role,
    StationId, StationUpdate, Timestamp, U256, amount,
};
use rust_decimal::Decimal;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct Envelope {
    path: String,
    #[serde(default)]
    payload: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateAuction {
    #[serde(with = "amount::dec")]
    pub credits: U256,
    #[serde(with = "amount::dec")]
    pub price_limit: U256,
    pub expires_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateAuction {
    pub id: AuctionId,
    #[serde(flatten)]
    pub update: AuctionUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateBid {
    #[serde(with = "amount::dec")]
    pub price: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateBid {
    pub id: BidId,
    #[serde(flatten)]
    pub update: BidUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateOrder {
    pub station_id: StationId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateOrder {
    pub id: OrderId,
    #[serde(with = "amount::dec")]
    pub credits: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OffSetConsumption {
    pub id: StationId,
    #[serde(rename = "credits_to_be_offSet", with = "amount::dec")]
    pub credits: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateStation {
    pub id: StationId,
    pub owner: Address,
    #[serde(with = "amount::dec")]
    pub price_per_credit: U256,
    pub latitude: Decimal,
    pub longitude: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateStation {
    pub id: StationId,
    #[serde(flatten)]
    pub update: StationUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Contract {
    pub symbol: String,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserEntry {
    pub address: Address,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
struct ById<T> {
    id: T,
}

#[derive(Debug, Deserialize)]
struct BySymbol {
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct ByAddress {
    address: Address,
}

/// A parsed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    CreateAuction(CreateAuction),
    UpdateAuction(UpdateAuction),
    DeleteAuction(AuctionId),
    FinishAuction(AuctionId),
    CreateBid(CreateBid),
    UpdateBid(UpdateBid),
    CreateOrder(CreateOrder),
    UpdateOrder(UpdateOrder),
    DeleteOrder(OrderId),
    OffSetStationConsumption(OffSetConsumption),
    CreateStation(CreateStation),
    UpdateStation(UpdateStation),
    DeleteStation(StationId),
    CreateContract(Contract),
    UpdateContract(Contract),
    DeleteContract(String),
    CreateUser(UserEntry),
    UpdateUser(UserEntry),
    DeleteUser(Address),
    WithdrawVolt,
    WithdrawStablecoin,
    WithdrawApp,
}

impl Action {
    /// Parse a raw request document.
    ///
    /// # Errors
    /// - `InvalidInput` for malformed JSON or payloads
    /// - `UnknownAction` for an unrecognized path
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let Envelope { path, payload } = serde_json::from_slice(raw)?;
        let action = match path.as_str() {
            "createAuction" => Self::CreateAuction(body(payload)?),
            "updateAuction" => Self::UpdateAuction(body(payload)?),
            "deleteAuction" => Self::DeleteAuction(body::<ById<AuctionId>>(payload)?.id),
            "finishAuction" => Self::FinishAuction(body::<ById<AuctionId>>(payload)?.id),
            "createBid" => Self::CreateBid(body(payload)?),
            "updateBid" => Self::UpdateBid(body(payload)?),
            "createOrder" => Self::CreateOrder(body(payload)?),
            "updateOrder" => Self::UpdateOrder(body(payload)?),
            "deleteOrder" => Self::DeleteOrder(body::<ById<OrderId>>(payload)?.id),
            "offSetStationConsumption" => Self::OffSetStationConsumption(body(payload)?),
            "createStation" => Self::CreateStation(body(payload)?),
            "updateStation" => Self::UpdateStation(body(payload)?),
            "deleteStation" => Self::DeleteStation(body::<ById<StationId>>(payload)?.id),
            "createContract" => Self::CreateContract(body(payload)?),
            "updateContract" => Self::UpdateContract(body(payload)?),
            "deleteContract" => Self::DeleteContract(body::<BySymbol>(payload)?.symbol),
            "createUser" => Self::CreateUser(body(payload)?),
            "updateUser" => Self::UpdateUser(body(payload)?),
            "deleteUser" => Self::DeleteUser(body::<ByAddress>(payload)?.address),
            "withdrawVolt" => Self::WithdrawVolt,
            "withdrawStablecoin" => Self::WithdrawStablecoin,
            "withdrawApp" => Self::WithdrawApp,
            _ => return Err(DevoltError::UnknownAction(path)),
        };
        Ok(action)
    }

    /// The action's path, as it appears on the wire.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateAuction(_) => "createAuction",
            Self::UpdateAuction(_) => "updateAuction",
            Self::DeleteAuction(_) => "deleteAuction",
            Self::FinishAuction(_) => "finishAuction",
            Self::CreateBid(_) => "createBid",
            Self::UpdateBid(_) => "updateBid",
            Self::CreateOrder(_) => "createOrder",
            Self::UpdateOrder(_) => "updateOrder",
            Self::DeleteOrder(_) => "deleteOrder",
            Self::OffSetStationConsumption(_) => "offSetStationConsumption",
            Self::CreateStation(_) => "createStation",
            Self::UpdateStation(_) => "updateStation",
            Self::DeleteStation(_) => "deleteStation",
            Self::CreateContract(_) => "createContract",
            Self::UpdateContract(_) => "updateContract",
            Self::DeleteContract(_) => "deleteContract",
            Self::CreateUser(_) => "createUser",
            Self::UpdateUser(_) => "updateUser",
            Self::DeleteUser(_) => "deleteUser",
            Self::WithdrawVolt => "withdrawVolt",
            Self::WithdrawStablecoin => "withdrawStablecoin",
            Self::WithdrawApp => "withdrawApp",
        }
    }

    /// Whether only administrators may run this action.
    #[must_use]
    pub fn admin_only(&self) -> bool {
        !matches!(
            self,
            Self::CreateBid(_)
                | Self::CreateOrder(_)
                | Self::OffSetStationConsumption(_)
                | Self::WithdrawVolt
                | Self::WithdrawStablecoin
        )
    }
}

fn body<T: DeserializeOwned>(payload: Value) -> Result<T> {
    Ok(serde_json::from_value(payload)?)
}
