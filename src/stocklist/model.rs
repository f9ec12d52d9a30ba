use crate::amount::Quantity;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize, Serializer};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{Sqlite, SqliteTypeInfo};
use sqlx::{Decode, Encode, Type};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const MAX_STORE_NAME_LENGTH: usize = 20;
pub const MAX_SESSION_NAME_LENGTH: usize = 20;
pub const MAX_LIST_NAME_LENGTH: usize = 20;
pub const MAX_ORIGIN_LENGTH: usize = 100;
pub const MAX_ITEM_NAME_LENGTH: usize = 80;

pub const MIN_LIST_ITEM_AMOUNT: Quantity = Quantity::ZERO;
pub const MAX_LIST_ITEM_AMOUNT: Quantity = Quantity::whole(1_000_000);

// region:    --- List Type

/// 목록 종류. 입고(AD)는 더하고, 출고(SU)는 빼고, 실사(CO)는 센 수량이다
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ListType {
    #[serde(rename = "AD")]
    Addition,
    #[serde(rename = "SU")]
    Subtraction,
    #[default]
    #[serde(rename = "CO")]
    Count,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Select a valid choice. {0} is not one of the available choices.")]
pub struct ListTypeError(pub String);

impl ListType {
    pub fn code(self) -> &'static str {
        match self {
            ListType::Addition => "AD",
            ListType::Subtraction => "SU",
            ListType::Count => "CO",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ListType::Addition => "Addition",
            ListType::Subtraction => "Subtraction",
            ListType::Count => "Count",
        }
    }

    /// 폼 입력값 해석. 비어 있으면 실사 목록
    pub fn from_form(value: Option<&str>) -> Result<Self, ListTypeError> {
        match value.map(str::trim) {
            None | Some("") => Ok(ListType::default()),
            Some(code) => code.parse(),
        }
    }
}

impl FromStr for ListType {
    type Err = ListTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AD" => Ok(ListType::Addition),
            "SU" => Ok(ListType::Subtraction),
            "CO" => Ok(ListType::Count),
            other => Err(ListTypeError(other.to_string())),
        }
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Type<Sqlite> for ListType {
    fn type_info() -> SqliteTypeInfo {
        <str as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <str as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Sqlite> for ListType {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        <&str as Encode<'q, Sqlite>>::encode_by_ref(&self.code(), buf)
    }
}

impl<'r> Decode<'r, Sqlite> for ListType {
    fn decode(value: <Sqlite as sqlx::Database>::ValueRef<'r>) -> Result<Self, BoxDynError> {
        let code = <&str as Decode<'r, Sqlite>>::decode(value)?;
        Ok(code.parse()?)
    }
}

// endregion: --- List Type

// region:    --- Entities

// 매장
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Store {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
}

// 재고 조사 기간
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Session {
    pub id: i64,
    pub store_id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

// 목록
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct List {
    pub id: i64,
    pub session_id: i64,
    pub owner_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub list_type: ListType,
    pub origin: String,
    pub date_added: DateTime<Utc>,
}

// 목록 요약 (항목 수 포함). 종류는 표시 이름으로 내보낸다
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ListSummary {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type", serialize_with = "serialize_label")]
    pub list_type: ListType,
    pub count: i64,
}

fn serialize_label<S: Serializer>(list_type: &ListType, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(list_type.label())
}

// 품목
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub store_id: i64,
    pub name: String,
}

// 목록 항목
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ListItem {
    pub id: i64,
    pub list_id: i64,
    pub item_id: i64,
    pub amount: Quantity,
}

// 품목별 목록 항목
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemEntry {
    pub list_id: i64,
    pub amount: Quantity,
}

// 목록 항목이 붙은 품목
#[derive(Debug, Clone, Serialize)]
pub struct ItemWithEntries {
    pub id: i64,
    pub name: String,
    pub list_items: Vec<ItemEntry>,
}

// 매장 품목과 목록
#[derive(Debug, Clone, Serialize)]
pub struct StoreItems {
    pub items: Vec<ItemWithEntries>,
    pub lists: Vec<ListSummary>,
}

/// 기간 내 품목별 재고 합계
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct StockTotals {
    pub item_id: i64,
    pub name: String,
    pub total_added: Quantity,
    pub total_subtracted: Quantity,
    pub total_counted: Quantity,
}

impl StockTotals {
    /// 입고 - 출고
    pub fn net_change(&self) -> Quantity {
        self.total_added - self.total_subtracted
    }
}

// 가져오기 결과
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub lists: usize,
    pub items_created: usize,
    pub list_items: usize,
    pub skipped: usize,
}

// endregion: --- Entities

// region:    --- Forms

#[derive(Debug, Deserialize)]
pub struct StoreForm {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SessionForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

#[derive(Debug, Deserialize)]
pub struct NewListForm {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub list_type: Option<String>,
    #[serde(default)]
    pub origin: String,
}

#[derive(Debug, Deserialize)]
pub struct ItemForm {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ListItemForm {
    #[serde(default)]
    pub amount: serde_json::Value,
}

/// 가져올 목록 하나 (CSV 한 파일)
#[derive(Debug, Deserialize)]
pub struct ImportList {
    #[serde(flatten)]
    pub list: NewListForm,
    #[serde(default)]
    pub items: Vec<ImportRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ImportRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: serde_json::Value,
}

// endregion: --- Forms
