/// 재고 관리 커맨드 처리
/// 1. 매장 생성/이름 변경/삭제
/// 2. 조사 기간 생성
/// 3. 목록 생성
/// 4. 품목 생성
/// 5. 목록 항목 입력
/// 6. 목록 가져오기 (CSV)
// region:    --- Imports
use super::model::{
    ImportList, ImportSummary, Item, ItemForm, List, ListItem, ListItemForm, ListType,
    NewListForm, Session, SessionForm, Store, StoreForm, MAX_ITEM_NAME_LENGTH,
    MAX_LIST_ITEM_AMOUNT, MAX_LIST_NAME_LENGTH, MAX_ORIGIN_LENGTH, MAX_SESSION_NAME_LENGTH,
    MAX_STORE_NAME_LENGTH, MIN_LIST_ITEM_AMOUNT,
};
use super::{queries, query};
use crate::amount::Quantity;
use crate::database::DatabaseManager;
use crate::error::{map_unique, AppError, AppResult, FieldErrors};
use crate::identity::User;
use crate::validation::{in_range, optional_text, required_text, REQUIRED};
use chrono::{NaiveDate, Utc};
use sqlx::{Connection, SqliteConnection};
use tracing::{info, warn};

// endregion: --- Imports

const DUPLICATE_STORE: &str = "Store with this name already exists.";
const DUPLICATE_ITEM: &str = "Item with this name already exists in this store.";

// region:    --- Validation

/// 검증된 목록 값
#[derive(Debug, Clone)]
pub struct ValidList {
    pub name: String,
    pub list_type: ListType,
    pub origin: String,
}

pub fn validate_list(form: &NewListForm) -> Result<ValidList, FieldErrors> {
    let mut errors = FieldErrors::new();
    let name = required_text(&mut errors, "name", &form.name, MAX_LIST_NAME_LENGTH);
    let origin = optional_text(&mut errors, "origin", &form.origin, MAX_ORIGIN_LENGTH);
    let list_type = ListType::from_form(form.list_type.as_deref()).unwrap_or_else(|e| {
        errors.add("type", e.to_string());
        ListType::default()
    });
    errors.into_result(ValidList {
        name,
        list_type,
        origin,
    })
}

/// 수량 검증. 비어 있으면 `missing`을 쓰고, 없으면 필수 오류
pub fn validate_quantity(
    errors: &mut FieldErrors,
    field: &str,
    value: &serde_json::Value,
    missing: Option<Quantity>,
) -> Quantity {
    let amount = match Quantity::from_json(value) {
        Ok(Some(amount)) => amount,
        Ok(None) => match missing {
            Some(default) => default,
            None => {
                errors.add(field, REQUIRED);
                return Quantity::ZERO;
            }
        },
        Err(e) => {
            errors.add(field, e.to_string());
            return Quantity::ZERO;
        }
    };
    in_range(errors, field, amount, MIN_LIST_ITEM_AMOUNT, MAX_LIST_ITEM_AMOUNT);
    amount
}

fn parse_date(errors: &mut FieldErrors, field: &str, value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(field, "Enter a valid date.");
            None
        }
    }
}

/// 검증된 조사 기간 값
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSession {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub fn validate_session(form: &SessionForm) -> Result<ValidSession, FieldErrors> {
    let mut errors = FieldErrors::new();
    let name = required_text(&mut errors, "name", &form.name, MAX_SESSION_NAME_LENGTH);
    let start_date = parse_date(&mut errors, "start_date", &form.start_date);
    let end_date = parse_date(&mut errors, "end_date", &form.end_date);

    match (start_date, end_date) {
        (Some(start_date), Some(end_date)) => {
            if end_date < start_date {
                errors.add("end_date", "End date must be on or after the start date.");
            }
            errors.into_result(ValidSession {
                name,
                start_date,
                end_date,
            })
        }
        _ => Err(errors),
    }
}

// endregion: --- Validation

// region:    --- Stores

/// 1. 매장 생성
pub async fn create_store(
    conn: &mut SqliteConnection,
    owner: &User,
    form: StoreForm,
) -> AppResult<Store> {
    info!("{:<12} --> 매장 생성 요청: {}", "Command", form.name);
    let mut errors = FieldErrors::new();
    let name = required_text(&mut errors, "name", &form.name, MAX_STORE_NAME_LENGTH);
    errors.into_result(())?;

    let store = sqlx::query_as::<_, Store>(queries::INSERT_STORE)
        .bind(owner.id)
        .bind(&name)
        .fetch_one(conn)
        .await
        .map_err(|e| map_unique(e, DUPLICATE_STORE))?;
    Ok(store)
}

/// 1. 매장 이름 변경
pub async fn rename_store(
    conn: &mut SqliteConnection,
    owner: &User,
    store_id: i64,
    form: StoreForm,
) -> AppResult<Store> {
    info!("{:<12} --> 매장 이름 변경 store: {}", "Command", store_id);
    let store = query::store(&mut *conn, owner.id, store_id).await?;

    let mut errors = FieldErrors::new();
    let name = required_text(&mut errors, "name", &form.name, MAX_STORE_NAME_LENGTH);
    errors.into_result(())?;

    sqlx::query(queries::RENAME_STORE)
        .bind(&name)
        .bind(store_id)
        .bind(owner.id)
        .execute(conn)
        .await
        .map_err(|e| map_unique(e, DUPLICATE_STORE))?;

    Ok(Store { name, ..store })
}

/// 1. 매장 삭제 (조사 기간, 품목, 목록 모두 함께 삭제)
pub async fn delete_store(conn: &mut SqliteConnection, owner: &User, store_id: i64) -> AppResult<()> {
    info!("{:<12} --> 매장 삭제 store: {}", "Command", store_id);
    let result = sqlx::query(queries::DELETE_STORE)
        .bind(store_id)
        .bind(owner.id)
        .execute(conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Store not found."));
    }
    Ok(())
}

// endregion: --- Stores

// region:    --- Sessions

/// 2. 조사 기간 생성
pub async fn create_session(
    conn: &mut SqliteConnection,
    owner: &User,
    store_id: i64,
    form: SessionForm,
) -> AppResult<Session> {
    info!("{:<12} --> 조사 기간 생성 store: {}", "Command", store_id);
    query::store(&mut *conn, owner.id, store_id).await?;
    let valid = validate_session(&form)?;

    let session = sqlx::query_as::<_, Session>(queries::INSERT_SESSION)
        .bind(store_id)
        .bind(&valid.name)
        .bind(valid.start_date)
        .bind(valid.end_date)
        .fetch_one(conn)
        .await?;
    Ok(session)
}

// endregion: --- Sessions

// region:    --- Lists

async fn insert_list(
    conn: &mut SqliteConnection,
    owner_id: i64,
    session_id: i64,
    valid: &ValidList,
) -> AppResult<List> {
    let list = sqlx::query_as::<_, List>(queries::INSERT_LIST)
        .bind(session_id)
        .bind(owner_id)
        .bind(&valid.name)
        .bind(valid.list_type)
        .bind(&valid.origin)
        .bind(Utc::now())
        .fetch_one(conn)
        .await?;
    Ok(list)
}

/// 3. 목록 여러 개 생성. 하나라도 잘못되면 아무것도 만들지 않는다
pub async fn create_lists(
    db_manager: &DatabaseManager,
    owner: &User,
    session_id: i64,
    forms: Vec<NewListForm>,
) -> AppResult<Vec<List>> {
    info!(
        "{:<12} --> 목록 생성 session: {}, {}개",
        "Command",
        session_id,
        forms.len()
    );
    let owner_id = owner.id;

    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                query::session(&mut **tx, owner_id, session_id).await?;
                let valid = forms
                    .iter()
                    .map(validate_list)
                    .collect::<Result<Vec<_>, _>>()?;

                let mut lists = Vec::with_capacity(valid.len());
                for list in &valid {
                    lists.push(insert_list(&mut **tx, owner_id, session_id, list).await?);
                }
                Ok::<_, AppError>(lists)
            })
        })
        .await
}

// endregion: --- Lists

// region:    --- Items

/// 4. 품목 생성
pub async fn create_item(
    conn: &mut SqliteConnection,
    owner: &User,
    store_id: i64,
    form: ItemForm,
) -> AppResult<Item> {
    info!("{:<12} --> 품목 생성 store: {}", "Command", store_id);
    query::store(&mut *conn, owner.id, store_id).await?;

    let mut errors = FieldErrors::new();
    let name = required_text(&mut errors, "name", &form.name, MAX_ITEM_NAME_LENGTH);
    errors.into_result(())?;

    let item = sqlx::query_as::<_, Item>(queries::INSERT_ITEM)
        .bind(store_id)
        .bind(&name)
        .fetch_one(conn)
        .await
        .map_err(|e| map_unique(e, DUPLICATE_ITEM))?;
    Ok(item)
}

// endregion: --- Items

// region:    --- List Items

/// 5. 목록 항목 입력. 같은 (목록, 품목) 항목이 있으면 수량을 바꾼다
pub async fn set_list_item(
    conn: &mut SqliteConnection,
    owner: &User,
    list_id: i64,
    item_id: i64,
    form: ListItemForm,
) -> AppResult<ListItem> {
    info!(
        "{:<12} --> 목록 항목 입력 list: {}, item: {}",
        "Command", list_id, item_id
    );
    query::list(&mut *conn, owner.id, list_id).await?;
    let store_id: i64 = sqlx::query_scalar(queries::GET_LIST_STORE)
        .bind(list_id)
        .fetch_one(&mut *conn)
        .await?;
    query::item(&mut *conn, store_id, item_id).await?;

    let mut errors = FieldErrors::new();
    let amount = validate_quantity(&mut errors, "amount", &form.amount, None);
    errors.into_result(())?;

    let mut tx = conn.begin().await?;
    let updated = sqlx::query_as::<_, ListItem>(queries::UPDATE_LIST_ITEM)
        .bind(list_id)
        .bind(item_id)
        .bind(amount)
        .fetch_optional(&mut *tx)
        .await?;
    let list_item = match updated {
        Some(list_item) => list_item,
        None => {
            sqlx::query_as::<_, ListItem>(queries::INSERT_LIST_ITEM)
                .bind(list_id)
                .bind(item_id)
                .bind(amount)
                .fetch_one(&mut *tx)
                .await?
        }
    };
    tx.commit().await?;

    Ok(list_item)
}

// endregion: --- List Items

// region:    --- Import

/// 6. 목록 가져오기
/// 목록마다 새 List를 만들고, 이름이 같은 매장 품목은 재사용한다.
/// 이름이 빈 레코드는 건너뛰고 빈 수량은 0으로 본다. 전체가 하나의 트랜잭션이다.
pub async fn import_items(
    db_manager: &DatabaseManager,
    owner: &User,
    session_id: i64,
    lists: Vec<ImportList>,
) -> AppResult<ImportSummary> {
    info!(
        "{:<12} --> 목록 가져오기 session: {}, 목록 {}개",
        "Command",
        session_id,
        lists.len()
    );
    let owner_id = owner.id;

    let summary = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let session = query::session(&mut **tx, owner_id, session_id).await?;
                let mut summary = ImportSummary::default();

                for import in lists {
                    let valid = validate_list(&import.list)?;
                    let list = insert_list(&mut **tx, owner_id, session_id, &valid).await?;
                    summary.lists += 1;

                    for record in import.items {
                        let mut errors = FieldErrors::new();
                        let name =
                            optional_text(&mut errors, "name", &record.name, MAX_ITEM_NAME_LENGTH);
                        if name.is_empty() {
                            summary.skipped += 1;
                            continue;
                        }
                        let amount = validate_quantity(
                            &mut errors,
                            "amount",
                            &record.amount,
                            Some(Quantity::ZERO),
                        );
                        if !errors.is_empty() {
                            warn!(
                                "{:<12} --> 가져오기 중단 (롤백): {} {}",
                                "Command",
                                name,
                                errors.summary()
                            );
                            return Err(AppError::Validation(errors));
                        }

                        let item = match query::item_by_name(&mut **tx, session.store_id, &name)
                            .await?
                        {
                            Some(item) => item,
                            None => {
                                summary.items_created += 1;
                                sqlx::query_as::<_, Item>(queries::INSERT_ITEM)
                                    .bind(session.store_id)
                                    .bind(&name)
                                    .fetch_one(&mut **tx)
                                    .await?
                            }
                        };

                        sqlx::query(queries::INSERT_LIST_ITEM)
                            .bind(list.id)
                            .bind(item.id)
                            .bind(amount)
                            .execute(&mut **tx)
                            .await?;
                        summary.list_items += 1;
                    }
                }
                Ok::<_, AppError>(summary)
            })
        })
        .await?;

    info!("{:<12} --> 가져오기 완료: {:?}", "Command", summary);
    Ok(summary)
}

// endregion: --- Import

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn list_form(name: &str, list_type: Option<&str>) -> NewListForm {
        NewListForm {
            name: name.to_string(),
            list_type: list_type.map(str::to_string),
            origin: String::new(),
        }
    }

    fn session_form(start: &str, end: &str) -> SessionForm {
        SessionForm {
            name: "January".to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
        }
    }

    #[test]
    fn list_names_and_types_are_validated() {
        assert_eq!(
            validate_list(&list_form("Stock", None)).unwrap().list_type,
            ListType::Count
        );
        assert!(validate_list(&list_form("", Some("AD"))).is_err());
        assert!(validate_list(&list_form(&"A".repeat(21), Some("AD"))).is_err());
        let errors = validate_list(&list_form("Stock", Some("ZZ"))).unwrap_err();
        assert!(errors.get("type").is_some());
    }

    #[test]
    fn quantities_must_be_in_range() {
        let mut errors = FieldErrors::new();
        assert_eq!(
            validate_quantity(&mut errors, "amount", &json!("1.1"), None).units(),
            11
        );
        assert_eq!(
            validate_quantity(&mut errors, "amount", &json!(""), Some(Quantity::ZERO)),
            Quantity::ZERO
        );
        assert!(errors.is_empty());

        validate_quantity(&mut errors, "amount", &json!("-1"), None);
        assert!(!errors.is_empty());

        let mut errors = FieldErrors::new();
        validate_quantity(&mut errors, "amount", &json!("1000001"), None);
        assert!(!errors.is_empty());

        let mut errors = FieldErrors::new();
        validate_quantity(&mut errors, "amount", &json!(null), None);
        assert_eq!(errors.summary(), REQUIRED);
    }

    #[test]
    fn session_end_must_not_precede_start() {
        let valid = validate_session(&session_form("2023-01-01", "2023-01-31")).unwrap();
        assert_eq!(valid.start_date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert!(validate_session(&session_form("2023-01-01", "2023-01-01")).is_ok());
        assert!(validate_session(&session_form("2023-02-01", "2023-01-31")).is_err());
        assert!(validate_session(&session_form("yesterday", "2023-01-31")).is_err());
    }
}
