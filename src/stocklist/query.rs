// region:    --- Imports
use super::model::{
    Item, ItemEntry, ItemWithEntries, List, ListItem, ListSummary, Session, StockTotals, Store,
    StoreItems,
};
use super::queries;
use crate::error::{AppError, AppResult};
use sqlx::SqliteConnection;
use std::collections::HashMap;
use tracing::info;

// endregion: --- Imports

// region:    --- Stores

/// 사용자의 매장 목록
pub async fn stores_for(conn: &mut SqliteConnection, owner_id: i64) -> AppResult<Vec<Store>> {
    let stores = sqlx::query_as::<_, Store>(queries::GET_STORES_FOR_OWNER)
        .bind(owner_id)
        .fetch_all(conn)
        .await?;
    Ok(stores)
}

/// 매장 조회. 다른 사용자의 매장은 404
pub async fn store(conn: &mut SqliteConnection, owner_id: i64, store_id: i64) -> AppResult<Store> {
    sqlx::query_as::<_, Store>(queries::GET_STORE)
        .bind(store_id)
        .bind(owner_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::not_found("Store not found."))
}

// endregion: --- Stores

// region:    --- Sessions

/// 매장의 조사 기간 목록 (최근순)
pub async fn sessions_for(conn: &mut SqliteConnection, store_id: i64) -> AppResult<Vec<Session>> {
    let sessions = sqlx::query_as::<_, Session>(queries::GET_SESSIONS_FOR_STORE)
        .bind(store_id)
        .fetch_all(conn)
        .await?;
    Ok(sessions)
}

/// 조사 기간 조회. 다른 사용자 매장의 기간은 404
pub async fn session(
    conn: &mut SqliteConnection,
    owner_id: i64,
    session_id: i64,
) -> AppResult<Session> {
    sqlx::query_as::<_, Session>(queries::GET_SESSION)
        .bind(session_id)
        .bind(owner_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::not_found("Session not found."))
}

// endregion: --- Sessions

// region:    --- Lists & Items

/// 목록 조회 (소유자 본인만)
pub async fn list(conn: &mut SqliteConnection, owner_id: i64, list_id: i64) -> AppResult<List> {
    sqlx::query_as::<_, List>(queries::GET_LIST)
        .bind(list_id)
        .bind(owner_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::not_found("List not found."))
}

/// 매장 품목 조회
pub async fn item(conn: &mut SqliteConnection, store_id: i64, item_id: i64) -> AppResult<Item> {
    sqlx::query_as::<_, Item>(queries::GET_ITEM)
        .bind(item_id)
        .bind(store_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::not_found("Item not found."))
}

/// 이름으로 매장 품목 조회
pub async fn item_by_name(
    conn: &mut SqliteConnection,
    store_id: i64,
    name: &str,
) -> AppResult<Option<Item>> {
    let item = sqlx::query_as::<_, Item>(queries::GET_ITEM_BY_NAME)
        .bind(store_id)
        .bind(name)
        .fetch_optional(conn)
        .await?;
    Ok(item)
}

/// 매장 품목과 각 품목의 목록 항목, 매장의 목록 요약
pub async fn items_for(conn: &mut SqliteConnection, store_id: i64) -> AppResult<StoreItems> {
    info!("{:<12} --> 매장 품목 조회 store: {}", "Query", store_id);
    let items = sqlx::query_as::<_, Item>(queries::GET_ITEMS_FOR_STORE)
        .bind(store_id)
        .fetch_all(&mut *conn)
        .await?;
    let list_items = sqlx::query_as::<_, ListItem>(queries::GET_LIST_ITEMS_FOR_STORE)
        .bind(store_id)
        .fetch_all(&mut *conn)
        .await?;
    let lists = sqlx::query_as::<_, ListSummary>(queries::GET_LISTS_FOR_STORE)
        .bind(store_id)
        .fetch_all(conn)
        .await?;

    let mut entries: HashMap<i64, Vec<ItemEntry>> = HashMap::new();
    for list_item in list_items {
        entries.entry(list_item.item_id).or_default().push(ItemEntry {
            list_id: list_item.list_id,
            amount: list_item.amount,
        });
    }

    let items = items
        .into_iter()
        .map(|item| ItemWithEntries {
            list_items: entries.remove(&item.id).unwrap_or_default(),
            id: item.id,
            name: item.name,
        })
        .collect();

    Ok(StoreItems { items, lists })
}

// endregion: --- Lists & Items

// region:    --- Stock Totals

/// 조사 기간 내 매장 전 품목의 재고 합계
pub async fn stock_totals(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> AppResult<Vec<StockTotals>> {
    info!("{:<12} --> 재고 합계 조회 session: {}", "Query", session_id);
    let totals = sqlx::query_as::<_, StockTotals>(queries::GET_STOCK_TOTALS)
        .bind(session_id)
        .fetch_all(conn)
        .await?;
    Ok(totals)
}

/// 조사 기간 내 품목 하나의 재고 합계. 해당 매장 품목이 아니면 404
pub async fn item_totals(
    conn: &mut SqliteConnection,
    session_id: i64,
    item_id: i64,
) -> AppResult<StockTotals> {
    sqlx::query_as::<_, StockTotals>(queries::GET_ITEM_STOCK_TOTALS)
        .bind(session_id)
        .bind(item_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::not_found("Item not found."))
}

// endregion: --- Stock Totals

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseManager;
    use crate::identity::commands::register;
    use crate::identity::model::RegisterCommand;
    use crate::identity::User;
    use crate::stocklist::commands::{
        create_item, create_lists, create_session, create_store, delete_store, import_items,
        set_list_item,
    };
    use crate::stocklist::model::{
        ImportList, ItemForm, ListItemForm, ListType, NewListForm, SessionForm, StoreForm,
    };
    use serde_json::json;

    struct Fixture {
        db_manager: DatabaseManager,
        user: User,
        store: Store,
        session: Session,
    }

    async fn setup() -> Fixture {
        let db_manager = DatabaseManager::in_memory().await.unwrap();
        let user = register(
            &db_manager,
            RegisterCommand {
                username: "testuser".to_string(),
                email: "testuser@test.com".to_string(),
                password: "12345".to_string(),
                confirmation: "12345".to_string(),
            },
        )
        .await
        .unwrap();

        let mut conn = db_manager.pool().acquire().await.unwrap();
        let store = create_store(
            &mut conn,
            &user,
            StoreForm {
                name: "Test Store".to_string(),
            },
        )
        .await
        .unwrap();
        let session = create_session(
            &mut conn,
            &user,
            store.id,
            SessionForm {
                name: "January".to_string(),
                start_date: "2023-01-01".to_string(),
                end_date: "2023-01-31".to_string(),
            },
        )
        .await
        .unwrap();
        drop(conn);

        Fixture {
            db_manager,
            user,
            store,
            session,
        }
    }

    fn import_payload(extra: serde_json::Value) -> Vec<ImportList> {
        let mut items = vec![
            json!({ "name": "Absolut Vodka 70CL BTL", "amount": "12" }),
            json!({ "name": "Bacardi Superior Rum 70CL BTL", "amount": "9" }),
            json!({ "name": "Cazadores Reposado Tequila 70CL BTL", "amount": "" }),
        ];
        if !extra.is_null() {
            items.push(extra);
        }
        serde_json::from_value(json!([{
            "origin": "test_data.csv",
            "name": "Stock",
            "type": "AD",
            "items": items,
        }]))
        .unwrap()
    }

    async fn list_count(conn: &mut SqliteConnection) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM lists")
            .fetch_one(conn)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn additions_are_summed_per_item() {
        let fx = setup().await;

        let lists = create_lists(
            &fx.db_manager,
            &fx.user,
            fx.session.id,
            vec![
                NewListForm {
                    name: "Delivery 1".to_string(),
                    list_type: Some("AD".to_string()),
                    origin: String::new(),
                },
                NewListForm {
                    name: "Delivery 2".to_string(),
                    list_type: Some("AD".to_string()),
                    origin: String::new(),
                },
            ],
        )
        .await
        .unwrap();
        let mut conn = fx.db_manager.pool().acquire().await.unwrap();
        let item = create_item(
            &mut conn,
            &fx.user,
            fx.store.id,
            ItemForm {
                name: "Vodka".to_string(),
            },
        )
        .await
        .unwrap();

        for (list, amount) in lists.iter().zip(["12.7", "10.0"]) {
            set_list_item(
                &mut conn,
                &fx.user,
                list.id,
                item.id,
                ListItemForm {
                    amount: json!(amount),
                },
            )
            .await
            .unwrap();
        }

        let totals = item_totals(&mut conn, fx.session.id, item.id).await.unwrap();
        assert_eq!(totals.total_added.to_string(), "22.7");
        assert_eq!(totals.total_subtracted, crate::amount::Quantity::ZERO);
        assert_eq!(totals.total_counted, crate::amount::Quantity::ZERO);
        assert_eq!(totals.net_change().to_string(), "22.7");
    }

    #[tokio::test]
    async fn totals_default_to_zero_and_split_by_type() {
        let fx = setup().await;

        let lists = create_lists(
            &fx.db_manager,
            &fx.user,
            fx.session.id,
            vec![
                NewListForm {
                    name: "Sold".to_string(),
                    list_type: Some("SU".to_string()),
                    origin: String::new(),
                },
                NewListForm {
                    name: "End".to_string(),
                    list_type: None,
                    origin: String::new(),
                },
            ],
        )
        .await
        .unwrap();
        assert_eq!(lists[1].list_type, ListType::Count);
        let mut conn = fx.db_manager.pool().acquire().await.unwrap();

        let gin = create_item(&mut conn, &fx.user, fx.store.id, ItemForm { name: "Gin".into() })
            .await
            .unwrap();
        let rum = create_item(&mut conn, &fx.user, fx.store.id, ItemForm { name: "Rum".into() })
            .await
            .unwrap();
        set_list_item(&mut conn, &fx.user, lists[0].id, gin.id, ListItemForm { amount: json!("2.5") })
            .await
            .unwrap();
        set_list_item(&mut conn, &fx.user, lists[1].id, gin.id, ListItemForm { amount: json!("4") })
            .await
            .unwrap();

        let totals = stock_totals(&mut conn, fx.session.id).await.unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].item_id, gin.id);
        assert_eq!(totals[0].total_subtracted.to_string(), "2.5");
        assert_eq!(totals[0].total_counted.to_string(), "4.0");
        assert_eq!(totals[1].item_id, rum.id);
        assert_eq!(totals[1].total_added.units(), 0);
        assert_eq!(totals[1].total_counted.units(), 0);
    }

    #[tokio::test]
    async fn setting_a_list_item_twice_updates_it() {
        let fx = setup().await;

        let lists = create_lists(
            &fx.db_manager,
            &fx.user,
            fx.session.id,
            vec![NewListForm {
                name: "Start".to_string(),
                list_type: Some("CO".to_string()),
                origin: String::new(),
            }],
        )
        .await
        .unwrap();
        let mut conn = fx.db_manager.pool().acquire().await.unwrap();
        let item = create_item(&mut conn, &fx.user, fx.store.id, ItemForm { name: "Gin".into() })
            .await
            .unwrap();

        for amount in ["1", "11"] {
            set_list_item(&mut conn, &fx.user, lists[0].id, item.id, ListItemForm { amount: json!(amount) })
                .await
                .unwrap();
        }

        let store_items = items_for(&mut conn, fx.store.id).await.unwrap();
        assert_eq!(store_items.items[0].list_items.len(), 1);
        assert_eq!(store_items.items[0].list_items[0].amount.to_string(), "11.0");
        assert_eq!(store_items.lists[0].count, 1);
    }

    #[tokio::test]
    async fn import_creates_lists_items_and_entries() {
        let fx = setup().await;

        let summary = import_items(
            &fx.db_manager,
            &fx.user,
            fx.session.id,
            import_payload(json!({ "name": "Absolut Vodka 70CL BTL" })),
        )
        .await
        .unwrap();
        assert_eq!(summary.lists, 1);
        assert_eq!(summary.items_created, 3);
        assert_eq!(summary.list_items, 4);

        let mut conn = fx.db_manager.pool().acquire().await.unwrap();

        let store_items = items_for(&mut conn, fx.store.id).await.unwrap();
        assert_eq!(store_items.items.len(), 3);
        assert_eq!(store_items.items[0].name, "Absolut Vodka 70CL BTL");
        assert_eq!(store_items.lists[0].name, "Stock");
        assert_eq!(store_items.lists[0].count, 4);
    }

    #[tokio::test]
    async fn import_skips_records_without_name() {
        let fx = setup().await;

        let summary = import_items(
            &fx.db_manager,
            &fx.user,
            fx.session.id,
            import_payload(json!({ "name": "", "amount": "6" })),
        )
        .await
        .unwrap();
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.list_items, 3);
    }

    #[tokio::test]
    async fn failed_import_persists_nothing() {
        let fx = setup().await;

        for bad in [
            json!({ "name": "Negative", "amount": "-1" }),
            json!({ "name": "Too many", "amount": "1000001" }),
            json!({ "name": "A".repeat(81), "amount": "6" }),
        ] {
            let result =
                import_items(&fx.db_manager, &fx.user, fx.session.id, import_payload(bad)).await;
            assert!(matches!(result, Err(AppError::Validation(_))));
        }

        let mut bad_type = import_payload(serde_json::Value::Null);
        bad_type[0].list.list_type = Some("ZZ".to_string());
        assert!(import_items(&fx.db_manager, &fx.user, fx.session.id, bad_type)
            .await
            .is_err());

        let mut conn = fx.db_manager.pool().acquire().await.unwrap();
        assert_eq!(list_count(&mut conn).await, 0);
        assert!(items_for(&mut conn, fx.store.id).await.unwrap().items.is_empty());
    }

    #[tokio::test]
    async fn deleting_a_store_removes_everything_under_it() {
        let fx = setup().await;
        import_items(
            &fx.db_manager,
            &fx.user,
            fx.session.id,
            import_payload(serde_json::Value::Null),
        )
        .await
        .unwrap();

        let mut conn = fx.db_manager.pool().acquire().await.unwrap();
        assert_eq!(list_count(&mut conn).await, 1);

        delete_store(&mut conn, &fx.user, fx.store.id).await.unwrap();

        for table in ["stores", "stock_sessions", "items", "lists", "list_items"] {
            let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                .fetch_one(&mut *conn)
                .await
                .unwrap();
            assert_eq!(count, 0, "{table} not emptied");
        }
        assert!(matches!(
            store(&mut conn, fx.user.id, fx.store.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn other_users_cannot_see_stores() {
        let fx = setup().await;
        let other = register(
            &fx.db_manager,
            RegisterCommand {
                username: "other".to_string(),
                email: String::new(),
                password: "pw".to_string(),
                confirmation: "pw".to_string(),
            },
        )
        .await
        .unwrap();
        let mut conn = fx.db_manager.pool().acquire().await.unwrap();

        assert!(matches!(
            store(&mut conn, other.id, fx.store.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            session(&mut conn, other.id, fx.session.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn duplicate_store_and_item_names_are_rejected() {
        let fx = setup().await;
        let mut conn = fx.db_manager.pool().acquire().await.unwrap();

        let duplicate = create_store(&mut conn, &fx.user, StoreForm { name: "Test Store".into() }).await;
        assert!(matches!(duplicate, Err(AppError::Duplicate(_))));

        create_item(&mut conn, &fx.user, fx.store.id, ItemForm { name: "Gin".into() })
            .await
            .unwrap();
        let duplicate = create_item(&mut conn, &fx.user, fx.store.id, ItemForm { name: "Gin".into() }).await;
        assert!(matches!(duplicate, Err(AppError::Duplicate(_))));
    }
}
