//! # Menu Item Repository
//!
//! Database operations for menu items and their applicable modifiers.
//!
//! ## Storage
//! ```text
//! menu_items ──┐
//!              │ 1:N              N:1
//!              └──► menu_item_modifiers ◄── modifiers
//!                   (menu_item_id, modifier_id, position)
//! ```
//! The link rows are rewritten wholesale on every update, inside the same
//! transaction as the item row.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mesa_core::{MenuItem, Modifier};

const SELECT_MENU_ITEM: &str = r#"
    SELECT id, name, description, price_cents, category_id,
           printer_role_id, is_available, created_at, updated_at
    FROM menu_items
"#;

/// Fields accepted when creating or editing a menu item.
#[derive(Debug, Clone)]
pub struct MenuItemDraft {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub category_id: String,
    pub printer_role_id: Option<String>,
    pub is_available: bool,
    pub modifier_ids: Vec<String>,
}

#[derive(sqlx::FromRow)]
struct MenuItemRow {
    id: String,
    name: String,
    description: Option<String>,
    price_cents: i64,
    category_id: String,
    printer_role_id: Option<String>,
    is_available: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MenuItemRow {
    fn into_menu_item(self, modifiers: Vec<Modifier>) -> MenuItem {
        MenuItem {
            id: self.id,
            name: self.name,
            description: self.description,
            price_cents: self.price_cents,
            category_id: self.category_id,
            printer_role_id: self.printer_role_id,
            is_available: self.is_available,
            modifiers,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct LinkedModifierRow {
    menu_item_id: String,
    id: String,
    name: String,
    price_delta_cents: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl LinkedModifierRow {
    fn split(self) -> (String, Modifier) {
        let modifier = Modifier {
            id: self.id,
            name: self.name,
            price_delta_cents: self.price_delta_cents,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        (self.menu_item_id, modifier)
    }
}

/// Repository for menu item operations.
#[derive(Debug, Clone)]
pub struct MenuItemRepository {
    pool: SqlitePool,
}

impl MenuItemRepository {
    /// Creates a new MenuItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MenuItemRepository { pool }
    }

    /// Lists menu items ordered by name, optionally within one category.
    pub async fn list(&self, category_id: Option<&str>) -> DbResult<Vec<MenuItem>> {
        debug!(category_id = ?category_id, "Listing menu items");

        let sql = format!("{SELECT_MENU_ITEM} WHERE (?1 IS NULL OR category_id = ?1) ORDER BY name ASC");
        let rows = sqlx::query_as::<_, MenuItemRow>(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;

        let links = sqlx::query_as::<_, LinkedModifierRow>(
            r#"
            SELECT l.menu_item_id, m.id, m.name, m.price_delta_cents, m.created_at, m.updated_at
            FROM menu_item_modifiers l
            JOIN modifiers m ON m.id = l.modifier_id
            ORDER BY l.menu_item_id, l.position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_item: HashMap<String, Vec<Modifier>> = HashMap::new();
        for (item_id, modifier) in links.into_iter().map(LinkedModifierRow::split) {
            by_item.entry(item_id).or_default().push(modifier);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let modifiers = by_item.remove(&row.id).unwrap_or_default();
                row.into_menu_item(modifiers)
            })
            .collect())
    }

    /// Gets a menu item with its modifiers.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<MenuItem>> {
        let mut conn = self.pool.acquire().await?;
        fetch_menu_item(&mut conn, id).await
    }

    /// Inserts a menu item and its modifier links.
    pub async fn insert(&self, draft: &MenuItemDraft) -> DbResult<MenuItem> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, name = %draft.name, "Inserting menu item");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO menu_items (
                id, name, description, price_cents, category_id,
                printer_role_id, is_available, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            "#,
        )
        .bind(&id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price_cents)
        .bind(&draft.category_id)
        .bind(&draft.printer_role_id)
        .bind(draft.is_available)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        write_links(&mut tx, &id, &draft.modifier_ids).await?;

        let item = fetch_menu_item(&mut tx, &id)
            .await?
            .ok_or_else(|| DbError::not_found("MenuItem", id.as_str()))?;

        tx.commit().await?;
        Ok(item)
    }

    /// Replaces a menu item's fields and modifier list.
    pub async fn update(&self, id: &str, draft: &MenuItemDraft) -> DbResult<MenuItem> {
        debug!(id = %id, name = %draft.name, "Updating menu item");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE menu_items SET
                name = ?2,
                description = ?3,
                price_cents = ?4,
                category_id = ?5,
                printer_role_id = ?6,
                is_available = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price_cents)
        .bind(&draft.category_id)
        .bind(&draft.printer_role_id)
        .bind(draft.is_available)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("MenuItem", id));
        }

        sqlx::query("DELETE FROM menu_item_modifiers WHERE menu_item_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        write_links(&mut tx, id, &draft.modifier_ids).await?;

        let item = fetch_menu_item(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("MenuItem", id))?;

        tx.commit().await?;
        Ok(item)
    }

    /// Counts order lines that reference a menu item.
    pub async fn count_order_lines(&self, id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE menu_item_id = ?1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Deletes a menu item.
    ///
    /// Fails with [`DbError::ForeignKeyViolation`] while order lines
    /// reference it. Modifier links are removed with the item.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting menu item");

        let result = sqlx::query("DELETE FROM menu_items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("MenuItem", id));
        }

        Ok(())
    }
}

async fn fetch_menu_item(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<MenuItem>> {
    let sql = format!("{SELECT_MENU_ITEM} WHERE id = ?1");
    let Some(row) = sqlx::query_as::<_, MenuItemRow>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
    else {
        return Ok(None);
    };

    let modifiers = sqlx::query_as::<_, Modifier>(
        r#"
        SELECT m.id, m.name, m.price_delta_cents, m.created_at, m.updated_at
        FROM menu_item_modifiers l
        JOIN modifiers m ON m.id = l.modifier_id
        WHERE l.menu_item_id = ?1
        ORDER BY l.position
        "#,
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(row.into_menu_item(modifiers)))
}

async fn write_links(conn: &mut SqliteConnection, item_id: &str, modifier_ids: &[String]) -> DbResult<()> {
    for (position, modifier_id) in modifier_ids.iter().enumerate() {
        sqlx::query(
            "INSERT OR IGNORE INTO menu_item_modifiers (menu_item_id, modifier_id, position) VALUES (?1, ?2, ?3)",
        )
        .bind(item_id)
        .bind(modifier_id)
        .bind(position as i64)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{CategoryDraft, ModifierDraft};
    use crate::{Database, DbConfig};

    async fn setup() -> (Database, String, Vec<Modifier>) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let category = db
            .categories()
            .insert(&CategoryDraft {
                name: "Pizza".to_string(),
                icon: None,
                default_printer_role_id: None,
            })
            .await
            .unwrap();

        let mut modifiers = Vec::new();
        for (name, delta) in [("Extra cheese", 120), ("No olives", 0)] {
            modifiers.push(
                db.modifiers()
                    .insert(&ModifierDraft { name: name.to_string(), price_delta_cents: delta })
                    .await
                    .unwrap(),
            );
        }

        (db, category.id, modifiers)
    }

    fn draft(name: &str, category_id: &str, modifier_ids: Vec<String>) -> MenuItemDraft {
        MenuItemDraft {
            name: name.to_string(),
            description: None,
            price_cents: 1100,
            category_id: category_id.to_string(),
            printer_role_id: None,
            is_available: true,
            modifier_ids,
        }
    }

    #[tokio::test]
    async fn test_insert_with_modifiers() {
        let (db, category_id, modifiers) = setup().await;
        let ids = modifiers.iter().map(|m| m.id.clone()).collect();

        let item = db
            .menu_items()
            .insert(&draft("Margherita", &category_id, ids))
            .await
            .unwrap();

        assert_eq!(item.modifiers.len(), 2);
        assert_eq!(item.modifiers[0].name, "Extra cheese");
    }

    #[tokio::test]
    async fn test_update_replaces_modifier_list() {
        let (db, category_id, modifiers) = setup().await;
        let repo = db.menu_items();
        let item = repo
            .insert(&draft("Margherita", &category_id, vec![modifiers[0].id.clone()]))
            .await
            .unwrap();

        let updated = repo
            .update(&item.id, &draft("Margherita", &category_id, vec![modifiers[1].id.clone()]))
            .await
            .unwrap();

        assert_eq!(updated.modifiers.len(), 1);
        assert_eq!(updated.modifiers[0].name, "No olives");
    }

    #[tokio::test]
    async fn test_deleting_modifier_drops_link() {
        let (db, category_id, modifiers) = setup().await;
        let ids = modifiers.iter().map(|m| m.id.clone()).collect();
        let item = db
            .menu_items()
            .insert(&draft("Margherita", &category_id, ids))
            .await
            .unwrap();

        db.modifiers().delete(&modifiers[0].id).await.unwrap();

        let item = db.menu_items().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(item.modifiers.len(), 1);
    }

    #[tokio::test]
    async fn test_list_filters_by_category() {
        let (db, category_id, _) = setup().await;
        let drinks = db
            .categories()
            .insert(&CategoryDraft {
                name: "Drinks".to_string(),
                icon: None,
                default_printer_role_id: None,
            })
            .await
            .unwrap();

        db.menu_items().insert(&draft("Margherita", &category_id, vec![])).await.unwrap();
        db.menu_items().insert(&draft("Lemonade", &drinks.id, vec![])).await.unwrap();

        assert_eq!(db.menu_items().list(None).await.unwrap().len(), 2);
        let only_drinks = db.menu_items().list(Some(&drinks.id)).await.unwrap();
        assert_eq!(only_drinks.len(), 1);
        assert_eq!(only_drinks[0].name, "Lemonade");
    }

    #[tokio::test]
    async fn test_category_in_use_cannot_be_deleted() {
        let (db, category_id, _) = setup().await;
        db.menu_items().insert(&draft("Margherita", &category_id, vec![])).await.unwrap();

        assert_eq!(db.categories().count_menu_items(&category_id).await.unwrap(), 1);
        let err = db.categories().delete(&category_id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
