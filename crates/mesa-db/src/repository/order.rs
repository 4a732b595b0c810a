//! # Order Repository
//!
//! Database operations for dine-in orders and their lines.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. OPEN                                                               │
//! │     └── create_for_table() → Order { status: OPEN }                    │
//! │         table: occupied, linked, cached total 0                        │
//! │                                                                         │
//! │  2. ENTER LINES                                                        │
//! │     └── add_item() / update_item_quantity() / remove_item() / ...      │
//! │     └── every call recomputes totals in the same transaction         │
//! │         table cached total follows the order total                     │
//! │                                                                         │
//! │  3. KITCHEN                                                            │
//! │     └── update_status(IN_PROGRESS) → update_status(DONE)               │
//! │                                                                         │
//! │  4. SETTLE                                                             │
//! │     └── pay()                  → PAID, table dirty, link cleared       │
//! │     └── update_status(CANCELLED) → table available, link cleared       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Business rules come from `mesa_core::order`; this module only decides
//! where the transaction boundaries are.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use mesa_core::order::{self, plan_transition, OrderTotals, Transition};
use mesa_core::ticket::{build_tickets, KitchenTicket, RoutedItem};
use mesa_core::{
    CoreError, Money, Order, OrderItem, OrderStatus, PaymentMethod, SelectedModifier, TableStatus,
    TaxRate, DEFAULT_TAX_RATE, MAX_ORDER_LINES,
};

const SELECT_ORDER: &str = r#"
    SELECT id, table_id, status, subtotal_cents, tax_cents, total_cents,
           payment_method, amount_paid_cents, created_at, updated_at, completed_at
    FROM orders
"#;

const SELECT_ORDER_ITEM: &str = r#"
    SELECT id, order_id, position, menu_item_id, name, unit_price_cents,
           quantity, modifiers, special_requests, line_total_cents, created_at
    FROM order_items
"#;

// =============================================================================
// Inputs and Outputs
// =============================================================================

/// A line to write onto an order.
///
/// Name and unit price are snapshots taken from the menu item by the caller.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub menu_item_id: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub modifiers: Vec<SelectedModifier>,
    pub special_requests: Option<String>,
}

/// Result of settling an order.
#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    pub order: Order,
    pub change: Money,
}

// =============================================================================
// Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: String,
    table_id: String,
    status: OrderStatus,
    subtotal_cents: i64,
    tax_cents: i64,
    total_cents: i64,
    payment_method: Option<PaymentMethod>,
    amount_paid_cents: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            table_id: self.table_id,
            status: self.status,
            items,
            subtotal_cents: self.subtotal_cents,
            tax_cents: self.tax_cents,
            total_cents: self.total_cents,
            payment_method: self.payment_method,
            amount_paid_cents: self.amount_paid_cents,
            created_at: self.created_at,
            updated_at: self.updated_at,
            completed_at: self.completed_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: String,
    order_id: String,
    position: i64,
    menu_item_id: String,
    name: String,
    unit_price_cents: i64,
    quantity: i64,
    modifiers: String,
    special_requests: Option<String>,
    line_total_cents: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = DbError;

    fn try_from(row: OrderItemRow) -> DbResult<Self> {
        Ok(OrderItem {
            modifiers: serde_json::from_str(&row.modifiers)?,
            id: row.id,
            order_id: row.order_id,
            position: row.position,
            menu_item_id: row.menu_item_id,
            name: row.name,
            unit_price_cents: row.unit_price_cents,
            quantity: row.quantity,
            special_requests: row.special_requests,
            line_total_cents: row.line_total_cents,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RouteRow {
    order_item_id: String,
    item_role: Option<String>,
    category_role: Option<String>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
    tax_rate: TaxRate,
}

impl OrderRepository {
    /// Creates a new OrderRepository taxing at [`DEFAULT_TAX_RATE`].
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository {
            pool,
            tax_rate: DEFAULT_TAX_RATE,
        }
    }

    /// Uses `rate` for every totals recomputation.
    pub fn with_tax_rate(mut self, rate: TaxRate) -> Self {
        self.tax_rate = rate;
        self
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Gets an order with its lines.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let mut conn = self.pool.acquire().await?;
        fetch_order(&mut conn, id).await
    }

    /// Gets the unsettled order running at a table, if any.
    pub async fn get_open_for_table(&self, table_id: &str) -> DbResult<Option<Order>> {
        let sql = format!(
            "{SELECT_ORDER} WHERE table_id = ?1 AND status NOT IN ('PAID', 'CANCELLED') \
             ORDER BY created_at DESC, rowid DESC LIMIT 1"
        );

        let mut conn = self.pool.acquire().await?;
        let Some(row) = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(table_id)
            .fetch_optional(&mut *conn)
            .await?
        else {
            return Ok(None);
        };

        let items = fetch_items(&mut conn, &row.id).await?;
        Ok(Some(row.into_order(items)))
    }

    /// Lists orders, newest first, optionally by status.
    pub async fn list(&self, status: Option<OrderStatus>) -> DbResult<Vec<Order>> {
        let sql = format!(
            "{SELECT_ORDER} WHERE (?1 IS NULL OR status = ?1) ORDER BY created_at DESC, rowid DESC"
        );

        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(status)
            .fetch_all(&mut *conn)
            .await?;

        attach_items(&mut conn, rows).await
    }

    /// Lists orders the kitchen still has to work on, oldest first.
    pub async fn list_active(&self) -> DbResult<Vec<Order>> {
        let sql = format!(
            "{SELECT_ORDER} WHERE status IN ('OPEN', 'IN_PROGRESS') ORDER BY created_at ASC, rowid ASC"
        );

        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .fetch_all(&mut *conn)
            .await?;

        debug!(count = rows.len(), "Listed active orders");
        attach_items(&mut conn, rows).await
    }

    // -------------------------------------------------------------------------
    // Order creation and lines
    // -------------------------------------------------------------------------

    /// Opens an order at a table and marks the table occupied.
    ///
    /// Fails with [`CoreError::TableOccupied`] when the table already has
    /// an unsettled order.
    pub async fn create_for_table(&self, table_id: &str) -> DbResult<Order> {
        let mut tx = self.pool.begin().await?;

        let table_number: i64 = sqlx::query_scalar("SELECT number FROM dining_tables WHERE id = ?1")
            .bind(table_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Table", table_id))?;

        let open: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders WHERE table_id = ?1 AND status NOT IN ('PAID', 'CANCELLED')",
        )
        .bind(table_id)
        .fetch_one(&mut *tx)
        .await?;

        if open > 0 {
            return Err(CoreError::TableOccupied { table_number }.into());
        }

        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            table_id: table_id.to_string(),
            status: OrderStatus::Open,
            items: Vec::new(),
            subtotal_cents: 0,
            tax_cents: 0,
            total_cents: 0,
            payment_method: None,
            amount_paid_cents: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        };

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, table_id, status, subtotal_cents, tax_cents, total_cents,
                payment_method, amount_paid_cents, created_at, updated_at, completed_at
            ) VALUES (?1, ?2, ?3, 0, 0, 0, NULL, NULL, ?4, ?4, NULL)
            "#,
        )
        .bind(&order.id)
        .bind(&order.table_id)
        .bind(order.status)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE dining_tables SET
                status = ?2,
                current_order_id = ?3,
                current_order_total_cents = 0,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(table_id)
        .bind(TableStatus::Occupied)
        .bind(&order.id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(order_id = %order.id, table_number, "Order opened");
        Ok(order)
    }

    /// Appends a line and recomputes totals.
    pub async fn add_item(&self, order_id: &str, item: &NewOrderItem) -> DbResult<Order> {
        let mut tx = self.pool.begin().await?;
        modifiable_header(&mut tx, order_id).await?;

        let (lines, max_position): (i64, Option<i64>) =
            sqlx::query_as("SELECT COUNT(*), MAX(position) FROM order_items WHERE order_id = ?1")
                .bind(order_id)
                .fetch_one(&mut *tx)
                .await?;
        if lines as usize >= MAX_ORDER_LINES {
            return Err(CoreError::OrderTooLarge { max: MAX_ORDER_LINES }.into());
        }

        let position = max_position.map_or(0, |p| p + 1);
        insert_item(&mut tx, order_id, position, item).await?;

        let order = self.finish_line_change(&mut tx, order_id).await?;
        tx.commit().await?;

        debug!(order_id = %order_id, menu_item_id = %item.menu_item_id, "Order line added");
        Ok(order)
    }

    /// Sets a line's quantity. Zero removes the line.
    pub async fn update_item_quantity(&self, item_id: &str, quantity: i64) -> DbResult<Order> {
        if quantity == 0 {
            return self.remove_item(item_id).await;
        }

        let mut tx = self.pool.begin().await?;
        let item = fetch_item(&mut tx, item_id).await?;
        modifiable_header(&mut tx, &item.order_id).await?;

        let line_total = order::line_total(
            Money::from_cents(item.unit_price_cents),
            quantity,
            &item.modifiers,
        )?;

        sqlx::query("UPDATE order_items SET quantity = ?2, line_total_cents = ?3 WHERE id = ?1")
            .bind(item_id)
            .bind(quantity)
            .bind(line_total.cents())
            .execute(&mut *tx)
            .await?;

        let order = self.finish_line_change(&mut tx, &item.order_id).await?;
        tx.commit().await?;
        Ok(order)
    }

    /// Replaces the modifiers applied to a line.
    pub async fn update_item_modifiers(
        &self,
        item_id: &str,
        modifiers: &[SelectedModifier],
    ) -> DbResult<Order> {
        let mut tx = self.pool.begin().await?;
        let item = fetch_item(&mut tx, item_id).await?;
        modifiable_header(&mut tx, &item.order_id).await?;

        let line_total = order::line_total(
            Money::from_cents(item.unit_price_cents),
            item.quantity,
            modifiers,
        )?;

        sqlx::query("UPDATE order_items SET modifiers = ?2, line_total_cents = ?3 WHERE id = ?1")
            .bind(item_id)
            .bind(serde_json::to_string(modifiers)?)
            .bind(line_total.cents())
            .execute(&mut *tx)
            .await?;

        let order = self.finish_line_change(&mut tx, &item.order_id).await?;
        tx.commit().await?;
        Ok(order)
    }

    /// Removes a line.
    pub async fn remove_item(&self, item_id: &str) -> DbResult<Order> {
        let mut tx = self.pool.begin().await?;
        let item = fetch_item(&mut tx, item_id).await?;
        modifiable_header(&mut tx, &item.order_id).await?;

        sqlx::query("DELETE FROM order_items WHERE id = ?1")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        let order = self.finish_line_change(&mut tx, &item.order_id).await?;
        tx.commit().await?;

        debug!(order_id = %item.order_id, item_id = %item_id, "Order line removed");
        Ok(order)
    }

    /// Deletes every line and writes `items` in their place, atomically.
    pub async fn replace_items(&self, order_id: &str, items: &[NewOrderItem]) -> DbResult<Order> {
        if items.len() > MAX_ORDER_LINES {
            return Err(CoreError::OrderTooLarge { max: MAX_ORDER_LINES }.into());
        }

        let mut tx = self.pool.begin().await?;
        modifiable_header(&mut tx, order_id).await?;

        sqlx::query("DELETE FROM order_items WHERE order_id = ?1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        for (position, item) in items.iter().enumerate() {
            insert_item(&mut tx, order_id, position as i64, item).await?;
        }

        let order = self.finish_line_change(&mut tx, order_id).await?;
        tx.commit().await?;

        info!(order_id = %order_id, lines = items.len(), "Order lines replaced");
        Ok(order)
    }

    // -------------------------------------------------------------------------
    // Status and payment
    // -------------------------------------------------------------------------

    /// Moves an order to `status`.
    ///
    /// Same-state requests change nothing. PAID and CANCELLED are final;
    /// entering either stamps `completed_at` and releases the table.
    pub async fn update_status(&self, order_id: &str, status: OrderStatus) -> DbResult<Order> {
        let mut tx = self.pool.begin().await?;
        let header = fetch_header(&mut tx, order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_id))?;

        let now = Utc::now();
        match plan_transition(order_id, header.status, status)? {
            Transition::Unchanged => {}
            Transition::Move(next) => {
                sqlx::query("UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1")
                    .bind(order_id)
                    .bind(next)
                    .bind(now)
                    .execute(&mut *tx)
                    .await?;
            }
            Transition::Close(next) => {
                sqlx::query(
                    "UPDATE orders SET status = ?2, completed_at = ?3, updated_at = ?3 WHERE id = ?1",
                )
                .bind(order_id)
                .bind(next)
                .bind(now)
                .execute(&mut *tx)
                .await?;

                release_table(&mut tx, order_id, next).await?;
            }
        }

        let order = fetch_order(&mut tx, order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_id))?;
        tx.commit().await?;

        info!(order_id = %order_id, from = %header.status, to = %status, "Order status updated");
        Ok(order)
    }

    /// Settles an order and marks it PAID.
    ///
    /// Cash must cover the total and reports change. Card charges must
    /// match the total.
    pub async fn pay(
        &self,
        order_id: &str,
        method: PaymentMethod,
        tendered: Money,
    ) -> DbResult<PaymentOutcome> {
        let mut tx = self.pool.begin().await?;
        let header = modifiable_header(&mut tx, order_id).await?;

        let lines: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE order_id = ?1")
            .bind(order_id)
            .fetch_one(&mut *tx)
            .await?;
        if lines == 0 {
            return Err(CoreError::InvalidPayment {
                reason: "order has no items".to_string(),
            }
            .into());
        }

        let total = Money::from_cents(header.total_cents);
        let change = order::settle(total, method, tendered)?;

        let now = Utc::now();
        sqlx::query(
            r#"
            UPDATE orders SET
                status = ?2,
                payment_method = ?3,
                amount_paid_cents = ?4,
                completed_at = ?5,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(order_id)
        .bind(OrderStatus::Paid)
        .bind(method)
        .bind(tendered.cents())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        release_table(&mut tx, order_id, OrderStatus::Paid).await?;

        let order = fetch_order(&mut tx, order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_id))?;
        tx.commit().await?;

        info!(
            order_id = %order_id,
            method = ?method,
            total = %total,
            change = %change,
            "Order paid"
        );
        Ok(PaymentOutcome { order, change })
    }

    // -------------------------------------------------------------------------
    // Kitchen tickets
    // -------------------------------------------------------------------------

    /// Builds one kitchen ticket per printer role for an order.
    pub async fn kitchen_tickets(&self, order_id: &str) -> DbResult<Vec<KitchenTicket>> {
        let mut conn = self.pool.acquire().await?;
        let order = fetch_order(&mut conn, order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_id))?;

        let table_number: i64 = sqlx::query_scalar("SELECT number FROM dining_tables WHERE id = ?1")
            .bind(&order.table_id)
            .fetch_one(&mut *conn)
            .await?;

        let routes = sqlx::query_as::<_, RouteRow>(
            r#"
            SELECT oi.id AS order_item_id,
                   ir.name AS item_role,
                   cr.name AS category_role
            FROM order_items oi
            JOIN menu_items mi ON mi.id = oi.menu_item_id
            JOIN menu_categories c ON c.id = mi.category_id
            LEFT JOIN printer_roles ir ON ir.id = mi.printer_role_id
            LEFT JOIN printer_roles cr ON cr.id = c.default_printer_role_id
            WHERE oi.order_id = ?1
            "#,
        )
        .bind(order_id)
        .fetch_all(&mut *conn)
        .await?;

        let routed: Vec<RoutedItem<'_>> = order
            .items
            .iter()
            .map(|item| {
                let route = routes.iter().find(|r| r.order_item_id == item.id);
                RoutedItem {
                    item,
                    item_role: route.and_then(|r| r.item_role.as_deref()),
                    category_role: route.and_then(|r| r.category_role.as_deref()),
                }
            })
            .collect();

        Ok(build_tickets(&order.id, table_number, &routed, Utc::now()))
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Recomputes totals and reloads the order inside the caller's transaction.
    async fn finish_line_change(&self, conn: &mut SqliteConnection, order_id: &str) -> DbResult<Order> {
        let items = fetch_items(conn, order_id).await?;
        let totals = OrderTotals::compute(&items, self.tax_rate)?;
        write_totals(conn, order_id, totals).await?;

        fetch_order(conn, order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_id))
    }
}

// =============================================================================
// Connection-level helpers
// =============================================================================

async fn fetch_header(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<OrderRow>> {
    let sql = format!("{SELECT_ORDER} WHERE id = ?1");
    let row = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row)
}

/// Loads the order header, rejecting settled orders.
async fn modifiable_header(conn: &mut SqliteConnection, id: &str) -> DbResult<OrderRow> {
    let header = fetch_header(conn, id)
        .await?
        .ok_or_else(|| DbError::not_found("Order", id))?;
    order::ensure_modifiable(&header.id, header.status)?;
    Ok(header)
}

async fn fetch_items(conn: &mut SqliteConnection, order_id: &str) -> DbResult<Vec<OrderItem>> {
    let sql = format!("{SELECT_ORDER_ITEM} WHERE order_id = ?1 ORDER BY position ASC");
    let rows = sqlx::query_as::<_, OrderItemRow>(&sql)
        .bind(order_id)
        .fetch_all(&mut *conn)
        .await?;

    rows.into_iter().map(OrderItem::try_from).collect()
}

async fn fetch_item(conn: &mut SqliteConnection, item_id: &str) -> DbResult<OrderItem> {
    let sql = format!("{SELECT_ORDER_ITEM} WHERE id = ?1");
    let row = sqlx::query_as::<_, OrderItemRow>(&sql)
        .bind(item_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DbError::not_found("OrderItem", item_id))?;

    OrderItem::try_from(row)
}

async fn fetch_order(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Order>> {
    let Some(header) = fetch_header(conn, id).await? else {
        return Ok(None);
    };
    let items = fetch_items(conn, id).await?;
    Ok(Some(header.into_order(items)))
}

async fn attach_items(conn: &mut SqliteConnection, rows: Vec<OrderRow>) -> DbResult<Vec<Order>> {
    let mut orders = Vec::with_capacity(rows.len());
    for row in rows {
        let items = fetch_items(conn, &row.id).await?;
        orders.push(row.into_order(items));
    }
    Ok(orders)
}

async fn insert_item(
    conn: &mut SqliteConnection,
    order_id: &str,
    position: i64,
    item: &NewOrderItem,
) -> DbResult<()> {
    let line_total = order::line_total(
        Money::from_cents(item.unit_price_cents),
        item.quantity,
        &item.modifiers,
    )?;

    sqlx::query(
        r#"
        INSERT INTO order_items (
            id, order_id, position, menu_item_id, name, unit_price_cents,
            quantity, modifiers, special_requests, line_total_cents, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(order_id)
    .bind(position)
    .bind(&item.menu_item_id)
    .bind(&item.name)
    .bind(item.unit_price_cents)
    .bind(item.quantity)
    .bind(serde_json::to_string(&item.modifiers)?)
    .bind(&item.special_requests)
    .bind(line_total.cents())
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn write_totals(conn: &mut SqliteConnection, order_id: &str, totals: OrderTotals) -> DbResult<()> {
    sqlx::query(
        r#"
        UPDATE orders SET
            subtotal_cents = ?2,
            tax_cents = ?3,
            total_cents = ?4,
            updated_at = ?5
        WHERE id = ?1
        "#,
    )
    .bind(order_id)
    .bind(totals.subtotal.cents())
    .bind(totals.tax.cents())
    .bind(totals.total.cents())
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    sqlx::query("UPDATE dining_tables SET current_order_total_cents = ?2 WHERE current_order_id = ?1")
        .bind(order_id)
        .bind(totals.total.cents())
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Unlinks the table from a settled order.
async fn release_table(conn: &mut SqliteConnection, order_id: &str, final_status: OrderStatus) -> DbResult<()> {
    let table_status = match final_status {
        OrderStatus::Paid => TableStatus::Dirty,
        _ => TableStatus::Available,
    };

    sqlx::query(
        r#"
        UPDATE dining_tables SET
            status = ?2,
            current_order_id = NULL,
            current_order_total_cents = NULL,
            updated_at = ?3
        WHERE current_order_id = ?1
        "#,
    )
    .bind(order_id)
    .bind(table_status)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    debug!(order_id = %order_id, table_status = %table_status, "Table released");
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
