//! Product Storage & Query Composition
//! Mission: Persist products and serve filtered, sorted, paginated views
//!
//! The filter clause and sort-field whitelist are explicit functions here
//! rather than being derived from repository method names, so they can be
//! tested directly.

use crate::catalog::models::{NewProduct, Page, Product};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, params_from_iter, Connection, OpenFlags};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};

/// Schema for the product table
const SCHEMA_SQL: &str = r#"
-- Enable WAL mode for concurrent reads during writes
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;

CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    product_name TEXT NOT NULL,
    category TEXT NOT NULL,
    description TEXT,
    price_cents INTEGER NOT NULL,
    stock_quantity INTEGER NOT NULL,
    supplier TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_products_category ON products(category);
CREATE INDEX IF NOT EXISTS idx_products_name ON products(product_name);
"#;

/// A composed catalog query: optional filters plus sort and page window
#[derive(Debug, Clone)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: i64,
    pub size: i64,
    pub sort_col: &'static str,
    pub descending: bool,
}

/// Map an API sort field name onto its column.
///
/// Unknown names are rejected rather than interpolated into SQL.
pub fn sort_column(field: &str) -> Option<&'static str> {
    match field {
        "id" => Some("id"),
        "productName" | "product_name" => Some("product_name"),
        "category" => Some("category"),
        "description" => Some("description"),
        "price" => Some("price_cents"),
        "stockQuantity" | "stock_quantity" => Some("stock_quantity"),
        "supplier" => Some("supplier"),
        "createdAt" | "created_at" => Some("created_at"),
        "updatedAt" | "updated_at" => Some("updated_at"),
        _ => None,
    }
}

/// Build the WHERE fragment for the optional search/category filters.
///
/// A product matches when (category absent OR exact equality) AND (search
/// absent/empty OR case-insensitive substring of name or description).
fn filter_clause(search: Option<&str>, category: Option<&str>) -> (String, Vec<String>) {
    let mut conditions = Vec::new();
    let mut params = Vec::new();

    if let Some(category) = category {
        conditions.push("category = ?".to_string());
        params.push(category.to_string());
    }

    if let Some(search) = search {
        let search = search.trim();
        if !search.is_empty() {
            let pattern = format!("%{}%", search.to_lowercase());
            conditions
                .push("(LOWER(product_name) LIKE ? OR LOWER(description) LIKE ?)".to_string());
            params.push(pattern.clone());
            params.push(pattern);
        }
    }

    if conditions.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), params)
    }
}

/// Product storage with SQLite backend
pub struct ProductStore {
    conn: Arc<Mutex<Connection>>,
}

impl ProductStore {
    /// Open the database, apply pragmas, and create the schema
    pub fn new(db_path: &str) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX; // We handle our own locking

        let conn = Connection::open_with_flags(db_path, flags)
            .with_context(|| format!("Failed to open database at {}", db_path))?;

        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to initialize product schema")?;

        let journal_mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap_or_default();

        if journal_mode.to_lowercase() != "wal" {
            warn!("WAL mode not active, journal_mode = {}", journal_mode);
        }

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))
            .unwrap_or(0);

        info!("📦 Product store initialized at: {} ({} products)", db_path, count);

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Insert a new product, stamping both timestamps
    pub fn insert(&self, new: &NewProduct) -> Result<Product> {
        let now = Utc::now();
        let price_cents = price_to_cents(new.price)?;

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO products
             (product_name, category, description, price_cents, stock_quantity, supplier, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                new.product_name,
                new.category,
                new.description,
                price_cents,
                new.stock_quantity,
                new.supplier,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )
        .context("Failed to insert product")?;

        Ok(Product {
            id: conn.last_insert_rowid(),
            product_name: new.product_name.clone(),
            category: new.category.clone(),
            description: new.description.clone(),
            price: Decimal::new(price_cents, 2),
            stock_quantity: new.stock_quantity,
            supplier: new.supplier.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a product by id
    pub fn find_by_id(&self, id: i64) -> Result<Option<Product>> {
        let conn = self.conn.lock();
        Self::fetch_by_id(&conn, id)
    }

    /// Overwrite every mutable field of an existing product and refresh its
    /// update timestamp. Returns None when the id does not exist.
    pub fn update(&self, id: i64, new: &NewProduct) -> Result<Option<Product>> {
        let now = Utc::now();
        let price_cents = price_to_cents(new.price)?;

        let conn = self.conn.lock();
        let changes = conn
            .execute(
                "UPDATE products
                 SET product_name = ?1, category = ?2, description = ?3, price_cents = ?4,
                     stock_quantity = ?5, supplier = ?6, updated_at = ?7
                 WHERE id = ?8",
                params![
                    new.product_name,
                    new.category,
                    new.description,
                    price_cents,
                    new.stock_quantity,
                    new.supplier,
                    now.to_rfc3339(),
                    id,
                ],
            )
            .context("Failed to update product")?;

        if changes == 0 {
            return Ok(None);
        }

        Self::fetch_by_id(&conn, id)
    }

    /// Delete a product by id. Returns false when the id does not exist.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock();
        let changes = conn
            .execute("DELETE FROM products WHERE id = ?1", params![id])
            .context("Failed to delete product")?;
        Ok(changes > 0)
    }

    /// Total product count
    pub fn count(&self) -> Result<i64> {
        let conn = self.conn.lock();
        let count = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Product count for an exact category
    pub fn count_by_category(&self, category: &str) -> Result<i64> {
        let conn = self.conn.lock();
        let mut stmt =
            conn.prepare_cached("SELECT COUNT(*) FROM products WHERE category = ?1")?;
        let count = stmt.query_row(params![category], |row| row.get(0))?;
        Ok(count)
    }

    /// Run a composed query: filter, sort, paginate.
    ///
    /// An out-of-range page index yields an empty content slice with correct
    /// totals, not an error.
    pub fn search(&self, query: &ProductQuery) -> Result<Page<Product>> {
        let (where_sql, filter_params) =
            filter_clause(query.search.as_deref(), query.category.as_deref());

        let conn = self.conn.lock();

        let count_sql = format!("SELECT COUNT(*) FROM products{}", where_sql);
        let total_elements: i64 = conn
            .prepare(&count_sql)?
            .query_row(params_from_iter(filter_params.iter()), |row| row.get(0))?;

        let direction = if query.descending { "DESC" } else { "ASC" };
        // `id` is a deterministic tie-breaker when sorting on non-unique columns
        let tie_breaker = if query.sort_col == "id" { "" } else { ", id" };

        let sql = format!(
            "SELECT id, product_name, category, description, price_cents, stock_quantity,
                    supplier, created_at, updated_at
             FROM products{}
             ORDER BY {} {}{}
             LIMIT {} OFFSET {}",
            where_sql,
            query.sort_col,
            direction,
            tie_breaker,
            query.size,
            query.page * query.size,
        );

        let mut stmt = conn.prepare(&sql)?;
        let content = stmt
            .query_map(params_from_iter(filter_params.iter()), Self::row_to_product)?
            .collect::<Result<Vec<_>, _>>()?;

        let total_pages = if total_elements == 0 {
            0
        } else {
            (total_elements + query.size - 1) / query.size
        };

        Ok(Page {
            content,
            page: query.page,
            size: query.size,
            total_elements,
            total_pages,
        })
    }

    fn fetch_by_id(conn: &Connection, id: i64) -> Result<Option<Product>> {
        let mut stmt = conn.prepare_cached(
            "SELECT id, product_name, category, description, price_cents, stock_quantity,
                    supplier, created_at, updated_at
             FROM products WHERE id = ?1",
        )?;

        match stmt.query_row(params![id], Self::row_to_product) {
            Ok(product) => Ok(Some(product)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Convert a database row to a Product
    fn row_to_product(row: &rusqlite::Row) -> rusqlite::Result<Product> {
        let price_cents: i64 = row.get(4)?;
        let created_at: String = row.get(7)?;
        let updated_at: String = row.get(8)?;

        Ok(Product {
            id: row.get(0)?,
            product_name: row.get(1)?,
            category: row.get(2)?,
            description: row.get(3)?,
            price: Decimal::new(price_cents, 2),
            stock_quantity: row.get(5)?,
            supplier: row.get(6)?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }
}

/// Prices are persisted as integer cents: the validation rules bound them to
/// two fraction digits, and integer storage keeps SQL ordering numeric.
fn price_to_cents(price: Decimal) -> Result<i64> {
    let mut cents = price;
    cents.rescale(2);
    i64::try_from(cents.mantissa()).context("Price out of range")
}

fn parse_timestamp(value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}
