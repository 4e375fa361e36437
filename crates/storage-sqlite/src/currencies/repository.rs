use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::currencies;
use fxhub_core::currencies::{
    normalize_currency_code, Currency, CurrencyRepositoryTrait, CurrencyUpdate, NewCurrency,
};
use fxhub_core::errors::Result;

#[derive(Debug, Clone, Queryable, Insertable, Identifiable, AsChangeset)]
#[diesel(table_name = currencies, primary_key(code))]
pub struct CurrencyDB {
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CurrencyDB> for Currency {
    fn from(db: CurrencyDB) -> Self {
        Currency {
            code: db.code,
            name: db.name,
            symbol: db.symbol,
        }
    }
}

impl CurrencyDB {
    fn bare(code: &str) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            code: code.to_string(),
            name: String::new(),
            symbol: String::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Inserts a bare row for `code` when none exists and returns the row.
/// Callable from inside another write job, so it takes a raw connection.
pub(crate) fn get_or_create_currency(
    conn: &mut SqliteConnection,
    code: &str,
) -> Result<Currency> {
    let code = normalize_currency_code(code);

    diesel::insert_into(currencies::table)
        .values(&CurrencyDB::bare(&code))
        .on_conflict(currencies::code)
        .do_nothing()
        .execute(conn)
        .map_err(StorageError::from)?;

    currencies::table
        .find(&code)
        .first::<CurrencyDB>(conn)
        .map(Currency::from)
        .map_err(|e| StorageError::from(e).into())
}

#[derive(Clone)]
pub struct CurrencyRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl CurrencyRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl CurrencyRepositoryTrait for CurrencyRepository {
    fn get_by_code(&self, code: &str) -> Result<Option<Currency>> {
        let mut conn = get_connection(&self.pool)?;
        currencies::table
            .find(normalize_currency_code(code))
            .first::<CurrencyDB>(&mut conn)
            .optional()
            .map(|row| row.map(Currency::from))
            .map_err(|e| StorageError::from(e).into())
    }

    fn list(&self) -> Result<Vec<Currency>> {
        let mut conn = get_connection(&self.pool)?;
        currencies::table
            .order_by(currencies::code.asc())
            .load::<CurrencyDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Currency::from).collect())
            .map_err(|e| StorageError::from(e).into())
    }

    async fn get_or_create(&self, code: &str) -> Result<Currency> {
        let code = code.to_string();
        self.writer
            .exec(move |conn| get_or_create_currency(conn, &code))
            .await
    }

    async fn create(&self, currency: NewCurrency) -> Result<Currency> {
        self.writer
            .exec(move |conn| {
                let now = Utc::now().to_rfc3339();
                let row = CurrencyDB {
                    code: normalize_currency_code(&currency.code),
                    name: currency.name,
                    symbol: currency.symbol,
                    created_at: now.clone(),
                    updated_at: now,
                };

                diesel::insert_into(currencies::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                Ok(Currency::from(row))
            })
            .await
    }

    async fn update(&self, code: &str, update: CurrencyUpdate) -> Result<Currency> {
        let code = normalize_currency_code(code);
        self.writer
            .exec(move |conn| {
                let now = Utc::now().to_rfc3339();

                if let Some(name) = &update.name {
                    diesel::update(currencies::table.find(&code))
                        .set(currencies::name.eq(name))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                if let Some(symbol) = &update.symbol {
                    diesel::update(currencies::table.find(&code))
                        .set(currencies::symbol.eq(symbol))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                diesel::update(currencies::table.find(&code))
                    .set(currencies::updated_at.eq(&now))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                currencies::table
                    .find(&code)
                    .first::<CurrencyDB>(conn)
                    .map(Currency::from)
                    .map_err(|e| StorageError::from(e).into())
            })
            .await
    }

    async fn delete(&self, code: &str) -> Result<()> {
        let code = normalize_currency_code(code);
        self.writer
            .exec(move |conn| {
                diesel::delete(currencies::table.find(&code))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}
