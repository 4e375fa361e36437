use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::currencies::get_or_create_currency;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::exchange_rates;
use fxhub_core::currencies::normalize_currency_code;
use fxhub_core::errors::{DatabaseError, Error, Result};
use fxhub_core::rates::{ExchangeRate, NewExchangeRate, RateRepositoryTrait};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = exchange_rates)]
pub struct ExchangeRateDB {
    pub source_currency: String,
    pub target_currency: String,
    pub valuation_date: String,
    pub rate_value: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<ExchangeRateDB> for ExchangeRate {
    type Error = Error;

    fn try_from(db: ExchangeRateDB) -> Result<ExchangeRate> {
        let valuation_date = NaiveDate::parse_from_str(&db.valuation_date, DATE_FORMAT)
            .map_err(|e| {
                Error::Database(DatabaseError::Internal(format!(
                    "stored valuation date '{}' is malformed: {}",
                    db.valuation_date, e
                )))
            })?;
        let rate_value = Decimal::from_str(&db.rate_value).map_err(|e| {
            Error::Database(DatabaseError::Internal(format!(
                "stored rate '{}' is malformed: {}",
                db.rate_value, e
            )))
        })?;

        Ok(ExchangeRate {
            source_currency: db.source_currency,
            target_currency: db.target_currency,
            valuation_date,
            rate_value,
        })
    }
}

#[derive(Clone)]
pub struct RateRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl RateRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl RateRepositoryTrait for RateRepository {
    fn get_rate(
        &self,
        source: &str,
        target: &str,
        date: NaiveDate,
    ) -> Result<Option<ExchangeRate>> {
        let mut conn = get_connection(&self.pool)?;

        let row = exchange_rates::table
            .find((
                normalize_currency_code(source),
                normalize_currency_code(target),
                date.format(DATE_FORMAT).to_string(),
            ))
            .first::<ExchangeRateDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        row.map(ExchangeRate::try_from).transpose()
    }

    fn get_latest_rate(&self, source: &str, target: &str) -> Result<Option<ExchangeRate>> {
        let mut conn = get_connection(&self.pool)?;

        // ISO dates sort lexicographically, so a text ORDER BY is a date
        // ORDER BY.
        let row = exchange_rates::table
            .filter(exchange_rates::source_currency.eq(normalize_currency_code(source)))
            .filter(exchange_rates::target_currency.eq(normalize_currency_code(target)))
            .order_by(exchange_rates::valuation_date.desc())
            .first::<ExchangeRateDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        row.map(ExchangeRate::try_from).transpose()
    }

    async fn upsert_rate(&self, rate: NewExchangeRate) -> Result<ExchangeRate> {
        self.writer
            .exec(move |conn| {
                let source = normalize_currency_code(&rate.source_currency);
                let target = normalize_currency_code(&rate.target_currency);

                // Both sides of the pair must exist before the FK fires.
                get_or_create_currency(conn, &source)?;
                get_or_create_currency(conn, &target)?;

                let date_str = rate.valuation_date.format(DATE_FORMAT).to_string();
                let now = Utc::now().to_rfc3339();
                let row = ExchangeRateDB {
                    source_currency: source.clone(),
                    target_currency: target.clone(),
                    valuation_date: date_str.clone(),
                    rate_value: rate.rate_value.to_string(),
                    created_at: now.clone(),
                    updated_at: now.clone(),
                };

                diesel::insert_into(exchange_rates::table)
                    .values(&row)
                    .on_conflict((
                        exchange_rates::source_currency,
                        exchange_rates::target_currency,
                        exchange_rates::valuation_date,
                    ))
                    .do_update()
                    .set((
                        exchange_rates::rate_value.eq(&row.rate_value),
                        exchange_rates::updated_at.eq(&now),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                exchange_rates::table
                    .find((&source, &target, &date_str))
                    .first::<ExchangeRateDB>(conn)
                    .map_err(StorageError::from)?
                    .try_into()
            })
            .await
    }
}
