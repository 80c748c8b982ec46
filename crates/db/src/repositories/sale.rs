//! Sales and the customer purchase ledger.
//!
//! A sale row and the matching change to `customers.total_purchases` are
//! written in the same transaction. The ledger moves by a single
//! `SET total_purchases = total_purchases + delta` statement, so concurrent
//! sales for one customer never lose an update.

use chrono::NaiveDate;
use coop_core::sales::{SaleError as PricingError, reversal_delta, sale_total};
use coop_shared::{AppError, Money, PageRequest, PageResponse};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use super::common::{clean, now};
use crate::entities::{
    customers, sales,
    sea_orm_active_enums::{PaymentMethod, PaymentStatus, SaleType},
};

/// Errors that can occur during sale operations.
#[derive(Debug, thiserror::Error)]
pub enum SaleError {
    /// Quantity, price or total rule failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Referenced customer does not exist.
    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    /// Sale not found.
    #[error("Sale not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<SaleError> for AppError {
    fn from(err: SaleError) -> Self {
        match &err {
            SaleError::Pricing(_) => Self::Validation(err.to_string()),
            SaleError::CustomerNotFound(_) | SaleError::NotFound(_) => {
                Self::NotFound(err.to_string())
            }
            SaleError::Database(_) => Self::Database(err.to_string()),
        }
    }
}

/// Input for recording a sale. The total is always derived.
#[derive(Debug, Clone)]
pub struct RecordSaleInput {
    /// Buyer.
    pub customer_id: Uuid,
    /// Date of sale.
    pub sale_date: NaiveDate,
    /// What was sold.
    pub sale_type: SaleType,
    /// Units sold, at least 1.
    pub quantity: i32,
    /// Price per unit, greater than zero.
    pub unit_price: Money,
    /// Payment state (defaults to pending).
    pub payment_status: Option<PaymentStatus>,
    /// How it was paid.
    pub payment_method: Option<PaymentMethod>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Acting user.
    pub recorded_by: Option<Uuid>,
}

/// Payment fields that may change after a sale is recorded.
#[derive(Debug, Clone, Default)]
pub struct UpdateSalePaymentInput {
    /// New payment state.
    pub payment_status: Option<PaymentStatus>,
    /// New payment method.
    pub payment_method: Option<PaymentMethod>,
    /// New notes.
    pub notes: Option<String>,
}

/// Filter options for listing sales.
#[derive(Debug, Clone, Copy, Default)]
pub struct SaleFilter {
    /// Only this customer.
    pub customer_id: Option<Uuid>,
    /// Only this payment state.
    pub payment_status: Option<PaymentStatus>,
    /// On or after this date.
    pub from: Option<NaiveDate>,
    /// On or before this date.
    pub to: Option<NaiveDate>,
}

/// Sale repository.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    db: DatabaseConnection,
}

impl SaleRepository {
    /// Creates a new sale repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a sale and adds its total to the customer's ledger.
    ///
    /// # Errors
    ///
    /// Returns `SaleError::Pricing` for invalid quantity or price and
    /// `SaleError::CustomerNotFound` when the customer does not exist. On
    /// any error neither the sale nor the ledger change is persisted.
    pub async fn record_sale(&self, input: RecordSaleInput) -> Result<sales::Model, SaleError> {
        let total = sale_total(input.quantity, input.unit_price)?;

        let now = now();
        let sale = sales::ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(input.customer_id),
            sale_date: Set(input.sale_date),
            sale_type: Set(input.sale_type),
            quantity: Set(input.quantity),
            unit_price: Set(input.unit_price.minor()),
            total_amount: Set(total.minor()),
            payment_status: Set(input.payment_status.unwrap_or(PaymentStatus::Pending)),
            payment_method: Set(input.payment_method),
            notes: Set(clean(input.notes)),
            recorded_by: Set(input.recorded_by),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let txn = self.db.begin().await?;
        let sale = write_sale(&txn, input.customer_id, total, sale).await?;
        txn.commit().await?;

        info!(
            sale_id = %sale.id,
            customer_id = %sale.customer_id,
            total = sale.total_amount,
            "Sale recorded"
        );
        Ok(sale)
    }

    /// Lists sales, newest first.
    pub async fn list(
        &self,
        filter: SaleFilter,
        page: PageRequest,
    ) -> Result<PageResponse<sales::Model>, SaleError> {
        let page = page.normalized();
        let mut query = sales::Entity::find()
            .order_by_desc(sales::Column::SaleDate)
            .order_by_desc(sales::Column::CreatedAt);

        if let Some(customer_id) = filter.customer_id {
            query = query.filter(sales::Column::CustomerId.eq(customer_id));
        }
        if let Some(status) = filter.payment_status {
            query = query.filter(sales::Column::PaymentStatus.eq(status));
        }
        if let Some(from) = filter.from {
            query = query.filter(sales::Column::SaleDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(sales::Column::SaleDate.lte(to));
        }

        let paginator = query.paginate(&self.db, page.limit());
        let total = paginator.num_items().await?;
        let data = paginator.fetch_page(page.page_index()).await?;

        Ok(PageResponse::new(data, page, total))
    }

    /// Finds a sale by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<sales::Model>, SaleError> {
        Ok(sales::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Updates payment state, method or notes. Amounts are immutable.
    pub async fn update_payment(
        &self,
        id: Uuid,
        input: UpdateSalePaymentInput,
    ) -> Result<sales::Model, SaleError> {
        let existing = sales::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(SaleError::NotFound(id))?;

        let mut active: sales::ActiveModel = existing.into();
        if let Some(status) = input.payment_status {
            active.payment_status = Set(status);
        }
        if let Some(method) = input.payment_method {
            active.payment_method = Set(Some(method));
        }
        if let Some(notes) = input.notes {
            active.notes = Set(clean(Some(notes)));
        }
        active.updated_at = Set(now());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a sale and takes its stored total back off the ledger.
    ///
    /// Returns `false` when the sale did not exist, including when a
    /// concurrent delete removed it first; the ledger is untouched.
    pub async fn delete_sale(&self, id: Uuid) -> Result<bool, SaleError> {
        let txn = self.db.begin().await?;

        let Some(sale) = sales::Entity::find_by_id(id).one(&txn).await? else {
            return Ok(false);
        };

        if !remove_sale(&txn, &sale).await? {
            txn.rollback().await?;
            info!(sale_id = %id, "Sale already deleted");
            return Ok(false);
        }

        txn.commit().await?;

        info!(
            sale_id = %id,
            customer_id = %sale.customer_id,
            reversed = sale.total_amount,
            "Sale deleted"
        );
        Ok(true)
    }
}

/// Moves the ledger, then inserts the sale, on the caller's transaction.
async fn write_sale<C>(
    conn: &C,
    customer_id: Uuid,
    total: Money,
    sale: sales::ActiveModel,
) -> Result<sales::Model, SaleError>
where
    C: ConnectionTrait,
{
    adjust_ledger(conn, customer_id, total).await?;
    Ok(sale.insert(conn).await?)
}

/// Deletes the row, then reverses its stored total, on the caller's
/// transaction. The ledger only moves when this delete removed the row.
async fn remove_sale<C>(conn: &C, sale: &sales::Model) -> Result<bool, SaleError>
where
    C: ConnectionTrait,
{
    let deleted = sales::Entity::delete_by_id(sale.id).exec(conn).await?;
    if deleted.rows_affected == 0 {
        return Ok(false);
    }

    let delta = reversal_delta(Money::from_minor(sale.total_amount));
    adjust_ledger(conn, sale.customer_id, delta).await?;
    Ok(true)
}

/// `total_purchases = total_purchases + delta` for one customer.
async fn adjust_ledger<C>(conn: &C, customer_id: Uuid, delta: Money) -> Result<(), SaleError>
where
    C: ConnectionTrait,
{
    let result = customers::Entity::update_many()
        .col_expr(
            customers::Column::TotalPurchases,
            Expr::col(customers::Column::TotalPurchases).add(delta.minor()),
        )
        .col_expr(customers::Column::UpdatedAt, Expr::value(now()))
        .filter(customers::Column::Id.eq(customer_id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(SaleError::CustomerNotFound(customer_id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::Migrator;
    use sea_orm::{ConnectOptions, Database};
    use sea_orm_migration::MigratorTrait;

    async fn setup() -> (DatabaseConnection, Uuid) {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let customer_id = Uuid::new_v4();
        let now = now();
        customers::ActiveModel {
            id: Set(customer_id),
            name: Set("Kato Grocers".to_string()),
            email: Set(None),
            phone: Set(None),
            address: Set(None),
            customer_type: Set(crate::entities::sea_orm_active_enums::CustomerType::Retailer),
            total_purchases: Set(0),
            notes: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&db)
        .await
        .unwrap();

        (db, customer_id)
    }

    fn sale_row(id: Uuid, customer_id: Uuid, total: i64) -> sales::ActiveModel {
        let now = now();
        sales::ActiveModel {
            id: Set(id),
            customer_id: Set(customer_id),
            sale_date: Set(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()),
            sale_type: Set(SaleType::Eggs),
            quantity: Set(1),
            unit_price: Set(total),
            total_amount: Set(total),
            payment_status: Set(PaymentStatus::Paid),
            payment_method: Set(None),
            notes: Set(None),
            recorded_by: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }

    async fn ledger(db: &DatabaseConnection, customer_id: Uuid) -> i64 {
        customers::Entity::find_by_id(customer_id)
            .one(db)
            .await
            .unwrap()
            .unwrap()
            .total_purchases
    }

    #[tokio::test]
    async fn test_failed_insert_rolls_back_ledger() {
        let (db, customer_id) = setup().await;
        let taken = Uuid::new_v4();

        let txn = db.begin().await.unwrap();
        write_sale(&txn, customer_id, Money::from_minor(5_000), sale_row(taken, customer_id, 5_000))
            .await
            .unwrap();
        txn.commit().await.unwrap();
        assert_eq!(ledger(&db, customer_id).await, 5_000);

        // Same primary key: the ledger moves, then the insert fails.
        let txn = db.begin().await.unwrap();
        let result = write_sale(
            &txn,
            customer_id,
            Money::from_minor(7_000),
            sale_row(taken, customer_id, 7_000),
        )
        .await;
        assert!(matches!(result, Err(SaleError::Database(_))));
        txn.rollback().await.unwrap();

        assert_eq!(ledger(&db, customer_id).await, 5_000);
        assert_eq!(sales::Entity::find().count(&db).await.unwrap(), 1);
    }

    async fn recorded(db: &DatabaseConnection, customer_id: Uuid, total: i64) -> sales::Model {
        let txn = db.begin().await.unwrap();
        let sale = write_sale(
            &txn,
            customer_id,
            Money::from_minor(total),
            sale_row(Uuid::new_v4(), customer_id, total),
        )
        .await
        .unwrap();
        txn.commit().await.unwrap();
        sale
    }

    #[tokio::test]
    async fn test_stale_delete_leaves_ledger_alone() {
        let (db, customer_id) = setup().await;
        let sale = recorded(&db, customer_id, 1_000).await;
        let other = recorded(&db, customer_id, 250).await;

        // Both callers read the row; the first delete wins.
        let txn = db.begin().await.unwrap();
        assert!(remove_sale(&txn, &sale).await.unwrap());
        txn.commit().await.unwrap();
        assert_eq!(ledger(&db, customer_id).await, 250);

        let txn = db.begin().await.unwrap();
        assert!(!remove_sale(&txn, &sale).await.unwrap());
        txn.commit().await.unwrap();

        assert_eq!(ledger(&db, customer_id).await, 250);
        assert_eq!(sales::Entity::find().count(&db).await.unwrap(), 1);
        assert!(sales::Entity::find_by_id(other.id).one(&db).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_failed_reversal_keeps_sale_row() {
        let (db, customer_id) = setup().await;
        let sale = recorded(&db, customer_id, 4_000).await;

        // The row is deleted, then the ledger update finds no customer.
        let ghost = Uuid::new_v4();
        let detached = sales::Model {
            customer_id: ghost,
            ..sale.clone()
        };
        let txn = db.begin().await.unwrap();
        let result = remove_sale(&txn, &detached).await;
        assert!(matches!(result, Err(SaleError::CustomerNotFound(id)) if id == ghost));
        txn.rollback().await.unwrap();

        assert!(sales::Entity::find_by_id(sale.id).one(&db).await.unwrap().is_some());
        assert_eq!(ledger(&db, customer_id).await, 4_000);
    }

    #[tokio::test]
    async fn test_missing_customer_is_not_found() {
        let (db, _) = setup().await;
        let ghost = Uuid::new_v4();

        let txn = db.begin().await.unwrap();
        let result = write_sale(
            &txn,
            ghost,
            Money::from_minor(1_000),
            sale_row(Uuid::new_v4(), ghost, 1_000),
        )
        .await;
        txn.rollback().await.unwrap();

        assert!(matches!(result, Err(SaleError::CustomerNotFound(id)) if id == ghost));
        assert_eq!(sales::Entity::find().count(&db).await.unwrap(), 0);
    }
}
