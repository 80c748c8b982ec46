//! Storefront orders.
//!
//! Placement prices every item against the catalog at write time and stores
//! the resolved prices with the order. The order number comes from an
//! [`OrderNumberSource`]; the unique index on `orders.order_number` is the
//! final guard, and a collision is retried with a fresh number.

use coop_core::auth::normalize_email;
use coop_core::orders::{
    self as rules, OrderError as OrderRuleError, OrderItemRequest, OrderNotice,
    OrderNumberSource, OrderWorkflow, PricedOrder,
};
use coop_shared::{AppError, PageRequest, PageResponse};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::common::{clean, is_unique_violation, now};
use super::setting::catalog_on;
use crate::entities::{order_items, orders, sea_orm_active_enums::OrderStatus};

/// Attempts at finding an unused order number before giving up.
pub const MAX_ORDER_NUMBER_ATTEMPTS: u32 = 5;

/// Errors that can occur during order operations.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    /// Contact, item, price or status rule failed.
    #[error(transparent)]
    Rule(#[from] OrderRuleError),

    /// Customer email present but malformed.
    #[error("'{0}' is not a valid email")]
    InvalidEmail(String),

    /// Order not found.
    #[error("Order not found: {0}")]
    NotFound(Uuid),

    /// Status changed by another request between read and write.
    #[error("Order {0} was updated concurrently; reload and retry")]
    StatusChanged(Uuid),

    /// Every generated number was already taken.
    #[error("Could not allocate a unique order number after {MAX_ORDER_NUMBER_ATTEMPTS} attempts")]
    NumberExhausted,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match &err {
            OrderError::Rule(rule) if rule.is_validation() => Self::Validation(err.to_string()),
            OrderError::Rule(_) => Self::BusinessRule(err.to_string()),
            OrderError::InvalidEmail(_) => Self::Validation(err.to_string()),
            OrderError::NotFound(_) => Self::NotFound(err.to_string()),
            OrderError::StatusChanged(_) => Self::Conflict(err.to_string()),
            OrderError::NumberExhausted => Self::Internal(err.to_string()),
            OrderError::Database(_) => Self::Database(err.to_string()),
        }
    }
}

/// Input for placing an order from the storefront.
#[derive(Debug, Clone, Default)]
pub struct PlaceOrderInput {
    /// Buyer name.
    pub customer_name: String,
    /// Buyer phone.
    pub customer_phone: String,
    /// Buyer email.
    pub customer_email: Option<String>,
    /// Where to deliver.
    pub delivery_address: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Requested items.
    pub items: Vec<OrderItemRequest>,
}

/// An order with its item snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    /// The order row.
    #[serde(flatten)]
    pub order: orders::Model,
    /// Item rows.
    pub items: Vec<order_items::Model>,
}

/// Result of a successful placement.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    /// Stored order.
    pub order: OrderWithItems,
    /// Text for the operator notification.
    pub notice: OrderNotice,
}

/// Order repository.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    db: DatabaseConnection,
}

impl OrderRepository {
    /// Creates a new order repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates, prices and stores a new order in status `new`.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Rule` for missing contact details, an empty
    /// order, bad quantities or unpriced products, and
    /// `OrderError::NumberExhausted` when every candidate number collided.
    pub async fn place_order<N>(
        &self,
        input: PlaceOrderInput,
        numbers: &N,
    ) -> Result<PlacedOrder, OrderError>
    where
        N: OrderNumberSource + ?Sized,
    {
        rules::validate_contact(&input.customer_name, &input.customer_phone)?;
        let customer_email = match clean(input.customer_email.clone()) {
            None => None,
            Some(raw) => Some(normalize_email(&raw).ok_or(OrderError::InvalidEmail(raw))?),
        };

        let catalog = catalog_on(&self.db).await?;
        let priced = rules::price_order(&input.items, &catalog)?;

        let contact = Contact {
            customer_name: input.customer_name.trim().to_string(),
            customer_phone: input.customer_phone.trim().to_string(),
            customer_email,
            delivery_address: clean(input.delivery_address),
            notes: clean(input.notes),
        };

        for attempt in 1..=MAX_ORDER_NUMBER_ATTEMPTS {
            let number = numbers.next_number();
            match self.insert_order(&number, &contact, &priced).await {
                Ok(order) => {
                    info!(
                        order_id = %order.order.id,
                        order_number = %number,
                        total = order.order.total_amount,
                        items = order.items.len(),
                        "Order placed"
                    );
                    let notice = contact.notice(number, priced);
                    return Ok(PlacedOrder { order, notice });
                }
                Err(err) if is_unique_violation(&err) => {
                    warn!(attempt, order_number = %number, "Order number already taken, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(OrderError::NumberExhausted)
    }

    /// Lists orders, newest first.
    pub async fn list(
        &self,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<PageResponse<orders::Model>, OrderError> {
        let page = page.normalized();
        let mut query = orders::Entity::find()
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::OrderNumber);
        if let Some(status) = status {
            query = query.filter(orders::Column::Status.eq(status));
        }

        let paginator = query.paginate(&self.db, page.limit());
        let total = paginator.num_items().await?;
        let data = paginator.fetch_page(page.page_index()).await?;

        Ok(PageResponse::new(data, page, total))
    }

    /// Finds an order with its items.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<OrderWithItems>, OrderError> {
        let Some(order) = orders::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let items = order_items::Entity::find()
            .filter(order_items::Column::OrderId.eq(id))
            .order_by_asc(order_items::Column::Product)
            .all(&self.db)
            .await?;
        Ok(Some(OrderWithItems { order, items }))
    }

    /// Moves an order to `requested` if the workflow allows it.
    ///
    /// Re-applying the current status returns the order unchanged.
    pub async fn update_status(
        &self,
        id: Uuid,
        requested: &str,
    ) -> Result<orders::Model, OrderError> {
        let order = orders::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(OrderError::NotFound(id))?;

        let from = rules::OrderStatus::from(order.status);
        let to = OrderWorkflow::transition_to(from, requested)?;
        if to == from {
            return Ok(order);
        }

        let updated = orders::Entity::update_many()
            .col_expr(orders::Column::Status, Expr::value(OrderStatus::from(to)))
            .col_expr(orders::Column::UpdatedAt, Expr::value(now()))
            .filter(orders::Column::Id.eq(id))
            .filter(orders::Column::Status.eq(order.status))
            .exec(&self.db)
            .await?;
        if updated.rows_affected == 0 {
            return Err(OrderError::StatusChanged(id));
        }

        info!(order_id = %id, from = %from, to = %to, "Order status changed");
        orders::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(OrderError::NotFound(id))
    }

    /// Deletes an order and its items. Returns `false` when it did not exist.
    pub async fn delete(&self, id: Uuid) -> Result<bool, OrderError> {
        let txn = self.db.begin().await?;
        order_items::Entity::delete_many()
            .filter(order_items::Column::OrderId.eq(id))
            .exec(&txn)
            .await?;
        let result = orders::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        if result.rows_affected > 0 {
            info!(order_id = %id, "Order deleted");
        }
        Ok(result.rows_affected > 0)
    }

    /// Writes the order and its items in one transaction.
    async fn insert_order(
        &self,
        number: &str,
        contact: &Contact,
        priced: &PricedOrder,
    ) -> Result<OrderWithItems, DbErr> {
        let txn = self.db.begin().await?;
        let now = now();

        let order = orders::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_number: Set(number.to_string()),
            customer_name: Set(contact.customer_name.clone()),
            customer_phone: Set(contact.customer_phone.clone()),
            customer_email: Set(contact.customer_email.clone()),
            delivery_address: Set(contact.delivery_address.clone()),
            notes: Set(contact.notes.clone()),
            total_amount: Set(priced.total_amount.minor()),
            status: Set(OrderStatus::New),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(priced.items.len());
        for item in &priced.items {
            let row = order_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order.id),
                product: Set(item.product.clone()),
                quantity: Set(item.quantity),
                unit: Set(item.unit.clone()),
                unit_price: Set(item.unit_price.minor()),
                line_total: Set(item.line_total.minor()),
            }
            .insert(&txn)
            .await?;
            items.push(row);
        }

        txn.commit().await?;
        Ok(OrderWithItems { order, items })
    }
}

/// Cleaned contact fields shared by every placement attempt.
#[derive(Debug)]
struct Contact {
    customer_name: String,
    customer_phone: String,
    customer_email: Option<String>,
    delivery_address: Option<String>,
    notes: Option<String>,
}

impl Contact {
    fn notice(&self, order_number: String, priced: PricedOrder) -> OrderNotice {
        OrderNotice {
            order_number,
            customer_name: self.customer_name.clone(),
            customer_phone: self.customer_phone.clone(),
            customer_email: self.customer_email.clone(),
            delivery_address: self.delivery_address.clone(),
            notes: self.notes.clone(),
            items: priced.items,
            total_amount: priced.total_amount,
        }
    }
}
