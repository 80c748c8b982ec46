//! Customer repository.
//!
//! `total_purchases` is owned by the sale ledger (see `sale.rs`); the only
//! other writer is an explicit administrative correction through `update`.

use coop_core::auth::normalize_email;
use coop_shared::{AppError, PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use super::common::{clean, is_unique_violation, now};
use crate::entities::{customers, sales, sea_orm_active_enums::CustomerType};

/// Errors that can occur during customer operations.
#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    /// Input rejected before any write.
    #[error("{0}")]
    Invalid(String),

    /// Customer not found.
    #[error("Customer not found: {0}")]
    NotFound(Uuid),

    /// Another customer already uses this email.
    #[error("A customer with email '{0}' already exists")]
    DuplicateEmail(String),

    /// Customer still has sales on the ledger.
    #[error("Customer {id} has {sales} recorded sale(s); delete them first")]
    HasSales {
        /// Customer ID.
        id: Uuid,
        /// Number of sales referencing the customer.
        sales: u64,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CustomerError> for AppError {
    fn from(err: CustomerError) -> Self {
        match &err {
            CustomerError::Invalid(_) => Self::Validation(err.to_string()),
            CustomerError::NotFound(_) => Self::NotFound(err.to_string()),
            CustomerError::DuplicateEmail(_) | CustomerError::HasSales { .. } => {
                Self::Conflict(err.to_string())
            }
            CustomerError::Database(_) => Self::Database(err.to_string()),
        }
    }
}

/// Input for creating a customer.
#[derive(Debug, Clone, Default)]
pub struct CreateCustomerInput {
    /// Customer name.
    pub name: String,
    /// Email, unique when present.
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Postal or delivery address.
    pub address: Option<String>,
    /// Kind of buyer (defaults to individual).
    pub customer_type: Option<CustomerType>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Input for updating a customer. `None` leaves a field unchanged; for the
/// optional contact fields `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default)]
#[allow(clippy::option_option)]
pub struct UpdateCustomerInput {
    /// New name.
    pub name: Option<String>,
    /// New email, or `Some(None)` to clear it.
    pub email: Option<Option<String>>,
    /// New phone, or `Some(None)` to clear it.
    pub phone: Option<Option<String>>,
    /// New address, or `Some(None)` to clear it.
    pub address: Option<Option<String>>,
    /// New customer type.
    pub customer_type: Option<CustomerType>,
    /// New notes, or `Some(None)` to clear them.
    pub notes: Option<Option<String>>,
    /// Administrative correction of the lifetime purchase total.
    pub total_purchases: Option<i64>,
}

/// Filter options for listing customers.
#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    /// Substring match on name.
    pub search: Option<String>,
    /// Only this customer type.
    pub customer_type: Option<CustomerType>,
}

/// Customer repository.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a customer with `total_purchases = 0`.
    pub async fn create(&self, input: CreateCustomerInput) -> Result<customers::Model, CustomerError> {
        let name = required_name(&input.name)?;
        let email = optional_email(input.email)?;

        let now = now();
        let customer = customers::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            email: Set(email.clone()),
            phone: Set(clean(input.phone)),
            address: Set(clean(input.address)),
            customer_type: Set(input.customer_type.unwrap_or(CustomerType::Individual)),
            total_purchases: Set(0),
            notes: Set(clean(input.notes)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let customer = customer
            .insert(&self.db)
            .await
            .map_err(|e| duplicate_or_db(e, email))?;
        info!(customer_id = %customer.id, "Customer created");
        Ok(customer)
    }

    /// Lists customers alphabetically.
    pub async fn list(
        &self,
        filter: CustomerFilter,
        page: PageRequest,
    ) -> Result<PageResponse<customers::Model>, CustomerError> {
        let page = page.normalized();
        let mut query = customers::Entity::find().order_by_asc(customers::Column::Name);

        if let Some(search) = clean(filter.search) {
            query = query.filter(customers::Column::Name.contains(search));
        }
        if let Some(customer_type) = filter.customer_type {
            query = query.filter(customers::Column::CustomerType.eq(customer_type));
        }

        let paginator = query.paginate(&self.db, page.limit());
        let total = paginator.num_items().await?;
        let data = paginator.fetch_page(page.page_index()).await?;

        Ok(PageResponse::new(data, page, total))
    }

    /// Finds a customer by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<customers::Model>, CustomerError> {
        Ok(customers::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Updates identity and contact fields.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateCustomerInput,
    ) -> Result<customers::Model, CustomerError> {
        let existing = customers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CustomerError::NotFound(id))?;

        let mut active: customers::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(required_name(&name)?);
        }
        let email = input.email.map(optional_email).transpose()?;
        if let Some(email) = &email {
            active.email = Set(email.clone());
        }
        if let Some(phone) = input.phone {
            active.phone = Set(clean(phone));
        }
        if let Some(address) = input.address {
            active.address = Set(clean(address));
        }
        if let Some(customer_type) = input.customer_type {
            active.customer_type = Set(customer_type);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(clean(notes));
        }
        if let Some(total) = input.total_purchases {
            if total < 0 {
                return Err(CustomerError::Invalid(
                    "total_purchases cannot be negative".to_string(),
                ));
            }
            info!(customer_id = %id, total_purchases = total, "Customer ledger corrected");
            active.total_purchases = Set(total);
        }
        active.updated_at = Set(now());

        active
            .update(&self.db)
            .await
            .map_err(|e| duplicate_or_db(e, email.flatten()))
    }

    /// Deletes a customer without sales.
    ///
    /// Returns `false` when the customer did not exist.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::HasSales` while ledger rows still reference
    /// the customer.
    pub async fn delete(&self, id: Uuid) -> Result<bool, CustomerError> {
        let txn = self.db.begin().await?;

        if customers::Entity::find_by_id(id).one(&txn).await?.is_none() {
            return Ok(false);
        }

        let sales = sales::Entity::find()
            .filter(sales::Column::CustomerId.eq(id))
            .count(&txn)
            .await?;
        if sales > 0 {
            return Err(CustomerError::HasSales { id, sales });
        }

        customers::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!(customer_id = %id, "Customer deleted");
        Ok(true)
    }
}

fn required_name(name: &str) -> Result<String, CustomerError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CustomerError::Invalid("Customer name is required".to_string()));
    }
    Ok(name.to_string())
}

fn optional_email(email: Option<String>) -> Result<Option<String>, CustomerError> {
    match clean(email) {
        None => Ok(None),
        Some(raw) => normalize_email(&raw)
            .map(Some)
            .ok_or_else(|| CustomerError::Invalid(format!("'{raw}' is not a valid email"))),
    }
}

fn duplicate_or_db(err: DbErr, email: Option<String>) -> CustomerError {
    match email {
        Some(email) if is_unique_violation(&err) => CustomerError::DuplicateEmail(email),
        _ => CustomerError::Database(err),
    }
}
