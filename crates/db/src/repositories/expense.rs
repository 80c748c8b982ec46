//! Expense repository.

use chrono::NaiveDate;
use coop_shared::{AppError, Money, PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::info;
use uuid::Uuid;

use super::common::{clean, now};
use crate::entities::{
    expenses,
    sea_orm_active_enums::{ExpenseCategory, PaymentMethod},
};

/// Errors that can occur during expense operations.
#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    /// Amount zero or negative.
    #[error("Expense amount must be greater than zero, got {0}")]
    InvalidAmount(Money),

    /// Description missing.
    #[error("Description is required")]
    MissingDescription,

    /// Expense not found.
    #[error("Expense not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ExpenseError> for AppError {
    fn from(err: ExpenseError) -> Self {
        match &err {
            ExpenseError::InvalidAmount(_) | ExpenseError::MissingDescription => {
                Self::Validation(err.to_string())
            }
            ExpenseError::NotFound(_) => Self::NotFound(err.to_string()),
            ExpenseError::Database(_) => Self::Database(err.to_string()),
        }
    }
}

/// Input for recording an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    /// Date incurred.
    pub expense_date: NaiveDate,
    /// Category.
    pub category: ExpenseCategory,
    /// What was paid for.
    pub description: String,
    /// Amount paid.
    pub amount: Money,
    /// How it was paid.
    pub payment_method: Option<PaymentMethod>,
    /// Who was paid.
    pub vendor: Option<String>,
    /// Acting user.
    pub recorded_by: Option<Uuid>,
}

/// Input for updating an expense. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateExpenseInput {
    /// New date.
    pub expense_date: Option<NaiveDate>,
    /// New category.
    pub category: Option<ExpenseCategory>,
    /// New description.
    pub description: Option<String>,
    /// New amount.
    pub amount: Option<Money>,
    /// New payment method.
    pub payment_method: Option<PaymentMethod>,
    /// New vendor.
    pub vendor: Option<String>,
}

/// Filter options for listing expenses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpenseFilter {
    /// Only this category.
    pub category: Option<ExpenseCategory>,
    /// On or after this date.
    pub from: Option<NaiveDate>,
    /// On or before this date.
    pub to: Option<NaiveDate>,
}

/// Expense repository.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an expense.
    pub async fn create(&self, input: CreateExpenseInput) -> Result<expenses::Model, ExpenseError> {
        let description = required_description(&input.description)?;
        positive_amount(input.amount)?;

        let now = now();
        let expense = expenses::ActiveModel {
            id: Set(Uuid::new_v4()),
            expense_date: Set(input.expense_date),
            category: Set(input.category),
            description: Set(description),
            amount: Set(input.amount.minor()),
            payment_method: Set(input.payment_method),
            vendor: Set(clean(input.vendor)),
            recorded_by: Set(input.recorded_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(expense_id = %expense.id, amount = expense.amount, "Expense recorded");
        Ok(expense)
    }

    /// Lists expenses, newest first.
    pub async fn list(
        &self,
        filter: ExpenseFilter,
        page: PageRequest,
    ) -> Result<PageResponse<expenses::Model>, ExpenseError> {
        let page = page.normalized();
        let mut query = expenses::Entity::find()
            .order_by_desc(expenses::Column::ExpenseDate)
            .order_by_desc(expenses::Column::CreatedAt);

        if let Some(category) = filter.category {
            query = query.filter(expenses::Column::Category.eq(category));
        }
        if let Some(from) = filter.from {
            query = query.filter(expenses::Column::ExpenseDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(expenses::Column::ExpenseDate.lte(to));
        }

        let paginator = query.paginate(&self.db, page.limit());
        let total = paginator.num_items().await?;
        let data = paginator.fetch_page(page.page_index()).await?;

        Ok(PageResponse::new(data, page, total))
    }

    /// Finds an expense by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<expenses::Model>, ExpenseError> {
        Ok(expenses::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Updates an expense.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateExpenseInput,
    ) -> Result<expenses::Model, ExpenseError> {
        let existing = expenses::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ExpenseError::NotFound(id))?;

        let mut active: expenses::ActiveModel = existing.into();
        if let Some(date) = input.expense_date {
            active.expense_date = Set(date);
        }
        if let Some(category) = input.category {
            active.category = Set(category);
        }
        if let Some(description) = input.description {
            active.description = Set(required_description(&description)?);
        }
        if let Some(amount) = input.amount {
            positive_amount(amount)?;
            active.amount = Set(amount.minor());
        }
        if let Some(method) = input.payment_method {
            active.payment_method = Set(Some(method));
        }
        if let Some(vendor) = input.vendor {
            active.vendor = Set(clean(Some(vendor)));
        }
        active.updated_at = Set(now());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an expense. Returns `false` when it did not exist.
    pub async fn delete(&self, id: Uuid) -> Result<bool, ExpenseError> {
        let result = expenses::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

fn required_description(description: &str) -> Result<String, ExpenseError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(ExpenseError::MissingDescription);
    }
    Ok(description.to_string())
}

fn positive_amount(amount: Money) -> Result<(), ExpenseError> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(ExpenseError::InvalidAmount(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_amount() {
        assert!(positive_amount(Money::from_minor(1)).is_ok());
        assert!(matches!(
            positive_amount(Money::ZERO),
            Err(ExpenseError::InvalidAmount(_))
        ));
        assert!(positive_amount(Money::from_minor(-50)).is_err());
    }
}
