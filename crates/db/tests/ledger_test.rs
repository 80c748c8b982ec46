//! Customer purchase ledger: every sale write moves `total_purchases` by
//! exactly the sale total, in the same transaction.

mod common;

use common::{customer, date, setup_db};
use coop_db::entities::{customers, sales, sea_orm_active_enums::{PaymentStatus, SaleType}};
use coop_db::repositories::{
    CustomerError, CustomerRepository, RecordSaleInput, SaleError, SaleFilter, SaleRepository,
    UpdateCustomerInput, UpdateSalePaymentInput,
};
use coop_shared::{Money, PageRequest};
use futures::future::join_all;
use proptest::prelude::*;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

fn sale(customer_id: Uuid, quantity: i32, unit_price: i64) -> RecordSaleInput {
    RecordSaleInput {
        customer_id,
        sale_date: date(2026, 10, 16),
        sale_type: SaleType::Eggs,
        quantity,
        unit_price: Money::from_minor(unit_price),
        payment_status: None,
        payment_method: None,
        notes: None,
        recorded_by: None,
    }
}

async fn ledger(db: &DatabaseConnection, id: Uuid) -> i64 {
    customers::Entity::find_by_id(id)
        .one(db)
        .await
        .unwrap()
        .unwrap()
        .total_purchases
}

#[tokio::test]
async fn test_sale_adds_derived_total_to_ledger() {
    let db = setup_db().await;
    let buyer = customer(&db, "Mukwano Shop").await;
    let repo = SaleRepository::new(db.clone());

    // 10 trays at 12,000
    let recorded = repo.record_sale(sale(buyer.id, 10, 12_000)).await.unwrap();

    assert_eq!(recorded.total_amount, 120_000);
    assert_eq!(recorded.payment_status, PaymentStatus::Pending);
    assert_eq!(ledger(&db, buyer.id).await, 120_000);
}

#[tokio::test]
async fn test_delete_reverses_stored_total() {
    let db = setup_db().await;
    let buyer = customer(&db, "Mukwano Shop").await;
    let repo = SaleRepository::new(db.clone());

    let first = repo.record_sale(sale(buyer.id, 3, 10_000)).await.unwrap();
    repo.record_sale(sale(buyer.id, 2, 500)).await.unwrap();
    assert_eq!(ledger(&db, buyer.id).await, 31_000);

    assert!(repo.delete_sale(first.id).await.unwrap());
    assert_eq!(ledger(&db, buyer.id).await, 1_000);

    // Second delete is a no-op.
    assert!(!repo.delete_sale(first.id).await.unwrap());
    assert_eq!(ledger(&db, buyer.id).await, 1_000);
}

#[tokio::test]
async fn test_invalid_sale_writes_nothing() {
    let db = setup_db().await;
    let buyer = customer(&db, "Mukwano Shop").await;
    let repo = SaleRepository::new(db.clone());

    let zero_quantity = repo.record_sale(sale(buyer.id, 0, 12_000)).await;
    assert!(matches!(zero_quantity, Err(SaleError::Pricing(_))));

    let free = repo.record_sale(sale(buyer.id, 5, 0)).await;
    assert!(matches!(free, Err(SaleError::Pricing(_))));

    let ghost = Uuid::new_v4();
    let missing = repo.record_sale(sale(ghost, 1, 1_000)).await;
    assert!(matches!(missing, Err(SaleError::CustomerNotFound(id)) if id == ghost));

    assert_eq!(sales::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(ledger(&db, buyer.id).await, 0);
}

#[tokio::test]
async fn test_concurrent_sales_do_not_lose_updates() {
    let db = setup_db().await;
    let buyer = customer(&db, "Hotel Africana").await;
    let repo = SaleRepository::new(db.clone());

    let writes = (1..=50).map(|quantity| {
        let repo = repo.clone();
        async move { repo.record_sale(sale(buyer.id, quantity, 100)).await }
    });
    for result in join_all(writes).await {
        result.unwrap();
    }

    // Σ 1..=50 = 1275 units at 100
    assert_eq!(ledger(&db, buyer.id).await, 127_500);
}

#[tokio::test]
async fn test_payment_update_keeps_amounts() {
    let db = setup_db().await;
    let buyer = customer(&db, "Mukwano Shop").await;
    let repo = SaleRepository::new(db.clone());
    let recorded = repo.record_sale(sale(buyer.id, 4, 2_500)).await.unwrap();

    let updated = repo
        .update_payment(
            recorded.id,
            UpdateSalePaymentInput {
                payment_status: Some(PaymentStatus::Paid),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.payment_status, PaymentStatus::Paid);
    assert_eq!(updated.total_amount, 10_000);
    assert_eq!(ledger(&db, buyer.id).await, 10_000);

    let paid = repo
        .list(
            SaleFilter {
                payment_status: Some(PaymentStatus::Paid),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(paid.meta.total, 1);
}

#[tokio::test]
async fn test_customer_with_sales_cannot_be_deleted() {
    let db = setup_db().await;
    let buyer = customer(&db, "Mukwano Shop").await;
    let sales_repo = SaleRepository::new(db.clone());
    let customers_repo = CustomerRepository::new(db.clone());

    let recorded = sales_repo.record_sale(sale(buyer.id, 1, 1_000)).await.unwrap();
    let blocked = customers_repo.delete(buyer.id).await;
    assert!(matches!(blocked, Err(CustomerError::HasSales { sales: 1, .. })));

    sales_repo.delete_sale(recorded.id).await.unwrap();
    assert!(customers_repo.delete(buyer.id).await.unwrap());
    assert!(!customers_repo.delete(buyer.id).await.unwrap());
}

#[tokio::test]
async fn test_explicit_ledger_correction() {
    let db = setup_db().await;
    let buyer = customer(&db, "Mukwano Shop").await;
    let repo = CustomerRepository::new(db.clone());

    let corrected = repo
        .update(
            buyer.id,
            UpdateCustomerInput {
                total_purchases: Some(45_000),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(corrected.total_purchases, 45_000);

    let negative = repo
        .update(
            buyer.id,
            UpdateCustomerInput {
                total_purchases: Some(-1),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(negative, Err(CustomerError::Invalid(_))));
}

#[tokio::test]
async fn test_update_clears_contact_fields() {
    let db = setup_db().await;
    let buyer = customer(&db, "Mukwano Shop").await;
    let repo = CustomerRepository::new(db.clone());

    let with_contact = repo
        .update(
            buyer.id,
            UpdateCustomerInput {
                email: Some(Some("Orders@Mukwano.ug".to_string())),
                address: Some(Some("Plot 4, Jinja Road".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(with_contact.email.as_deref(), Some("orders@mukwano.ug"));

    let untouched = repo
        .update(
            buyer.id,
            UpdateCustomerInput {
                name: Some("Mukwano Shop Ltd".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(untouched.email.as_deref(), Some("orders@mukwano.ug"));

    let cleared = repo
        .update(
            buyer.id,
            UpdateCustomerInput {
                email: Some(None),
                address: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.email, None);
    assert_eq!(cleared.address, None);
    assert_eq!(cleared.name, "Mukwano Shop Ltd");
}

#[tokio::test]
async fn test_racing_deletes_reverse_once() {
    let db = setup_db().await;
    let buyer = customer(&db, "Hotel Africana").await;
    let repo = SaleRepository::new(db.clone());
    repo.record_sale(sale(buyer.id, 1, 250)).await.unwrap();

    for _ in 0..20 {
        let recorded = repo.record_sale(sale(buyer.id, 1, 1_000)).await.unwrap();

        let deletes = (0..2).map(|_| {
            let repo = repo.clone();
            async move { repo.delete_sale(recorded.id).await }
        });
        let removed = join_all(deletes)
            .await
            .into_iter()
            .map(Result::unwrap)
            .filter(|removed| *removed)
            .count();

        assert_eq!(removed, 1);
        assert_eq!(ledger(&db, buyer.id).await, 250);
    }
}

/// One step of a random ledger history.
#[derive(Debug, Clone)]
enum LedgerOp {
    Record { quantity: i32, unit_price: i64 },
    Delete { pick: usize },
}

fn ledger_op() -> impl Strategy<Value = LedgerOp> {
    prop_oneof![
        3 => (1i32..50, 1i64..20_000)
            .prop_map(|(quantity, unit_price)| LedgerOp::Record { quantity, unit_price }),
        2 => any::<usize>().prop_map(|pick| LedgerOp::Delete { pick }),
    ]
}

async fn replay(ops: Vec<LedgerOp>) -> (i64, i64) {
    let db = setup_db().await;
    let buyer = customer(&db, "Owino Market").await;
    let bystander = customer(&db, "Nakasero Stall").await;
    let repo = SaleRepository::new(db.clone());
    repo.record_sale(sale(bystander.id, 2, 3_000)).await.unwrap();

    let mut live: Vec<Uuid> = Vec::new();
    for op in ops {
        match op {
            LedgerOp::Record { quantity, unit_price } => {
                let recorded = repo
                    .record_sale(sale(buyer.id, quantity, unit_price))
                    .await
                    .unwrap();
                live.push(recorded.id);
            }
            LedgerOp::Delete { pick } if !live.is_empty() => {
                let id = live.swap_remove(pick % live.len());
                assert!(repo.delete_sale(id).await.unwrap());
                // Replaying a delete never moves the ledger again.
                assert!(!repo.delete_sale(id).await.unwrap());
            }
            LedgerOp::Delete { .. } => {}
        }
    }

    let surviving: i64 = sales::Entity::find()
        .filter(sales::Column::CustomerId.eq(buyer.id))
        .all(&db)
        .await
        .unwrap()
        .iter()
        .map(|s| s.total_amount)
        .sum();
    assert_eq!(ledger(&db, bystander.id).await, 6_000);

    (ledger(&db, buyer.id).await, surviving)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Any interleaving of sales and deletes leaves `total_purchases` equal
    /// to the sum of the sales still on the books.
    #[test]
    fn prop_ledger_matches_surviving_sales(ops in prop::collection::vec(ledger_op(), 1..30)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let (ledger, surviving) = runtime.block_on(replay(ops));
        prop_assert_eq!(ledger, surviving);
    }
}
