use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use crate::models::filters::{ExpenseSummary, TransactionFilters};
use crate::models::transaction::{
    CreateTransactionRequest, NewTransaction, Transaction, TransactionStatus,
    TransactionWithCategory, UpdateTransactionRequest,
};
use crate::repositories::{CategoryRepository, RepositoryError, TransactionRepository};
use crate::services::error::ServiceError;
use crate::validation::{validate_amount, validate_card_last_four};

/// Trait defining transaction service operations
#[async_trait]
pub trait TransactionService: Send + Sync {
    /// Record a transaction. Date defaults to now and status to pending.
    async fn create(&self, request: CreateTransactionRequest) -> Result<Transaction, ServiceError>;

    /// Apply a partial update; absent fields keep their stored values
    async fn update(
        &self,
        id: i64,
        request: UpdateTransactionRequest,
    ) -> Result<Transaction, ServiceError>;

    /// Delete a transaction
    async fn delete(&self, id: i64) -> Result<(), ServiceError>;

    /// List transactions matching every supplied filter, newest first
    async fn get_all(
        &self,
        filters: TransactionFilters,
    ) -> Result<Vec<TransactionWithCategory>, ServiceError>;

    /// Set the review status. Any status may follow any other.
    async fn update_status(&self, id: i64, status: TransactionStatus) -> Result<(), ServiceError>;

    /// Totals per category over all transactions
    async fn get_expense_summary(&self) -> Result<Vec<ExpenseSummary>, ServiceError>;
}

/// Implementation of TransactionService
pub struct TransactionServiceImpl {
    transaction_repository: Arc<dyn TransactionRepository>,
    category_repository: Arc<dyn CategoryRepository>,
}

impl TransactionServiceImpl {
    pub fn new(
        transaction_repository: Arc<dyn TransactionRepository>,
        category_repository: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            transaction_repository,
            category_repository,
        }
    }

    async fn find_existing(&self, id: i64) -> Result<Transaction, ServiceError> {
        self.transaction_repository
            .find_by_id(id)
            .await
            .map_err(transaction_error)?
            .ok_or_else(ServiceError::transaction_not_found)
    }

    async fn ensure_category_exists(&self, category_id: i64) -> Result<(), ServiceError> {
        if !self.category_repository.exists(category_id).await? {
            return Err(ServiceError::category_not_found());
        }
        Ok(())
    }
}

fn transaction_error(error: RepositoryError) -> ServiceError {
    match error {
        RepositoryError::NotFound => ServiceError::transaction_not_found(),
        other => other.into(),
    }
}

#[async_trait]
impl TransactionService for TransactionServiceImpl {
    async fn create(&self, request: CreateTransactionRequest) -> Result<Transaction, ServiceError> {
        validate_card_last_four(&request.card_last_four)?;
        validate_amount(request.amount)?;
        self.ensure_category_exists(request.category_id).await?;

        let new_transaction = NewTransaction {
            card_last_four: request.card_last_four,
            amount: request.amount,
            category_id: request.category_id,
            transaction_date: request.transaction_date.unwrap_or_else(Utc::now),
            status: request.status.unwrap_or_default(),
        };

        let transaction = self
            .transaction_repository
            .create(new_transaction)
            .await
            .map_err(transaction_error)?;

        tracing::info!(
            transaction_id = transaction.id,
            category_id = transaction.category_id,
            amount = transaction.amount,
            "Transaction recorded"
        );
        Ok(transaction)
    }

    async fn update(
        &self,
        id: i64,
        request: UpdateTransactionRequest,
    ) -> Result<Transaction, ServiceError> {
        let existing = self.find_existing(id).await?;

        if let Some(card_last_four) = &request.card_last_four {
            validate_card_last_four(card_last_four)?;
        }
        if let Some(amount) = request.amount {
            validate_amount(amount)?;
        }
        if let Some(category_id) = request.category_id {
            self.ensure_category_exists(category_id).await?;
        }

        // Concurrent updates of the same row are last-write-wins
        let merged = Transaction {
            id: existing.id,
            card_last_four: request.card_last_four.unwrap_or(existing.card_last_four),
            amount: request.amount.unwrap_or(existing.amount),
            category_id: request.category_id.unwrap_or(existing.category_id),
            transaction_date: request.transaction_date.unwrap_or(existing.transaction_date),
            status: request.status.unwrap_or(existing.status),
            created_at: existing.created_at,
            updated_at: existing.updated_at,
        };

        let transaction = self
            .transaction_repository
            .update(merged)
            .await
            .map_err(transaction_error)?;

        tracing::info!(transaction_id = id, "Transaction updated");
        Ok(transaction)
    }

    async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.find_existing(id).await?;

        self.transaction_repository
            .delete(id)
            .await
            .map_err(transaction_error)?;

        tracing::info!(transaction_id = id, "Transaction deleted");
        Ok(())
    }

    async fn get_all(
        &self,
        filters: TransactionFilters,
    ) -> Result<Vec<TransactionWithCategory>, ServiceError> {
        tracing::debug!(?filters, "Listing transactions");
        Ok(self.transaction_repository.find_all(&filters).await?)
    }

    async fn update_status(&self, id: i64, status: TransactionStatus) -> Result<(), ServiceError> {
        let existing = self.find_existing(id).await?;

        self.transaction_repository
            .update_status(id, status)
            .await
            .map_err(transaction_error)?;

        tracing::info!(
            transaction_id = id,
            from = %existing.status,
            to = %status,
            "Transaction status changed"
        );
        Ok(())
    }

    async fn get_expense_summary(&self) -> Result<Vec<ExpenseSummary>, ServiceError> {
        Ok(self
            .transaction_repository
            .expense_summary_by_category()
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::category::Category;
    use crate::repositories::transaction_repository::UNKNOWN_CATEGORY_NAME;
    use crate::services::error::ErrorKind;
    use crate::validation::{AMOUNT_MESSAGE, CARD_LAST_FOUR_MESSAGE};
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone};
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Mutex;

    // Mock CategoryRepository holding only id -> name
    struct MockCategoryRepository {
        names: Mutex<HashMap<i64, String>>,
    }

    impl MockCategoryRepository {
        fn with(categories: &[(i64, &str)]) -> Self {
            Self {
                names: Mutex::new(
                    categories
                        .iter()
                        .map(|(id, name)| (*id, name.to_string()))
                        .collect(),
                ),
            }
        }

        fn name_of(&self, id: i64) -> Option<String> {
            self.names.lock().unwrap().get(&id).cloned()
        }
    }

    #[async_trait]
    impl CategoryRepository for MockCategoryRepository {
        async fn find_all(&self) -> Result<Vec<Category>, RepositoryError> {
            unimplemented!("not used by TransactionService")
        }

        async fn find_by_id(&self, _id: i64) -> Result<Option<Category>, RepositoryError> {
            unimplemented!("not used by TransactionService")
        }

        async fn create(&self, _name: &str) -> Result<Category, RepositoryError> {
            unimplemented!("not used by TransactionService")
        }

        async fn update(&self, _id: i64, _name: &str) -> Result<Category, RepositoryError> {
            unimplemented!("not used by TransactionService")
        }

        async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
            self.names
                .lock()
                .unwrap()
                .remove(&id)
                .map(|_| ())
                .ok_or(RepositoryError::NotFound)
        }

        async fn exists(&self, id: i64) -> Result<bool, RepositoryError> {
            Ok(self.names.lock().unwrap().contains_key(&id))
        }

        async fn exists_by_name(&self, _name: &str) -> Result<bool, RepositoryError> {
            unimplemented!("not used by TransactionService")
        }

        async fn exists_excluding(&self, _id: i64, _name: &str) -> Result<bool, RepositoryError> {
            unimplemented!("not used by TransactionService")
        }
    }

    // Mock TransactionRepository for testing
    struct MockTransactionRepository {
        transactions: Mutex<BTreeMap<i64, Transaction>>,
        categories: Arc<MockCategoryRepository>,
        should_fail: bool,
    }

    impl MockTransactionRepository {
        fn new(categories: Arc<MockCategoryRepository>) -> Self {
            Self {
                transactions: Mutex::new(BTreeMap::new()),
                categories,
                should_fail: false,
            }
        }

        fn with_failure(categories: Arc<MockCategoryRepository>) -> Self {
            Self {
                should_fail: true,
                ..Self::new(categories)
            }
        }

        fn fail_if_requested(&self) -> Result<(), RepositoryError> {
            if self.should_fail {
                return Err(RepositoryError::DatabaseError(
                    "Database connection failed".to_string(),
                ));
            }
            Ok(())
        }

        fn category_name(&self, id: i64) -> String {
            self.categories
                .name_of(id)
                .unwrap_or_else(|| UNKNOWN_CATEGORY_NAME.to_string())
        }
    }

    fn matches_filters(t: &Transaction, filters: &TransactionFilters) -> bool {
        filters.category_id.map_or(true, |id| t.category_id == id)
            && filters.status.map_or(true, |s| t.status == s)
            && filters.date_from.map_or(true, |from| t.transaction_date >= from)
            && filters.date_to.map_or(true, |to| t.transaction_date <= to)
    }

    #[async_trait]
    impl TransactionRepository for MockTransactionRepository {
        async fn find_all(
            &self,
            filters: &TransactionFilters,
        ) -> Result<Vec<TransactionWithCategory>, RepositoryError> {
            self.fail_if_requested()?;
            let transactions = self.transactions.lock().unwrap();
            let mut rows: Vec<TransactionWithCategory> = transactions
                .values()
                .filter(|t| matches_filters(t, filters))
                .map(|t| TransactionWithCategory {
                    id: t.id,
                    card_last_four: t.card_last_four.clone(),
                    amount: t.amount,
                    category_id: t.category_id,
                    category_name: self.category_name(t.category_id),
                    transaction_date: t.transaction_date,
                    status: t.status,
                    created_at: t.created_at,
                    updated_at: t.updated_at,
                })
                .collect();
            rows.sort_by(|a, b| {
                b.transaction_date
                    .cmp(&a.transaction_date)
                    .then(b.id.cmp(&a.id))
            });
            Ok(rows)
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<Transaction>, RepositoryError> {
            self.fail_if_requested()?;
            Ok(self.transactions.lock().unwrap().get(&id).cloned())
        }

        async fn create(&self, new: NewTransaction) -> Result<Transaction, RepositoryError> {
            self.fail_if_requested()?;
            let mut transactions = self.transactions.lock().unwrap();
            let id = transactions.keys().next_back().map_or(1, |last| last + 1);
            let now = Utc::now();
            let transaction = Transaction {
                id,
                card_last_four: new.card_last_four,
                amount: new.amount,
                category_id: new.category_id,
                transaction_date: new.transaction_date,
                status: new.status,
                created_at: now,
                updated_at: now,
            };
            transactions.insert(id, transaction.clone());
            Ok(transaction)
        }

        async fn update(&self, transaction: Transaction) -> Result<Transaction, RepositoryError> {
            self.fail_if_requested()?;
            let mut transactions = self.transactions.lock().unwrap();
            if !transactions.contains_key(&transaction.id) {
                return Err(RepositoryError::NotFound);
            }
            let updated = Transaction {
                updated_at: Utc::now(),
                ..transaction
            };
            transactions.insert(updated.id, updated.clone());
            Ok(updated)
        }

        async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
            self.fail_if_requested()?;
            self.transactions
                .lock()
                .unwrap()
                .remove(&id)
                .map(|_| ())
                .ok_or(RepositoryError::NotFound)
        }

        async fn update_status(
            &self,
            id: i64,
            status: TransactionStatus,
        ) -> Result<(), RepositoryError> {
            self.fail_if_requested()?;
            let mut transactions = self.transactions.lock().unwrap();
            let transaction = transactions.get_mut(&id).ok_or(RepositoryError::NotFound)?;
            transaction.status = status;
            transaction.updated_at = Utc::now();
            Ok(())
        }

        async fn expense_summary_by_category(
            &self,
        ) -> Result<Vec<ExpenseSummary>, RepositoryError> {
            self.fail_if_requested()?;
            let transactions = self.transactions.lock().unwrap();
            let mut groups: BTreeMap<i64, (f64, i64)> = BTreeMap::new();
            for t in transactions.values() {
                let entry = groups.entry(t.category_id).or_insert((0.0, 0));
                entry.0 += t.amount;
                entry.1 += 1;
            }
            Ok(groups
                .into_iter()
                .map(|(category_id, (total_amount, transaction_count))| ExpenseSummary {
                    category_id,
                    category_name: self.category_name(category_id),
                    total_amount,
                    transaction_count,
                })
                .collect())
        }
    }

    const FOOD: i64 = 1;
    const TRAVEL: i64 = 2;
    const SUPPLIES: i64 = 3;

    struct Fixture {
        service: TransactionServiceImpl,
        categories: Arc<MockCategoryRepository>,
    }

    fn fixture() -> Fixture {
        let categories = Arc::new(MockCategoryRepository::with(&[
            (FOOD, "Food"),
            (TRAVEL, "Travel"),
            (SUPPLIES, "Office Supplies"),
        ]));
        let transactions = Arc::new(MockTransactionRepository::new(categories.clone()));
        Fixture {
            service: TransactionServiceImpl::new(transactions, categories.clone()),
            categories,
        }
    }

    fn date(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()
    }

    fn request(card: &str, amount: f64, category_id: i64) -> CreateTransactionRequest {
        CreateTransactionRequest {
            card_last_four: card.to_string(),
            amount,
            category_id,
            transaction_date: Some(date(15)),
            status: None,
        }
    }

    #[tokio::test]
    async fn test_create_transaction_defaults() {
        let Fixture { service, .. } = fixture();

        let before = Utc::now();
        let transaction = service
            .create(CreateTransactionRequest {
                transaction_date: None,
                ..request("1234", 45.5, FOOD)
            })
            .await
            .unwrap();

        assert_eq!(transaction.status, TransactionStatus::Pending);
        assert!(transaction.transaction_date >= before);
        assert_eq!(transaction.card_last_four, "1234");
        assert_eq!(transaction.amount, 45.5);
    }

    #[tokio::test]
    async fn test_create_transaction_with_explicit_status() {
        let Fixture { service, .. } = fixture();

        let transaction = service
            .create(CreateTransactionRequest {
                status: Some(TransactionStatus::Approved),
                ..request("1234", 10.0, FOOD)
            })
            .await
            .unwrap();

        assert_eq!(transaction.status, TransactionStatus::Approved);
        assert_eq!(transaction.transaction_date, date(15));
    }

    #[tokio::test]
    async fn test_create_transaction_rejects_non_positive_amounts() {
        let Fixture { service, .. } = fixture();

        for amount in [0.0, -0.01, -100.0, f64::NAN] {
            let result = service.create(request("1234", amount, FOOD)).await;
            assert!(
                matches!(result, Err(ServiceError::Validation(ref m)) if m == AMOUNT_MESSAGE),
                "amount {amount} should be rejected"
            );
        }

        assert!(service.create(request("1234", 0.01, FOOD)).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_transaction_rejects_bad_card_digits() {
        let Fixture { service, .. } = fixture();

        for card in ["123", "12345", "12a4", "", " 123", "１２３４"] {
            let result = service.create(request(card, 10.0, FOOD)).await;
            assert!(
                matches!(result, Err(ServiceError::Validation(ref m)) if m == CARD_LAST_FOUR_MESSAGE),
                "card {card:?} should be rejected"
            );
        }

        assert!(service.create(request("0000", 10.0, FOOD)).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_transaction_unknown_category() {
        let Fixture { service, .. } = fixture();

        let result = service.create(request("1234", 10.0, 99)).await;
        assert!(matches!(result, Err(ServiceError::NotFound(ref m)) if m == "Category not found"));
    }

    #[tokio::test]
    async fn test_partial_update_only_touches_supplied_fields() {
        let Fixture { service, .. } = fixture();
        let original = service
            .create(CreateTransactionRequest {
                status: Some(TransactionStatus::Rejected),
                ..request("4321", 12.0, TRAVEL)
            })
            .await
            .unwrap();

        let updated = service
            .update(
                original.id,
                UpdateTransactionRequest {
                    amount: Some(50.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.amount, 50.0);
        assert_eq!(updated.card_last_four, original.card_last_four);
        assert_eq!(updated.category_id, original.category_id);
        assert_eq!(updated.transaction_date, original.transaction_date);
        assert_eq!(updated.status, original.status);
        assert_eq!(updated.created_at, original.created_at);
    }

    #[tokio::test]
    async fn test_update_validates_supplied_fields() {
        let Fixture { service, .. } = fixture();
        let original = service.create(request("1234", 10.0, FOOD)).await.unwrap();

        let result = service
            .update(
                original.id,
                UpdateTransactionRequest {
                    amount: Some(0.0),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(ServiceError::Validation(ref m)) if m == AMOUNT_MESSAGE));

        let result = service
            .update(
                original.id,
                UpdateTransactionRequest {
                    card_last_four: Some("12345".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(
            matches!(result, Err(ServiceError::Validation(ref m)) if m == CARD_LAST_FOUR_MESSAGE)
        );

        let result = service
            .update(
                original.id,
                UpdateTransactionRequest {
                    category_id: Some(99),
                    ..Default::default()
                },
            )
            .await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_missing_transaction_is_not_found() {
        let Fixture { service, .. } = fixture();

        let result = service.update(7, UpdateTransactionRequest::default()).await;
        assert!(
            matches!(result, Err(ServiceError::NotFound(ref m)) if m == "Transaction not found")
        );

        let result = service.delete(7).await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);

        let result = service.update_status(7, TransactionStatus::Approved).await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_any_status_can_follow_any_other() {
        let Fixture { service, .. } = fixture();
        let transaction = service.create(request("1234", 10.0, FOOD)).await.unwrap();

        for from in TransactionStatus::ALL {
            for to in TransactionStatus::ALL {
                service.update_status(transaction.id, from).await.unwrap();
                service.update_status(transaction.id, to).await.unwrap();

                let rows = service.get_all(TransactionFilters::default()).await.unwrap();
                assert_eq!(rows[0].status, to, "{from} -> {to}");
            }
        }
    }

    #[tokio::test]
    async fn test_delete_removes_transaction() {
        let Fixture { service, .. } = fixture();
        let transaction = service.create(request("1234", 10.0, FOOD)).await.unwrap();

        service.delete(transaction.id).await.unwrap();

        assert!(service
            .get_all(TransactionFilters::default())
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            service.delete(transaction.id).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn test_get_all_filters_are_conjunctive() {
        let Fixture { service, .. } = fixture();
        for (day, category_id, status) in [
            (10, FOOD, TransactionStatus::Pending),
            (12, FOOD, TransactionStatus::Approved),
            (14, TRAVEL, TransactionStatus::Pending),
            (20, FOOD, TransactionStatus::Pending),
        ] {
            service
                .create(CreateTransactionRequest {
                    transaction_date: Some(date(day)),
                    status: Some(status),
                    ..request("1234", 10.0, category_id)
                })
                .await
                .unwrap();
        }

        let pending = service
            .get_all(TransactionFilters {
                status: Some(TransactionStatus::Pending),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(pending.len(), 3);
        assert!(pending.iter().all(|t| t.status == TransactionStatus::Pending));

        let narrowed = service
            .get_all(TransactionFilters {
                category_id: Some(FOOD),
                date_from: Some(date(11)),
                date_to: Some(date(20)),
                ..Default::default()
            })
            .await
            .unwrap();
        let days: Vec<DateTime<Utc>> = narrowed.iter().map(|t| t.transaction_date).collect();
        assert_eq!(days, vec![date(20), date(12)]);
        assert!(narrowed.iter().all(|t| t.category_name == "Food"));
    }

    #[tokio::test]
    async fn test_expense_summary_groups_by_category() {
        let Fixture { service, .. } = fixture();
        service.create(request("1111", 10.0, FOOD)).await.unwrap();
        service.create(request("2222", 20.0, FOOD)).await.unwrap();
        service.create(request("3333", 5.0, TRAVEL)).await.unwrap();

        let summary = service.get_expense_summary().await.unwrap();
        assert_eq!(
            summary,
            vec![
                ExpenseSummary {
                    category_id: FOOD,
                    category_name: "Food".to_string(),
                    total_amount: 30.0,
                    transaction_count: 2,
                },
                ExpenseSummary {
                    category_id: TRAVEL,
                    category_name: "Travel".to_string(),
                    total_amount: 5.0,
                    transaction_count: 1,
                },
            ]
        );
        assert!(summary.iter().all(|row| row.category_id != SUPPLIES));
    }

    #[tokio::test]
    async fn test_orphaned_transactions_show_unknown_category() {
        let Fixture {
            service,
            categories,
        } = fixture();
        service.create(request("1111", 10.0, TRAVEL)).await.unwrap();

        categories.delete(TRAVEL).await.unwrap();

        let rows = service.get_all(TransactionFilters::default()).await.unwrap();
        assert_eq!(rows[0].category_name, UNKNOWN_CATEGORY_NAME);

        let summary = service.get_expense_summary().await.unwrap();
        assert_eq!(summary[0].category_name, UNKNOWN_CATEGORY_NAME);
    }

    #[tokio::test]
    async fn test_repository_failure_is_internal() {
        let categories = Arc::new(MockCategoryRepository::with(&[(FOOD, "Food")]));
        let transactions = Arc::new(MockTransactionRepository::with_failure(categories.clone()));
        let service = TransactionServiceImpl::new(transactions, categories);

        let result = service.get_all(TransactionFilters::default()).await;
        assert!(matches!(result, Err(ServiceError::Internal(_))));

        let result = service.create(request("1234", 10.0, FOOD)).await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Internal);
    }
}
