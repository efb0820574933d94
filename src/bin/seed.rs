use chrono::{Duration, Utc};
use std::error::Error;

use expense_tracker::{
    AppState,
    config::Config,
    db,
    models::{Category, CreateTransactionRequest, TransactionFilters, TransactionStatus},
    services::ServiceError,
    setup_logging,
};

const CATEGORY_NAMES: [&str; 6] = [
    "Food",
    "Transportation",
    "Travel Expenses",
    "Office Supplies",
    "Entertainment",
    "Utilities",
];

/// (card, amount, index into CATEGORY_NAMES, days ago, status)
const SAMPLE_TRANSACTIONS: [(&str, f64, usize, i64, TransactionStatus); 8] = [
    ("1234", 45.50, 0, 7, TransactionStatus::Approved),
    ("5678", 25.00, 1, 5, TransactionStatus::Approved),
    ("9012", 350.00, 2, 3, TransactionStatus::Pending),
    ("3456", 89.99, 3, 2, TransactionStatus::Approved),
    ("7890", 120.00, 4, 1, TransactionStatus::Rejected),
    ("2345", 200.00, 5, 0, TransactionStatus::Pending),
    ("1234", 32.50, 0, 0, TransactionStatus::Pending),
    ("5678", 15.00, 1, 10, TransactionStatus::Approved),
];

/// Rows added by one seeding run
#[derive(Debug, PartialEq, Eq)]
struct Seeded {
    categories: usize,
    transactions: usize,
}

/// Populate the configured database with sample categories and transactions.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    setup_logging();

    let config = Config::from_env()?;
    let pool = db::connect(&config.database_url, config.max_connections).await?;
    db::run_migrations(&pool).await?;

    let seeded = seed(&AppState::from_pool(pool)).await?;
    tracing::info!(
        "Seeded {} categories and {} transactions",
        seeded.categories,
        seeded.transactions
    );

    Ok(())
}

/// Categories are matched by name and sample transactions are only added to
/// an empty ledger, so a second run adds nothing.
async fn seed(state: &AppState) -> Result<Seeded, ServiceError> {
    let mut categories: Vec<Category> = Vec::with_capacity(CATEGORY_NAMES.len());
    let mut created = 0;
    for name in CATEGORY_NAMES {
        let (category, is_new) = find_or_create_category(state, name).await?;
        created += usize::from(is_new);
        categories.push(category);
    }

    let existing = state
        .transaction_service
        .get_all(TransactionFilters::default())
        .await?;
    if !existing.is_empty() {
        tracing::info!(
            "{} transactions already present, skipping samples",
            existing.len()
        );
        return Ok(Seeded {
            categories: created,
            transactions: 0,
        });
    }

    let now = Utc::now();
    for (card, amount, category_index, days_ago, status) in SAMPLE_TRANSACTIONS {
        state
            .transaction_service
            .create(CreateTransactionRequest {
                card_last_four: card.to_string(),
                amount,
                category_id: categories[category_index].id,
                transaction_date: Some(now - Duration::days(days_ago)),
                status: Some(status),
            })
            .await?;
    }

    Ok(Seeded {
        categories: created,
        transactions: SAMPLE_TRANSACTIONS.len(),
    })
}

/// Returns the category with `name` and whether this call created it.
async fn find_or_create_category(
    state: &AppState,
    name: &str,
) -> Result<(Category, bool), ServiceError> {
    match state.category_service.create(name).await {
        Ok(category) => Ok((category, true)),
        Err(ServiceError::Conflict(_)) => {
            let existing = state.category_service.get_all().await?;
            existing
                .into_iter()
                .find(|category| category.name == name)
                .map(|category| (category, false))
                .ok_or_else(ServiceError::category_not_found)
        }
        Err(error) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn state() -> AppState {
        let pool = db::connect_in_memory().await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        AppState::from_pool(pool)
    }

    #[tokio::test]
    async fn test_first_run_adds_everything() {
        let state = state().await;

        let seeded = seed(&state).await.unwrap();

        assert_eq!(
            seeded,
            Seeded {
                categories: CATEGORY_NAMES.len(),
                transactions: SAMPLE_TRANSACTIONS.len(),
            }
        );
    }

    #[tokio::test]
    async fn test_second_run_adds_nothing() {
        let state = state().await;
        seed(&state).await.unwrap();

        let seeded = seed(&state).await.unwrap();

        assert_eq!(
            seeded,
            Seeded {
                categories: 0,
                transactions: 0,
            }
        );
        let transactions = state
            .transaction_service
            .get_all(TransactionFilters::default())
            .await
            .unwrap();
        assert_eq!(transactions.len(), SAMPLE_TRANSACTIONS.len());
        assert_eq!(
            state.category_service.get_all().await.unwrap().len(),
            CATEGORY_NAMES.len()
        );
    }
}
