//! Concurrent callers against one ledger.

use std::collections::BTreeSet;

use budget_ledger::{Ledger, TransactionId, TransactionType, UserId};
use budget_ledger_store::KvStore;
use budget_ledger_testkit::LedgerFixture;
use tokio::task::JoinSet;

const TASKS: u64 = 8;
const PER_TASK: u64 = 25;

async fn concurrent_appends<S: KvStore + 'static>(ledger: Ledger<S>) -> anyhow::Result<()> {
    let mut tasks = JoinSet::new();
    for task in 0..TASKS {
        let ledger = ledger.clone();
        tasks.spawn(async move {
            let mut ids = Vec::with_capacity(PER_TASK as usize);
            for i in 0..PER_TASK {
                let t = ledger
                    .add_transaction(
                        UserId(task as i64),
                        TransactionType::Expense,
                        1.0,
                        &format!("task {task} entry {i}"),
                    )
                    .await?;
                ids.push(t.id.get());
            }
            Ok::<_, budget_ledger::LedgerError>(ids)
        });
    }

    let mut ids = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        ids.extend(joined??);
    }

    let total = TASKS * PER_TASK;
    let unique: BTreeSet<u64> = ids.iter().copied().collect();
    assert_eq!(ids.len() as u64, total);
    assert_eq!(unique, (1..=total).collect::<BTreeSet<_>>());

    assert_eq!(ledger.last_transaction_id().await?, TransactionId(total));
    assert_eq!(ledger.transactions().await?.len() as u64, total);
    assert_eq!(ledger.balance().await?, -(total as f64));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_memory() -> anyhow::Result<()> {
    concurrent_appends(LedgerFixture::memory().ledger).await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_sqlite() -> anyhow::Result<()> {
    let fixture = LedgerFixture::sqlite()?;
    concurrent_appends(fixture.ledger.clone()).await
}

/// Resets racing with appends never lose an entry or leave a gap.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn resets_interleave_with_appends() -> anyhow::Result<()> {
    let fixture = LedgerFixture::sqlite()?;
    let ledger = fixture.ledger.clone();

    let mut appenders = JoinSet::new();
    for task in 0..4i64 {
        let ledger = ledger.clone();
        appenders.spawn(async move {
            for _ in 0..10 {
                ledger
                    .add_transaction(UserId(task), TransactionType::Income, 2.5, "deposit")
                    .await?;
            }
            Ok::<_, budget_ledger::LedgerError>(())
        });
    }

    let mut resets = 0u64;
    for _ in 0..5 {
        if ledger.reset_balance().await?.is_some() {
            resets += 1;
        }
        tokio::task::yield_now().await;
    }
    while let Some(joined) = appenders.join_next().await {
        joined??;
    }

    let transactions = ledger.transactions().await?;
    let ids: Vec<u64> = transactions.iter().map(|t| t.id.get()).collect();
    assert_eq!(ids, (1..=40 + resets).collect::<Vec<_>>());
    assert_eq!(
        transactions.iter().filter(|t| t.description == "deposit").count(),
        40
    );

    ledger.reset_balance().await?;
    assert_eq!(ledger.balance().await?, 0.0);
    Ok(())
}
