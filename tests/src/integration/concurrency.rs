//! # Concurrency Flows
//!
//! Many callers, one computation per txid.
//!
//! ## Properties Tested
//!
//! 1. **Deduplication**: concurrent callers share one fetch and one verdict
//! 2. **Depth**: long ancestry chains resolve without recursion limits
//! 3. **Detachment**: a caller giving up does not cancel shared work

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use futures::future::join_all;
    use shared_types::{OutPoint, Txid};
    use slp_02_validation_engine::{InvalidReason, ValidatorConfig, Validity, Verdict};

    use crate::fixtures::{token, Ledger};

    /// GENESIS followed by `depth` SENDs, each spending the previous one.
    fn chain(ledger: &Ledger, depth: usize, quantity: u64) -> (Txid, Vec<Txid>) {
        let genesis = ledger.genesis(quantity, None);
        let id = token(genesis);
        let mut tip = genesis;
        let mut sends = Vec::with_capacity(depth);
        for _ in 0..depth {
            tip = ledger.send(&[OutPoint::new(tip, 1)], id, &[quantity]);
            sends.push(tip);
        }
        (genesis, sends)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_share_one_fetch() {
        let ledger = Ledger::new();
        let source = ledger.source();
        source.set_latency(Duration::from_millis(10));
        let engine = ledger.engine();
        let (genesis, sends) = chain(&ledger, 3, 100);
        let tip = sends[2];

        let callers = (0..32).map(|_| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.verdict(tip).await })
        });
        let verdicts: Vec<Verdict> = join_all(callers)
            .await
            .into_iter()
            .map(|joined| joined.unwrap().unwrap())
            .collect();

        assert!(verdicts.iter().all(|verdict| *verdict == Verdict::Valid));
        for txid in sends.iter().chain(std::iter::once(&genesis)) {
            assert_eq!(source.fetch_count(txid), 1, "{} fetched more than once", txid);
            assert_eq!(engine.validity(txid), Validity::Valid);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_shared_ancestry_fetched_once() {
        let ledger = Ledger::new();
        let source = ledger.source();
        let engine = ledger.engine();
        let genesis = ledger.genesis(1_000, None);
        let id = token(genesis);

        let fan_out = ledger.send(
            &[OutPoint::new(genesis, 1)],
            id,
            &[100, 100, 100, 100, 100, 100, 100, 100, 100, 100],
        );
        let leaves: Vec<Txid> = (1..=10)
            .map(|vout| ledger.send(&[OutPoint::new(fan_out, vout)], id, &[100]))
            .collect();

        let accepted = engine.validate_transactions(&leaves).await.unwrap();
        assert_eq!(accepted, leaves);
        assert_eq!(source.fetch_count(&fan_out), 1);
        assert_eq!(source.fetch_count(&genesis), 1);
        assert_eq!(engine.stats().fetches, 12);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_deep_ancestry_resolves() {
        let ledger = Ledger::new();
        let source = ledger.source();
        let engine = ledger.engine_with(ValidatorConfig::default());
        let (genesis, sends) = chain(&ledger, 2_000, 21);
        let tip = *sends.last().unwrap();

        assert!(engine.is_valid(tip).await.unwrap());
        assert_eq!(engine.validity(&genesis), Validity::Valid);
        assert_eq!(engine.validity(&sends[0]), Validity::Valid);
        assert_eq!(source.fetch_count(&sends[1_000]), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_deep_invalid_root_propagates_to_tip() {
        let ledger = Ledger::new();
        let engine = ledger.engine();
        let genesis = ledger.genesis(10, None);
        let id = token(genesis);

        let mut tip = ledger.send(&[OutPoint::new(genesis, 1)], id, &[11]);
        let root = tip;
        for _ in 0..200 {
            tip = ledger.send(&[OutPoint::new(tip, 1)], id, &[11]);
        }

        assert_eq!(
            engine.verdict(tip).await.unwrap(),
            Verdict::Invalid(InvalidReason::InvalidParent)
        );
        assert_eq!(engine.invalid_reason(&root), Some(InvalidReason::Inflation));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_dropped_caller_does_not_cancel_computation() {
        let ledger = Ledger::new();
        let source = ledger.source();
        source.set_latency(Duration::from_millis(50));
        let engine = ledger.engine();
        let (_, sends) = chain(&ledger, 4, 7);
        let tip = sends[3];

        let impatient = tokio::time::timeout(Duration::from_millis(5), engine.verdict(tip)).await;
        assert!(impatient.is_err(), "gave up before the first fetch finished");

        assert_eq!(engine.verdict(tip).await.unwrap(), Verdict::Valid);
        for txid in &sends {
            assert_eq!(source.fetch_count(txid), 1);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_clones_share_one_cache() {
        let ledger = Ledger::new();
        let source = ledger.source();
        let engine = ledger.engine();
        let (genesis, sends) = chain(&ledger, 2, 5);

        let first = engine.clone();
        let second = Arc::new(engine.clone());
        let (a, b) = tokio::join!(first.is_valid(sends[1]), second.is_valid(sends[1]));
        assert!(a.unwrap() && b.unwrap());
        assert_eq!(engine.validity(&genesis), Validity::Valid);
        assert_eq!(source.fetch_count(&sends[1]), 1);
    }
}
