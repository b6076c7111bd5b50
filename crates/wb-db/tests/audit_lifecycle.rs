//! End-to-end audit behavior of delivery orders through the store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pretty_assertions::assert_eq;
use wb_core::entities::DeliveryOrder;
use wb_core::enums::DeliveryOrderState;
use wb_db::error::DatabaseError;
use wb_db::repos::audit::AuditFilter;
use wb_db::service::WbService;
use wb_db::updates::DeliveryOrderUpdateBuilder;

async fn service() -> WbService {
    WbService::new_local(":memory:").await.unwrap()
}

async fn count(svc: &WbService) -> i64 {
    svc.audit_count().await.unwrap()
}

#[tokio::test]
async fn order_lifecycle_produces_expected_audit_trail() {
    let svc = service().await;

    // Create: one row for the audited state field.
    let order = svc
        .create_order("https://shop.test/orders/17", DeliveryOrderState::Queued)
        .await
        .unwrap();
    let id = order.id.unwrap();
    assert_eq!(count(&svc).await, 1);

    // State change: one more row.
    let order = svc
        .update_order(
            id,
            &DeliveryOrderUpdateBuilder::new()
                .state(DeliveryOrderState::InProgress)
                .build(),
        )
        .await
        .unwrap();
    assert_eq!(order.state, DeliveryOrderState::InProgress);
    assert_eq!(count(&svc).await, 2);

    // Unaudited field only: nothing new.
    svc.update_order(
        id,
        &DeliveryOrderUpdateBuilder::new()
            .order_link(Some("https://shop.test/orders/17b".into()))
            .build(),
    )
    .await
    .unwrap();
    assert_eq!(count(&svc).await, 2);

    // Audited change in a write the store rejects: rolled back with it.
    let err = svc
        .update_order(
            id,
            &DeliveryOrderUpdateBuilder::new()
                .order_link(None)
                .state(DeliveryOrderState::Delivered)
                .build(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::LibSql(_)), "got {err:?}");
    assert_eq!(count(&svc).await, 2);

    let stored = svc.get_order(id).await.unwrap();
    assert_eq!(stored.state, DeliveryOrderState::InProgress);
    assert_eq!(
        stored.order_link.as_deref(),
        Some("https://shop.test/orders/17b")
    );

    // Delete: one row with null state.
    svc.delete_order(id).await.unwrap();
    assert_eq!(count(&svc).await, 3);

    let history = svc.order_history(id).await.unwrap();
    let states: Vec<_> = history.iter().map(|r| r.state.as_deref()).collect();
    assert_eq!(states, vec![Some("QUEUED"), Some("IN_PROGRESS"), None]);
    assert!(history.iter().all(|r| r.entity_id == id));
    assert!(
        history
            .iter()
            .all(|r| r.entity_name == "delivery_order" && r.field_name == "delivery_order_state")
    );
    assert!(history.windows(2).all(|w| w[0].event_time <= w[1].event_time));
}

#[tokio::test]
async fn history_is_isolated_per_order() {
    let svc = service().await;
    let first = svc
        .create_order("order-a", DeliveryOrderState::Queued)
        .await
        .unwrap();
    let second = svc
        .create_order("order-b", DeliveryOrderState::Queued)
        .await
        .unwrap();

    let mut moved = second.clone();
    moved.state = DeliveryOrderState::Cancelled;
    svc.update(&moved).await.unwrap();

    assert_eq!(svc.order_history(first.id.unwrap()).await.unwrap().len(), 1);
    assert_eq!(svc.order_history(second.id.unwrap()).await.unwrap().len(), 2);

    let cancelled = svc
        .query_audit(&AuditFilter {
            entity_name: Some("delivery_order".into()),
            ..AuditFilter::default()
        })
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.state.as_deref() == Some("CANCELLED"))
        .count();
    assert_eq!(cancelled, 1);
}

#[tokio::test]
async fn concurrent_writes_each_commit_their_own_audit() {
    let svc = service().await;
    let (a, b, c) = tokio::join!(
        svc.create_order("order-a", DeliveryOrderState::Queued),
        svc.create_order("order-b", DeliveryOrderState::InProgress),
        svc.create_order("order-c", DeliveryOrderState::Delivered),
    );

    for order in [a.unwrap(), b.unwrap(), c.unwrap()] {
        let history = svc.order_history(order.id.unwrap()).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].state.as_deref(), Some(order.state.as_str()));
    }
    assert_eq!(count(&svc).await, 3);
}

#[tokio::test]
async fn stored_orders_and_history_survive_reopen() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("waybill.db");
    let path = path.to_str().unwrap();

    let id = {
        let svc = WbService::new_local(path).await.unwrap();
        let order = svc
            .create_order("order-1", DeliveryOrderState::Queued)
            .await
            .unwrap();
        let mut order: DeliveryOrder = order;
        order.state = DeliveryOrderState::Delivered;
        svc.update(&order).await.unwrap();
        order.id.unwrap()
    };

    let svc = WbService::new_local(path).await.unwrap();
    let order = svc.get_order(id).await.unwrap();
    assert_eq!(order.state, DeliveryOrderState::Delivered);

    let states: Vec<_> = svc
        .order_history(id)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.state)
        .collect();
    assert_eq!(
        states,
        vec![Some("QUEUED".to_string()), Some("DELIVERED".to_string())]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_never_see_rolled_back_audit_rows() {
    let svc = Arc::new(service().await);
    let id = svc
        .create_order("order-1", DeliveryOrderState::Queued)
        .await
        .unwrap()
        .id
        .unwrap();

    let done = Arc::new(AtomicBool::new(false));
    let reader = {
        let svc = Arc::clone(&svc);
        let done = Arc::clone(&done);
        tokio::spawn(async move {
            let mut longest = 0;
            while !done.load(Ordering::Acquire) {
                let history = svc.order_history(id).await.unwrap();
                longest = longest.max(history.len());
                let order = svc.get_order(id).await.unwrap();
                assert_eq!(order.state, DeliveryOrderState::Queued);
                tokio::task::yield_now().await;
            }
            longest
        })
    };

    let rejected = DeliveryOrderUpdateBuilder::new()
        .order_link(None)
        .state(DeliveryOrderState::Delivered)
        .build();
    for _ in 0..500 {
        assert!(svc.update_order(id, &rejected).await.is_err());
    }
    done.store(true, Ordering::Release);

    assert_eq!(reader.await.unwrap(), 1);
    assert_eq!(count(&svc).await, 1);
}
