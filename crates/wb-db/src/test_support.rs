//! Shared test utilities for wb-db unit tests.

pub(crate) mod helpers {
    use crate::WbDb;
    use crate::service::WbService;

    /// In-memory service with the audit interceptor registered.
    pub async fn test_service() -> WbService {
        WbService::new_local(":memory:").await.unwrap()
    }

    /// In-memory service with no listeners: writes produce no audit rows.
    pub async fn unaudited_service() -> WbService {
        let db = WbDb::open_local(":memory:").await.unwrap();
        WbService::from_db(db)
    }

    /// Total rows in the audit log.
    pub async fn audit_count(svc: &WbService) -> i64 {
        svc.audit_count().await.unwrap()
    }
}
