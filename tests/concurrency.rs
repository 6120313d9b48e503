use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use routeiq::{
    CatalogSnapshot, ClassificationService, ClassifierSettings, NormalizeConfig, Reconciler,
    Router, RoutingDefaults, TicketText, Vendor,
};

fn router() -> Router {
    let service = ClassificationService::load(
        &ClassifierSettings::linear(
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/model"),
        ),
        NormalizeConfig::default(),
    )
    .expect("fixture model loads");
    Router::new(
        service,
        Reconciler::strict(Vendor::Zammad.adapter()),
        RoutingDefaults::default(),
    )
}

fn catalog() -> CatalogSnapshot {
    CatalogSnapshot::new()
        .with_group(1, "Users")
        .with_group(3, "Billing")
        .with_group(7, "IT Support")
}

#[test]
fn shared_router_serves_parallel_requests() {
    let router = Arc::new(router());
    let catalog = Arc::new(catalog());
    let texts = [
        "My printer is not working and I have an important deadline",
        "Please refund my invoice",
        "A question about a feature",
        "login password",
    ];

    let expected: Vec<_> = texts
        .iter()
        .map(|t| {
            router
                .route(&TicketText::description_only(*t), &catalog, None)
                .expect("route")
        })
        .collect();
    let expected = Arc::new(expected);

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let router = Arc::clone(&router);
            let catalog = Arc::clone(&catalog);
            let expected = Arc::clone(&expected);
            thread::spawn(move || {
                for round in 0..50 {
                    let idx = (worker + round) % texts.len();
                    let routed = router
                        .route(&TicketText::description_only(texts[idx]), &catalog, None)
                        .expect("route");
                    assert_eq!(routed, expected[idx]);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }
}

#[test]
fn services_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClassificationService>();
    assert_send_sync::<Router>();
}

#[test]
fn per_thread_catalogs_do_not_interfere() {
    let router = Arc::new(router());
    let handles: Vec<_> = (0..4u64)
        .map(|i| {
            let router = Arc::clone(&router);
            thread::spawn(move || {
                let catalog = CatalogSnapshot::new()
                    .with_group(100 + i, "Users")
                    .with_group(200 + i, "IT Support");
                let routed = router
                    .route(
                        &TicketText::description_only("network email not working"),
                        &catalog,
                        None,
                    )
                    .expect("route");
                assert_eq!(routed.decision.department_id, 200 + i);
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker panicked");
    }
}
