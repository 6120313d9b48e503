use std::path::PathBuf;

use routeiq::{
    ArtifactBundle, CatalogSnapshot, ClassificationService, ClassifierSettings, NormalizeConfig,
    ReconcileOptions, Reconciler, Router, RoutingDefaults, TicketText, Vendor,
};

fn model_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/model")
}

fn service() -> ClassificationService {
    ClassificationService::load(
        &ClassifierSettings::linear(model_dir()),
        NormalizeConfig::default(),
    )
    .expect("fixture model loads")
}

const TICKETS: [&str; 5] = [
    "My printer is not working and I have an important deadline",
    "Please refund my invoice",
    "A question about a feature",
    "Cannot login, password reset needed",
    "",
];

#[test]
fn repeated_classification_is_identical() {
    let service = service();
    for text in TICKETS {
        let ticket = TicketText::description_only(text);
        let first = service.classify(&ticket).expect("classify");
        for _ in 0..10 {
            assert_eq!(service.classify(&ticket).expect("classify"), first, "{text}");
        }
    }
}

#[test]
fn independently_loaded_services_agree() {
    let a = service();
    let b = service();
    assert_eq!(a.fingerprint(), b.fingerprint());
    for text in TICKETS {
        let ticket = TicketText::description_only(text);
        assert_eq!(a.classify(&ticket).expect("a"), b.classify(&ticket).expect("b"));
    }
}

#[test]
fn fingerprint_tracks_artifact_bytes() {
    let bundle = ArtifactBundle::load_dir(model_dir()).expect("load");
    let again = ArtifactBundle::load_dir(model_dir()).expect("load");
    assert_eq!(bundle.fingerprint(), again.fingerprint());
    assert_eq!(bundle.fingerprint().len(), 64);
    assert!(bundle.fingerprint().chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn whitespace_and_case_do_not_change_the_result() {
    let service = service();
    let plain = service
        .classify_description("my printer is not working and i have an important deadline")
        .expect("classify");
    let noisy = service
        .classify_description("  MY   Printer is NOT\tworking and I have an IMPORTANT deadline!!  ")
        .expect("classify");
    assert_eq!(plain.department.label, noisy.department.label);
    assert_eq!(plain.priority.label, noisy.priority.label);
    assert!((plain.department.confidence - noisy.department.confidence).abs() < 1e-6);
}

#[test]
fn routing_decision_is_stable() {
    let router = Router::new(
        service(),
        Reconciler::new(
            Vendor::Zammad.adapter(),
            ReconcileOptions {
                relaxed: true,
                group_prefix: Some("Users - ".into()),
                ..Default::default()
            },
        ),
        RoutingDefaults::default(),
    );
    let catalog = CatalogSnapshot::new()
        .with_group(1, "Users")
        .with_group(4, "Users - Billing")
        .with_group(7, "IT Support")
        .with_priority(1, "1 low")
        .with_priority(2, "2 normal")
        .with_priority(3, "3 high");

    for text in TICKETS {
        let ticket = TicketText::description_only(text);
        let first = router.route(&ticket, &catalog, None).expect("route");
        let second = router.route(&ticket, &catalog, None).expect("route");
        assert_eq!(first, second, "{text}");
    }
}
