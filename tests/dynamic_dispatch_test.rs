mod common;

use paywizard::application::engine::WizardEngine;
use paywizard::application::flows::FlowCatalog;
use paywizard::domain::flow::{FlowKind, VerificationKind};
use paywizard::domain::gateway::{BillQuery, VerificationQuery};
use paywizard::domain::ports::{ClockBox, ContactsPicker, GatewayBox, IdGeneratorBox, Permission};
use paywizard::domain::session::{Transition, WizardSession};
use paywizard::error::WizardError;
use paywizard::infrastructure::clock::InstantClock;
use paywizard::infrastructure::ids::{RandomIdGenerator, SequentialIdGenerator};
use paywizard::infrastructure::in_memory::StaticContactsPicker;
use std::sync::Arc;

#[tokio::test]
async fn test_ports_as_trait_objects() {
    let (gateway, _) = common::instant_gateway();
    let other: GatewayBox = Arc::clone(&gateway);

    // Verify Send + Sync by spawning tasks
    let bill_handle = tokio::spawn(async move {
        gateway
            .fetch_bill(BillQuery {
                flow: FlowKind::MobilePostpaid,
                biller: "Airtel".into(),
                account: "98765 43210".into(),
            })
            .await
            .unwrap()
    });
    let verify_handle = tokio::spawn(async move {
        other
            .verify(VerificationQuery {
                flow: FlowKind::Fastag,
                kind: VerificationKind::Vehicle,
                subject: "MH12AB1234".into(),
            })
            .await
            .unwrap()
    });

    assert_eq!(bill_handle.await.unwrap().customer_name, "Rahul Sharma");
    assert_eq!(verify_handle.await.unwrap().subject, "MH12AB1234");
}

#[tokio::test]
async fn test_clock_and_ids_as_trait_objects() {
    let clock: ClockBox = Arc::new(InstantClock::new(common::today()));
    let ids: IdGeneratorBox = Arc::new(RandomIdGenerator);
    let sequential: IdGeneratorBox = Arc::new(SequentialIdGenerator::new());

    let handle = tokio::spawn(async move {
        clock.sleep(std::time::Duration::from_secs(5)).await;
        (clock.today(), ids.reference("TXN2026"), sequential.reference("UPD2026"))
    });
    let (today, random, sequential) = handle.await.unwrap();

    assert_eq!(today, common::today());
    assert_eq!(random.len(), "TXN2026".len() + 7);
    assert!(random.starts_with("TXN2026"));
    assert!(
        random["TXN2026".len()..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    );
    assert_eq!(sequential, "UPD20260000001");
}

#[tokio::test]
async fn test_engine_is_shared_across_tasks() {
    let (gateway, _) = common::instant_gateway();
    let engine = Arc::new(WizardEngine::new(gateway));
    let catalog = FlowCatalog::default();

    let handles: Vec<_> = ["ACT Fibernet", "Hathway", "JioFiber"]
        .into_iter()
        .map(|provider| {
            let engine = Arc::clone(&engine);
            let definition = catalog.get(FlowKind::Broadband);
            tokio::spawn(async move {
                let mut session = WizardSession::new(definition).unwrap();
                session.set_field("provider", provider).unwrap();
                engine.continue_step(&mut session).await.unwrap();
                session.set_field("account_number", "12345678").unwrap();
                engine.continue_step(&mut session).await.unwrap();
                engine.continue_step(&mut session).await.unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), Transition::Completed);
    }
}

#[tokio::test]
async fn test_contacts_picker_fills_mobile() {
    let (gateway, _) = common::instant_gateway();
    let contacts = StaticContactsPicker::new(Permission::Granted, vec!["+91 91234 56780".into()]);
    let engine = WizardEngine::new(gateway).with_contacts_picker(Arc::new(contacts));
    let mut session =
        WizardSession::new(FlowCatalog::default().get(FlowKind::MobileRecharge)).unwrap();

    let shown = engine.fill_from_contacts(&mut session, "mobile").await.unwrap();
    assert_eq!(shown, "91234 56780");
    assert_eq!(session.text("mobile"), Some("91234 56780"));
}

#[tokio::test]
async fn test_contacts_permission_denied() {
    let (gateway, _) = common::instant_gateway();
    let contacts: Arc<dyn ContactsPicker> =
        Arc::new(StaticContactsPicker::new(Permission::Denied, vec!["9123456780".into()]));
    let engine = WizardEngine::new(gateway).with_contacts_picker(contacts);
    let mut session =
        WizardSession::new(FlowCatalog::default().get(FlowKind::MobileRecharge)).unwrap();

    let err = engine.fill_from_contacts(&mut session, "mobile").await.unwrap_err();
    assert!(matches!(err, WizardError::PermissionDenied(_)));
    assert_eq!(session.text("mobile"), None);
}
