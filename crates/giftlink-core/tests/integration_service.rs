//! End-to-end tests for the gift-link service facade

mod common;

use std::sync::Arc;
use uuid::Uuid;

use common::{FailingProbe, MockAccessLedger, StaticProbe};
use giftlink_core::{CoreError, GiftLinkService, ServiceConfig};
use giftlink_db::TokenBalanceRepository;
use giftlink_types::{SessionId, TemplateKind, Tier, UserId};

fn service_with(
    ledger: &Arc<MockAccessLedger>,
    probe: StaticProbe,
) -> GiftLinkService<MockAccessLedger, StaticProbe> {
    GiftLinkService::with_probe(ledger.clone(), probe, test_config())
}

fn test_config() -> ServiceConfig {
    ServiceConfig::default().with_resolve_policy(
        giftlink_core::ResolvePolicy::new()
            .with_max_attempts(2)
            .with_base_delay(std::time::Duration::from_millis(1)),
    )
}

#[tokio::test]
async fn test_generate_then_redeem_once() {
    let ledger = Arc::new(MockAccessLedger::new());
    let user = Uuid::new_v4();
    let session = SessionId::new();
    ledger.seed_permanent(user);

    let probe = StaticProbe::resolving_to("https://www.temu.com/p.html?goods_id=601101201529861&z=1");
    let service = service_with(&ledger, probe);

    let generated = service
        .generate(
            UserId(user),
            session,
            "https://share.temu.com/s/abc123",
            TemplateKind::Standard,
        )
        .await
        .unwrap();

    assert_eq!(generated.tier, Tier::Permanent);
    assert_eq!(generated.product_id, "601101201529861");

    let url = service.redeem(session).await.unwrap();
    assert!(url.as_str().contains("goods_id=601101201529861"));

    // Single use: the capability is gone.
    let err = service.redeem(session).await.unwrap_err();
    assert!(matches!(err, CoreError::HandoffMissing));
}

#[tokio::test]
async fn test_invalid_share_link_consumes_nothing() {
    let ledger = Arc::new(MockAccessLedger::new());
    let user = Uuid::new_v4();
    ledger.seed_tokens(user, 1);

    let probe = StaticProbe::resolving_to("https://www.temu.com/p.html?goods_id=1");
    let service = service_with(&ledger, probe);

    for bad in [
        "not a url",
        "ftp://share.temu.com/s/abc",
        "https://evil.example.com/s/abc",
        "https://eviltemu.com/s/abc",
    ] {
        let err = service
            .generate(UserId(user), SessionId::new(), bad, TemplateKind::Standard)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidShareLink(_)), "input: {bad}");
    }

    let balance = ledger.token_balance(user).await.unwrap().unwrap();
    assert_eq!(balance.tokens, 1);
}

#[tokio::test]
async fn test_denied_user_never_reaches_the_network() {
    let ledger = Arc::new(MockAccessLedger::new());
    let user = Uuid::new_v4();
    let now = chrono::Utc::now();
    ledger.seed_free_used(user, now.date_naive(), 1);

    // A failing probe would turn any outbound attempt into ResolutionFailed;
    // a denied user must be rejected before that.
    let service = GiftLinkService::with_probe(ledger.clone(), FailingProbe, test_config());

    let err = service
        .generate(
            UserId(user),
            SessionId::new(),
            "https://share.temu.com/s/abc",
            TemplateKind::Standard,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::EntitlementDenied));
}

#[tokio::test]
async fn test_consumption_precedes_resolution() {
    let ledger = Arc::new(MockAccessLedger::new());
    let user = Uuid::new_v4();
    let now = chrono::Utc::now();
    ledger.seed_free_used(user, now.date_naive(), 1);
    ledger.seed_tokens(user, 1);

    let service = GiftLinkService::with_probe(ledger.clone(), FailingProbe, test_config());

    let err = service
        .generate(
            UserId(user),
            SessionId::new(),
            "https://share.temu.com/s/abc",
            TemplateKind::Standard,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ResolutionFailed { .. }));

    // The unit was spent before the outbound attempts began.
    let balance = ledger.token_balance(user).await.unwrap().unwrap();
    assert_eq!(balance.tokens, 0);
}

#[tokio::test]
async fn test_resolved_url_without_product_id() {
    let ledger = Arc::new(MockAccessLedger::new());
    let user = Uuid::new_v4();
    ledger.seed_permanent(user);

    let probe = StaticProbe::resolving_to("https://www.temu.com/landing.html?campaign=7");
    let service = service_with(&ledger, probe);

    let err = service
        .generate(
            UserId(user),
            SessionId::new(),
            "https://share.temu.com/s/abc",
            TemplateKind::Standard,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::ProductIdNotFound));
}

#[tokio::test]
async fn test_full_return_template_end_to_end() {
    let ledger = Arc::new(MockAccessLedger::new());
    let user = Uuid::new_v4();
    let session = SessionId::new();
    ledger.seed_permanent(user);

    let probe = StaticProbe::resolving_to("https://www.temu.com/p.html?goods_id=601101201529861");
    let service = service_with(&ledger, probe);

    service
        .generate(
            UserId(user),
            session,
            "https://share.temu.com/s/abc",
            TemplateKind::FullReturn,
        )
        .await
        .unwrap();

    let url = service.redeem(session).await.unwrap();
    assert!(url.as_str().contains("nz_goods=[601101201529861]"));
}

#[tokio::test]
async fn test_resolve_and_compose_does_not_consume() {
    let ledger = Arc::new(MockAccessLedger::new());
    let user = Uuid::new_v4();
    ledger.seed_tokens(user, 1);

    let probe = StaticProbe::resolving_to("https://www.temu.com/p.html?goods_id=99");
    let service = service_with(&ledger, probe);

    let composed = service
        .resolve_and_compose("https://share.temu.com/s/abc", TemplateKind::Standard)
        .await
        .unwrap();
    assert_eq!(composed.product_id, "99");

    let balance = ledger.token_balance(user).await.unwrap().unwrap();
    assert_eq!(balance.tokens, 1);
}

#[tokio::test]
async fn test_new_generation_replaces_pending_handoff() {
    let ledger = Arc::new(MockAccessLedger::new());
    let user = Uuid::new_v4();
    let session = SessionId::new();
    ledger.seed_permanent(user);

    let probe = StaticProbe::resolving_to("https://www.temu.com/p.html?goods_id=11");
    let service = service_with(&ledger, probe);

    service
        .generate(UserId(user), session, "https://share.temu.com/s/a", TemplateKind::Standard)
        .await
        .unwrap();
    service
        .generate(UserId(user), session, "https://share.temu.com/s/b", TemplateKind::Standard)
        .await
        .unwrap();

    // One pending capability per session: a single redeem drains it.
    service.redeem(session).await.unwrap();
    assert!(matches!(
        service.redeem(session).await.unwrap_err(),
        CoreError::HandoffMissing
    ));
}
