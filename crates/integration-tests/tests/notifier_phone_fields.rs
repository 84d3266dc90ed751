//! Integration tests for phone field rendering and save semantics.
//!
//! The three fields have deliberately different save behavior, inherited
//! from the forms that post them:
//! - profile: present-but-empty clears, absent leaves untouched
//! - product: always saves, absent stores empty
//! - checkout: saves only when present

use dialout_core::{OrderId, ProductId, UserId};
use dialout_integration_tests::TestHarness;
use dialout_notifier::forms::FormData;
use dialout_notifier::hooks::LifecycleHooks;
use dialout_notifier::store::{MetadataStore, keys};

// =============================================================================
// Profile Field
// =============================================================================

#[tokio::test]
async fn test_profile_round_trip() {
    let h = TestHarness::new();
    let user = UserId::new(1);

    let mut form = FormData::new();
    form.set(keys::USER_PHONE, "+15550100199");
    h.manager.save_profile_fields(user, &form).await.expect("save");

    let fields = h.manager.profile_fields(user).await.expect("render");
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].id, "twilio_phone");
    assert_eq!(fields[0].label, "Twilio Phone No.");
    assert_eq!(fields[0].value, "+15550100199");
}

#[tokio::test]
async fn test_profile_empty_submission_clears_stored_number() {
    let h = TestHarness::new();
    let user = UserId::new(1);

    let mut form = FormData::new();
    form.set(keys::USER_PHONE, "+15550100199");
    h.manager.save_profile_fields(user, &form).await.expect("save");

    let mut cleared = FormData::new();
    cleared.set(keys::USER_PHONE, "");
    h.manager
        .save_profile_fields(user, &cleared)
        .await
        .expect("save");

    let stored = h.meta.user_meta(user, keys::USER_PHONE).await.expect("read");
    assert_eq!(stored.as_deref(), Some(""));

    // And the rendered field shows the cleared state.
    let fields = h.manager.profile_fields(user).await.expect("render");
    assert_eq!(fields[0].value, "");
}

#[tokio::test]
async fn test_profile_absent_field_preserves_stored_number() {
    let h = TestHarness::new();
    let user = UserId::new(1);

    let mut form = FormData::new();
    form.set(keys::USER_PHONE, "+15550100199");
    h.manager.save_profile_fields(user, &form).await.expect("save");

    // A form without the phone field (e.g. another plugin's section).
    h.manager
        .save_profile_fields(user, &FormData::new())
        .await
        .expect("save");

    let fields = h.manager.profile_fields(user).await.expect("render");
    assert_eq!(fields[0].value, "+15550100199");
}

// =============================================================================
// Product Field
// =============================================================================

#[tokio::test]
async fn test_product_round_trip() {
    let h = TestHarness::new();
    let product = ProductId::new(10);

    let mut form = FormData::new();
    form.set(keys::PRODUCT_PHONE, "+15550100201");
    h.manager
        .save_product_fields(product, &form)
        .await
        .expect("save");

    let fields = h.manager.product_fields(product).await.expect("render");
    assert_eq!(fields[0].id, "_twilio_phone");
    assert_eq!(fields[0].label, "Seller Twilio Phone No.");
    assert_eq!(fields[0].value, "+15550100201");
}

#[tokio::test]
async fn test_product_absent_field_stores_empty() {
    let h = TestHarness::new();
    let product = ProductId::new(10);

    let mut form = FormData::new();
    form.set(keys::PRODUCT_PHONE, "+15550100201");
    h.manager
        .save_product_fields(product, &form)
        .await
        .expect("save");

    h.manager
        .save_product_fields(product, &FormData::new())
        .await
        .expect("save");

    let stored = h
        .meta
        .product_meta(product, keys::PRODUCT_PHONE)
        .await
        .expect("read");
    assert_eq!(stored.as_deref(), Some(""));
}

// =============================================================================
// Checkout Field
// =============================================================================

#[tokio::test]
async fn test_checkout_field_renders_with_placeholder() {
    let h = TestHarness::new();

    let fields = h.manager.checkout_fields(&FormData::new());

    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].id, "guest_twilio_phone");
    assert_eq!(fields[0].label, "Guest Twilio Phone No.");
    assert_eq!(fields[0].value, "");
    assert_eq!(
        fields[0].placeholder,
        Some("Enter your Twilio phone number")
    );
}

#[tokio::test]
async fn test_checkout_field_redisplays_draft_value() {
    let h = TestHarness::new();
    let mut draft = FormData::new();
    draft.set(keys::ORDER_GUEST_PHONE, "+15550100301");

    let fields = h.manager.checkout_fields(&draft);

    assert_eq!(fields[0].value, "+15550100301");
}

#[tokio::test]
async fn test_checkout_save_and_admin_panel() {
    let h = TestHarness::new();
    let order = OrderId::new(1001);

    let mut form = FormData::new();
    form.set(keys::ORDER_GUEST_PHONE, "+15550100301");
    h.manager
        .save_checkout_fields(order, &form)
        .await
        .expect("save");

    let panel = h.manager.order_billing_panel(order).await.expect("panel");
    assert_eq!(
        panel.as_deref(),
        Some("Guest Twilio Phone No: +15550100301")
    );
}

#[tokio::test]
async fn test_checkout_absent_field_saves_nothing() {
    let h = TestHarness::new();
    let order = OrderId::new(1001);

    h.manager
        .save_checkout_fields(order, &FormData::new())
        .await
        .expect("save");

    let stored = h
        .meta
        .order_meta(order, keys::ORDER_GUEST_PHONE)
        .await
        .expect("read");
    assert!(stored.is_none());

    let panel = h.manager.order_billing_panel(order).await.expect("panel");
    assert!(panel.is_none());
}

// =============================================================================
// Sanitization on Save
// =============================================================================

#[tokio::test]
async fn test_submitted_markup_is_stripped_before_storage() {
    let h = TestHarness::new();
    let user = UserId::new(1);

    let mut form = FormData::new();
    form.set(keys::USER_PHONE, "<a href=x>+15550100199</a>");
    h.manager.save_profile_fields(user, &form).await.expect("save");

    let stored = h.meta.user_meta(user, keys::USER_PHONE).await.expect("read");
    assert_eq!(stored.as_deref(), Some("+15550100199"));
}
