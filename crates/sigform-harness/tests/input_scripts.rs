#![forbid(unsafe_code)]

//! Integration tests: scripted sessions against bound inputs.

use proptest::prelude::*;
use sigform_codec::{Address, BigUint, parse_address};
use sigform_harness::strategies::{
    address, address_list_text, address_text, amount_keystrokes, amount_value, decimal_text,
};
use sigform_harness::{FieldDriver, Frame, Step, init_test_logging};
use sigform_runtime::{Effect, Observable, OptionalObservable};
use sigform_widgets::input::amount_label;
use sigform_widgets::config::MAX_SCALE;
use sigform_widgets::{
    AddressContract, AddressListContract, AmountContract, CommitEvent, FormConfig, FormValidity,
    InputContract, SyncController,
};

fn eth(wei: u128) -> BigUint {
    BigUint::from(wei)
}

const ONE_ETH: u128 = 1_000_000_000_000_000_000;

// ============================================================================
// Amount field
// ============================================================================

#[test]
fn amount_edit_refresh_commit_session() {
    init_test_logging();
    let mut driver = FieldDriver::new(AmountContract::new(18));
    driver.run([
        Step::Type("1".into()),
        Step::Type("1.".into()),
        Step::Type("1.50".into()),
        Step::Commit(CommitEvent::Blur),
        Step::Refresh(Some(eth(3 * ONE_ETH / 2))),
        Step::Refresh(Some(eth(2 * ONE_ETH))),
        Step::Commit(CommitEvent::Blur),
    ]);

    let frames = driver.transcript();
    assert_eq!(frames[3].text, "1.50");
    assert_eq!(frames[3].value.as_deref(), Some("1.5"));
    assert!(frames[4].committed);
    assert_eq!(frames[5].text, "1.50", "same value keeps the user's formatting");
    assert_eq!(frames[6].text, "2");
    assert!(!frames[7].committed, "refreshes are not edits");
    assert_eq!(driver.commits(), vec![CommitEvent::Blur]);
}

#[test]
fn amount_invalid_edit_then_recovery() {
    let mut driver = FieldDriver::with_value(
        AmountContract::new(6),
        OptionalObservable::new(Some(eth(5_000_000))),
    );
    assert_eq!(driver.last().text, "5");

    let frame = driver.apply(Step::Type("12.5.6".into())).clone();
    assert!(frame.invalid);
    assert_eq!(frame.value, None);

    let frame = driver.apply(Step::Refresh(Some(eth(7_000_000)))).clone();
    assert_eq!(frame.text, "12.5.6", "invalid text is not clobbered");

    let frame = driver.apply(Step::Type("12.5".into())).clone();
    assert!(!frame.invalid);
    assert_eq!(frame.value.as_deref(), Some("12.5"));

    let frame = driver.apply(Step::Type("   ".into())).clone();
    assert_eq!(
        frame,
        Frame {
            step: "type \"   \"".into(),
            text: String::new(),
            value: None,
            invalid: false,
            pending_commit: true,
            committed: false,
        }
    );
}

#[test]
fn amount_truncates_excess_decimals() {
    let mut driver = FieldDriver::new(AmountContract::new(6));
    driver.apply(Step::Type("0.1234567".into()));
    assert_eq!(driver.value().peek(), Some(eth(123_456)));
    assert_eq!(driver.last().text, "0.1234567");
}

#[test]
fn configured_display_decimals_leave_refreshes_exact() {
    let config = FormConfig::from_toml_str(
        "[fields.amount]\nkind = \"amount\"\nscale = 6\ndisplay_decimals = 2\n",
    )
    .unwrap();
    let mut driver = FieldDriver::new(config.amount("amount").unwrap());
    let frame = driver.apply(Step::Refresh(Some(eth(2_345_678)))).clone();
    assert_eq!(frame.text, "2.345678");
    assert!(!frame.pending_commit, "refreshes are not edits");
    assert_eq!(driver.value().peek(), Some(eth(2_345_678)));

    let label = config.amount_label("amount", driver.value()).unwrap();
    assert_eq!(label.get(), "2.34");
}

#[test]
fn disabled_field_holds_value_until_enabled() {
    let mut driver = FieldDriver::new(AmountContract::new(0));
    driver.run([
        Step::Disable(true),
        Step::Type("42".into()),
        Step::Commit(CommitEvent::Submit),
    ]);
    assert_eq!(driver.value().peek(), None);
    assert!(driver.commits().is_empty());

    driver.apply(Step::Disable(false));
    assert_eq!(driver.value().peek(), Some(eth(42)));
    assert!(driver.last().pending_commit);
}

#[test]
fn balance_label_follows_refreshes() {
    let balance = OptionalObservable::empty();
    let label = amount_label(&balance, 18, Some(4));
    let shown = Observable::new(String::new());
    let (l, s) = (label.clone(), shown.clone());
    let _render = Effect::new("render.balance", move || {
        s.set(l.get());
    });

    assert_eq!(shown.get(), "?");
    balance.write(Some(eth(1_234_567_890_000_000_000)));
    assert_eq!(shown.get(), "1.2345");
    balance.write(Some(BigUint::from(1u8) << 256));
    assert_eq!(shown.get(), "Practically Infinite");
}

#[test]
fn out_of_order_refresh_is_dropped_with_version_guard() {
    let balance = OptionalObservable::empty();
    let field = SyncController::mount(AmountContract::new(0), balance.clone());

    let first_request = balance.version();
    field.input("10");
    let second_request = balance.version();
    balance.write_if_version(second_request, Some(eth(20))).unwrap();

    let late = balance.write_if_version(first_request, Some(eth(5)));
    assert!(late.is_err());
    assert_eq!(field.raw_text(), "20");
}

// ============================================================================
// Address fields
// ============================================================================

const ALICE: &str = "0x52908400098527886e0f7030069857d2e4169ee7";
const BOB: &str = "0x8617e340b3d01fa5f11f306f4090fd50e238070d";

fn addr(text: &str) -> Address {
    parse_address(text).unwrap()
}

#[test]
fn address_field_accepts_mixed_case_paste() {
    let mut driver = FieldDriver::new(AddressContract);
    driver.apply(Step::Type(format!("  {}  ", ALICE.to_uppercase().replacen("0X", "0x", 1))));
    assert!(!driver.last().invalid);
    assert_eq!(driver.value().peek(), Some(addr(ALICE)));

    driver.apply(Step::Type("0x1234".into()));
    assert!(driver.last().invalid);
    assert_eq!(driver.value().peek(), None);
}

#[test]
fn address_list_refresh_replaces_text_wholesale() {
    let mut driver = FieldDriver::new(AddressListContract::new());
    driver.apply(Step::Type(format!("{ALICE},{BOB}")));
    assert_eq!(driver.value().peek(), Some(vec![addr(ALICE), addr(BOB)]));

    driver.apply(Step::Refresh(Some(vec![addr(BOB)])));
    assert_eq!(driver.last().text, BOB);

    driver.apply(Step::Type(format!("{BOB}, nope")));
    assert!(driver.last().invalid);
    assert_eq!(driver.value().peek(), None);
}

// ============================================================================
// Form level
// ============================================================================

#[test]
fn configured_form_gates_submit_on_validity() {
    init_test_logging();
    let config = FormConfig::from_toml_str(
        r#"
        [fields.amount]
        kind = "amount"
        scale = 6

        [fields.spender]
        kind = "address"
        "#,
    )
    .unwrap();

    let amount_invalid = Observable::new(false);
    let spender_invalid = Observable::new(false);
    let amount = SyncController::builder(config.amount("amount").unwrap(), OptionalObservable::empty())
        .report_validity_to(amount_invalid.clone())
        .mount();
    let spender = SyncController::builder(config.address("spender").unwrap(), OptionalObservable::empty())
        .report_validity_to(spender_invalid.clone())
        .mount();

    let mut form = FormValidity::new();
    form.track(&amount_invalid).track(&spender_invalid);

    amount.input("1.5");
    spender.input("0xnot-an-address");
    assert!(form.any_invalid());

    spender.input(BOB);
    assert!(!form.any_invalid());
    assert!(amount.value().is_some() && spender.value().is_some());
}

// ============================================================================
// Properties
// ============================================================================

fn settled<C: InputContract>(driver: &FieldDriver<C>) -> bool {
    let controller = driver.controller();
    let text = controller.raw_text_observable().peek();
    let contract = controller.contract();
    let sanitized = contract.sanitize(&text);
    if sanitized != text {
        return false;
    }
    if sanitized.trim().is_empty() {
        return controller.value().with_untracked(|v| v.is_none());
    }
    match contract.try_parse(&sanitized) {
        Ok(parsed) => controller.value().with_untracked(|held| held == parsed.as_ref()),
        Err(_) => controller.is_invalid(),
    }
}

/// One form with every field kind, parameterized the way a TOML author would.
fn form(scale: u32, separator: char, trim: bool) -> FormConfig {
    FormConfig::from_toml_str(&format!(
        r#"
        [fields.amount]
        kind = "amount"
        scale = {scale}

        [fields.spender]
        kind = "address"

        [fields.recipients]
        kind = "address_list"
        separator = "{separator}"

        [fields.memo]
        kind = "text"
        trim = {trim}
        "#
    ))
    .unwrap()
}

fn separator() -> impl Strategy<Value = char> {
    prop::sample::select(vec![',', ';', '|', '/', ':', '+'])
}

/// Commit whatever was typed, refresh, and check the refresh was taken as-is.
fn refresh_is_exact<C>(
    driver: &mut FieldDriver<C>,
    typed: String,
    refreshed: Option<C::Value>,
) -> Result<(), TestCaseError>
where
    C: InputContract,
    C::Value: Clone + std::fmt::Debug,
{
    driver.apply(Step::Type(typed));
    driver.apply(Step::Commit(CommitEvent::Change));
    let frame = driver.apply(Step::Refresh(refreshed.clone())).clone();
    prop_assert!(settled(driver));
    prop_assert!(!frame.pending_commit);
    prop_assert_eq!(driver.value().peek(), refreshed);
    Ok(())
}

proptest! {
    #[test]
    fn configured_amounts_take_refreshes_exactly(
        scale in 0..=MAX_SCALE,
        text in decimal_text(),
        refreshed in proptest::option::of(amount_value()),
    ) {
        let config = form(scale, ',', false);
        let mut driver = FieldDriver::new(config.amount("amount").unwrap());
        refresh_is_exact(&mut driver, text, refreshed)?;
    }

    #[test]
    fn configured_amounts_settle_under_keystrokes(
        scale in 0..=MAX_SCALE,
        keys in prop::collection::vec(amount_keystrokes(), 1..6),
    ) {
        let mut driver = FieldDriver::new(form(scale, ',', false).amount("amount").unwrap());
        for text in keys {
            driver.apply(Step::Type(text));
            prop_assert!(settled(&driver));
        }
    }

    #[test]
    fn configured_addresses_take_refreshes_exactly(
        text in address_text(),
        refreshed in proptest::option::of(address()),
    ) {
        let config = form(18, ',', false);
        let mut driver = FieldDriver::new(config.address("spender").unwrap());
        refresh_is_exact(&mut driver, text, refreshed)?;
    }

    #[test]
    fn configured_address_lists_take_refreshes_exactly(
        (sep, text) in separator().prop_flat_map(|sep| (Just(sep), address_list_text(sep))),
        refreshed in proptest::option::of(prop::collection::vec(address(), 1..4)),
    ) {
        let config = form(18, sep, false);
        let mut driver = FieldDriver::new(config.address_list("recipients").unwrap());
        refresh_is_exact(&mut driver, text, refreshed)?;
    }

    #[test]
    fn configured_text_takes_refreshes_exactly(
        trim in any::<bool>(),
        text in "[ a-z]{0,10}",
        refreshed in proptest::option::of("[a-z]([a-z ]{0,6}[a-z])?"),
    ) {
        let config = form(18, ',', trim);
        let mut driver = FieldDriver::new(config.text("memo").unwrap());
        refresh_is_exact(&mut driver, text, refreshed)?;
    }

    #[test]
    fn any_keystroke_sequence_settles(
        keys in prop::collection::vec(amount_keystrokes(), 1..6),
    ) {
        let mut driver = FieldDriver::new(AmountContract::new(6));
        for text in keys {
            driver.apply(Step::Type(text));
            prop_assert!(settled(&driver));
        }
    }

    #[test]
    fn refresh_after_valid_edit_settles(
        text in decimal_text(),
        refreshed in proptest::option::of(amount_value()),
    ) {
        let mut driver = FieldDriver::new(AmountContract::new(8));
        driver.apply(Step::Type(text));
        driver.apply(Step::Refresh(refreshed.clone()));
        prop_assert!(settled(&driver));
        prop_assert_eq!(driver.value().peek(), refreshed);
    }

    #[test]
    fn pasted_address_lists_parse(text in address_list_text(',')) {
        let mut driver = FieldDriver::new(AddressListContract::new());
        driver.apply(Step::Type(text));
        prop_assert!(!driver.last().invalid);
        prop_assert!(driver.value().is_some());
    }
}
