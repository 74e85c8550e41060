#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sigform_codec::BigUint;
use sigform_runtime::{Observable, OptionalObservable};
use sigform_widgets::{AmountContract, CommitEvent, InputContract, SyncController};

#[derive(Debug, Arbitrary)]
enum Action {
    Type(String),
    Refresh(Option<u128>),
    Commit,
    Disable(bool),
}

fuzz_target!(|actions: Vec<Action>| {
    let contract = AmountContract::new(6);
    let value = OptionalObservable::empty();
    let disabled = Observable::new(false);
    let field = SyncController::builder(contract, value.clone())
        .disabled(disabled.clone())
        .mount();

    for action in actions.into_iter().take(64) {
        match action {
            Action::Type(text) => field.input(text),
            Action::Refresh(v) => value.write(v.map(BigUint::from)),
            Action::Commit => {
                field.flush_commit(CommitEvent::Blur);
            }
            Action::Disable(flag) => {
                disabled.set(flag);
            }
        }

        // Text is always sanitized, and blank text is never invalid.
        let text = field.raw_text();
        assert_eq!(contract.sanitize(&text), text);
        if text.trim().is_empty() {
            assert!(!field.is_invalid());
        }
    }
});
