//! Browser-side checks for the bindings that touch JS values.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn interpret_object_is_a_plain_object() {
    let value = jiki_wasm::interpret_object("python", "x = 1\n", "")
        .unwrap_or_else(|_| panic!("interpretObject failed"));
    assert!(value.is_object());
}

#[wasm_bindgen_test]
fn interpret_object_rejects_unknown_languages() {
    assert!(jiki_wasm::interpret_object("cobol", "", "").is_err());
}

#[wasm_bindgen_test]
fn change_language_validates_codes() {
    assert!(jiki_wasm::change_language("en").is_ok());
    assert!(jiki_wasm::change_language("xx").is_err());
}
