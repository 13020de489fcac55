#![no_main]

use libfuzzer_sys::fuzz_target;

// Splits arbitrary UTF-8 at the first NUL into (scope, segment) and resolves.
// Goal: no panics, and every successful result parses back to itself.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let (scope, segment) = text.split_once('\0').unwrap_or(("", text));
    let scope = (!scope.is_empty()).then_some(scope);

    if let Ok(resolved) = jsonschema_ref_core::resolve(scope, segment) {
        let reparsed = jsonschema_ref_core::UriRef::parse(&resolved)
            .expect("resolved reference must be a valid URI reference");
        assert_eq!(reparsed.to_string(), resolved);
    }
});
