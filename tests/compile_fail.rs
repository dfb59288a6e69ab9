//! UI tests for `#[derive(Destination)]` diagnostics.

#[test]
fn destination_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/destination/pass/*.rs");
    t.compile_fail("tests/ui/destination/fail/*.rs");
}
