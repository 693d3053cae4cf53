/// Panics unless the value matches the pattern (and the optional guard).
#[macro_export]
macro_rules! assert_matches {
    ($expr:expr, $pat:pat $(if $guard:expr)? $(,)?) => {
        match $expr {
            $pat $(if $guard)? => {}
            ref value => ::core::panic!(
                "assertion failed: `{:?}` does not match `{}`",
                value,
                ::core::stringify!($pat $(if $guard)?),
            ),
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn matches() {
        assert_matches!(Some(3), Some(_));
        assert_matches!(Some(3), Some(x) if x > 2);
        assert_matches!(Ok::<_, ()>("ok"), Ok("ok"),);
    }

    #[test]
    #[should_panic(expected = "does not match `Some(x) if x > 3`")]
    fn guard_fails() {
        assert_matches!(Some(3), Some(x) if x > 3);
    }

    #[test]
    #[should_panic(expected = "`None` does not match")]
    fn pattern_fails() {
        assert_matches!(None::<u8>, Some(_));
    }
}
