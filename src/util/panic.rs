/// Asserts a precondition, but only in the `checked` configuration. Without the feature the
/// check compiles to nothing and a violated precondition is undefined behavior at the use site.
macro_rules! checked_assert {
    ($cond:expr, $($msg:tt)+) => {
        if cfg!(feature = "checked") {
            assert!($cond, $($msg)+);
        }
    };
}

pub(crate) use checked_assert;

#[allow(unused_macros)]
macro_rules! assert_panics {
    ($run:block) => {
        assert_panics!($run, "assertion failed to panic")
    };
    ($run:block, $msg:literal) => {
        assert!(std::panic::catch_unwind(|| $run).is_err(), $msg);
        println!("^ panic caught");
    };
}

#[allow(unused_imports)]
pub(crate) use assert_panics;
