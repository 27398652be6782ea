//! Log statements go to defmt with the `defmt-03` feature and are compiled out otherwise.
#![macro_use]
#![allow(unused)]

#[collapse_debuginfo(yes)]
macro_rules! log_at {
    ($level:ident, $s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt-03")]
            ::defmt::$level!($s $(, $x)*);
            #[cfg(not(feature = "defmt-03"))]
            let _ = ($( & $x ),*);
        }
    };
}

#[allow(unused_macros)]
#[collapse_debuginfo(yes)]
macro_rules! trace {
    ($($t:tt)*) => {
        log_at!(trace, $($t)*)
    };
}

#[allow(unused_macros)]
#[collapse_debuginfo(yes)]
macro_rules! debug {
    ($($t:tt)*) => {
        log_at!(debug, $($t)*)
    };
}
