//! Assertion utilities for testing

/// Assert that two byte arrays are equal, printing both as hex on failure
#[macro_export]
macro_rules! assert_bytes_eq {
    ($left:expr, $right:expr) => {
        assert_eq!(
            $crate::assertions::hex_of($left.as_ref()),
            $crate::assertions::hex_of($right.as_ref())
        );
    };
    ($left:expr, $right:expr, $($arg:tt)+) => {
        assert_eq!(
            $crate::assertions::hex_of($left.as_ref()),
            $crate::assertions::hex_of($right.as_ref()),
            $($arg)+
        );
    };
}

/// Assert that a result is OK and unwrap it
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(err) => panic!("Expected Ok, got Err: {:?}", err),
        }
    };
    ($expr:expr, $($arg:tt)+) => {
        match $expr {
            Ok(val) => val,
            Err(err) => panic!("Expected Ok, got Err: {:?} ({})", err, format!($($arg)+)),
        }
    };
}

/// Assert that a result is Err and unwrap the error
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(val) => panic!("Expected Err, got Ok: {:?}", val),
            Err(err) => err,
        }
    };
    ($expr:expr, $($arg:tt)+) => {
        match $expr {
            Ok(val) => panic!("Expected Err, got Ok: {:?} ({})", val, format!($($arg)+)),
            Err(err) => err,
        }
    };
}

/// Hex rendering used by `assert_bytes_eq!` so failures show readable digests.
pub fn hex_of(bytes: &[u8]) -> String {
    hex::encode(bytes)
}
