pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// Returns early with [`ErrorKind::InvalidArgument`](crate::ErrorKind::InvalidArgument)
/// when the condition does not hold. The argument name and the stringified condition
/// end up in the error message.
#[macro_export]
macro_rules! verify_arg {
    ($name:expr, $expr:expr) => {{
        let result = $expr;
        $crate::result::verify_arg(result, stringify!($name), stringify!($expr))?;
    }};
}

#[inline]
pub fn verify_arg(predicate: bool, name: &str, condition: &str) -> Result<()> {
    if predicate {
        Ok(())
    } else {
        invalid_arg(name, condition)
    }
}

#[cold]
pub fn invalid_arg(name: &str, condition: &str) -> Result<()> {
    Err(crate::error::ErrorKind::InvalidArgument {
        name: name.to_string(),
        message: condition.to_string(),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use crate::{ErrorKind, Result};

    fn check_offset(offset: usize, capacity: usize) -> Result<usize> {
        crate::verify_arg!(offset, offset <= capacity);
        Ok(offset)
    }

    #[test]
    fn test_verify_arg() {
        assert_eq!(check_offset(4, 8).unwrap(), 4);
        let err = check_offset(9, 8).unwrap_err();
        match err.kind() {
            ErrorKind::InvalidArgument { name, message } => {
                assert_eq!(name, "offset");
                assert_eq!(message, "offset <= capacity");
            }
            other => panic!("unexpected error kind {other:?}"),
        }
    }
}
