use notlab_macros::builtin_fn;

#[builtin_fn]
pub fn max(a: f64, b: f64) -> f64 {
    a.max(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max() {
        assert_eq!((MAX.call)(&[3.0, 7.0]).unwrap(), 7.0);
        assert_eq!((MAX.call)(&[-1.0, -7.0]).unwrap(), -1.0);
        assert_eq!(MAX.arity, 2);
    }
}
