/// Runs the expression and drops its result, used where a failure cannot be reported anyway.
macro_rules! ignore_result {
    ($res:expr) => {
        match $res {
            Ok(_) => (),
            Err(_) => (),
        }
    };
}
