//! Interceptors (middleware) for validated method calls.

mod chain;
mod validating;

pub use chain::{CallInterceptor, InterceptorChain};
pub use validating::{
    call_validated, PrerunInterceptor, TypeCheckInterceptor, PRERUN_PRIORITY, TYPE_CHECK_PRIORITY,
};
