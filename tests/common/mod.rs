#![allow(dead_code, unused_imports)]

pub use flowdag_test_utils::builders;
pub use flowdag_test_utils::fake_executor;
pub use flowdag_test_utils::{FAKE_RUN_LIMIT, PROCESS_RUN_LIMIT, init_tracing, with_timeout};
