//! Process exit codes. Part of the CI contract: pipelines gate on these.

pub const SUCCESS: i32 = 0;
/// A relation failed, or was flaky under `fail_on_flake`.
pub const TEST_FAILED: i32 = 1;
/// Config, dataset or locator problem; nothing was run.
pub const CONFIG_ERROR: i32 = 2;
/// State persistence or artifact writing failed.
pub const INFRA_ERROR: i32 = 3;
