//! Built-in metamorphic relations and their explicit registration.

use std::sync::Arc;

use mtci_core::registry::MrRegistry;

mod batching;
mod flake_demo;
mod idempotence;
mod serialization;
mod testing;
mod whitespace;

pub use batching::BatchingInvarianceMR;
pub use flake_demo::FlakeDemoMR;
pub use idempotence::IdempotenceMR;
pub use serialization::SerializationInvarianceMR;
pub use testing::{AlwaysFailMR, FailThenPassMR};
pub use whitespace::WhitespaceInvarianceMR;

/// Registry with every built-in relation under its canonical name and
/// dotted locator aliases.
pub fn builtin_registry() -> MrRegistry {
    let mut registry = MrRegistry::new();
    register_builtins(&mut registry);
    registry
}

pub fn register_builtins(registry: &mut MrRegistry) {
    registry.register(
        "whitespace_invariance",
        &[
            "mtci.mrs.whitespace.WhitespaceInvarianceMR",
            "mtci.mrs.WhitespaceInvarianceMR",
        ],
        || Arc::new(WhitespaceInvarianceMR),
    );
    registry.register(
        "batching_invariance",
        &[
            "mtci.mrs.batching.BatchingInvarianceMR",
            "mtci.mrs.BatchingInvarianceMR",
        ],
        || Arc::new(BatchingInvarianceMR),
    );
    registry.register(
        "idempotence",
        &[
            "mtci.mrs.idempotence.IdempotenceMR",
            "mtci.mrs.IdempotenceMR",
        ],
        || Arc::new(IdempotenceMR),
    );
    registry.register(
        "serialization_invariance",
        &[
            "mtci.mrs.serialization.SerializationInvarianceMR",
            "mtci.mrs.SerializationInvarianceMR",
        ],
        || Arc::new(SerializationInvarianceMR),
    );
    registry.register(
        "flake_demo",
        &["mtci.mrs.flake_demo.FlakeDemoMR"],
        || Arc::new(FlakeDemoMR::default()),
    );
    registry.register(
        "fail_then_pass",
        &["mtci.testing_mrs.FailThenPassMR"],
        || Arc::new(FailThenPassMR::default()),
    );
    registry.register(
        "always_fail",
        &["mtci.testing_mrs.AlwaysFailMR"],
        || Arc::new(AlwaysFailMR),
    );
}
