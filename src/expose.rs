//! Idempotent function exposure across navigation boundaries.
//!
//! Drivers track exposed-function bindings twice: in session state and
//! as a property on the page's global object. A navigation wipes the
//! page side but not the session side (or, after a session reset, the
//! reverse), so a naive re-registration fails with a spurious "already
//! exists" error. [`ensure_exposed`] runs a short cleanup-then-register
//! sequence that tolerates every expected failure along the way and
//! reports each step's outcome explicitly.

use tracing::debug;

use crate::cdp::{BindingHandler, CdpError};
use crate::host::PageHandle;

/// Cleanup policy for a pre-existing binding.
///
/// The variants differ in how aggressively the old binding is cleared
/// and whether a binding that survives cleanup is reused or rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExposePolicy {
    /// Remove driver-side and page-side state best-effort, register,
    /// and accept an "already exists" failure as success: the surviving
    /// binding keeps serving.
    #[default]
    TolerateExisting,
    /// After driver-side removal, probe the page; when `window[name]`
    /// is still bound, skip registration and reuse it regardless of
    /// origin.
    SkipIfBound,
    /// Clean up best-effort, then register unconditionally. Every
    /// registration failure propagates, "already exists" included.
    ForceRegister,
}

/// One step of the cleanup-then-register sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupStep {
    /// Driver-level removal of the tracked binding.
    DriverRemoval,
    /// `delete window[name]` in page context.
    GlobalDelete,
    /// Page-context probe for an existing `window[name]`.
    ExistenceProbe,
}

/// Outcome of one step.
#[derive(Debug)]
pub enum StepOutcome {
    /// The step ran and succeeded.
    Completed,
    /// The step did not run.
    Skipped(&'static str),
    /// The step failed in an expected way; the sequence continued.
    Tolerated(CdpError),
}

/// A step paired with its outcome.
#[derive(Debug)]
pub struct StepReport {
    pub step: CleanupStep,
    pub outcome: StepOutcome,
}

/// How the binding ended up in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The callback was registered by this call.
    Fresh,
    /// A binding of this name was already in place and is reused.
    Reused,
}

/// Result of a successful [`ensure_exposed`] call.
#[derive(Debug)]
pub struct ExposeReport {
    pub registration: Registration,
    pub steps: Vec<StepReport>,
}

/// Ensure `window[name]` invokes `handler`, tolerating leftovers from a
/// previous registration, with [`ExposePolicy::TolerateExisting`].
pub async fn ensure_exposed(
    page: &dyn PageHandle,
    name: &str,
    handler: BindingHandler,
) -> Result<ExposeReport, CdpError> {
    ensure_exposed_with(page, name, handler, ExposePolicy::default()).await
}

/// Ensure `window[name]` invokes `handler`, with an explicit cleanup
/// policy.
///
/// Cleanup-step failures are recorded in the report, never propagated;
/// the binding may be untracked, the page may be mid-navigation. A
/// registration failure propagates unchanged unless the policy accepts
/// an existing binding, in which case the call succeeds with
/// [`Registration::Reused`].
///
/// Calls are independent and stateless; two concurrent calls for the
/// same `(page, name)` race, and the last registration wins.
pub async fn ensure_exposed_with(
    page: &dyn PageHandle,
    name: &str,
    handler: BindingHandler,
    policy: ExposePolicy,
) -> Result<ExposeReport, CdpError> {
    if name.is_empty() {
        return Err(CdpError::InvalidBindingName("empty name".to_string()));
    }

    let mut steps = Vec::new();

    if page.supports_binding_removal() {
        match page.remove_exposed_function(name).await {
            Ok(()) => steps.push(StepReport {
                step: CleanupStep::DriverRemoval,
                outcome: StepOutcome::Completed,
            }),
            Err(e) => {
                debug!("Tolerated driver removal failure for '{}': {}", name, e);
                steps.push(StepReport {
                    step: CleanupStep::DriverRemoval,
                    outcome: StepOutcome::Tolerated(e),
                });
            }
        }
    } else {
        steps.push(StepReport {
            step: CleanupStep::DriverRemoval,
            outcome: StepOutcome::Skipped("removal not supported by driver"),
        });
    }

    match policy {
        ExposePolicy::SkipIfBound => {
            match probe_bound(page, name).await {
                Ok(true) => {
                    steps.push(StepReport {
                        step: CleanupStep::ExistenceProbe,
                        outcome: StepOutcome::Completed,
                    });
                    debug!("Binding '{}' already present, reusing", name);
                    return Ok(ExposeReport {
                        registration: Registration::Reused,
                        steps,
                    });
                }
                Ok(false) => steps.push(StepReport {
                    step: CleanupStep::ExistenceProbe,
                    outcome: StepOutcome::Completed,
                }),
                // Page may be mid-navigation; fall through and register.
                Err(e) => {
                    debug!("Tolerated existence probe failure for '{}': {}", name, e);
                    steps.push(StepReport {
                        step: CleanupStep::ExistenceProbe,
                        outcome: StepOutcome::Tolerated(e),
                    });
                }
            }
        }
        ExposePolicy::TolerateExisting | ExposePolicy::ForceRegister => {
            // Clear a stale `window[name]` left behind by a navigation.
            match delete_global(page, name).await {
                Ok(()) => steps.push(StepReport {
                    step: CleanupStep::GlobalDelete,
                    outcome: StepOutcome::Completed,
                }),
                Err(e) => {
                    debug!("Tolerated global delete failure for '{}': {}", name, e);
                    steps.push(StepReport {
                        step: CleanupStep::GlobalDelete,
                        outcome: StepOutcome::Tolerated(e),
                    });
                }
            }
        }
    }

    match page.expose_function(name, handler).await {
        Ok(()) => {
            debug!("Exposed '{}'", name);
            Ok(ExposeReport {
                registration: Registration::Fresh,
                steps,
            })
        }
        Err(e) if policy != ExposePolicy::ForceRegister && e.is_binding_exists() => {
            debug!("Binding '{}' already exists, reusing", name);
            Ok(ExposeReport {
                registration: Registration::Reused,
                steps,
            })
        }
        Err(e) => Err(e),
    }
}

async fn probe_bound(page: &dyn PageHandle, name: &str) -> Result<bool, CdpError> {
    let name_lit = serde_json::to_string(name)?;
    let value = page
        .evaluate(&format!("typeof window[{name_lit}] !== \"undefined\""))
        .await?;
    Ok(value.as_bool().unwrap_or(false))
}

async fn delete_global(page: &dyn PageHandle, name: &str) -> Result<(), CdpError> {
    let name_lit = serde_json::to_string(name)?;
    page.evaluate(&format!("delete window[{name_lit}]")).await?;
    Ok(())
}

#[cfg(test)]
#[path = "expose_tests.rs"]
mod tests;
