//! Request-scoped propagation of the intercepted hook.
//!
//! The hook is stored in [`http::Extensions`] under a private newtype, so no
//! other code can read or overwrite it by type.

use http::Extensions;
use scm_hooks::Webhook;

#[derive(Clone)]
struct InterceptedHook(Webhook);

/// Attach `hook` to `extensions`, returning any hook attached earlier.
///
/// Attaching twice replaces the earlier hook.
pub fn with_hook(extensions: &mut Extensions, hook: Webhook) -> Option<Webhook> {
    extensions
        .insert(InterceptedHook(hook))
        .map(|InterceptedHook(previous)| previous)
}

/// The hook attached by an interceptor, if any.
pub fn intercepted_hook(extensions: &Extensions) -> Option<&Webhook> {
    extensions
        .get::<InterceptedHook>()
        .map(|InterceptedHook(hook)| hook)
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
