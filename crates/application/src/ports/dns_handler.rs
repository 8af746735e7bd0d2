use crate::use_cases::DnsResult;

/// Owner-side notification for a [`DnsResult`].
///
/// Called once per transition into `Available` or `Finished`. Invoked on the
/// thread that drives the dispatcher, never while the resolver holds internal
/// borrows, so implementations may call `available()` and `next()` directly.
pub trait DnsHandler {
    fn handle(&self, result: &DnsResult);
}
