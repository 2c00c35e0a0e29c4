/// Routing seam. The session calls this after every logout, explicit or forced.
pub trait Navigator: Send + Sync + 'static {
    /// Go to the sign-in screen. Must tolerate being called when already there.
    fn to_entry(&self);
}

/// For headless use where there is no screen to return to.
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn to_entry(&self) {}
}
