//! Asynchronous timer abstraction used for the ingestion loop's error
//! backoff. Kept as a trait so host tests can fake the passage of time.

/// Delay provider; must remain thread-safe when applicable.
pub trait BusTimer {
    /// Asynchronously wait for `millis` milliseconds.
    fn delay_ms<'a>(
        &'a mut self,
        millis: u32,
    ) -> impl core::future::Future<Output = ()> + 'a;
}
