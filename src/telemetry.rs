//! Telemetry helpers for applications embedding `candle-chart`.
//!
//! Tracing setup stays explicit and opt-in: the engine only emits events
//! (viewport commits at `debug`, render passes at `trace`), and hosts
//! either call [`init_default_tracing`] or wire their own subscriber.

/// Initializes a default `tracing` subscriber when the `telemetry` feature is enabled.
///
/// `RUST_LOG` wins when set; otherwise only this crate's events at `debug`
/// and above are emitted. Returns `true` when initialization succeeds and
/// `false` when the feature is disabled or a global subscriber was already
/// installed by the host application.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("candle_chart=debug")),
            )
            .with_target(false)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
