// Tracing setup shared by the library consumers and the test suite
//

use tracing::{subscriber::set_global_default, Subscriber};
use tracing_log::LogTracer;
use tracing_subscriber::{
    filter,
    layer::{Layer, SubscriberExt},
    EnvFilter, Registry,
};

/// Builder for the global subscriber. The embedding program decides when
/// to install it; the conf `log.pretty` flag maps onto [`Self::pretty`].
#[derive(Default)]
pub struct TracingSubscriber {
    pretty: bool,
}

impl TracingSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty(mut self, value: bool) -> Self {
        self.pretty = value;
        self
    }

    pub fn set_global_default(self) {
        LogTracer::init().expect("Failed to set logger");
        set_global_default(self.build()).expect("Failed to set subscriber");
    }

    fn build(self) -> Box<dyn Subscriber + Sync + Send> {
        let env_filter = EnvFilter::try_from_default_env()
            // RUST_LOG unset, fall back
            .or_else(|_| EnvFilter::try_new("debug"))
            .expect("correct RUST_LOG");

        // reqwest and the hyper underneath it are chatty below INFO
        let target_filter = filter::Targets::new()
            .with_target("datalayer", tracing::Level::DEBUG)
            .with_target("reqwest", tracing::Level::INFO)
            .with_target("hyper", tracing::Level::INFO)
            .with_default(tracing::Level::TRACE);

        let fmt_layer = if self.pretty {
            tracing_subscriber::fmt::layer().pretty().boxed()
        } else {
            tracing_subscriber::fmt::layer().boxed()
        };

        Box::new(
            Registry::default().with(fmt_layer.with_filter(env_filter).with_filter(target_filter)),
        )
    }
}

/// Runs argon2 and friends off the async runtime, inside the current span.
pub fn spawn_blocking_with_tracing<F, R>(f: F) -> tokio::task::JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let current_span = tracing::Span::current();
    tokio::task::spawn_blocking(move || current_span.in_scope(f))
}
