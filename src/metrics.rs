use prometheus::{Counter, Encoder, Opts, Registry, TextEncoder};

pub struct CartMetrics {
    registry: Registry,
    pub add_to_cart_attempts: Counter,
    pub add_to_cart_rejections: Counter,
    pub add_to_cart_transport_failures: Counter,
    pub update_cart_quantity_attempts: Counter,
    pub update_cart_quantity_rejections: Counter,
    pub update_cart_quantity_transport_failures: Counter,
}

impl CartMetrics {
    pub fn new() -> CartMetrics {
        let registry = Registry::new();

        let add_to_cart_attempts = register_counter(&registry,
            "add_to_cart_attempts_total", "Add to cart calls started");
        let add_to_cart_rejections = register_counter(&registry,
            "add_to_cart_rejections_total", "Add to cart calls the backend answered with success false");
        let add_to_cart_transport_failures = register_counter(&registry,
            "add_to_cart_transport_failures_total", "Add to cart calls that failed to reach the backend or to parse");
        let update_cart_quantity_attempts = register_counter(&registry,
            "update_cart_quantity_attempts_total", "Update cart quantity calls started");
        let update_cart_quantity_rejections = register_counter(&registry,
            "update_cart_quantity_rejections_total", "Update cart quantity calls the backend answered with success false");
        let update_cart_quantity_transport_failures = register_counter(&registry,
            "update_cart_quantity_transport_failures_total", "Update cart quantity calls that failed to reach the backend or to parse");

        CartMetrics {
            registry: registry,
            add_to_cart_attempts: add_to_cart_attempts,
            add_to_cart_rejections: add_to_cart_rejections,
            add_to_cart_transport_failures: add_to_cart_transport_failures,
            update_cart_quantity_attempts: update_cart_quantity_attempts,
            update_cart_quantity_rejections: update_cart_quantity_rejections,
            update_cart_quantity_transport_failures: update_cart_quantity_transport_failures,
        }
    }

    pub fn render(&self) -> String {
        let mut buffer = vec![];
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder.encode(&metric_families, &mut buffer).unwrap();

        String::from_utf8(buffer).unwrap()
    }
}

// Metric names are static and valid, registration on a fresh registry cannot
// collide.
fn register_counter(registry: &Registry, name: &str, help_text: &str) -> Counter {
    let counter = Counter::with_opts(Opts::new(name, help_text)).unwrap();
    registry.register(Box::new(counter.clone())).unwrap();
    counter
}
