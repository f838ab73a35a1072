//! A tiny host container wired to the profiling layer.
//!
//! Two components get constructed: one exposing a public contract (wrapped
//! through contract delegation) and one without (wrapped through concrete
//! mirroring). Every call is logged; after the operator flips the toggle
//! through the management registry, the same calls also carry start/end
//! timestamps.
//!
//! Run with `cargo run --example exchange`.

use profiled::{
    ComponentId, ContractProxy, Profiled, ProfilingProcessor, management, intercept,
};

trait Pricing {
    fn quote(&self, symbol: &str, amount: i32) -> f64;
}

#[derive(Profiled)]
#[profiled(contracts(Pricing))]
struct Exchange {
    rate: f64,
}

#[intercept]
impl Pricing for Exchange {
    fn quote(&self, symbol: &str, amount: i32) -> f64 {
        let _ = symbol;
        self.rate * f64::from(amount)
    }
}

#[derive(Profiled)]
struct Audit;

#[intercept]
impl Audit {
    pub fn note(&self, entry: &str) {
        let _ = entry;
    }
}

fn main() -> profiled::Result {
    tracing_subscriber::fmt().init();

    let processor = ProfilingProcessor::new()?;

    // The host constructs its components and runs each through the hooks;
    // the value returned by after_init replaces the original reference.
    let exchange_id = ComponentId::from("exchange");
    processor.before_init_of::<Exchange>(&exchange_id);
    let exchange = processor.after_init(&exchange_id, Box::new(Exchange { rate: 64000.5 }))?;
    let exchange = exchange
        .downcast::<ContractProxy<Exchange>>()
        .expect("exchange wraps by contract");
    let pricing: &dyn Pricing = &*exchange;

    let audit_id = ComponentId::from("audit");
    processor.before_init_of::<Audit>(&audit_id);
    let audit = processor.after_init(&audit_id, Box::new(Audit))?;
    let audit = audit
        .downcast::<AuditProxy>()
        .expect("audit wraps concretely");

    pricing.quote("BTC", 2);
    audit.note("quote served");

    // An operator finds the controller by its well-known name and turns
    // latency capture on; no restart involved.
    let controller = management::find(management::CONTROLLER_NAME).expect("controller registered");
    controller.set_enabled(true);

    pricing.quote("ETH", 5);
    audit.note("quote served with latency capture");

    Ok(())
}
