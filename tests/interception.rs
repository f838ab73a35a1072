//! End-to-end interception tests driving the real macros, with an in-memory
//! log sink standing in for the host's log transport.

use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    sync::{Arc, Mutex},
    thread,
};

use profiled::{
    ComponentId, Config, ContractProxy, LogSink, LoggerProvider, Profiled,
    ProfilingProcessor, ToggleController, management, intercept,
};

#[derive(Clone, Default)]
struct MemorySink(Arc<Mutex<Vec<String>>>);

impl MemorySink {
    fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl LogSink for MemorySink {
    fn info(&self, line: &str) {
        self.0.lock().unwrap().push(line.to_string());
    }
}

struct MemoryLoggerProvider(MemorySink);

impl LoggerProvider for MemoryLoggerProvider {
    fn logger(&self, _component: &'static str) -> Arc<dyn LogSink> {
        Arc::new(self.0.clone())
    }
}

fn processor(management_name: &str) -> (ProfilingProcessor, MemorySink) {
    let sink = MemorySink::default();
    let processor = ProfilingProcessor::with_config(
        Config::default().with_management_name(management_name),
    )
    .unwrap()
    .with_logger_provider(Arc::new(MemoryLoggerProvider(sink.clone())));
    (processor, sink)
}

trait Pricing {
    fn quote(&self, symbol: &str, amount: i32) -> f64;
    fn refresh(&self);
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

    fn refresh(&self) {}
}

#[derive(Profiled)]
struct Tally {
    total: i64,
}

#[intercept]
impl Tally {
    pub fn add(&mut self, amount: i64) -> i64 {
        self.total += amount;
        self.total
    }
}

#[derive(Profiled)]
struct Flaky;

#[intercept]
impl Flaky {
    pub fn explode(&self) {
        panic!("boom")
    }
}

#[derive(Profiled)]
struct Switcher {
    toggle: Arc<ToggleController>,
}

#[intercept]
impl Switcher {
    pub fn enable_timing(&self) {
        self.toggle.set_enabled(true);
    }
}

fn wrap_exchange(
    processor: &ProfilingProcessor,
    id: &ComponentId,
    rate: f64,
) -> ContractProxy<Exchange> {
    processor.before_init_of::<Exchange>(id);
    let wrapped = processor
        .after_init(id, Box::new(Exchange { rate }))
        .unwrap();
    *wrapped.downcast::<ContractProxy<Exchange>>().unwrap()
}

#[test]
fn test_contract_proxy_delegates_and_logs_binding() {
    let (processor, sink) = processor("test:interception:binding");
    let proxy = wrap_exchange(&processor, &ComponentId::from("exchange"), 2.0);

    let pricing: &dyn Pricing = &proxy;
    assert_eq!(pricing.quote("BTC", 3), 6.0);

    let lines = sink.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "quote - start; symbol = BTC, amount = 3");
    assert_eq!(lines[1], "quote - end; 6");
}

#[test]
fn test_zero_parameters_and_unit_return() {
    let (processor, sink) = processor("test:interception:unit");
    let proxy = wrap_exchange(&processor, &ComponentId::from("exchange"), 1.0);

    let pricing: &dyn Pricing = &proxy;
    pricing.refresh();

    let lines = sink.lines();
    assert_eq!(lines[0], "refresh - start; ");
    assert_eq!(lines[1], "refresh - end; ");
}

#[test]
fn test_toggle_controls_timestamps() {
    let name = "test:interception:toggle";
    let (processor, sink) = processor(name);
    let proxy = wrap_exchange(&processor, &ComponentId::from("exchange"), 2.0);
    let pricing: &dyn Pricing = &proxy;

    // The operator channel finds the controller by its registered name.
    let controller = management::find(name).expect("controller registered");
    controller.set_enabled(true);
    pricing.quote("BTC", 3);

    let lines = sink.lines();
    for line in &lines {
        let millis = line
            .rsplit("profiling: ")
            .next()
            .and_then(|ts| ts.parse::<u128>().ok())
            .unwrap_or_else(|| panic!("no millisecond timestamp in '{line}'"));
        assert!(millis > 0);
    }

    controller.set_enabled(false);
    pricing.quote("BTC", 3);

    let lines = sink.lines();
    assert!(!lines[2].contains("profiling: "));
    assert!(!lines[3].contains("profiling: "));
}

#[test]
fn test_toggling_inside_a_call_affects_only_later_calls() {
    let (processor, sink) = processor("test:interception:midcall");
    let id = ComponentId::from("switcher");
    processor.before_init_of::<Switcher>(&id);
    let wrapped = processor
        .after_init(
            &id,
            Box::new(Switcher {
                toggle: processor.toggle(),
            }),
        )
        .unwrap();
    let proxy = wrapped.downcast::<SwitcherProxy>().unwrap();

    // Flips the toggle while its own call is in flight; the decision for
    // this call was already taken when the start line was written.
    proxy.enable_timing();
    proxy.enable_timing();

    let lines = sink.lines();
    assert_eq!(lines.len(), 4);
    assert!(!lines[0].contains("profiling: "));
    assert!(!lines[1].contains("profiling: "));
    assert!(lines[2].contains("profiling: "));
    assert!(lines[3].contains("profiling: "));
}

#[test]
fn test_mutable_method_interception() {
    let (processor, sink) = processor("test:interception:mut");
    let id = ComponentId::from("tally");
    processor.before_init_of::<Tally>(&id);
    let wrapped = processor
        .after_init(&id, Box::new(Tally { total: 0 }))
        .unwrap();
    let mut proxy = *wrapped.downcast::<TallyProxy>().unwrap();

    assert_eq!(proxy.add(5), 5);
    assert_eq!(proxy.add(-2), 3);

    let lines = sink.lines();
    assert_eq!(lines[0], "add - start; amount = 5");
    assert_eq!(lines[1], "add - end; 5");
    assert_eq!(lines[2], "add - start; amount = -2");
    assert_eq!(lines[3], "add - end; 3");
}

#[test]
fn test_panicking_method_writes_only_the_start_line() {
    let (processor, sink) = processor("test:interception:panic");
    let id = ComponentId::from("flaky");
    processor.before_init_of::<Flaky>(&id);
    let wrapped = processor.after_init(&id, Box::new(Flaky)).unwrap();
    let proxy = wrapped.downcast::<FlakyProxy>().unwrap();

    let result = catch_unwind(AssertUnwindSafe(|| proxy.explode()));
    assert!(result.is_err(), "panic must reach the caller");

    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0], "explode - start; ");
}

#[test]
fn test_concurrent_calls_do_not_cross_contaminate() {
    let (processor, sink) = processor("test:interception:threads");
    let proxy = Arc::new(wrap_exchange(
        &processor,
        &ComponentId::from("exchange"),
        2.0,
    ));

    let mut handles = Vec::new();
    for (symbol, amount) in [("T1", 1), ("T2", 100)] {
        let proxy = proxy.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..50 {
                let pricing: &dyn Pricing = &*proxy;
                pricing.quote(symbol, amount);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let lines = sink.lines();
    assert_eq!(lines.len(), 200);
    let count = |needle: &str| lines.iter().filter(|line| *line == needle).count();
    assert_eq!(count("quote - start; symbol = T1, amount = 1"), 50);
    assert_eq!(count("quote - end; 2"), 50);
    assert_eq!(count("quote - start; symbol = T2, amount = 100"), 50);
    assert_eq!(count("quote - end; 200"), 50);
}
