use hzn_domain::RunContext;
use hzn_logger::Logger;

#[test]
fn console_context_has_no_file_guard() {
    let logger = Logger::for_context("integration-console-only", RunContext::Console, None)
        .init()
        .expect("logger should initialize");

    assert!(logger.guard().is_none(), "console-only logger should not create a file guard");
}
