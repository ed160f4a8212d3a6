// In-process tests of the run driver against captured output.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use miette::IntoDiagnostic;
use vouch::{expect, expect_eq, expect_gt, fixture, here, run_all, Capture, Config, Registry, Sink};

fn config(pattern: &str, level: i64) -> (Config, Capture) {
    let (sink, capture) = Sink::capture();
    let config = Config::default()
        .with_pattern(pattern)
        .unwrap()
        .with_verbosity(level)
        .with_sink(sink);
    (config, capture)
}

#[test]
fn failing_fixture_is_framed_and_summarized() {
    let mut registry = Registry::new();
    let fixture_line = line!() + 1;
    fixture!(registry, sums, || {
        expect_eq!(2 + 2, 4);
        expect_eq!(1 + 1, 3);
    });
    let (config, capture) = config(".*", 1);

    let report = run_all(&registry, &config).unwrap();

    assert!(!report.ok);
    assert_eq!(report.tally.failed, 1);
    assert_eq!(
        capture.lines(),
        [
            format!("{}:{fixture_line}; begin sums", file!()),
            format!("  {}:{}; FAIL; expect_eq!(1 + 1, 3)", file!(), fixture_line + 2),
            "end sums; FAIL".to_string(),
            "passed 0; failed 1; skipped 0; FAIL".to_string(),
        ]
    );
}

#[test]
fn unmatched_fixtures_are_never_invoked() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = Registry::new();
    for name in ["alpha", "beta", "alphabet"] {
        let calls = Arc::clone(&calls);
        registry.register(here!(), name, move || {
            calls.fetch_add(1, Ordering::SeqCst);
        });
    }
    let (config, capture) = config("alpha", 1);

    let report = run_all(&registry, &config).unwrap();

    assert!(report.ok);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!((report.tally.passed, report.tally.skipped), (1, 2));
    assert_eq!(capture.contents(), "passed 1; failed 0; skipped 2; PASS\n");
}

#[test]
fn fixtures_run_in_registration_order() {
    let order = Arc::new(std::sync::Mutex::new(Vec::new()));
    let mut registry = Registry::new();
    for name in ["third", "first", "second"] {
        let order = Arc::clone(&order);
        registry.register(here!(), name, move || {
            order.lock().unwrap().push(name);
        });
    }
    let (config, _) = config(".*", 0);
    run_all(&registry, &config).unwrap();
    assert_eq!(*order.lock().unwrap(), ["third", "first", "second"]);
}

#[test]
fn rerunning_a_registry_gives_identical_output() {
    let mut registry = Registry::new();
    fixture!(registry, steady, || {
        let items = vec![1, 2, 3];
        expect_eq!(items.len(), 4);
        expect_gt!(items[0], 0);
    });

    let (first_config, first) = config(".*", 2);
    let (second_config, second) = config(".*", 2);
    let a = run_all(&registry, &first_config).unwrap();
    let b = run_all(&registry, &second_config).unwrap();

    assert_eq!(a, b);
    assert_eq!(first.contents(), second.contents());
    assert!(first.contents().contains("items.len()=3"));
}

#[test]
fn strict_and_normal_verdicts_differ_on_empty_runs() {
    let mut registry = Registry::new();
    fixture!(registry, only, || {});

    let (normal, _) = config("none", 1);
    assert!(run_all(&registry, &normal).unwrap().ok);

    let (strict, capture) = config("none", 0);
    let strict = strict.with_strict(true);
    let report = run_all(&registry, &strict).unwrap();
    assert!(!report.ok);
    assert_eq!(capture.contents(), "passed 0; failed 0; skipped 1; FAIL\n");
}

#[test]
fn quiet_success_prints_nothing() {
    let mut registry = Registry::new();
    fixture!(registry, fine, || {});
    let (quiet, capture) = config(".*", 0);
    assert!(run_all(&registry, &quiet).unwrap().ok);
    assert_eq!(capture.contents(), "");
}

#[test]
fn faults_fail_the_fixture_without_stopping_the_run() {
    let mut registry = Registry::new();
    fixture!(registry, parses, || -> miette::Result<()> {
        let value: u32 = "x1".parse().into_diagnostic()?;
        expect_eq!(value, 1);
        Ok(())
    });
    fixture!(registry, afterwards, || {
        expect!(true);
    });
    let (config, capture) = config(".*", 1);

    let report = run_all(&registry, &config).unwrap();

    assert_eq!((report.tally.passed, report.tally.failed), (1, 1));
    let lines = capture.lines();
    assert_eq!(lines.len(), 4, "{lines:?}");
    assert!(lines[0].ends_with("; begin parses"));
    assert!(lines[1].starts_with("  exception; invalid digit found in string"));
    assert_eq!(lines[2], "end parses; FAIL");
    assert_eq!(lines[3], "passed 1; failed 1; skipped 0; FAIL");
}

#[test]
fn unfinished_fixture_fails_and_the_run_goes_on() {
    let mut registry = Registry::new();
    fixture!(registry, unfinished, { todo!() });
    fixture!(registry, half_done, {
        expect!(true);
        unimplemented!("second half");
    });
    fixture!(registry, done, {
        expect_eq!(1 + 1, 2);
    });
    let (config, capture) = config(".*", 1);

    let report = run_all(&registry, &config).unwrap();

    assert_eq!((report.tally.passed, report.tally.failed), (1, 2));
    let text = capture.contents();
    assert!(text.contains("  exception; not yet implemented\nend unfinished; FAIL\n"), "{text}");
    assert!(
        text.contains("  exception; not implemented: second half\nend half_done; FAIL\n"),
        "{text}"
    );
    assert!(text.ends_with("passed 1; failed 2; skipped 0; FAIL\n"), "{text}");
}

#[test]
fn running_a_fixture_from_a_fixture_is_a_fault() {
    let mut inner = Registry::new();
    fixture!(inner, inner_fixture, || {});
    let inner = Arc::new(inner);

    let mut outer = Registry::new();
    fixture!(outer, outer_fixture, move || -> miette::Result<()> {
        let nested = Config::default().with_verbosity(0);
        for fixture in inner.iter() {
            fixture.invoke(&nested)?;
        }
        Ok(())
    });
    let (config, capture) = config(".*", 0);

    let report = run_all(&outer, &config).unwrap();

    assert!(!report.ok);
    assert!(capture.contents().contains(
        "  exception; cannot run fixture `inner_fixture` while fixture `outer_fixture` is running"
    ));
}

#[test]
fn duplicate_names_are_all_run() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = Registry::new();
    for _ in 0..2 {
        let calls = Arc::clone(&calls);
        registry.register(here!(), "twin", move || {
            calls.fetch_add(1, Ordering::SeqCst);
        });
    }
    let (config, capture) = config("twin", 1);
    let report = run_all(&registry, &config).unwrap();
    assert_eq!(report.tally.passed, 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(capture.contents(), "passed 2; failed 0; skipped 0; PASS\n");
}
