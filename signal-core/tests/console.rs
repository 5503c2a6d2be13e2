use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use signal_core::console::{ConsoleError, ConsoleExecutor, ConsoleOutcome, ConsoleParseError};
use signal_core::controller::{Mode, SharedController};
use signal_core::rate::{RateError, RateParseError};

type Controller = SharedController<NoopRawMutex>;

/// Runs console lines, ticking the controller whenever a `tick` is requested.
fn run_script(controller: &Controller, lines: &[&str]) -> Vec<String> {
    let executor = ConsoleExecutor::new(controller);
    let mut replies = Vec::new();

    for line in lines {
        match executor.execute(line) {
            Ok(ConsoleOutcome::TickRequested(count)) => {
                for _ in 0..count {
                    controller.tick();
                }
                replies.push(format!("ticked {count}"));
            }
            Ok(outcome) => replies.push(outcome.to_string()),
            Err(err) => replies.push(format!("error: {err}")),
        }
    }

    replies
}

#[test]
fn scripted_session_matches_expected_replies() {
    let controller = Controller::new();
    let replies = run_script(
        &controller,
        &["tick 3", "status", "rate 4", "advance", "ped", "bogus"],
    );

    assert_eq!(
        replies,
        [
            "ticked 3",
            "mode: normal\nrate: 1 Hz\nlights: red off, yellow off, green on",
            "rate set to 4 Hz (250 ms)",
            "mode: flashing-red",
            "pedestrian request dropped (flashing-red)",
            "error: unknown command `bogus` (try `help`)",
        ]
    );
}

#[test]
fn rate_write_errors_keep_previous_rate() {
    let controller = Controller::new();
    let executor = ConsoleExecutor::new(&controller);

    executor.execute("rate 3").expect("3 Hz accepted");
    assert_eq!(
        executor.execute("rate 10"),
        Err(ConsoleError::Rate(RateError::OutOfRange { requested: 10 }))
    );
    assert_eq!(
        executor.execute("rate 12345678901"),
        Err(ConsoleError::Rate(RateError::Parse(RateParseError::TooLong {
            len: 11
        })))
    );
    assert_eq!(controller.period_ms(), 333);
}

#[test]
fn pedestrian_via_console_extends_cycle() {
    let controller = Controller::new();
    run_script(&controller, &["ped", "tick 4"]);

    let replies = run_script(&controller, &["tick 5", "status"]);
    assert_eq!(
        replies[1],
        "mode: normal\nrate: 1 Hz\nlights: red on, yellow on, green off"
    );

    run_script(&controller, &["tick"]);
    assert!(run_script(&controller, &["status"])[0].ends_with("green on"));
}

#[test]
fn parse_errors_are_reported_without_side_effects() {
    let controller = Controller::new();
    let executor = ConsoleExecutor::new(&controller);

    assert_eq!(
        executor.execute("advance twice"),
        Err(ConsoleError::Parse(ConsoleParseError::UnexpectedArgument {
            command: "advance",
            found: "twice",
        }))
    );
    assert_eq!(controller.snapshot().mode, Mode::Normal);
    assert_eq!(
        executor.execute("tick 500"),
        Err(ConsoleError::Parse(ConsoleParseError::InvalidTickCount("500")))
    );
}
