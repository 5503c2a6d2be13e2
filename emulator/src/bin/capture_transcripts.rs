use std::io;
use std::path::Path;

#[allow(dead_code)]
#[path = "../session.rs"]
mod session;

use session::{Session, SessionOptions};

const TRANSCRIPT_DIR: &str = "transcripts";

/// Scripted console sessions replayed with manual ticks.
const SCENARIOS: &[(&str, &[&str])] = &[
    (
        "normal-cycle",
        &["status", "tick 3", "status", "tick", "status", "tick 2", "status"],
    ),
    (
        "pedestrian-hold",
        &["tick", "pedestrian", "tick 3", "status", "tick 5", "status", "tick", "status"],
    ),
    (
        "modes-and-rate",
        &[
            "advance",
            "tick 2",
            "status",
            "pedestrian",
            "advance",
            "tick",
            "status",
            "rate 9",
            "rate 0",
            "rate fast",
            "rate",
            "advance",
            "tick 3",
            "status",
            "help",
            "help rate",
        ],
    ),
];

fn main() -> io::Result<()> {
    for (name, script) in SCENARIOS {
        record_scenario(name, script)?;
    }
    Ok(())
}

fn record_scenario(name: &str, script: &[&str]) -> io::Result<()> {
    let path = Path::new(TRANSCRIPT_DIR).join(format!("{name}.log"));
    let options = SessionOptions {
        manual: true,
        transcript: Some(&path),
        ..SessionOptions::default()
    };

    let mut session = Session::new(&options)?;
    for line in script {
        let _ = session.handle_command(line)?;
    }
    session.shutdown()?;

    println!("wrote {}", path.display());
    Ok(())
}
