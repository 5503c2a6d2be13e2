mod session;

use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use session::{Session, SessionOptions};

const USAGE: &str =
    "Usage: signal-emulator [--manual] [--rate <1-9>] [--trace] [--transcript <path>]";

#[derive(Debug, Default, PartialEq, Eq)]
struct EmulatorArgs {
    manual: bool,
    rate: Option<String>,
    trace: bool,
    transcript: Option<PathBuf>,
}

impl EmulatorArgs {
    fn options(&self) -> SessionOptions<'_> {
        SessionOptions {
            manual: self.manual,
            rate: self.rate.as_deref(),
            trace: self.trace,
            transcript: self.transcript.as_deref(),
        }
    }
}

fn main() -> io::Result<()> {
    let args = parse_args(env::args().skip(1)).unwrap_or_else(|err| {
        eprintln!("{err}");
        eprintln!("{USAGE}");
        process::exit(2);
    });

    let mut session = Session::new(&args.options()).unwrap_or_else(|err| {
        eprintln!("{err}");
        process::exit(2);
    });

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let stdout = io::stdout();
    let mut line = String::new();

    {
        let mut writer = stdout.lock();
        writeln!(
            writer,
            "Traffic signal emulator ready ({} ticks). Type `help` for commands or `exit` to quit.",
            if session.is_manual() { "manual" } else { "automatic" }
        )?;
    }

    loop {
        line.clear();
        {
            let mut writer = stdout.lock();
            write!(writer, "> ")?;
            writer.flush()?;
        }

        let bytes_read = reader.read_line(&mut line)?;
        if bytes_read == 0 {
            writeln!(stdout.lock())?;
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if should_terminate(trimmed) {
            writeln!(stdout.lock(), "Session closed.")?;
            break;
        }

        let responses = session.handle_command(trimmed)?;
        let mut writer = stdout.lock();
        for response in responses {
            writeln!(writer, "{response}")?;
        }
    }

    session.shutdown()
}

fn should_terminate(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}

fn parse_args<I>(args: I) -> Result<EmulatorArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = EmulatorArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        if arg == "--manual" {
            parsed.manual = true;
        } else if arg == "--trace" {
            parsed.trace = true;
        } else if let Some(value) = arg.strip_prefix("--rate=") {
            parsed.rate = Some(value.to_string());
        } else if arg == "--rate" {
            let value = args.next().ok_or("Expected value after --rate")?;
            parsed.rate = Some(value);
        } else if let Some(value) = arg.strip_prefix("--transcript=") {
            parsed.transcript = Some(PathBuf::from(value));
        } else if arg == "--transcript" {
            let value = args.next().ok_or("Expected path after --transcript")?;
            parsed.transcript = Some(PathBuf::from(value));
        } else {
            return Err(format!("Unknown argument `{arg}`"));
        }
    }

    Ok(parsed)
}
