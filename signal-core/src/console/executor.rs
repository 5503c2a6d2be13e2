//! Applies parsed console commands to a [`SharedController`].
//!
//! Every outcome renders through `Display` so the emulator and the capture
//! tool print identical replies. `tick` is never executed here: the executor
//! hands the count back and the front-end's tick source runs it, keeping a
//! single owner of the tick path.

use core::fmt;

use embassy_sync::blocking_mutex::raw::RawMutex;

use super::catalog::{self, ArgumentSpec, CommandSpec};
use super::grammar::{self, ConsoleCommand, ConsoleParseError};
use crate::controller::{Mode, SharedController};
use crate::rate::{RateConfig, RateError};
use crate::status::{StatusFormatter, StatusSnapshot};

/// Help page selected by `help [topic]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HelpTopic {
    Overview,
    Command(&'static CommandSpec),
}

/// Command execution successes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleOutcome {
    ModeAdvanced(Mode),
    PedestrianLatched,
    PedestrianDropped(Mode),
    Rate(RateConfig),
    RateUpdated(RateConfig),
    Status(StatusSnapshot),
    /// Front-end should run this many ticks through its tick source.
    TickRequested(u8),
    Help(HelpTopic),
}

impl fmt::Display for ConsoleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleOutcome::ModeAdvanced(mode) => write!(f, "mode: {mode}"),
            ConsoleOutcome::PedestrianLatched => f.write_str("pedestrian request latched"),
            ConsoleOutcome::PedestrianDropped(mode) => {
                write!(f, "pedestrian request dropped ({mode})")
            }
            ConsoleOutcome::Rate(rate) => write!(
                f,
                "rate: {} Hz ({} ms)",
                rate.current_hz(),
                rate.period_ms()
            ),
            ConsoleOutcome::RateUpdated(rate) => write!(
                f,
                "rate set to {} Hz ({} ms)",
                rate.current_hz(),
                rate.period_ms()
            ),
            ConsoleOutcome::Status(snapshot) => {
                let formatter = StatusFormatter::new(snapshot);
                formatter.write_mode_line(f)?;
                f.write_str("\n")?;
                formatter.write_rate_line(f)?;
                f.write_str("\n")?;
                formatter.write_lights_line(f)
            }
            ConsoleOutcome::TickRequested(count) => write!(f, "ticking x{count}"),
            ConsoleOutcome::Help(HelpTopic::Overview) => {
                f.write_str("commands:")?;
                for spec in catalog::commands() {
                    write!(f, "\n  {:<16}{}", spec.usage, spec.summary)?;
                }
                Ok(())
            }
            ConsoleOutcome::Help(HelpTopic::Command(spec)) => {
                write!(f, "usage: {}\n  {}", spec.usage, spec.summary)?;
                if !spec.aliases.is_empty() {
                    f.write_str("\n  aliases:")?;
                    for alias in spec.aliases {
                        write!(f, " {alias}")?;
                    }
                }
                if let ArgumentSpec::Optional(name) = spec.argument {
                    write!(f, "\n  argument: <{name}> (optional)")?;
                }
                Ok(())
            }
        }
    }
}

/// Errors surfaced while executing a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleError<'a> {
    Parse(ConsoleParseError<'a>),
    Rate(RateError),
    UnknownTopic(&'a str),
}

impl fmt::Display for ConsoleError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::Parse(err) => fmt::Display::fmt(err, f),
            ConsoleError::Rate(err) => fmt::Display::fmt(err, f),
            ConsoleError::UnknownTopic(topic) => write!(f, "no help for `{topic}`"),
        }
    }
}

impl<'a> From<ConsoleParseError<'a>> for ConsoleError<'a> {
    fn from(error: ConsoleParseError<'a>) -> Self {
        Self::Parse(error)
    }
}

impl From<RateError> for ConsoleError<'_> {
    fn from(error: RateError) -> Self {
        Self::Rate(error)
    }
}

/// Dispatches console commands into the controller.
pub struct ConsoleExecutor<'c, M: RawMutex> {
    controller: &'c SharedController<M>,
}

impl<'c, M: RawMutex> ConsoleExecutor<'c, M> {
    #[must_use]
    pub const fn new(controller: &'c SharedController<M>) -> Self {
        Self { controller }
    }

    #[must_use]
    pub const fn controller(&self) -> &'c SharedController<M> {
        self.controller
    }

    /// Parses and executes a console line.
    pub fn execute<'a>(&self, line: &'a str) -> Result<ConsoleOutcome, ConsoleError<'a>> {
        let command = grammar::parse(line)?;
        self.dispatch(command)
    }

    fn dispatch<'a>(
        &self,
        command: ConsoleCommand<'a>,
    ) -> Result<ConsoleOutcome, ConsoleError<'a>> {
        match command {
            ConsoleCommand::Advance => Ok(ConsoleOutcome::ModeAdvanced(
                self.controller.advance_mode(),
            )),
            ConsoleCommand::Pedestrian => Ok(match self.controller.request_pedestrian() {
                Ok(()) => ConsoleOutcome::PedestrianLatched,
                Err(mode) => ConsoleOutcome::PedestrianDropped(mode),
            }),
            ConsoleCommand::RateQuery => Ok(ConsoleOutcome::Rate(
                self.controller.with_state(|state| *state.rate()),
            )),
            ConsoleCommand::RateWrite(payload) => {
                let rate = self.controller.write_rate(payload.as_bytes())?;
                Ok(ConsoleOutcome::RateUpdated(rate))
            }
            ConsoleCommand::Status => Ok(ConsoleOutcome::Status(self.controller.snapshot())),
            ConsoleCommand::Tick(count) => Ok(ConsoleOutcome::TickRequested(count)),
            ConsoleCommand::Help(None) => Ok(ConsoleOutcome::Help(HelpTopic::Overview)),
            ConsoleCommand::Help(Some(topic)) => catalog::find(topic)
                .map(|spec| ConsoleOutcome::Help(HelpTopic::Command(spec)))
                .ok_or(ConsoleError::UnknownTopic(topic)),
        }
    }
}

#[cfg(test)]
mod tests {
    use core::fmt::Write;

    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use heapless::String;

    use super::*;
    use crate::rate::RateParseError;

    type Controller = SharedController<NoopRawMutex>;

    fn render(outcome: &ConsoleOutcome) -> String<512> {
        let mut out = String::new();
        write!(out, "{outcome}").unwrap();
        out
    }

    #[test]
    fn advance_reports_new_mode() {
        let controller = Controller::new();
        let executor = ConsoleExecutor::new(&controller);

        let outcome = executor.execute("advance").unwrap();
        assert_eq!(outcome, ConsoleOutcome::ModeAdvanced(Mode::FlashRed));
        assert_eq!(render(&outcome).as_str(), "mode: flashing-red");
    }

    #[test]
    fn pedestrian_outcome_reflects_mode() {
        let controller = Controller::new();
        let executor = ConsoleExecutor::new(&controller);

        assert_eq!(
            executor.execute("ped"),
            Ok(ConsoleOutcome::PedestrianLatched)
        );
        executor.execute("mode").unwrap();
        assert_eq!(
            executor.execute("pedestrian"),
            Ok(ConsoleOutcome::PedestrianDropped(Mode::FlashRed))
        );
    }

    #[test]
    fn rate_write_goes_through_payload_decoder() {
        let controller = Controller::new();
        let executor = ConsoleExecutor::new(&controller);

        let outcome = executor.execute("rate 9").unwrap();
        assert_eq!(render(&outcome).as_str(), "rate set to 9 Hz (111 ms)");

        assert_eq!(
            executor.execute("rate 0"),
            Err(ConsoleError::Rate(RateError::OutOfRange { requested: 0 }))
        );
        assert_eq!(
            executor.execute("rate 5hz"),
            Err(ConsoleError::Rate(RateError::Parse(RateParseError::Malformed)))
        );

        let outcome = executor.execute("rate").unwrap();
        assert_eq!(render(&outcome).as_str(), "rate: 9 Hz (111 ms)");
    }

    #[test]
    fn tick_is_deferred_to_front_end() {
        let controller = Controller::new();
        let executor = ConsoleExecutor::new(&controller);

        assert_eq!(
            executor.execute("tick 5"),
            Ok(ConsoleOutcome::TickRequested(5))
        );
        assert_eq!(controller.with_state(|state| state.ticks()), 0);
    }

    #[test]
    fn status_renders_without_trailing_newline() {
        let controller = Controller::new();
        controller.tick();
        let executor = ConsoleExecutor::new(&controller);

        let outcome = executor.execute("status").unwrap();
        assert_eq!(
            render(&outcome).as_str(),
            "mode: normal\nrate: 1 Hz\nlights: red off, yellow off, green on"
        );
    }

    #[test]
    fn help_lists_commands_and_topics() {
        let controller = Controller::new();
        let executor = ConsoleExecutor::new(&controller);

        let overview = render(&executor.execute("help").unwrap());
        for spec in catalog::commands() {
            assert!(overview.contains(spec.usage));
        }

        let topic = render(&executor.execute("help ped").unwrap());
        assert!(topic.starts_with("usage: pedestrian"));
        assert!(topic.contains("aliases: ped"));

        assert_eq!(
            executor.execute("help reboot"),
            Err(ConsoleError::UnknownTopic("reboot"))
        );
    }
}
