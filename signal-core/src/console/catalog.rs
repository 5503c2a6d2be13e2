//! Command table shared by the parser and the help output.
//!
//! Keywords, aliases, usage strings and summaries live in one place so the
//! grammar and `help` can never disagree.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandTag {
    Advance,
    Pedestrian,
    Rate,
    Status,
    Tick,
    Help,
}

/// Shape of the single optional argument a command accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgumentSpec {
    None,
    Optional(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub tag: CommandTag,
    pub argument: ArgumentSpec,
    pub usage: &'static str,
    pub summary: &'static str,
}

impl CommandSpec {
    /// Returns `true` when `keyword` names this command, ignoring ASCII case.
    #[must_use]
    pub fn matches(&self, keyword: &str) -> bool {
        self.name.eq_ignore_ascii_case(keyword)
            || self
                .aliases
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(keyword))
    }
}

const COMMANDS: [CommandSpec; 6] = [
    CommandSpec {
        name: "advance",
        aliases: &["mode"],
        tag: CommandTag::Advance,
        argument: ArgumentSpec::None,
        usage: "advance",
        summary: "cycle normal -> flashing-red -> flashing-yellow",
    },
    CommandSpec {
        name: "pedestrian",
        aliases: &["ped"],
        tag: CommandTag::Pedestrian,
        argument: ArgumentSpec::None,
        usage: "pedestrian",
        summary: "request a pedestrian hold at the next yellow exit",
    },
    CommandSpec {
        name: "rate",
        aliases: &[],
        tag: CommandTag::Rate,
        argument: ArgumentSpec::Optional("hz"),
        usage: "rate [hz]",
        summary: "show the tick rate, or set it to 1-9 Hz",
    },
    CommandSpec {
        name: "status",
        aliases: &[],
        tag: CommandTag::Status,
        argument: ArgumentSpec::None,
        usage: "status",
        summary: "print mode, rate and lamp states",
    },
    CommandSpec {
        name: "tick",
        aliases: &[],
        tag: CommandTag::Tick,
        argument: ArgumentSpec::Optional("count"),
        usage: "tick [count]",
        summary: "run 1-100 ticks by hand (default 1)",
    },
    CommandSpec {
        name: "help",
        aliases: &[],
        tag: CommandTag::Help,
        argument: ArgumentSpec::Optional("topic"),
        usage: "help [command]",
        summary: "list commands or describe one",
    },
];

/// Every command in help order.
#[must_use]
pub fn commands() -> &'static [CommandSpec] {
    &COMMANDS
}

/// Looks up a command by name or alias.
#[must_use]
pub fn find(keyword: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.matches(keyword))
}
