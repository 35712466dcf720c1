//! Command-string composition for server administration.
//!
//! Every console command the client ever sends is built here, as a pure
//! function over strings, so the facade and the tests agree on the exact
//! text that crosses the wire.

/// Priming commands that must run, in this order, before a bot can be added.
///
/// Cheats have to be enabled before the bot behaviour flags take effect, so
/// the ordering is part of the contract, not a style choice.
pub const BOT_PRIMING: [&str; 6] = [
    "sv_cheats 1",
    "bot_difficulty 3",
    "bot_stop 0",
    "bot_zombie 0",
    "bot_freeze 0",
    "ai_disable 0",
];

/// Kicks every bot from the server.
pub const BOT_KICK: &str = "bot_kick";

/// The read-only battery issued by the info aggregator, in issue order.
pub const INFO_BATTERY: [&str; 5] = ["status", "sv_password", "game_type", "game_mode", "host_map"];

/// Which side a bot joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotTeam {
    Terrorist,
    CounterTerrorist,
}

impl BotTeam {
    /// The console suffix for this team.
    pub fn suffix(self) -> &'static str {
        match self {
            BotTeam::Terrorist => "t",
            BotTeam::CounterTerrorist => "ct",
        }
    }
}

/// `changelevel <map>`.
pub fn change_level(map: &str) -> String {
    format!("changelevel {map}")
}

/// Builds the mode-change chain: the mode command, optionally followed by a
/// map directive, joined by `"; "` into a single console line.
///
/// A map argument of the form `workshop/<id>/<name>` is rewritten to
/// `host_workshop_map <id>`; a workshop path with no id segment falls back
/// to a plain `map` directive.
pub fn mode_chain(mode_cmd: &str, map: Option<&str>) -> String {
    let mut cmds = vec![mode_cmd.to_string()];
    if let Some(map) = map {
        cmds.push(map_directive(map));
    }
    cmds.join("; ")
}

/// `map <arg>`, or `host_workshop_map <id>` for workshop paths.
pub fn map_directive(map: &str) -> String {
    if let Some(rest) = map.strip_prefix("workshop/") {
        if let Some((id, _)) = rest.split_once('/') {
            return format!("host_workshop_map {id}");
        }
    }
    format!("map {map}")
}

/// `kick "<name>"`.
///
/// The name is embedded verbatim inside the quotes; embedded quote
/// characters are not escaped. Adversarial names can therefore break the
/// command string — a known gap left open until the console's quoting rules
/// for this case are pinned down.
pub fn kick(name: &str) -> String {
    format!("kick \"{name}\"")
}

/// `bot_add_t` / `bot_add_ct`.
pub fn bot_add(team: BotTeam) -> String {
    format!("bot_add_{}", team.suffix())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
