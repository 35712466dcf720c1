//! Domain operations composed from session round trips.
//!
//! Every public operation here runs one or more full
//! connect → authenticate → execute → close cycles and never leaves a
//! session open, whichever branch it exits through.
//!
//! Two API levels are exposed:
//!
//! - [`RconClient::run`] returns a typed `Result` for callers that want to
//!   branch on [`SessionError`].
//! - [`RconClient::execute`] and the named operations never fail: every
//!   internal error is folded into a textual result carrying the literal
//!   substring `"Error"`. Chat-bot front ends branch on that substring, so
//!   the contract is: successful results are the server's text verbatim
//!   (trimmed) and are never given an `Error` prefix by this layer.

use rcon_core::command;
use rcon_core::command::BotTeam;
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::session::{Session, SessionError};

/// Stateless facade over per-operation RCON sessions.
pub struct RconClient {
    config: ServerConfig,
}

impl RconClient {
    /// Creates a client for the given server. No connection is opened until
    /// an operation runs.
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// The configuration this client targets.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Runs one command over a fresh session and returns the typed result.
    ///
    /// The session is closed on every exit path, including failures inside
    /// the handshake.
    ///
    /// # Errors
    ///
    /// Any [`SessionError`] from the connect, auth, or execute phase.
    pub async fn run(&self, command_text: &str) -> Result<String, SessionError> {
        let mut session = Session::connect(
            &self.config.addr(),
            self.config.connect_timeout(),
            self.config.settle_timeout(),
        )
        .await?;

        let result = async {
            session.authenticate(&self.config.password).await?;
            session.execute(command_text).await
        }
        .await;

        session.close().await;
        result
    }

    /// Runs one command, folding every failure into an `"Error"` string.
    pub async fn execute(&self, command_text: &str) -> String {
        debug!(command = command_text, "executing");
        match self.run(command_text).await {
            Ok(text) => text,
            Err(e) => error_text(e),
        }
    }

    // ── Named operations ──────────────────────────────────────────────────────

    /// `changelevel <map>`.
    pub async fn change_map(&self, map: &str) -> String {
        info!(map, "changing map");
        self.execute(&command::change_level(map)).await
    }

    /// Applies a game-mode command, optionally chaining a map directive
    /// (workshop paths are rewritten to `host_workshop_map <id>`).
    pub async fn change_mode(&self, mode_cmd: &str, map: Option<&str>) -> String {
        info!(mode_cmd, ?map, "changing mode");
        self.execute(&command::mode_chain(mode_cmd, map)).await
    }

    /// Kicks a player by name. The name is embedded verbatim in quotes.
    pub async fn kick_player(&self, name: &str) -> String {
        info!(name, "kicking player");
        self.execute(&command::kick(name)).await
    }

    /// Adds one bot to `team`.
    ///
    /// The six priming commands run sequentially first, each as its own
    /// session cycle, and their individual results are discarded; cheats
    /// must be on before the bot behaviour flags apply, so the order is
    /// fixed. Only the final `bot_add_*` result is returned.
    pub async fn add_bot(&self, team: BotTeam) -> String {
        info!(?team, "adding bot");
        for priming in command::BOT_PRIMING {
            let discarded = self.execute(priming).await;
            debug!(command = priming, result = %discarded, "bot priming");
        }
        self.execute(&command::bot_add(team)).await
    }

    /// Kicks every bot.
    pub async fn remove_bots(&self) -> String {
        info!("removing bots");
        self.execute(command::BOT_KICK).await
    }

    /// Raw `status` output.
    pub async fn status(&self) -> String {
        self.execute("status").await
    }
}

/// Maps a session failure onto the textual contract the presentation layer
/// inspects. Every string contains the literal substring `"Error"`.
fn error_text(e: SessionError) -> String {
    match e {
        SessionError::AuthenticationFailed => {
            "Error: RCON Authentication Failed (Wrong Password).".to_string()
        }
        SessionError::NoAuthResponse => "Error: No auth response from server.".to_string(),
        other => format!("Error executing RCON command: {other}"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_text_always_contains_error_marker() {
        let cases = [
            SessionError::AuthenticationFailed,
            SessionError::NoAuthResponse,
            SessionError::CommandTimeout,
            SessionError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "reset",
            )),
        ];
        for e in cases {
            let text = error_text(e);
            assert!(text.contains("Error"), "missing marker in {text:?}");
        }
    }

    #[test]
    fn test_auth_failure_text_names_authentication() {
        let text = error_text(SessionError::AuthenticationFailed);
        assert!(text.contains("Authentication"));
    }

    #[test]
    fn test_no_auth_response_text_matches_contract() {
        assert_eq!(
            error_text(SessionError::NoAuthResponse),
            "Error: No auth response from server."
        );
    }
}
