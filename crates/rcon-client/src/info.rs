//! The fixed read-only query battery.
//!
//! Five independent commands, five independent session cycles, raw text
//! keyed by field name. No parsing or cross-field consistency checking
//! happens here: pulling the hostname, map, or player list out of the
//! `status` text is the presentation layer's job. The bundle is rebuilt on
//! every call and never cached.

use tracing::info;

use crate::client::RconClient;

/// Raw outputs of the info battery, one field per command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    /// `status` output: hostname, map, player list.
    pub status: String,
    /// `sv_password` output.
    pub password: String,
    /// `game_type` output.
    pub game_type: String,
    /// `game_mode` output.
    pub game_mode: String,
    /// `host_map` output.
    pub map: String,
}

impl RconClient {
    /// Issues the five-command battery and returns the raw outputs.
    ///
    /// Each field may independently be an `"Error"` string if its cycle
    /// failed; the others are still collected.
    pub async fn server_info(&self) -> ServerInfo {
        info!("fetching server info");
        ServerInfo {
            status: self.execute("status").await,
            password: self.execute("sv_password").await,
            game_type: self.execute("game_type").await,
            game_mode: self.execute("game_mode").await,
            map: self.execute("host_map").await,
        }
    }
}

#[cfg(test)]
mod tests {
    use rcon_core::command::INFO_BATTERY;

    /// Keeps the literals above aligned with the battery definition.
    #[test]
    fn test_battery_fields_match_command_list() {
        assert_eq!(
            INFO_BATTERY,
            ["status", "sv_password", "game_type", "game_mode", "host_map"]
        );
    }
}
