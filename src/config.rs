use std::env;

/// A predefined game code players can join.
///
/// The set of codes is closed: sessions exist only for codes listed here
/// and are initialized at startup.
#[derive(Debug, Clone)]
pub struct GameCode {
    /// The code players type to join (e.g. "FINANCE2024").
    pub code: &'static str,
    /// Human-readable description shown in the lobby.
    pub description: &'static str,
    /// Creation date (YYYY-MM-DD).
    pub created_at: &'static str,
}

/// The fixed set of joinable sessions.
pub const PREDEFINED_GAME_CODES: [GameCode; 3] = [
    GameCode {
        code: "FINANCE2024",
        description: "Spring Semester Challenge",
        created_at: "2024-04-01",
    },
    GameCode {
        code: "ARBITRAGEX",
        description: "Arbitrage Expert Mode",
        created_at: "2024-05-15",
    },
    GameCode {
        code: "GROUPA",
        description: "Group A Competition",
        created_at: "2024-06-10",
    },
];

/// The five tradable assets and their round-1 prices.
pub const INITIAL_ASSETS: [(&str, f64); 5] = [
    ("Asset A", 100.0),
    ("Asset B", 105.0),
    ("Asset C", 110.0),
    ("Asset D", 95.0),
    ("Asset E", 102.0),
];

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Directory holding the JSON store files.
    pub data_dir: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3001);
        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| ".showdown_data".to_string());

        Self {
            host,
            port,
            data_dir,
        }
    }

    /// Look up a predefined game code.
    pub fn find_game_code(code: &str) -> Option<&'static GameCode> {
        PREDEFINED_GAME_CODES.iter().find(|gc| gc.code == code)
    }
}
