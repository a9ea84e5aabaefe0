use serde::{Deserialize, Serialize};

/// A named list of symbols the user is tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Watchlist {
    pub name: String,
    #[serde(default)]
    pub symbols: Vec<String>,
}
