use serde::Serialize;
use std::fmt;

/// `Init → SessionOpen → KeysLoaded → (Iterating → PerFile)* → Done`, with
/// `Failed` reachable from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunPhase {
    Init,
    SessionOpen,
    KeysLoaded,
    Iterating,
    PerFile,
    Done,
    Failed,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Init => "init",
            RunPhase::SessionOpen => "session-open",
            RunPhase::KeysLoaded => "keys-loaded",
            RunPhase::Iterating => "iterating",
            RunPhase::PerFile => "per-file",
            RunPhase::Done => "done",
            RunPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}
