/// Engine tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Seed for the piece generator; each new game derives its own from it.
    pub seed: u32,
    /// How long a transient message (save result, load failure) stays up.
    pub message_ms: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            message_ms: 1500,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }
}
