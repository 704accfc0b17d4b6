/// Engine-wide settings, fixed when the [`Engine`](crate::Engine) is built.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Compare control and container tags case-sensitively.
    /// Off by default: `<Button>` and `<button>` are the same control.
    pub case_sensitive: bool,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn case_sensitive(mut self, on: bool) -> Self {
        self.case_sensitive = on;
        self
    }

    /// Defaults overridden by `STARFOX_CASE_SENSITIVE` (`1` / `true`).
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let case_sensitive = var("STARFOX_CASE_SENSITIVE")
            .map(|v| crate::coerce::parse_bool(v.trim()))
            .unwrap_or(false);
        Self { case_sensitive }
    }
}
