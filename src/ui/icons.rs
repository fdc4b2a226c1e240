pub struct Icons;

impl Icons {
    pub const ROCKET: &str = "🚀";
    pub const CHECK: &str = "✅";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const LINK: &str = "🔗";
    pub const PAPER: &str = "📄";
    pub const SKIP: &str = "⏭️";
    pub const TABLE: &str = "🧾";
    pub const CLOCK: &str = "⏱️";
}
