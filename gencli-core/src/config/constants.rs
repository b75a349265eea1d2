/// Model ID constants
pub mod models {
    pub const GEMINI_2_0_FLASH: &str = "gemini-2.0-flash";
    pub const GEMINI_2_0_FLASH_LITE: &str = "gemini-2.0-flash-lite";
    pub const GEMINI_2_5_PRO: &str = "gemini-2.5-pro";
    pub const GEMINI_2_5_FLASH: &str = "gemini-2.5-flash";

    pub const DEFAULT_MODEL: &str = GEMINI_2_0_FLASH;
    pub const DEFAULT_WEB_SEARCH_MODEL: &str = GEMINI_2_0_FLASH;

    pub const SUPPORTED_MODELS: &[&str] = &[
        GEMINI_2_0_FLASH,
        GEMINI_2_0_FLASH_LITE,
        GEMINI_2_5_PRO,
        GEMINI_2_5_FLASH,
    ];
}

/// Descriptions shown by the `models` command.
pub mod model_info {
    use super::models;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ModelInfo {
        pub name: &'static str,
        pub description: &'static str,
        pub capabilities: &'static [&'static str],
    }

    pub const CATALOG: &[ModelInfo] = &[
        ModelInfo {
            name: models::GEMINI_2_0_FLASH,
            description: "Latest multimodal model, fast responses, good for general use",
            capabilities: &["Text", "Images", "Code", "Web Search"],
        },
        ModelInfo {
            name: models::GEMINI_2_0_FLASH_LITE,
            description: "Lightweight version, faster and more cost-effective",
            capabilities: &["Text", "Code", "Quick responses"],
        },
        ModelInfo {
            name: models::GEMINI_2_5_PRO,
            description: "Most advanced model, best for complex reasoning tasks",
            capabilities: &["Advanced reasoning", "Complex analysis", "Research"],
        },
        ModelInfo {
            name: models::GEMINI_2_5_FLASH,
            description: "Latest fast model with enhanced capabilities",
            capabilities: &["Text", "Images", "Code", "Fast processing"],
        },
    ];
}

pub mod urls {
    pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
    pub const API_KEY_HELP: &str = "https://aistudio.google.com/app/apikey";
}

pub mod env_vars {
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
}

/// File and directory names
pub mod paths {
    pub const CONFIG_FILE: &str = "gencli.toml";
    pub const CONFIG_DIR: &str = ".gencli";
    pub const SETTINGS_FILE: &str = "settings.json";
}

pub mod temperature {
    pub const DEFAULT: f32 = 0.7;
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 2.0;
    /// Deterministic calls: classification, modification, search
    pub const PRECISE: f32 = 0.0;
    /// Query brainstorming for web search
    pub const CREATIVE: f32 = 1.0;
}
