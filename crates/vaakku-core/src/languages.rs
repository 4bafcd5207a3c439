//! Language and voice catalog supported by the speech service

/// A supported language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// BCP-47 style code sent to the API (e.g. `hi-IN`)
    pub code: &'static str,
    /// English name
    pub label: &'static str,
    /// Name in the language's own script (empty for English)
    pub native: &'static str,
}

/// Source-language code asking the server to detect the language
pub const AUTO_DETECT: &str = "auto";

/// Default TTS target language
pub const DEFAULT_TTS_LANGUAGE: &str = "en-IN";

/// Default translation target language
pub const DEFAULT_TRANSLATE_TARGET: &str = "hi-IN";

/// Languages usable as TTS and translation targets
pub const LANGUAGES: &[Language] = &[
    Language { code: "en-IN", label: "English", native: "" },
    Language { code: "hi-IN", label: "Hindi", native: "हिन्दी" },
    Language { code: "bn-IN", label: "Bengali", native: "বাংলা" },
    Language { code: "ta-IN", label: "Tamil", native: "தமிழ்" },
    Language { code: "te-IN", label: "Telugu", native: "తెలుగు" },
    Language { code: "gu-IN", label: "Gujarati", native: "ગુજરાતી" },
    Language { code: "kn-IN", label: "Kannada", native: "ಕನ್ನಡ" },
    Language { code: "ml-IN", label: "Malayalam", native: "മലയാളം" },
    Language { code: "mr-IN", label: "Marathi", native: "मराठी" },
    Language { code: "pa-IN", label: "Punjabi", native: "ਪੰਜਾਬੀ" },
    Language { code: "od-IN", label: "Odia", native: "ଓଡ଼ିଆ" },
];

/// TTS voices
pub const SPEAKERS: &[&str] = &[
    "shubh", "aditya", "ritu", "priya", "neha", "rahul", "pooja", "rohan", "simran", "kavya",
    "amit", "dev", "ishita", "shreya", "ratan", "varun", "anand", "tanya", "tarun",
];

/// Default TTS voice
pub const DEFAULT_SPEAKER: &str = "shubh";

/// Look up a target language by code (case-insensitive)
#[must_use]
pub fn find_language(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.code.eq_ignore_ascii_case(code))
}

/// `true` if `code` is a valid translation source (a language or `auto`)
#[must_use]
pub fn is_valid_source(code: &str) -> bool {
    code.eq_ignore_ascii_case(AUTO_DETECT) || find_language(code).is_some()
}

/// `true` if `name` is a known TTS voice
#[must_use]
pub fn is_known_speaker(name: &str) -> bool {
    SPEAKERS.iter().any(|s| s.eq_ignore_ascii_case(name))
}
