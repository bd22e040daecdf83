//! The fixed set of assistant personalities.
//!
//! A personality only changes the system instruction sent upstream;
//! stored message content never depends on it.

/// A static preset selecting the assistant's voice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Personality {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub system_instruction: &'static str,
    /// Glyph shown next to the name in the UI
    pub icon: &'static str,
}

pub const ORBIT: Personality = Personality {
    id: "orbit",
    name: "Orbit",
    description: "The standard helpful assistant.",
    system_instruction: "You are Orbit, a helpful, polite, and intelligent AI assistant. \
        Keep responses clear and concise unless asked for detail.",
    icon: "🤖",
};

pub const MUSE: Personality = Personality {
    id: "creative",
    name: "Muse",
    description: "Imaginative and poetic.",
    system_instruction: "You are Muse, a creative and imaginative AI. Your responses should be \
        artistic, slightly poetic, and encouraging of brainstorming.",
    icon: "✨",
};

pub const LOGIC: Personality = Personality {
    id: "technical",
    name: "Logic",
    description: "Concise and code-focused.",
    system_instruction: "You are Logic, a technical AI specialized in programming and logic. \
        Provide code snippets when relevant and stay highly objective.",
    icon: "💻",
};

pub static PERSONALITIES: [Personality; 3] = [ORBIT, MUSE, LOGIC];

impl Personality {
    pub fn all() -> &'static [Personality] {
        &PERSONALITIES
    }

    pub fn find(id: &str) -> Option<&'static Personality> {
        PERSONALITIES.iter().find(|p| p.id == id)
    }

    pub fn default_personality() -> &'static Personality {
        &PERSONALITIES[0]
    }
}

impl Default for Personality {
    fn default() -> Self {
        ORBIT
    }
}
