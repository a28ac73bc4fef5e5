use eframe::egui::Color32;

#[derive(Clone, Debug, PartialEq)]
pub struct Topic {
    pub id: &'static str,
    pub label: &'static str,
    pub color: Color32,
    pub sub_topics: &'static [&'static str],
}

pub const TOPICS: &[Topic] = &[
    Topic {
        id: "java",
        label: "Java Ecosystem",
        color: Color32::from_rgb(0xf8, 0x98, 0x20),
        sub_topics: &["Spring Boot", "JVM Internals", "Concurrency", "Build Tooling"],
    },
    Topic {
        id: "ai",
        label: "Artificial Intelligence",
        color: Color32::from_rgb(0x3b, 0x82, 0xf6),
        sub_topics: &[
            "Neural Networks",
            "Embeddings",
            "Reinforcement Learning",
            "Prompting",
            "Alignment",
        ],
    },
    Topic {
        id: "arch",
        label: "Software Arch",
        color: Color32::from_rgb(0x10, 0xb9, 0x81),
        sub_topics: &["Microservices", "Event Sourcing", "Domain Design", "Observability"],
    },
    Topic {
        id: "theology",
        label: "Theology",
        color: Color32::from_rgb(0x8b, 0x5c, 0xf6),
        sub_topics: &["Patristics", "Scholasticism", "Reformation"],
    },
    Topic {
        id: "history",
        label: "History",
        color: Color32::from_rgb(0xef, 0x44, 0x44),
        sub_topics: &["Antiquity", "Middle Ages", "Modern Era", "Cold War"],
    },
];

pub const NOTE_PREFIXES: [&str; 5] = [
    "Introduction to",
    "Advanced",
    "Notes on",
    "Analysis of",
    "Concepts:",
];

pub const NOTE_SUFFIXES: [&str; 5] = ["Patterns", "Basics", "Deep Dive", "Structure", "Overview"];

pub const PLACEHOLDER_PREVIEW: &str =
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Sed do eiusmod tempor...";
