//! Per-command copy and identifiers.
//!
//! One bot binary serves several affirmation collections. Everything that
//! differs between them (slash command, nouns, emoji, action ids, fallback
//! text) lives in a [`CommandProfile`] so handlers stay collection-agnostic.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandProfile {
    /// Storage discriminator; rows of different collections never mix.
    pub key: &'static str,
    pub command: &'static str,
    pub noun: &'static str,
    pub noun_plural: &'static str,
    pub title: &'static str,
    pub emoji: &'static str,
    pub share_label: &'static str,
    pub share_context: &'static str,
    pub fallback_text: &'static str,
    pub shuffle_action_id: &'static str,
    pub share_action_id: &'static str,
}

impl CommandProfile {
    pub const KEYS: [&'static str; 2] = ["customer_affirm", "affirm"];

    pub fn customer_affirmations() -> Self {
        Self {
            key: "customer_affirm",
            command: "/customer_affirm",
            noun: "customer affirmation",
            noun_plural: "customer affirmations",
            title: "Customer Affirmations",
            emoji: ":customer_affirmation:",
            share_label: "💫 Customer Affirmation",
            share_context: "Customer affirmed by",
            fallback_text: "I am grateful for your support.",
            shuffle_action_id: "shuffle_affirmation",
            share_action_id: "customer_affirmation_share",
        }
    }

    pub fn affirmations() -> Self {
        Self {
            key: "affirm",
            command: "/affirm",
            noun: "affirmation",
            noun_plural: "affirmations",
            title: "Affirmations",
            emoji: ":sparkles:",
            share_label: "💫 Affirm",
            share_context: "Affirmed by",
            fallback_text: "You are doing great work.",
            shuffle_action_id: "shuffle_affirmation",
            share_action_id: "affirmation_share",
        }
    }

    pub fn by_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "customer_affirm" => Some(Self::customer_affirmations()),
            "affirm" => Some(Self::affirmations()),
            _ => None,
        }
    }

    /// `customer affirmation` → `Customer Affirmation`
    pub fn noun_title(&self) -> String {
        self.noun
            .split_whitespace()
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" ")
    }

    pub fn add_usage(&self) -> String {
        format!("`{} add \"Your new quote here\" \"Your name here\"`", self.command)
    }
}

impl Default for CommandProfile {
    fn default() -> Self {
        Self::customer_affirmations()
    }
}

#[cfg(test)]
mod tests {
    use super::CommandProfile;

    #[test]
    fn every_listed_key_resolves() {
        for key in CommandProfile::KEYS {
            let profile = CommandProfile::by_key(key).expect("known key");
            assert_eq!(profile.key, key);
            assert!(profile.command.starts_with('/'));
        }
        assert_eq!(CommandProfile::by_key(" Affirm ").map(|p| p.key), Some("affirm"));
        assert!(CommandProfile::by_key("quote").is_none());
    }

    #[test]
    fn profiles_use_distinct_share_actions() {
        let customer = CommandProfile::customer_affirmations();
        let general = CommandProfile::affirmations();
        assert_ne!(customer.share_action_id, general.share_action_id);
        assert_ne!(customer.share_action_id, customer.shuffle_action_id);
    }

    #[test]
    fn title_cases_every_word_of_the_noun() {
        assert_eq!(CommandProfile::customer_affirmations().noun_title(), "Customer Affirmation");
        assert_eq!(CommandProfile::affirmations().noun_title(), "Affirmation");
    }
}
