//! Greeting and farewell detection
//!
//! A phrase matches when the lowercased, trimmed message starts with it and
//! the phrase covers at least half of the message.

pub const GREETING_REPLY: &str =
    "Hi! Nice to have you here. I can answer multiple questions regarding movies. Let's start!";
pub const FAREWELL_REPLY: &str =
    "Goodbye! I hope I was able to help you. Feel free to come back anytime.";
pub const REPHRASE_REPLY: &str = "I'm not sure how to answer that. Can you please rephrase?";

pub const GREETINGS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "greetings",
    "heyo",
    "hallo",
    "hi there",
    "hello there",
    "hey there",
    "morning",
    "good morning",
    "hiya",
    "what's up",
    "sup",
    "yo",
    "howdy",
    "good day",
    "good afternoon",
    "good evening",
    "evening",
    "g'day",
    "salutations",
];

pub const FAREWELLS: &[&str] = &[
    "bye",
    "goodbye",
    "farewell",
    "adios",
    "ciao",
    "later",
    "see you",
    "talk to you later",
    "ttyl",
    "goodnight",
    "night",
    "sleep",
    "rest",
    "alright thanks",
    "alright thank you",
    "thanks",
    "thank you",
    "ok thanks",
    "ok thank you",
    "okay thanks",
    "okay thank you",
    "ok bye",
    "okay bye",
    "ok goodbye",
    "okay goodbye",
];

fn starts_with_dominant(message: &str, phrases: &[&str]) -> bool {
    let cleaned = message.trim().to_lowercase();
    let length = cleaned.chars().count();
    phrases
        .iter()
        .any(|phrase| cleaned.starts_with(phrase) && phrase.chars().count() * 2 >= length)
}

pub fn is_greeting(message: &str) -> bool {
    starts_with_dominant(message, GREETINGS)
}

pub fn is_farewell(message: &str) -> bool {
    starts_with_dominant(message, FAREWELLS)
}

/// Fixed reply for a message classified as small talk
pub fn reply(message: &str) -> &'static str {
    if is_greeting(message) {
        GREETING_REPLY
    } else if is_farewell(message) {
        FAREWELL_REPLY
    } else {
        REPHRASE_REPLY
    }
}
