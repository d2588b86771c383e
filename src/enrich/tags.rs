// src/enrich/tags.rs
//! "Smart tags": a display-ready, priority-ordered, length-capped tag list.

use std::collections::HashSet;

/// At most this many tags appear in one entry's tag display.
pub const MAX_TAGS: usize = 3;

const TAG_SEPARATOR: &str = " · ";

/// Build the tag display string for one candidate.
///
/// Topics found in the priority set (case-insensitive) come first, then the
/// remainder; each partition keeps its original relative order. With no
/// topics at all, the resolved language label stands in.
pub fn smart_tags(topics: &[String], language_label: &str, priority: &HashSet<String>) -> String {
    if topics.is_empty() {
        return language_label.to_string();
    }

    let mut prioritized: Vec<&str> = Vec::new();
    let mut rest: Vec<&str> = Vec::new();
    for topic in topics {
        if priority.contains(&topic.to_lowercase()) {
            prioritized.push(topic);
        } else {
            rest.push(topic);
        }
    }

    prioritized
        .into_iter()
        .chain(rest)
        .take(MAX_TAGS)
        .collect::<Vec<_>>()
        .join(TAG_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priority(tags: &[&str]) -> HashSet<String> {
        tags.iter().map(|t| t.to_lowercase()).collect()
    }

    fn topics(ts: &[&str]) -> Vec<String> {
        ts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn priority_topics_lead_and_cap_at_three() {
        let out = smart_tags(
            &topics(&["foo", "docker", "bar", "kubernetes"]),
            "General",
            &priority(&["docker", "kubernetes"]),
        );
        assert_eq!(out, "docker · kubernetes · foo");
    }

    #[test]
    fn priority_match_is_case_insensitive() {
        let out = smart_tags(
            &topics(&["foo", "Docker"]),
            "General",
            &priority(&["docker"]),
        );
        assert_eq!(out, "Docker · foo");
    }

    #[test]
    fn partitions_keep_original_relative_order() {
        let out = smart_tags(
            &topics(&["kubernetes", "docker", "x"]),
            "General",
            &priority(&["docker", "kubernetes"]),
        );
        assert_eq!(out, "kubernetes · docker · x");
    }

    #[test]
    fn no_topics_falls_back_to_language_label() {
        let out = smart_tags(&[], "Rust", &priority(&["docker"]));
        assert_eq!(out, "Rust");
        let out = smart_tags(&[], "General", &priority(&[]));
        assert_eq!(out, "General");
    }

    #[test]
    fn fewer_than_three_topics_all_appear() {
        let out = smart_tags(&topics(&["a", "b"]), "General", &priority(&[]));
        assert_eq!(out, "a · b");
    }
}
