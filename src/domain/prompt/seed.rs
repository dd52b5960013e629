//! 기본 프롬프트 파트 세트
//!
//! 시드는 part_id 기준 upsert이므로 여러 번 호출해도 파트가 중복되지 않습니다.

use super::dto::PromptPartRequest;

/// 기본 세트 버전. 본문을 바꾸면 함께 올립니다.
pub const SEED_VERSION: &str = "2024.1";

struct SeedPart {
    part_id: &'static str,
    position: i32,
    title: &'static str,
    text: &'static str,
}

const SEED_PARTS: [SeedPart; 4] = [
    SeedPart {
        part_id: "core_itinerary",
        position: 1,
        title: "Core Itinerary Generator",
        text: "You are an elite luxury travel concierge. \
               Design a detailed {days}-day travel itinerary starting from {from_location}, \
               covering {specific_location}. \
               For each activity, name the exact place so it can be found on a map. \
               Focus on {trip_type} travel with local insider knowledge. \
               Budget: {budget} (all costs in {currency}). Travelling as: {group}. \
               Preferred stay: {stay}. Interests: {categories}. Extra notes: {notes}. \
               Include authentic cultural insights and time-of-day recommendations.",
    },
    SeedPart {
        part_id: "experience_enhancer",
        position: 2,
        title: "Experience Enhancer",
        text: "Refine the itinerary with insider secrets and luxury-level detail. \
               Add sensory details and balance must-see highlights with local encounters.",
    },
    SeedPart {
        part_id: "local_insights",
        position: 3,
        title: "Local Insights & Tips",
        text: "Weave cultural etiquette and safety tips into the travel notes of each day.",
    },
    SeedPart {
        part_id: "engagement_optimizer",
        position: 4,
        title: "Engagement Optimizer",
        text: "Give every day a compelling title and a short, vivid summary.",
    },
];

/// 기본 프롬프트 파트 목록
pub fn default_parts() -> Vec<PromptPartRequest> {
    SEED_PARTS
        .iter()
        .map(|p| PromptPartRequest {
            part_id: p.part_id.to_string(),
            position: p.position,
            title: p.title.to_string(),
            text: p.text.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use validator::Validate;

    #[test]
    fn default_parts_should_have_unique_ids() {
        let parts = default_parts();
        let ids: HashSet<_> = parts.iter().map(|p| p.part_id.as_str()).collect();

        assert_eq!(ids.len(), parts.len());
    }

    #[test]
    fn default_parts_should_be_ordered_and_valid() {
        let parts = default_parts();

        assert!(parts.windows(2).all(|w| w[0].position < w[1].position));
        assert!(parts.iter().all(|p| p.validate().is_ok()));
    }

    #[test]
    fn core_part_should_reference_day_count() {
        let parts = default_parts();

        assert!(parts[0].text.contains("{days}"));
    }
}
