/// 일정 생성 시스템 프롬프트
pub const ITINERARY_SYSTEM_PROMPT: &str = "You are a meticulous travel planner. \
Follow the user's instructions and reply with a single JSON object only. \
Do not add explanations before or after the JSON.";

/// 조합된 프롬프트 뒤에 붙는 응답 형식 지시문
pub const SCHEMA_INSTRUCTION: &str = r#"IMPORTANT: You MUST return ONLY valid JSON in this EXACT format.
Return exactly one entry in "days" per requested day, numbered from 1.
For every activity, put the searchable place name in "location".

{
  "days": [
    {
      "day": 1,
      "date": "",
      "title": "",
      "summary": "",
      "activities": [
        {
          "time": "",
          "title": "",
          "description": "",
          "duration": "",
          "cost_estimate": "",
          "bookings": [],
          "location": "Place Name, City"
        }
      ],
      "accommodation": "",
      "travel_notes": "",
      "rough_cost": ""
    }
  ]
}"#;

/// 모델에 보낼 최종 사용자 프롬프트
pub fn final_prompt(assembled: &str) -> String {
    format!("{}\n\n{}", assembled, SCHEMA_INSTRUCTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_prompt_should_append_schema_instruction() {
        let prompt = final_prompt("Plan 3 days in Rome.");

        assert!(prompt.starts_with("Plan 3 days in Rome.\n\n"));
        assert!(prompt.ends_with(SCHEMA_INSTRUCTION));
    }

    #[test]
    fn schema_instruction_example_should_be_valid_json() {
        let start = SCHEMA_INSTRUCTION.find('{').unwrap();
        let example: serde_json::Value =
            serde_json::from_str(&SCHEMA_INSTRUCTION[start..]).unwrap();

        assert!(example["days"].is_array());
    }
}
