use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

fn default_days() -> i32 {
    5
}

fn default_currency() -> String {
    "INR".to_string()
}

/// 여행 일정 생성 요청 DTO (사용자 선호 조건)
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ItineraryRequest {
    /// 출발지
    #[serde(default, alias = "origin")]
    #[schema(example = "Mumbai")]
    pub from_location: String,

    /// 방문하고 싶은 장소 (비어 있으면 categories로 대체)
    #[serde(default, alias = "destination")]
    #[schema(example = "Rome")]
    pub specific_places: String,

    #[serde(default)]
    #[schema(example = json!(["History", "Food"]))]
    pub categories: Vec<String>,

    /// 여행 일수 (1 ~ 30)
    #[serde(default = "default_days")]
    #[validate(range(min = 1, max = 30, message = "days는 1 이상 30 이하여야 합니다"))]
    #[schema(example = 3)]
    pub days: i32,

    #[serde(default = "default_currency")]
    #[validate(length(min = 1, max = 10, message = "currency는 1자 이상 10자 이하여야 합니다"))]
    #[schema(example = "EUR")]
    pub currency: String,

    #[serde(default)]
    #[schema(example = "Mid-range")]
    pub budget: String,

    #[serde(default)]
    #[schema(example = json!(["Relaxation"]))]
    pub intent: Vec<String>,

    #[serde(default)]
    #[schema(example = "Couple")]
    pub group: String,

    #[serde(default)]
    #[schema(example = "Boutique hotel")]
    pub stay: String,

    #[serde(default)]
    #[validate(length(max = 2000, message = "notes는 2000자 이하여야 합니다"))]
    #[schema(example = "Vegetarian food only")]
    pub notes: String,
}

/// 검증된 여행 일정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItineraryResult {
    pub days: Vec<DayPlan>,
}

/// 하루 일정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DayPlan {
    /// 1부터 시작하는 연속된 일차
    #[schema(example = 1)]
    pub day: u32,
    pub date: String,
    pub title: String,
    pub summary: String,
    pub activities: Vec<Activity>,
    pub accommodation: String,
    pub travel_notes: String,
    pub rough_cost: String,
}

/// 개별 활동
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Activity {
    #[schema(example = "09:00")]
    pub time: String,
    #[schema(example = "Colosseum")]
    pub title: String,
    pub description: String,
    #[schema(example = "2h")]
    pub duration: String,
    #[schema(example = "EUR 18")]
    pub cost_estimate: String,
    pub bookings: Vec<String>,
    /// 지도 검색에 사용한 장소명 (없으면 title)
    #[schema(example = "Colosseum, Rome")]
    pub location: String,
    #[schema(example = "https://www.google.com/maps/search/?api=1&query=Colosseum%2C+Rome")]
    pub map_link: String,
}
