/// 지도 검색 링크 접두사
pub const MAPS_SEARCH_PREFIX: &str = "https://www.google.com/maps/search/?api=1&query=";

/// 장소명으로 지도 검색 링크를 만듭니다. 같은 입력에는 항상 같은 링크를 반환합니다.
///
/// 쿼리는 form 인코딩(공백은 `+`)으로 만듭니다.
pub fn maps_link(place_name: &str) -> String {
    let query = urlencoding::encode(place_name.trim()).replace("%20", "+");
    format!("{}{}", MAPS_SEARCH_PREFIX, query)
}
