use std::sync::Arc;

use crate::domain::ai::AiClient;
use crate::domain::itinerary::ItineraryService;
use crate::domain::prompt::SharedTemplateStore;
use crate::global::AdminKeyValidator;

#[derive(Clone)]
pub struct AppState {
    pub prompt_store: SharedTemplateStore,
    pub itinerary_service: Arc<ItineraryService>,
    pub admin_key: Option<AdminKeyValidator>,
}

impl AppState {
    pub fn new(
        prompt_store: SharedTemplateStore,
        ai_client: AiClient,
        admin_key: Option<String>,
    ) -> Self {
        let itinerary_service = Arc::new(ItineraryService::new(prompt_store.clone(), ai_client));

        Self {
            prompt_store,
            itinerary_service,
            admin_key: admin_key.map(AdminKeyValidator::new),
        }
    }
}
