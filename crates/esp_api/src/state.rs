use esp_service::EspService;

#[derive(Clone)]
pub struct AppState {
    pub service: EspService,
}
