use crate::error::{CliError, Result, ResultExt};
use crate::ui;
use api_client::{ApiConfig, ApiResponse, ErrorClassifier, ErrorClassifierImpl, Pet, PetApiClient};
use std::path::Path;
use tokio::runtime::Runtime;

pub fn execute(config_path: &str, id: i64) -> Result<()> {
    let config = ApiConfig::load_with_validation(Path::new(config_path))?;

    let rt = Runtime::new()
        .map_err(|e| CliError::Other(format!("Failed to create async runtime: {}", e)))?;

    let response = rt
        .block_on(async {
            let client = PetApiClient::new(&config)?;
            client.get_pet(id).await
        })
        .with_context(|| format!("Probing pet {id}"))?;

    report(&response);
    Ok(())
}

fn report(response: &ApiResponse) {
    let classifier = ErrorClassifierImpl::new();

    ui::section_header(&format!("GET {}", response.url));
    ui::field("status", &response.status_line);

    if !classifier.is_error(response) {
        match response.json::<Pet>() {
            Ok(pet) => {
                ui::success_message(&format!("Found pet '{}'", pet.name));
                if let Some(status) = pet.status {
                    ui::field("pet status", status.as_str());
                }
            }
            Err(e) => ui::warning_message(&format!("Response is not a pet: {e}")),
        }
        return;
    }

    let classification = classifier.classify(response);
    ui::warning_message(&classifier.error_message(response));
    ui::field("category", &classification.category.to_string());
    ui::field("description", classification.category.description());

    for (key, value) in classifier.extract_fields(response) {
        ui::field(&key, &value.to_string());
    }
    if classification.extracted_fields.is_none() {
        ui::info_message("No structured error payload in the response body");
    }
}
