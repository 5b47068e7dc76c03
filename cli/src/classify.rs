use crate::error::Result;
use crate::ui;
use api_client::ErrorCategory;

pub fn execute(status: u16) -> Result<()> {
    let category = ErrorCategory::from_status(status);

    ui::section_header(&format!("HTTP {status}"));
    ui::field("category", &category.to_string());
    ui::field("description", category.description());
    ui::field("error", if status >= 400 { "yes" } else { "no" });
    Ok(())
}
