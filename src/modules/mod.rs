pub mod books;
pub mod reviews;
pub mod users;

use libris_http::AppError;
use libris_kernel::ModuleRegistry;

/// Register all domain modules with the registry.
///
/// Order matters for schema bootstrap: `reviews` references both other tables.
pub fn register_all(registry: &mut ModuleRegistry) {
    registry.register(users::create_module());
    registry.register(books::create_module());
    registry.register(reviews::create_module());
}

/// Validation error naming every field flagged as absent.
pub(crate) fn missing(fields: &[(&'static str, bool)]) -> AppError {
    let absent: Vec<&str> = fields
        .iter()
        .filter(|(_, is_absent)| *is_absent)
        .map(|(name, _)| *name)
        .collect();
    AppError::missing_fields(&absent)
}
