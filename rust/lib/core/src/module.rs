use axum::Router;

/// A service module that contributes HTTP routes.
///
/// The server binary collects all modules and nests each one's routes
/// under `/{name}`. Routes returned here have already had their state applied.
pub trait Module: Send + Sync {
    /// Module name, used for logging and the route prefix.
    fn name(&self) -> &str;

    /// Return the module's routes, to be nested under `/{name}`.
    fn routes(&self) -> Router;
}
