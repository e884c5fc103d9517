use std::sync::Arc;

use services::TestService;

pub trait UiApp: Send + Sync {
    fn student_name(&self) -> String;
    fn test_service(&self) -> Arc<TestService>;
}

#[derive(Clone)]
pub struct AppContext {
    student_name: Arc<str>,
    test_service: Arc<TestService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            student_name: Arc::from(app.student_name()),
            test_service: app.test_service(),
        }
    }

    #[must_use]
    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    #[must_use]
    pub fn department(&self) -> &str {
        self.test_service.settings().department()
    }

    #[must_use]
    pub fn test_service(&self) -> Arc<TestService> {
        Arc::clone(&self.test_service)
    }
}

// Provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
