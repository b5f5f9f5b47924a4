use std::sync::Arc;

use seekr_db::{ApplicationsRepository, Database, InterviewsRepository};
use seekr_export::ExportPipeline;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub applications: ApplicationsRepository,
    pub interviews: InterviewsRepository,
    pub export: ExportPipeline,
    pub jwt_secret: String,
}

impl AppStateInner {
    pub fn new(db: Database, jwt_secret: String) -> AppState {
        let applications = ApplicationsRepository::new(db.clone());
        Arc::new(Self {
            export: ExportPipeline::new(applications.clone()),
            interviews: InterviewsRepository::new(db),
            applications,
            jwt_secret,
        })
    }
}
