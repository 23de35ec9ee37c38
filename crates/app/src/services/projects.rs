use aitrace_core::Project;

use crate::error::Result;
use crate::services::{SharedConfig, missing_project, open_db};

#[derive(Clone)]
pub struct ProjectsService {
    config: SharedConfig,
}

impl ProjectsService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    pub fn get(&self, name: &str) -> Result<Project> {
        let db = open_db(&self.config)?;
        db.get_project_by_name(name)?
            .ok_or_else(|| missing_project(name))
    }

    pub fn list(&self) -> Result<Vec<Project>> {
        let db = open_db(&self.config)?;
        Ok(db.list_projects()?)
    }
}
