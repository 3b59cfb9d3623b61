//! The seven resume collections and lookup by path segment.

use crate::resource::types::{FieldDef, FieldDefault, ResourceDef, UpdateMode};
use axum::http::StatusCode;
use std::collections::HashMap;

pub const LANGUAGE_TYPES: &[&str] = &["Natural", "Programming"];

#[derive(Clone, Debug)]
pub struct ResourceRegistry {
    resources: Vec<ResourceDef>,
    by_path: HashMap<&'static str, usize>,
}

impl ResourceRegistry {
    pub fn new(resources: Vec<ResourceDef>) -> Self {
        let by_path = resources
            .iter()
            .enumerate()
            .map(|(i, r)| (r.path_segment, i))
            .collect();
        ResourceRegistry { resources, by_path }
    }

    /// Education, hobbies, languages, projects, references, skills and work experience.
    pub fn standard() -> Self {
        Self::new(vec![
            education(),
            hobby(),
            language(),
            project(),
            reference(),
            skill(),
            work_experience(),
        ])
    }

    pub fn by_path(&self, path_segment: &str) -> Option<&ResourceDef> {
        self.by_path.get(path_segment).map(|&i| &self.resources[i])
    }

    pub fn resources(&self) -> &[ResourceDef] {
        &self.resources
    }
}

fn education() -> ResourceDef {
    ResourceDef {
        name: "Education",
        path_segment: "educations",
        table: "educations",
        fields: vec![
            FieldDef::text("institution", "institution")
                .required()
                .describe("School or university"),
            FieldDef::text("degree", "degree").required(),
            FieldDef::date("startDate", "start_date").required(),
            FieldDef::date("endDate", "end_date"),
        ],
        update_mode: UpdateMode::ReplaceAll,
        create_status: StatusCode::CREATED,
    }
}

fn hobby() -> ResourceDef {
    ResourceDef {
        name: "Hobby",
        path_segment: "hobbies",
        table: "hobbies",
        fields: vec![FieldDef::text("name", "name").required()],
        update_mode: UpdateMode::ReplaceAll,
        create_status: StatusCode::CREATED,
    }
}

fn language() -> ResourceDef {
    ResourceDef {
        name: "Language",
        path_segment: "languages",
        table: "languages",
        fields: vec![
            FieldDef::text("name", "name")
                .required()
                .describe("The name of the language"),
            FieldDef::integer("level", "level", 1, 10)
                .with_default(FieldDefault::Int(5))
                .describe("Proficiency from 1 to 10"),
            FieldDef::choice("type", "type", LANGUAGE_TYPES)
                .with_default(FieldDefault::Text("Natural"))
                .describe("Natural or programming language"),
        ],
        update_mode: UpdateMode::MergeUpdate,
        create_status: StatusCode::CREATED,
    }
}

fn project() -> ResourceDef {
    ResourceDef {
        name: "Project",
        path_segment: "projects",
        table: "projects",
        fields: vec![
            FieldDef::text("name", "name").required(),
            FieldDef::text("description", "description"),
            FieldDef::date("startDate", "start_date").required(),
            FieldDef::date("endDate", "end_date"),
        ],
        update_mode: UpdateMode::MergeUpdate,
        create_status: StatusCode::CREATED,
    }
}

// Stored as job_references: REFERENCES is reserved in SQL.
fn reference() -> ResourceDef {
    ResourceDef {
        name: "Reference",
        path_segment: "references",
        table: "job_references",
        fields: vec![
            FieldDef::text("name", "name").required(),
            FieldDef::text("title", "title"),
            FieldDef::text("email", "email"),
            FieldDef::text("phone", "phone"),
            FieldDef::text("address", "address"),
        ],
        update_mode: UpdateMode::MergeUpdate,
        create_status: StatusCode::OK,
    }
}

fn skill() -> ResourceDef {
    ResourceDef {
        name: "Skill",
        path_segment: "skills",
        table: "skills",
        fields: vec![
            FieldDef::text("name", "name")
                .required()
                .describe("The name of the skill"),
            FieldDef::text("level", "level").describe("Free-form level, e.g. Intermediate"),
        ],
        update_mode: UpdateMode::MergeUpdate,
        create_status: StatusCode::CREATED,
    }
}

fn work_experience() -> ResourceDef {
    ResourceDef {
        name: "WorkExperience",
        path_segment: "work-experiences",
        table: "work_experiences",
        fields: vec![
            FieldDef::text("company", "company_name").required(),
            FieldDef::text("title", "position").required(),
            FieldDef::date("startDate", "start_date").required(),
            FieldDef::date("endDate", "end_date"),
        ],
        update_mode: UpdateMode::ReplaceAll,
        create_status: StatusCode::CREATED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_has_seven_resources() {
        let registry = ResourceRegistry::standard();
        assert_eq!(registry.resources().len(), 7);
        for r in registry.resources() {
            assert_eq!(registry.by_path(r.path_segment).map(|d| d.name), Some(r.name));
        }
    }

    #[test]
    fn unknown_path_is_none() {
        assert!(ResourceRegistry::standard().by_path("pets").is_none());
    }

    #[test]
    fn update_modes_are_assigned_per_resource() {
        let registry = ResourceRegistry::standard();
        let mode = |p: &str| registry.by_path(p).map(|r| r.update_mode);
        assert_eq!(mode("educations"), Some(UpdateMode::ReplaceAll));
        assert_eq!(mode("hobbies"), Some(UpdateMode::ReplaceAll));
        assert_eq!(mode("work-experiences"), Some(UpdateMode::ReplaceAll));
        assert_eq!(mode("languages"), Some(UpdateMode::MergeUpdate));
        assert_eq!(mode("projects"), Some(UpdateMode::MergeUpdate));
        assert_eq!(mode("references"), Some(UpdateMode::MergeUpdate));
        assert_eq!(mode("skills"), Some(UpdateMode::MergeUpdate));
    }

    #[test]
    fn reference_is_created_with_ok() {
        let registry = ResourceRegistry::standard();
        assert_eq!(registry.by_path("references").map(|r| r.create_status), Some(StatusCode::OK));
        assert_eq!(registry.by_path("skills").map(|r| r.create_status), Some(StatusCode::CREATED));
    }

    #[test]
    fn work_experience_maps_to_legacy_columns() {
        let registry = ResourceRegistry::standard();
        let we = registry.by_path("work-experiences").expect("work experience");
        assert_eq!(we.field("company").map(|f| f.column), Some("company_name"));
        assert_eq!(we.field("title").map(|f| f.column), Some("position"));
    }

    #[test]
    fn language_fields_carry_their_kinds() {
        use crate::resource::types::FieldKind;
        let registry = ResourceRegistry::standard();
        let lang = registry.by_path("languages").expect("languages");
        assert_eq!(
            lang.field("level").map(|f| &f.kind),
            Some(&FieldKind::Integer { min: 1, max: 10 })
        );
        assert_eq!(
            lang.field("type").map(|f| &f.kind),
            Some(&FieldKind::Choice { allowed: LANGUAGE_TYPES })
        );
        assert_eq!(lang.field("name").map(|f| &f.kind), Some(&FieldKind::Text));
    }
}
