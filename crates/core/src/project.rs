//! Higher-level groupings: projects, workspaces, and their dependencies.

use serde::{Deserialize, Serialize};

use crate::team::TeamMember;
use crate::types::{RecordId, Timestamp};

/// How one project depends on another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    Blocking,
    Related,
    Prerequisite,
}

/// Whether a project dependency is still live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyStatus {
    Active,
    Resolved,
}

/// A dependency edge between two projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDependency {
    pub project_id: RecordId,
    pub kind: DependencyKind,
    pub status: DependencyStatus,
}

/// A project grouping action plans and people.
///
/// `plan_ids` is a non-owning reference list: action plans are not
/// exclusively owned by a project, and deleting a plan does not edit the
/// lists that mention it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: RecordId,
    pub name: String,
    pub lead: RecordId,
    #[serde(default)]
    pub member_ids: Vec<RecordId>,
    #[serde(default)]
    pub plan_ids: Vec<RecordId>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub dependencies: Vec<ProjectDependency>,
    pub created_at: Timestamp,
}

/// A named grouping of projects with a shared team roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub project_ids: Vec<RecordId>,
    #[serde(default)]
    pub roster: Vec<TeamMember>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&DependencyKind::Prerequisite).unwrap(),
            "\"prerequisite\""
        );
    }

    #[test]
    fn project_defaults_optional_collections() {
        let json = serde_json::json!({
            "id": "proj1",
            "name": "Q1 launch",
            "lead": "m1",
            "created_at": "2026-02-01T09:00:00Z"
        });
        let p: Project = serde_json::from_value(json).unwrap();
        assert!(p.plan_ids.is_empty());
        assert!(p.dependencies.is_empty());
        assert!(p.budget.is_none());
    }
}
