//! Project hierarchy derived from dotted project paths.
//!
//! There is no tree object: `work.api.auth` implies the ancestors `work.api`
//! and `work`, and the empty string is the implicit root. Everything here is
//! recomputed from the current task snapshot on each rebuild.

use std::collections::BTreeSet;

use super::task::Task;

/// Every project named by `tasks` together with all of its ancestors.
/// Never contains the empty root.
pub fn all_projects(tasks: &[Task]) -> BTreeSet<String> {
    let mut projects = BTreeSet::new();
    for task in tasks {
        let mut project = task.project.as_str();
        while !project.is_empty() {
            projects.insert(project.to_string());
            match project.rfind('.') {
                Some(dot) => project = &project[..dot],
                None => break,
            }
        }
    }
    projects
}

/// `foo.bar` -> `foo`, `foo` -> `""`
pub fn parent_project(project: &str) -> &str {
    match project.rfind('.') {
        Some(dot) => &project[..dot],
        None => "",
    }
}

/// Nesting level: the number of dots in the path
pub fn depth(project: &str) -> usize {
    project.matches('.').count()
}

/// Last segment of the path
pub fn leaf_name(project: &str) -> &str {
    project.rsplit('.').next().unwrap_or(project)
}
