//! Visibility rules for task rows and synthetic project rows.
//!
//! Both the project filter and the tag-owner rule for project rows use plain
//! string prefixes, so a filter of `wo` matches `work` and `wonder` alike.

use std::collections::{BTreeSet, HashSet};

use crate::model::project::parent_project;
use crate::model::{Task, ViewState};

/// Whether `task` passes the tag filter (always true when no filter is set)
pub fn matches_tag_filter(task: &Task, state: &ViewState) -> bool {
    state.tag_filter.is_empty() || task.tags.iter().any(|t| state.tag_filter.contains(t))
}

pub fn is_task_visible(task: &Task, state: &ViewState) -> bool {
    if !matches_tag_filter(task, state) {
        return false;
    }
    // Started tasks stay visible inside collapsed projects
    if task.has_project() && !state.is_expanded(&task.project) && !task.is_active() {
        return false;
    }
    if !state.project_filter.is_empty()
        && (!task.has_project() || !task.project.starts_with(&state.project_filter))
    {
        return false;
    }
    true
}

/// Projects owning at least one task that passes the tag filter.
/// Empty when no tag filter is set.
pub fn tagged_projects(tasks: &[Task], state: &ViewState) -> HashSet<String> {
    if state.tag_filter.is_empty() {
        return HashSet::new();
    }
    tasks
        .iter()
        .filter(|t| t.has_project() && matches_tag_filter(t, state))
        .map(|t| t.project.clone())
        .collect()
}

pub fn is_project_visible(project: &str, state: &ViewState, tagged: &HashSet<String>) -> bool {
    if project.is_empty() {
        return false;
    }
    if !state.project_filter.is_empty() && !project.starts_with(&state.project_filter) {
        return false;
    }
    if !state.tag_filter.is_empty() && !tagged.iter().any(|p| p.starts_with(project)) {
        return false;
    }
    state.is_expanded(parent_project(project))
}

/// Visible project paths out of `projects`, in their original order
pub fn visible_projects<'a>(
    projects: &'a BTreeSet<String>,
    state: &ViewState,
    tagged: &HashSet<String>,
) -> impl Iterator<Item = &'a String> {
    projects
        .iter()
        .filter(move |p| is_project_visible(p, state, tagged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(project: &str, tags: &[&str]) -> Task {
        let mut task = Task::new("u", "t", Utc::now());
        task.project = project.to_string();
        task.tags = tags.iter().map(|t| t.to_string()).collect();
        task
    }

    fn expanded(paths: &[&str]) -> ViewState {
        let mut state = ViewState::default();
        for p in paths {
            state.expand(p);
        }
        state
    }

    #[test]
    fn untagged_task_hidden_by_tag_filter() {
        let mut state = ViewState::default();
        state.set_tag_filter("home");
        assert!(!is_task_visible(&task("", &[]), &state));
        assert!(!is_task_visible(&task("", &["work"]), &state));
        assert!(is_task_visible(&task("", &["work", "home"]), &state));
    }

    #[test]
    fn collapsed_project_hides_task() {
        let state = ViewState::default();
        assert!(is_task_visible(&task("", &[]), &state));
        assert!(!is_task_visible(&task("work", &[]), &state));
        assert!(is_task_visible(&task("work", &[]), &expanded(&["work"])));
        // Only the exact project counts, not an ancestor
        assert!(!is_task_visible(&task("work.a", &[]), &expanded(&["work"])));
    }

    #[test]
    fn active_task_bypasses_collapse() {
        let mut t = task("work.a", &[]);
        t.active_since = Some(Utc::now());
        assert!(is_task_visible(&t, &ViewState::default()));
    }

    #[test]
    fn project_filter_is_literal_prefix() {
        let mut state = expanded(&["work", "wonder", "home"]);
        state.set_project_filter("wo");
        assert!(is_task_visible(&task("work", &[]), &state));
        assert!(is_task_visible(&task("wonder", &[]), &state));
        assert!(!is_task_visible(&task("home", &[]), &state));
        assert!(!is_task_visible(&task("", &[]), &state));
    }

    #[test]
    fn project_row_needs_expanded_parent() {
        let none = HashSet::new();
        let state = ViewState::default();
        assert!(is_project_visible("work", &state, &none));
        assert!(!is_project_visible("work.a", &state, &none));
        assert!(is_project_visible("work.a", &expanded(&["work"]), &none));
        assert!(!is_project_visible("", &state, &none));
    }

    #[test]
    fn project_row_respects_project_filter() {
        let none = HashSet::new();
        let mut state = expanded(&["work"]);
        state.set_project_filter("work.a");
        assert!(!is_project_visible("work", &state, &none));
        assert!(is_project_visible("work.api", &state, &none));
    }

    #[test]
    fn project_row_needs_tagged_descendant() {
        let tasks = vec![task("work.a", &["urgent"]), task("home", &["chore"])];
        let mut state = expanded(&["work"]);
        state.set_tag_filter("urgent");
        let tagged = tagged_projects(&tasks, &state);
        assert!(tagged.contains("work.a"));
        assert!(is_project_visible("work", &state, &tagged));
        assert!(is_project_visible("work.a", &state, &tagged));
        assert!(!is_project_visible("home", &state, &tagged));
    }

    #[test]
    fn tagged_projects_ignore_expansion_and_project_filter() {
        let tasks = vec![task("work.a", &["urgent"])];
        let mut state = ViewState::default();
        state.set_tag_filter("urgent");
        state.set_project_filter("home");
        let tagged = tagged_projects(&tasks, &state);
        assert_eq!(tagged.len(), 1);
    }
}
