// Task list state engine

use crate::filter::Filter;
use crate::models::{EditSession, Task, TaskId};
use crate::prefs::{DARK_MODE_KEY, KeyValue};
use eyre::{Result, eyre};
use tracing::{debug, warn};

/// In-memory task list with a view filter, at most one in-progress edit,
/// and a dark-mode flag persisted through the injected backend.
///
/// Single-threaded by design: every operation runs to completion before the
/// next one starts. Tasks live for the process lifetime only; the theme flag
/// is the sole persisted state.
pub struct TaskListStore<P: KeyValue> {
    tasks: Vec<Task>,
    filter: Filter,
    edit: Option<EditSession>,
    dark_mode: bool,
    next_id: TaskId,
    prefs: P,
}

impl<P: KeyValue> TaskListStore<P> {
    /// Create a store backed by the given preference store.
    ///
    /// Performs the one-time theme load. A missing, unreadable, or malformed
    /// persisted value leaves the theme at its default (light); the failure
    /// is logged and never surfaced.
    pub fn new(prefs: P) -> Self {
        let dark_mode = match prefs.get(DARK_MODE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(flag) => flag,
                Err(e) => {
                    warn!(value = %raw, error = ?e, "Malformed persisted theme value, using default");
                    false
                }
            },
            Ok(None) => false,
            Err(e) => {
                warn!(error = ?e, "Failed to load theme preference, using default");
                false
            }
        };

        Self {
            tasks: Vec::new(),
            filter: Filter::default(),
            edit: None,
            dark_mode,
            next_id: 1,
            prefs,
        }
    }

    /// Append a new pending task with the trimmed text.
    ///
    /// Empty or whitespace-only input is silently ignored, matching the
    /// app's behavior of rejecting blank submissions without an error.
    pub fn add_task(&mut self, raw: &str) {
        let text = raw.trim();
        if text.is_empty() {
            debug!("Ignoring blank task submission");
            return;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.tasks.push(Task::new(id, text));
    }

    /// Begin editing the given task, seeding the draft with its current text.
    ///
    /// Any edit already in progress for another task is discarded without
    /// saving.
    pub fn start_edit(&mut self, id: TaskId) -> Result<()> {
        let task = self.find(id)?;
        let draft = task.text.clone();
        if let Some(prev) = self.edit.replace(EditSession { task_id: id, draft }) {
            debug!(task_id = prev.task_id, "Discarding unsaved draft");
        }
        Ok(())
    }

    /// Replace the draft text of the edit in progress. No validation.
    pub fn update_draft(&mut self, text: &str) -> Result<()> {
        let edit = self.edit.as_mut().ok_or_else(|| eyre!("no edit in progress"))?;
        edit.draft = text.to_string();
        Ok(())
    }

    /// Commit the edit in progress, writing the draft into the task verbatim.
    ///
    /// Unlike `add_task`, the draft is not trimmed or validated: saving an
    /// empty draft empties the task's text. A session whose task no longer
    /// exists errors and is cleared; the draft has nowhere to go.
    pub fn save_edit(&mut self) -> Result<()> {
        let edit = self.edit.take().ok_or_else(|| eyre!("no edit in progress"))?;
        let task = self.find_mut(edit.task_id)?;
        task.text = edit.draft;
        Ok(())
    }

    /// Flip the completion flag of the given task.
    ///
    /// Allowed while the task is being edited; the edit is unaffected.
    pub fn toggle_complete(&mut self, id: TaskId) -> Result<()> {
        let task = self.find_mut(id)?;
        task.completed = !task.completed;
        Ok(())
    }

    /// Replace the view filter. Never touches task data or the edit in progress.
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Tasks visible under the current filter, in insertion order.
    ///
    /// Recomputed on every call; the collection is small enough that caching
    /// would buy nothing.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| self.filter.matches(t)).collect()
    }

    /// All tasks in insertion order, ignoring the filter
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The edit in progress, if any
    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn theme(&self) -> bool {
        self.dark_mode
    }

    /// Set the dark-mode flag and write it through to the preference store.
    ///
    /// Every call writes, not just changes. A failed write keeps the
    /// in-memory value and is logged, never surfaced.
    pub fn set_theme(&mut self, dark_mode: bool) {
        self.dark_mode = dark_mode;

        let encoded = match serde_json::to_string(&dark_mode) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = ?e, "Failed to encode theme preference");
                return;
            }
        };

        if let Err(e) = self.prefs.set(DARK_MODE_KEY, &encoded) {
            warn!(error = ?e, "Failed to persist theme preference");
        }
    }

    fn find(&self, id: TaskId) -> Result<&Task> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| eyre!("no task with id {id}"))
    }

    fn find_mut(&mut self, id: TaskId) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| eyre!("no task with id {id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPrefs;

    fn store() -> TaskListStore<MemoryPrefs> {
        TaskListStore::new(MemoryPrefs::new())
    }

    /// The two tasks the original screen starts with
    fn seeded() -> TaskListStore<MemoryPrefs> {
        let mut s = store();
        s.add_task("Buy groceries");
        s.add_task("Complete project");
        s.toggle_complete(2).unwrap();
        s
    }

    #[test]
    fn test_add_task_assigns_unique_ids() {
        let mut s = store();
        s.add_task("one");
        s.add_task("two");
        s.add_task("three");

        let ids: Vec<TaskId> = s.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(s.tasks().len(), 3);
    }

    #[test]
    fn test_add_task_trims_text() {
        let mut s = store();
        s.add_task("  Buy milk  ");
        assert_eq!(s.tasks()[0].text, "Buy milk");
    }

    #[test]
    fn test_add_task_rejects_blank() {
        let mut s = store();
        s.add_task("");
        s.add_task("   ");
        assert!(s.tasks().is_empty());
    }

    #[test]
    fn test_blank_submission_does_not_consume_an_id() {
        let mut s = store();
        s.add_task("   ");
        s.add_task("real");
        assert_eq!(s.tasks()[0].id, 1);
    }

    #[test]
    fn test_visible_tasks_all_preserves_insertion_order() {
        let s = seeded();
        let visible = s.visible_tasks();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].text, "Buy groceries");
        assert_eq!(visible[1].text, "Complete project");
    }

    #[test]
    fn test_visible_tasks_pending() {
        let mut s = seeded();
        s.set_filter(Filter::Pending);

        let visible = s.visible_tasks();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 1);
        assert_eq!(visible[0].text, "Buy groceries");
        assert!(!visible[0].completed);
    }

    #[test]
    fn test_visible_tasks_completed() {
        let mut s = seeded();
        s.set_filter(Filter::Completed);

        let visible = s.visible_tasks();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 2);
        assert!(visible[0].completed);
    }

    #[test]
    fn test_set_filter_does_not_mutate_tasks() {
        let mut s = seeded();
        let before: Vec<Task> = s.tasks().to_vec();

        s.set_filter(Filter::Completed);
        s.set_filter(Filter::Pending);
        s.set_filter(Filter::All);

        assert_eq!(s.tasks(), before.as_slice());
        assert_eq!(s.filter(), Filter::All);
    }

    #[test]
    fn test_toggle_complete_is_an_involution() {
        let mut s = seeded();
        s.toggle_complete(1).unwrap();
        assert!(s.tasks()[0].completed);
        s.toggle_complete(1).unwrap();
        assert!(!s.tasks()[0].completed);
    }

    #[test]
    fn test_toggle_complete_unknown_id() {
        let mut s = seeded();
        assert!(s.toggle_complete(99).is_err());
    }

    #[test]
    fn test_edit_roundtrip() {
        let mut s = seeded();
        s.start_edit(1).unwrap();
        assert_eq!(s.edit_session().unwrap().draft, "Buy groceries");

        s.update_draft("Buy milk").unwrap();
        s.save_edit().unwrap();

        assert_eq!(s.tasks()[0].text, "Buy milk");
        assert!(s.edit_session().is_none());
    }

    #[test]
    fn test_save_edit_keeps_draft_verbatim() {
        let mut s = seeded();
        s.start_edit(1).unwrap();
        s.update_draft("   ").unwrap();
        s.save_edit().unwrap();

        // No trim on save, unlike add_task
        assert_eq!(s.tasks()[0].text, "   ");
    }

    #[test]
    fn test_start_edit_replaces_active_session_without_saving() {
        let mut s = seeded();
        s.start_edit(1).unwrap();
        s.update_draft("abandoned draft").unwrap();

        s.start_edit(2).unwrap();

        assert_eq!(s.tasks()[0].text, "Buy groceries");
        let edit = s.edit_session().unwrap();
        assert_eq!(edit.task_id, 2);
        assert_eq!(edit.draft, "Complete project");
    }

    #[test]
    fn test_start_edit_unknown_id() {
        let mut s = seeded();
        assert!(s.start_edit(99).is_err());
        assert!(s.edit_session().is_none());
    }

    #[test]
    fn test_update_draft_without_session() {
        let mut s = seeded();
        assert!(s.update_draft("text").is_err());
    }

    #[test]
    fn test_save_edit_without_session() {
        let mut s = seeded();
        assert!(s.save_edit().is_err());
    }

    #[test]
    fn test_toggle_during_edit_leaves_session_alive() {
        let mut s = seeded();
        s.start_edit(1).unwrap();
        s.toggle_complete(1).unwrap();

        assert!(s.tasks()[0].completed);
        assert_eq!(s.edit_session().unwrap().task_id, 1);
    }

    #[test]
    fn test_theme_defaults_to_light() {
        let s = store();
        assert!(!s.theme());
    }

    #[test]
    fn test_theme_persists_across_reload() {
        let mut prefs = MemoryPrefs::new();
        {
            let mut s = TaskListStore::new(&mut prefs);
            s.set_theme(true);
            assert!(s.theme());
        }

        let s = TaskListStore::new(&mut prefs);
        assert!(s.theme());
    }

    #[test]
    fn test_theme_write_is_json_encoded() {
        let mut prefs = MemoryPrefs::new();
        let mut s = TaskListStore::new(&mut prefs);
        s.set_theme(true);
        drop(s);

        assert_eq!(prefs.get(DARK_MODE_KEY).unwrap(), Some("true".to_string()));
    }

    #[test]
    fn test_malformed_persisted_theme_falls_back_to_default() {
        let mut prefs = MemoryPrefs::new();
        prefs.set(DARK_MODE_KEY, "not json").unwrap();

        let s = TaskListStore::new(prefs);
        assert!(!s.theme());
    }
}
