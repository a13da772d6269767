//! Persisted collection of student records.
//!
//! Identifiers are caller-supplied and may repeat; lookups, updates, and
//! deletes act on the first match in collection order.

use std::path::Path;

use crate::error::RegistryError;
use crate::model::{Student, StudentId, StudentPatch};
use crate::store::{load_or_empty, JsonFileStore, RecordStore, SaveOutcome};

/// In-memory student list backed by a snapshot store.
pub struct StudentRegistry {
    students: Vec<Student>,
    store: Box<dyn RecordStore<Student>>,
    persist_sort: bool,
}

impl StudentRegistry {
    /// Load the persisted collection. Missing or unreadable data yields an empty registry.
    pub fn load(store: Box<dyn RecordStore<Student>>) -> Self {
        let students = load_or_empty(store.as_ref(), "students");
        Self {
            students,
            store,
            persist_sort: false,
        }
    }

    /// Load the registry from a JSON snapshot file.
    pub fn open(path: &Path) -> Self {
        Self::load(Box::new(JsonFileStore::<Student>::new(path)))
    }

    /// Whether [`sort_by_gpa_descending`](Self::sort_by_gpa_descending) writes
    /// the new order to storage. Off by default: sorting is a view.
    pub fn with_persist_sort(mut self, persist_sort: bool) -> Self {
        self.persist_sort = persist_sort;
        self
    }

    /// Append a student and persist.
    pub fn add(&mut self, student: Student) -> SaveOutcome {
        tracing::debug!("adding student {}", student.id);
        self.students.push(student);
        self.save()
    }

    /// First student with `id`.
    pub fn find_by_id(&self, id: StudentId) -> Result<&Student, RegistryError> {
        self.position(id).map(|i| &self.students[i])
    }

    /// Apply `patch` to the first student with `id` and persist.
    ///
    /// Invalid fields are rejected before anything changes.
    pub fn update(
        &mut self,
        id: StudentId,
        patch: StudentPatch,
    ) -> Result<SaveOutcome, RegistryError> {
        let index = self.position(id)?;
        let patch = patch.validated()?;
        patch.apply(&mut self.students[index]);
        Ok(self.save())
    }

    /// Remove the first student with `id` and persist.
    pub fn delete(&mut self, id: StudentId) -> Result<(Student, SaveOutcome), RegistryError> {
        let index = self.position(id)?;
        let removed = self.students.remove(index);
        Ok((removed, self.save()))
    }

    /// Stable sort by GPA, highest first.
    pub fn sort_by_gpa_descending(&mut self) -> SaveOutcome {
        self.students.sort_by(|a, b| b.gpa.total_cmp(&a.gpa));
        if self.persist_sort {
            self.save()
        } else {
            SaveOutcome::Skipped
        }
    }

    /// Mean GPA over every student.
    pub fn average_gpa(&self) -> Result<f64, RegistryError> {
        if self.students.is_empty() {
            return Err(RegistryError::EmptyCollection);
        }
        let sum: f64 = self.students.iter().map(|s| s.gpa).sum();
        Ok(sum / self.students.len() as f64)
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    fn position(&self, id: StudentId) -> Result<usize, RegistryError> {
        self.students
            .iter()
            .position(|s| s.id == id)
            .ok_or(RegistryError::NotFound(id))
    }

    fn save(&self) -> SaveOutcome {
        SaveOutcome::from_result(self.store.save(&self.students), "students")
    }
}

impl std::fmt::Debug for StudentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudentRegistry")
            .field("students", &self.students)
            .field("persist_sort", &self.persist_sort)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn student(id: StudentId, name: &str, gpa: f64) -> Student {
        Student::new(id, name, 20, "CS", gpa).unwrap()
    }

    fn registry(students: Vec<Student>) -> (StudentRegistry, Arc<MemoryStore<Student>>) {
        let store = Arc::new(MemoryStore::with_records(students));
        (StudentRegistry::load(Box::new(store.clone())), store)
    }

    fn names(registry: &StudentRegistry) -> Vec<&str> {
        registry.students().iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn add_persists_every_time() {
        let (mut reg, store) = registry(vec![]);
        assert!(reg.add(student(1, "A", 3.0)).is_saved());
        assert!(reg.add(student(2, "B", 3.8)).is_saved());
        assert_eq!(store.save_count(), 2);
        assert_eq!(store.records().len(), 2);
    }

    #[test]
    fn find_returns_first_match() {
        let (mut reg, _) = registry(vec![]);
        let _ = reg.add(student(5, "first", 2.0));
        let _ = reg.add(student(5, "second", 4.0));
        assert_eq!(reg.find_by_id(5).unwrap().name, "first");
    }

    #[test]
    fn update_changes_only_first_match() {
        let (mut reg, store) = registry(vec![student(5, "first", 2.0), student(5, "second", 4.0)]);
        let patch = StudentPatch {
            name: Some("renamed".into()),
            gpa: Some(3.1),
            ..Default::default()
        };
        assert!(reg.update(5, patch).unwrap().is_saved());
        assert_eq!(names(&reg), vec!["renamed", "second"]);
        assert_eq!(reg.students()[0].gpa, 3.1);
        assert_eq!(store.records()[0].name, "renamed");
    }

    #[test]
    fn invalid_update_changes_nothing() {
        let (mut reg, store) = registry(vec![student(1, "A", 3.0)]);
        let patch = StudentPatch {
            name: Some("B".into()),
            gpa: Some(f64::INFINITY),
            ..Default::default()
        };
        assert!(matches!(
            reg.update(1, patch),
            Err(RegistryError::InvalidInput(_))
        ));
        assert_eq!(names(&reg), vec!["A"]);
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn delete_removes_first_match() {
        let (mut reg, store) = registry(vec![
            student(1, "A", 3.0),
            student(2, "B", 3.5),
            student(1, "C", 2.5),
        ]);
        let (removed, save) = reg.delete(1).unwrap();
        assert_eq!(removed.name, "A");
        assert!(save.is_saved());
        assert_eq!(names(&reg), vec!["B", "C"]);
        assert_eq!(store.records().len(), 2);
    }

    #[test]
    fn missing_id_is_not_found_and_unchanged() {
        let (mut reg, store) = registry(vec![student(1, "A", 3.0)]);
        assert_eq!(reg.find_by_id(9).unwrap_err(), RegistryError::NotFound(9));
        assert_eq!(
            reg.update(9, StudentPatch::default()).unwrap_err(),
            RegistryError::NotFound(9)
        );
        assert_eq!(reg.delete(9).unwrap_err(), RegistryError::NotFound(9));
        assert_eq!(names(&reg), vec!["A"]);
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn sort_and_average_example() {
        let (mut reg, _) = registry(vec![student(1, "A", 3.0), student(2, "B", 3.8)]);
        let _ = reg.sort_by_gpa_descending();
        assert_eq!(names(&reg), vec!["B", "A"]);
        assert!((reg.average_gpa().unwrap() - 3.4).abs() < 1e-12);
    }

    #[test]
    fn sort_is_stable_for_equal_gpa() {
        let (mut reg, _) = registry(vec![
            student(1, "first", 3.0),
            student(2, "top", 3.9),
            student(3, "second", 3.0),
        ]);
        let _ = reg.sort_by_gpa_descending();
        assert_eq!(names(&reg), vec!["top", "first", "second"]);
    }

    #[test]
    fn sort_is_not_persisted_by_default() {
        let (mut reg, store) = registry(vec![student(1, "A", 3.0), student(2, "B", 3.8)]);
        assert!(matches!(reg.sort_by_gpa_descending(), SaveOutcome::Skipped));
        assert_eq!(store.save_count(), 0);
        assert_eq!(store.records()[0].name, "A");
    }

    #[test]
    fn sort_persists_when_enabled() {
        let store = Arc::new(MemoryStore::with_records(vec![
            student(1, "A", 3.0),
            student(2, "B", 3.8),
        ]));
        let mut reg = StudentRegistry::load(Box::new(store.clone())).with_persist_sort(true);
        assert!(reg.sort_by_gpa_descending().is_saved());
        assert_eq!(store.records()[0].name, "B");
    }

    #[test]
    fn average_of_empty_registry() {
        let (reg, _) = registry(vec![]);
        assert_eq!(reg.average_gpa(), Err(RegistryError::EmptyCollection));
    }

    #[test]
    fn failed_save_keeps_memory_authoritative() {
        let (mut reg, store) = registry(vec![]);
        store.set_fail_saves(true);
        let outcome = reg.add(student(1, "A", 3.0));
        assert!(outcome.error().is_some());
        assert_eq!(reg.len(), 1);
        assert!(reg.find_by_id(1).is_ok());
    }

    #[test]
    fn reopen_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.json");

        let mut reg = StudentRegistry::open(&path);
        let _ = reg.add(student(1, "A", 3.0));
        let _ = reg.add(student(2, "B", 3.8));
        let _ = reg.delete(1).unwrap();

        let reopened = StudentRegistry::open(&path);
        assert_eq!(reopened.students(), reg.students());
    }
}
